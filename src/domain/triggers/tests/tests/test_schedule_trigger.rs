// Copyright Kamu Data, Inc. and contributors. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

use chrono::{Datelike, Duration, Timelike, Weekday};
use cinder_triggers::{
    BuildCondition,
    ScheduleTrigger,
    ScheduleTriggerValidationError,
    Trigger,
    WeekDays,
};
use pretty_assertions::assert_eq;
use time_source::SystemTimeSource;

use crate::tests::utils::{TimeHarness, at, t0, time_of_day};

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

#[test_log::test]
fn test_fires_after_time_then_moves_to_next_day() {
    let harness = TimeHarness::new(t0());
    let mut trigger = ScheduleTrigger::try_new(
        harness.time_source.clone(),
        time_of_day(23, 30),
        WeekDays::all(),
        0,
        BuildCondition::ForceBuild,
    )
    .unwrap();

    assert_eq!(trigger.next_build(), at(2004, 1, 1, 23, 30, 0));

    harness.fake.set(at(2004, 1, 1, 23, 25, 0));
    assert_eq!(trigger.fire(), None);

    harness.fake.set(at(2004, 1, 1, 23, 31, 0));
    let request = trigger.fire().unwrap();
    assert_eq!(request.build_condition(), BuildCondition::ForceBuild);
    assert_eq!(request.source(), "ScheduleTrigger");

    trigger.integration_completed();
    assert_eq!(trigger.next_build(), at(2004, 1, 2, 23, 30, 0));
    assert_eq!(trigger.fire(), None);
}

#[test_log::test]
fn test_next_build_lands_on_configured_week_day() {
    // Thursday
    let harness = TimeHarness::new(t0());
    let mut trigger = ScheduleTrigger::try_new(
        harness.time_source.clone(),
        time_of_day(10, 0),
        [Weekday::Mon].into_iter().collect(),
        0,
        BuildCondition::IfModificationExists,
    )
    .unwrap();
    assert_eq!(trigger.time(), time_of_day(10, 0));
    assert!(trigger.week_days().contains(Weekday::Mon));
    assert!(!trigger.week_days().contains(Weekday::Thu));

    let mut previous = trigger.next_build();
    assert_eq!(previous, at(2004, 1, 5, 10, 0, 0));

    for _ in 0..4 {
        let next_build = trigger.next_build();
        assert_eq!(next_build.weekday(), Weekday::Mon);
        assert_eq!((next_build.hour(), next_build.minute()), (10, 0));
        assert!(next_build >= harness.time_source.now());
        assert!(next_build >= previous);
        previous = next_build;

        harness.fake.set(next_build + Duration::minutes(20));
        assert!(trigger.fire().is_some());
        trigger.integration_completed();
        assert_eq!(trigger.next_build(), next_build + Duration::days(7));
    }
}

#[test_log::test]
fn test_weekend_schedule_skips_to_next_allowed_day() {
    let harness = TimeHarness::new(at(2004, 1, 3, 9, 0, 0));
    let mut trigger = ScheduleTrigger::try_new(
        harness.time_source.clone(),
        time_of_day(8, 0),
        [Weekday::Sat, Weekday::Sun].into_iter().collect(),
        0,
        BuildCondition::IfModificationExists,
    )
    .unwrap();

    // Saturday's slot has passed already
    assert_eq!(trigger.next_build(), at(2004, 1, 4, 8, 0, 0));

    harness.fake.set(at(2004, 1, 4, 8, 0, 0));
    assert!(trigger.fire().is_some());
    trigger.integration_completed();

    assert_eq!(trigger.next_build(), at(2004, 1, 10, 8, 0, 0));
}

#[test_log::test]
fn test_completion_before_slot_keeps_slot() {
    let harness = TimeHarness::new(t0());
    let mut trigger = ScheduleTrigger::try_new(
        harness.time_source.clone(),
        time_of_day(23, 30),
        WeekDays::all(),
        0,
        BuildCondition::IfModificationExists,
    )
    .unwrap();

    harness.fake.set(at(2004, 1, 1, 12, 0, 0));
    trigger.integration_completed();

    assert_eq!(trigger.next_build(), at(2004, 1, 1, 23, 30, 0));
}

#[test_log::test]
fn test_random_offset_stays_within_range() {
    let harness = TimeHarness::new(t0());

    for _ in 0..20 {
        let trigger = ScheduleTrigger::try_new(
            harness.time_source.clone(),
            time_of_day(22, 0),
            WeekDays::all(),
            10,
            BuildCondition::IfModificationExists,
        )
        .unwrap();

        let next_build = trigger.next_build();
        assert!(next_build >= at(2004, 1, 1, 22, 0, 0), "{next_build}");
        assert!(next_build <= at(2004, 1, 1, 22, 10, 0), "{next_build}");
        assert_eq!(next_build.second(), 0);
    }
}

#[test]
fn test_validation_errors() {
    let harness = TimeHarness::new(t0());

    let try_new = |time, week_days, offset| {
        ScheduleTrigger::try_new(
            harness.time_source.clone(),
            time,
            week_days,
            offset,
            BuildCondition::IfModificationExists,
        )
        .err()
    };

    assert_eq!(
        try_new(time_of_day(10, 0), WeekDays::all(), -1),
        Some(ScheduleTriggerValidationError::NegativeRandomOffset { minutes: -1 })
    );
    assert_eq!(
        try_new(time_of_day(23, 30), WeekDays::all(), 45),
        Some(ScheduleTriggerValidationError::RandomOffsetPastMidnight {
            time: time_of_day(23, 30),
            minutes: 45
        })
    );
    assert_eq!(
        try_new(time_of_day(10, 0), WeekDays::none(), 0),
        Some(ScheduleTriggerValidationError::NoWeekDays)
    );
    assert_eq!(try_new(time_of_day(23, 30), WeekDays::all(), 29), None);
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////
