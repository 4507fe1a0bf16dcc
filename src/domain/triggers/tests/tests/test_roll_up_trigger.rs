// Copyright Kamu Data, Inc. and contributors. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

use chrono::Duration;
use cinder_triggers::{BuildCondition, MockTrigger, RollUpTrigger, Timeout, Trigger};
use pretty_assertions::assert_eq;

use crate::tests::utils::{TimeHarness, mock_always_firing, request, t0};

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

fn new_trigger(harness: &TimeHarness) -> RollUpTrigger {
    RollUpTrigger::new(
        harness.time_source.clone(),
        Box::new(mock_always_firing(BuildCondition::IfModificationExists, "inner", t0())),
        Timeout::from_minutes(10),
    )
}

#[test_log::test]
fn test_fires_spaced_further_than_minimum_time_propagate() {
    let harness = TimeHarness::new(t0());
    let mut trigger = new_trigger(&harness);
    assert_eq!(trigger.minimum_time(), Timeout::from_minutes(10));

    assert_eq!(
        trigger.fire(),
        Some(request(BuildCondition::IfModificationExists, "inner", t0()))
    );
    trigger.integration_completed();

    harness.fake.advance(Duration::minutes(11));
    assert!(trigger.fire().is_some());
}

#[test_log::test]
fn test_fires_within_minimum_time_are_rolled_up() {
    let harness = TimeHarness::new(t0());
    let mut trigger = new_trigger(&harness);

    assert!(trigger.fire().is_some());
    trigger.integration_completed();

    harness.fake.advance(Duration::minutes(5));
    assert_eq!(trigger.fire(), None);

    harness.fake.advance(Duration::minutes(5));
    assert!(trigger.fire().is_some());
}

#[test_log::test]
fn test_inner_is_always_polled_and_completed() {
    let harness = TimeHarness::new(t0());

    let mut inner = MockTrigger::new();
    inner
        .expect_fire()
        .times(3)
        .returning(|| Some(request(BuildCondition::ForceBuild, "inner", t0())));
    inner.expect_integration_completed().times(1).return_const(());

    let mut trigger = RollUpTrigger::new(
        harness.time_source.clone(),
        Box::new(inner),
        Timeout::from_seconds(60),
    );

    assert!(trigger.fire().is_some());
    trigger.integration_completed();
    assert_eq!(trigger.fire(), None);
    assert_eq!(trigger.fire(), None);
}

#[test]
fn test_next_build() {
    let harness = TimeHarness::new(t0());

    let mut inner = MockTrigger::new();
    inner
        .expect_next_build()
        .return_const(t0() + Duration::minutes(1));
    inner.expect_integration_completed().return_const(());

    let mut trigger = RollUpTrigger::new(
        harness.time_source.clone(),
        Box::new(inner),
        Timeout::from_minutes(10),
    );
    assert_eq!(trigger.next_build(), t0() + Duration::minutes(1));

    harness.fake.advance(Duration::minutes(2));
    trigger.integration_completed();
    assert_eq!(trigger.next_build(), t0() + Duration::minutes(12));
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////
