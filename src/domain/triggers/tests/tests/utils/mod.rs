// Copyright Kamu Data, Inc. and contributors. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

use std::sync::Arc;

use chrono::{DateTime, NaiveTime, TimeZone, Utc};
use cinder_triggers::{BuildCondition, IntegrationRequest, MockTrigger};
use time_source::{FakeSystemTimeSource, SystemTimeSource};

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

/// 2004-01-01 is a Thursday
pub fn t0() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2004, 1, 1, 1, 0, 0).unwrap()
}

pub fn at(y: i32, mo: u32, d: u32, h: u32, mi: u32, s: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(y, mo, d, h, mi, s).unwrap()
}

pub fn time_of_day(h: u32, m: u32) -> NaiveTime {
    NaiveTime::from_hms_opt(h, m, 0).unwrap()
}

pub struct TimeHarness {
    pub fake: FakeSystemTimeSource,
    pub time_source: Arc<dyn SystemTimeSource>,
}

impl TimeHarness {
    pub fn new(t: DateTime<Utc>) -> Self {
        let fake = FakeSystemTimeSource::new_set(t);
        Self {
            time_source: Arc::new(fake.clone()),
            fake,
        }
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

pub fn request(
    build_condition: BuildCondition,
    source: &str,
    requested_at: DateTime<Utc>,
) -> IntegrationRequest {
    IntegrationRequest::for_condition(build_condition, source, requested_at).unwrap()
}

/// Inner trigger that fires on every poll with the given condition
pub fn mock_always_firing(
    build_condition: BuildCondition,
    source: &'static str,
    requested_at: DateTime<Utc>,
) -> MockTrigger {
    let mut mock = MockTrigger::new();
    mock.expect_name().return_const(source.to_string());
    mock.expect_fire()
        .returning(move || IntegrationRequest::for_condition(build_condition, source, requested_at));
    mock.expect_integration_completed().return_const(());
    mock.expect_next_build().return_const(requested_at);
    mock
}

/// Inner trigger that never fires
pub fn mock_never_firing(next_build: DateTime<Utc>) -> MockTrigger {
    let mut mock = MockTrigger::new();
    mock.expect_name().return_const("Never".to_string());
    mock.expect_fire().returning(|| None);
    mock.expect_integration_completed().return_const(());
    mock.expect_next_build().return_const(next_build);
    mock
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////
