// Copyright Kamu Data, Inc. and contributors. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

use std::sync::Arc;

use chrono::{Duration, NaiveDate, TimeZone, Utc};
use pretty_assertions::assert_eq;
use time_source::{FakeSystemTimeSource, SystemTimeSource};

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

#[test]
fn test_fake_time_source_is_frozen_until_advanced() {
    let t0 = Utc.with_ymd_and_hms(2004, 1, 1, 1, 0, 0).unwrap();
    let time_source = FakeSystemTimeSource::new_set(t0);

    assert_eq!(time_source.now(), t0);
    assert_eq!(time_source.now(), t0);

    time_source.advance(Duration::seconds(5));
    assert_eq!(time_source.now(), t0 + Duration::seconds(5));
}

#[test]
fn test_fake_time_source_clones_share_time() {
    let t0 = Utc.with_ymd_and_hms(2004, 1, 1, 1, 0, 0).unwrap();
    let time_source = FakeSystemTimeSource::new_set(t0);
    let shared: Arc<dyn SystemTimeSource> = Arc::new(time_source.clone());

    time_source.advance(Duration::minutes(90));

    assert_eq!(shared.now(), Utc.with_ymd_and_hms(2004, 1, 1, 2, 30, 0).unwrap());
}

#[test]
fn test_today_drops_time_component() {
    let time_source =
        FakeSystemTimeSource::new_set(Utc.with_ymd_and_hms(2024, 2, 29, 23, 59, 59).unwrap());

    assert_eq!(
        time_source.today(),
        NaiveDate::from_ymd_opt(2024, 2, 29).unwrap()
    );

    time_source.advance(Duration::seconds(1));
    assert_eq!(
        time_source.today(),
        NaiveDate::from_ymd_opt(2024, 3, 1).unwrap()
    );
}

#[test]
#[should_panic(expected = "is more than new time")]
fn test_fake_time_source_refuses_to_go_back() {
    let t0 = Utc.with_ymd_and_hms(2004, 1, 1, 1, 0, 0).unwrap();
    let time_source = FakeSystemTimeSource::new_set(t0);

    time_source.set(t0 - Duration::seconds(1));
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////
