// Copyright Kamu Data, Inc. and contributors. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use time_source::SystemTimeSource;

use crate::{BuildCondition, IntegrationRequest, Trigger};

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

/// Fires once a fixed period has passed since the previous completed build.
///
/// Without an initial interval the very first poll is already due.
pub struct IntervalTrigger {
    name: String,
    time_source: Arc<dyn SystemTimeSource>,
    interval: Duration,
    build_condition: BuildCondition,
    next_build_time: DateTime<Utc>,
}

impl IntervalTrigger {
    pub const DEFAULT_NAME: &'static str = "IntervalTrigger";

    pub fn new(
        time_source: Arc<dyn SystemTimeSource>,
        interval: Duration,
        initial_interval: Option<Duration>,
        build_condition: BuildCondition,
    ) -> Self {
        let now = time_source.now();
        let next_build_time = match initial_interval {
            Some(initial_interval) => now
                .checked_add_signed(initial_interval)
                .unwrap_or(DateTime::<Utc>::MAX_UTC),
            None => now,
        };

        Self {
            name: Self::DEFAULT_NAME.to_string(),
            time_source,
            interval,
            build_condition,
            next_build_time,
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    #[inline]
    pub fn interval(&self) -> Duration {
        self.interval
    }

    #[inline]
    pub fn build_condition(&self) -> BuildCondition {
        self.build_condition
    }
}

impl Trigger for IntervalTrigger {
    fn name(&self) -> &str {
        &self.name
    }

    fn fire(&mut self) -> Option<IntegrationRequest> {
        let now = self.time_source.now();

        if self.build_condition != BuildCondition::ForceBuild && now < self.next_build_time {
            return None;
        }

        tracing::debug!(
            trigger = %self.name,
            next_build_time = %self.next_build_time,
            build_condition = %self.build_condition,
            "Interval elapsed"
        );

        IntegrationRequest::for_condition(self.build_condition, &self.name, now)
    }

    fn integration_completed(&mut self) {
        self.next_build_time = self
            .time_source
            .now()
            .checked_add_signed(self.interval)
            .unwrap_or(DateTime::<Utc>::MAX_UTC);

        tracing::debug!(
            trigger = %self.name,
            next_build_time = %self.next_build_time,
            "Interval rescheduled"
        );
    }

    fn next_build(&self) -> DateTime<Utc> {
        self.next_build_time
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////
