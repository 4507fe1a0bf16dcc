// Copyright Kamu Data, Inc. and contributors. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

use std::sync::Arc;

use chrono::{DateTime, Datelike, Duration, NaiveDate, NaiveTime, Utc};
use rand::Rng;
use thiserror::Error;
use time_source::SystemTimeSource;

use crate::{BuildCondition, IntegrationRequest, Trigger, WeekDays};

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

/// Fires daily at a fixed time of day on the configured days of the week.
///
/// An optional random offset spreads the load of many projects scheduled at
/// the same time: every recomputation picks a whole number of minutes in
/// `[0, offset]` to add to the configured time.
pub struct ScheduleTrigger {
    name: String,
    time_source: Arc<dyn SystemTimeSource>,
    time: NaiveTime,
    week_days: WeekDays,
    random_offset_in_minutes: u32,
    build_condition: BuildCondition,
    next_build_time: DateTime<Utc>,
}

impl ScheduleTrigger {
    pub const DEFAULT_NAME: &'static str = "ScheduleTrigger";

    pub fn try_new(
        time_source: Arc<dyn SystemTimeSource>,
        time: NaiveTime,
        week_days: WeekDays,
        random_offset_in_minutes: i64,
        build_condition: BuildCondition,
    ) -> Result<Self, ScheduleTriggerValidationError> {
        if week_days.is_empty() {
            return Err(ScheduleTriggerValidationError::NoWeekDays);
        }

        let random_offset_in_minutes = u32::try_from(random_offset_in_minutes).map_err(|_| {
            ScheduleTriggerValidationError::NegativeRandomOffset {
                minutes: random_offset_in_minutes,
            }
        })?;

        let (_, wrapped_seconds) =
            time.overflowing_add_signed(Duration::minutes(i64::from(random_offset_in_minutes)));
        if wrapped_seconds != 0 {
            return Err(ScheduleTriggerValidationError::RandomOffsetPastMidnight {
                time,
                minutes: random_offset_in_minutes,
            });
        }

        let mut trigger = Self {
            name: Self::DEFAULT_NAME.to_string(),
            time_source,
            time,
            week_days,
            random_offset_in_minutes,
            build_condition,
            next_build_time: DateTime::<Utc>::MAX_UTC,
        };

        let now = trigger.time_source.now();
        trigger.next_build_time = trigger.next_slot(now, true);

        Ok(trigger)
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    #[inline]
    pub fn time(&self) -> NaiveTime {
        self.time
    }

    #[inline]
    pub fn week_days(&self) -> WeekDays {
        self.week_days
    }

    fn next_slot(&self, now: DateTime<Utc>, include_now: bool) -> DateTime<Utc> {
        let time_of_day = self.time + Duration::minutes(i64::from(self.pick_offset()));

        let is_ahead = |date: NaiveDate| {
            let candidate = date.and_time(time_of_day).and_utc();
            if include_now {
                candidate >= now
            } else {
                candidate > now
            }
        };

        let mut date = now.date_naive();
        if !is_ahead(date) {
            let Some(next_date) = date.succ_opt() else {
                return DateTime::<Utc>::MAX_UTC;
            };
            date = next_date;
        }

        while !self.week_days.contains(date.weekday()) {
            let Some(next_date) = date.succ_opt() else {
                return DateTime::<Utc>::MAX_UTC;
            };
            date = next_date;
        }

        date.and_time(time_of_day).and_utc()
    }

    fn pick_offset(&self) -> u32 {
        if self.random_offset_in_minutes == 0 {
            0
        } else {
            rand::thread_rng().gen_range(0..=self.random_offset_in_minutes)
        }
    }
}

impl Trigger for ScheduleTrigger {
    fn name(&self) -> &str {
        &self.name
    }

    fn fire(&mut self) -> Option<IntegrationRequest> {
        let now = self.time_source.now();
        if now < self.next_build_time {
            return None;
        }

        tracing::debug!(
            trigger = %self.name,
            next_build_time = %self.next_build_time,
            build_condition = %self.build_condition,
            "Scheduled time reached"
        );

        IntegrationRequest::for_condition(self.build_condition, &self.name, now)
    }

    fn integration_completed(&mut self) {
        let now = self.time_source.now();

        // A build caused by someone else before our slot keeps the slot
        if now < self.next_build_time {
            return;
        }

        self.next_build_time = self.next_slot(now, false);

        tracing::debug!(
            trigger = %self.name,
            next_build_time = %self.next_build_time,
            "Schedule advanced"
        );
    }

    fn next_build(&self) -> DateTime<Utc> {
        self.next_build_time
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ScheduleTriggerValidationError {
    #[error("Schedule must allow at least one day of the week")]
    NoWeekDays,

    #[error("Random offset must not be negative, got {minutes} minutes")]
    NegativeRandomOffset { minutes: i64 },

    #[error("Random offset of {minutes} minutes from {time} crosses midnight")]
    RandomOffsetPastMidnight { time: NaiveTime, minutes: u32 },
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////
