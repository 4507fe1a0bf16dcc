// Copyright Kamu Data, Inc. and contributors. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

use std::sync::Arc;

use chrono::{DateTime, Datelike, Duration, NaiveTime, Utc};
use time_source::SystemTimeSource;

use crate::{IntegrationRequest, Trigger, WeekDays};

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

/// Suppresses the inner trigger during a daily time window.
///
/// With `start_time < end_time` the window is the open interval between them,
/// the bounds themselves are outside of it. Otherwise the window wraps past
/// midnight and includes both bounds. The window only applies on the given
/// days of the week; an empty set applies it every day.
pub struct FilterTrigger {
    name: String,
    time_source: Arc<dyn SystemTimeSource>,
    inner: Box<dyn Trigger>,
    start_time: NaiveTime,
    end_time: NaiveTime,
    week_days: WeekDays,
}

impl FilterTrigger {
    pub const DEFAULT_NAME: &'static str = "FilterTrigger";

    pub fn new(
        time_source: Arc<dyn SystemTimeSource>,
        inner: Box<dyn Trigger>,
        start_time: NaiveTime,
        end_time: NaiveTime,
        week_days: WeekDays,
    ) -> Self {
        Self {
            name: Self::DEFAULT_NAME.to_string(),
            time_source,
            inner,
            start_time,
            end_time,
            week_days,
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    #[inline]
    fn wraps_midnight(&self) -> bool {
        self.start_time >= self.end_time
    }

    pub fn is_suppressed_at(&self, t: DateTime<Utc>) -> bool {
        if !self.week_days.is_empty() && !self.week_days.contains(t.weekday()) {
            return false;
        }

        let time_of_day = t.time();
        if self.wraps_midnight() {
            time_of_day >= self.start_time || time_of_day <= self.end_time
        } else {
            self.start_time < time_of_day && time_of_day < self.end_time
        }
    }
}

impl Trigger for FilterTrigger {
    fn name(&self) -> &str {
        &self.name
    }

    fn fire(&mut self) -> Option<IntegrationRequest> {
        let now = self.time_source.now();

        if self.is_suppressed_at(now) {
            tracing::debug!(
                trigger = %self.name,
                start_time = %self.start_time,
                end_time = %self.end_time,
                "Inside filter window, not polling inner trigger"
            );
            return None;
        }

        self.inner.fire()
    }

    fn integration_completed(&mut self) {
        self.inner.integration_completed();
    }

    fn next_build(&self) -> DateTime<Utc> {
        let inner_next = self.inner.next_build();
        if inner_next == DateTime::<Utc>::MAX_UTC || !self.is_suppressed_at(inner_next) {
            return inner_next;
        }

        let date = inner_next.date_naive();
        let end_date = if self.wraps_midnight() && inner_next.time() >= self.start_time {
            date.succ_opt()
        } else {
            Some(date)
        };

        // A wrapping window includes its end bound
        let past_end = if self.wraps_midnight() {
            Duration::seconds(1)
        } else {
            Duration::zero()
        };

        end_date
            .and_then(|date| {
                date.and_time(self.end_time)
                    .and_utc()
                    .checked_add_signed(past_end)
            })
            .unwrap_or(DateTime::<Utc>::MAX_UTC)
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////
