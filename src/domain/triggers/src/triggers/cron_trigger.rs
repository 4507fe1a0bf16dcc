// Copyright Kamu Data, Inc. and contributors. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use time_source::SystemTimeSource;

use crate::{BuildCondition, CronExpression, IntegrationRequest, Trigger};

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

/// Fires at moments matching a cron expression
pub struct CronTrigger {
    name: String,
    time_source: Arc<dyn SystemTimeSource>,
    expression: CronExpression,
    build_condition: BuildCondition,
    next_build_time: DateTime<Utc>,
    triggered: bool,
}

impl CronTrigger {
    pub const DEFAULT_NAME: &'static str = "CronTrigger";

    pub fn new(
        time_source: Arc<dyn SystemTimeSource>,
        expression: CronExpression,
        build_condition: BuildCondition,
    ) -> Self {
        let next_build_time = Self::next_after(&expression, time_source.now());

        Self {
            name: Self::DEFAULT_NAME.to_string(),
            time_source,
            expression,
            build_condition,
            next_build_time,
            triggered: false,
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    #[inline]
    pub fn expression(&self) -> &CronExpression {
        &self.expression
    }

    fn next_after(expression: &CronExpression, t: DateTime<Utc>) -> DateTime<Utc> {
        expression
            .next_after(t)
            .unwrap_or(DateTime::<Utc>::MAX_UTC)
    }
}

impl Trigger for CronTrigger {
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
            expression = %self.expression,
            next_build_time = %self.next_build_time,
            "Cron schedule reached"
        );

        self.triggered = true;
        IntegrationRequest::for_condition(self.build_condition, &self.name, now)
    }

    fn integration_completed(&mut self) {
        if !self.triggered {
            return;
        }

        self.triggered = false;
        self.next_build_time = Self::next_after(&self.expression, self.time_source.now());

        tracing::debug!(
            trigger = %self.name,
            next_build_time = %self.next_build_time,
            "Cron schedule advanced"
        );
    }

    fn next_build(&self) -> DateTime<Utc> {
        self.next_build_time
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////
