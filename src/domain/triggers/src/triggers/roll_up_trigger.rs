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

use crate::{IntegrationRequest, Timeout, Trigger};

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

/// Throttles the inner trigger so that builds are at least `minimum_time`
/// apart.
///
/// The inner trigger is always polled, its requests are dropped while the
/// minimum time since the last completed integration has not passed.
pub struct RollUpTrigger {
    name: String,
    time_source: Arc<dyn SystemTimeSource>,
    inner: Box<dyn Trigger>,
    minimum_time: Timeout,
    last_integration_time: Option<DateTime<Utc>>,
}

impl RollUpTrigger {
    pub const DEFAULT_NAME: &'static str = "RollUpTrigger";

    pub fn new(
        time_source: Arc<dyn SystemTimeSource>,
        inner: Box<dyn Trigger>,
        minimum_time: Timeout,
    ) -> Self {
        Self {
            name: Self::DEFAULT_NAME.to_string(),
            time_source,
            inner,
            minimum_time,
            last_integration_time: None,
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    #[inline]
    pub fn minimum_time(&self) -> Timeout {
        self.minimum_time
    }
}

impl Trigger for RollUpTrigger {
    fn name(&self) -> &str {
        &self.name
    }

    fn fire(&mut self) -> Option<IntegrationRequest> {
        let request = self.inner.fire()?;

        if let Some(last_integration_time) = self.last_integration_time {
            let now = self.time_source.now();
            if now - last_integration_time < self.minimum_time.as_duration() {
                tracing::debug!(
                    trigger = %self.name,
                    %last_integration_time,
                    minimum_time = %self.minimum_time,
                    "Rolling up request"
                );
                return None;
            }
        }

        Some(request)
    }

    fn integration_completed(&mut self) {
        self.last_integration_time = Some(self.time_source.now());
        self.inner.integration_completed();
    }

    fn next_build(&self) -> DateTime<Utc> {
        match self.last_integration_time {
            Some(last_integration_time) => last_integration_time
                .checked_add_signed(self.minimum_time.as_duration())
                .unwrap_or(DateTime::<Utc>::MAX_UTC),
            None => self.inner.next_build(),
        }
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////
