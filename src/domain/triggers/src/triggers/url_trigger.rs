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
use url::Url;

use crate::{BuildCondition, IntegrationRequest, LastModified, LastModifiedResolver, Trigger};

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

/// Periodically checks the modification time of a resource and fires when it
/// changes.
///
/// The first successful check only records the modification time as a
/// baseline. A resource that reports no modification time at all fires once
/// when first seen, later checks of such a resource never fire until it
/// starts reporting a time. Failed checks count as "no change".
pub struct UrlTrigger {
    name: String,
    time_source: Arc<dyn SystemTimeSource>,
    resolver: Arc<dyn LastModifiedResolver>,
    url: Url,
    interval: Duration,
    build_condition: BuildCondition,
    next_check_time: DateTime<Utc>,
    baseline: Baseline,
    pending: Option<IntegrationRequest>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Baseline {
    NotChecked,
    Unknown,
    Known(DateTime<Utc>),
}

impl UrlTrigger {
    pub const DEFAULT_NAME: &'static str = "UrlTrigger";

    pub const DEFAULT_INTERVAL_SECONDS: i64 = 300;

    pub fn new(
        time_source: Arc<dyn SystemTimeSource>,
        resolver: Arc<dyn LastModifiedResolver>,
        url: Url,
        interval: Duration,
        initial_interval: Option<Duration>,
        build_condition: BuildCondition,
    ) -> Self {
        let next_check_time = after(
            time_source.now(),
            initial_interval.unwrap_or_else(Duration::zero),
        );

        Self {
            name: Self::DEFAULT_NAME.to_string(),
            time_source,
            resolver,
            url,
            interval,
            build_condition,
            next_check_time,
            baseline: Baseline::NotChecked,
            pending: None,
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    #[inline]
    pub fn url(&self) -> &Url {
        &self.url
    }

    /// Records the observed value, returns whether it counts as a change
    fn observe(&mut self, last_modified: LastModified) -> bool {
        let (baseline, changed) = match (self.baseline, last_modified) {
            (Baseline::NotChecked, LastModified::Known(t)) => (Baseline::Known(t), false),
            (Baseline::NotChecked, LastModified::Unknown) => (Baseline::Unknown, true),
            (Baseline::Unknown, LastModified::Known(t)) => (Baseline::Known(t), true),
            (Baseline::Unknown, LastModified::Unknown) => (Baseline::Unknown, false),
            (Baseline::Known(seen), LastModified::Known(t)) if t > seen => (Baseline::Known(t), true),
            (Baseline::Known(seen), _) => (Baseline::Known(seen), false),
        };

        self.baseline = baseline;
        changed
    }
}

impl Trigger for UrlTrigger {
    fn name(&self) -> &str {
        &self.name
    }

    fn fire(&mut self) -> Option<IntegrationRequest> {
        if let Some(pending) = &self.pending {
            return Some(pending.clone());
        }

        let now = self.time_source.now();
        if now < self.next_check_time {
            return None;
        }

        let changed = match self.resolver.last_modified(&self.url) {
            Ok(last_modified) => {
                tracing::debug!(
                    trigger = %self.name,
                    url = %self.url,
                    ?last_modified,
                    baseline = ?self.baseline,
                    "Checked resource"
                );
                self.observe(last_modified)
            }
            Err(err) => {
                tracing::warn!(
                    trigger = %self.name,
                    url = %self.url,
                    error = %err,
                    "Resource check failed, assuming no change"
                );
                false
            }
        };

        if !changed {
            self.next_check_time = after(now, self.interval);
            return None;
        }

        self.pending = IntegrationRequest::for_condition(self.build_condition, &self.name, now);
        self.pending.clone()
    }

    fn integration_completed(&mut self) {
        self.pending = None;
        self.next_check_time = after(self.time_source.now(), self.interval);
    }

    fn next_build(&self) -> DateTime<Utc> {
        self.next_check_time
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

fn after(t: DateTime<Utc>, interval: Duration) -> DateTime<Utc> {
    t.checked_add_signed(interval)
        .unwrap_or(DateTime::<Utc>::MAX_UTC)
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////
