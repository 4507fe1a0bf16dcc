// Copyright Kamu Data, Inc. and contributors. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

use chrono::{DateTime, Utc};

use crate::IntegrationRequest;

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

/// Decides when a project build should run.
///
/// A scheduler polls [`Trigger::fire`] at a fixed cadence. A returned request
/// means a build should start. Once that build finishes (successfully or not)
/// the scheduler calls [`Trigger::integration_completed`] exactly once so the
/// trigger can advance its state. Until then repeated polls yield the same
/// decision.
#[cfg_attr(any(feature = "testing", test), mockall::automock)]
pub trait Trigger: Send {
    /// Human-readable identifier, defaults to the trigger type name
    fn name(&self) -> &str;

    fn fire(&mut self) -> Option<IntegrationRequest>;

    fn integration_completed(&mut self);

    /// Best estimate of the next build time. Has no side effects.
    fn next_build(&self) -> DateTime<Utc>;
}

impl std::fmt::Debug for dyn Trigger {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Trigger")
            .field("name", &self.name())
            .field("next_build", &self.next_build())
            .finish()
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////
