// Copyright Kamu Data, Inc. and contributors. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

use std::sync::{Arc, Mutex};

use chrono::{DateTime, Duration, NaiveDate, Utc};

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

/// Abstracts the system time source
pub trait SystemTimeSource: Send + Sync {
    fn now(&self) -> DateTime<Utc>;

    /// Current date with the time component dropped
    fn today(&self) -> NaiveDate {
        self.now().date_naive()
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

#[dill::component]
#[dill::interface(dyn SystemTimeSource)]
pub struct SystemTimeSourceDefault;

impl SystemTimeSource for SystemTimeSourceDefault {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

/// Settable clock for deterministic tests.
///
/// Clones share the same underlying time, so a test can keep one handle while
/// triggers own another.
#[derive(Debug, Clone)]
pub struct FakeSystemTimeSource {
    state: Arc<Mutex<DateTime<Utc>>>,
}

impl FakeSystemTimeSource {
    pub fn new() -> Self {
        Self::new_set(Utc::now())
    }

    pub fn new_set(t: DateTime<Utc>) -> Self {
        Self {
            state: Arc::new(Mutex::new(t)),
        }
    }

    pub fn set(&self, t: DateTime<Utc>) {
        let mut state = self.state.lock().unwrap();

        if *state > t {
            panic!("The previous time [{}] is more than new time [{t}]", *state);
        }

        *state = t;
    }

    pub fn advance(&self, time_quantum: Duration) {
        let new_t = {
            let state = self.state.lock().unwrap();

            *state + time_quantum
        };

        self.set(new_t);
    }
}

impl Default for FakeSystemTimeSource {
    fn default() -> Self {
        Self::new()
    }
}

impl SystemTimeSource for FakeSystemTimeSource {
    fn now(&self) -> DateTime<Utc> {
        let state = self.state.lock().unwrap();

        *state
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////
