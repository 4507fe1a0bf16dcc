// Copyright Kamu Data, Inc. and contributors. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

use chrono::{DateTime, Utc};

use crate::{IntegrationRequest, NameValuePair, Trigger};

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

/// Attaches build parameters to requests of the inner trigger.
///
/// Configured values replace request values of the same name.
pub struct ParameterTrigger {
    name: String,
    inner: Box<dyn Trigger>,
    parameters: Vec<NameValuePair>,
}

impl ParameterTrigger {
    pub const DEFAULT_NAME: &'static str = "ParameterTrigger";

    pub fn new(inner: Box<dyn Trigger>, parameters: Vec<NameValuePair>) -> Self {
        Self {
            name: Self::DEFAULT_NAME.to_string(),
            inner,
            parameters,
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    #[inline]
    pub fn parameters(&self) -> &[NameValuePair] {
        &self.parameters
    }
}

impl Trigger for ParameterTrigger {
    fn name(&self) -> &str {
        &self.name
    }

    fn fire(&mut self) -> Option<IntegrationRequest> {
        let request = self.inner.fire()?;

        if self.parameters.is_empty() {
            return Some(request);
        }

        Some(request.with_build_values(
            self.parameters
                .iter()
                .map(|p| (p.name.as_str(), p.value.as_str())),
        ))
    }

    fn integration_completed(&mut self) {
        self.inner.integration_completed();
    }

    fn next_build(&self) -> DateTime<Utc> {
        self.inner.next_build()
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////
