// Copyright Kamu Data, Inc. and contributors. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use crate::BuildCondition;

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

/// Describes why and how a build should run.
///
/// A request always represents an actual build attempt: "no build" decisions
/// are expressed by the absence of a request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IntegrationRequest {
    build_condition: BuildCondition,
    source: String,
    requested_at: DateTime<Utc>,
    build_values: BTreeMap<String, String>,
}

impl IntegrationRequest {
    pub fn for_condition(
        build_condition: BuildCondition,
        source: impl Into<String>,
        requested_at: DateTime<Utc>,
    ) -> Option<Self> {
        if build_condition == BuildCondition::NoBuild {
            return None;
        }

        Some(Self {
            build_condition,
            source: source.into(),
            requested_at,
            build_values: BTreeMap::new(),
        })
    }

    #[inline]
    pub fn build_condition(&self) -> BuildCondition {
        self.build_condition
    }

    /// Name of the trigger that produced the request
    #[inline]
    pub fn source(&self) -> &str {
        &self.source
    }

    #[inline]
    pub fn requested_at(&self) -> DateTime<Utc> {
        self.requested_at
    }

    #[inline]
    pub fn build_values(&self) -> &BTreeMap<String, String> {
        &self.build_values
    }

    /// Returns a copy with the given values merged in, overwriting existing
    /// values of the same name
    pub fn with_build_values<I, K, V>(mut self, values: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        self.build_values
            .extend(values.into_iter().map(|(k, v)| (k.into(), v.into())));
        self
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////


////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////
