// Copyright Kamu Data, Inc. and contributors. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{IntegrationRequest, Trigger};

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum MultipleTriggerOperator {
    #[default]
    Or,
    And,
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

/// Combines several triggers.
///
/// Every child is polled on each [`Trigger::fire`] regardless of the outcome of
/// the others. When several children fire, the request with the strongest
/// build condition wins, the earliest child breaking ties.
pub struct MultipleTrigger {
    name: String,
    triggers: Vec<Box<dyn Trigger>>,
    operator: MultipleTriggerOperator,
}

impl MultipleTrigger {
    pub const DEFAULT_NAME: &'static str = "MultipleTrigger";

    pub fn new(triggers: Vec<Box<dyn Trigger>>, operator: MultipleTriggerOperator) -> Self {
        Self {
            name: Self::DEFAULT_NAME.to_string(),
            triggers,
            operator,
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    #[inline]
    pub fn operator(&self) -> MultipleTriggerOperator {
        self.operator
    }

    #[inline]
    pub fn triggers(&self) -> &[Box<dyn Trigger>] {
        &self.triggers
    }

    fn strongest(requests: impl Iterator<Item = IntegrationRequest>) -> Option<IntegrationRequest> {
        requests.reduce(|best, request| {
            if request.build_condition() > best.build_condition() {
                request
            } else {
                best
            }
        })
    }
}

impl Trigger for MultipleTrigger {
    fn name(&self) -> &str {
        &self.name
    }

    fn fire(&mut self) -> Option<IntegrationRequest> {
        let results: Vec<_> = self.triggers.iter_mut().map(|t| t.fire()).collect();

        let request = match self.operator {
            MultipleTriggerOperator::Or => Self::strongest(results.into_iter().flatten()),
            MultipleTriggerOperator::And => {
                if results.is_empty() || results.iter().any(Option::is_none) {
                    None
                } else {
                    Self::strongest(results.into_iter().flatten())
                }
            }
        };

        if let Some(request) = &request {
            tracing::debug!(
                trigger = %self.name,
                operator = ?self.operator,
                source = %request.source(),
                build_condition = %request.build_condition(),
                "Combined decision"
            );
        }

        request
    }

    fn integration_completed(&mut self) {
        for trigger in &mut self.triggers {
            trigger.integration_completed();
        }
    }

    fn next_build(&self) -> DateTime<Utc> {
        self.triggers
            .iter()
            .map(|t| t.next_build())
            .min()
            .unwrap_or(DateTime::<Utc>::MAX_UTC)
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////
