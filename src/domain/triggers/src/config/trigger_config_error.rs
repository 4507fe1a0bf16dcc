// Copyright Kamu Data, Inc. and contributors. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

use thiserror::Error;

use crate::{CronExpressionError, InvalidTimeOfDayError, ScheduleTriggerValidationError};

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

/// Rejected trigger configuration. No trigger is constructed when binding
/// fails.
#[derive(Error, Debug)]
pub enum TriggerConfigError {
    #[error("Unable to parse trigger configuration")]
    Yaml(#[from] serde_yaml::Error),

    #[error("Unable to parse trigger configuration")]
    Json(#[from] serde_json::Error),

    #[error("Trigger '{trigger}': {field} must be positive, got {seconds} seconds")]
    NonPositiveInterval {
        trigger: String,
        field: &'static str,
        seconds: i64,
    },

    #[error("Trigger '{trigger}': {field} must not be negative, got {seconds} seconds")]
    NegativeInterval {
        trigger: String,
        field: &'static str,
        seconds: i64,
    },

    #[error(
        "Trigger '{trigger}': {field} must not exceed {max_seconds} seconds, got {seconds} seconds"
    )]
    IntervalTooLong {
        trigger: String,
        field: &'static str,
        seconds: i64,
        max_seconds: i64,
    },

    #[error("Trigger '{trigger}': NoBuild is not a valid build condition to fire with")]
    NoBuildCondition { trigger: String },

    #[error("Trigger '{trigger}': invalid URL '{url}'")]
    InvalidUrl {
        trigger: String,
        url: String,
        #[source]
        source: url::ParseError,
    },

    #[error("Trigger '{trigger}': duplicate parameter '{parameter}'")]
    DuplicateParameter { trigger: String, parameter: String },

    #[error(transparent)]
    InvalidTimeOfDay(#[from] InvalidTimeOfDayError),

    #[error(transparent)]
    InvalidCronExpression(#[from] CronExpressionError),

    #[error(transparent)]
    InvalidSchedule(#[from] ScheduleTriggerValidationError),
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////
