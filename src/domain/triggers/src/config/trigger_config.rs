// Copyright Kamu Data, Inc. and contributors. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

use chrono::Weekday;
use serde::{Deserialize, Serialize};
use serde_with::{DisplayFromStr, serde_as, skip_serializing_none};

use crate::{BuildCondition, MultipleTriggerOperator, NameValuePair, Timeout, TriggerConfigError};

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

/// Declarative description of a trigger tree.
///
/// Selected by the `kind` field, e.g.:
///
/// ```yaml
/// kind: filter
/// startTime: "23:00"
/// endTime: "06:00"
/// trigger:
///   kind: interval
///   seconds: 60
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum TriggerConfig {
    Interval(IntervalTriggerConfig),
    Schedule(ScheduleTriggerConfig),
    Cron(CronTriggerConfig),
    Url(UrlTriggerConfig),
    Multiple(MultipleTriggerConfig),
    Filter(FilterTriggerConfig),
    RollUp(RollUpTriggerConfig),
    Parameter(ParameterTriggerConfig),
}

impl TriggerConfig {
    pub fn from_yaml_str(s: &str) -> Result<Self, TriggerConfigError> {
        Ok(serde_yaml::from_str(s)?)
    }

    pub fn from_json_str(s: &str) -> Result<Self, TriggerConfigError> {
        Ok(serde_json::from_str(s)?)
    }

    pub fn kind(&self) -> &'static str {
        match self {
            TriggerConfig::Interval(_) => "interval",
            TriggerConfig::Schedule(_) => "schedule",
            TriggerConfig::Cron(_) => "cron",
            TriggerConfig::Url(_) => "url",
            TriggerConfig::Multiple(_) => "multiple",
            TriggerConfig::Filter(_) => "filter",
            TriggerConfig::RollUp(_) => "rollUp",
            TriggerConfig::Parameter(_) => "parameter",
        }
    }

    pub fn name(&self) -> Option<&str> {
        match self {
            TriggerConfig::Interval(c) => c.name.as_deref(),
            TriggerConfig::Schedule(c) => c.name.as_deref(),
            TriggerConfig::Cron(c) => c.name.as_deref(),
            TriggerConfig::Url(c) => c.name.as_deref(),
            TriggerConfig::Multiple(c) => c.name.as_deref(),
            TriggerConfig::Filter(c) => c.name.as_deref(),
            TriggerConfig::RollUp(c) => c.name.as_deref(),
            TriggerConfig::Parameter(c) => c.name.as_deref(),
        }
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

#[skip_serializing_none]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields, rename_all = "camelCase")]
pub struct IntervalTriggerConfig {
    pub name: Option<String>,
    pub seconds: i64,
    pub initial_seconds: Option<i64>,
    #[serde(default)]
    pub build_condition: BuildCondition,
}

#[serde_as]
#[skip_serializing_none]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields, rename_all = "camelCase")]
pub struct ScheduleTriggerConfig {
    pub name: Option<String>,
    /// `HH:mm` or `HH:mm:ss`
    pub time: String,
    #[serde_as(as = "Option<Vec<DisplayFromStr>>")]
    #[serde(default)]
    pub week_days: Option<Vec<Weekday>>,
    pub random_offset_in_minutes_from_time: Option<i64>,
    #[serde(default)]
    pub build_condition: BuildCondition,
}

#[skip_serializing_none]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields, rename_all = "camelCase")]
pub struct CronTriggerConfig {
    pub name: Option<String>,
    pub cron_expression: String,
    #[serde(default)]
    pub build_condition: BuildCondition,
}

#[skip_serializing_none]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields, rename_all = "camelCase")]
pub struct UrlTriggerConfig {
    pub name: Option<String>,
    pub url: String,
    /// Defaults to [`crate::UrlTrigger::DEFAULT_INTERVAL_SECONDS`]
    pub seconds: Option<i64>,
    pub initial_seconds: Option<i64>,
    #[serde(default)]
    pub build_condition: BuildCondition,
}

#[skip_serializing_none]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields, rename_all = "camelCase")]
pub struct MultipleTriggerConfig {
    pub name: Option<String>,
    #[serde(default)]
    pub operator: MultipleTriggerOperator,
    pub triggers: Vec<TriggerConfig>,
}

#[serde_as]
#[skip_serializing_none]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields, rename_all = "camelCase")]
pub struct FilterTriggerConfig {
    pub name: Option<String>,
    pub start_time: String,
    pub end_time: String,
    #[serde_as(as = "Option<Vec<DisplayFromStr>>")]
    #[serde(default)]
    pub week_days: Option<Vec<Weekday>>,
    pub trigger: Box<TriggerConfig>,
}

#[skip_serializing_none]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields, rename_all = "camelCase")]
pub struct RollUpTriggerConfig {
    pub name: Option<String>,
    /// E.g. `"10 minutes"`
    pub minimum_time: Timeout,
    pub trigger: Box<TriggerConfig>,
}

#[skip_serializing_none]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields, rename_all = "camelCase")]
pub struct ParameterTriggerConfig {
    pub name: Option<String>,
    #[serde(default)]
    pub parameters: Vec<NameValuePair>,
    pub trigger: Box<TriggerConfig>,
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////


////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////
