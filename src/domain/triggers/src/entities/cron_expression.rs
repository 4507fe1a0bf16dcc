// Copyright Kamu Data, Inc. and contributors. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

use std::collections::BTreeSet;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use thiserror::Error;

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

/// Classic 5-component cron expression:
/// `minute hour day-of-month month day-of-week`.
///
/// Days of week follow POSIX numbering (0 or 7 is Sunday) and also accept
/// names. When both day fields are restricted a day matches if either of them
/// matches.
#[derive(Debug, Clone)]
pub struct CronExpression {
    source_5component_cron_expression: String,
    schedules: Vec<cron::Schedule>,
}

impl CronExpression {
    pub fn try_from_5component_cron_expression(
        source_5component_cron_expression: &str,
    ) -> Result<Self, CronExpressionError> {
        let error = |reason: String| CronExpressionError {
            expression: source_5component_cron_expression.to_string(),
            reason,
        };

        let components: Vec<&str> = source_5component_cron_expression
            .split_whitespace()
            .collect();
        let [minute, hour, day_of_month, month, day_of_week] = components[..] else {
            return Err(error(format!(
                "expected 5 components, got {}",
                components.len()
            )));
        };

        let day_of_month = normalize_wildcard(day_of_month);
        let day_of_week = translate_day_of_week(normalize_wildcard(day_of_week)).map_err(error)?;

        let schedule_exprs = if day_of_month != "*" && day_of_week != "*" {
            vec![
                format!("0 {minute} {hour} {day_of_month} {month} *"),
                format!("0 {minute} {hour} * {month} {day_of_week}"),
            ]
        } else {
            vec![format!(
                "0 {minute} {hour} {day_of_month} {month} {day_of_week}"
            )]
        };

        let schedules = schedule_exprs
            .iter()
            .map(|expr| cron::Schedule::from_str(expr).map_err(|e| error(e.to_string())))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            source_5component_cron_expression: source_5component_cron_expression.to_string(),
            schedules,
        })
    }

    #[inline]
    pub fn source(&self) -> &str {
        &self.source_5component_cron_expression
    }

    /// First matching moment strictly after `t`
    pub fn next_after(&self, t: DateTime<Utc>) -> Option<DateTime<Utc>> {
        self.schedules
            .iter()
            .filter_map(|schedule| schedule.after(&t).next())
            .min()
    }
}

impl PartialEq for CronExpression {
    fn eq(&self, other: &Self) -> bool {
        self.source_5component_cron_expression == other.source_5component_cron_expression
    }
}

impl Eq for CronExpression {}

impl std::fmt::Display for CronExpression {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.source_5component_cron_expression)
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Invalid cron expression '{expression}': {reason}")]
pub struct CronExpressionError {
    pub expression: String,
    pub reason: String,
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

fn normalize_wildcard(component: &str) -> &str {
    if component == "?" { "*" } else { component }
}

// The underlying scheduler numbers days of week 1..=7 starting from Sunday
fn translate_day_of_week(component: &str) -> Result<String, String> {
    if component == "*" {
        return Ok(component.to_string());
    }

    let mut days = BTreeSet::new();
    let mut named_items = Vec::new();

    for item in component.split(',') {
        let (range, step) = match item.split_once('/') {
            Some((range, step)) => match step.parse::<u32>() {
                Ok(step) if step > 0 => (range, step),
                _ => return Err(format!("invalid step in '{item}'")),
            },
            None => (item, 1),
        };

        let bounds = match range.split_once('-') {
            _ if range == "*" => Some((0, 6)),
            Some((first, last)) => match (posix_day_number(first)?, posix_day_number(last)?) {
                (Some(first), Some(last)) => Some((first, last)),
                _ => None,
            },
            None => posix_day_number(range)?.map(|day| {
                if item.contains('/') {
                    (day, day.max(6))
                } else {
                    (day, day)
                }
            }),
        };

        let Some((first, last)) = bounds else {
            named_items.push(item.to_string());
            continue;
        };

        if first > last {
            return Err(format!("invalid day of week range '{range}'"));
        }

        days.extend((first..=last).step_by(step as usize).map(|day| (day % 7) + 1));
    }

    Ok(days
        .into_iter()
        .map(|day| day.to_string())
        .chain(named_items)
        .collect::<Vec<_>>()
        .join(","))
}

fn posix_day_number(s: &str) -> Result<Option<u32>, String> {
    if s.is_empty() || !s.chars().all(|c| c.is_ascii_digit()) {
        return Ok(None);
    }
    match s.parse::<u32>() {
        Ok(day) if day <= 7 => Ok(Some(day)),
        _ => Err(format!("day of week '{s}' is out of range 0-7")),
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////


////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////
