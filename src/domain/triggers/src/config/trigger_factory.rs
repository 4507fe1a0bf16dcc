// Copyright Kamu Data, Inc. and contributors. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

use std::collections::HashSet;
use std::sync::Arc;

use chrono::Duration;
use time_source::SystemTimeSource;
use url::Url;

use crate::*;

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

/// Binds [`TriggerConfig`] records to live triggers, validating them on the
/// way
pub struct TriggerFactory {
    time_source: Arc<dyn SystemTimeSource>,
    last_modified_resolver: Arc<dyn LastModifiedResolver>,
}

impl TriggerFactory {
    /// Upper bound for any configured interval, 100 years
    pub const MAX_INTERVAL_SECONDS: i64 = 100 * 366 * 24 * 60 * 60;
}

#[dill::component(pub)]
impl TriggerFactory {
    pub fn new(
        time_source: Arc<dyn SystemTimeSource>,
        last_modified_resolver: Arc<dyn LastModifiedResolver>,
    ) -> Self {
        Self {
            time_source,
            last_modified_resolver,
        }
    }

    #[tracing::instrument(level = "debug", skip_all, fields(kind = config.kind(), name = ?config.name()))]
    pub fn build(&self, config: &TriggerConfig) -> Result<Box<dyn Trigger>, TriggerConfigError> {
        match config {
            TriggerConfig::Interval(c) => self.build_interval(c),
            TriggerConfig::Schedule(c) => self.build_schedule(c),
            TriggerConfig::Cron(c) => self.build_cron(c),
            TriggerConfig::Url(c) => self.build_url(c),
            TriggerConfig::Multiple(c) => self.build_multiple(c),
            TriggerConfig::Filter(c) => self.build_filter(c),
            TriggerConfig::RollUp(c) => self.build_roll_up(c),
            TriggerConfig::Parameter(c) => self.build_parameter(c),
        }
    }

    fn build_interval(
        &self,
        c: &IntervalTriggerConfig,
    ) -> Result<Box<dyn Trigger>, TriggerConfigError> {
        let name = c.name.as_deref().unwrap_or(IntervalTrigger::DEFAULT_NAME);

        let interval = positive_seconds(name, "seconds", c.seconds)?;
        let initial_interval = c
            .initial_seconds
            .map(|s| non_negative_seconds(name, "initialSeconds", s))
            .transpose()?;
        let build_condition = firing_condition(name, c.build_condition)?;

        Ok(Box::new(
            IntervalTrigger::new(
                self.time_source.clone(),
                interval,
                initial_interval,
                build_condition,
            )
            .with_name(name),
        ))
    }

    fn build_schedule(
        &self,
        c: &ScheduleTriggerConfig,
    ) -> Result<Box<dyn Trigger>, TriggerConfigError> {
        let name = c.name.as_deref().unwrap_or(ScheduleTrigger::DEFAULT_NAME);

        let time = parse_time_of_day(&c.time)?;
        let week_days = week_days(c.week_days.as_deref());
        let build_condition = firing_condition(name, c.build_condition)?;

        let trigger = ScheduleTrigger::try_new(
            self.time_source.clone(),
            time,
            week_days,
            c.random_offset_in_minutes_from_time.unwrap_or_default(),
            build_condition,
        )?;

        Ok(Box::new(trigger.with_name(name)))
    }

    fn build_cron(&self, c: &CronTriggerConfig) -> Result<Box<dyn Trigger>, TriggerConfigError> {
        let name = c.name.as_deref().unwrap_or(CronTrigger::DEFAULT_NAME);

        let expression = CronExpression::try_from_5component_cron_expression(&c.cron_expression)?;
        if expression.next_after(self.time_source.now()).is_none() {
            return Err(CronExpressionError {
                expression: c.cron_expression.clone(),
                reason: "never matches any future moment".to_string(),
            }
            .into());
        }
        let build_condition = firing_condition(name, c.build_condition)?;

        Ok(Box::new(
            CronTrigger::new(self.time_source.clone(), expression, build_condition).with_name(name),
        ))
    }

    fn build_url(&self, c: &UrlTriggerConfig) -> Result<Box<dyn Trigger>, TriggerConfigError> {
        let name = c.name.as_deref().unwrap_or(UrlTrigger::DEFAULT_NAME);

        let url = Url::parse(&c.url).map_err(|source| TriggerConfigError::InvalidUrl {
            trigger: name.to_string(),
            url: c.url.clone(),
            source,
        })?;
        let interval = positive_seconds(
            name,
            "seconds",
            c.seconds.unwrap_or(UrlTrigger::DEFAULT_INTERVAL_SECONDS),
        )?;
        let initial_interval = c
            .initial_seconds
            .map(|s| non_negative_seconds(name, "initialSeconds", s))
            .transpose()?;
        let build_condition = firing_condition(name, c.build_condition)?;

        Ok(Box::new(
            UrlTrigger::new(
                self.time_source.clone(),
                self.last_modified_resolver.clone(),
                url,
                interval,
                initial_interval,
                build_condition,
            )
            .with_name(name),
        ))
    }

    fn build_multiple(
        &self,
        c: &MultipleTriggerConfig,
    ) -> Result<Box<dyn Trigger>, TriggerConfigError> {
        let triggers = c
            .triggers
            .iter()
            .map(|child| self.build(child))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Box::new(
            MultipleTrigger::new(triggers, c.operator)
                .with_name(c.name.as_deref().unwrap_or(MultipleTrigger::DEFAULT_NAME)),
        ))
    }

    fn build_filter(&self, c: &FilterTriggerConfig) -> Result<Box<dyn Trigger>, TriggerConfigError> {
        let start_time = parse_time_of_day(&c.start_time)?;
        let end_time = parse_time_of_day(&c.end_time)?;
        let week_days = week_days(c.week_days.as_deref());
        let inner = self.build(&c.trigger)?;

        Ok(Box::new(
            FilterTrigger::new(
                self.time_source.clone(),
                inner,
                start_time,
                end_time,
                week_days,
            )
            .with_name(c.name.as_deref().unwrap_or(FilterTrigger::DEFAULT_NAME)),
        ))
    }

    fn build_roll_up(&self, c: &RollUpTriggerConfig) -> Result<Box<dyn Trigger>, TriggerConfigError> {
        let inner = self.build(&c.trigger)?;

        Ok(Box::new(
            RollUpTrigger::new(self.time_source.clone(), inner, c.minimum_time)
                .with_name(c.name.as_deref().unwrap_or(RollUpTrigger::DEFAULT_NAME)),
        ))
    }

    fn build_parameter(
        &self,
        c: &ParameterTriggerConfig,
    ) -> Result<Box<dyn Trigger>, TriggerConfigError> {
        let name = c.name.as_deref().unwrap_or(ParameterTrigger::DEFAULT_NAME);

        let mut seen = HashSet::new();
        for parameter in &c.parameters {
            if !seen.insert(parameter.name.as_str()) {
                return Err(TriggerConfigError::DuplicateParameter {
                    trigger: name.to_string(),
                    parameter: parameter.name.clone(),
                });
            }
        }

        let inner = self.build(&c.trigger)?;

        Ok(Box::new(
            ParameterTrigger::new(inner, c.parameters.clone()).with_name(name),
        ))
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

fn positive_seconds(
    trigger: &str,
    field: &'static str,
    seconds: i64,
) -> Result<Duration, TriggerConfigError> {
    if seconds <= 0 {
        return Err(TriggerConfigError::NonPositiveInterval {
            trigger: trigger.to_string(),
            field,
            seconds,
        });
    }
    bounded_seconds(trigger, field, seconds)
}

fn non_negative_seconds(
    trigger: &str,
    field: &'static str,
    seconds: i64,
) -> Result<Duration, TriggerConfigError> {
    if seconds < 0 {
        return Err(TriggerConfigError::NegativeInterval {
            trigger: trigger.to_string(),
            field,
            seconds,
        });
    }
    bounded_seconds(trigger, field, seconds)
}

fn bounded_seconds(
    trigger: &str,
    field: &'static str,
    seconds: i64,
) -> Result<Duration, TriggerConfigError> {
    match Duration::try_seconds(seconds) {
        Some(duration) if seconds <= TriggerFactory::MAX_INTERVAL_SECONDS => Ok(duration),
        _ => Err(TriggerConfigError::IntervalTooLong {
            trigger: trigger.to_string(),
            field,
            seconds,
            max_seconds: TriggerFactory::MAX_INTERVAL_SECONDS,
        }),
    }
}

fn firing_condition(
    trigger: &str,
    build_condition: BuildCondition,
) -> Result<BuildCondition, TriggerConfigError> {
    if build_condition == BuildCondition::NoBuild {
        return Err(TriggerConfigError::NoBuildCondition {
            trigger: trigger.to_string(),
        });
    }
    Ok(build_condition)
}

fn week_days(days: Option<&[chrono::Weekday]>) -> WeekDays {
    match days {
        Some(days) => days.iter().copied().collect(),
        None => WeekDays::all(),
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////
