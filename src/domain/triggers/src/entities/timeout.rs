// Copyright Kamu Data, Inc. and contributors. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

use std::cmp::Ordering;
use std::hash::{Hash, Hasher};
use std::str::FromStr;

use chrono::Duration;
use serde_with::{DeserializeFromStr, SerializeDisplay};
use thiserror::Error;

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimeUnits {
    Milliseconds,
    Seconds,
    Minutes,
    Hours,
}

impl TimeUnits {
    #[inline]
    pub const fn millis_per_unit(self) -> u64 {
        match self {
            TimeUnits::Milliseconds => 1,
            TimeUnits::Seconds => 1_000,
            TimeUnits::Minutes => 60 * 1_000,
            TimeUnits::Hours => 60 * 60 * 1_000,
        }
    }

    fn parse(s: &str) -> Option<Self> {
        match s.to_ascii_lowercase().as_str() {
            "ms" | "millis" | "millisecond" | "milliseconds" => Some(TimeUnits::Milliseconds),
            "s" | "sec" | "secs" | "second" | "seconds" => Some(TimeUnits::Seconds),
            "m" | "min" | "mins" | "minute" | "minutes" => Some(TimeUnits::Minutes),
            "h" | "hr" | "hrs" | "hour" | "hours" => Some(TimeUnits::Hours),
            _ => None,
        }
    }
}

impl std::fmt::Display for TimeUnits {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            TimeUnits::Milliseconds => "milliseconds",
            TimeUnits::Seconds => "seconds",
            TimeUnits::Minutes => "minutes",
            TimeUnits::Hours => "hours",
        };
        write!(f, "{s}")
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

/// A duration normalized to milliseconds.
///
/// Remembers the units it was declared in for display purposes only:
/// comparison and hashing look at the millisecond value alone.
#[derive(Debug, Clone, Copy, SerializeDisplay, DeserializeFromStr)]
pub struct Timeout {
    millis: u64,
    units: TimeUnits,
}

impl Timeout {
    pub const fn new(value: u64, units: TimeUnits) -> Self {
        Self {
            millis: value.saturating_mul(units.millis_per_unit()),
            units,
        }
    }

    pub const fn from_millis(millis: u64) -> Self {
        Self::new(millis, TimeUnits::Milliseconds)
    }

    pub const fn from_seconds(seconds: u64) -> Self {
        Self::new(seconds, TimeUnits::Seconds)
    }

    pub const fn from_minutes(minutes: u64) -> Self {
        Self::new(minutes, TimeUnits::Minutes)
    }

    pub const fn from_hours(hours: u64) -> Self {
        Self::new(hours, TimeUnits::Hours)
    }

    #[inline]
    pub fn millis(&self) -> u64 {
        self.millis
    }

    #[inline]
    pub fn units(&self) -> TimeUnits {
        self.units
    }

    pub fn as_duration(&self) -> Duration {
        // Saturates far beyond any sensible timeout
        Duration::milliseconds(i64::try_from(self.millis).unwrap_or(i64::MAX / 1_000))
    }
}

impl PartialEq for Timeout {
    fn eq(&self, other: &Self) -> bool {
        self.millis == other.millis
    }
}

impl Eq for Timeout {}

impl Hash for Timeout {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.millis.hash(state);
    }
}

impl PartialOrd for Timeout {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Timeout {
    fn cmp(&self, other: &Self) -> Ordering {
        self.millis.cmp(&other.millis)
    }
}

impl std::fmt::Display for Timeout {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let per_unit = self.units.millis_per_unit();
        if self.millis % per_unit == 0 {
            write!(f, "{} {}", self.millis / per_unit, self.units)
        } else {
            write!(f, "{} {}", self.millis, TimeUnits::Milliseconds)
        }
    }
}

/// Accepts `"<n>"` (milliseconds) or `"<n> <units>"`, with or without the
/// separating whitespace, e.g. `"10 minutes"`, `"30s"`, `"1500"`
impl FromStr for Timeout {
    type Err = TimeoutParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let err = || TimeoutParseError {
            value: s.to_string(),
        };

        let trimmed = s.trim();
        let digits_end = trimmed
            .find(|c: char| !c.is_ascii_digit())
            .unwrap_or(trimmed.len());

        let (value, units) = trimmed.split_at(digits_end);
        let value: u64 = value.parse().map_err(|_| err())?;

        let units = match units.trim() {
            "" => TimeUnits::Milliseconds,
            units => TimeUnits::parse(units).ok_or_else(err)?,
        };

        value
            .checked_mul(units.millis_per_unit())
            .map(|millis| Self { millis, units })
            .ok_or_else(err)
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Invalid timeout '{value}', expected a whole number optionally followed by ms, s, m or h")]
pub struct TimeoutParseError {
    pub value: String,
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////


////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////
