// Copyright Kamu Data, Inc. and contributors. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

use chrono::Weekday;

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

/// Compact set of days of the week
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct WeekDays {
    mask: u8,
}

impl WeekDays {
    const ALL_MASK: u8 = 0b0111_1111;

    pub const fn none() -> Self {
        Self { mask: 0 }
    }

    pub const fn all() -> Self {
        Self {
            mask: Self::ALL_MASK,
        }
    }

    #[inline]
    pub fn contains(&self, day: Weekday) -> bool {
        self.mask & Self::bit(day) != 0
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.mask == 0
    }

    pub fn insert(&mut self, day: Weekday) {
        self.mask |= Self::bit(day);
    }

    pub fn iter(&self) -> impl Iterator<Item = Weekday> + '_ {
        [
            Weekday::Mon,
            Weekday::Tue,
            Weekday::Wed,
            Weekday::Thu,
            Weekday::Fri,
            Weekday::Sat,
            Weekday::Sun,
        ]
        .into_iter()
        .filter(|day| self.contains(*day))
    }

    fn bit(day: Weekday) -> u8 {
        1 << day.num_days_from_monday()
    }
}

impl Default for WeekDays {
    fn default() -> Self {
        Self::all()
    }
}

impl FromIterator<Weekday> for WeekDays {
    fn from_iter<T: IntoIterator<Item = Weekday>>(iter: T) -> Self {
        let mut week_days = Self::none();
        for day in iter {
            week_days.insert(day);
        }
        week_days
    }
}

impl std::fmt::Display for WeekDays {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let days: Vec<_> = self.iter().map(|d| d.to_string()).collect();
        write!(f, "[{}]", days.join(", "))
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////


////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////
