//! Public holiday calculation for the supported German states.
//!
//! The holiday set for a year is a pure function of `(year, region)`:
//! fixed federal holidays, Easter-relative movable holidays, and one
//! state-specific fixed holiday per region.

use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use chrono::{Datelike, Duration, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// German state a user's public holidays are calculated for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Region {
    Berlin,
    Brandenburg,
}

impl Region {
    /// Database / wire representation.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Berlin => "BERLIN",
            Self::Brandenburg => "BRANDENBURG",
        }
    }
}

impl fmt::Display for Region {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Region {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "BERLIN" => Ok(Self::Berlin),
            "BRANDENBURG" => Ok(Self::Brandenburg),
            other => Err(CoreError::Validation(format!("Unknown region: {other}"))),
        }
    }
}

/// Easter Sunday for a year, via the Meeus/Jones/Butcher Computus.
///
/// Integer arithmetic only; valid for all Gregorian years.
pub fn easter_sunday(year: i32) -> NaiveDate {
    let a = year % 19;
    let b = year / 100;
    let c = year % 100;
    let d = b / 4;
    let e = b % 4;
    let f = (b + 8) / 25;
    let g = (b - f + 1) / 3;
    let h = (19 * a + b - d - g + 15) % 30;
    let i = c / 4;
    let k = c % 4;
    let l = (32 + 2 * e + 2 * i - h - k) % 7;
    let m = (a + 11 * h + 22 * l) / 451;
    let month = (h + l - 7 * m + 114) / 31;
    let day = (h + l - 7 * m + 114) % 31 + 1;

    NaiveDate::from_ymd_opt(year, month as u32, day as u32)
        .expect("Computus always yields a valid March or April date")
}

/// All public holidays for a year and region.
pub fn holidays_for(year: i32, region: Region) -> BTreeSet<NaiveDate> {
    let fixed = |month, day| {
        NaiveDate::from_ymd_opt(year, month, day).expect("fixed holiday dates are valid")
    };

    let mut holidays = BTreeSet::new();

    // Fixed holidays (same for all states)
    holidays.insert(fixed(1, 1)); // New Year's Day
    holidays.insert(fixed(5, 1)); // Labour Day
    holidays.insert(fixed(10, 3)); // German Unity Day
    holidays.insert(fixed(12, 25)); // Christmas Day
    holidays.insert(fixed(12, 26)); // Boxing Day

    // Movable holidays derived from Easter Sunday
    let easter = easter_sunday(year);
    holidays.insert(easter - Duration::days(2)); // Good Friday
    holidays.insert(easter + Duration::days(1)); // Easter Monday
    holidays.insert(easter + Duration::days(39)); // Ascension Day
    holidays.insert(easter + Duration::days(50)); // Whit Monday

    // State-specific holidays
    match region {
        Region::Berlin => {
            holidays.insert(fixed(3, 8)); // International Women's Day
        }
        Region::Brandenburg => {
            holidays.insert(fixed(10, 31)); // Reformation Day
        }
    }

    holidays
}

/// Whether a date is a public holiday in the given region.
pub fn is_public_holiday(date: NaiveDate, region: Region) -> bool {
    holidays_for(date.year(), region).contains(&date)
}
