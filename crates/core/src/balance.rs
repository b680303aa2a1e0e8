//! Vacation balance arithmetic.
//!
//! Pure helpers for the entitlement ledger: the remaining-days formula and
//! the used/planned split. "Today" is always an explicit parameter so the
//! ledger is deterministic under test.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

/// Annual allowance granted when a balance row is created lazily.
pub const DEFAULT_ANNUAL_ALLOWANCE_DAYS: Decimal = dec!(30.0);

/// Working-day total of one vacation period, keyed by its end date.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PeriodTotal {
    pub end_date: NaiveDate,
    pub days: Decimal,
}

/// Remaining entitlement: allowance + carryover + adjustment − used − planned.
pub fn remaining_days(
    allowance: Decimal,
    carried_over: Decimal,
    adjustment: Decimal,
    used: Decimal,
    planned: Decimal,
) -> Decimal {
    allowance + carried_over + adjustment - used - planned
}

/// Split period totals into used and planned components.
///
/// A period counts as used once it has fully elapsed (end date on or
/// before `today`); otherwise its days are still planned.
pub fn split_used_planned(periods: &[PeriodTotal], today: NaiveDate) -> (Decimal, Decimal) {
    let mut used = Decimal::ZERO;
    let mut planned = Decimal::ZERO;
    for period in periods {
        if period.end_date <= today {
            used += period.days;
        } else {
            planned += period.days;
        }
    }
    (used, planned)
}
