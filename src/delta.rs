// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2026 Vallés Puig, Ramon

//! Differences between two timestamps.
//!
//! Neither function is a calendar: [`fast_delta`] only orders, and
//! [`approx_delta`] reckons with 12 months of 31 days each and no leap rules.

use crate::PackedTimestamp;
use qtty::Days;

/// Days per year under the flat reckoning of [`approx_delta`].
pub const APPROX_DAYS_PER_YEAR: f64 = 12.0 * APPROX_DAYS_PER_MONTH;

/// Days per month under the flat reckoning of [`approx_delta`].
pub const APPROX_DAYS_PER_MONTH: f64 = 31.0;

const MICROS_PER_DAY: f64 = 86_400_000_000.0;

/// Difference of the raw words, read as signed integers.
///
/// The sign (and zero) agree with a calendar comparison for two timestamps of
/// the same variant whose higher-order fields are all specified. The
/// magnitude carries no meaning. Bit 63 is always clear, so the subtraction
/// cannot overflow.
#[inline]
pub fn fast_delta(a: PackedTimestamp, b: PackedTimestamp) -> i64 {
    a.bits() as i64 - b.bits() as i64
}

/// Rough distance `a − b` in days.
///
/// Both operands are expanded and placed on a flat axis of
/// `372 · year + 31 · month + day + time-of-day`. Unspecified fields count as
/// zero. The result is antisymmetric, orders like [`fast_delta`] for fully
/// specified timestamps, and (unlike it) also orders prehistoric before
/// modern dates.
///
/// A packed word stores an unspecified field as its all-ones value, which
/// sorts *after* every legal value. So when only finer fields differ in
/// whether they are specified, the two functions can disagree in sign: a
/// date with no hour is later than `T23` to [`fast_delta`] and earlier to
/// this one.
pub fn approx_delta(a: PackedTimestamp, b: PackedTimestamp) -> Days {
    Days::new(approx_day_number(a) - approx_day_number(b))
}

fn approx_day_number(t: PackedTimestamp) -> f64 {
    let e = t.expand();
    let year = e.full_year().unwrap_or(0) as f64;
    year * APPROX_DAYS_PER_YEAR
        + e.month as f64 * APPROX_DAYS_PER_MONTH
        + e.day as f64
        + e.time_of_day_us() as f64 / MICROS_PER_DAY
}
