// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2026 Vallés Puig, Ramon

//! Lossless-where-possible mapping between packed timestamps and `f64`.
//!
//! The real value is a mixed-radix reading of the fields, scaled so that one
//! unit is one day slot. Every field gets `limit + 2` half-steps: legal digit
//! `d` sits on slot `2d`, and the unspecified sentinel sits on the odd slot
//! `2·limit + 1` just past the last legal value. Partial timestamps therefore
//! survive the trip through a float, and within one variant the real value
//! orders exactly like the packed word.
//!
//! Two epochs are provided as zero-sized markers:
//!
//! | Marker | Zero point |
//! |--------|------------|
//! | [`Etdb`] | `2000-01-01T00:00` |
//! | [`Proleptic`] | `-4713-11-24T12:00`, Julian Day 0 |
//!
//! The day axis is calendar-naive (every month has 31 day slots), so a
//! [`Proleptic`] real is **not** a Julian Day number away from its epoch.
//!
//! # Precision
//!
//! An `f64` keeps 53 significant bits. Decoding tolerates the rounding error
//! of the value it is handed; when that error is wider than the gap between
//! two neighbouring values of a field, that field and every finer one decode
//! as unspecified instead of as garbage. Around the epoch everything down to
//! microseconds survives for a few years either side; dates and times to the
//! minute survive across the whole range. When even the year count cannot be
//! resolved, decoding fails with [`Error::PrecisionLoss`].

use crate::error::{Error, Result};
use crate::layout::{
    Field, CENTURY, DAY, HOUR, MICROSECONDS, MILLISECONDS, MINUTE, MODE_BIT, MODERN_BASE_YEAR,
    MONTH, PH_DAY, PH_HOUR, PH_MINUTE, PH_MONTH, PH_PRECISION, PH_YEARS, SECONDS, YEAR,
};
use crate::{ExpandedTimestamp, Format, PackedTimestamp};

// ═══════════════════════════════════════════════════════════════════════════
// Epoch markers
// ═══════════════════════════════════════════════════════════════════════════

/// Zero point of a real-valued timestamp axis.
pub trait RealEpoch: Copy + Clone + std::fmt::Debug + PartialEq + 'static {
    /// Display label.
    const LABEL: &'static str;

    /// Position of the zero point on the internal half-slot axis.
    #[doc(hidden)]
    const ORIGIN: i128;
}

/// Real axis anchored at `2000-01-01T00:00`.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct Etdb;

impl RealEpoch for Etdb {
    const LABEL: &'static str = "ETDB";
    const ORIGIN: i128 = modern_origin(2_000, 0, 0, 0);
}

/// Real axis anchored at `-4713-11-24T12:00`, the proleptic Gregorian date of
/// Julian Day 0.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct Proleptic;

impl RealEpoch for Proleptic {
    const LABEL: &'static str = "Proleptic";
    const ORIGIN: i128 = modern_origin(-4_713, 10, 23, 12);
}

// ═══════════════════════════════════════════════════════════════════════════
// Radix weights
// ═══════════════════════════════════════════════════════════════════════════

/// Half-steps per field: `limit` legal values, the sentinel, and one guard.
const fn radix(f: Field) -> i128 {
    f.limit as i128 + 2
}

const W_MICROSECONDS: i128 = 1;
const W_MILLISECONDS: i128 = W_MICROSECONDS * radix(MICROSECONDS);
const W_SECONDS: i128 = W_MILLISECONDS * radix(MILLISECONDS);
const W_MINUTE: i128 = W_SECONDS * radix(SECONDS);
const W_HOUR: i128 = W_MINUTE * radix(MINUTE);
const W_DAY: i128 = W_HOUR * radix(HOUR);
const W_MONTH: i128 = W_DAY * radix(DAY);
const W_YEAR: i128 = W_MONTH * radix(MONTH);
const W_CENTURY: i128 = W_YEAR * radix(YEAR);

/// Prehistoric precision takes the place of the modern year digit.
const W_PRECISION: i128 = W_YEAR;
const W_PH_YEARS: i128 = W_PRECISION * radix(PH_PRECISION);

/// Offset of the prehistoric year digit; legal counts land on `-OFFSET..=-3`.
const PH_YEARS_OFFSET: i128 = PH_YEARS.sentinel() as i128 + 2;

/// Slot of an unspecified prehistoric year count, just below the modern range.
const PH_YEARS_UNSPECIFIED_SLOT: i128 = -3;

const HALF_SLOTS_PER_DAY: f64 = (2 * W_DAY) as f64;

/// Relative rounding error budget for one decode: a few ulps of an `f64`.
const RELATIVE_ERROR: f64 = 1.0 / (1u64 << 50) as f64;

#[derive(Debug, Clone, Copy)]
struct Digit {
    field: Field,
    weight: i128,
}

const fn digit(field: Field, weight: i128) -> Digit {
    Digit { field, weight }
}

const MODERN_DIGITS: [Digit; 9] = [
    digit(CENTURY, W_CENTURY),
    digit(YEAR, W_YEAR),
    digit(MONTH, W_MONTH),
    digit(DAY, W_DAY),
    digit(HOUR, W_HOUR),
    digit(MINUTE, W_MINUTE),
    digit(SECONDS, W_SECONDS),
    digit(MILLISECONDS, W_MILLISECONDS),
    digit(MICROSECONDS, W_MICROSECONDS),
];

/// Prehistoric digits below the year count, coarsest first.
const PREHISTORIC_DIGITS: [Digit; 5] = [
    digit(PH_PRECISION, W_PRECISION),
    digit(PH_MONTH, W_MONTH),
    digit(PH_DAY, W_DAY),
    digit(PH_HOUR, W_HOUR),
    digit(PH_MINUTE, W_MINUTE),
];

/// Half-slot position of a fully specified modern date at a whole hour.
const fn modern_origin(year: i64, month0: i128, day0: i128, hour: i128) -> i128 {
    let eternal = (year - MODERN_BASE_YEAR) as i128;
    2 * ((eternal / 100) * W_CENTURY
        + (eternal % 100) * W_YEAR
        + month0 * W_MONTH
        + day0 * W_DAY
        + hour * W_HOUR)
}

fn slot(d: &Digit, bits: u64) -> i128 {
    let raw = d.field.get(bits);
    if raw == d.field.sentinel() {
        2 * d.field.limit as i128 + 1
    } else {
        2 * raw as i128
    }
}

/// Room a digit has before noise of `±tolerance` half-slots can flip it.
fn slack(weight: i128, finer: &[Digit]) -> i128 {
    2 * weight
        - finer
            .iter()
            .map(|d| (2 * d.field.limit as i128 + 1) * d.weight)
            .sum::<i128>()
}

/// The tighter of the two top digits; past it nothing can be decoded.
fn top_slack() -> i128 {
    slack(W_CENTURY, &MODERN_DIGITS[1..]).min(slack(W_PH_YEARS, &PREHISTORIC_DIGITS))
}

// ═══════════════════════════════════════════════════════════════════════════
// Encoding
// ═══════════════════════════════════════════════════════════════════════════

fn half_slots(t: PackedTimestamp) -> Result<i128> {
    t.validate()?;
    let bits = t.bits();
    let h = match t.format() {
        Format::Modern => MODERN_DIGITS.iter().map(|d| slot(d, bits) * d.weight).sum(),
        Format::Prehistoric => {
            let years = PH_YEARS.get(bits);
            let top = if years == PH_YEARS.sentinel() {
                PH_YEARS_UNSPECIFIED_SLOT
            } else {
                2 * (years as i128 - PH_YEARS_OFFSET)
            };
            top * W_PH_YEARS
                + PREHISTORIC_DIGITS
                    .iter()
                    .map(|d| slot(d, bits) * d.weight)
                    .sum::<i128>()
        }
    };
    Ok(h)
}

// ═══════════════════════════════════════════════════════════════════════════
// Decoding
// ═══════════════════════════════════════════════════════════════════════════

fn decode<S: RealEpoch>(value: f64) -> Result<PackedTimestamp> {
    if !value.is_finite() {
        return Err(Error::NotFinite(value));
    }

    let x = value * HALF_SLOTS_PER_DAY;
    let error = x.abs() * RELATIVE_ERROR;
    let tolerance = if error < 0.5 { 0.0 } else { (error + 0.5).ceil() };
    // Checked before any integer conversion: below this bound `x` fits an i128.
    if 2.0 * tolerance >= top_slack() as f64 {
        return Err(Error::PrecisionLoss(value));
    }
    let tolerance = tolerance as i128;
    let r = x.round() as i128 + S::ORIGIN;

    let bits = if r + tolerance >= 0 {
        decode_digits(&MODERN_DIGITS, 0, r, tolerance, (S::LABEL, value))?
    } else {
        let q = (r + tolerance).div_euclid(2 * W_PH_YEARS);
        if q < -PH_YEARS_OFFSET {
            return Err(Error::RealOutOfRange(value));
        }
        let (years, rest) = if q >= -2 {
            (
                PH_YEARS.sentinel(),
                r - PH_YEARS_UNSPECIFIED_SLOT * W_PH_YEARS,
            )
        } else {
            ((q + PH_YEARS_OFFSET) as u64, r - 2 * q * W_PH_YEARS)
        };
        let bits = PH_YEARS.set(MODE_BIT, years);
        decode_digits(&PREHISTORIC_DIGITS, bits, rest, tolerance, (S::LABEL, value))?
    };
    PackedTimestamp::from_bits(bits)
}

fn decode_digits(
    digits: &[Digit],
    mut bits: u64,
    mut r: i128,
    tolerance: i128,
    (axis, value): (&str, f64),
) -> Result<u64> {
    let mut lost = None;
    for (i, d) in digits.iter().enumerate() {
        if lost.is_none() && 2 * tolerance >= slack(d.weight, &digits[i + 1..]) {
            lost = Some(d.field.name);
        }
        if lost.is_some() {
            bits = d.field.set(bits, d.field.sentinel());
            continue;
        }

        let limit = d.field.limit as i128;
        let q = (r + tolerance).div_euclid(2 * d.weight);
        if q < 0 || q > limit + 1 {
            return Err(Error::RealOutOfRange(value));
        }
        if q >= limit {
            bits = d.field.set(bits, d.field.sentinel());
            r -= (2 * limit + 1) * d.weight;
        } else {
            bits = d.field.set(bits, q as u64);
            r -= 2 * q * d.weight;
        }
    }
    if let Some(field) = lost {
        log::debug!(
            "{axis} real {value} too coarse for {field}; it and finer fields decode as unspecified"
        );
    }
    Ok(bits)
}

// ═══════════════════════════════════════════════════════════════════════════
// Public API
// ═══════════════════════════════════════════════════════════════════════════

impl PackedTimestamp {
    /// Real value in day slots since the epoch `S`.
    ///
    /// Fails only for words that do not pass [`validate`](Self::validate).
    pub fn to_real<S: RealEpoch>(self) -> Result<f64> {
        Ok((half_slots(self)? - S::ORIGIN) as f64 / HALF_SLOTS_PER_DAY)
    }

    /// Inverse of [`to_real`](Self::to_real).
    ///
    /// Fields the value is too coarse to resolve come back unspecified.
    pub fn from_real<S: RealEpoch>(value: f64) -> Result<Self> {
        decode::<S>(value)
    }

    /// [`to_real`](Self::to_real) on the [`Etdb`] axis.
    pub fn to_etdb_real(self) -> Result<f64> {
        self.to_real::<Etdb>()
    }

    /// [`from_real`](Self::from_real) on the [`Etdb`] axis.
    pub fn from_etdb_real(value: f64) -> Result<Self> {
        Self::from_real::<Etdb>(value)
    }

    /// [`to_real`](Self::to_real) on the [`Proleptic`] axis.
    pub fn to_proleptic_real(self) -> Result<f64> {
        self.to_real::<Proleptic>()
    }

    /// [`from_real`](Self::from_real) on the [`Proleptic`] axis.
    pub fn from_proleptic_real(value: f64) -> Result<Self> {
        Self::from_real::<Proleptic>(value)
    }
}

/// [`Etdb`] real of a fully specified modern moment.
///
/// `subsecond_us` is in microseconds, `0..1_000_000`. Fields are in everyday
/// numbering (month 1..=12, day 1..=31).
pub fn etdb_real_offset(
    year: i64,
    month: u32,
    day: u32,
    hour: u32,
    minute: u32,
    second: u32,
    subsecond_us: u32,
) -> Result<f64> {
    let e = ExpandedTimestamp::date(year, month, day).with_time(
        hour,
        minute,
        second,
        subsecond_us / 1_000,
        subsecond_us % 1_000,
    );
    if e.format != Format::Modern {
        return Err(Error::Unrepresentable {
            field: "year",
            format: Format::Modern,
        });
    }
    e.pack()?.to_etdb_real()
}
