// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2026 Vallés Puig, Ramon

//! Bit layout of the packed 64-bit word.
//!
//! Every field is described by a [`Field`]: its shift, its width and the number
//! of legal values it may hold. Packing is plain shift/mask arithmetic over a
//! `u64`, so the layout is identical on every target.
//!
//! ```text
//! bit 63      reserved, always 0
//! bit 62      mode: 0 = modern, 1 = prehistoric
//!
//! modern       [century:9][year:7][month:4][day:5][hour:5][minute:6][seconds:6][ms:10][us:10]
//! prehistoric  [years:38][month:4][day:5][hour:5][minute:6][precision:4]
//! ```
//!
//! Fields are stored most-significant first, so within one variant the raw word
//! orders the same way the date does. Legal values are `0..limit`; the all-ones
//! value of each field is its "unspecified" sentinel.

/// Bit 63: kept clear so the word is always a non-negative `i64`.
pub const RESERVED_BIT: u64 = 1 << 63;

/// Bit 62: selects the prehistoric variant when set.
pub const MODE_BIT: u64 = 1 << 62;

/// Mask of the 62 payload bits shared by both variants.
pub const PAYLOAD_MASK: u64 = MODE_BIT - 1;

/// Placement and domain of a single packed field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Field {
    /// Field name used in error messages.
    pub name: &'static str,
    /// Position of the least significant bit.
    pub shift: u32,
    /// Width in bits.
    pub width: u32,
    /// Number of legal values; `0..limit` are real values.
    pub limit: u64,
}

impl Field {
    const fn new(name: &'static str, shift: u32, width: u32, limit: u64) -> Self {
        Self {
            name,
            shift,
            width,
            limit,
        }
    }

    /// The reserved all-ones value meaning "not specified".
    #[inline]
    pub const fn sentinel(&self) -> u64 {
        max_invalid(self.width)
    }

    /// Mask of this field's bits within the word.
    #[inline]
    pub const fn mask(&self) -> u64 {
        self.sentinel() << self.shift
    }

    /// Extract the raw field value from a word.
    #[inline]
    pub const fn get(&self, bits: u64) -> u64 {
        (bits >> self.shift) & self.sentinel()
    }

    /// Replace the field in `bits` with `value` (truncated to the field width).
    #[inline]
    pub const fn set(&self, bits: u64, value: u64) -> u64 {
        (bits & !self.mask()) | ((value & self.sentinel()) << self.shift)
    }

    /// `true` unless the field holds its sentinel.
    #[inline]
    pub const fn is_specified(&self, bits: u64) -> bool {
        self.get(bits) != self.sentinel()
    }

    /// `true` when the field holds the sentinel or a legal value.
    #[inline]
    pub const fn is_well_formed(&self, bits: u64) -> bool {
        let v = self.get(bits);
        v < self.limit || v == self.sentinel()
    }

    /// Clip a signed input to the field's legal domain.
    ///
    /// Negative inputs and inputs at or above `limit` collapse to the sentinel.
    #[inline]
    pub const fn clip(&self, v: i64) -> u64 {
        if v < 0 || v as u64 >= self.limit {
            self.sentinel()
        } else {
            v as u64
        }
    }
}

/// The all-ones value of a field `width` bits wide.
#[inline]
pub const fn max_invalid(width: u32) -> u64 {
    (1u64 << width) - 1
}

/// Clip `v` against the bit width alone, using the all-ones value as
/// "unspecified".
///
/// Negative inputs and inputs at or above the all-ones value map to it; every
/// other input is returned unchanged.
#[inline]
pub const fn clip_max_invalid(v: i64, width: u32) -> u64 {
    let invalid = max_invalid(width);
    if v < 0 || v as u64 >= invalid {
        invalid
    } else {
        v as u64
    }
}

// ── modern variant ────────────────────────────────────────────────────────

pub const CENTURY: Field = Field::new("century", 53, 9, 511);
pub const YEAR: Field = Field::new("year", 46, 7, 100);
pub const MONTH: Field = Field::new("month", 42, 4, 12);
pub const DAY: Field = Field::new("day", 37, 5, 31);
pub const HOUR: Field = Field::new("hour", 32, 5, 24);
pub const MINUTE: Field = Field::new("minute", 26, 6, 60);
pub const SECONDS: Field = Field::new("seconds", 20, 6, 60);
pub const MILLISECONDS: Field = Field::new("milliseconds", 10, 10, 1000);
pub const MICROSECONDS: Field = Field::new("microseconds", 0, 10, 1000);

/// Modern fields, coarsest first.
pub const MODERN_FIELDS: [Field; 9] = [
    CENTURY,
    YEAR,
    MONTH,
    DAY,
    HOUR,
    MINUTE,
    SECONDS,
    MILLISECONDS,
    MICROSECONDS,
];

// ── prehistoric variant ───────────────────────────────────────────────────

pub const PH_YEARS: Field = Field::new("years", 24, 38, (1 << 38) - 1);
pub const PH_MONTH: Field = Field::new("month", 20, 4, 12);
pub const PH_DAY: Field = Field::new("day", 15, 5, 31);
pub const PH_HOUR: Field = Field::new("hour", 10, 5, 24);
pub const PH_MINUTE: Field = Field::new("minute", 4, 6, 60);
pub const PH_PRECISION: Field = Field::new("precision", 0, 4, 15);

/// Prehistoric fields, coarsest first.
pub const PREHISTORIC_FIELDS: [Field; 6] = [
    PH_YEARS,
    PH_MONTH,
    PH_DAY,
    PH_HOUR,
    PH_MINUTE,
    PH_PRECISION,
];

// ── calendar mapping ──────────────────────────────────────────────────────

/// Calendar year (astronomical numbering) of `century = 0, year = 0`.
pub const MODERN_BASE_YEAR: i64 = -48_100;

/// Last calendar year the modern variant can hold.
pub const MODERN_MAX_YEAR: i64 = MODERN_BASE_YEAR + 100 * (CENTURY.limit as i64) - 1;

/// Last calendar year of the prehistoric variant, right before the modern range.
pub const PREHISTORIC_MAX_YEAR: i64 = MODERN_BASE_YEAR - 1;

/// Calendar year of `years = 0` in the prehistoric variant.
pub const PREHISTORIC_MIN_YEAR: i64 = MODERN_BASE_YEAR - PH_YEARS.sentinel() as i64;
