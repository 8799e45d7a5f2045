// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2026 Vallés Puig, Ramon

//! The packed 64-bit timestamp value.
//!
//! [`PackedTimestamp`] is a plain `Copy` wrapper around a `u64` whose bit
//! pattern is the wire and storage format. One mode bit selects between the
//! **modern** variant (microsecond resolution, years −48100..=2999) and the
//! **prehistoric** variant (minute resolution, years before −48100 back to
//! ~274.9 billion years ago, with a decimal precision exponent on the year).
//!
//! Every field reserves its all-ones value as "unspecified", so partial dates
//! ("the 15th of some month", "some time in the Jurassic") are first-class.
//! Constructors clip out-of-domain inputs to that sentinel and never fail.

use crate::clock::Clock;
use crate::error::{Error, Result};
use crate::layout::{
    self, Field, CENTURY, DAY, HOUR, MICROSECONDS, MILLISECONDS, MINUTE, MODE_BIT, MONTH,
    MODERN_BASE_YEAR, MODERN_FIELDS, PAYLOAD_MASK, PH_DAY, PH_HOUR, PH_MINUTE, PH_MONTH,
    PH_PRECISION, PH_YEARS, PREHISTORIC_FIELDS, PREHISTORIC_MIN_YEAR, RESERVED_BIT, SECONDS, YEAR,
};
use std::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Deserializer, Serialize, Serializer};

// ═══════════════════════════════════════════════════════════════════════════
// Format
// ═══════════════════════════════════════════════════════════════════════════

/// Which of the two packed variants a value uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Format {
    /// Mode bit clear: century/year based, down to microseconds.
    #[default]
    Modern,
    /// Mode bit set: year count with precision exponent, down to minutes.
    Prehistoric,
}

impl Format {
    /// Tag used by the text rendering.
    pub const fn label(self) -> &'static str {
        match self {
            Format::Modern => "Modern",
            Format::Prehistoric => "PreHistoric",
        }
    }

    /// Fields of this variant, coarsest first.
    pub const fn fields(self) -> &'static [Field] {
        match self {
            Format::Modern => &MODERN_FIELDS,
            Format::Prehistoric => &PREHISTORIC_FIELDS,
        }
    }
}

impl fmt::Display for Format {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

// ═══════════════════════════════════════════════════════════════════════════
// PackedTimestamp
// ═══════════════════════════════════════════════════════════════════════════

/// A timestamp packed into a single 64-bit word.
///
/// The top bit is always clear, so `bits() as i64` is never negative; this is
/// what lets [`fast_delta`](crate::fast_delta) subtract two words as signed
/// integers without wrapping.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PackedTimestamp(u64);

impl PackedTimestamp {
    /// All-zero word: modern, `-48100-01-01T00:00:00.000000`.
    pub const EPOCH: Self = Self(0);

    /// Every field of the modern variant set to "unspecified".
    pub const UNKNOWN: Self = Self(PAYLOAD_MASK);

    /// The fixed reference timestamp (all bits zero).
    #[inline]
    pub const fn epoch() -> Self {
        Self::EPOCH
    }

    /// A timestamp with every field unspecified.
    #[inline]
    pub const fn unknown() -> Self {
        Self::UNKNOWN
    }

    /// Wrap a raw word, rejecting a set reserved bit.
    pub const fn from_bits(bits: u64) -> Result<Self> {
        if bits & RESERVED_BIT != 0 {
            Err(Error::ReservedBit(bits))
        } else {
            Ok(Self(bits))
        }
    }

    /// The raw 64-bit pattern.
    #[inline]
    pub const fn bits(self) -> u64 {
        self.0
    }

    /// Start a modern timestamp with every field unspecified.
    pub const fn modern() -> ModernBuilder {
        ModernBuilder(PackedTimestamp::UNKNOWN.0)
    }

    /// Start a prehistoric timestamp with every field unspecified.
    pub const fn prehistoric() -> PrehistoricBuilder {
        PrehistoricBuilder(MODE_BIT | PAYLOAD_MASK)
    }

    // ── mode ──────────────────────────────────────────────────────────

    /// The active variant.
    #[inline]
    pub const fn format(self) -> Format {
        if self.0 & MODE_BIT == 0 {
            Format::Modern
        } else {
            Format::Prehistoric
        }
    }

    #[inline]
    pub const fn is_modern_format(self) -> bool {
        self.0 & MODE_BIT == 0
    }

    #[inline]
    pub const fn is_prehistoric_format(self) -> bool {
        self.0 & MODE_BIT != 0
    }

    // ── raw field access ──────────────────────────────────────────────

    /// Raw field value, without interpreting the mode bit.
    #[inline]
    pub const fn raw(self, field: Field) -> u64 {
        field.get(self.0)
    }

    /// `true` unless `field` holds its sentinel. The caller picks the field
    /// matching the active variant.
    #[inline]
    pub(crate) const fn specified(self, field: Field) -> bool {
        field.is_specified(self.0)
    }

    /// Decoded view of the active variant's raw fields.
    pub fn fields(self) -> Fields {
        match self.format() {
            Format::Modern => Fields::Modern(ModernFields {
                century: self.raw(CENTURY) as u32,
                year: self.raw(YEAR) as u32,
                month: self.raw(MONTH) as u32,
                day: self.raw(DAY) as u32,
                hour: self.raw(HOUR) as u32,
                minute: self.raw(MINUTE) as u32,
                seconds: self.raw(SECONDS) as u32,
                milliseconds: self.raw(MILLISECONDS) as u32,
                microseconds: self.raw(MICROSECONDS) as u32,
            }),
            Format::Prehistoric => Fields::Prehistoric(PrehistoricFields {
                years: self.raw(PH_YEARS),
                month: self.raw(PH_MONTH) as u32,
                day: self.raw(PH_DAY) as u32,
                hour: self.raw(PH_HOUR) as u32,
                minute: self.raw(PH_MINUTE) as u32,
                precision: self.raw(PH_PRECISION) as u32,
            }),
        }
    }

    /// Pack raw modern field values. Out-of-domain values become unspecified.
    pub fn from_modern_fields(f: ModernFields) -> Self {
        let values = [
            f.century as u64,
            f.year as u64,
            f.month as u64,
            f.day as u64,
            f.hour as u64,
            f.minute as u64,
            f.seconds as u64,
            f.milliseconds as u64,
            f.microseconds as u64,
        ];
        Self(pack(0, &MODERN_FIELDS, &values))
    }

    /// Pack raw prehistoric field values. Out-of-domain values become unspecified.
    pub fn from_prehistoric_fields(f: PrehistoricFields) -> Self {
        let values = [
            f.years,
            f.month as u64,
            f.day as u64,
            f.hour as u64,
            f.minute as u64,
            f.precision as u64,
        ];
        Self(pack(MODE_BIT, &PREHISTORIC_FIELDS, &values))
    }

    // ── clock-based factories ─────────────────────────────────────────

    /// The current moment as read from `clock`.
    pub fn now(clock: &impl Clock) -> Result<Self> {
        Self::from_datetime(clock.now())
    }

    /// Today's date with every time field at zero.
    pub fn today(clock: &impl Clock) -> Result<Self> {
        Self::today_at(clock, 0, 0, 0)
    }

    /// Today's date at the given wall-clock time; sub-second fields are zero.
    ///
    /// The time arguments are clipped like any other constructor input.
    pub fn today_at(clock: &impl Clock, hour: i64, minute: i64, second: i64) -> Result<Self> {
        let today = Self::now(clock)?;
        let bits = match today.format() {
            Format::Modern => {
                let bits = HOUR.set(today.0, HOUR.clip(hour));
                let bits = MINUTE.set(bits, MINUTE.clip(minute));
                let bits = SECONDS.set(bits, SECONDS.clip(second));
                let bits = MILLISECONDS.set(bits, 0);
                MICROSECONDS.set(bits, 0)
            }
            Format::Prehistoric => {
                let bits = PH_HOUR.set(today.0, PH_HOUR.clip(hour));
                PH_MINUTE.set(bits, PH_MINUTE.clip(minute))
            }
        };
        Ok(Self(bits))
    }

    // ── validation ────────────────────────────────────────────────────

    /// `true` when [`validate`](Self::validate) succeeds.
    pub fn is_valid(self) -> bool {
        self.validate().is_ok()
    }

    /// Check that every field is either legal or unspecified.
    ///
    /// Words assembled by this crate always pass; words read from storage may
    /// carry values between a field's legal maximum and its sentinel.
    pub fn validate(self) -> Result<()> {
        if self.0 & RESERVED_BIT != 0 {
            return Err(Error::ReservedBit(self.0));
        }
        match self.format().fields().iter().find(|f| !f.is_well_formed(self.0)) {
            Some(f) => Err(Error::FieldOutOfRange {
                field: f.name,
                value: f.get(self.0) as i64,
            }),
            None => Ok(()),
        }
    }

    /// `true` when at least one field of the active variant is unspecified.
    pub fn is_partial_timestamp(self) -> bool {
        self.format().fields().iter().any(|f| !f.is_specified(self.0))
    }

    /// Fill every unspecified field from `base`.
    ///
    /// Both timestamps must use the same variant. Fields `base` leaves
    /// unspecified stay unspecified.
    pub fn normalize(self, base: Self) -> Result<Self> {
        if self.format() != base.format() {
            return Err(Error::FormatMismatch {
                expected: self.format(),
                found: base.format(),
            });
        }
        let bits = self.format().fields().iter().fold(self.0, |bits, f| {
            if f.is_specified(bits) {
                bits
            } else {
                f.set(bits, f.get(base.0))
            }
        });
        Ok(Self(bits))
    }

    /// [`normalize`](Self::normalize) against [`epoch`](Self::epoch).
    pub fn normalize_to_epoch(self) -> Result<Self> {
        self.normalize(Self::EPOCH)
    }
}

fn pack(mode: u64, fields: &[Field], values: &[u64]) -> u64 {
    fields.iter().zip(values).fold(mode, |bits, (f, &v)| {
        let v = if v < f.limit { v } else { f.sentinel() };
        f.set(bits, v)
    })
}

// ═══════════════════════════════════════════════════════════════════════════
// Raw field views
// ═══════════════════════════════════════════════════════════════════════════

/// Raw stored values of a modern timestamp (0-based, sentinel = all ones).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ModernFields {
    pub century: u32,
    pub year: u32,
    pub month: u32,
    pub day: u32,
    pub hour: u32,
    pub minute: u32,
    pub seconds: u32,
    pub milliseconds: u32,
    pub microseconds: u32,
}

/// Raw stored values of a prehistoric timestamp.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PrehistoricFields {
    pub years: u64,
    pub month: u32,
    pub day: u32,
    pub hour: u32,
    pub minute: u32,
    /// Decimal exponent of the uncertainty on `years`.
    pub precision: u32,
}

/// Raw fields of whichever variant is active.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Fields {
    Modern(ModernFields),
    Prehistoric(PrehistoricFields),
}

// ═══════════════════════════════════════════════════════════════════════════
// Builders
// ═══════════════════════════════════════════════════════════════════════════

/// Field-by-field constructor for modern timestamps.
///
/// Inputs use human numbering (month 1..=12, day 1..=31). Anything outside a
/// field's domain leaves that field unspecified.
///
/// ```
/// use eternal_timestamp::PackedTimestamp;
///
/// let t = PackedTimestamp::modern().day(15).build();
/// assert!(t.has_day());
/// assert!(!t.has_month());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[must_use]
pub struct ModernBuilder(u64);

impl ModernBuilder {
    /// Calendar year (astronomical numbering). Outside −48100..=2999 both
    /// century and year become unspecified.
    pub const fn year(self, year: i64) -> Self {
        if year < MODERN_BASE_YEAR || year > layout::MODERN_MAX_YEAR {
            let bits = CENTURY.set(self.0, CENTURY.sentinel());
            return Self(YEAR.set(bits, YEAR.sentinel()));
        }
        let eternal = year - MODERN_BASE_YEAR;
        let bits = CENTURY.set(self.0, (eternal / 100) as u64);
        Self(YEAR.set(bits, (eternal % 100) as u64))
    }

    /// Raw century count since −48100.
    pub const fn century(self, century: i64) -> Self {
        Self(CENTURY.set(self.0, CENTURY.clip(century)))
    }

    /// Year within the century, 0..=99.
    pub const fn year_of_century(self, year: i64) -> Self {
        Self(YEAR.set(self.0, YEAR.clip(year)))
    }

    pub const fn month(self, month: i64) -> Self {
        Self(MONTH.set(self.0, MONTH.clip(month.saturating_sub(1))))
    }

    pub const fn day(self, day: i64) -> Self {
        Self(DAY.set(self.0, DAY.clip(day.saturating_sub(1))))
    }

    pub const fn hour(self, hour: i64) -> Self {
        Self(HOUR.set(self.0, HOUR.clip(hour)))
    }

    pub const fn minute(self, minute: i64) -> Self {
        Self(MINUTE.set(self.0, MINUTE.clip(minute)))
    }

    pub const fn seconds(self, seconds: i64) -> Self {
        Self(SECONDS.set(self.0, SECONDS.clip(seconds)))
    }

    pub const fn milliseconds(self, ms: i64) -> Self {
        Self(MILLISECONDS.set(self.0, MILLISECONDS.clip(ms)))
    }

    pub const fn microseconds(self, us: i64) -> Self {
        Self(MICROSECONDS.set(self.0, MICROSECONDS.clip(us)))
    }

    pub const fn build(self) -> PackedTimestamp {
        PackedTimestamp(self.0)
    }
}

/// Field-by-field constructor for prehistoric timestamps.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[must_use]
pub struct PrehistoricBuilder(u64);

impl PrehistoricBuilder {
    /// Calendar year (astronomical numbering). Years outside the prehistoric
    /// range leave the year count unspecified.
    pub const fn year(self, year: i64) -> Self {
        if year < PREHISTORIC_MIN_YEAR || year > layout::PREHISTORIC_MAX_YEAR {
            return Self(PH_YEARS.set(self.0, PH_YEARS.sentinel()));
        }
        Self(PH_YEARS.set(self.0, (year - PREHISTORIC_MIN_YEAR) as u64))
    }

    /// A date `years` before the start of the modern range; 1 is −48101.
    pub const fn years_before_modern(self, years: i64) -> Self {
        match MODERN_BASE_YEAR.checked_sub(years) {
            Some(year) => self.year(year),
            None => Self(PH_YEARS.set(self.0, PH_YEARS.sentinel())),
        }
    }

    /// Decimal exponent of the year's uncertainty: 0 = exact, 3 = ±1000 years.
    pub const fn precision(self, precision: i64) -> Self {
        Self(PH_PRECISION.set(self.0, PH_PRECISION.clip(precision)))
    }

    pub const fn month(self, month: i64) -> Self {
        Self(PH_MONTH.set(self.0, PH_MONTH.clip(month.saturating_sub(1))))
    }

    pub const fn day(self, day: i64) -> Self {
        Self(PH_DAY.set(self.0, PH_DAY.clip(day.saturating_sub(1))))
    }

    pub const fn hour(self, hour: i64) -> Self {
        Self(PH_HOUR.set(self.0, PH_HOUR.clip(hour)))
    }

    pub const fn minute(self, minute: i64) -> Self {
        Self(PH_MINUTE.set(self.0, PH_MINUTE.clip(minute)))
    }

    pub const fn build(self) -> PackedTimestamp {
        PackedTimestamp(self.0)
    }
}

// ── Serde ─────────────────────────────────────────────────────────────────

#[cfg(feature = "serde")]
impl Serialize for PackedTimestamp {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_u64(self.0)
    }
}

#[cfg(feature = "serde")]
impl<'de> Deserialize<'de> for PackedTimestamp {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let bits = u64::deserialize(deserializer)?;
        Self::from_bits(bits).map_err(serde::de::Error::custom)
    }
}

// ═══════════════════════════════════════════════════════════════════════════
// Tests
// ═══════════════════════════════════════════════════════════════════════════
