// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2026 Vallés Puig, Ramon

//! Expanded, per-field form of a timestamp.
//!
//! [`ExpandedTimestamp`] is the human-facing counterpart of
//! [`PackedTimestamp`]: plain integers in everyday numbering (month 1..=12,
//! day 1..=31) plus an [`Unspecified`] mask saying which of them carry no
//! information. The packed form stays authoritative; expanding never fails,
//! packing fails when a value does not fit the chosen variant.

use crate::error::{Error, Result};
use crate::layout::{
    Field, CENTURY, DAY, HOUR, MICROSECONDS, MILLISECONDS, MINUTE, MODERN_BASE_YEAR,
    MODERN_MAX_YEAR, MONTH, PH_DAY, PH_HOUR, PH_MINUTE, PH_MONTH, PH_PRECISION, PH_YEARS,
    PREHISTORIC_MAX_YEAR, PREHISTORIC_MIN_YEAR, SECONDS, YEAR,
};
use crate::packed::{Fields, ModernFields, PrehistoricFields};
use crate::{Format, PackedTimestamp};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

bitflags::bitflags! {
    /// Fields flagged as "unspecified" in an [`ExpandedTimestamp`].
    ///
    /// Bit positions 0..=8 are part of the interchange format and never move.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    #[cfg_attr(feature = "serde", derive(Serialize, Deserialize), serde(transparent))]
    pub struct Unspecified: u32 {
        const MICROSECONDS = 1 << 0;
        const MILLISECONDS = 1 << 1;
        const SECONDS = 1 << 2;
        const MINUTES = 1 << 3;
        const HOURS = 1 << 4;
        const DAYS = 1 << 5;
        const MONTHS = 1 << 6;
        const YEARS = 1 << 7;
        /// Century (modern) or the whole year count (prehistoric).
        const EPOCHS = 1 << 8;
        /// Prehistoric precision exponent.
        const PRECISION = 1 << 9;
    }
}

/// A timestamp broken out into integer fields, akin to `struct tm`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ExpandedTimestamp {
    /// Variant the fields belong to; [`pack`](Self::pack) targets it.
    pub format: Format,
    /// Calendar year when it does not fit `year`; overrides `year` when set.
    pub large_year: Option<i64>,
    /// Modern century count since −48100.
    pub century: u32,
    /// Modern year within `century`, 0..=99.
    pub year_sans_epoch: u32,
    /// Calendar year, astronomical numbering (0 = 1 BC).
    pub year: i32,
    pub month: u32,
    pub day: u32,
    pub hour: u32,
    pub minute: u32,
    pub seconds: u32,
    pub milliseconds: u32,
    pub microseconds: u32,
    /// Prehistoric: decimal exponent of the year's uncertainty.
    pub precision: u32,
    pub unspecified: Unspecified,
}

impl Default for ExpandedTimestamp {
    /// A modern timestamp with nothing specified.
    fn default() -> Self {
        Self {
            format: Format::Modern,
            large_year: None,
            century: 0,
            year_sans_epoch: 0,
            year: 0,
            month: 0,
            day: 0,
            hour: 0,
            minute: 0,
            seconds: 0,
            milliseconds: 0,
            microseconds: 0,
            precision: 0,
            unspecified: Unspecified::all(),
        }
    }
}

impl ExpandedTimestamp {
    /// A calendar date with no time of day. The variant follows from `year`;
    /// prehistoric dates are marked exact to the year.
    pub fn date(year: i64, month: u32, day: u32) -> Self {
        let mut e = Self::default();
        e.set_year(year);
        e.month = month;
        e.day = day;
        e.unspecified.remove(Unspecified::MONTHS | Unspecified::DAYS);
        e
    }

    /// Set every time field.
    #[must_use]
    pub fn with_time(mut self, hour: u32, minute: u32, seconds: u32, ms: u32, us: u32) -> Self {
        self = self.with_hm(hour, minute);
        self.seconds = seconds;
        self.milliseconds = ms;
        self.microseconds = us;
        self.unspecified.remove(
            Unspecified::SECONDS | Unspecified::MILLISECONDS | Unspecified::MICROSECONDS,
        );
        self
    }

    /// Set hour and minute only; the finest time the prehistoric variant holds.
    #[must_use]
    pub fn with_hm(mut self, hour: u32, minute: u32) -> Self {
        self.hour = hour;
        self.minute = minute;
        self.unspecified
            .remove(Unspecified::HOURS | Unspecified::MINUTES);
        self
    }

    fn set_year(&mut self, year: i64) {
        self.format = if year < MODERN_BASE_YEAR {
            Format::Prehistoric
        } else {
            Format::Modern
        };
        match i32::try_from(year) {
            Ok(y) => {
                self.year = y;
                self.large_year = None;
            }
            Err(_) => {
                self.year = 0;
                self.large_year = Some(year);
            }
        }
        self.unspecified
            .remove(Unspecified::YEARS | Unspecified::EPOCHS);
        match self.format {
            Format::Modern => match year.checked_sub(MODERN_BASE_YEAR) {
                Some(eternal) => {
                    self.century = u32::try_from(eternal / 100).unwrap_or(u32::MAX);
                    self.year_sans_epoch = (eternal % 100) as u32;
                }
                None => {
                    self.century = u32::MAX;
                    self.year_sans_epoch = 0;
                }
            },
            Format::Prehistoric => {
                self.century = 0;
                self.year_sans_epoch = 0;
                self.precision = 0;
                self.unspecified.remove(Unspecified::PRECISION);
            }
        }
    }

    /// Calendar year, if every field it depends on is specified.
    pub fn full_year(&self) -> Option<i64> {
        if self
            .unspecified
            .intersects(Unspecified::YEARS | Unspecified::EPOCHS)
        {
            None
        } else {
            Some(self.large_year.unwrap_or(self.year as i64))
        }
    }

    /// Time of day in microseconds; unspecified fields count as zero.
    pub fn time_of_day_us(&self) -> i64 {
        let h = self.hour as i64;
        let m = self.minute as i64;
        let s = self.seconds as i64;
        let ms = self.milliseconds as i64;
        let us = self.microseconds as i64;
        (((h * 60 + m) * 60 + s) * 1_000 + ms) * 1_000 + us
    }

    /// Rebuild the packed value for [`format`](Self::format).
    pub fn pack(&self) -> Result<PackedTimestamp> {
        match self.format {
            Format::Modern => self.pack_modern(),
            Format::Prehistoric => self.pack_prehistoric(),
        }
    }

    /// Stored value of one field, `offset` being the human-numbering shift.
    fn stored(&self, flag: Unspecified, value: u32, field: Field, offset: i64) -> Result<u64> {
        if self.unspecified.contains(flag) {
            return Ok(field.sentinel());
        }
        let v = value as i64 - offset;
        if v >= 0 && (v as u64) < field.limit {
            Ok(v as u64)
        } else {
            Err(Error::FieldOutOfRange {
                field: field.name,
                value: value as i64,
            })
        }
    }

    fn pack_modern(&self) -> Result<PackedTimestamp> {
        if !self.unspecified.contains(Unspecified::PRECISION) && self.precision != 0 {
            return Err(Error::Unrepresentable {
                field: "precision",
                format: Format::Modern,
            });
        }

        let epochs = !self.unspecified.contains(Unspecified::EPOCHS);
        let years = !self.unspecified.contains(Unspecified::YEARS);
        let (century, year) = if epochs && years {
            let y = self.large_year.unwrap_or(self.year as i64);
            if !(MODERN_BASE_YEAR..=MODERN_MAX_YEAR).contains(&y) {
                return Err(Error::Unrepresentable {
                    field: "year",
                    format: Format::Modern,
                });
            }
            let eternal = (y - MODERN_BASE_YEAR) as u64;
            (eternal / 100, eternal % 100)
        } else {
            (
                self.stored(Unspecified::EPOCHS, self.century, CENTURY, 0)?,
                self.stored(Unspecified::YEARS, self.year_sans_epoch, YEAR, 0)?,
            )
        };

        Ok(PackedTimestamp::from_modern_fields(ModernFields {
            century: century as u32,
            year: year as u32,
            month: self.stored(Unspecified::MONTHS, self.month, MONTH, 1)? as u32,
            day: self.stored(Unspecified::DAYS, self.day, DAY, 1)? as u32,
            hour: self.stored(Unspecified::HOURS, self.hour, HOUR, 0)? as u32,
            minute: self.stored(Unspecified::MINUTES, self.minute, MINUTE, 0)? as u32,
            seconds: self.stored(Unspecified::SECONDS, self.seconds, SECONDS, 0)? as u32,
            milliseconds: self.stored(
                Unspecified::MILLISECONDS,
                self.milliseconds,
                MILLISECONDS,
                0,
            )? as u32,
            microseconds: self.stored(
                Unspecified::MICROSECONDS,
                self.microseconds,
                MICROSECONDS,
                0,
            )? as u32,
        }))
    }

    fn pack_prehistoric(&self) -> Result<PackedTimestamp> {
        for (flag, field) in [
            (Unspecified::SECONDS, "seconds"),
            (Unspecified::MILLISECONDS, "milliseconds"),
            (Unspecified::MICROSECONDS, "microseconds"),
        ] {
            if !self.unspecified.contains(flag) {
                return Err(Error::Unrepresentable {
                    field,
                    format: Format::Prehistoric,
                });
            }
        }

        let years = if self.unspecified.contains(Unspecified::YEARS) {
            PH_YEARS.sentinel()
        } else {
            let y = self.large_year.unwrap_or(self.year as i64);
            if !(PREHISTORIC_MIN_YEAR..=PREHISTORIC_MAX_YEAR).contains(&y) {
                return Err(Error::Unrepresentable {
                    field: "year",
                    format: Format::Prehistoric,
                });
            }
            (y - PREHISTORIC_MIN_YEAR) as u64
        };

        Ok(PackedTimestamp::from_prehistoric_fields(PrehistoricFields {
            years,
            month: self.stored(Unspecified::MONTHS, self.month, PH_MONTH, 1)? as u32,
            day: self.stored(Unspecified::DAYS, self.day, PH_DAY, 1)? as u32,
            hour: self.stored(Unspecified::HOURS, self.hour, PH_HOUR, 0)? as u32,
            minute: self.stored(Unspecified::MINUTES, self.minute, PH_MINUTE, 0)? as u32,
            precision: self.stored(Unspecified::PRECISION, self.precision, PH_PRECISION, 0)? as u32,
        }))
    }
}

impl PackedTimestamp {
    /// Break the value out into an [`ExpandedTimestamp`]. Never fails.
    pub fn expand(self) -> ExpandedTimestamp {
        let mut e = ExpandedTimestamp {
            format: self.format(),
            unspecified: Unspecified::empty(),
            ..ExpandedTimestamp::default()
        };

        // Unspecified fields read as zero and raise their flag.
        let mut take = |flag: Unspecified, raw: u64, field: Field, offset: u32| -> u32 {
            if raw == field.sentinel() {
                e.unspecified.insert(flag);
                0
            } else {
                raw as u32 + offset
            }
        };

        match self.fields() {
            Fields::Modern(f) => {
                let century = take(Unspecified::EPOCHS, f.century as u64, CENTURY, 0);
                let year = take(Unspecified::YEARS, f.year as u64, YEAR, 0);
                let month = take(Unspecified::MONTHS, f.month as u64, MONTH, 1);
                let day = take(Unspecified::DAYS, f.day as u64, DAY, 1);
                let hour = take(Unspecified::HOURS, f.hour as u64, HOUR, 0);
                let minute = take(Unspecified::MINUTES, f.minute as u64, MINUTE, 0);
                let seconds = take(Unspecified::SECONDS, f.seconds as u64, SECONDS, 0);
                let ms = take(Unspecified::MILLISECONDS, f.milliseconds as u64, MILLISECONDS, 0);
                let us = take(Unspecified::MICROSECONDS, f.microseconds as u64, MICROSECONDS, 0);
                e.unspecified.insert(Unspecified::PRECISION);

                e.century = century;
                e.year_sans_epoch = year;
                if e.full_year().is_some() {
                    let y = MODERN_BASE_YEAR + 100 * century as i64 + year as i64;
                    match i32::try_from(y) {
                        Ok(y) => e.year = y,
                        Err(_) => e.large_year = Some(y),
                    }
                }
                e.month = month;
                e.day = day;
                e.hour = hour;
                e.minute = minute;
                e.seconds = seconds;
                e.milliseconds = ms;
                e.microseconds = us;
            }
            Fields::Prehistoric(f) => {
                let month = take(Unspecified::MONTHS, f.month as u64, PH_MONTH, 1);
                let day = take(Unspecified::DAYS, f.day as u64, PH_DAY, 1);
                let hour = take(Unspecified::HOURS, f.hour as u64, PH_HOUR, 0);
                let minute = take(Unspecified::MINUTES, f.minute as u64, PH_MINUTE, 0);
                let precision = take(Unspecified::PRECISION, f.precision as u64, PH_PRECISION, 0);
                e.unspecified.insert(
                    Unspecified::SECONDS | Unspecified::MILLISECONDS | Unspecified::MICROSECONDS,
                );

                if f.years == PH_YEARS.sentinel() {
                    e.unspecified
                        .insert(Unspecified::YEARS | Unspecified::EPOCHS);
                } else {
                    let y = PREHISTORIC_MIN_YEAR + f.years as i64;
                    match i32::try_from(y) {
                        Ok(y) => e.year = y,
                        Err(_) => e.large_year = Some(y),
                    }
                }
                e.month = month;
                e.day = day;
                e.hour = hour;
                e.minute = minute;
                e.precision = precision;
            }
        }
        e
    }
}

impl From<PackedTimestamp> for ExpandedTimestamp {
    fn from(t: PackedTimestamp) -> Self {
        t.expand()
    }
}

impl TryFrom<ExpandedTimestamp> for PackedTimestamp {
    type Error = Error;

    fn try_from(e: ExpandedTimestamp) -> Result<Self> {
        e.pack()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn full_modern() -> PackedTimestamp {
        PackedTimestamp::modern()
            .year(2024)
            .month(2)
            .day(29)
            .hour(23)
            .minute(59)
            .seconds(58)
            .milliseconds(123)
            .microseconds(456)
            .build()
    }

    #[test]
    fn mask_positions_are_fixed() {
        assert_eq!(Unspecified::MICROSECONDS.bits(), 1);
        assert_eq!(Unspecified::DAYS.bits(), 1 << 5);
        assert_eq!(Unspecified::EPOCHS.bits(), 1 << 8);
    }

    #[test]
    fn expand_modern() {
        let e = full_modern().expand();
        assert_eq!(e.format, Format::Modern);
        assert_eq!(e.year, 2024);
        assert_eq!(e.large_year, None);
        assert_eq!(e.century, 501);
        assert_eq!(e.year_sans_epoch, 24);
        assert_eq!((e.month, e.day), (2, 29));
        assert_eq!((e.hour, e.minute, e.seconds), (23, 59, 58));
        assert_eq!((e.milliseconds, e.microseconds), (123, 456));
        assert_eq!(e.unspecified, Unspecified::PRECISION);
        assert_eq!(e.full_year(), Some(2024));
    }

    #[test]
    fn expand_epoch_is_reference_date() {
        let e = PackedTimestamp::epoch().expand();
        assert_eq!(e.year, -48_100);
        assert_eq!((e.month, e.day), (1, 1));
        assert_eq!(e.time_of_day_us(), 0);
        assert_eq!(e.unspecified, Unspecified::PRECISION);
    }

    #[test]
    fn expand_unknown_flags_everything() {
        let e = PackedTimestamp::unknown().expand();
        assert_eq!(e.unspecified, Unspecified::all());
        assert_eq!(e.full_year(), None);
        assert_eq!(e.month, 0);
    }

    #[test]
    fn complete_values_roundtrip_bit_for_bit() {
        for t in [
            full_modern(),
            PackedTimestamp::epoch(),
            PackedTimestamp::modern()
                .year(2_999)
                .month(12)
                .day(31)
                .hour(0)
                .minute(0)
                .seconds(0)
                .milliseconds(0)
                .microseconds(0)
                .build(),
            PackedTimestamp::prehistoric()
                .years_before_modern(66_000_000)
                .precision(5)
                .month(1)
                .day(1)
                .hour(0)
                .minute(0)
                .build(),
        ] {
            assert_eq!(t.expand().pack(), Ok(t), "{t:?}");
        }
    }

    #[test]
    fn partial_values_roundtrip_too() {
        for t in [
            PackedTimestamp::unknown(),
            PackedTimestamp::prehistoric().build(),
            PackedTimestamp::modern().day(15).build(),
            PackedTimestamp::modern().year_of_century(42).hour(3).build(),
            PackedTimestamp::modern().century(7).build(),
        ] {
            assert_eq!(PackedTimestamp::try_from(t.expand()), Ok(t), "{t:?}");
        }
    }

    #[test]
    fn cosmological_years_use_large_year() {
        let t = PackedTimestamp::prehistoric()
            .year(-13_800_000_000)
            .precision(8)
            .build();
        let e = t.expand();
        assert_eq!(e.format, Format::Prehistoric);
        assert_eq!(e.large_year, Some(-13_800_000_000));
        assert_eq!(e.year, 0);
        assert_eq!(e.precision, 8);
        assert_eq!(e.full_year(), Some(-13_800_000_000));
        assert!(e.unspecified.contains(Unspecified::SECONDS));
        assert_eq!(e.pack(), Ok(t));
    }

    #[test]
    fn date_constructor_picks_variant() {
        let modern = ExpandedTimestamp::date(1969, 7, 20).with_time(20, 17, 40, 0, 0);
        let t = modern.pack().unwrap();
        assert!(t.is_modern_format());
        assert!(t.has_complete_date() && t.has_time());

        let ancient = ExpandedTimestamp::date(-50_000, 3, 1).with_hm(6, 0);
        assert_eq!(ancient.format, Format::Prehistoric);
        let t = ancient.pack().unwrap();
        assert!(t.is_prehistoric_format());
        assert!(t.has_complete_date() && t.has_time());
        assert_eq!(t.expand().year, -50_000);
    }

    #[test]
    fn extreme_years_are_rejected_on_pack() {
        let e = ExpandedTimestamp::date(i64::MAX, 1, 1);
        assert_eq!(e.format, Format::Modern);
        assert_eq!(e.large_year, Some(i64::MAX));
        assert_eq!(e.century, u32::MAX);
        assert_eq!(
            e.pack(),
            Err(Error::Unrepresentable {
                field: "year",
                format: Format::Modern
            })
        );

        let e = ExpandedTimestamp::date(i64::MIN, 1, 1).with_hm(0, 0);
        assert_eq!(e.format, Format::Prehistoric);
        assert_eq!(
            e.pack(),
            Err(Error::Unrepresentable {
                field: "year",
                format: Format::Prehistoric
            })
        );
    }

    #[test]
    fn out_of_domain_fields_are_reported() {
        let e = ExpandedTimestamp::date(2024, 13, 1);
        assert_eq!(
            e.pack(),
            Err(Error::FieldOutOfRange {
                field: "month",
                value: 13
            })
        );

        let e = ExpandedTimestamp::date(2024, 1, 0);
        assert_eq!(
            e.pack(),
            Err(Error::FieldOutOfRange {
                field: "day",
                value: 0
            })
        );

        let e = ExpandedTimestamp::date(2024, 1, 1).with_time(24, 0, 0, 0, 0);
        assert!(matches!(e.pack(), Err(Error::FieldOutOfRange { field: "hour", .. })));
    }

    #[test]
    fn unrepresentable_combinations_are_reported() {
        let e = ExpandedTimestamp::date(3_000, 1, 1);
        assert_eq!(
            e.pack(),
            Err(Error::Unrepresentable {
                field: "year",
                format: Format::Modern
            })
        );

        let e = ExpandedTimestamp::date(-60_000, 1, 1).with_time(1, 2, 3, 0, 0);
        assert_eq!(
            e.pack(),
            Err(Error::Unrepresentable {
                field: "seconds",
                format: Format::Prehistoric
            })
        );

        let mut e = ExpandedTimestamp::date(2_000, 1, 1);
        e.precision = 3;
        e.unspecified.remove(Unspecified::PRECISION);
        assert_eq!(
            e.pack(),
            Err(Error::Unrepresentable {
                field: "precision",
                format: Format::Modern
            })
        );

        let mut e = ExpandedTimestamp::date(2_000, 1, 1);
        e.format = Format::Prehistoric;
        e.unspecified.insert(
            Unspecified::SECONDS | Unspecified::MILLISECONDS | Unspecified::MICROSECONDS,
        );
        assert_eq!(
            e.pack(),
            Err(Error::Unrepresentable {
                field: "year",
                format: Format::Prehistoric
            })
        );
    }

    #[test]
    fn time_of_day_ignores_flags() {
        let e = ExpandedTimestamp::date(2_000, 1, 1).with_time(1, 1, 1, 1, 1);
        assert_eq!(e.time_of_day_us(), 3_661_001_001);
    }
}
