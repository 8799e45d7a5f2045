// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2026 Vallés Puig, Ramon

//! Conversions to and from platform time representations.
//!
//! | Representation | Into packed | Out of packed |
//! |----------------|-------------|---------------|
//! | `chrono::DateTime<Utc>` | [`from_datetime`](PackedTimestamp::from_datetime) | [`to_datetime`](PackedTimestamp::to_datetime) |
//! | `chrono::NaiveDateTime` | [`from_naive`](PackedTimestamp::from_naive) | [`to_naive`](PackedTimestamp::to_naive) |
//! | POSIX seconds | [`from_unix_time`](PackedTimestamp::from_unix_time) | [`to_unix_time`](PackedTimestamp::to_unix_time) |
//! | Windows file time | [`from_filetime`](PackedTimestamp::from_filetime) | [`to_filetime`](PackedTimestamp::to_filetime) |
//!
//! Going out of the packed form needs a complete date; unspecified time fields
//! read as zero. Going in picks the variant from the year, and a prehistoric
//! result is marked exact to the year. Nothing is silently truncated except
//! sub-microsecond digits (and the extra second chrono uses for leap seconds,
//! which is clipped to the last microsecond of the minute).

use crate::error::{Error, Result};
use crate::layout::MODERN_BASE_YEAR;
use crate::PackedTimestamp;
use chrono::{DateTime, Datelike, NaiveDate, NaiveDateTime, NaiveTime, Timelike, Utc};

const NANOS_PER_SECOND: u32 = 1_000_000_000;

/// Seconds between 1601-01-01T00:00:00Z and the Unix epoch.
const FILETIME_UNIX_OFFSET_SECS: i64 = 11_644_473_600;

/// File time ticks per second (one tick is 100 ns).
const FILETIME_TICKS_PER_SECOND: i64 = 10_000_000;

/// A Windows `FILETIME`: 100 ns ticks since 1601-01-01T00:00:00Z, split into
/// two 32-bit words with the platform struct's memory layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[repr(C)]
pub struct FileTime {
    pub low_date_time: u32,
    pub high_date_time: u32,
}

impl FileTime {
    pub const fn from_ticks(ticks: u64) -> Self {
        Self {
            low_date_time: ticks as u32,
            high_date_time: (ticks >> 32) as u32,
        }
    }

    pub const fn ticks(self) -> u64 {
        ((self.high_date_time as u64) << 32) | self.low_date_time as u64
    }
}

fn not_representable(t: PackedTimestamp, target: &'static str) -> Error {
    log::debug!("{t:?} is not representable as {target}");
    Error::NotRepresentable { target }
}

impl PackedTimestamp {
    /// Pack a chrono date-time.
    ///
    /// Years before −48100 produce a prehistoric value exact to the year,
    /// with seconds and below dropped.
    pub fn from_naive(dt: NaiveDateTime) -> Result<Self> {
        let year = dt.year() as i64;
        if year < MODERN_BASE_YEAR {
            return Ok(PackedTimestamp::prehistoric()
                .year(year)
                .precision(0)
                .month(dt.month() as i64)
                .day(dt.day() as i64)
                .hour(dt.hour() as i64)
                .minute(dt.minute() as i64)
                .build());
        }
        if year > crate::layout::MODERN_MAX_YEAR {
            log::debug!("{dt} lies past the modern range");
            return Err(Error::Unrepresentable {
                field: "year",
                format: crate::Format::Modern,
            });
        }
        let micros = dt.nanosecond().min(NANOS_PER_SECOND - 1) / 1_000;
        Ok(PackedTimestamp::modern()
            .year(year)
            .month(dt.month() as i64)
            .day(dt.day() as i64)
            .hour(dt.hour() as i64)
            .minute(dt.minute() as i64)
            .seconds(dt.second() as i64)
            .milliseconds((micros / 1_000) as i64)
            .microseconds((micros % 1_000) as i64)
            .build())
    }

    /// [`from_naive`](Self::from_naive) for a UTC instant.
    pub fn from_datetime(dt: DateTime<Utc>) -> Result<Self> {
        Self::from_naive(dt.naive_utc())
    }

    /// Unpack into a chrono date-time.
    ///
    /// Fails with [`Error::IncompleteDate`] unless the year, month and day are
    /// all known, and with [`Error::NotRepresentable`] when the date does not
    /// exist in the proleptic Gregorian calendar or lies outside chrono's range.
    pub fn to_naive(self) -> Result<NaiveDateTime> {
        self.validate()?;
        if !self.has_complete_date() {
            return Err(Error::IncompleteDate);
        }
        let e = self.expand();
        let year = e
            .full_year()
            .and_then(|y| i32::try_from(y).ok())
            .ok_or_else(|| not_representable(self, "NaiveDateTime"))?;
        let date = NaiveDate::from_ymd_opt(year, e.month, e.day)
            .ok_or_else(|| not_representable(self, "NaiveDateTime"))?;
        let time = NaiveTime::from_hms_micro_opt(
            e.hour,
            e.minute,
            e.seconds,
            e.milliseconds * 1_000 + e.microseconds,
        )
        .ok_or_else(|| not_representable(self, "NaiveDateTime"))?;
        Ok(date.and_time(time))
    }

    /// [`to_naive`](Self::to_naive) read as UTC.
    pub fn to_datetime(self) -> Result<DateTime<Utc>> {
        Ok(self.to_naive()?.and_utc())
    }

    /// Pack POSIX time (seconds since 1970-01-01T00:00:00Z).
    pub fn from_unix_time(secs: i64) -> Result<Self> {
        let dt = DateTime::from_timestamp(secs, 0).ok_or_else(|| {
            log::debug!("unix time {secs} is outside chrono's range");
            Error::NotRepresentable {
                target: "DateTime<Utc>",
            }
        })?;
        Self::from_datetime(dt)
    }

    /// POSIX time, truncating sub-second fields.
    pub fn to_unix_time(self) -> Result<i64> {
        Ok(self.to_datetime()?.timestamp())
    }

    /// Pack a Windows file time.
    pub fn from_filetime(ft: FileTime) -> Result<Self> {
        let ticks = ft.ticks();
        let secs = (ticks / FILETIME_TICKS_PER_SECOND as u64) as i64 - FILETIME_UNIX_OFFSET_SECS;
        let nanos = (ticks % FILETIME_TICKS_PER_SECOND as u64) as u32 * 100;
        let dt = DateTime::from_timestamp(secs, nanos).ok_or_else(|| {
            log::debug!("file time {ticks} is outside chrono's range");
            Error::NotRepresentable {
                target: "DateTime<Utc>",
            }
        })?;
        Self::from_datetime(dt)
    }

    /// Windows file time. Dates before 1601 are not representable.
    pub fn to_filetime(self) -> Result<FileTime> {
        let dt = self.to_datetime()?;
        let ticks = dt
            .timestamp()
            .checked_add(FILETIME_UNIX_OFFSET_SECS)
            .and_then(|s| s.checked_mul(FILETIME_TICKS_PER_SECOND))
            .and_then(|t| t.checked_add((dt.timestamp_subsec_nanos() / 100) as i64))
            .and_then(|t| u64::try_from(t).ok())
            .ok_or_else(|| not_representable(self, "FILETIME"))?;
        Ok(FileTime::from_ticks(ticks))
    }
}

impl TryFrom<DateTime<Utc>> for PackedTimestamp {
    type Error = Error;

    fn try_from(dt: DateTime<Utc>) -> Result<Self> {
        Self::from_datetime(dt)
    }
}

impl TryFrom<PackedTimestamp> for DateTime<Utc> {
    type Error = Error;

    fn try_from(t: PackedTimestamp) -> Result<Self> {
        t.to_datetime()
    }
}
