// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2026 Vallés Puig, Ramon

//! FFI bindings for packed timestamps: construction, predicates, deltas and
//! conversions to `struct tm`-like, POSIX, FILETIME and real values.

use crate::catch_panic;
use crate::error::EtsStatus;
use eternal_timestamp::{
    approx_delta, etdb_real_offset, fast_delta, render, ExpandedTimestamp, FileTime, Format,
    PackedTimestamp, SystemClock, Unspecified,
};
use qtty::Days;
use std::ffi::c_char;

// ═══════════════════════════════════════════════════════════════════════════
// C-repr types
// ═══════════════════════════════════════════════════════════════════════════

/// Per-field breakdown of a timestamp, akin to `struct tm`.
///
/// Month and day are 1-based. `unspecified` uses the bit positions
/// microseconds = 0 up to epochs = 8 and precision = 9. `large_year`, when
/// non-zero, overrides `year`; it is set on output only for years that do not
/// fit a 32-bit integer.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EtsTm {
    pub prehistoric: bool,
    pub large_year: i64,
    pub century: u32,
    pub year_sans_epoch: u32,
    pub year: i32,
    pub month: u32,
    pub day: u32,
    pub hour: u32,
    pub minute: u32,
    pub seconds: u32,
    pub milliseconds: u32,
    pub microseconds: u32,
    pub precision: u32,
    pub unspecified: u32,
}

impl From<ExpandedTimestamp> for EtsTm {
    fn from(e: ExpandedTimestamp) -> Self {
        Self {
            prehistoric: e.format == Format::Prehistoric,
            large_year: e.large_year.unwrap_or(0),
            century: e.century,
            year_sans_epoch: e.year_sans_epoch,
            year: e.year,
            month: e.month,
            day: e.day,
            hour: e.hour,
            minute: e.minute,
            seconds: e.seconds,
            milliseconds: e.milliseconds,
            microseconds: e.microseconds,
            precision: e.precision,
            unspecified: e.unspecified.bits(),
        }
    }
}

impl EtsTm {
    fn into_expanded(self) -> ExpandedTimestamp {
        ExpandedTimestamp {
            format: if self.prehistoric {
                Format::Prehistoric
            } else {
                Format::Modern
            },
            large_year: (self.large_year != 0).then_some(self.large_year),
            century: self.century,
            year_sans_epoch: self.year_sans_epoch,
            year: self.year,
            month: self.month,
            day: self.day,
            hour: self.hour,
            minute: self.minute,
            seconds: self.seconds,
            milliseconds: self.milliseconds,
            microseconds: self.microseconds,
            precision: self.precision,
            unspecified: Unspecified::from_bits_truncate(self.unspecified),
        }
    }
}

/// Windows `FILETIME` layout: 100 ns ticks since 1601-01-01, split in two words.
#[repr(C)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EtsFileTime {
    pub low_date_time: u32,
    pub high_date_time: u32,
}

impl From<FileTime> for EtsFileTime {
    fn from(ft: FileTime) -> Self {
        Self {
            low_date_time: ft.low_date_time,
            high_date_time: ft.high_date_time,
        }
    }
}

impl From<EtsFileTime> for FileTime {
    fn from(ft: EtsFileTime) -> Self {
        FileTime {
            low_date_time: ft.low_date_time,
            high_date_time: ft.high_date_time,
        }
    }
}

// ── helpers ───────────────────────────────────────────────────────────────

#[inline]
fn packed(t: u64) -> Option<PackedTimestamp> {
    PackedTimestamp::from_bits(t).ok()
}

/// Write `result` through `out` or map its error to a status.
///
/// # Safety
/// `out` must be non-null, aligned and writable.
unsafe fn store<T>(out: *mut T, result: eternal_timestamp::Result<T>) -> EtsStatus {
    match result {
        Ok(value) => {
            unsafe { *out = value };
            EtsStatus::Ok
        }
        Err(e) => e.into(),
    }
}

// ═══════════════════════════════════════════════════════════════════════════
// Construction
// ═══════════════════════════════════════════════════════════════════════════

/// The all-zero timestamp, `-48100-01-01T00:00:00.000000`.
#[no_mangle]
pub extern "C" fn ets_epoch() -> u64 {
    PackedTimestamp::epoch().bits()
}

/// The timestamp with every field unspecified.
#[no_mangle]
pub extern "C" fn ets_unknown() -> u64 {
    PackedTimestamp::unknown().bits()
}

/// The current UTC moment.
///
/// # Safety
/// `out` must be a valid, writable pointer to `uint64_t`.
#[no_mangle]
pub unsafe extern "C" fn ets_now(out: *mut u64) -> EtsStatus {
    catch_panic!(EtsStatus::Panic, {
        if out.is_null() {
            return EtsStatus::NullPointer;
        }
        unsafe { store(out, PackedTimestamp::now(&SystemClock).map(PackedTimestamp::bits)) }
    })
}

/// Today's UTC date with the time fields at zero.
///
/// # Safety
/// `out` must be a valid, writable pointer to `uint64_t`.
#[no_mangle]
pub unsafe extern "C" fn ets_today(out: *mut u64) -> EtsStatus {
    catch_panic!(EtsStatus::Panic, {
        if out.is_null() {
            return EtsStatus::NullPointer;
        }
        unsafe { store(out, PackedTimestamp::today(&SystemClock).map(PackedTimestamp::bits)) }
    })
}

/// Today's UTC date at the given time; out-of-range time values become
/// unspecified.
///
/// # Safety
/// `out` must be a valid, writable pointer to `uint64_t`.
#[no_mangle]
pub unsafe extern "C" fn ets_today_at(
    hour: i32,
    minute: i32,
    second: i32,
    out: *mut u64,
) -> EtsStatus {
    catch_panic!(EtsStatus::Panic, {
        if out.is_null() {
            return EtsStatus::NullPointer;
        }
        let t = PackedTimestamp::today_at(&SystemClock, hour.into(), minute.into(), second.into());
        unsafe { store(out, t.map(PackedTimestamp::bits)) }
    })
}

// ═══════════════════════════════════════════════════════════════════════════
// Validation
// ═══════════════════════════════════════════════════════════════════════════

#[no_mangle]
pub extern "C" fn ets_is_valid(t: u64) -> bool {
    packed(t).is_some_and(PackedTimestamp::is_valid)
}

/// `Ok`, or the status of the first problem found.
#[no_mangle]
pub extern "C" fn ets_validate(t: u64) -> EtsStatus {
    match PackedTimestamp::from_bits(t).and_then(PackedTimestamp::validate) {
        Ok(()) => EtsStatus::Ok,
        Err(e) => e.into(),
    }
}

#[no_mangle]
pub extern "C" fn ets_is_partial_timestamp(t: u64) -> bool {
    packed(t).is_some_and(PackedTimestamp::is_partial_timestamp)
}

/// Fill the unspecified fields of `t` from `base`.
///
/// # Safety
/// `out` must be a valid, writable pointer to `uint64_t`.
#[no_mangle]
pub unsafe extern "C" fn ets_normalize(t: u64, base: u64, out: *mut u64) -> EtsStatus {
    catch_panic!(EtsStatus::Panic, {
        if out.is_null() {
            return EtsStatus::NullPointer;
        }
        let result = PackedTimestamp::from_bits(t).and_then(|t| {
            let base = PackedTimestamp::from_bits(base)?;
            t.normalize(base)
        });
        unsafe { store(out, result.map(PackedTimestamp::bits)) }
    })
}

// ═══════════════════════════════════════════════════════════════════════════
// Predicates
// ═══════════════════════════════════════════════════════════════════════════

#[no_mangle]
pub extern "C" fn ets_is_modern_format(t: u64) -> bool {
    packed(t).is_some_and(PackedTimestamp::is_modern_format)
}

#[no_mangle]
pub extern "C" fn ets_is_prehistoric_format(t: u64) -> bool {
    packed(t).is_some_and(PackedTimestamp::is_prehistoric_format)
}

#[no_mangle]
pub extern "C" fn ets_has_century(t: u64) -> bool {
    packed(t).is_some_and(PackedTimestamp::has_century)
}

#[no_mangle]
pub extern "C" fn ets_has_year(t: u64) -> bool {
    packed(t).is_some_and(PackedTimestamp::has_year)
}

#[no_mangle]
pub extern "C" fn ets_has_century_and_year(t: u64) -> bool {
    packed(t).is_some_and(PackedTimestamp::has_century_and_year)
}

#[no_mangle]
pub extern "C" fn ets_has_age(t: u64) -> bool {
    packed(t).is_some_and(PackedTimestamp::has_age)
}

#[no_mangle]
pub extern "C" fn ets_has_month(t: u64) -> bool {
    packed(t).is_some_and(PackedTimestamp::has_month)
}

#[no_mangle]
pub extern "C" fn ets_has_day(t: u64) -> bool {
    packed(t).is_some_and(PackedTimestamp::has_day)
}

#[no_mangle]
pub extern "C" fn ets_has_hour(t: u64) -> bool {
    packed(t).is_some_and(PackedTimestamp::has_hour)
}

#[no_mangle]
pub extern "C" fn ets_has_minute(t: u64) -> bool {
    packed(t).is_some_and(PackedTimestamp::has_minute)
}

#[no_mangle]
pub extern "C" fn ets_has_seconds(t: u64) -> bool {
    packed(t).is_some_and(PackedTimestamp::has_seconds)
}

#[no_mangle]
pub extern "C" fn ets_has_milliseconds(t: u64) -> bool {
    packed(t).is_some_and(PackedTimestamp::has_milliseconds)
}

#[no_mangle]
pub extern "C" fn ets_has_microseconds(t: u64) -> bool {
    packed(t).is_some_and(PackedTimestamp::has_microseconds)
}

#[no_mangle]
pub extern "C" fn ets_has_complete_date(t: u64) -> bool {
    packed(t).is_some_and(PackedTimestamp::has_complete_date)
}

#[no_mangle]
pub extern "C" fn ets_has_time(t: u64) -> bool {
    packed(t).is_some_and(PackedTimestamp::has_time)
}

#[no_mangle]
pub extern "C" fn ets_has_hh_mm_ss(t: u64) -> bool {
    packed(t).is_some_and(PackedTimestamp::has_hh_mm_ss)
}

// ═══════════════════════════════════════════════════════════════════════════
// Deltas
// ═══════════════════════════════════════════════════════════════════════════

/// Signed difference of the raw words; only the sign is meaningful.
/// Words with the reserved bit set compare as zero.
#[no_mangle]
pub extern "C" fn ets_fast_delta(a: u64, b: u64) -> i64 {
    match (packed(a), packed(b)) {
        (Some(a), Some(b)) => fast_delta(a, b),
        _ => 0,
    }
}

/// Approximate `a - b` in days (12 months of 31 days). NaN when either word
/// has the reserved bit set.
#[no_mangle]
pub extern "C" fn ets_approx_delta(a: u64, b: u64) -> f64 {
    match (packed(a), packed(b)) {
        (Some(a), Some(b)) => {
            let days: Days = approx_delta(a, b);
            days.value()
        }
        _ => f64::NAN,
    }
}

// ═══════════════════════════════════════════════════════════════════════════
// struct tm
// ═══════════════════════════════════════════════════════════════════════════

/// Break `t` out into fields.
///
/// # Safety
/// `out` must be a valid, writable pointer to `EtsTm`.
#[no_mangle]
pub unsafe extern "C" fn ets_to_tm(t: u64, out: *mut EtsTm) -> EtsStatus {
    catch_panic!(EtsStatus::Panic, {
        if out.is_null() {
            return EtsStatus::NullPointer;
        }
        let result = PackedTimestamp::from_bits(t).and_then(|t| {
            t.validate()?;
            Ok(EtsTm::from(t.expand()))
        });
        unsafe { store(out, result) }
    })
}

/// Pack a field breakdown into the variant it names.
///
/// # Safety
/// `out` must be a valid, writable pointer to `uint64_t`.
#[no_mangle]
pub unsafe extern "C" fn ets_from_tm(tm: EtsTm, out: *mut u64) -> EtsStatus {
    catch_panic!(EtsStatus::Panic, {
        if out.is_null() {
            return EtsStatus::NullPointer;
        }
        unsafe { store(out, tm.into_expanded().pack().map(PackedTimestamp::bits)) }
    })
}

// ═══════════════════════════════════════════════════════════════════════════
// POSIX time and FILETIME
// ═══════════════════════════════════════════════════════════════════════════

/// Seconds since 1970-01-01T00:00:00Z. Needs a complete date.
///
/// # Safety
/// `out` must be a valid, writable pointer to `int64_t`.
#[no_mangle]
pub unsafe extern "C" fn ets_to_time_t(t: u64, out: *mut i64) -> EtsStatus {
    catch_panic!(EtsStatus::Panic, {
        if out.is_null() {
            return EtsStatus::NullPointer;
        }
        let result = PackedTimestamp::from_bits(t).and_then(PackedTimestamp::to_unix_time);
        unsafe { store(out, result) }
    })
}

/// # Safety
/// `out` must be a valid, writable pointer to `uint64_t`.
#[no_mangle]
pub unsafe extern "C" fn ets_from_time_t(secs: i64, out: *mut u64) -> EtsStatus {
    catch_panic!(EtsStatus::Panic, {
        if out.is_null() {
            return EtsStatus::NullPointer;
        }
        unsafe { store(out, PackedTimestamp::from_unix_time(secs).map(PackedTimestamp::bits)) }
    })
}

/// Windows file time. Needs a complete date on or after 1601-01-01.
///
/// # Safety
/// `out` must be a valid, writable pointer to `EtsFileTime`.
#[no_mangle]
pub unsafe extern "C" fn ets_to_filetime(t: u64, out: *mut EtsFileTime) -> EtsStatus {
    catch_panic!(EtsStatus::Panic, {
        if out.is_null() {
            return EtsStatus::NullPointer;
        }
        let result = PackedTimestamp::from_bits(t)
            .and_then(PackedTimestamp::to_filetime)
            .map(EtsFileTime::from);
        unsafe { store(out, result) }
    })
}

/// # Safety
/// `out` must be a valid, writable pointer to `uint64_t`.
#[no_mangle]
pub unsafe extern "C" fn ets_from_filetime(ft: EtsFileTime, out: *mut u64) -> EtsStatus {
    catch_panic!(EtsStatus::Panic, {
        if out.is_null() {
            return EtsStatus::NullPointer;
        }
        let result = PackedTimestamp::from_filetime(ft.into()).map(PackedTimestamp::bits);
        unsafe { store(out, result) }
    })
}

// ═══════════════════════════════════════════════════════════════════════════
// Real values
// ═══════════════════════════════════════════════════════════════════════════

/// Real value in day slots since 2000-01-01T00:00.
///
/// # Safety
/// `out` must be a valid, writable pointer to `double`.
#[no_mangle]
pub unsafe extern "C" fn ets_to_etdb_real(t: u64, out: *mut f64) -> EtsStatus {
    catch_panic!(EtsStatus::Panic, {
        if out.is_null() {
            return EtsStatus::NullPointer;
        }
        let result = PackedTimestamp::from_bits(t).and_then(PackedTimestamp::to_etdb_real);
        unsafe { store(out, result) }
    })
}

/// # Safety
/// `out` must be a valid, writable pointer to `uint64_t`.
#[no_mangle]
pub unsafe extern "C" fn ets_from_etdb_real(value: f64, out: *mut u64) -> EtsStatus {
    catch_panic!(EtsStatus::Panic, {
        if out.is_null() {
            return EtsStatus::NullPointer;
        }
        let result = PackedTimestamp::from_etdb_real(value).map(PackedTimestamp::bits);
        unsafe { store(out, result) }
    })
}

/// Real value in day slots since -4713-11-24T12:00 (Julian Day 0).
///
/// The day axis gives every month 31 slots and every year 462, so this is
/// not a Julian Day number away from its epoch. Do not pass it to SQLite
/// `julianday()` or other Julian Day consumers.
///
/// # Safety
/// `out` must be a valid, writable pointer to `double`.
#[no_mangle]
pub unsafe extern "C" fn ets_to_proleptic_real(t: u64, out: *mut f64) -> EtsStatus {
    catch_panic!(EtsStatus::Panic, {
        if out.is_null() {
            return EtsStatus::NullPointer;
        }
        let result = PackedTimestamp::from_bits(t).and_then(PackedTimestamp::to_proleptic_real);
        unsafe { store(out, result) }
    })
}

/// # Safety
/// `out` must be a valid, writable pointer to `uint64_t`.
#[no_mangle]
pub unsafe extern "C" fn ets_from_proleptic_real(value: f64, out: *mut u64) -> EtsStatus {
    catch_panic!(EtsStatus::Panic, {
        if out.is_null() {
            return EtsStatus::NullPointer;
        }
        let result = PackedTimestamp::from_proleptic_real(value).map(PackedTimestamp::bits);
        unsafe { store(out, result) }
    })
}

/// ETDB real of a fully specified modern moment; `subsecond_us` is in
/// microseconds.
///
/// # Safety
/// `out` must be a valid, writable pointer to `double`.
#[allow(clippy::too_many_arguments)]
#[no_mangle]
pub unsafe extern "C" fn ets_etdb_real_offset(
    year: i64,
    month: u32,
    day: u32,
    hour: u32,
    minute: u32,
    second: u32,
    subsecond_us: u32,
    out: *mut f64,
) -> EtsStatus {
    catch_panic!(EtsStatus::Panic, {
        if out.is_null() {
            return EtsStatus::NullPointer;
        }
        let result = etdb_real_offset(year, month, day, hour, minute, second, subsecond_us);
        unsafe { store(out, result) }
    })
}

// ═══════════════════════════════════════════════════════════════════════════
// Rendering
// ═══════════════════════════════════════════════════════════════════════════

/// Write the text form of `t` into `buf` as a NUL-terminated string.
///
/// Invalid words render as a diagnostic rather than failing.
///
/// # Safety
/// `buf` must point to at least `len` writable bytes.
#[no_mangle]
pub unsafe extern "C" fn ets_render(
    t: u64,
    quoted: bool,
    buf: *mut c_char,
    len: usize,
) -> EtsStatus {
    catch_panic!(EtsStatus::Panic, {
        if buf.is_null() {
            return EtsStatus::NullPointer;
        }
        let text = match PackedTimestamp::from_bits(t) {
            Ok(t) => render(t, quoted),
            Err(e) => return e.into(),
        };
        if text.len() >= len {
            return EtsStatus::BufferTooSmall;
        }
        unsafe {
            std::ptr::copy_nonoverlapping(text.as_ptr(), buf.cast::<u8>(), text.len());
            *buf.add(text.len()) = 0;
        }
        EtsStatus::Ok
    })
}
