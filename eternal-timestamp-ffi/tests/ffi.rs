// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2026 Vallés Puig, Ramon

//! FFI boundary tests: exercises the exported C functions through Rust.

use eternal_timestamp_ffi::*;
use std::ffi::CStr;

const RESERVED: u64 = 1 << 63;

fn full_2024() -> EtsTm {
    EtsTm {
        prehistoric: false,
        large_year: 0,
        century: 0,
        year_sans_epoch: 0,
        year: 2024,
        month: 3,
        day: 15,
        hour: 9,
        minute: 5,
        seconds: 7,
        milliseconds: 123,
        microseconds: 456,
        precision: 0,
        // precision only
        unspecified: 1 << 9,
    }
}

fn pack(tm: EtsTm) -> u64 {
    let mut t = 0;
    assert_eq!(unsafe { ets_from_tm(tm, &mut t) }, EtsStatus::Ok);
    t
}

// ─── Null-pointer guards ──────────────────────────────────────────────────

#[test]
fn out_pointers_are_checked() {
    let null_u64 = std::ptr::null_mut::<u64>();
    let null_f64 = std::ptr::null_mut::<f64>();
    unsafe {
        assert_eq!(ets_now(null_u64), EtsStatus::NullPointer);
        assert_eq!(ets_today(null_u64), EtsStatus::NullPointer);
        assert_eq!(ets_today_at(1, 2, 3, null_u64), EtsStatus::NullPointer);
        assert_eq!(ets_normalize(0, 0, null_u64), EtsStatus::NullPointer);
        assert_eq!(ets_from_tm(full_2024(), null_u64), EtsStatus::NullPointer);
        assert_eq!(ets_to_tm(0, std::ptr::null_mut()), EtsStatus::NullPointer);
        assert_eq!(ets_to_time_t(0, std::ptr::null_mut()), EtsStatus::NullPointer);
        assert_eq!(ets_from_time_t(0, null_u64), EtsStatus::NullPointer);
        assert_eq!(ets_to_filetime(0, std::ptr::null_mut()), EtsStatus::NullPointer);
        assert_eq!(
            ets_from_filetime(EtsFileTime::default(), null_u64),
            EtsStatus::NullPointer
        );
        assert_eq!(ets_to_etdb_real(0, null_f64), EtsStatus::NullPointer);
        assert_eq!(ets_from_etdb_real(0.0, null_u64), EtsStatus::NullPointer);
        assert_eq!(ets_to_proleptic_real(0, null_f64), EtsStatus::NullPointer);
        assert_eq!(ets_from_proleptic_real(0.0, null_u64), EtsStatus::NullPointer);
        assert_eq!(
            ets_etdb_real_offset(2000, 1, 1, 0, 0, 0, 0, null_f64),
            EtsStatus::NullPointer
        );
        assert_eq!(
            ets_render(0, false, std::ptr::null_mut(), 64),
            EtsStatus::NullPointer
        );
    }
}

// ─── Construction and predicates ──────────────────────────────────────────

#[test]
fn epoch_and_unknown() {
    assert_eq!(ets_epoch(), 0);
    assert_eq!(ets_unknown(), 0x3FFF_FFFF_FFFF_FFFF);
    assert!(ets_has_complete_date(ets_epoch()));
    assert!(ets_has_time(ets_epoch()));
    assert!(!ets_has_century(ets_unknown()));
    assert!(ets_is_partial_timestamp(ets_unknown()));
    assert!(ets_is_modern_format(ets_unknown()));
    assert!(!ets_is_prehistoric_format(ets_unknown()));
}

#[test]
fn reserved_bit_knows_nothing() {
    let t = RESERVED | ets_epoch();
    assert!(!ets_is_valid(t));
    assert_eq!(ets_validate(t), EtsStatus::ReservedBit);
    assert!(!ets_has_day(t));
    assert!(!ets_is_modern_format(t));
    assert_eq!(ets_fast_delta(t, 0), 0);
    assert!(ets_approx_delta(t, 0).is_nan());
}

#[test]
fn tm_roundtrip() {
    let t = pack(full_2024());
    assert!(ets_is_valid(t));
    assert!(!ets_is_partial_timestamp(t));
    assert!(ets_has_hh_mm_ss(t));
    assert!(ets_has_microseconds(t));

    let mut tm = full_2024();
    tm.year = 0;
    assert_eq!(unsafe { ets_to_tm(t, &mut tm) }, EtsStatus::Ok);
    assert_eq!(tm.year, 2024);
    assert_eq!(tm.century, 501);
    assert_eq!(tm.year_sans_epoch, 24);
    assert_eq!((tm.month, tm.day), (3, 15));
    assert_eq!(tm.microseconds, 456);
    assert_eq!(tm.unspecified, 1 << 9);
}

#[test]
fn tm_errors() {
    let mut bad = full_2024();
    bad.month = 13;
    let mut t = 0;
    assert_eq!(unsafe { ets_from_tm(bad, &mut t) }, EtsStatus::FieldOutOfRange);

    let mut ancient = full_2024();
    ancient.prehistoric = true;
    ancient.year = -60_000;
    assert_eq!(
        unsafe { ets_from_tm(ancient, &mut t) },
        EtsStatus::Unrepresentable
    );

    // Seconds and below unspecified, precision exact.
    ancient.unspecified = 0b111;
    assert_eq!(unsafe { ets_from_tm(ancient, &mut t) }, EtsStatus::Ok);
    assert!(ets_is_prehistoric_format(t));
    assert!(ets_has_complete_date(t));
    assert!(!ets_has_seconds(t));
}

#[test]
fn normalize_and_deltas() {
    let base = pack(full_2024());
    let mut partial_tm = full_2024();
    partial_tm.unspecified |= 0b11111; // time of day
    let partial = pack(partial_tm);
    assert!(!ets_has_hour(partial));

    let mut out = 0;
    assert_eq!(unsafe { ets_normalize(partial, base, &mut out) }, EtsStatus::Ok);
    assert_eq!(out, base);
    assert!(ets_fast_delta(partial, base) > 0);

    let mut prehistoric = 0;
    let mut tm = full_2024();
    tm.prehistoric = true;
    tm.year = -60_000;
    tm.unspecified = 0b111;
    assert_eq!(unsafe { ets_from_tm(tm, &mut prehistoric) }, EtsStatus::Ok);
    assert_eq!(
        unsafe { ets_normalize(partial, prehistoric, &mut out) },
        EtsStatus::FormatMismatch
    );
    assert!(ets_approx_delta(prehistoric, base) < 0.0);
    assert_eq!(ets_approx_delta(base, base), 0.0);
}

// ─── Platform conversions ─────────────────────────────────────────────────

#[test]
fn time_t_and_filetime() {
    let mut t = 0;
    assert_eq!(unsafe { ets_from_time_t(0, &mut t) }, EtsStatus::Ok);
    let mut secs = -1;
    assert_eq!(unsafe { ets_to_time_t(t, &mut secs) }, EtsStatus::Ok);
    assert_eq!(secs, 0);

    let mut ft = EtsFileTime::default();
    assert_eq!(unsafe { ets_to_filetime(t, &mut ft) }, EtsStatus::Ok);
    let ticks = ((ft.high_date_time as u64) << 32) | ft.low_date_time as u64;
    assert_eq!(ticks, 116_444_736_000_000_000);

    let mut back = 0;
    assert_eq!(unsafe { ets_from_filetime(ft, &mut back) }, EtsStatus::Ok);
    assert_eq!(back, t);

    assert_eq!(
        unsafe { ets_to_time_t(ets_unknown(), &mut secs) },
        EtsStatus::IncompleteDate
    );
}

#[test]
fn clock_entry_points() {
    let mut now = 0;
    assert_eq!(unsafe { ets_now(&mut now) }, EtsStatus::Ok);
    assert!(ets_has_complete_date(now) && ets_has_time(now));

    let mut today = 0;
    assert_eq!(unsafe { ets_today_at(25, 30, 0, &mut today) }, EtsStatus::Ok);
    assert!(!ets_has_hour(today));
    assert!(ets_has_minute(today));
}

// ─── Reals ────────────────────────────────────────────────────────────────

#[test]
fn real_codec() {
    let mut v = f64::NAN;
    unsafe {
        assert_eq!(ets_etdb_real_offset(2001, 1, 1, 0, 0, 0, 0, &mut v), EtsStatus::Ok);
    }
    assert_eq!(v, 462.0);

    let t = pack(full_2024());
    let mut etdb = 0.0;
    assert_eq!(unsafe { ets_to_etdb_real(t, &mut etdb) }, EtsStatus::Ok);
    let mut back = 0;
    assert_eq!(unsafe { ets_from_etdb_real(etdb, &mut back) }, EtsStatus::Ok);
    assert!(ets_has_complete_date(back));
    assert!(ets_has_minute(back));

    let mut pro = 0.0;
    assert_eq!(unsafe { ets_to_proleptic_real(t, &mut pro) }, EtsStatus::Ok);
    assert!(pro > etdb);
    assert_eq!(unsafe { ets_from_proleptic_real(pro, &mut back) }, EtsStatus::Ok);
    assert!(ets_has_complete_date(back));

    unsafe {
        assert_eq!(ets_from_etdb_real(f64::NAN, &mut back), EtsStatus::NotFinite);
        assert_eq!(ets_from_etdb_real(1e10, &mut back), EtsStatus::RealOutOfRange);
        assert_eq!(ets_from_etdb_real(1e18, &mut back), EtsStatus::PrecisionLoss);
        assert_eq!(ets_to_etdb_real(RESERVED, &mut v), EtsStatus::ReservedBit);
        for year in [i64::MIN, i64::MAX] {
            assert_eq!(
                ets_etdb_real_offset(year, 1, 1, 0, 0, 0, 0, &mut v),
                EtsStatus::Unrepresentable
            );
        }
    }
}

// ─── Rendering ────────────────────────────────────────────────────────────

#[test]
fn render_into_buffer() {
    let t = pack(full_2024());
    let mut buf = [0 as std::ffi::c_char; 64];
    let status = unsafe { ets_render(t, true, buf.as_mut_ptr(), buf.len()) };
    assert_eq!(status, EtsStatus::Ok);
    let text = unsafe { CStr::from_ptr(buf.as_ptr()) };
    assert_eq!(
        text.to_str().unwrap(),
        "\"(Modern)2024.3.15(T)09:05:07.123.456\""
    );

    let mut small = [0 as std::ffi::c_char; 8];
    assert_eq!(
        unsafe { ets_render(t, false, small.as_mut_ptr(), small.len()) },
        EtsStatus::BufferTooSmall
    );
    assert_eq!(
        unsafe { ets_render(RESERVED, false, buf.as_mut_ptr(), buf.len()) },
        EtsStatus::ReservedBit
    );
}

#[test]
fn version() {
    assert_eq!(ets_ffi_version(), 100);
}
