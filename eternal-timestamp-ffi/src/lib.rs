// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2026 Vallés Puig, Ramon

//! C FFI bindings for **eternal-timestamp**.
//!
//! Timestamps cross the boundary as their raw `uint64_t` word. Fallible calls
//! return an [`EtsStatus`] and write their result through an out-pointer;
//! predicates return `bool` and treat a word with the reserved bit set as
//! knowing nothing.

mod error;
mod timestamp;

pub use error::*;
pub use timestamp::*;

/// Run `$body`, turning a panic into `$fallback` so it never unwinds into C.
#[doc(hidden)]
#[macro_export]
macro_rules! catch_panic {
    ($fallback:expr, $body:block) => {
        match ::std::panic::catch_unwind(::std::panic::AssertUnwindSafe(|| $body)) {
            Ok(value) => value,
            Err(_) => $fallback,
        }
    };
}

/// Returns the eternal-timestamp-ffi ABI version (semver-encoded: major*10000 + minor*100 + patch).
#[allow(clippy::erasing_op, clippy::identity_op)]
#[no_mangle]
pub extern "C" fn ets_ffi_version() -> u32 {
    0 * 10000 + 1 * 100 + 0 // 0.1.0
}
