// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2026 Vallés Puig, Ramon

//! Eternal Timestamp
//!
//! A timestamp packed into one 64-bit word that spans from hundreds of billions
//! of years ago to the year 2999, where any field may be left unspecified.
//!
//! # Core types
//!
//! - [`PackedTimestamp`]: the packed value, `Copy` and hashable. Its raw
//!   word orders like the date within each variant.
//! - [`Format`]: which variant a value uses (modern or prehistoric).
//! - [`ExpandedTimestamp`]: per-field form in everyday numbering, with an
//!   [`Unspecified`] mask.
//! - [`RealEpoch`]: marker trait for the zero point of the `f64` encoding
//!   ([`Etdb`], [`Proleptic`]).
//! - [`Clock`]: injectable source of "now".
//!
//! # Variants
//!
//! | Variant | Years | Finest field | Year precision |
//! |---------|-------|--------------|----------------|
//! | Modern | −48100..=2999 | microsecond | exact |
//! | Prehistoric | ≈ −274.9·10⁹..=−48101 | minute | `10^precision` years |
//!
//! # Example
//!
//! ```
//! use eternal_timestamp::{approx_delta, PackedTimestamp};
//!
//! let landing = PackedTimestamp::modern()
//!     .year(1969).month(7).day(20)
//!     .hour(20).minute(17)
//!     .build();
//! assert!(landing.has_complete_date());
//! assert!(!landing.has_seconds());
//!
//! let dinosaurs = PackedTimestamp::prehistoric()
//!     .year(-66_000_000)
//!     .precision(5)
//!     .build();
//! assert!(approx_delta(dinosaurs, landing).value() < 0.0);
//!
//! assert_eq!(landing.to_string(), "(Modern)1969.7.20(T)20:17:??.???.???");
//! ```

mod adapters;
mod clock;
mod delta;
mod error;
mod expanded;
mod format;
pub mod layout;
mod packed;
mod query;
mod real;

// ── Re-exports ────────────────────────────────────────────────────────────

pub use adapters::FileTime;
pub use clock::{Clock, FixedClock, SystemClock};
pub use delta::{approx_delta, fast_delta, APPROX_DAYS_PER_MONTH, APPROX_DAYS_PER_YEAR};
pub use error::{Error, Result};
pub use expanded::{ExpandedTimestamp, Unspecified};
pub use format::render;
pub use layout::clip_max_invalid;
pub use packed::{
    Fields, Format, ModernBuilder, ModernFields, PackedTimestamp, PrehistoricBuilder,
    PrehistoricFields,
};
pub use real::{etdb_real_offset, Etdb, Proleptic, RealEpoch};
