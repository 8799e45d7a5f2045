// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2026 Vallés Puig, Ramon

//! Error type shared by every fallible conversion in the crate.
//!
//! Construction never fails: out-of-domain inputs are clipped to the field's
//! "unspecified" sentinel. Errors only arise when an existing value has to be
//! carried into a representation that cannot hold it.

use crate::Format;

/// Failure of a conversion into or out of [`PackedTimestamp`](crate::PackedTimestamp).
#[derive(thiserror::Error, Debug, Clone, Copy, PartialEq)]
pub enum Error {
    /// Bit 63 is reserved and must stay zero.
    #[error("reserved bit 63 is set in {0:#018x}")]
    ReservedBit(u64),

    /// A specified field holds a value outside its legal domain.
    #[error("{field} value {value} is outside its legal range")]
    FieldOutOfRange { field: &'static str, value: i64 },

    /// The target variant has no room for this field.
    #[error("{field} cannot be represented in the {format} format")]
    Unrepresentable {
        field: &'static str,
        format: Format,
    },

    /// Two timestamps that must share a variant do not.
    #[error("expected a {expected} timestamp, found a {found} one")]
    FormatMismatch { expected: Format, found: Format },

    /// NaN or an infinity was handed to a real decoder.
    #[error("real value {0} is not finite")]
    NotFinite(f64),

    /// The real decodes to a digit beyond the timestamp range.
    #[error("real value {0} lies outside the timestamp range")]
    RealOutOfRange(f64),

    /// The mantissa cannot separate adjacent values of even the coarsest field.
    #[error("real value {0} is too large to recover its fields unambiguously")]
    PrecisionLoss(f64),

    /// The operation needs century, year, month and day to be known.
    #[error("timestamp does not carry a complete date")]
    IncompleteDate,

    /// An external representation cannot hold the timestamp.
    #[error("timestamp cannot be represented as {target}")]
    NotRepresentable { target: &'static str },
}

/// Crate-wide result alias.
pub type Result<T, E = Error> = std::result::Result<T, E>;
