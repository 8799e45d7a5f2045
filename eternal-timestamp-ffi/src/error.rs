// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2026 Vallés Puig, Ramon

use eternal_timestamp::Error;

/// Status codes returned by eternal-timestamp-ffi functions.
///
/// cbindgen:prefix-with-name
#[repr(i32)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EtsStatus {
    /// Success.
    Ok = 0,
    /// A required pointer was null.
    NullPointer = 1,
    /// Bit 63 of the word is set.
    ReservedBit = 2,
    /// A field holds a value outside its legal range.
    FieldOutOfRange = 3,
    /// A field cannot be stored in the requested variant.
    Unrepresentable = 4,
    /// The two timestamps use different variants.
    FormatMismatch = 5,
    /// The real value is NaN or infinite.
    NotFinite = 6,
    /// The real value lies outside the timestamp range.
    RealOutOfRange = 7,
    /// The real value is too large to recover any field.
    PrecisionLoss = 8,
    /// Year, month or day is unspecified.
    IncompleteDate = 9,
    /// The target platform type cannot hold the timestamp.
    NotRepresentable = 10,
    /// The output buffer is too small.
    BufferTooSmall = 11,
    /// An internal panic was caught at the boundary.
    Panic = 12,
}

impl From<Error> for EtsStatus {
    fn from(e: Error) -> Self {
        match e {
            Error::ReservedBit(_) => EtsStatus::ReservedBit,
            Error::FieldOutOfRange { .. } => EtsStatus::FieldOutOfRange,
            Error::Unrepresentable { .. } => EtsStatus::Unrepresentable,
            Error::FormatMismatch { .. } => EtsStatus::FormatMismatch,
            Error::NotFinite(_) => EtsStatus::NotFinite,
            Error::RealOutOfRange(_) => EtsStatus::RealOutOfRange,
            Error::PrecisionLoss(_) => EtsStatus::PrecisionLoss,
            Error::IncompleteDate => EtsStatus::IncompleteDate,
            Error::NotRepresentable { .. } => EtsStatus::NotRepresentable,
        }
    }
}
