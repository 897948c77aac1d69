use bstr::BString;
use thiserror::Error;

/// A fallback policy refused to substitute malformed input.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FallbackError {
    /// A high surrogate without its low surrogate, or a lone low surrogate.
    #[error("unpaired surrogate U+{unit:04X} at index {index}")]
    UnpairedSurrogate {
        /// The offending code unit.
        unit: u16,
        /// Stream offset of the unit, in code units.
        index: usize,
    },
    /// A byte run the scalar codec cannot decode.
    #[error("undecodable bytes {bytes:?} at index {index}")]
    Undecodable {
        /// The offending bytes as seen by the current call.
        bytes: BString,
        /// Stream offset of the run, in bytes.
        index: usize,
    },
}

/// A [`ReplacementFallback`](crate::ReplacementFallback) was given an empty
/// replacement, which would silently delete malformed input.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
#[error("fallback replacement must not be empty")]
pub struct EmptyReplacement;

/// Errors produced by [`EncodeEngine`](crate::EncodeEngine).
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EncodeError {
    /// The destination buffer cannot hold the next scalar value.
    #[error("insufficient output space: {needed} bytes needed at offset {offset}, capacity {capacity}")]
    InsufficientSpace {
        /// Write offset at which the scalar value would start.
        offset: usize,
        /// Bytes required by the scalar value.
        needed: usize,
        /// Total length of the destination buffer.
        capacity: usize,
    },
    /// The installed fallback policy rejected the input.
    #[error("encoding fallback error: {0}")]
    Fallback(#[from] FallbackError),
    /// A fallback substitute itself contained an unpaired surrogate.
    #[error("fallback substitute for index {index} contains unpaired surrogate U+{unit:04X}")]
    RecursiveFallback {
        /// The unpaired unit inside the substitute.
        unit: u16,
        /// Stream offset of the input unit being substituted.
        index: usize,
    },
}

/// Errors produced by [`DecodeEngine`](crate::DecodeEngine).
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DecodeError {
    /// The destination buffer cannot hold the next code unit(s).
    #[error("insufficient output space: {needed} units needed at offset {offset}, capacity {capacity}")]
    InsufficientSpace {
        /// Write offset at which the units would start.
        offset: usize,
        /// Units required (2 for a surrogate pair, or a substitute's length).
        needed: usize,
        /// Total length of the destination buffer.
        capacity: usize,
    },
    /// The installed fallback policy rejected the input.
    #[error("decoding fallback error: {0}")]
    Fallback(#[from] FallbackError),
}
