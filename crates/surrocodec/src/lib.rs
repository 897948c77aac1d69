//! Streaming UTF-16 surrogate codec core.
//!
//! `surrocodec` sits between a *scalar codec* (something that turns bytes of a
//! custom text encoding into Unicode scalar values and back) and the UTF-16
//! code units used by host text APIs. The scalar codec is supplied by the
//! caller through [`ScalarEncoder`] / [`ScalarDecoder`]; this crate handles
//! everything that is encoding-agnostic:
//!
//! - composing and splitting surrogate pairs ([`SurrogateComposer`]),
//! - buffering state that spans chunked calls (the `flush` flag),
//! - measuring passes that agree exactly with the writing passes,
//! - pluggable substitution of malformed input ([`FallbackPolicy`]).
//!
//! ```rust
//! use surrocodec::{DecodeEngine, EncodeEngine, codecs::Utf8Codec};
//!
//! let units: Vec<u16> = "a\u{1F600}".encode_utf16().collect();
//!
//! let mut encoder = EncodeEngine::new(Utf8Codec::new());
//! let bytes = encoder.encode_to_vec(&units, true).unwrap();
//! assert_eq!(bytes, "a\u{1F600}".as_bytes());
//!
//! let mut decoder = DecodeEngine::new(Utf8Codec::new());
//! assert_eq!(decoder.decode_to_vec(&bytes, true).unwrap(), units);
//! ```
//!
//! Engines are synchronous and not meant to be shared between threads while a
//! stream is in flight; calls on one engine must follow the order in which the
//! stream was produced.

#![no_std]
extern crate alloc;

#[cfg(test)]
extern crate std;

mod logging;

mod composer;
mod decoder;
mod encoder;
mod error;
mod fallback;
mod scalar;

#[cfg(feature = "codecs")]
pub mod codecs;

#[cfg(test)]
mod tests;

pub use composer::{Composed, Steps, SurrogateComposer};
pub use decoder::DecodeEngine;
pub use encoder::EncodeEngine;
pub use error::{DecodeError, EmptyReplacement, EncodeError, FallbackError};
pub use fallback::{FallbackPolicy, ReplacementFallback, StrictFallback};
pub use scalar::{Assessed, Decoded, Plane, ScalarDecoder, ScalarEncoder};

/// The Unicode replacement character as a UTF-16 code unit.
pub const REPLACEMENT_UNIT: u16 = 0xFFFD;
