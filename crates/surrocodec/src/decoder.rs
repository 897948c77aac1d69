//! Bytes to UTF-16 code units.
//!
//! [`DecodeEngine`] drives a [`ScalarDecoder`] and splits every scalar value
//! above the BMP into a surrogate pair. The measuring pass only probes the
//! codec with [`ScalarDecoder::assess`]. The writing pass runs the same probe
//! walk against the output capacity first and decodes for real only once the
//! whole call is known to fit.

use alloc::{vec, vec::Vec};

use crate::{
    error::DecodeError,
    fallback::{FallbackPolicy, ReplacementFallback},
    logging::{debug, trace},
    scalar::{Assessed, Decoded, ScalarDecoder},
};

/// Validates a value produced by the codec.
///
/// A value outside the scalar ranges is a defect in the codec, not bad input.
fn checked_scalar(value: u32) -> char {
    match char::from_u32(value) {
        Some(scalar) => scalar,
        None => panic!(
            "scalar decoder produced U+{value:04X}, which is not a Unicode scalar value"
        ),
    }
}

/// Streaming decoder from the bytes of a custom encoding to UTF-16 code
/// units.
///
/// Bytes that end mid-value are held by the codec when `flush` is `false`
/// and completed by the next call. With `flush = true` any such tail is
/// substituted through the fallback policy.
///
/// # Examples
///
/// ```rust
/// use surrocodec::{DecodeEngine, codecs::Utf8Codec};
///
/// let bytes = "\u{1F600}!".as_bytes();
/// let mut engine = DecodeEngine::new(Utf8Codec::new());
/// let mut out = [0u16; 4];
///
/// // The emoji is split between the two calls.
/// assert_eq!(engine.measure(&bytes[..2], false).unwrap(), 0);
/// assert_eq!(engine.write(&bytes[..2], &mut out, false).unwrap(), 0);
/// assert_eq!(engine.measure(&bytes[2..], true).unwrap(), 3);
/// assert_eq!(engine.write(&bytes[2..], &mut out, true).unwrap(), 3);
/// assert_eq!(out[..3], [0xD83D, 0xDE00, 0x21]);
/// ```
#[derive(Debug, Clone)]
pub struct DecodeEngine<D, F = ReplacementFallback> {
    decoder: D,
    fallback: F,
    position: usize,
    scratch: Vec<u16>,
}

impl<D: ScalarDecoder> DecodeEngine<D> {
    /// Creates an engine that substitutes U+FFFD for undecodable bytes.
    #[must_use]
    pub fn new(decoder: D) -> Self {
        Self::with_fallback(decoder, ReplacementFallback::default())
    }
}

impl<D: ScalarDecoder, F: FallbackPolicy> DecodeEngine<D, F> {
    /// Creates an engine with a custom fallback policy.
    #[must_use]
    pub fn with_fallback(decoder: D, fallback: F) -> Self {
        Self {
            decoder,
            fallback,
            position: 0,
            scratch: Vec::new(),
        }
    }

    /// Number of code units [`write`](Self::write) would produce for the same
    /// `bytes` and `flush`.
    ///
    /// The first probe folds in continuation state left by earlier writes,
    /// exactly as the next write will. Nothing is committed.
    ///
    /// # Errors
    ///
    /// [`DecodeError::Fallback`] when the fallback policy rejects the input.
    pub fn measure(&self, bytes: &[u8], flush: bool) -> Result<usize, DecodeError> {
        self.plan(bytes, flush, None)
    }

    /// Walks `bytes` with [`ScalarDecoder::assess`] only, counting output
    /// units. With a `capacity`, stops at the first value that does not fit.
    fn plan(&self, bytes: &[u8], flush: bool, capacity: Option<usize>) -> Result<usize, DecodeError> {
        let mut count = 0;
        let mut pos = 0;
        let mut first = true;
        let mut scratch = Vec::new();
        loop {
            let (read, needed) = match self.decoder.assess(&bytes[pos..], first) {
                Assessed::Scalar { read, plane } => (read, plane.utf16_len()),
                Assessed::Invalid { read } => {
                    scratch.clear();
                    self.fallback
                        .undecodable_bytes(&bytes[pos..pos + read], self.position + pos, &mut scratch)?;
                    (read, scratch.len())
                }
                Assessed::Incomplete { read } => {
                    let held = read > 0 || (first && self.decoder.has_carry());
                    if flush && held {
                        scratch.clear();
                        self.fallback.undecodable_bytes(
                            &bytes[pos..pos + read],
                            self.position + pos,
                            &mut scratch,
                        )?;
                        fits(count, scratch.len(), capacity)?;
                        count += scratch.len();
                    }
                    break;
                }
            };
            fits(count, needed, capacity)?;
            count += needed;
            pos += read;
            first = false;
        }
        Ok(count)
    }

    /// Decodes `bytes` into `out` and returns the number of code units
    /// written.
    ///
    /// The call is checked against `out` and the fallback policy before the
    /// codec is driven, so on error nothing is written and the codec keeps
    /// the continuation state it had before the call. A retry with a larger
    /// buffer continues the stream.
    ///
    /// # Errors
    ///
    /// - [`DecodeError::InsufficientSpace`] when `out` is too small; the
    ///   offset names the first value (a surrogate pair or a whole
    ///   substitute) that would not fit.
    /// - [`DecodeError::Fallback`] when the fallback policy rejects the input.
    ///
    /// # Panics
    ///
    /// When the scalar decoder produces a value that is not a Unicode scalar
    /// value (a surrogate or above U+10FFFF).
    pub fn write(&mut self, bytes: &[u8], out: &mut [u16], flush: bool) -> Result<usize, DecodeError> {
        let planned = self.plan(bytes, flush, Some(out.len()))?;
        let mut offset = 0;
        let mut pos = 0;
        loop {
            match self.decoder.decode(&bytes[pos..]) {
                Decoded::Scalar { read, value } => {
                    let mut pair = [0u16; 2];
                    let units = checked_scalar(value).encode_utf16(&mut pair);
                    offset = put(out, offset, units)?;
                    pos += read;
                }
                Decoded::Invalid { read } => {
                    self.substitute(&bytes[pos..pos + read], pos)?;
                    offset = put(out, offset, &self.scratch)?;
                    pos += read;
                }
                Decoded::Incomplete { read } => {
                    if flush && self.decoder.has_carry() {
                        trace!("flushing incomplete byte run");
                        self.substitute(&bytes[pos..pos + read], pos)?;
                        offset = put(out, offset, &self.scratch)?;
                        self.decoder.reset();
                    }
                    break;
                }
            }
        }
        debug_assert_eq!(offset, planned, "assess and decode disagree");
        self.position += bytes.len();
        Ok(offset)
    }

    /// Measures, allocates exactly, and writes.
    ///
    /// # Errors
    ///
    /// As for [`write`](Self::write), except that space never runs out.
    pub fn decode_to_vec(&mut self, bytes: &[u8], flush: bool) -> Result<Vec<u16>, DecodeError> {
        let len = self.measure(bytes, flush)?;
        let mut out = vec![0; len];
        let written = self.write(bytes, &mut out, flush)?;
        debug_assert_eq!(written, len);
        out.truncate(written);
        Ok(out)
    }

    /// Clears the codec's continuation state and the stream position.
    pub fn reset(&mut self) {
        trace!("resetting decode engine");
        self.decoder.reset();
        self.position = 0;
    }

    fn substitute(&mut self, run: &[u8], pos: usize) -> Result<(), DecodeError> {
        let index = self.position + pos;
        debug!(index, len = run.len(), "substituting undecodable bytes");
        self.scratch.clear();
        self.fallback.undecodable_bytes(run, index, &mut self.scratch)?;
        Ok(())
    }
}

fn fits(offset: usize, needed: usize, capacity: Option<usize>) -> Result<(), DecodeError> {
    match capacity {
        Some(capacity) if offset + needed > capacity => Err(DecodeError::InsufficientSpace {
            offset,
            needed,
            capacity,
        }),
        _ => Ok(()),
    }
}

/// Copies `units` to `out[offset..]` as a whole, returning the new offset.
fn put(out: &mut [u16], offset: usize, units: &[u16]) -> Result<usize, DecodeError> {
    let end = offset + units.len();
    let Some(dst) = out.get_mut(offset..end) else {
        return Err(DecodeError::InsufficientSpace {
            offset,
            needed: units.len(),
            capacity: out.len(),
        });
    };
    dst.copy_from_slice(units);
    Ok(end)
}

impl<D: ScalarDecoder, F> DecodeEngine<D, F> {
    /// Whether the codec holds continuation state from earlier calls.
    #[must_use]
    pub fn has_buffered_state(&self) -> bool {
        self.decoder.has_carry()
    }
}

impl<D, F> DecodeEngine<D, F> {
    /// Bytes consumed since construction or the last reset.
    #[must_use]
    pub fn position(&self) -> usize {
        self.position
    }

    /// The scalar decoder.
    pub fn decoder(&self) -> &D {
        &self.decoder
    }

    /// The fallback policy.
    pub fn fallback(&self) -> &F {
        &self.fallback
    }

    /// Consumes the engine and returns the scalar decoder.
    pub fn into_decoder(self) -> D {
        self.decoder
    }
}
