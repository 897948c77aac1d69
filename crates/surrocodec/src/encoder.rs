//! UTF-16 code units to bytes.
//!
//! [`EncodeEngine`] composes code units into scalar values with a
//! [`SurrogateComposer`], substitutes unpaired surrogates through a
//! [`FallbackPolicy`], and hands each scalar value to a [`ScalarEncoder`].
//!
//! `measure` and `write` run the same traversal over a sink that either
//! counts or writes bytes, which is what keeps the two passes in agreement.

use alloc::{vec, vec::Vec};

use crate::{
    composer::{Composed, SurrogateComposer},
    error::EncodeError,
    fallback::{FallbackPolicy, ReplacementFallback},
    logging::{debug, trace},
    scalar::ScalarEncoder,
};

/// Receives the scalar values produced by a traversal.
trait ByteSink {
    fn scalar(&mut self, scalar: char) -> Result<(), EncodeError>;
}

struct Counter<'a, E: ?Sized> {
    encoder: &'a E,
    count: usize,
}

impl<E: ScalarEncoder + ?Sized> ByteSink for Counter<'_, E> {
    fn scalar(&mut self, scalar: char) -> Result<(), EncodeError> {
        self.count += self.encoder.byte_len(scalar);
        Ok(())
    }
}

struct Writer<'a, E: ?Sized> {
    encoder: &'a mut E,
    out: &'a mut [u8],
    offset: usize,
}

impl<E: ScalarEncoder + ?Sized> ByteSink for Writer<'_, E> {
    fn scalar(&mut self, scalar: char) -> Result<(), EncodeError> {
        let needed = self.encoder.byte_len(scalar);
        let capacity = self.out.len();
        let Some(dst) = self.out.get_mut(self.offset..self.offset + needed) else {
            return Err(EncodeError::InsufficientSpace {
                offset: self.offset,
                needed,
                capacity,
            });
        };
        let written = self.encoder.encode_scalar(scalar, dst);
        assert!(
            written == needed,
            "scalar encoder wrote {written} bytes for U+{:04X} but reported byte_len {needed}",
            scalar as u32
        );
        self.offset += written;
        Ok(())
    }
}

/// Walks `units` through `composer`, feeding resolved scalar values to `sink`.
fn traverse<F, S>(
    composer: &mut SurrogateComposer,
    fallback: &F,
    units: &[u16],
    base: usize,
    flush: bool,
    sink: &mut S,
    scratch: &mut Vec<u16>,
) -> Result<(), EncodeError>
where
    F: FallbackPolicy + ?Sized,
    S: ByteSink,
{
    for (i, &unit) in units.iter().enumerate() {
        for step in composer.push(unit, base + i) {
            resolve(step, fallback, sink, scratch)?;
        }
    }
    if flush {
        if let Some(step) = composer.flush() {
            trace!("flushing pending high surrogate");
            resolve(step, fallback, sink, scratch)?;
        }
    }
    Ok(())
}

fn resolve<F, S>(
    step: Composed,
    fallback: &F,
    sink: &mut S,
    scratch: &mut Vec<u16>,
) -> Result<(), EncodeError>
where
    F: FallbackPolicy + ?Sized,
    S: ByteSink,
{
    match step {
        Composed::Scalar(scalar) => sink.scalar(scalar),
        Composed::Unpaired { unit, index } => {
            debug!(unit, index, "substituting unpaired surrogate");
            scratch.clear();
            fallback.unpaired_surrogate(unit, index, scratch)?;
            // The substitute is UTF-16 of its own; pairs in it compose
            // independently of the stream's pending state.
            let mut nested = SurrogateComposer::new();
            for &sub in scratch.iter() {
                for step in nested.push(sub, index) {
                    match step {
                        Composed::Scalar(scalar) => sink.scalar(scalar)?,
                        Composed::Unpaired { unit, .. } => {
                            return Err(EncodeError::RecursiveFallback { unit, index });
                        }
                    }
                }
            }
            match nested.flush() {
                Some(Composed::Unpaired { unit, .. }) => {
                    Err(EncodeError::RecursiveFallback { unit, index })
                }
                _ => Ok(()),
            }
        }
    }
}

/// Streaming encoder from UTF-16 code units to the bytes of a custom
/// encoding.
///
/// The `flush` flag of each call says whether more input follows. With
/// `flush = false` a trailing high surrogate stays pending and pairs with a
/// low surrogate at the start of the next call.
///
/// # Examples
///
/// ```rust
/// use surrocodec::{EncodeEngine, codecs::Utf8Codec};
///
/// let mut engine = EncodeEngine::new(Utf8Codec::new());
/// let mut out = [0u8; 8];
///
/// // High surrogate at the end of the first chunk is held back.
/// assert_eq!(engine.write(&[0x61, 0xD83D], &mut out, false).unwrap(), 1);
/// assert!(engine.has_buffered_state());
///
/// let n = engine.write(&[0xDE00], &mut out[1..], true).unwrap();
/// assert_eq!(&out[..1 + n], "a\u{1F600}".as_bytes());
/// ```
#[derive(Debug, Clone)]
pub struct EncodeEngine<E, F = ReplacementFallback> {
    encoder: E,
    fallback: F,
    composer: SurrogateComposer,
    position: usize,
    scratch: Vec<u16>,
}

impl<E: ScalarEncoder> EncodeEngine<E> {
    /// Creates an engine that substitutes U+FFFD for unpaired surrogates.
    #[must_use]
    pub fn new(encoder: E) -> Self {
        Self::with_fallback(encoder, ReplacementFallback::default())
    }
}

impl<E: ScalarEncoder, F: FallbackPolicy> EncodeEngine<E, F> {
    /// Creates an engine with a custom fallback policy.
    #[must_use]
    pub fn with_fallback(encoder: E, fallback: F) -> Self {
        Self {
            encoder,
            fallback,
            composer: SurrogateComposer::new(),
            position: 0,
            scratch: Vec::new(),
        }
    }

    /// Number of bytes [`write`](Self::write) would produce for the same
    /// `units` and `flush`.
    ///
    /// Measuring does not commit anything: pending state is left as is.
    ///
    /// # Errors
    ///
    /// [`EncodeError::Fallback`] or [`EncodeError::RecursiveFallback`] when
    /// the fallback policy rejects the input or returns a malformed
    /// substitute.
    pub fn measure(&self, units: &[u16], flush: bool) -> Result<usize, EncodeError> {
        let mut composer = self.composer;
        let mut counter = Counter {
            encoder: &self.encoder,
            count: 0,
        };
        let mut scratch = Vec::new();
        traverse(
            &mut composer,
            &self.fallback,
            units,
            self.position,
            flush,
            &mut counter,
            &mut scratch,
        )?;
        Ok(counter.count)
    }

    /// Encodes `units` into `out` and returns the number of bytes written.
    ///
    /// Pending state and the stream position are committed only when the
    /// call succeeds. Bytes already written to `out` before an error are
    /// left for the caller to discard.
    ///
    /// # Errors
    ///
    /// - [`EncodeError::InsufficientSpace`] when `out` fills up; a scalar
    ///   value is never split across that boundary.
    /// - [`EncodeError::Fallback`] / [`EncodeError::RecursiveFallback`] as for
    ///   [`measure`](Self::measure).
    ///
    /// # Panics
    ///
    /// When the scalar encoder writes a byte count other than the one its
    /// `byte_len` reported.
    pub fn write(&mut self, units: &[u16], out: &mut [u8], flush: bool) -> Result<usize, EncodeError> {
        let mut composer = self.composer;
        let mut writer = Writer {
            encoder: &mut self.encoder,
            out,
            offset: 0,
        };
        traverse(
            &mut composer,
            &self.fallback,
            units,
            self.position,
            flush,
            &mut writer,
            &mut self.scratch,
        )?;
        let written = writer.offset;
        #[cfg(any(test, feature = "fuzzing"))]
        if let Ok(expected) = self.measure(units, flush) {
            assert_eq!(written, expected, "measure and write disagree");
        }
        self.composer = composer;
        self.position += units.len();
        Ok(written)
    }

    /// Measures, allocates exactly, and writes.
    ///
    /// # Errors
    ///
    /// As for [`write`](Self::write), except that space never runs out.
    pub fn encode_to_vec(&mut self, units: &[u16], flush: bool) -> Result<Vec<u8>, EncodeError> {
        let len = self.measure(units, flush)?;
        let mut out = vec![0; len];
        let written = self.write(units, &mut out, flush)?;
        debug_assert_eq!(written, len);
        out.truncate(written);
        Ok(out)
    }

    /// Clears pending state, the stream position, and the encoder's own
    /// state.
    pub fn reset(&mut self) {
        trace!("resetting encode engine");
        self.composer.reset();
        self.position = 0;
        self.encoder.reset();
    }
}

impl<E, F> EncodeEngine<E, F> {
    /// The high surrogate awaiting its low surrogate, if any.
    #[must_use]
    pub fn pending_high(&self) -> Option<u16> {
        self.composer.pending()
    }

    /// Whether state from earlier calls is buffered.
    #[must_use]
    pub fn has_buffered_state(&self) -> bool {
        self.composer.has_pending()
    }

    /// Code units consumed since construction or the last reset.
    #[must_use]
    pub fn position(&self) -> usize {
        self.position
    }

    /// The scalar encoder.
    pub fn encoder(&self) -> &E {
        &self.encoder
    }

    /// The fallback policy.
    pub fn fallback(&self) -> &F {
        &self.fallback
    }

    /// Consumes the engine and returns the scalar encoder.
    pub fn into_encoder(self) -> E {
        self.encoder
    }
}
