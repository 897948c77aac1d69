//! The scalar codec boundary.
//!
//! A concrete text encoding plugs into the engines by implementing
//! [`ScalarEncoder`] (scalar value to bytes) and/or [`ScalarDecoder`] (bytes
//! to scalar value). The engines never look inside a codec's continuation
//! state; they only probe it, drive it, and reset it.

/// Whether a scalar value needs one UTF-16 code unit or a surrogate pair.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Plane {
    /// U+0000..=U+FFFF, excluding surrogates.
    Basic,
    /// U+10000..=U+10FFFF.
    Supplementary,
}

impl Plane {
    /// Classifies a scalar value.
    #[must_use]
    pub fn of(scalar: char) -> Self {
        if (scalar as u32) < 0x1_0000 {
            Self::Basic
        } else {
            Self::Supplementary
        }
    }

    /// Number of UTF-16 code units a scalar value in this plane occupies.
    #[must_use]
    pub const fn utf16_len(self) -> usize {
        match self {
            Self::Basic => 1,
            Self::Supplementary => 2,
        }
    }
}

/// Result of a non-mutating [`ScalarDecoder::assess`] probe.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Assessed {
    /// `read` bytes hold one scalar value in the given plane.
    Scalar {
        /// Bytes of the window that belong to the value.
        read: usize,
        /// Plane of the value.
        plane: Plane,
    },
    /// `read` bytes form a run that can never decode.
    Invalid {
        /// Length of the run within the window.
        read: usize,
    },
    /// The window ran out before an answer; `read` bytes would be carried.
    Incomplete {
        /// Bytes of the window that would be held as continuation state.
        read: usize,
    },
}

/// Result of a mutating [`ScalarDecoder::decode`] step.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Decoded {
    /// `read` bytes completed one scalar value.
    ///
    /// `value` must lie in `0..=0xD7FF` or `0xE000..=0x10FFFF`; anything else
    /// is a defect in the codec and aborts the engine.
    Scalar {
        /// Bytes of the window that were consumed.
        read: usize,
        /// The decoded scalar value.
        value: u32,
    },
    /// `read` bytes form a run that can never decode.
    Invalid {
        /// Length of the run within the window.
        read: usize,
    },
    /// The window ran out before a full value; `read` bytes were absorbed
    /// into continuation state.
    Incomplete {
        /// Bytes of the window absorbed into continuation state.
        read: usize,
    },
}

/// Scalar-value-to-bytes half of a text encoding.
pub trait ScalarEncoder {
    /// Number of bytes [`encode_scalar`](Self::encode_scalar) writes for
    /// `scalar`. Must be a pure function of `scalar`.
    fn byte_len(&self, scalar: char) -> usize;

    /// Writes the encoding of `scalar` into `out` and returns the number of
    /// bytes written.
    ///
    /// `out` is exactly [`byte_len`](Self::byte_len) bytes long and the return
    /// value must equal that length.
    fn encode_scalar(&mut self, scalar: char, out: &mut [u8]) -> usize;

    /// Clears any encoder-specific state.
    fn reset(&mut self);
}

/// Bytes-to-scalar-value half of a text encoding.
///
/// Every step that returns [`Decoded::Scalar`] or [`Decoded::Invalid`] must
/// make progress, either by consuming bytes from the window or by resolving
/// carried-over continuation state. An empty window yields `Incomplete`.
pub trait ScalarDecoder {
    /// Probes the next value without touching continuation state.
    ///
    /// `first` is `true` for the first probe of a measuring pass; only then
    /// does the probe fold in continuation state left by an earlier
    /// [`decode`](Self::decode) call.
    fn assess(&self, bytes: &[u8], first: bool) -> Assessed;

    /// Decodes the next value, updating continuation state.
    fn decode(&mut self, bytes: &[u8]) -> Decoded;

    /// Whether continuation state from earlier input is currently held.
    fn has_carry(&self) -> bool;

    /// Clears continuation state.
    fn reset(&mut self);
}

impl<T: ScalarEncoder + ?Sized> ScalarEncoder for &mut T {
    fn byte_len(&self, scalar: char) -> usize {
        (**self).byte_len(scalar)
    }

    fn encode_scalar(&mut self, scalar: char, out: &mut [u8]) -> usize {
        (**self).encode_scalar(scalar, out)
    }

    fn reset(&mut self) {
        (**self).reset();
    }
}

impl<T: ScalarDecoder + ?Sized> ScalarDecoder for &mut T {
    fn assess(&self, bytes: &[u8], first: bool) -> Assessed {
        (**self).assess(bytes, first)
    }

    fn decode(&mut self, bytes: &[u8]) -> Decoded {
        (**self).decode(bytes)
    }

    fn has_carry(&self) -> bool {
        (**self).has_carry()
    }

    fn reset(&mut self) {
        (**self).reset();
    }
}
