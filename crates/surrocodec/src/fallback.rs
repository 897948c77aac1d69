//! Substitution of malformed input.
//!
//! When the encode side meets an unpaired surrogate, or the decode side meets
//! bytes the scalar codec cannot decode, the engine asks a
//! [`FallbackPolicy`] for replacement UTF-16 code units. The policy sees only
//! the offending input and its stream offset.

use alloc::{vec, vec::Vec};

use crate::{
    REPLACEMENT_UNIT,
    error::{EmptyReplacement, FallbackError},
};

/// Produces substitute code units for malformed input, or rejects it.
///
/// Both the measuring pass and the writing pass of an engine consult the
/// policy, so the same input must always produce the same substitute.
pub trait FallbackPolicy {
    /// Substitute for an unpaired surrogate `unit` found at stream offset
    /// `index`. Appends replacement code units to `out`.
    ///
    /// # Errors
    ///
    /// Returns a [`FallbackError`] to reject the input instead.
    fn unpaired_surrogate(
        &self,
        unit: u16,
        index: usize,
        out: &mut Vec<u16>,
    ) -> Result<(), FallbackError>;

    /// Substitute for an undecodable byte run starting at stream offset
    /// `index`. `bytes` holds the part of the run seen by the current call.
    ///
    /// Unlike a pending high surrogate on the encode side, bytes the codec
    /// carried over from an earlier call are not visible to the engine. When
    /// such a run is flushed or found invalid, `bytes` lacks the carried
    /// prefix (it is empty if the whole run was carried) and `index` is the
    /// offset of the current call's first byte rather than where the run
    /// began.
    ///
    /// # Errors
    ///
    /// Returns a [`FallbackError`] to reject the input instead.
    fn undecodable_bytes(
        &self,
        bytes: &[u8],
        index: usize,
        out: &mut Vec<u16>,
    ) -> Result<(), FallbackError>;
}

impl<T: FallbackPolicy + ?Sized> FallbackPolicy for &T {
    fn unpaired_surrogate(
        &self,
        unit: u16,
        index: usize,
        out: &mut Vec<u16>,
    ) -> Result<(), FallbackError> {
        (**self).unpaired_surrogate(unit, index, out)
    }

    fn undecodable_bytes(
        &self,
        bytes: &[u8],
        index: usize,
        out: &mut Vec<u16>,
    ) -> Result<(), FallbackError> {
        (**self).undecodable_bytes(bytes, index, out)
    }
}

/// Replaces every malformed unit or byte run with a fixed, non-empty string.
///
/// # Default
///
/// A single U+FFFD REPLACEMENT CHARACTER.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(try_from = "Vec<u16>", into = "Vec<u16>")
)]
pub struct ReplacementFallback {
    replacement: Vec<u16>,
}

impl ReplacementFallback {
    /// Creates a policy substituting `replacement`.
    ///
    /// ```rust
    /// use surrocodec::{EmptyReplacement, ReplacementFallback};
    ///
    /// let policy = ReplacementFallback::new("?").unwrap();
    /// assert_eq!(policy.replacement(), &[u16::from(b'?')]);
    /// assert_eq!(ReplacementFallback::new(""), Err(EmptyReplacement));
    /// ```
    ///
    /// # Errors
    ///
    /// [`EmptyReplacement`] when `replacement` is empty.
    pub fn new(replacement: &str) -> Result<Self, EmptyReplacement> {
        Self::from_units(replacement.encode_utf16().collect())
    }

    /// Creates a policy substituting raw code units.
    ///
    /// Unpaired surrogates in `units` are accepted here but make the encode
    /// engine fail with [`EncodeError::RecursiveFallback`](crate::EncodeError)
    /// when used.
    ///
    /// # Errors
    ///
    /// [`EmptyReplacement`] when `units` is empty.
    pub fn from_units(units: Vec<u16>) -> Result<Self, EmptyReplacement> {
        if units.is_empty() {
            return Err(EmptyReplacement);
        }
        Ok(Self { replacement: units })
    }

    /// The substitute code units.
    #[must_use]
    pub fn replacement(&self) -> &[u16] {
        &self.replacement
    }
}

impl TryFrom<Vec<u16>> for ReplacementFallback {
    type Error = EmptyReplacement;

    fn try_from(units: Vec<u16>) -> Result<Self, Self::Error> {
        Self::from_units(units)
    }
}

impl From<ReplacementFallback> for Vec<u16> {
    fn from(policy: ReplacementFallback) -> Self {
        policy.replacement
    }
}

impl Default for ReplacementFallback {
    fn default() -> Self {
        Self {
            replacement: vec![REPLACEMENT_UNIT],
        }
    }
}

impl FallbackPolicy for ReplacementFallback {
    fn unpaired_surrogate(
        &self,
        _unit: u16,
        _index: usize,
        out: &mut Vec<u16>,
    ) -> Result<(), FallbackError> {
        out.extend_from_slice(&self.replacement);
        Ok(())
    }

    fn undecodable_bytes(
        &self,
        _bytes: &[u8],
        _index: usize,
        out: &mut Vec<u16>,
    ) -> Result<(), FallbackError> {
        out.extend_from_slice(&self.replacement);
        Ok(())
    }
}

/// Rejects all malformed input.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StrictFallback;

impl FallbackPolicy for StrictFallback {
    fn unpaired_surrogate(
        &self,
        unit: u16,
        index: usize,
        _out: &mut Vec<u16>,
    ) -> Result<(), FallbackError> {
        Err(FallbackError::UnpairedSurrogate { unit, index })
    }

    fn undecodable_bytes(
        &self,
        bytes: &[u8],
        index: usize,
        _out: &mut Vec<u16>,
    ) -> Result<(), FallbackError> {
        Err(FallbackError::Undecodable {
            bytes: bytes.into(),
            index,
        })
    }
}
