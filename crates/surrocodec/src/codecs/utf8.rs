use crate::scalar::{Assessed, Decoded, Plane, ScalarDecoder, ScalarEncoder};

/// Length of the sequence a lead byte announces; 1 for bytes that cannot
/// start a multi-byte sequence.
#[inline]
fn expected_len(lead: u8) -> usize {
    match lead {
        0xC2..=0xDF => 2,
        0xE0..=0xEF => 3,
        0xF0..=0xF4 => 4,
        _ => 1,
    }
}

#[derive(Debug, PartialEq)]
enum Probe {
    Scalar { read: usize, scalar: char },
    Invalid { read: usize },
    Incomplete { read: usize },
}

/// Decodes one value from `carry` followed by `bytes`. `read` counts bytes
/// of `bytes` only.
fn probe(carry: &[u8], bytes: &[u8]) -> Probe {
    if carry.is_empty() {
        let (scalar, n) = bstr::decode_utf8(bytes);
        return match scalar {
            Some(scalar) => Probe::Scalar { read: n, scalar },
            None if n == bytes.len() && (n == 0 || n < expected_len(bytes[0])) => {
                Probe::Incomplete { read: n }
            }
            None => Probe::Invalid { read: n },
        };
    }

    let held = carry.len();
    let take = (4 - held).min(bytes.len());
    let mut buf = [0u8; 4];
    buf[..held].copy_from_slice(carry);
    buf[held..held + take].copy_from_slice(&bytes[..take]);
    let window = &buf[..held + take];

    let (scalar, n) = bstr::decode_utf8(window);
    match scalar {
        Some(scalar) => Probe::Scalar {
            read: n - held,
            scalar,
        },
        None if n == window.len() && n < expected_len(window[0]) => {
            Probe::Incomplete { read: take }
        }
        // The carried prefix may be invalid on its own; then nothing of
        // `bytes` belongs to the run.
        None => Probe::Invalid {
            read: n.saturating_sub(held),
        },
    }
}

/// UTF-8 scalar codec.
///
/// A sequence cut off at the end of a call is carried (up to three bytes)
/// into the next call. Invalid input is reported one maximal subpart at a
/// time, the way lossy UTF-8 decoders substitute it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Utf8Codec {
    carry: [u8; 4],
    carry_len: usize,
}

impl Utf8Codec {
    /// Creates a codec with no continuation state.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn carried(&self) -> &[u8] {
        &self.carry[..self.carry_len]
    }
}

impl ScalarEncoder for Utf8Codec {
    fn byte_len(&self, scalar: char) -> usize {
        scalar.len_utf8()
    }

    fn encode_scalar(&mut self, scalar: char, out: &mut [u8]) -> usize {
        scalar.encode_utf8(out).len()
    }

    fn reset(&mut self) {}
}

impl ScalarDecoder for Utf8Codec {
    fn assess(&self, bytes: &[u8], first: bool) -> Assessed {
        let carry: &[u8] = if first { self.carried() } else { &[] };
        match probe(carry, bytes) {
            Probe::Scalar { read, scalar } => Assessed::Scalar {
                read,
                plane: Plane::of(scalar),
            },
            Probe::Invalid { read } => Assessed::Invalid { read },
            Probe::Incomplete { read } => Assessed::Incomplete { read },
        }
    }

    fn decode(&mut self, bytes: &[u8]) -> Decoded {
        match probe(self.carried(), bytes) {
            Probe::Scalar { read, scalar } => {
                self.carry_len = 0;
                Decoded::Scalar {
                    read,
                    value: scalar as u32,
                }
            }
            Probe::Invalid { read } => {
                self.carry_len = 0;
                Decoded::Invalid { read }
            }
            Probe::Incomplete { read } => {
                let start = self.carry_len;
                self.carry[start..start + read].copy_from_slice(&bytes[..read]);
                self.carry_len += read;
                Decoded::Incomplete { read }
            }
        }
    }

    fn has_carry(&self) -> bool {
        self.carry_len > 0
    }

    fn reset(&mut self) {
        self.carry_len = 0;
    }
}
