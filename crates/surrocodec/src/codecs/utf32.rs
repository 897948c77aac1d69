use crate::scalar::{Assessed, Decoded, Plane, ScalarDecoder, ScalarEncoder};

/// UTF-32 little-endian scalar codec.
///
/// Every value is four bytes. Words that are surrogates or above U+10FFFF
/// are reported as invalid runs, so the engine substitutes them instead of
/// emitting them.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Utf32LeCodec {
    carry: [u8; 4],
    carry_len: usize,
}

enum Word {
    Complete { read: usize, value: u32 },
    Partial { read: usize },
}

impl Utf32LeCodec {
    /// Creates a codec with no continuation state.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn word(carry: &[u8], bytes: &[u8]) -> Word {
        let held = carry.len();
        if held + bytes.len() < 4 {
            return Word::Partial { read: bytes.len() };
        }
        let take = 4 - held;
        let mut buf = [0u8; 4];
        buf[..held].copy_from_slice(carry);
        buf[held..].copy_from_slice(&bytes[..take]);
        Word::Complete {
            read: take,
            value: u32::from_le_bytes(buf),
        }
    }
}

impl ScalarEncoder for Utf32LeCodec {
    fn byte_len(&self, _scalar: char) -> usize {
        4
    }

    fn encode_scalar(&mut self, scalar: char, out: &mut [u8]) -> usize {
        out.copy_from_slice(&(scalar as u32).to_le_bytes());
        4
    }

    fn reset(&mut self) {}
}

impl ScalarDecoder for Utf32LeCodec {
    fn assess(&self, bytes: &[u8], first: bool) -> Assessed {
        let carry: &[u8] = if first {
            &self.carry[..self.carry_len]
        } else {
            &[]
        };
        match Self::word(carry, bytes) {
            Word::Partial { read } => Assessed::Incomplete { read },
            Word::Complete { read, value } => match char::from_u32(value) {
                Some(scalar) => Assessed::Scalar {
                    read,
                    plane: Plane::of(scalar),
                },
                None => Assessed::Invalid { read },
            },
        }
    }

    fn decode(&mut self, bytes: &[u8]) -> Decoded {
        match Self::word(&self.carry[..self.carry_len], bytes) {
            Word::Partial { read } => {
                let start = self.carry_len;
                self.carry[start..start + read].copy_from_slice(bytes);
                self.carry_len += read;
                Decoded::Incomplete { read }
            }
            Word::Complete { read, value } => {
                self.carry_len = 0;
                if char::from_u32(value).is_some() {
                    Decoded::Scalar { read, value }
                } else {
                    Decoded::Invalid { read }
                }
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
