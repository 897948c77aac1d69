#![allow(missing_docs, dead_code)]

use surrocodec::{Assessed, Decoded, Plane, ScalarDecoder, ScalarEncoder};

/// A toy custom encoding: every scalar value as unsigned LEB128, one to three
/// bytes. Values outside the scalar ranges and over-long sequences are
/// undecodable.
#[derive(Debug, Default, Clone)]
pub struct Leb128Codec {
    acc: u32,
    shift: u32,
}

enum Step {
    Value { read: usize, value: u32 },
    Invalid { read: usize },
    Partial { read: usize, acc: u32, shift: u32 },
}

impl Leb128Codec {
    pub fn new() -> Self {
        Self::default()
    }

    fn step(mut acc: u32, mut shift: u32, bytes: &[u8]) -> Step {
        for (i, &b) in bytes.iter().enumerate() {
            acc |= u32::from(b & 0x7F) << shift;
            if b & 0x80 == 0 {
                return match char::from_u32(acc) {
                    Some(_) => Step::Value {
                        read: i + 1,
                        value: acc,
                    },
                    None => Step::Invalid { read: i + 1 },
                };
            }
            shift += 7;
            if shift >= 21 {
                return Step::Invalid { read: i + 1 };
            }
        }
        Step::Partial {
            read: bytes.len(),
            acc,
            shift,
        }
    }
}

impl ScalarEncoder for Leb128Codec {
    fn byte_len(&self, scalar: char) -> usize {
        match scalar as u32 {
            0..=0x7F => 1,
            0x80..=0x3FFF => 2,
            _ => 3,
        }
    }

    fn encode_scalar(&mut self, scalar: char, out: &mut [u8]) -> usize {
        let mut v = scalar as u32;
        let len = out.len();
        for (i, slot) in out.iter_mut().enumerate() {
            let low = (v & 0x7F) as u8;
            v >>= 7;
            *slot = if i + 1 < len { low | 0x80 } else { low };
        }
        len
    }

    fn reset(&mut self) {}
}

impl ScalarDecoder for Leb128Codec {
    fn assess(&self, bytes: &[u8], first: bool) -> Assessed {
        let (acc, shift) = if first { (self.acc, self.shift) } else { (0, 0) };
        match Self::step(acc, shift, bytes) {
            Step::Value { read, value } => Assessed::Scalar {
                read,
                plane: if value > 0xFFFF {
                    Plane::Supplementary
                } else {
                    Plane::Basic
                },
            },
            Step::Invalid { read } => Assessed::Invalid { read },
            Step::Partial { read, .. } => Assessed::Incomplete { read },
        }
    }

    fn decode(&mut self, bytes: &[u8]) -> Decoded {
        let step = Self::step(self.acc, self.shift, bytes);
        self.acc = 0;
        self.shift = 0;
        match step {
            Step::Value { read, value } => Decoded::Scalar { read, value },
            Step::Invalid { read } => Decoded::Invalid { read },
            Step::Partial { read, acc, shift } => {
                self.acc = acc;
                self.shift = shift;
                Decoded::Incomplete { read }
            }
        }
    }

    fn has_carry(&self) -> bool {
        self.shift > 0
    }

    fn reset(&mut self) {
        self.acc = 0;
        self.shift = 0;
    }
}

pub fn utf16(s: &str) -> Vec<u16> {
    s.encode_utf16().collect()
}
