//! Composition of UTF-16 code units into scalar values.
//!
//! [`SurrogateComposer`] accepts code units one at a time, possibly split
//! across many calls, and yields either complete scalar values or the
//! surrogates that cannot be paired. It holds at most one pending high
//! surrogate between calls.

const HIGH_START: u16 = 0xD800;
const LOW_START: u16 = 0xDC00;

#[inline]
const fn is_high(unit: u16) -> bool {
    matches!(unit, 0xD800..=0xDBFF)
}

#[inline]
const fn is_low(unit: u16) -> bool {
    matches!(unit, 0xDC00..=0xDFFF)
}

/// Combines a high and a low surrogate into the scalar value they encode.
#[inline]
fn combine(high: u16, low: u16) -> char {
    let value =
        0x1_0000 + ((u32::from(high - HIGH_START) << 10) | u32::from(low - LOW_START));
    // high and low are in range, so value is in 0x10000..=0x10FFFF
    char::from_u32(value).unwrap_or(char::REPLACEMENT_CHARACTER)
}

/// One outcome of feeding a code unit into a [`SurrogateComposer`].
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Composed {
    /// A complete scalar value.
    Scalar(char),
    /// A surrogate that cannot be paired and needs a fallback.
    Unpaired {
        /// The surrogate code unit.
        unit: u16,
        /// Stream offset at which the unit arrived.
        index: usize,
    },
}

/// Up to two [`Composed`] outcomes, in stream order.
#[derive(Clone, Debug)]
pub struct Steps {
    items: [Option<Composed>; 2],
    next: usize,
}

impl Steps {
    const fn none() -> Self {
        Self {
            items: [None, None],
            next: 0,
        }
    }

    const fn one(item: Composed) -> Self {
        Self {
            items: [Some(item), None],
            next: 0,
        }
    }

    const fn two(first: Composed, second: Composed) -> Self {
        Self {
            items: [Some(first), Some(second)],
            next: 0,
        }
    }
}

impl Iterator for Steps {
    type Item = Composed;

    fn next(&mut self) -> Option<Self::Item> {
        let item = self.items.get_mut(self.next)?.take();
        self.next += 1;
        item
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
struct PendingHigh {
    unit: u16,
    index: usize,
}

/// Streaming surrogate-pair composer.
///
/// ```rust
/// use surrocodec::{Composed, SurrogateComposer};
///
/// let mut composer = SurrogateComposer::new();
/// assert_eq!(composer.push(0xD83D, 0).next(), None);
/// assert_eq!(composer.pending(), Some(0xD83D));
/// assert_eq!(
///     composer.push(0xDE00, 1).collect::<Vec<_>>(),
///     vec![Composed::Scalar('\u{1F600}')]
/// );
/// assert!(!composer.has_pending());
/// ```
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct SurrogateComposer {
    pending: Option<PendingHigh>,
}

impl SurrogateComposer {
    /// Creates a composer with nothing pending.
    #[must_use]
    pub const fn new() -> Self {
        Self { pending: None }
    }

    /// Feeds one code unit that arrived at stream offset `index`.
    ///
    /// A high surrogate is held until the next unit shows whether it is
    /// paired. A lone low surrogate is reported immediately.
    pub fn push(&mut self, unit: u16, index: usize) -> Steps {
        match (self.pending.take(), unit) {
            (None, u) if is_high(u) => {
                self.pending = Some(PendingHigh { unit: u, index });
                Steps::none()
            }
            (None, u) if is_low(u) => Steps::one(Composed::Unpaired { unit: u, index }),
            (None, u) => Steps::one(Composed::Scalar(Self::bmp(u))),
            (Some(high), u) if is_low(u) => Steps::one(Composed::Scalar(combine(high.unit, u))),
            (Some(high), u) if is_high(u) => {
                self.pending = Some(PendingHigh { unit: u, index });
                Steps::one(Composed::Unpaired {
                    unit: high.unit,
                    index: high.index,
                })
            }
            (Some(high), u) => Steps::two(
                Composed::Unpaired {
                    unit: high.unit,
                    index: high.index,
                },
                Composed::Scalar(Self::bmp(u)),
            ),
        }
    }

    /// Resolves a pending high surrogate at end of input.
    pub fn flush(&mut self) -> Option<Composed> {
        self.pending.take().map(|high| Composed::Unpaired {
            unit: high.unit,
            index: high.index,
        })
    }

    /// Drops any pending high surrogate.
    pub fn reset(&mut self) {
        self.pending = None;
    }

    /// The high surrogate awaiting its low surrogate, if any.
    #[must_use]
    pub fn pending(&self) -> Option<u16> {
        self.pending.map(|high| high.unit)
    }

    /// Whether a high surrogate is awaiting its low surrogate.
    #[must_use]
    pub fn has_pending(&self) -> bool {
        self.pending.is_some()
    }

    #[inline]
    fn bmp(unit: u16) -> char {
        // callers exclude surrogates
        char::from_u32(u32::from(unit)).unwrap_or(char::REPLACEMENT_CHARACTER)
    }
}
