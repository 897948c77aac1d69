//! Reference scalar codecs.
//!
//! These implement [`ScalarEncoder`](crate::ScalarEncoder) and
//! [`ScalarDecoder`](crate::ScalarDecoder) for two standard encodings. They
//! show how a codec keeps continuation state between calls and are handy for
//! testing engines; the engines themselves do not depend on them.

mod utf32;
mod utf8;

pub use utf8::Utf8Codec;
pub use utf32::Utf32LeCodec;
