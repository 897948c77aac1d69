use alloc::vec::Vec;

use rstest::rstest;

use crate::{
    DecodeEngine, DecodeError, EncodeEngine, ReplacementFallback,
    codecs::{Utf8Codec, Utf32LeCodec},
};

/// Encodes through UTF-32LE so the scalar values handed to the codec can be
/// read straight back out of the bytes.
fn encode_scalars(engine: &mut EncodeEngine<Utf32LeCodec>, units: &[u16], flush: bool) -> Vec<u32> {
    engine
        .encode_to_vec(units, flush)
        .unwrap()
        .chunks_exact(4)
        .map(|w| u32::from_le_bytes([w[0], w[1], w[2], w[3]]))
        .collect()
}

#[rstest]
#[case::bmp_only(&[0x41, 0x42], true, &[0x41, 0x42], None)]
#[case::pair(&[0xD83D, 0xDE00], true, &[0x1F600], None)]
#[case::lone_high_flushed(&[0x20, 0xD800], true, &[0x20, 0xFFFD], None)]
#[case::lone_high_deferred(&[0x20, 0xD800], false, &[0x20], Some(0xD800))]
#[case::lone_low_flushed(&[0x20, 0xDC00], true, &[0x20, 0xFFFD], None)]
#[case::lone_low_not_deferred(&[0x20, 0xDC00], false, &[0x20, 0xFFFD], None)]
#[case::double_high(&[0x20, 0xD800, 0xD800], true, &[0x20, 0xFFFD, 0xFFFD], None)]
#[case::double_high_deferred(&[0x20, 0xD800, 0xD800], false, &[0x20, 0xFFFD], Some(0xD800))]
#[case::reversed_pair(&[0xDE00, 0xD83D], true, &[0xFFFD, 0xFFFD], None)]
#[case::high_then_bmp(&[0xD800, 0x61], false, &[0xFFFD, 0x61], None)]
#[case::empty(&[], true, &[], None)]
fn encode_surrogate_scenarios(
    #[case] units: &[u16],
    #[case] flush: bool,
    #[case] expected: &[u32],
    #[case] pending: Option<u16>,
) {
    let mut engine = EncodeEngine::new(Utf32LeCodec::new());
    assert_eq!(encode_scalars(&mut engine, units, flush), expected);
    assert_eq!(engine.pending_high(), pending);
}

#[rstest]
#[case::split_pair(&[0xD83D], &[0xDE00])]
#[case::split_after_bmp(&[0x61, 0xD83D], &[0xDE00, 0x62])]
#[case::split_lone_high(&[0xD800], &[0x62])]
#[case::split_double_high(&[0xD800], &[0xD801, 0xDC00])]
fn cross_call_matches_single_call(#[case] first: &[u16], #[case] second: &[u16]) {
    let mut split = EncodeEngine::new(Utf32LeCodec::new());
    let mut got = encode_scalars(&mut split, first, false);
    got.extend(encode_scalars(&mut split, second, true));

    let whole: Vec<u16> = first.iter().chain(second).copied().collect();
    let mut single = EncodeEngine::new(Utf32LeCodec::new());
    assert_eq!(got, encode_scalars(&mut single, &whole, true));
}

#[rstest]
#[case::ascii(b"hi", true, &[0x68, 0x69], false)]
#[case::supplementary(b"\xF0\x9F\x98\x80", true, &[0xD83D, 0xDE00], false)]
#[case::truncated_flushed(b" \xF0\x9F", true, &[0x20, 0xFFFD], false)]
#[case::truncated_deferred(b" \xF0\x9F", false, &[0x20], true)]
#[case::stray_continuation(b"\x80a", false, &[0xFFFD, 0x61], false)]
#[case::encoded_surrogate(b"\xED\xA0\x80", true, &[0xFFFD, 0xFFFD, 0xFFFD], false)]
fn decode_utf8_scenarios(
    #[case] bytes: &[u8],
    #[case] flush: bool,
    #[case] expected: &[u16],
    #[case] buffered: bool,
) {
    let mut engine = DecodeEngine::new(Utf8Codec::new());
    assert_eq!(engine.decode_to_vec(bytes, flush).unwrap(), expected);
    assert_eq!(engine.has_buffered_state(), buffered);
}

#[rstest]
#[case::above_max(&[0x00, 0x00, 0x11, 0x00])]
#[case::high_surrogate_word(&[0x00, 0xD8, 0x00, 0x00])]
#[case::low_surrogate_word(&[0xFF, 0xDF, 0x00, 0x00])]
#[case::all_ones(&[0xFF, 0xFF, 0xFF, 0xFF])]
fn decode_out_of_range_word_falls_back(#[case] word: &[u8]) {
    let mut engine = DecodeEngine::new(Utf32LeCodec::new());
    assert_eq!(engine.decode_to_vec(word, true).unwrap(), [0xFFFD]);

    let policy = ReplacementFallback::new("?").unwrap();
    let mut custom = DecodeEngine::with_fallback(Utf32LeCodec::new(), policy);
    let mut bytes = word.to_vec();
    bytes.extend_from_slice(&[0x41, 0, 0, 0]);
    assert_eq!(custom.decode_to_vec(&bytes, true).unwrap(), [0x3F, 0x41]);
}

#[rstest]
#[case::encode_pending(true)]
#[case::encode_clean(false)]
fn reset_behaves_like_new_encoder(#[case] leave_pending: bool) {
    let mut engine = EncodeEngine::new(Utf8Codec::new());
    let prefix: &[u16] = if leave_pending { &[0x41, 0xD83D] } else { &[0x41] };
    engine.encode_to_vec(prefix, false).unwrap();
    engine.reset();

    let input = [0xDE00, 0x42];
    let mut fresh = EncodeEngine::new(Utf8Codec::new());
    assert_eq!(
        engine.encode_to_vec(&input, true).unwrap(),
        fresh.encode_to_vec(&input, true).unwrap()
    );
    assert_eq!(engine.position(), fresh.position());
}

#[test]
fn reset_behaves_like_new_decoder() {
    let mut engine = DecodeEngine::new(Utf8Codec::new());
    engine.decode_to_vec(b"\xF0\x9F", false).unwrap();
    assert!(engine.has_buffered_state());
    engine.reset();
    engine.reset();
    assert!(!engine.has_buffered_state());

    let mut fresh = DecodeEngine::new(Utf8Codec::new());
    assert_eq!(
        engine.decode_to_vec(b"\x98\x80z", true).unwrap(),
        fresh.decode_to_vec(b"\x98\x80z", true).unwrap()
    );
}

#[test]
fn carried_bytes_survive_insufficient_space() {
    let mut engine = DecodeEngine::new(Utf8Codec::new());
    let mut out = [0u16; 4];
    assert_eq!(engine.write(b"\xF0\x9F", &mut out, false), Ok(0));

    let err = engine.write(b"\x98\x80", &mut out[..1], true).unwrap_err();
    assert_eq!(
        err,
        DecodeError::InsufficientSpace {
            offset: 0,
            needed: 2,
            capacity: 1
        }
    );
    assert!(engine.has_buffered_state());

    assert_eq!(engine.write(b"\x98\x80", &mut out, true), Ok(2));
    assert_eq!(out[..2], [0xD83D, 0xDE00]);
    assert!(!engine.has_buffered_state());
}
