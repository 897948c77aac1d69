#![no_main]

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use surrocodec::{
    DecodeEngine, EncodeEngine,
    codecs::{Utf8Codec, Utf32LeCodec},
};

#[derive(Arbitrary, Debug)]
enum Input {
    Encode { units: Vec<u16>, splits: Vec<u8> },
    DecodeUtf8 { bytes: Vec<u8>, splits: Vec<u8> },
    DecodeUtf32 { bytes: Vec<u8>, splits: Vec<u8> },
}

/// Cuts `items` at the offsets given by `splits`, always leaving at least one
/// chunk.
fn chunks<'a, T>(items: &'a [T], splits: &[u8]) -> Vec<&'a [T]> {
    let mut out = Vec::new();
    let mut rest = items;
    for &s in splits {
        if rest.is_empty() {
            break;
        }
        let (head, tail) = rest.split_at(usize::from(s) % (rest.len() + 1));
        out.push(head);
        rest = tail;
    }
    out.push(rest);
    out
}

fn encode(units: &[u16], splits: &[u8]) {
    let whole = EncodeEngine::new(Utf8Codec::new())
        .encode_to_vec(units, true)
        .unwrap();

    let mut engine = EncodeEngine::new(Utf8Codec::new());
    let mut streamed = Vec::new();
    let parts = chunks(units, splits);
    for (i, part) in parts.iter().enumerate() {
        let flush = i + 1 == parts.len();
        let expected = engine.measure(part, flush).unwrap();
        let mut out = vec![0u8; expected];
        assert_eq!(engine.write(part, &mut out, flush).unwrap(), expected);
        streamed.extend(out);
    }
    assert_eq!(streamed, whole);
    assert!(!engine.has_buffered_state());
}

fn decode<D: surrocodec::ScalarDecoder + Clone>(codec: D, bytes: &[u8], splits: &[u8]) {
    let whole = DecodeEngine::new(codec.clone())
        .decode_to_vec(bytes, true)
        .unwrap();

    let mut engine = DecodeEngine::new(codec);
    let mut streamed = Vec::new();
    let parts = chunks(bytes, splits);
    for (i, part) in parts.iter().enumerate() {
        let flush = i + 1 == parts.len();
        let expected = engine.measure(part, flush).unwrap();
        let mut out = vec![0u16; expected];
        assert_eq!(engine.write(part, &mut out, flush).unwrap(), expected);
        streamed.extend(out);
    }
    assert_eq!(streamed, whole);
    assert!(!engine.has_buffered_state());
}

fuzz_target!(|input: Input| {
    match input {
        Input::Encode { units, splits } => encode(&units, &splits),
        Input::DecodeUtf8 { bytes, splits } => {
            decode(Utf8Codec::new(), &bytes, &splits);
            let lossy = String::from_utf8_lossy(&bytes);
            let units = DecodeEngine::new(Utf8Codec::new())
                .decode_to_vec(&bytes, true)
                .unwrap();
            assert_eq!(units, lossy.encode_utf16().collect::<Vec<_>>());
        }
        Input::DecodeUtf32 { bytes, splits } => decode(Utf32LeCodec::new(), &bytes, &splits),
    }
});
