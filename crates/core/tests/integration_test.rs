//! Integration tests for the full codec.
//!
//! These tests verify end-to-end behavior: text -> compress -> symbols ->
//! decompress -> text, against fixtures produced by the reference
//! implementation of the format.

use lzsave_core::{
    alphabet::BASE64_SYMBOLS,
    compress_to_base64, decompress_from_base64,
    error::{AlphabetError, CodecError},
    Alphabet, DecodeMode, DecodeOutcome, DecoderConfig, DictionaryLimit, Error, LzCodec,
};

/// (plain text, compressed form) pairs from the reference implementation.
const FIXTURES: &[(&str, &str)] = &[
    ("A", "IJA="),
    ("AB", "IIISA==="),
    ("AAAAAAAAAA", "II1o"),
    ("ABCDEFGHIJ", "IIIQwgIgogYg4gCQJICkg==="),
    ("Hello, world", "BIUwNmD2A0AEDukBOYAmQ==="),
    ("héllo wörld", "BYS4NmD2AEDuBvAnMATIA==="),
    ("日本語テキスト", "qemhpzR5UYYwyLUMidDIEwxA"),
    ("abababababababab", "IYI17SKA"),
    ("{\"gold\":1000}", "N4Ig5g9gNgJiBcBGADKgvkA="),
];

fn sample_save_document() -> String {
    let mut doc = String::from("{\"system\":{\"_saveCount\":12,\"_versionId\":4},");
    doc.push_str("\"variables\":{\"_data\":{\"@c\":1,\"@a\":[");
    for i in 0..100 {
        if i > 0 {
            doc.push(',');
        }
        doc.push_str(&(i * 37 % 1000).to_string());
    }
    doc.push_str("]}},\"party\":{\"_gold\":5000,\"_actors\":[\"アリス\",\"Bob\",\"Zoë\"]}}");
    doc
}

/// Compressing each fixture reproduces the reference output exactly.
#[test]
fn test_fixtures_compress_bit_exact() {
    for &(text, expected) in FIXTURES {
        assert_eq!(compress_to_base64(text).unwrap(), expected, "compressing {text:?}");
    }
}

/// Reference output decodes back to the original text.
#[test]
fn test_fixtures_decompress() {
    for &(text, compressed) in FIXTURES {
        assert_eq!(
            decompress_from_base64(compressed).unwrap(),
            text,
            "decompressing {compressed:?}"
        );
    }
}

/// Round trip over assorted shapes of input.
#[test]
fn test_roundtrip_identity() {
    let codec = LzCodec::new();
    let long_repetitive = "abc".repeat(10_000);
    let inputs = [
        "",
        "x",
        "\0",
        "ÿ",
        "Ā",
        "\u{FFFF}",
        "mixed ascii, Latin-1 ©, and 漢字 with emoji 🎮",
        long_repetitive.as_str(),
    ];

    for input in inputs {
        let compressed = codec.compress(input).unwrap();
        assert_eq!(codec.decompress(&compressed).unwrap(), input);
    }
}

#[test]
fn test_empty_conventions() {
    assert_eq!(compress_to_base64("").unwrap(), "");
    assert_eq!(decompress_from_base64("").unwrap(), "");
}

/// Every output symbol belongs to the alphabet and lengths are multiples of 4.
#[test]
fn test_alphabet_closure() {
    let codec = LzCodec::new();
    let alphabet = Alphabet::base64();
    let doc = sample_save_document();

    let compressed = codec.compress(&doc).unwrap();
    assert_eq!(compressed.len() % 4, 0);
    assert!(compressed.chars().all(|c| alphabet.contains(c)));
}

/// The dictionary captures repetition.
#[test]
fn test_repetition_shorter_than_distinct() {
    let repeated = compress_to_base64("AAAAAAAAAA").unwrap();
    let distinct = compress_to_base64("ABCDEFGHIJ").unwrap();

    assert_eq!(decompress_from_base64(&repeated).unwrap(), "AAAAAAAAAA");
    assert!(repeated.len() < distinct.len());
}

/// Wide characters take the 16-bit literal path.
#[test]
fn test_wide_character_document() {
    let codec = LzCodec::new();
    let doc = "{\"name\":\"勇者\",\"gold\":250}";

    let (compressed, stats) = codec.compress_with_stats(doc).unwrap();
    assert_eq!(stats.wide_literals, 2);
    assert_eq!(codec.decompress(&compressed).unwrap(), doc);
}

/// A realistic save document survives the round trip and compresses.
#[test]
fn test_save_document_roundtrip() {
    let codec = LzCodec::new();
    let doc = sample_save_document();

    let compressed = codec.compress(&doc).unwrap();
    assert!(compressed.len() < doc.len());
    assert_eq!(codec.decompress(&compressed).unwrap(), doc);
}

/// Encoder and decoder finish with the same dictionary size and code width.
#[test]
fn test_encoder_decoder_stats_agree() {
    let codec = LzCodec::new();
    let mut inputs: Vec<String> = FIXTURES.iter().map(|(t, _)| t.to_string()).collect();
    inputs.push(sample_save_document());
    inputs.push("the rain in spain ".repeat(300));

    for input in inputs {
        let (compressed, enc) = codec.compress_with_stats(&input).unwrap();
        let (_, dec) = codec.decompress_with_stats(&compressed).unwrap();

        assert_eq!(enc.dictionary_size, dec.dictionary_size, "{input:?}");
        assert_eq!(enc.final_code_width, dec.final_code_width, "{input:?}");
        assert_eq!(enc.narrow_literals, dec.narrow_literals, "{input:?}");
        assert_eq!(enc.wide_literals, dec.wide_literals, "{input:?}");
        assert_eq!(enc.dictionary_codes, dec.dictionary_codes, "{input:?}");
        assert_eq!(dec.text_units, enc.text_units);
    }
}

/// Running the same input twice yields identical streams and widths.
#[test]
fn test_deterministic_output() {
    let codec = LzCodec::new();
    let doc = sample_save_document();

    let (a, stats_a) = codec.compress_with_stats(&doc).unwrap();
    let (b, stats_b) = codec.compress_with_stats(&doc).unwrap();
    assert_eq!(a, b);
    assert_eq!(stats_a.final_code_width, stats_b.final_code_width);
    assert_eq!(stats_a.dictionary_size, stats_b.dictionary_size);
}

/// Foreign symbols are reported with their position.
#[test]
fn test_invalid_alphabet_symbol() {
    let err = decompress_from_base64("BIUw NmD2").unwrap_err();
    assert_eq!(
        err,
        Error::Alphabet(AlphabetError::InvalidSymbol {
            symbol: ' ',
            position: 4
        })
    );
}

/// Truncated streams decode to nothing, not to a partial prefix.
#[test]
fn test_truncated_stream_returns_empty() {
    let codec = LzCodec::new();
    let doc = sample_save_document();
    let compressed = codec.compress(&doc).unwrap();

    for keep in [8, compressed.len() / 3, compressed.len() / 2] {
        let cut = &compressed[..keep];
        assert_eq!(codec.decompress(cut).unwrap(), "", "kept {keep} symbols");
        assert!(matches!(
            codec.decode(cut).unwrap(),
            DecodeOutcome::Truncated { .. }
        ));
    }
}

/// An out-of-range code is an error in strict mode and empty in lenient mode.
#[test]
fn test_invalid_code_modes() {
    // Seed 'A' (control 0 + 8 bits), then code 7 at width 3: the dictionary
    // holds codes 0-3 and the self-extension slot is 4.
    let mut bits = vec![0, 0];
    bits.extend((0..8).map(|i| (0x41 >> i) & 1));
    bits.extend([1, 1, 1]);
    while bits.len() % 6 != 0 {
        bits.push(0);
    }
    let symbols: String = bits
        .chunks(6)
        .map(|chunk| {
            let value = chunk.iter().fold(0u8, |acc, &b| (acc << 1) | b as u8);
            BASE64_SYMBOLS.as_bytes()[value as usize] as char
        })
        .collect();

    let strict = LzCodec::new();
    assert!(matches!(
        strict.decompress(&symbols),
        Err(Error::Codec(CodecError::InvalidCode { code: 7, .. }))
    ));

    let lenient = LzCodec::new().with_decoder_config(DecoderConfig {
        mode: DecodeMode::Lenient,
        ..DecoderConfig::default()
    });
    assert_eq!(lenient.decompress(&symbols).unwrap(), "");
    assert!(matches!(
        lenient.decode(&symbols).unwrap(),
        DecodeOutcome::Rejected(Error::Codec(CodecError::InvalidCode { .. }))
    ));
}

/// The capped dictionary only matters once the stream outgrows it.
#[test]
fn test_dictionary_cap() {
    let doc = sample_save_document();
    let compressed = compress_to_base64(&doc).unwrap();

    let standard = LzCodec::new().with_decoder_config(DecoderConfig {
        dictionary_limit: DictionaryLimit::standard_cap(),
        ..DecoderConfig::default()
    });
    assert_eq!(standard.decompress(&compressed).unwrap(), doc);

    let tiny = LzCodec::new().with_decoder_config(DecoderConfig {
        mode: DecodeMode::Lenient,
        dictionary_limit: DictionaryLimit::Capped(16),
    });
    assert_ne!(tiny.decompress(&compressed).ok(), Some(doc));
}

/// Substituting an alphabet needs no code changes.
#[test]
fn test_custom_alphabet_roundtrip() {
    let shuffled: String = BASE64_SYMBOLS.chars().rev().collect();
    let alphabet = Alphabet::new(&shuffled, Some('~')).unwrap();
    let codec = LzCodec::new().with_alphabet(alphabet.clone());
    let doc = sample_save_document();

    let compressed = codec.compress(&doc).unwrap();
    assert_ne!(compressed, compress_to_base64(&doc).unwrap());
    assert!(compressed.chars().all(|c| alphabet.contains(c)));
    assert_eq!(codec.decompress(&compressed).unwrap(), doc);
}
