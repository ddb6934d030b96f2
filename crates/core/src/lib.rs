//! lzsave-core: bit-exact LZ-string style text compression
//!
//! This library reads and writes the compressed-text format used by
//! browser-based game engines for save data:
//! - Compresses text with a self-extending LZ dictionary
//! - Emits variable-width codes through a sub-symbol bit accumulator
//! - Packs the bit stream into a 64-symbol alphabet (Base64 by default)
//! - Decompresses the same format, tolerating truncated streams
//!
//! # Architecture
//!
//! - `alphabet`: 64-symbol output alphabets and their reverse lookup
//! - `bitio`: Low-level bit writing/reading over symbol groups
//! - `dictionary`: Code dictionaries and the code-width growth schedule
//! - `compress`: The encoder
//! - `decompress`: The decoder, decode modes and outcomes
//! - `codec`: `LzCodec`, the configured entry point
//! - `metrics`: Per-call statistics
//!
//! # Example
//! ```
//! use lzsave_core::{compress_to_base64, decompress_from_base64};
//!
//! let packed = compress_to_base64("Hello, world").unwrap();
//! assert_eq!(packed, "BIUwNmD2A0AEDukBOYAmQ===");
//! assert_eq!(decompress_from_base64(&packed).unwrap(), "Hello, world");
//! ```

pub mod alphabet;
pub mod bitio;
pub mod codec;
pub mod compress;
pub mod decompress;
pub mod dictionary;
pub mod error;
pub mod metrics;

// Re-export commonly used types
pub use alphabet::Alphabet;
pub use codec::LzCodec;
pub use decompress::{DecodeMode, DecodeOutcome, DecoderConfig, DictionaryLimit};
pub use error::{Error, Result};
pub use metrics::CodecStats;

/// Compress text with the standard Base64 alphabet.
pub fn compress_to_base64(text: &str) -> Result<String> {
    Ok(compress::compress(text, &Alphabet::base64())?.0)
}

/// Decompress Base64-alphabet text with strict decoding.
pub fn decompress_from_base64(symbols: &str) -> Result<String> {
    LzCodec::new().decompress(symbols)
}
