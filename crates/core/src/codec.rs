//! `LzCodec`: an alphabet and decoder settings bundled together.

use crate::alphabet::Alphabet;
use crate::compress;
use crate::decompress::{self, DecodeOutcome, DecoderConfig};
use crate::error::Result;
use crate::metrics::CodecStats;

/// Codec configured with one output alphabet.
///
/// The alphabet's reverse lookup is built when the alphabet is constructed,
/// so a codec can be reused for any number of calls. Calls share no mutable
/// state.
#[derive(Debug, Clone, Default)]
pub struct LzCodec {
    alphabet: Alphabet,
    config: DecoderConfig,
}

impl LzCodec {
    /// Codec using the standard Base64 alphabet and strict decoding.
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the output alphabet.
    pub fn with_alphabet(mut self, alphabet: Alphabet) -> Self {
        self.alphabet = alphabet;
        self
    }

    /// Replace the decoder settings.
    pub fn with_decoder_config(mut self, config: DecoderConfig) -> Self {
        self.config = config;
        self
    }

    pub fn alphabet(&self) -> &Alphabet {
        &self.alphabet
    }

    pub fn decoder_config(&self) -> DecoderConfig {
        self.config
    }

    /// Compress text. Empty text compresses to an empty string.
    pub fn compress(&self, text: &str) -> Result<String> {
        Ok(compress::compress(text, &self.alphabet)?.0)
    }

    /// Compress raw UTF-16 units.
    pub fn compress_units(&self, units: &[u16]) -> Result<String> {
        Ok(compress::compress_units(units, &self.alphabet)?.0)
    }

    pub fn compress_with_stats(&self, text: &str) -> Result<(String, CodecStats)> {
        compress::compress(text, &self.alphabet)
    }

    /// Decompress into text.
    ///
    /// Truncated input yields empty text rather than an error.
    pub fn decompress(&self, symbols: &str) -> Result<String> {
        Ok(decompress::decompress(symbols, &self.alphabet, self.config)?.0)
    }

    /// Decompress into raw UTF-16 units (unpaired surrogates allowed).
    pub fn decompress_units(&self, symbols: &str) -> Result<Vec<u16>> {
        Ok(decompress::decompress_units(symbols, &self.alphabet, self.config)?.0)
    }

    pub fn decompress_with_stats(&self, symbols: &str) -> Result<(String, CodecStats)> {
        decompress::decompress(symbols, &self.alphabet, self.config)
    }

    /// Decode and report whether the stream was complete, truncated or rejected.
    pub fn decode(&self, symbols: &str) -> Result<DecodeOutcome> {
        Ok(decompress::decode(symbols, &self.alphabet, self.config)?.0)
    }

    /// Compress then decompress, returning whether the text survived.
    pub fn verify_roundtrip(&self, text: &str) -> Result<bool> {
        let compressed = self.compress(text)?;
        Ok(self.decompress(&compressed)? == text)
    }
}
