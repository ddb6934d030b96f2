//! Per-call statistics for encode and decode passes.
//!
//! Counts are collected by the encoder and decoder as they run and returned
//! alongside the result by `compress_with_stats` / `decompress_with_stats`.
//!
//! # Thread Safety
//!
//! `CodecStats` is a plain value owned by one call. Merge per-call values
//! with [`CodecStats::merge`] to aggregate.

use std::time::{Duration, Instant};

/// Counters describing a single encode or decode call.
#[derive(Debug, Clone)]
pub struct CodecStats {
    // === Timing ===
    /// When the call started
    pub start_time: Instant,

    /// When the call finished (set on completion)
    pub end_time: Option<Instant>,

    // === Sizes ===
    /// UTF-16 units of plain text (input when encoding, output when decoding)
    pub text_units: u64,

    /// Alphabet symbols, padding included
    pub symbols: u64,

    // === Stream content ===
    /// Literal escapes carrying an 8-bit unit
    pub narrow_literals: u64,

    /// Literal escapes carrying a 16-bit unit
    pub wide_literals: u64,

    /// Dictionary references (excluding the terminator)
    pub dictionary_codes: u64,

    /// Decode-only: codes resolved as last fragment plus its first unit
    pub self_extensions: u64,

    // === Dictionary ===
    /// Codes in use at the end of the call, control codes included
    pub dictionary_size: u64,

    /// Code width in bits when the terminator was written or read
    pub final_code_width: u8,
}

impl CodecStats {
    /// Create stats with start time set to now.
    pub fn new() -> Self {
        Self {
            start_time: Instant::now(),
            end_time: None,
            text_units: 0,
            symbols: 0,
            narrow_literals: 0,
            wide_literals: 0,
            dictionary_codes: 0,
            self_extensions: 0,
            dictionary_size: 0,
            final_code_width: 0,
        }
    }

    /// Mark the call as complete.
    pub fn complete(&mut self) {
        self.end_time = Some(Instant::now());
    }

    /// Total duration (or current elapsed if not complete).
    pub fn duration(&self) -> Duration {
        match self.end_time {
            Some(end) => end.duration_since(self.start_time),
            None => self.start_time.elapsed(),
        }
    }

    /// Total literal escapes.
    pub fn literals(&self) -> u64 {
        self.narrow_literals + self.wide_literals
    }

    /// Compression ratio: output bytes / input bytes.
    ///
    /// Text is measured as two bytes per UTF-16 unit and symbols as one byte
    /// each. Returns 0.0 if there is no text.
    pub fn compression_ratio(&self) -> f64 {
        if self.text_units == 0 {
            0.0
        } else {
            self.symbols as f64 / (self.text_units * 2) as f64
        }
    }

    /// Add the counters of `other` into `self`.
    ///
    /// Dictionary size and code width keep the larger value.
    pub fn merge(&mut self, other: &CodecStats) {
        self.text_units += other.text_units;
        self.symbols += other.symbols;
        self.narrow_literals += other.narrow_literals;
        self.wide_literals += other.wide_literals;
        self.dictionary_codes += other.dictionary_codes;
        self.self_extensions += other.self_extensions;
        self.dictionary_size = self.dictionary_size.max(other.dictionary_size);
        self.final_code_width = self.final_code_width.max(other.final_code_width);
    }

    /// Print a human-readable summary to stdout.
    pub fn print_summary(&self) {
        println!("\n=== Codec Summary ===");
        println!("Duration: {} ms", self.duration().as_millis());
        println!();
        println!("Text:    {} units", self.text_units);
        println!("Symbols: {}", self.symbols);
        println!("Ratio:   {:.1}%", self.compression_ratio() * 100.0);
        println!();
        println!("=== Stream ===");
        println!(
            "Literals: {} ({} narrow, {} wide)",
            self.literals(),
            self.narrow_literals,
            self.wide_literals
        );
        println!("Dictionary codes: {}", self.dictionary_codes);
        println!("Self-extensions: {}", self.self_extensions);
        println!();
        println!("=== Dictionary ===");
        println!("Size: {} codes", self.dictionary_size);
        println!("Final code width: {} bits", self.final_code_width);
        println!();
    }

    /// Export stats as a simple text format (for parsing/testing).
    pub fn export_text(&self) -> String {
        format!(
            "duration_ms={}\n\
             text_units={}\n\
             symbols={}\n\
             compression_ratio={:.4}\n\
             narrow_literals={}\n\
             wide_literals={}\n\
             dictionary_codes={}\n\
             self_extensions={}\n\
             dictionary_size={}\n\
             final_code_width={}\n",
            self.duration().as_millis(),
            self.text_units,
            self.symbols,
            self.compression_ratio(),
            self.narrow_literals,
            self.wide_literals,
            self.dictionary_codes,
            self.self_extensions,
            self.dictionary_size,
            self.final_code_width,
        )
    }
}

impl Default for CodecStats {
    fn default() -> Self {
        Self::new()
    }
}
