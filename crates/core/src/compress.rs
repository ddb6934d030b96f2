//! Encoder: text -> alphabet symbols.
//!
//! The encoder walks the input one UTF-16 unit at a time, extending the
//! current fragment `w` while `w + c` is already known. When the extension is
//! new, `w` is written either as a literal escape (first time a unit is sent)
//! or as its dictionary code, and `w + c` takes the next code.

use crate::alphabet::{Alphabet, BITS_PER_SYMBOL};
use crate::bitio::BitWriter;
use crate::dictionary::{
    EncoderDictionary, Fragment, GrowthSchedule, END_OF_STREAM, LITERAL_NARROW, LITERAL_WIDE,
};
use crate::error::Result;
use crate::metrics::CodecStats;
use tracing::debug;

/// Single-use encoder state for one compression call.
struct Encoder {
    dictionary: EncoderDictionary,
    schedule: GrowthSchedule,
    writer: BitWriter,
    stats: CodecStats,
}

impl Encoder {
    fn new() -> Self {
        Self {
            dictionary: EncoderDictionary::new(),
            schedule: GrowthSchedule::for_encoder(),
            writer: BitWriter::new(BITS_PER_SYMBOL),
            stats: CodecStats::new(),
        }
    }

    fn run(mut self, units: &[u16]) -> Result<(Vec<u16>, CodecStats)> {
        let mut w: Option<Fragment> = None;

        for &c in units {
            let single = self.dictionary.unit(c);

            let Some(current) = w else {
                w = Some(single);
                continue;
            };

            if let Some(extended) = self.dictionary.extension(&current, c) {
                w = Some(extended);
                continue;
            }

            self.emit(&current)?;
            self.schedule.consume();
            self.dictionary.insert_extension(&current, c);
            w = Some(single);
        }

        if let Some(last) = w {
            self.emit(&last)?;
            self.schedule.consume();
        }

        self.writer.write_bits(END_OF_STREAM, self.schedule.width())?;

        self.stats.text_units = units.len() as u64;
        self.stats.dictionary_size = self.dictionary.size() as u64;
        self.stats.final_code_width = self.schedule.width();
        Ok((self.writer.finish(), self.stats))
    }

    /// Write `w` as a literal escape or as its dictionary code.
    ///
    /// The literal branch is itself a growth event, on top of the one every
    /// flushed fragment counts for.
    fn emit(&mut self, w: &Fragment) -> Result<()> {
        if self.dictionary.take_pending(w) {
            let width = self.schedule.width();
            if w.first < 256 {
                self.writer.write_bits(LITERAL_NARROW, width)?;
                self.writer.write_bits(u32::from(w.first), 8)?;
                self.stats.narrow_literals += 1;
            } else {
                self.writer.write_bits(LITERAL_WIDE, width)?;
                self.writer.write_bits(u32::from(w.first), 16)?;
                self.stats.wide_literals += 1;
            }
            self.schedule.consume();
        } else {
            self.writer.write_bits(w.code, self.schedule.width())?;
            self.stats.dictionary_codes += 1;
        }
        Ok(())
    }
}

/// Compress UTF-16 units into alphabet symbols.
///
/// Empty input yields empty output. Otherwise the output is padded to a
/// multiple of four symbols when the alphabet has a padding symbol.
///
/// # Errors
/// `BitIoError::InvalidBitCount` once the code width would pass 32 bits,
/// which takes more than 2^32 dictionary codes.
pub fn compress_units(units: &[u16], alphabet: &Alphabet) -> Result<(String, CodecStats)> {
    if units.is_empty() {
        let mut stats = CodecStats::new();
        stats.complete();
        return Ok((String::new(), stats));
    }

    let (groups, mut stats) = Encoder::new().run(units)?;

    let mut output = String::with_capacity(groups.len() + 3);
    output.extend(groups.iter().map(|&g| alphabet.symbol(g as u8)));
    alphabet.pad(&mut output, groups.len());

    stats.symbols = output.chars().count() as u64;
    stats.complete();

    debug!(
        units = units.len(),
        symbols = stats.symbols,
        dictionary_size = stats.dictionary_size,
        code_width = stats.final_code_width,
        "compressed"
    );

    Ok((output, stats))
}

/// Compress text into alphabet symbols.
pub fn compress(text: &str, alphabet: &Alphabet) -> Result<(String, CodecStats)> {
    let units: Vec<u16> = text.encode_utf16().collect();
    compress_units(&units, alphabet)
}
