//! Decoder: alphabet symbols -> text.
//!
//! The decoder mirrors the encoder: it reads a seed literal, then one code per
//! step at the current code width. Literal escapes register a new unit, code
//! `2` ends the stream, and every other code resolves through the dictionary,
//! or through self-extension when it names the slot about to be filled.
//!
//! # Failure handling
//!
//! - Unknown symbols in the input are always an error.
//! - Running out of input after the seed is a soft failure: the outcome is
//!   [`DecodeOutcome::Truncated`] and `decompress` returns empty text.
//! - Invalid codes, or input too short to hold the seed, are errors in
//!   [`DecodeMode::Strict`] and collapse to empty text in
//!   [`DecodeMode::Lenient`].

use crate::alphabet::{Alphabet, BITS_PER_SYMBOL};
use crate::bitio::BitReader;
use crate::dictionary::{
    DecoderDictionary, GrowthSchedule, END_OF_STREAM, LITERAL_NARROW, LITERAL_WIDE,
    MAX_DICTIONARY_SIZE,
};
use crate::error::{BitIoError, CodecError, Error, Result};
use crate::metrics::CodecStats;
use tracing::{debug, warn};

/// How malformed streams are reported.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DecodeMode {
    /// Invalid codes and short headers are errors
    #[default]
    Strict,
    /// Invalid codes and short headers decode to empty text
    Lenient,
}

/// Growth bound for the decode dictionary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DictionaryLimit {
    /// Grow without bound, exactly like the encoder
    #[default]
    Unbounded,
    /// Stop inserting fragments once this many codes exist
    Capped(usize),
}

impl DictionaryLimit {
    /// The cap used by the bounded variant of the format.
    pub fn standard_cap() -> Self {
        DictionaryLimit::Capped(MAX_DICTIONARY_SIZE)
    }

    fn as_option(self) -> Option<usize> {
        match self {
            DictionaryLimit::Unbounded => None,
            DictionaryLimit::Capped(n) => Some(n),
        }
    }
}

/// Decoder settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DecoderConfig {
    pub mode: DecodeMode,
    pub dictionary_limit: DictionaryLimit,
}

impl DecoderConfig {
    /// Reference-compatible settings: lenient, capped dictionary.
    pub fn legacy() -> Self {
        Self {
            mode: DecodeMode::Lenient,
            dictionary_limit: DictionaryLimit::standard_cap(),
        }
    }
}

/// Result of a decode pass that did not hit a hard error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DecodeOutcome {
    /// The terminator was reached
    Complete(Vec<u16>),
    /// The input ended before the terminator
    Truncated { codes_read: usize },
    /// Lenient mode swallowed this error
    Rejected(Error),
}

impl DecodeOutcome {
    /// Decoded units, or nothing for a truncated or rejected stream.
    pub fn into_units(self) -> Vec<u16> {
        match self {
            DecodeOutcome::Complete(units) => units,
            DecodeOutcome::Truncated { .. } | DecodeOutcome::Rejected(_) => Vec::new(),
        }
    }

    /// Decoded units, turning soft failures into errors.
    pub fn into_strict(self) -> Result<Vec<u16>> {
        match self {
            DecodeOutcome::Complete(units) => Ok(units),
            DecodeOutcome::Truncated { codes_read } => {
                Err(CodecError::Truncated { codes_read }.into())
            }
            DecodeOutcome::Rejected(err) => Err(err),
        }
    }

    pub fn is_complete(&self) -> bool {
        matches!(self, DecodeOutcome::Complete(_))
    }
}

/// Single-use decoder state for one decompression call.
struct Decoder<'a> {
    reader: BitReader<'a>,
    dictionary: DecoderDictionary,
    schedule: GrowthSchedule,
    stats: CodecStats,
    codes_read: usize,
}

impl<'a> Decoder<'a> {
    fn new(groups: &'a [u16], limit: DictionaryLimit) -> Self {
        Self {
            reader: BitReader::new(groups, BITS_PER_SYMBOL),
            dictionary: DecoderDictionary::new(limit.as_option()),
            schedule: GrowthSchedule::for_decoder(),
            stats: CodecStats::new(),
            codes_read: 0,
        }
    }

    fn run(mut self) -> Result<(DecodeOutcome, CodecStats)> {
        let seed = match self.reader.read_bits(2)? {
            LITERAL_NARROW => self.literal(8)?,
            LITERAL_WIDE => self.literal(16)?,
            END_OF_STREAM => return Ok(self.finish(Vec::new())),
            code => {
                return Err(CodecError::InvalidCode {
                    code,
                    dictionary_size: self.dictionary.size(),
                }
                .into())
            }
        };
        self.dictionary.push_literal(seed);

        let mut w = vec![seed];
        let mut output = vec![seed];

        loop {
            let Some(mut code) = self.read(self.schedule.width())? else {
                return Ok(self.truncated());
            };
            self.codes_read += 1;

            match code {
                LITERAL_NARROW | LITERAL_WIDE => {
                    let width = if code == LITERAL_NARROW { 8 } else { 16 };
                    let Some(unit) = self.read(width)? else {
                        return Ok(self.truncated());
                    };
                    let unit = unit as u16;
                    self.count_literal(unit);
                    code = self.dictionary.push_literal(unit);
                    self.schedule.consume();
                }
                END_OF_STREAM => return Ok(self.finish(output)),
                _ => self.stats.dictionary_codes += 1,
            }

            let entry = match self.dictionary.get(code) {
                Some(fragment) => fragment.to_vec(),
                None if code == self.dictionary.next_code() => {
                    self.stats.self_extensions += 1;
                    let mut entry = w.clone();
                    entry.push(w[0]);
                    entry
                }
                None => {
                    return Err(CodecError::InvalidCode {
                        code,
                        dictionary_size: self.dictionary.size(),
                    }
                    .into())
                }
            };

            output.extend_from_slice(&entry);

            if self.dictionary.insert_extension(&w, entry[0]) {
                self.schedule.consume();
            }
            w = entry;
        }
    }

    /// Read a literal payload during the header, counting it.
    fn literal(&mut self, width: u8) -> Result<u16> {
        let unit = self.reader.read_bits(width)? as u16;
        self.count_literal(unit);
        Ok(unit)
    }

    fn count_literal(&mut self, unit: u16) {
        if unit < 256 {
            self.stats.narrow_literals += 1;
        } else {
            self.stats.wide_literals += 1;
        }
    }

    /// Read after the seed: running out of input is a soft stop, not an error.
    fn read(&mut self, width: u8) -> Result<Option<u32>> {
        match self.reader.read_bits(width) {
            Ok(value) => Ok(Some(value)),
            Err(Error::BitIo(BitIoError::OutOfInput { .. })) => Ok(None),
            Err(err) => Err(err),
        }
    }

    fn finish(mut self, output: Vec<u16>) -> (DecodeOutcome, CodecStats) {
        self.stats.text_units = output.len() as u64;
        self.stats.dictionary_size = self.dictionary.size() as u64;
        self.stats.final_code_width = self.schedule.width();
        self.stats.complete();
        (DecodeOutcome::Complete(output), self.stats)
    }

    fn truncated(mut self) -> (DecodeOutcome, CodecStats) {
        warn!(
            codes_read = self.codes_read,
            symbols_consumed = self.reader.cursor().index,
            "compressed stream ended before its terminator"
        );
        self.stats.dictionary_size = self.dictionary.size() as u64;
        self.stats.final_code_width = self.schedule.width();
        self.stats.complete();
        (
            DecodeOutcome::Truncated {
                codes_read: self.codes_read,
            },
            self.stats,
        )
    }
}

/// Decode alphabet symbols, reporting how the stream ended.
///
/// # Errors
/// - `AlphabetError::InvalidSymbol` for a symbol outside the alphabet
/// - in strict mode, `CodecError::InvalidCode` and `BitIoError::OutOfInput`
pub fn decode(
    symbols: &str,
    alphabet: &Alphabet,
    config: DecoderConfig,
) -> Result<(DecodeOutcome, CodecStats)> {
    let values: Vec<u16> = alphabet
        .values_of(symbols)?
        .into_iter()
        .map(u16::from)
        .collect();

    if values.is_empty() {
        let mut stats = CodecStats::new();
        stats.symbols = symbols.chars().count() as u64;
        stats.complete();
        return Ok((DecodeOutcome::Complete(Vec::new()), stats));
    }

    let result = Decoder::new(&values, config.dictionary_limit).run();

    let (outcome, mut stats) = match (result, config.mode) {
        (Ok(decoded), _) => decoded,
        (Err(err), DecodeMode::Lenient) => {
            warn!(error = %err, "discarding malformed compressed stream");
            let mut stats = CodecStats::new();
            stats.complete();
            (DecodeOutcome::Rejected(err), stats)
        }
        (Err(err), DecodeMode::Strict) => return Err(err),
    };
    stats.symbols = symbols.chars().count() as u64;

    debug!(
        symbols = stats.symbols,
        units = stats.text_units,
        dictionary_size = stats.dictionary_size,
        code_width = stats.final_code_width,
        complete = outcome.is_complete(),
        "decompressed"
    );

    Ok((outcome, stats))
}

/// Decode alphabet symbols into UTF-16 units.
///
/// Truncated streams, and malformed ones in lenient mode, yield no units.
pub fn decompress_units(
    symbols: &str,
    alphabet: &Alphabet,
    config: DecoderConfig,
) -> Result<(Vec<u16>, CodecStats)> {
    let (outcome, stats) = decode(symbols, alphabet, config)?;
    Ok((outcome.into_units(), stats))
}

/// Decode alphabet symbols into text.
///
/// # Errors
/// Everything [`decode`] reports, plus `CodecError::InvalidUtf16` when the
/// decoded units contain an unpaired surrogate.
pub fn decompress(
    symbols: &str,
    alphabet: &Alphabet,
    config: DecoderConfig,
) -> Result<(String, CodecStats)> {
    let (units, stats) = decompress_units(symbols, alphabet, config)?;
    let text = String::from_utf16(&units).map_err(|_| CodecError::InvalidUtf16)?;
    Ok((text, stats))
}
