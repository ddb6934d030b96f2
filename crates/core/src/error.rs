//! Error types for the lzsave codec.
//!
//! All operations return structured errors rather than panicking.
//! Compression is total; only decoding and alphabet construction can fail.

use thiserror::Error;

/// Top-level error type for all codec operations.
///
/// Each variant corresponds to a specific failure domain:
/// - Bit I/O: pulling bits past the end of the symbol stream
/// - Alphabet: building an alphabet or mapping a symbol back to its value
/// - Codec: malformed dictionary codes or undecodable output
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum Error {
    /// Bit I/O operation failed (e.g., reading past end of input)
    #[error("bit I/O error: {0}")]
    BitIo(#[from] BitIoError),

    /// Alphabet construction or reverse lookup failed
    #[error("alphabet error: {0}")]
    Alphabet(#[from] AlphabetError),

    /// Malformed compressed stream
    #[error("codec error: {0}")]
    Codec(#[from] CodecError),
}

/// Bit-level I/O errors.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum BitIoError {
    /// A symbol was requested past the end of the input sequence
    #[error("out of input: needed a symbol after {consumed} symbols")]
    OutOfInput { consumed: usize },

    /// Invalid bit count (codes are at most 32 bits wide)
    #[error("invalid bit count: {0}")]
    InvalidBitCount(usize),
}

/// Alphabet errors.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AlphabetError {
    /// The alphabet does not contain exactly 64 symbols
    #[error("alphabet must have {expected} symbols, got {actual}")]
    WrongLength { expected: usize, actual: usize },

    /// A symbol appears more than once
    #[error("duplicate alphabet symbol {0:?}")]
    DuplicateSymbol(char),

    /// The padding symbol is also one of the 64 value symbols
    #[error("padding symbol {0:?} is also a value symbol")]
    PaddingCollision(char),

    /// Decode input contains a symbol absent from the alphabet
    #[error("invalid alphabet symbol {symbol:?} at position {position}")]
    InvalidSymbol { symbol: char, position: usize },
}

/// Compressed stream errors.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CodecError {
    /// A code resolves to neither a dictionary entry nor the self-extension slot
    #[error("invalid code {code} (dictionary holds {dictionary_size} entries)")]
    InvalidCode { code: u32, dictionary_size: usize },

    /// The stream ended before its terminator
    #[error("stream truncated after {codes_read} codes")]
    Truncated { codes_read: usize },

    /// Decoded code units are not valid UTF-16
    #[error("decoded text is not valid UTF-16")]
    InvalidUtf16,
}

/// Type alias for Result with our Error type
pub type Result<T> = std::result::Result<T, Error>;
