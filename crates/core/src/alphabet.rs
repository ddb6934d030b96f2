//! Output alphabets: 64 value symbols plus an optional padding symbol.
//!
//! Each symbol carries one 6-bit group of the compressed bit stream. The
//! reverse lookup (symbol -> value) is built once when the alphabet is
//! constructed and never mutated afterwards. Clones share the same tables,
//! so the built-in alphabets are built once per process.
//!
//! # Example
//! ```
//! use lzsave_core::alphabet::Alphabet;
//!
//! let alphabet = Alphabet::base64();
//! assert_eq!(alphabet.symbol(0), 'A');
//! assert_eq!(alphabet.value_of('/'), Some(63));
//! assert_eq!(alphabet.padding(), Some('='));
//! ```

use crate::error::AlphabetError;
use once_cell::sync::Lazy;
use std::collections::HashMap;
use std::sync::Arc;

/// Number of value symbols in every alphabet.
pub const ALPHABET_SIZE: usize = 64;

/// Bits carried by one alphabet symbol.
pub const BITS_PER_SYMBOL: u8 = 6;

/// Standard Base64 value symbols.
pub const BASE64_SYMBOLS: &str =
    "ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789+/";

/// Padding symbol used with [`BASE64_SYMBOLS`].
pub const BASE64_PADDING: char = '=';

/// URI-component-safe value symbols (no padding).
pub const URI_SAFE_SYMBOLS: &str =
    "ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789+-$";

static BASE64: Lazy<Alphabet> = Lazy::new(|| {
    Alphabet::build(BASE64_SYMBOLS, Some(BASE64_PADDING))
        .unwrap_or_else(|e| unreachable!("built-in base64 alphabet is valid: {e}"))
});

static URI_SAFE: Lazy<Alphabet> = Lazy::new(|| {
    Alphabet::build(URI_SAFE_SYMBOLS, None)
        .unwrap_or_else(|e| unreachable!("built-in uri-safe alphabet is valid: {e}"))
});

/// A validated 64-symbol output alphabet with its reverse lookup.
///
/// # Invariants
/// - exactly [`ALPHABET_SIZE`] distinct value symbols
/// - the padding symbol, if any, is not a value symbol
/// - `reverse[symbols[v]] == v` for every value `v`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Alphabet {
    tables: Arc<Tables>,
}

#[derive(Debug, PartialEq, Eq)]
struct Tables {
    symbols: Vec<char>,
    padding: Option<char>,
    reverse: HashMap<char, u8>,
}

impl Alphabet {
    /// Build an alphabet from 64 symbols and an optional padding symbol.
    ///
    /// # Errors
    /// - `AlphabetError::WrongLength` if `symbols` is not 64 characters
    /// - `AlphabetError::DuplicateSymbol` if a symbol repeats
    /// - `AlphabetError::PaddingCollision` if `padding` is a value symbol
    pub fn new(symbols: &str, padding: Option<char>) -> crate::Result<Self> {
        Ok(Self::build(symbols, padding)?)
    }

    fn build(symbols: &str, padding: Option<char>) -> Result<Self, AlphabetError> {
        let symbols: Vec<char> = symbols.chars().collect();
        if symbols.len() != ALPHABET_SIZE {
            return Err(AlphabetError::WrongLength {
                expected: ALPHABET_SIZE,
                actual: symbols.len(),
            });
        }

        let mut reverse = HashMap::with_capacity(ALPHABET_SIZE);
        for (value, &symbol) in symbols.iter().enumerate() {
            if reverse.insert(symbol, value as u8).is_some() {
                return Err(AlphabetError::DuplicateSymbol(symbol));
            }
        }

        if let Some(pad) = padding {
            if reverse.contains_key(&pad) {
                return Err(AlphabetError::PaddingCollision(pad));
            }
        }

        Ok(Self {
            tables: Arc::new(Tables {
                symbols,
                padding,
                reverse,
            }),
        })
    }

    /// The standard Base64 alphabet with `=` padding.
    pub fn base64() -> Self {
        BASE64.clone()
    }

    /// The URI-safe alphabet (`+`, `-`, `$`), without padding.
    pub fn uri_safe() -> Self {
        URI_SAFE.clone()
    }

    /// Symbol for a 6-bit value. Only the low 6 bits of `value` are used.
    pub fn symbol(&self, value: u8) -> char {
        self.tables.symbols[(value & 0x3F) as usize]
    }

    /// Value of a symbol, or `None` if it is not a value symbol.
    pub fn value_of(&self, symbol: char) -> Option<u8> {
        self.tables.reverse.get(&symbol).copied()
    }

    /// Padding symbol, if this alphabet pads its output.
    pub fn padding(&self) -> Option<char> {
        self.tables.padding
    }

    /// Whether `symbol` may appear in compressed output.
    pub fn contains(&self, symbol: char) -> bool {
        self.tables.reverse.contains_key(&symbol) || self.tables.padding == Some(symbol)
    }

    /// Map every symbol of `input` to its value.
    ///
    /// Trailing padding symbols are dropped; padding anywhere else is treated
    /// like any other foreign symbol.
    ///
    /// # Errors
    /// Returns `AlphabetError::InvalidSymbol` for the first unknown symbol.
    pub fn values_of(&self, input: &str) -> Result<Vec<u8>, AlphabetError> {
        let body = match self.tables.padding {
            Some(pad) => input.trim_end_matches(pad),
            None => input,
        };

        body.chars()
            .enumerate()
            .map(|(position, symbol)| {
                self.value_of(symbol)
                    .ok_or(AlphabetError::InvalidSymbol { symbol, position })
            })
            .collect()
    }

    /// Append padding symbols until `output` holds a multiple of 4 symbols.
    pub fn pad(&self, output: &mut String, symbol_count: usize) {
        if let Some(pad) = self.tables.padding {
            let rem = symbol_count % 4;
            if rem > 0 {
                output.extend(std::iter::repeat(pad).take(4 - rem));
            }
        }
    }
}

impl Default for Alphabet {
    fn default() -> Self {
        Self::base64()
    }
}
