//! Bit-level I/O over fixed-width symbol groups.
//!
//! This module provides BitWriter and BitReader for packing dictionary codes
//! into output symbols. Two orders are involved and both must match the
//! established format exactly:
//! - values are written and read least-significant bit first
//! - within a symbol group, the first stream bit is the most significant bit
//!
//! # Padding Rules
//! - BitWriter: `finish` appends zero bits until one more group completes,
//!   emitting an all-zero group if the accumulator was empty
//! - BitReader: never reads padding; the decoder stops at the terminator
//!
//! # Example
//! ```
//! use lzsave_core::bitio::{BitReader, BitWriter};
//!
//! let mut writer = BitWriter::new(6);
//! writer.write_bits(0b110, 3).unwrap(); // stream bits: 0, 1, 1
//! writer.write_bits(0b01, 2).unwrap(); // stream bits: 1, 0
//! // Group: 01110 + one zero pad bit -> 0b011100
//!
//! let groups = writer.finish();
//! assert_eq!(groups, vec![0b011100]);
//!
//! let mut reader = BitReader::new(&groups, 6);
//! assert_eq!(reader.read_bits(3).unwrap(), 0b110);
//! assert_eq!(reader.read_bits(2).unwrap(), 0b01);
//! ```

use crate::error::{BitIoError, Result};

/// Widest value the codec ever reads or writes.
pub const MAX_CODE_BITS: u8 = 32;

/// Writes values LSB-first into MSB-first symbol groups.
///
/// # Invariants
/// - `filled < bits_per_symbol`
/// - `buffer < 1 << filled`
#[derive(Debug, Clone)]
pub struct BitWriter {
    /// Completed group values
    groups: Vec<u16>,
    /// Accumulator for the current partial group
    buffer: u16,
    /// Number of bits in buffer
    filled: u8,
    /// Group width (6 for alphabet packing)
    bits_per_symbol: u8,
}

impl BitWriter {
    /// Create a writer producing groups of `bits_per_symbol` bits (1-16).
    pub fn new(bits_per_symbol: u8) -> Self {
        debug_assert!((1..=16).contains(&bits_per_symbol));
        Self {
            groups: Vec::new(),
            buffer: 0,
            filled: 0,
            bits_per_symbol,
        }
    }

    /// Append the low `width` bits of `value`, least-significant bit first.
    ///
    /// # Errors
    /// - `InvalidBitCount` if `width > MAX_CODE_BITS`; nothing is written
    pub fn write_bits(&mut self, value: u32, width: u8) -> Result<()> {
        if width > MAX_CODE_BITS {
            return Err(BitIoError::InvalidBitCount(width as usize).into());
        }

        let mut value = value;
        for _ in 0..width {
            self.push_bit(value & 1 == 1);
            value >>= 1;
        }
        Ok(())
    }

    /// Append a single bit to the current group.
    pub fn push_bit(&mut self, bit: bool) {
        self.buffer = (self.buffer << 1) | u16::from(bit);
        self.filled += 1;

        if self.filled == self.bits_per_symbol {
            self.groups.push(self.buffer);
            self.buffer = 0;
            self.filled = 0;
        }
    }

    /// Pad with zero bits until one more group completes and return all groups.
    ///
    /// At least one zero bit is always written, so an empty accumulator
    /// still yields a trailing all-zero group.
    pub fn finish(mut self) -> Vec<u16> {
        let target = self.groups.len() + 1;
        while self.groups.len() < target {
            self.push_bit(false);
        }
        self.groups
    }

    /// Number of complete groups written so far.
    pub fn group_len(&self) -> usize {
        self.groups.len()
    }

    /// Total number of bits written (including the partial group).
    pub fn bit_len(&self) -> usize {
        self.groups.len() * self.bits_per_symbol as usize + self.filled as usize
    }
}

/// Read position inside a symbol stream.
///
/// `mask` selects the next bit of `value`; zero means the current symbol is
/// spent and `index` names the next symbol to load.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BitCursor {
    pub value: u16,
    pub mask: u16,
    pub index: usize,
}

impl BitCursor {
    fn start() -> Self {
        Self {
            value: 0,
            mask: 0,
            index: 0,
        }
    }
}

/// Reads values LSB-first from MSB-first symbol groups.
///
/// # Invariants
/// - `cursor.index <= groups.len()`
#[derive(Debug, Clone)]
pub struct BitReader<'a> {
    /// Source group values
    groups: &'a [u16],
    /// Mask for the top bit of a fresh group
    reset_mask: u16,
    cursor: BitCursor,
}

impl<'a> BitReader<'a> {
    /// Create a reader over groups of `bits_per_symbol` bits (1-16).
    pub fn new(groups: &'a [u16], bits_per_symbol: u8) -> Self {
        debug_assert!((1..=16).contains(&bits_per_symbol));
        Self {
            groups,
            reset_mask: 1 << (bits_per_symbol - 1),
            cursor: BitCursor::start(),
        }
    }

    /// Read one bit, loading the next symbol when the current one is spent.
    ///
    /// # Errors
    /// `BitIoError::OutOfInput` if every symbol has been consumed.
    pub fn next_bit(&mut self) -> Result<bool> {
        if self.cursor.mask == 0 {
            let value = *self.groups.get(self.cursor.index).ok_or(BitIoError::OutOfInput {
                consumed: self.cursor.index,
            })?;
            self.cursor.value = value;
            self.cursor.mask = self.reset_mask;
            self.cursor.index += 1;
        }

        let bit = self.cursor.value & self.cursor.mask != 0;
        self.cursor.mask >>= 1;
        Ok(bit)
    }

    /// Read a `width`-bit value, least-significant bit first.
    ///
    /// # Errors
    /// - `BitIoError::InvalidBitCount` if width > 32
    /// - `BitIoError::OutOfInput` if the input runs out mid-value
    pub fn read_bits(&mut self, width: u8) -> Result<u32> {
        if width > MAX_CODE_BITS {
            return Err(BitIoError::InvalidBitCount(width as usize).into());
        }

        let mut value = 0u32;
        for shift in 0..width {
            if self.next_bit()? {
                value |= 1 << shift;
            }
        }
        Ok(value)
    }

    /// True when no unread bit remains in the input.
    pub fn is_exhausted(&self) -> bool {
        self.cursor.mask == 0 && self.cursor.index >= self.groups.len()
    }

    /// Current read position.
    pub fn cursor(&self) -> BitCursor {
        self.cursor
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_value_written_lsb_first() {
        let mut writer = BitWriter::new(6);
        writer.write_bits(0b000001, 6).unwrap();

        // First stream bit (the value's LSB) lands in the group's MSB
        assert_eq!(writer.clone().finish()[0], 0b100000);
        assert_eq!(writer.group_len(), 1);
    }

    #[test]
    fn test_write_read_across_groups() {
        let mut writer = BitWriter::new(6);
        writer.write_bits(0xABCD, 16).unwrap();
        writer.write_bits(0b101, 3).unwrap();

        let groups = writer.finish();
        assert_eq!(groups.len(), 4);

        let mut reader = BitReader::new(&groups, 6);
        assert_eq!(reader.read_bits(16).unwrap(), 0xABCD);
        assert_eq!(reader.read_bits(3).unwrap(), 0b101);
    }

    #[test]
    fn test_finish_pads_partial_group() {
        let mut writer = BitWriter::new(6);
        writer.push_bit(true);
        writer.push_bit(true);

        assert_eq!(writer.finish(), vec![0b110000]);
    }

    #[test]
    fn test_finish_on_group_boundary_adds_zero_group() {
        let mut writer = BitWriter::new(6);
        writer.write_bits(0b111111, 6).unwrap();

        assert_eq!(writer.finish(), vec![0b111111, 0]);
    }

    #[test]
    fn test_finish_empty_writer() {
        let writer = BitWriter::new(6);
        assert_eq!(writer.finish(), vec![0]);
    }

    #[test]
    fn test_bit_len() {
        let mut writer = BitWriter::new(6);
        writer.write_bits(0, 8).unwrap();
        assert_eq!(writer.bit_len(), 8);
        assert_eq!(writer.group_len(), 1);
    }

    #[test]
    fn test_read_past_end() {
        let groups = vec![0b101010];
        let mut reader = BitReader::new(&groups, 6);

        assert_eq!(reader.read_bits(6).unwrap(), 0b010101);
        assert!(reader.is_exhausted());
        let err = reader.read_bits(1).unwrap_err();
        assert!(matches!(
            err,
            crate::Error::BitIo(BitIoError::OutOfInput { consumed: 1 })
        ));
    }

    #[test]
    fn test_zero_width() {
        let mut writer = BitWriter::new(6);
        writer.write_bits(0xFF, 0).unwrap();
        assert_eq!(writer.bit_len(), 0);

        let mut reader = BitReader::new(&[], 6);
        assert_eq!(reader.read_bits(0).unwrap(), 0);
    }

    #[test]
    fn test_writer_rejects_oversized_width() {
        let mut writer = BitWriter::new(6);
        writer.write_bits(u32::MAX, 32).unwrap();
        assert!(matches!(
            writer.write_bits(1, 33),
            Err(crate::Error::BitIo(BitIoError::InvalidBitCount(33)))
        ));
        assert_eq!(writer.bit_len(), 32);
    }

    #[test]
    fn test_invalid_bit_count() {
        let groups = vec![0u16; 8];
        let mut reader = BitReader::new(&groups, 6);
        assert!(matches!(
            reader.read_bits(33),
            Err(crate::Error::BitIo(BitIoError::InvalidBitCount(33)))
        ));
    }

    #[test]
    fn test_cursor_tracks_position() {
        let groups = vec![0b100000, 0b000001];
        let mut reader = BitReader::new(&groups, 6);

        assert!(reader.next_bit().unwrap());
        let cursor = reader.cursor();
        assert_eq!(cursor.index, 1);
        assert_eq!(cursor.mask, 0b010000);

        assert_eq!(reader.read_bits(5).unwrap(), 0);
        assert!(!reader.is_exhausted());
        assert_eq!(reader.read_bits(6).unwrap(), 0b100000);
        assert!(reader.is_exhausted());
    }

    #[test]
    fn test_wider_groups() {
        let mut writer = BitWriter::new(16);
        writer.write_bits(0x1234, 16).unwrap();
        let groups = writer.finish();
        assert_eq!(groups.len(), 2);

        let mut reader = BitReader::new(&groups, 16);
        assert_eq!(reader.read_bits(16).unwrap(), 0x1234);
    }
}
