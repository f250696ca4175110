//! Bit-level I/O over an immutable bit buffer.
//!
//! A transmission is a [`BitBuffer`]: a packed byte vector plus an exact bit
//! length. The length matters because hex input contributes 4 bits per digit,
//! so an odd number of digits leaves half a byte that must never be read.
//!
//! [`BitReader`] is a forward-only cursor over a borrowed buffer and
//! [`BitWriter`] builds a buffer. Both operate MSB-first.
//!
//! # Example
//! ```
//! use bits_core::bitio::{BitReader, BitWriter};
//!
//! let mut writer = BitWriter::new();
//! writer.write_bits(0b110, 3).unwrap();
//! writer.write_bits(0b100, 3).unwrap();
//! let buffer = writer.finish();
//! assert_eq!(buffer.bit_len(), 8); // padded to a whole byte
//!
//! let mut reader = BitReader::new(&buffer);
//! assert_eq!(reader.read_bits(3).unwrap(), 6);
//! assert_eq!(reader.read_bits(3).unwrap(), 4);
//! assert_eq!(reader.position(), 6);
//! ```

use crate::error::{BitIoError, Result};

/// An immutable, MSB-first sequence of bits.
///
/// # Invariants
/// - `bit_len <= bytes.len() * 8`
/// - bits past `bit_len` in the last byte are zero
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct BitBuffer {
    bytes: Vec<u8>,
    bit_len: usize,
}

impl BitBuffer {
    /// Wrap packed bytes, keeping only the first `bit_len` bits.
    ///
    /// `bit_len` is clamped to the number of bits actually present.
    pub fn from_bytes(mut bytes: Vec<u8>, bit_len: usize) -> Self {
        let bit_len = bit_len.min(bytes.len() * 8);
        bytes.truncate((bit_len + 7) / 8);
        let tail = bit_len % 8;
        if tail != 0 {
            if let Some(last) = bytes.last_mut() {
                *last &= 0xFF << (8 - tail);
            }
        }
        Self { bytes, bit_len }
    }

    /// Number of addressable bits.
    pub fn bit_len(&self) -> usize {
        self.bit_len
    }

    pub fn is_empty(&self) -> bool {
        self.bit_len == 0
    }

    /// Packed backing bytes (last byte may be partial).
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }
}

/// Writes bits MSB-first into a byte buffer.
///
/// Accumulates bits in a buffer and flushes complete bytes to the output.
///
/// # Invariants
/// - `bit_count` is always < 8
#[derive(Debug, Clone)]
pub struct BitWriter {
    /// Completed bytes
    bytes: Vec<u8>,
    /// Accumulator for the current partial byte (MSB-aligned)
    bit_buffer: u8,
    /// Number of bits in bit_buffer (0-7)
    bit_count: u8,
}

impl BitWriter {
    /// Create a new BitWriter with empty output.
    pub fn new() -> Self {
        Self {
            bytes: Vec::new(),
            bit_buffer: 0,
            bit_count: 0,
        }
    }

    /// Write up to 64 bits to the output.
    ///
    /// Bits are written MSB-first. For example, writing value=0b101 with count=3
    /// writes bits 1, 0, 1 in that order.
    ///
    /// # Errors
    /// Returns `BitIoError::InvalidWidth` if count > 64.
    pub fn write_bits(&mut self, value: u64, count: usize) -> Result<()> {
        if count > 64 {
            return Err(BitIoError::InvalidWidth(count).into());
        }

        let mut remaining = count;
        let mut val = value;

        while remaining > 0 {
            let bits_to_write = remaining.min(8 - self.bit_count as usize);

            // Top `bits_to_write` bits of what is left
            let shift = remaining - bits_to_write;
            let bits = ((val >> shift) & ((1 << bits_to_write) - 1)) as u8;

            self.bit_buffer |= bits << (8 - self.bit_count as usize - bits_to_write);
            self.bit_count += bits_to_write as u8;

            if self.bit_count == 8 {
                self.bytes.push(self.bit_buffer);
                self.bit_buffer = 0;
                self.bit_count = 0;
            }

            val &= (1 << shift) - 1;
            remaining -= bits_to_write;
        }

        Ok(())
    }

    /// Write a single bit.
    pub fn write_bit(&mut self, bit: bool) -> Result<()> {
        self.write_bits(bit as u64, 1)
    }

    /// Return the total number of bits written (including partial byte).
    pub fn bit_len(&self) -> usize {
        self.bytes.len() * 8 + self.bit_count as usize
    }

    /// Finish writing and return the buffer.
    ///
    /// If there are any remaining bits in the buffer, they are padded with
    /// trailing zeros to complete the final byte.
    pub fn finish(mut self) -> BitBuffer {
        if self.bit_count > 0 {
            self.bytes.push(self.bit_buffer);
        }
        let bit_len = self.bytes.len() * 8;
        BitBuffer::from_bytes(self.bytes, bit_len)
    }
}

impl Default for BitWriter {
    fn default() -> Self {
        Self::new()
    }
}

/// Reads bits MSB-first from a borrowed [`BitBuffer`].
///
/// The cursor only moves forward. A failed read leaves it untouched.
///
/// # Invariants
/// - `bit_position <= buffer.bit_len()`
#[derive(Debug, Clone)]
pub struct BitReader<'a> {
    buffer: &'a BitBuffer,
    bit_position: usize,
}

impl<'a> BitReader<'a> {
    /// Create a reader positioned at the first bit.
    pub fn new(buffer: &'a BitBuffer) -> Self {
        Self {
            buffer,
            bit_position: 0,
        }
    }

    /// Read `count` bits (1-64) as an unsigned value.
    ///
    /// # Errors
    /// - `BitIoError::InvalidWidth` if count is 0 or > 64
    /// - `BitIoError::OutOfData` if fewer than `count` bits remain
    pub fn read_bits(&mut self, count: usize) -> Result<u64> {
        if count == 0 || count > 64 {
            return Err(BitIoError::InvalidWidth(count).into());
        }

        let available = self.bits_remaining();
        if count > available {
            return Err(BitIoError::OutOfData {
                requested: count,
                available,
            }
            .into());
        }

        let data = self.buffer.as_bytes();
        let mut result = 0u64;
        let mut remaining = count;

        while remaining > 0 {
            let byte_idx = self.bit_position / 8;
            let bit_offset = self.bit_position % 8;

            let bits_in_byte = 8 - bit_offset;
            let bits_to_read = remaining.min(bits_in_byte);

            let byte = data[byte_idx];
            let mask = ((1u16 << bits_to_read) - 1) as u8;
            let bits = (byte >> (bits_in_byte - bits_to_read)) & mask;

            result = (result << bits_to_read) | bits as u64;

            self.bit_position += bits_to_read;
            remaining -= bits_to_read;
        }

        Ok(result)
    }

    /// Read a single bit.
    pub fn read_bit(&mut self) -> Result<bool> {
        Ok(self.read_bits(1)? == 1)
    }

    /// Return the number of bits remaining in the buffer.
    pub fn bits_remaining(&self) -> usize {
        self.buffer.bit_len() - self.bit_position
    }

    /// Return the current bit position.
    pub fn position(&self) -> usize {
        self.bit_position
    }

    /// Check if we're at the end of the buffer.
    pub fn is_empty(&self) -> bool {
        self.bit_position >= self.buffer.bit_len()
    }
}
