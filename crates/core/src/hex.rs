//! Conversion between hexadecimal transmission text and [`BitBuffer`].
//!
//! Each hex digit contributes exactly 4 bits, most significant first. Digits
//! are case-insensitive and surrounding whitespace is ignored.

use crate::bitio::BitBuffer;
use crate::error::{HexError, Result};

const DIGITS: &[u8; 16] = b"0123456789ABCDEF";

impl BitBuffer {
    /// Parse a hex string into a bit buffer of `4 * digits` bits.
    ///
    /// # Errors
    /// `HexError::MalformedHex` for the first character outside `[0-9A-Fa-f]`.
    /// Its `index` is the byte offset into `hex` as passed in, leading
    /// whitespace included.
    pub fn from_hex(hex: &str) -> Result<Self> {
        let offset = hex.len() - hex.trim_start().len();
        let digits_text = hex.trim();
        let mut bytes = Vec::with_capacity((digits_text.len() + 1) / 2);
        let mut digits = 0usize;

        for (i, character) in digits_text.char_indices() {
            let nibble = character.to_digit(16).ok_or(HexError::MalformedHex {
                index: offset + i,
                character,
            })? as u8;

            if digits % 2 == 0 {
                bytes.push(nibble << 4);
            } else if let Some(last) = bytes.last_mut() {
                *last |= nibble;
            }
            digits += 1;
        }

        Ok(BitBuffer::from_bytes(bytes, digits * 4))
    }

    /// Render the buffer as uppercase hex, one digit per started nibble.
    pub fn to_hex(&self) -> String {
        let digits = (self.bit_len() + 3) / 4;
        let mut out = String::with_capacity(digits);

        for i in 0..digits {
            let byte = self.as_bytes()[i / 2];
            let nibble = if i % 2 == 0 { byte >> 4 } else { byte & 0x0F };
            out.push(DIGITS[nibble as usize] as char);
        }

        out
    }
}
