//! Recursive-descent decoding of a BITS transmission into a [`Packet`] tree.
//!
//! A transmission holds exactly one top-level packet. Whatever follows it is
//! zero padding and is not inspected.
//!
//! # Literal truncation
//!
//! Literal groups accumulate into a 64-bit register as `value << 4 | nibble`.
//! A literal with more than 64 significant bits keeps only its low 64 bits;
//! this is deterministic and counted in [`Transmission::truncated_literals`].

use std::io::Read;
use std::path::Path;

use tracing::{debug, trace};

use crate::bitio::{BitBuffer, BitReader};
use crate::error::{BitIoError, PacketError, Result};
use crate::packet::{
    LengthType, Packet, LITERAL_NIBBLE_BITS, LITERAL_TYPE_ID, SUBPACKET_COUNT_FIELD,
    TOTAL_BITS_FIELD, TYPE_ID_BITS, VERSION_BITS,
};

/// Deepest packet nesting the decoder will follow (the top-level packet is
/// depth 0).
///
/// Each level costs at least 18 bits, so this only trips on transmissions of
/// more than 70k bits. It bounds the decoder's stack use, not the grammar.
pub const MAX_NESTING_DEPTH: usize = 4096;

/// Decode one packet, and transitively its subpackets, starting at the
/// reader's current position.
///
/// # Errors
/// - `BitIoError::OutOfData` if the stream ends mid-packet
/// - `PacketError::SubpacketOverrun` if subpackets don't exactly tile a
///   length-delimited region
/// - `PacketError::InvalidOperator` if an operator's child count doesn't fit
///   its type
/// - `PacketError::NestingTooDeep` past [`MAX_NESTING_DEPTH`]
pub fn decode_packet(reader: &mut BitReader<'_>) -> Result<Packet> {
    Decoder::new(reader).packet(0)
}

/// Decode the single packet in a hex transmission.
pub fn decode_hex(hex: &str) -> Result<Packet> {
    Ok(Transmission::from_hex(hex)?.into_packet())
}

/// A fully decoded transmission: the buffer, its root packet, and how much of
/// the buffer the packet used.
#[derive(Debug, Clone)]
pub struct Transmission {
    buffer: BitBuffer,
    packet: Packet,
    bits_consumed: usize,
    truncated_literals: usize,
}

impl Transmission {
    /// Parse and decode a hex transmission.
    pub fn from_hex(hex: &str) -> Result<Self> {
        Self::decode(BitBuffer::from_hex(hex)?)
    }

    /// Read hex text from `reader` until EOF and decode it.
    ///
    /// # Errors
    /// `Error::Io` if the read fails or the text isn't UTF-8, otherwise as
    /// [`Transmission::from_hex`].
    pub fn from_reader<R: Read>(mut reader: R) -> Result<Self> {
        let mut text = String::new();
        reader.read_to_string(&mut text)?;
        Self::from_hex(&text)
    }

    /// Decode the transmission stored in the file at `path`.
    pub fn from_path(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        debug!(path = %path.display(), bytes = text.len(), "read transmission");
        Self::from_hex(&text)
    }

    /// Decode the top-level packet of `buffer`.
    pub fn decode(buffer: BitBuffer) -> Result<Self> {
        let mut reader = BitReader::new(&buffer);
        let mut decoder = Decoder::new(&mut reader);
        let packet = decoder.packet(0)?;
        let truncated_literals = decoder.truncated_literals;
        let bits_consumed = reader.position();

        debug!(
            bits_consumed,
            bits_available = buffer.bit_len(),
            "decoded transmission"
        );

        Ok(Self {
            buffer,
            packet,
            bits_consumed,
            truncated_literals,
        })
    }

    pub fn packet(&self) -> &Packet {
        &self.packet
    }

    pub fn into_packet(self) -> Packet {
        self.packet
    }

    /// Bits read to decode the top-level packet.
    pub fn bits_consumed(&self) -> usize {
        self.bits_consumed
    }

    /// Total bits in the transmission.
    pub fn bits_available(&self) -> usize {
        self.buffer.bit_len()
    }

    /// Trailing bits after the top-level packet.
    pub fn padding_bits(&self) -> usize {
        self.bits_available() - self.bits_consumed
    }

    /// Literals whose value didn't fit in 64 bits.
    pub fn truncated_literals(&self) -> usize {
        self.truncated_literals
    }
}

/// Decoding state for one call stack: the cursor plus running counters.
struct Decoder<'r, 'a> {
    reader: &'r mut BitReader<'a>,
    truncated_literals: usize,
}

impl<'r, 'a> Decoder<'r, 'a> {
    fn new(reader: &'r mut BitReader<'a>) -> Self {
        Self {
            reader,
            truncated_literals: 0,
        }
    }

    fn packet(&mut self, depth: usize) -> Result<Packet> {
        if depth > MAX_NESTING_DEPTH {
            return Err(PacketError::NestingTooDeep {
                max: MAX_NESTING_DEPTH,
            }
            .into());
        }

        let start = self.reader.position();
        let version = self.reader.read_bits(VERSION_BITS)? as u8;
        let type_id = self.reader.read_bits(TYPE_ID_BITS)? as u8;
        trace!(start, version, type_id, depth, "packet header");

        if type_id == LITERAL_TYPE_ID {
            let value = self.literal(start)?;
            return Packet::literal(version, value);
        }

        let length_type = LengthType::from_bit(self.reader.read_bit()?);
        let children = match length_type {
            LengthType::TotalBits => self.bounded_children(depth)?,
            LengthType::SubpacketCount => self.counted_children(depth)?,
        };

        Packet::operator(version, type_id, length_type, children)
    }

    fn literal(&mut self, start: usize) -> Result<u64> {
        let mut value = 0u64;
        let mut truncated = false;

        loop {
            let more = self.reader.read_bit()?;
            let nibble = self.reader.read_bits(LITERAL_NIBBLE_BITS)?;

            // Top nibble is about to be shifted out
            truncated |= value >> (64 - LITERAL_NIBBLE_BITS) != 0;
            value = (value << LITERAL_NIBBLE_BITS) | nibble;

            if !more {
                break;
            }
        }

        if truncated {
            self.truncated_literals += 1;
            debug!(start, value, "literal exceeds 64 bits, keeping low 64");
        }

        Ok(value)
    }

    /// Subpackets filling exactly the next `total` bits.
    fn bounded_children(&mut self, depth: usize) -> Result<Vec<Packet>> {
        let total = self.reader.read_bits(TOTAL_BITS_FIELD)? as usize;
        let available = self.reader.bits_remaining();
        if total > available {
            return Err(BitIoError::OutOfData {
                requested: total,
                available,
            }
            .into());
        }

        let end = self.reader.position() + total;
        trace!(start = self.reader.position(), end, "subpacket region");

        let mut children = Vec::new();
        while self.reader.position() < end {
            children.push(self.packet(depth + 1)?);
        }

        let position = self.reader.position();
        if position != end {
            return Err(PacketError::SubpacketOverrun { end, position }.into());
        }

        Ok(children)
    }

    fn counted_children(&mut self, depth: usize) -> Result<Vec<Packet>> {
        let count = self.reader.read_bits(SUBPACKET_COUNT_FIELD)? as usize;
        trace!(count, "subpacket count");

        let mut children = Vec::with_capacity(count);
        for _ in 0..count {
            children.push(self.packet(depth + 1)?);
        }

        Ok(children)
    }
}
