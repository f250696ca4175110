//! Error types for the BITS decoder.
//!
//! All operations return structured errors rather than panicking. Input is
//! trusted by contract, so every error is terminal: the caller gets a single
//! error describing what kind of malformation stopped the pipeline.

use thiserror::Error;

/// Top-level error type for all operations in the system.
///
/// Each variant corresponds to a specific failure domain:
/// - Hex: the transmission text contains a non-hex character
/// - Bit I/O: a read ran past the end of the buffer or asked for a bad width
/// - Packet: the bit stream does not describe a well-formed packet tree
/// - I/O: reading the transmission from disk
#[derive(Debug, Error)]
pub enum Error {
    /// Transmission text is not valid hexadecimal
    #[error("hex error: {0}")]
    Hex(#[from] HexError),

    /// Bit I/O operation failed (e.g., reading past end of buffer)
    #[error("bit I/O error: {0}")]
    BitIo(#[from] BitIoError),

    /// Packet structure violates the BITS grammar
    #[error("packet error: {0}")]
    Packet(#[from] PacketError),

    /// File I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Coarse classification of an [`Error`], for callers that only care which
/// stage of the pipeline gave up.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    MalformedHex,
    OutOfData,
    InvalidWidth,
    InvalidOperator,
    MalformedPacket,
    Io,
}

impl Error {
    /// Classify this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::Hex(_) => ErrorKind::MalformedHex,
            Error::BitIo(BitIoError::OutOfData { .. }) => ErrorKind::OutOfData,
            Error::BitIo(BitIoError::InvalidWidth(_)) => ErrorKind::InvalidWidth,
            Error::Packet(
                PacketError::InvalidOperator { .. } | PacketError::NotAnOperator { .. },
            ) => ErrorKind::InvalidOperator,
            Error::Packet(_) => ErrorKind::MalformedPacket,
            Error::Io(_) => ErrorKind::Io,
        }
    }
}

/// Hex parsing errors.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum HexError {
    /// A character outside `[0-9A-Fa-f]`
    #[error("invalid hex digit {character:?} at index {index}")]
    MalformedHex { index: usize, character: char },
}

/// Bit-level I/O errors.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum BitIoError {
    /// Attempted to read more bits than remain in the buffer
    #[error("out of data: requested {requested} bits, {available} available")]
    OutOfData { requested: usize, available: usize },

    /// Width outside the supported range (1-64 for reads, 0-64 for writes)
    #[error("invalid bit width: {0}")]
    InvalidWidth(usize),
}

/// Packet structure errors.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum PacketError {
    /// Operator child count doesn't match the arity of its type id
    #[error("operator type {type_id} cannot take {children} subpackets")]
    InvalidOperator { type_id: u8, children: usize },

    /// Type id names no operation (the literal type, or wider than 3 bits)
    #[error("type {type_id} is not an operator")]
    NotAnOperator { type_id: u8 },

    /// A subpacket ran past the end of its length-delimited region
    #[error("subpackets overran declared region: region ends at bit {end}, reached bit {position}")]
    SubpacketOverrun { end: usize, position: usize },

    /// Packet tree nests deeper than the decoder allows
    #[error("packet nesting exceeds maximum depth {max}")]
    NestingTooDeep { max: usize },

    /// A header field value doesn't fit its bit width
    #[error("{field} value {value} does not fit in {bits} bits")]
    FieldOverflow {
        field: &'static str,
        value: u64,
        bits: usize,
    },
}

/// Type alias for Result with our Error type
pub type Result<T> = std::result::Result<T, Error>;
