//! BITS packet model and encoder.
//!
//! Every packet starts with a 6-bit header; what follows depends on the type:
//!
//! ```text
//! literal (type 4):
//! +---------+---------+-------------------------------------+
//! | version | type=4  | [1|nibble] ... [1|nibble] [0|nibble] |
//! |  3 bits | 3 bits  | 5-bit groups, most significant first |
//! +---------+---------+-------------------------------------+
//!
//! operator (any other type):
//! +---------+---------+---+------------------+------------------+
//! | version | type id | I | length field     | subpackets       |
//! |  3 bits | 3 bits  | 1 | I=0: 15-bit total bits             |
//! |         |         |   | I=1: 11-bit subpacket count        |
//! +---------+---------+---+------------------+------------------+
//! ```
//!
//! Packets are built either by the decoder or through the validating
//! constructors here, so an operator always has a child count its type
//! accepts and a literal never has children.

use std::fmt;

use crate::bitio::BitWriter;
use crate::error::{PacketError, Result};

/// Type id reserved for literal packets.
pub const LITERAL_TYPE_ID: u8 = 4;

pub(crate) const VERSION_BITS: usize = 3;
pub(crate) const TYPE_ID_BITS: usize = 3;
pub(crate) const LITERAL_GROUP_BITS: usize = 5;
pub(crate) const LITERAL_NIBBLE_BITS: usize = 4;
pub(crate) const TOTAL_BITS_FIELD: usize = 15;
pub(crate) const SUBPACKET_COUNT_FIELD: usize = 11;

/// How an operator delimits its subpackets (the "length type ID" bit).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LengthType {
    /// Flag 0: a 15-bit total bit length of all subpackets
    TotalBits,
    /// Flag 1: an 11-bit number of immediately contained subpackets
    SubpacketCount,
}

impl LengthType {
    pub fn from_bit(bit: bool) -> Self {
        if bit {
            LengthType::SubpacketCount
        } else {
            LengthType::TotalBits
        }
    }

    pub fn bit(self) -> bool {
        matches!(self, LengthType::SubpacketCount)
    }

    /// Width of the length field that follows the flag.
    pub fn field_bits(self) -> usize {
        match self {
            LengthType::TotalBits => TOTAL_BITS_FIELD,
            LengthType::SubpacketCount => SUBPACKET_COUNT_FIELD,
        }
    }
}

/// Operation selected by an operator packet's type id.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    Sum,
    Product,
    Minimum,
    Maximum,
    GreaterThan,
    LessThan,
    EqualTo,
}

impl Operation {
    pub fn type_id(self) -> u8 {
        match self {
            Operation::Sum => 0,
            Operation::Product => 1,
            Operation::Minimum => 2,
            Operation::Maximum => 3,
            Operation::GreaterThan => 5,
            Operation::LessThan => 6,
            Operation::EqualTo => 7,
        }
    }

    /// Comparisons take exactly two operands.
    pub fn is_comparison(self) -> bool {
        matches!(
            self,
            Operation::GreaterThan | Operation::LessThan | Operation::EqualTo
        )
    }

    /// Whether an operator of this kind may have `children` subpackets.
    pub fn arity_ok(self, children: usize) -> bool {
        if self.is_comparison() {
            children == 2
        } else {
            children >= 1
        }
    }

    pub fn symbol(self) -> &'static str {
        match self {
            Operation::Sum => "+",
            Operation::Product => "*",
            Operation::Minimum => "min",
            Operation::Maximum => "max",
            Operation::GreaterThan => ">",
            Operation::LessThan => "<",
            Operation::EqualTo => "==",
        }
    }
}

/// Map a type id to its operation. The literal type and ids that don't fit
/// in 3 bits are rejected.
impl TryFrom<u8> for Operation {
    type Error = PacketError;

    fn try_from(type_id: u8) -> std::result::Result<Self, PacketError> {
        match type_id {
            0 => Ok(Operation::Sum),
            1 => Ok(Operation::Product),
            2 => Ok(Operation::Minimum),
            3 => Ok(Operation::Maximum),
            5 => Ok(Operation::GreaterThan),
            6 => Ok(Operation::LessThan),
            7 => Ok(Operation::EqualTo),
            _ => Err(PacketError::NotAnOperator { type_id }),
        }
    }
}

/// Payload of a packet: a literal value or an ordered list of subpackets.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Content {
    Literal(u64),
    Operator {
        length_type: LengthType,
        children: Vec<Packet>,
    },
}

/// A decoded BITS packet. Immutable once built.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Packet {
    version: u8,
    type_id: u8,
    content: Content,
}

impl Packet {
    /// Create a literal packet.
    ///
    /// # Errors
    /// `PacketError::FieldOverflow` if `version` doesn't fit in 3 bits.
    pub fn literal(version: u8, value: u64) -> Result<Self> {
        check_field("version", version as u64, VERSION_BITS)?;
        Ok(Self {
            version,
            type_id: LITERAL_TYPE_ID,
            content: Content::Literal(value),
        })
    }

    /// Create an operator packet.
    ///
    /// # Errors
    /// - `PacketError::FieldOverflow` if `version` or `type_id` don't fit in 3 bits
    /// - `PacketError::InvalidOperator` if `type_id` is the literal type or the
    ///   child count doesn't match the operation's arity
    pub fn operator(
        version: u8,
        type_id: u8,
        length_type: LengthType,
        children: Vec<Packet>,
    ) -> Result<Self> {
        check_field("version", version as u64, VERSION_BITS)?;
        check_field("type id", type_id as u64, TYPE_ID_BITS)?;

        let accepted = Operation::try_from(type_id)
            .map(|op| op.arity_ok(children.len()))
            .unwrap_or(false);
        if !accepted {
            return Err(PacketError::InvalidOperator {
                type_id,
                children: children.len(),
            }
            .into());
        }

        Ok(Self {
            version,
            type_id,
            content: Content::Operator {
                length_type,
                children,
            },
        })
    }

    pub fn version(&self) -> u8 {
        self.version
    }

    pub fn type_id(&self) -> u8 {
        self.type_id
    }

    pub fn content(&self) -> &Content {
        &self.content
    }

    /// Operation for operator packets, `None` for literals.
    pub fn operation(&self) -> Option<Operation> {
        match self.content {
            Content::Literal(_) => None,
            Content::Operator { .. } => Operation::try_from(self.type_id).ok(),
        }
    }

    /// Literal value, `None` for operators.
    pub fn literal_value(&self) -> Option<u64> {
        match self.content {
            Content::Literal(value) => Some(value),
            Content::Operator { .. } => None,
        }
    }

    /// Subpackets in decode order (empty for literals).
    pub fn children(&self) -> &[Packet] {
        match &self.content {
            Content::Literal(_) => &[],
            Content::Operator { children, .. } => children,
        }
    }

    /// Number of bits this packet occupies when encoded.
    pub fn encoded_bits(&self) -> usize {
        let header = VERSION_BITS + TYPE_ID_BITS;
        match &self.content {
            Content::Literal(value) => header + literal_groups(*value) * LITERAL_GROUP_BITS,
            Content::Operator {
                length_type,
                children,
            } => {
                header
                    + 1
                    + length_type.field_bits()
                    + children.iter().map(Packet::encoded_bits).sum::<usize>()
            }
        }
    }

    /// Append this packet's encoding to `writer`.
    ///
    /// Literals use the fewest 5-bit groups that hold the value (at least one).
    ///
    /// # Errors
    /// `PacketError::FieldOverflow` if the subpackets' total length or count
    /// doesn't fit the operator's length field.
    pub fn encode(&self, writer: &mut BitWriter) -> Result<()> {
        writer.write_bits(self.version as u64, VERSION_BITS)?;
        writer.write_bits(self.type_id as u64, TYPE_ID_BITS)?;

        match &self.content {
            Content::Literal(value) => {
                let groups = literal_groups(*value);
                for group in (0..groups).rev() {
                    let nibble = (value >> (group * LITERAL_NIBBLE_BITS)) & 0xF;
                    writer.write_bit(group != 0)?;
                    writer.write_bits(nibble, LITERAL_NIBBLE_BITS)?;
                }
            }
            Content::Operator {
                length_type,
                children,
            } => {
                let length = match length_type {
                    LengthType::TotalBits => children.iter().map(Packet::encoded_bits).sum::<usize>(),
                    LengthType::SubpacketCount => children.len(),
                };
                let (field, bits) = match length_type {
                    LengthType::TotalBits => ("total subpacket length", TOTAL_BITS_FIELD),
                    LengthType::SubpacketCount => ("subpacket count", SUBPACKET_COUNT_FIELD),
                };
                check_field(field, length as u64, bits)?;

                writer.write_bit(length_type.bit())?;
                writer.write_bits(length as u64, bits)?;
                for child in children {
                    child.encode(writer)?;
                }
            }
        }

        Ok(())
    }

    /// Encode this packet as a standalone hex transmission.
    pub fn to_hex(&self) -> Result<String> {
        let mut writer = BitWriter::new();
        self.encode(&mut writer)?;
        Ok(writer.finish().to_hex())
    }
}

/// Renders the tree as an S-expression, e.g. `(+ 1 (* 2 3))`.
impl fmt::Display for Packet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.content {
            Content::Literal(value) => write!(f, "{value}"),
            Content::Operator { children, .. } => {
                match Operation::try_from(self.type_id) {
                    Ok(op) => write!(f, "({}", op.symbol())?,
                    Err(_) => write!(f, "(op{}", self.type_id)?,
                }
                for child in children {
                    write!(f, " {child}")?;
                }
                write!(f, ")")
            }
        }
    }
}

/// Number of 5-bit groups needed to carry `value`.
fn literal_groups(value: u64) -> usize {
    let significant = 64 - value.leading_zeros() as usize;
    ((significant + LITERAL_NIBBLE_BITS - 1) / LITERAL_NIBBLE_BITS).max(1)
}

fn check_field(field: &'static str, value: u64, bits: usize) -> Result<()> {
    if bits < 64 && value >> bits != 0 {
        return Err(PacketError::FieldOverflow { field, value, bits }.into());
    }
    Ok(())
}
