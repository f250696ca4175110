//! Read-only evaluation of a decoded packet tree.
//!
//! Both walks borrow the tree immutably, so they can be repeated or run from
//! several threads at once over the same [`Packet`].
//!
//! Sums and products wrap on overflow, the same 64-bit register semantics the
//! decoder applies to oversized literals.

use crate::decoder::Transmission;
use crate::error::{PacketError, Result};
use crate::packet::{Content, Operation, Packet};

/// The two results derived from a transmission.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Solution {
    /// Sum of every packet's version field
    pub version_sum: u64,
    /// Value of the expression the tree encodes
    pub value: u64,
}

/// Decode `hex` and compute both results.
pub fn solve(hex: &str) -> Result<Solution> {
    let transmission = Transmission::from_hex(hex)?;
    let packet = transmission.packet();

    Ok(Solution {
        version_sum: sum_versions(packet),
        value: evaluate(packet)?,
    })
}

/// Sum of the version fields of `packet` and all its descendants.
pub fn sum_versions(packet: &Packet) -> u64 {
    packet.version() as u64 + packet.children().iter().map(sum_versions).sum::<u64>()
}

/// Evaluate the expression rooted at `packet`.
///
/// # Errors
/// `PacketError::InvalidOperator` if an operator's type or child count is
/// inconsistent. Trees from the decoder never trigger this.
pub fn evaluate(packet: &Packet) -> Result<u64> {
    let children = match packet.content() {
        Content::Literal(value) => return Ok(*value),
        Content::Operator { children, .. } => children,
    };

    let invalid = || PacketError::InvalidOperator {
        type_id: packet.type_id(),
        children: children.len(),
    };

    let op = Operation::try_from(packet.type_id())
        .ok()
        .filter(|op| op.arity_ok(children.len()))
        .ok_or_else(invalid)?;

    let values = children.iter().map(evaluate).collect::<Result<Vec<u64>>>()?;

    let value = match op {
        Operation::Sum => values.iter().fold(0u64, |acc, v| acc.wrapping_add(*v)),
        Operation::Product => values.iter().fold(1u64, |acc, v| acc.wrapping_mul(*v)),
        Operation::Minimum => values.iter().copied().min().ok_or_else(invalid)?,
        Operation::Maximum => values.iter().copied().max().ok_or_else(invalid)?,
        Operation::GreaterThan => (values[0] > values[1]) as u64,
        Operation::LessThan => (values[0] < values[1]) as u64,
        Operation::EqualTo => (values[0] == values[1]) as u64,
    };

    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::decoder::decode_hex;
    use crate::packet::LengthType;

    fn lit(value: u64) -> Packet {
        Packet::literal(1, value).unwrap()
    }

    fn op(type_id: u8, children: Vec<Packet>) -> Packet {
        Packet::operator(2, type_id, LengthType::SubpacketCount, children).unwrap()
    }

    #[test]
    fn test_sum_versions_nested() {
        assert_eq!(sum_versions(&decode_hex("8A004A801A8002F478").unwrap()), 16);
        assert_eq!(sum_versions(&decode_hex("A0016C880162017C3686B18A3D4780").unwrap()), 31);
    }

    #[test]
    fn test_sum_versions_literal() {
        assert_eq!(sum_versions(&lit(99)), 1);
    }

    #[test]
    fn test_arithmetic_operators() {
        assert_eq!(evaluate(&op(0, vec![lit(1), lit(2), lit(3)])).unwrap(), 6);
        assert_eq!(evaluate(&op(1, vec![lit(6), lit(9)])).unwrap(), 54);
        assert_eq!(evaluate(&op(2, vec![lit(7), lit(8), lit(9)])).unwrap(), 7);
        assert_eq!(evaluate(&op(3, vec![lit(7), lit(8), lit(9)])).unwrap(), 9);
        assert_eq!(evaluate(&op(1, vec![lit(42)])).unwrap(), 42);
    }

    #[test]
    fn test_comparisons() {
        assert_eq!(evaluate(&op(5, vec![lit(5), lit(15)])).unwrap(), 0);
        assert_eq!(evaluate(&op(5, vec![lit(15), lit(5)])).unwrap(), 1);
        assert_eq!(evaluate(&op(6, vec![lit(5), lit(15)])).unwrap(), 1);
        assert_eq!(evaluate(&op(7, vec![lit(5), lit(15)])).unwrap(), 0);
        assert_eq!(evaluate(&op(7, vec![lit(3), lit(3)])).unwrap(), 1);
    }

    #[test]
    fn test_nested_expression() {
        // 1 + 3 == 2 * 2
        let tree = op(
            7,
            vec![op(0, vec![lit(1), lit(3)]), op(1, vec![lit(2), lit(2)])],
        );
        assert_eq!(evaluate(&tree).unwrap(), 1);
    }

    #[test]
    fn test_wrapping_arithmetic() {
        assert_eq!(evaluate(&op(0, vec![lit(u64::MAX), lit(2)])).unwrap(), 1);
        assert_eq!(
            evaluate(&op(1, vec![lit(1 << 63), lit(2)])).unwrap(),
            0
        );
    }

    #[test]
    fn test_solve() {
        let solution = solve("9C0141080250320F1802104A08").unwrap();
        assert_eq!(solution.value, 1);
        assert!(solution.version_sum > 0);

        assert!(solve("not hex").is_err());
    }

    #[test]
    fn test_repeated_evaluation() {
        let packet = decode_hex("880086C3E88112").unwrap();

        let first = (sum_versions(&packet), evaluate(&packet).unwrap());
        let second = (sum_versions(&packet), evaluate(&packet).unwrap());
        assert_eq!(first, second);
        assert_eq!(first.1, 7);
    }
}
