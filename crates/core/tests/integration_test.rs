//! Integration tests for the full decode pipeline.
//!
//! These tests verify end-to-end behavior: hex text -> bit buffer -> packet
//! tree -> version sum and value, against known transmissions.

use bits_core::{
    decode_hex, evaluate, solve, sum_versions, Content, ErrorKind, LengthType, Operation, Packet,
    Transmission, TreeMetrics,
};

/// Literal example: a single packet carrying 2021.
#[test]
fn test_literal_transmission() {
    let packet = decode_hex("D2FE28").expect("decode failed");

    assert_eq!(packet.version(), 6);
    assert_eq!(packet.type_id(), 4);
    assert_eq!(packet.content(), &Content::Literal(2021));
    assert!(packet.children().is_empty());
}

/// Operator delimited by total bit length, two literal children.
#[test]
fn test_total_bits_operator_transmission() {
    let packet = decode_hex("38006F45291200").expect("decode failed");

    let expected = Packet::operator(
        1,
        6,
        LengthType::TotalBits,
        vec![
            Packet::literal(6, 10).unwrap(),
            Packet::literal(2, 20).unwrap(),
        ],
    )
    .unwrap();
    assert_eq!(packet, expected);
}

/// Operator delimited by subpacket count, three literal children.
#[test]
fn test_counted_operator_transmission() {
    let packet = decode_hex("EE00D40C823060").expect("decode failed");

    assert!(matches!(
        packet.content(),
        Content::Operator {
            length_type: LengthType::SubpacketCount,
            ..
        }
    ));
    let values: Vec<u64> = packet
        .children()
        .iter()
        .filter_map(Packet::literal_value)
        .collect();
    assert_eq!(values, vec![1, 2, 3]);
}

#[test]
fn test_version_sums() {
    let cases = [
        ("8A004A801A8002F478", 16),
        ("620080001611562C8802118E34", 12),
        ("C0015000016115A2E0802F182340", 23),
        ("A0016C880162017C3686B18A3D4780", 31),
    ];

    for (hex, expected) in cases {
        let packet = decode_hex(hex).expect("decode failed");
        assert_eq!(sum_versions(&packet), expected, "version sum of {hex}");
    }
}

#[test]
fn test_evaluations() {
    let cases = [
        ("C200B40A82", 3),
        ("04005AC33890", 54),
        ("880086C3E88112", 7),
        ("CE00C43D881120", 9),
        ("D8005AC2A8F0", 1),
        ("F600BC2D8F", 0),
        ("9C005AC2F8F0", 0),
        ("9C0141080250320F1802104A08", 1),
    ];

    for (hex, expected) in cases {
        let solution = solve(hex).expect("solve failed");
        assert_eq!(solution.value, expected, "value of {hex}");
    }
}

#[test]
fn test_operation_dispatch_of_examples() {
    let expected = [
        ("C200B40A82", Operation::Sum),
        ("04005AC33890", Operation::Product),
        ("880086C3E88112", Operation::Minimum),
        ("CE00C43D881120", Operation::Maximum),
        ("D8005AC2A8F0", Operation::LessThan),
        ("F600BC2D8F", Operation::GreaterThan),
        ("9C005AC2F8F0", Operation::EqualTo),
    ];

    for (hex, op) in expected {
        assert_eq!(decode_hex(hex).unwrap().operation(), Some(op), "{hex}");
    }
}

/// Lowercase input decodes to the same tree.
#[test]
fn test_lowercase_input() {
    assert_eq!(
        decode_hex("9c0141080250320f1802104a08").unwrap(),
        decode_hex("9C0141080250320F1802104A08").unwrap()
    );
}

#[test]
fn test_error_kinds() {
    assert_eq!(decode_hex("D2FZ28").unwrap_err().kind(), ErrorKind::MalformedHex);
    assert_eq!(decode_hex("38006F").unwrap_err().kind(), ErrorKind::OutOfData);
    assert_eq!(solve("").unwrap_err().kind(), ErrorKind::OutOfData);
}

/// Decoding never claims more bits than the hex text provides.
#[test]
fn test_consumed_bits_within_input() {
    for hex in [
        "D2FE28",
        "38006F45291200",
        "EE00D40C823060",
        "A0016C880162017C3686B18A3D4780",
        "9C0141080250320F1802104A08",
    ] {
        let transmission = Transmission::from_hex(hex).unwrap();
        assert!(transmission.bits_consumed() <= 4 * hex.len());
        assert_eq!(transmission.bits_available(), 4 * hex.len());

        let metrics = TreeMetrics::collect(&transmission);
        assert_eq!(metrics.bits_consumed, transmission.bits_consumed());
    }
}

/// Re-encoding a decoded example reproduces the input text.
#[test]
fn test_reencode_examples() {
    for hex in [
        "D2FE28",
        "38006F45291200",
        "EE00D40C823060",
        "8A004A801A8002F478",
        "C200B40A82",
    ] {
        let packet = decode_hex(hex).unwrap();
        assert_eq!(packet.to_hex().unwrap(), hex);
    }
}

#[test]
fn test_evaluation_is_repeatable() {
    let packet = decode_hex("C0015000016115A2E0802F182340").unwrap();

    let value = evaluate(&packet).unwrap();
    let versions = sum_versions(&packet);
    for _ in 0..3 {
        assert_eq!(evaluate(&packet).unwrap(), value);
        assert_eq!(sum_versions(&packet), versions);
    }
}

/// The tree is shareable across threads for read-only evaluation.
#[test]
fn test_concurrent_evaluation() {
    let packet = decode_hex("9C0141080250320F1802104A08").unwrap();
    let packet = &packet;

    std::thread::scope(|scope| {
        let handles: Vec<_> = (0..4)
            .map(|_| scope.spawn(move || (sum_versions(packet), evaluate(packet).unwrap())))
            .collect();
        for handle in handles {
            let (_, value) = handle.join().unwrap();
            assert_eq!(value, 1);
        }
    });
}
