//! Property tests over randomly generated packet trees.

use bits_core::{
    decode_hex, evaluate, sum_versions, LengthType, Packet, Transmission, TreeMetrics,
};
use proptest::prelude::*;

fn arb_literal() -> impl Strategy<Value = Packet> {
    (0u8..8, any::<u64>()).prop_map(|(version, value)| Packet::literal(version, value).unwrap())
}

fn arb_packet() -> impl Strategy<Value = Packet> {
    arb_literal().prop_recursive(4, 48, 4, |inner| {
        prop_oneof![
            (
                0u8..8,
                0u8..4,
                any::<bool>(),
                prop::collection::vec(inner.clone(), 1..5),
            )
                .prop_map(|(version, type_id, flag, children)| {
                    Packet::operator(version, type_id, LengthType::from_bit(flag), children)
                        .unwrap()
                }),
            (0u8..8, 5u8..8, any::<bool>(), inner.clone(), inner).prop_map(
                |(version, type_id, flag, left, right)| {
                    Packet::operator(version, type_id, LengthType::from_bit(flag), vec![left, right])
                        .unwrap()
                }
            ),
        ]
    })
}

fn count_packets(packet: &Packet) -> u64 {
    1 + packet.children().iter().map(count_packets).sum::<u64>()
}

proptest! {
    #[test]
    fn test_encoded_tree_decodes_unchanged(packet in arb_packet()) {
        let hex = packet.to_hex().unwrap();
        let decoded = decode_hex(&hex).unwrap();
        prop_assert_eq!(decoded, packet);
    }

    #[test]
    fn test_consumed_bits_bounded_by_input(packet in arb_packet()) {
        let hex = packet.to_hex().unwrap();
        let transmission = Transmission::from_hex(&hex).unwrap();

        prop_assert_eq!(transmission.bits_consumed(), packet.encoded_bits());
        prop_assert!(transmission.bits_consumed() <= 4 * hex.len());
        prop_assert!(transmission.padding_bits() < 8);
    }

    #[test]
    fn test_evaluation_is_idempotent(packet in arb_packet()) {
        let first = (sum_versions(&packet), evaluate(&packet).unwrap());
        let second = (sum_versions(&packet), evaluate(&packet).unwrap());
        prop_assert_eq!(first, second);
    }

    #[test]
    fn test_version_sum_bounded(packet in arb_packet()) {
        prop_assert!(sum_versions(&packet) <= 7 * count_packets(&packet));
    }

    #[test]
    fn test_metrics_count_every_packet(packet in arb_packet()) {
        let transmission = Transmission::from_hex(&packet.to_hex().unwrap()).unwrap();
        let metrics = TreeMetrics::collect(&transmission);

        prop_assert_eq!(metrics.packets, count_packets(&packet));
        prop_assert_eq!(metrics.literals + metrics.operators(), metrics.packets);
    }

    #[test]
    fn test_arbitrary_hex_never_panics(hex in "[0-9A-Fa-f]{0,80}") {
        if let Ok(transmission) = Transmission::from_hex(&hex) {
            prop_assert!(transmission.bits_consumed() <= 4 * hex.len());
            let _ = evaluate(transmission.packet());
        }
    }
}
