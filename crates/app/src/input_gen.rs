//! Random transmission generation for testing.
//!
//! When `--generate` is given, we synthesize a well-formed packet tree from a
//! seed and encode it as hex, exercising both length types and every
//! operation.
//!
//! # Design
//!
//! Generated trees have:
//! - Mostly small literals, with the occasional full-width 64-bit value
//! - Comparison operators with exactly two operands
//! - Other operators with one to four operands
//! - Nesting no deeper than the requested depth

use bits_core::{LengthType, Operation, Packet, Result};
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

const MAX_REGION_BITS: usize = 1 << 15;

const OPERATIONS: [Operation; 7] = [
    Operation::Sum,
    Operation::Product,
    Operation::Minimum,
    Operation::Maximum,
    Operation::GreaterThan,
    Operation::LessThan,
    Operation::EqualTo,
];

/// Generate a random packet tree.
///
/// # Arguments
/// - `seed`: random seed for determinism
/// - `max_depth`: deepest level an operator's children may reach (0 = a
///   single literal)
pub fn generate_packet(seed: u64, max_depth: usize) -> Result<Packet> {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    random_packet(&mut rng, max_depth)
}

/// Generate a random tree and encode it as a hex transmission.
pub fn generate_transmission(seed: u64, max_depth: usize) -> Result<String> {
    generate_packet(seed, max_depth)?.to_hex()
}

fn random_packet(rng: &mut ChaCha8Rng, depth_left: usize) -> Result<Packet> {
    let version = rng.gen_range(0..8);

    if depth_left == 0 || rng.gen_bool(0.3) {
        return Packet::literal(version, random_literal(rng));
    }

    let op = OPERATIONS.choose(rng).copied().unwrap_or(Operation::Sum);
    let arity = if op.is_comparison() {
        2
    } else {
        rng.gen_range(1..=4)
    };

    let children = (0..arity)
        .map(|_| random_packet(rng, depth_left - 1))
        .collect::<Result<Vec<_>>>()?;

    // Total-bits form only when the region fits its 15-bit field
    let region_bits: usize = children.iter().map(Packet::encoded_bits).sum();
    let length_type = if region_bits < MAX_REGION_BITS {
        LengthType::from_bit(rng.gen_bool(0.5))
    } else {
        LengthType::SubpacketCount
    };

    Packet::operator(version, op.type_id(), length_type, children)
}

fn random_literal(rng: &mut ChaCha8Rng) -> u64 {
    match rng.gen_range(0..10) {
        0 => rng.gen(),
        1..=3 => rng.gen_range(0..=0xFFFF),
        _ => rng.gen_range(0..16),
    }
}
