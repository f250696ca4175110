//! Structural metrics for a decoded transmission.
//!
//! Collected in a single pass over the tree after decoding, for the app's
//! summary output and for tests that check how much of the buffer a
//! transmission used.

use crate::decoder::Transmission;
use crate::packet::{Content, LengthType, Packet};

/// Counts and sizes describing one decoded transmission.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TreeMetrics {
    // === Tree shape ===
    /// Total packets in the tree, root included
    pub packets: u64,

    /// Literal packets
    pub literals: u64,

    /// Operator packets delimited by total bit length
    pub operators_total_bits: u64,

    /// Operator packets delimited by subpacket count
    pub operators_counted: u64,

    /// Deepest packet, root at depth 0
    pub max_depth: usize,

    /// Largest number of direct children of any operator
    pub max_fanout: usize,

    // === Buffer usage ===
    /// Bits read to decode the root packet
    pub bits_consumed: usize,

    /// Bits in the transmission
    pub bits_available: usize,

    /// Literals that lost high bits to the 64-bit register
    pub truncated_literals: usize,
}

impl TreeMetrics {
    /// Walk the transmission's tree and gather metrics.
    pub fn collect(transmission: &Transmission) -> Self {
        let mut metrics = Self {
            bits_consumed: transmission.bits_consumed(),
            bits_available: transmission.bits_available(),
            truncated_literals: transmission.truncated_literals(),
            ..Self::default()
        };
        metrics.visit(transmission.packet(), 0);
        metrics
    }

    fn visit(&mut self, packet: &Packet, depth: usize) {
        self.packets += 1;
        self.max_depth = self.max_depth.max(depth);

        match packet.content() {
            Content::Literal(_) => self.literals += 1,
            Content::Operator {
                length_type,
                children,
            } => {
                match length_type {
                    LengthType::TotalBits => self.operators_total_bits += 1,
                    LengthType::SubpacketCount => self.operators_counted += 1,
                }
                self.max_fanout = self.max_fanout.max(children.len());
                for child in children {
                    self.visit(child, depth + 1);
                }
            }
        }
    }

    /// Operator packets of either length type.
    pub fn operators(&self) -> u64 {
        self.operators_total_bits + self.operators_counted
    }

    /// Trailing bits left after the root packet.
    pub fn padding_bits(&self) -> usize {
        self.bits_available.saturating_sub(self.bits_consumed)
    }

    /// Print a human-readable summary to stdout.
    pub fn print_summary(&self) {
        println!("\n=== Transmission ===");
        println!(
            "Bits: {} used of {} ({} padding)",
            self.bits_consumed,
            self.bits_available,
            self.padding_bits()
        );
        println!();

        println!("=== Packets ===");
        println!("Total: {}", self.packets);
        println!("Literals: {}", self.literals);
        println!(
            "Operators: {} ({} by length, {} by count)",
            self.operators(),
            self.operators_total_bits,
            self.operators_counted
        );
        println!("Max depth: {}", self.max_depth);
        println!("Max fan-out: {}", self.max_fanout);
        if self.truncated_literals > 0 {
            println!("Truncated literals: {}", self.truncated_literals);
        }
        println!();
    }

    /// Export metrics as a simple text format (for parsing/testing).
    pub fn export_text(&self) -> String {
        format!(
            "packets={}\n\
             literals={}\n\
             operators_total_bits={}\n\
             operators_counted={}\n\
             max_depth={}\n\
             max_fanout={}\n\
             bits_consumed={}\n\
             bits_available={}\n\
             truncated_literals={}\n",
            self.packets,
            self.literals,
            self.operators_total_bits,
            self.operators_counted,
            self.max_depth,
            self.max_fanout,
            self.bits_consumed,
            self.bits_available,
            self.truncated_literals,
        )
    }
}
