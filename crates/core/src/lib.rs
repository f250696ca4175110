//! bits-core: decoder and evaluator for BITS transmissions
//!
//! A BITS transmission is a hex string encoding one hierarchical, bit-packed
//! packet. This library:
//! - Converts the hex text into an addressable bit buffer
//! - Decodes the buffer into a tree of literal and operator packets
//! - Evaluates the tree for its version sum and its arithmetic value
//!
//! # Architecture
//!
//! - `bitio`: bit buffer, MSB-first reader and writer
//! - `hex`: hex text to and from bit buffers
//! - `packet`: packet model, operations, encoder
//! - `decoder`: recursive-descent packet decoder
//! - `eval`: version sum and expression evaluation
//! - `metrics`: structural statistics for a decoded tree
//!
//! # Example
//! ```
//! let solution = bits_core::solve("C200B40A82").unwrap();
//! assert_eq!(solution.value, 3);
//! assert_eq!(solution.version_sum, 14);
//! ```
//!
//! # Design Principles
//!
//! - **No panics**: malformed input surfaces as a structured [`Error`]
//! - **Immutable trees**: packets are built once and only read afterwards
//! - **Bounded recursion**: nesting depth is capped by the decoder

pub mod bitio;
pub mod decoder;
pub mod error;
pub mod eval;
pub mod hex;
pub mod metrics;
pub mod packet;

// Re-export commonly used types
pub use bitio::{BitBuffer, BitReader, BitWriter};
pub use decoder::{decode_hex, decode_packet, Transmission, MAX_NESTING_DEPTH};
pub use error::{Error, ErrorKind, Result};
pub use eval::{evaluate, solve, sum_versions, Solution};
pub use metrics::TreeMetrics;
pub use packet::{Content, LengthType, Operation, Packet};
