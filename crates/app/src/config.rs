//! Configuration for the bits-decoder application.
//!
//! Command-line arguments are parsed with clap and resolved into a [`Config`]
//! with every default filled in, so a run can be reproduced from its printed
//! configuration.

use clap::Parser;
use std::path::PathBuf;

/// Default nesting depth for generated transmissions.
const DEFAULT_MAX_DEPTH: usize = 4;

/// Command-line arguments
#[derive(Parser, Debug)]
#[command(
    name = "bits-decoder",
    version,
    about = "Decode a BITS transmission and evaluate its packet tree",
    after_help = "EXAMPLES:\n    bits-decoder C200B40A82\n    bits-decoder --in input/16.txt --print-tree\n    bits-decoder --generate --seed 42"
)]
pub struct Args {
    /// Transmission as hex text (read from stdin when no source is given)
    #[arg(value_name = "HEX", conflicts_with_all = ["input", "generate"])]
    pub hex: Option<String>,

    /// Read the transmission from a file
    #[arg(long = "in", value_name = "PATH", conflicts_with = "generate")]
    pub input: Option<PathBuf>,

    /// Generate a random well-formed transmission instead of reading one
    #[arg(long)]
    pub generate: bool,

    /// Random seed for --generate (default: time-based)
    #[arg(long, requires = "generate")]
    pub seed: Option<u64>,

    /// Maximum nesting depth for --generate
    #[arg(long, requires = "generate")]
    pub max_depth: Option<usize>,

    /// Print the decoded packet tree as an expression
    #[arg(long)]
    pub print_tree: bool,

    /// Print resolved configuration
    #[arg(long)]
    pub print_config: bool,

    /// Don't print the metrics summary
    #[arg(long)]
    pub no_metrics: bool,
}

/// Where the transmission text comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputSource {
    Hex(String),
    File(PathBuf),
    Generated { seed: u64, max_depth: usize },
    Stdin,
}

/// Complete configuration for a decode run.
#[derive(Debug, Clone)]
pub struct Config {
    pub source: InputSource,

    // === Behavior ===
    /// Whether to print the decoded tree
    pub print_tree: bool,

    /// Whether to print detailed config
    pub print_config: bool,

    /// Whether to print the metrics summary
    pub print_metrics: bool,
}

impl Config {
    /// Resolve parsed arguments into a configuration.
    ///
    /// With `--generate` and no `--seed`, the seed is derived from the clock.
    pub fn from_args(args: Args) -> Self {
        let source = if args.generate {
            InputSource::Generated {
                seed: args.seed.unwrap_or_else(time_seed),
                max_depth: args.max_depth.unwrap_or(DEFAULT_MAX_DEPTH),
            }
        } else if let Some(path) = args.input {
            InputSource::File(path)
        } else if let Some(hex) = args.hex {
            InputSource::Hex(hex)
        } else {
            InputSource::Stdin
        };

        Config {
            source,
            print_tree: args.print_tree,
            print_config: args.print_config,
            print_metrics: !args.no_metrics,
        }
    }

    /// Print the configuration in human-readable form.
    pub fn print(&self) {
        println!("=== Configuration ===");
        match &self.source {
            InputSource::Hex(hex) => println!("Input: argument ({} hex digits)", hex.trim().len()),
            InputSource::File(path) => println!("Input: file {}", path.display()),
            InputSource::Generated { seed, max_depth } => {
                println!("Input: generated");
                println!("Seed: {seed}");
                println!("Max depth: {max_depth}");
            }
            InputSource::Stdin => println!("Input: stdin"),
        }
        println!("Print tree: {}", self.print_tree);
        println!("Print metrics: {}", self.print_metrics);
        println!();
    }
}

fn time_seed() -> u64 {
    use std::time::{SystemTime, UNIX_EPOCH};
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0)
}
