//! bits-decoder: decode a BITS transmission and report its two results.
//!
//! Part 1 is the sum of every packet's version; part 2 is the value of the
//! expression the packet tree encodes.

mod config;
mod input_gen;

use anyhow::{Context, Result};
use bits_core::{evaluate, sum_versions, Transmission, TreeMetrics};
use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::config::{Args, Config, InputSource};

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let config = Config::from_args(Args::parse());
    if config.print_config {
        config.print();
    }

    let transmission = load_transmission(&config.source)?;
    info!(
        bits_consumed = transmission.bits_consumed(),
        bits_available = transmission.bits_available(),
        "transmission decoded"
    );

    let packet = transmission.packet();
    if config.print_tree {
        println!("{packet}");
    }

    let version_sum = sum_versions(packet);
    let value = evaluate(packet).context("failed to evaluate packet tree")?;
    println!("part 1: {version_sum}");
    println!("part 2: {value}");

    if config.print_metrics {
        TreeMetrics::collect(&transmission).print_summary();
    }

    Ok(())
}

/// Read and decode the transmission from the configured source.
fn load_transmission(source: &InputSource) -> Result<Transmission> {
    match source {
        InputSource::Hex(hex) => {
            Transmission::from_hex(hex).context("failed to decode transmission")
        }
        InputSource::File(path) => Transmission::from_path(path)
            .with_context(|| format!("failed to load transmission from {}", path.display())),
        InputSource::Stdin => Transmission::from_reader(std::io::stdin().lock())
            .context("failed to load transmission from stdin"),
        InputSource::Generated { seed, max_depth } => {
            let hex = input_gen::generate_transmission(*seed, *max_depth)
                .context("failed to generate transmission")?;
            println!("transmission: {hex}");
            Transmission::from_hex(&hex).context("failed to decode generated transmission")
        }
    }
}
