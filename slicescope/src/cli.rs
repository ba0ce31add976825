//! Command-line interface: argument definitions and command dispatch.

use crate::{chart, console, csv, json};
use anyhow::Context as _;
use clap::{Parser, Subcommand};
use slicescope_core::{
    defaults,
    generate::{self, GeneratorConfig},
    measure::PacketSize,
    queuing::PacketProfile,
    report::AnalysisReport,
};
use std::{fs, io::Write as _, path::PathBuf};

#[derive(Debug, Parser)]
#[command(
    name = "slicescope",
    version,
    about = "Network-slice transaction analytics: reports and charts over CSV tables"
)]
pub struct Args {
    /// Enable debug logging (RUST_LOG overrides)
    #[arg(long, global = true)]
    pub debug: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Analyse a transaction table and print the report
    Report {
        /// Path to the transactions CSV
        csv: PathBuf,

        /// Emit machine-readable JSON instead of the console report
        #[arg(long)]
        json: bool,

        /// Packet size for the queuing model, e.g. `1500B` or `12000b`
        #[arg(long, default_value_t = defaults::DEFAULT_PACKET_SIZE)]
        packet_size: PacketSize,

        /// Bits per megabit for the rate conversions
        #[arg(long, default_value_t = defaults::DEFAULT_BITS_PER_MEGABIT)]
        bits_per_megabit: f64,
    },
    /// Render the summary charts as SVG files
    Charts {
        /// Path to the transactions CSV
        csv: PathBuf,

        /// Directory the SVG files are written into (created if missing)
        #[arg(long, default_value = "charts")]
        out: PathBuf,

        /// Packet size for the queuing model, e.g. `1500B` or `12000b`
        #[arg(long, default_value_t = defaults::DEFAULT_PACKET_SIZE)]
        packet_size: PacketSize,
    },
    /// Write a deterministic synthetic transaction table
    Generate {
        /// Path of the CSV to write
        csv: PathBuf,

        /// Number of rows to generate
        #[arg(long, default_value_t = defaults::DEFAULT_GENERATOR_ROWS)]
        rows: usize,

        /// Generator seed; the same seed always yields the same table
        #[arg(long, default_value_t = defaults::DEFAULT_GENERATOR_SEED)]
        seed: u64,
    },
}

/// run the selected command.
pub fn run(args: Args) -> anyhow::Result<()> {
    match args.command {
        Command::Report {
            csv,
            json: as_json,
            packet_size,
            bits_per_megabit,
        } => {
            let profile = PacketProfile::new(packet_size, bits_per_megabit)
                .context("Invalid packet model")?;
            let dataset = csv::load_dataset(&csv)?;
            let report = AnalysisReport::compute(&dataset, &profile)
                .context("Failed to analyse the transaction table")?;

            if as_json {
                let rendered =
                    json::render_json(&report).context("Failed to serialize the report")?;
                println!("{rendered}");
            } else {
                let stdout = std::io::stdout();
                let mut out = stdout.lock();
                console::render_report(&report, &mut out)
                    .context("Failed to write the report")?;
                out.flush()?;
            }
            Ok(())
        }
        Command::Charts {
            csv,
            out,
            packet_size,
        } => {
            let profile = PacketProfile::with_packet_size(packet_size);
            let dataset = csv::load_dataset(&csv)?;
            let report = AnalysisReport::compute(&dataset, &profile)
                .context("Failed to analyse the transaction table")?;

            fs::create_dir_all(&out)
                .with_context(|| format!("Failed to create {}", out.display()))?;

            let charts = chart::render_charts(&report);
            for (name, svg) in &charts {
                let path = out.join(name);
                fs::write(&path, svg)
                    .with_context(|| format!("Failed to write {}", path.display()))?;
                tracing::debug!(chart = name, "wrote chart");
            }

            println!("wrote {} charts to {}", charts.len(), out.display());
            Ok(())
        }
        Command::Generate { csv, rows, seed } => {
            let dataset = generate::generate(&GeneratorConfig { rows, seed });
            csv::write_dataset(&csv, &dataset)?;

            println!("wrote {rows} transactions to {} (seed {seed})", csv.display());
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cli_definition_is_consistent() {
        use clap::CommandFactory as _;
        Args::command().debug_assert();
    }

    #[test]
    fn parses_report_flags() {
        let args =
            Args::parse_from(["slicescope", "report", "t.csv", "--json", "--packet-size", "512B"]);
        match args.command {
            Command::Report {
                json, packet_size, ..
            } => {
                assert!(json);
                assert_eq!(packet_size.bits(), 4_096);
            }
            other => panic!("expected report, got {other:?}"),
        }
    }

    #[test]
    fn generate_defaults() {
        let args = Args::parse_from(["slicescope", "generate", "t.csv"]);
        match args.command {
            Command::Generate { rows, seed, .. } => {
                assert_eq!(rows, defaults::DEFAULT_GENERATOR_ROWS);
                assert_eq!(seed, defaults::DEFAULT_GENERATOR_SEED);
            }
            other => panic!("expected generate, got {other:?}"),
        }
    }

    #[test]
    fn rejects_invalid_packet_size() {
        assert!(
            Args::try_parse_from(["slicescope", "report", "t.csv", "--packet-size", "0b"]).is_err()
        );
    }
}
