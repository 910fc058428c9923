//! DRC Score CLI
//!
//! Scores DRC traffic capture logs against per-flow latency mandates and
//! prints the merged JSON report to standard output.

use anyhow::Result;
use clap::{Parser, Subcommand};
use env_logger::Env;
use std::path::PathBuf;

use drc_score::commands::{execute_score, validate_args, ScoreArgs};

/// DRC Score - flow latency scoring for DRC traffic captures
#[derive(Parser, Debug)]
#[command(name = "drc-score")]
#[command(version, about, long_about = None)]
struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

/// Available commands
#[derive(Subcommand, Debug)]
enum Commands {
    /// Score one or more trace files against flow mandates
    Score {
        /// Input DRC traffic file (multiple can be specified)
        #[arg(short, long, required = true, num_args = 1..)]
        input: Vec<PathBuf>,

        /// Match start timestamp, epoch seconds
        #[arg(short = 't', long)]
        timestamp: f64,

        /// List of mandates in a JSON format
        #[arg(short, long)]
        mandates: String,
    },

    /// Display report schema information
    Schema {
        /// Show full schema details
        #[arg(long)]
        show: bool,
    },
}

fn main() -> Result<()> {
    // Parse CLI arguments
    let cli = Cli::parse();

    // Setup logging
    let log_level = if cli.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(Env::default().default_filter_or(log_level)).init();

    // Execute command
    match cli.command {
        Commands::Score {
            input,
            timestamp,
            mandates,
        } => {
            let args = ScoreArgs {
                inputs: input,
                start_timestamp: timestamp,
                mandates,
            };

            // Validate args first
            validate_args(&args)?;

            let report = execute_score(args)?;
            println!("{}", report);
        }

        Commands::Schema { show } => {
            display_schema(show);
        }
    }

    Ok(())
}

/// Display report schema information
///
/// **Private** - internal command implementation
fn display_schema(show_details: bool) {
    println!("DRC Score Report Schema");
    println!();

    if show_details {
        println!("Report Structure (JSON array, one object per active flow):");
        println!("  flow: number            - Flow identifier");
        println!("  maxLatency: number?     - Mandated maximum latency, seconds");
        println!("  onTime: number?         - Flow ON time, epoch seconds");
        println!("  offTime: number?        - Flow OFF time, epoch seconds");
        println!("  listenTime: number?     - Flow LISTEN time, epoch seconds");
        println!("  proto: string?          - Protocol (UDP/TCP)");
        println!("  size: number?           - Message size, bytes");
        println!("  tos: number?            - Type-of-service value");
        println!("  srcAddr: string?        - Source address");
        println!("  srcPort: number?        - Source port");
        println!("  dstAddr: string?        - Destination address");
        println!("  dstPort: number?        - Destination port");
        println!("  stats: array            - Per-second delivery statistics");
        println!("    time: number          - Measurement period index");
        println!("    sent: number          - Messages sent in the period");
        println!("    received: number      - Messages received on time");
        println!("    duplicate: number     - Duplicate deliveries");
        println!("    late: number          - Deliveries over the latency mandate");
    } else {
        println!("Use --show for detailed schema information");
    }
}
