//! Score command implementation.
//!
//! The score command:
//! 1. Loads the flow mandates
//! 2. Accumulates each trace file into the shared flow map, in order
//! 3. Renders the merged JSON report

use crate::aggregator::{accumulate_trace, FlowMap};
use crate::mandate::load_mandates;
use crate::output::render_report;
use anyhow::{bail, Context, Result};
use log::{debug, info};
use std::path::PathBuf;

/// Arguments for the score command
///
/// **Public** - used by main.rs to construct from CLI args
#[derive(Debug, Clone)]
pub struct ScoreArgs {
    /// Input DRC trace files, processed strictly in the order given
    pub inputs: Vec<PathBuf>,

    /// Match start timestamp, epoch seconds; lower bound of period 0
    pub start_timestamp: f64,

    /// Flow mandates as a JSON document
    pub mandates: String,
}

/// Validate score arguments before execution
pub fn validate_args(args: &ScoreArgs) -> Result<()> {
    if args.inputs.is_empty() {
        bail!("At least one input trace file is required");
    }

    for input in &args.inputs {
        if !input.exists() {
            bail!("Input trace file does not exist: {}", input.display());
        }
    }

    if args.mandates.trim().is_empty() {
        bail!("Mandate JSON must not be empty");
    }

    Ok(())
}

/// Execute the score command, returning the JSON report.
///
/// # Errors
/// Any mandate, parse, or scoring error with context attached; a failure
/// means the run produced no report at all.
pub fn execute_score(args: ScoreArgs) -> Result<String> {
    info!(
        "Scoring {} trace file(s) against start timestamp {}",
        args.inputs.len(),
        args.start_timestamp
    );

    let mut flows = FlowMap::new();

    load_mandates(&args.mandates, &mut flows).context("Failed to load flow mandates")?;
    debug!("Flow map seeded with {} mandated flows", flows.len());

    for input in &args.inputs {
        info!("Accumulating trace file: {}", input.display());
        accumulate_trace(input, args.start_timestamp, &mut flows)
            .with_context(|| format!("Failed to score trace file {}", input.display()))?;
    }

    let report = render_report(&flows).context("Failed to render report")?;

    info!("Report complete ({} bytes)", report.len());
    Ok(report)
}
