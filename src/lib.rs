//! DRC Score
//!
//! Batch scoring of line-oriented DRC traffic capture logs against
//! per-flow latency mandates.
//!
//! The engine reconstructs per-flow lifecycle events and per-second
//! delivery statistics from one or more capture files, merges them into
//! a single flow-centric view, and renders a JSON report. Captures taken
//! at different network nodes of the same test run can be combined by
//! passing them as successive inputs.
//!
//! This crate provides the core implementation for the `drc-score` CLI
//! tool.
//!
//! ## Getting Started
//!
//! Most users should use the CLI:
//!
//! ```bash
//! drc-score score -i node1.drc -i node2.drc -t 1563192000.0 -m "$(cat mandates.json)"
//! ```

pub mod aggregator;
pub mod commands;
pub mod mandate;
pub mod output;
pub mod parser;
pub mod utils;
