//! Flow state accumulation and scoring.
//!
//! This module handles:
//! - Per-flow accumulated state (lifecycle times, identity attributes,
//!   per-period delivery counters)
//! - The scoring state machine that folds trace events into that state

pub mod flow;
pub mod scoring;

// Re-export main types
pub use flow::{FlowMap, FlowRecord, PeriodStats};
pub use scoring::accumulate_trace;
