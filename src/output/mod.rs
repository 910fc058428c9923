//! Report rendering.
//!
//! Turns the merged flow map into the final JSON report.

pub mod json;

// Re-export main entry point
pub use json::render_report;
