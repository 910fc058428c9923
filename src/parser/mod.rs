//! DRC trace decoding.
//!
//! This module handles:
//! - Decoding the composite DRC timestamp token
//! - Tokenizing trace lines into structured events
//! - Sequential reading of trace files

pub mod event;
pub mod reader;
pub mod timestamp;

// Re-export main types
pub use event::{tokenize_line, Action, TrafficEvent};
pub use reader::TraceReader;
pub use timestamp::parse_timestamp;
