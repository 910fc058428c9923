//! Error types for the entire application.
//!
//! We use `thiserror` for library-style errors with custom types,
//! and `anyhow` for application-level error propagation in main.rs and commands.

use thiserror::Error;

/// Errors that can occur while decoding a DRC trace file
#[derive(Error, Debug)]
pub enum ParseError {
    #[error("cannot parse timestamp \"{0}\"")]
    MalformedTimestamp(String),

    #[error("cannot parse ip/port \"{0}\"")]
    MalformedAddress(String),

    #[error("unknown field: {key} = {value}")]
    UnknownField { key: String, value: String },

    #[error("invalid value for field \"{key}\": \"{value}\"")]
    InvalidFieldValue { key: String, value: String },

    #[error("no action present")]
    MissingAction,

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Errors that can occur while loading flow mandates
#[derive(Error, Debug)]
pub enum MandateError {
    #[error("malformed mandate: {0}")]
    MalformedMandate(String),

    #[error("conflicting mandate for flow {flow}: max latency changed from {existing} to {new}")]
    ConflictingMandate { flow: u32, existing: f64, new: f64 },
}

/// Errors that can occur while aggregating trace events into flow state
#[derive(Error, Debug)]
pub enum ScoreError {
    #[error(transparent)]
    Parse(#[from] ParseError),

    #[error("missing field in DRC \"{action}\" action")]
    MissingRequiredField { action: &'static str },

    #[error("max latency is missing for flow {0}")]
    MissingMandate(u32),

    #[error(
        "error updating parameter \"{field}\" in flow {flow}: changed from \"{old}\" to \"{new}\""
    )]
    ConflictingFlowAttribute {
        flow: u32,
        field: &'static str,
        old: String,
        new: String,
    },
}

/// Errors that can occur while rendering the report
#[derive(Error, Debug)]
pub enum OutputError {
    #[error("failed to serialize report: {0}")]
    SerializationFailed(#[from] serde_json::Error),
}
