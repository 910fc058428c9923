//! Configuration and constants for the scoring engine.

/// Duration of a measurement period, in seconds
pub const MP_DURATION: f64 = 1.0;

/// Destination port the traffic generator uses for dummy keep-alive
/// messages. Out-of-window traffic to this port is dropped without a
/// diagnostic.
pub const DUMMY_MESSAGE_PORT: u32 = 1000;
