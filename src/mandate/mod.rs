//! Flow mandate loading.
//!
//! Mandates arrive as a JSON document and seed each flow's maximum
//! allowed latency before any trace file is read.

pub mod loader;

// Re-export main entry point
pub use loader::load_mandates;
