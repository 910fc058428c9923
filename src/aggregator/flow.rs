//! Per-flow accumulated state.

use crate::utils::error::ScoreError;
use std::collections::{BTreeMap, HashSet};
use std::fmt::Display;

/// Shared mapping of flow id to accumulated state.
///
/// One map lives for the whole run and is mutated in place by every input
/// file in turn; that is the merge point for captures taken at different
/// nodes of the same test. Ordered so the report comes out in ascending
/// flow-id order.
pub type FlowMap = BTreeMap<u32, FlowRecord>;

/// Delivery counters for one measurement period
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PeriodStats {
    /// Number of sent messages in the measurement period
    pub sent: u32,
    /// Number of received messages, excluding duplicate/late
    pub received: u32,
    /// Number of duplicate messages
    pub duplicate: u32,
    /// Number of late messages, excluding duplicate
    pub late: u32,
}

/// Accumulated state for one flow, merged across all input files
#[derive(Debug, Clone, Default)]
pub struct FlowRecord {
    /// Maximum allowed latency (max_latency_s or file_transfer_deadline_s)
    pub max_latency: Option<f64>,

    /// "ON" time for the flow
    pub on_time: Option<f64>,
    /// "OFF" time for the flow
    pub off_time: Option<f64>,
    /// "LISTEN" time for the flow
    pub listen_time: Option<f64>,

    /// Proto field (UDP/TCP)
    pub proto: Option<String>,
    /// Message size field (bytes)
    pub size: Option<u32>,
    /// TOS field
    pub tos: Option<u32>,
    /// Source address field
    pub src_addr: Option<String>,
    /// Source port field
    pub src_port: Option<u32>,
    /// Destination address field
    pub dst_addr: Option<String>,
    /// Destination port field
    pub dst_port: Option<u32>,

    /// Statistics per measurement period, keyed by period index
    pub periods: BTreeMap<i64, PeriodStats>,

    /// Sequence numbers already received, for duplicate classification
    pub seen_seqs: HashSet<u32>,
}

impl FlowRecord {
    /// Whether any traffic event was ever recorded for the flow
    pub fn has_activity(&self) -> bool {
        self.on_time.is_some()
            || self.off_time.is_some()
            || self.listen_time.is_some()
            || !self.periods.is_empty()
    }
}

/// Set a flow attribute, checking it has not changed if it already exists.
///
/// Descriptive attributes are write-once: a later observation with a
/// different value means unrelated data is being merged under one flow id.
pub fn update_attr<T>(
    flow: u32,
    field: &'static str,
    attr: &mut Option<T>,
    new_value: T,
) -> Result<(), ScoreError>
where
    T: PartialEq + Display,
{
    match attr {
        Some(existing) if *existing != new_value => Err(ScoreError::ConflictingFlowAttribute {
            flow,
            field,
            old: existing.to_string(),
            new: new_value.to_string(),
        }),
        Some(_) => Ok(()),
        None => {
            *attr = Some(new_value);
            Ok(())
        }
    }
}
