//! JSON report rendering.
//!
//! One object per flow with recorded activity; flows that only carry a
//! mandate are omitted. Optional fields are left out of the output
//! entirely rather than rendered as null.

use crate::aggregator::flow::{FlowMap, FlowRecord};
use crate::utils::error::OutputError;
use log::debug;
use serde::Serialize;

/// One flow entry in the report
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct FlowEntry<'a> {
    flow: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_latency: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    on_time: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    off_time: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    listen_time: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    proto: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    size: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    tos: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    src_addr: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    src_port: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    dst_addr: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    dst_port: Option<u32>,
    stats: Vec<PeriodEntry>,
}

/// One measurement period in a flow's `stats` array
#[derive(Debug, Serialize)]
struct PeriodEntry {
    time: i64,
    sent: u32,
    received: u32,
    duplicate: u32,
    late: u32,
}

/// Render the merged flow map as the final JSON report.
///
/// **Public** - one of the three core operations exposed to the CLI
pub fn render_report(flows: &FlowMap) -> Result<String, OutputError> {
    let entries: Vec<FlowEntry> = flows
        .iter()
        .filter(|(_, info)| info.has_activity())
        .map(|(&flow, info)| flow_entry(flow, info))
        .collect();

    debug!("Rendering report for {} active flows", entries.len());
    Ok(serde_json::to_string(&entries)?)
}

fn flow_entry(flow: u32, info: &FlowRecord) -> FlowEntry<'_> {
    FlowEntry {
        flow,
        max_latency: info.max_latency,
        on_time: info.on_time,
        off_time: info.off_time,
        listen_time: info.listen_time,
        proto: info.proto.as_deref(),
        size: info.size,
        tos: info.tos,
        src_addr: info.src_addr.as_deref(),
        src_port: info.src_port,
        dst_addr: info.dst_addr.as_deref(),
        dst_port: info.dst_port,
        // Ascending period order falls out of the ordered map
        stats: info
            .periods
            .iter()
            .map(|(&time, stats)| PeriodEntry {
                time,
                sent: stats.sent,
                received: stats.received,
                duplicate: stats.duplicate,
                late: stats.late,
            })
            .collect(),
    }
}
