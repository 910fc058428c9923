//! The scoring state machine.
//!
//! Folds decoded trace events into the shared flow map: lifecycle times
//! for ON/OFF/LISTEN, per-period sent counts for SEND, and per-period
//! received/duplicate/late classification for RECV. Events are consumed
//! strictly in file order; any consistency violation aborts the run.

use crate::aggregator::flow::{update_attr, FlowMap};
use crate::parser::event::{Action, TrafficEvent};
use crate::parser::reader::TraceReader;
use crate::utils::config::{DUMMY_MESSAGE_PORT, MP_DURATION};
use crate::utils::error::ScoreError;
use log::{debug, warn};
use std::path::Path;

/// Accumulate every event of one trace file into the shared flow map.
///
/// **Public** - one of the three core operations exposed to the CLI
///
/// # Arguments
/// * `path` - DRC trace file to read
/// * `start_timestamp` - epoch seconds; lower bound of measurement period 0
/// * `flows` - shared flow state, mutated in place across input files
///
/// # Errors
/// Any `ScoreError`; the flow map must be considered unusable afterwards.
pub fn accumulate_trace(
    path: impl AsRef<Path>,
    start_timestamp: f64,
    flows: &mut FlowMap,
) -> Result<(), ScoreError> {
    let mut reader = TraceReader::open(path)?;
    let mut count = 0usize;

    while let Some(event) = reader.next_event()? {
        apply_event(event, start_timestamp, flows)?;
        count += 1;
    }

    debug!("Accumulated {} events", count);
    Ok(())
}

/// Dispatch one event by its action keyword
fn apply_event(
    event: TrafficEvent,
    start_timestamp: f64,
    flows: &mut FlowMap,
) -> Result<(), ScoreError> {
    match event.action {
        Action::On | Action::Off => apply_on_off(event, flows),
        Action::Listen => apply_listen(event, flows),
        Action::Send => apply_send(event, start_timestamp, flows),
        Action::Recv => apply_recv(event, start_timestamp, flows),
        Action::Other(ref action) => {
            // Lines like RERR are decoded but carry nothing to score
            debug!("Skipping unscored \"{}\" action at {}", action, event.time);
            Ok(())
        }
    }
}

/// Record the flow's ON/OFF time and check its identity attributes
fn apply_on_off(event: TrafficEvent, flows: &mut FlowMap) -> Result<(), ScoreError> {
    let on = event.action == Action::On;
    let action = if on { "ON" } else { "OFF" };

    let (Some(flow), Some(src_port), Some(dst_addr), Some(dst_port)) =
        (event.flow, event.src_port, event.dst_addr, event.dst_port)
    else {
        return Err(ScoreError::MissingRequiredField { action });
    };

    let info = flows.entry(flow).or_default();
    if on {
        info.on_time = Some(event.time);
    } else {
        info.off_time = Some(event.time);
    }

    update_attr(flow, "srcPort", &mut info.src_port, src_port)?;
    update_attr(flow, "dstAddr", &mut info.dst_addr, dst_addr)?;
    update_attr(flow, "dstPort", &mut info.dst_port, dst_port)?;
    Ok(())
}

/// Record the listen time; the listening port stands in for the flow id
/// because a LISTEN line carries none
fn apply_listen(event: TrafficEvent, flows: &mut FlowMap) -> Result<(), ScoreError> {
    let (Some(proto), Some(port)) = (event.proto, event.port) else {
        return Err(ScoreError::MissingRequiredField { action: "LISTEN" });
    };

    let flow = port;
    let info = flows.entry(flow).or_default();
    info.listen_time = Some(event.time);

    update_attr(flow, "proto", &mut info.proto, proto)?;
    update_attr(flow, "dstPort", &mut info.dst_port, port)?;
    Ok(())
}

/// Count the transmission in its measurement period
fn apply_send(
    event: TrafficEvent,
    start_timestamp: f64,
    flows: &mut FlowMap,
) -> Result<(), ScoreError> {
    let (
        Some(flow),
        Some(proto),
        Some(_seq),
        Some(_frag),
        Some(tos),
        Some(src_port),
        Some(dst_addr),
        Some(dst_port),
        Some(size),
    ) = (
        event.flow,
        event.proto,
        event.seq,
        event.frag,
        event.tos,
        event.src_port,
        event.dst_addr,
        event.dst_port,
        event.size,
    )
    else {
        return Err(ScoreError::MissingRequiredField { action: "SEND" });
    };

    let Some(mp_num) = period_index(event.time, start_timestamp) else {
        if dst_port != DUMMY_MESSAGE_PORT {
            warn!(
                "SEND measurement period for flow {} with timestamp {} occurred before start time",
                flow, event.time
            );
        }
        return Ok(());
    };

    let info = flows.entry(flow).or_default();
    info.periods.entry(mp_num).or_default().sent += 1;

    update_attr(flow, "proto", &mut info.proto, proto)?;
    update_attr(flow, "tos", &mut info.tos, tos)?;
    update_attr(flow, "size", &mut info.size, size)?;
    update_attr(flow, "srcPort", &mut info.src_port, src_port)?;
    update_attr(flow, "dstAddr", &mut info.dst_addr, dst_addr)?;
    update_attr(flow, "dstPort", &mut info.dst_port, dst_port)?;
    Ok(())
}

/// Classify the delivery as received, late, or duplicate.
///
/// The measurement period comes from the *send* timestamp, not the receive
/// time, so the receive-side counts stay comparable with the send-side
/// counts for the same period.
fn apply_recv(
    event: TrafficEvent,
    start_timestamp: f64,
    flows: &mut FlowMap,
) -> Result<(), ScoreError> {
    let (
        Some(flow),
        Some(proto),
        Some(seq),
        Some(_frag),
        Some(tos),
        Some(src_addr),
        Some(src_port),
        Some(dst_addr),
        Some(dst_port),
        Some(sent),
        Some(size),
    ) = (
        event.flow,
        event.proto,
        event.seq,
        event.frag,
        event.tos,
        event.src_addr,
        event.src_port,
        event.dst_addr,
        event.dst_port,
        event.sent,
        event.size,
    )
    else {
        return Err(ScoreError::MissingRequiredField { action: "RECV" });
    };

    let Some(mp_num) = period_index(sent, start_timestamp) else {
        if dst_port != DUMMY_MESSAGE_PORT {
            warn!(
                "RECV measurement period for flow {} with sent timestamp {} occurred before start time",
                flow, sent
            );
        }
        return Ok(());
    };

    let info = flows.entry(flow).or_default();

    // Scoring without a latency threshold is meaningless, so a missing
    // mandate stops the whole run rather than skipping the event
    let Some(max_latency) = info.max_latency else {
        return Err(ScoreError::MissingMandate(flow));
    };

    let latency = event.time - sent;
    let duplicate = !info.seen_seqs.insert(seq);
    let late = latency > max_latency;

    let stats = info.periods.entry(mp_num).or_default();
    if duplicate {
        stats.duplicate += 1;
    } else if late {
        stats.late += 1;
    } else {
        stats.received += 1;
    }

    update_attr(flow, "proto", &mut info.proto, proto)?;
    update_attr(flow, "tos", &mut info.tos, tos)?;
    update_attr(flow, "size", &mut info.size, size)?;
    update_attr(flow, "srcAddr", &mut info.src_addr, src_addr)?;
    update_attr(flow, "srcPort", &mut info.src_port, src_port)?;
    update_attr(flow, "dstAddr", &mut info.dst_addr, dst_addr)?;
    update_attr(flow, "dstPort", &mut info.dst_port, dst_port)?;
    Ok(())
}

/// Measurement period index for a timestamp, or `None` when it precedes
/// the start of the run
fn period_index(time: f64, start_timestamp: f64) -> Option<i64> {
    let mp_num = ((time - start_timestamp) / MP_DURATION).floor() as i64;
    (mp_num >= 0).then_some(mp_num)
}
