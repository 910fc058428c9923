//! End-to-end scoring tests over real trace text.
//!
//! Each test writes DRC trace lines to a temp file and runs the full
//! mandate -> accumulate -> report pipeline.

use drc_score::aggregator::{accumulate_trace, FlowMap};
use drc_score::commands::{execute_score, ScoreArgs};
use drc_score::mandate::load_mandates;
use drc_score::output::render_report;
use pretty_assertions::assert_eq;
use std::io::Write;
use tempfile::NamedTempFile;

/// 2019-07-15_12:00:00.000 as epoch seconds
const START: f64 = 1563192000.0;

const MANDATE_FLOW_5: &str =
    r#"[{"scenario_goals":[{"flow_uid":5,"requirements":{"max_latency_s":2.0}}]}]"#;

fn write_trace(lines: &[&str]) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    for line in lines {
        writeln!(file, "{}", line).unwrap();
    }
    file
}

fn score(mandates: &str, traces: &[&NamedTempFile]) -> serde_json::Value {
    let mut flows = FlowMap::new();
    load_mandates(mandates, &mut flows).unwrap();
    for trace in traces {
        accumulate_trace(trace.path(), START, &mut flows).unwrap();
    }
    serde_json::from_str(&render_report(&flows).unwrap()).unwrap()
}

#[test]
fn on_send_recv_scores_one_received() {
    let trace = write_trace(&[
        "2019-07-15_12:00:00.000 ON flow>5 srcPort>100 dst>10.0.0.1/200",
        "2019-07-15_12:00:00.100 SEND flow>5 proto>UDP seq>1 frag>0 TOS>0 \
         srcPort>100 dst>10.0.0.1/200 size>64",
        "2019-07-15_12:00:00.300 RECV flow>5 proto>UDP seq>1 frag>0 TOS>0 \
         src>10.0.0.2/100 dst>10.0.0.1/200 sent>2019-07-15_12:00:00.100 size>64",
    ]);

    let report = score(MANDATE_FLOW_5, &[&trace]);

    let entry = &report[0];
    assert_eq!(entry["flow"], 5);
    assert_eq!(entry["maxLatency"], 2.0);
    assert_eq!(entry["onTime"], START);
    assert_eq!(entry["proto"], "UDP");
    assert_eq!(entry["size"], 64);

    let stats = &entry["stats"][0];
    assert_eq!(stats["time"], 0);
    assert_eq!(stats["sent"], 1);
    assert_eq!(stats["received"], 1);
    assert_eq!(stats["duplicate"], 0);
    assert_eq!(stats["late"], 0);
}

#[test]
fn recv_over_mandate_scores_late() {
    let trace = write_trace(&[
        "2019-07-15_12:00:00.100 SEND flow>5 proto>UDP seq>1 frag>0 TOS>0 \
         srcPort>100 dst>10.0.0.1/200 size>64",
        // Delivered 2.5s after sending against a 2.0s mandate
        "2019-07-15_12:00:02.600 RECV flow>5 proto>UDP seq>1 frag>0 TOS>0 \
         src>10.0.0.2/100 dst>10.0.0.1/200 sent>2019-07-15_12:00:00.100 size>64",
    ]);

    let report = score(MANDATE_FLOW_5, &[&trace]);

    let stats = &report[0]["stats"][0];
    assert_eq!(stats["time"], 0);
    assert_eq!(stats["sent"], 1);
    assert_eq!(stats["received"], 0);
    assert_eq!(stats["late"], 1);
}

#[test]
fn redelivered_packet_scores_duplicate_without_changing_first_outcome() {
    let recv = "2019-07-15_12:00:00.300 RECV flow>5 proto>UDP seq>1 frag>0 TOS>0 \
                src>10.0.0.2/100 dst>10.0.0.1/200 sent>2019-07-15_12:00:00.100 size>64";
    let trace = write_trace(&[
        "2019-07-15_12:00:00.100 SEND flow>5 proto>UDP seq>1 frag>0 TOS>0 \
         srcPort>100 dst>10.0.0.1/200 size>64",
        recv,
        recv,
    ]);

    let report = score(MANDATE_FLOW_5, &[&trace]);

    let stats = &report[0]["stats"][0];
    assert_eq!(stats["received"], 1);
    assert_eq!(stats["duplicate"], 1);
    assert_eq!(stats["late"], 0);
}

#[test]
fn pre_start_send_produces_no_period() {
    let trace = write_trace(&[
        // 30 seconds before the configured run start
        "2019-07-15_11:59:30.000 SEND flow>5 proto>UDP seq>1 frag>0 TOS>0 \
         srcPort>100 dst>10.0.0.1/200 size>64",
    ]);

    let report = score(MANDATE_FLOW_5, &[&trace]);

    // Flow 5 has a mandate but no counted activity, so it is omitted
    assert_eq!(report.as_array().unwrap().len(), 0);
}

#[test]
fn disjoint_files_merge_order_independently() {
    let mandates = r#"[{"scenario_goals":[
        {"flow_uid":5,"requirements":{"max_latency_s":2.0}},
        {"flow_uid":6,"requirements":{"max_latency_s":2.0}}
    ]}]"#;

    let file_a = write_trace(&[
        "2019-07-15_12:00:00.000 ON flow>5 srcPort>100 dst>10.0.0.1/200",
        "2019-07-15_12:00:00.100 SEND flow>5 proto>UDP seq>1 frag>0 TOS>0 \
         srcPort>100 dst>10.0.0.1/200 size>64",
    ]);
    let file_b = write_trace(&[
        "2019-07-15_12:00:01.000 ON flow>6 srcPort>300 dst>10.0.0.9/400",
        "2019-07-15_12:00:01.100 SEND flow>6 proto>UDP seq>1 frag>0 TOS>0 \
         srcPort>300 dst>10.0.0.9/400 size>128",
    ]);

    let forward = score(mandates, &[&file_a, &file_b]);
    let reverse = score(mandates, &[&file_b, &file_a]);

    assert_eq!(forward, reverse);
}

#[test]
fn one_flow_split_across_files_is_merged() {
    // The capture of a single test run, taken at two different nodes
    let sender_side = write_trace(&[
        "2019-07-15_12:00:00.000 ON flow>5 srcPort>100 dst>10.0.0.1/200",
        "2019-07-15_12:00:00.100 SEND flow>5 proto>UDP seq>1 frag>0 TOS>0 \
         srcPort>100 dst>10.0.0.1/200 size>64",
        "2019-07-15_12:00:09.000 OFF flow>5 srcPort>100 dst>10.0.0.1/200",
    ]);
    let receiver_side = write_trace(&[
        "2019-07-15_12:00:00.000 LISTEN proto>UDP port>200",
        "2019-07-15_12:00:00.300 RECV flow>5 proto>UDP seq>1 frag>0 TOS>0 \
         src>10.0.0.2/100 dst>10.0.0.1/200 sent>2019-07-15_12:00:00.100 size>64",
    ]);

    let report = score(MANDATE_FLOW_5, &[&sender_side, &receiver_side]);

    let entries = report.as_array().unwrap();
    assert_eq!(entries.len(), 2); // flow 5 and the LISTEN flow keyed by port 200

    let flow5 = &entries[0];
    assert_eq!(flow5["flow"], 5);
    assert_eq!(flow5["onTime"], START);
    assert_eq!(flow5["offTime"], START + 9.0);
    assert_eq!(flow5["stats"][0]["sent"], 1);
    assert_eq!(flow5["stats"][0]["received"], 1);

    let listener = &entries[1];
    assert_eq!(listener["flow"], 200);
    assert_eq!(listener["listenTime"], START);
    assert_eq!(listener["proto"], "UDP");
}

#[test]
fn recv_without_mandate_aborts_the_run() {
    let trace = write_trace(&[
        "2019-07-15_12:00:00.300 RECV flow>9 proto>UDP seq>1 frag>0 TOS>0 \
         src>10.0.0.2/100 dst>10.0.0.1/200 sent>2019-07-15_12:00:00.100 size>64",
    ]);

    let mut flows = FlowMap::new();
    load_mandates(MANDATE_FLOW_5, &mut flows).unwrap();

    let result = accumulate_trace(trace.path(), START, &mut flows);
    assert!(result.is_err());
}

#[test]
fn conflicting_attribute_across_files_aborts_the_run() {
    let file_a = write_trace(&[
        "2019-07-15_12:00:00.000 ON flow>5 srcPort>100 dst>10.0.0.1/200",
    ]);
    // Same flow id, different destination: a mis-keyed capture
    let file_b = write_trace(&[
        "2019-07-15_12:00:05.000 OFF flow>5 srcPort>100 dst>10.9.9.9/200",
    ]);

    let mut flows = FlowMap::new();
    load_mandates(MANDATE_FLOW_5, &mut flows).unwrap();

    accumulate_trace(file_a.path(), START, &mut flows).unwrap();
    let result = accumulate_trace(file_b.path(), START, &mut flows);
    assert!(result.is_err());
}

#[test]
fn execute_score_runs_the_whole_pipeline() {
    let trace = write_trace(&[
        "2019-07-15_12:00:00.000 ON flow>5 srcPort>100 dst>10.0.0.1/200",
        "2019-07-15_12:00:00.100 SEND flow>5 proto>UDP seq>1 frag>0 TOS>0 \
         srcPort>100 dst>10.0.0.1/200 size>64",
    ]);

    let report = execute_score(ScoreArgs {
        inputs: vec![trace.path().to_path_buf()],
        start_timestamp: START,
        mandates: MANDATE_FLOW_5.to_string(),
    })
    .unwrap();

    let value: serde_json::Value = serde_json::from_str(&report).unwrap();
    assert_eq!(value[0]["flow"], 5);
    assert_eq!(value[0]["stats"][0]["sent"], 1);
}

#[test]
fn unscored_actions_in_real_traces_are_tolerated() {
    let trace = write_trace(&[
        "2019-07-15_12:00:00.000 ON flow>5 srcPort>100 dst>10.0.0.1/200",
        "2019-07-15_12:00:00.050 RERR type>routeFailure",
        "2019-07-15_12:00:00.100 SEND flow>5 proto>UDP seq>1 frag>0 TOS>0 \
         srcPort>100 dst>10.0.0.1/200 size>64",
    ]);

    let report = score(MANDATE_FLOW_5, &[&trace]);
    assert_eq!(report[0]["stats"][0]["sent"], 1);
}
