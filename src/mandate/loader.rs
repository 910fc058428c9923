//! Parsing of the JSON flow-mandate document.
//!
//! The document is an array of mandates, each carrying a `scenario_goals`
//! array. Every goal names a `flow_uid` and a `requirements` object with
//! either `file_transfer_deadline_s` or `max_latency_s`; both express the
//! same quantity, the flow's maximum allowed latency in seconds.

use crate::aggregator::flow::FlowMap;
use crate::utils::error::MandateError;
use log::debug;
use serde::Deserialize;

#[derive(Debug, Deserialize)]
struct Mandate {
    scenario_goals: Vec<ScenarioGoal>,
}

#[derive(Debug, Deserialize)]
struct ScenarioGoal {
    flow_uid: u32,
    requirements: Requirements,
}

#[derive(Debug, Deserialize)]
struct Requirements {
    file_transfer_deadline_s: Option<f64>,
    max_latency_s: Option<f64>,
}

/// Load flow mandates from JSON, seeding `max_latency` per flow.
///
/// Goals referencing the same flow must agree on the value.
///
/// # Errors
/// * `MandateError::MalformedMandate` - bad JSON or a missing required field
/// * `MandateError::ConflictingMandate` - two goals disagree for one flow
pub fn load_mandates(json_flow_mandates: &str, flows: &mut FlowMap) -> Result<(), MandateError> {
    let mandates: Vec<Mandate> = serde_json::from_str(json_flow_mandates)
        .map_err(|e| MandateError::MalformedMandate(e.to_string()))?;

    for mandate in &mandates {
        for goal in &mandate.scenario_goals {
            // file_transfer_deadline_s takes precedence when both appear
            let max_latency = goal
                .requirements
                .file_transfer_deadline_s
                .or(goal.requirements.max_latency_s)
                .ok_or_else(|| {
                    MandateError::MalformedMandate(format!(
                        "goal for flow {}: expected \"max_latency_s\" or \
                         \"file_transfer_deadline_s\" of numerical type",
                        goal.flow_uid
                    ))
                })?;

            let info = flows.entry(goal.flow_uid).or_default();
            match info.max_latency {
                Some(existing) if existing != max_latency => {
                    return Err(MandateError::ConflictingMandate {
                        flow: goal.flow_uid,
                        existing,
                        new: max_latency,
                    });
                }
                _ => info.max_latency = Some(max_latency),
            }
        }
    }

    debug!("Loaded mandates for {} flows", flows.len());
    Ok(())
}
