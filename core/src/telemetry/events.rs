use serde::Serialize;
use std::time::Duration;
use tracing::{info, warn};

use crate::pipeline::discovery::DiscoveryOutcome;
use crate::pipeline::TaskType;

pub(crate) const TARGET: &str = "telemetry::query";
pub(crate) const EVENT_QUERY: &str = "query_completed";
pub(crate) const EVENT_DEGRADED: &str = "stage_degraded";
pub(crate) const EVENT_DISCOVERY: &str = "pipeline_discovery";

#[derive(Debug, Serialize)]
pub struct QueryCompletedEvent {
    pub final_stage: &'static str,
    pub source_language: &'static str,
    pub target_language: &'static str,
    pub used_audio: bool,
    pub used_fallback: bool,
    pub translated: bool,
    pub degraded: bool,
    pub latency_ms: u64,
}

#[derive(Debug, Serialize)]
pub struct StageDegradedEvent {
    pub stage: &'static str,
    pub error_kind: Option<&'static str>,
    pub warning: String,
}

#[derive(Debug, Serialize)]
pub struct PipelineDiscoveryEvent {
    pub requested_task: &'static str,
    pub outcome: &'static str,
    pub cached_tasks: Vec<&'static str>,
    pub reason: Option<String>,
}

pub fn record_query_completed(event: QueryCompletedEvent) {
    match serde_json::to_string(&event) {
        Ok(payload) => info!(
            target: TARGET,
            event = EVENT_QUERY,
            final_stage = event.final_stage,
            used_fallback = event.used_fallback,
            translated = event.translated,
            degraded = event.degraded,
            latency_ms = event.latency_ms,
            payload = %payload
        ),
        Err(err) => warn!(
            target: TARGET,
            event = EVENT_QUERY,
            %err,
            "failed to encode query completion event"
        ),
    }
}

pub fn record_stage_degraded(stage: &'static str, error_kind: Option<&'static str>, warning: &str) {
    let event = StageDegradedEvent {
        stage,
        error_kind,
        warning: warning.to_string(),
    };

    match serde_json::to_string(&event) {
        Ok(payload) => warn!(
            target: TARGET,
            event = EVENT_DEGRADED,
            stage = event.stage,
            payload = %payload
        ),
        Err(err) => warn!(
            target: TARGET,
            event = EVENT_DEGRADED,
            %err,
            "failed to encode stage degradation event"
        ),
    }
}

pub(crate) fn record_pipeline_discovery(requested: TaskType, outcome: &DiscoveryOutcome) {
    let (label, snapshot, reason) = match outcome {
        DiscoveryOutcome::Complete(snapshot) => ("complete", Some(snapshot), None),
        DiscoveryOutcome::Partial(snapshot) => ("partial", Some(snapshot), None),
        DiscoveryOutcome::Unusable(reason) => ("unusable", None, Some(reason.clone())),
    };
    let cached_tasks: Vec<&'static str> = snapshot
        .map(|snapshot| {
            TaskType::ALL
                .into_iter()
                .filter(|task| snapshot.task(*task).is_some())
                .map(|task| task.as_str())
                .collect()
        })
        .unwrap_or_default();

    let event = PipelineDiscoveryEvent {
        requested_task: requested.as_str(),
        outcome: label,
        cached_tasks,
        reason,
    };

    match serde_json::to_string(&event) {
        Ok(payload) => info!(
            target: TARGET,
            event = EVENT_DISCOVERY,
            requested_task = event.requested_task,
            outcome = event.outcome,
            payload = %payload
        ),
        Err(err) => warn!(
            target: TARGET,
            event = EVENT_DISCOVERY,
            %err,
            "failed to encode pipeline discovery event"
        ),
    }
}

pub(crate) fn duration_to_ms(duration: Duration) -> u64 {
    duration.as_millis().min(u64::MAX as u128) as u64
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn duration_clamps_to_u64() {
        let duration = Duration::new(u64::MAX, 0);
        assert_eq!(duration_to_ms(duration), u64::MAX);
    }

    #[test]
    fn discovery_events_log_for_every_outcome() {
        use crate::pipeline::discovery::{fixtures::discovery_body, parse_response};

        let outcome = parse_response(&discovery_body(
            "http://inference.test/pipeline",
            &[("translation", "nmt-1")],
        ));
        // Logging must not panic for any outcome shape.
        record_pipeline_discovery(TaskType::Tts, &outcome);
        record_pipeline_discovery(TaskType::Tts, &DiscoveryOutcome::Unusable("down".into()));
    }
}
