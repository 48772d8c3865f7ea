//! Capability probe against the translation suite's pipeline configuration endpoint.

use serde_json::{json, Value};
use std::sync::Arc;

use super::types::{InferenceEndpoint, PipelineSnapshot, PipelineTaskConfig, TaskType};
use crate::config::TranslationSuiteConfig;
use crate::http::{HttpTransport, JsonRequest};

/// Language pair sent with every probe, independent of the caller's request.
const PROBE_SOURCE_LANGUAGE: &str = "en";
const PROBE_TARGET_LANGUAGE: &str = "hi";

#[derive(Debug, Clone, PartialEq)]
pub(crate) enum DiscoveryOutcome {
    /// Endpoint, credential and all three task types present.
    Complete(PipelineSnapshot),
    /// Endpoint and credential present, at least one task type missing.
    Partial(PipelineSnapshot),
    Unusable(String),
}

pub(crate) fn build_request(suite: &TranslationSuiteConfig) -> JsonRequest {
    let body = json!({
        "pipelineTasks": [
            {
                "taskType": TaskType::Asr.as_str(),
                "config": {"language": {"sourceLanguage": PROBE_SOURCE_LANGUAGE}}
            },
            {
                "taskType": TaskType::Translation.as_str(),
                "config": {"language": {
                    "sourceLanguage": PROBE_SOURCE_LANGUAGE,
                    "targetLanguage": PROBE_TARGET_LANGUAGE
                }}
            },
            {
                "taskType": TaskType::Tts.as_str(),
                "config": {"language": {"sourceLanguage": PROBE_SOURCE_LANGUAGE}}
            }
        ],
        "controlConfig": {"dataTracking": true},
        "pipelineRequestConfig": {"pipelineId": suite.pipeline_id}
    });

    JsonRequest::post(suite.config_endpoint.clone(), body)
        .header("userID", suite.user_id.clone().unwrap_or_default())
        .header("ulcaApiKey", suite.api_key.clone().unwrap_or_default())
}

pub(crate) async fn discover(
    transport: &dyn HttpTransport,
    suite: &TranslationSuiteConfig,
) -> DiscoveryOutcome {
    let response = match transport.post_json(build_request(suite)).await {
        Ok(response) => response,
        Err(err) => return DiscoveryOutcome::Unusable(err.to_string()),
    };

    if !response.is_success() {
        return DiscoveryOutcome::Unusable(format!(
            "pipeline config returned HTTP {}",
            response.status
        ));
    }

    match serde_json::from_str::<Value>(&response.body) {
        Ok(body) => parse_response(&body),
        Err(err) => DiscoveryOutcome::Unusable(format!("pipeline config is not JSON: {err}")),
    }
}

pub(crate) fn parse_response(body: &Value) -> DiscoveryOutcome {
    let endpoint_info = &body["pipelineInferenceAPIEndPoint"];
    let endpoint = match (
        non_empty(&endpoint_info["callbackUrl"]),
        non_empty(&endpoint_info["inferenceApiKey"]["name"]),
        non_empty(&endpoint_info["inferenceApiKey"]["value"]),
    ) {
        (Some(callback_url), Some(auth_key_name), Some(auth_key_value)) => InferenceEndpoint {
            callback_url,
            auth_key_name,
            auth_key_value,
        },
        _ => {
            return DiscoveryOutcome::Unusable(
                "pipeline config is missing the inference endpoint or its credential".into(),
            )
        }
    };

    let mut snapshot = PipelineSnapshot::default();
    snapshot.endpoint = Some(endpoint.clone());

    let entries = body["pipelineResponseConfig"]
        .as_array()
        .map(Vec::as_slice)
        .unwrap_or_default();
    for entry in entries {
        let Some(task) = entry["taskType"].as_str().and_then(TaskType::parse) else {
            continue;
        };
        if snapshot.task(task).is_some() {
            continue;
        }
        let details = &entry["config"][0];
        let Some(service_id) = non_empty(&details["serviceId"]) else {
            continue;
        };

        let config = PipelineTaskConfig {
            service_id,
            model_id: non_empty(&details["modelId"]),
            inference_endpoint: endpoint.callback_url.clone(),
            auth_key_name: endpoint.auth_key_name.clone(),
            auth_key_value: endpoint.auth_key_value.clone(),
            language_info: details.get("language").cloned(),
        };
        snapshot = snapshot.with_task(task, Arc::new(config));
    }

    if snapshot.is_complete() {
        DiscoveryOutcome::Complete(snapshot)
    } else if snapshot.is_empty() {
        DiscoveryOutcome::Unusable("pipeline config lists no usable task types".into())
    } else {
        DiscoveryOutcome::Partial(snapshot)
    }
}

fn non_empty(value: &Value) -> Option<String> {
    value
        .as_str()
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}


#[cfg(test)]
mod tests {
    use super::fixtures::discovery_body;
    use super::*;

    #[test]
    fn request_asks_for_all_tasks_with_suite_credentials() {
        let suite = TranslationSuiteConfig {
            user_id: Some("user-1".into()),
            api_key: Some("ulca-key".into()),
            ..TranslationSuiteConfig::default()
        };

        let request = build_request(&suite);
        let tasks: Vec<&str> = request.body["pipelineTasks"]
            .as_array()
            .expect("task list")
            .iter()
            .filter_map(|task| task["taskType"].as_str())
            .collect();

        assert_eq!(tasks, vec!["asr", "translation", "tts"]);
        assert_eq!(request.header_value("userID"), Some("user-1"));
        assert_eq!(request.header_value("ulcaApiKey"), Some("ulca-key"));
        assert_eq!(
            request.body["pipelineRequestConfig"]["pipelineId"],
            suite.pipeline_id.as_str()
        );
    }

    #[test]
    fn complete_response_fills_every_task() {
        let body = discovery_body(
            "http://inference.test/pipeline",
            &[("asr", "asr-1"), ("translation", "nmt-1"), ("tts", "tts-1")],
        );

        let DiscoveryOutcome::Complete(snapshot) = parse_response(&body) else {
            panic!("expected complete discovery");
        };
        let translation = snapshot.task(TaskType::Translation).expect("translation");
        assert_eq!(translation.service_id, "nmt-1");
        assert_eq!(translation.inference_endpoint, "http://inference.test/pipeline");
        assert_eq!(translation.auth_key_value, "discovered-token");
        assert_eq!(translation.model_id.as_deref(), Some("nmt-1-model"));
    }

    #[test]
    fn missing_task_yields_partial_snapshot() {
        let body = discovery_body(
            "http://inference.test/pipeline",
            &[("asr", "asr-1"), ("translation", "nmt-1")],
        );

        let DiscoveryOutcome::Partial(snapshot) = parse_response(&body) else {
            panic!("expected partial discovery");
        };
        assert!(snapshot.task(TaskType::Tts).is_none());
        assert!(snapshot.task(TaskType::Asr).is_some());
    }

    #[test]
    fn entries_without_service_id_are_dropped() {
        let mut body = discovery_body(
            "http://inference.test/pipeline",
            &[("asr", "asr-1"), ("translation", "nmt-1"), ("tts", "tts-1")],
        );
        body["pipelineResponseConfig"][2]["config"][0]["serviceId"] = Value::Null;

        assert!(matches!(
            parse_response(&body),
            DiscoveryOutcome::Partial(ref snapshot) if snapshot.task(TaskType::Tts).is_none()
        ));
    }

    #[test]
    fn missing_credential_makes_response_unusable() {
        let mut body = discovery_body("http://inference.test/pipeline", &[("asr", "asr-1")]);
        body["pipelineInferenceAPIEndPoint"]["inferenceApiKey"]["value"] = Value::Null;

        assert!(matches!(parse_response(&body), DiscoveryOutcome::Unusable(_)));
    }
}
