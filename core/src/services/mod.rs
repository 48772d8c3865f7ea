//! Clients for the remote services the orchestrator coordinates.
//!
//! Every public call returns a [`ServiceOutcome`]; transport and parsing
//! failures are folded into [`ServiceError`] instead of escaping.

mod asr;
mod backend;
mod completion;
mod error;
mod health;
mod outcome;
mod translation;
mod tts;

pub use asr::{SpeechRecognitionService, CANONICAL_AUDIO_FORMAT, NO_SPEECH_WARNING};
pub use backend::KnowledgeBackendClient;
pub use completion::{
    Completion, CompletionOptions, DirectCompletionClient, Usage, EMPTY_COMPLETION_FALLBACK,
};
pub use error::{ErrorKind, ServiceError};
pub use health::{check_health, HealthReport};
pub use outcome::ServiceOutcome;
pub use translation::{Translation, TranslationService};
pub use tts::{AudioClip, SpeechSynthesisService, SYNTHESIS_VOICE};

use serde_json::Value;

use crate::http::{HttpTransport, JsonRequest, JsonResponse};

/// Sends `request` and returns the parsed body of a 2xx response.
pub(crate) async fn post_for_json(
    transport: &dyn HttpTransport,
    service: &'static str,
    request: JsonRequest,
) -> Result<Value, ServiceError> {
    let response = transport
        .post_json(request)
        .await
        .map_err(|err| ServiceError::Network {
            service,
            detail: err.to_string(),
        })?;

    if !response.is_success() {
        return Err(ServiceError::UpstreamHttp {
            service,
            status: response.status,
            message: upstream_message(&response),
        });
    }

    serde_json::from_str(&response.body).map_err(|err| ServiceError::ResponseShape {
        service,
        detail: format!("body is not JSON: {err}"),
    })
}

/// Error text from a failed response body, or the bare status when unparseable.
fn upstream_message(response: &JsonResponse) -> String {
    serde_json::from_str::<Value>(&response.body)
        .ok()
        .and_then(|body| {
            body["error"]
                .as_str()
                .or_else(|| body["error"]["message"].as_str())
                .or_else(|| body["message"].as_str())
                .map(str::to_string)
        })
        .unwrap_or_else(|| format!("HTTP {}", response.status))
}

/// First `pipelineResponse[0].{list}[0]` object of an inference reply.
pub(crate) fn first_pipeline_item<'a>(
    body: &'a Value,
    list: &str,
    service: &'static str,
) -> Result<&'a Value, ServiceError> {
    body["pipelineResponse"]
        .as_array()
        .and_then(|responses| responses.first())
        .and_then(|first| first[list].as_array())
        .and_then(|items| items.first())
        .ok_or_else(|| ServiceError::ResponseShape {
            service,
            detail: format!("pipelineResponse[0].{list} is missing or empty"),
        })
}

#[cfg(test)]
pub(crate) mod test_support {
    use std::sync::Arc;

    use crate::config::AppConfig;
    use crate::context::PipelineContext;
    use crate::http::mock::MockTransport;
    use crate::pipeline::discovery::fixtures::discovery_body;

    pub(crate) const BACKEND_URL: &str = "http://backend.test";
    pub(crate) const COMPLETION_URL: &str = "http://completion.test";
    pub(crate) const CONFIG_URL: &str = "http://config.test/pipeline";
    pub(crate) const INFERENCE_URL: &str = "http://inference.test/pipeline";

    pub(crate) fn full_config() -> AppConfig {
        let mut config = AppConfig::default();
        config.backend.base_url = Some(BACKEND_URL.into());
        config.completion.endpoint = Some(COMPLETION_URL.into());
        config.completion.api_key = Some("azure-key".into());
        config.completion.deployment = Some("legal-gpt".into());
        config.translation_suite.user_id = Some("user".into());
        config.translation_suite.api_key = Some("ulca-key".into());
        config.translation_suite.config_endpoint = CONFIG_URL.into();
        config.translation_suite.fallback.inference_endpoint =
            "http://fallback-inference.test/pipeline".into();
        config
    }

    /// Transport whose first discovery probe returns all three task types.
    pub(crate) fn discovered_transport() -> MockTransport {
        MockTransport::new().reply(
            "config.test",
            200,
            discovery_body(
                INFERENCE_URL,
                &[("asr", "asr-1"), ("translation", "nmt-1"), ("tts", "tts-1")],
            ),
        )
    }

    pub(crate) fn context(config: AppConfig, transport: MockTransport) -> (PipelineContext, Arc<MockTransport>) {
        let transport = Arc::new(transport);
        let context = PipelineContext::with_transport(config, transport.clone());
        (context, transport)
    }
}
