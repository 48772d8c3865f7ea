use serde::Serialize;
use serde_json::json;
use tracing::warn;

use super::{first_pipeline_item, post_for_json, ServiceError, ServiceOutcome};
use crate::context::PipelineContext;
use crate::http::JsonRequest;
use crate::language::Language;
use crate::pipeline::TaskType;

const SERVICE: &str = "speech synthesis service";

pub const SYNTHESIS_VOICE: &str = "female";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AudioClip {
    pub format: String,
    /// `data:audio/{format};base64,{payload}`, playable as-is.
    pub uri: String,
}

pub struct SpeechSynthesisService<'a> {
    context: &'a PipelineContext,
}

impl<'a> SpeechSynthesisService<'a> {
    pub fn new(context: &'a PipelineContext) -> Self {
        Self { context }
    }

    pub async fn synthesize(&self, text: &str, target: Language) -> ServiceOutcome<AudioClip> {
        if !self.context.readiness().translation_suite {
            return ServiceOutcome::Failed(ServiceError::Configuration("translation suite"));
        }
        if text.trim().is_empty() {
            return ServiceOutcome::Failed(ServiceError::InvalidInput(
                "nothing to synthesize".into(),
            ));
        }

        let outcome: ServiceOutcome<AudioClip> = self.call(text, target).await.into();
        if let Some(err) = outcome.error() {
            warn!(
                target: "speech_service",
                kind = err.kind().as_str(),
                %err,
                "speech synthesis failed"
            );
        }
        outcome
    }

    async fn call(&self, text: &str, target: Language) -> Result<AudioClip, ServiceError> {
        let info = self.context.task_info(TaskType::Tts, target, None).await;

        let body = json!({
            "pipelineTasks": [{
                "taskType": TaskType::Tts.as_str(),
                "config": {
                    "language": {"sourceLanguage": target.code()},
                    "serviceId": info.service_id,
                    "gender": SYNTHESIS_VOICE
                }
            }],
            "inputData": {"input": [{"source": text}]}
        });
        let request = JsonRequest::post(info.inference_endpoint.clone(), body)
            .header(info.auth_key_name.clone(), info.auth_key_value.clone());

        let response = post_for_json(self.context.transport(), SERVICE, request).await?;
        let audio = first_pipeline_item(&response, "audio", SERVICE)?;

        let field = |name: &str| {
            audio[name]
                .as_str()
                .map(str::trim)
                .filter(|value| !value.is_empty())
                .ok_or_else(|| ServiceError::ResponseShape {
                    service: SERVICE,
                    detail: format!("audio[0].{name} is missing"),
                })
        };
        let payload = field("audioContent")?;
        let format = field("audioFormat")?;

        Ok(AudioClip {
            format: format.to_string(),
            uri: format!("data:audio/{format};base64,{payload}"),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::discovery::fixtures::discovery_body;
    use crate::http::mock::MockTransport;
    use crate::services::test_support::{context, discovered_transport, full_config, INFERENCE_URL};

    #[tokio::test]
    async fn builds_data_uri_from_payload_and_format() {
        let transport = discovered_transport().reply(
            "inference.test",
            200,
            json!({"pipelineResponse": [{"audio": [{"audioContent": "UklGRg==", "audioFormat": "wav"}]}]}),
        );
        let (context, transport) = context(full_config(), transport);

        let outcome = context
            .speech_synthesis()
            .synthesize("नमस्ते", Language::Hindi)
            .await;

        assert_eq!(
            outcome,
            ServiceOutcome::Ok(AudioClip {
                format: "wav".into(),
                uri: "data:audio/wav;base64,UklGRg==".into(),
            })
        );
        let call = &transport.requests_to(INFERENCE_URL)[0];
        assert_eq!(call.body["pipelineTasks"][0]["config"]["gender"], SYNTHESIS_VOICE);
        assert_eq!(call.body["pipelineTasks"][0]["config"]["serviceId"], "tts-1");
    }

    #[tokio::test]
    async fn missing_payload_fails_this_call_only() {
        let transport = discovered_transport().reply(
            "inference.test",
            200,
            json!({"pipelineResponse": [{"audio": [{"audioFormat": "wav"}]}]}),
        );
        let (context, _) = context(full_config(), transport);

        let outcome = context
            .speech_synthesis()
            .synthesize("hello", Language::English)
            .await;

        assert!(matches!(
            outcome.error(),
            Some(ServiceError::ResponseShape { .. })
        ));
    }

    #[tokio::test]
    async fn uses_static_descriptor_when_tts_is_not_discovered() {
        let transport = MockTransport::new()
            .reply(
                "config.test",
                200,
                discovery_body(INFERENCE_URL, &[("asr", "asr-1"), ("translation", "nmt-1")]),
            )
            .reply(
                "fallback-inference.test",
                200,
                json!({"pipelineResponse": [{"audio": [{"audioContent": "AAAA", "audioFormat": "mp3"}]}]}),
            );
        let (context, transport) = context(full_config(), transport);

        let outcome = context
            .speech_synthesis()
            .synthesize("hello", Language::English)
            .await;

        assert_eq!(outcome.data().map(|clip| clip.format.as_str()), Some("mp3"));
        let call = &transport.requests_to("fallback-inference.test")[0];
        assert_eq!(call.header_value("Authorization"), Some("ulca-key"));
        assert_eq!(
            call.body["pipelineTasks"][0]["config"]["serviceId"],
            full_config().translation_suite.fallback.tts_service_id.as_str()
        );
    }
}
