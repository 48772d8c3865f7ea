use base64::alphabet;
use base64::engine::{DecodePaddingMode, GeneralPurpose, GeneralPurposeConfig};
use base64::Engine as _;
use serde_json::json;
use tracing::{info, warn};

use super::{first_pipeline_item, post_for_json, ServiceError, ServiceOutcome};
use crate::context::PipelineContext;
use crate::http::JsonRequest;
use crate::language::Language;
use crate::pipeline::TaskType;

const SERVICE: &str = "speech recognition service";

/// The only format accepted from the capture layer.
pub const CANONICAL_AUDIO_FORMAT: &str = "wav";
pub const CANONICAL_SAMPLE_RATE_HZ: u32 = 16_000;
pub const NO_SPEECH_WARNING: &str = "No speech recognized";

/// Accepts padded and unpadded input alike.
const LENIENT_BASE64: GeneralPurpose = GeneralPurpose::new(
    &alphabet::STANDARD,
    GeneralPurposeConfig::new().with_decode_padding_mode(DecodePaddingMode::Indifferent),
);

pub struct SpeechRecognitionService<'a> {
    context: &'a PipelineContext,
}

impl<'a> SpeechRecognitionService<'a> {
    pub fn new(context: &'a PipelineContext) -> Self {
        Self { context }
    }

    /// Transcribes base64 WAV audio. Callers supply mono 16 kHz WAV: the
    /// request declares [`CANONICAL_SAMPLE_RATE_HZ`] and the audio is not
    /// resampled or inspected here.
    ///
    /// An absent transcript field is a failure; an empty one is a `Degraded`
    /// success carrying [`NO_SPEECH_WARNING`].
    pub async fn transcribe(&self, audio_base64: &str, source: Language) -> ServiceOutcome<String> {
        if !self.context.readiness().translation_suite {
            return ServiceOutcome::Failed(ServiceError::Configuration("translation suite"));
        }

        let audio = match normalize_audio(audio_base64) {
            Ok(audio) => audio,
            Err(err) => return ServiceOutcome::Failed(err),
        };

        match self.call(&audio, source).await {
            Ok(text) if text.is_empty() => {
                info!(target: "speech_service", source = source.code(), "no speech recognized");
                ServiceOutcome::Degraded {
                    data: String::new(),
                    warning: NO_SPEECH_WARNING.to_string(),
                }
            }
            Ok(text) => ServiceOutcome::Ok(text),
            Err(err) => {
                warn!(
                    target: "speech_service",
                    kind = err.kind().as_str(),
                    %err,
                    "speech recognition failed"
                );
                ServiceOutcome::Failed(err)
            }
        }
    }

    async fn call(&self, audio: &str, source: Language) -> Result<String, ServiceError> {
        let info = self.context.task_info(TaskType::Asr, source, None).await;

        let body = json!({
            "pipelineTasks": [{
                "taskType": TaskType::Asr.as_str(),
                "config": {
                    "language": {"sourceLanguage": source.code()},
                    "serviceId": info.service_id,
                    "audioFormat": CANONICAL_AUDIO_FORMAT,
                    "samplingRate": CANONICAL_SAMPLE_RATE_HZ
                }
            }],
            "inputData": {
                "audio": [{"audioContent": audio}],
                "audioFormat": CANONICAL_AUDIO_FORMAT
            }
        });
        let request = JsonRequest::post(info.inference_endpoint.clone(), body)
            .header(info.auth_key_name.clone(), info.auth_key_value.clone());

        let response = post_for_json(self.context.transport(), SERVICE, request).await?;
        let output = first_pipeline_item(&response, "output", SERVICE)?;

        output["source"]
            .as_str()
            .map(|text| text.trim().to_string())
            .ok_or_else(|| ServiceError::ResponseShape {
                service: SERVICE,
                detail: "output[0].source is missing".into(),
            })
    }
}

/// Strips an optional `data:` prefix and embedded whitespace, checks the
/// payload decodes and restores `=` padding.
fn normalize_audio(audio_base64: &str) -> Result<String, ServiceError> {
    let trimmed = audio_base64.trim();
    let payload = match trimmed.split_once(";base64,") {
        Some((prefix, payload)) if prefix.starts_with("data:") => payload,
        _ => trimmed,
    };

    let mut payload: String = payload
        .chars()
        .filter(|c| !c.is_ascii_whitespace())
        .collect();
    if payload.is_empty() {
        return Err(ServiceError::InvalidInput("audio payload is empty".into()));
    }
    LENIENT_BASE64
        .decode(&payload)
        .map_err(|err| ServiceError::InvalidInput(format!("audio is not valid base64: {err}")))?;

    while payload.len() % 4 != 0 {
        payload.push('=');
    }
    Ok(payload)
}
