use serde::Serialize;
use serde_json::json;
use tracing::{debug, warn};

use super::{first_pipeline_item, post_for_json, ServiceError, ServiceOutcome};
use crate::context::PipelineContext;
use crate::http::JsonRequest;
use crate::language::Language;
use crate::pipeline::TaskType;

const SERVICE: &str = "translation service";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Translation {
    pub text: String,
    /// Source and target matched, so the text was echoed without a call.
    pub skipped: bool,
}

pub struct TranslationService<'a> {
    context: &'a PipelineContext,
}

impl<'a> TranslationService<'a> {
    pub fn new(context: &'a PipelineContext) -> Self {
        Self { context }
    }

    pub async fn translate(
        &self,
        text: &str,
        source: Language,
        target: Language,
    ) -> ServiceOutcome<Translation> {
        if !self.context.readiness().translation_suite {
            return ServiceOutcome::Failed(ServiceError::Configuration("translation suite"));
        }

        if source == target {
            return ServiceOutcome::Ok(Translation {
                text: text.to_string(),
                skipped: true,
            });
        }

        let outcome: ServiceOutcome<Translation> = self
            .call(text, source, target)
            .await
            .map(|text| Translation {
                text,
                skipped: false,
            })
            .into();

        if let ServiceOutcome::Failed(err) = &outcome {
            warn!(
                target: "translation_service",
                source = source.code(),
                target_language = target.code(),
                kind = err.kind().as_str(),
                %err,
                "translation failed"
            );
        }
        outcome
    }

    async fn call(
        &self,
        text: &str,
        source: Language,
        target: Language,
    ) -> Result<String, ServiceError> {
        let info = self
            .context
            .task_info(TaskType::Translation, source, Some(target))
            .await;
        debug!(
            target: "translation_service",
            service_id = %info.service_id,
            source = ?info.source,
            "calling translation inference"
        );

        let body = json!({
            "pipelineTasks": [{
                "taskType": TaskType::Translation.as_str(),
                "config": {
                    "language": {
                        "sourceLanguage": source.code(),
                        "targetLanguage": target.code()
                    },
                    "serviceId": info.service_id
                }
            }],
            "inputData": {"input": [{"source": text}]}
        });
        let request = JsonRequest::post(info.inference_endpoint.clone(), body)
            .header(info.auth_key_name.clone(), info.auth_key_value.clone());

        let response = post_for_json(self.context.transport(), SERVICE, request).await?;
        let output = first_pipeline_item(&response, "output", SERVICE)?;

        let translated = output["target"]
            .as_str()
            .ok_or_else(|| ServiceError::ResponseShape {
                service: SERVICE,
                detail: "output[0].target is missing".into(),
            })?;
        if translated.trim().is_empty() && !text.trim().is_empty() {
            return Err(ServiceError::ResponseShape {
                service: SERVICE,
                detail: "output[0].target is blank".into(),
            });
        }
        Ok(translated.to_string())
    }
}
