use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::warn;

use super::{post_for_json, ServiceError, ServiceOutcome};
use crate::context::PipelineContext;
use crate::http::JsonRequest;
use crate::language::Language;

const SERVICE: &str = "direct completion service";

pub const EMPTY_COMPLETION_FALLBACK: &str = "Sorry, I could not process your request.";

#[derive(Debug, Clone, PartialEq)]
pub struct CompletionOptions {
    pub max_tokens: u32,
    pub temperature: f64,
    /// Replaces the default legal-literacy instruction.
    pub system_message: Option<String>,
}

impl Default for CompletionOptions {
    fn default() -> Self {
        Self {
            max_tokens: 500,
            temperature: 0.7,
            system_message: None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Usage {
    #[serde(default)]
    pub prompt_tokens: u64,
    #[serde(default)]
    pub completion_tokens: u64,
    #[serde(default)]
    pub total_tokens: u64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Completion {
    pub content: String,
    pub usage: Option<Usage>,
}

/// Ungrounded chat completion, used only when the knowledge backend is unreachable.
pub struct DirectCompletionClient<'a> {
    context: &'a PipelineContext,
}

impl<'a> DirectCompletionClient<'a> {
    pub fn new(context: &'a PipelineContext) -> Self {
        Self { context }
    }

    pub async fn complete(
        &self,
        prompt: &str,
        language: Language,
        options: &CompletionOptions,
    ) -> ServiceOutcome<Completion> {
        if !self.context.readiness().direct_completion {
            return ServiceOutcome::Failed(ServiceError::Configuration(SERVICE));
        }

        let outcome: ServiceOutcome<Completion> =
            self.call(prompt, language, options).await.into();
        if let Some(err) = outcome.error() {
            warn!(
                target: "direct_completion",
                kind = err.kind().as_str(),
                %err,
                "direct completion failed"
            );
        }
        outcome
    }

    async fn call(
        &self,
        prompt: &str,
        language: Language,
        options: &CompletionOptions,
    ) -> Result<Completion, ServiceError> {
        let config = self.context.config();
        let completion = &config.completion;
        let (Some(endpoint), Some(api_key), Some(deployment)) = (
            completion.endpoint.as_deref(),
            completion.api_key.as_deref(),
            completion.deployment.as_deref(),
        ) else {
            return Err(ServiceError::Configuration(SERVICE));
        };

        let url = format!(
            "{}/openai/deployments/{}/chat/completions?api-version={}",
            endpoint.trim_end_matches('/'),
            deployment,
            completion.api_version
        );
        let system = options
            .system_message
            .clone()
            .unwrap_or_else(|| system_instruction(language));
        let body = json!({
            "messages": [
                {"role": "system", "content": system},
                {"role": "user", "content": prompt}
            ],
            "max_tokens": options.max_tokens,
            "temperature": options.temperature
        });
        let request = JsonRequest::post(url, body).header("api-key", api_key);

        let response = post_for_json(self.context.transport(), SERVICE, request).await?;
        let choices = response["choices"]
            .as_array()
            .ok_or_else(|| ServiceError::ResponseShape {
                service: SERVICE,
                detail: "choices is missing".into(),
            })?;

        let content = choices
            .first()
            .and_then(|choice| choice["message"]["content"].as_str())
            .filter(|content| !content.trim().is_empty())
            .unwrap_or(EMPTY_COMPLETION_FALLBACK)
            .to_string();
        let usage = response
            .get("usage")
            .and_then(|usage| serde_json::from_value(usage.clone()).ok());

        Ok(Completion { content, usage })
    }
}

pub(crate) fn system_instruction(language: Language) -> String {
    format!(
        "You are a legal literacy assistant helping people understand their legal rights and procedures in India.

Guidelines:
- Provide clear, simple explanations suitable for common people
- Focus on practical legal advice and procedures
- Respond in {}
- Keep answers concise but comprehensive
- Include relevant Indian laws and procedures when applicable
- If unsure about specific legal details, recommend consulting a lawyer
- Use examples to make concepts clearer",
        language.prompt_name()
    )
}
