use serde_json::json;
use tracing::warn;

use super::{post_for_json, ServiceError, ServiceOutcome};
use crate::config::is_placeholder;
use crate::context::PipelineContext;
use crate::http::JsonRequest;

const SERVICE: &str = "knowledge backend";

/// Primary, retrieval-grounded question answering.
pub struct KnowledgeBackendClient<'a> {
    context: &'a PipelineContext,
}

impl<'a> KnowledgeBackendClient<'a> {
    pub fn new(context: &'a PipelineContext) -> Self {
        Self { context }
    }

    pub async fn ask(&self, question: &str) -> ServiceOutcome<String> {
        let outcome: ServiceOutcome<String> = self.call(question).await.into();
        if let Some(err) = outcome.error() {
            warn!(
                target: "knowledge_backend",
                kind = err.kind().as_str(),
                %err,
                "backend query failed"
            );
        }
        outcome
    }

    async fn call(&self, question: &str) -> Result<String, ServiceError> {
        let config = self.context.config();
        let base_url = config
            .backend
            .base_url
            .as_deref()
            .filter(|url| !is_placeholder(url))
            .ok_or(ServiceError::Configuration(SERVICE))?;

        let url = format!("{}/ask", base_url.trim_end_matches('/'));
        let request = JsonRequest::post(url, json!({ "question": question }));
        let response = post_for_json(self.context.transport(), SERVICE, request).await?;

        response["answer"]
            .as_str()
            .map(str::trim)
            .filter(|answer| !answer.is_empty())
            .map(str::to_string)
            .ok_or_else(|| ServiceError::ResponseShape {
                service: SERVICE,
                detail: response["error"]
                    .as_str()
                    .map(str::to_string)
                    .unwrap_or_else(|| "answer is missing".into()),
            })
    }
}
