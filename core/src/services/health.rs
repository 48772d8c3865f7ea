use chrono::Utc;
use serde::Serialize;
use tracing::info;

use super::CompletionOptions;
use crate::config::ReadinessFlags;
use crate::context::PipelineContext;
use crate::language::Language;

const PROBE_QUESTION: &str = "Test";
const PROBE_TRANSLATION_TEXT: &str = "Hello";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthReport {
    pub backend: bool,
    pub direct_completion: bool,
    pub translation_suite: bool,
    /// RFC 3339, UTC.
    pub timestamp: String,
    pub configured: ReadinessFlags,
}

/// Exercises each configured service once with a minimal payload.
pub async fn check_health(context: &PipelineContext) -> HealthReport {
    let configured = context.readiness();

    let backend = configured.backend
        && context
            .knowledge_backend()
            .ask(PROBE_QUESTION)
            .await
            .is_success();

    let direct_completion = configured.direct_completion
        && context
            .direct_completion()
            .complete(
                PROBE_QUESTION,
                Language::English,
                &CompletionOptions {
                    max_tokens: 10,
                    ..CompletionOptions::default()
                },
            )
            .await
            .is_success();

    let translation_suite = configured.translation_suite
        && context
            .translation()
            .translate(PROBE_TRANSLATION_TEXT, Language::English, Language::Hindi)
            .await
            .is_success();

    let report = HealthReport {
        backend,
        direct_completion,
        translation_suite,
        timestamp: Utc::now().to_rfc3339(),
        configured,
    };
    info!(
        target: "health",
        backend = report.backend,
        direct_completion = report.direct_completion,
        translation_suite = report.translation_suite,
        "health probe finished"
    );
    report
}
