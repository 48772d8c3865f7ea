use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info};

use crate::context::PipelineContext;
use crate::language::Language;
use crate::orchestrator::config::OrchestratorConfig;
use crate::orchestrator::constants::*;
use crate::orchestrator::traits::{FixedDelay, Pacing};
use crate::orchestrator::types::{QueryRequest, QueryResult, Stage};
use crate::services::{
    check_health, AudioClip, HealthReport, ServiceError, ServiceOutcome, Translation,
};
use crate::telemetry::events::{
    duration_to_ms, record_query_completed, record_stage_degraded, QueryCompletedEvent,
};

const TARGET: &str = "query_orchestrator";

/// Drives one question through recognition, pivot translation, the knowledge
/// backend (or the completion fallback) and response translation.
pub struct QueryOrchestrator {
    context: Arc<PipelineContext>,
    config: OrchestratorConfig,
    pacing: Arc<dyn Pacing>,
}

impl QueryOrchestrator {
    pub fn new(context: Arc<PipelineContext>) -> Self {
        let config = OrchestratorConfig::default();
        let pacing = Arc::new(FixedDelay(config.batch_delay));
        Self::with_components(context, config, pacing)
    }

    pub fn with_pacing(context: Arc<PipelineContext>, pacing: Arc<dyn Pacing>) -> Self {
        Self::with_components(context, OrchestratorConfig::default(), pacing)
    }

    pub fn with_components(
        context: Arc<PipelineContext>,
        config: OrchestratorConfig,
        pacing: Arc<dyn Pacing>,
    ) -> Self {
        Self {
            context,
            config,
            pacing,
        }
    }

    pub fn context(&self) -> &PipelineContext {
        &self.context
    }

    /// Answers one question. Never fails for upstream reasons: degraded paths
    /// come back as `success == true` with a safe message and a warning.
    ///
    /// Dropping the returned future abandons the in-flight stage; nothing is
    /// left half-written.
    pub async fn run(&self, request: QueryRequest) -> QueryResult {
        let mut run = QueryRun::new();
        let result = self.execute(&request, &mut run).await;
        run.finish(result)
    }

    async fn execute(&self, request: &QueryRequest, run: &mut QueryRun) -> QueryResult {
        let (source, target) = match (
            Language::from_code(&request.source_lang_code),
            Language::from_code(&request.target_lang_code),
        ) {
            (Some(source), Some(target)) => (source, target),
            _ => {
                return QueryResult::failure(format!(
                    "unsupported language pair {} -> {}",
                    request.source_lang_code, request.target_lang_code
                ))
            }
        };
        run.languages = Some((source, target));

        let audio = non_blank(request.audio_base64.as_deref());
        let text = non_blank(request.text_query.as_deref());
        if audio.is_none() && text.is_none() {
            run.warn(EMPTY_QUERY_WARNING);
            return QueryResult::message(EMPTY_QUERY_MESSAGE);
        }

        let readiness = self.context.readiness();
        if !readiness.has_any() {
            run.warn(NOT_CONFIGURED_WARNING);
            return QueryResult::message(NOT_CONFIGURED_MESSAGE);
        }

        let question = match (audio, text) {
            (Some(audio), _) => {
                run.enter(Stage::Transcribing);
                run.used_audio = true;
                match self
                    .context
                    .speech_recognition()
                    .transcribe(audio, source)
                    .await
                {
                    ServiceOutcome::Ok(transcript) => transcript,
                    ServiceOutcome::Degraded { warning, .. } => {
                        run.degrade(None, &warning);
                        return QueryResult::message(TYPE_YOUR_QUESTION_MESSAGE);
                    }
                    ServiceOutcome::Failed(err) => {
                        run.degrade(Some(&err), "Speech recognition failed");
                        return QueryResult::message(TYPE_YOUR_QUESTION_MESSAGE).with_error(err);
                    }
                }
            }
            (None, Some(text)) => text.to_string(),
            (None, None) => return QueryResult::message(EMPTY_QUERY_MESSAGE),
        };

        let pivot = self.config.pivot;
        let pivot_question = if source == pivot {
            question
        } else {
            run.enter(Stage::PivotTranslating);
            match self
                .context
                .translation()
                .translate(&question, source, pivot)
                .await
            {
                ServiceOutcome::Ok(translation) | ServiceOutcome::Degraded { data: translation, .. } => {
                    translation.text
                }
                ServiceOutcome::Failed(err) => {
                    run.degrade(Some(&err), PIVOT_TRANSLATION_WARNING);
                    return QueryResult::message(TRANSLATION_FAILED_MESSAGE).with_error(err);
                }
            }
        };

        run.enter(Stage::BackendQuery);
        let mut usage = None;
        let answer = match self.context.knowledge_backend().ask(&pivot_question).await {
            ServiceOutcome::Ok(answer) | ServiceOutcome::Degraded { data: answer, .. } => answer,
            ServiceOutcome::Failed(backend_err) => {
                if !readiness.direct_completion {
                    run.degrade(Some(&backend_err), AI_UNAVAILABLE_WARNING);
                    return QueryResult::message(AI_UNAVAILABLE_MESSAGE).with_error(backend_err);
                }
                record_stage_degraded(
                    Stage::BackendQuery.as_str(),
                    Some(backend_err.kind().as_str()),
                    FALLBACK_WARNING,
                );

                run.enter(Stage::Fallback);
                match self
                    .context
                    .direct_completion()
                    .complete(&pivot_question, pivot, &self.config.completion)
                    .await
                {
                    ServiceOutcome::Ok(completion)
                    | ServiceOutcome::Degraded { data: completion, .. } => {
                        run.used_fallback = true;
                        run.warn(FALLBACK_WARNING);
                        usage = completion.usage;
                        completion.content
                    }
                    ServiceOutcome::Failed(err) => {
                        run.degrade(Some(&err), AI_UNAVAILABLE_WARNING);
                        return QueryResult::message(AI_UNAVAILABLE_MESSAGE).with_error(err);
                    }
                }
            }
        };

        let mut result = QueryResult::message(answer.clone());
        result.usage = usage;
        result.translated = Some(false);
        if target == pivot {
            return result;
        }

        run.enter(Stage::ResponseTranslating);
        if !readiness.translation_suite {
            run.degrade(None, TRANSLATION_NOT_CONFIGURED_WARNING);
            return result;
        }

        match self
            .context
            .translation()
            .translate(&answer, pivot, target)
            .await
        {
            ServiceOutcome::Ok(translation) | ServiceOutcome::Degraded { data: translation, .. } => {
                run.translated = true;
                result.data = Some(translation.text);
                result.translated = Some(true);
                result.original_text = Some(answer);
                result
            }
            ServiceOutcome::Failed(err) => {
                run.degrade(Some(&err), RESPONSE_TRANSLATION_WARNING);
                result.with_error(err)
            }
        }
    }

    /// Translates each entry independently, keeping input order and length.
    pub async fn batch_translate(
        &self,
        texts: &[String],
        source: Language,
        target: Language,
    ) -> Vec<ServiceOutcome<Translation>> {
        let translation = self.context.translation();
        let mut results = Vec::with_capacity(texts.len());
        for (index, text) in texts.iter().enumerate() {
            if index > 0 {
                self.pacing.pause().await;
            }
            results.push(translation.translate(text, source, target).await);
        }

        info!(
            target: TARGET,
            items = texts.len(),
            failed = results.iter().filter(|outcome| !outcome.is_success()).count(),
            "batch translation finished"
        );
        results
    }

    pub async fn speak(&self, text: &str, language: Language) -> ServiceOutcome<AudioClip> {
        self.context.speech_synthesis().synthesize(text, language).await
    }

    pub async fn health_check(&self) -> HealthReport {
        check_health(&self.context).await
    }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|value| !value.is_empty())
}

/// Bookkeeping for one `run` call.
struct QueryRun {
    started_at: Instant,
    stages: Vec<Stage>,
    warnings: Vec<String>,
    languages: Option<(Language, Language)>,
    used_audio: bool,
    used_fallback: bool,
    translated: bool,
    degraded: bool,
}

impl QueryRun {
    fn new() -> Self {
        Self {
            started_at: Instant::now(),
            stages: vec![Stage::Idle],
            warnings: Vec::new(),
            languages: None,
            used_audio: false,
            used_fallback: false,
            translated: false,
            degraded: false,
        }
    }

    fn current(&self) -> Stage {
        self.stages.last().copied().unwrap_or(Stage::Idle)
    }

    fn enter(&mut self, stage: Stage) {
        debug!(
            target: TARGET,
            from = self.current().as_str(),
            to = stage.as_str(),
            "stage transition"
        );
        self.stages.push(stage);
    }

    fn warn<W: Into<String>>(&mut self, warning: W) {
        self.warnings.push(warning.into());
    }

    fn degrade(&mut self, error: Option<&ServiceError>, warning: &str) {
        self.degraded = true;
        record_stage_degraded(
            self.current().as_str(),
            error.map(|err| err.kind().as_str()),
            warning,
        );
        self.warn(warning);
    }

    fn finish(mut self, mut result: QueryResult) -> QueryResult {
        let final_stage = self.current();
        let terminal = if result.success {
            Stage::Done
        } else {
            Stage::Failed
        };
        self.enter(terminal);

        if !self.warnings.is_empty() {
            result.warning = Some(self.warnings.join("; "));
        }

        let (source, target) = self
            .languages
            .map(|(source, target)| (source.code(), target.code()))
            .unwrap_or(("unknown", "unknown"));
        record_query_completed(QueryCompletedEvent {
            final_stage: final_stage.as_str(),
            source_language: source,
            target_language: target,
            used_audio: self.used_audio,
            used_fallback: self.used_fallback,
            translated: self.translated,
            degraded: self.degraded || !result.success,
            latency_ms: duration_to_ms(self.started_at.elapsed()),
        });

        result.stages = self.stages;
        result
    }
}
