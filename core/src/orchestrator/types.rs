use serde::{Deserialize, Serialize};

use crate::services::Usage;

/// One user question as supplied by the presentation layer.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QueryRequest {
    #[serde(default)]
    pub text_query: Option<String>,
    /// Base64 WAV; takes precedence over `text_query` when present.
    #[serde(default)]
    pub audio_base64: Option<String>,
    pub source_lang_code: String,
    pub target_lang_code: String,
}

impl QueryRequest {
    pub fn text<Q: Into<String>>(query: Q, source: &str, target: &str) -> Self {
        Self {
            text_query: Some(query.into()),
            audio_base64: None,
            source_lang_code: source.to_string(),
            target_lang_code: target.to_string(),
        }
    }

    pub fn audio<A: Into<String>>(audio_base64: A, source: &str, target: &str) -> Self {
        Self {
            text_query: None,
            audio_base64: Some(audio_base64.into()),
            source_lang_code: source.to_string(),
            target_lang_code: target.to_string(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    Idle,
    Transcribing,
    PivotTranslating,
    BackendQuery,
    Fallback,
    ResponseTranslating,
    Done,
    Failed,
}

impl Stage {
    pub fn as_str(&self) -> &'static str {
        match self {
            Stage::Idle => "idle",
            Stage::Transcribing => "transcribing",
            Stage::PivotTranslating => "pivot_translating",
            Stage::BackendQuery => "backend_query",
            Stage::Fallback => "fallback",
            Stage::ResponseTranslating => "response_translating",
            Stage::Done => "done",
            Stage::Failed => "failed",
        }
    }
}

/// Caller-facing result.
///
/// `success == false` only for requests the orchestrator cannot interpret;
/// every upstream failure is a success carrying a safe message and a warning.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QueryResult {
    pub success: bool,
    pub data: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub warning: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub translated: Option<bool>,
    /// Pivot-language answer, set when `data` is its translation.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub original_text: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub usage: Option<Usage>,
    /// Stages visited, ending in `Done` or `Failed`.
    #[serde(skip)]
    pub stages: Vec<Stage>,
}

impl QueryResult {
    pub(crate) fn message<D: Into<String>>(data: D) -> Self {
        Self {
            success: true,
            data: Some(data.into()),
            warning: None,
            error: None,
            translated: None,
            original_text: None,
            usage: None,
            stages: Vec::new(),
        }
    }

    pub(crate) fn failure<E: Into<String>>(error: E) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(error.into()),
            ..Self::message(String::new())
        }
    }

    pub(crate) fn with_error<E: ToString>(mut self, error: E) -> Self {
        self.error = Some(error.to_string());
        self
    }

    pub fn visited(&self, stage: Stage) -> bool {
        self.stages.contains(&stage)
    }
}
