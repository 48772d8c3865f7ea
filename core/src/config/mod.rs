//! Service configuration: defaults, optional JSON file, environment overrides.

mod readiness;

pub use readiness::{is_placeholder, ReadinessFlags};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

pub const DEFAULT_COMPLETION_API_VERSION: &str = "2024-02-15-preview";
pub const DEFAULT_PIPELINE_CONFIG_ENDPOINT: &str =
    "https://meity-auth.ulcacontrib.org/ulca/apis/v0/model/getModelsPipeline";
pub const DEFAULT_PIPELINE_ID: &str = "64392f96daac500b55c543cd";
pub const DEFAULT_INFERENCE_ENDPOINT: &str =
    "https://dhruva-api.bhashini.gov.in/services/inference/pipeline";
pub const DEFAULT_INFERENCE_AUTH_KEY: &str = "Authorization";

const CONFIG_FILE_ENV: &str = "LEGALEASE_CONFIG";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub backend: BackendConfig,
    pub completion: CompletionConfig,
    pub translation_suite: TranslationSuiteConfig,
    pub http: HttpConfig,
}

/// Retrieval-augmented backend exposing `POST {base_url}/ask`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BackendConfig {
    pub base_url: Option<String>,
}

/// Azure-style chat completion deployment used as the ungrounded fallback.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CompletionConfig {
    pub endpoint: Option<String>,
    pub api_key: Option<String>,
    pub deployment: Option<String>,
    pub api_version: String,
}

impl Default for CompletionConfig {
    fn default() -> Self {
        Self {
            endpoint: None,
            api_key: None,
            deployment: None,
            api_version: DEFAULT_COMPLETION_API_VERSION.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TranslationSuiteConfig {
    pub user_id: Option<String>,
    pub api_key: Option<String>,
    pub pipeline_id: String,
    pub config_endpoint: String,
    pub fallback: FallbackServiceTable,
}

impl Default for TranslationSuiteConfig {
    fn default() -> Self {
        Self {
            user_id: None,
            api_key: None,
            pipeline_id: DEFAULT_PIPELINE_ID.to_string(),
            config_endpoint: DEFAULT_PIPELINE_CONFIG_ENDPOINT.to_string(),
            fallback: FallbackServiceTable::default(),
        }
    }
}

/// Static service descriptors used when pipeline discovery is unavailable.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FallbackServiceTable {
    pub inference_endpoint: String,
    pub auth_key_name: String,
    pub asr_service_id: String,
    pub translation_service_id: String,
    pub tts_service_id: String,
}

impl Default for FallbackServiceTable {
    fn default() -> Self {
        Self {
            inference_endpoint: DEFAULT_INFERENCE_ENDPOINT.to_string(),
            auth_key_name: DEFAULT_INFERENCE_AUTH_KEY.to_string(),
            asr_service_id: "ai4bharat/conformer-multilingual-indo_aryan-gpu--t4".to_string(),
            translation_service_id: "ai4bharat/indictrans-v2-all-gpu--t4".to_string(),
            tts_service_id: "ai4bharat/indic-tts-coqui-indo_aryan-gpu--t4".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HttpConfig {
    pub timeout_ms: u64,
    pub connect_timeout_ms: u64,
    /// Upper bound on a response body; synthesized audio is the largest.
    pub max_response_bytes: u64,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            timeout_ms: 20_000,
            connect_timeout_ms: 10_000,
            max_response_bytes: 64 * 1024 * 1024,
        }
    }
}

impl HttpConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    pub fn connect_timeout(&self) -> Duration {
        Duration::from_millis(self.connect_timeout_ms)
    }
}

impl AppConfig {
    /// Defaults, then the file named by `LEGALEASE_CONFIG`, then process environment.
    pub fn load() -> Result<Self> {
        let mut config = match std::env::var(CONFIG_FILE_ENV) {
            Ok(path) if !path.trim().is_empty() => Self::from_file(path.trim())?,
            _ => Self::default(),
        };
        config.apply_env(|key| std::env::var(key).ok());
        Ok(config)
    }

    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config file {}", path.display()))?;
        serde_json::from_str(&raw)
            .with_context(|| format!("failed to parse config file {}", path.display()))
    }

    /// Applies overrides from `lookup`; keys it does not know leave the current value.
    pub fn apply_env<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        let read = |key: &str| {
            lookup(key)
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
        };

        if let Some(value) = read("LEGAL_BACKEND_URL") {
            self.backend.base_url = Some(value);
        }

        if let Some(value) = read("AZURE_OPENAI_ENDPOINT") {
            self.completion.endpoint = Some(value);
        }
        if let Some(value) = read("AZURE_OPENAI_API_KEY") {
            self.completion.api_key = Some(value);
        }
        if let Some(value) = read("AZURE_DEPLOYMENT_NAME") {
            self.completion.deployment = Some(value);
        }
        if let Some(value) = read("AZURE_OPENAI_API_VERSION") {
            self.completion.api_version = value;
        }

        let suite = &mut self.translation_suite;
        if let Some(value) = read("BHASHINI_USER_ID") {
            suite.user_id = Some(value);
        }
        if let Some(value) = read("BHASHINI_API_KEY") {
            suite.api_key = Some(value);
        }
        if let Some(value) = read("BHASHINI_PIPELINE_ID") {
            suite.pipeline_id = value;
        }
        if let Some(value) = read("BHASHINI_CONFIG_ENDPOINT") {
            suite.config_endpoint = value;
        }
        if let Some(value) = read("BHASHINI_INFERENCE_ENDPOINT") {
            suite.fallback.inference_endpoint = value;
        }
        if let Some(value) = read("BHASHINI_ASR_SERVICE_ID") {
            suite.fallback.asr_service_id = value;
        }
        if let Some(value) = read("BHASHINI_TRANSLATION_SERVICE_ID") {
            suite.fallback.translation_service_id = value;
        }
        if let Some(value) = read("BHASHINI_TTS_SERVICE_ID") {
            suite.fallback.tts_service_id = value;
        }

        if let Some(value) = read("LEGALEASE_HTTP_TIMEOUT_MS").and_then(|v| v.parse().ok()) {
            self.http.timeout_ms = value;
        }
        if let Some(value) = read("LEGALEASE_CONNECT_TIMEOUT_MS").and_then(|v| v.parse().ok()) {
            self.http.connect_timeout_ms = value;
        }
        if let Some(value) = read("LEGALEASE_MAX_RESPONSE_BYTES").and_then(|v| v.parse().ok()) {
            self.http.max_response_bytes = value;
        }
    }

    pub fn readiness(&self) -> ReadinessFlags {
        ReadinessFlags::resolve(self)
    }
}
