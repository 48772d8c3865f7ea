use serde::Serialize;

use super::AppConfig;

/// Per-service readiness derived from the current configuration snapshot.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReadinessFlags {
    pub backend: bool,
    pub direct_completion: bool,
    pub translation_suite: bool,
}

impl ReadinessFlags {
    pub fn resolve(config: &AppConfig) -> Self {
        let completion = &config.completion;
        let suite = &config.translation_suite;

        Self {
            backend: is_set(&config.backend.base_url),
            direct_completion: is_set(&completion.endpoint)
                && is_set(&completion.api_key)
                && is_set(&completion.deployment),
            translation_suite: is_set(&suite.user_id) && is_set(&suite.api_key),
        }
    }

    pub fn has_any(&self) -> bool {
        self.backend || self.direct_completion || self.translation_suite
    }
}

/// Empty values and `YOUR_...` template values count as unset.
pub fn is_placeholder(value: &str) -> bool {
    let trimmed = value.trim();
    trimmed.is_empty() || trimmed.starts_with("YOUR_")
}

fn is_set(value: &Option<String>) -> bool {
    value.as_deref().map(|v| !is_placeholder(v)).unwrap_or(false)
}
