use std::time::Duration;

use super::constants::BATCH_TRANSLATION_DELAY;
use crate::language::{Language, PIVOT_LANGUAGE};
use crate::services::CompletionOptions;

#[derive(Debug, Clone)]
pub struct OrchestratorConfig {
    /// Language the knowledge backend and the completion fallback operate in.
    pub pivot: Language,
    pub completion: CompletionOptions,
    pub batch_delay: Duration,
}

impl Default for OrchestratorConfig {
    fn default() -> Self {
        Self {
            pivot: PIVOT_LANGUAGE,
            completion: CompletionOptions::default(),
            batch_delay: BATCH_TRANSLATION_DELAY,
        }
    }
}
