//! Multilingual query state machine over the service clients.

mod constants;
mod engine;

pub mod config;
pub mod traits;
pub mod types;

pub use config::OrchestratorConfig;
pub use constants::{
    AI_UNAVAILABLE_MESSAGE, EMPTY_QUERY_MESSAGE, FALLBACK_WARNING, NOT_CONFIGURED_MESSAGE,
    RESPONSE_TRANSLATION_WARNING, TRANSLATION_FAILED_MESSAGE, TRANSLATION_NOT_CONFIGURED_WARNING,
    TYPE_YOUR_QUESTION_MESSAGE,
};
pub use engine::QueryOrchestrator;
pub use traits::{FixedDelay, NoDelay, Pacing};
pub use types::{QueryRequest, QueryResult, Stage};
