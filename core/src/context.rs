//! Shared state handed by reference to every component call.

use std::sync::{Arc, RwLock};

use crate::config::{AppConfig, ReadinessFlags};
use crate::http::{HttpTransport, UreqTransport};
use crate::language::Language;
use crate::pipeline::{PipelineConfigCache, TaskInfo, TaskType};
use crate::services::{
    DirectCompletionClient, KnowledgeBackendClient, SpeechRecognitionService,
    SpeechSynthesisService, TranslationService,
};

pub struct PipelineContext {
    config: RwLock<Arc<AppConfig>>,
    cache: PipelineConfigCache,
    transport: Arc<dyn HttpTransport>,
}

impl PipelineContext {
    pub fn new(config: AppConfig) -> Self {
        let transport = Arc::new(UreqTransport::new(&config.http));
        Self::with_transport(config, transport)
    }

    pub fn with_transport(config: AppConfig, transport: Arc<dyn HttpTransport>) -> Self {
        Self {
            config: RwLock::new(Arc::new(config)),
            cache: PipelineConfigCache::new(),
            transport,
        }
    }

    /// Current configuration snapshot.
    pub fn config(&self) -> Arc<AppConfig> {
        match self.config.read() {
            Ok(guard) => Arc::clone(&guard),
            Err(poisoned) => Arc::clone(&poisoned.into_inner()),
        }
    }

    /// Explicit override; later component calls observe the new snapshot.
    pub fn update_config<F>(&self, update: F)
    where
        F: FnOnce(&mut AppConfig),
    {
        let mut next = (*self.config()).clone();
        update(&mut next);
        match self.config.write() {
            Ok(mut guard) => *guard = Arc::new(next),
            Err(poisoned) => *poisoned.into_inner() = Arc::new(next),
        }
    }

    pub fn readiness(&self) -> ReadinessFlags {
        self.config().readiness()
    }

    pub fn cache(&self) -> &PipelineConfigCache {
        &self.cache
    }

    pub(crate) fn transport(&self) -> &dyn HttpTransport {
        self.transport.as_ref()
    }

    pub async fn task_info(
        &self,
        task: TaskType,
        source: Language,
        target: Option<Language>,
    ) -> TaskInfo {
        let config = self.config();
        self.cache
            .task_info(
                self.transport(),
                &config.translation_suite,
                task,
                source,
                target,
            )
            .await
    }

    pub fn translation(&self) -> TranslationService<'_> {
        TranslationService::new(self)
    }

    pub fn speech_recognition(&self) -> SpeechRecognitionService<'_> {
        SpeechRecognitionService::new(self)
    }

    pub fn speech_synthesis(&self) -> SpeechSynthesisService<'_> {
        SpeechSynthesisService::new(self)
    }

    pub fn knowledge_backend(&self) -> KnowledgeBackendClient<'_> {
        KnowledgeBackendClient::new(self)
    }

    pub fn direct_completion(&self) -> DirectCompletionClient<'_> {
        DirectCompletionClient::new(self)
    }
}
