use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use std::sync::Arc;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TaskType {
    Asr,
    Translation,
    Tts,
}

impl TaskType {
    pub const ALL: [TaskType; 3] = [TaskType::Asr, TaskType::Translation, TaskType::Tts];

    pub fn as_str(&self) -> &'static str {
        match self {
            TaskType::Asr => "asr",
            TaskType::Translation => "translation",
            TaskType::Tts => "tts",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|task| task.as_str() == value)
    }
}

impl fmt::Display for TaskType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Complete descriptor for invoking one task type; never stored partially populated.
#[derive(Debug, Clone, PartialEq)]
pub struct PipelineTaskConfig {
    pub service_id: String,
    pub model_id: Option<String>,
    pub inference_endpoint: String,
    pub auth_key_name: String,
    pub auth_key_value: String,
    pub language_info: Option<Value>,
}

/// Endpoint and credential the discovery call hands out for every task type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InferenceEndpoint {
    pub callback_url: String,
    pub auth_key_name: String,
    pub auth_key_value: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskInfoSource {
    Discovered,
    StaticFallback,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TaskInfo {
    pub task: TaskType,
    pub service_id: String,
    pub inference_endpoint: String,
    pub auth_key_name: String,
    pub auth_key_value: String,
    pub source: TaskInfoSource,
}

impl TaskInfo {
    pub(crate) fn discovered(task: TaskType, config: &PipelineTaskConfig) -> Self {
        Self {
            task,
            service_id: config.service_id.clone(),
            inference_endpoint: config.inference_endpoint.clone(),
            auth_key_name: config.auth_key_name.clone(),
            auth_key_value: config.auth_key_value.clone(),
            source: TaskInfoSource::Discovered,
        }
    }
}

/// Immutable view of the cache; replaced wholesale, never edited.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PipelineSnapshot {
    pub endpoint: Option<InferenceEndpoint>,
    asr: Option<Arc<PipelineTaskConfig>>,
    translation: Option<Arc<PipelineTaskConfig>>,
    tts: Option<Arc<PipelineTaskConfig>>,
}

impl PipelineSnapshot {
    pub fn task(&self, task: TaskType) -> Option<&Arc<PipelineTaskConfig>> {
        match task {
            TaskType::Asr => self.asr.as_ref(),
            TaskType::Translation => self.translation.as_ref(),
            TaskType::Tts => self.tts.as_ref(),
        }
    }

    pub fn is_empty(&self) -> bool {
        TaskType::ALL.iter().all(|task| self.task(*task).is_none())
    }

    pub fn is_complete(&self) -> bool {
        self.endpoint.is_some() && TaskType::ALL.iter().all(|task| self.task(*task).is_some())
    }

    pub(crate) fn with_task(mut self, task: TaskType, config: Arc<PipelineTaskConfig>) -> Self {
        let slot = match task {
            TaskType::Asr => &mut self.asr,
            TaskType::Translation => &mut self.translation,
            TaskType::Tts => &mut self.tts,
        };
        *slot = Some(config);
        self
    }
}
