//! Task-type service descriptors for the translation suite (asr, translation, tts).

mod cache;
pub(crate) mod discovery;
mod types;

pub use cache::{static_task_info, PipelineConfigCache};
pub use types::{
    InferenceEndpoint, PipelineSnapshot, PipelineTaskConfig, TaskInfo, TaskInfoSource, TaskType,
};
