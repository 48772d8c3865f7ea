use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use super::discovery::{self, DiscoveryOutcome};
use super::types::{PipelineSnapshot, TaskInfo, TaskInfoSource, TaskType};
use crate::config::TranslationSuiteConfig;
use crate::http::HttpTransport;
use crate::language::Language;
use crate::telemetry::events::record_pipeline_discovery;

/// Process-wide task-type to service-descriptor cache, populated on first use.
///
/// Lookups that miss trigger one discovery round. A complete response replaces
/// the snapshot wholesale; a partial one only fills task types the snapshot does
/// not yet hold. Anything still missing is served from the static fallback table
/// and is never cached.
///
/// The snapshot lock is only held for reads and swaps. Discovery runs under a
/// separate population lock, so cached lookups never wait on a probe.
#[derive(Debug, Default)]
pub struct PipelineConfigCache {
    snapshot: Mutex<Arc<PipelineSnapshot>>,
    population: Mutex<()>,
}

impl PipelineConfigCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn snapshot(&self) -> Arc<PipelineSnapshot> {
        Arc::clone(&*self.snapshot.lock().await)
    }

    pub async fn reset(&self) {
        *self.snapshot.lock().await = Arc::new(PipelineSnapshot::default());
    }

    /// Resolves how to call `task`. The languages only annotate logs: discovery
    /// always probes with a fixed pair and service ids are language-agnostic.
    pub async fn task_info(
        &self,
        transport: &dyn HttpTransport,
        suite: &TranslationSuiteConfig,
        task: TaskType,
        source: Language,
        target: Option<Language>,
    ) -> TaskInfo {
        if let Some(info) = self.cached(task).await {
            return info;
        }

        // One probe at a time; a miss that waited here re-checks first.
        let _population = self.population.lock().await;
        if let Some(info) = self.cached(task).await {
            return info;
        }

        debug!(
            target: "pipeline_cache",
            task = task.as_str(),
            source = source.code(),
            target_language = target.map(|l| l.code()),
            "task not cached, running pipeline discovery"
        );

        let outcome = discovery::discover(transport, suite).await;
        record_pipeline_discovery(task, &outcome);

        let mut guard = self.snapshot.lock().await;
        let next = match outcome {
            DiscoveryOutcome::Complete(snapshot) => {
                info!(target: "pipeline_cache", "pipeline discovery complete");
                Some(snapshot)
            }
            DiscoveryOutcome::Partial(discovered) => {
                let mut merged = (**guard).clone();
                if merged.endpoint.is_none() {
                    merged.endpoint = discovered.endpoint.clone();
                }
                for candidate in TaskType::ALL {
                    if merged.task(candidate).is_some() {
                        continue;
                    }
                    if let Some(config) = discovered.task(candidate) {
                        merged = merged.with_task(candidate, Arc::clone(config));
                    }
                }
                warn!(
                    target: "pipeline_cache",
                    task = task.as_str(),
                    "pipeline discovery incomplete, caching the usable task types only"
                );
                Some(merged)
            }
            DiscoveryOutcome::Unusable(reason) => {
                warn!(target: "pipeline_cache", task = task.as_str(), %reason, "pipeline discovery failed");
                None
            }
        };

        if let Some(snapshot) = next {
            *guard = Arc::new(snapshot);
            if let Some(config) = guard.task(task) {
                return TaskInfo::discovered(task, config);
            }
        }

        static_task_info(suite, task)
    }

    async fn cached(&self, task: TaskType) -> Option<TaskInfo> {
        let snapshot = self.snapshot().await;
        snapshot
            .task(task)
            .map(|config| TaskInfo::discovered(task, config))
    }
}

/// Descriptor from the configured fallback table, authorised with the suite key.
pub fn static_task_info(suite: &TranslationSuiteConfig, task: TaskType) -> TaskInfo {
    let table = &suite.fallback;
    let service_id = match task {
        TaskType::Asr => &table.asr_service_id,
        TaskType::Translation => &table.translation_service_id,
        TaskType::Tts => &table.tts_service_id,
    };

    TaskInfo {
        task,
        service_id: service_id.clone(),
        inference_endpoint: table.inference_endpoint.clone(),
        auth_key_name: table.auth_key_name.clone(),
        auth_key_value: suite.api_key.clone().unwrap_or_default(),
        source: TaskInfoSource::StaticFallback,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::http::mock::MockTransport;
    use crate::http::TransportError;
    use crate::pipeline::discovery::fixtures::discovery_body;
    use std::time::{Duration, Instant};

    const CONFIG_URL: &str = "http://config.test/pipeline";

    fn suite() -> TranslationSuiteConfig {
        TranslationSuiteConfig {
            user_id: Some("user".into()),
            api_key: Some("ulca-key".into()),
            config_endpoint: CONFIG_URL.into(),
            ..TranslationSuiteConfig::default()
        }
    }

    async fn lookup(cache: &PipelineConfigCache, transport: &MockTransport, task: TaskType) -> TaskInfo {
        cache
            .task_info(transport, &suite(), task, Language::Hindi, Some(Language::English))
            .await
    }

    #[tokio::test]
    async fn complete_discovery_is_cached_after_one_call() {
        let transport = MockTransport::new().reply(
            "config.test",
            200,
            discovery_body(
                "http://inference.test/pipeline",
                &[("asr", "asr-1"), ("translation", "nmt-1"), ("tts", "tts-1")],
            ),
        );
        let cache = PipelineConfigCache::new();

        let translation = lookup(&cache, &transport, TaskType::Translation).await;
        let tts = lookup(&cache, &transport, TaskType::Tts).await;
        let asr = lookup(&cache, &transport, TaskType::Asr).await;

        assert_eq!(transport.request_count(), 1);
        assert_eq!(translation.service_id, "nmt-1");
        assert_eq!(translation.source, TaskInfoSource::Discovered);
        assert_eq!(tts.service_id, "tts-1");
        assert_eq!(asr.auth_key_value, "discovered-token");
    }

    #[tokio::test]
    async fn failed_discovery_falls_back_without_caching() {
        let transport = MockTransport::new()
            .fail("config.test", TransportError::Connection("refused".into()))
            .reply_raw("config.test", 503, "unavailable");
        let cache = PipelineConfigCache::new();

        let first = lookup(&cache, &transport, TaskType::Translation).await;
        let second = lookup(&cache, &transport, TaskType::Translation).await;

        assert_eq!(transport.request_count(), 2);
        for info in [first, second] {
            assert_eq!(info.source, TaskInfoSource::StaticFallback);
            assert_eq!(info.service_id, suite().fallback.translation_service_id);
            assert_eq!(info.auth_key_name, "Authorization");
            assert_eq!(info.auth_key_value, "ulca-key");
        }
        assert!(cache.snapshot().await.is_empty());
    }

    #[tokio::test]
    async fn partial_discovery_serves_present_tasks_and_falls_back_for_missing() {
        let partial = discovery_body(
            "http://inference.test/pipeline",
            &[("asr", "asr-1"), ("translation", "nmt-1")],
        );
        let transport = MockTransport::new()
            .reply("config.test", 200, partial.clone())
            .reply("config.test", 200, partial);
        let cache = PipelineConfigCache::new();

        let translation = lookup(&cache, &transport, TaskType::Translation).await;
        let asr = lookup(&cache, &transport, TaskType::Asr).await;
        let tts = lookup(&cache, &transport, TaskType::Tts).await;

        assert_eq!(translation.source, TaskInfoSource::Discovered);
        assert_eq!(translation.service_id, "nmt-1");
        assert_eq!(asr.service_id, "asr-1");
        assert_eq!(tts.source, TaskInfoSource::StaticFallback);
        assert_eq!(tts.service_id, suite().fallback.tts_service_id);
        assert!(cache.snapshot().await.task(TaskType::Tts).is_none());
        // One probe for the first miss, one more for the tts miss.
        assert_eq!(transport.request_count(), 2);
    }

    #[tokio::test]
    async fn partial_discovery_never_overwrites_cached_entries() {
        let first = discovery_body("http://inference.test/v1", &[("translation", "nmt-1")]);
        let second = discovery_body(
            "http://inference.test/v2",
            &[("translation", "nmt-2"), ("asr", "asr-2")],
        );
        let transport = MockTransport::new()
            .reply("config.test", 200, first)
            .reply("config.test", 200, second);
        let cache = PipelineConfigCache::new();

        lookup(&cache, &transport, TaskType::Translation).await;
        let asr = lookup(&cache, &transport, TaskType::Asr).await;
        let translation = lookup(&cache, &transport, TaskType::Translation).await;

        assert_eq!(asr.service_id, "asr-2");
        assert_eq!(asr.inference_endpoint, "http://inference.test/v2");
        assert_eq!(translation.service_id, "nmt-1");
        assert_eq!(translation.inference_endpoint, "http://inference.test/v1");
    }

    #[tokio::test]
    async fn complete_discovery_replaces_snapshot_wholesale() {
        let partial = discovery_body("http://inference.test/v1", &[("translation", "nmt-1")]);
        let complete = discovery_body(
            "http://inference.test/v2",
            &[("asr", "asr-2"), ("translation", "nmt-2"), ("tts", "tts-2")],
        );
        let transport = MockTransport::new()
            .reply("config.test", 200, partial)
            .reply("config.test", 200, complete);
        let cache = PipelineConfigCache::new();

        lookup(&cache, &transport, TaskType::Translation).await;
        lookup(&cache, &transport, TaskType::Tts).await;
        let translation = lookup(&cache, &transport, TaskType::Translation).await;

        assert_eq!(translation.service_id, "nmt-2");
        assert!(cache.snapshot().await.is_complete());
    }

    #[tokio::test]
    async fn concurrent_misses_share_one_discovery() {
        let transport = MockTransport::new()
            .with_latency(Duration::from_millis(100))
            .reply(
                "config.test",
                200,
                discovery_body(
                    "http://inference.test/pipeline",
                    &[("asr", "asr-1"), ("translation", "nmt-1"), ("tts", "tts-1")],
                ),
            );
        let cache = PipelineConfigCache::new();

        let (translation, tts, asr) = tokio::join!(
            lookup(&cache, &transport, TaskType::Translation),
            lookup(&cache, &transport, TaskType::Tts),
            lookup(&cache, &transport, TaskType::Asr),
        );

        assert_eq!(transport.request_count(), 1);
        for info in [translation, tts, asr] {
            assert_eq!(info.source, TaskInfoSource::Discovered);
        }
    }

    #[tokio::test]
    async fn cached_task_is_served_while_discovery_is_pending() {
        let partial = discovery_body("http://inference.test/pipeline", &[("translation", "nmt-1")]);
        let transport = MockTransport::new()
            .with_latency(Duration::from_millis(500))
            .reply("config.test", 200, partial.clone())
            .reply("config.test", 200, partial);
        let cache = PipelineConfigCache::new();
        lookup(&cache, &transport, TaskType::Translation).await;

        let (tts, (translation, waited)) = tokio::join!(
            lookup(&cache, &transport, TaskType::Tts),
            async {
                tokio::time::sleep(Duration::from_millis(50)).await;
                let started = Instant::now();
                let info = lookup(&cache, &transport, TaskType::Translation).await;
                (info, started.elapsed())
            },
        );

        assert_eq!(translation.source, TaskInfoSource::Discovered);
        assert_eq!(translation.service_id, "nmt-1");
        assert!(waited < Duration::from_millis(250), "cached lookup waited {waited:?}");
        assert_eq!(tts.source, TaskInfoSource::StaticFallback);
        assert_eq!(transport.request_count(), 2);
    }

    #[tokio::test]
    async fn reset_clears_cached_entries() {
        let transport = MockTransport::new().reply(
            "config.test",
            200,
            discovery_body("http://inference.test/pipeline", &[("translation", "nmt-1")]),
        );
        let cache = PipelineConfigCache::new();

        lookup(&cache, &transport, TaskType::Translation).await;
        assert!(!cache.snapshot().await.is_empty());

        cache.reset().await;
        assert!(cache.snapshot().await.is_empty());
    }
}
