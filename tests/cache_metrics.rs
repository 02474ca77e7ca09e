use std::collections::HashSet;
use std::num::NonZeroUsize;
use std::sync::Arc;

use async_trait::async_trait;
use bestiary::application::resolver::{Payload, ResolveError};
use bestiary::cache::{
    CacheAside, CacheConfig, CacheError, CacheKey, CacheStore, METRIC_CACHE_BYPASS,
    METRIC_CACHE_ERROR, METRIC_CACHE_HIT, METRIC_CACHE_MISS, METRIC_CACHE_STORE, MemoryCacheStore,
};
use bestiary::infra::telemetry;
use metrics_util::debugging::DebuggingRecorder;

struct BrokenStore;

#[async_trait]
impl CacheStore for BrokenStore {
    fn name(&self) -> &'static str {
        "broken"
    }

    async fn get(&self, _key: &str) -> Result<Option<String>, CacheError> {
        Err(CacheError::connection("refused"))
    }

    async fn set(
        &self,
        _key: &str,
        _value: &str,
        _ttl: std::time::Duration,
    ) -> Result<(), CacheError> {
        Err(CacheError::connection("refused"))
    }
}

fn payload() -> Result<Payload, ResolveError> {
    Ok(Payload::to_json(&[1, 2, 3])?)
}

#[tokio::test]
async fn cache_paths_emit_expected_metric_keys() {
    let recorder = DebuggingRecorder::new();
    let snapshotter = recorder.snapshotter();
    recorder
        .install()
        .expect("debug metrics recorder should install in this test process");
    telemetry::describe_metrics();

    let config = CacheConfig::memory();
    let memory = Arc::new(MemoryCacheStore::new(
        NonZeroUsize::new(4).expect("non-zero"),
    ));
    let cache = CacheAside::new(memory, &config);
    let key = CacheKey::new("/api/types", Some("weaknesses=6"));

    cache.resolve(&key, payload).await.expect("miss");
    cache.resolve(&key, payload).await.expect("hit");
    cache.bypass(payload).expect("bypass");

    let broken = CacheAside::new(Arc::new(BrokenStore), &config);
    broken
        .resolve(&key, payload)
        .await
        .expect("store errors degrade to a miss");

    let names: HashSet<String> = snapshotter
        .snapshot()
        .into_vec()
        .into_iter()
        .map(|(key, _, _, _)| key.key().name().to_string())
        .collect();

    for expected in [
        METRIC_CACHE_HIT,
        METRIC_CACHE_MISS,
        METRIC_CACHE_BYPASS,
        METRIC_CACHE_STORE,
        METRIC_CACHE_ERROR,
    ] {
        assert!(names.contains(expected), "missing metric {expected}");
    }
}
