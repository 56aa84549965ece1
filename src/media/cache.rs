use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};

use tokio::sync::OnceCell;

use crate::foundation::error::WaveformResult;
use crate::media::metadata::AudioMetadata;
use crate::media::provider::AudioMetadataProvider;

type Slot = Arc<OnceCell<Arc<AudioMetadata>>>;

/// Process-wide metadata cache keyed by source identifier.
///
/// At most one decode is in flight per source: concurrent callers for the same identifier await the
/// same [`OnceCell`]. Successful decodes are kept for the cache's lifetime. Failed decodes drop
/// their slot so a later call retries and bad sources do not accumulate.
pub struct MetadataCache<P> {
    provider: P,
    slots: Mutex<HashMap<String, Slot>>,
}

impl<P: AudioMetadataProvider> MetadataCache<P> {
    /// Create an empty cache over `provider`.
    pub fn new(provider: P) -> Self {
        Self {
            provider,
            slots: Mutex::new(HashMap::new()),
        }
    }

    /// The injected provider.
    pub fn provider(&self) -> &P {
        &self.provider
    }

    fn slot(&self, source: &str) -> Slot {
        // Slots are only ever inserted or removed whole, so a poisoned map is still consistent.
        let mut slots = self.slots.lock().unwrap_or_else(PoisonError::into_inner);
        slots.entry(source.to_owned()).or_default().clone()
    }

    /// Remove `slot` for `source` if it is still the mapped one and never got a value.
    fn release_failed(&self, source: &str, slot: &Slot) {
        let mut slots = self.slots.lock().unwrap_or_else(PoisonError::into_inner);
        let stale = slots
            .get(source)
            .is_some_and(|s| Arc::ptr_eq(s, slot) && !s.initialized());
        if stale {
            slots.remove(source);
        }
    }

    /// Return metadata for `source`, decoding it at most once.
    #[tracing::instrument(skip(self))]
    pub async fn get(&self, source: &str) -> WaveformResult<Arc<AudioMetadata>> {
        let slot = self.slot(source);
        let result = slot
            .get_or_try_init(|| async {
                tracing::debug!("decoding audio metadata");
                self.provider.load(source).await.map(Arc::new)
            })
            .await
            .map(Arc::clone);
        if result.is_err() {
            self.release_failed(source, &slot);
        }
        result
    }

    /// Like [`MetadataCache::get`], but logs and absorbs decode failures.
    pub async fn get_or_log(&self, source: &str) -> Option<Arc<AudioMetadata>> {
        match self.get(source).await {
            Ok(m) => Some(m),
            Err(err) => {
                tracing::error!(source, error = %err, "could not load waveform");
                None
            }
        }
    }

    /// Metadata for `source` if it has already been decoded.
    pub fn cached(&self, source: &str) -> Option<Arc<AudioMetadata>> {
        let slots = self.slots.lock().unwrap_or_else(PoisonError::into_inner);
        slots.get(source).and_then(|s| s.get().cloned())
    }

    /// Drop the entry for `source`. Returns `true` when an entry existed.
    ///
    /// Callers already awaiting an in-flight decode still receive its result.
    pub fn invalidate(&self, source: &str) -> bool {
        let mut slots = self.slots.lock().unwrap_or_else(PoisonError::into_inner);
        slots.remove(source).is_some()
    }

    /// Number of decoded sources.
    pub fn len(&self) -> usize {
        let slots = self.slots.lock().unwrap_or_else(PoisonError::into_inner);
        slots.values().filter(|s| s.initialized()).count()
    }

    /// Return `true` when nothing has been decoded yet.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
#[path = "../../tests/unit/media/cache.rs"]
mod tests;
