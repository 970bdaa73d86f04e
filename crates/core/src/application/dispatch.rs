// Strategy Dispatcher - per-kind backend selection with classical fallback

use std::sync::Arc;

use tracing::info;

use crate::domain::{BackendCapability, CapabilityTable, MediaKind};
use crate::port::MediaBackend;

/// The backends available to the engine.
///
/// Neural slots are optional; a missing learned model is a normal condition
/// handled by fallback, not an error. Video has no neural slot at all.
pub struct BackendSet {
    pub image_neural: Option<Arc<dyn MediaBackend>>,
    pub image_classical: Arc<dyn MediaBackend>,
    pub audio_neural: Option<Arc<dyn MediaBackend>>,
    pub audio_classical: Arc<dyn MediaBackend>,
    pub video_classical: Arc<dyn MediaBackend>,
}

/// Resolves exactly one backend for every supported media kind.
///
/// The capability table is computed once at construction rather than probed
/// per call.
pub struct Dispatcher {
    backends: BackendSet,
    capabilities: CapabilityTable,
}

impl Dispatcher {
    pub fn new(backends: BackendSet) -> Self {
        let capabilities = CapabilityTable::resolve(
            backends.image_neural.is_some(),
            backends.audio_neural.is_some(),
        );
        info!(
            image = %capabilities.image,
            audio = %capabilities.audio,
            video = %capabilities.video,
            "Resolved backend capabilities"
        );
        Self {
            backends,
            capabilities,
        }
    }

    pub fn capabilities(&self) -> &CapabilityTable {
        &self.capabilities
    }

    /// Select the backend serving `kind`. Never errors: a neural slot the
    /// capability table does not vouch for falls through to classical.
    pub fn select(&self, kind: MediaKind) -> (BackendCapability, Arc<dyn MediaBackend>) {
        let capability = self.capabilities.capability_for(kind);
        let backend = match (kind, capability) {
            (MediaKind::Image, BackendCapability::Neural) => self
                .backends
                .image_neural
                .as_ref()
                .map(Arc::clone)
                .unwrap_or_else(|| Arc::clone(&self.backends.image_classical)),
            (MediaKind::Image, BackendCapability::Classical) => {
                Arc::clone(&self.backends.image_classical)
            }
            (MediaKind::Audio, BackendCapability::Neural) => self
                .backends
                .audio_neural
                .as_ref()
                .map(Arc::clone)
                .unwrap_or_else(|| Arc::clone(&self.backends.audio_classical)),
            (MediaKind::Audio, BackendCapability::Classical) => {
                Arc::clone(&self.backends.audio_classical)
            }
            (MediaKind::Video, _) => Arc::clone(&self.backends.video_classical),
        };
        (capability, backend)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::port::media_backend::mocks::MockBackend;

    fn classical() -> Arc<dyn MediaBackend> {
        Arc::new(MockBackend::succeeding(100))
    }

    fn neural() -> Arc<dyn MediaBackend> {
        Arc::new(MockBackend::new(
            BackendCapability::Neural,
            crate::port::media_backend::mocks::MockBehavior::Success { compressed_size: 100 },
        ))
    }

    #[test]
    fn prefers_neural_when_loaded() {
        let dispatcher = Dispatcher::new(BackendSet {
            image_neural: Some(neural()),
            image_classical: classical(),
            audio_neural: Some(neural()),
            audio_classical: classical(),
            video_classical: classical(),
        });

        let (cap, _) = dispatcher.select(MediaKind::Image);
        assert_eq!(cap, BackendCapability::Neural);
        let (cap, _) = dispatcher.select(MediaKind::Audio);
        assert_eq!(cap, BackendCapability::Neural);
    }

    #[test]
    fn falls_back_to_classical_without_models() {
        let dispatcher = Dispatcher::new(BackendSet {
            image_neural: None,
            image_classical: classical(),
            audio_neural: None,
            audio_classical: classical(),
            video_classical: classical(),
        });

        assert_eq!(
            dispatcher.select(MediaKind::Image).0,
            BackendCapability::Classical
        );
        assert_eq!(
            dispatcher.select(MediaKind::Audio).0,
            BackendCapability::Classical
        );
    }

    #[test]
    fn video_always_resolves_classical() {
        let dispatcher = Dispatcher::new(BackendSet {
            image_neural: Some(neural()),
            image_classical: classical(),
            audio_neural: Some(neural()),
            audio_classical: classical(),
            video_classical: classical(),
        });

        assert_eq!(
            dispatcher.select(MediaKind::Video).0,
            BackendCapability::Classical
        );
    }

    #[test]
    fn every_kind_resolves() {
        let dispatcher = Dispatcher::new(BackendSet {
            image_neural: None,
            image_classical: classical(),
            audio_neural: None,
            audio_classical: classical(),
            video_classical: classical(),
        });

        for kind in [MediaKind::Image, MediaKind::Audio, MediaKind::Video] {
            // select never errors; a backend exists for every kind
            let _ = dispatcher.select(kind);
        }
    }
}
