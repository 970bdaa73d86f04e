// Backend Capability Domain Model

use serde::{Deserialize, Serialize};

use crate::domain::MediaKind;

/// Which strategy class serves a media kind.
///
/// Resolved once at startup from which learned models loaded; absence of a
/// neural model is a normal condition, not a failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BackendCapability {
    Neural,
    Classical,
}

impl std::fmt::Display for BackendCapability {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BackendCapability::Neural => write!(f, "neural"),
            BackendCapability::Classical => write!(f, "classical"),
        }
    }
}

/// Per-kind capability table.
///
/// Every supported kind always resolves to exactly one capability. Video has
/// no neural backend defined and is always classical.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CapabilityTable {
    pub image: BackendCapability,
    pub audio: BackendCapability,
    pub video: BackendCapability,
}

impl CapabilityTable {
    /// Build a table from which neural backends initialized successfully
    pub fn resolve(image_neural: bool, audio_neural: bool) -> Self {
        let pick = |neural: bool| {
            if neural {
                BackendCapability::Neural
            } else {
                BackendCapability::Classical
            }
        };
        Self {
            image: pick(image_neural),
            audio: pick(audio_neural),
            video: BackendCapability::Classical,
        }
    }

    pub fn capability_for(&self, kind: MediaKind) -> BackendCapability {
        match kind {
            MediaKind::Image => self.image,
            MediaKind::Audio => self.audio,
            MediaKind::Video => self.video,
        }
    }
}
