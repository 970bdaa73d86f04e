// Importance Region Domain Model

use serde::{Deserialize, Serialize};

/// Kind of a detected importance region
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RegionKind {
    Face,
    TextCandidate,
    Motion,
}

impl std::fmt::Display for RegionKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RegionKind::Face => write!(f, "face"),
            RegionKind::TextCandidate => write!(f, "text_candidate"),
            RegionKind::Motion => write!(f, "motion"),
        }
    }
}

/// A perceptually significant sub-area of a media item.
///
/// The bounding box lies within the source media's spatial bounds and the
/// weight is clamped to [0, 1].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImportanceRegion {
    pub kind: RegionKind,
    pub x: u32,
    pub y: u32,
    pub w: u32,
    pub h: u32,
    /// Frame index within the source (video only)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub frame: Option<u32>,
    /// Importance weight in [0, 1]
    pub weight: f32,
}

impl ImportanceRegion {
    pub fn new(kind: RegionKind, x: u32, y: u32, w: u32, h: u32, weight: f32) -> Self {
        Self {
            kind,
            x,
            y,
            w,
            h,
            frame: None,
            weight: weight.clamp(0.0, 1.0),
        }
    }

    /// Tag the region with the video frame it was detected in
    pub fn with_frame(mut self, frame: u32) -> Self {
        self.frame = Some(frame);
        self
    }
}
