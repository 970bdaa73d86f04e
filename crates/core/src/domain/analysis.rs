// Analysis Metadata Domain Model

use serde::{Deserialize, Serialize};

use crate::domain::region::ImportanceRegion;

/// Analysis metadata recorded alongside a completed compression.
///
/// Regions are reported here even on classical paths that do not use them
/// to modulate compression strength.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AnalysisReport {
    /// Whether adaptive mode was requested
    pub adaptive: bool,
    /// Number of importance regions detected
    pub region_count: usize,
    /// The detected regions, in detection order
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub regions: Vec<ImportanceRegion>,
    /// Whether a learned-model backend produced the artifact
    pub neural: bool,
    /// Target bitrate in kbps (audio only)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub target_bitrate: Option<f64>,
}

impl AnalysisReport {
    /// Report for an adaptive run with detected regions
    pub fn with_regions(regions: Vec<ImportanceRegion>, neural: bool) -> Self {
        Self {
            adaptive: true,
            region_count: regions.len(),
            regions,
            neural,
            target_bitrate: None,
        }
    }

    /// Report for a non-adaptive run
    pub fn plain(neural: bool) -> Self {
        Self {
            adaptive: false,
            region_count: 0,
            regions: Vec::new(),
            neural,
            target_bitrate: None,
        }
    }

    pub fn with_bitrate(mut self, bitrate: f64) -> Self {
        self.target_bitrate = Some(bitrate);
        self
    }
}
