// Classical Video Backend

use std::sync::Arc;

use async_trait::async_trait;
use tracing::debug;

use mediapress_core::domain::{AnalysisReport, BackendCapability};
use mediapress_core::port::{BackendFailure, BackendResult, CompressRequest, CompressionMetrics, MediaBackend};

use crate::ffmpeg::{video_encode_args, FfmpegInvoker};

/// Fixed bitrate for the secondary audio stream, regardless of the
/// adaptive flag.
pub const AUDIO_STREAM_BITRATE: &str = "128k";

/// Map requested quality (1-100) to the encoder's rate-control value.
///
/// Lower values mean higher quality. The result is handed to the encoder
/// without clamping at the extremes.
pub fn rate_param(quality: u8) -> f32 {
    51.0 - quality as f32 * 0.5
}

/// Re-encodes through the external encoder at the mapped rate-control
/// value. Adaptive mode computes regions for reporting only; it does not
/// alter the rate-control value.
pub struct FfmpegVideoBackend {
    invoker: Arc<FfmpegInvoker>,
}

impl FfmpegVideoBackend {
    pub fn new(invoker: Arc<FfmpegInvoker>) -> Self {
        Self { invoker }
    }
}

#[async_trait]
impl MediaBackend for FfmpegVideoBackend {
    fn capability(&self) -> BackendCapability {
        BackendCapability::Classical
    }

    async fn compress(&self, req: &CompressRequest) -> BackendResult {
        let original_size = tokio::fs::metadata(&req.source)
            .await
            .map_err(|e| BackendFailure::CorruptSource(format!("{}: {}", req.source.display(), e)))?
            .len();

        let rate = rate_param(req.quality);
        debug!(quality = req.quality, rate_param = rate, "Encoding video");

        let args = video_encode_args(&req.source, &req.dest, rate, AUDIO_STREAM_BITRATE);
        self.invoker.run(&args).await?;

        let compressed_size = tokio::fs::metadata(&req.dest).await?.len();

        let analysis = AnalysisReport {
            adaptive: req.adaptive,
            region_count: req.regions.len(),
            regions: req.regions.clone(),
            neural: false,
            target_bitrate: None,
        };
        Ok(CompressionMetrics::new(original_size, compressed_size, analysis))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rate_param_mapping_matches_the_contract() {
        assert_eq!(rate_param(100), 1.0);
        assert_eq!(rate_param(50), 26.0);
        assert_eq!(rate_param(0), 51.0);
    }

    #[test]
    fn rate_param_is_not_clamped_at_the_extremes() {
        // quality 1 is the lowest submittable value; the mapping itself is
        // defined over the full byte range and passes through untouched
        assert_eq!(rate_param(1), 50.5);
        assert_eq!(rate_param(102), 0.0);
        assert!(rate_param(104) < 0.0);
    }
}
