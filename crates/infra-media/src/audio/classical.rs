// Classical Audio Backend (external encoder fallback)

use std::sync::Arc;

use async_trait::async_trait;

use mediapress_core::domain::{AnalysisReport, BackendCapability};
use mediapress_core::port::{BackendFailure, BackendResult, CompressRequest, CompressionMetrics, MediaBackend};

use super::audio_output_name;
use crate::ffmpeg::{audio_encode_args, FfmpegInvoker};

const AUDIO_CODEC: &str = "libmp3lame";

/// Invokes the external encoder targeting the requested bitrate; output is
/// always mp3.
pub struct FfmpegAudioBackend {
    invoker: Arc<FfmpegInvoker>,
}

impl FfmpegAudioBackend {
    pub fn new(invoker: Arc<FfmpegInvoker>) -> Self {
        Self { invoker }
    }
}

#[async_trait]
impl MediaBackend for FfmpegAudioBackend {
    fn capability(&self) -> BackendCapability {
        BackendCapability::Classical
    }

    fn output_name(&self, source_name: &str) -> String {
        audio_output_name(source_name, "mp3")
    }

    async fn compress(&self, req: &CompressRequest) -> BackendResult {
        let original_size = tokio::fs::metadata(&req.source)
            .await
            .map_err(|e| BackendFailure::CorruptSource(format!("{}: {}", req.source.display(), e)))?
            .len();

        let args = audio_encode_args(&req.source, &req.dest, AUDIO_CODEC, req.bitrate);
        self.invoker.run(&args).await?;

        let compressed_size = tokio::fs::metadata(&req.dest).await?.len();

        let analysis = AnalysisReport {
            adaptive: req.adaptive,
            ..AnalysisReport::default()
        }
        .with_bitrate(req.bitrate);
        Ok(CompressionMetrics::new(original_size, compressed_size, analysis))
    }
}
