// Importance Detector Implementation

pub mod image_scan;

use std::path::Path;
use std::sync::Arc;

use async_trait::async_trait;
use tracing::debug;

use mediapress_core::domain::{ImportanceRegion, MediaKind};
use mediapress_core::port::{DetectError, ImportanceDetector};

use crate::ffmpeg::{frame_sample_args, FfmpegInvoker};

/// At most this many leading frames are sampled from a video
pub const MAX_VIDEO_FRAMES: usize = 10;

/// Detector built on the coarse frame heuristics.
///
/// Video detection samples the first frames through the external decoder
/// and applies the image heuristics per frame.
pub struct HeuristicDetector {
    invoker: Arc<FfmpegInvoker>,
    max_video_frames: usize,
}

impl HeuristicDetector {
    pub fn new(invoker: Arc<FfmpegInvoker>) -> Self {
        Self {
            invoker,
            max_video_frames: MAX_VIDEO_FRAMES,
        }
    }

    fn scan_image_file(path: &Path) -> Result<Vec<ImportanceRegion>, DetectError> {
        let frame = image::open(path)
            .map_err(|e| DetectError::DecodeFailed(format!("{}: {}", path.display(), e)))?
            .to_rgb8();
        Ok(image_scan::scan_frame(&frame))
    }

    async fn detect_video(&self, source: &Path) -> Result<Vec<ImportanceRegion>, DetectError> {
        let scratch = tempfile::tempdir()?;
        let pattern = scratch.path().join("frame_%02d.png");

        let args = frame_sample_args(source, &pattern, self.max_video_frames);
        self.invoker
            .run(&args)
            .await
            .map_err(|e| DetectError::FrameSampling(e.to_string()))?;

        let mut regions = Vec::new();
        for index in 0..self.max_video_frames {
            // Frame dumps are numbered from 1; a gap means frames ran out
            let frame_path = scratch.path().join(format!("frame_{:02}.png", index + 1));
            if !frame_path.exists() {
                break;
            }
            let frame_regions = Self::scan_image_file(&frame_path)?;
            regions.extend(
                frame_regions
                    .into_iter()
                    .map(|r| r.with_frame(index as u32)),
            );
        }
        debug!(source = %source.display(), regions = regions.len(), "Video frames scanned");
        Ok(regions)
    }
}

#[async_trait]
impl ImportanceDetector for HeuristicDetector {
    async fn detect(
        &self,
        source: &Path,
        kind: MediaKind,
    ) -> Result<Vec<ImportanceRegion>, DetectError> {
        match kind {
            MediaKind::Image => Self::scan_image_file(source),
            MediaKind::Video => self.detect_video(source).await,
            // No detector is defined for audio
            MediaKind::Audio => Ok(Vec::new()),
        }
    }
}
