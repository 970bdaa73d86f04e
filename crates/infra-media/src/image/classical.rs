// Classical Image Backend (conventional codec fallback)

use async_trait::async_trait;

use mediapress_core::domain::{AnalysisReport, BackendCapability};
use mediapress_core::port::{BackendFailure, BackendResult, CompressRequest, CompressionMetrics, MediaBackend};

use super::{encode_jpeg, jpeg_output_name};

/// Re-encodes the decoded frame at the requested quality.
///
/// Importance regions arrive in the request and are reported in analysis
/// metadata, but they do not modulate per-region compression strength on
/// this path.
pub struct ClassicalImageBackend;

#[async_trait]
impl MediaBackend for ClassicalImageBackend {
    fn capability(&self) -> BackendCapability {
        BackendCapability::Classical
    }

    fn output_name(&self, source_name: &str) -> String {
        jpeg_output_name(source_name)
    }

    async fn compress(&self, req: &CompressRequest) -> BackendResult {
        let original_size = tokio::fs::metadata(&req.source)
            .await
            .map_err(|e| BackendFailure::CorruptSource(format!("{}: {}", req.source.display(), e)))?
            .len();

        let frame = image::open(&req.source)
            .map_err(|e| BackendFailure::CorruptSource(format!("{}: {}", req.source.display(), e)))?
            .to_rgb8();

        encode_jpeg(&frame, &req.dest, req.quality)?;

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
    use image::RgbImage;

    fn write_png(dir: &tempfile::TempDir, name: &str, width: u32, height: u32) -> std::path::PathBuf {
        let path = dir.path().join(name);
        let img = RgbImage::from_fn(width, height, |x, y| {
            image::Rgb([(x % 256) as u8, (y % 256) as u8, 64])
        });
        img.save(&path).unwrap();
        path
    }

    #[tokio::test]
    async fn reencodes_and_reports_metrics() {
        let dir = tempfile::tempdir().unwrap();
        let source = write_png(&dir, "in.png", 64, 48);
        let dest = dir.path().join("out.jpg");

        let backend = ClassicalImageBackend;
        let metrics = backend
            .compress(&CompressRequest {
                source: source.clone(),
                dest: dest.clone(),
                quality: 80,
                bitrate: 6.0,
                adaptive: false,
                regions: Vec::new(),
            })
            .await
            .unwrap();

        assert!(dest.exists());
        assert!(metrics.compressed_size > 0);
        assert_eq!(metrics.original_size, std::fs::metadata(&source).unwrap().len());
        assert!(!metrics.analysis.neural);
        assert!(!metrics.analysis.adaptive);
    }

    #[tokio::test]
    async fn missing_source_is_a_corrupt_source_failure() {
        let dir = tempfile::tempdir().unwrap();
        let backend = ClassicalImageBackend;

        let err = backend
            .compress(&CompressRequest {
                source: dir.path().join("absent.png"),
                dest: dir.path().join("out.jpg"),
                quality: 80,
                bitrate: 6.0,
                adaptive: true,
                regions: Vec::new(),
            })
            .await
            .unwrap_err();

        assert!(matches!(err, BackendFailure::CorruptSource(_)));
    }
}
