// Neural Image Backend (learned transform round-trip)

use async_trait::async_trait;
use tracing::debug;

use mediapress_core::domain::{AnalysisReport, BackendCapability};
use mediapress_core::port::{BackendFailure, BackendResult, CompressRequest, CompressionMetrics, MediaBackend};

use super::{dct, encode_jpeg, jpeg_output_name};
use crate::model::ImageModel;

/// Runs the decoded pixel tensor through the learned transform and back.
///
/// Fidelity is controlled by the model's operating point; the requested
/// quality only informs the output encoding of the reconstruction.
pub struct NeuralImageBackend {
    model: ImageModel,
}

impl NeuralImageBackend {
    pub fn new(model: ImageModel) -> Self {
        Self { model }
    }
}

#[async_trait]
impl MediaBackend for NeuralImageBackend {
    fn capability(&self) -> BackendCapability {
        BackendCapability::Neural
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

        debug!(model = %self.model.spec.name, "Running learned transform round-trip");
        let reconstruction = dct::reconstruct(&frame, &self.model);

        encode_jpeg(&reconstruction, &req.dest, req.quality)?;

        let compressed_size = tokio::fs::metadata(&req.dest).await?.len();

        let analysis = AnalysisReport {
            adaptive: req.adaptive,
            region_count: req.regions.len(),
            regions: req.regions.clone(),
            neural: true,
            target_bitrate: None,
        };
        Ok(CompressionMetrics::new(original_size, compressed_size, analysis))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::ImageModelSpec;
    use image::RgbImage;

    fn model() -> ImageModel {
        ImageModel {
            spec: ImageModelSpec {
                name: "test-prior".to_string(),
                quant_matrix: vec![4.0; 64],
                scale: 2.0,
            },
        }
    }

    #[tokio::test]
    async fn reconstruction_is_reported_as_neural() {
        let dir = tempfile::tempdir().unwrap();
        let source = dir.path().join("in.png");
        RgbImage::from_fn(40, 40, |x, y| image::Rgb([(x * y % 256) as u8, 80, 120]))
            .save(&source)
            .unwrap();
        let dest = dir.path().join("out.jpg");

        let backend = NeuralImageBackend::new(model());
        let metrics = backend
            .compress(&CompressRequest {
                source,
                dest: dest.clone(),
                quality: 80,
                bitrate: 6.0,
                adaptive: true,
                regions: Vec::new(),
            })
            .await
            .unwrap();

        assert!(dest.exists());
        assert!(metrics.analysis.neural);
        assert!(metrics.analysis.adaptive);
    }
}
