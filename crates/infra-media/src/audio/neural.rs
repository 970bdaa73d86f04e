// Neural Audio Backend (learned codec round-trip)

use async_trait::async_trait;
use tracing::debug;

use mediapress_core::domain::{AnalysisReport, BackendCapability};
use mediapress_core::port::{BackendFailure, BackendResult, CompressRequest, CompressionMetrics, MediaBackend};

use super::{audio_output_name, resample};
use crate::model::AudioModel;

/// Resamples to the codec's fixed rate and round-trips the waveform
/// through a codebook quantization emulating the target bitrate.
pub struct NeuralAudioBackend {
    model: AudioModel,
}

impl NeuralAudioBackend {
    pub fn new(model: AudioModel) -> Self {
        Self { model }
    }

    fn read_samples(path: &std::path::Path) -> Result<(hound::WavSpec, Vec<f32>), BackendFailure> {
        let mut reader = hound::WavReader::open(path)
            .map_err(|e| BackendFailure::CorruptSource(format!("{}: {}", path.display(), e)))?;
        let spec = reader.spec();

        let samples: Vec<f32> = match spec.sample_format {
            hound::SampleFormat::Float => reader
                .samples::<f32>()
                .collect::<Result<_, _>>()
                .map_err(|e| BackendFailure::CorruptSource(e.to_string()))?,
            hound::SampleFormat::Int => {
                let scale = (1i64 << (spec.bits_per_sample - 1)) as f32;
                reader
                    .samples::<i32>()
                    .map(|s| s.map(|v| v as f32 / scale))
                    .collect::<Result<_, _>>()
                    .map_err(|e| BackendFailure::CorruptSource(e.to_string()))?
            }
        };

        if samples.is_empty() {
            return Err(BackendFailure::CorruptSource(
                "empty audio stream".to_string(),
            ));
        }
        Ok((spec, samples))
    }
}

#[async_trait]
impl MediaBackend for NeuralAudioBackend {
    fn capability(&self) -> BackendCapability {
        BackendCapability::Neural
    }

    fn output_name(&self, source_name: &str) -> String {
        audio_output_name(source_name, "wav")
    }

    async fn compress(&self, req: &CompressRequest) -> BackendResult {
        let original_size = tokio::fs::metadata(&req.source)
            .await
            .map_err(|e| BackendFailure::CorruptSource(format!("{}: {}", req.source.display(), e)))?
            .len();

        let (spec, samples) = Self::read_samples(&req.source)?;

        let target_rate = self.model.spec.sample_rate;
        let resampled = resample(&samples, spec.sample_rate, target_rate, spec.channels)?;

        // Codebook round-trip: snap each sample to the level grid the
        // requested bitrate affords.
        let bits = self.model.quant_bits(req.bitrate);
        let levels = ((1u32 << bits) - 1) as f32;
        debug!(
            model = %self.model.spec.name,
            bits,
            input_rate = spec.sample_rate,
            target_rate,
            "Running learned codec round-trip"
        );

        let mut writer = hound::WavWriter::create(
            &req.dest,
            hound::WavSpec {
                channels: spec.channels,
                sample_rate: target_rate,
                bits_per_sample: 16,
                sample_format: hound::SampleFormat::Int,
            },
        )
        .map_err(|e| BackendFailure::Io(e.to_string()))?;

        for sample in resampled {
            let clamped = sample.clamp(-1.0, 1.0);
            let quantized = ((clamped + 1.0) / 2.0 * levels).round() / levels * 2.0 - 1.0;
            let pcm = (quantized * i16::MAX as f32).round() as i16;
            writer
                .write_sample(pcm)
                .map_err(|e| BackendFailure::Io(e.to_string()))?;
        }
        writer
            .finalize()
            .map_err(|e| BackendFailure::Io(e.to_string()))?;

        let compressed_size = tokio::fs::metadata(&req.dest).await?.len();

        let analysis = AnalysisReport {
            adaptive: req.adaptive,
            neural: true,
            ..AnalysisReport::default()
        }
        .with_bitrate(req.bitrate);
        Ok(CompressionMetrics::new(original_size, compressed_size, analysis))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::AudioModelSpec;

    fn model() -> AudioModel {
        AudioModel {
            spec: AudioModelSpec {
                name: "test-rvq".to_string(),
                sample_rate: 24000,
                bits_per_kbps: 1.0,
            },
        }
    }

    fn write_sine_wav(path: &std::path::Path, sample_rate: u32, frames: usize) {
        let mut writer = hound::WavWriter::create(
            path,
            hound::WavSpec {
                channels: 1,
                sample_rate,
                bits_per_sample: 16,
                sample_format: hound::SampleFormat::Int,
            },
        )
        .unwrap();
        for i in 0..frames {
            let t = i as f32 / sample_rate as f32;
            let sample = (t * 440.0 * 2.0 * std::f32::consts::PI).sin() * 0.6;
            writer
                .write_sample((sample * i16::MAX as f32) as i16)
                .unwrap();
        }
        writer.finalize().unwrap();
    }

    #[tokio::test]
    async fn round_trips_to_the_codec_rate() {
        let dir = tempfile::tempdir().unwrap();
        let source = dir.path().join("tone.wav");
        write_sine_wav(&source, 48000, 4800);
        let dest = dir.path().join("out.wav");

        let backend = NeuralAudioBackend::new(model());
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

        assert!(metrics.analysis.neural);
        assert_eq!(metrics.analysis.target_bitrate, Some(6.0));
        let reader = hound::WavReader::open(&dest).unwrap();
        assert_eq!(reader.spec().sample_rate, 24000);
    }

    #[tokio::test]
    async fn non_wav_source_is_a_corrupt_source_failure() {
        let dir = tempfile::tempdir().unwrap();
        let source = dir.path().join("junk.wav");
        std::fs::write(&source, b"definitely not audio").unwrap();

        let backend = NeuralAudioBackend::new(model());
        let err = backend
            .compress(&CompressRequest {
                source,
                dest: dir.path().join("out.wav"),
                quality: 80,
                bitrate: 6.0,
                adaptive: false,
                regions: Vec::new(),
            })
            .await
            .unwrap_err();

        assert!(matches!(err, BackendFailure::CorruptSource(_)));
    }
}
