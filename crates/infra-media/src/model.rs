// Model-Loading Surface
//
// Learned models are shipped as operating-point files loaded once at
// startup. A missing or unreadable model is expected and non-fatal: the
// corresponding kind falls back to its classical backend.

use std::path::Path;

use serde::Deserialize;
use tracing::{info, warn};

/// Coefficient quantization table edge length (blockwise transform)
pub const QUANT_BLOCK: usize = 8;

/// Operating point of the learned image transform.
#[derive(Debug, Clone, Deserialize)]
pub struct ImageModelSpec {
    pub name: String,
    /// Row-major 8x8 coefficient quantization table
    pub quant_matrix: Vec<f32>,
    /// Global strength multiplier applied to the table
    pub scale: f32,
}

/// Operating point of the learned audio codec.
#[derive(Debug, Clone, Deserialize)]
pub struct AudioModelSpec {
    pub name: String,
    /// Fixed internal sample rate the codec operates at
    pub sample_rate: u32,
    /// Codebook bits granted per requested kbps
    pub bits_per_kbps: f32,
}

#[derive(Debug, Clone)]
pub struct ImageModel {
    pub spec: ImageModelSpec,
}

impl ImageModel {
    /// Quantization step for coefficient (u, v)
    pub fn step(&self, u: usize, v: usize) -> f32 {
        (self.spec.quant_matrix[u * QUANT_BLOCK + v] * self.spec.scale).max(1.0)
    }
}

#[derive(Debug, Clone)]
pub struct AudioModel {
    pub spec: AudioModelSpec,
}

impl AudioModel {
    /// Codebook bits emulating the requested bitrate
    pub fn quant_bits(&self, bitrate_kbps: f64) -> u32 {
        let bits = (bitrate_kbps * self.spec.bits_per_kbps as f64).round();
        (bits as u32).clamp(2, 16)
    }
}

/// The learned models available to this process, resolved once at startup.
#[derive(Default)]
pub struct ModelCatalog {
    pub image: Option<ImageModel>,
    pub audio: Option<AudioModel>,
}

impl ModelCatalog {
    /// Load whichever operating-point files are configured.
    pub fn load(image_path: Option<&Path>, audio_path: Option<&Path>) -> Self {
        Self {
            image: image_path.and_then(load_image_model),
            audio: audio_path.and_then(load_audio_model),
        }
    }
}

fn load_image_model(path: &Path) -> Option<ImageModel> {
    let spec: ImageModelSpec = match read_spec(path) {
        Ok(spec) => spec,
        Err(reason) => {
            warn!(path = %path.display(), %reason, "Image model unavailable, falling back to classical codec");
            return None;
        }
    };
    if spec.quant_matrix.len() != QUANT_BLOCK * QUANT_BLOCK {
        warn!(
            path = %path.display(),
            entries = spec.quant_matrix.len(),
            "Image model rejected: quantization table must have 64 entries"
        );
        return None;
    }
    if spec.scale <= 0.0 || spec.quant_matrix.iter().any(|&q| q <= 0.0) {
        warn!(path = %path.display(), "Image model rejected: non-positive quantization entries");
        return None;
    }
    info!(path = %path.display(), model = %spec.name, "Loaded image model");
    Some(ImageModel { spec })
}

fn load_audio_model(path: &Path) -> Option<AudioModel> {
    let spec: AudioModelSpec = match read_spec(path) {
        Ok(spec) => spec,
        Err(reason) => {
            warn!(path = %path.display(), %reason, "Audio model unavailable, falling back to external encoder");
            return None;
        }
    };
    if spec.sample_rate == 0 || spec.bits_per_kbps <= 0.0 {
        warn!(path = %path.display(), "Audio model rejected: invalid operating point");
        return None;
    }
    info!(path = %path.display(), model = %spec.name, "Loaded audio model");
    Some(AudioModel { spec })
}

fn read_spec<T: serde::de::DeserializeOwned>(path: &Path) -> Result<T, String> {
    let raw = std::fs::read_to_string(path).map_err(|e| e.to_string())?;
    serde_json::from_str(&raw).map_err(|e| e.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_file(dir: &tempfile::TempDir, name: &str, contents: &str) -> std::path::PathBuf {
        let path = dir.path().join(name);
        let mut f = std::fs::File::create(&path).unwrap();
        f.write_all(contents.as_bytes()).unwrap();
        path
    }

    #[test]
    fn missing_model_files_resolve_to_none() {
        let catalog = ModelCatalog::load(
            Some(Path::new("/nonexistent/image.json")),
            Some(Path::new("/nonexistent/audio.json")),
        );
        assert!(catalog.image.is_none());
        assert!(catalog.audio.is_none());
    }

    #[test]
    fn valid_image_model_loads() {
        let dir = tempfile::tempdir().unwrap();
        let entries: Vec<String> = (0..64).map(|i| format!("{}", 1 + i % 8)).collect();
        let path = write_file(
            &dir,
            "image.json",
            &format!(
                r#"{{"name": "factorized-prior", "quant_matrix": [{}], "scale": 1.5}}"#,
                entries.join(",")
            ),
        );

        let catalog = ModelCatalog::load(Some(&path), None);
        let model = catalog.image.expect("model should load");
        assert_eq!(model.spec.name, "factorized-prior");
        // step is table entry times scale, floored at 1
        assert_eq!(model.step(0, 0), 1.5);
    }

    #[test]
    fn image_model_with_wrong_table_size_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_file(
            &dir,
            "image.json",
            r#"{"name": "bad", "quant_matrix": [1, 2, 3], "scale": 1.0}"#,
        );

        assert!(ModelCatalog::load(Some(&path), None).image.is_none());
    }

    #[test]
    fn audio_model_bits_track_bitrate() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_file(
            &dir,
            "audio.json",
            r#"{"name": "waveform-rvq", "sample_rate": 24000, "bits_per_kbps": 1.0}"#,
        );

        let catalog = ModelCatalog::load(None, Some(&path));
        let model = catalog.audio.expect("model should load");
        assert_eq!(model.quant_bits(6.0), 6);
        assert_eq!(model.quant_bits(24.0), 16); // clamped
        assert_eq!(model.quant_bits(0.5), 2); // clamped
    }
}
