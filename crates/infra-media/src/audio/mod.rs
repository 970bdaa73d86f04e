// Audio Compression Backends

mod classical;
mod neural;

pub use classical::FfmpegAudioBackend;
pub use neural::NeuralAudioBackend;

use std::path::Path;

use rubato::{FastFixedIn, PolynomialDegree, Resampler};

use mediapress_core::port::BackendFailure;

pub(crate) fn audio_output_name(source_name: &str, extension: &str) -> String {
    let stem = Path::new(source_name)
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| source_name.to_string());
    format!("compressed_{}.{}", stem, extension)
}

/// Resample interleaved samples to the target rate.
///
/// Uses a polynomial fixed-input resampler, a good quality/performance
/// tradeoff for offline conversion. Returns the input unchanged when the
/// rates already match.
pub(crate) fn resample(
    input: &[f32],
    input_rate: u32,
    output_rate: u32,
    channels: u16,
) -> Result<Vec<f32>, BackendFailure> {
    if input_rate == output_rate {
        return Ok(input.to_vec());
    }

    let channels = channels.max(1) as usize;
    let planar = deinterleave(input, channels);
    let frames = planar[0].len();
    if frames == 0 {
        return Err(BackendFailure::CorruptSource(
            "empty audio stream".to_string(),
        ));
    }

    let mut resampler = FastFixedIn::<f32>::new(
        output_rate as f64 / input_rate as f64,
        1.0,
        PolynomialDegree::Septic,
        frames,
        channels,
    )
    .map_err(|e| BackendFailure::EncoderFailed {
        tool: "resampler".to_string(),
        detail: e.to_string(),
    })?;

    let planar_output = resampler
        .process(&planar, None)
        .map_err(|e| BackendFailure::EncoderFailed {
            tool: "resampler".to_string(),
            detail: e.to_string(),
        })?;

    Ok(interleave(&planar_output))
}

fn deinterleave(input: &[f32], channels: usize) -> Vec<Vec<f32>> {
    let mut planar = vec![Vec::with_capacity(input.len() / channels + 1); channels];
    for (i, sample) in input.iter().enumerate() {
        planar[i % channels].push(*sample);
    }
    planar
}

fn interleave(planar: &[Vec<f32>]) -> Vec<f32> {
    let frames = planar.iter().map(|c| c.len()).min().unwrap_or(0);
    let mut out = Vec::with_capacity(frames * planar.len());
    for frame in 0..frames {
        for channel in planar {
            out.push(channel[frame]);
        }
    }
    out
}
