// External Encoder Invocation Surface (ffmpeg)
// Argument construction is kept pure so the encoder contract is testable
// without the binary installed.

use std::path::Path;
use std::process::Stdio;

use thiserror::Error;
use tokio::process::Command;
use tracing::debug;

use mediapress_core::port::BackendFailure;

/// How much trailing stderr to keep in failure reasons
const STDERR_TAIL_BYTES: usize = 1024;

#[derive(Error, Debug)]
pub enum FfmpegError {
    #[error("failed to launch {tool}: {detail}")]
    Spawn { tool: String, detail: String },

    #[error("{tool} exited with status {status}: {stderr}")]
    Exit {
        tool: String,
        status: i32,
        stderr: String,
    },
}

impl From<FfmpegError> for BackendFailure {
    fn from(err: FfmpegError) -> Self {
        match err {
            FfmpegError::Spawn { tool, detail } => BackendFailure::EncoderFailed { tool, detail },
            FfmpegError::Exit {
                tool,
                status,
                stderr,
            } => BackendFailure::EncoderFailed {
                tool,
                detail: format!("exit status {}: {}", status, stderr),
            },
        }
    }
}

/// Runs the external encoder as an isolated child process.
pub struct FfmpegInvoker {
    binary: String,
}

impl FfmpegInvoker {
    pub fn new() -> Self {
        Self::with_binary("ffmpeg")
    }

    pub fn with_binary(binary: impl Into<String>) -> Self {
        Self {
            binary: binary.into(),
        }
    }

    pub async fn run(&self, args: &[String]) -> Result<(), FfmpegError> {
        debug!(tool = %self.binary, ?args, "Invoking external encoder");

        let output = Command::new(&self.binary)
            .args(args)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .output()
            .await
            .map_err(|e| FfmpegError::Spawn {
                tool: self.binary.clone(),
                detail: e.to_string(),
            })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            let tail = stderr
                .char_indices()
                .rev()
                .nth(STDERR_TAIL_BYTES)
                .map(|(i, _)| &stderr[i..])
                .unwrap_or(&stderr);
            return Err(FfmpegError::Exit {
                tool: self.binary.clone(),
                status: output.status.code().unwrap_or(-1),
                stderr: tail.trim().to_string(),
            });
        }
        Ok(())
    }
}

impl Default for FfmpegInvoker {
    fn default() -> Self {
        Self::new()
    }
}

/// Arguments for encoding audio to a target bitrate.
///
/// The bitrate is handed over in bits per second; overwrite semantics are
/// always explicit.
pub fn audio_encode_args(
    input: &Path,
    output: &Path,
    codec: &str,
    bitrate_kbps: f64,
) -> Vec<String> {
    vec![
        "-i".to_string(),
        input.to_string_lossy().into_owned(),
        "-acodec".to_string(),
        codec.to_string(),
        "-b:a".to_string(),
        format!("{}", (bitrate_kbps * 1000.0) as i64),
        "-y".to_string(),
        output.to_string_lossy().into_owned(),
    ]
}

/// Arguments for encoding video with a rate-control value.
///
/// The secondary audio stream always gets a fixed bitrate; the rate-control
/// value is formatted as-is without clamping to the encoder's nominal range.
pub fn video_encode_args(
    input: &Path,
    output: &Path,
    rate_param: f32,
    audio_bitrate: &str,
) -> Vec<String> {
    vec![
        "-i".to_string(),
        input.to_string_lossy().into_owned(),
        "-vcodec".to_string(),
        "libx264".to_string(),
        "-crf".to_string(),
        format_rate_param(rate_param),
        "-preset".to_string(),
        "medium".to_string(),
        "-acodec".to_string(),
        "aac".to_string(),
        "-b:a".to_string(),
        audio_bitrate.to_string(),
        "-y".to_string(),
        output.to_string_lossy().into_owned(),
    ]
}

/// Arguments for dumping the first `max_frames` decodable frames as images.
pub fn frame_sample_args(input: &Path, pattern: &Path, max_frames: usize) -> Vec<String> {
    vec![
        "-i".to_string(),
        input.to_string_lossy().into_owned(),
        "-frames:v".to_string(),
        max_frames.to_string(),
        "-y".to_string(),
        pattern.to_string_lossy().into_owned(),
    ]
}

/// Format a rate-control value, dropping a trailing `.0`.
pub fn format_rate_param(rate_param: f32) -> String {
    if rate_param.fract() == 0.0 {
        format!("{}", rate_param as i32)
    } else {
        format!("{:.1}", rate_param)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn audio_args_use_bits_per_second_and_overwrite() {
        let args = audio_encode_args(
            &PathBuf::from("in.wav"),
            &PathBuf::from("out.mp3"),
            "libmp3lame",
            6.0,
        );
        assert_eq!(
            args,
            vec!["-i", "in.wav", "-acodec", "libmp3lame", "-b:a", "6000", "-y", "out.mp3"]
        );
    }

    #[test]
    fn video_args_carry_rate_param_and_fixed_audio_stream() {
        let args = video_encode_args(
            &PathBuf::from("in.mp4"),
            &PathBuf::from("out.mp4"),
            26.0,
            "128k",
        );
        assert_eq!(
            args,
            vec![
                "-i", "in.mp4", "-vcodec", "libx264", "-crf", "26", "-preset", "medium",
                "-acodec", "aac", "-b:a", "128k", "-y", "out.mp4"
            ]
        );
    }

    #[test]
    fn frame_sample_args_bound_the_frame_count() {
        let args = frame_sample_args(
            &PathBuf::from("clip.mp4"),
            &PathBuf::from("/tmp/frame_%02d.png"),
            10,
        );
        assert_eq!(
            args,
            vec!["-i", "clip.mp4", "-frames:v", "10", "-y", "/tmp/frame_%02d.png"]
        );
    }

    #[test]
    fn rate_param_formatting() {
        assert_eq!(format_rate_param(26.0), "26");
        assert_eq!(format_rate_param(25.5), "25.5");
        assert_eq!(format_rate_param(1.0), "1");
    }
}
