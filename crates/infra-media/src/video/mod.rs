// Video Compression Backend (classical only; no learned model is defined
// for this kind)

mod classical;

pub use classical::{rate_param, FfmpegVideoBackend, AUDIO_STREAM_BITRATE};
