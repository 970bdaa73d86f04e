// Image Compression Backends

pub(crate) mod dct;

mod classical;
mod neural;

pub use classical::ClassicalImageBackend;
pub use neural::NeuralImageBackend;

use std::io::Write;
use std::path::Path;

use image::codecs::jpeg::JpegEncoder;
use image::RgbImage;

use mediapress_core::port::BackendFailure;

/// Compressed image artifacts are JPEG regardless of the source container;
/// that is the codec the quality parameter drives.
pub(crate) fn jpeg_output_name(source_name: &str) -> String {
    let stem = Path::new(source_name)
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| source_name.to_string());
    format!("compressed_{}.jpg", stem)
}

pub(crate) fn encode_jpeg(rgb: &RgbImage, dest: &Path, quality: u8) -> Result<(), BackendFailure> {
    let file = std::fs::File::create(dest)?;
    let mut writer = std::io::BufWriter::new(file);
    let encoder = JpegEncoder::new_with_quality(&mut writer, quality);
    rgb.write_with_encoder(encoder)
        .map_err(|e| BackendFailure::EncoderFailed {
            tool: "jpeg encoder".to_string(),
            detail: e.to_string(),
        })?;
    writer.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn output_name_replaces_extension() {
        assert_eq!(jpeg_output_name("photo.png"), "compressed_photo.jpg");
        assert_eq!(jpeg_output_name("photo.jpg"), "compressed_photo.jpg");
        assert_eq!(jpeg_output_name("photo"), "compressed_photo.jpg");
    }
}
