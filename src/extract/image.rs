//! Image Normalization
//!
//! Optional pre-processing before upload: decode, bound the longest
//! edge, flatten to RGB and re-encode as JPEG at a fixed quality to
//! keep the inline payload small. Idempotent; the pipeline may skip
//! it and forward the original bytes.

use image::DynamicImage;
use image::codecs::jpeg::JpegEncoder;
use std::path::Path;
use tracing::debug;

use crate::types::{CuentasError, Result};

/// Decode, downscale and re-encode an image for transmission.
///
/// Returns the JPEG bytes and their MIME type. Unreadable or corrupt
/// input fails with `ImageDecode`.
pub fn normalize_image(bytes: &[u8], max_edge: u32, quality: u8) -> Result<(Vec<u8>, String)> {
    let decoded = image::load_from_memory(bytes)
        .map_err(|e| CuentasError::ImageDecode(e.to_string()))?;

    let (width, height) = (decoded.width(), decoded.height());
    let bounded = if width.max(height) > max_edge {
        debug!(width, height, max_edge, "Downscaling receipt image");
        decoded.thumbnail(max_edge, max_edge)
    } else {
        decoded
    };

    // JPEG has no alpha channel; flatten before encoding
    let rgb = DynamicImage::ImageRgb8(bounded.to_rgb8());

    let mut buffer = Vec::new();
    let encoder = JpegEncoder::new_with_quality(&mut buffer, quality);
    rgb.write_with_encoder(encoder)
        .map_err(|e| CuentasError::ImageDecode(format!("JPEG encode failed: {}", e)))?;

    Ok((buffer, "image/jpeg".to_string()))
}

/// MIME type for a file path, by extension. Defaults to JPEG, which is
/// what phone cameras overwhelmingly produce.
pub fn mime_for_path(path: &Path) -> &'static str {
    match path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase())
        .as_deref()
    {
        Some("png") => "image/png",
        Some("webp") => "image/webp",
        Some("gif") => "image/gif",
        Some("bmp") => "image/bmp",
        Some("heic") => "image/heic",
        _ => "image/jpeg",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{ImageFormat, RgbaImage};
    use std::io::Cursor;

    fn sample_png(width: u32, height: u32) -> Vec<u8> {
        let img = RgbaImage::from_fn(width, height, |x, y| {
            image::Rgba([(x % 256) as u8, (y % 256) as u8, 128, 255])
        });
        let mut bytes = Vec::new();
        DynamicImage::ImageRgba8(img)
            .write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)
            .unwrap();
        bytes
    }

    #[test]
    fn test_large_image_is_bounded() {
        let png = sample_png(2048, 512);
        let (jpeg, mime) = normalize_image(&png, 1024, 80).unwrap();

        assert_eq!(mime, "image/jpeg");
        let reloaded = image::load_from_memory(&jpeg).unwrap();
        assert!(reloaded.width() <= 1024);
        assert!(reloaded.height() <= 1024);
        // Aspect ratio preserved
        assert_eq!(reloaded.width(), 1024);
        assert_eq!(reloaded.height(), 256);
    }

    #[test]
    fn test_small_image_keeps_dimensions() {
        let png = sample_png(300, 200);
        let (jpeg, _) = normalize_image(&png, 1024, 80).unwrap();

        let reloaded = image::load_from_memory(&jpeg).unwrap();
        assert_eq!((reloaded.width(), reloaded.height()), (300, 200));
    }

    #[test]
    fn test_normalize_is_idempotent_on_dimensions() {
        let png = sample_png(1600, 1600);
        let (first, _) = normalize_image(&png, 1024, 80).unwrap();
        let (second, _) = normalize_image(&first, 1024, 80).unwrap();

        let reloaded = image::load_from_memory(&second).unwrap();
        assert_eq!((reloaded.width(), reloaded.height()), (1024, 1024));
    }

    #[test]
    fn test_garbage_input_fails_with_decode_error() {
        let err = normalize_image(b"definitely not an image", 1024, 80).unwrap_err();
        assert!(matches!(err, CuentasError::ImageDecode(_)));
    }

    #[test]
    fn test_mime_for_path() {
        assert_eq!(mime_for_path(Path::new("recibo.PNG")), "image/png");
        assert_eq!(mime_for_path(Path::new("recibo.webp")), "image/webp");
        assert_eq!(mime_for_path(Path::new("recibo.jpg")), "image/jpeg");
        assert_eq!(mime_for_path(Path::new("recibo")), "image/jpeg");
    }
}
