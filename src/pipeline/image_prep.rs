//! Image rescaling and re-encoding for vision API payloads.
//!
//! Screenshots keep their full resolution at high quality so on-screen
//! text stays legible; photos are downscaled and compressed harder to
//! keep the request payload small.

use std::io::Cursor;

use image::codecs::jpeg::JpegEncoder;
use image::DynamicImage;
use tracing::info;

use crate::error::ReportError;

/// Files below this size are passed through untouched.
pub const PASSTHROUGH_MAX_BYTES: usize = 500 * 1024;

/// Target width for photographic content.
pub const PHOTO_MAX_WIDTH: u32 = 2048;

/// JPEG quality for screenshots (text legibility) vs. photos (payload size).
const SCREENSHOT_QUALITY: u8 = 95;
const PHOTO_QUALITY: u8 = 75;

/// Filename substrings that mark a device screenshot. Case-sensitive.
const SCREENSHOT_MARKERS: [&str; 4] = ["Screenshot", "SHealth", "ReactNative", "屏幕截图"];

/// Media type of every prepared image. Small files are passed through with
/// this mime hint as well, whatever their actual container format.
pub const PREPARED_MIME: &str = "image/jpeg";

/// Prepare an uploaded image for the model request: decode, flatten alpha,
/// resize photos wider than [`PHOTO_MAX_WIDTH`], and re-encode as JPEG.
///
/// Returns `(bytes, mime)`. Inputs under 500 KiB are returned byte-identical.
///
/// # Errors
/// [`ReportError::Decode`] if the bytes are not a decodable image. There is
/// no recovery path for corrupt uploads; the failure propagates.
pub fn prepare_image(bytes: &[u8], filename: &str) -> Result<(Vec<u8>, &'static str), ReportError> {
    if bytes.len() < PASSTHROUGH_MAX_BYTES {
        return Ok((bytes.to_vec(), PREPARED_MIME));
    }

    let mut img = image::load_from_memory(bytes).map_err(|e| {
        ReportError::Decode(format!("failed to decode '{}': {}", filename, e))
    })?;

    // Alpha is dropped, not composited. Palette images arrive from the
    // decoder already expanded to RGB/RGBA.
    if img.color().has_alpha() {
        img = DynamicImage::ImageRgb8(img.to_rgb8());
    }

    let is_screenshot = SCREENSHOT_MARKERS.iter().any(|m| filename.contains(m));

    let (img, quality) = if is_screenshot {
        (img, SCREENSHOT_QUALITY)
    } else {
        (resize_to_width(img, PHOTO_MAX_WIDTH), PHOTO_QUALITY)
    };

    let encoded = encode_jpeg(&img, quality)?;
    info!(
        "Prepared '{}': {} -> {} bytes ({}x{}, q{})",
        filename,
        bytes.len(),
        encoded.len(),
        img.width(),
        img.height(),
        quality
    );

    Ok((encoded, PREPARED_MIME))
}

/// Downscale proportionally to `target_width` if wider; smaller images are
/// returned unchanged.
fn resize_to_width(img: DynamicImage, target_width: u32) -> DynamicImage {
    if img.width() <= target_width {
        return img;
    }

    let ratio = target_width as f32 / img.width() as f32;
    let new_height = (img.height() as f32 * ratio) as u32;
    img.resize_exact(
        target_width,
        new_height,
        image::imageops::FilterType::Lanczos3,
    )
}

fn encode_jpeg(img: &DynamicImage, quality: u8) -> Result<Vec<u8>, ReportError> {
    let mut buffer = Cursor::new(Vec::new());
    let encoder = JpegEncoder::new_with_quality(&mut buffer, quality);
    img.write_with_encoder(encoder)
        .map_err(|e| ReportError::Decode(format!("failed to encode JPEG: {}", e)))?;
    Ok(buffer.into_inner())
}
