use anyhow::{anyhow, Context, Result};
use image::RgbImage;
use std::path::PathBuf;

/// Accepted image representations.
///
/// This is a closed set: the original duck-typed loader (path string,
/// array, PIL-style object) is replaced by one explicit contract. Every
/// variant normalizes to a tightly packed RGB8 buffer.
#[derive(Clone, Debug)]
pub enum ImageInput {
    /// Image file on disk, decoded by format sniffing.
    Path(PathBuf),
    /// Encoded image bytes (PNG, JPEG).
    Encoded(Vec<u8>),
    /// Already decoded RGB8 pixels, row-major, no padding.
    Raw {
        pixels: Vec<u8>,
        width: u32,
        height: u32,
    },
}

/// Normalize an accepted input into the crate's pixel buffer type.
///
/// Raw buffers are length-validated against `width * height * 3`; decode
/// failures and I/O errors propagate to the caller.
pub fn normalize_to_pixel_buffer(input: &ImageInput) -> Result<RgbImage> {
    match input {
        ImageInput::Path(path) => Ok(image::open(path)
            .with_context(|| format!("failed to open image {}", path.display()))?
            .to_rgb8()),
        ImageInput::Encoded(bytes) => Ok(image::load_from_memory(bytes)
            .context("failed to decode encoded image bytes")?
            .to_rgb8()),
        ImageInput::Raw {
            pixels,
            width,
            height,
        } => {
            let expected = (*width as usize)
                .checked_mul(*height as usize)
                .and_then(|v| v.checked_mul(3))
                .ok_or_else(|| anyhow!("raw frame dimensions overflow"))?;
            if pixels.len() != expected {
                return Err(anyhow!(
                    "raw frame length mismatch: expected {}, got {}",
                    expected,
                    pixels.len()
                ));
            }
            RgbImage::from_raw(*width, *height, pixels.clone())
                .ok_or_else(|| anyhow!("raw frame does not fit an RGB buffer"))
        }
    }
}
