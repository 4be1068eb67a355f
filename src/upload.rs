//! Decoding of uploaded signature images.

use std::path::Path;

use base64::Engine;
use base64::engine::general_purpose::STANDARD as BASE64_STANDARD;
use tracing::debug;

use crate::api::CanvasImageSource;
use crate::error::{Result, SignatureError};

/// A decoded raster image in straight-alpha RGBA8.
#[derive(Clone, Debug, PartialEq)]
pub struct DecodedImage {
    width: u32,
    height: u32,
    pixels: Vec<u8>,
}

impl DecodedImage {
    pub fn from_rgba(width: u32, height: u32, pixels: Vec<u8>) -> Result<Self> {
        let expected = (width as usize)
            .checked_mul(height as usize)
            .and_then(|v| v.checked_mul(4))
            .ok_or_else(|| SignatureError::Other("image dimensions overflow".into()))?;
        if pixels.len() != expected {
            return Err(SignatureError::Other(
                "RGBA buffer length does not match width*height*4".into(),
            ));
        }
        Ok(Self {
            width,
            height,
            pixels,
        })
    }

    pub fn pixels(&self) -> &[u8] {
        &self.pixels
    }
}

impl CanvasImageSource for DecodedImage {
    fn width(&self) -> u32 {
        self.width
    }

    fn height(&self) -> u32 {
        self.height
    }

    fn data_rgba(&self) -> Option<&[u8]> {
        Some(&self.pixels)
    }
}

/// Decodes any format the `image` crate was built with, sniffing the header.
pub fn decode_image(bytes: &[u8]) -> Result<DecodedImage> {
    let rgba = ::image::load_from_memory(bytes)?.to_rgba8();
    let (width, height) = rgba.dimensions();
    debug!(width, height, "decoded uploaded image");
    DecodedImage::from_rgba(width, height, rgba.into_raw())
}

/// Decodes a `data:<mime>;base64,<payload>` URL, the form a browser file
/// reader hands back.
pub fn decode_data_url(url: &str) -> Result<DecodedImage> {
    let rest = url
        .trim()
        .strip_prefix("data:")
        .ok_or_else(|| SignatureError::InvalidDataUrl("missing data: scheme".into()))?;
    let (meta, payload) = rest
        .split_once(',')
        .ok_or_else(|| SignatureError::InvalidDataUrl("missing payload separator".into()))?;
    if !meta.ends_with(";base64") {
        return Err(SignatureError::InvalidDataUrl(format!(
            "unsupported encoding in {meta:?}"
        )));
    }
    if !meta.starts_with("image/") {
        return Err(SignatureError::InvalidDataUrl(format!(
            "not an image media type: {meta:?}"
        )));
    }
    let bytes = BASE64_STANDARD.decode(payload)?;
    decode_image(&bytes)
}

/// Reads and decodes an image file without blocking the caller's executor.
pub async fn load_image_file(path: impl AsRef<Path>) -> Result<DecodedImage> {
    let path = path.as_ref();
    let bytes = tokio::fs::read(path).await?;
    debug!(path = %path.display(), len = bytes.len(), "read image file");
    decode_image(&bytes)
}
