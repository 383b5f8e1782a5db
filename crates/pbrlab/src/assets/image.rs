//! Image decoding for texture maps.

use std::path::Path;

use crate::error::AssetError;

/// Decoded image, always expanded to RGBA8.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedImage {
    pub width: u32,
    pub height: u32,
    /// Channel count of the source file (1 to 4) before expansion.
    pub channels: u8,
    /// `width * height * 4` bytes, row-major, top row first.
    pub pixels: Vec<u8>,
}

impl DecodedImage {
    /// 1x1 magenta, bound in place of any map that failed to load so the
    /// problem is obvious on screen.
    pub fn placeholder() -> Self {
        Self {
            width: 1,
            height: 1,
            channels: 4,
            pixels: vec![255, 0, 255, 255],
        }
    }

    pub fn is_placeholder(&self) -> bool {
        *self == Self::placeholder()
    }
}

/// Read and decode the image at `path`. The format is sniffed from content.
pub fn decode_image(path: impl AsRef<Path>) -> Result<DecodedImage, AssetError> {
    let path = path.as_ref();
    let bytes = std::fs::read(path).map_err(|source| AssetError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    decode_image_bytes(&bytes, path)
}

/// Decode an in-memory image; `path` is only used in error messages.
pub fn decode_image_bytes(bytes: &[u8], path: &Path) -> Result<DecodedImage, AssetError> {
    let image = ::image::load_from_memory(bytes).map_err(|e| AssetError::ImageDecode {
        path: path.to_path_buf(),
        message: e.to_string(),
    })?;
    let channels = image.color().channel_count();
    let rgba = image.to_rgba8();
    Ok(DecodedImage {
        width: rgba.width(),
        height: rgba.height(),
        channels,
        pixels: rgba.into_raw(),
    })
}

/// Decode `path`, or log a warning and fall back to the placeholder.
pub fn load_or_placeholder(path: impl AsRef<Path>) -> DecodedImage {
    let path = path.as_ref();
    match decode_image(path) {
        Ok(image) => {
            log::debug!("loaded {} ({}x{})", path.display(), image.width, image.height);
            image
        }
        Err(e) => {
            log::warn!("texture unavailable, using placeholder: {e}");
            DecodedImage::placeholder()
        }
    }
}
