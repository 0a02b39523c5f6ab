use std::path::Path;

use anyhow::Context;

use crate::foundation::core::Region;
use crate::foundation::error::{BlendError, BlendResult};
use crate::surface::bitmap::Bitmap;

/// Decode encoded image bytes into a straight-alpha RGBA8 [`Bitmap`] at the origin.
///
/// Channels are kept exactly as stored; blending needs the raw values, not
/// premultiplied ones.
pub fn decode_layer_image(bytes: &[u8]) -> BlendResult<Bitmap> {
    let dyn_img = image::load_from_memory(bytes).context("decode layer image from memory")?;
    let rgba = dyn_img.to_rgba8();
    let (width, height) = rgba.dimensions();
    Bitmap::from_rgba8(Region::from_origin_size(0, 0, width, height), rgba.into_raw())
}

/// Read and decode a layer image from disk.
#[tracing::instrument(level = "debug", skip(path), fields(path = %path.display()))]
pub fn load_layer_image(path: &Path) -> BlendResult<Bitmap> {
    let bytes = std::fs::read(path).map_err(|e| {
        BlendError::asset(format!("read layer image '{}': {e}", path.display()))
    })?;
    decode_layer_image(&bytes)
        .map_err(|e| BlendError::asset(format!("decode layer image '{}': {e}", path.display())))
}

#[cfg(test)]
#[path = "../../tests/unit/assets/decode.rs"]
mod tests;
