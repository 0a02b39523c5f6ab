use crate::foundation::core::{Region, Rgba8};
use crate::foundation::error::{BlendError, BlendResult};

/// Read-only random access to a layer's pixels.
///
/// Implementations must be shareable across render workers; the compositor only
/// reads inside [`PixelSource::bounds`].
pub trait PixelSource: Send + Sync {
    /// Canvas-space rectangle the source covers.
    fn bounds(&self) -> Region;

    /// Pixel at canvas position `(x, y)`, or `None` outside [`PixelSource::bounds`].
    fn pixel(&self, x: i32, y: i32) -> Option<Rgba8>;
}

/// Owned straight-alpha RGBA8 pixels placed at an offset on the canvas.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Bitmap {
    bounds: Region,
    data: Vec<u8>,
}

impl Bitmap {
    /// Wrap tightly packed, row-major RGBA8 bytes covering `bounds`.
    pub fn from_rgba8(bounds: Region, data: Vec<u8>) -> BlendResult<Self> {
        let expected = usize::try_from(bounds.area())
            .ok()
            .and_then(|px| px.checked_mul(4))
            .ok_or_else(|| BlendError::validation("bitmap size overflow"))?;
        if data.len() != expected {
            return Err(BlendError::validation(format!(
                "bitmap expects {expected} bytes for {}x{} pixels, got {}",
                bounds.width(),
                bounds.height(),
                data.len()
            )));
        }
        Ok(Self { bounds, data })
    }

    /// Bitmap of `bounds` filled with one color.
    pub fn filled(bounds: Region, color: Rgba8) -> BlendResult<Self> {
        let len = usize::try_from(bounds.area())
            .map_err(|_| BlendError::validation("bitmap size overflow"))?;
        Self::from_rgba8(bounds, color.to_array().repeat(len))
    }

    /// Bitmap with no pixels, anchored at `(x, y)`.
    pub fn empty_at(x: i32, y: i32) -> Self {
        Self {
            bounds: Region::from_origin_size(x, y, 0, 0),
            data: Vec::new(),
        }
    }

    /// Move the bitmap so its top-left corner sits at `(x, y)`.
    ///
    /// Fails when the moved bounds would not fit in `i32` canvas coordinates.
    pub fn with_origin(self, x: i32, y: i32) -> BlendResult<Self> {
        let w = i32::try_from(self.bounds.width()).ok();
        let h = i32::try_from(self.bounds.height()).ok();
        let (Some(right), Some(bottom)) = (
            w.and_then(|w| x.checked_add(w)),
            h.and_then(|h| y.checked_add(h)),
        ) else {
            return Err(BlendError::validation(format!(
                "origin ({x}, {y}) puts a {}x{} bitmap outside i32 coordinates",
                self.bounds.width(),
                self.bounds.height()
            )));
        };
        let bounds = Region::new(x, y, right, bottom)?;
        Ok(Self { bounds, ..self })
    }

    /// Raw RGBA8 bytes, row-major.
    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }

    /// Overwrite the pixel at canvas position `(x, y)`. Returns `false` outside bounds.
    pub fn set(&mut self, x: i32, y: i32, color: Rgba8) -> bool {
        match self.index_of(x, y) {
            Some(idx) => {
                self.data[idx..idx + 4].copy_from_slice(&color.to_array());
                true
            }
            None => false,
        }
    }

    fn index_of(&self, x: i32, y: i32) -> Option<usize> {
        if !self.bounds.contains(x, y) {
            return None;
        }
        let col = (x - self.bounds.left) as usize;
        let row = (y - self.bounds.top) as usize;
        Some((row * self.bounds.width() as usize + col) * 4)
    }
}

impl PixelSource for Bitmap {
    fn bounds(&self) -> Region {
        self.bounds
    }

    fn pixel(&self, x: i32, y: i32) -> Option<Rgba8> {
        let idx = self.index_of(x, y)?;
        let px = &self.data[idx..idx + 4];
        Some(Rgba8::new(px[0], px[1], px[2], px[3]))
    }
}

#[cfg(test)]
#[path = "../../tests/unit/surface/bitmap.rs"]
mod tests;
