//! psxblend composites image layers with the four fixed-function frame-buffer blend
//! modes of the PlayStation 1 GPU, reproducing its 5-bit-per-channel arithmetic.
//!
//! # Pipeline overview
//!
//! 1. **Describe**: a [`Document`] (JSON) lists layers bottom to top. A layer's blend
//!    opcode is set explicitly or resolved once from a marker in its name
//!    (`**1` average, `**2` add, `**3` subtract, `**4` add quarter, `**s3`
//!    inverted subtract, otherwise copy).
//! 2. **Snapshot**: [`DocumentSnapshot::load`] decodes layer images and freezes the
//!    layer list, so rendering works on read-only data.
//! 3. **Composite**: [`render_document`] splits the canvas into tiles and runs
//!    [`render_region`] on each, serially or on a `rayon` pool.
//!
//! The blend engine itself ([`blend_pixel`] and the functions in [`channel`]) is a
//! set of pure, total functions over channel values.
#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod assets;
mod blend;
mod document;
mod foundation;
mod render;
mod surface;

/// Per-channel blend formulas and the 5-bit clamp/truncate primitive.
pub mod channel {
    pub use crate::blend::channel::{
        FIVE_BIT_MASK, FIVE_BIT_MAX, add, add_quarter, average, clamp_truncate, inverted_subtract,
        subtract,
    };
}

pub use assets::decode::{decode_layer_image, load_layer_image};
pub use blend::opcode::{NAME_MARKERS, Opcode};
pub use blend::pixel::{ALPHA_THRESHOLD, blend_pixel, map_channels, passes_alpha_gate};
pub use document::color::ColorDef;
pub use document::model::{Document, LayerDef};
pub use document::snapshot::{DocumentSnapshot, LayerSnapshot};
pub use foundation::core::{Canvas, Region, Rgba8};
pub use foundation::error::{BlendError, BlendResult};
pub use render::cancel::CancelToken;
pub use render::compositor::{RegionReport, RenderStatus, render_region, render_tile};
pub use render::frame::FrameRGBA;
pub use render::pipeline::{
    RenderOutcome, RenderStats, RenderThreading, render_document, tile_regions,
};
pub use surface::bitmap::{Bitmap, PixelSource};
