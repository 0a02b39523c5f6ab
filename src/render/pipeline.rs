use rayon::prelude::*;

use crate::document::snapshot::DocumentSnapshot;
use crate::foundation::core::Region;
use crate::foundation::error::{BlendError, BlendResult};
use crate::render::cancel::CancelToken;
use crate::render::compositor::{RegionReport, RenderStatus, render_tile};
use crate::render::frame::FrameRGBA;
use crate::surface::bitmap::{Bitmap, PixelSource};

#[derive(Clone, Debug)]
/// Threading and tiling controls for rendering a document.
pub struct RenderThreading {
    /// Render tiles on a worker pool when `true`.
    pub parallel: bool,
    /// Edge length of square output tiles in pixels. `0` is treated as `1`.
    pub tile_size: u32,
    /// Optional explicit worker thread count.
    pub threads: Option<usize>,
}

impl Default for RenderThreading {
    fn default() -> Self {
        Self {
            parallel: false,
            tile_size: 64,
            threads: None,
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
/// Aggregated rendering counters.
pub struct RenderStats {
    /// Tiles the canvas was split into.
    pub tiles_total: u64,
    /// Tiles that ran to completion.
    pub tiles_completed: u64,
    /// Tiles stopped by cancellation.
    pub tiles_cancelled: u64,
    /// Source pixels blended into the output.
    pub pixels_blended: u64,
    /// Source pixels skipped by the alpha gate.
    pub pixels_gated: u64,
}

impl RenderStats {
    fn record(&mut self, report: &RegionReport) {
        self.tiles_total += 1;
        match report.status {
            RenderStatus::Completed => self.tiles_completed += 1,
            RenderStatus::Cancelled => self.tiles_cancelled += 1,
        }
        self.pixels_blended += report.pixels_blended;
        self.pixels_gated += report.pixels_gated;
    }
}

/// Output of [`render_document`].
///
/// A cancelled outcome still carries the frame, but it is a partial result and
/// must be discarded or re-rendered rather than used.
#[derive(Clone, Debug)]
#[must_use]
pub struct RenderOutcome {
    /// Composited pixels.
    pub frame: FrameRGBA,
    /// Counters summed over all tiles.
    pub stats: RenderStats,
    /// `Cancelled` if any tile was cancelled.
    pub status: RenderStatus,
}

impl RenderOutcome {
    /// Return `true` when every tile completed.
    pub fn is_complete(&self) -> bool {
        self.status == RenderStatus::Completed
    }

    /// The frame of a completed render, or an error for a cancelled one.
    pub fn into_complete_frame(self) -> BlendResult<FrameRGBA> {
        match self.status {
            RenderStatus::Completed => Ok(self.frame),
            RenderStatus::Cancelled => Err(BlendError::render(
                "render was cancelled; the frame is incomplete",
            )),
        }
    }
}

/// Split `bounds` into row-major square tiles of at most `tile_size` pixels.
pub fn tile_regions(bounds: Region, tile_size: u32) -> Vec<Region> {
    let step = i32::try_from(tile_size.max(1)).unwrap_or(i32::MAX);
    let mut out = Vec::new();
    let mut top = bounds.top;
    while top < bounds.bottom {
        let bottom = top.saturating_add(step).min(bounds.bottom);
        let mut left = bounds.left;
        while left < bounds.right {
            let right = left.saturating_add(step).min(bounds.right);
            out.push(Region {
                left,
                top,
                right,
                bottom,
            });
            left = right;
        }
        top = bottom;
    }
    out
}

/// Composite every tile of the snapshot's canvas and assemble the frame.
///
/// Tiles are disjoint and each owns its own buffer, so parallel rendering needs
/// no synchronization beyond the shared, read-only snapshot. Serial and
/// parallel renders produce identical bytes.
#[tracing::instrument(
    level = "debug",
    skip_all,
    fields(
        width = snapshot.canvas().width,
        height = snapshot.canvas().height,
        parallel = threading.parallel
    )
)]
pub fn render_document(
    snapshot: &DocumentSnapshot,
    threading: &RenderThreading,
    cancel: &CancelToken,
) -> BlendResult<RenderOutcome> {
    let canvas = snapshot.canvas();
    let regions = tile_regions(canvas.bounds(), threading.tile_size);
    tracing::debug!(tiles = regions.len(), "rendering document");

    let rendered = if threading.parallel {
        let pool = build_thread_pool(threading.threads)?;
        pool.install(|| {
            regions
                .par_iter()
                .map(|region| render_tile(snapshot, *region, cancel))
                .collect::<Vec<_>>()
        })
    } else {
        regions
            .iter()
            .map(|region| render_tile(snapshot, *region, cancel))
            .collect::<Vec<_>>()
    };

    let mut frame = FrameRGBA {
        width: canvas.width,
        height: canvas.height,
        data: vec![0u8; canvas.width as usize * canvas.height as usize * 4],
    };
    let mut stats = RenderStats::default();
    for item in rendered {
        let (tile, report) = item?;
        stats.record(&report);
        blit_tile(&mut frame, &tile)?;
    }

    let status = if stats.tiles_cancelled > 0 {
        RenderStatus::Cancelled
    } else {
        RenderStatus::Completed
    };
    tracing::debug!(?status, ?stats, "document rendered");
    Ok(RenderOutcome {
        frame,
        stats,
        status,
    })
}

fn blit_tile(frame: &mut FrameRGBA, tile: &Bitmap) -> BlendResult<()> {
    let r = tile.bounds();
    if r.left < 0 || r.top < 0 || r.right as u32 > frame.width || r.bottom as u32 > frame.height {
        return Err(BlendError::render(format!(
            "tile {r:?} does not fit in a {}x{} frame",
            frame.width, frame.height
        )));
    }
    let row_bytes = r.width() as usize * 4;
    if row_bytes == 0 {
        return Ok(());
    }
    let stride = frame.width as usize * 4;
    for (row, src) in tile.as_bytes().chunks_exact(row_bytes).enumerate() {
        let start = (r.top as usize + row) * stride + r.left as usize * 4;
        frame.data[start..start + row_bytes].copy_from_slice(src);
    }
    Ok(())
}

fn build_thread_pool(threads: Option<usize>) -> BlendResult<rayon::ThreadPool> {
    if let Some(n) = threads
        && n == 0
    {
        return Err(BlendError::validation(
            "render threading 'threads' must be >= 1 when set",
        ));
    }

    let mut builder = rayon::ThreadPoolBuilder::new();
    if let Some(n) = threads {
        builder = builder.num_threads(n);
    }
    builder
        .build()
        .map_err(|e| BlendError::render(format!("failed to build rayon thread pool: {e}")))
}

#[cfg(test)]
#[path = "../../tests/unit/render/pipeline.rs"]
mod tests;
