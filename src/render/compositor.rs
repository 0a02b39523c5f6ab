use crate::blend::pixel::{blend_pixel, passes_alpha_gate};
use crate::document::snapshot::DocumentSnapshot;
use crate::foundation::core::Region;
use crate::foundation::error::{BlendError, BlendResult};
use crate::render::cancel::CancelToken;
use crate::surface::bitmap::{Bitmap, PixelSource};

/// Whether a region (or a whole render) ran to the end.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RenderStatus {
    /// Every layer pass finished.
    Completed,
    /// Stopped early on request. Pixels already written stay, the rest were never touched.
    Cancelled,
}

/// Result of compositing one output region.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[must_use]
pub struct RegionReport {
    /// Region that was rendered.
    pub region: Region,
    /// Completion state.
    pub status: RenderStatus,
    /// Source pixels blended into the output.
    pub pixels_blended: u64,
    /// Source pixels skipped by the alpha gate.
    pub pixels_gated: u64,
}

/// Composite the layers of `snapshot` into `tile`.
///
/// `tile` owns exactly the output region being rendered; nothing outside its
/// bounds is written, and each layer is only read inside its own bounds. Layers
/// are drawn bottom to top, stopping below the active layer, and every layer
/// uses its single resolved opcode for all of its pixels.
pub fn render_region(
    snapshot: &DocumentSnapshot,
    tile: &mut Bitmap,
    cancel: &CancelToken,
) -> BlendResult<RegionReport> {
    let region = tile.bounds();
    let canvas = snapshot.canvas().bounds();
    if region.intersect(canvas) != region {
        return Err(BlendError::render(format!(
            "output region {region:?} lies outside canvas {canvas:?}"
        )));
    }

    let mut report = RegionReport {
        region,
        status: RenderStatus::Completed,
        pixels_blended: 0,
        pixels_gated: 0,
    };
    if cancel.is_cancelled() {
        report.status = RenderStatus::Cancelled;
        return Ok(report);
    }

    for layer in snapshot.composited_layers() {
        let source = layer.source();
        let area = region.intersect(source.bounds());
        if area.is_empty() {
            continue;
        }
        let op = layer.opcode();
        tracing::trace!(layer = layer.name(), %op, ?area, "blend layer into region");

        for y in area.top..area.bottom {
            if cancel.is_cancelled() {
                report.status = RenderStatus::Cancelled;
                return Ok(report);
            }
            for x in area.left..area.right {
                let Some(src) = source.pixel(x, y) else {
                    continue;
                };
                if !passes_alpha_gate(src) {
                    report.pixels_gated += 1;
                    continue;
                }
                let Some(dst) = tile.pixel(x, y) else {
                    continue;
                };
                tile.set(x, y, blend_pixel(op, dst, src));
                report.pixels_blended += 1;
            }
        }
    }
    Ok(report)
}

/// Render `region` into a new tile that starts out as the snapshot background.
pub fn render_tile(
    snapshot: &DocumentSnapshot,
    region: Region,
    cancel: &CancelToken,
) -> BlendResult<(Bitmap, RegionReport)> {
    let mut tile = Bitmap::filled(region, snapshot.background())?;
    let report = render_region(snapshot, &mut tile, cancel)?;
    Ok((tile, report))
}

#[cfg(test)]
#[path = "../../tests/unit/render/compositor.rs"]
mod tests;
