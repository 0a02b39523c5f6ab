use crate::blend::opcode::Opcode;
use crate::foundation::core::Rgba8;

/// Source pixels with alpha below this value are not drawn at all.
///
/// Blending is all-or-nothing per pixel; there is no partial coverage.
pub const ALPHA_THRESHOLD: u8 = 128;

/// Return `true` when a source pixel is opaque enough to be blended.
#[inline]
pub fn passes_alpha_gate(src: Rgba8) -> bool {
    src.a >= ALPHA_THRESHOLD
}

/// Blend `src` onto `dst` with `op`.
///
/// Color channels are combined independently; the result is always fully
/// opaque so blended pixels never read back as partially transparent. The
/// alpha gate is the caller's responsibility (see [`passes_alpha_gate`]).
#[inline]
pub fn blend_pixel(op: Opcode, dst: Rgba8, src: Rgba8) -> Rgba8 {
    let out = match op.channel_fn() {
        None => src,
        Some(f) => map_channels(dst, src, f),
    };
    out.with_alpha(255)
}

/// Apply `f(dst_channel, src_channel)` to red, green and blue. Keeps `dst` alpha.
#[inline]
pub fn map_channels(dst: Rgba8, src: Rgba8, f: impl Fn(u8, u8) -> u8) -> Rgba8 {
    Rgba8 {
        r: f(dst.r, src.r),
        g: f(dst.g, src.g),
        b: f(dst.b, src.b),
        a: dst.a,
    }
}

#[cfg(test)]
#[path = "../../tests/unit/blend/pixel.rs"]
mod tests;
