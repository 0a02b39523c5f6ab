//! Per-channel arithmetic of the four fixed-function blend modes.
//!
//! Every channel value is a 5-bit hardware value expanded to 8 bits (bits 7..3).
//! In the notation of the hardware documentation:
//!
//! - `B`: value already in the frame buffer (destination)
//! - `F`: value being written (source)
//! - `N`: resulting value, saturated to the 5-bit range
//!
//! | mode | formula |
//! |---|---|
//! | average | `N = B/2 + F/2` |
//! | add | `N = B + F` |
//! | subtract | `N = B - F` |
//! | add quarter | `N = B + F/4` |
//!
//! plus [`inverted_subtract`], a subtract variant for sources ripped against white.

/// Bits of an 8-bit channel that exist in 5-bit hardware.
pub const FIVE_BIT_MASK: u8 = 0xF8;

/// Largest channel value representable in 5 bits, expanded to 8 bits.
pub const FIVE_BIT_MAX: u8 = 0xF8;

/// Saturate `v` to `[0, 255]`, then drop the bits 5-bit hardware does not have.
///
/// Clamping happens before masking so out-of-range intermediates never wrap.
#[inline]
pub fn clamp_truncate(v: i32) -> u8 {
    (v.clamp(0, 255) as u8) & FIVE_BIT_MASK
}

#[inline]
fn five_bit(v: u8) -> i32 {
    i32::from(v & FIVE_BIT_MASK)
}

/// `0.5 * B + 0.5 * F`, each operand halved before summing.
///
/// This must stay a single formula over the real `(B, F)` pair. Splitting it into
/// two passes (halving `F` against a black background first) truncates the
/// intermediate and loses a bit: `average(24, 136)` is 80, while the two-pass
/// route yields 72.
#[inline]
pub fn average(b: u8, f: u8) -> u8 {
    let (b, f) = (five_bit(b), five_bit(f));
    clamp_truncate((b >> 1) + (f >> 1))
}

/// `B + F`, saturating at the 5-bit maximum.
#[inline]
pub fn add(b: u8, f: u8) -> u8 {
    let (b, f) = (five_bit(b), five_bit(f));
    clamp_truncate(b + f)
}

/// `B - F`, saturating at zero.
#[inline]
pub fn subtract(b: u8, f: u8) -> u8 {
    let (b, f) = (five_bit(b), five_bit(f));
    clamp_truncate(b - f)
}

/// `B + F / 4`.
#[inline]
pub fn add_quarter(b: u8, f: u8) -> u8 {
    let (b, f) = (five_bit(b), five_bit(f));
    clamp_truncate(b + (f >> 2))
}

/// `B - (248 - F)`: subtract for a source ripped against a white background.
///
/// A ripped-on-white source stores the inverse of the value to subtract, so pure
/// white (248) subtracts nothing. Add and add-quarter sources can simply be
/// ripped against black; average has no such variant because it cannot be
/// split into two passes without losing precision (see [`average`]).
#[inline]
pub fn inverted_subtract(b: u8, f: u8) -> u8 {
    let (b, f) = (five_bit(b), five_bit(f));
    clamp_truncate(b - (i32::from(FIVE_BIT_MAX) - f))
}

#[cfg(test)]
#[path = "../../tests/unit/blend/channel.rs"]
mod tests;
