//! Unit-wide constants.
//!
//! Pure configuration data: widths, lane sets and pipeline defaults. Nothing
//! here is mutable state.

/// Width of the narrow unit instantiation.
pub const UNIT_BITS_512: u32 = 512;

/// Width of the wide unit instantiation.
pub const UNIT_BITS_2048: u32 = 2048;

/// Supported unit widths.
pub const UNIT_WIDTHS: [u32; 2] = [UNIT_BITS_512, UNIT_BITS_2048];

/// Narrowest SIMD lane.
pub const MIN_LANE_BITS: u32 = 8;

/// Mode code of the 8-bit lane mode; lane `w` is at `SIMD_MODE_BASE + log2(w / 8)`.
pub const SIMD_MODE_BASE: u8 = 0x10;

/// Number of SIMD mode codes (8-bit through 1024-bit lanes).
pub const SIMD_MODE_COUNT: u8 = 8;

/// Lane widths of the 2048-bit unit, widest first.
pub const LANE_WIDTHS_2048: [u32; 8] = [1024, 512, 256, 128, 64, 32, 16, 8];

/// Lane widths of the 512-bit unit, widest first.
pub const LANE_WIDTHS_512: [u32; 6] = [256, 128, 64, 32, 16, 8];

/// Default pipeline depth (stages between admission and visibility).
pub const DEFAULT_PIPELINE_LATENCY: usize = 3;

/// Width of the dedicated shift-amount field on the 2048-bit unit.
pub const SHIFT_FIELD_BITS_2048: u32 = 11;

/// Width of the shift amount taken from operand `b` on the 512-bit unit.
pub const SHIFT_OPERAND_BITS_512: u32 = 9;

/// Number of flag bits in a packed [`FlagSet`](crate::flags::FlagSet).
pub const FLAG_COUNT: usize = 21;

/// Lane widths valid for a unit of `unit_bits`: every power of two from
/// [`MIN_LANE_BITS`] up to half the unit.
pub fn lane_widths(unit_bits: u32) -> impl Iterator<Item = u32> {
    (0..SIMD_MODE_COUNT as u32)
        .map(|i| MIN_LANE_BITS << i)
        .filter(move |&w| w <= unit_bits / 2)
        .rev()
}
