//! Operating modes.
//!
//! The mode selects which kernel family interprets an opcode and, for SIMD
//! modes, at what lane width.
//!
//! | Code | Mode |
//! |------|------|
//! | 0x00 | Normal |
//! | 0x01 | Saturate |
//! | 0x02 | BCD |
//! | 0x03 | Float |
//! | 0x04 | Vector |
//! | 0x05 | Crypto |
//! | 0x10–0x17 | SIMD, lanes of `8 << (code - 0x10)` bits |
//!
//! A SIMD code is only valid when its lane is at most half the unit width.

use core::fmt;

use serde::{Deserialize, Serialize};

use crate::constants::{MIN_LANE_BITS, SIMD_MODE_BASE, SIMD_MODE_COUNT};

/// Mode codes.
pub mod code {
    /// Integer kernels with wraparound.
    pub const NORMAL: u8 = 0x00;
    /// Saturating add / sub / mul.
    pub const SATURATE: u8 = 0x01;
    /// Packed-decimal add / sub.
    pub const BCD: u8 = 0x02;
    /// Floating-point extension slots.
    pub const FLOAT: u8 = 0x03;
    /// Two-component vector kernel.
    pub const VECTOR: u8 = 0x04;
    /// Cryptographic extension slots.
    pub const CRYPTO: u8 = 0x05;
    /// 8-bit lanes.
    pub const SIMD8: u8 = 0x10;
    /// 16-bit lanes.
    pub const SIMD16: u8 = 0x11;
    /// 32-bit lanes.
    pub const SIMD32: u8 = 0x12;
    /// 64-bit lanes.
    pub const SIMD64: u8 = 0x13;
    /// 128-bit lanes.
    pub const SIMD128: u8 = 0x14;
    /// 256-bit lanes.
    pub const SIMD256: u8 = 0x15;
    /// 512-bit lanes (2048-bit unit only).
    pub const SIMD512: u8 = 0x16;
    /// 1024-bit lanes (2048-bit unit only).
    pub const SIMD1024: u8 = 0x17;
}

/// A decoded mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Mode {
    /// Integer kernels with wraparound.
    Normal,
    /// Saturating add / sub / mul.
    Saturate,
    /// Packed-decimal add / sub.
    Bcd,
    /// Floating-point extension slots.
    Float,
    /// Two-component vector kernel.
    Vector,
    /// Cryptographic extension slots.
    Crypto,
    /// Lane-partitioned arithmetic.
    Simd {
        /// Lane width in bits.
        lane_bits: u32,
    },
}

impl Mode {
    /// Decode `code` for a unit of `unit_bits`. `None` means the mode is not
    /// recognized by that unit.
    pub fn decode(code: u8, unit_bits: u32) -> Option<Self> {
        match code {
            code::NORMAL => Some(Self::Normal),
            code::SATURATE => Some(Self::Saturate),
            code::BCD => Some(Self::Bcd),
            code::FLOAT => Some(Self::Float),
            code::VECTOR => Some(Self::Vector),
            code::CRYPTO => Some(Self::Crypto),
            c if (SIMD_MODE_BASE..SIMD_MODE_BASE + SIMD_MODE_COUNT).contains(&c) => {
                let lane_bits = MIN_LANE_BITS << (c - SIMD_MODE_BASE);
                (lane_bits <= unit_bits / 2).then_some(Self::Simd { lane_bits })
            }
            _ => None,
        }
    }

    /// The code this mode decodes from.
    pub fn code(self) -> u8 {
        match self {
            Self::Normal => code::NORMAL,
            Self::Saturate => code::SATURATE,
            Self::Bcd => code::BCD,
            Self::Float => code::FLOAT,
            Self::Vector => code::VECTOR,
            Self::Crypto => code::CRYPTO,
            Self::Simd { lane_bits } => {
                SIMD_MODE_BASE + (lane_bits / MIN_LANE_BITS).trailing_zeros() as u8
            }
        }
    }

    /// True for any SIMD lane mode.
    #[inline]
    pub fn is_simd(self) -> bool {
        matches!(self, Self::Simd { .. })
    }

    /// Parse a mode name (`normal`, `saturate`, `bcd`, `float`, `vector`,
    /// `crypto`, `simd<w>`) into its code. Case-insensitive.
    pub fn code_from_name(name: &str) -> Option<u8> {
        let lower = name.to_ascii_lowercase();
        match lower.as_str() {
            "normal" => Some(code::NORMAL),
            "saturate" | "sat" => Some(code::SATURATE),
            "bcd" => Some(code::BCD),
            "float" => Some(code::FLOAT),
            "vector" => Some(code::VECTOR),
            "crypto" => Some(code::CRYPTO),
            _ => {
                let width: u32 = lower.strip_prefix("simd")?.parse().ok()?;
                if width < MIN_LANE_BITS || !width.is_power_of_two() {
                    return None;
                }
                let index = (width / MIN_LANE_BITS).trailing_zeros();
                (index < SIMD_MODE_COUNT as u32).then(|| SIMD_MODE_BASE + index as u8)
            }
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Normal => write!(f, "normal"),
            Self::Saturate => write!(f, "saturate"),
            Self::Bcd => write!(f, "bcd"),
            Self::Float => write!(f, "float"),
            Self::Vector => write!(f, "vector"),
            Self::Crypto => write!(f, "crypto"),
            Self::Simd { lane_bits } => write!(f, "simd{}", lane_bits),
        }
    }
}
