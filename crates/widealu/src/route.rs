//! Mode × opcode decoding.
//!
//! A [`Route`] names the kernel, and the operation within it, that a
//! recognized (mode, opcode) pair selects. Pairs that no kernel accepts
//! decode to `None` and surface as `unsupported_operation`.
//!
//! | Mode | Accepted |
//! |------|----------|
//! | Normal | Arithmetic, Logical, ShiftRotate, BitManipulation, Comparison, DataMovement, Advanced |
//! | Saturate | ADD, SUB, MUL |
//! | BCD | ADD, SUB |
//! | SIMD | ADD, SUB, MUL, VADD, VSUB, VMUL |
//! | Vector | DOT, MAG, CROSS (opaque) |
//! | Float | Float slots (opaque) |
//! | Crypto | Crypto slots (opaque) |

use crate::kernel::{
    AdvancedOp, ArithOp, BcdOp, BitOp, CompareOp, LogicOp, MoveOp, SatOp, ShiftOp, SimdOp,
    VectorOp,
};
use crate::mode::Mode;
use crate::opcode::{category_of, op, Category};

/// A decoded (mode, opcode) pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Route {
    /// Normal-mode arithmetic.
    Arithmetic(ArithOp),
    /// Normal-mode logic.
    Logical(LogicOp),
    /// Normal-mode shifts and rotations.
    Shift(ShiftOp),
    /// Normal-mode bit manipulation.
    Bits(BitOp),
    /// Normal-mode comparisons.
    Compare(CompareOp),
    /// Normal-mode data movement.
    Move(MoveOp),
    /// Normal-mode advanced arithmetic.
    Advanced(AdvancedOp),
    /// Saturate-mode arithmetic.
    Saturating(SatOp),
    /// BCD-mode arithmetic.
    Bcd(BcdOp),
    /// Lane-wise arithmetic.
    Simd {
        /// Lane operation.
        op: SimdOp,
        /// Lane width in bits.
        lane_bits: u32,
    },
    /// Vector-mode DOT / MAG.
    Vector(VectorOp),
    /// An opaque slot, by opcode.
    Opaque(u8),
}

impl Route {
    /// Decode `opcode` under `mode`.
    pub fn decode(mode: Mode, opcode: u8) -> Option<Self> {
        match mode {
            Mode::Normal => Self::decode_normal(opcode),
            Mode::Saturate => SatOp::from_opcode(opcode).map(Self::Saturating),
            Mode::Bcd => BcdOp::from_opcode(opcode).map(Self::Bcd),
            Mode::Simd { lane_bits } => {
                SimdOp::from_opcode(opcode).map(|op| Self::Simd { op, lane_bits })
            }
            Mode::Vector => match opcode {
                op::CROSS => Some(Self::Opaque(opcode)),
                _ => VectorOp::from_opcode(opcode).map(Self::Vector),
            },
            Mode::Float => (category_of(opcode) == Category::Float).then_some(Self::Opaque(opcode)),
            Mode::Crypto => {
                (category_of(opcode) == Category::Crypto).then_some(Self::Opaque(opcode))
            }
        }
    }

    fn decode_normal(opcode: u8) -> Option<Self> {
        match category_of(opcode) {
            Category::Arithmetic => ArithOp::from_opcode(opcode).map(Self::Arithmetic),
            Category::Logical => LogicOp::from_opcode(opcode).map(Self::Logical),
            Category::ShiftRotate => ShiftOp::from_opcode(opcode).map(Self::Shift),
            Category::BitManipulation => BitOp::from_opcode(opcode).map(Self::Bits),
            Category::Comparison => CompareOp::from_opcode(opcode).map(Self::Compare),
            Category::DataMovement => MoveOp::from_opcode(opcode).map(Self::Move),
            Category::Advanced => AdvancedOp::from_opcode(opcode).map(Self::Advanced),
            _ => None,
        }
    }

    /// True for routes whose carry and overflow follow addition of `a` and
    /// the effective `b` (ADD, INC, VADD and their saturating form).
    pub fn is_add_like(self) -> bool {
        matches!(
            self,
            Self::Arithmetic(ArithOp::Add)
                | Self::Advanced(AdvancedOp::Inc)
                | Self::Saturating(SatOp::Add)
                | Self::Simd { op: SimdOp::Add, .. }
        )
    }

    /// True for routes whose carry and overflow follow subtraction (SUB,
    /// CMP, DEC, VSUB and the saturating SUB).
    pub fn is_sub_like(self) -> bool {
        matches!(
            self,
            Self::Arithmetic(ArithOp::Sub)
                | Self::Compare(CompareOp::Cmp)
                | Self::Advanced(AdvancedOp::Dec)
                | Self::Saturating(SatOp::Sub)
                | Self::Simd { op: SimdOp::Sub, .. }
        )
    }

    /// True when the second operand is implicitly 1 (INC / DEC).
    pub fn has_unit_operand(self) -> bool {
        matches!(
            self,
            Self::Advanced(AdvancedOp::Inc) | Self::Advanced(AdvancedOp::Dec)
        )
    }
}
