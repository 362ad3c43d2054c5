//! Computation kernels.
//!
//! One pure unit per operation category. Every kernel implements [`Kernel`]:
//! it receives an already-decoded operation and the operands, and returns
//! exactly one N-bit word. Kernels never fail, never log and hold no state
//! between calls, so the dispatcher can call them in any order.
//!
//! | Kernel | Ops |
//! |--------|-----|
//! | [`Arithmetic`] | add, sub, mul, div, mod |
//! | [`Advanced`] | inc, dec, neg, abs, min, max, sqrt, pow, gcd, lcm |
//! | [`Logical`] | and, or, xor, not, nand, nor, xnor |
//! | [`ShiftRotate`] | sll, srl, sra, rol, ror |
//! | [`BitManipulation`] | set/clear/toggle/test bit, counts, find-first, reverse, swap, parity |
//! | [`Comparison`] | cmp and signed / unsigned predicates |
//! | [`DataMovement`] | mov, movb, clr, fill, swap halves |
//! | [`Saturating`] | clamped add, sub, mul |
//! | [`SimdLanes`] | lane-wise add, sub, mul |
//! | [`Vector`] | dot product, magnitude |
//! | [`Bcd`] | packed-decimal add, sub |
//! | [`OpaqueSlots`] | float / crypto / cross extension points |
//!
//! # Usage
//!
//! ```
//! use widealu::kernel::{Arithmetic, ArithOp, Kernel, Operands};
//! use widealu::word::Word512;
//!
//! let ops = Operands::new(Word512::from_u64(40), Word512::from_u64(2));
//! assert_eq!(Arithmetic.execute(ArithOp::Add, &ops), Word512::from_u64(42));
//! ```

pub mod advanced;
pub mod arithmetic;
pub mod bcd;
pub mod bitmanip;
pub mod compare;
pub mod logical;
pub mod movement;
pub mod opaque;
pub mod saturating;
pub mod shift;
pub mod simd;
pub mod vector;

pub use advanced::{Advanced, AdvancedOp};
pub use arithmetic::{ArithOp, Arithmetic};
pub use bcd::{Bcd, BcdOp};
pub use bitmanip::{BitManipulation, BitOp};
pub use compare::{CompareOp, Comparison};
pub use logical::{LogicOp, Logical};
pub use movement::{DataMovement, MoveOp};
pub use opaque::{OpaqueKernel, OpaqueSlots, StandIn};
pub use saturating::{SatOp, Saturating};
pub use shift::{ShiftOp, ShiftRotate};
pub use simd::{SimdLanes, SimdOp};
pub use vector::{Vector, VectorOp};

use crate::word::WideWord;

/// Inputs to one kernel call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Operands<const L: usize> {
    /// First operand.
    pub a: WideWord<L>,
    /// Second operand.
    pub b: WideWord<L>,
    /// Resolved shift / rotate amount.
    pub shift: u32,
}

impl<const L: usize> Operands<L> {
    /// Operands with a zero shift amount.
    #[inline]
    pub fn new(a: WideWord<L>, b: WideWord<L>) -> Self {
        Self { a, b, shift: 0 }
    }

    /// Operands with an explicit shift amount.
    #[inline]
    pub fn with_shift(a: WideWord<L>, b: WideWord<L>, shift: u32) -> Self {
        Self { a, b, shift }
    }
}

/// A pure computation unit for one operation category.
///
/// Implementations must be total: every `Op` value produces an N-bit result
/// for every input.
pub trait Kernel<const L: usize> {
    /// Decoded operation within this kernel's category.
    type Op: Copy;

    /// Compute the result of `op`.
    fn execute(&self, op: Self::Op, operands: &Operands<L>) -> WideWord<L>;
}
