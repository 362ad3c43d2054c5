//! Two-component vector kernel.
//!
//! A word holds the vector `(x, y)` with `x` in the low N/2 bits and `y` in
//! the high N/2 bits. Sums and products wrap mod 2^N.

use super::{Kernel, Operands};
use crate::opcode::op;
use crate::word::WideWord;

/// Vector operations computed in-kernel. CROSS is an opaque slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum VectorOp {
    /// `x_a * x_b + y_a * y_b`
    Dot,
    /// `floor(sqrt(dot(a, a)))`
    Magnitude,
}

impl VectorOp {
    /// Decode DOT / MAG.
    pub fn from_opcode(opcode: u8) -> Option<Self> {
        match opcode {
            op::DOT => Some(Self::Dot),
            op::MAG => Some(Self::Magnitude),
            _ => None,
        }
    }
}

/// Vector kernel.
#[derive(Debug, Clone, Copy, Default)]
pub struct Vector;

impl Vector {
    /// Dot product of the two-component vectors packed in `a` and `b`.
    pub fn dot<const L: usize>(a: &WideWord<L>, b: &WideWord<L>) -> WideWord<L> {
        let xx = a.low_half().wrapping_mul(&b.low_half());
        let yy = a.high_half().wrapping_mul(&b.high_half());
        xx.wrapping_add(&yy)
    }
}

impl<const L: usize> Kernel<L> for Vector {
    type Op = VectorOp;

    fn execute(&self, op: VectorOp, operands: &Operands<L>) -> WideWord<L> {
        let Operands { a, b, .. } = operands;
        match op {
            VectorOp::Dot => Self::dot(a, b),
            VectorOp::Magnitude => Self::dot(a, a).isqrt(),
        }
    }
}
