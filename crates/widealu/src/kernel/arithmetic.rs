//! Arithmetic kernel: add, sub, mul, div, mod.
//!
//! All results are reduced mod 2^N. Division is unsigned. A zero divisor
//! does not fault here: `divide` returns all-ones and `modulo` returns
//! all-zeros. The dispatcher applies its own divide-by-zero rule on top.

use super::{Kernel, Operands};
use crate::opcode::op;
use crate::word::WideWord;

/// Arithmetic operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ArithOp {
    /// `a + b mod 2^N`
    Add,
    /// `a - b mod 2^N`
    Sub,
    /// Low N bits of `a * b`
    Mul,
    /// `a / b` (unsigned)
    Div,
    /// `a % b` (unsigned)
    Mod,
}

impl ArithOp {
    /// Decode an opcode from the arithmetic range.
    pub fn from_opcode(opcode: u8) -> Option<Self> {
        match opcode {
            op::ADD => Some(Self::Add),
            op::SUB => Some(Self::Sub),
            op::MUL => Some(Self::Mul),
            op::DIV => Some(Self::Div),
            op::MOD => Some(Self::Mod),
            _ => None,
        }
    }
}

/// Wraparound integer arithmetic.
#[derive(Debug, Clone, Copy, Default)]
pub struct Arithmetic;

impl Arithmetic {
    /// Unsigned quotient; all-ones when `b` is zero.
    #[inline]
    pub fn divide<const L: usize>(a: &WideWord<L>, b: &WideWord<L>) -> WideWord<L> {
        a.div_rem(b).map_or(WideWord::MAX, |(q, _)| q)
    }

    /// Unsigned remainder; all-zeros when `b` is zero.
    #[inline]
    pub fn modulo<const L: usize>(a: &WideWord<L>, b: &WideWord<L>) -> WideWord<L> {
        a.div_rem(b).map_or(WideWord::ZERO, |(_, r)| r)
    }
}

impl<const L: usize> Kernel<L> for Arithmetic {
    type Op = ArithOp;

    fn execute(&self, op: ArithOp, operands: &Operands<L>) -> WideWord<L> {
        let Operands { a, b, .. } = operands;
        match op {
            ArithOp::Add => a.wrapping_add(b),
            ArithOp::Sub => a.wrapping_sub(b),
            ArithOp::Mul => a.wrapping_mul(b),
            ArithOp::Div => Self::divide(a, b),
            ArithOp::Mod => Self::modulo(a, b),
        }
    }
}
