//! Saturating kernel: unsigned add, sub and mul that clamp to `[0, 2^N - 1]`.
//!
//! Each helper returns the clamped value together with a flag telling
//! whether clamping happened; the flag deriver reports that as overflow.

use super::{Kernel, Operands};
use crate::opcode::op;
use crate::word::WideWord;

/// Saturating operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SatOp {
    /// Clamp to all-ones on carry-out.
    Add,
    /// Clamp to zero on borrow.
    Sub,
    /// Clamp to all-ones when the high product half is nonzero.
    Mul,
}

impl SatOp {
    /// Decode ADD / SUB / MUL; every other opcode is unsupported here.
    pub fn from_opcode(opcode: u8) -> Option<Self> {
        match opcode {
            op::ADD => Some(Self::Add),
            op::SUB => Some(Self::Sub),
            op::MUL => Some(Self::Mul),
            _ => None,
        }
    }
}

/// Clamping arithmetic.
#[derive(Debug, Clone, Copy, Default)]
pub struct Saturating;

impl Saturating {
    /// `(min(a + b, 2^N - 1), clamped)`.
    #[inline]
    pub fn add<const L: usize>(a: &WideWord<L>, b: &WideWord<L>) -> (WideWord<L>, bool) {
        match a.overflowing_add(b) {
            (_, true) => (WideWord::MAX, true),
            (sum, false) => (sum, false),
        }
    }

    /// `(max(a - b, 0), clamped)`.
    #[inline]
    pub fn sub<const L: usize>(a: &WideWord<L>, b: &WideWord<L>) -> (WideWord<L>, bool) {
        match a.overflowing_sub(b) {
            (_, true) => (WideWord::ZERO, true),
            (diff, false) => (diff, false),
        }
    }

    /// `(min(a * b, 2^N - 1), clamped)`.
    #[inline]
    pub fn mul<const L: usize>(a: &WideWord<L>, b: &WideWord<L>) -> (WideWord<L>, bool) {
        let (low, high) = a.widening_mul(b);
        if high.is_zero() {
            (low, false)
        } else {
            (WideWord::MAX, true)
        }
    }

    /// Apply `op` and report whether the result was clamped.
    pub fn apply<const L: usize>(
        op: SatOp,
        a: &WideWord<L>,
        b: &WideWord<L>,
    ) -> (WideWord<L>, bool) {
        match op {
            SatOp::Add => Self::add(a, b),
            SatOp::Sub => Self::sub(a, b),
            SatOp::Mul => Self::mul(a, b),
        }
    }
}

impl<const L: usize> Kernel<L> for Saturating {
    type Op = SatOp;

    #[inline]
    fn execute(&self, op: SatOp, operands: &Operands<L>) -> WideWord<L> {
        Self::apply(op, &operands.a, &operands.b).0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::word::{Word2048, Word512};

    #[test]
    fn test_add_clamps_on_carry() {
        let (v, clamped) = Saturating::add(&Word512::MAX, &Word512::ONE);
        assert_eq!(v, Word512::MAX);
        assert!(clamped);
        let (v, clamped) = Saturating::add(&Word512::from_u64(2), &Word512::from_u64(3));
        assert_eq!(v, Word512::from_u64(5));
        assert!(!clamped);
        // Exactly all-ones without a carry is not a clamp.
        let (v, clamped) = Saturating::add(&Word512::MAX, &Word512::ZERO);
        assert_eq!(v, Word512::MAX);
        assert!(!clamped);
    }

    #[test]
    fn test_sub_clamps_at_zero() {
        let (v, clamped) = Saturating::sub(&Word512::from_u64(3), &Word512::from_u64(5));
        assert!(v.is_zero());
        assert!(clamped);
        let (v, clamped) = Saturating::sub(&Word512::from_u64(5), &Word512::from_u64(5));
        assert!(v.is_zero());
        assert!(!clamped);
    }

    #[test]
    fn test_mul_clamps_on_high_half() {
        let big = Word2048::ONE.shift_left(1024);
        let (v, clamped) = Saturating::mul(&big, &big);
        assert_eq!(v, Word2048::MAX);
        assert!(clamped);
        let (v, clamped) = Saturating::mul(&big, &Word2048::from_u64(4));
        assert_eq!(v, Word2048::ONE.shift_left(1026));
        assert!(!clamped);
    }

    #[test]
    fn test_decode_rejects_div() {
        assert_eq!(SatOp::from_opcode(op::DIV), None);
        assert_eq!(SatOp::from_opcode(op::MUL), Some(SatOp::Mul));
    }
}
