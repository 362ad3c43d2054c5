//! Comparison kernel.
//!
//! CMP produces `a - b` so that the flag deriver can report it exactly like
//! SUB. Every predicate produces 1 or 0.

use core::cmp::Ordering;

use super::{Kernel, Operands};
use crate::opcode::op;
use crate::word::WideWord;

/// Comparison operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CompareOp {
    /// `a - b`
    Cmp,
    /// `a == b`
    Eq,
    /// `a != b`
    Ne,
    /// Signed `a < b`
    Lt,
    /// Signed `a <= b`
    Le,
    /// Signed `a > b`
    Gt,
    /// Signed `a >= b`
    Ge,
    /// Unsigned `a < b`
    Ltu,
    /// Unsigned `a <= b`
    Leu,
    /// Unsigned `a > b`
    Gtu,
    /// Unsigned `a >= b`
    Geu,
}

impl CompareOp {
    /// Decode an opcode from the comparison range.
    pub fn from_opcode(opcode: u8) -> Option<Self> {
        match opcode {
            op::CMP => Some(Self::Cmp),
            op::EQ => Some(Self::Eq),
            op::NE => Some(Self::Ne),
            op::LT => Some(Self::Lt),
            op::LE => Some(Self::Le),
            op::GT => Some(Self::Gt),
            op::GE => Some(Self::Ge),
            op::LTU => Some(Self::Ltu),
            op::LEU => Some(Self::Leu),
            op::GTU => Some(Self::Gtu),
            op::GEU => Some(Self::Geu),
            _ => None,
        }
    }

    /// Evaluate the predicate; `None` for CMP, which is not a predicate.
    pub fn holds<const L: usize>(self, a: &WideWord<L>, b: &WideWord<L>) -> Option<bool> {
        let signed = || a.cmp_signed(b);
        let unsigned = || a.cmp(b);
        let holds = match self {
            Self::Cmp => return None,
            Self::Eq => a == b,
            Self::Ne => a != b,
            Self::Lt => signed() == Ordering::Less,
            Self::Le => signed() != Ordering::Greater,
            Self::Gt => signed() == Ordering::Greater,
            Self::Ge => signed() != Ordering::Less,
            Self::Ltu => unsigned() == Ordering::Less,
            Self::Leu => unsigned() != Ordering::Greater,
            Self::Gtu => unsigned() == Ordering::Greater,
            Self::Geu => unsigned() != Ordering::Less,
        };
        Some(holds)
    }
}

/// Comparison kernel.
#[derive(Debug, Clone, Copy, Default)]
pub struct Comparison;

impl<const L: usize> Kernel<L> for Comparison {
    type Op = CompareOp;

    fn execute(&self, op: CompareOp, operands: &Operands<L>) -> WideWord<L> {
        let Operands { a, b, .. } = operands;
        match op.holds(a, b) {
            None => a.wrapping_sub(b),
            Some(true) => WideWord::ONE,
            Some(false) => WideWord::ZERO,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::word::Word512;

    fn run(op: CompareOp, a: Word512, b: Word512) -> u64 {
        Comparison.execute(op, &Operands::new(a, b)).low_u64()
    }

    #[test]
    fn test_signed_vs_unsigned() {
        let minus_one = Word512::MAX;
        let one = Word512::ONE;
        assert_eq!(run(CompareOp::Lt, minus_one, one), 1);
        assert_eq!(run(CompareOp::Ltu, minus_one, one), 0);
        assert_eq!(run(CompareOp::Gtu, minus_one, one), 1);
        assert_eq!(run(CompareOp::Gt, minus_one, one), 0);
    }

    #[test]
    fn test_equality_and_bounds() {
        let x = Word512::from_u64(9);
        assert_eq!(run(CompareOp::Eq, x, x), 1);
        assert_eq!(run(CompareOp::Ne, x, x), 0);
        assert_eq!(run(CompareOp::Le, x, x), 1);
        assert_eq!(run(CompareOp::Ge, x, x), 1);
        assert_eq!(run(CompareOp::Leu, x, x), 1);
        assert_eq!(run(CompareOp::Geu, x, x), 1);
        assert_eq!(run(CompareOp::Lt, x, x), 0);
    }

    #[test]
    fn test_cmp_is_difference() {
        let ops = Operands::new(Word512::from_u64(3), Word512::from_u64(5));
        assert_eq!(
            Comparison.execute(CompareOp::Cmp, &ops),
            Word512::from_u64(2).wrapping_neg()
        );
    }
}
