//! Bit manipulation kernel.
//!
//! Single-bit operations take the bit index from operand `b`. An index at or
//! beyond N leaves `a` unchanged (and tests false). Counts and positions are
//! returned as small integers in the low limb.

use super::{Kernel, Operands};
use crate::opcode::op;
use crate::word::WideWord;

/// Bit manipulation operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BitOp {
    /// Set bit `b` of `a`.
    Set,
    /// Clear bit `b` of `a`.
    Clear,
    /// Toggle bit `b` of `a`.
    Toggle,
    /// 1 if bit `b` of `a` is set, else 0.
    Test,
    /// Number of one bits.
    PopCount,
    /// Number of zero bits.
    ZeroCount,
    /// Index of the lowest one bit, N if none.
    FindFirstOne,
    /// Index of the lowest zero bit, N if none.
    FindFirstZero,
    /// Bit reversal.
    Reverse,
    /// Byte reversal.
    ByteSwap,
    /// Passes `a` through; the parity is reported as a flag.
    Parity,
}

impl BitOp {
    /// Decode an opcode from the bit manipulation range.
    pub fn from_opcode(opcode: u8) -> Option<Self> {
        match opcode {
            op::SETB => Some(Self::Set),
            op::CLRB => Some(Self::Clear),
            op::TGLB => Some(Self::Toggle),
            op::TSTB => Some(Self::Test),
            op::POPCNT => Some(Self::PopCount),
            op::ZEROCNT => Some(Self::ZeroCount),
            op::FFO => Some(Self::FindFirstOne),
            op::FFZ => Some(Self::FindFirstZero),
            op::BREV => Some(Self::Reverse),
            op::BSWAP => Some(Self::ByteSwap),
            op::PARITY => Some(Self::Parity),
            _ => None,
        }
    }
}

/// Bit manipulation kernel.
#[derive(Debug, Clone, Copy, Default)]
pub struct BitManipulation;

impl BitManipulation {
    /// The bit index named by `b`, or `None` when it is outside the word.
    #[inline]
    pub fn bit_index<const L: usize>(b: &WideWord<L>) -> Option<u32> {
        b.to_u64()
            .filter(|&index| index < u64::from(WideWord::<L>::BITS))
            .map(|index| index as u32)
    }

    /// Whether bit `b` of `a` is set.
    #[inline]
    pub fn test<const L: usize>(a: &WideWord<L>, b: &WideWord<L>) -> bool {
        Self::bit_index(b).is_some_and(|index| a.bit(index))
    }

    /// XOR of every bit of `a` (true when the count of ones is odd).
    #[inline]
    pub fn parity<const L: usize>(a: &WideWord<L>) -> bool {
        a.count_ones() % 2 == 1
    }

    fn with_bit<const L: usize>(
        a: &WideWord<L>,
        b: &WideWord<L>,
        f: impl FnOnce(bool) -> bool,
    ) -> WideWord<L> {
        match Self::bit_index(b) {
            Some(index) => a.with_bit(index, f(a.bit(index))),
            None => *a,
        }
    }
}

impl<const L: usize> Kernel<L> for BitManipulation {
    type Op = BitOp;

    fn execute(&self, op: BitOp, operands: &Operands<L>) -> WideWord<L> {
        let Operands { a, b, .. } = operands;
        let bits = WideWord::<L>::BITS;
        match op {
            BitOp::Set => Self::with_bit(a, b, |_| true),
            BitOp::Clear => Self::with_bit(a, b, |_| false),
            BitOp::Toggle => Self::with_bit(a, b, |bit| !bit),
            BitOp::Test => WideWord::from_u64(u64::from(Self::test(a, b))),
            BitOp::PopCount => WideWord::from_u64(u64::from(a.count_ones())),
            BitOp::ZeroCount => WideWord::from_u64(u64::from(bits - a.count_ones())),
            BitOp::FindFirstOne => WideWord::from_u64(u64::from(a.trailing_zeros())),
            BitOp::FindFirstZero => WideWord::from_u64(u64::from((!*a).trailing_zeros())),
            BitOp::Reverse => a.reverse_bits(),
            BitOp::ByteSwap => a.swap_bytes(),
            BitOp::Parity => *a,
        }
    }
}
