//! Packed BCD kernel.
//!
//! The word is N/4 decimal digits, one per nibble, digit 0 in the low
//! nibble. Add and sub walk the digits from 0 upward with a decimal carry
//! or borrow. Nibbles above 9 are not rejected; they take part in the same
//! correction so the kernel stays total.

use super::{Kernel, Operands};
use crate::opcode::op;
use crate::word::{WideWord, LIMB_BITS};

const DIGITS_PER_LIMB: u32 = LIMB_BITS / 4;

/// Decimal operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BcdOp {
    /// Digit-wise add with +6 correction.
    Add,
    /// Digit-wise subtract with +10 compensation.
    Sub,
}

impl BcdOp {
    /// Decode ADD / SUB.
    pub fn from_opcode(opcode: u8) -> Option<Self> {
        match opcode {
            op::ADD => Some(Self::Add),
            op::SUB => Some(Self::Sub),
            _ => None,
        }
    }
}

/// Packed-decimal kernel.
#[derive(Debug, Clone, Copy, Default)]
pub struct Bcd;

impl Bcd {
    /// Decimal sum and the carry out of the top digit.
    pub fn add<const L: usize>(a: &WideWord<L>, b: &WideWord<L>) -> (WideWord<L>, bool) {
        let (x, y) = (a.limbs(), b.limbs());
        let mut out = [0u64; L];
        let mut carry = 0u64;
        for (i, slot) in out.iter_mut().enumerate() {
            for d in 0..DIGITS_PER_LIMB {
                let shift = d * 4;
                let sum = ((x[i] >> shift) & 0xF) + ((y[i] >> shift) & 0xF) + carry;
                let digit = if sum > 9 {
                    carry = 1;
                    (sum + 6) & 0xF
                } else {
                    carry = 0;
                    sum
                };
                *slot |= digit << shift;
            }
        }
        (WideWord::from_limbs(out), carry == 1)
    }

    /// Decimal difference and the borrow out of the top digit.
    pub fn sub<const L: usize>(a: &WideWord<L>, b: &WideWord<L>) -> (WideWord<L>, bool) {
        let (x, y) = (a.limbs(), b.limbs());
        let mut out = [0u64; L];
        let mut borrow = 0i64;
        for (i, slot) in out.iter_mut().enumerate() {
            for d in 0..DIGITS_PER_LIMB {
                let shift = d * 4;
                let mut diff =
                    ((x[i] >> shift) & 0xF) as i64 - ((y[i] >> shift) & 0xF) as i64 - borrow;
                if diff < 0 {
                    diff += 10;
                    borrow = 1;
                } else {
                    borrow = 0;
                }
                *slot |= ((diff as u64) & 0xF) << shift;
            }
        }
        (WideWord::from_limbs(out), borrow == 1)
    }

    /// Apply `op` and report the decimal carry (ADD) or borrow (SUB) out of
    /// the top digit.
    pub fn apply<const L: usize>(
        op: BcdOp,
        a: &WideWord<L>,
        b: &WideWord<L>,
    ) -> (WideWord<L>, bool) {
        match op {
            BcdOp::Add => Self::add(a, b),
            BcdOp::Sub => Self::sub(a, b),
        }
    }
}

impl<const L: usize> Kernel<L> for Bcd {
    type Op = BcdOp;

    fn execute(&self, op: BcdOp, operands: &Operands<L>) -> WideWord<L> {
        Self::apply(op, &operands.a, &operands.b).0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::word::{Word2048, Word512};

    fn w(v: u64) -> Word512 {
        Word512::from_u64(v)
    }

    #[test]
    fn test_add_with_carry_chain() {
        assert_eq!(Bcd::add(&w(0x0019), &w(0x0001)).0, w(0x0020));
        assert_eq!(Bcd::add(&w(0x0999), &w(0x0001)).0, w(0x1000));
        assert_eq!(Bcd::add(&w(0x45), &w(0x38)).0, w(0x83));
    }

    #[test]
    fn test_carry_crosses_limbs() {
        // 16 nines in limb 0 plus one carries into limb 1.
        let nines = w(0x9999_9999_9999_9999);
        let (sum, carry) = Bcd::add(&nines, &w(1));
        assert_eq!(sum, Word512::ONE.shift_left(64));
        assert!(!carry);
    }

    #[test]
    fn test_add_carry_out_of_top_digit() {
        let all_nines = Word2048::from_le_bytes(&[0x99u8; 256]);
        let (sum, carry) = Bcd::add(&all_nines, &Word2048::ONE);
        assert!(sum.is_zero());
        assert!(carry);
    }

    #[test]
    fn test_sub_with_borrow() {
        assert_eq!(Bcd::sub(&w(0x0020), &w(0x0001)).0, w(0x0019));
        assert_eq!(Bcd::sub(&w(0x1000), &w(0x0001)).0, w(0x0999));
        let (diff, borrow) = Bcd::sub(&w(0), &w(1));
        assert!(borrow);
        assert_eq!(diff, Word512::from_le_bytes(&[0x99u8; 64]));
    }

    #[test]
    fn test_apply_reports_carry_and_borrow() {
        let all_nines = Word512::from_le_bytes(&[0x99u8; 64]);
        let carried = Bcd::apply(BcdOp::Add, &all_nines, &w(1));
        assert_eq!(carried, (Word512::ZERO, true));
        assert_eq!(Bcd::apply(BcdOp::Add, &w(0x45), &w(0x38)), (w(0x83), false));
        assert_eq!(Bcd::apply(BcdOp::Sub, &w(0), &w(1)), (all_nines, true));
        let ops = Operands::new(all_nines, w(1));
        assert!(Bcd.execute(BcdOp::Add, &ops).is_zero());
    }
}
