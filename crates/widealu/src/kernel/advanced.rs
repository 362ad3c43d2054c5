//! Advanced arithmetic: inc, dec, neg, abs, min, max, sqrt, pow, gcd, lcm.
//!
//! INC and DEC wrap at 2^N like ADD and SUB with an implicit `b = 1`.
//! MIN / MAX / ABS use the signed view. SQRT, POW, GCD and LCM are unsigned
//! and reduce mod 2^N.

use core::cmp::Ordering;

use super::{Kernel, Operands};
use crate::opcode::op;
use crate::word::WideWord;

/// Advanced operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AdvancedOp {
    /// `a + 1`
    Inc,
    /// `a - 1`
    Dec,
    /// `-a`
    Neg,
    /// `|a|` (signed)
    Abs,
    /// Signed minimum
    Min,
    /// Signed maximum
    Max,
    /// `floor(sqrt(a))`
    Sqrt,
    /// `a^b mod 2^N`
    Pow,
    /// `gcd(a, b)`
    Gcd,
    /// `lcm(a, b) mod 2^N`
    Lcm,
}

impl AdvancedOp {
    /// Decode an opcode from the advanced range.
    pub fn from_opcode(opcode: u8) -> Option<Self> {
        match opcode {
            op::INC => Some(Self::Inc),
            op::DEC => Some(Self::Dec),
            op::NEG => Some(Self::Neg),
            op::ABS => Some(Self::Abs),
            op::MIN => Some(Self::Min),
            op::MAX => Some(Self::Max),
            op::SQRT => Some(Self::Sqrt),
            op::POW => Some(Self::Pow),
            op::GCD => Some(Self::Gcd),
            op::LCM => Some(Self::Lcm),
            _ => None,
        }
    }
}

/// Advanced arithmetic kernel.
#[derive(Debug, Clone, Copy, Default)]
pub struct Advanced;

impl Advanced {
    /// `a + 1`, wrapping.
    #[inline]
    pub fn inc<const L: usize>(a: &WideWord<L>) -> WideWord<L> {
        a.wrapping_add(&WideWord::ONE)
    }

    /// `a - 1`, wrapping.
    #[inline]
    pub fn dec<const L: usize>(a: &WideWord<L>) -> WideWord<L> {
        a.wrapping_sub(&WideWord::ONE)
    }

    /// Negation when the signed view is negative, else `a`.
    #[inline]
    pub fn abs<const L: usize>(a: &WideWord<L>) -> WideWord<L> {
        if a.is_negative() {
            a.wrapping_neg()
        } else {
            *a
        }
    }

    /// Signed minimum; returns `b` on a tie.
    #[inline]
    pub fn min<const L: usize>(a: &WideWord<L>, b: &WideWord<L>) -> WideWord<L> {
        if a.cmp_signed(b) == Ordering::Less {
            *a
        } else {
            *b
        }
    }

    /// Signed maximum; returns `b` on a tie.
    #[inline]
    pub fn max<const L: usize>(a: &WideWord<L>, b: &WideWord<L>) -> WideWord<L> {
        if a.cmp_signed(b) == Ordering::Greater {
            *a
        } else {
            *b
        }
    }

    /// Square-and-multiply over the bits of `exponent`; `0^0 = 1`.
    pub fn pow<const L: usize>(base: &WideWord<L>, exponent: &WideWord<L>) -> WideWord<L> {
        let mut result = WideWord::ONE;
        let mut square = *base;
        let top = WideWord::<L>::BITS - exponent.leading_zeros();
        for i in 0..top {
            if exponent.bit(i) {
                result = result.wrapping_mul(&square);
            }
            if square.is_zero() || square == WideWord::ONE {
                // Further squaring cannot change `square`.
                if square.is_zero() && (i + 1..top).any(|j| exponent.bit(j)) {
                    return WideWord::ZERO;
                }
                break;
            }
            square = square.wrapping_mul(&square);
        }
        result
    }

    /// Binary (Stein's) GCD; `gcd(0, x) = x`.
    pub fn gcd<const L: usize>(a: &WideWord<L>, b: &WideWord<L>) -> WideWord<L> {
        if a.is_zero() {
            return *b;
        }
        if b.is_zero() {
            return *a;
        }
        let common = (*a | *b).trailing_zeros();
        let mut x = a.shift_right(a.trailing_zeros());
        let mut y = *b;
        loop {
            y = y.shift_right(y.trailing_zeros());
            if x > y {
                core::mem::swap(&mut x, &mut y);
            }
            y = y.wrapping_sub(&x);
            if y.is_zero() {
                break;
            }
        }
        x.shift_left(common)
    }

    /// `(a / gcd(a, b)) * b mod 2^N`; zero when either operand is zero.
    pub fn lcm<const L: usize>(a: &WideWord<L>, b: &WideWord<L>) -> WideWord<L> {
        if a.is_zero() || b.is_zero() {
            return WideWord::ZERO;
        }
        let g = Self::gcd(a, b);
        a.div_rem(&g)
            .map_or(WideWord::ZERO, |(q, _)| q.wrapping_mul(b))
    }
}

impl<const L: usize> Kernel<L> for Advanced {
    type Op = AdvancedOp;

    fn execute(&self, op: AdvancedOp, operands: &Operands<L>) -> WideWord<L> {
        let Operands { a, b, .. } = operands;
        match op {
            AdvancedOp::Inc => Self::inc(a),
            AdvancedOp::Dec => Self::dec(a),
            AdvancedOp::Neg => a.wrapping_neg(),
            AdvancedOp::Abs => Self::abs(a),
            AdvancedOp::Min => Self::min(a, b),
            AdvancedOp::Max => Self::max(a, b),
            AdvancedOp::Sqrt => a.isqrt(),
            AdvancedOp::Pow => Self::pow(a, b),
            AdvancedOp::Gcd => Self::gcd(a, b),
            AdvancedOp::Lcm => Self::lcm(a, b),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::word::Word512;

    type W = Word512;

    fn w(v: u64) -> W {
        W::from_u64(v)
    }

    #[test]
    fn test_inc_dec_identities() {
        for x in [0u64, 1, 42, u64::MAX] {
            assert_eq!(Advanced::inc(&w(x)), w(x).wrapping_add(&W::ONE));
            assert_eq!(Advanced::dec(&w(x)), w(x).wrapping_sub(&W::ONE));
        }
        assert_eq!(Advanced::inc(&W::MAX), W::ZERO);
        assert_eq!(Advanced::dec(&W::ZERO), W::MAX);
    }

    #[test]
    fn test_abs() {
        let minus_five = w(5).wrapping_neg();
        assert_eq!(Advanced::abs(&minus_five), w(5));
        assert_eq!(Advanced::abs(&w(5)), w(5));
        // The most negative value is its own negation.
        let min = W::ONE.shift_left(511);
        assert_eq!(Advanced::abs(&min), min);
    }

    #[test]
    fn test_min_max_signed() {
        let minus_one = W::MAX;
        assert_eq!(Advanced::min(&minus_one, &w(1)), minus_one);
        assert_eq!(Advanced::max(&minus_one, &w(1)), w(1));
        assert_eq!(Advanced::min(&w(7), &w(7)), w(7));
    }

    #[test]
    fn test_pow() {
        assert_eq!(Advanced::pow(&w(3), &w(4)), w(81));
        assert_eq!(Advanced::pow(&w(0), &w(0)), W::ONE);
        assert_eq!(Advanced::pow(&w(0), &w(5)), W::ZERO);
        assert_eq!(Advanced::pow(&w(1), &W::MAX), W::ONE);
        // 2^512 wraps to zero
        assert_eq!(Advanced::pow(&w(2), &w(512)), W::ZERO);
        assert_eq!(Advanced::pow(&w(2), &w(511)), W::ONE.shift_left(511));
    }

    #[test]
    fn test_gcd_lcm() {
        assert_eq!(Advanced::gcd(&w(48), &w(18)), w(6));
        assert_eq!(Advanced::gcd(&w(0), &w(9)), w(9));
        assert_eq!(Advanced::gcd(&w(9), &w(0)), w(9));
        assert_eq!(Advanced::gcd(&w(17), &w(5)), W::ONE);
        assert_eq!(Advanced::lcm(&w(4), &w(6)), w(12));
        assert_eq!(Advanced::lcm(&w(0), &w(6)), W::ZERO);
    }

    #[test]
    fn test_kernel_sqrt() {
        let ops = Operands::new(w(1_000_000), W::ZERO);
        assert_eq!(Advanced.execute(AdvancedOp::Sqrt, &ops), w(1000));
    }
}
