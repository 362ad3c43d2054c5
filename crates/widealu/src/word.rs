//! Fixed-width wide integers.
//!
//! `WideWord<L>` is an immutable N-bit value (`N = 64 * L`) stored as `L`
//! little-endian 64-bit limbs. Every operation that returns a `WideWord<L>`
//! returns exactly N bits: wider intermediates are truncated, shift amounts
//! beyond the width produce the fully-shifted value, and rotations wrap.
//!
//! # Type Aliases
//!
//! - `Word512` - 512-bit unit operand (8 limbs)
//! - `Word2048` - 2048-bit unit operand (32 limbs)
//!
//! # Example
//!
//! ```
//! use widealu::word::Word512;
//!
//! let a = Word512::MAX;
//! let (sum, carry) = a.overflowing_add(&Word512::ONE);
//! assert!(sum.is_zero());
//! assert!(carry);
//! ```

use core::cmp::Ordering;
use core::fmt;
use core::ops::{BitAnd, BitOr, BitXor, Not};
use core::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::ParseWordError;

/// Bits per limb.
pub const LIMB_BITS: u32 = 64;

/// An N-bit unsigned / two's-complement integer, `N = 64 * L`.
///
/// Limb 0 holds bits 0..64. The value has no identity beyond its bits and is
/// always `Copy`.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct WideWord<const L: usize>([u64; L]);

/// 512-bit word.
pub type Word512 = WideWord<8>;

/// 2048-bit word.
pub type Word2048 = WideWord<32>;

impl<const L: usize> WideWord<L> {
    /// Width in bits.
    pub const BITS: u32 = (L as u32) * LIMB_BITS;

    /// All-zeros.
    pub const ZERO: Self = Self([0; L]);

    /// The value 1.
    pub const ONE: Self = Self::from_u64(1);

    /// All-ones (2^N - 1).
    pub const MAX: Self = Self([u64::MAX; L]);

    /// Build a word from little-endian limbs.
    #[inline]
    pub const fn from_limbs(limbs: [u64; L]) -> Self {
        Self(limbs)
    }

    /// Little-endian limbs.
    #[inline]
    pub const fn limbs(&self) -> &[u64; L] {
        &self.0
    }

    /// Zero-extend a `u64`.
    #[inline]
    pub const fn from_u64(value: u64) -> Self {
        let mut limbs = [0u64; L];
        limbs[0] = value;
        Self(limbs)
    }

    /// Zero-extend a `u128` (truncated when the word is a single limb).
    #[inline]
    pub fn from_u128(value: u128) -> Self {
        let mut limbs = [0u64; L];
        limbs[0] = value as u64;
        if L > 1 {
            limbs[1] = (value >> 64) as u64;
        }
        Self(limbs)
    }

    /// Low 64 bits.
    #[inline]
    pub const fn low_u64(&self) -> u64 {
        self.0[0]
    }

    /// The value as a `u64`, if it fits.
    pub fn to_u64(&self) -> Option<u64> {
        if self.0[1..].iter().all(|&limb| limb == 0) {
            Some(self.0[0])
        } else {
            None
        }
    }

    /// Little-endian bytes (`N / 8` of them).
    pub fn to_le_bytes(&self) -> Vec<u8> {
        self.0.iter().flat_map(|limb| limb.to_le_bytes()).collect()
    }

    /// Build from little-endian bytes; missing bytes are zero, extra bytes
    /// are dropped.
    pub fn from_le_bytes(bytes: &[u8]) -> Self {
        let mut limbs = [0u64; L];
        for (i, chunk) in bytes.chunks(8).take(L).enumerate() {
            let mut buf = [0u8; 8];
            buf[..chunk.len()].copy_from_slice(chunk);
            limbs[i] = u64::from_le_bytes(buf);
        }
        Self(limbs)
    }

    // -------------------------------------------------------------------------
    // Bit queries
    // -------------------------------------------------------------------------

    /// True when every bit is zero.
    #[inline]
    pub fn is_zero(&self) -> bool {
        self.0.iter().all(|&limb| limb == 0)
    }

    /// Most-significant bit (the sign under the two's-complement view).
    #[inline]
    pub fn is_negative(&self) -> bool {
        self.0[L - 1] >> 63 == 1
    }

    /// Bit `index`; false for `index >= N`.
    #[inline]
    pub fn bit(&self, index: u32) -> bool {
        if index >= Self::BITS {
            return false;
        }
        (self.0[(index / LIMB_BITS) as usize] >> (index % LIMB_BITS)) & 1 == 1
    }

    /// Copy with bit `index` set to `value`; unchanged for `index >= N`.
    #[inline]
    pub fn with_bit(mut self, index: u32, value: bool) -> Self {
        if index < Self::BITS {
            let limb = &mut self.0[(index / LIMB_BITS) as usize];
            let mask = 1u64 << (index % LIMB_BITS);
            if value {
                *limb |= mask;
            } else {
                *limb &= !mask;
            }
        }
        self
    }

    /// Population count.
    pub fn count_ones(&self) -> u32 {
        self.0.iter().map(|limb| limb.count_ones()).sum()
    }

    /// Number of zero bits above the most-significant one (N for zero).
    pub fn leading_zeros(&self) -> u32 {
        let mut count = 0;
        for limb in self.0.iter().rev() {
            if *limb == 0 {
                count += LIMB_BITS;
            } else {
                return count + limb.leading_zeros();
            }
        }
        count
    }

    /// Number of zero bits below the least-significant one (N for zero).
    pub fn trailing_zeros(&self) -> u32 {
        let mut count = 0;
        for limb in self.0.iter() {
            if *limb == 0 {
                count += LIMB_BITS;
            } else {
                return count + limb.trailing_zeros();
            }
        }
        count
    }

    /// Mask with the low `bits` bits set (all-ones for `bits >= N`).
    #[inline]
    pub fn low_mask(bits: u32) -> Self {
        if bits >= Self::BITS {
            Self::MAX
        } else {
            Self::MAX.shift_right(Self::BITS - bits)
        }
    }

    /// Bits `offset .. offset + width`, moved down to bit 0.
    #[inline]
    pub fn extract(&self, offset: u32, width: u32) -> Self {
        self.shift_right(offset) & Self::low_mask(width)
    }

    /// Copy with bits `offset .. offset + width` replaced by the low `width`
    /// bits of `value`.
    #[inline]
    pub fn deposit(&self, offset: u32, width: u32, value: &Self) -> Self {
        let field = Self::low_mask(width);
        let mask = field.shift_left(offset);
        (*self & !mask) | (*value & field).shift_left(offset)
    }

    /// Low N/2 bits.
    #[inline]
    pub fn low_half(&self) -> Self {
        self.extract(0, Self::BITS / 2)
    }

    /// High N/2 bits, moved down to bit 0.
    #[inline]
    pub fn high_half(&self) -> Self {
        self.shift_right(Self::BITS / 2)
    }

    /// `low | high << N/2`, each half truncated to N/2 bits.
    #[inline]
    pub fn from_halves(low: &Self, high: &Self) -> Self {
        let half = Self::BITS / 2;
        (*low & Self::low_mask(half)) | high.shift_left(half)
    }

    // -------------------------------------------------------------------------
    // Arithmetic (mod 2^N)
    // -------------------------------------------------------------------------

    /// `self + rhs` with the carry out of bit N-1.
    pub fn overflowing_add(&self, rhs: &Self) -> (Self, bool) {
        let mut out = [0u64; L];
        let mut carry = false;
        for (i, slot) in out.iter_mut().enumerate() {
            let (s1, c1) = self.0[i].overflowing_add(rhs.0[i]);
            let (s2, c2) = s1.overflowing_add(carry as u64);
            *slot = s2;
            carry = c1 | c2;
        }
        (Self(out), carry)
    }

    /// `self - rhs` with the borrow out of bit N-1 (set iff `self < rhs`).
    pub fn overflowing_sub(&self, rhs: &Self) -> (Self, bool) {
        let mut out = [0u64; L];
        let mut borrow = false;
        for (i, slot) in out.iter_mut().enumerate() {
            let (d1, b1) = self.0[i].overflowing_sub(rhs.0[i]);
            let (d2, b2) = d1.overflowing_sub(borrow as u64);
            *slot = d2;
            borrow = b1 | b2;
        }
        (Self(out), borrow)
    }

    /// `self + rhs mod 2^N`.
    #[inline]
    pub fn wrapping_add(&self, rhs: &Self) -> Self {
        self.overflowing_add(rhs).0
    }

    /// `self - rhs mod 2^N`.
    #[inline]
    pub fn wrapping_sub(&self, rhs: &Self) -> Self {
        self.overflowing_sub(rhs).0
    }

    /// Two's-complement negation: `!self + 1`.
    #[inline]
    pub fn wrapping_neg(&self) -> Self {
        (!*self).wrapping_add(&Self::ONE)
    }

    /// Full 2N-bit product as `(low, high)`.
    pub fn widening_mul(&self, rhs: &Self) -> (Self, Self) {
        let mut low = [0u64; L];
        let mut high = [0u64; L];
        for i in 0..L {
            let ai = self.0[i] as u128;
            if ai == 0 {
                continue;
            }
            let mut carry: u128 = 0;
            for j in 0..L {
                let k = i + j;
                let slot = if k < L { &mut low[k] } else { &mut high[k - L] };
                let t = ai * rhs.0[j] as u128 + *slot as u128 + carry;
                *slot = t as u64;
                carry = t >> 64;
            }
            high[i] = carry as u64;
        }
        (Self(low), Self(high))
    }

    /// Low N bits of the product.
    #[inline]
    pub fn wrapping_mul(&self, rhs: &Self) -> Self {
        self.widening_mul(rhs).0
    }

    /// Unsigned `(quotient, remainder)`; `None` when `rhs` is zero.
    pub fn div_rem(&self, rhs: &Self) -> Option<(Self, Self)> {
        if rhs.is_zero() {
            return None;
        }
        if self < rhs {
            return Some((Self::ZERO, *self));
        }
        if let (Some(n), Some(d)) = (self.to_u64(), rhs.to_u64()) {
            return Some((Self::from_u64(n / d), Self::from_u64(n % d)));
        }

        let mut quotient = Self::ZERO;
        let mut remainder = Self::ZERO;
        let top = Self::BITS - self.leading_zeros();
        for i in (0..top).rev() {
            // The shifted-out bit means the true remainder is >= 2^N > rhs.
            let spilled = remainder.is_negative();
            remainder = remainder.shift_left(1).with_bit(0, self.bit(i));
            if spilled || remainder >= *rhs {
                remainder = remainder.wrapping_sub(rhs);
                quotient = quotient.with_bit(i, true);
            }
        }
        Some((quotient, remainder))
    }

    /// Signed comparison under the two's-complement view.
    pub fn cmp_signed(&self, other: &Self) -> Ordering {
        match (self.is_negative(), other.is_negative()) {
            (true, false) => Ordering::Less,
            (false, true) => Ordering::Greater,
            _ => self.cmp(other),
        }
    }

    /// Floor of the square root (unsigned), digit-by-digit.
    pub fn isqrt(&self) -> Self {
        if self.is_zero() {
            return Self::ZERO;
        }
        let top = Self::BITS - 1 - self.leading_zeros();
        let mut bit = Self::ONE.shift_left(top & !1);
        let mut rem = *self;
        let mut root = Self::ZERO;
        while !bit.is_zero() {
            let trial = root.wrapping_add(&bit);
            if rem >= trial {
                rem = rem.wrapping_sub(&trial);
                root = root.shift_right(1).wrapping_add(&bit);
            } else {
                root = root.shift_right(1);
            }
            bit = bit.shift_right(2);
        }
        root
    }

    // -------------------------------------------------------------------------
    // Barrel shifter
    // -------------------------------------------------------------------------

    /// Logical left shift; zero for `amount >= N`.
    pub fn shift_left(&self, amount: u32) -> Self {
        if amount >= Self::BITS {
            return Self::ZERO;
        }
        let limb_shift = (amount / LIMB_BITS) as usize;
        let bit_shift = amount % LIMB_BITS;
        let mut out = [0u64; L];
        for i in limb_shift..L {
            let src = i - limb_shift;
            let mut value = self.0[src] << bit_shift;
            if bit_shift > 0 && src > 0 {
                value |= self.0[src - 1] >> (LIMB_BITS - bit_shift);
            }
            out[i] = value;
        }
        Self(out)
    }

    /// Logical right shift; zero for `amount >= N`.
    pub fn shift_right(&self, amount: u32) -> Self {
        if amount >= Self::BITS {
            return Self::ZERO;
        }
        let limb_shift = (amount / LIMB_BITS) as usize;
        let bit_shift = amount % LIMB_BITS;
        let mut out = [0u64; L];
        for (i, slot) in out.iter_mut().enumerate().take(L - limb_shift) {
            let src = i + limb_shift;
            let mut value = self.0[src] >> bit_shift;
            if bit_shift > 0 && src + 1 < L {
                value |= self.0[src + 1] << (LIMB_BITS - bit_shift);
            }
            *slot = value;
        }
        Self(out)
    }

    /// Arithmetic right shift; all sign bits for `amount >= N`.
    pub fn shift_right_arith(&self, amount: u32) -> Self {
        if !self.is_negative() {
            return self.shift_right(amount);
        }
        if amount >= Self::BITS {
            return Self::MAX;
        }
        self.shift_right(amount) | !Self::MAX.shift_right(amount)
    }

    /// Circular left rotation by `amount mod N`.
    pub fn rotate_left(&self, amount: u32) -> Self {
        let k = amount % Self::BITS;
        if k == 0 {
            return *self;
        }
        self.shift_left(k) | self.shift_right(Self::BITS - k)
    }

    /// Circular right rotation by `amount mod N`.
    pub fn rotate_right(&self, amount: u32) -> Self {
        let k = amount % Self::BITS;
        if k == 0 {
            return *self;
        }
        self.shift_right(k) | self.shift_left(Self::BITS - k)
    }

    /// Reverse the byte order.
    pub fn swap_bytes(&self) -> Self {
        let mut out = [0u64; L];
        for (i, slot) in out.iter_mut().enumerate() {
            *slot = self.0[L - 1 - i].swap_bytes();
        }
        Self(out)
    }

    /// Reverse the bit order (bit i of the result is bit N-1-i of `self`).
    pub fn reverse_bits(&self) -> Self {
        let mut out = [0u64; L];
        for (i, slot) in out.iter_mut().enumerate() {
            *slot = self.0[L - 1 - i].reverse_bits();
        }
        Self(out)
    }

    // -------------------------------------------------------------------------
    // Text form
    // -------------------------------------------------------------------------

    /// `0x`-prefixed lowercase hex without leading zeros (`0x0` for zero).
    pub fn to_hex(&self) -> String {
        let mut s = String::with_capacity(2 + L * 16);
        s.push_str("0x");
        let mut started = false;
        for limb in self.0.iter().rev() {
            if started {
                s.push_str(&format!("{:016x}", limb));
            } else if *limb != 0 {
                s.push_str(&format!("{:x}", limb));
                started = true;
            }
        }
        if !started {
            s.push('0');
        }
        s
    }

    /// Parse hex digits, with or without a `0x` prefix. Underscores are
    /// ignored.
    ///
    /// # Errors
    ///
    /// Returns `ParseWordError` for empty input, non-hex characters or
    /// values wider than N bits.
    pub fn from_hex(text: &str) -> Result<Self, ParseWordError> {
        let digits = text
            .strip_prefix("0x")
            .or_else(|| text.strip_prefix("0X"))
            .unwrap_or(text);
        let mut out = Self::ZERO;
        let mut seen = false;
        for c in digits.chars().filter(|&c| c != '_') {
            let nibble = c
                .to_digit(16)
                .ok_or(ParseWordError::InvalidDigit { digit: c })?;
            seen = true;
            if out.shift_right(Self::BITS - 4).is_zero() {
                out = out.shift_left(4) | Self::from_u64(nibble as u64);
            } else {
                return Err(ParseWordError::TooWide { bits: Self::BITS });
            }
        }
        if !seen {
            return Err(ParseWordError::Empty);
        }
        Ok(out)
    }

    /// Parse an unsigned decimal string.
    ///
    /// # Errors
    ///
    /// Returns `ParseWordError` for empty input, non-decimal characters or
    /// values wider than N bits.
    pub fn from_dec(text: &str) -> Result<Self, ParseWordError> {
        let ten = Self::from_u64(10);
        let mut out = Self::ZERO;
        let mut seen = false;
        for c in text.chars().filter(|&c| c != '_') {
            let digit = c
                .to_digit(10)
                .ok_or(ParseWordError::InvalidDigit { digit: c })?;
            seen = true;
            let (scaled, high) = out.widening_mul(&ten);
            let (next, carry) = scaled.overflowing_add(&Self::from_u64(digit as u64));
            if !high.is_zero() || carry {
                return Err(ParseWordError::TooWide { bits: Self::BITS });
            }
            out = next;
        }
        if !seen {
            return Err(ParseWordError::Empty);
        }
        Ok(out)
    }
}

impl<const L: usize> Default for WideWord<L> {
    fn default() -> Self {
        Self::ZERO
    }
}

impl<const L: usize> Ord for WideWord<L> {
    fn cmp(&self, other: &Self) -> Ordering {
        for i in (0..L).rev() {
            match self.0[i].cmp(&other.0[i]) {
                Ordering::Equal => continue,
                ord => return ord,
            }
        }
        Ordering::Equal
    }
}

impl<const L: usize> PartialOrd for WideWord<L> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<const L: usize> BitAnd for WideWord<L> {
    type Output = Self;

    fn bitand(self, rhs: Self) -> Self {
        let mut out = self.0;
        out.iter_mut().zip(rhs.0).for_each(|(x, y)| *x &= y);
        Self(out)
    }
}

impl<const L: usize> BitOr for WideWord<L> {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self {
        let mut out = self.0;
        out.iter_mut().zip(rhs.0).for_each(|(x, y)| *x |= y);
        Self(out)
    }
}

impl<const L: usize> BitXor for WideWord<L> {
    type Output = Self;

    fn bitxor(self, rhs: Self) -> Self {
        let mut out = self.0;
        out.iter_mut().zip(rhs.0).for_each(|(x, y)| *x ^= y);
        Self(out)
    }
}

impl<const L: usize> Not for WideWord<L> {
    type Output = Self;

    fn not(self) -> Self {
        let mut out = self.0;
        out.iter_mut().for_each(|x| *x = !*x);
        Self(out)
    }
}

impl<const L: usize> From<u64> for WideWord<L> {
    fn from(value: u64) -> Self {
        Self::from_u64(value)
    }
}

impl<const L: usize> FromStr for WideWord<L> {
    type Err = ParseWordError;

    /// Hex with a `0x` prefix, decimal otherwise.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.starts_with("0x") || s.starts_with("0X") {
            Self::from_hex(s)
        } else {
            Self::from_dec(s)
        }
    }
}

impl<const L: usize> fmt::Debug for WideWord<L> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "WideWord<{}>({})", Self::BITS, self.to_hex())
    }
}

impl<const L: usize> fmt::Display for WideWord<L> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl<const L: usize> Serialize for WideWord<L> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de, const L: usize> Deserialize<'de> for WideWord<L> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let text = String::deserialize(deserializer)?;
        text.parse().map_err(serde::de::Error::custom)
    }
}
