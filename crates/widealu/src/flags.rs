//! Status flags and the flag deriver.
//!
//! A [`FlagSet`] is a 21-flag record. Its packed form follows the fixed
//! position table [`FLAG_POSITIONS`] (bit 0 = zero ... bit 20 =
//! simd_negative).
//!
//! [`FlagDeriver::derive`] is a pure function of the decoded request and its
//! result. Every flag has one definition. A flag that does not apply to the
//! active mode is 0, never left over from an earlier evaluation.
//!
//! | Flag | Definition |
//! |------|------------|
//! | zero | result is all zeros |
//! | negative, sign | bit N-1 of result |
//! | carry | add carry-out, sub borrow, or last bit shifted out (Normal / Saturate); decimal carry / borrow out of the top digit (BCD) |
//! | overflow | signed overflow (Normal, SIMD add/sub), clamping (Saturate) |
//! | parity | even parity of result bits 0..8; odd parity of all of `a` for PARITY |
//! | half_carry, aux_carry | carry / borrow out of bit 3 / bit 7 for add and sub (Normal / Saturate only) |
//! | trap | an exception is set |
//! | direction, interrupt | reserved, 0 |
//! | bit_test | the tested bit for TSTB |
//! | fp_invalid, fp_overflow | trap / overflow in Float mode |
//! | fp_underflow, fp_zero, fp_denormal | reserved, 0 |
//! | simd_zero, simd_negative, simd_overflow | zero / negative / overflow in SIMD modes |
//! | simd_underflow | reserved, 0 |

use core::fmt;

use serde::{Deserialize, Serialize};

use crate::constants::FLAG_COUNT;
use crate::kernel::{Bcd, BitManipulation, BitOp, Saturating, ShiftRotate};
use crate::mode::Mode;
use crate::outcome::Exception;
use crate::route::Route;
use crate::word::WideWord;

/// One status flag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Flag {
    /// Result is zero.
    Zero,
    /// Result sign bit.
    Negative,
    /// Carry, borrow or shifted-out bit.
    Carry,
    /// Signed overflow or saturation.
    Overflow,
    /// Parity.
    Parity,
    /// Carry out of bit 3.
    HalfCarry,
    /// Carry out of bit 7.
    AuxCarry,
    /// Result sign bit.
    Sign,
    /// Exception raised.
    Trap,
    /// Reserved.
    Direction,
    /// Reserved.
    Interrupt,
    /// Tested bit.
    BitTest,
    /// Float-mode exception.
    FpInvalid,
    /// Float-mode overflow.
    FpOverflow,
    /// Reserved.
    FpUnderflow,
    /// Reserved.
    FpZero,
    /// Reserved.
    FpDenormal,
    /// SIMD-mode overflow.
    SimdOverflow,
    /// Reserved.
    SimdUnderflow,
    /// SIMD-mode zero.
    SimdZero,
    /// SIMD-mode sign.
    SimdNegative,
}

/// Packed bit position of every flag.
pub static FLAG_POSITIONS: [(Flag, u8); FLAG_COUNT] = [
    (Flag::Zero, 0),
    (Flag::Negative, 1),
    (Flag::Carry, 2),
    (Flag::Overflow, 3),
    (Flag::Parity, 4),
    (Flag::HalfCarry, 5),
    (Flag::AuxCarry, 6),
    (Flag::Sign, 7),
    (Flag::Trap, 8),
    (Flag::Direction, 9),
    (Flag::Interrupt, 10),
    (Flag::BitTest, 11),
    (Flag::FpInvalid, 12),
    (Flag::FpOverflow, 13),
    (Flag::FpUnderflow, 14),
    (Flag::FpZero, 15),
    (Flag::FpDenormal, 16),
    (Flag::SimdOverflow, 17),
    (Flag::SimdUnderflow, 18),
    (Flag::SimdZero, 19),
    (Flag::SimdNegative, 20),
];

impl Flag {
    /// Bit position in the packed form.
    #[inline]
    pub fn position(self) -> u8 {
        FLAG_POSITIONS[self as usize].1
    }

    /// Lowercase snake-case name.
    pub fn name(self) -> &'static str {
        match self {
            Self::Zero => "zero",
            Self::Negative => "negative",
            Self::Carry => "carry",
            Self::Overflow => "overflow",
            Self::Parity => "parity",
            Self::HalfCarry => "half_carry",
            Self::AuxCarry => "aux_carry",
            Self::Sign => "sign",
            Self::Trap => "trap",
            Self::Direction => "direction",
            Self::Interrupt => "interrupt",
            Self::BitTest => "bit_test",
            Self::FpInvalid => "fp_invalid",
            Self::FpOverflow => "fp_overflow",
            Self::FpUnderflow => "fp_underflow",
            Self::FpZero => "fp_zero",
            Self::FpDenormal => "fp_denormal",
            Self::SimdOverflow => "simd_overflow",
            Self::SimdUnderflow => "simd_underflow",
            Self::SimdZero => "simd_zero",
            Self::SimdNegative => "simd_negative",
        }
    }
}

impl fmt::Display for Flag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

// -----------------------------------------------------------------------------
// FlagSet
// -----------------------------------------------------------------------------

/// The full flag record of one evaluation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FlagSet {
    /// Result is zero.
    pub zero: bool,
    /// Result sign bit.
    pub negative: bool,
    /// Carry, borrow or shifted-out bit.
    pub carry: bool,
    /// Signed overflow or saturation.
    pub overflow: bool,
    /// Parity.
    pub parity: bool,
    /// Carry out of bit 3.
    pub half_carry: bool,
    /// Carry out of bit 7.
    pub aux_carry: bool,
    /// Result sign bit.
    pub sign: bool,
    /// Exception raised.
    pub trap: bool,
    /// Reserved.
    pub direction: bool,
    /// Reserved.
    pub interrupt: bool,
    /// Tested bit.
    pub bit_test: bool,
    /// Float-mode exception.
    pub fp_invalid: bool,
    /// Float-mode overflow.
    pub fp_overflow: bool,
    /// Reserved.
    pub fp_underflow: bool,
    /// Reserved.
    pub fp_zero: bool,
    /// Reserved.
    pub fp_denormal: bool,
    /// SIMD-mode overflow.
    pub simd_overflow: bool,
    /// Reserved.
    pub simd_underflow: bool,
    /// SIMD-mode zero.
    pub simd_zero: bool,
    /// SIMD-mode sign.
    pub simd_negative: bool,
}

impl FlagSet {
    /// Value of `flag`.
    pub fn get(&self, flag: Flag) -> bool {
        *self.slot(flag)
    }

    /// Set `flag` to `value`.
    pub fn set(&mut self, flag: Flag, value: bool) {
        *self.slot_mut(flag) = value;
    }

    fn slot(&self, flag: Flag) -> &bool {
        match flag {
            Flag::Zero => &self.zero,
            Flag::Negative => &self.negative,
            Flag::Carry => &self.carry,
            Flag::Overflow => &self.overflow,
            Flag::Parity => &self.parity,
            Flag::HalfCarry => &self.half_carry,
            Flag::AuxCarry => &self.aux_carry,
            Flag::Sign => &self.sign,
            Flag::Trap => &self.trap,
            Flag::Direction => &self.direction,
            Flag::Interrupt => &self.interrupt,
            Flag::BitTest => &self.bit_test,
            Flag::FpInvalid => &self.fp_invalid,
            Flag::FpOverflow => &self.fp_overflow,
            Flag::FpUnderflow => &self.fp_underflow,
            Flag::FpZero => &self.fp_zero,
            Flag::FpDenormal => &self.fp_denormal,
            Flag::SimdOverflow => &self.simd_overflow,
            Flag::SimdUnderflow => &self.simd_underflow,
            Flag::SimdZero => &self.simd_zero,
            Flag::SimdNegative => &self.simd_negative,
        }
    }

    fn slot_mut(&mut self, flag: Flag) -> &mut bool {
        match flag {
            Flag::Zero => &mut self.zero,
            Flag::Negative => &mut self.negative,
            Flag::Carry => &mut self.carry,
            Flag::Overflow => &mut self.overflow,
            Flag::Parity => &mut self.parity,
            Flag::HalfCarry => &mut self.half_carry,
            Flag::AuxCarry => &mut self.aux_carry,
            Flag::Sign => &mut self.sign,
            Flag::Trap => &mut self.trap,
            Flag::Direction => &mut self.direction,
            Flag::Interrupt => &mut self.interrupt,
            Flag::BitTest => &mut self.bit_test,
            Flag::FpInvalid => &mut self.fp_invalid,
            Flag::FpOverflow => &mut self.fp_overflow,
            Flag::FpUnderflow => &mut self.fp_underflow,
            Flag::FpZero => &mut self.fp_zero,
            Flag::FpDenormal => &mut self.fp_denormal,
            Flag::SimdOverflow => &mut self.simd_overflow,
            Flag::SimdUnderflow => &mut self.simd_underflow,
            Flag::SimdZero => &mut self.simd_zero,
            Flag::SimdNegative => &mut self.simd_negative,
        }
    }

    /// Packed form; bit `flag.position()` holds `flag`.
    pub fn bits(&self) -> u32 {
        FLAG_POSITIONS
            .iter()
            .filter(|(flag, _)| self.get(*flag))
            .fold(0u32, |acc, &(_, pos)| acc | (1u32 << pos))
    }

    /// Unpack; bits above position 20 are ignored.
    pub fn from_bits(bits: u32) -> Self {
        let mut set = Self::default();
        for &(flag, pos) in &FLAG_POSITIONS {
            set.set(flag, bits >> pos & 1 == 1);
        }
        set
    }

    /// Flags that are set, in position order.
    pub fn iter(&self) -> impl Iterator<Item = Flag> + '_ {
        FLAG_POSITIONS
            .iter()
            .map(|&(flag, _)| flag)
            .filter(|&flag| self.get(flag))
    }

    /// Names of the flags that are set, in position order.
    pub fn names(&self) -> Vec<&'static str> {
        self.iter().map(Flag::name).collect()
    }
}

impl fmt::Display for FlagSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let names = self.names();
        if names.is_empty() {
            f.write_str("-")
        } else {
            f.write_str(&names.join("|"))
        }
    }
}

// -----------------------------------------------------------------------------
// FlagDeriver
// -----------------------------------------------------------------------------

/// Everything the deriver looks at for one evaluation.
#[derive(Debug, Clone, Copy)]
pub struct FlagInputs<'a, const L: usize> {
    /// Decoded mode; `None` when the mode was not recognized.
    pub mode: Option<Mode>,
    /// Kernel route; `None` when no kernel ran.
    pub route: Option<Route>,
    /// First operand.
    pub a: &'a WideWord<L>,
    /// Second operand.
    pub b: &'a WideWord<L>,
    /// Final result, after the divide-by-zero override.
    pub result: &'a WideWord<L>,
    /// Resolved shift amount.
    pub shift: u32,
    /// Final exception.
    pub exception: Exception,
}

/// Pure flag derivation.
#[derive(Debug, Clone, Copy, Default)]
pub struct FlagDeriver;

impl FlagDeriver {
    /// Derive the flag record.
    pub fn derive<const L: usize>(inputs: &FlagInputs<'_, L>) -> FlagSet {
        let FlagInputs {
            mode,
            route,
            a,
            b,
            result,
            shift,
            exception,
        } = *inputs;

        let trap = exception.is_set();
        let negative = result.is_negative();
        let carry_modes = matches!(mode, Some(Mode::Normal | Mode::Saturate));
        let effective_b = match route {
            Some(r) if r.has_unit_operand() => WideWord::ONE,
            _ => *b,
        };

        let mut flags = FlagSet {
            zero: result.is_zero(),
            negative,
            sign: negative,
            trap,
            parity: Self::low_byte_even_parity(result),
            ..FlagSet::default()
        };

        if let Some(route) = route {
            if carry_modes {
                flags.carry = Self::carry(route, a, &effective_b, shift);
                (flags.half_carry, flags.aux_carry) =
                    Self::nibble_carries(route, a, &effective_b);
            } else if let Route::Bcd(op) = route {
                flags.carry = Bcd::apply(op, a, b).1;
            }
            flags.overflow = Self::overflow(route, mode, a, &effective_b, result);
            match route {
                Route::Bits(BitOp::Parity) => flags.parity = BitManipulation::parity(a),
                Route::Bits(BitOp::Test) => flags.bit_test = BitManipulation::test(a, b),
                _ => {}
            }
        }

        match mode {
            Some(Mode::Float) => {
                flags.fp_invalid = trap;
                flags.fp_overflow = flags.overflow;
            }
            Some(m) if m.is_simd() => {
                flags.simd_zero = flags.zero;
                flags.simd_negative = flags.negative;
                flags.simd_overflow = flags.overflow;
            }
            _ => {}
        }
        flags
    }

    /// 1 when bits 0..8 of `result` hold an even number of ones.
    #[inline]
    fn low_byte_even_parity<const L: usize>(result: &WideWord<L>) -> bool {
        (result.low_u64() & 0xFF).count_ones() % 2 == 0
    }

    fn carry<const L: usize>(route: Route, a: &WideWord<L>, b: &WideWord<L>, shift: u32) -> bool {
        if route.is_add_like() {
            a.overflowing_add(b).1
        } else if route.is_sub_like() {
            a.overflowing_sub(b).1
        } else if let Route::Shift(op) = route {
            ShiftRotate::shifted_out(op, a, shift)
        } else {
            false
        }
    }

    /// Carry (or borrow) out of bit 3 and bit 7.
    fn nibble_carries<const L: usize>(
        route: Route,
        a: &WideWord<L>,
        b: &WideWord<L>,
    ) -> (bool, bool) {
        let (x, y) = (a.low_u64(), b.low_u64());
        if route.is_add_like() {
            ((x & 0xF) + (y & 0xF) > 0xF, (x & 0xFF) + (y & 0xFF) > 0xFF)
        } else if route.is_sub_like() {
            ((x & 0xF) < (y & 0xF), (x & 0xFF) < (y & 0xFF))
        } else {
            (false, false)
        }
    }

    fn overflow<const L: usize>(
        route: Route,
        mode: Option<Mode>,
        a: &WideWord<L>,
        b: &WideWord<L>,
        result: &WideWord<L>,
    ) -> bool {
        match (mode, route) {
            (Some(Mode::Saturate), Route::Saturating(op)) => Saturating::apply(op, a, b).1,
            (Some(Mode::Normal | Mode::Simd { .. }), _) => {
                let (sa, sb, sr) = (a.is_negative(), b.is_negative(), result.is_negative());
                if route.is_add_like() {
                    sa == sb && sr != sa
                } else if route.is_sub_like() {
                    sa != sb && sr != sa
                } else {
                    false
                }
            }
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::kernel::{ArithOp, BcdOp, SatOp, ShiftOp, SimdOp};
    use crate::word::Word512;

    fn derive(mode: Mode, route: Route, a: Word512, b: Word512, result: Word512) -> FlagSet {
        FlagDeriver::derive(&FlagInputs {
            mode: Some(mode),
            route: Some(route),
            a: &a,
            b: &b,
            result: &result,
            shift: 0,
            exception: Exception::None,
        })
    }

    #[test]
    fn test_position_table_is_dense() {
        for (i, &(flag, pos)) in FLAG_POSITIONS.iter().enumerate() {
            assert_eq!(pos as usize, i);
            assert_eq!(flag as usize, i);
            assert_eq!(flag.position(), pos);
        }
    }

    #[test]
    fn test_bits_round_trip() {
        let mut flags = FlagSet::default();
        flags.zero = true;
        flags.trap = true;
        flags.simd_negative = true;
        assert_eq!(flags.bits(), 1 | 1 << 8 | 1 << 20);
        assert_eq!(FlagSet::from_bits(flags.bits()), flags);
        assert_eq!(FlagSet::from_bits(1 << 21), FlagSet::default());
        assert_eq!(flags.names(), vec!["zero", "trap", "simd_negative"]);
        assert_eq!(flags.to_string(), "zero|trap|simd_negative");
    }

    #[test]
    fn test_add_carry_out() {
        let a = Word512::MAX;
        let b = Word512::ONE;
        let route = Route::Arithmetic(ArithOp::Add);
        let f = derive(Mode::Normal, route, a, b, Word512::ZERO);
        assert!(f.zero && f.carry && f.half_carry && f.aux_carry);
        assert!(!f.overflow);
        assert!(f.parity);
    }

    #[test]
    fn test_sub_signed_overflow() {
        let min = Word512::ONE.shift_left(511);
        let result = min.wrapping_sub(&Word512::ONE);
        let route = Route::Arithmetic(ArithOp::Sub);
        let f = derive(Mode::Normal, route, min, Word512::ONE, result);
        assert!(f.overflow);
        assert!(!f.carry);
        assert!(!f.negative);
    }

    #[test]
    fn test_saturate_overflow_means_clamped() {
        let f = derive(
            Mode::Saturate,
            Route::Saturating(SatOp::Sub),
            Word512::from_u64(1),
            Word512::from_u64(2),
            Word512::ZERO,
        );
        assert!(f.overflow && f.carry && f.zero);
    }

    #[test]
    fn test_simd_mirrors_and_drops_carry() {
        let mode = Mode::Simd { lane_bits: 8 };
        let route = Route::Simd {
            op: SimdOp::Add,
            lane_bits: 8,
        };
        let f = derive(mode, route, Word512::MAX, Word512::ONE, Word512::ZERO);
        assert!(f.simd_zero && f.zero);
        assert!(!f.carry && !f.half_carry);
    }

    #[test]
    fn test_bcd_carry_out_of_top_digit() {
        let all_nines = Word512::from_le_bytes(&[0x99u8; 64]);
        let add = Route::Bcd(BcdOp::Add);
        let f = derive(Mode::Bcd, add, all_nines, Word512::ONE, Word512::ZERO);
        assert!(f.carry && f.zero);
        assert!(!f.half_carry && !f.aux_carry && !f.overflow);

        let (a, b) = (Word512::from_u64(0x45), Word512::from_u64(0x38));
        let f = derive(Mode::Bcd, add, a, b, Word512::from_u64(0x83));
        assert!(!f.carry);

        let sub = Route::Bcd(BcdOp::Sub);
        let f = derive(Mode::Bcd, sub, Word512::ZERO, Word512::ONE, all_nines);
        assert!(f.carry);
    }

    #[test]
    fn test_shift_carry() {
        let a = Word512::from_u64(0b10);
        let srl = |shift: u32| {
            let result = a.shift_right(shift);
            FlagDeriver::derive(&FlagInputs {
                mode: Some(Mode::Normal),
                route: Some(Route::Shift(ShiftOp::Srl)),
                a: &a,
                b: &Word512::ZERO,
                result: &result,
                shift,
                exception: Exception::None,
            })
        };
        assert!(!srl(1).carry);
        assert!(srl(2).carry);
        assert!(!srl(0).carry);
    }

    #[test]
    fn test_unrecognized_mode_sets_only_generic_flags() {
        let zero = Word512::ZERO;
        let f = FlagDeriver::derive(&FlagInputs {
            mode: None,
            route: None,
            a: &zero,
            b: &zero,
            result: &zero,
            shift: 0,
            exception: Exception::UnsupportedMode,
        });
        assert_eq!(f.names(), vec!["zero", "parity", "trap"]);
    }
}
