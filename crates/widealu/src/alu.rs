//! The dispatcher.
//!
//! [`Alu::evaluate`] runs one request through a fixed sequence of phases:
//!
//! ```text
//! Idle -> Decoding -> Executing -> Flagging -> Done
//!            |                        ^
//!            +------------------------+   (mode or opcode not accepted)
//! ```
//!
//! Decoding fails closed. An unrecognized mode gives `unsupported_mode` and
//! a recognized mode that does not accept the opcode gives
//! `unsupported_operation`; either way no kernel runs and the result is 0.
//! After execution (or a failed opcode decode) the divide-by-zero rule
//! replaces the result with all-ones for DIV, MOD and FDIV with `b = 0`.
//!
//! # Example
//!
//! ```
//! use widealu::{Alu512, Exception};
//! use widealu::mode::code;
//! use widealu::opcode::op;
//! use widealu::word::Word512;
//!
//! let alu = Alu512::new();
//! let out = alu.evaluate(&Word512::MAX, &Word512::ONE, op::ADD, code::NORMAL, 0);
//! assert!(out.result.is_zero());
//! assert!(out.flags.carry && out.flags.zero && !out.flags.overflow);
//! assert_eq!(out.exception, Exception::None);
//! ```

use log::{debug, trace};

use crate::config::{AluConfig, PipelineConfig, ShiftSource};
use crate::error::{ConfigError, RegistrationError};
use crate::flags::{FlagDeriver, FlagInputs};
use crate::kernel::{
    Advanced, Arithmetic, Bcd, BitManipulation, Comparison, DataMovement, Kernel, Logical,
    OpaqueKernel, OpaqueSlots, Operands, Saturating, ShiftRotate, SimdLanes, Vector,
};
use crate::mode::Mode;
use crate::opcode::{mnemonic, op};
use crate::outcome::{Exception, Outcome};
use crate::route::Route;
use crate::word::WideWord;

/// A 512-bit unit.
pub type Alu512 = Alu<8>;

/// A 2048-bit unit.
pub type Alu2048 = Alu<32>;

/// One raw request as handed to [`Alu::evaluate`].
#[derive(Debug, Clone, Copy)]
struct Instruction<'a, const L: usize> {
    a: &'a WideWord<L>,
    b: &'a WideWord<L>,
    opcode: u8,
    mode: u8,
    shift: u32,
}

/// Dispatcher phases.
#[derive(Debug)]
enum Phase<const L: usize> {
    Idle,
    Decoding,
    Executing {
        mode: Mode,
        route: Route,
    },
    Flagging {
        mode: Option<Mode>,
        route: Option<Route>,
        result: WideWord<L>,
        exception: Exception,
    },
    Done(Outcome<L>),
}

/// An N-bit arithmetic/logic unit, `N = 64 * L`.
///
/// Holds its configuration and the registered opaque kernels. Evaluation
/// takes `&self` and keeps no state between calls.
#[derive(Debug, Clone)]
pub struct Alu<const L: usize> {
    config: AluConfig,
    slots: OpaqueSlots<L>,
}

impl<const L: usize> Default for Alu<L> {
    fn default() -> Self {
        Self::new()
    }
}

impl<const L: usize> Alu<L> {
    /// Unit width in bits.
    pub const BITS: u32 = WideWord::<L>::BITS;

    /// A unit with the default configuration for its width.
    pub fn new() -> Self {
        Self {
            config: AluConfig {
                width: Self::BITS,
                shift_source: ShiftSource::for_width(Self::BITS),
                pipeline: PipelineConfig::default(),
            },
            slots: OpaqueSlots::new(),
        }
    }

    /// A unit with an explicit configuration, which must name this width
    /// and pass the same checks as a parsed configuration file.
    pub fn with_config(config: AluConfig) -> Result<Self, ConfigError> {
        if config.width != Self::BITS {
            return Err(ConfigError::WidthMismatch {
                expected: Self::BITS,
                found: config.width,
            });
        }
        let config = config.validated()?;
        Ok(Self {
            config,
            slots: OpaqueSlots::new(),
        })
    }

    /// The active configuration.
    #[inline]
    pub fn config(&self) -> &AluConfig {
        &self.config
    }

    /// Install a kernel for an opaque slot (a Float or Crypto opcode, or
    /// CROSS).
    pub fn register_opaque<K>(&mut self, opcode: u8, kernel: K) -> Result<(), RegistrationError>
    where
        K: OpaqueKernel<L> + 'static,
    {
        self.slots.register(opcode, kernel).map(|_| ())
    }

    /// Restore the stand-in for `opcode`. Returns whether a kernel was removed.
    pub fn unregister_opaque(&mut self, opcode: u8) -> bool {
        self.slots.unregister(opcode).is_some()
    }

    /// Evaluate one request.
    ///
    /// `shift_amount` is only read when the configured shift source is the
    /// dedicated field; otherwise the amount comes from operand `b`.
    pub fn evaluate(
        &self,
        a: &WideWord<L>,
        b: &WideWord<L>,
        opcode: u8,
        mode: u8,
        shift_amount: u16,
    ) -> Outcome<L> {
        let instruction = Instruction {
            a,
            b,
            opcode,
            mode,
            shift: self.config.shift_source.resolve(shift_amount, b),
        };
        let mut phase = Phase::Idle;
        let outcome = loop {
            phase = match phase {
                Phase::Done(outcome) => break outcome,
                other => self.advance(other, &instruction),
            };
        };
        trace!(
            "evaluate {} ({opcode:#04x}) mode {mode:#04x} on {} bits: {:?} [{}]",
            mnemonic(opcode).unwrap_or("?"),
            Self::BITS,
            outcome.exception,
            outcome.flags,
        );
        outcome
    }

    fn advance(&self, phase: Phase<L>, ins: &Instruction<'_, L>) -> Phase<L> {
        match phase {
            Phase::Idle => Phase::Decoding,
            Phase::Decoding => self.decode(ins),
            Phase::Executing { mode, route } => {
                let operands = Operands::with_shift(*ins.a, *ins.b, ins.shift);
                let result = self.execute(route, &operands);
                let (result, exception) = divide_rule(ins, result, Exception::None);
                Phase::Flagging {
                    mode: Some(mode),
                    route: Some(route),
                    result,
                    exception,
                }
            }
            Phase::Flagging {
                mode,
                route,
                result,
                exception,
            } => {
                let flags = FlagDeriver::derive(&FlagInputs {
                    mode,
                    route,
                    a: ins.a,
                    b: ins.b,
                    result: &result,
                    shift: ins.shift,
                    exception,
                });
                Phase::Done(Outcome {
                    result,
                    flags,
                    exception,
                })
            }
            done @ Phase::Done(_) => done,
        }
    }

    fn decode(&self, ins: &Instruction<'_, L>) -> Phase<L> {
        let Some(mode) = Mode::decode(ins.mode, Self::BITS) else {
            let bits = Self::BITS;
            debug!("mode {:#04x} not recognized by a {bits}-bit unit", ins.mode);
            return Phase::Flagging {
                mode: None,
                route: None,
                result: WideWord::ZERO,
                exception: Exception::UnsupportedMode,
            };
        };
        match Route::decode(mode, ins.opcode) {
            Some(route) => Phase::Executing { mode, route },
            None => {
                debug!("opcode {:#04x} not accepted in mode {mode}", ins.opcode);
                let (result, exception) =
                    divide_rule(ins, WideWord::ZERO, Exception::UnsupportedOperation);
                Phase::Flagging {
                    mode: Some(mode),
                    route: None,
                    result,
                    exception,
                }
            }
        }
    }

    fn execute(&self, route: Route, operands: &Operands<L>) -> WideWord<L> {
        match route {
            Route::Arithmetic(op) => Arithmetic.execute(op, operands),
            Route::Logical(op) => Logical.execute(op, operands),
            Route::Shift(op) => ShiftRotate.execute(op, operands),
            Route::Bits(op) => BitManipulation.execute(op, operands),
            Route::Compare(op) => Comparison.execute(op, operands),
            Route::Move(op) => DataMovement.execute(op, operands),
            Route::Advanced(op) => Advanced.execute(op, operands),
            Route::Saturating(op) => Saturating.execute(op, operands),
            Route::Bcd(op) => Bcd.execute(op, operands),
            Route::Simd { op, lane_bits } => SimdLanes::new(lane_bits).execute(op, operands),
            Route::Vector(op) => Vector.execute(op, operands),
            Route::Opaque(opcode) => self
                .slots
                .execute(opcode, &operands.a, &operands.b)
                .unwrap_or(WideWord::ZERO),
        }
    }
}

/// DIV, MOD and FDIV with a zero divisor yield all-ones and
/// `divide_by_zero`, whatever the kernel produced.
fn divide_rule<const L: usize>(
    ins: &Instruction<'_, L>,
    result: WideWord<L>,
    exception: Exception,
) -> (WideWord<L>, Exception) {
    let divides = matches!(ins.opcode, op::DIV | op::MOD | op::FDIV);
    if divides && ins.b.is_zero() {
        (WideWord::MAX, Exception::DivideByZero)
    } else {
        (result, exception)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mode::code;
    use crate::word::{Word2048, Word512};

    fn w(v: u64) -> Word512 {
        Word512::from_u64(v)
    }

    #[test]
    fn test_unsupported_mode() {
        let alu = Alu512::new();
        let out = alu.evaluate(&w(1), &w(2), op::ADD, 0x09, 0);
        assert_eq!(out.exception, Exception::UnsupportedMode);
        assert!(out.result.is_zero());
        assert!(out.flags.trap && out.flags.zero);
    }

    #[test]
    fn test_simd_lane_wider_than_half_is_unsupported_mode() {
        // 512-bit lanes are only valid on the 2048-bit unit.
        let narrow = Alu512::new().evaluate(&w(1), &w(1), op::VADD, code::SIMD512, 0);
        assert_eq!(narrow.exception, Exception::UnsupportedMode);
        let wide = Alu2048::new().evaluate(
            &Word2048::ONE,
            &Word2048::ONE,
            op::VADD,
            code::SIMD512,
            0,
        );
        assert_eq!(wide.exception, Exception::None);
        assert_eq!(wide.result, Word2048::from_u64(2));
    }

    #[test]
    fn test_unsupported_operation() {
        let alu = Alu512::new();
        let out = alu.evaluate(&w(1), &w(2), op::AND, code::SATURATE, 0);
        assert_eq!(out.exception, Exception::UnsupportedOperation);
        assert!(out.result.is_zero());
        assert!(out.flags.trap);
        assert!(!out.flags.carry);
    }

    #[test]
    fn test_divide_by_zero_everywhere() {
        let alu = Alu512::new();
        for (opcode, mode) in [
            (op::DIV, code::NORMAL),
            (op::MOD, code::NORMAL),
            (op::FDIV, code::FLOAT),
            (op::DIV, code::SIMD32),
            (op::DIV, code::SATURATE),
        ] {
            let out = alu.evaluate(&w(42), &Word512::ZERO, opcode, mode, 0);
            assert_eq!(
                out.result,
                Word512::MAX,
                "opcode {opcode:#x} mode {mode:#x}"
            );
            assert_eq!(out.exception, Exception::DivideByZero);
            assert!(out.flags.trap);
        }
        // An unrecognized mode still wins.
        let out = alu.evaluate(&w(42), &Word512::ZERO, op::DIV, 0x7F, 0);
        assert_eq!(out.exception, Exception::UnsupportedMode);
    }

    #[test]
    fn test_float_slot_flags() {
        let alu = Alu512::new();
        let out = alu.evaluate(&w(5), &w(0), op::FDIV, code::FLOAT, 0);
        assert!(out.flags.fp_invalid);
        let out = alu.evaluate(&w(5), &w(3), op::FADD, code::FLOAT, 0);
        assert_eq!(out.result, w(5));
        assert!(!out.flags.fp_invalid);
    }

    #[test]
    fn test_registered_opaque_kernel() {
        let mut alu = Alu512::new();
        alu.register_opaque(op::FADD, |a: &Word512, b: &Word512| a.wrapping_add(b))
            .unwrap();
        let out = alu.evaluate(&w(5), &w(3), op::FADD, code::FLOAT, 0);
        assert_eq!(out.result, w(8));
        assert!(alu.unregister_opaque(op::FADD));
        assert!(!alu.unregister_opaque(op::FADD));
        let out = alu.evaluate(&w(5), &w(3), op::FADD, code::FLOAT, 0);
        assert_eq!(out.result, w(5));
        let rejected = alu.register_opaque(op::MUL, |a: &Word512, _: &Word512| *a);
        assert!(rejected.is_err());
    }

    #[test]
    fn test_shift_source_per_width() {
        // 512: amount from the low 9 bits of b.
        let narrow = Alu512::new().evaluate(&w(1), &w(4), op::SLL, code::NORMAL, 100);
        assert_eq!(narrow.result, w(16));
        // 2048: amount from the shift argument.
        let wide = Alu2048::new().evaluate(
            &Word2048::ONE,
            &Word2048::from_u64(4),
            op::SLL,
            code::NORMAL,
            100,
        );
        assert_eq!(wide.result, Word2048::ONE.shift_left(100));
    }

    #[test]
    fn test_bit_test_and_parity_flags() {
        let alu = Alu512::new();
        let out = alu.evaluate(&w(0b100), &w(2), op::TSTB, code::NORMAL, 0);
        assert_eq!(out.result, Word512::ONE);
        assert!(out.flags.bit_test);
        let out = alu.evaluate(&w(0b111), &w(0), op::PARITY, code::NORMAL, 0);
        assert_eq!(out.result, w(0b111));
        assert!(out.flags.parity);
    }

    #[test]
    fn test_config_width_must_match() {
        let config = AluConfig::for_width(2048).unwrap();
        assert!(matches!(
            Alu512::with_config(config),
            Err(ConfigError::WidthMismatch {
                expected: 512,
                found: 2048
            })
        ));
        assert!(Alu2048::with_config(config).is_ok());
    }

    #[test]
    fn test_config_shift_field_is_checked() {
        let mut config = AluConfig::for_width(2048).unwrap();
        config.shift_source = ShiftSource::Field { bits: 40 };
        assert!(matches!(
            Alu2048::with_config(config),
            Err(ConfigError::ShiftFieldTooWide(40))
        ));
    }
}
