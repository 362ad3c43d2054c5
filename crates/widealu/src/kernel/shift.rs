//! Shift / rotate kernel (barrel shifter).
//!
//! Shift amounts are not reduced: an amount `>= N` gives all zeros for SLL
//! and SRL and all sign bits for SRA. Rotate amounts are taken mod N.

use super::{Kernel, Operands};
use crate::opcode::op;
use crate::word::WideWord;

/// Shift and rotate operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ShiftOp {
    /// Logical left, zero-fill.
    Sll,
    /// Logical right, zero-fill.
    Srl,
    /// Arithmetic right, sign-fill.
    Sra,
    /// Rotate left.
    Rol,
    /// Rotate right.
    Ror,
}

impl ShiftOp {
    /// Decode an opcode from the shift range.
    pub fn from_opcode(opcode: u8) -> Option<Self> {
        match opcode {
            op::SLL => Some(Self::Sll),
            op::SRL => Some(Self::Srl),
            op::SRA => Some(Self::Sra),
            op::ROL => Some(Self::Rol),
            op::ROR => Some(Self::Ror),
            _ => None,
        }
    }
}

/// Barrel shifter.
#[derive(Debug, Clone, Copy, Default)]
pub struct ShiftRotate;

impl ShiftRotate {
    /// The last bit shifted out of `a` by `op` (false for rotations and for a
    /// zero amount).
    pub fn shifted_out<const L: usize>(op: ShiftOp, a: &WideWord<L>, amount: u32) -> bool {
        let bits = WideWord::<L>::BITS;
        if amount == 0 {
            return false;
        }
        match op {
            ShiftOp::Sll => amount <= bits && a.bit(bits - amount),
            ShiftOp::Srl => amount <= bits && a.bit(amount - 1),
            ShiftOp::Sra => {
                if amount <= bits {
                    a.bit(amount - 1)
                } else {
                    a.is_negative()
                }
            }
            ShiftOp::Rol | ShiftOp::Ror => false,
        }
    }
}

impl<const L: usize> Kernel<L> for ShiftRotate {
    type Op = ShiftOp;

    #[inline]
    fn execute(&self, op: ShiftOp, operands: &Operands<L>) -> WideWord<L> {
        let a = &operands.a;
        let amount = operands.shift;
        match op {
            ShiftOp::Sll => a.shift_left(amount),
            ShiftOp::Srl => a.shift_right(amount),
            ShiftOp::Sra => a.shift_right_arith(amount),
            ShiftOp::Rol => a.rotate_left(amount),
            ShiftOp::Ror => a.rotate_right(amount),
        }
    }
}
