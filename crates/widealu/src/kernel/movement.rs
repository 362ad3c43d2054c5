//! Data movement kernel.

use super::{Kernel, Operands};
use crate::opcode::op;
use crate::word::WideWord;

/// Data movement operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MoveOp {
    /// Copy `a`.
    Mov,
    /// Copy `b`.
    MovB,
    /// All zeros.
    Clear,
    /// All ones.
    Fill,
    /// Exchange the low and high halves of `a`.
    SwapHalves,
}

impl MoveOp {
    /// Decode an opcode from the data movement range.
    pub fn from_opcode(opcode: u8) -> Option<Self> {
        match opcode {
            op::MOV => Some(Self::Mov),
            op::MOVB => Some(Self::MovB),
            op::CLR => Some(Self::Clear),
            op::FILL => Some(Self::Fill),
            op::SWAPH => Some(Self::SwapHalves),
            _ => None,
        }
    }
}

/// Register-style moves.
#[derive(Debug, Clone, Copy, Default)]
pub struct DataMovement;

impl<const L: usize> Kernel<L> for DataMovement {
    type Op = MoveOp;

    #[inline]
    fn execute(&self, op: MoveOp, operands: &Operands<L>) -> WideWord<L> {
        match op {
            MoveOp::Mov => operands.a,
            MoveOp::MovB => operands.b,
            MoveOp::Clear => WideWord::ZERO,
            MoveOp::Fill => WideWord::MAX,
            MoveOp::SwapHalves => operands.a.rotate_left(WideWord::<L>::BITS / 2),
        }
    }
}
