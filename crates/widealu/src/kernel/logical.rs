//! Logical kernel: bitwise lifts of the Boolean operators.

use super::{Kernel, Operands};
use crate::opcode::op;
use crate::word::WideWord;

/// Bitwise operations. NOT is unary on `a`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LogicOp {
    /// `a & b`
    And,
    /// `a | b`
    Or,
    /// `a ^ b`
    Xor,
    /// `!a`
    Not,
    /// `!(a & b)`
    Nand,
    /// `!(a | b)`
    Nor,
    /// `!(a ^ b)`
    Xnor,
}

impl LogicOp {
    /// Decode an opcode from the logical range.
    pub fn from_opcode(opcode: u8) -> Option<Self> {
        match opcode {
            op::AND => Some(Self::And),
            op::OR => Some(Self::Or),
            op::XOR => Some(Self::Xor),
            op::NOT => Some(Self::Not),
            op::NAND => Some(Self::Nand),
            op::NOR => Some(Self::Nor),
            op::XNOR => Some(Self::Xnor),
            _ => None,
        }
    }
}

/// Bitwise logic kernel.
#[derive(Debug, Clone, Copy, Default)]
pub struct Logical;

impl<const L: usize> Kernel<L> for Logical {
    type Op = LogicOp;

    #[inline]
    fn execute(&self, op: LogicOp, operands: &Operands<L>) -> WideWord<L> {
        let (a, b) = (operands.a, operands.b);
        match op {
            LogicOp::And => a & b,
            LogicOp::Or => a | b,
            LogicOp::Xor => a ^ b,
            LogicOp::Not => !a,
            LogicOp::Nand => !(a & b),
            LogicOp::Nor => !(a | b),
            LogicOp::Xnor => !(a ^ b),
        }
    }
}
