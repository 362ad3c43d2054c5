//! SIMD lane kernel.
//!
//! The word is cut into `N / lane_bits` lanes with lane 0 in the low bits.
//! Add and sub wrap within each lane: no carry or borrow crosses a lane
//! boundary. Multiply keeps the long-standing lane convention of using only
//! the low `lane_bits / 2` bits of each lane as multiplicands; the product of
//! two half-lane values always fits the lane, so nothing is truncated.
//!
//! ```
//! use widealu::kernel::{Kernel, Operands, SimdLanes, SimdOp};
//! use widealu::word::Word512;
//!
//! let lanes = SimdLanes::new(8);
//! let a = Word512::from_u64(0x01_FF);
//! let b = Word512::from_u64(0x01_01);
//! // 0xFF + 0x01 wraps to 0x00 in lane 0 and does not carry into lane 1.
//! assert_eq!(lanes.execute(SimdOp::Add, &Operands::new(a, b)), Word512::from_u64(0x02_00));
//! ```

use super::{Kernel, Operands};
use crate::opcode::op;
use crate::word::WideWord;

/// Lane-wise operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SimdOp {
    /// Per-lane wrapping add.
    Add,
    /// Per-lane wrapping subtract.
    Sub,
    /// Per-lane product of the low half-lanes.
    Mul,
}

impl SimdOp {
    /// Decode ADD / SUB / MUL or VADD / VSUB / VMUL.
    pub fn from_opcode(opcode: u8) -> Option<Self> {
        match opcode {
            op::ADD | op::VADD => Some(Self::Add),
            op::SUB | op::VSUB => Some(Self::Sub),
            op::MUL | op::VMUL => Some(Self::Mul),
            _ => None,
        }
    }
}

/// Lane partitioning at a fixed lane width.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SimdLanes {
    lane_bits: u32,
}

impl SimdLanes {
    /// Lanes of `lane_bits` bits. The width must divide N; the mode decoder
    /// only produces powers of two between 8 and N/2.
    #[inline]
    pub const fn new(lane_bits: u32) -> Self {
        Self { lane_bits }
    }

    /// Lane width in bits.
    #[inline]
    pub const fn lane_bits(&self) -> u32 {
        self.lane_bits
    }

    /// Number of lanes in an N-bit word.
    #[inline]
    pub fn lane_count<const L: usize>(&self) -> u32 {
        WideWord::<L>::BITS / self.lane_bits
    }

    /// Lane `index` of `word`, moved down to bit 0.
    #[inline]
    pub fn lane<const L: usize>(&self, word: &WideWord<L>, index: u32) -> WideWord<L> {
        word.extract(index * self.lane_bits, self.lane_bits)
    }

    /// Copy of `word` with lane `index` replaced by the low bits of `value`.
    #[inline]
    pub fn with_lane<const L: usize>(
        &self,
        word: &WideWord<L>,
        index: u32,
        value: &WideWord<L>,
    ) -> WideWord<L> {
        word.deposit(index * self.lane_bits, self.lane_bits, value)
    }

    fn lane_op<const L: usize>(&self, op: SimdOp, x: &WideWord<L>, y: &WideWord<L>) -> WideWord<L> {
        match op {
            SimdOp::Add => x.wrapping_add(y),
            SimdOp::Sub => x.wrapping_sub(y),
            SimdOp::Mul => {
                let half = self.lane_bits / 2;
                x.extract(0, half).wrapping_mul(&y.extract(0, half))
            }
        }
    }
}

impl<const L: usize> Kernel<L> for SimdLanes {
    type Op = SimdOp;

    fn execute(&self, op: SimdOp, operands: &Operands<L>) -> WideWord<L> {
        // Lane results are masked to the lane width by `deposit`, which is
        // what confines carries and borrows to their lane.
        (0..self.lane_count::<L>()).fold(WideWord::ZERO, |acc, i| {
            let x = self.lane(&operands.a, i);
            let y = self.lane(&operands.b, i);
            self.with_lane(&acc, i, &self.lane_op(op, &x, &y))
        })
    }
}
