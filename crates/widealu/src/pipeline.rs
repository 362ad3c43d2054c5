//! Fixed-latency pipeline model.
//!
//! The pipeline wraps an [`Alu`] with `S` latency stages. Time is a step
//! counter, not a clock:
//!
//! - at most one request is admitted per step;
//! - a request admitted at step `t` becomes visible at step `t + S`;
//! - results become visible in admission order, one per step at most;
//! - an admitted request cannot be cancelled.
//!
//! With the pipeline disabled (`S = 0`) a request is visible in the step it
//! is admitted.
//!
//! ```
//! use widealu::{Alu512, Pipeline, Request};
//! use widealu::mode::code;
//! use widealu::opcode::op;
//! use widealu::word::Word512;
//!
//! let mut pipe = Pipeline::new(Alu512::new());
//! let req = Request::new(Word512::from_u64(2), Word512::from_u64(3), op::ADD, code::NORMAL);
//! assert!(pipe.cycle(Some(req)).is_none()); // step 0: admitted
//! assert!(pipe.cycle(None).is_none());      // step 1
//! assert!(pipe.cycle(None).is_none());      // step 2
//! let retired = pipe.cycle(None).unwrap();  // step 3: visible
//! assert_eq!(retired.visible_at, 3);
//! assert_eq!(retired.outcome.result, Word512::from_u64(5));
//! ```

use std::collections::VecDeque;

use log::debug;
use serde::{Deserialize, Serialize};

use crate::alu::Alu;
use crate::outcome::Outcome;
use crate::word::WideWord;

/// One request for the pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(bound = "")]
pub struct Request<const L: usize> {
    /// First operand.
    pub a: WideWord<L>,
    /// Second operand.
    pub b: WideWord<L>,
    /// Opcode.
    pub opcode: u8,
    /// Mode code.
    pub mode: u8,
    /// Shift field.
    #[serde(default)]
    pub shift: u16,
}

impl<const L: usize> Request<L> {
    /// A request with a zero shift field.
    pub fn new(a: WideWord<L>, b: WideWord<L>, opcode: u8, mode: u8) -> Self {
        Self {
            a,
            b,
            opcode,
            mode,
            shift: 0,
        }
    }

    /// Set the shift field.
    pub fn with_shift(mut self, shift: u16) -> Self {
        self.shift = shift;
        self
    }
}

/// A request whose outcome has become visible.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(bound = "")]
pub struct Retired<const L: usize> {
    /// Admission order, from 0.
    pub seq: u64,
    /// Step the request was admitted in.
    pub admitted_at: u64,
    /// Step the outcome became visible in.
    pub visible_at: u64,
    /// The outcome.
    pub outcome: Outcome<L>,
}

#[derive(Debug, Clone)]
struct Slot<const L: usize> {
    seq: u64,
    admitted_at: u64,
    visible_at: u64,
    outcome: Outcome<L>,
}

/// Latency pipeline over an [`Alu`].
#[derive(Debug, Clone)]
pub struct Pipeline<const L: usize> {
    alu: Alu<L>,
    latency: u64,
    in_flight: VecDeque<Slot<L>>,
    step: u64,
    next_seq: u64,
}

impl<const L: usize> Pipeline<L> {
    /// Pipeline using the unit's configured latency.
    pub fn new(alu: Alu<L>) -> Self {
        let latency = alu.config().pipeline.effective_latency();
        Self::with_latency(alu, latency)
    }

    /// Pipeline with an explicit latency.
    pub fn with_latency(alu: Alu<L>, latency: usize) -> Self {
        Self {
            alu,
            latency: latency as u64,
            in_flight: VecDeque::with_capacity(latency + 1),
            step: 0,
            next_seq: 0,
        }
    }

    /// Latency in steps.
    #[inline]
    pub fn latency(&self) -> usize {
        self.latency as usize
    }

    /// The current step (the one the next `cycle` call executes).
    #[inline]
    pub fn step(&self) -> u64 {
        self.step
    }

    /// Number of admitted requests not yet visible.
    #[inline]
    pub fn in_flight(&self) -> usize {
        self.in_flight.len()
    }

    /// The wrapped unit.
    #[inline]
    pub fn alu(&self) -> &Alu<L> {
        &self.alu
    }

    /// Run one step: admit `request` (if any), retire the request that
    /// becomes visible in this step (if any), then advance the step counter.
    pub fn cycle(&mut self, request: Option<Request<L>>) -> Option<Retired<L>> {
        if let Some(req) = request {
            let outcome = self
                .alu
                .evaluate(&req.a, &req.b, req.opcode, req.mode, req.shift);
            let slot = Slot {
                seq: self.next_seq,
                admitted_at: self.step,
                visible_at: self.step + self.latency,
                outcome,
            };
            debug!(
                "step {}: admitted #{} (visible at step {})",
                self.step, slot.seq, slot.visible_at
            );
            self.next_seq += 1;
            self.in_flight.push_back(slot);
        }

        let retired = match self.in_flight.front() {
            Some(slot) if slot.visible_at == self.step => {
                self.in_flight.pop_front().map(|slot| Retired {
                    seq: slot.seq,
                    admitted_at: slot.admitted_at,
                    visible_at: slot.visible_at,
                    outcome: slot.outcome,
                })
            }
            _ => None,
        };
        if let Some(r) = &retired {
            debug!(
                "step {}: retired #{} ({:?})",
                self.step, r.seq, r.outcome.exception
            );
        }

        self.step += 1;
        retired
    }

    /// Run empty steps until nothing is in flight.
    pub fn drain(&mut self) -> Vec<Retired<L>> {
        let mut retired = Vec::with_capacity(self.in_flight.len());
        while !self.in_flight.is_empty() {
            retired.extend(self.cycle(None));
        }
        retired
    }

    /// Admit every request, one per step, then drain.
    pub fn run<I>(&mut self, requests: I) -> Vec<Retired<L>>
    where
        I: IntoIterator<Item = Request<L>>,
    {
        let mut retired: Vec<Retired<L>> = requests
            .into_iter()
            .filter_map(|req| self.cycle(Some(req)))
            .collect();
        retired.extend(self.drain());
        retired
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::alu::Alu512;
    use crate::mode::code;
    use crate::opcode::op;
    use crate::outcome::Exception;
    use crate::word::Word512;

    fn add(x: u64) -> Request<8> {
        Request::new(Word512::from_u64(x), Word512::ONE, op::ADD, code::NORMAL)
    }

    #[test]
    fn test_zero_latency_is_same_step() {
        let mut pipe = Pipeline::with_latency(Alu512::new(), 0);
        let r = pipe.cycle(Some(add(1))).unwrap();
        assert_eq!((r.admitted_at, r.visible_at), (0, 0));
        assert_eq!(r.outcome.result, Word512::from_u64(2));
        assert_eq!(pipe.in_flight(), 0);
    }

    #[test]
    fn test_back_to_back_fifo() {
        let mut pipe = Pipeline::with_latency(Alu512::new(), 3);
        let retired = pipe.run((0..5).map(add));
        assert_eq!(retired.len(), 5);
        for (i, r) in retired.iter().enumerate() {
            assert_eq!(r.seq, i as u64);
            assert_eq!(r.admitted_at, i as u64);
            assert_eq!(r.visible_at, i as u64 + 3);
            assert_eq!(r.outcome.result, Word512::from_u64(i as u64 + 1));
        }
        assert_eq!(pipe.step(), 8);
    }

    #[test]
    fn test_bubbles_keep_latency() {
        let mut pipe = Pipeline::with_latency(Alu512::new(), 2);
        assert!(pipe.cycle(Some(add(0))).is_none()); // step 0
        assert!(pipe.cycle(None).is_none()); // step 1
        let first = pipe.cycle(Some(add(1))).unwrap(); // step 2
        assert_eq!(first.seq, 0);
        let rest = pipe.drain();
        assert_eq!(rest.len(), 1);
        assert_eq!(rest[0].admitted_at, 2);
        assert_eq!(rest[0].visible_at, 4);
    }

    #[test]
    fn test_fault_is_local_to_its_slot() {
        let mut pipe = Pipeline::with_latency(Alu512::new(), 1);
        let bad = Request::new(Word512::ONE, Word512::ZERO, op::DIV, code::NORMAL);
        let retired = pipe.run([add(1), bad, add(2)]);
        let exceptions: Vec<Exception> = retired.iter().map(|r| r.outcome.exception).collect();
        assert_eq!(
            exceptions,
            [Exception::None, Exception::DivideByZero, Exception::None]
        );
        assert_eq!(retired[2].outcome.result, Word512::from_u64(3));
    }

    #[test]
    fn test_disabled_config_means_zero_latency() {
        let mut config = crate::config::AluConfig::for_width(512).unwrap();
        config.pipeline.enabled = false;
        let pipe = Pipeline::new(Alu512::with_config(config).unwrap());
        assert_eq!(pipe.latency(), 0);
        assert_eq!(Pipeline::new(Alu512::new()).latency(), 3);
    }
}
