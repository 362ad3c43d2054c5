//! Pipeline conformance validation.
//!
//! Checks a retirement trace produced by [`Pipeline`](crate::Pipeline)
//! against the latency contract.
//!
//! # Criteria
//!
//! | Criterion | Requirement |
//! |-----------|-------------|
//! | Latency | `visible_at == admitted_at + S` for every retirement |
//! | Ordering | sequence numbers rise by exactly one (strict FIFO) |
//! | Throughput | at most one admission and one retirement per step |
//!
//! # Usage
//!
//! ```
//! use widealu::conformance::validate_trace;
//! use widealu::mode::code;
//! use widealu::opcode::op;
//! use widealu::word::Word512;
//! use widealu::{Alu512, Pipeline, Request};
//!
//! let mut pipe = Pipeline::with_latency(Alu512::new(), 3);
//! let requests = (0..8).map(|i| {
//!     Request::new(Word512::from_u64(i), Word512::ONE, op::ADD, code::NORMAL)
//! });
//! let trace = pipe.run(requests);
//! let report = validate_trace(3, &trace);
//! assert!(report.is_conformant(), "{report}");
//! ```

use core::fmt;

use crate::pipeline::Retired;

// =============================================================================
// CONFORMANCE VIOLATION
// =============================================================================

/// Which criterion a violation breaks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Criterion {
    /// Visibility step is not admission step plus latency.
    Latency,
    /// Retirements are out of admission order or skip a request.
    Ordering,
    /// Two retirements (or two admissions) share a step.
    Throughput,
}

impl fmt::Display for Criterion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Latency => write!(f, "LATENCY"),
            Self::Ordering => write!(f, "ORDERING"),
            Self::Throughput => write!(f, "THROUGHPUT"),
        }
    }
}

/// A single failed check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConformanceViolation {
    /// Criterion broken.
    pub criterion: Criterion,
    /// Sequence number of the offending retirement.
    pub seq: u64,
    /// Measured value.
    pub measured: u64,
    /// Value the contract requires.
    pub expected: u64,
}

impl fmt::Display for ConformanceViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let what = match self.criterion {
            Criterion::Latency => "visible at step",
            Criterion::Ordering => "retired with sequence number",
            Criterion::Throughput => "shares step",
        };
        write!(
            f,
            "{} VIOLATION: request #{} {} {} (expected {})",
            self.criterion, self.seq, what, self.measured, self.expected
        )
    }
}

// =============================================================================
// CONFORMANCE REPORT
// =============================================================================

/// Outcome of validating one trace.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConformanceReport {
    /// Latency the trace was checked against.
    pub latency: u64,
    /// Number of retirements examined.
    pub retired: usize,
    /// Every failed check, in trace order.
    pub violations: Vec<ConformanceViolation>,
}

impl ConformanceReport {
    /// True when no check failed.
    #[must_use]
    pub fn is_conformant(&self) -> bool {
        self.violations.is_empty()
    }

    /// Violations of one criterion.
    pub fn violations_of(
        &self,
        criterion: Criterion,
    ) -> impl Iterator<Item = &ConformanceViolation> {
        self.violations
            .iter()
            .filter(move |v| v.criterion == criterion)
    }
}

impl fmt::Display for ConformanceReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Pipeline Conformance Report")?;
        writeln!(f, "===========================")?;
        writeln!(f, "Latency:  {} steps", self.latency)?;
        writeln!(f, "Retired:  {}", self.retired)?;
        if self.is_conformant() {
            write!(f, "Verdict:  CONFORMANT")
        } else {
            let count = self.violations.len();
            writeln!(f, "Verdict:  NON-CONFORMANT ({count} violations)")?;
            for v in &self.violations {
                writeln!(f, "  - {v}")?;
            }
            Ok(())
        }
    }
}

// =============================================================================
// VALIDATION
// =============================================================================

/// Validate a retirement trace against a latency of `latency` steps.
///
/// The trace must be in retirement order, as returned by
/// [`Pipeline::run`](crate::Pipeline::run) or collected from
/// [`Pipeline::cycle`](crate::Pipeline::cycle).
pub fn validate_trace<const L: usize>(latency: usize, trace: &[Retired<L>]) -> ConformanceReport {
    let latency = latency as u64;
    let mut report = ConformanceReport {
        latency,
        retired: trace.len(),
        violations: Vec::new(),
    };

    let mut previous: Option<&Retired<L>> = None;
    for (i, r) in trace.iter().enumerate() {
        let expected_visible = r.admitted_at + latency;
        if r.visible_at != expected_visible {
            report.violations.push(ConformanceViolation {
                criterion: Criterion::Latency,
                seq: r.seq,
                measured: r.visible_at,
                expected: expected_visible,
            });
        }

        let expected_seq = previous.map_or(0, |p| p.seq + 1);
        if i > 0 && r.seq != expected_seq {
            report.violations.push(ConformanceViolation {
                criterion: Criterion::Ordering,
                seq: r.seq,
                measured: r.seq,
                expected: expected_seq,
            });
        }

        if let Some(p) = previous {
            if r.visible_at <= p.visible_at {
                report.violations.push(ConformanceViolation {
                    criterion: Criterion::Throughput,
                    seq: r.seq,
                    measured: r.visible_at,
                    expected: p.visible_at + 1,
                });
            } else if r.admitted_at <= p.admitted_at {
                report.violations.push(ConformanceViolation {
                    criterion: Criterion::Throughput,
                    seq: r.seq,
                    measured: r.admitted_at,
                    expected: p.admitted_at + 1,
                });
            }
        }
        previous = Some(r);
    }
    report
}
