//! Evaluation results.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::flags::FlagSet;
use crate::word::WideWord;

/// The single exception an evaluation may report.
///
/// Exceptions are data: every evaluation completes and returns an
/// [`Outcome`]. Use [`Outcome::into_result`] to turn one into an error.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, Error)]
#[serde(rename_all = "snake_case")]
pub enum Exception {
    /// Nothing went wrong.
    #[default]
    #[error("no exception")]
    None,
    /// DIV, MOD or FDIV with a zero divisor; the result is all-ones.
    #[error("divide by zero")]
    DivideByZero,
    /// The mode is recognized but does not accept the opcode.
    #[error("unsupported operation")]
    UnsupportedOperation,
    /// The mode code is not recognized by this unit width.
    #[error("unsupported mode")]
    UnsupportedMode,
}

impl Exception {
    /// True for anything but [`Exception::None`].
    #[inline]
    pub fn is_set(self) -> bool {
        self != Self::None
    }
}

/// Result word, flags and exception of one evaluation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(bound = "")]
pub struct Outcome<const L: usize> {
    /// The N-bit result.
    pub result: WideWord<L>,
    /// Derived flags.
    pub flags: FlagSet,
    /// Reported exception.
    pub exception: Exception,
}

impl<const L: usize> Outcome<L> {
    /// The result, or the exception if one was raised.
    pub fn into_result(self) -> Result<WideWord<L>, Exception> {
        match self.exception {
            Exception::None => Ok(self.result),
            raised => Err(raised),
        }
    }
}
