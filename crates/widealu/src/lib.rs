//! widealu - Software model of an ultra-wide arithmetic/logic unit
//!
//! One generic core evaluates two N-bit operands, an 8-bit opcode, an 8-bit
//! mode and a shift amount into an N-bit result, a 21-flag record and at
//! most one exception. The width is a const parameter: `WideWord<L>` has
//! `L` 64-bit limbs, and the two supported units are instantiations of the
//! same code.
//!
//! | Unit | Word | Limbs | Shift source | SIMD lanes |
//! |------|------|-------|--------------|------------|
//! | [`Alu512`] | [`Word512`] | 8 | low 9 bits of `b` | 256 … 8 |
//! | [`Alu2048`] | [`Word2048`] | 32 | 11-bit shift field | 1024 … 8 |
//!
//! # Evaluation Model
//!
//! ```text
//! (a, b, opcode, mode, shift)
//!        │
//!        ▼
//!   Mode::decode ──► Route::decode ──► kernel ──► divide rule ──► FlagDeriver
//!        │                 │                                          │
//!        └── unsupported ──┴──────────────────────────────────────────┤
//!                                                                     ▼
//!                                                  Outcome { result, flags, exception }
//! ```
//!
//! Evaluation is a pure function. Exceptions are data inside the
//! [`Outcome`]; nothing panics and nothing is retried.
//!
//! # Modules
//!
//! | Module | Contents |
//! |--------|----------|
//! | [`word`] | `WideWord<L>` and its limb arithmetic |
//! | [`opcode`] | opcode constants and the static category table |
//! | [`mode`] | mode codes and SIMD lane decoding |
//! | [`kernel`] | one pure kernel per operation category |
//! | [`flags`] | `FlagSet` and the flag deriver |
//! | [`alu`] | the dispatcher |
//! | [`pipeline`] | fixed-latency FIFO over the dispatcher |
//! | [`conformance`] | pipeline trace validation |
//! | [`config`] | TOML unit configuration |
//!
//! # Example
//!
//! ```
//! use widealu::prelude::*;
//!
//! let alu = Alu2048::new();
//! let a = Word2048::from_u64(0x80);
//! let b = Word2048::from_u64(0x01);
//!
//! let out = alu.evaluate(&a, &b, op::SUB, code::NORMAL, 0);
//! assert_eq!(out.result, Word2048::from_u64(0x7F));
//! assert_eq!(out.exception, Exception::None);
//!
//! let out = alu.evaluate(&a, &Word2048::ZERO, op::DIV, code::NORMAL, 0);
//! assert_eq!(out.result, Word2048::MAX);
//! assert_eq!(out.exception, Exception::DivideByZero);
//! ```

// Wide integer type
pub mod word;

// Static tables and constants
pub mod constants;
pub mod mode;
pub mod opcode;

// Computation kernels
pub mod kernel;

// Mode x opcode decoding
pub mod route;

// Flag record and derivation
pub mod flags;

// Outcome and exceptions
pub mod outcome;

// Dispatcher
pub mod alu;

// Latency pipeline and its conformance checks
pub mod conformance;
pub mod pipeline;

// Configuration and error types
pub mod config;
pub mod error;

// Re-export core types at crate root
pub use alu::{Alu, Alu2048, Alu512};
pub use config::{AluConfig, PipelineConfig, ShiftSource};
pub use error::{ConfigError, ParseWordError, RegistrationError};
pub use flags::{Flag, FlagDeriver, FlagSet, FLAG_POSITIONS};
pub use mode::Mode;
pub use opcode::{category_of, Category};
pub use outcome::{Exception, Outcome};
pub use pipeline::{Pipeline, Request, Retired};
pub use route::Route;
pub use word::{WideWord, Word2048, Word512};

// Re-export conformance validation
pub use conformance::{validate_trace, ConformanceReport, ConformanceViolation, Criterion};

/// Prelude module for convenient imports.
///
/// ```
/// use widealu::prelude::*;
/// ```
pub mod prelude {
    pub use crate::alu::{Alu, Alu2048, Alu512};
    pub use crate::config::AluConfig;
    pub use crate::flags::{Flag, FlagSet};
    pub use crate::kernel::{Kernel, OpaqueKernel, Operands};
    pub use crate::mode::{code, Mode};
    pub use crate::opcode::{category_of, op, Category};
    pub use crate::outcome::{Exception, Outcome};
    pub use crate::pipeline::{Pipeline, Request, Retired};
    pub use crate::word::{WideWord, Word2048, Word512};
}
