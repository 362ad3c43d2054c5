//! Error types for the fallible edges of the library.
//!
//! Evaluation itself never fails: exceptions raised by an operation are data
//! inside [`Outcome`](crate::Outcome). The errors here cover parsing,
//! configuration and extension registration.

use std::path::PathBuf;

use thiserror::Error;

/// Failure to parse a wide word from text.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseWordError {
    /// No digits were supplied.
    #[error("empty operand")]
    Empty,
    /// A character outside the radix.
    #[error("invalid digit {digit:?} in operand")]
    InvalidDigit {
        /// The offending character.
        digit: char,
    },
    /// The value needs more bits than the word has.
    #[error("operand does not fit in {bits} bits")]
    TooWide {
        /// Word width in bits.
        bits: u32,
    },
}

/// Failure to load or validate an [`AluConfig`](crate::config::AluConfig).
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The configuration file could not be read.
    #[error("failed to read {path}: {source}")]
    Io {
        /// Path that was read.
        path: PathBuf,
        /// Underlying error.
        #[source]
        source: std::io::Error,
    },
    /// The TOML document is malformed or has the wrong shape.
    #[error("invalid configuration: {0}")]
    Parse(#[from] toml::de::Error),
    /// The configuration could not be rendered as TOML.
    #[error("failed to render configuration: {0}")]
    Render(#[from] toml::ser::Error),
    /// The unit width is not one of the supported instantiations.
    #[error("unsupported unit width {0} (expected 512 or 2048)")]
    UnsupportedWidth(u32),
    /// The configuration describes a different unit width.
    #[error("configuration is for a {found}-bit unit, expected {expected} bits")]
    WidthMismatch {
        /// Width of the unit being configured.
        expected: u32,
        /// Width named by the configuration.
        found: u32,
    },
    /// The shift-amount field is wider than the dispatcher accepts.
    #[error("shift field of {0} bits exceeds the 16-bit shift operand")]
    ShiftFieldTooWide(u32),
}

/// Failure to register an opaque kernel.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegistrationError {
    /// The opcode does not name an opaque slot (Float, Crypto or CROSS).
    #[error("opcode {opcode:#04x} is not an opaque kernel slot")]
    NotOpaque {
        /// The rejected opcode.
        opcode: u8,
    },
}
