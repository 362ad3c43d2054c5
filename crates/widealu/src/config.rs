//! Unit configuration.
//!
//! An [`AluConfig`] fixes where shift amounts come from and whether results
//! pass through the latency pipeline. Defaults depend on the unit width:
//!
//! | Width | Shift source | Pipeline |
//! |-------|--------------|----------|
//! | 512 | low 9 bits of operand `b` | enabled, latency 3 |
//! | 2048 | low 11 bits of the shift field | enabled, latency 3 |
//!
//! Configurations load from TOML. Every key except `width` is optional:
//!
//! ```toml
//! width = 2048
//!
//! [shift_source]
//! kind = "field"
//! bits = 11
//!
//! [pipeline]
//! enabled = true
//! latency = 3
//! ```

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::constants::{
    DEFAULT_PIPELINE_LATENCY, SHIFT_FIELD_BITS_2048, SHIFT_OPERAND_BITS_512, UNIT_BITS_512,
    UNIT_WIDTHS,
};
use crate::error::ConfigError;
use crate::word::WideWord;

/// Width of the `shift_amount` argument of `evaluate`.
pub const SHIFT_ARGUMENT_BITS: u32 = 16;

/// Where the shift / rotate amount is read from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ShiftSource {
    /// The low `bits` bits of the dedicated shift argument.
    Field {
        /// Field width.
        bits: u32,
    },
    /// The low `bits` bits of operand `b`.
    OperandB {
        /// Field width.
        bits: u32,
    },
}

impl ShiftSource {
    /// Default source for a unit of `unit_bits`.
    pub fn for_width(unit_bits: u32) -> Self {
        if unit_bits == UNIT_BITS_512 {
            Self::OperandB {
                bits: SHIFT_OPERAND_BITS_512,
            }
        } else {
            Self::Field {
                bits: SHIFT_FIELD_BITS_2048,
            }
        }
    }

    /// Field width in bits.
    pub fn bits(self) -> u32 {
        match self {
            Self::Field { bits } | Self::OperandB { bits } => bits,
        }
    }

    /// The shift amount for one evaluation.
    pub fn resolve<const L: usize>(self, field: u16, b: &WideWord<L>) -> u32 {
        let mask = |bits: u32| -> u64 {
            if bits >= 64 {
                u64::MAX
            } else {
                (1u64 << bits) - 1
            }
        };
        match self {
            Self::Field { bits } => (u64::from(field) & mask(bits)) as u32,
            Self::OperandB { bits } => (b.low_u64() & mask(bits)) as u32,
        }
    }
}

/// Latency pipeline settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PipelineConfig {
    /// When false, results are visible in the step they are computed.
    #[serde(default = "default_enabled")]
    pub enabled: bool,
    /// Steps between admission and visibility.
    #[serde(default = "default_latency")]
    pub latency: usize,
}

fn default_enabled() -> bool {
    true
}

fn default_latency() -> usize {
    DEFAULT_PIPELINE_LATENCY
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            enabled: default_enabled(),
            latency: default_latency(),
        }
    }
}

impl PipelineConfig {
    /// Latency actually applied: 0 when the pipeline is disabled.
    #[inline]
    pub fn effective_latency(&self) -> usize {
        if self.enabled {
            self.latency
        } else {
            0
        }
    }
}

/// Configuration of one unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct AluConfig {
    /// Unit width in bits (512 or 2048).
    pub width: u32,
    /// Shift amount source.
    pub shift_source: ShiftSource,
    /// Pipeline settings.
    pub pipeline: PipelineConfig,
}

/// On-disk shape; missing sections take width-dependent defaults.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawConfig {
    width: u32,
    shift_source: Option<ShiftSource>,
    #[serde(default)]
    pipeline: PipelineConfig,
}

impl AluConfig {
    /// Defaults for a unit of `width` bits.
    pub fn for_width(width: u32) -> Result<Self, ConfigError> {
        Self {
            width,
            shift_source: ShiftSource::for_width(width),
            pipeline: PipelineConfig::default(),
        }
        .validated()
    }

    /// Parse a TOML document.
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        let raw: RawConfig = toml::from_str(text)?;
        Self {
            width: raw.width,
            shift_source: raw
                .shift_source
                .unwrap_or_else(|| ShiftSource::for_width(raw.width)),
            pipeline: raw.pipeline,
        }
        .validated()
    }

    /// Read and parse a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&text)
    }

    /// Render as TOML.
    pub fn to_toml_string(&self) -> Result<String, ConfigError> {
        Ok(toml::to_string(self)?)
    }

    pub(crate) fn validated(self) -> Result<Self, ConfigError> {
        if !UNIT_WIDTHS.contains(&self.width) {
            return Err(ConfigError::UnsupportedWidth(self.width));
        }
        let bits = self.shift_source.bits();
        if bits > SHIFT_ARGUMENT_BITS {
            return Err(ConfigError::ShiftFieldTooWide(bits));
        }
        Ok(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::word::Word512;

    #[test]
    fn test_width_defaults() {
        let narrow = AluConfig::for_width(512).unwrap();
        assert_eq!(narrow.shift_source, ShiftSource::OperandB { bits: 9 });
        let wide = AluConfig::for_width(2048).unwrap();
        assert_eq!(wide.shift_source, ShiftSource::Field { bits: 11 });
        assert_eq!(wide.pipeline.effective_latency(), 3);
        assert!(matches!(
            AluConfig::for_width(1024),
            Err(ConfigError::UnsupportedWidth(1024))
        ));
    }

    #[test]
    fn test_parse_minimal() {
        let config = AluConfig::from_toml_str("width = 512").unwrap();
        assert_eq!(config, AluConfig::for_width(512).unwrap());
    }

    #[test]
    fn test_parse_full() {
        let text = r#"
            width = 2048

            [shift_source]
            kind = "operand_b"
            bits = 12

            [pipeline]
            enabled = false
        "#;
        let config = AluConfig::from_toml_str(text).unwrap();
        assert_eq!(config.shift_source, ShiftSource::OperandB { bits: 12 });
        assert_eq!(config.pipeline.latency, 3);
        assert_eq!(config.pipeline.effective_latency(), 0);
    }

    #[test]
    fn test_parse_rejects_bad_input() {
        assert!(matches!(
            AluConfig::from_toml_str("width = \"wide\""),
            Err(ConfigError::Parse(_))
        ));
        assert!(matches!(
            AluConfig::from_toml_str("width = 512\nspeed = 3"),
            Err(ConfigError::Parse(_))
        ));
        let too_wide = "width = 512\n[shift_source]\nkind = \"field\"\nbits = 17";
        assert!(matches!(
            AluConfig::from_toml_str(too_wide),
            Err(ConfigError::ShiftFieldTooWide(17))
        ));
    }

    #[test]
    fn test_toml_round_trip() {
        let config = AluConfig::for_width(2048).unwrap();
        let text = config.to_toml_string().unwrap();
        assert_eq!(AluConfig::from_toml_str(&text).unwrap(), config);
    }

    #[test]
    fn test_resolve_shift() {
        let b = Word512::from_u64(0x1234);
        let field = ShiftSource::Field { bits: 11 };
        assert_eq!(field.resolve(0xFFFF, &b), 0x7FF);
        let operand = ShiftSource::OperandB { bits: 9 };
        assert_eq!(operand.resolve(0xFFFF, &b), 0x034);
    }

    #[test]
    fn test_missing_file() {
        let err = AluConfig::load("/nonexistent/widealu.toml").unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
    }
}
