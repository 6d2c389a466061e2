//! YAML configuration for the `ebscan` tool.
//!
//! ```yaml
//! format: json
//! log_level: info
//! fallback_to_manufacturer_data: true
//! default_protocol_version: V1
//! ```

use std::path::Path;

use clap::ValueEnum;
use ebscan_parser::{ProtocolVersion, ScanOptions};
use serde::{Deserialize, Serialize};
use tracing_subscriber::EnvFilter;

use crate::CliResult;

/// How command results are printed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// One human-readable line per result.
    #[default]
    Text,
    /// Pretty-printed JSON.
    Json,
}

/// Tool configuration. Every field is optional in the file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScanConfig {
    pub format: OutputFormat,
    /// Filter directive used when `RUST_LOG` is unset.
    pub log_level: String,
    pub fallback_to_manufacturer_data: bool,
    pub default_protocol_version: Option<ProtocolVersion>,
}

impl Default for ScanConfig {
    fn default() -> Self {
        ScanConfig {
            format: OutputFormat::Text,
            log_level: "warn".to_string(),
            fallback_to_manufacturer_data: true,
            default_protocol_version: None,
        }
    }
}

impl ScanConfig {
    /// Load a config file.
    pub fn load(path: impl AsRef<Path>) -> CliResult<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_yaml(&text)
    }

    /// Parse config from YAML text.
    pub fn from_yaml(text: &str) -> CliResult<Self> {
        Ok(serde_yaml::from_str(text)?)
    }

    /// Decoder options derived from this config.
    pub fn scan_options(&self) -> ScanOptions {
        ScanOptions {
            fallback_to_manufacturer_data: self.fallback_to_manufacturer_data,
            default_protocol_version: self.default_protocol_version,
        }
    }

    /// Log filter directive, raised by `-v` flags.
    pub fn log_directive(&self, verbose: u8) -> &str {
        match verbose {
            0 => self.log_level.as_str(),
            1 => "info",
            2 => "debug",
            _ => "trace",
        }
    }
}

/// Install the global tracing subscriber. `RUST_LOG` wins over `directive`.
pub fn init_logging(directive: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(directive));

    // Already installed when called twice (e.g. from tests); keep the first.
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}
