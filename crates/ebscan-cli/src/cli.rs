//! Command-line arguments.

use std::path::PathBuf;

use clap::{ArgAction, Parser, Subcommand, ValueEnum};
use ebscan_parser::ByteDirection;

use crate::{CliResult, OutputFormat, ScanConfig};

/// Decode Estimote beacon advertisements.
#[derive(Debug, Parser)]
#[command(name = "ebscan", version, about)]
pub struct Cli {
    /// YAML config file.
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Output format (overrides the config file).
    #[arg(long, value_enum, global = true)]
    pub format: Option<OutputFormat>,

    /// Raise log verbosity (-v info, -vv debug, -vvv trace).
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Normalize a hex string or data description such as "<01e2 ff00>".
    Hex {
        input: String,
    },

    /// Extract a field from a hex string.
    Field {
        input: String,
        /// Offset in hex characters.
        #[arg(long, default_value_t = 0)]
        offset: usize,
        /// Length in bytes.
        #[arg(long)]
        length: usize,
        #[arg(long, value_enum, default_value_t = Direction::OldYoung)]
        direction: Direction,
    },

    /// Decode a raw Estimote payload given as hex.
    Decode {
        input: String,
    },

    /// Decode every advertisement in a YAML capture file.
    DecodeFile {
        path: PathBuf,
    },
}

/// Byte direction as spelled on the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Direction {
    /// Most significant byte first.
    OldYoung,
    /// Least significant byte first.
    YoungOld,
}

impl From<Direction> for ByteDirection {
    fn from(direction: Direction) -> Self {
        match direction {
            Direction::OldYoung => ByteDirection::OldYoung,
            Direction::YoungOld => ByteDirection::YoungOld,
        }
    }
}

impl Cli {
    /// Config file contents (or defaults) with command-line overrides applied.
    pub fn resolve_config(&self) -> CliResult<ScanConfig> {
        let mut config = match self.config {
            Some(ref path) => ScanConfig::load(path)?,
            None => ScanConfig::default(),
        };
        if let Some(format) = self.format {
            config.format = format;
        }
        Ok(config)
    }
}
