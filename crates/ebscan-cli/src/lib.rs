//! # ebscan-cli
//!
//! Command-line front end for [`ebscan_parser`]: normalizes hex strings,
//! extracts fields, and decodes single payloads or whole YAML capture files.
//!
//! ```text
//! ebscan hex "<01e2 ff00>"
//! ebscan field 01e2 --length 2 --direction young-old
//! ebscan decode 02a1b2c3d4e5f60718
//! ebscan --format json decode-file capture.yaml
//! ```

mod capture;
mod cli;
mod commands;
mod config;
mod error;

pub use capture::*;
pub use cli::*;
pub use commands::*;
pub use config::*;
pub use error::*;
