//! # ebscan-parser
//!
//! Parsing of Bluetooth Low Energy advertisements sent by Estimote Next-Gen
//! beacons.
//!
//! The crate is a set of stateless functions over byte buffers and hex
//! strings:
//!
//! - **Hex codec** ([`hex_string_from_data`], [`bytes_from_hex_string`],
//!   [`string_from_hex`], [`unsigned_from_hex`]) with a [`ByteDirection`]
//!   selector for multi-byte fields
//! - **Frame classification** ([`parse_frame_type`], [`parse_frame_type_int`])
//!   into the closed [`ScanFrameType`] enumeration
//! - **Two-pass advertisement parsing**: the protocol version is read first,
//!   then the frame type and identifier at version-dependent positions
//!
//! # Example
//!
//! ```
//! use ebscan_parser::{decode_payload, ProtocolVersion, ScanFrameType};
//!
//! let payload = [0x02, 0xA1, 0xB2, 0xC3, 0xD4, 0xE5, 0xF6, 0x07, 0x18];
//! let info = decode_payload(&payload)?;
//!
//! assert_eq!(info.protocol_version, ProtocolVersion::V0);
//! assert_eq!(info.frame_type, ScanFrameType::EstimoteTelemetry);
//! assert_eq!(info.identifier, "a1b2c3d4e5f60718");
//! # Ok::<(), ebscan_parser::ScanError>(())
//! ```

mod advertisement;
mod codec;
mod constants;
mod error;
mod frame;
mod scan_info;

pub use advertisement::*;
pub use codec::*;
pub use constants::*;
pub use error::*;
pub use frame::*;
pub use scan_info::*;

/// Result type for parsing operations.
pub type Result<T> = std::result::Result<T, ScanError>;
