//! Frame header classification.
//!
//! Every Estimote Next-Gen payload starts with a header byte:
//!
//! ```text
//! +---------+---------+
//! | 7 ... 4 | 3 ... 0 |
//! | version |   tag   |
//! +---------+---------+
//! ```

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::{
    Result, ScanError, FRAME_TAG_MASK, FRAME_TAG_MESH, FRAME_TAG_MIRROR,
    FRAME_TAG_SERVICE_DEVICE, FRAME_TAG_TELEMETRY, FULL_IDENTIFIER_LEN,
    PROTOCOL_VERSION_SHIFT, SHORT_IDENTIFIER_LEN,
};

/// Payload framing scheme of a beacon advertisement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ScanFrameType {
    /// Unknown frame type, also returned on parse failure.
    Unknown,
    /// Service data (connectivity) frame.
    ServiceDevice,
    /// Estimote Telemetry frame.
    EstimoteTelemetry,
    /// Estimote Mirror frame.
    Mirror,
    /// Estimote Mesh frame.
    Mesh,
}

impl ScanFrameType {
    /// Classify a raw frame tag.
    pub fn from_tag(tag: u8) -> Self {
        match tag {
            FRAME_TAG_SERVICE_DEVICE => ScanFrameType::ServiceDevice,
            FRAME_TAG_TELEMETRY => ScanFrameType::EstimoteTelemetry,
            FRAME_TAG_MIRROR => ScanFrameType::Mirror,
            FRAME_TAG_MESH => ScanFrameType::Mesh,
            _ => ScanFrameType::Unknown,
        }
    }

    /// Raw tag for this frame type. `Unknown` has no tag on the wire and
    /// maps to 0.
    pub fn tag(self) -> u8 {
        match self {
            ScanFrameType::Unknown => 0,
            ScanFrameType::ServiceDevice => FRAME_TAG_SERVICE_DEVICE,
            ScanFrameType::EstimoteTelemetry => FRAME_TAG_TELEMETRY,
            ScanFrameType::Mirror => FRAME_TAG_MIRROR,
            ScanFrameType::Mesh => FRAME_TAG_MESH,
        }
    }

    /// Whether this is a recognized frame type.
    pub fn is_known(self) -> bool {
        self != ScanFrameType::Unknown
    }
}

impl fmt::Display for ScanFrameType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ScanFrameType::Unknown => "unknown",
            ScanFrameType::ServiceDevice => "service-device",
            ScanFrameType::EstimoteTelemetry => "estimote-telemetry",
            ScanFrameType::Mirror => "mirror",
            ScanFrameType::Mesh => "mesh",
        };
        f.write_str(name)
    }
}

/// Indoor protocol version, carried in the high nibble of the header byte.
///
/// The version decides where the frame type and the identifier live:
///
/// | version | frame type           | identifier             |
/// |---------|----------------------|------------------------|
/// | V0      | low nibble of byte 0 | bytes 1..9 (8 bytes)   |
/// | V1      | low nibble of byte 0 | bytes 1..17 (16 bytes) |
/// | V2      | byte 1               | bytes 2..18 (16 bytes) |
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ProtocolVersion {
    /// Original layout with a short identifier.
    V0,
    /// Full 16-byte identifier.
    V1,
    /// Dedicated frame type byte ahead of the identifier.
    V2,
}

impl ProtocolVersion {
    /// Map the version nibble to a version.
    pub fn from_nibble(nibble: u8) -> Result<Self> {
        match nibble {
            0 => Ok(ProtocolVersion::V0),
            1 => Ok(ProtocolVersion::V1),
            2 => Ok(ProtocolVersion::V2),
            other => Err(ScanError::UnsupportedProtocolVersion(other)),
        }
    }

    /// Numeric version.
    pub fn number(self) -> u8 {
        match self {
            ProtocolVersion::V0 => 0,
            ProtocolVersion::V1 => 1,
            ProtocolVersion::V2 => 2,
        }
    }

    /// Byte offset of the frame type field.
    pub fn frame_type_offset(self) -> usize {
        match self {
            ProtocolVersion::V0 | ProtocolVersion::V1 => 0,
            ProtocolVersion::V2 => 1,
        }
    }

    /// Whether the frame type shares its byte with the version nibble.
    pub fn frame_type_in_header(self) -> bool {
        self.frame_type_offset() == 0
    }

    /// Byte offset of the identifier.
    pub fn identifier_offset(self) -> usize {
        self.frame_type_offset() + 1
    }

    /// Identifier length in bytes.
    pub fn identifier_len(self) -> usize {
        match self {
            ProtocolVersion::V0 => SHORT_IDENTIFIER_LEN,
            ProtocolVersion::V1 | ProtocolVersion::V2 => FULL_IDENTIFIER_LEN,
        }
    }
}

impl TryFrom<u8> for ProtocolVersion {
    type Error = ScanError;

    fn try_from(value: u8) -> Result<Self> {
        ProtocolVersion::from_nibble(value)
    }
}

impl fmt::Display for ProtocolVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "v{}", self.number())
    }
}

/// Raw frame tag of a payload: the low nibble of its first byte.
///
/// Returns 0 for an empty payload.
pub fn parse_frame_type_int(data: &[u8]) -> u8 {
    data.first().map_or(0, |header| header & FRAME_TAG_MASK)
}

/// Classify a payload by its frame tag.
///
/// Returns [`ScanFrameType::Unknown`] for an empty payload or an
/// unrecognized tag.
pub fn parse_frame_type(data: &[u8]) -> ScanFrameType {
    ScanFrameType::from_tag(parse_frame_type_int(data))
}

/// Version nibble of a header byte.
pub fn version_nibble(header: u8) -> u8 {
    header >> PROTOCOL_VERSION_SHIFT
}
