//! Protocol constants
//!
//! Assigned numbers and field positions used by Estimote Next-Gen beacon
//! advertisements.

// ============================================================================
// Assigned Numbers
// ============================================================================

/// 16-bit service UUID under which Estimote beacons publish service data.
pub const ESTIMOTE_SERVICE_UUID16: u16 = 0xFE9A;
/// Bluetooth SIG company identifier assigned to Estimote.
pub const ESTIMOTE_COMPANY_ID: u16 = 0x015D;

// ============================================================================
// Frame Tags (low nibble of the header byte)
// ============================================================================

/// Service device (connectivity) frame.
pub const FRAME_TAG_SERVICE_DEVICE: u8 = 0x1;
/// Estimote Telemetry frame.
pub const FRAME_TAG_TELEMETRY: u8 = 0x2;
/// Estimote Mirror frame.
pub const FRAME_TAG_MIRROR: u8 = 0x3;
/// Estimote Mesh frame.
pub const FRAME_TAG_MESH: u8 = 0x4;

/// Mask selecting the frame tag from the header byte.
pub const FRAME_TAG_MASK: u8 = 0x0F;
/// Shift that moves the protocol version nibble into the low bits.
pub const PROTOCOL_VERSION_SHIFT: u8 = 4;

// ============================================================================
// Identifier Layout
// ============================================================================

/// Short identifier length used by protocol version 0.
pub const SHORT_IDENTIFIER_LEN: usize = 8;
/// Full identifier length used by protocol versions 1 and 2.
pub const FULL_IDENTIFIER_LEN: usize = 16;
