//! Advertisement data and the string-based field extractors.
//!
//! Decoding is a two-pass parse over the hex rendering of the Estimote
//! payload: the protocol version comes first, and the frame type and
//! identifier are then read at version-dependent positions.

use std::collections::HashMap;

use uuid::Uuid;

use crate::codec::{hex_string_from_data, string_from_hex, unsigned_from_hex, ByteDirection};
use crate::frame::{version_nibble, ProtocolVersion};
use crate::{Result, ScanError, ESTIMOTE_COMPANY_ID, ESTIMOTE_SERVICE_UUID16, FRAME_TAG_MASK};

/// Bluetooth base UUID (`00000000-0000-1000-8000-00805F9B34FB`).
const BLUETOOTH_BASE_UUID: u128 = 0x00000000_0000_1000_8000_00805F9B34FB;

/// Manufacturer specific data, split into company identifier and payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ManufacturerData {
    /// Bluetooth SIG company identifier.
    pub company_id: u16,
    /// Payload following the company identifier.
    pub data: Vec<u8>,
}

impl ManufacturerData {
    /// Split a raw manufacturer data field (company id little-endian,
    /// then payload).
    pub fn from_raw(raw: &[u8]) -> Result<Self> {
        if raw.len() < 2 {
            return Err(ScanError::decode_at(
                0,
                format!("Manufacturer data too short: {} bytes (minimum 2)", raw.len()),
            ));
        }

        Ok(ManufacturerData {
            company_id: u16::from_le_bytes([raw[0], raw[1]]),
            data: raw[2..].to_vec(),
        })
    }
}

/// Fields reported by a BLE stack for one received advertisement.
#[derive(Debug, Clone, Default)]
pub struct AdvertisementData {
    /// Complete or shortened local name.
    pub local_name: Option<String>,
    /// Manufacturer specific data, company id split off.
    pub manufacturer_data: Option<ManufacturerData>,
    /// Advertised service UUIDs.
    pub services: Vec<Uuid>,
    /// Service data keyed by service UUID.
    pub service_data: HashMap<Uuid, Vec<u8>>,
    /// Advertised TX power level in dBm.
    pub tx_power_level: Option<i16>,
    /// Whether the advertiser accepts connections.
    pub is_connectable: bool,
}

impl AdvertisementData {
    /// Create empty advertisement data.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add service data under a 16-bit service UUID.
    pub fn with_service_data(mut self, uuid16: u16, data: impl Into<Vec<u8>>) -> Self {
        self.service_data.insert(service_uuid_from_short(uuid16), data.into());
        self
    }

    /// Set manufacturer data.
    pub fn with_manufacturer_data(mut self, company_id: u16, data: impl Into<Vec<u8>>) -> Self {
        self.manufacturer_data = Some(ManufacturerData {
            company_id,
            data: data.into(),
        });
        self
    }

    /// Set the local name.
    pub fn with_local_name(mut self, name: impl Into<String>) -> Self {
        self.local_name = Some(name.into());
        self
    }

    /// Service data published under the Estimote service UUID. Empty
    /// service data counts as absent.
    pub fn estimote_service_data(&self) -> Option<&[u8]> {
        self.service_data
            .get(&service_uuid_from_short(ESTIMOTE_SERVICE_UUID16))
            .map(Vec::as_slice)
            .filter(|data| !data.is_empty())
    }

    /// Manufacturer data payload, if it carries the Estimote company id.
    pub fn estimote_manufacturer_data(&self) -> Option<&[u8]> {
        self.manufacturer_data
            .as_ref()
            .filter(|m| m.company_id == ESTIMOTE_COMPANY_ID)
            .map(|m| m.data.as_slice())
    }

    /// Estimote payload: service data first, manufacturer data as fallback.
    pub fn estimote_payload(&self) -> Option<&[u8]> {
        self.estimote_service_data()
            .or_else(|| self.estimote_manufacturer_data())
    }
}

/// Expand a 16-bit service UUID onto the Bluetooth base UUID.
pub fn service_uuid_from_short(uuid16: u16) -> Uuid {
    Uuid::from_u128(BLUETOOTH_BASE_UUID | (u128::from(uuid16) << 96))
}

/// Parse a service UUID written as 4 hex digits (`fe9a`), 8 hex digits, or a
/// full 128-bit UUID string.
pub fn parse_service_uuid(s: &str) -> Result<Uuid> {
    let s = s.trim();
    let s = s.strip_prefix("0x").unwrap_or(s);
    let invalid = || ScanError::InvalidUuid(s.to_string());

    // from_str_radix tolerates a leading sign, so check the digits first.
    let short_form = matches!(s.len(), 4 | 8);
    if short_form && !s.chars().all(|c| c.is_ascii_hexdigit()) {
        return Err(invalid());
    }

    match s.len() {
        4 => u16::from_str_radix(s, 16)
            .map(service_uuid_from_short)
            .map_err(|_| invalid()),
        8 => u32::from_str_radix(s, 16)
            .map(|uuid32| Uuid::from_u128(BLUETOOTH_BASE_UUID | (u128::from(uuid32) << 96)))
            .map_err(|_| invalid()),
        _ => Uuid::parse_str(s).map_err(|_| invalid()),
    }
}

/// Hex string of the Estimote payload carried by an advertisement.
///
/// Returns `None` when the advertisement has neither Estimote service data
/// nor Estimote manufacturer data.
pub fn string_for_advertisement_data(advertisement_data: &AdvertisementData) -> Option<String> {
    hex_string_from_data(advertisement_data.estimote_payload())
}

/// Protocol version from the high nibble of the header byte.
pub fn protocol_version_from_advertisement_data_string(
    advertisement_data_string: &str,
) -> Result<ProtocolVersion> {
    let header = read_byte(advertisement_data_string, 0)?;
    ProtocolVersion::from_nibble(version_nibble(header))
}

/// Raw frame tag, read where `indoor_protocol_version` puts it.
pub fn frame_type_from_advertisement_data_string(
    advertisement_data_string: &str,
    indoor_protocol_version: ProtocolVersion,
) -> Result<u8> {
    let byte = read_byte(
        advertisement_data_string,
        indoor_protocol_version.frame_type_offset(),
    )?;

    if indoor_protocol_version.frame_type_in_header() {
        Ok(byte & FRAME_TAG_MASK)
    } else {
        Ok(byte)
    }
}

/// Device identifier as lowercase hex, read where `indoor_protocol_version`
/// puts it.
pub fn identifier_from_advertisement_data_string(
    advertisement_data_string: &str,
    indoor_protocol_version: ProtocolVersion,
) -> Result<String> {
    let offset = indoor_protocol_version.identifier_offset();
    let length = indoor_protocol_version.identifier_len();

    string_from_hex(
        advertisement_data_string,
        offset * 2,
        length,
        ByteDirection::OldYoung,
    )
    .map_err(|err| match err {
        ScanError::OutOfRange { available, .. } => ScanError::decode_at(
            offset,
            format!(
                "Not enough data for {} identifier: need {} bytes, have {}",
                indoor_protocol_version,
                length,
                (available / 2).saturating_sub(offset)
            ),
        ),
        other => other,
    })
}

/// Read one byte at a byte offset of a hex string.
fn read_byte(hex_string: &str, offset: usize) -> Result<u8> {
    let value = unsigned_from_hex(hex_string, offset * 2, 1, ByteDirection::OldYoung).map_err(
        |err| match err {
            ScanError::OutOfRange { .. } => {
                ScanError::decode_at(offset, "Advertisement data string too short")
            }
            other => other,
        },
    )?;
    Ok(value as u8)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_service_uuid_from_short() {
        let uuid = service_uuid_from_short(0xFE9A);
        assert_eq!(uuid.to_string(), "0000fe9a-0000-1000-8000-00805f9b34fb");
    }

    #[test]
    fn test_parse_service_uuid() {
        assert_eq!(parse_service_uuid("fe9a").unwrap(), service_uuid_from_short(0xFE9A));
        assert_eq!(parse_service_uuid("0xFE9A").unwrap(), service_uuid_from_short(0xFE9A));
        assert_eq!(
            parse_service_uuid("0000fe9a-0000-1000-8000-00805f9b34fb").unwrap(),
            service_uuid_from_short(0xFE9A)
        );
        assert_eq!(parse_service_uuid("0000fe9a").unwrap(), service_uuid_from_short(0xFE9A));
        assert!(matches!(parse_service_uuid("zzzz"), Err(ScanError::InvalidUuid(_))));
        assert!(matches!(parse_service_uuid("+fe9"), Err(ScanError::InvalidUuid(_))));
        assert!(matches!(parse_service_uuid("+000fe9a"), Err(ScanError::InvalidUuid(_))));
    }

    #[test]
    fn test_manufacturer_data_from_raw() {
        let m = ManufacturerData::from_raw(&[0x5D, 0x01, 0x22, 0x33]).unwrap();
        assert_eq!(m.company_id, ESTIMOTE_COMPANY_ID);
        assert_eq!(m.data, vec![0x22, 0x33]);
        assert!(ManufacturerData::from_raw(&[0x5D]).is_err());
    }

    #[test]
    fn test_string_for_advertisement_data_prefers_service_data() {
        let adv = AdvertisementData::new()
            .with_service_data(ESTIMOTE_SERVICE_UUID16, vec![0x12, 0xAB])
            .with_manufacturer_data(ESTIMOTE_COMPANY_ID, vec![0x01]);
        assert_eq!(string_for_advertisement_data(&adv), Some("12ab".to_string()));
    }

    #[test]
    fn test_string_for_advertisement_data_manufacturer_fallback() {
        let adv = AdvertisementData::new().with_manufacturer_data(ESTIMOTE_COMPANY_ID, vec![0x01, 0xE2]);
        assert_eq!(string_for_advertisement_data(&adv), Some("01e2".to_string()));

        let other = AdvertisementData::new().with_manufacturer_data(0x004C, vec![0x02, 0x15]);
        assert_eq!(string_for_advertisement_data(&other), None);

        let unrelated = AdvertisementData::new().with_service_data(0x180F, vec![0x64]);
        assert_eq!(string_for_advertisement_data(&unrelated), None);
    }

    #[test]
    fn test_empty_service_data_falls_back_to_manufacturer_data() {
        let adv = AdvertisementData::new()
            .with_service_data(ESTIMOTE_SERVICE_UUID16, Vec::new())
            .with_manufacturer_data(ESTIMOTE_COMPANY_ID, vec![0x02, 0x01]);
        assert_eq!(adv.estimote_service_data(), None);
        assert_eq!(string_for_advertisement_data(&adv), Some("0201".to_string()));

        let only_empty = AdvertisementData::new().with_service_data(ESTIMOTE_SERVICE_UUID16, Vec::new());
        assert_eq!(string_for_advertisement_data(&only_empty), None);
    }

    #[test]
    fn test_protocol_version_from_string() {
        assert_eq!(
            protocol_version_from_advertisement_data_string("02aabb").unwrap(),
            ProtocolVersion::V0
        );
        assert_eq!(
            protocol_version_from_advertisement_data_string("22").unwrap(),
            ProtocolVersion::V2
        );
        assert!(matches!(
            protocol_version_from_advertisement_data_string("f2"),
            Err(ScanError::UnsupportedProtocolVersion(15))
        ));
        assert!(matches!(
            protocol_version_from_advertisement_data_string(""),
            Err(ScanError::DecodeError { offset: 0, .. })
        ));
    }

    #[test]
    fn test_frame_type_depends_on_version() {
        assert_eq!(frame_type_from_advertisement_data_string("13", ProtocolVersion::V1).unwrap(), 3);
        assert_eq!(frame_type_from_advertisement_data_string("2004", ProtocolVersion::V2).unwrap(), 4);
        assert!(frame_type_from_advertisement_data_string("20", ProtocolVersion::V2).is_err());
    }

    #[test]
    fn test_identifier_v0() {
        let s = "02a1b2c3d4e5f6071899";
        assert_eq!(
            identifier_from_advertisement_data_string(s, ProtocolVersion::V0).unwrap(),
            "a1b2c3d4e5f60718"
        );
    }

    #[test]
    fn test_identifier_v1_and_v2() {
        let id = "00112233445566778899aabbccddeeff";
        let v1 = format!("11{}", id);
        let v2 = format!("2001{}", id);
        assert_eq!(identifier_from_advertisement_data_string(&v1, ProtocolVersion::V1).unwrap(), id);
        assert_eq!(identifier_from_advertisement_data_string(&v2, ProtocolVersion::V2).unwrap(), id);
    }

    #[test]
    fn test_identifier_truncated() {
        let err = identifier_from_advertisement_data_string("11a1b2", ProtocolVersion::V1).unwrap_err();
        assert!(matches!(err, ScanError::DecodeError { offset: 1, .. }));
        assert!(err.to_string().contains("have 2"));
    }
}
