//! Full advertisement decoding.

use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::{debug, trace, warn};

use crate::advertisement::{
    frame_type_from_advertisement_data_string, identifier_from_advertisement_data_string,
    protocol_version_from_advertisement_data_string, AdvertisementData,
};
use crate::codec::hex_string_from_data;
use crate::frame::{ProtocolVersion, ScanFrameType};
use crate::{Result, ScanError};

/// Where in the advertisement the Estimote payload was found.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PayloadSource {
    /// Service data under the Estimote service UUID.
    ServiceData,
    /// Manufacturer data with the Estimote company id.
    ManufacturerData,
    /// Payload bytes supplied directly by the caller.
    Raw,
}

/// Options controlling how advertisements are decoded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScanOptions {
    /// Use Estimote manufacturer data when no service data is present.
    pub fallback_to_manufacturer_data: bool,
    /// Version to assume when the header carries an unsupported one.
    pub default_protocol_version: Option<ProtocolVersion>,
}

impl Default for ScanOptions {
    fn default() -> Self {
        ScanOptions {
            fallback_to_manufacturer_data: true,
            default_protocol_version: None,
        }
    }
}

/// Decoded view of one Estimote advertisement.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScanInfo {
    /// Classified frame type, `Unknown` for unrecognized tags.
    pub frame_type: ScanFrameType,
    /// Raw frame tag as found on the wire.
    pub frame_tag: u8,
    /// Version that decided the payload layout.
    pub protocol_version: ProtocolVersion,
    /// Device identifier, lowercase hex.
    pub identifier: String,
    /// Whole payload, lowercase hex.
    pub payload: String,
    /// Advertisement field the payload came from.
    pub source: PayloadSource,
    /// Local name reported alongside the payload.
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub local_name: Option<String>,
}

impl fmt::Display for ScanInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} (tag 0x{:02x}, {}) id={}",
            self.protocol_version,
            self.frame_type,
            self.frame_tag,
            self.payload_source_name(),
            self.identifier
        )?;
        if let Some(ref name) = self.local_name {
            write!(f, " name={:?}", name)?;
        }
        Ok(())
    }
}

impl ScanInfo {
    fn payload_source_name(&self) -> &'static str {
        match self.source {
            PayloadSource::ServiceData => "service data",
            PayloadSource::ManufacturerData => "manufacturer data",
            PayloadSource::Raw => "raw",
        }
    }
}

/// Decode an advertisement with default options.
pub fn decode_advertisement(advertisement_data: &AdvertisementData) -> Result<ScanInfo> {
    decode_advertisement_with(advertisement_data, &ScanOptions::default())
}

/// Decode an advertisement.
pub fn decode_advertisement_with(
    advertisement_data: &AdvertisementData,
    options: &ScanOptions,
) -> Result<ScanInfo> {
    let (payload, source) = match advertisement_data.estimote_service_data() {
        Some(data) => (data, PayloadSource::ServiceData),
        None => {
            let fallback = advertisement_data
                .estimote_manufacturer_data()
                .filter(|_| options.fallback_to_manufacturer_data);
            match fallback {
                Some(data) => {
                    debug!("No Estimote service data, using manufacturer data");
                    (data, PayloadSource::ManufacturerData)
                }
                None => return Err(ScanError::MissingPayload),
            }
        }
    };

    let mut info = decode_payload_with(payload, options)?;
    info.source = source;
    info.local_name = advertisement_data.local_name.clone();
    Ok(info)
}

/// Decode raw Estimote payload bytes with default options.
pub fn decode_payload(data: &[u8]) -> Result<ScanInfo> {
    decode_payload_with(data, &ScanOptions::default())
}

/// Decode raw Estimote payload bytes.
pub fn decode_payload_with(data: &[u8], options: &ScanOptions) -> Result<ScanInfo> {
    if data.is_empty() {
        return Err(ScanError::MissingPayload);
    }

    let payload = hex_string_from_data(Some(data)).unwrap_or_default();
    trace!(payload = %payload, "Decoding Estimote payload");

    // First pass: the version decides the layout of everything else.
    let protocol_version = match protocol_version_from_advertisement_data_string(&payload) {
        Ok(version) => version,
        Err(ScanError::UnsupportedProtocolVersion(found)) => match options.default_protocol_version {
            Some(version) => {
                warn!(found, assumed = %version, "Unsupported protocol version, assuming default");
                version
            }
            None => return Err(ScanError::UnsupportedProtocolVersion(found)),
        },
        Err(err) => return Err(err),
    };

    // Second pass: version-dependent fields.
    let frame_tag = frame_type_from_advertisement_data_string(&payload, protocol_version)?;
    let frame_type = ScanFrameType::from_tag(frame_tag);
    if !frame_type.is_known() {
        debug!(tag = frame_tag, "Unrecognized frame tag");
    }
    let identifier = identifier_from_advertisement_data_string(&payload, protocol_version)?;

    debug!(
        version = %protocol_version,
        frame_type = %frame_type,
        identifier = %identifier,
        "Decoded Estimote payload"
    );

    Ok(ScanInfo {
        frame_type,
        frame_tag,
        protocol_version,
        identifier,
        payload,
        source: PayloadSource::Raw,
        local_name: None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{ESTIMOTE_COMPANY_ID, ESTIMOTE_SERVICE_UUID16};

    fn telemetry_v0() -> Vec<u8> {
        vec![0x02, 0xA1, 0xB2, 0xC3, 0xD4, 0xE5, 0xF6, 0x07, 0x18, 0x00]
    }

    #[test]
    fn test_decode_payload_v0_telemetry() {
        let info = decode_payload(&telemetry_v0()).unwrap();
        assert_eq!(info.frame_type, ScanFrameType::EstimoteTelemetry);
        assert_eq!(info.frame_tag, 2);
        assert_eq!(info.protocol_version, ProtocolVersion::V0);
        assert_eq!(info.identifier, "a1b2c3d4e5f60718");
        assert_eq!(info.source, PayloadSource::Raw);
    }

    #[test]
    fn test_decode_payload_v2_mesh() {
        let mut data = vec![0x20, 0x04];
        data.extend_from_slice(&[0xAB; 16]);
        let info = decode_payload(&data).unwrap();
        assert_eq!(info.frame_type, ScanFrameType::Mesh);
        assert_eq!(info.protocol_version, ProtocolVersion::V2);
        assert_eq!(info.identifier, "ab".repeat(16));
    }

    #[test]
    fn test_decode_payload_unknown_tag() {
        let mut data = vec![0x1E];
        data.extend_from_slice(&[0x01; 16]);
        let info = decode_payload(&data).unwrap();
        assert_eq!(info.frame_type, ScanFrameType::Unknown);
        assert_eq!(info.frame_tag, 0x0E);
    }

    #[test]
    fn test_decode_payload_empty() {
        assert!(matches!(decode_payload(&[]), Err(ScanError::MissingPayload)));
    }

    #[test]
    fn test_unsupported_version_with_default() {
        let mut data = telemetry_v0();
        data[0] = 0x92;

        assert!(matches!(
            decode_payload(&data),
            Err(ScanError::UnsupportedProtocolVersion(9))
        ));

        let options = ScanOptions {
            default_protocol_version: Some(ProtocolVersion::V0),
            ..ScanOptions::default()
        };
        let info = decode_payload_with(&data, &options).unwrap();
        assert_eq!(info.protocol_version, ProtocolVersion::V0);
        assert_eq!(info.frame_type, ScanFrameType::EstimoteTelemetry);
    }

    #[test]
    fn test_decode_advertisement_sources() {
        let adv = AdvertisementData::new()
            .with_service_data(ESTIMOTE_SERVICE_UUID16, telemetry_v0())
            .with_local_name("EST");
        let info = decode_advertisement(&adv).unwrap();
        assert_eq!(info.source, PayloadSource::ServiceData);
        assert_eq!(info.local_name.as_deref(), Some("EST"));

        let adv = AdvertisementData::new().with_manufacturer_data(ESTIMOTE_COMPANY_ID, telemetry_v0());
        let info = decode_advertisement(&adv).unwrap();
        assert_eq!(info.source, PayloadSource::ManufacturerData);

        let options = ScanOptions {
            fallback_to_manufacturer_data: false,
            ..ScanOptions::default()
        };
        assert!(matches!(
            decode_advertisement_with(&adv, &options),
            Err(ScanError::MissingPayload)
        ));
    }

    #[test]
    fn test_empty_service_data_uses_manufacturer_data() {
        let adv = AdvertisementData::new()
            .with_service_data(ESTIMOTE_SERVICE_UUID16, Vec::new())
            .with_manufacturer_data(ESTIMOTE_COMPANY_ID, telemetry_v0());
        let info = decode_advertisement(&adv).unwrap();
        assert_eq!(info.source, PayloadSource::ManufacturerData);
        assert_eq!(info.identifier, "a1b2c3d4e5f60718");
    }

    #[test]
    fn test_display() {
        let info = decode_payload(&telemetry_v0()).unwrap();
        let text = info.to_string();
        assert!(text.contains("estimote-telemetry"));
        assert!(text.contains("id=a1b2c3d4e5f60718"));
    }
}
