//! Capture files: advertisements recorded by a scanner, stored as YAML.
//!
//! ```yaml
//! advertisements:
//!   - label: lobby
//!     local_name: EST
//!     rssi: -61
//!     service_data:
//!       fe9a: "02a1b2c3d4e5f60718"
//!     manufacturer_data: "5d0102a1b2c3d4e5f60718"
//! ```
//!
//! Manufacturer data is the raw field, company id included.

use std::collections::BTreeMap;
use std::path::Path;

use ebscan_parser::{bytes_from_hex_string, parse_service_uuid, AdvertisementData, ManufacturerData};
use serde::Deserialize;

use crate::CliResult;

/// Contents of a capture file.
#[derive(Debug, Clone, Deserialize)]
pub struct CaptureFile {
    pub advertisements: Vec<CapturedAdvertisement>,
}

/// One recorded advertisement.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct CapturedAdvertisement {
    pub label: Option<String>,
    pub local_name: Option<String>,
    pub rssi: Option<i16>,
    pub tx_power_level: Option<i16>,
    pub connectable: bool,
    pub services: Vec<String>,
    /// Service data as hex, keyed by service UUID.
    pub service_data: BTreeMap<String, String>,
    /// Raw manufacturer data as hex.
    pub manufacturer_data: Option<String>,
}

impl CaptureFile {
    /// Load a capture file.
    pub fn load(path: impl AsRef<Path>) -> CliResult<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_yaml(&text)
    }

    /// Parse a capture from YAML text.
    pub fn from_yaml(text: &str) -> CliResult<Self> {
        Ok(serde_yaml::from_str(text)?)
    }
}

impl CapturedAdvertisement {
    /// Name used when reporting on this entry.
    pub fn display_label(&self, index: usize) -> String {
        self.label
            .clone()
            .or_else(|| self.local_name.clone())
            .unwrap_or_else(|| format!("#{}", index))
    }

    /// Convert into decoder input.
    pub fn to_advertisement_data(&self) -> CliResult<AdvertisementData> {
        let mut data = AdvertisementData {
            local_name: self.local_name.clone(),
            tx_power_level: self.tx_power_level,
            is_connectable: self.connectable,
            ..AdvertisementData::default()
        };

        for service in &self.services {
            data.services.push(parse_service_uuid(service)?);
        }

        for (uuid, hex) in &self.service_data {
            data.service_data
                .insert(parse_service_uuid(uuid)?, bytes_from_hex_string(hex)?);
        }

        if let Some(ref hex) = self.manufacturer_data {
            let raw = bytes_from_hex_string(hex)?;
            data.manufacturer_data = Some(ManufacturerData::from_raw(&raw)?);
        }

        Ok(data)
    }
}
