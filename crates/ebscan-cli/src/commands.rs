//! Command execution. Each command returns the text to print on stdout.

use std::path::Path;

use ebscan_parser::{
    bytes_from_hex_string, decode_advertisement_with, decode_payload_with, hex_string_from_data,
    string_from_hex, unsigned_from_hex, ByteDirection, ScanInfo,
};
use serde::Serialize;
use serde_json::json;
use tracing::{debug, info, warn};

use crate::{CaptureFile, CliResult, Command, OutputFormat, ScanConfig};

/// Run a parsed command.
pub fn execute(command: &Command, config: &ScanConfig) -> CliResult<String> {
    match command {
        Command::Hex { input } => hex(input, config.format),
        Command::Field {
            input,
            offset,
            length,
            direction,
        } => field(input, *offset, *length, (*direction).into(), config.format),
        Command::Decode { input } => decode(input, config),
        Command::DecodeFile { path } => decode_file(path, config),
    }
}

/// Normalize a hex string.
pub fn hex(input: &str, format: OutputFormat) -> CliResult<String> {
    let bytes = bytes_from_hex_string(input)?;
    let normalized = hex_string_from_data(Some(bytes.as_slice())).unwrap_or_default();

    match format {
        OutputFormat::Text => Ok(format!("{} ({} bytes)", normalized, bytes.len())),
        OutputFormat::Json => to_json(&json!({ "hex": normalized, "length": bytes.len() })),
    }
}

/// Extract one field as both a hex string and an unsigned value.
pub fn field(
    input: &str,
    offset: usize,
    length: usize,
    direction: ByteDirection,
    format: OutputFormat,
) -> CliResult<String> {
    let value_hex = string_from_hex(input, offset, length, direction)?;
    // Wide fields have no integer form; report the hex alone.
    let value = match unsigned_from_hex(input, offset, length, direction) {
        Ok(value) => Some(value),
        Err(ebscan_parser::ScanError::Overflow { .. }) => None,
        Err(err) => return Err(err.into()),
    };

    match format {
        OutputFormat::Text => Ok(match value {
            Some(value) => format!("{} = {}", value_hex, value),
            None => value_hex,
        }),
        OutputFormat::Json => to_json(&json!({ "hex": value_hex, "unsigned": value })),
    }
}

/// Decode a raw payload.
pub fn decode(input: &str, config: &ScanConfig) -> CliResult<String> {
    let bytes = bytes_from_hex_string(input)?;
    let info = decode_payload_with(&bytes, &config.scan_options())?;

    match config.format {
        OutputFormat::Text => Ok(info.to_string()),
        OutputFormat::Json => to_json(&info),
    }
}

/// Outcome of decoding one capture entry.
#[derive(Debug, Serialize)]
struct EntryReport {
    label: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    rssi: Option<i16>,
    #[serde(skip_serializing_if = "Option::is_none")]
    info: Option<ScanInfo>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

/// Decode every entry of a capture file. Entries that fail to decode are
/// reported in the output rather than aborting the run.
pub fn decode_file(path: &Path, config: &ScanConfig) -> CliResult<String> {
    let capture = CaptureFile::load(path)?;
    info!(path = %path.display(), entries = capture.advertisements.len(), "Loaded capture");
    decode_capture(&capture, config)
}

/// Decode every entry of an already loaded capture.
pub fn decode_capture(capture: &CaptureFile, config: &ScanConfig) -> CliResult<String> {
    let options = config.scan_options();
    let mut reports = Vec::with_capacity(capture.advertisements.len());

    for (index, entry) in capture.advertisements.iter().enumerate() {
        let label = entry.display_label(index);
        let result = entry
            .to_advertisement_data()
            .and_then(|adv| decode_advertisement_with(&adv, &options).map_err(Into::into));

        let report = match result {
            Ok(info) => {
                debug!(label = %label, identifier = %info.identifier, "Decoded entry");
                EntryReport {
                    label,
                    rssi: entry.rssi,
                    info: Some(info),
                    error: None,
                }
            }
            Err(err) => {
                warn!(label = %label, error = %err, "Failed to decode entry");
                EntryReport {
                    label,
                    rssi: entry.rssi,
                    info: None,
                    error: Some(err.to_string()),
                }
            }
        };
        reports.push(report);
    }

    match config.format {
        OutputFormat::Json => to_json(&reports),
        OutputFormat::Text => Ok(reports
            .iter()
            .map(|report| {
                let rssi = report
                    .rssi
                    .map(|rssi| format!(" [{} dBm]", rssi))
                    .unwrap_or_default();
                match (&report.info, &report.error) {
                    (Some(info), _) => format!("{}{}: {}", report.label, rssi, info),
                    (None, Some(error)) => format!("{}{}: error: {}", report.label, rssi, error),
                    (None, None) => format!("{}{}: no result", report.label, rssi),
                }
            })
            .collect::<Vec<_>>()
            .join("\n")),
    }
}

fn to_json<T: Serialize>(value: &T) -> CliResult<String> {
    Ok(serde_json::to_string_pretty(value)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hex_command() {
        assert_eq!(hex("<01E2 FF00>", OutputFormat::Text).unwrap(), "01e2ff00 (4 bytes)");
        let json: serde_json::Value =
            serde_json::from_str(&hex("01e2", OutputFormat::Json).unwrap()).unwrap();
        assert_eq!(json["length"], 2);
    }

    #[test]
    fn test_field_command() {
        let out = field("01e2", 0, 2, ByteDirection::YoungOld, OutputFormat::Text).unwrap();
        assert_eq!(out, "e201 = 57857");

        let wide = field("0102030405", 0, 5, ByteDirection::OldYoung, OutputFormat::Text).unwrap();
        assert_eq!(wide, "0102030405");

        assert!(field("01", 0, 2, ByteDirection::OldYoung, OutputFormat::Text).is_err());
    }

    #[test]
    fn test_decode_command() {
        let config = ScanConfig::default();
        let out = decode("02a1b2c3d4e5f60718", &config).unwrap();
        assert!(out.contains("estimote-telemetry"));
        assert!(decode("", &config).is_err());
    }

    #[test]
    fn test_decode_capture_reports_failures() {
        let capture = CaptureFile::from_yaml(
            "advertisements:\n  - label: good\n    rssi: -70\n    service_data:\n      fe9a: \"02a1b2c3d4e5f60718\"\n  - label: bad\n    service_data:\n      fe9a: \"f2\"\n",
        )
        .unwrap();

        let text = decode_capture(&capture, &ScanConfig::default()).unwrap();
        let lines: Vec<_> = text.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].starts_with("good [-70 dBm]: v0 estimote-telemetry"));
        assert!(lines[1].starts_with("bad: error: Unsupported protocol version: 15"));

        let config = ScanConfig {
            format: OutputFormat::Json,
            ..ScanConfig::default()
        };
        let json: serde_json::Value =
            serde_json::from_str(&decode_capture(&capture, &config).unwrap()).unwrap();
        assert_eq!(json[0]["info"]["identifier"], "a1b2c3d4e5f60718");
        assert!(json[1]["error"].is_string());
    }
}
