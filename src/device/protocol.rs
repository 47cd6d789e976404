//! Report framing and payload decoding for the keyboard query protocol.
//!
//! Every request and response is one fixed-size report. Byte 0 of a request
//! is the command code; byte 0 of a response echoes it. Decoded layouts and
//! keymaps are emitted as devicetree text so they flow back through the
//! normal parsers.

#![allow(clippy::cast_possible_truncation)]

use std::fmt::Write;

use tracing::debug;

use super::transport::DeviceError;
use crate::keycodes::binding_for_usage;
use crate::models::KeyGeometry;

/// Default report size in bytes.
pub const DEFAULT_REPORT_SIZE: usize = 32;

/// Bytes per key in a layout response.
pub const LAYOUT_KEY_STRIDE: usize = 5;

/// Protocol command codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    /// Protocol version (`0x01`)
    Version,
    /// Device name (`0x02`)
    Info,
    /// First-layer keymap (`0x03`)
    Keymap,
    /// Physical layout (`0x04`)
    Layout,
}

impl Command {
    /// Wire code.
    #[must_use]
    pub const fn code(self) -> u8 {
        match self {
            Self::Version => 0x01,
            Self::Info => 0x02,
            Self::Keymap => 0x03,
            Self::Layout => 0x04,
        }
    }

    /// Parses a wire code.
    #[must_use]
    pub const fn from_code(code: u8) -> Option<Self> {
        match code {
            0x01 => Some(Self::Version),
            0x02 => Some(Self::Info),
            0x03 => Some(Self::Keymap),
            0x04 => Some(Self::Layout),
            _ => None,
        }
    }
}

/// Builds a zero-padded request report.
#[must_use]
pub fn build_request(command: Command, report_size: usize) -> Vec<u8> {
    let mut report = vec![0u8; report_size.max(1)];
    report[0] = command.code();
    report
}

/// Protocol version reported by the device.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProtocolVersion {
    /// Major version
    pub major: u8,
    /// Minor version
    pub minor: u8,
}

impl std::fmt::Display for ProtocolVersion {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}.{}", self.major, self.minor)
    }
}

/// Device identity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeviceInfo {
    /// Product name
    pub name: String,
}

/// Summary of a keymap response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeymapPayload {
    /// Layers the device holds
    pub layer_count: u8,
    /// Usage codes of the first layer
    pub usages: Vec<u16>,
}

fn truncated(what: &str, needed: usize, got: usize) -> DeviceError {
    DeviceError::Malformed(format!(
        "{what} response needs {needed} bytes, got {got}"
    ))
}

/// Decodes `[cmd, major, minor, ...]`.
pub fn decode_version(data: &[u8]) -> Result<ProtocolVersion, DeviceError> {
    match data {
        [_, major, minor, ..] => Ok(ProtocolVersion {
            major: *major,
            minor: *minor,
        }),
        _ => Err(truncated("Version", 3, data.len())),
    }
}

/// Decodes `[cmd, len, name bytes...]`.
pub fn decode_info(data: &[u8]) -> Result<DeviceInfo, DeviceError> {
    let len = usize::from(*data.get(1).ok_or_else(|| truncated("Info", 2, data.len()))?);
    let bytes = data
        .get(2..2 + len)
        .ok_or_else(|| truncated("Info", 2 + len, data.len()))?;
    let name = String::from_utf8(bytes.to_vec())
        .map_err(|_| DeviceError::Malformed("Device name is not UTF-8".to_string()))?;
    Ok(DeviceInfo { name })
}

/// Decodes a layout response into key geometries.
///
/// Positions and sizes are tenths of a key-unit; a zero width or height
/// becomes 1. Rotation is `byte * 360 / 256` degrees about the origin.
pub fn decode_layout(data: &[u8]) -> Result<Vec<KeyGeometry>, DeviceError> {
    debug!("Layout data: {}", hex_dump(data));
    let count = usize::from(*data.get(1).ok_or_else(|| truncated("Layout", 2, data.len()))?);
    let needed = 2 + count * LAYOUT_KEY_STRIDE;
    let body = data
        .get(2..needed)
        .ok_or_else(|| truncated("Layout", needed, data.len()))?;

    let tenths = |byte: u8| f64::from(byte) / 10.0;
    let size = |byte: u8| if byte == 0 { 1.0 } else { tenths(byte) };

    Ok(body
        .chunks_exact(LAYOUT_KEY_STRIDE)
        .map(|key| {
            KeyGeometry::new(tenths(key[0]), tenths(key[1]))
                .with_size(size(key[2]), size(key[3]))
                .with_rotation(f64::from(key[4]) * 360.0 / 256.0, 0.0, 0.0)
        })
        .collect())
}

/// Decodes a keymap response: layer count, key count, then big-endian
/// usage codes for the first layer.
pub fn decode_keymap(data: &[u8]) -> Result<KeymapPayload, DeviceError> {
    debug!("Keymap data: {}", hex_dump(data));
    let (layer_count, key_count) = match data {
        [_, layers, keys, ..] => (*layers, usize::from(*keys)),
        _ => return Err(truncated("Keymap", 3, data.len())),
    };
    let needed = 3 + key_count * 2;
    let body = data
        .get(3..needed)
        .ok_or_else(|| truncated("Keymap", needed, data.len()))?;

    let usages = body
        .chunks_exact(2)
        .map(|pair| u16::from_be_bytes([pair[0], pair[1]]))
        .collect();
    Ok(KeymapPayload {
        layer_count,
        usages,
    })
}

/// Emits a one-layer ZMK keymap for the given usage codes.
#[must_use]
pub fn keymap_to_devicetree(usages: &[u16]) -> String {
    let mut out = String::from("/ {\n\tkeymap {\n\t\tcompatible = \"zmk,keymap\";\n\n");
    out.push_str("\t\tdefault_layer {\n\t\t\tbindings = <\n");
    for usage in usages {
        let _ = writeln!(out, "\t\t\t\t{}", binding_for_usage(*usage));
    }
    out.push_str("\t\t\t>;\n\t\t};\n\t};\n};\n");
    out
}

fn dts_int(value: f64) -> String {
    let hundredths = (value * 100.0).round() as i64;
    if hundredths < 0 {
        format!("({hundredths})")
    } else {
        hundredths.to_string()
    }
}

/// Emits a ZMK physical-layout node for the given keys.
#[must_use]
pub fn layout_to_devicetree(keys: &[KeyGeometry]) -> String {
    let mut out = String::from("/ {\n\tphysical_layout0: physical_layout_0 {\n");
    out.push_str("\t\tcompatible = \"zmk,physical-layout\";\n");
    out.push_str("\t\tdisplay-name = \"Device\";\n");

    if !keys.is_empty() {
        out.push_str("\t\tkeys\n");
        for (i, key) in keys.iter().enumerate() {
            let lead = if i == 0 { '=' } else { ',' };
            let _ = writeln!(
                out,
                "\t\t\t{} <&key_physical_attrs {} {} {} {} {} {} {}>",
                lead,
                dts_int(key.w),
                dts_int(key.h),
                dts_int(key.x),
                dts_int(key.y),
                dts_int(key.r),
                dts_int(key.rx),
                dts_int(key.ry)
            );
        }
        out.push_str("\t\t\t;\n");
    }
    out.push_str("\t};\n};\n");
    out
}

/// Space-separated lowercase hex, e.g. `"04 02 ff"`.
#[must_use]
pub fn hex_dump(data: &[u8]) -> String {
    data.iter()
        .map(|byte| format!("{byte:02x}"))
        .collect::<Vec<_>>()
        .join(" ")
}

/// Parses hex bytes separated by whitespace or commas. Tokens may carry a
/// `0x` prefix and may pack several bytes (`"0402ff"`).
pub fn parse_hex(text: &str) -> Result<Vec<u8>, DeviceError> {
    let mut bytes = Vec::new();
    for token in text.split(|c: char| c.is_whitespace() || c == ',') {
        let digits = token.trim_start_matches("0x").trim_start_matches("0X");
        if digits.is_empty() {
            continue;
        }
        if digits.len() % 2 != 0 {
            return Err(DeviceError::Malformed(format!(
                "Odd number of hex digits in '{token}'"
            )));
        }
        for pair in digits.as_bytes().chunks(2) {
            let pair = std::str::from_utf8(pair)
                .map_err(|_| DeviceError::Malformed(format!("Invalid hex '{token}'")))?;
            let byte = u8::from_str_radix(pair, 16)
                .map_err(|_| DeviceError::Malformed(format!("Invalid hex '{token}'")))?;
            bytes.push(byte);
        }
    }
    Ok(bytes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::{parse_keymap, parse_layout};

    #[test]
    fn test_command_codes() {
        for cmd in [Command::Version, Command::Info, Command::Keymap, Command::Layout] {
            assert_eq!(Command::from_code(cmd.code()), Some(cmd));
        }
        assert_eq!(Command::from_code(0x7f), None);

        let report = build_request(Command::Layout, DEFAULT_REPORT_SIZE);
        assert_eq!(report.len(), 32);
        assert_eq!(report[0], 0x04);
        assert!(report[1..].iter().all(|b| *b == 0));
    }

    #[test]
    fn test_decode_layout() {
        let data = [0x04, 2, 0, 0, 10, 10, 0, 15, 5, 0, 20, 64];
        let keys = decode_layout(&data).unwrap();
        assert_eq!(keys.len(), 2);
        assert_eq!(keys[0], KeyGeometry::new(0.0, 0.0));
        assert_eq!(keys[1].x, 1.5);
        assert_eq!(keys[1].y, 0.5);
        assert_eq!(keys[1].w, 1.0);
        assert_eq!(keys[1].h, 2.0);
        assert_eq!(keys[1].r, 90.0);
    }

    #[test]
    fn test_decode_layout_truncated() {
        let err = decode_layout(&[0x04, 3, 0, 0, 10, 10, 0]).unwrap_err();
        assert!(matches!(err, DeviceError::Malformed(_)));
    }

    #[test]
    fn test_decode_keymap() {
        let data = [0x03, 4, 3, 0x00, 0x04, 0x00, 0x00, 0x00, 0xb3];
        let payload = decode_keymap(&data).unwrap();
        assert_eq!(payload.layer_count, 4);
        assert_eq!(payload.usages, vec![0x0004, 0x0000, 0x00b3]);
    }

    #[test]
    fn test_keymap_text_reparses_into_one_layer() {
        let text = keymap_to_devicetree(&[0x0004, 0x0000, 0x00b3, 0x00e1]);
        assert!(text.contains("&none /* 0x00b3 */"));

        let doc = parse_keymap(&text);
        assert_eq!(doc.len(), 1);
        assert_eq!(doc.get("default").unwrap().keys, vec!["A", "TRANS", "?", "LSHFT"]);
    }

    #[test]
    fn test_layout_text_reparses() {
        let keys = vec![
            KeyGeometry::new(0.0, 0.0),
            KeyGeometry::new(1.5, 0.5).with_size(1.0, 2.0).with_rotation(-15.0, 0.0, 0.0),
        ];
        let text = layout_to_devicetree(&keys);
        assert!(text.contains("(-1500)"));
        assert_eq!(parse_layout(&text), keys);
    }

    #[test]
    fn test_version_and_info() {
        assert_eq!(
            decode_version(&[0x01, 1, 2]).unwrap(),
            ProtocolVersion { major: 1, minor: 2 }
        );
        assert!(decode_version(&[0x01]).is_err());

        let info = decode_info(&[0x02, 3, b'Z', b'M', b'K', 0]).unwrap();
        assert_eq!(info.name, "ZMK");
        assert!(decode_info(&[0x02, 9, b'Z']).is_err());
    }

    #[test]
    fn test_hex_round_trip_forms() {
        assert_eq!(hex_dump(&[0x04, 0x02, 0xff]), "04 02 ff");
        assert_eq!(parse_hex("04 02 ff").unwrap(), vec![0x04, 0x02, 0xff]);
        assert_eq!(parse_hex("0x04,0x02 0402").unwrap(), vec![4, 2, 4, 2]);
        assert!(parse_hex("abc").is_err());
        assert!(parse_hex("zz").is_err());
    }
}
