//! Decode captured device responses.

use clap::{Args, ValueEnum};

use crate::cli::common::{CliError, CliResult};
use crate::device::protocol::{
    decode_info, decode_keymap, decode_layout, decode_version, keymap_to_devicetree,
    layout_to_devicetree,
};
use crate::device::{parse_hex, DeviceError};

/// Response kind.
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum DecodeKind {
    /// Physical layout, printed as devicetree
    Layout,
    /// First keymap layer, printed as devicetree
    Keymap,
    /// Protocol version
    Version,
    /// Device name
    Info,
}

/// Decode a device response hex dump
#[derive(Args, Debug)]
pub struct DecodeArgs {
    /// Response kind
    #[arg(long, value_enum)]
    pub kind: DecodeKind,

    /// Response bytes in hex (e.g. "04 02 00 00 0a 0a 00")
    #[arg(required = true, value_name = "HEX")]
    pub hex: Vec<String>,
}

/// Decodes `data` as `kind` into printable text.
pub fn decode_to_text(kind: DecodeKind, data: &[u8]) -> Result<String, DeviceError> {
    Ok(match kind {
        DecodeKind::Layout => layout_to_devicetree(&decode_layout(data)?),
        DecodeKind::Keymap => keymap_to_devicetree(&decode_keymap(data)?.usages),
        DecodeKind::Version => format!("Protocol version {}", decode_version(data)?),
        DecodeKind::Info => format!("Device: {}", decode_info(data)?.name),
    })
}

impl DecodeArgs {
    /// Execute the decode command
    pub fn execute(&self) -> CliResult<()> {
        let data = parse_hex(&self.hex.join(" ")).map_err(|e| CliError::validation(e.to_string()))?;
        let text = decode_to_text(self.kind, &data).map_err(|e| CliError::validation(e.to_string()))?;
        print!("{text}");
        if !text.ends_with('\n') {
            println!();
        }
        Ok(())
    }
}
