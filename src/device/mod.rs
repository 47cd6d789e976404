//! Keyboard query boundary.
//!
//! A [`transport::DeviceClient`] speaks the fixed-size report protocol over
//! any [`transport::ReportChannel`]; [`protocol`] decodes the payloads and
//! turns them into devicetree text for the parsers.

pub mod protocol;
pub mod transport;

pub use protocol::{hex_dump, parse_hex, Command, DeviceInfo, ProtocolVersion};
pub use transport::{DeviceClient, DeviceError, MemoryChannel, ReportChannel};
