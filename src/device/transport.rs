//! Report channel seam and the request/response client.

use std::collections::VecDeque;
use std::time::{Duration, Instant};

use tracing::debug;

use super::protocol::{
    build_request, decode_info, decode_keymap, decode_layout, decode_version, hex_dump,
    keymap_to_devicetree, layout_to_devicetree, Command, DeviceInfo, ProtocolVersion,
    DEFAULT_REPORT_SIZE,
};
use crate::config::DeviceConfig;
use crate::models::KeyGeometry;

/// Default wait for a matching response.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_millis(1000);

/// Transport failure. Never retried automatically.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeviceError {
    /// No matching response arrived in time
    Timeout(Duration),
    /// The OS refused access to the device
    PermissionDenied(String),
    /// A response could not be decoded
    Malformed(String),
    /// The device went away
    Disconnected,
}

impl std::fmt::Display for DeviceError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Timeout(waited) => {
                write!(f, "Device did not respond within {} ms", waited.as_millis())
            }
            Self::PermissionDenied(detail) => write!(f, "Permission denied: {detail}"),
            Self::Malformed(detail) => write!(f, "Malformed response: {detail}"),
            Self::Disconnected => write!(f, "Device disconnected"),
        }
    }
}

impl std::error::Error for DeviceError {}

/// A bidirectional channel of fixed-size reports (e.g. a HID interface).
pub trait ReportChannel {
    /// Sends one report.
    fn send(&mut self, report: &[u8]) -> Result<(), DeviceError>;

    /// Waits up to `timeout` for the next incoming report.
    fn recv_timeout(&mut self, timeout: Duration) -> Result<Vec<u8>, DeviceError>;
}

/// Sends commands and waits for the response echoing each one.
#[derive(Debug)]
pub struct DeviceClient<C: ReportChannel> {
    channel: C,
    timeout: Duration,
    report_size: usize,
}

impl<C: ReportChannel> DeviceClient<C> {
    /// Wraps a channel with the default timeout and report size.
    pub fn new(channel: C) -> Self {
        Self {
            channel,
            timeout: DEFAULT_TIMEOUT,
            report_size: DEFAULT_REPORT_SIZE,
        }
    }

    /// Wraps a channel with the timeout and report size from `config`.
    pub fn from_config(channel: C, config: &DeviceConfig) -> Self {
        Self::new(channel)
            .with_timeout(config.timeout())
            .with_report_size(config.report_size)
    }

    /// Sets the response timeout.
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Sets the report size.
    #[must_use]
    pub fn with_report_size(mut self, report_size: usize) -> Self {
        self.report_size = report_size;
        self
    }

    /// Sends `command` and returns the first response whose byte 0 echoes it.
    /// Unrelated reports are dropped.
    pub fn request(&mut self, command: Command) -> Result<Vec<u8>, DeviceError> {
        let report = build_request(command, self.report_size);
        debug!("Sending {:?}: {}", command, hex_dump(&report));
        self.channel.send(&report)?;

        let deadline = Instant::now() + self.timeout;
        loop {
            let remaining = deadline.saturating_duration_since(Instant::now());
            if remaining.is_zero() {
                return Err(DeviceError::Timeout(self.timeout));
            }

            let response = self.channel.recv_timeout(remaining).map_err(|err| match err {
                DeviceError::Timeout(_) => DeviceError::Timeout(self.timeout),
                other => other,
            })?;
            if response.first() == Some(&command.code()) {
                debug!("Received {:?}: {}", command, hex_dump(&response));
                return Ok(response);
            }
            debug!("Dropping unrelated report: {}", hex_dump(&response));
        }
    }

    /// Queries the protocol version.
    pub fn protocol_version(&mut self) -> Result<ProtocolVersion, DeviceError> {
        decode_version(&self.request(Command::Version)?)
    }

    /// Queries the device name.
    pub fn device_info(&mut self) -> Result<DeviceInfo, DeviceError> {
        decode_info(&self.request(Command::Info)?)
    }

    /// Queries the physical layout.
    pub fn layout(&mut self) -> Result<Vec<KeyGeometry>, DeviceError> {
        decode_layout(&self.request(Command::Layout)?)
    }

    /// Queries the physical layout as devicetree text.
    pub fn layout_text(&mut self) -> Result<String, DeviceError> {
        Ok(layout_to_devicetree(&self.layout()?))
    }

    /// Queries the first keymap layer as devicetree text.
    pub fn keymap_text(&mut self) -> Result<String, DeviceError> {
        let payload = decode_keymap(&self.request(Command::Keymap)?)?;
        debug!(
            "Device reports {} layers, {} keys",
            payload.layer_count,
            payload.usages.len()
        );
        Ok(keymap_to_devicetree(&payload.usages))
    }

    /// Returns the wrapped channel.
    pub fn into_inner(self) -> C {
        self.channel
    }
}

/// In-memory channel replaying queued responses.
#[derive(Debug, Default)]
pub struct MemoryChannel {
    responses: VecDeque<Vec<u8>>,
    sent: Vec<Vec<u8>>,
    disconnected: bool,
}

impl MemoryChannel {
    /// Creates an empty channel.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Queues a response to be returned by the next receive.
    pub fn push_response(&mut self, report: impl Into<Vec<u8>>) {
        self.responses.push_back(report.into());
    }

    /// Makes every later call fail with [`DeviceError::Disconnected`].
    pub fn disconnect(&mut self) {
        self.disconnected = true;
    }

    /// Reports sent so far.
    #[must_use]
    pub fn sent(&self) -> &[Vec<u8>] {
        &self.sent
    }
}

impl ReportChannel for MemoryChannel {
    fn send(&mut self, report: &[u8]) -> Result<(), DeviceError> {
        if self.disconnected {
            return Err(DeviceError::Disconnected);
        }
        self.sent.push(report.to_vec());
        Ok(())
    }

    fn recv_timeout(&mut self, timeout: Duration) -> Result<Vec<u8>, DeviceError> {
        if self.disconnected {
            return Err(DeviceError::Disconnected);
        }
        self.responses
            .pop_front()
            .ok_or(DeviceError::Timeout(timeout))
    }
}
