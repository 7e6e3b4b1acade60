//! The projector control client.
//!
//! Every operation is one self-contained exchange: connect, send one
//! request frame, read one response frame, close. The vendor protocol is
//! request/response-per-TCP-connection; no connection is kept open and
//! no retry is attempted here — retry cadence belongs to the caller.

use std::hash::{Hash, Hasher};
use std::time::Duration;

use futures::{SinkExt, StreamExt};
use tokio::net::TcpStream;
use tokio_util::codec::Framed;

use crate::codec::SdcpCodec;
use crate::command::{Action, Button, Command, PictureSetting};
use crate::descriptor::DeviceDescriptor;
use crate::error::SdcpError;
use crate::frame::RequestFrame;
use crate::status::{ErrorCode, ErrorStatus, InputSource, PowerState};

/// Default TCP control port.
pub const DEFAULT_CONTROL_PORT: u16 = 53484;

/// Default per-exchange deadline.
pub const DEFAULT_COMMAND_TIMEOUT: Duration = Duration::from_secs(2);

// ── Projector ────────────────────────────────────────────────────

/// Client for one projector. Cheap to clone; holds no socket between
/// calls and no mutable state, so concurrent use needs no locking.
#[derive(Debug, Clone)]
pub struct Projector {
    descriptor: DeviceDescriptor,
    port: u16,
    timeout: Duration,
}

/// Identity is the serial number alone: the same unit re-discovered at a
/// new address is still the same projector.
impl PartialEq for Projector {
    fn eq(&self, other: &Self) -> bool {
        self.descriptor.serial_number == other.descriptor.serial_number
    }
}

impl Eq for Projector {}

impl Hash for Projector {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.descriptor.serial_number.hash(state);
    }
}

impl Projector {
    pub fn new(descriptor: DeviceDescriptor) -> Self {
        Self {
            descriptor,
            port: DEFAULT_CONTROL_PORT,
            timeout: DEFAULT_COMMAND_TIMEOUT,
        }
    }

    /// Override the control port.
    pub fn with_port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }

    /// Override the per-exchange deadline.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn descriptor(&self) -> &DeviceDescriptor {
        &self.descriptor
    }

    pub fn serial_number(&self) -> u32 {
        self.descriptor.serial_number
    }

    // ── Transport ────────────────────────────────────────────────

    /// One request/response exchange. The socket lives inside this call
    /// and is dropped (closed) on every exit path, including timeout.
    async fn exchange(
        &self,
        action: Action,
        command: Command,
        data: Option<u16>,
    ) -> Result<Option<u16>, SdcpError> {
        let frame = RequestFrame::new(&self.descriptor, action, command, data);

        tracing::trace!(%command, %action, ?data, address = %self.descriptor.address, "exchange");

        let roundtrip = async {
            let stream = TcpStream::connect((self.descriptor.address, self.port)).await?;
            let mut framed = Framed::new(stream, SdcpCodec);
            framed.send(frame).await?;
            match framed.next().await {
                Some(response) => response,
                None => Err(SdcpError::Connection(
                    std::io::ErrorKind::UnexpectedEof.into(),
                )),
            }
        };
        let response = tokio::time::timeout(self.timeout, roundtrip)
            .await
            .map_err(|_| SdcpError::Timeout(self.timeout))??;

        if !response.success {
            let raw = response.data.ok_or(SdcpError::MissingData)?;
            return Err(SdcpError::Device(ErrorCode::try_from(raw)?));
        }
        Ok(response.data)
    }

    async fn get(&self, command: Command) -> Result<u16, SdcpError> {
        self.exchange(Action::Get, command, None)
            .await?
            .ok_or(SdcpError::MissingData)
    }

    /// Any data in a successful set response is discarded.
    async fn set(&self, command: Command, data: Option<u16>) -> Result<(), SdcpError> {
        self.exchange(Action::Set, command, data).await.map(|_| ())
    }

    // ── Power ────────────────────────────────────────────────────

    pub async fn power_state(&self) -> Result<PowerState, SdcpError> {
        PowerState::try_from(self.get(Command::StatusPower).await?)
    }

    /// Request startup or standby. The transition is not instantaneous;
    /// poll [`power_state`](Self::power_state) to follow it.
    pub async fn set_power(&self, on: bool) -> Result<(), SdcpError> {
        let target = if on {
            PowerState::StartUp
        } else {
            PowerState::Standby
        };
        self.set(Command::SetPower, Some(target as u16)).await
    }

    // ── Input ────────────────────────────────────────────────────

    pub async fn input(&self) -> Result<InputSource, SdcpError> {
        InputSource::try_from(self.get(Command::Input).await?)
    }

    pub async fn set_input(&self, source: InputSource) -> Result<(), SdcpError> {
        self.set(Command::Input, Some(source as u16)).await
    }

    // ── Status ───────────────────────────────────────────────────

    pub async fn error_status(&self) -> Result<ErrorStatus, SdcpError> {
        ErrorStatus::from_wire(self.get(Command::StatusError).await?)
    }

    /// Lamp usage in hours.
    pub async fn lamp_timer(&self) -> Result<u16, SdcpError> {
        self.get(Command::StatusLampTimer).await
    }

    // ── Picture settings ─────────────────────────────────────────

    pub async fn picture_setting(&self, setting: PictureSetting) -> Result<u16, SdcpError> {
        self.get(setting.command()).await
    }

    pub async fn set_picture_setting(
        &self,
        setting: PictureSetting,
        value: u16,
    ) -> Result<(), SdcpError> {
        self.set(setting.command(), Some(value)).await
    }

    pub async fn calibration_preset(&self) -> Result<u16, SdcpError> {
        self.get(Command::CalibrationPreset).await
    }

    pub async fn set_calibration_preset(&self, preset: u16) -> Result<(), SdcpError> {
        self.set(Command::CalibrationPreset, Some(preset)).await
    }

    pub async fn aspect_ratio(&self) -> Result<u16, SdcpError> {
        self.get(Command::AspectRatio).await
    }

    pub async fn set_aspect_ratio(&self, mode: u16) -> Result<(), SdcpError> {
        self.set(Command::AspectRatio, Some(mode)).await
    }

    // ── Buttons ──────────────────────────────────────────────────

    /// Emulate a remote-control button press: set action, no payload.
    pub async fn press(&self, button: Button) -> Result<(), SdcpError> {
        self.set(button.command(), None).await
    }

    // ── Versions ─────────────────────────────────────────────────

    /// Main ROM version as (major, minor).
    pub async fn rom_version(&self) -> Result<(u8, u8), SdcpError> {
        Ok(split_version(self.get(Command::RomVersion).await?))
    }

    /// Sub-CPU ROM version as (major, minor).
    pub async fn sc_rom_version(&self) -> Result<(u8, u8), SdcpError> {
        Ok(split_version(self.get(Command::ScRomVersion).await?))
    }

    pub async fn nvm_data_version(&self) -> Result<u16, SdcpError> {
        self.get(Command::NvmDataVersion).await
    }
}

/// Packed version word: high byte major, low byte minor.
fn split_version(value: u16) -> (u8, u8) {
    ((value >> 8) as u8, (value & 0xFF) as u8)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::descriptor::Community;
    use std::collections::HashSet;

    fn descriptor(serial: u32, address: &str) -> DeviceDescriptor {
        DeviceDescriptor {
            version: 2,
            category: 10,
            community: Community::default(),
            device_id: "PJ".into(),
            product_name: "VPL-VW520".into(),
            serial_number: serial,
            power_state: 0,
            location: String::new(),
            address: address.parse().unwrap(),
        }
    }

    #[test]
    fn split_version_unpacks_major_minor() {
        assert_eq!(split_version(0x0105), (1, 5));
        assert_eq!(split_version(0x0000), (0, 0));
        assert_eq!(split_version(0xFF10), (255, 16));
    }

    #[test]
    fn equality_is_by_serial_only() {
        let a = Projector::new(descriptor(42, "192.168.1.10"));
        let b = Projector::new(descriptor(42, "10.0.0.99"));
        let c = Projector::new(descriptor(43, "192.168.1.10"));
        assert_eq!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    fn hash_follows_equality() {
        let mut set = HashSet::new();
        set.insert(Projector::new(descriptor(42, "192.168.1.10")));
        set.insert(Projector::new(descriptor(42, "10.0.0.99")));
        set.insert(Projector::new(descriptor(7, "192.168.1.10")));
        assert_eq!(set.len(), 2);
    }

    #[test]
    fn builders_override_defaults() {
        let p = Projector::new(descriptor(1, "127.0.0.1"))
            .with_port(1234)
            .with_timeout(Duration::from_millis(250));
        assert_eq!(p.port, 1234);
        assert_eq!(p.timeout, Duration::from_millis(250));
    }
}
