//! In-memory projector: frame in, frame out.
//!
//! Mirrors observed firmware behavior: one request per TCP connection,
//! community and category checked before anything else, get-only items
//! reject sets and vice versa, failures carry the error code in the
//! data field.

use sdcp_core::{
    Action, Command, DeviceDescriptor, ErrorCode, ErrorStatus, InputSource, PowerState,
    RequestFrame, ResponseFrame, SdcpError,
};

/// Simulated device state behind the wire interface.
pub struct SimulatedProjector {
    descriptor: DeviceDescriptor,
    power: PowerState,
    input: InputSource,
    contrast: u16,
    brightness: u16,
    color: u16,
    hue: u16,
    sharpness: u16,
    calibration_preset: u16,
    aspect_ratio: u16,
    lamp_hours: u16,
    faults: ErrorStatus,
    rom_version: u16,
    sc_rom_version: u16,
    nvm_data_version: u16,
}

impl SimulatedProjector {
    pub fn new(descriptor: DeviceDescriptor) -> Self {
        Self {
            descriptor,
            power: PowerState::Standby,
            input: InputSource::Hdmi,
            contrast: 50,
            brightness: 50,
            color: 50,
            hue: 50,
            sharpness: 50,
            calibration_preset: 0,
            aspect_ratio: 0,
            lamp_hours: 123,
            faults: ErrorStatus::empty(),
            rom_version: 0x0105,
            sc_rom_version: 0x0203,
            nvm_data_version: 1,
        }
    }

    pub fn descriptor(&self) -> &DeviceDescriptor {
        &self.descriptor
    }

    /// Latch a hardware fault (exposed for fault-injection flags).
    pub fn inject_fault(&mut self, fault: ErrorStatus) {
        self.faults |= fault;
    }

    /// The SDAP announcement with the current power state snapshot.
    pub fn announcement(&self) -> Vec<u8> {
        let mut snapshot = self.descriptor.clone();
        snapshot.power_state = self.power as u16;
        snapshot.to_announcement()
    }

    /// Advance the power state machine one step: StartUp → StartUpLamp
    /// → PowerOn, Cooling → Cooling2 → Standby.
    pub fn tick(&mut self) {
        self.power = match self.power {
            PowerState::StartUp => PowerState::StartUpLamp,
            PowerState::StartUpLamp => PowerState::PowerOn,
            PowerState::Cooling => PowerState::Cooling2,
            PowerState::Cooling2 => PowerState::Standby,
            steady => steady,
        };
    }

    /// Answer one raw request buffer.
    pub fn handle(&mut self, request: &[u8]) -> Vec<u8> {
        match RequestFrame::from_bytes(request) {
            Ok(frame) => self.dispatch(frame).to_bytes(),
            Err(e) => {
                // Echo whatever command bytes arrived, if any.
                let command = if request.len() >= 9 {
                    u16::from_be_bytes([request[7], request[8]])
                } else {
                    0
                };
                self.failure(command, reject_code(&e)).to_bytes()
            }
        }
    }

    fn dispatch(&mut self, frame: RequestFrame) -> ResponseFrame {
        let command = frame.command as u16;
        if frame.community != self.descriptor.community {
            return self.failure(command, ErrorCode::DifferentCommunity);
        }
        if frame.category != self.descriptor.category {
            return self.failure(command, ErrorCode::InvalidCategory);
        }
        match frame.action {
            Action::Get => self.handle_get(frame.command),
            Action::Set => self.handle_set(frame.command, frame.data),
        }
    }

    fn handle_get(&self, command: Command) -> ResponseFrame {
        let value = match command {
            Command::StatusPower => self.power as u16,
            Command::StatusError => self.faults.bits(),
            Command::StatusLampTimer => self.lamp_hours,
            Command::Input => self.input as u16,
            Command::Contrast => self.contrast,
            Command::Brightness => self.brightness,
            Command::Color => self.color,
            Command::Hue => self.hue,
            Command::Sharpness => self.sharpness,
            Command::CalibrationPreset => self.calibration_preset,
            Command::AspectRatio => self.aspect_ratio,
            Command::RomVersion => self.rom_version,
            Command::ScRomVersion => self.sc_rom_version,
            Command::NvmDataVersion => self.nvm_data_version,
            // Set-only items and buttons cannot be read.
            _ => return self.failure(command as u16, ErrorCode::InvalidItemRequest),
        };
        self.success(command, Some(value))
    }

    fn handle_set(&mut self, command: Command, data: Option<u16>) -> ResponseFrame {
        if command.is_button() {
            // Button emulation: set action, no payload expected.
            return match data {
                None => self.success(command, None),
                Some(_) => self.failure(command as u16, ErrorCode::InvalidLength),
            };
        }

        let Some(value) = data else {
            return self.failure(command as u16, ErrorCode::ShortData);
        };

        match command {
            Command::SetPower => match value {
                1 => {
                    if self.power.is_off() {
                        self.power = PowerState::StartUp;
                    }
                }
                0 => {
                    if self.power.is_on() || self.power.is_powering_on() {
                        self.power = PowerState::Cooling;
                    }
                }
                _ => return self.failure(command as u16, ErrorCode::InvalidData),
            },
            Command::Input => match InputSource::try_from(value) {
                Ok(source) => self.input = source,
                Err(_) => return self.failure(command as u16, ErrorCode::InvalidData),
            },
            Command::Contrast
            | Command::Brightness
            | Command::Color
            | Command::Hue
            | Command::Sharpness => {
                if value > 100 {
                    return self.failure(command as u16, ErrorCode::InvalidData);
                }
                let slot = match command {
                    Command::Contrast => &mut self.contrast,
                    Command::Brightness => &mut self.brightness,
                    Command::Color => &mut self.color,
                    Command::Hue => &mut self.hue,
                    _ => &mut self.sharpness,
                };
                *slot = value;
            }
            Command::CalibrationPreset => self.calibration_preset = value,
            Command::AspectRatio => self.aspect_ratio = value,
            // Status queries and versions are read-only.
            _ => return self.failure(command as u16, ErrorCode::InvalidItemRequest),
        }
        self.success(command, None)
    }

    fn success(&self, command: Command, data: Option<u16>) -> ResponseFrame {
        ResponseFrame {
            category: self.descriptor.category,
            community: *self.descriptor.community.as_bytes(),
            success: true,
            command: command as u16,
            data,
        }
    }

    fn failure(&self, command: u16, code: ErrorCode) -> ResponseFrame {
        ResponseFrame {
            category: self.descriptor.category,
            community: *self.descriptor.community.as_bytes(),
            success: false,
            command,
            data: Some(code as u16),
        }
    }
}

/// Map a parse failure onto the error code real firmware answers with.
fn reject_code(e: &SdcpError) -> ErrorCode {
    match e {
        SdcpError::ShortFrame { .. } => ErrorCode::ShortHeader,
        SdcpError::UnsupportedVersion(_) => ErrorCode::InvalidVersion,
        SdcpError::InvalidCommunity(_) => ErrorCode::DifferentCommunity,
        SdcpError::InvalidDataLength(_) => ErrorCode::InvalidLength,
        SdcpError::UnknownCode {
            type_name: "Command",
            ..
        } => ErrorCode::InvalidItem,
        _ => ErrorCode::InvalidRequest,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sdcp_core::{Community, PROTOCOL_VERSION, PictureSetting};

    fn device() -> SimulatedProjector {
        SimulatedProjector::new(DeviceDescriptor {
            version: PROTOCOL_VERSION,
            category: 10,
            community: Community::default(),
            device_id: "PJ".into(),
            product_name: "VPL-SIM".into(),
            serial_number: 9000,
            power_state: 0,
            location: String::new(),
            address: "0.0.0.0".parse().unwrap(),
        })
    }

    fn request(
        device: &SimulatedProjector,
        action: Action,
        command: Command,
        data: Option<u16>,
    ) -> Vec<u8> {
        RequestFrame {
            category: device.descriptor().category,
            community: device.descriptor().community,
            action,
            command,
            data,
        }
        .to_bytes()
    }

    fn answer(device: &mut SimulatedProjector, wire: &[u8]) -> ResponseFrame {
        ResponseFrame::from_bytes(&device.handle(wire)).unwrap()
    }

    #[test]
    fn starts_in_standby() {
        let mut dev = device();
        let wire = request(&dev, Action::Get, Command::StatusPower, None);
        let response = answer(&mut dev, &wire);
        assert!(response.success);
        assert_eq!(response.data, Some(PowerState::Standby as u16));
    }

    #[test]
    fn power_walks_through_startup() {
        let mut dev = device();
        let on = request(&dev, Action::Set, Command::SetPower, Some(1));
        assert!(answer(&mut dev, &on).success);

        let poll = request(&dev, Action::Get, Command::StatusPower, None);
        assert_eq!(answer(&mut dev, &poll).data, Some(1)); // StartUp
        dev.tick();
        assert_eq!(answer(&mut dev, &poll).data, Some(2)); // StartUpLamp
        dev.tick();
        assert_eq!(answer(&mut dev, &poll).data, Some(3)); // PowerOn

        let off = request(&dev, Action::Set, Command::SetPower, Some(0));
        assert!(answer(&mut dev, &off).success);
        assert_eq!(answer(&mut dev, &poll).data, Some(4)); // Cooling
        dev.tick();
        dev.tick();
        assert_eq!(answer(&mut dev, &poll).data, Some(0)); // Standby
    }

    #[test]
    fn wrong_community_is_rejected() {
        let mut dev = device();
        let wire = RequestFrame {
            category: 10,
            community: Community::new("NOPE").unwrap(),
            action: Action::Get,
            command: Command::StatusPower,
            data: None,
        }
        .to_bytes();
        let response = answer(&mut dev, &wire);
        assert!(!response.success);
        assert_eq!(response.data, Some(ErrorCode::DifferentCommunity as u16));
    }

    #[test]
    fn wrong_category_is_rejected() {
        let mut dev = device();
        let wire = RequestFrame {
            category: 99,
            community: Community::default(),
            action: Action::Get,
            command: Command::StatusPower,
            data: None,
        }
        .to_bytes();
        let response = answer(&mut dev, &wire);
        assert!(!response.success);
        assert_eq!(response.data, Some(ErrorCode::InvalidCategory as u16));
    }

    #[test]
    fn get_on_set_only_item_is_rejected() {
        let mut dev = device();
        let wire = request(&dev, Action::Get, Command::SetPower, None);
        let response = answer(&mut dev, &wire);
        assert!(!response.success);
        assert_eq!(response.data, Some(ErrorCode::InvalidItemRequest as u16));
    }

    #[test]
    fn set_without_payload_is_rejected() {
        let mut dev = device();
        let wire = request(&dev, Action::Set, Command::Contrast, None);
        let response = answer(&mut dev, &wire);
        assert!(!response.success);
        assert_eq!(response.data, Some(ErrorCode::ShortData as u16));
    }

    #[test]
    fn out_of_range_setting_is_rejected() {
        let mut dev = device();
        let wire = request(&dev, Action::Set, Command::Brightness, Some(101));
        let response = answer(&mut dev, &wire);
        assert!(!response.success);
        assert_eq!(response.data, Some(ErrorCode::InvalidData as u16));
    }

    #[test]
    fn picture_setting_set_then_get() {
        let mut dev = device();
        let set = request(&dev, Action::Set, Command::Hue, Some(42));
        assert!(answer(&mut dev, &set).success);

        let get = request(&dev, Action::Get, Command::Hue, None);
        assert_eq!(answer(&mut dev, &get).data, Some(42));

        // The dispatch table covers every setting.
        for setting in PictureSetting::ALL {
            let get = request(&dev, Action::Get, setting.command(), None);
            assert!(answer(&mut dev, &get).success);
        }
    }

    #[test]
    fn button_press_takes_no_payload() {
        let mut dev = device();
        let press = request(&dev, Action::Set, Command::ButtonMenu, None);
        let response = answer(&mut dev, &press);
        assert!(response.success);
        assert_eq!(response.data, None);

        let bad = request(&dev, Action::Set, Command::ButtonMenu, Some(1));
        let response = answer(&mut dev, &bad);
        assert!(!response.success);
        assert_eq!(response.data, Some(ErrorCode::InvalidLength as u16));
    }

    #[test]
    fn malformed_request_is_answered_not_dropped() {
        let mut dev = device();
        let response = answer(&mut dev, &[0x02, 0x0A]);
        assert!(!response.success);
        assert_eq!(response.data, Some(ErrorCode::ShortHeader as u16));
    }

    #[test]
    fn fault_injection_shows_in_status() {
        let mut dev = device();
        dev.inject_fault(ErrorStatus::LAMP_ERROR | ErrorStatus::TEMP_WARNING);
        let wire = request(&dev, Action::Get, Command::StatusError, None);
        let response = answer(&mut dev, &wire);
        assert_eq!(
            response.data,
            Some((ErrorStatus::LAMP_ERROR | ErrorStatus::TEMP_WARNING).bits())
        );
    }

    #[test]
    fn announcement_tracks_power_state() {
        let mut dev = device();
        let wire = request(&dev, Action::Set, Command::SetPower, Some(1));
        dev.handle(&wire);
        dev.tick();
        dev.tick();

        let announcement = dev.announcement();
        let parsed = DeviceDescriptor::from_announcement(
            &announcement,
            "127.0.0.1".parse().unwrap(),
        )
        .unwrap();
        assert_eq!(parsed.power_state, PowerState::PowerOn as u16);
        assert_eq!(parsed.serial_number, 9000);
    }
}
