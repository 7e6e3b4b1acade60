//! Status vocabularies: power state machine positions, input sources,
//! device error codes, and the hardware fault bitmask.

use crate::error::SdcpError;
use std::fmt;

// ── PowerState ───────────────────────────────────────────────────

/// Position of the projector's power state machine.
///
/// ```text
///  Standby ──► StartUp ──► StartUpLamp ──► PowerOn
///     ▲                                       │
///     └────── Cooling2 ◄──── Cooling ◄────────┘
/// ```
#[repr(u16)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PowerState {
    Standby = 0,
    StartUp = 1,
    StartUpLamp = 2,
    PowerOn = 3,
    Cooling = 4,
    Cooling2 = 5,
}

impl PowerState {
    /// Lamp lit and picture available.
    pub fn is_on(&self) -> bool {
        matches!(self, PowerState::PowerOn)
    }

    /// Fully in standby.
    pub fn is_off(&self) -> bool {
        matches!(self, PowerState::Standby)
    }

    /// Somewhere on the way up.
    pub fn is_powering_on(&self) -> bool {
        matches!(self, PowerState::StartUp | PowerState::StartUpLamp)
    }

    /// Somewhere on the way down.
    pub fn is_powering_off(&self) -> bool {
        matches!(self, PowerState::Cooling | PowerState::Cooling2)
    }
}

impl TryFrom<u16> for PowerState {
    type Error = SdcpError;

    fn try_from(value: u16) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(PowerState::Standby),
            1 => Ok(PowerState::StartUp),
            2 => Ok(PowerState::StartUpLamp),
            3 => Ok(PowerState::PowerOn),
            4 => Ok(PowerState::Cooling),
            5 => Ok(PowerState::Cooling2),
            _ => Err(SdcpError::UnknownCode {
                type_name: "PowerState",
                value,
            }),
        }
    }
}

impl fmt::Display for PowerState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

// ── InputSource ──────────────────────────────────────────────────

/// Selectable input terminals.
#[repr(u16)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum InputSource {
    Video = 0,
    SVideo = 1,
    InputA = 2,
    Component = 3,
    Hdmi = 4,
    Dvi = 5,
}

impl TryFrom<u16> for InputSource {
    type Error = SdcpError;

    fn try_from(value: u16) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(InputSource::Video),
            1 => Ok(InputSource::SVideo),
            2 => Ok(InputSource::InputA),
            3 => Ok(InputSource::Component),
            4 => Ok(InputSource::Hdmi),
            5 => Ok(InputSource::Dvi),
            _ => Err(SdcpError::UnknownCode {
                type_name: "InputSource",
                value,
            }),
        }
    }
}

impl fmt::Display for InputSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

// ── ErrorCode ────────────────────────────────────────────────────

/// Error codes a projector can answer a command with.
///
/// `NotApplicableItem` is the one expected/benign code (the addressed
/// item does not apply to the current input); everything else is a
/// device-level fault.
#[repr(u16)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    InvalidItem = 0x0101,
    InvalidItemRequest = 0x0102,
    InvalidLength = 0x0103,
    InvalidData = 0x0104,
    ShortData = 0x0111,
    NotApplicableItem = 0x0180,
    DifferentCommunity = 0x0201,
    InvalidVersion = 0x1001,
    InvalidCategory = 0x1002,
    InvalidRequest = 0x1003,
    ShortHeader = 0x1011,
    ShortCommunity = 0x1012,
    ShortCommand = 0x1013,
    NetworkTimeout = 0x2001,
    CommunicationTimeout = 0xF001,
    ChecksumError = 0xF010,
    FramingError = 0xF020,
    ParityError = 0xF030,
    OverrunError = 0xF040,
    OtherCommError = 0xF050,
    UnknownResponse = 0xF0F0,
    NvramReadError = 0xF110,
    NvramWriteError = 0xF120,
}

impl TryFrom<u16> for ErrorCode {
    type Error = SdcpError;

    fn try_from(value: u16) -> Result<Self, Self::Error> {
        match value {
            0x0101 => Ok(ErrorCode::InvalidItem),
            0x0102 => Ok(ErrorCode::InvalidItemRequest),
            0x0103 => Ok(ErrorCode::InvalidLength),
            0x0104 => Ok(ErrorCode::InvalidData),
            0x0111 => Ok(ErrorCode::ShortData),
            0x0180 => Ok(ErrorCode::NotApplicableItem),
            0x0201 => Ok(ErrorCode::DifferentCommunity),
            0x1001 => Ok(ErrorCode::InvalidVersion),
            0x1002 => Ok(ErrorCode::InvalidCategory),
            0x1003 => Ok(ErrorCode::InvalidRequest),
            0x1011 => Ok(ErrorCode::ShortHeader),
            0x1012 => Ok(ErrorCode::ShortCommunity),
            0x1013 => Ok(ErrorCode::ShortCommand),
            0x2001 => Ok(ErrorCode::NetworkTimeout),
            0xF001 => Ok(ErrorCode::CommunicationTimeout),
            0xF010 => Ok(ErrorCode::ChecksumError),
            0xF020 => Ok(ErrorCode::FramingError),
            0xF030 => Ok(ErrorCode::ParityError),
            0xF040 => Ok(ErrorCode::OverrunError),
            0xF050 => Ok(ErrorCode::OtherCommError),
            0xF0F0 => Ok(ErrorCode::UnknownResponse),
            0xF110 => Ok(ErrorCode::NvramReadError),
            0xF120 => Ok(ErrorCode::NvramWriteError),
            _ => Err(SdcpError::UnknownCode {
                type_name: "ErrorCode",
                value,
            }),
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

// ── ErrorStatus ──────────────────────────────────────────────────

bitflags::bitflags! {
    /// Bitmask of simultaneously active hardware faults reported by
    /// `Command::StatusError`. Empty means no error.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct ErrorStatus: u16 {
        const LAMP_ERROR = 1;
        const FAN_ERROR = 2;
        const COVER_ERROR = 4;
        const TEMP_ERROR = 8;
        const D5V_POWER_ERROR = 16;
        const POWER_ERROR = 32;
        const TEMP_WARNING = 64;
        const NVM_DATA_ERROR = 128;
    }
}

impl ErrorStatus {
    /// Strict conversion from the wire value: any bit outside the
    /// declared set is an unrecognized code, never a truncated mask.
    pub fn from_wire(value: u16) -> Result<Self, SdcpError> {
        ErrorStatus::from_bits(value).ok_or(SdcpError::UnknownCode {
            type_name: "ErrorStatus",
            value,
        })
    }
}

impl fmt::Display for ErrorStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_empty() {
            return f.write_str("NO_ERROR");
        }
        let mut first = true;
        for (name, _) in self.iter_names() {
            if !first {
                f.write_str(", ")?;
            }
            f.write_str(name)?;
            first = false;
        }
        Ok(())
    }
}
