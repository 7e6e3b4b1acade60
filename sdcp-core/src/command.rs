//! Protocol command vocabulary.
//!
//! Closed sets of numeric codes, `TryFrom` conversions that fail on
//! unknown values — no panics, no silent defaults.

use crate::error::SdcpError;
use std::fmt;

// ── Action ───────────────────────────────────────────────────────

/// Whether a command reads or writes the addressed item.
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    /// Write the item (or emulate a button press).
    Set = 0x00,
    /// Read the item.
    Get = 0x01,
}

impl TryFrom<u8> for Action {
    type Error = SdcpError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0x00 => Ok(Action::Set),
            0x01 => Ok(Action::Get),
            _ => Err(SdcpError::UnknownCode {
                type_name: "Action",
                value: value as u16,
            }),
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Action::Set => write!(f, "Set"),
            Action::Get => write!(f, "Get"),
        }
    }
}

// ── Command ──────────────────────────────────────────────────────

/// All item codes understood by the projector.
///
/// Organized by category:
/// - `0x00xx` — installation items (input, presets, aspect)
/// - `0x001x` — picture adjustment items
/// - `0x01xx` — status queries and versions
/// - `0x15xx` — IR button emulation
#[repr(u16)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Command {
    // ── Installation (0x00xx) ────────────────────────────────────
    /// Active input terminal.
    Input = 0x0001,
    /// Calibration (picture) preset slot.
    CalibrationPreset = 0x0002,
    /// Aspect ratio mode.
    AspectRatio = 0x0020,
    /// Power control (set-only; state is read via `StatusPower`).
    SetPower = 0x0130,

    // ── Picture adjustment (0x001x) ──────────────────────────────
    Contrast = 0x0010,
    Brightness = 0x0011,
    Color = 0x0012,
    Hue = 0x0013,
    Sharpness = 0x0014,

    // ── Status (0x01xx) ──────────────────────────────────────────
    /// Hardware fault bitmask.
    StatusError = 0x0101,
    /// Power state machine position.
    StatusPower = 0x0102,
    /// Lamp usage hours.
    StatusLampTimer = 0x0113,
    /// Main ROM version, packed major/minor.
    RomVersion = 0x011D,
    /// Sub-CPU ROM version, packed major/minor.
    ScRomVersion = 0x011E,
    /// NVM data layout version.
    NvmDataVersion = 0x0127,

    // ── Button emulation (0x15xx) ────────────────────────────────
    ButtonMenu = 0x1529,
    ButtonRight = 0x1533,
    ButtonLeft = 0x1534,
    ButtonUp = 0x1535,
    ButtonDown = 0x1536,
    ButtonEnter = 0x155A,
    ButtonReset = 0x157B,
}

impl TryFrom<u16> for Command {
    type Error = SdcpError;

    fn try_from(value: u16) -> Result<Self, Self::Error> {
        match value {
            0x0001 => Ok(Command::Input),
            0x0002 => Ok(Command::CalibrationPreset),
            0x0020 => Ok(Command::AspectRatio),
            0x0130 => Ok(Command::SetPower),

            0x0010 => Ok(Command::Contrast),
            0x0011 => Ok(Command::Brightness),
            0x0012 => Ok(Command::Color),
            0x0013 => Ok(Command::Hue),
            0x0014 => Ok(Command::Sharpness),

            0x0101 => Ok(Command::StatusError),
            0x0102 => Ok(Command::StatusPower),
            0x0113 => Ok(Command::StatusLampTimer),
            0x011D => Ok(Command::RomVersion),
            0x011E => Ok(Command::ScRomVersion),
            0x0127 => Ok(Command::NvmDataVersion),

            0x1529 => Ok(Command::ButtonMenu),
            0x1533 => Ok(Command::ButtonRight),
            0x1534 => Ok(Command::ButtonLeft),
            0x1535 => Ok(Command::ButtonUp),
            0x1536 => Ok(Command::ButtonDown),
            0x155A => Ok(Command::ButtonEnter),
            0x157B => Ok(Command::ButtonReset),

            _ => Err(SdcpError::UnknownCode {
                type_name: "Command",
                value,
            }),
        }
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

impl Command {
    /// Returns `true` if the item can be read with [`Action::Get`].
    pub fn is_readable(&self) -> bool {
        !matches!(self, Command::SetPower) && !self.is_button()
    }

    /// Returns `true` for the IR button emulation codes, which take
    /// [`Action::Set`] with no payload.
    pub fn is_button(&self) -> bool {
        matches!(
            self,
            Command::ButtonMenu
                | Command::ButtonRight
                | Command::ButtonLeft
                | Command::ButtonUp
                | Command::ButtonDown
                | Command::ButtonEnter
                | Command::ButtonReset
        )
    }
}

// ── PictureSetting ───────────────────────────────────────────────

/// The five numeric picture adjustment items, as an explicit dispatch
/// table: each setting names its wire command.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PictureSetting {
    Contrast,
    Brightness,
    Color,
    Hue,
    Sharpness,
}

impl PictureSetting {
    /// All settings in declaration order, for status sweeps.
    pub const ALL: [PictureSetting; 5] = [
        PictureSetting::Contrast,
        PictureSetting::Brightness,
        PictureSetting::Color,
        PictureSetting::Hue,
        PictureSetting::Sharpness,
    ];

    /// The wire command addressing this setting.
    pub fn command(&self) -> Command {
        match self {
            PictureSetting::Contrast => Command::Contrast,
            PictureSetting::Brightness => Command::Brightness,
            PictureSetting::Color => Command::Color,
            PictureSetting::Hue => Command::Hue,
            PictureSetting::Sharpness => Command::Sharpness,
        }
    }
}

impl fmt::Display for PictureSetting {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

// ── Button ───────────────────────────────────────────────────────

/// Remote-control buttons the projector can emulate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Button {
    Menu,
    Up,
    Down,
    Left,
    Right,
    Enter,
    Reset,
}

impl Button {
    /// The wire command emulating this button.
    pub fn command(&self) -> Command {
        match self {
            Button::Menu => Command::ButtonMenu,
            Button::Up => Command::ButtonUp,
            Button::Down => Command::ButtonDown,
            Button::Left => Command::ButtonLeft,
            Button::Right => Command::ButtonRight,
            Button::Enter => Command::ButtonEnter,
            Button::Reset => Command::ButtonReset,
        }
    }
}

impl fmt::Display for Button {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}
