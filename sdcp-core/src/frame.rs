//! Fixed-layout request and response frames.
//!
//! This is the bit-exact compatibility surface: request frames must be
//! byte-identical to what the vendor firmware expects, and response
//! frames are parsed unchanged.
//!
//! ```text
//! offset 0     : protocol version, constant 2
//! offset 1     : category
//! offset 2-5   : community, 4 raw ASCII bytes
//! offset 6     : action code (request) / success flag (response)
//! offset 7-8   : command code, u16 BE
//! offset 9     : data length, 0 or 2
//! offset 10-11 : data value, u16 BE (iff length == 2)
//! ```

use crate::command::{Action, Command};
use crate::descriptor::{Community, DeviceDescriptor};
use crate::error::SdcpError;

/// The only protocol version the firmware line speaks.
pub const PROTOCOL_VERSION: u8 = 2;

/// Fixed header size; a frame is this or this plus one u16 of data.
pub const HEADER_LENGTH: usize = 10;

/// Largest possible frame.
pub const MAX_FRAME_LENGTH: usize = HEADER_LENGTH + 2;

// ── RequestFrame ─────────────────────────────────────────────────

/// One controller → projector request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RequestFrame {
    pub category: u8,
    pub community: Community,
    pub action: Action,
    pub command: Command,
    pub data: Option<u16>,
}

impl RequestFrame {
    /// Build a request addressed with a descriptor's category and
    /// community.
    pub fn new(
        descriptor: &DeviceDescriptor,
        action: Action,
        command: Command,
        data: Option<u16>,
    ) -> Self {
        RequestFrame {
            category: descriptor.category,
            community: descriptor.community,
            action,
            command,
            data,
        }
    }

    /// Serialize to exactly 10 bytes, or 12 when a data value rides along.
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut buf = Vec::with_capacity(MAX_FRAME_LENGTH);
        buf.push(PROTOCOL_VERSION);
        buf.push(self.category);
        buf.extend_from_slice(self.community.as_bytes());
        buf.push(self.action as u8);
        buf.extend_from_slice(&(self.command as u16).to_be_bytes());
        match self.data {
            Some(value) => {
                buf.push(2);
                buf.extend_from_slice(&value.to_be_bytes());
            }
            None => buf.push(0),
        }
        buf
    }

    /// Device-side parse. Fails closed on anything outside the closed
    /// vocabulary so firmware behavior changes surface as errors.
    pub fn from_bytes(buf: &[u8]) -> Result<Self, SdcpError> {
        if buf.len() < HEADER_LENGTH {
            return Err(SdcpError::ShortFrame {
                expected: HEADER_LENGTH,
                actual: buf.len(),
            });
        }
        if buf[0] != PROTOCOL_VERSION {
            return Err(SdcpError::UnsupportedVersion(buf[0]));
        }
        let community = Community::from_bytes([buf[2], buf[3], buf[4], buf[5]])?;
        let action = Action::try_from(buf[6])?;
        let command = Command::try_from(u16::from_be_bytes([buf[7], buf[8]]))?;
        let data = match buf[9] {
            0 => None,
            2 => {
                if buf.len() < HEADER_LENGTH + 2 {
                    return Err(SdcpError::ShortFrame {
                        expected: HEADER_LENGTH + 2,
                        actual: buf.len(),
                    });
                }
                Some(u16::from_be_bytes([buf[10], buf[11]]))
            }
            other => return Err(SdcpError::InvalidDataLength(other)),
        };
        Ok(RequestFrame {
            category: buf[1],
            community,
            action,
            command,
            data,
        })
    }
}

// ── ResponseFrame ────────────────────────────────────────────────

/// One projector → controller response.
///
/// The echoed command code stays a raw `u16`; the controller matched it
/// to a request it just sent and does not re-validate it. On failure
/// (`success == false`) the data field holds the numeric error code.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResponseFrame {
    pub category: u8,
    pub community: [u8; 4],
    pub success: bool,
    pub command: u16,
    pub data: Option<u16>,
}

impl ResponseFrame {
    /// Parse a response buffer. A buffer shorter than the declared data
    /// length is a hard failure; no partial-frame recovery is attempted.
    pub fn from_bytes(buf: &[u8]) -> Result<Self, SdcpError> {
        if buf.len() < HEADER_LENGTH {
            return Err(SdcpError::ShortFrame {
                expected: HEADER_LENGTH,
                actual: buf.len(),
            });
        }
        let data = match buf[9] {
            0 => None,
            2 => {
                if buf.len() < HEADER_LENGTH + 2 {
                    return Err(SdcpError::ShortFrame {
                        expected: HEADER_LENGTH + 2,
                        actual: buf.len(),
                    });
                }
                Some(u16::from_be_bytes([buf[10], buf[11]]))
            }
            other => return Err(SdcpError::InvalidDataLength(other)),
        };
        Ok(ResponseFrame {
            category: buf[1],
            community: [buf[2], buf[3], buf[4], buf[5]],
            success: buf[6] != 0,
            command: u16::from_be_bytes([buf[7], buf[8]]),
            data,
        })
    }

    /// Serialize (simulator / tests).
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut buf = Vec::with_capacity(MAX_FRAME_LENGTH);
        buf.push(PROTOCOL_VERSION);
        buf.push(self.category);
        buf.extend_from_slice(&self.community);
        buf.push(self.success as u8);
        buf.extend_from_slice(&self.command.to_be_bytes());
        match self.data {
            Some(value) => {
                buf.push(2);
                buf.extend_from_slice(&value.to_be_bytes());
            }
            None => buf.push(0),
        }
        buf
    }
}
