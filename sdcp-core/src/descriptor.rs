//! Device identity: the community tag and the descriptor record built
//! from an SDAP announcement (or from static configuration).

use std::fmt;
use std::net::IpAddr;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::SdcpError;

// ── Community ────────────────────────────────────────────────────

/// The 4-character community tag embedded in every frame.
///
/// A lightweight shared identifier, not real authentication: the
/// projector answers `DifferentCommunity` when it does not match.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Community([u8; 4]);

impl Community {
    /// Build from a string of exactly 4 ASCII characters.
    pub fn new(s: &str) -> Result<Self, SdcpError> {
        let bytes = s.as_bytes();
        if bytes.len() != 4 || !bytes.iter().all(u8::is_ascii) {
            return Err(SdcpError::InvalidCommunity(s.to_string()));
        }
        Ok(Community([bytes[0], bytes[1], bytes[2], bytes[3]]))
    }

    /// Build from 4 raw wire bytes.
    pub fn from_bytes(bytes: [u8; 4]) -> Result<Self, SdcpError> {
        if !bytes.iter().all(u8::is_ascii) {
            return Err(SdcpError::InvalidCommunity(
                String::from_utf8_lossy(&bytes).into_owned(),
            ));
        }
        Ok(Community(bytes))
    }

    pub fn as_bytes(&self) -> &[u8; 4] {
        &self.0
    }

    pub fn as_str(&self) -> &str {
        // Validated ASCII at construction.
        std::str::from_utf8(&self.0).unwrap_or("????")
    }
}

impl Default for Community {
    /// The vendor's factory default.
    fn default() -> Self {
        Community(*b"SONY")
    }
}

impl FromStr for Community {
    type Err = SdcpError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Community::new(s)
    }
}

impl TryFrom<String> for Community {
    type Error = SdcpError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Community::new(&s)
    }
}

impl From<Community> for String {
    fn from(c: Community) -> String {
        c.as_str().to_string()
    }
}

impl fmt::Display for Community {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ── DeviceDescriptor ─────────────────────────────────────────────

/// Minimum announcement size: everything up to and including the power
/// state; the location field may be absent.
pub const ANNOUNCEMENT_MIN_LENGTH: usize = 26;

/// Identity of one discovered or statically configured projector.
///
/// Created once, immutable thereafter; the addressing context for every
/// frame sent to the device. The serial number is the unique key.
///
/// Announcement wire layout (big-endian):
///
/// ```text
/// offset 0-1   : device id, 2 ASCII chars
/// offset 2     : protocol version
/// offset 3     : category
/// offset 4-7   : community, 4 raw bytes
/// offset 8-19  : product name, NUL-padded
/// offset 20-23 : serial number, u32
/// offset 24-25 : power state, u16
/// offset 26..  : location, NUL-padded
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeviceDescriptor {
    pub version: u8,
    pub category: u8,
    pub community: Community,
    pub device_id: String,
    pub product_name: String,
    pub serial_number: u32,
    /// Raw power state at announcement time; a snapshot, not live state.
    pub power_state: u16,
    pub location: String,
    pub address: IpAddr,
}

impl DeviceDescriptor {
    /// Parse one SDAP announcement datagram received from `address`.
    pub fn from_announcement(buf: &[u8], address: IpAddr) -> Result<Self, SdcpError> {
        if buf.len() < ANNOUNCEMENT_MIN_LENGTH {
            return Err(SdcpError::ShortFrame {
                expected: ANNOUNCEMENT_MIN_LENGTH,
                actual: buf.len(),
            });
        }
        Ok(DeviceDescriptor {
            version: buf[2],
            category: buf[3],
            community: Community::from_bytes([buf[4], buf[5], buf[6], buf[7]])?,
            device_id: String::from_utf8_lossy(&buf[0..2]).into_owned(),
            product_name: decode_text_field(&buf[8..20]),
            serial_number: u32::from_be_bytes([buf[20], buf[21], buf[22], buf[23]]),
            power_state: u16::from_be_bytes([buf[24], buf[25]]),
            location: decode_text_field(&buf[26..]),
            address,
        })
    }

    /// Serialize to the announcement layout (simulator / tests).
    pub fn to_announcement(&self) -> Vec<u8> {
        let mut buf = Vec::with_capacity(ANNOUNCEMENT_MIN_LENGTH + self.location.len());
        buf.extend_from_slice(&pad_text_field::<2>(&self.device_id));
        buf.push(self.version);
        buf.push(self.category);
        buf.extend_from_slice(self.community.as_bytes());
        buf.extend_from_slice(&pad_text_field::<12>(&self.product_name));
        buf.extend_from_slice(&self.serial_number.to_be_bytes());
        buf.extend_from_slice(&self.power_state.to_be_bytes());
        buf.extend_from_slice(self.location.as_bytes());
        buf
    }
}

/// Convert a NUL-padded wire field to a trimmed string.
fn decode_text_field(buf: &[u8]) -> String {
    String::from_utf8_lossy(buf)
        .trim_matches('\0')
        .to_string()
}

/// Truncate or NUL-pad text into a fixed-width wire field.
fn pad_text_field<const N: usize>(text: &str) -> [u8; N] {
    let mut field = [0u8; N];
    let bytes = text.as_bytes();
    let len = bytes.len().min(N);
    field[..len].copy_from_slice(&bytes[..len]);
    field
}

#[cfg(test)]
mod tests {
    use super::*;

    fn descriptor() -> DeviceDescriptor {
        DeviceDescriptor {
            version: 2,
            category: 10,
            community: Community::default(),
            device_id: "PJ".into(),
            product_name: "VPL-VW520".into(),
            serial_number: 0x00BC_614E,
            power_state: 0,
            location: "den".into(),
            address: "192.168.1.64".parse().unwrap(),
        }
    }

    #[test]
    fn community_requires_four_ascii_chars() {
        assert!(Community::new("SONY").is_ok());
        assert!(matches!(
            Community::new("LONGER"),
            Err(SdcpError::InvalidCommunity(_))
        ));
        assert!(Community::new("abc").is_err());
        assert!(Community::new("日本語!").is_err());
    }

    #[test]
    fn community_default_is_vendor_default() {
        assert_eq!(Community::default().as_str(), "SONY");
    }

    #[test]
    fn announcement_roundtrip() {
        let original = descriptor();
        let wire = original.to_announcement();
        let parsed =
            DeviceDescriptor::from_announcement(&wire, original.address).unwrap();
        assert_eq!(parsed, original);
    }

    #[test]
    fn announcement_trims_padding() {
        let mut d = descriptor();
        d.product_name = "SHORT".into();
        let parsed =
            DeviceDescriptor::from_announcement(&d.to_announcement(), d.address).unwrap();
        assert_eq!(parsed.product_name, "SHORT");
    }

    #[test]
    fn announcement_too_short_is_rejected() {
        let addr: IpAddr = "10.0.0.1".parse().unwrap();
        let err = DeviceDescriptor::from_announcement(&[0u8; 20], addr).unwrap_err();
        assert!(matches!(err, SdcpError::ShortFrame { expected: 26, .. }));
    }

    #[test]
    fn announcement_without_location() {
        let mut d = descriptor();
        d.location = String::new();
        let wire = d.to_announcement();
        assert_eq!(wire.len(), ANNOUNCEMENT_MIN_LENGTH);
        let parsed = DeviceDescriptor::from_announcement(&wire, d.address).unwrap();
        assert_eq!(parsed.location, "");
    }
}
