//! Domain-specific error types for the SDCP protocol.
//!
//! All fallible operations return `Result<T, SdcpError>`.
//! No panics on invalid input — every error is typed and recoverable.

use std::time::Duration;
use thiserror::Error;

use crate::status::ErrorCode;

/// The canonical error type for the SDCP protocol.
#[derive(Debug, Error)]
pub enum SdcpError {
    // ── Encoding Errors ──────────────────────────────────────────
    /// The community string is not exactly 4 ASCII characters.
    #[error("invalid community string {0:?}: must be exactly 4 ASCII characters")]
    InvalidCommunity(String),

    // ── Decode Errors ────────────────────────────────────────────
    /// The received frame is shorter than its declared length.
    #[error("short frame: need {expected} bytes, got {actual}")]
    ShortFrame { expected: usize, actual: usize },

    /// The data-length byte holds a value other than 0 or 2.
    #[error("invalid data length: {0} (expected 0 or 2)")]
    InvalidDataLength(u8),

    /// The frame carries a protocol version this client does not speak.
    #[error("unsupported protocol version: {0}")]
    UnsupportedVersion(u8),

    /// A numeric value did not map to any known vocabulary entry.
    #[error("unknown {type_name} code: {value:#06x}")]
    UnknownCode { type_name: &'static str, value: u16 },

    /// A getter's success response carried no data value.
    #[error("response carried no data value")]
    MissingData,

    // ── Connection Errors ────────────────────────────────────────
    /// The TCP/UDP layer reported an error.
    #[error("connection error: {0}")]
    Connection(#[from] std::io::Error),

    /// An exchange exceeded its deadline.
    #[error("timeout after {0:?}")]
    Timeout(Duration),

    // ── Device Errors ────────────────────────────────────────────
    /// The projector explicitly reported failure with a known error code.
    #[error("projector reported {0}")]
    Device(ErrorCode),
}

impl SdcpError {
    /// Returns `true` for the one benign device error: querying a setting
    /// that is not applicable to the current input. Callers polling a
    /// full status snapshot typically skip this instead of failing.
    pub fn is_not_applicable(&self) -> bool {
        matches!(self, SdcpError::Device(ErrorCode::NotApplicableItem))
    }
}
