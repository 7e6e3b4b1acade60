//! # sdcp-core
//!
//! Client library for the SDCP network projector control protocol.
//!
//! This crate contains:
//! - **Vocabulary**: `Action`, `Command`, `PowerState`, `InputSource`,
//!   `ErrorCode`, `ErrorStatus` — closed sets of wire codes
//! - **Frames**: `RequestFrame` / `ResponseFrame`, the bit-exact wire layout
//! - **Codec**: `SdcpCodec` for framed TCP I/O via `tokio_util`
//! - **Client**: `Projector` — one-shot request/response control exchanges
//! - **Discovery**: SDAP broadcast listener producing `DeviceDescriptor`s
//! - **Registry**: `ProjectorRegistry`, clients keyed by serial number
//! - **Error**: `SdcpError` — typed, `thiserror`-based error hierarchy

pub mod codec;
pub mod command;
pub mod descriptor;
pub mod discovery;
pub mod error;
pub mod frame;
pub mod projector;
pub mod registry;
pub mod status;

// ── Re-exports for ergonomic usage ───────────────────────────────

pub use codec::SdcpCodec;
pub use command::{Action, Button, Command, PictureSetting};
pub use descriptor::{ANNOUNCEMENT_MIN_LENGTH, Community, DeviceDescriptor};
pub use discovery::{DEFAULT_DISCOVERY_PORT, DEFAULT_LISTEN_WINDOW, DiscoveryConfig, discover};
pub use error::SdcpError;
pub use frame::{HEADER_LENGTH, MAX_FRAME_LENGTH, PROTOCOL_VERSION, RequestFrame, ResponseFrame};
pub use projector::{DEFAULT_COMMAND_TIMEOUT, DEFAULT_CONTROL_PORT, Projector};
pub use registry::ProjectorRegistry;
pub use status::{ErrorCode, ErrorStatus, InputSource, PowerState};
