//! SDAP discovery: collect broadcast announcements into descriptors.
//!
//! Projectors announce themselves periodically over UDP broadcast; the
//! protocol is fire-and-forget, so there is no way to know collection is
//! complete early. The listener therefore sleeps for the full window and
//! only then drains whatever the socket buffered.

use std::io;
use std::net::{IpAddr, Ipv4Addr};
use std::time::Duration;

use tokio::net::UdpSocket;

use crate::descriptor::DeviceDescriptor;
use crate::error::SdcpError;

/// Default UDP announcement port.
pub const DEFAULT_DISCOVERY_PORT: u16 = 53862;

/// Default listen window; the vendor announcement interval is 30 s, so
/// one full window is guaranteed to see every device on the segment.
pub const DEFAULT_LISTEN_WINDOW: Duration = Duration::from_secs(31);

// ── DiscoveryConfig ──────────────────────────────────────────────

/// Where and how long to listen for announcements.
#[derive(Debug, Clone)]
pub struct DiscoveryConfig {
    pub bind_address: IpAddr,
    pub port: u16,
    pub window: Duration,
}

impl Default for DiscoveryConfig {
    fn default() -> Self {
        Self {
            bind_address: IpAddr::V4(Ipv4Addr::UNSPECIFIED),
            port: DEFAULT_DISCOVERY_PORT,
            window: DEFAULT_LISTEN_WINDOW,
        }
    }
}

// ── discover ─────────────────────────────────────────────────────

/// Listen for one window and return every distinct projector heard.
///
/// Duplicate announcements from the same address are collapsed to the
/// first one; malformed datagrams are skipped, not fatal. Hearing
/// nothing returns an empty list — that is not an error condition.
pub async fn discover(config: &DiscoveryConfig) -> Result<Vec<DeviceDescriptor>, SdcpError> {
    let socket = UdpSocket::bind((config.bind_address, config.port)).await?;
    tracing::debug!(port = config.port, window = ?config.window, "listening for announcements");

    tokio::time::sleep(config.window).await;

    let mut devices: Vec<DeviceDescriptor> = Vec::new();
    let mut buf = [0u8; 1024];
    loop {
        match socket.try_recv_from(&mut buf) {
            Ok((len, addr)) => {
                match DeviceDescriptor::from_announcement(&buf[..len], addr.ip()) {
                    Ok(descriptor) => {
                        if devices.iter().any(|d| d.address == descriptor.address) {
                            tracing::trace!(address = %addr, "duplicate announcement");
                        } else {
                            tracing::debug!(
                                address = %addr,
                                serial = descriptor.serial_number,
                                product = %descriptor.product_name,
                                "projector announced"
                            );
                            devices.push(descriptor);
                        }
                    }
                    Err(e) => {
                        tracing::debug!(address = %addr, error = %e, "skipping malformed announcement");
                    }
                }
            }
            Err(e) if e.kind() == io::ErrorKind::WouldBlock => break,
            Err(e) => return Err(e.into()),
        }
    }

    tracing::debug!(count = devices.len(), "discovery window closed");
    Ok(devices)
}
