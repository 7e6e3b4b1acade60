//! Configuration for the control CLI.

use std::net::IpAddr;
use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use sdcp_core::{Community, DEFAULT_CONTROL_PORT, DeviceDescriptor, PROTOCOL_VERSION, Projector};

/// Top-level configuration loaded from a TOML file.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CtlConfig {
    /// The projector to talk to.
    pub projector: ProjectorConfig,
    /// Logging settings.
    pub logging: LoggingConfig,
}

/// Static addressing for one projector.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ProjectorConfig {
    /// Device IP address. Empty means it must come from `--host`.
    pub address: String,
    /// TCP control port.
    pub port: u16,
    /// 4-character community tag.
    pub community: String,
    /// Device category byte (0x0A for the projector line).
    pub category: u8,
    /// Per-command deadline in seconds.
    pub timeout_secs: u64,
}

/// Logging settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level: "trace", "debug", "info", "warn", "error".
    pub level: String,
}

// ── Defaults ─────────────────────────────────────────────────────

impl Default for CtlConfig {
    fn default() -> Self {
        Self {
            projector: ProjectorConfig::default(),
            logging: LoggingConfig::default(),
        }
    }
}

impl Default for ProjectorConfig {
    fn default() -> Self {
        Self {
            address: String::new(),
            port: DEFAULT_CONTROL_PORT,
            community: "SONY".into(),
            category: 0x0A,
            timeout_secs: 2,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".into(),
        }
    }
}

// ── Loading ──────────────────────────────────────────────────────

impl CtlConfig {
    /// Load configuration from a TOML file, falling back to defaults.
    pub fn load(path: &Path) -> Self {
        match std::fs::read_to_string(path) {
            Ok(contents) => toml::from_str(&contents).unwrap_or_else(|e| {
                tracing::warn!("invalid config {}: {e}; using defaults", path.display());
                Self::default()
            }),
            Err(_) => Self::default(),
        }
    }
}

impl ProjectorConfig {
    /// Build a client, letting `--host` override the configured address.
    pub fn to_client(&self, host: Option<IpAddr>) -> Result<Projector, Box<dyn std::error::Error>> {
        let address = match host {
            Some(addr) => addr,
            None if self.address.is_empty() => {
                return Err("no projector address: set projector.address or pass --host".into());
            }
            None => self.address.parse()?,
        };
        let community = Community::new(&self.community)?;
        let descriptor = DeviceDescriptor {
            version: PROTOCOL_VERSION,
            category: self.category,
            community,
            device_id: String::new(),
            product_name: String::new(),
            serial_number: 0,
            power_state: 0,
            location: String::new(),
            address,
        };
        Ok(Projector::new(descriptor)
            .with_port(self.port)
            .with_timeout(Duration::from_secs(self.timeout_secs)))
    }
}

// ── Tests ────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_serializes() {
        let cfg = CtlConfig::default();
        let text = toml::to_string_pretty(&cfg).unwrap();
        assert!(text.contains("community"));
        assert!(text.contains("level"));
    }

    #[test]
    fn roundtrip_config() {
        let cfg = CtlConfig::default();
        let text = toml::to_string_pretty(&cfg).unwrap();
        let parsed: CtlConfig = toml::from_str(&text).unwrap();
        assert_eq!(parsed.projector.port, DEFAULT_CONTROL_PORT);
        assert_eq!(parsed.projector.community, "SONY");
    }

    #[test]
    fn to_client_needs_an_address() {
        let cfg = ProjectorConfig::default();
        assert!(cfg.to_client(None).is_err());
        assert!(cfg.to_client(Some("192.168.1.50".parse().unwrap())).is_ok());
    }

    #[test]
    fn to_client_rejects_bad_community() {
        let cfg = ProjectorConfig {
            community: "TOO LONG".into(),
            ..Default::default()
        };
        assert!(cfg.to_client(Some("192.168.1.50".parse().unwrap())).is_err());
    }

    #[test]
    fn host_overrides_configured_address() {
        let cfg = ProjectorConfig {
            address: "192.168.1.50".into(),
            ..Default::default()
        };
        let client = cfg.to_client(Some("10.0.0.9".parse().unwrap())).unwrap();
        assert_eq!(
            client.descriptor().address,
            "10.0.0.9".parse::<IpAddr>().unwrap()
        );
    }
}
