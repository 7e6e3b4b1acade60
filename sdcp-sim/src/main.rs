//! SDCP projector simulator — entry point.
//!
//! ```text
//! sdcp-sim                                Serve on the standard ports
//! sdcp-sim --control-port 10484           Custom control port
//! sdcp-sim --announce-target 127.0.0.1:53862 --announce-secs 5
//! sdcp-sim --community HOME --serial 42   Identity overrides
//! sdcp-sim --fault lamp                   Latch a hardware fault
//! ```
//!
//! Answers exactly one control frame per TCP connection, matching the
//! vendor device, and broadcasts SDAP announcements on an interval.

use std::net::{IpAddr, Ipv4Addr};
use std::sync::Arc;
use std::time::Duration;

use clap::{Parser, ValueEnum};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream, UdpSocket};
use tokio::sync::Mutex;
use tracing::{debug, info, warn};
use tracing_subscriber::EnvFilter;

use sdcp_core::{
    Community, DEFAULT_CONTROL_PORT, DEFAULT_DISCOVERY_PORT, DeviceDescriptor, ErrorStatus,
    PROTOCOL_VERSION,
};

mod device;

use device::SimulatedProjector;

// ── CLI ──────────────────────────────────────────────────────────

#[derive(Parser, Debug)]
#[command(name = "sdcp-sim", about = "SDCP projector simulator")]
struct Cli {
    /// Address to bind.
    #[arg(long, default_value = "0.0.0.0")]
    bind: IpAddr,

    /// TCP control port.
    #[arg(long, default_value_t = DEFAULT_CONTROL_PORT)]
    control_port: u16,

    /// Where to send SDAP announcements.
    #[arg(long, default_value_t = format!("255.255.255.255:{DEFAULT_DISCOVERY_PORT}"))]
    announce_target: String,

    /// Seconds between announcements (0 disables announcing).
    #[arg(long, default_value_t = 30)]
    announce_secs: u64,

    /// Community tag (exactly 4 ASCII characters).
    #[arg(long, default_value = "SONY")]
    community: String,

    /// Category byte.
    #[arg(long, default_value_t = 0x0A)]
    category: u8,

    /// Serial number.
    #[arg(long, default_value_t = 9_001)]
    serial: u32,

    /// Announced product name.
    #[arg(long, default_value = "VPL-SIM")]
    name: String,

    /// Announced location.
    #[arg(long, default_value = "")]
    location: String,

    /// Latch a hardware fault at startup.
    #[arg(long, value_enum)]
    fault: Vec<FaultArg>,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum FaultArg {
    Lamp,
    Fan,
    Cover,
    Temp,
    D5vPower,
    Power,
    TempWarning,
    NvmData,
}

impl From<FaultArg> for ErrorStatus {
    fn from(arg: FaultArg) -> Self {
        match arg {
            FaultArg::Lamp => ErrorStatus::LAMP_ERROR,
            FaultArg::Fan => ErrorStatus::FAN_ERROR,
            FaultArg::Cover => ErrorStatus::COVER_ERROR,
            FaultArg::Temp => ErrorStatus::TEMP_ERROR,
            FaultArg::D5vPower => ErrorStatus::D5V_POWER_ERROR,
            FaultArg::Power => ErrorStatus::POWER_ERROR,
            FaultArg::TempWarning => ErrorStatus::TEMP_WARNING,
            FaultArg::NvmData => ErrorStatus::NVM_DATA_ERROR,
        }
    }
}

// ── Main ─────────────────────────────────────────────────────────

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let descriptor = DeviceDescriptor {
        version: PROTOCOL_VERSION,
        category: cli.category,
        community: Community::new(&cli.community)?,
        device_id: "PJ".into(),
        product_name: cli.name.clone(),
        serial_number: cli.serial,
        power_state: 0,
        location: cli.location.clone(),
        address: IpAddr::V4(Ipv4Addr::UNSPECIFIED),
    };

    let mut projector = SimulatedProjector::new(descriptor);
    for fault in &cli.fault {
        projector.inject_fault((*fault).into());
    }
    let projector = Arc::new(Mutex::new(projector));

    info!("sdcp-sim v{}", env!("CARGO_PKG_VERSION"));
    info!("serial: {}, community: {}", cli.serial, cli.community);
    info!("control port: {}", cli.control_port);

    // Power transitions advance on a fixed tick.
    {
        let projector = projector.clone();
        tokio::spawn(async move {
            let mut interval = tokio::time::interval(Duration::from_secs(2));
            loop {
                interval.tick().await;
                projector.lock().await.tick();
            }
        });
    }

    // SDAP announcer.
    if cli.announce_secs > 0 {
        let projector = projector.clone();
        let target = cli.announce_target.clone();
        let announce_secs = cli.announce_secs;
        tokio::spawn(async move {
            let socket = match UdpSocket::bind("0.0.0.0:0").await {
                Ok(socket) => socket,
                Err(e) => {
                    warn!("announcer disabled: {e}");
                    return;
                }
            };
            if let Err(e) = socket.set_broadcast(true) {
                warn!("cannot enable broadcast: {e}");
            }
            let mut interval = tokio::time::interval(Duration::from_secs(announce_secs));
            loop {
                interval.tick().await;
                let announcement = projector.lock().await.announcement();
                match socket.send_to(&announcement, &target).await {
                    Ok(_) => debug!("announced to {target}"),
                    Err(e) => warn!("announce failed: {e}"),
                }
            }
        });
    }

    // Control loop: one frame per connection.
    let listener = TcpListener::bind((cli.bind, cli.control_port)).await?;
    info!("listening on {}", listener.local_addr()?);

    loop {
        let (stream, peer) = listener.accept().await?;
        debug!("connection from {peer}");
        let projector = projector.clone();
        tokio::spawn(async move {
            if let Err(e) = serve_one(stream, projector).await {
                debug!("connection from {peer} ended: {e}");
            }
        });
    }
}

/// Read one request frame, answer it, and let the connection drop.
async fn serve_one(
    mut stream: TcpStream,
    projector: Arc<Mutex<SimulatedProjector>>,
) -> std::io::Result<()> {
    let mut header = [0u8; 10];
    stream.read_exact(&mut header).await?;
    let mut request = header.to_vec();

    let data_len = header[9] as usize;
    if data_len > 0 && data_len <= 16 {
        let mut data = vec![0u8; data_len];
        stream.read_exact(&mut data).await?;
        request.extend_from_slice(&data);
    }

    let response = projector.lock().await.handle(&request);
    stream.write_all(&response).await?;
    Ok(())
}
