//! SDCP projector control CLI — entry point.
//!
//! ```text
//! sdcp-ctl discover                     Listen for projector announcements
//! sdcp-ctl --host 192.168.1.50 status   Poll power, faults, lamp, picture
//! sdcp-ctl power on|off                 Start up / go to standby
//! sdcp-ctl input [hdmi]                 Show or switch the active input
//! sdcp-ctl picture contrast [42]        Read or write a picture setting
//! sdcp-ctl press menu                   Emulate a remote button
//! sdcp-ctl version                      ROM / SC ROM / NVM versions
//! sdcp-ctl --gen-config                 Write default config to stdout
//! ```

use std::net::IpAddr;
use std::path::PathBuf;
use std::time::Duration;

use clap::{Parser, Subcommand, ValueEnum};
use tracing::info;
use tracing_subscriber::EnvFilter;

use sdcp_core::{
    Button, DiscoveryConfig, InputSource, PictureSetting, Projector, SdcpError, discover,
};

mod config;

use config::CtlConfig;

// ── CLI ──────────────────────────────────────────────────────────

#[derive(Parser, Debug)]
#[command(name = "sdcp-ctl", about = "SDCP network projector control")]
struct Cli {
    /// Path to configuration TOML file.
    #[arg(short, long, default_value = "sdcp-ctl.toml")]
    config: PathBuf,

    /// Projector address, overriding the configured one.
    #[arg(long)]
    host: Option<IpAddr>,

    /// Print the default configuration to stdout and exit.
    #[arg(long)]
    gen_config: bool,

    #[command(subcommand)]
    command: Option<CtlCommand>,
}

#[derive(Subcommand, Debug)]
enum CtlCommand {
    /// Listen for SDAP broadcast announcements.
    Discover {
        /// UDP port to listen on.
        #[arg(long)]
        port: Option<u16>,
        /// Listen window in seconds.
        #[arg(long)]
        window_secs: Option<u64>,
    },
    /// Poll power, fault, lamp and picture state.
    Status,
    /// Start up or go to standby.
    Power {
        #[arg(value_enum)]
        state: PowerArg,
    },
    /// Show the active input, or switch it.
    Input {
        #[arg(value_enum)]
        source: Option<InputArg>,
    },
    /// Read a picture setting, or write it when a value is given.
    Picture {
        #[arg(value_enum)]
        setting: SettingArg,
        value: Option<u16>,
    },
    /// Emulate a remote-control button press.
    Press {
        #[arg(value_enum)]
        button: ButtonArg,
    },
    /// Report firmware versions.
    Version,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum PowerArg {
    On,
    Off,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum InputArg {
    Video,
    Svideo,
    InputA,
    Component,
    Hdmi,
    Dvi,
}

impl From<InputArg> for InputSource {
    fn from(arg: InputArg) -> Self {
        match arg {
            InputArg::Video => InputSource::Video,
            InputArg::Svideo => InputSource::SVideo,
            InputArg::InputA => InputSource::InputA,
            InputArg::Component => InputSource::Component,
            InputArg::Hdmi => InputSource::Hdmi,
            InputArg::Dvi => InputSource::Dvi,
        }
    }
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum SettingArg {
    Contrast,
    Brightness,
    Color,
    Hue,
    Sharpness,
}

impl From<SettingArg> for PictureSetting {
    fn from(arg: SettingArg) -> Self {
        match arg {
            SettingArg::Contrast => PictureSetting::Contrast,
            SettingArg::Brightness => PictureSetting::Brightness,
            SettingArg::Color => PictureSetting::Color,
            SettingArg::Hue => PictureSetting::Hue,
            SettingArg::Sharpness => PictureSetting::Sharpness,
        }
    }
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum ButtonArg {
    Menu,
    Up,
    Down,
    Left,
    Right,
    Enter,
    Reset,
}

impl From<ButtonArg> for Button {
    fn from(arg: ButtonArg) -> Self {
        match arg {
            ButtonArg::Menu => Button::Menu,
            ButtonArg::Up => Button::Up,
            ButtonArg::Down => Button::Down,
            ButtonArg::Left => Button::Left,
            ButtonArg::Right => Button::Right,
            ButtonArg::Enter => Button::Enter,
            ButtonArg::Reset => Button::Reset,
        }
    }
}

// ── Main ─────────────────────────────────────────────────────────

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // --gen-config: dump defaults and exit.
    if cli.gen_config {
        let text = toml::to_string_pretty(&CtlConfig::default())?;
        println!("{text}");
        return Ok(());
    }

    let config = CtlConfig::load(&cli.config);

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.logging.level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .init();

    let Some(command) = cli.command else {
        eprintln!("no command given; try `sdcp-ctl --help`");
        std::process::exit(2);
    };

    match command {
        CtlCommand::Discover { port, window_secs } => {
            let mut discovery = DiscoveryConfig::default();
            if let Some(port) = port {
                discovery.port = port;
            }
            if let Some(secs) = window_secs {
                discovery.window = Duration::from_secs(secs);
            }
            info!(window = ?discovery.window, "listening for announcements");
            let devices = discover(&discovery).await?;
            if devices.is_empty() {
                println!("no projectors heard within the window");
            }
            for device in devices {
                println!(
                    "{}  serial {}  {}  community {}  location {:?}",
                    device.address,
                    device.serial_number,
                    device.product_name,
                    device.community,
                    device.location,
                );
            }
        }
        CtlCommand::Status => {
            let projector = config.projector.to_client(cli.host)?;
            show_status(&projector).await?;
        }
        CtlCommand::Power { state } => {
            let projector = config.projector.to_client(cli.host)?;
            projector.set_power(matches!(state, PowerArg::On)).await?;
            println!("ok");
        }
        CtlCommand::Input { source } => {
            let projector = config.projector.to_client(cli.host)?;
            match source {
                Some(source) => {
                    projector.set_input(source.into()).await?;
                    println!("ok");
                }
                None => println!("input: {}", projector.input().await?),
            }
        }
        CtlCommand::Picture { setting, value } => {
            let projector = config.projector.to_client(cli.host)?;
            let setting: PictureSetting = setting.into();
            match value {
                Some(value) => {
                    projector.set_picture_setting(setting, value).await?;
                    println!("ok");
                }
                None => println!("{setting}: {}", projector.picture_setting(setting).await?),
            }
        }
        CtlCommand::Press { button } => {
            let projector = config.projector.to_client(cli.host)?;
            projector.press(button.into()).await?;
            println!("ok");
        }
        CtlCommand::Version => {
            let projector = config.projector.to_client(cli.host)?;
            let (major, minor) = projector.rom_version().await?;
            println!("rom: {major}.{minor}");
            let (major, minor) = projector.sc_rom_version().await?;
            println!("sc rom: {major}.{minor}");
            println!("nvm data: {}", projector.nvm_data_version().await?);
        }
    }

    Ok(())
}

/// Poll the status sweep: power and faults always; input and picture
/// settings only when the lamp is lit (they answer NotApplicableItem
/// otherwise, which is expected and skipped rather than fatal).
async fn show_status(projector: &Projector) -> Result<(), SdcpError> {
    let power = projector.power_state().await?;
    println!("power: {power}");

    match projector.error_status().await {
        Ok(status) => println!("faults: {status}"),
        Err(e) if e.is_not_applicable() => println!("faults: n/a"),
        Err(e) => return Err(e),
    }

    match projector.lamp_timer().await {
        Ok(hours) => println!("lamp: {hours} h"),
        Err(e) if e.is_not_applicable() => println!("lamp: n/a"),
        Err(e) => return Err(e),
    }

    if power.is_on() {
        match projector.input().await {
            Ok(input) => println!("input: {input}"),
            Err(e) if e.is_not_applicable() => println!("input: n/a"),
            Err(e) => return Err(e),
        }
        for setting in PictureSetting::ALL {
            match projector.picture_setting(setting).await {
                Ok(value) => println!("{setting}: {value}"),
                Err(e) if e.is_not_applicable() => println!("{setting}: n/a"),
                Err(e) => return Err(e),
            }
        }
    }

    Ok(())
}
