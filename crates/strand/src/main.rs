use std::path::PathBuf;

use anyhow::{bail, Context};
use clap::{Parser, Subcommand};
use strand_core::config::{
    DEFAULT_NUM_LEDS, DEFAULT_NUM_SECTIONS, DEFAULT_PORT, DEFAULT_UPDATE_INTERVAL,
};
use strand_core::{
    unwrap_envelope, Command, ConfigManager, EffectPattern, Packet, Rgb, StripConfig,
    StripManager,
};
use tokio::net::UdpSocket;

/// Animated gradients for addressable LED strips over UDP.
#[derive(Parser, Debug)]
#[command(name = "strand")]
#[command(about = "Drive razer-protocol LED strips")]
struct Args {
    #[command(subcommand)]
    command: Mode,
}

#[derive(Subcommand, Debug)]
enum Mode {
    /// Animate one or more strips until Ctrl-C
    Run(RunArgs),
    /// Print every packet received on a UDP port
    Listen {
        #[arg(long, default_value_t = DEFAULT_PORT)]
        port: u16,
    },
}

#[derive(clap::Args, Debug)]
struct RunArgs {
    /// Strip configuration file (overrides --host)
    #[arg(long, conflicts_with = "host")]
    config: Option<PathBuf>,

    /// Strip address
    #[arg(long, required_unless_present = "config")]
    host: Option<String>,

    #[arg(long, default_value = "Strip")]
    name: String,

    #[arg(long, default_value_t = DEFAULT_PORT)]
    port: u16,

    #[arg(long, default_value_t = DEFAULT_NUM_LEDS)]
    num_leds: usize,

    #[arg(long, default_value_t = DEFAULT_NUM_SECTIONS)]
    num_sections: usize,

    /// Seconds between frames
    #[arg(long, default_value_t = DEFAULT_UPDATE_INTERVAL)]
    update_interval: f64,

    /// Section colours as hex, e.g. ff0000,00ff00,0000ff
    #[arg(long, value_delimiter = ',', value_parser = parse_color)]
    colors: Vec<Rgb>,

    /// double, mirror or stretched
    #[arg(long, default_value = "stretched")]
    effect: EffectPattern,

    #[arg(long, default_value_t = 128)]
    brightness: u8,

    /// Wave amplitude, 0 to 100
    #[arg(long)]
    amplitude: Option<i32>,

    /// Wave speed, -100 to 100
    #[arg(long, allow_hyphen_values = true)]
    speed: Option<i32>,
}

fn parse_color(s: &str) -> Result<Rgb, String> {
    Rgb::from_hex(s).ok_or_else(|| format!("Invalid hex colour: {}", s))
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();
    match args.command {
        Mode::Run(run_args) => run(run_args).await,
        Mode::Listen { port } => listen(port).await,
    }
}

async fn run(args: RunArgs) -> anyhow::Result<()> {
    let configs = match (&args.config, &args.host) {
        (Some(path), _) => {
            let mut config_manager = ConfigManager::new(Some(path.clone()));
            config_manager
                .load()
                .with_context(|| format!("Failed to load {}", path.display()))?
        }
        (None, Some(host)) => vec![StripConfig {
            host: host.clone(),
            name: args.name.clone(),
            port: args.port,
            num_leds: args.num_leds,
            num_sections: args.num_sections,
            update_interval: args.update_interval,
        }],
        (None, None) => bail!("Either --config or --host is required"),
    };

    let mut manager = StripManager::new();
    start_strips(&mut manager, configs, &args).await?;

    tokio::signal::ctrl_c().await?;
    log::info!("Shutting down");

    for host in manager.hosts() {
        if let Some(entry) = manager.get(host) {
            entry.controller.turn_off();
        }
    }
    manager.shutdown_all().await;

    Ok(())
}

/// Set up every strip, shutting down the ones already started if any fails.
async fn start_strips(
    manager: &mut StripManager,
    configs: Vec<StripConfig>,
    args: &RunArgs,
) -> anyhow::Result<()> {
    for config in configs {
        if let Err(e) = start_strip(manager, config, args).await {
            manager.shutdown_all().await;
            return Err(e);
        }
    }
    Ok(())
}

// Colours and wave go in before the loop starts so the first frame has them
async fn start_strip(
    manager: &mut StripManager,
    config: StripConfig,
    args: &RunArgs,
) -> anyhow::Result<()> {
    let host = config.host.clone();
    let entry = manager
        .add(config)
        .await
        .with_context(|| format!("Failed to set up strip at {}", host))?;

    for (index, color) in args.colors.iter().enumerate() {
        entry.controller.set_section_color(index, *color);
    }
    entry.controller.set_wave(args.amplitude, args.speed)?;
    entry
        .controller
        .turn_on(Some(args.brightness), Some(args.effect))
        .await;
    Ok(())
}

async fn listen(port: u16) -> anyhow::Result<()> {
    let socket = UdpSocket::bind(("0.0.0.0", port))
        .await
        .with_context(|| format!("Failed to bind UDP port {}", port))?;
    log::info!("Listening on {}", socket.local_addr()?);

    let mut buf = [0u8; 2048];
    loop {
        tokio::select! {
            received = socket.recv_from(&mut buf) => {
                let (len, from) = received?;
                let packet = unwrap_envelope(&buf[..len]).and_then(|frame| Packet::parse(&frame));
                match packet {
                    Ok(packet) => describe(&packet, &from.to_string()),
                    Err(e) => log::warn!("Ignoring datagram from {}: {}", from, e),
                }
            }
            _ = tokio::signal::ctrl_c() => break,
        }
    }

    Ok(())
}

fn describe(packet: &Packet, from: &str) {
    match packet.command {
        Command::Enable => match packet.enabled() {
            Some(enabled) => log::info!("{} enable({})", from, enabled),
            None => log::warn!("{} sent an enable frame without a flag", from),
        },
        Command::LedData => match packet.colors() {
            Some((gradient, colors)) => {
                let hex: Vec<String> = colors
                    .iter()
                    .map(|c| format!("{:02x}{:02x}{:02x}", c.r, c.g, c.b))
                    .collect();
                log::info!(
                    "{} {} colors (gradient={}): {}",
                    from,
                    colors.len(),
                    gradient,
                    hex.join(" ")
                );
            }
            None => log::warn!("{} sent a truncated LED frame", from),
        },
    }
}
