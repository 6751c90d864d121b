//! xlibinput host binary.
//!
//! Plays the X server for the driver: pre-initialises, initialises and
//! enables every configured device, polls libinput from a single-threaded
//! `tokio` runtime and reports posted events through [`EventLogSink`].
//!
//! ```text
//! main()
//!  └─ load config + CLI devices
//!  └─ per device: pre_init ─> DEVICE_INIT ─> DEVICE_ON
//!  └─ run_until(ctrl-c)       -- read callback on every wake-up
//!  └─ per device: DEVICE_OFF ─> DEVICE_CLOSE ─> uninit
//! ```
//!
//! # Usage
//!
//! ```bash
//! xlibinput-driver --device /dev/input/event3 --json
//! RUST_LOG=debug xlibinput-driver --config ./xlibinput.toml
//! ```

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

use xlibinput_driver::application::lifecycle::{DeviceControlMode, Driver, Status};
use xlibinput_driver::infrastructure::event_source::libinput::LibinputSource;
use xlibinput_driver::infrastructure::host::{run_until, DescriptorRegistry};
use xlibinput_driver::infrastructure::input_sink::log::EventLogSink;
use xlibinput_driver::infrastructure::storage::config::{
    self, DeviceEntry, HostConfig, OutputFormat,
};

#[derive(Debug, Parser)]
#[command(name = "xlibinput-driver", version, about = "Drive input devices through libinput and print what an X server would receive")]
struct Args {
    /// Device node to open; may be repeated. Added to the configured devices.
    #[arg(short, long = "device", value_name = "PATH")]
    devices: Vec<PathBuf>,

    /// Config file (default: $XDG_CONFIG_HOME/xlibinput/config.toml).
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Print posted events as JSON lines on stdout.
    #[arg(long)]
    json: bool,
}

fn load(args: &Args) -> anyhow::Result<HostConfig> {
    let mut cfg = match &args.config {
        Some(path) => config::load_config_from(path)
            .with_context(|| format!("loading {}", path.display()))?,
        None => match config::load_config() {
            Ok(cfg) => cfg,
            Err(config::ConfigError::NoPlatformConfigDir) => HostConfig::default(),
            Err(e) => return Err(e).context("loading the default config"),
        },
    };

    cfg.devices.extend(args.devices.iter().map(|path| DeviceEntry {
        identifier: None,
        device: path.clone(),
    }));
    if args.json {
        cfg.driver.output = OutputFormat::Json;
    }
    Ok(cfg)
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    let cfg = load(&args)?;

    // Initialise structured logging.
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(&cfg.driver.log_level)),
        )
        .init();

    if cfg.devices.is_empty() {
        anyhow::bail!("no devices configured; pass --device PATH or add [[devices]] to the config");
    }

    let registry = DescriptorRegistry::new();
    let mut driver = Driver::new(LibinputSource::new, Arc::new(registry.clone()));

    let mut bindings = Vec::new();
    for entry in &cfg.devices {
        let options = entry.to_options();
        let name = options
            .identifier()
            .or(options.device())
            .unwrap_or("device")
            .to_string();
        let sink = Arc::new(EventLogSink::new(name.clone(), cfg.driver.output));

        let id = match driver.pre_init(&options, sink) {
            Ok(id) => id,
            Err(e) => {
                warn!(device = %name, "skipping device: {e}");
                continue;
            }
        };
        for mode in [DeviceControlMode::Init, DeviceControlMode::On] {
            if driver.device_control(id, mode as i32) != Status::Success {
                error!(device = %name, ?mode, "device control failed");
            }
        }
        bindings.push(id);
    }

    info!(devices = bindings.len(), "xlibinput host running, Ctrl-C to stop");

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .context("building the tokio runtime")?;
    runtime.block_on(async {
        let shutdown = async {
            if let Err(e) = tokio::signal::ctrl_c().await {
                error!("failed to wait for ctrl-c: {e}");
            }
            info!("shutdown signal received");
        };
        run_until(&mut driver, &registry, shutdown).await
    })
    .context("polling the libinput descriptor")?;

    for id in bindings {
        driver.device_control(id, DeviceControlMode::Off as i32);
        driver.device_control(id, DeviceControlMode::Close as i32);
        if let Err(e) = driver.uninit(id) {
            warn!(%id, "uninit failed: {e}");
        }
    }

    info!("xlibinput host stopped");
    Ok(())
}
