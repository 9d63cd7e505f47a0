//! loadmatrix daemon: host metrics on an HT16K33 8x8 LED backpack.
//!
//! Reads the active mode from the selector file (0-6) every few ticks and
//! draws one frame per tick until interrupted. Ctrl+C stops the worker at the
//! end of its current tick and blanks the matrix; a second Ctrl+C exits
//! immediately.

use std::path::PathBuf;
use std::process;

use anyhow::{Context, Result, anyhow};
use clap::Parser;
use linux_embedded_hal::I2cdev;
use log::info;

use loadmatrix_core::{FileModeSource, MatrixDisplay, TemperatureSensor, Worker};
use loadmatrix_pi::config::DEFAULT_CONFIG_PATH;
use loadmatrix_pi::{
    Ht16k33, PiConfig, SysinfoProvider, TemperatureSource, ThermalZoneSensor, VcgencmdSensor,
};

#[derive(Parser)]
#[command(name = "loadmatrix")]
#[command(version)]
#[command(about = "Show host load on an 8x8 LED matrix")]
struct Cli {
    /// TOML configuration file (defaults are used if it does not exist)
    #[arg(short, long, default_value = DEFAULT_CONFIG_PATH)]
    config: PathBuf,

    /// Override the selector file from config
    #[arg(long)]
    selector: Option<PathBuf>,

    /// Override the network interface from config
    #[arg(short, long)]
    interface: Option<String>,
}

fn temperature_sensor(config: &PiConfig) -> Box<dyn TemperatureSensor + Send> {
    match config.temperature {
        TemperatureSource::ThermalZone => Box::new(ThermalZoneSensor::new(&config.thermal_zone)),
        TemperatureSource::Vcgencmd => Box::new(VcgencmdSensor::new(&config.vcgencmd)),
    }
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    let mut config = PiConfig::load_from(&cli.config)?;
    if let Some(selector) = cli.selector {
        config.selector_path = selector;
    }
    if let Some(interface) = cli.interface {
        config.worker.interface = interface;
    }
    config.validate()?;

    info!("Starting loadmatrix");
    info!(
        "Display: HT16K33 at {:#04x} on {} (brightness {})",
        config.i2c_address,
        config.i2c_bus.display(),
        config.brightness
    );
    info!("Selector file: {}", config.selector_path.display());

    let bus = I2cdev::new(&config.i2c_bus)
        .with_context(|| format!("Failed to open I2C bus {}", config.i2c_bus.display()))?;
    let mut display = Ht16k33::new(bus, config.i2c_address);
    display
        .init(config.brightness)
        .map_err(|e| anyhow!("Failed to initialise HT16K33: {:?}", e))?;

    let worker = Worker::new(
        SysinfoProvider::new(),
        temperature_sensor(&config),
        display,
        FileModeSource::new(&config.selector_path),
        config.worker.clone(),
    );
    let handle = worker.start().map_err(|e| anyhow!("{}", e))?;

    let stopper = handle.stopper();
    ctrlc::set_handler(move || {
        if stopper.is_stop_requested() {
            // Second Ctrl+C - force exit
            process::exit(130);
        }
        stopper.request_stop();
    })
    .context("Failed to set Ctrl+C handler")?;

    let mut display = handle.join().map_err(|e| anyhow!("{}", e))?;

    // The worker leaves its last frame up; blank the matrix on the way out.
    display.clear();
    display
        .write_display()
        .map_err(|e| anyhow!("Failed to clear display: {:?}", e))?;

    info!("loadmatrix exiting");
    Ok(())
}
