//! Prepare the EC2 NVMe instance-storage device for immediate use.
//!
//! Only instance types with exactly one instance-storage device are supported.

use anyhow::Context;
use clap::Parser;
use mount_hal::by_id::INSTANCE_STORAGE_PREFIX;
use mount_hal::{DeviceScanner, Discovery, LinuxHal};
use std::path::PathBuf;

pub mod cli;
pub mod config;
pub mod errors;
pub mod logging;
pub mod plan;

pub use config::RunConfig;
pub use errors::MountError;

/// Flatten a scan into the device list handed to the planner.
///
/// An ambiguous absence counts as zero devices.
pub fn discovered_devices(discovery: Discovery) -> Vec<PathBuf> {
    if let Discovery::AmbiguousAbsence { entry, reason } = &discovery {
        log::warn!(
            "ignoring all instance-storage devices: {} ({})",
            entry.display(),
            reason
        );
    }
    discovery.into_devices()
}

pub fn run() -> anyhow::Result<()> {
    let cli = cli::Cli::parse();
    logging::init(cli.log_level.into());

    let config = RunConfig::from_cli(&cli)?;

    let scanner = DeviceScanner::new(&cli.device_dir, INSTANCE_STORAGE_PREFIX, &cli.device_root);
    let discovery = scanner
        .scan()
        .context("failed to discover ephemeral devices")?;
    let devices = discovered_devices(discovery);

    let hal = LinuxHal::new();
    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    plan::run(&devices, &config, &hal, &mut out)?;

    Ok(())
}
