//! CLI argument parsing.
//!
//! Every flag can also be supplied through an `EC2_MOUNT_EPHEMERAL_*` environment variable.

use clap::{Parser, ValueEnum};
use mount_hal::by_id::{DEVICE_ID_DIR, DEVICE_ROOT};
use std::path::PathBuf;

use crate::config::{DEFAULT_FS_TYPE, DEFAULT_MOUNT_OPT, DEFAULT_TIMEOUT_SECS};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LogLevel {
    Off,
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl From<LogLevel> for log::LevelFilter {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Off => log::LevelFilter::Off,
            LogLevel::Error => log::LevelFilter::Error,
            LogLevel::Warn => log::LevelFilter::Warn,
            LogLevel::Info => log::LevelFilter::Info,
            LogLevel::Debug => log::LevelFilter::Debug,
            LogLevel::Trace => log::LevelFilter::Trace,
        }
    }
}

#[derive(Parser, Debug)]
#[command(name = "ec2-mount-ephemeral", version)]
#[command(about = "Mount a single expected ephemeral disk")]
#[command(long_about = "Mount a single expected ephemeral disk\n\n\
    Finds the NVMe instance-storage device, then formats, checks and mounts it.\n\
    By default only the planned commands are printed; pass --force to run them.")]
pub struct Cli {
    /// Mount the ephemeral disk at this path
    #[arg(long, env = "EC2_MOUNT_EPHEMERAL_MOUNT_PATH")]
    pub mount_path: PathBuf,

    /// Disable the default dry-run mode
    #[arg(long, env = "EC2_MOUNT_EPHEMERAL_FORCE")]
    pub force: bool,

    /// Filesystem type
    #[arg(long, default_value = DEFAULT_FS_TYPE, env = "EC2_MOUNT_EPHEMERAL_FS_TYPE")]
    pub fs_type: String,

    /// 'mount' option list
    #[arg(long, default_value = DEFAULT_MOUNT_OPT, env = "EC2_MOUNT_EPHEMERAL_MOUNT_OPT")]
    pub mount_opt: String,

    /// Number of seconds to wait for all devices to be mounted before cancellation
    #[arg(long, default_value_t = DEFAULT_TIMEOUT_SECS, env = "EC2_MOUNT_EPHEMERAL_TIMEOUT")]
    pub timeout: u64,

    /// Log verbosity (RUST_LOG overrides)
    #[arg(long, value_enum, default_value = "info", env = "EC2_MOUNT_EPHEMERAL_LOG_LEVEL")]
    pub log_level: LogLevel,

    #[arg(long, hide = true, default_value = DEVICE_ID_DIR)]
    pub device_dir: PathBuf,

    #[arg(long, hide = true, default_value = DEVICE_ROOT)]
    pub device_root: PathBuf,
}
