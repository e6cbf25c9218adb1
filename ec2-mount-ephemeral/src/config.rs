use std::path::PathBuf;
use std::time::Duration;

use crate::cli::Cli;
use crate::errors::MountError;

pub const DEFAULT_FS_TYPE: &str = "ext4";
pub const DEFAULT_MOUNT_OPT: &str = "defaults";
pub const DEFAULT_TIMEOUT_SECS: u64 = 60;

/// Settings for one run. Built once, never mutated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunConfig {
    pub fs_type: String,
    pub mount_opt: String,
    pub mount_path: PathBuf,
    pub dry_run: bool,
    pub timeout: Duration,
}

impl RunConfig {
    /// Dry-run config with the default filesystem, options and timeout.
    pub fn new(mount_path: impl Into<PathBuf>) -> Self {
        Self {
            fs_type: DEFAULT_FS_TYPE.to_string(),
            mount_opt: DEFAULT_MOUNT_OPT.to_string(),
            mount_path: mount_path.into(),
            dry_run: true,
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }

    pub fn with_fs_type(mut self, fs_type: impl Into<String>) -> Self {
        self.fs_type = fs_type.into();
        self
    }

    pub fn with_mount_opt(mut self, mount_opt: impl Into<String>) -> Self {
        self.mount_opt = mount_opt.into();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn execute(mut self) -> Self {
        self.dry_run = false;
        self
    }

    pub fn from_cli(cli: &Cli) -> Result<Self, MountError> {
        let mut config = Self::new(cli.mount_path.clone())
            .with_fs_type(cli.fs_type.trim())
            .with_mount_opt(cli.mount_opt.trim())
            .with_timeout(Duration::from_secs(cli.timeout));
        if cli.force {
            config = config.execute();
        }
        config.validate()?;
        Ok(config)
    }

    /// Reject values that cannot be rendered into a command line verbatim.
    pub fn validate(&self) -> Result<(), MountError> {
        if self.mount_path.as_os_str().is_empty() {
            return Err(MountError::InvalidConfig("mount path is empty".to_string()));
        }
        if self.mount_path.to_str().is_none() {
            return Err(MountError::InvalidConfig(format!(
                "mount path is not valid UTF-8: {}",
                self.mount_path.display()
            )));
        }
        if self.fs_type.is_empty() {
            return Err(MountError::InvalidConfig("filesystem type is empty".to_string()));
        }
        if self.mount_opt.is_empty() {
            return Err(MountError::InvalidConfig("mount options are empty".to_string()));
        }
        Ok(())
    }
}
