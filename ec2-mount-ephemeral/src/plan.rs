//! Mount plan: format, check and mount the discovered device.
//!
//! Stages are kept stage-major: every format command runs before any check command, and
//! every check before any mount. The whole plan shares one [`Deadline`].

use mount_hal::{Deadline, ProcessOps};
use std::fmt;
use std::io::Write;
use std::path::{Path, PathBuf};

use crate::config::RunConfig;
use crate::errors::MountError;

pub const DRY_RUN_NOTICE: &str = "Dry run complete. Run with --force to execute the commands.";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StageKind {
    Format,
    Check,
    Mount,
}

impl StageKind {
    /// Execution order.
    pub const ALL: [StageKind; 3] = [StageKind::Format, StageKind::Check, StageKind::Mount];

    fn argv(self, device: &Path, config: &RunConfig) -> Vec<String> {
        let device = device.display().to_string();
        match self {
            StageKind::Format => vec![
                "mkfs".to_string(),
                "-V".to_string(),
                "-t".to_string(),
                config.fs_type.clone(),
                device,
            ],
            // -M: error if already mounted; -y: attempt to repair issues; -V: verbose
            StageKind::Check => vec![
                "fsck".to_string(),
                "-M".to_string(),
                "-y".to_string(),
                "-V".to_string(),
                device,
            ],
            StageKind::Mount => vec![
                "mount".to_string(),
                "-o".to_string(),
                config.mount_opt.clone(),
                "-t".to_string(),
                config.fs_type.clone(),
                device,
                config.mount_path.display().to_string(),
            ],
        }
    }
}

impl fmt::Display for StageKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StageKind::Format => write!(f, "format"),
            StageKind::Check => write!(f, "check"),
            StageKind::Mount => write!(f, "mount"),
        }
    }
}

/// One external command of the plan.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandStage {
    pub kind: StageKind,
    pub device: PathBuf,
    pub mount_path: PathBuf,
    pub argv: Vec<String>,
}

impl CommandStage {
    pub fn command_line(&self) -> String {
        self.argv.join(" ")
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MountPlan {
    stages: Vec<CommandStage>,
}

impl MountPlan {
    pub fn build(devices: &[PathBuf], config: &RunConfig) -> Self {
        let stages = StageKind::ALL
            .iter()
            .flat_map(|&kind| {
                devices.iter().map(move |device| CommandStage {
                    kind,
                    device: device.clone(),
                    mount_path: config.mount_path.clone(),
                    argv: kind.argv(device, config),
                })
            })
            .collect();
        Self { stages }
    }

    pub fn stages(&self) -> &[CommandStage] {
        &self.stages
    }

    /// Write every command line, then the dry-run notice.
    pub fn print(&self, out: &mut dyn Write) -> Result<(), MountError> {
        for stage in &self.stages {
            writeln!(out, "{}", stage.command_line())?;
        }
        writeln!(out, "{}", DRY_RUN_NOTICE)?;
        Ok(())
    }

    /// Run every stage in order; the first failure stops the plan.
    ///
    /// Earlier stages are not undone.
    pub fn execute(&self, hal: &dyn ProcessOps, deadline: &Deadline) -> Result<(), MountError> {
        for stage in &self.stages {
            let command = stage.command_line();
            log::info!("{}: {}", stage.kind, command);
            hal.run_command(&stage.argv, deadline)
                .map_err(|source| MountError::StageFailed {
                    stage: stage.kind,
                    command,
                    source,
                })?;
        }
        Ok(())
    }
}

/// Require exactly one discovered device whose path can be passed on verbatim.
pub fn single_device(devices: &[PathBuf]) -> Result<&Path, MountError> {
    match devices {
        [] => Err(MountError::NoDevices),
        [device] if device.to_str().is_none() => {
            Err(MountError::NonUtf8Device(device.clone()))
        }
        [device] => Ok(device.as_path()),
        many => Err(MountError::TooManyDevices(many.len())),
    }
}

/// Check the device count, build the plan, then print or execute it.
///
/// The deadline starts here, before either branch.
pub fn run(
    devices: &[PathBuf],
    config: &RunConfig,
    hal: &dyn ProcessOps,
    out: &mut dyn Write,
) -> Result<(), MountError> {
    config.validate()?;
    let deadline = Deadline::after(config.timeout);

    let device = single_device(devices)?;
    log::info!(
        "found 1 ephemeral device at: [{}] mount [{}]",
        device.display(),
        config.mount_path.display()
    );

    let plan = MountPlan::build(devices, config);

    if config.dry_run {
        return plan.print(out);
    }

    plan.execute(hal, &deadline)?;
    log::info!(
        "mounted {} at {}",
        device.display(),
        config.mount_path.display()
    );
    Ok(())
}
