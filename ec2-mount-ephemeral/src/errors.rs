use mount_hal::HalError;
use thiserror::Error;

use crate::plan::StageKind;

#[derive(Error, Debug)]
pub enum MountError {
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("No ephemeral devices found.")]
    NoDevices,

    #[error("Found [{0}] ephemeral devices, expected only 1.")]
    TooManyDevices(usize),

    #[error("device path is not valid UTF-8: {}", .0.display())]
    NonUtf8Device(std::path::PathBuf),

    #[error("{stage} stage failed: {command}")]
    StageFailed {
        stage: StageKind,
        command: String,
        #[source]
        source: HalError,
    },

    #[error("failed to write mount plan")]
    Output(#[from] std::io::Error),
}

impl MountError {
    /// True when a stage was cut off by the run's deadline.
    pub fn is_timeout(&self) -> bool {
        matches!(self, MountError::StageFailed { source, .. } if source.is_timeout())
    }
}
