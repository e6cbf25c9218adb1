use std::io;
use std::path::PathBuf;
use thiserror::Error;

pub type HalResult<T> = std::result::Result<T, HalError>;

#[derive(Error, Debug)]
pub enum HalError {
    #[error("failed to collect contents of [{}]", dir.display())]
    DeviceDirUnreadable {
        dir: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("error getting stat of {}", path.display())]
    DeviceStat {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("error reading target of symlink {}", path.display())]
    SymlinkUnresolvable {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("resolved symlink for {} was unexpected: {}", path.display(), target.display())]
    UnexpectedDeviceTarget { path: PathBuf, target: PathBuf },

    #[error("Command not found: {0}")]
    CommandNotFound(String),

    #[error("Command failed: {command} (exit={code:?})")]
    CommandFailed { command: String, code: Option<i32> },

    #[error("Command timed out: {command} after {timeout_secs}s")]
    CommandTimeout { command: String, timeout_secs: u64 },

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("nix errno: {0}")]
    Nix(#[from] nix::errno::Errno),

    #[error("{0}")]
    Other(String),
}

impl HalError {
    /// True when the command was cut off by its deadline rather than failing on its own.
    pub fn is_timeout(&self) -> bool {
        matches!(self, HalError::CommandTimeout { .. })
    }
}
