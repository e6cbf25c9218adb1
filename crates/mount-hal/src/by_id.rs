//! Discovery of NVMe instance-storage devices through `/dev/disk/by-id`.
//!
//! Each instance-storage disk shows up as a symlink named after the EC2 NVMe model string,
//! pointing at the real block device node (`../../nvme1n1`).

use crate::{HalError, HalResult};
use std::ffi::OsString;
use std::fs;
use std::io;
use std::os::unix::ffi::OsStrExt;
use std::path::{Path, PathBuf};

pub const DEVICE_ID_DIR: &str = "/dev/disk/by-id";
pub const INSTANCE_STORAGE_PREFIX: &str = "nvme-Amazon_EC2_NVMe_Instance_Storage";
pub const DEVICE_ROOT: &str = "/dev";

/// Why a scan collapsed to "no devices" instead of returning what it saw.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AbsenceReason {
    /// The entry was listed but gone by the time it was inspected.
    Vanished,
    /// The entry exists but is not a symlink.
    NotSymlink,
}

impl std::fmt::Display for AbsenceReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AbsenceReason::Vanished => write!(f, "entry disappeared during scan"),
            AbsenceReason::NotSymlink => write!(f, "entry is not a symlink"),
        }
    }
}

/// Outcome of a successful scan.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Discovery {
    /// Resolved device paths in directory-listing order.
    Found(Vec<PathBuf>),
    /// A matching entry could not be trusted; everything seen in this scan is dropped.
    ///
    /// Kept for compatibility with the EBS-oriented lookup this policy came from. It is
    /// indistinguishable from "no devices" once flattened with [`Discovery::into_devices`].
    AmbiguousAbsence { entry: PathBuf, reason: AbsenceReason },
}

impl Discovery {
    pub fn into_devices(self) -> Vec<PathBuf> {
        match self {
            Discovery::Found(paths) => paths,
            Discovery::AmbiguousAbsence { .. } => Vec::new(),
        }
    }
}

/// Scanner over a device-identifier directory.
#[derive(Debug, Clone)]
pub struct DeviceScanner {
    dir: PathBuf,
    prefix: String,
    device_root: PathBuf,
}

impl Default for DeviceScanner {
    fn default() -> Self {
        Self::new(DEVICE_ID_DIR, INSTANCE_STORAGE_PREFIX, DEVICE_ROOT)
    }
}

impl DeviceScanner {
    pub fn new(
        dir: impl Into<PathBuf>,
        prefix: impl Into<String>,
        device_root: impl Into<PathBuf>,
    ) -> Self {
        Self {
            dir: dir.into(),
            prefix: prefix.into(),
            device_root: device_root.into(),
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// List the directory and resolve every matching entry.
    pub fn scan(&self) -> HalResult<Discovery> {
        let names = self.list_names()?;
        self.resolve_names(names)
    }

    fn list_names(&self) -> HalResult<Vec<OsString>> {
        let unreadable = |source: io::Error| HalError::DeviceDirUnreadable {
            dir: self.dir.clone(),
            source,
        };

        let mut names = Vec::new();
        for entry in fs::read_dir(&self.dir).map_err(unreadable)? {
            names.push(entry.map_err(unreadable)?.file_name());
        }
        log::debug!("{} entries under {}", names.len(), self.dir.display());
        Ok(names)
    }

    /// Resolve already-listed entry names against the directory.
    ///
    /// Names that do not carry the prefix are ignored. The first untrustworthy entry
    /// collapses the whole result to [`Discovery::AmbiguousAbsence`]; the first hard
    /// failure aborts with an error. Either way, nothing resolved earlier is returned.
    pub fn resolve_names<I>(&self, names: I) -> HalResult<Discovery>
    where
        I: IntoIterator<Item = OsString>,
    {
        let mut paths = Vec::new();

        for name in names {
            if !name.as_bytes().starts_with(self.prefix.as_bytes()) {
                continue;
            }

            let entry = self.dir.join(&name);

            let meta = match fs::symlink_metadata(&entry) {
                Ok(meta) => meta,
                Err(err) if err.kind() == io::ErrorKind::NotFound => {
                    return Ok(Discovery::AmbiguousAbsence {
                        entry,
                        reason: AbsenceReason::Vanished,
                    });
                }
                Err(source) => {
                    return Err(HalError::DeviceStat {
                        path: entry,
                        source,
                    })
                }
            };

            if !meta.file_type().is_symlink() {
                return Ok(Discovery::AmbiguousAbsence {
                    entry,
                    reason: AbsenceReason::NotSymlink,
                });
            }

            // e.g. nvme-Amazon_EC2_NVMe_Instance_Storage_AWS1234 -> ../../nvme1n1
            let resolved = match fs::canonicalize(&entry) {
                Ok(resolved) => resolved,
                Err(source) => {
                    return Err(HalError::SymlinkUnresolvable {
                        path: entry,
                        source,
                    })
                }
            };

            // Component-wise: /devices/... is not under /dev.
            if !resolved.starts_with(&self.device_root) {
                return Err(HalError::UnexpectedDeviceTarget {
                    path: entry,
                    target: resolved,
                });
            }

            log::debug!("{} -> {}", entry.display(), resolved.display());
            paths.push(resolved);
        }

        Ok(Discovery::Found(paths))
    }
}

/// Scan the well-known identifier directory for instance-storage devices.
pub fn find_ephemeral_devices() -> HalResult<Discovery> {
    DeviceScanner::default().scan()
}
