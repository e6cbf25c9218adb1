//! Hardware abstraction layer for ec2-mount-ephemeral.
//!
//! Everything that touches the host goes through here: reading `/dev/disk/by-id` to find
//! instance-storage devices, and spawning external tools under a shared [`Deadline`].

pub mod by_id;
pub mod deadline;
mod error;
pub mod hal;

pub use by_id::{find_ephemeral_devices, AbsenceReason, DeviceScanner, Discovery};
pub use deadline::Deadline;
pub use error::{HalError, HalResult};
pub use hal::{FakeHal, LinuxHal, Operation, ProcessOps};
