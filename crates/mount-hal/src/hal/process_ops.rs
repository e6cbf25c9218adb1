//! Process execution helpers.
//!
//! External commands are considered "world-touching" and must go through the HAL so we can
//! test the mount plan without spawning real processes.

use crate::{Deadline, HalResult};

/// Process execution trait (external command runner).
pub trait ProcessOps {
    /// Run `argv[0]` with the remaining arguments and wait for it to exit.
    ///
    /// Fails on spawn errors, non-zero exit, death by signal, or when `deadline` runs out
    /// before the command finishes. An already expired deadline fails without spawning.
    fn run_command(&self, argv: &[String], deadline: &Deadline) -> HalResult<()>;
}
