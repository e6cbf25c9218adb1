//! Linux HAL implementation spawning real processes.

use super::ProcessOps;
use crate::{Deadline, HalError, HalResult};
use nix::sys::signal::{kill, Signal};
use nix::unistd::Pid;
use std::process::{Child, Command, Stdio};
use std::time::Duration;
use wait_timeout::ChildExt;

/// How long a timed-out command gets to exit after SIGTERM before it is killed.
const TERM_GRACE: Duration = Duration::from_secs(5);

/// Real HAL implementation for Linux systems.
#[derive(Debug, Clone)]
pub struct LinuxHal {
    term_grace: Duration,
}

impl Default for LinuxHal {
    fn default() -> Self {
        Self {
            term_grace: TERM_GRACE,
        }
    }
}

impl LinuxHal {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_term_grace(mut self, term_grace: Duration) -> Self {
        self.term_grace = term_grace;
        self
    }
}

fn map_command_err(program: &str, err: std::io::Error) -> HalError {
    if err.kind() == std::io::ErrorKind::NotFound {
        return HalError::CommandNotFound(program.to_string());
    }
    HalError::Io(err)
}

fn timed_out(command: &str, deadline: &Deadline) -> HalError {
    HalError::CommandTimeout {
        command: command.to_string(),
        timeout_secs: deadline.budget().as_secs(),
    }
}

/// Ask the child to stop, then force it. Always reaps.
fn terminate(child: &mut Child, grace: Duration) -> std::io::Result<()> {
    let pid = Pid::from_raw(child.id() as i32);
    let exited = match kill(pid, Signal::SIGTERM) {
        Ok(()) => child.wait_timeout(grace)?.is_some(),
        Err(err) => {
            log::warn!("SIGTERM to pid {} failed: {}", pid, err);
            false
        }
    };

    if !exited {
        log::warn!("pid {} still running after SIGTERM; killing", pid);
        let _ = child.kill();
        child.wait()?;
    }
    Ok(())
}

impl ProcessOps for LinuxHal {
    fn run_command(&self, argv: &[String], deadline: &Deadline) -> HalResult<()> {
        let (program, args) = argv
            .split_first()
            .ok_or_else(|| HalError::Other("empty argument vector".to_string()))?;
        let command = argv.join(" ");

        let remaining = deadline
            .remaining()
            .ok_or_else(|| timed_out(&command, deadline))?;

        log::debug!("exec: {} (budget left {:?})", command, remaining);

        // Output goes straight to the operator's terminal; avoid hanging on input.
        let mut cmd = Command::new(program);
        cmd.args(args).stdin(Stdio::null());
        let mut child = cmd.spawn().map_err(|e| map_command_err(program, e))?;

        let status = match child.wait_timeout(remaining)? {
            Some(status) => status,
            None => {
                if let Err(err) = terminate(&mut child, self.term_grace) {
                    log::warn!("failed to stop {}: {}", command, err);
                }
                return Err(timed_out(&command, deadline));
            }
        };

        if !status.success() {
            return Err(HalError::CommandFailed {
                command,
                code: status.code(),
            });
        }

        Ok(())
    }
}
