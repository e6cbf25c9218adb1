//! Fake HAL implementation for testing.
//!
//! This implementation records all operations without executing them,
//! allowing for CI-safe testing without root privileges or real hardware.

use super::ProcessOps;
use crate::{Deadline, HalError, HalResult};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

/// Operation records for testing and verification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Operation {
    Command { argv: Vec<String> },
}

impl Operation {
    pub fn program(&self) -> Option<&str> {
        match self {
            Operation::Command { argv } => argv.first().map(String::as_str),
        }
    }
}

/// Shared state for FakeHal operations.
#[derive(Debug, Clone, Default)]
struct FakeHalState {
    /// All operations that were recorded
    operations: Vec<Operation>,
    /// Programs that should exit with the given code
    failures: HashMap<String, i32>,
}

/// Fake HAL implementation that records operations without executing them.
///
/// Every invocation that would have spawned a process is recorded, including ones
/// scripted to fail. Invocations refused because the deadline already passed are not.
#[derive(Debug, Clone, Default)]
pub struct FakeHal {
    state: Arc<Mutex<FakeHalState>>,
}

impl FakeHal {
    pub fn new() -> Self {
        Self {
            state: Arc::new(Mutex::new(FakeHalState::default())),
        }
    }

    /// Make every later invocation of `program` exit with `code`.
    pub fn fail_program(&self, program: impl Into<String>, code: i32) {
        self.state
            .lock()
            .unwrap()
            .failures
            .insert(program.into(), code);
    }

    /// Get all recorded operations.
    pub fn operations(&self) -> Vec<Operation> {
        self.state.lock().unwrap().operations.clone()
    }

    /// Get the number of operations recorded.
    pub fn operation_count(&self) -> usize {
        self.state.lock().unwrap().operations.len()
    }

    /// Check if a specific operation was recorded.
    pub fn has_operation(&self, check: impl Fn(&Operation) -> bool) -> bool {
        self.state.lock().unwrap().operations.iter().any(check)
    }

    /// Clear all recorded operations and scripted failures.
    pub fn clear(&self) {
        let mut state = self.state.lock().unwrap();
        state.operations.clear();
        state.failures.clear();
    }

    fn record_operation(&self, op: Operation) {
        self.state.lock().unwrap().operations.push(op);
    }
}

impl ProcessOps for FakeHal {
    fn run_command(&self, argv: &[String], deadline: &Deadline) -> HalResult<()> {
        let program = argv
            .first()
            .ok_or_else(|| HalError::Other("empty argument vector".to_string()))?;
        let command = argv.join(" ");

        if deadline.is_expired() {
            log::info!("FAKE HAL: deadline expired before {}", command);
            return Err(HalError::CommandTimeout {
                command,
                timeout_secs: deadline.budget().as_secs(),
            });
        }

        log::info!("FAKE HAL: {}", command);
        self.record_operation(Operation::Command {
            argv: argv.to_vec(),
        });

        let failure = self.state.lock().unwrap().failures.get(program).copied();
        if let Some(code) = failure {
            return Err(HalError::CommandFailed {
                command,
                code: Some(code),
            });
        }

        Ok(())
    }
}
