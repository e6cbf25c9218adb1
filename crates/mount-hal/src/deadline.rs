//! A single countdown shared by every command of a run.
//!
//! The deadline is created once and handed by reference to each invocation, so a slow
//! early command leaves less time for the ones after it.

use std::time::{Duration, Instant};

/// Longest single wait handed out by [`Deadline::remaining`].
pub const MAX_WAIT: Duration = Duration::from_secs(100 * 365 * 24 * 60 * 60);

#[derive(Debug, Clone, Copy)]
pub struct Deadline {
    /// `None` when the budget reaches past what `Instant` can represent.
    expires_at: Option<Instant>,
    budget: Duration,
}

impl Deadline {
    /// Start the countdown now.
    pub fn after(budget: Duration) -> Self {
        Self {
            expires_at: Instant::now().checked_add(budget),
            budget,
        }
    }

    /// Time left before expiry, or `None` once the deadline has passed.
    ///
    /// A zero budget is expired from the start. The result is capped at [`MAX_WAIT`].
    pub fn remaining(&self) -> Option<Duration> {
        match self.expires_at {
            Some(at) => at
                .checked_duration_since(Instant::now())
                .filter(|left| !left.is_zero())
                .map(|left| left.min(MAX_WAIT)),
            None => Some(MAX_WAIT),
        }
    }

    pub fn is_expired(&self) -> bool {
        self.remaining().is_none()
    }

    /// The budget the deadline was created with.
    pub fn budget(&self) -> Duration {
        self.budget
    }
}
