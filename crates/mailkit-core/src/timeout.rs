//! Timeout policy for a connection (spec §5 "Timeouts and cancellation").
//!
//! A [`TimeoutHandler`] is polled whenever a `receive` would otherwise block
//! indefinitely. If [`TimeoutHandler::is_timed_out`] answers `true`,
//! [`TimeoutHandler::handle_timeout`] is given one chance to decide whether
//! the operation should be retried (`true`) or fail with
//! `operation-timed-out` (`false`), at which point the connection is
//! considered broken and must be reconnected.

use std::time::{Duration, Instant};

/// Polled by a connection when a read would block.
pub trait TimeoutHandler: Send {
    /// Returns `true` once the configured timeout has elapsed.
    fn is_timed_out(&self) -> bool;

    /// Called when `is_timed_out` returns `true`.
    ///
    /// Returning `true` grants the in-flight operation a fresh deadline;
    /// returning `false` fails the operation with `operation-timed-out`.
    fn handle_timeout(&mut self) -> bool;

    /// Resets the deadline, typically called after each successful read.
    fn reset(&mut self);
}

/// The default timeout handler: a single fixed deadline, never extended.
///
/// This is what every protocol client uses unless the application installs
/// its own [`TimeoutHandler`] (e.g. one that prompts the user to keep
/// waiting).
#[derive(Debug, Clone)]
pub struct FixedTimeout {
    duration: Duration,
    deadline: Instant,
}

impl FixedTimeout {
    /// Creates a handler with the given duration, matching spec §6's
    /// `connection.timeout` (default 30000ms).
    #[must_use]
    pub fn new(duration: Duration) -> Self {
        Self {
            duration,
            deadline: Instant::now() + duration,
        }
    }

    /// The configured duration.
    #[must_use]
    pub const fn duration(&self) -> Duration {
        self.duration
    }
}

impl Default for FixedTimeout {
    fn default() -> Self {
        Self::new(Duration::from_millis(30_000))
    }
}

impl TimeoutHandler for FixedTimeout {
    fn is_timed_out(&self) -> bool {
        Instant::now() >= self.deadline
    }

    fn handle_timeout(&mut self) -> bool {
        false
    }

    fn reset(&mut self) {
        self.deadline = Instant::now() + self.duration;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fixed_timeout_never_retries() {
        let mut handler = FixedTimeout::new(Duration::from_millis(1));
        std::thread::sleep(Duration::from_millis(5));
        assert!(handler.is_timed_out());
        assert!(!handler.handle_timeout());
    }

    #[test]
    fn reset_pushes_deadline_forward() {
        let mut handler = FixedTimeout::new(Duration::from_millis(20));
        std::thread::sleep(Duration::from_millis(25));
        assert!(handler.is_timed_out());
        handler.reset();
        assert!(!handler.is_timed_out());
    }
}
