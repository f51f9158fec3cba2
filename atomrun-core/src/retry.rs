//! Retry policy
//!
//! Three loops in the launch pipeline retry remote calls: the transport's
//! fast retry, the slow-poll wrapper used by the resolvers and the trigger,
//! and the status poller. All three are the same [`RetryPolicy`] with
//! different bounds and delay functions.

use std::time::Duration;

/// Upper bound for exponential waits
pub const MAX_WAIT: Duration = Duration::from_secs(60);

/// Double a wait, capped at [`MAX_WAIT`]
pub fn next_wait(current: Duration) -> Duration {
    (current * 2).min(MAX_WAIT)
}

/// Delay function between attempts
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Backoff {
    /// Same delay every time
    Fixed(Duration),
    /// Starts at `initial` and doubles after every delay, capped at `max`
    Exponential { initial: Duration, max: Duration },
}

impl Backoff {
    pub fn initial(&self) -> Duration {
        match self {
            Backoff::Fixed(delay) => *delay,
            Backoff::Exponential { initial, .. } => *initial,
        }
    }

    /// Delay that follows `current`
    pub fn next(&self, current: Duration) -> Duration {
        match self {
            Backoff::Fixed(delay) => *delay,
            Backoff::Exponential { max, .. } => (current * 2).min(*max),
        }
    }

    /// Start a fresh delay sequence
    pub fn start(&self) -> BackoffState {
        BackoffState {
            backoff: *self,
            current: self.initial(),
        }
    }
}

/// Position within a delay sequence
///
/// Owned by whoever drives a wait cycle so that consecutive loops can continue
/// the same sequence instead of starting over.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BackoffState {
    backoff: Backoff,
    current: Duration,
}

impl BackoffState {
    /// Delay the next call to [`advance`](Self::advance) will return
    pub fn current(&self) -> Duration {
        self.current
    }

    /// Return the delay to wait now and move to the following one
    pub fn advance(&mut self) -> Duration {
        let delay = self.current;
        self.current = self.backoff.next(delay);
        delay
    }

    pub fn reset(&mut self) {
        self.current = self.backoff.initial();
    }
}

/// Bounds and delay function for a retry loop
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Total attempts before the loop gives up
    pub max_attempts: u32,
    /// Failed attempts before the loop gives up
    pub max_errors: u32,
    pub backoff: Backoff,
}

impl RetryPolicy {
    /// Fast retry around a single HTTP exchange
    pub fn transport() -> Self {
        Self {
            max_attempts: 3,
            max_errors: 3,
            backoff: Backoff::Fixed(MAX_WAIT),
        }
    }

    /// Slow retry used while the remote side keeps answering non-200
    pub fn slow_poll() -> Self {
        Self {
            max_attempts: 1440,
            max_errors: 1440,
            backoff: Backoff::Fixed(MAX_WAIT),
        }
    }

    /// Execution status polling
    pub fn status_poll() -> Self {
        Self {
            max_attempts: 1440,
            max_errors: 3,
            backoff: Backoff::Exponential {
                initial: Duration::from_secs(1),
                max: MAX_WAIT,
            },
        }
    }

    pub fn with_max_attempts(mut self, max_attempts: u32) -> Self {
        self.max_attempts = max_attempts;
        self
    }

    pub fn with_backoff(mut self, backoff: Backoff) -> Self {
        self.backoff = backoff;
        self
    }

    /// Whether a loop that has made `attempts` attempts with `errors`
    /// failures must stop
    pub fn is_exhausted(&self, attempts: u32, errors: u32) -> bool {
        attempts >= self.max_attempts || errors >= self.max_errors
    }
}
