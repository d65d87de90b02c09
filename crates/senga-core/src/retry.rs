//! Retry policy for vectorization calls.
//!
//! Tracing a large image can take the backend well over a minute, so
//! each attempt gets a generous timeout and every retry gets a longer
//! one. Only failures where no HTTP response arrived are retried; a
//! response with an error status means the backend is alive and a
//! retry would get the same answer.
//!
//! The decisions live here, sans-IO, in [`RetryRun`]; the transport
//! layer owns the actual sending and waiting. That split keeps the
//! whole schedule testable without a network.

use std::time::Duration;

/// Per-attempt timeouts, indexed by 1-based attempt number. Attempts
/// beyond the table reuse its last entry, keeping the schedule
/// monotone non-decreasing.
const ATTEMPT_TIMEOUTS: [Duration; 3] = [
    Duration::from_secs(60),
    Duration::from_secs(90),
    Duration::from_secs(120),
];

/// Waits between a failed attempt and the next dispatch: first entry
/// before attempt 2, second before attempt 3. Later retries reuse the
/// last entry.
const BACKOFFS: [Duration; 2] = [Duration::from_secs(2), Duration::from_secs(5)];

/// Default attempt budget before giving up on retryable failures.
pub const DEFAULT_MAX_ATTEMPTS: u32 = 3;

/// Attempt budget and schedule lookup for one class of calls.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Maximum number of attempts, including the first.
    pub max_attempts: u32,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: DEFAULT_MAX_ATTEMPTS,
        }
    }
}

impl RetryPolicy {
    /// Timeout budget for the given 1-based attempt number.
    #[must_use]
    pub fn attempt_timeout(self, attempt: u32) -> Duration {
        let index = usize::try_from(attempt.max(1) - 1).unwrap_or(usize::MAX);
        ATTEMPT_TIMEOUTS[index.min(ATTEMPT_TIMEOUTS.len() - 1)]
    }

    /// Wait before dispatching the given 1-based attempt number
    /// (meaningful for attempt 2 onward).
    #[must_use]
    pub fn backoff_before(self, attempt: u32) -> Duration {
        let index = usize::try_from(attempt.saturating_sub(2)).unwrap_or(usize::MAX);
        BACKOFFS[index.min(BACKOFFS.len() - 1)]
    }
}

/// One failed attempt, classified for the retry decision.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RequestFailure {
    /// No response arrived within the attempt's timeout window.
    #[error("no response from the backend within {0:?}")]
    Timeout(Duration),
    /// The request never produced an HTTP response (connection refused,
    /// DNS failure, aborted fetch).
    #[error("request could not be sent: {0}")]
    Transport(String),
    /// The backend answered with a non-success status.
    #[error("backend responded with status {status}")]
    Status {
        /// HTTP status code.
        status: u16,
        /// Server-supplied detail from the error body, if any.
        detail: Option<String>,
    },
    /// A response arrived but its body was not the expected JSON.
    #[error("unreadable backend response: {0}")]
    Malformed(String),
}

impl RequestFailure {
    /// Whether this failure class may be retried. Only failures where
    /// no HTTP response was received qualify; a received error status
    /// or an undecodable body fails the call immediately.
    #[must_use]
    pub const fn is_retryable(&self) -> bool {
        matches!(self, Self::Timeout(_) | Self::Transport(_))
    }
}

/// Terminal outcome of a call after retry handling.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RequestError {
    /// Every allowed attempt failed with a retryable failure.
    #[error("gave up after {attempts} attempts: {last}")]
    Exhausted {
        /// How many attempts were made.
        attempts: u32,
        /// The failure from the final attempt.
        last: RequestFailure,
    },
    /// A non-retryable failure ended the call on its first occurrence.
    #[error(transparent)]
    Fatal(RequestFailure),
}

impl RequestError {
    /// Human-readable message for the error banner.
    ///
    /// Priority order: detail carried in a backend response, then a
    /// "server not responding" phrasing when the request was sent but
    /// nothing came back, then a generic fallback.
    #[must_use]
    pub fn user_message(&self) -> String {
        let failure = match self {
            Self::Exhausted { last, .. } => last,
            Self::Fatal(failure) => failure,
        };
        match failure {
            RequestFailure::Status {
                detail: Some(detail),
                ..
            } => detail.clone(),
            RequestFailure::Status { status, detail: None } => {
                format!("The server rejected the request (status {status}).")
            }
            RequestFailure::Timeout(_) | RequestFailure::Transport(_) => {
                "The server is not responding. Check that the backend is running and try again."
                    .to_owned()
            }
            RequestFailure::Malformed(_) => {
                "Something unexpected went wrong while processing the image.".to_owned()
            }
        }
    }
}

/// Observable retry progress, surfaced to the UI.
///
/// `attempt` is the 1-based attempt number while a call is live and 0
/// when idle. `waiting` is true only during the backoff window between
/// attempts, where `attempt` already names the attempt about to be
/// made.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RetryState {
    /// Current (or imminent) attempt number; 0 when idle.
    pub attempt: u32,
    /// True only while waiting out a backoff.
    pub waiting: bool,
}

impl RetryState {
    /// Return to idle.
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

/// Decision after a failed attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RetryStep {
    /// Wait this long, then dispatch the next attempt.
    Backoff(Duration),
    /// Stop; the call has terminally failed.
    GiveUp(RequestError),
}

/// Decision state for one outbound call.
///
/// The driver loop asks [`current_timeout`](Self::current_timeout)
/// before each attempt and feeds each failure to
/// [`on_failure`](Self::on_failure); every terminal path resets the
/// observable [`RetryState`] to idle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetryRun {
    policy: RetryPolicy,
    state: RetryState,
}

impl RetryRun {
    /// Start a run at attempt 1.
    #[must_use]
    pub const fn new(policy: RetryPolicy) -> Self {
        Self {
            policy,
            state: RetryState {
                attempt: 1,
                waiting: false,
            },
        }
    }

    /// 1-based number of the attempt currently being made.
    #[must_use]
    pub const fn attempt(&self) -> u32 {
        self.state.attempt
    }

    /// Attempt budget from the policy.
    #[must_use]
    pub const fn max_attempts(&self) -> u32 {
        self.policy.max_attempts
    }

    /// Snapshot of the observable progress state.
    #[must_use]
    pub const fn state(&self) -> RetryState {
        self.state
    }

    /// Timeout budget for the current attempt.
    #[must_use]
    pub fn current_timeout(&self) -> Duration {
        self.policy.attempt_timeout(self.state.attempt)
    }

    /// Record a failed attempt and decide what happens next.
    ///
    /// A non-retryable failure gives up immediately regardless of the
    /// remaining attempt budget.
    pub fn on_failure(&mut self, failure: RequestFailure) -> RetryStep {
        if !failure.is_retryable() {
            self.state.reset();
            return RetryStep::GiveUp(RequestError::Fatal(failure));
        }
        if self.state.attempt >= self.policy.max_attempts {
            let attempts = self.state.attempt;
            self.state.reset();
            return RetryStep::GiveUp(RequestError::Exhausted {
                attempts,
                last: failure,
            });
        }
        self.state.attempt += 1;
        self.state.waiting = true;
        RetryStep::Backoff(self.policy.backoff_before(self.state.attempt))
    }

    /// The backoff wait has elapsed; the next attempt is being sent.
    pub fn resume(&mut self) {
        self.state.waiting = false;
    }

    /// Record terminal success.
    pub fn on_success(&mut self) {
        self.state.reset();
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;

    fn timeout() -> RequestFailure {
        RequestFailure::Timeout(Duration::from_secs(60))
    }

    #[test]
    fn timeouts_follow_the_progressive_table() {
        let policy = RetryPolicy::default();
        assert_eq!(policy.attempt_timeout(1), Duration::from_millis(60_000));
        assert_eq!(policy.attempt_timeout(2), Duration::from_millis(90_000));
        assert_eq!(policy.attempt_timeout(3), Duration::from_millis(120_000));
        // Beyond the table: clamp to the last entry (still monotone).
        assert_eq!(policy.attempt_timeout(7), Duration::from_millis(120_000));
        // Degenerate attempt 0 behaves like attempt 1.
        assert_eq!(policy.attempt_timeout(0), Duration::from_millis(60_000));
    }

    #[test]
    fn backoffs_follow_the_table() {
        let policy = RetryPolicy::default();
        assert_eq!(policy.backoff_before(2), Duration::from_millis(2_000));
        assert_eq!(policy.backoff_before(3), Duration::from_millis(5_000));
        assert_eq!(policy.backoff_before(9), Duration::from_millis(5_000));
    }

    #[test]
    fn classification_is_retryable_only_without_a_response() {
        assert!(timeout().is_retryable());
        assert!(RequestFailure::Transport("connection refused".into()).is_retryable());
        assert!(!RequestFailure::Status { status: 400, detail: None }.is_retryable());
        assert!(!RequestFailure::Status { status: 500, detail: None }.is_retryable());
        assert!(!RequestFailure::Malformed("not json".into()).is_retryable());
    }

    #[test]
    fn two_retryable_failures_then_success_walks_the_full_schedule() {
        let mut run = RetryRun::new(RetryPolicy::default());

        assert_eq!(run.attempt(), 1);
        assert_eq!(run.current_timeout(), Duration::from_millis(60_000));

        let step = run.on_failure(timeout());
        assert_eq!(step, RetryStep::Backoff(Duration::from_millis(2_000)));
        assert_eq!(run.state(), RetryState { attempt: 2, waiting: true });
        run.resume();
        assert_eq!(run.current_timeout(), Duration::from_millis(90_000));

        let step = run.on_failure(timeout());
        assert_eq!(step, RetryStep::Backoff(Duration::from_millis(5_000)));
        assert_eq!(run.state(), RetryState { attempt: 3, waiting: true });
        run.resume();
        assert_eq!(run.current_timeout(), Duration::from_millis(120_000));

        run.on_success();
        assert_eq!(run.state(), RetryState::default());
    }

    #[test]
    fn non_retryable_failure_short_circuits_on_the_first_attempt() {
        let mut run = RetryRun::new(RetryPolicy::default());
        let step = run.on_failure(RequestFailure::Status {
            status: 400,
            detail: Some("File must be an image".to_owned()),
        });
        let RetryStep::GiveUp(RequestError::Fatal(RequestFailure::Status { status, .. })) = step
        else {
            panic!("expected immediate terminal failure, got {step:?}");
        };
        assert_eq!(status, 400);
        // The state never entered a backoff wait and is reset.
        assert_eq!(run.state(), RetryState::default());
    }

    #[test]
    fn exhausting_the_attempt_budget_reports_the_last_failure() {
        let mut run = RetryRun::new(RetryPolicy { max_attempts: 2 });

        assert_eq!(
            run.on_failure(RequestFailure::Transport("reset".into())),
            RetryStep::Backoff(Duration::from_millis(2_000))
        );
        run.resume();

        let step = run.on_failure(RequestFailure::Transport("reset again".into()));
        assert_eq!(
            step,
            RetryStep::GiveUp(RequestError::Exhausted {
                attempts: 2,
                last: RequestFailure::Transport("reset again".into()),
            })
        );
        assert_eq!(run.state(), RetryState::default());
    }

    #[test]
    fn user_message_prefers_server_detail() {
        let err = RequestError::Fatal(RequestFailure::Status {
            status: 400,
            detail: Some("Parameter validation failed: turdsize must be a number".to_owned()),
        });
        assert_eq!(
            err.user_message(),
            "Parameter validation failed: turdsize must be a number"
        );
    }

    #[test]
    fn user_message_reports_unresponsive_server_for_transport_failures() {
        let err = RequestError::Exhausted {
            attempts: 3,
            last: RequestFailure::Timeout(Duration::from_secs(120)),
        };
        assert!(err.user_message().contains("not responding"));

        let err = RequestError::Fatal(RequestFailure::Malformed("trailing garbage".into()));
        assert!(err.user_message().contains("unexpected"));
    }
}
