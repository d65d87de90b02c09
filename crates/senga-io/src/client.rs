//! Retrying request client.
//!
//! Wraps one outbound vectorization call in the progressive-timeout
//! retry policy from `senga-core`: the policy decides, this driver
//! waits and sends. Progress is surfaced through a [`RetryState`]
//! callback so the UI can show "retrying (attempt N)" without polling,
//! and every attempt logs a one-line console event (attempt number,
//! timeout, delay) for debugging against a slow backend.

use gloo_timers::future::TimeoutFuture;
use senga_core::{
    RequestError, RetryPolicy, RetryRun, RetryState, RetryStep, VectorizeResponse,
};
use web_time::Instant;

use crate::transport::{self, VectorizePayload};

/// Client for the vectorization backend with retry handling.
#[derive(Debug, Clone)]
pub struct VectorizeClient {
    endpoint: String,
    policy: RetryPolicy,
}

impl VectorizeClient {
    /// Create a client for the backend at `endpoint` with the default
    /// retry policy.
    #[must_use]
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
            policy: RetryPolicy::default(),
        }
    }

    /// Override the retry policy.
    #[must_use]
    pub const fn with_policy(mut self, policy: RetryPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Perform one vectorization call, retrying transport-level
    /// failures per the policy.
    ///
    /// `on_state` fires on every observable transition: attempt start,
    /// backoff wait, and terminal reset.
    ///
    /// # Errors
    ///
    /// Returns [`RequestError::Fatal`] for non-retryable failures and
    /// [`RequestError::Exhausted`] when the attempt budget runs out.
    #[allow(clippy::future_not_send)] // WASM is single-threaded; Send is not needed
    pub async fn vectorize(
        &self,
        payload: VectorizePayload<'_>,
        mut on_state: impl FnMut(RetryState),
    ) -> Result<VectorizeResponse, RequestError> {
        let mut run = RetryRun::new(self.policy);
        let method = payload.selected.map_or("all", |m| m.as_str());

        loop {
            on_state(run.state());
            let attempt = run.attempt();
            let timeout = run.current_timeout();
            console_info(&format!(
                "vectorize[{method}] attempt {attempt}/{} (timeout {}s)",
                run.max_attempts(),
                timeout.as_secs(),
            ));

            let started = Instant::now();
            match transport::send_vectorize(&self.endpoint, payload, timeout).await {
                Ok(response) => {
                    console_info(&format!(
                        "vectorize[{method}] attempt {attempt} ok in {:.1}s",
                        started.elapsed().as_secs_f64(),
                    ));
                    run.on_success();
                    on_state(run.state());
                    return Ok(response);
                }
                Err(failure) => {
                    console_warn(&format!(
                        "vectorize[{method}] attempt {attempt} failed after {:.1}s: {failure}",
                        started.elapsed().as_secs_f64(),
                    ));
                    match run.on_failure(failure) {
                        RetryStep::Backoff(delay) => {
                            on_state(run.state());
                            console_info(&format!(
                                "vectorize[{method}] retrying in {}ms (attempt {} of {})",
                                delay.as_millis(),
                                run.attempt(),
                                run.max_attempts(),
                            ));
                            let millis = u32::try_from(delay.as_millis()).unwrap_or(u32::MAX);
                            TimeoutFuture::new(millis).await;
                            run.resume();
                        }
                        RetryStep::GiveUp(error) => {
                            on_state(run.state());
                            return Err(error);
                        }
                    }
                }
            }
        }
    }
}

fn console_info(message: &str) {
    web_sys::console::info_1(&message.into());
}

fn console_warn(message: &str) {
    web_sys::console::warn_1(&message.into());
}
