//! Timing and retry budget for one job run.

use std::time::Duration;

/// What a failed status request (transport error, non-2xx, bad body) does to the poll loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TransportFailurePolicy {
    /// Report to the observer, count the attempt, keep polling.
    #[default]
    Retry,
    /// Abort with `JobError::StatusQuery`.
    Fail,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PollPolicy {
    /// Wait before the first status request.
    pub warm_up: Duration,
    /// Wait between status requests.
    pub interval: Duration,
    /// Status requests allowed before giving up; failed ones count too.
    pub max_attempts: u32,
    pub submit_timeout: Duration,
    pub status_timeout: Duration,
    pub fetch_timeout: Duration,
    pub on_transport_failure: TransportFailurePolicy,
}

impl Default for PollPolicy {
    fn default() -> Self {
        Self {
            warm_up: Duration::from_secs(5),
            interval: Duration::from_secs(5),
            max_attempts: 60,
            submit_timeout: Duration::from_secs(30),
            status_timeout: Duration::from_secs(10),
            fetch_timeout: Duration::from_secs(10),
            on_transport_failure: TransportFailurePolicy::Retry,
        }
    }
}

impl PollPolicy {
    /// Defaults overridden by `AUDIO_TASK_WARM_UP_SECS`, `AUDIO_TASK_INTERVAL_SECS`
    /// and `AUDIO_TASK_MAX_ATTEMPTS`. Unparseable values are ignored.
    pub fn from_env() -> Self {
        Self::from_vars(|name| std::env::var(name).ok())
    }

    fn from_vars(var: impl Fn(&str) -> Option<String>) -> Self {
        let num = |name: &str| -> Option<u64> { var(name)?.trim().parse().ok() };
        let d = Self::default();
        Self {
            warm_up: num("AUDIO_TASK_WARM_UP_SECS")
                .map(Duration::from_secs)
                .unwrap_or(d.warm_up),
            interval: num("AUDIO_TASK_INTERVAL_SECS")
                .map(Duration::from_secs)
                .unwrap_or(d.interval),
            max_attempts: num("AUDIO_TASK_MAX_ATTEMPTS")
                .and_then(|v| u32::try_from(v).ok())
                .unwrap_or(d.max_attempts),
            ..d
        }
    }

    pub fn with_timing(mut self, warm_up: Duration, interval: Duration) -> Self {
        self.warm_up = warm_up;
        self.interval = interval;
        self
    }

    pub fn with_max_attempts(mut self, max_attempts: u32) -> Self {
        self.max_attempts = max_attempts;
        self
    }

    pub fn with_transport_failure(mut self, policy: TransportFailurePolicy) -> Self {
        self.on_transport_failure = policy;
        self
    }
}
