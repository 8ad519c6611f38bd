//! Polling configuration
//!
//! Defaults reproduce the dashboard's behaviour: one status request per
//! second, no retry on a failed request and no overall time limit.

use std::time::Duration;

use thiserror::Error;

/// Invalid polling configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{var} has invalid value '{value}'")]
    InvalidValue { var: &'static str, value: String },

    #[error("{0}")]
    Invalid(String),
}

/// Controller polling configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PollConfig {
    /// Delay between two status requests; the first request fires one
    /// interval after submission
    pub poll_interval: Duration,

    /// Consecutive failed status requests tolerated before tracking is
    /// abandoned (0 = abandon on the first failure)
    pub max_poll_retries: u32,

    /// Upper bound on how long a task is tracked
    pub max_duration: Option<Duration>,
}

impl PollConfig {
    pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(1);

    pub fn with_poll_interval(mut self, poll_interval: Duration) -> Self {
        self.poll_interval = poll_interval;
        self
    }

    pub fn with_max_poll_retries(mut self, max_poll_retries: u32) -> Self {
        self.max_poll_retries = max_poll_retries;
        self
    }

    pub fn with_max_duration(mut self, max_duration: Option<Duration>) -> Self {
        self.max_duration = max_duration;
        self
    }

    /// Creates configuration from environment variables
    ///
    /// Expected environment variables (all optional):
    /// - METRIC_POLL_INTERVAL_MS (default: 1000)
    /// - METRIC_POLL_RETRIES (default: 0)
    /// - METRIC_MAX_DURATION_SECS (default: unlimited)
    pub fn from_env() -> Result<Self, ConfigError> {
        let mut config = Self::default();

        if let Some(ms) = env_number::<u64>("METRIC_POLL_INTERVAL_MS")? {
            config.poll_interval = Duration::from_millis(ms);
        }
        if let Some(retries) = env_number::<u32>("METRIC_POLL_RETRIES")? {
            config.max_poll_retries = retries;
        }
        if let Some(secs) = env_number::<u64>("METRIC_MAX_DURATION_SECS")? {
            config.max_duration = Some(Duration::from_secs(secs));
        }

        config.validate()?;
        Ok(config)
    }

    /// Validates the configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.poll_interval.is_zero() {
            return Err(ConfigError::Invalid(
                "poll_interval must be greater than 0".to_string(),
            ));
        }

        if let Some(max) = self.max_duration {
            if max < self.poll_interval {
                return Err(ConfigError::Invalid(
                    "max_duration must be at least one poll_interval".to_string(),
                ));
            }
        }

        Ok(())
    }
}

impl Default for PollConfig {
    fn default() -> Self {
        Self {
            poll_interval: Self::DEFAULT_POLL_INTERVAL,
            max_poll_retries: 0,
            max_duration: None,
        }
    }
}

fn env_number<T: std::str::FromStr>(var: &'static str) -> Result<Option<T>, ConfigError> {
    match std::env::var(var) {
        Ok(value) => value
            .trim()
            .parse::<T>()
            .map(Some)
            .map_err(|_| ConfigError::InvalidValue { var, value }),
        Err(_) => Ok(None),
    }
}
