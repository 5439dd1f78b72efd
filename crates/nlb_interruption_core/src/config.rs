use std::time::Duration;

use thiserror::Error;

use crate::polling::{PollPolicy, DEFAULT_POLL_INTERVAL, NLB_READINESS_MAX_ATTEMPTS};

pub const REGION_VAR: &str = "REGION";
pub const PROJECT_VAR: &str = "PROJECT";
pub const CURRENT_NLB_ID_PARAM_NAME_VAR: &str = "CURRENT_NLB_ID_PARAM_NAME";
pub const NLB_READY_MAX_ATTEMPTS_VAR: &str = "NLB_READY_MAX_ATTEMPTS";
pub const POLL_INTERVAL_SECONDS_VAR: &str = "POLL_INTERVAL_SECONDS";

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("{0} must be configured")]
    Missing(&'static str),
    #[error("{name} must be a positive integer, got '{value}'")]
    InvalidNumber { name: &'static str, value: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HandlerConfig {
    /// `None` defers to the SDK's default region chain.
    pub region: Option<String>,
    pub project: String,
    pub current_nlb_id_param_name: String,
    pub nlb_readiness: PollPolicy,
}

impl HandlerConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let read = |name: &str| {
            lookup(name)
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
        };
        let required = |name: &'static str| read(name).ok_or(ConfigError::Missing(name));
        let positive = |name: &'static str, default: u32| -> Result<u32, ConfigError> {
            match read(name) {
                None => Ok(default),
                Some(value) => match value.parse::<u32>() {
                    Ok(parsed) if parsed > 0 => Ok(parsed),
                    _ => Err(ConfigError::InvalidNumber { name, value }),
                },
            }
        };

        let default_interval_seconds = DEFAULT_POLL_INTERVAL.as_secs() as u32;
        let delay = Duration::from_secs(u64::from(positive(
            POLL_INTERVAL_SECONDS_VAR,
            default_interval_seconds,
        )?));

        Ok(Self {
            region: read(REGION_VAR),
            project: required(PROJECT_VAR)?,
            current_nlb_id_param_name: required(CURRENT_NLB_ID_PARAM_NAME_VAR)?,
            nlb_readiness: PollPolicy::new(
                positive(NLB_READY_MAX_ATTEMPTS_VAR, NLB_READINESS_MAX_ATTEMPTS)?,
                delay,
            ),
        })
    }
}
