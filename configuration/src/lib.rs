mod loader;
mod logging;

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

pub use loader::{
    apply_env_overrides, load_config, load_config_from_path, parse_config, ConfigError,
    CONFIG_PATH_ENV, RUN_ENV,
};
pub use logging::setup_logging;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub backend: BackendConfig,
    #[serde(default)]
    pub letter: LetterConfig,
    #[serde(default)]
    pub polling: PollingConfig,
    #[serde(default)]
    pub storage: StorageConfig,
    #[serde(default)]
    pub failures: FailuresConfig,
    #[serde(default)]
    pub messages: MessagesConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BackendConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(default = "default_request_timeout_ms")]
    pub request_timeout_ms: u64,
    #[serde(default = "default_connect_timeout_ms")]
    pub connect_timeout_ms: u64,
    /// Message the backend answers with when a job was queued.
    #[serde(default = "default_queued_message")]
    pub queued_message: String,
    #[serde(default = "default_invalid_payload_message")]
    pub invalid_payload_message: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LetterConfig {
    #[serde(default = "default_min_chars")]
    pub min_chars: usize,
    #[serde(default = "default_max_chars")]
    pub max_chars: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PollingConfig {
    #[serde(default = "default_poll_interval_ms")]
    pub interval_ms: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StorageConfig {
    #[serde(default = "default_state_path")]
    pub state_path: PathBuf,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureKindConfig {
    ContentPolicy,
    ComputationFault,
    Generic,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FailureRuleConfig {
    pub pattern: String,
    #[serde(default = "default_failure_kind")]
    pub kind: FailureKindConfig,
    pub message: String,
}

/// Ordered failure-reason rules. An empty list turns every failure into the fallback.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FailuresConfig {
    #[serde(default = "default_failure_rules")]
    pub rules: Vec<FailureRuleConfig>,
    #[serde(default = "default_fallback_message")]
    pub fallback_message: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MessagesConfig {
    #[serde(default = "default_queued_status")]
    pub queued: String,
    #[serde(default = "default_processing_status")]
    pub processing: String,
    #[serde(default = "default_submit_status_template")]
    pub submit_status_template: String,
    #[serde(default = "default_submit_failed")]
    pub submit_failed: String,
    #[serde(default = "default_poll_status_template")]
    pub poll_status_template: String,
    #[serde(default = "default_poll_failed")]
    pub poll_failed: String,
    #[serde(default = "default_malformed_acknowledgement")]
    pub malformed_acknowledgement: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            request_timeout_ms: default_request_timeout_ms(),
            connect_timeout_ms: default_connect_timeout_ms(),
            queued_message: default_queued_message(),
            invalid_payload_message: default_invalid_payload_message(),
        }
    }
}

impl Default for LetterConfig {
    fn default() -> Self {
        Self {
            min_chars: default_min_chars(),
            max_chars: default_max_chars(),
        }
    }
}

impl Default for PollingConfig {
    fn default() -> Self {
        Self {
            interval_ms: default_poll_interval_ms(),
        }
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            state_path: default_state_path(),
        }
    }
}

impl Default for FailuresConfig {
    fn default() -> Self {
        Self {
            rules: default_failure_rules(),
            fallback_message: default_fallback_message(),
        }
    }
}

impl Default for MessagesConfig {
    fn default() -> Self {
        Self {
            queued: default_queued_status(),
            processing: default_processing_status(),
            submit_status_template: default_submit_status_template(),
            submit_failed: default_submit_failed(),
            poll_status_template: default_poll_status_template(),
            poll_failed: default_poll_failed(),
            malformed_acknowledgement: default_malformed_acknowledgement(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

fn default_base_url() -> String {
    "http://localhost:8000".to_string()
}

fn default_request_timeout_ms() -> u64 {
    30_000
}

fn default_connect_timeout_ms() -> u64 {
    5_000
}

fn default_queued_message() -> String {
    "Видео поставлено в очередь на генерацию".to_string()
}

fn default_invalid_payload_message() -> String {
    "Неверный формат данных".to_string()
}

fn default_min_chars() -> usize {
    100
}

fn default_max_chars() -> usize {
    2_000
}

fn default_poll_interval_ms() -> u64 {
    5_000
}

fn default_state_path() -> PathBuf {
    PathBuf::from(".lettervideo/state.json")
}

fn default_failure_kind() -> FailureKindConfig {
    FailureKindConfig::Generic
}

fn default_failure_rules() -> Vec<FailureRuleConfig> {
    let content_policy =
        "The letter did not pass content filtering. Please edit it and try again.";
    vec![
        FailureRuleConfig {
            pattern: "не прошло фильтрацию".to_string(),
            kind: FailureKindConfig::ContentPolicy,
            message: content_policy.to_string(),
        },
        FailureRuleConfig {
            pattern: "content rejected".to_string(),
            kind: FailureKindConfig::ContentPolicy,
            message: content_policy.to_string(),
        },
        FailureRuleConfig {
            pattern: "division by zero".to_string(),
            kind: FailureKindConfig::ComputationFault,
            message: "Video generation hit an internal error. Please try again.".to_string(),
        },
    ]
}

fn default_fallback_message() -> String {
    "Video generation failed. Please try again.".to_string()
}

fn default_queued_status() -> String {
    "Waiting in the queue…".to_string()
}

fn default_processing_status() -> String {
    "Processing…".to_string()
}

fn default_submit_status_template() -> String {
    "Error {status}".to_string()
}

fn default_submit_failed() -> String {
    "Something went wrong while sending the request".to_string()
}

fn default_poll_status_template() -> String {
    "Error: {status}".to_string()
}

fn default_poll_failed() -> String {
    "Error: unknown".to_string()
}

fn default_malformed_acknowledgement() -> String {
    "The backend accepted the letter but returned no job id".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_defaults_are_deterministic() {
        let cfg = AppConfig::default();
        assert_eq!(cfg.backend.base_url, "http://localhost:8000");
        assert_eq!(cfg.letter.min_chars, 100);
        assert_eq!(cfg.letter.max_chars, 2_000);
        assert_eq!(cfg.polling.interval_ms, 5_000);
        assert_eq!(cfg.failures.rules.len(), 3);
        assert_eq!(cfg.logging.level, "info");
    }
}
