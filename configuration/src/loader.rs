use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::AppConfig;

/// Selects `config/<RUN_ENV>.toml`.
pub const RUN_ENV: &str = "RUN_ENV";
/// Explicit config file; wins over `RUN_ENV`.
pub const CONFIG_PATH_ENV: &str = "LETTER_VIDEO_CONFIG";

const BACKEND_URL_ENV: &str = "LETTER_VIDEO_BACKEND_URL";
const STATE_PATH_ENV: &str = "LETTER_VIDEO_STATE_PATH";
const LOG_LEVEL_ENV: &str = "LETTER_VIDEO_LOG_LEVEL";
const POLL_INTERVAL_ENV: &str = "LETTER_VIDEO_POLL_INTERVAL_MS";

const DEFAULT_RUN_ENV: &str = "development";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config from {origin}: {source}")]
    Parse {
        origin: String,
        #[source]
        source: toml::de::Error,
    },

    #[error("Invalid configuration value for {key}: {message}")]
    Invalid { key: String, message: String },
}

impl ConfigError {
    fn invalid(key: &str, message: impl Into<String>) -> Self {
        ConfigError::Invalid {
            key: key.to_string(),
            message: message.into(),
        }
    }
}

/// Defaults, then the selected TOML file, then environment overrides.
pub fn load_config() -> Result<AppConfig, ConfigError> {
    let lookup = |key: &str| std::env::var(key).ok();
    let mut config = load_config_from_path(&config_path(lookup))?;
    apply_env_overrides(&mut config, lookup)?;
    config.validate()?;
    Ok(config)
}

/// A missing file yields the defaults; a file that does not parse is an error.
pub fn load_config_from_path(path: &Path) -> Result<AppConfig, ConfigError> {
    match fs::read_to_string(path) {
        Ok(contents) => parse(&contents, path.display().to_string()),
        Err(err) if err.kind() == ErrorKind::NotFound => Ok(AppConfig::default()),
        Err(source) => Err(ConfigError::Io {
            path: path.to_path_buf(),
            source,
        }),
    }
}

pub fn parse_config(contents: &str) -> Result<AppConfig, ConfigError> {
    parse(contents, "inline configuration".to_string())
}

pub fn apply_env_overrides(
    config: &mut AppConfig,
    lookup: impl Fn(&str) -> Option<String>,
) -> Result<(), ConfigError> {
    let value = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

    if let Some(base_url) = value(BACKEND_URL_ENV) {
        config.backend.base_url = base_url.trim().to_string();
    }
    if let Some(state_path) = value(STATE_PATH_ENV) {
        config.storage.state_path = PathBuf::from(state_path.trim());
    }
    if let Some(level) = value(LOG_LEVEL_ENV) {
        config.logging.level = level.trim().to_string();
    }
    if let Some(interval) = value(POLL_INTERVAL_ENV) {
        config.polling.interval_ms = interval.trim().parse().map_err(|_| {
            ConfigError::invalid(
                POLL_INTERVAL_ENV,
                format!("`{interval}` is not a number of milliseconds"),
            )
        })?;
    }
    Ok(())
}

impl AppConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.backend.base_url.trim().is_empty() {
            return Err(ConfigError::invalid("backend.base_url", "must not be empty"));
        }
        if self.letter.min_chars > self.letter.max_chars {
            return Err(ConfigError::invalid(
                "letter.min_chars",
                format!(
                    "{} exceeds letter.max_chars {}",
                    self.letter.min_chars, self.letter.max_chars
                ),
            ));
        }
        if self.polling.interval_ms == 0 {
            return Err(ConfigError::invalid(
                "polling.interval_ms",
                "must be greater than zero",
            ));
        }
        Ok(())
    }
}

fn config_path(lookup: impl Fn(&str) -> Option<String>) -> PathBuf {
    if let Some(path) = lookup(CONFIG_PATH_ENV).filter(|path| !path.trim().is_empty()) {
        return PathBuf::from(path.trim());
    }
    let run_env = lookup(RUN_ENV)
        .filter(|env| !env.trim().is_empty())
        .unwrap_or_else(|| DEFAULT_RUN_ENV.to_string());
    PathBuf::from("config").join(format!("{}.toml", run_env.trim()))
}

fn parse(contents: &str, origin: String) -> Result<AppConfig, ConfigError> {
    toml::from_str(contents).map_err(|source| ConfigError::Parse { origin, source })
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;
    use crate::FailureKindConfig;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(key, value)| (key.to_string(), value.to_string()))
            .collect();
        move |key: &str| map.get(key).cloned()
    }

    #[test]
    fn partial_file_keeps_the_other_defaults() {
        let config = parse_config(
            r#"
            [backend]
            base_url = "https://letters.example"

            [letter]
            max_chars = 3000
            "#,
        )
        .unwrap();

        assert_eq!(config.backend.base_url, "https://letters.example");
        assert_eq!(config.backend.request_timeout_ms, 30_000);
        assert_eq!(config.letter.min_chars, 100);
        assert_eq!(config.letter.max_chars, 3_000);
        assert_eq!(config.polling.interval_ms, 5_000);
    }

    #[test]
    fn failure_rules_can_be_replaced_or_emptied() {
        let config = parse_config(
            r#"
            [failures]
            fallback_message = "Не получилось"
            rules = [
                { pattern = "filter", kind = "content_policy", message = "Filtered" },
                { pattern = "oom", message = "Try later" },
            ]
            "#,
        )
        .unwrap();
        assert_eq!(config.failures.rules.len(), 2);
        assert_eq!(config.failures.rules[0].kind, FailureKindConfig::ContentPolicy);
        assert_eq!(config.failures.rules[1].kind, FailureKindConfig::Generic);

        let config = parse_config("[failures]\nrules = []\n").unwrap();
        assert!(config.failures.rules.is_empty());
    }

    #[test]
    fn broken_toml_is_an_error() {
        let err = parse_config("[backend\nbase_url = 1").unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }));
    }

    #[test]
    fn missing_file_yields_defaults() {
        let path = std::env::temp_dir().join(format!("missing-{}.toml", uuid::Uuid::new_v4()));
        assert_eq!(load_config_from_path(&path).unwrap(), AppConfig::default());
    }

    #[test]
    fn environment_overrides_win() {
        let mut config = AppConfig::default();
        apply_env_overrides(
            &mut config,
            env(&[
                (BACKEND_URL_ENV, "http://backend:9000"),
                (STATE_PATH_ENV, "/tmp/state.json"),
                (LOG_LEVEL_ENV, "debug"),
                (POLL_INTERVAL_ENV, "250"),
            ]),
        )
        .unwrap();

        assert_eq!(config.backend.base_url, "http://backend:9000");
        assert_eq!(config.storage.state_path, PathBuf::from("/tmp/state.json"));
        assert_eq!(config.logging.level, "debug");
        assert_eq!(config.polling.interval_ms, 250);
    }

    #[test]
    fn bad_interval_override_is_rejected() {
        let mut config = AppConfig::default();
        let err =
            apply_env_overrides(&mut config, env(&[(POLL_INTERVAL_ENV, "soon")])).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { .. }));
    }

    #[test]
    fn config_file_selection() {
        assert_eq!(
            config_path(env(&[])),
            PathBuf::from("config/development.toml")
        );
        assert_eq!(
            config_path(env(&[(RUN_ENV, "production")])),
            PathBuf::from("config/production.toml")
        );
        assert_eq!(
            config_path(env(&[(RUN_ENV, "production"), (CONFIG_PATH_ENV, "/etc/lv.toml")])),
            PathBuf::from("/etc/lv.toml")
        );
    }

    #[test]
    fn inverted_letter_bounds_are_invalid() {
        let mut config = AppConfig::default();
        config.letter.min_chars = 500;
        config.letter.max_chars = 200;
        assert!(config.validate().is_err());
    }

    #[test]
    fn shipped_development_config_matches_the_defaults() {
        let config = parse_config(include_str!("../../config/development.toml")).unwrap();
        assert_eq!(config, AppConfig::default());
    }
}
