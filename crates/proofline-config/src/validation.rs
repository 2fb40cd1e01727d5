// SPDX-FileCopyrightText: 2026 Proofline Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Post-deserialization validation for configuration values.
//!
//! Validates semantic constraints that cannot be expressed via serde attributes,
//! such as attempt bounds, endpoint schemes, and cross-field requirements.

use crate::diagnostic::ConfigError;
use crate::model::ProoflineConfig;

/// Hard ceiling on retry attempts per mutation.
pub const MAX_ATTEMPTS_CEILING: u32 = 10;

/// Hard ceiling on the backoff unit (one minute).
pub const MAX_BACKOFF_BASE_MS: u64 = 60_000;

const LOG_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];

/// Validate a deserialized configuration for semantic correctness.
///
/// Returns `Ok(())` if all validations pass, or `Err(Vec<ConfigError>)` with
/// all collected validation errors (does not fail fast).
pub fn validate_config(config: &ProoflineConfig) -> Result<(), Vec<ConfigError>> {
    let mut errors = Vec::new();

    let attempts = config.retry.max_attempts;
    if !(1..=MAX_ATTEMPTS_CEILING).contains(&attempts) {
        errors.push(ConfigError::Validation {
            message: format!(
                "retry.max_attempts must be between 1 and {MAX_ATTEMPTS_CEILING}, got {attempts}"
            ),
        });
    }

    if config.retry.backoff_base_ms > MAX_BACKOFF_BASE_MS {
        errors.push(ConfigError::Validation {
            message: format!(
                "retry.backoff_base_ms must be at most {MAX_BACKOFF_BASE_MS}, got {}",
                config.retry.backoff_base_ms
            ),
        });
    }

    let notification = &config.notification;
    match notification.endpoint.as_deref().map(str::trim) {
        None | Some("") if notification.enabled => {
            errors.push(ConfigError::Validation {
                message: "notification.endpoint is required when notification.enabled = true"
                    .to_string(),
            });
        }
        Some(endpoint)
            if !endpoint.is_empty()
                && !(endpoint.starts_with("http://") || endpoint.starts_with("https://")) =>
        {
            errors.push(ConfigError::Validation {
                message: format!("notification.endpoint `{endpoint}` must be an http(s) URL"),
            });
        }
        _ => {}
    }

    if notification.timeout_secs == 0 {
        errors.push(ConfigError::Validation {
            message: "notification.timeout_secs must be at least 1".to_string(),
        });
    }

    if config.upload.path_prefix.trim_matches('/').trim().is_empty() {
        errors.push(ConfigError::Validation {
            message: "upload.path_prefix must not be empty".to_string(),
        });
    }

    let level = config.logging.level.to_ascii_lowercase();
    if !LOG_LEVELS.contains(&level.as_str()) {
        errors.push(ConfigError::Validation {
            message: format!(
                "logging.level `{}` is not one of {}",
                config.logging.level,
                LOG_LEVELS.join(", ")
            ),
        });
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn has_error(errors: &[ConfigError], needle: &str) -> bool {
        errors
            .iter()
            .any(|e| matches!(e, ConfigError::Validation { message } if message.contains(needle)))
    }

    #[test]
    fn default_config_validates() {
        let config = ProoflineConfig::default();
        assert!(validate_config(&config).is_ok());
    }

    #[test]
    fn zero_attempts_fails_validation() {
        let mut config = ProoflineConfig::default();
        config.retry.max_attempts = 0;
        let errors = validate_config(&config).unwrap_err();
        assert!(has_error(&errors, "retry.max_attempts"));
    }

    #[test]
    fn runaway_attempts_fail_validation() {
        let mut config = ProoflineConfig::default();
        config.retry.max_attempts = 50;
        config.retry.backoff_base_ms = 120_000;
        let errors = validate_config(&config).unwrap_err();
        assert_eq!(errors.len(), 2);
        assert!(has_error(&errors, "backoff_base_ms"));
    }

    #[test]
    fn enabled_notification_requires_endpoint() {
        let mut config = ProoflineConfig::default();
        config.notification.enabled = true;
        let errors = validate_config(&config).unwrap_err();
        assert!(has_error(&errors, "notification.endpoint is required"));
    }

    #[test]
    fn endpoint_must_be_http() {
        let mut config = ProoflineConfig::default();
        config.notification.endpoint = Some("ftp://hooks.example".to_string());
        let errors = validate_config(&config).unwrap_err();
        assert!(has_error(&errors, "http(s) URL"));
    }

    #[test]
    fn disabled_notification_may_omit_endpoint() {
        let mut config = ProoflineConfig::default();
        config.notification.enabled = false;
        config.notification.endpoint = None;
        assert!(validate_config(&config).is_ok());
    }

    #[test]
    fn valid_custom_config_passes() {
        let mut config = ProoflineConfig::default();
        config.retry.max_attempts = 5;
        config.retry.backoff_base_ms = 250;
        config.notification.enabled = true;
        config.notification.endpoint = Some("https://hooks.example/pod".to_string());
        config.upload.path_prefix = "captures".to_string();
        config.logging.level = "DEBUG".to_string();
        assert!(validate_config(&config).is_ok());
    }

    #[test]
    fn slash_only_prefix_fails_validation() {
        let mut config = ProoflineConfig::default();
        config.upload.path_prefix = "//".to_string();
        let errors = validate_config(&config).unwrap_err();
        assert!(has_error(&errors, "upload.path_prefix"));
    }

    #[test]
    fn unknown_log_level_fails_validation() {
        let mut config = ProoflineConfig::default();
        config.logging.level = "verbose".to_string();
        let errors = validate_config(&config).unwrap_err();
        assert!(has_error(&errors, "logging.level"));
    }

    #[test]
    fn sections_deserialize_from_toml() {
        let toml_str = r#"
[retry]
max_attempts = 4

[upload]
access = "private"
"#;
        let config: ProoflineConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.retry.max_attempts, 4);
        assert_eq!(config.retry.backoff_base_ms, 1000);
        assert_eq!(config.upload.access, proofline_core::BlobAccess::Private);
        assert_eq!(config.upload.path_prefix, "pod");
    }

    #[test]
    fn notification_deny_unknown_fields() {
        let toml_str = r#"
[notification]
enabled = true
endpoint = "https://hooks.example"
retries = 3
"#;
        assert!(toml::from_str::<ProoflineConfig>(toml_str).is_err());
    }
}
