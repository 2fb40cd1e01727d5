// SPDX-FileCopyrightText: 2026 Proofline Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration model structs for the Proofline pipeline.
//!
//! All structs use `#[serde(deny_unknown_fields)]` to reject unrecognized
//! config keys at startup, providing actionable error messages.

use std::time::Duration;

use proofline_core::BlobAccess;
use serde::{Deserialize, Serialize};

/// Top-level Proofline configuration.
///
/// All sections are optional and default to sensible values.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct ProoflineConfig {
    /// Retry budget for primary mutations.
    #[serde(default)]
    pub retry: RetryConfig,

    /// Delivery notification webhook.
    #[serde(default)]
    pub notification: NotificationConfig,

    /// Photo and signature uploads.
    #[serde(default)]
    pub upload: UploadConfig,

    /// Log output.
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Retry budget for primary mutations.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct RetryConfig {
    /// Attempts per mutation, including the first.
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,

    /// Backoff unit in milliseconds. The k-th sleep lasts `k * backoff_base_ms`.
    #[serde(default = "default_backoff_base_ms")]
    pub backoff_base_ms: u64,
}

impl RetryConfig {
    pub fn backoff_base(&self) -> Duration {
        Duration::from_millis(self.backoff_base_ms)
    }
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: default_max_attempts(),
            backoff_base_ms: default_backoff_base_ms(),
        }
    }
}

fn default_max_attempts() -> u32 {
    3
}

fn default_backoff_base_ms() -> u64 {
    1000
}

/// Delivery notification webhook configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct NotificationConfig {
    /// Feature flag. When false no dispatch is attempted at all.
    #[serde(default)]
    pub enabled: bool,

    /// Webhook URL. Required when `enabled`.
    #[serde(default)]
    pub endpoint: Option<String>,

    /// Bearer token sent with each request.
    #[serde(default)]
    pub secret: Option<String>,

    /// Upper bound on a single dispatch, in seconds.
    #[serde(default = "default_notification_timeout_secs")]
    pub timeout_secs: u64,
}

impl NotificationConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl Default for NotificationConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            endpoint: None,
            secret: None,
            timeout_secs: default_notification_timeout_secs(),
        }
    }
}

fn default_notification_timeout_secs() -> u64 {
    10
}

/// Upload configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct UploadConfig {
    /// Visibility of stored captures.
    #[serde(default)]
    pub access: BlobAccess,

    /// Leading path segment of generated capture filenames.
    #[serde(default = "default_path_prefix")]
    pub path_prefix: String,
}

impl Default for UploadConfig {
    fn default() -> Self {
        Self {
            access: BlobAccess::default(),
            path_prefix: default_path_prefix(),
        }
    }
}

fn default_path_prefix() -> String {
    "pod".to_string()
}

/// Logging configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct LoggingConfig {
    /// Logging level (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}
