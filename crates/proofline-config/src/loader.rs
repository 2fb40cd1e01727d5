// SPDX-FileCopyrightText: 2026 Proofline Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration loader using Figment for layered config merging.
//!
//! Supports XDG hierarchy: `./proofline.toml` > `~/.config/proofline/proofline.toml`
//! > `/etc/proofline/proofline.toml` with environment variable overrides via
//! the `PROOFLINE_` prefix.

#![allow(clippy::result_large_err)] // figment::Error is external and cannot be boxed without wrapper

use std::path::{Path, PathBuf};

use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};

use crate::model::ProoflineConfig;

/// System-wide config file.
pub const SYSTEM_CONFIG_FILE: &str = "/etc/proofline/proofline.toml";

/// Config file looked up in the working directory.
pub const LOCAL_CONFIG_FILE: &str = "proofline.toml";

/// `~/.config/proofline/proofline.toml`, if a config dir exists.
pub fn user_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("proofline").join(LOCAL_CONFIG_FILE))
}

/// Load configuration from the standard XDG hierarchy with env var overrides.
///
/// Merge order (later overrides earlier):
/// 1. Compiled defaults
/// 2. `/etc/proofline/proofline.toml`
/// 3. `~/.config/proofline/proofline.toml`
/// 4. `./proofline.toml`
/// 5. `PROOFLINE_*` environment variables
pub fn load_config() -> Result<ProoflineConfig, figment::Error> {
    build_figment().extract()
}

/// Load configuration from a TOML string only (no XDG lookup, no env).
pub fn load_config_from_str(toml_content: &str) -> Result<ProoflineConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(ProoflineConfig::default()))
        .merge(Toml::string(toml_content))
        .extract()
}

/// Load configuration from a specific file path with env var overrides.
pub fn load_config_from_path(path: &Path) -> Result<ProoflineConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(ProoflineConfig::default()))
        .merge(Toml::file(path))
        .merge(env_provider())
        .extract()
}

/// Build the Figment used for config loading.
///
/// Returns the Figment before extraction so callers can inspect metadata.
pub fn build_figment() -> Figment {
    Figment::new()
        .merge(Serialized::defaults(ProoflineConfig::default()))
        .merge(Toml::file(SYSTEM_CONFIG_FILE))
        .merge(Toml::file(user_config_path().unwrap_or_default()))
        .merge(Toml::file(LOCAL_CONFIG_FILE))
        .merge(env_provider())
}

/// Environment provider with explicit section mapping.
///
/// Uses `Env::map()` rather than `Env::split("_")` because keys contain
/// underscores: `PROOFLINE_RETRY_MAX_ATTEMPTS` must map to
/// `retry.max_attempts`, not `retry.max.attempts`.
fn env_provider() -> Env {
    Env::prefixed("PROOFLINE_").map(|key| map_env_key(key.as_str()).into())
}

/// Maps a lowercased, prefix-stripped env key to its dotted config path.
pub fn map_env_key(key: &str) -> String {
    const SECTIONS: [&str; 4] = ["retry", "notification", "upload", "logging"];

    for section in SECTIONS {
        if let Some(field) = key
            .strip_prefix(section)
            .and_then(|rest| rest.strip_prefix('_'))
        {
            return format!("{section}.{field}");
        }
    }
    key.to_string()
}
