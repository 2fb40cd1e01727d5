// SPDX-FileCopyrightText: 2026 Proofline Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `proofline config` command implementation.

use proofline_config::model::ProoflineConfig;
use proofline_core::ProoflineError;

const REDACTED: &str = "<redacted>";

/// Print a summary of the effective configuration, or the merged TOML.
pub fn run_config(config: &ProoflineConfig, as_toml: bool) -> Result<(), ProoflineError> {
    if as_toml {
        let rendered = toml::to_string_pretty(&redacted(config))
            .map_err(|e| ProoflineError::Config(format!("cannot render config: {e}")))?;
        print!("{rendered}");
    } else {
        println!("{}", summarize(config));
    }
    Ok(())
}

/// Human-readable summary, one line per section.
pub fn summarize(config: &ProoflineConfig) -> String {
    let retry = &config.retry;
    let notification = &config.notification;

    let notification_line = if notification.enabled {
        format!(
            "enabled -> {} (timeout {}s, {})",
            notification.endpoint.as_deref().unwrap_or("<none>"),
            notification.timeout_secs,
            if notification.secret.is_some() {
                "bearer secret set"
            } else {
                "no secret"
            }
        )
    } else {
        "disabled".to_string()
    };

    [
        "proofline: config OK".to_string(),
        format!(
            "  retry         {} attempts, backoff base {} ms",
            retry.max_attempts, retry.backoff_base_ms
        ),
        format!("  notification  {notification_line}"),
        format!(
            "  upload        {} access, prefix \"{}\"",
            config.upload.access, config.upload.path_prefix
        ),
        format!("  logging       {}", config.logging.level),
    ]
    .join("\n")
}

fn redacted(config: &ProoflineConfig) -> ProoflineConfig {
    let mut copy = config.clone();
    if copy.notification.secret.is_some() {
        copy.notification.secret = Some(REDACTED.to_string());
    }
    copy
}
