// SPDX-FileCopyrightText: 2026 Proofline Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `proofline notify` command implementation.
//!
//! Sends a single notification synchronously and prints the interpreted
//! response, so operators can check the webhook without submitting a
//! proof of delivery.

use proofline_config::model::ProoflineConfig;
use proofline_core::types::{NotificationRequest, NotificationResponse, OrderId, RecordId};
use proofline_core::{NotificationChannel, ProoflineError};
use proofline_notify::HttpNotificationChannel;
use tracing::warn;

pub async fn run_notify(
    config: &ProoflineConfig,
    order_id: String,
    pod_id: String,
) -> Result<(), ProoflineError> {
    let response = send(config, OrderId(order_id), RecordId(pod_id)).await?;

    let rendered = serde_json::to_string_pretty(&response)
        .map_err(|e| ProoflineError::Internal(format!("cannot render response: {e}")))?;
    println!("{rendered}");

    if response.ok {
        Ok(())
    } else {
        Err(ProoflineError::Notification {
            message: format!("endpoint answered with status {}", response.status),
            source: None,
        })
    }
}

async fn send(
    config: &ProoflineConfig,
    order_id: OrderId,
    pod_id: RecordId,
) -> Result<NotificationResponse, ProoflineError> {
    let notification = &config.notification;
    let endpoint = notification.endpoint.as_deref().ok_or_else(|| {
        ProoflineError::Config("notification.endpoint is not configured".into())
    })?;
    if !notification.enabled {
        warn!("notification.enabled is false; sending anyway");
    }

    let channel =
        HttpNotificationChannel::new(endpoint, notification.secret.as_deref(), notification.timeout())?;
    channel
        .notify(&NotificationRequest { order_id, pod_id })
        .await
}
