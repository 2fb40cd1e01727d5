// SPDX-FileCopyrightText: 2026 Proofline Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Notification channel trait for delivery confirmations.

use async_trait::async_trait;

use crate::error::ProoflineError;
use crate::types::{NotificationRequest, NotificationResponse};

/// Downstream channel told about new proofs of delivery.
///
/// A non-success response is returned as `Ok` with `ok == false`; `Err` is
/// reserved for failures to reach the channel at all.
#[async_trait]
pub trait NotificationChannel: Send + Sync + 'static {
    async fn notify(
        &self,
        request: &NotificationRequest,
    ) -> Result<NotificationResponse, ProoflineError>;
}
