// SPDX-FileCopyrightText: 2026 Proofline Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Fire-and-forget delivery notifications.
//!
//! Dispatches run on a [`TaskTracker`] the submitting operation never joins.
//! Their outcome is only logged and counted. [`NotificationDispatcher::shutdown`]
//! lets the host drain in-flight dispatches before exiting.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use proofline_config::model::NotificationConfig;
use proofline_core::error::ProoflineError;
use proofline_core::types::NotificationRequest;
use proofline_core::NotificationChannel;
use proofline_notify::HttpNotificationChannel;
use proofline_resilience::recording;
use tokio_util::task::TaskTracker;
use tracing::{debug, info, warn, Instrument};

/// Default bound on a single dispatch.
pub const DEFAULT_DISPATCH_TIMEOUT: Duration = Duration::from_secs(10);

/// Spawns notification dispatches behind a feature flag.
#[derive(Clone)]
pub struct NotificationDispatcher {
    channel: Option<Arc<dyn NotificationChannel>>,
    timeout: Duration,
    tracker: TaskTracker,
    shut_down: Arc<AtomicBool>,
}

impl NotificationDispatcher {
    /// An enabled dispatcher sending through `channel`.
    pub fn new(channel: Arc<dyn NotificationChannel>, timeout: Duration) -> Self {
        Self {
            channel: Some(channel),
            timeout,
            tracker: TaskTracker::new(),
            shut_down: Arc::new(AtomicBool::new(false)),
        }
    }

    /// A dispatcher that never sends anything.
    pub fn disabled() -> Self {
        Self {
            channel: None,
            timeout: DEFAULT_DISPATCH_TIMEOUT,
            tracker: TaskTracker::new(),
            shut_down: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Builds the HTTP-backed dispatcher described by `[notification]`.
    pub fn from_config(config: &NotificationConfig) -> Result<Self, ProoflineError> {
        if !config.enabled {
            return Ok(Self::disabled());
        }

        let endpoint = config.endpoint.as_deref().ok_or_else(|| {
            ProoflineError::Config("notification.endpoint is required when enabled".into())
        })?;
        let channel =
            HttpNotificationChannel::new(endpoint, config.secret.as_deref(), config.timeout())?;
        info!(endpoint, "delivery notifications enabled");
        Ok(Self::new(Arc::new(channel), config.timeout()))
    }

    pub fn is_enabled(&self) -> bool {
        self.channel.is_some()
    }

    /// Number of dispatches still running.
    pub fn in_flight(&self) -> usize {
        self.tracker.len()
    }

    /// Starts a dispatch in the background and returns immediately.
    ///
    /// Returns `false` when notifications are disabled and nothing was spawned.
    pub fn dispatch(&self, request: NotificationRequest) -> bool {
        let Some(channel) = self.channel.clone() else {
            debug!(order_id = %request.order_id, "notifications disabled, skipping dispatch");
            return false;
        };
        let timeout = self.timeout;

        self.tracker.spawn(async move {
            let order_id = &request.order_id;
            let pod_id = &request.pod_id;

            match tokio::time::timeout(timeout, channel.notify(&request)).await {
                Ok(Ok(response)) if response.ok => {
                    info!(%order_id, %pod_id, status = response.status, "delivery notification sent");
                    recording::record_notification("sent");
                }
                Ok(Ok(response)) => {
                    warn!(
                        %order_id,
                        %pod_id,
                        status = response.status,
                        error = response.error.as_deref().unwrap_or(""),
                        body = response.body.as_deref().unwrap_or(""),
                        "delivery notification rejected"
                    );
                    recording::record_secondary_failure("notification");
                    recording::record_notification("rejected");
                }
                Ok(Err(err)) => {
                    warn!(%order_id, %pod_id, error = %err, "delivery notification failed");
                    recording::record_secondary_failure("notification");
                    recording::record_notification("error");
                }
                Err(_) => {
                    warn!(
                        %order_id,
                        %pod_id,
                        timeout_ms = timeout.as_millis() as u64,
                        "delivery notification timed out"
                    );
                    recording::record_secondary_failure("notification");
                    recording::record_notification("timeout");
                }
            }
        }
        .in_current_span());
        true
    }

    /// Waits until every dispatch started so far has finished.
    ///
    /// New dispatches may still be started afterwards. A flush never reopens
    /// a dispatcher that has been shut down, even one racing with it.
    pub async fn flush(&self) {
        if self.shut_down.load(Ordering::SeqCst) {
            self.tracker.wait().await;
            return;
        }
        self.tracker.close();
        self.tracker.wait().await;
        self.tracker.reopen();
        if self.shut_down.load(Ordering::SeqCst) {
            self.tracker.close();
        }
    }

    /// Closes the tracker and waits up to `grace` for in-flight dispatches.
    /// Returns `false` if some were still running when the grace elapsed.
    pub async fn shutdown(&self, grace: Duration) -> bool {
        self.shut_down.store(true, Ordering::SeqCst);
        self.tracker.close();
        let pending = self.tracker.len();
        if pending > 0 {
            info!(pending, "draining delivery notifications");
        }
        match tokio::time::timeout(grace, self.tracker.wait()).await {
            Ok(()) => true,
            Err(_) => {
                warn!(
                    pending = self.tracker.len(),
                    "shutdown grace elapsed with notifications in flight"
                );
                false
            }
        }
    }
}
