// SPDX-FileCopyrightText: 2026 Proofline Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Delivery confirmation orchestrator.
//!
//! Every public operation follows the same sequence:
//! 1. Resolve the acting driver through the [`SessionGuard`] (exactly once).
//! 2. Run the primary write through the [`RetryingExecutor`].
//! 3. On success only, attempt secondary effects: one un-retried audit
//!    write, a detached notification dispatch, and view invalidation.
//!
//! Secondary failures are logged and counted but never change the outcome.
//! Nothing escapes an operation; see [`crate::boundary`].

use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use futures::FutureExt;
use proofline_config::model::ProoflineConfig;
use proofline_core::error::ProoflineError;
use proofline_core::types::{
    BinaryArtifact, BlobAccess, DriverId, DriverPosition, NotificationRequest, OrderId,
    ProofOfDelivery, ProofReceipt, PutOptions, StopEvent, StopStatus, StopStatusUpdate,
    StoredBlob,
};
use proofline_core::{
    BlobStore, DurableStore, ErrorCode, IdentityProvider, MutationOutcome, ViewInvalidator,
};
use proofline_resilience::{recording, RetryPolicy, RetryingExecutor};
use tracing::{debug, error, info, warn};

use crate::boundary::{guarded, panic_message};
use crate::compose::{capture_filename, compose_pod_notes, CaptureKind};
use crate::dispatch::NotificationDispatcher;
use crate::session::SessionGuard;

/// Message returned when a blob upload exhausts its retries. The store's
/// own error is logged only.
pub const UPLOAD_FAILED_MESSAGE: &str = "Failed to upload file";

/// View listing the driver's remaining stops.
pub const ROUTE_VIEW_PATH: &str = "/driver/route";

/// View showing a single stop.
pub fn stop_view_path(order_id: &OrderId) -> String {
    format!("/driver/stops/{order_id}")
}

/// Optional parts of a proof-of-delivery submission.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProofSubmission {
    pub photo_ref: Option<String>,
    pub signature_ref: Option<String>,
    pub notes: Option<String>,
    pub recipient_name: Option<String>,
}

/// Invalidator for hosts without a view cache.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopInvalidator;

impl ViewInvalidator for NoopInvalidator {
    fn invalidate(&self, _path: &str) {}
}

/// Orchestrates the four driver-facing mutations.
#[derive(Clone)]
pub struct DeliveryService {
    guard: SessionGuard,
    store: Arc<dyn DurableStore>,
    blobs: Arc<dyn BlobStore>,
    invalidator: Arc<dyn ViewInvalidator>,
    executor: RetryingExecutor,
    dispatcher: NotificationDispatcher,
    upload_access: BlobAccess,
    path_prefix: String,
}

impl DeliveryService {
    pub fn builder(
        identity: Arc<dyn IdentityProvider>,
        store: Arc<dyn DurableStore>,
        blobs: Arc<dyn BlobStore>,
    ) -> DeliveryServiceBuilder {
        DeliveryServiceBuilder::new(identity, store, blobs)
    }

    /// The dispatcher, for draining notifications at shutdown.
    pub fn dispatcher(&self) -> &NotificationDispatcher {
        &self.dispatcher
    }

    pub fn retry_policy(&self) -> &RetryPolicy {
        self.executor.policy()
    }

    /// Records a terminal stop outcome.
    ///
    /// The status write is retried; the audit event that follows is written
    /// once and its failure only logged.
    pub async fn record_stop_status(
        &self,
        order_id: &OrderId,
        status: StopStatus,
        notes: Option<String>,
    ) -> MutationOutcome<()> {
        guarded("record_stop_status", async {
            let actor = self.guard.require_actor().await?;
            let store = &self.store;

            self.executor
                .run("update_status", || {
                    let update = StopStatusUpdate {
                        order_id: order_id.clone(),
                        status,
                        notes: notes.clone(),
                        actor_id: actor.clone(),
                        updated_at: Utc::now(),
                    };
                    async move { store.update_status(&update).await }
                })
                .await?;

            info!(%order_id, %status, driver_id = %actor, "stop status recorded");

            self.write_stop_event(StopEvent {
                order_id: order_id.clone(),
                driver_id: actor,
                event_type: status,
                notes,
            })
            .await;
            self.invalidate_stop(order_id);

            Ok(MutationOutcome::done())
        })
        .await
    }

    /// Inserts a proof of delivery and, when enabled, notifies downstream
    /// without waiting for the notification to complete.
    pub async fn submit_proof_of_delivery(
        &self,
        order_id: &OrderId,
        submission: ProofSubmission,
    ) -> MutationOutcome<ProofReceipt> {
        guarded("submit_proof_of_delivery", async {
            let driver_id = self.guard.require_actor().await?;
            let notes = compose_pod_notes(
                submission.notes.as_deref(),
                submission.recipient_name.as_deref(),
            );
            let store = &self.store;

            let pod_id = self
                .executor
                .run("insert_proof_of_delivery", || {
                    let pod = ProofOfDelivery {
                        order_id: order_id.clone(),
                        driver_id: driver_id.clone(),
                        photo_ref: submission.photo_ref.clone(),
                        signature_ref: submission.signature_ref.clone(),
                        notes: notes.clone(),
                        delivered_at: Utc::now(),
                    };
                    async move { store.insert_proof_of_delivery(&pod).await }
                })
                .await?;

            match &pod_id {
                Some(pod_id) => {
                    info!(%order_id, %pod_id, %driver_id, "proof of delivery stored");
                    self.dispatcher.dispatch(NotificationRequest {
                        order_id: order_id.clone(),
                        pod_id: pod_id.clone(),
                    });
                }
                None => {
                    info!(%order_id, %driver_id, "proof of delivery stored without id");
                    if self.dispatcher.is_enabled() {
                        debug!(%order_id, "no record id returned, skipping notification");
                    }
                }
            }
            self.invalidate_stop(order_id);

            Ok(MutationOutcome::success(ProofReceipt { pod_id }))
        })
        .await
    }

    /// Stores an already-decoded artifact under `filename`.
    pub async fn upload_binary(
        &self,
        artifact: &BinaryArtifact,
        filename: &str,
    ) -> MutationOutcome<StoredBlob> {
        guarded("upload_binary", async {
            let driver_id = self.guard.require_actor().await?;
            self.put_blob(&driver_id, artifact, filename).await
        })
        .await
    }

    /// Normalizes a captured photo or signature and stores it under a
    /// generated filename. Malformed input fails with `DECODE_ERROR` before
    /// the blob store is touched.
    pub async fn upload_capture(
        &self,
        order_id: &OrderId,
        kind: CaptureKind,
        input: &str,
        declared_content_type: &str,
    ) -> MutationOutcome<StoredBlob> {
        guarded("upload_capture", async {
            let driver_id = self.guard.require_actor().await?;
            let artifact = proofline_media::normalize(input, declared_content_type)?;
            let filename =
                capture_filename(&self.path_prefix, order_id, kind, &artifact.content_type);
            self.put_blob(&driver_id, &artifact, &filename).await
        })
        .await
    }

    /// Upserts the driver's last known position.
    pub async fn update_driver_position(
        &self,
        lat: f64,
        lng: f64,
        accuracy: Option<f64>,
    ) -> MutationOutcome<()> {
        guarded("update_driver_position", async {
            let driver_id = self.guard.require_actor().await?;
            let position = DriverPosition {
                driver_id,
                lat,
                lng,
                accuracy,
            };
            let store = &self.store;
            let position = &position;

            self.executor
                .run("upsert_position", || async move {
                    store.upsert_position(position).await
                })
                .await?;

            debug!(driver_id = %position.driver_id, lat, lng, "driver position updated");
            Ok(MutationOutcome::done())
        })
        .await
    }

    async fn put_blob(
        &self,
        driver_id: &DriverId,
        artifact: &BinaryArtifact,
        filename: &str,
    ) -> Result<MutationOutcome<StoredBlob>, ProoflineError> {
        let options = PutOptions {
            access: self.upload_access,
            content_type: artifact.content_type.clone(),
        };
        let blobs = &self.blobs;
        let bytes = artifact.bytes.as_slice();
        let options = &options;

        let result = self
            .executor
            .run("blob_put", || async move {
                blobs.put(filename, bytes, options).await
            })
            .await;

        match result {
            Ok(blob) => {
                info!(%driver_id, filename, size = bytes.len(), url = %blob.url, "blob stored");
                Ok(MutationOutcome::success(blob))
            }
            Err(err) if err.code() == ErrorCode::TransientWriteFailure => {
                error!(%driver_id, filename, error = %err, "blob upload failed");
                Ok(MutationOutcome::failure(
                    UPLOAD_FAILED_MESSAGE,
                    ErrorCode::TransientWriteFailure,
                ))
            }
            Err(err) => Err(err),
        }
    }

    async fn write_stop_event(&self, event: StopEvent) {
        let message = match AssertUnwindSafe(self.store.insert_stop_event(&event))
            .catch_unwind()
            .await
        {
            Ok(Ok(())) => return,
            Ok(Err(err)) => err.to_string(),
            Err(panic) => format!("panicked: {}", panic_message(panic.as_ref())),
        };

        let err = ProoflineError::SecondaryEffect {
            effect: "audit write".into(),
            message,
        };
        warn!(
            order_id = %event.order_id,
            code = %err.code(),
            error = %err,
            "stop event not recorded, status update stands"
        );
        recording::record_secondary_failure("audit");
    }

    fn invalidate_stop(&self, order_id: &OrderId) {
        self.invalidator.invalidate(ROUTE_VIEW_PATH);
        self.invalidator.invalidate(&stop_view_path(order_id));
    }
}

/// Builder for [`DeliveryService`].
pub struct DeliveryServiceBuilder {
    identity: Arc<dyn IdentityProvider>,
    store: Arc<dyn DurableStore>,
    blobs: Arc<dyn BlobStore>,
    invalidator: Arc<dyn ViewInvalidator>,
    policy: RetryPolicy,
    dispatcher: NotificationDispatcher,
    upload_access: BlobAccess,
    path_prefix: String,
}

impl DeliveryServiceBuilder {
    fn new(
        identity: Arc<dyn IdentityProvider>,
        store: Arc<dyn DurableStore>,
        blobs: Arc<dyn BlobStore>,
    ) -> Self {
        let defaults = ProoflineConfig::default();
        Self {
            identity,
            store,
            blobs,
            invalidator: Arc::new(NoopInvalidator),
            policy: RetryPolicy::default(),
            dispatcher: NotificationDispatcher::disabled(),
            upload_access: defaults.upload.access,
            path_prefix: defaults.upload.path_prefix,
        }
    }

    /// Applies `[retry]`, `[upload]` and `[notification]`.
    pub fn config(mut self, config: &ProoflineConfig) -> Result<Self, ProoflineError> {
        self.policy = RetryPolicy::new(config.retry.max_attempts, config.retry.backoff_base());
        self.upload_access = config.upload.access;
        self.path_prefix = config.upload.path_prefix.clone();
        self.dispatcher = NotificationDispatcher::from_config(&config.notification)?;
        Ok(self)
    }

    pub fn invalidator(mut self, invalidator: Arc<dyn ViewInvalidator>) -> Self {
        self.invalidator = invalidator;
        self
    }

    pub fn retry_policy(mut self, policy: RetryPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Shorthand for a policy with the given budget and backoff unit.
    pub fn retries(self, max_attempts: u32, backoff_base: Duration) -> Self {
        self.retry_policy(RetryPolicy::new(max_attempts, backoff_base))
    }

    pub fn dispatcher(mut self, dispatcher: NotificationDispatcher) -> Self {
        self.dispatcher = dispatcher;
        self
    }

    pub fn upload_access(mut self, access: BlobAccess) -> Self {
        self.upload_access = access;
        self
    }

    pub fn path_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.path_prefix = prefix.into();
        self
    }

    pub fn build(self) -> DeliveryService {
        DeliveryService {
            guard: SessionGuard::new(self.identity),
            store: self.store,
            blobs: self.blobs,
            invalidator: self.invalidator,
            executor: RetryingExecutor::new(self.policy),
            dispatcher: self.dispatcher,
            upload_access: self.upload_access,
            path_prefix: self.path_prefix,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicU32, Ordering};

    use async_trait::async_trait;
    use proofline_core::error::StoreError;
    use proofline_core::types::RecordId;
    use tracing_test::traced_test;

    use crate::session::FixedIdentity;

    /// Store whose audit write always fails; everything else succeeds.
    #[derive(Default)]
    struct AuditlessStore {
        status_writes: AtomicU32,
        audit_writes: AtomicU32,
        panic_on_audit: bool,
    }

    #[async_trait]
    impl DurableStore for AuditlessStore {
        async fn update_status(&self, _update: &StopStatusUpdate) -> Result<(), StoreError> {
            self.status_writes.fetch_add(1, Ordering::SeqCst);
            Ok(())
        }

        async fn insert_proof_of_delivery(
            &self,
            _pod: &ProofOfDelivery,
        ) -> Result<Option<RecordId>, StoreError> {
            Ok(Some(RecordId("pod-1".into())))
        }

        async fn insert_stop_event(&self, _event: &StopEvent) -> Result<(), StoreError> {
            self.audit_writes.fetch_add(1, Ordering::SeqCst);
            if self.panic_on_audit {
                panic!("stop_events connection poisoned");
            }
            Err(StoreError::new("row-level security violation"))
        }

        async fn upsert_position(&self, _position: &DriverPosition) -> Result<(), StoreError> {
            Ok(())
        }
    }

    /// Blob store that always raises with a detailed error.
    struct LeakyBlobs;

    #[async_trait]
    impl BlobStore for LeakyBlobs {
        async fn put(
            &self,
            _filename: &str,
            _bytes: &[u8],
            _options: &PutOptions,
        ) -> Result<StoredBlob, ProoflineError> {
            Err(ProoflineError::Blob {
                message: "bucket quota exceeded for tenant 9".into(),
                source: None,
            })
        }
    }

    #[derive(Default)]
    struct Paths(Mutex<Vec<String>>);

    impl ViewInvalidator for Paths {
        fn invalidate(&self, path: &str) {
            self.0.lock().unwrap().push(path.to_string());
        }
    }

    fn service(store: Arc<AuditlessStore>, paths: Arc<Paths>) -> DeliveryService {
        DeliveryService::builder(Arc::new(FixedIdentity::new("drv-1")), store, Arc::new(LeakyBlobs))
            .invalidator(paths)
            .retries(3, Duration::ZERO)
            .build()
    }

    #[tokio::test]
    #[traced_test]
    async fn audit_failure_is_logged_not_returned() {
        let store = Arc::new(AuditlessStore::default());
        let paths = Arc::new(Paths::default());
        let svc = service(store.clone(), paths.clone());

        let outcome = svc
            .record_stop_status(&OrderId::from("ord-9"), StopStatus::Delivered, None)
            .await;

        assert!(outcome.is_success());
        assert_eq!(store.status_writes.load(Ordering::SeqCst), 1);
        assert_eq!(store.audit_writes.load(Ordering::SeqCst), 1, "audit is never retried");
        assert!(logs_contain("stop event not recorded"));
        assert!(logs_contain("SECONDARY_EFFECT_FAILURE"));
        assert_eq!(
            *paths.0.lock().unwrap(),
            vec!["/driver/route".to_string(), "/driver/stops/ord-9".to_string()]
        );
    }

    #[tokio::test]
    #[traced_test]
    async fn panicking_audit_write_keeps_committed_status() {
        let store = Arc::new(AuditlessStore {
            panic_on_audit: true,
            ..AuditlessStore::default()
        });
        let paths = Arc::new(Paths::default());
        let svc = service(store.clone(), paths.clone());

        let outcome = svc
            .record_stop_status(&OrderId::from("ord-5"), StopStatus::Failed, Some("gate locked".into()))
            .await;

        assert!(outcome.is_success());
        assert_eq!(store.status_writes.load(Ordering::SeqCst), 1);
        assert_eq!(store.audit_writes.load(Ordering::SeqCst), 1);
        assert!(logs_contain("stop event not recorded"));
        assert!(logs_contain("stop_events connection poisoned"));
        assert_eq!(
            *paths.0.lock().unwrap(),
            vec!["/driver/route".to_string(), "/driver/stops/ord-5".to_string()]
        );
    }

    #[tokio::test]
    #[traced_test]
    async fn upload_failure_hides_store_detail() {
        let svc = service(Arc::new(AuditlessStore::default()), Arc::new(Paths::default()));
        let artifact = BinaryArtifact {
            bytes: vec![1, 2, 3],
            content_type: "image/png".into(),
        };

        let outcome = svc.upload_binary(&artifact, "pod/x.png").await;

        assert_eq!(outcome.code(), Some(ErrorCode::TransientWriteFailure));
        assert_eq!(outcome.error(), Some(UPLOAD_FAILED_MESSAGE));
        assert!(logs_contain("bucket quota exceeded"));
    }

    #[tokio::test]
    async fn capture_decode_error_skips_upload() {
        let svc = service(Arc::new(AuditlessStore::default()), Arc::new(Paths::default()));

        let outcome = svc
            .upload_capture(&OrderId::from("ord-1"), CaptureKind::Photo, "%%%", "image/png")
            .await;

        // LeakyBlobs would have produced TRANSIENT_WRITE_FAILURE.
        assert_eq!(outcome.code(), Some(ErrorCode::DecodeError));
    }

    #[test]
    fn config_sets_policy_and_upload() {
        let mut config = ProoflineConfig::default();
        config.retry.max_attempts = 5;
        config.retry.backoff_base_ms = 20;
        config.upload.access = BlobAccess::Private;

        let svc = DeliveryService::builder(
            Arc::new(FixedIdentity::new("drv-1")),
            Arc::new(AuditlessStore::default()),
            Arc::new(LeakyBlobs),
        )
        .config(&config)
        .unwrap()
        .build();

        assert_eq!(svc.retry_policy().max_attempts(), 5);
        assert_eq!(svc.retry_policy().backoff_base(), Duration::from_millis(20));
        assert_eq!(svc.upload_access, BlobAccess::Private);
        assert!(!svc.dispatcher().is_enabled());
    }
}
