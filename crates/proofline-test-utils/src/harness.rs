// SPDX-FileCopyrightText: 2026 Proofline Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Test harness for end-to-end integration testing.
//!
//! `TestHarness` assembles a [`DeliveryService`] over mock collaborators and
//! keeps handles to every mock so tests can script failures and inspect
//! what was written.

use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use proofline_core::ViewInvalidator;
use proofline_delivery::{DeliveryService, NotificationDispatcher};
use proofline_resilience::RetryPolicy;

use crate::mock_blob::MockBlobStore;
use crate::mock_identity::MockIdentity;
use crate::mock_notifier::MockNotifier;
use crate::mock_store::MockStore;

/// Captures every invalidated view path, in order.
#[derive(Debug, Default)]
pub struct RecordingInvalidator {
    paths: Mutex<Vec<String>>,
}

impl RecordingInvalidator {
    pub fn paths(&self) -> Vec<String> {
        self.paths
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

impl ViewInvalidator for RecordingInvalidator {
    fn invalidate(&self, path: &str) {
        self.paths
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(path.to_string());
    }
}

/// Builder for creating test environments with configurable options.
pub struct TestHarnessBuilder {
    identity: MockIdentity,
    store: MockStore,
    policy: RetryPolicy,
    notifier: Option<MockNotifier>,
    notification_timeout: Duration,
    path_prefix: Option<String>,
}

impl TestHarnessBuilder {
    fn new() -> Self {
        Self {
            identity: MockIdentity::signed_in("driver-1"),
            store: MockStore::new(),
            policy: RetryPolicy::new(3, Duration::ZERO),
            notifier: None,
            notification_timeout: Duration::from_secs(5),
            path_prefix: None,
        }
    }

    pub fn with_identity(mut self, identity: MockIdentity) -> Self {
        self.identity = identity;
        self
    }

    pub fn with_store(mut self, store: MockStore) -> Self {
        self.store = store;
        self
    }

    /// Retry budget and backoff unit. Defaults to 3 attempts, zero backoff.
    pub fn with_retries(mut self, max_attempts: u32, backoff_base: Duration) -> Self {
        self.policy = RetryPolicy::new(max_attempts, backoff_base);
        self
    }

    /// Enables notifications through `notifier`.
    pub fn with_notifier(mut self, notifier: MockNotifier) -> Self {
        self.notifier = Some(notifier);
        self
    }

    pub fn with_notification_timeout(mut self, timeout: Duration) -> Self {
        self.notification_timeout = timeout;
        self
    }

    pub fn with_path_prefix(mut self, prefix: &str) -> Self {
        self.path_prefix = Some(prefix.to_string());
        self
    }

    pub fn build(self) -> TestHarness {
        let identity = Arc::new(self.identity);
        let store = Arc::new(self.store);
        let blobs = Arc::new(MockBlobStore::new());
        let invalidator = Arc::new(RecordingInvalidator::default());
        let notifications_enabled = self.notifier.is_some();
        let notifier = Arc::new(self.notifier.unwrap_or_else(MockNotifier::accepting));

        let dispatcher = if notifications_enabled {
            NotificationDispatcher::new(notifier.clone(), self.notification_timeout)
        } else {
            NotificationDispatcher::disabled()
        };

        let mut builder = DeliveryService::builder(identity.clone(), store.clone(), blobs.clone())
            .invalidator(invalidator.clone())
            .retry_policy(self.policy)
            .dispatcher(dispatcher);
        if let Some(prefix) = self.path_prefix {
            builder = builder.path_prefix(prefix);
        }

        TestHarness {
            service: builder.build(),
            identity,
            store,
            blobs,
            notifier,
            invalidator,
        }
    }
}

/// A delivery service wired to mocks.
pub struct TestHarness {
    pub service: DeliveryService,
    pub identity: Arc<MockIdentity>,
    pub store: Arc<MockStore>,
    pub blobs: Arc<MockBlobStore>,
    /// Present even when notifications are disabled; then it never sees a request.
    pub notifier: Arc<MockNotifier>,
    pub invalidator: Arc<RecordingInvalidator>,
}

impl TestHarness {
    pub fn builder() -> TestHarnessBuilder {
        TestHarnessBuilder::new()
    }

    /// Waits for every notification dispatched so far.
    pub async fn flush_notifications(&self) {
        self.service.dispatcher().flush().await;
    }
}
