// SPDX-FileCopyrightText: 2026 Proofline Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Test utilities for Proofline integration tests.
//!
//! Provides scriptable collaborators and a harness that wires them into a
//! [`DeliveryService`](proofline_delivery::DeliveryService) with zero backoff,
//! for fast, deterministic tests without external services.
//!
//! # Components
//!
//! - [`MockIdentity`] - Signed-in, signed-out or failing identity provider
//! - [`MockStore`] - Durable store with scripted failures and captured writes
//! - [`MockBlobStore`] - Blob store with scripted failures and captured puts
//! - [`MockNotifier`] - Notification channel that can be held open on a gate
//! - [`RecordingInvalidator`] - Captures invalidated view paths

pub mod harness;
pub mod mock_blob;
pub mod mock_identity;
pub mod mock_notifier;
pub mod mock_store;

pub use harness::{RecordingInvalidator, TestHarness, TestHarnessBuilder};
pub use mock_blob::MockBlobStore;
pub use mock_identity::MockIdentity;
pub use mock_notifier::{MockNotifier, NotifierBehavior};
pub use mock_store::{MockStore, StoreOp};
