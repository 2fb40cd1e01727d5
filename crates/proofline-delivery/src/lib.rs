// SPDX-FileCopyrightText: 2026 Proofline Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Delivery confirmation orchestrator for the Proofline pipeline.
//!
//! [`DeliveryService`] exposes the driver-facing mutations: stop status,
//! proof of delivery, blob and capture uploads, and position updates. Each
//! returns a [`MutationOutcome`](proofline_core::MutationOutcome) and never
//! raises past its own boundary.

mod boundary;
pub mod compose;
pub mod dispatch;
pub mod service;
pub mod session;

pub use compose::{capture_filename, compose_pod_notes, CaptureKind};
pub use dispatch::NotificationDispatcher;
pub use service::{
    stop_view_path, DeliveryService, DeliveryServiceBuilder, NoopInvalidator, ProofSubmission,
    ROUTE_VIEW_PATH, UPLOAD_FAILED_MESSAGE,
};
pub use session::{FixedIdentity, SessionGuard};
