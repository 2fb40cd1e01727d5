// SPDX-FileCopyrightText: 2026 Proofline Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Core library for the Proofline submission pipeline.
//!
//! This crate provides the domain records, the error taxonomy, the
//! [`MutationOutcome`] result shape, and the collaborator traits used
//! throughout the Proofline workspace. Concrete collaborators (stores,
//! identity providers, notification channels) implement traits defined here.

pub mod error;
pub mod outcome;
pub mod traits;
pub mod types;

// Re-export key items at crate root for ergonomic imports.
pub use error::{ProoflineError, StoreError};
pub use outcome::{ErrorCode, MutationOutcome};
pub use types::{
    BinaryArtifact, BlobAccess, DriverId, DriverPosition, Identity, NotificationRequest,
    NotificationResponse, OrderId, ProofOfDelivery, ProofReceipt, PutOptions, RecordId,
    StopEvent, StopStatus, StopStatusUpdate, StoredBlob,
};

pub use traits::{BlobStore, DurableStore, IdentityProvider, NotificationChannel, ViewInvalidator};
