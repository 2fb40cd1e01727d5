// SPDX-FileCopyrightText: 2026 Proofline Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Durable store trait for delivery records.

use async_trait::async_trait;

use crate::error::StoreError;
use crate::types::{DriverPosition, ProofOfDelivery, RecordId, StopEvent, StopStatusUpdate};

/// Persistence backend for stop outcomes, proofs of delivery, audit events,
/// and driver positions.
///
/// Failures are reported as [`StoreError`] values. Implementations must not
/// retry internally; retry policy belongs to the caller.
#[async_trait]
pub trait DurableStore: Send + Sync + 'static {
    /// Sets the status of an order.
    async fn update_status(&self, update: &StopStatusUpdate) -> Result<(), StoreError>;

    /// Inserts a proof-of-delivery record and returns its generated id, if any.
    async fn insert_proof_of_delivery(
        &self,
        pod: &ProofOfDelivery,
    ) -> Result<Option<RecordId>, StoreError>;

    /// Appends an audit event.
    async fn insert_stop_event(&self, event: &StopEvent) -> Result<(), StoreError>;

    /// Inserts or overwrites the single position row for a driver.
    async fn upsert_position(&self, position: &DriverPosition) -> Result<(), StoreError>;
}
