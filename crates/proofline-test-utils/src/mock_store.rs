// SPDX-FileCopyrightText: 2026 Proofline Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Mock durable store for deterministic testing.
//!
//! `MockStore` keeps every successful write in memory and can be scripted to
//! fail the next N calls of a given operation, or all of them.

use std::collections::{HashMap, VecDeque};

use async_trait::async_trait;
use proofline_core::types::{
    DriverId, DriverPosition, ProofOfDelivery, RecordId, StopEvent, StopStatusUpdate,
};
use proofline_core::{DurableStore, StoreError};
use tokio::sync::Mutex;

/// The four store operations, for scripting and counting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StoreOp {
    UpdateStatus,
    InsertProofOfDelivery,
    InsertStopEvent,
    UpsertPosition,
}

#[derive(Default)]
struct State {
    queued_failures: HashMap<StoreOp, VecDeque<StoreError>>,
    permanent_failures: HashMap<StoreOp, StoreError>,
    calls: HashMap<StoreOp, u32>,
    status_updates: Vec<StopStatusUpdate>,
    pods: Vec<ProofOfDelivery>,
    events: Vec<StopEvent>,
    positions: HashMap<DriverId, DriverPosition>,
}

/// In-memory [`DurableStore`] with scripted failures.
pub struct MockStore {
    state: Mutex<State>,
    issue_record_ids: bool,
}

impl MockStore {
    pub fn new() -> Self {
        Self {
            state: Mutex::new(State::default()),
            issue_record_ids: true,
        }
    }

    /// A store whose proof-of-delivery inserts succeed without returning an id.
    pub fn without_record_ids() -> Self {
        Self {
            issue_record_ids: false,
            ..Self::new()
        }
    }

    /// Fails the next `count` calls of `op` with `message` (or an opaque error).
    pub async fn fail_next(&self, op: StoreOp, count: usize, message: Option<&str>) {
        let mut state = self.state.lock().await;
        let queue = state.queued_failures.entry(op).or_default();
        for _ in 0..count {
            queue.push_back(store_error(message));
        }
    }

    /// Fails every call of `op`.
    pub async fn fail_always(&self, op: StoreOp, message: Option<&str>) {
        self.state
            .lock()
            .await
            .permanent_failures
            .insert(op, store_error(message));
    }

    /// Calls made to `op`, failed ones included.
    pub async fn calls(&self, op: StoreOp) -> u32 {
        self.state.lock().await.calls.get(&op).copied().unwrap_or(0)
    }

    /// Calls made across all operations.
    pub async fn total_calls(&self) -> u32 {
        self.state.lock().await.calls.values().sum()
    }

    pub async fn status_updates(&self) -> Vec<StopStatusUpdate> {
        self.state.lock().await.status_updates.clone()
    }

    pub async fn proofs_of_delivery(&self) -> Vec<ProofOfDelivery> {
        self.state.lock().await.pods.clone()
    }

    pub async fn stop_events(&self) -> Vec<StopEvent> {
        self.state.lock().await.events.clone()
    }

    pub async fn position(&self, driver_id: &DriverId) -> Option<DriverPosition> {
        self.state.lock().await.positions.get(driver_id).cloned()
    }

    pub async fn position_rows(&self) -> usize {
        self.state.lock().await.positions.len()
    }

    /// Counts the call and returns the scripted failure, if any.
    fn check(state: &mut State, op: StoreOp) -> Result<(), StoreError> {
        *state.calls.entry(op).or_default() += 1;
        if let Some(err) = state.permanent_failures.get(&op) {
            return Err(err.clone());
        }
        match state.queued_failures.get_mut(&op).and_then(VecDeque::pop_front) {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }
}

impl Default for MockStore {
    fn default() -> Self {
        Self::new()
    }
}

fn store_error(message: Option<&str>) -> StoreError {
    match message {
        Some(m) => StoreError::new(m),
        None => StoreError::opaque(),
    }
}

#[async_trait]
impl DurableStore for MockStore {
    async fn update_status(&self, update: &StopStatusUpdate) -> Result<(), StoreError> {
        let mut state = self.state.lock().await;
        Self::check(&mut state, StoreOp::UpdateStatus)?;
        state.status_updates.push(update.clone());
        Ok(())
    }

    async fn insert_proof_of_delivery(
        &self,
        pod: &ProofOfDelivery,
    ) -> Result<Option<RecordId>, StoreError> {
        let mut state = self.state.lock().await;
        Self::check(&mut state, StoreOp::InsertProofOfDelivery)?;
        state.pods.push(pod.clone());
        Ok(self
            .issue_record_ids
            .then(|| RecordId(format!("pod-{}", state.pods.len()))))
    }

    async fn insert_stop_event(&self, event: &StopEvent) -> Result<(), StoreError> {
        let mut state = self.state.lock().await;
        Self::check(&mut state, StoreOp::InsertStopEvent)?;
        state.events.push(event.clone());
        Ok(())
    }

    async fn upsert_position(&self, position: &DriverPosition) -> Result<(), StoreError> {
        let mut state = self.state.lock().await;
        Self::check(&mut state, StoreOp::UpsertPosition)?;
        state
            .positions
            .insert(position.driver_id.clone(), position.clone());
        Ok(())
    }
}
