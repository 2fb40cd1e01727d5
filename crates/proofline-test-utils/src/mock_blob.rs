// SPDX-FileCopyrightText: 2026 Proofline Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Mock blob store.

use std::collections::VecDeque;

use async_trait::async_trait;
use proofline_core::types::{PutOptions, StoredBlob};
use proofline_core::{BlobStore, ProoflineError};
use tokio::sync::Mutex;

/// Base URL of references returned by [`MockBlobStore`].
pub const MOCK_BLOB_BASE_URL: &str = "https://blobs.test";

/// A successful `put`, as received.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredPut {
    pub filename: String,
    pub bytes: Vec<u8>,
    pub options: PutOptions,
}

#[derive(Default)]
struct State {
    queued_failures: VecDeque<String>,
    permanent_failure: Option<String>,
    calls: u32,
    puts: Vec<StoredPut>,
}

/// In-memory [`BlobStore`] that raises scripted errors.
#[derive(Default)]
pub struct MockBlobStore {
    state: Mutex<State>,
}

impl MockBlobStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Raises on the next `count` puts.
    pub async fn fail_next(&self, count: usize, message: &str) {
        let mut state = self.state.lock().await;
        state
            .queued_failures
            .extend(std::iter::repeat_n(message.to_string(), count));
    }

    /// Raises on every put.
    pub async fn fail_always(&self, message: &str) {
        self.state.lock().await.permanent_failure = Some(message.to_string());
    }

    /// Puts attempted, failed ones included.
    pub async fn calls(&self) -> u32 {
        self.state.lock().await.calls
    }

    pub async fn puts(&self) -> Vec<StoredPut> {
        self.state.lock().await.puts.clone()
    }
}

#[async_trait]
impl BlobStore for MockBlobStore {
    async fn put(
        &self,
        filename: &str,
        bytes: &[u8],
        options: &PutOptions,
    ) -> Result<StoredBlob, ProoflineError> {
        let mut state = self.state.lock().await;
        state.calls += 1;

        let failure = state
            .permanent_failure
            .clone()
            .or_else(|| state.queued_failures.pop_front());
        if let Some(message) = failure {
            return Err(ProoflineError::Blob {
                message,
                source: None,
            });
        }

        state.puts.push(StoredPut {
            filename: filename.to_string(),
            bytes: bytes.to_vec(),
            options: options.clone(),
        });
        Ok(StoredBlob {
            url: format!("{MOCK_BLOB_BASE_URL}/{filename}"),
        })
    }
}
