// SPDX-FileCopyrightText: 2026 Proofline Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Blob store trait for uploaded captures.

use async_trait::async_trait;

use crate::error::ProoflineError;
use crate::types::{PutOptions, StoredBlob};

/// Object storage for photos and signatures.
#[async_trait]
pub trait BlobStore: Send + Sync + 'static {
    /// Stores `bytes` under `filename` and returns a reference URL.
    async fn put(
        &self,
        filename: &str,
        bytes: &[u8],
        options: &PutOptions,
    ) -> Result<StoredBlob, ProoflineError>;
}
