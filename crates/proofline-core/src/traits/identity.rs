// SPDX-FileCopyrightText: 2026 Proofline Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Identity provider trait for resolving the acting driver.

use async_trait::async_trait;

use crate::error::ProoflineError;
use crate::types::Identity;

/// Resolves the identity behind the current request.
///
/// `Ok(None)` means no session is present. Callers in this workspace treat
/// it exactly like an error.
#[async_trait]
pub trait IdentityProvider: Send + Sync + 'static {
    async fn current_user(&self) -> Result<Option<Identity>, ProoflineError>;
}
