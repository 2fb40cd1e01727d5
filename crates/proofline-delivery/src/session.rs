// SPDX-FileCopyrightText: 2026 Proofline Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Session guard: resolves the acting driver before any mutation runs.

use std::sync::Arc;

use async_trait::async_trait;
use proofline_core::error::ProoflineError;
use proofline_core::types::{DriverId, Identity};
use proofline_core::IdentityProvider;
use tracing::{debug, warn};

/// Resolves the current driver once per operation.
///
/// A missing user and a failing provider both map to
/// [`ProoflineError::AuthExpired`]; the provider error is logged, never
/// shown to the caller.
#[derive(Clone)]
pub struct SessionGuard {
    provider: Arc<dyn IdentityProvider>,
}

impl SessionGuard {
    pub fn new(provider: Arc<dyn IdentityProvider>) -> Self {
        Self { provider }
    }

    /// Returns the acting driver's id or `AuthExpired`.
    pub async fn require_actor(&self) -> Result<DriverId, ProoflineError> {
        match self.provider.current_user().await {
            Ok(Some(identity)) => Ok(identity.id),
            Ok(None) => {
                debug!("no authenticated driver");
                Err(ProoflineError::AuthExpired)
            }
            Err(err) => {
                warn!(error = %err, "identity lookup failed, treating session as expired");
                Err(ProoflineError::AuthExpired)
            }
        }
    }
}

/// Identity provider that always answers with the same driver (or nobody).
///
/// Used by the CLI and by hosts that authenticate out of band.
#[derive(Debug, Clone)]
pub struct FixedIdentity {
    identity: Option<Identity>,
}

impl FixedIdentity {
    pub fn new(driver_id: impl Into<String>) -> Self {
        Self {
            identity: Some(Identity {
                id: DriverId(driver_id.into()),
            }),
        }
    }

    /// A provider with no signed-in driver.
    pub fn anonymous() -> Self {
        Self { identity: None }
    }
}

#[async_trait]
impl IdentityProvider for FixedIdentity {
    async fn current_user(&self) -> Result<Option<Identity>, ProoflineError> {
        Ok(self.identity.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct BrokenProvider;

    #[async_trait]
    impl IdentityProvider for BrokenProvider {
        async fn current_user(&self) -> Result<Option<Identity>, ProoflineError> {
            Err(ProoflineError::Identity {
                message: "token endpoint unreachable".into(),
            })
        }
    }

    #[tokio::test]
    async fn signed_in_driver_resolves() {
        let guard = SessionGuard::new(Arc::new(FixedIdentity::new("drv-7")));
        let actor = guard.require_actor().await.unwrap();
        assert_eq!(actor, DriverId::from("drv-7"));
    }

    #[tokio::test]
    async fn missing_user_is_auth_expired() {
        let guard = SessionGuard::new(Arc::new(FixedIdentity::anonymous()));
        let err = guard.require_actor().await.unwrap_err();
        assert!(matches!(err, ProoflineError::AuthExpired));
    }

    #[tokio::test]
    async fn provider_error_is_auth_expired() {
        let guard = SessionGuard::new(Arc::new(BrokenProvider));
        let err = guard.require_actor().await.unwrap_err();
        assert!(matches!(err, ProoflineError::AuthExpired));
    }
}
