// SPDX-FileCopyrightText: 2026 Proofline Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Mock identity provider.

use std::sync::atomic::{AtomicU32, Ordering};

use async_trait::async_trait;
use proofline_core::types::{DriverId, Identity};
use proofline_core::{IdentityProvider, ProoflineError};

#[derive(Debug, Clone)]
enum Answer {
    User(Identity),
    Nobody,
    Error(String),
}

/// Identity provider with a fixed answer and a lookup counter.
#[derive(Debug)]
pub struct MockIdentity {
    answer: Answer,
    lookups: AtomicU32,
}

impl MockIdentity {
    pub fn signed_in(driver_id: &str) -> Self {
        Self::with_answer(Answer::User(Identity {
            id: DriverId::from(driver_id),
        }))
    }

    /// Provider that reports no user and no error.
    pub fn signed_out() -> Self {
        Self::with_answer(Answer::Nobody)
    }

    /// Provider whose lookup itself fails.
    pub fn failing(message: &str) -> Self {
        Self::with_answer(Answer::Error(message.to_string()))
    }

    fn with_answer(answer: Answer) -> Self {
        Self {
            answer,
            lookups: AtomicU32::new(0),
        }
    }

    /// Number of `current_user` calls so far.
    pub fn lookups(&self) -> u32 {
        self.lookups.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl IdentityProvider for MockIdentity {
    async fn current_user(&self) -> Result<Option<Identity>, ProoflineError> {
        self.lookups.fetch_add(1, Ordering::SeqCst);
        match &self.answer {
            Answer::User(identity) => Ok(Some(identity.clone())),
            Answer::Nobody => Ok(None),
            Answer::Error(message) => Err(ProoflineError::Identity {
                message: message.clone(),
            }),
        }
    }
}
