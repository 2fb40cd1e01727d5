// SPDX-FileCopyrightText: 2026 Proofline Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Error types for the Proofline submission pipeline.

use thiserror::Error;

use crate::outcome::ErrorCode;

/// The primary error type shared by collaborator traits and core operations.
#[derive(Debug, Error)]
pub enum ProoflineError {
    /// The identity provider reported no user, or failed to resolve one.
    #[error("session expired")]
    AuthExpired,

    /// A primary mutation failed on every allowed attempt.
    #[error("write failed after {attempts} attempt(s): {message}")]
    TransientWrite { attempts: u32, message: String },

    /// A binary payload could not be decoded. Never retried.
    #[error("invalid binary payload: {0}")]
    Decode(String),

    /// A best-effort audit write or notification dispatch failed.
    #[error("{effect} failed: {message}")]
    SecondaryEffect { effect: String, message: String },

    /// Blob store errors (upload rejected, transport failure).
    #[error("blob store error: {message}")]
    Blob {
        message: String,
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Notification channel errors (connection failure, unreadable response).
    #[error("notification error: {message}")]
    Notification {
        message: String,
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// The identity provider could not be reached.
    #[error("identity provider error: {message}")]
    Identity { message: String },

    /// Configuration errors (invalid endpoint, header values).
    #[error("configuration error: {0}")]
    Config(String),

    /// Operation timed out.
    #[error("operation timed out after {duration:?}")]
    Timeout { duration: std::time::Duration },

    /// Internal or unexpected errors.
    #[error("internal error: {0}")]
    Internal(String),
}

impl ProoflineError {
    /// Classifies this error for the caller-facing outcome.
    pub fn code(&self) -> ErrorCode {
        match self {
            Self::AuthExpired => ErrorCode::AuthExpired,
            Self::TransientWrite { .. } => ErrorCode::TransientWriteFailure,
            Self::Decode(_) => ErrorCode::DecodeError,
            Self::SecondaryEffect { .. } => ErrorCode::SecondaryEffectFailure,
            _ => ErrorCode::UnexpectedError,
        }
    }

    /// Returns true if repeating the same request cannot succeed.
    pub fn is_permanent(&self) -> bool {
        matches!(self, Self::AuthExpired | Self::Decode(_) | Self::Config(_))
    }
}

/// Error value returned by the durable store.
///
/// Store writes report failure as a value rather than raising; the message
/// is optional because some backends return bare error objects.
#[derive(Debug, Clone, Default, PartialEq, Eq, Error)]
#[error("{}", message.as_deref().unwrap_or("store error"))]
pub struct StoreError {
    pub message: Option<String>,
}

impl StoreError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: Some(message.into()),
        }
    }

    /// A failure without a human-readable message.
    pub fn opaque() -> Self {
        Self { message: None }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn codes_follow_taxonomy() {
        assert_eq!(ProoflineError::AuthExpired.code(), ErrorCode::AuthExpired);
        assert_eq!(
            ProoflineError::TransientWrite {
                attempts: 3,
                message: "timeout".into()
            }
            .code(),
            ErrorCode::TransientWriteFailure
        );
        assert_eq!(
            ProoflineError::Decode("bad".into()).code(),
            ErrorCode::DecodeError
        );
        assert_eq!(
            ProoflineError::SecondaryEffect {
                effect: "audit write".into(),
                message: "denied".into()
            }
            .code(),
            ErrorCode::SecondaryEffectFailure
        );
        assert_eq!(
            ProoflineError::Internal("boom".into()).code(),
            ErrorCode::UnexpectedError
        );
        assert_eq!(
            ProoflineError::Blob {
                message: "503".into(),
                source: None
            }
            .code(),
            ErrorCode::UnexpectedError
        );
    }

    #[test]
    fn decode_is_permanent_but_blob_is_not() {
        assert!(ProoflineError::Decode("x".into()).is_permanent());
        assert!(!ProoflineError::Blob {
            message: "reset".into(),
            source: None
        }
        .is_permanent());
    }

    #[test]
    fn store_error_display_falls_back() {
        assert_eq!(StoreError::new("row locked").to_string(), "row locked");
        assert_eq!(StoreError::opaque().to_string(), "store error");
    }
}
