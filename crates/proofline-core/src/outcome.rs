// SPDX-FileCopyrightText: 2026 Proofline Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! The uniform result shape returned by every public operation.
//!
//! On the wire an outcome is `{"success": true, "data": ...}` or
//! `{"success": false, "error": "...", "code": "..."}`.

use serde::de::DeserializeOwned;
use serde::ser::SerializeStruct;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use strum::{Display, EnumString};

use crate::error::ProoflineError;

/// Shown when the identity provider cannot resolve the actor.
pub const AUTH_EXPIRED_MESSAGE: &str = "Session expired. Please sign in again.";

/// Shown for failures the pipeline did not anticipate.
pub const UNEXPECTED_ERROR_MESSAGE: &str = "An unexpected error occurred. Please try again.";

/// Fallback when an exhausted write carried no message of its own.
pub const NETWORK_ERROR_MESSAGE: &str = "network error";

/// Failure classifier attached to unsuccessful outcomes.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    AuthExpired,
    TransientWriteFailure,
    DecodeError,
    SecondaryEffectFailure,
    UnexpectedError,
}

/// Result of a public operation, owned by the caller.
#[derive(Debug, Clone, PartialEq)]
pub enum MutationOutcome<T> {
    Success { data: Option<T> },
    Failure { error: String, code: Option<ErrorCode> },
}

impl<T> MutationOutcome<T> {
    pub fn success(data: T) -> Self {
        Self::Success { data: Some(data) }
    }

    /// Success with no payload.
    pub fn done() -> Self {
        Self::Success { data: None }
    }

    pub fn failure(error: impl Into<String>, code: ErrorCode) -> Self {
        Self::Failure {
            error: error.into(),
            code: Some(code),
        }
    }

    /// Builds the caller-facing failure for an error.
    ///
    /// Only anticipated errors keep their message; everything else becomes
    /// the generic unexpected-error text.
    pub fn from_error(err: &ProoflineError) -> Self {
        let code = err.code();
        let error = match err {
            ProoflineError::AuthExpired => AUTH_EXPIRED_MESSAGE.to_string(),
            ProoflineError::TransientWrite { message, .. } => message.clone(),
            ProoflineError::Decode(_) => err.to_string(),
            _ => UNEXPECTED_ERROR_MESSAGE.to_string(),
        };
        Self::failure(error, code)
    }

    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success { .. })
    }

    pub fn data(&self) -> Option<&T> {
        match self {
            Self::Success { data } => data.as_ref(),
            Self::Failure { .. } => None,
        }
    }

    pub fn into_data(self) -> Option<T> {
        match self {
            Self::Success { data } => data,
            Self::Failure { .. } => None,
        }
    }

    pub fn error(&self) -> Option<&str> {
        match self {
            Self::Success { .. } => None,
            Self::Failure { error, .. } => Some(error),
        }
    }

    pub fn code(&self) -> Option<ErrorCode> {
        match self {
            Self::Success { .. } => None,
            Self::Failure { code, .. } => *code,
        }
    }

    /// True only for `AuthExpired`: the caller should force a re-login.
    pub fn requires_relogin(&self) -> bool {
        self.code() == Some(ErrorCode::AuthExpired)
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> MutationOutcome<U> {
        match self {
            Self::Success { data } => MutationOutcome::Success { data: data.map(f) },
            Self::Failure { error, code } => MutationOutcome::Failure { error, code },
        }
    }

    /// Replaces the failure message, keeping the code. Successes pass through.
    pub fn with_failure_message(self, message: impl Into<String>) -> Self {
        match self {
            Self::Failure { code, .. } => Self::Failure {
                error: message.into(),
                code,
            },
            success => success,
        }
    }
}

impl<T: Serialize> Serialize for MutationOutcome<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Success { data } => {
                let len = if data.is_some() { 2 } else { 1 };
                let mut s = serializer.serialize_struct("MutationOutcome", len)?;
                s.serialize_field("success", &true)?;
                if let Some(data) = data {
                    s.serialize_field("data", data)?;
                }
                s.end()
            }
            Self::Failure { error, code } => {
                let len = if code.is_some() { 3 } else { 2 };
                let mut s = serializer.serialize_struct("MutationOutcome", len)?;
                s.serialize_field("success", &false)?;
                s.serialize_field("error", error)?;
                if let Some(code) = code {
                    s.serialize_field("code", code)?;
                }
                s.end()
            }
        }
    }
}

#[derive(Deserialize)]
struct WireOutcome<T> {
    success: bool,
    #[serde(default = "Option::default")]
    data: Option<T>,
    #[serde(default)]
    error: Option<String>,
    #[serde(default)]
    code: Option<ErrorCode>,
}

impl<'de, T: DeserializeOwned> Deserialize<'de> for MutationOutcome<T> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let wire = WireOutcome::<T>::deserialize(deserializer)?;
        if wire.success {
            Ok(Self::Success { data: wire.data })
        } else {
            Ok(Self::Failure {
                error: wire.error.unwrap_or_default(),
                code: wire.code,
            })
        }
    }
}
