// SPDX-FileCopyrightText: 2026 Proofline Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Outermost wrapper of every public operation.
//!
//! Nothing escapes an operation as an error or a panic: typed errors become
//! failure outcomes through [`MutationOutcome::from_error`], panics become
//! the generic `UNEXPECTED_ERROR` outcome.

use std::any::Any;
use std::future::Future;
use std::panic::AssertUnwindSafe;

use futures::FutureExt;
use proofline_core::error::ProoflineError;
use proofline_core::outcome::UNEXPECTED_ERROR_MESSAGE;
use proofline_core::{ErrorCode, MutationOutcome};
use tracing::{error, info, warn};

pub(crate) async fn guarded<T, Fut>(operation: &'static str, fut: Fut) -> MutationOutcome<T>
where
    Fut: Future<Output = Result<MutationOutcome<T>, ProoflineError>>,
{
    match AssertUnwindSafe(fut).catch_unwind().await {
        Ok(Ok(outcome)) => outcome,
        Ok(Err(err)) => {
            log_failure(operation, &err);
            MutationOutcome::from_error(&err)
        }
        Err(panic) => {
            error!(
                operation,
                panic = panic_message(panic.as_ref()),
                "operation panicked"
            );
            MutationOutcome::failure(UNEXPECTED_ERROR_MESSAGE, ErrorCode::UnexpectedError)
        }
    }
}

fn log_failure(operation: &str, err: &ProoflineError) {
    match err.code() {
        ErrorCode::AuthExpired => info!(operation, "rejected: session expired"),
        ErrorCode::UnexpectedError => error!(operation, error = %err, "operation failed unexpectedly"),
        code => warn!(operation, %code, error = %err, "operation failed"),
    }
}

pub(crate) fn panic_message(panic: &(dyn Any + Send)) -> &str {
    if let Some(s) = panic.downcast_ref::<&'static str>() {
        s
    } else if let Some(s) = panic.downcast_ref::<String>() {
        s.as_str()
    } else {
        "non-string panic payload"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn passes_outcomes_through() {
        let outcome = guarded("test", async { Ok(MutationOutcome::success(5)) }).await;
        assert_eq!(outcome.into_data(), Some(5));
    }

    #[tokio::test]
    async fn converts_typed_errors() {
        let outcome: MutationOutcome<()> =
            guarded("test", async { Err(ProoflineError::Decode("bad".into())) }).await;
        assert_eq!(outcome.code(), Some(ErrorCode::DecodeError));
    }

    #[tokio::test]
    async fn hides_internal_detail() {
        let outcome: MutationOutcome<()> = guarded("test", async {
            Err(ProoflineError::Internal("pool poisoned at 0x1f".into()))
        })
        .await;
        assert_eq!(outcome.code(), Some(ErrorCode::UnexpectedError));
        assert_eq!(outcome.error(), Some(UNEXPECTED_ERROR_MESSAGE));
    }

    #[tokio::test]
    async fn catches_panics() {
        let outcome: MutationOutcome<()> = guarded("test", async {
            if true {
                panic!("collaborator exploded");
            }
            Ok(MutationOutcome::done())
        })
        .await;
        assert_eq!(outcome.code(), Some(ErrorCode::UnexpectedError));
        assert_eq!(outcome.error(), Some(UNEXPECTED_ERROR_MESSAGE));
    }
}
