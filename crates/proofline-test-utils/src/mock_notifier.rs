// SPDX-FileCopyrightText: 2026 Proofline Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Mock notification channel.
//!
//! A gated notifier holds every request open until the test releases it,
//! which makes "the submission returned before the dispatch finished"
//! observable.

use std::sync::atomic::{AtomicU32, Ordering};

use async_trait::async_trait;
use proofline_core::types::{NotificationRequest, NotificationResponse};
use proofline_core::{NotificationChannel, ProoflineError};
use tokio::sync::{Mutex, Notify, Semaphore};

/// How the mock answers once a request is let through.
#[derive(Debug, Clone)]
pub enum NotifierBehavior {
    /// `{ok: true, status: 200}`.
    Accept,
    /// A JSON rejection with the given status and error.
    Reject { status: u16, error: String },
    /// A non-JSON body, wrapped as `{ok: false, status, body}`.
    NonJson { status: u16, body: String },
    /// The transport itself fails.
    Fail(String),
}

/// Scriptable [`NotificationChannel`].
pub struct MockNotifier {
    behavior: NotifierBehavior,
    gate: Option<Semaphore>,
    requests: Mutex<Vec<NotificationRequest>>,
    received: Notify,
    completed: AtomicU32,
}

impl MockNotifier {
    pub fn new(behavior: NotifierBehavior) -> Self {
        Self {
            behavior,
            gate: None,
            requests: Mutex::new(Vec::new()),
            received: Notify::new(),
            completed: AtomicU32::new(0),
        }
    }

    pub fn accepting() -> Self {
        Self::new(NotifierBehavior::Accept)
    }

    /// Requests block until [`release`](Self::release) is called.
    pub fn gated(behavior: NotifierBehavior) -> Self {
        Self {
            gate: Some(Semaphore::new(0)),
            ..Self::new(behavior)
        }
    }

    /// Lets `count` blocked requests answer.
    pub fn release(&self, count: usize) {
        if let Some(gate) = &self.gate {
            gate.add_permits(count);
        }
    }

    /// Requests received so far, answered or not.
    pub async fn requests(&self) -> Vec<NotificationRequest> {
        self.requests.lock().await.clone()
    }

    /// Requests that have produced an answer.
    pub fn completed(&self) -> u32 {
        self.completed.load(Ordering::SeqCst)
    }

    /// Waits until at least `count` requests have arrived.
    pub async fn wait_for_requests(&self, count: usize) {
        loop {
            let notified = self.received.notified();
            if self.requests.lock().await.len() >= count {
                return;
            }
            notified.await;
        }
    }
}

#[async_trait]
impl NotificationChannel for MockNotifier {
    async fn notify(
        &self,
        request: &NotificationRequest,
    ) -> Result<NotificationResponse, ProoflineError> {
        self.requests.lock().await.push(request.clone());
        self.received.notify_waiters();

        if let Some(gate) = &self.gate {
            let permit = gate.acquire().await.map_err(|e| ProoflineError::Notification {
                message: "mock gate closed".into(),
                source: Some(Box::new(e)),
            })?;
            permit.forget();
        }

        let result = match &self.behavior {
            NotifierBehavior::Accept => Ok(NotificationResponse {
                ok: true,
                status: 200,
                error: None,
                body: None,
            }),
            NotifierBehavior::Reject { status, error } => Ok(NotificationResponse {
                ok: false,
                status: *status,
                error: Some(error.clone()),
                body: None,
            }),
            NotifierBehavior::NonJson { status, body } => Ok(NotificationResponse {
                ok: false,
                status: *status,
                error: None,
                body: Some(body.clone()),
            }),
            NotifierBehavior::Fail(message) => Err(ProoflineError::Notification {
                message: message.clone(),
                source: None,
            }),
        };
        self.completed.fetch_add(1, Ordering::SeqCst);
        result
    }
}
