// SPDX-FileCopyrightText: 2026 Proofline Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Domain records exchanged between the pipeline and its collaborators.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// Opaque identifier of a delivery order (one stop on a route).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct OrderId(pub String);

/// Identity of a driver, as resolved by the identity provider.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DriverId(pub String);

/// Identifier generated by the durable store for an inserted record.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RecordId(pub String);

impl fmt::Display for OrderId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl fmt::Display for DriverId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for OrderId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<&str> for DriverId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

/// The authenticated actor returned by the identity provider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity {
    pub id: DriverId,
}

/// Terminal outcome of a stop. Drivers cannot report anything else.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum StopStatus {
    Delivered,
    Failed,
}

/// A status transition for one stop.
///
/// `updated_at` is stamped by the pipeline when the write is attempted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StopStatusUpdate {
    pub order_id: OrderId,
    pub status: StopStatus,
    pub notes: Option<String>,
    pub actor_id: DriverId,
    pub updated_at: DateTime<Utc>,
}

/// A proof-of-delivery record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProofOfDelivery {
    pub order_id: OrderId,
    pub driver_id: DriverId,
    /// Storage URI of the doorstep photo.
    pub photo_ref: Option<String>,
    /// Storage URI of the recipient signature.
    pub signature_ref: Option<String>,
    pub notes: Option<String>,
    pub delivered_at: DateTime<Utc>,
}

/// Audit trail entry written after a successful status transition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StopEvent {
    pub order_id: OrderId,
    pub driver_id: DriverId,
    pub event_type: StopStatus,
    pub notes: Option<String>,
}

/// Latest known position of a driver. One logical row per driver.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DriverPosition {
    pub driver_id: DriverId,
    pub lat: f64,
    pub lng: f64,
    pub accuracy: Option<f64>,
}

/// Decoded upload payload. Transient; only its storage URL is persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BinaryArtifact {
    pub bytes: Vec<u8>,
    pub content_type: String,
}

impl BinaryArtifact {
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

/// Visibility of an uploaded blob.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Display, EnumString, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum BlobAccess {
    #[default]
    Public,
    Private,
}

/// Options passed to the blob store alongside the bytes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PutOptions {
    pub access: BlobAccess,
    pub content_type: String,
}

/// Reference to a stored blob.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredBlob {
    pub url: String,
}

/// Data returned by a successful proof-of-delivery submission.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProofReceipt {
    pub pod_id: Option<RecordId>,
}

/// Body sent to the notification channel.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NotificationRequest {
    pub order_id: OrderId,
    pub pod_id: RecordId,
}

/// Interpreted notification channel response.
///
/// JSON bodies deserialize directly; anything else is wrapped with
/// `ok: false` and the raw text in `body`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NotificationResponse {
    #[serde(default)]
    pub ok: bool,
    #[serde(default)]
    pub status: u16,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub body: Option<String>,
}
