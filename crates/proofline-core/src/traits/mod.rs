// SPDX-FileCopyrightText: 2026 Proofline Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Collaborator trait definitions.
//!
//! The pipeline owns none of its dependencies: identity, persistence, blob
//! storage, notification, and view invalidation are injected through these
//! traits. Async collaborators use `#[async_trait]` for dynamic dispatch.

pub mod blob;
pub mod identity;
pub mod invalidation;
pub mod notify;
pub mod store;

pub use blob::BlobStore;
pub use identity::IdentityProvider;
pub use invalidation::ViewInvalidator;
pub use notify::NotificationChannel;
pub use store::DurableStore;
