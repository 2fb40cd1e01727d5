// SPDX-FileCopyrightText: 2026 Proofline Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Pure helpers that shape what gets persisted.

use proofline_core::types::OrderId;
use proofline_media::file_extension;
use strum::{Display, EnumString};
use uuid::Uuid;

/// Which capture a driver produced at the stop.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumString)]
#[strum(serialize_all = "lowercase")]
pub enum CaptureKind {
    Photo,
    Signature,
}

/// Notes persisted with a proof of delivery.
///
/// A recipient name is prefixed as `Recipient: <name>`, on its own line when
/// notes follow. Blank names and blank notes count as absent.
pub fn compose_pod_notes(notes: Option<&str>, recipient_name: Option<&str>) -> Option<String> {
    let name = recipient_name.map(str::trim).filter(|n| !n.is_empty());
    let body = notes.filter(|n| !n.trim().is_empty());

    match (name, body) {
        (Some(name), Some(body)) => Some(format!("Recipient: {name}\n{body}")),
        (Some(name), None) => Some(format!("Recipient: {name}")),
        (None, _) => notes.map(str::to_string),
    }
}

/// Storage path for a capture: `<prefix>/<order>/<kind>-<uuid>.<ext>`.
///
/// Characters outside `[A-Za-z0-9_-]` in the order id become `_` so an id
/// can never add path segments.
pub fn capture_filename(
    path_prefix: &str,
    order_id: &OrderId,
    kind: CaptureKind,
    content_type: &str,
) -> String {
    let prefix = path_prefix.trim_matches('/');
    let order: String = order_id
        .0
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '-' || c == '_' {
                c
            } else {
                '_'
            }
        })
        .collect();

    format!(
        "{prefix}/{order}/{kind}-{}.{}",
        Uuid::new_v4(),
        file_extension(content_type)
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn recipient_and_notes() {
        assert_eq!(
            compose_pod_notes(Some("Left at door"), Some("Jane Doe")).as_deref(),
            Some("Recipient: Jane Doe\nLeft at door")
        );
    }

    #[test]
    fn recipient_only() {
        assert_eq!(
            compose_pod_notes(None, Some("Jane Doe")).as_deref(),
            Some("Recipient: Jane Doe")
        );
        assert_eq!(
            compose_pod_notes(Some(""), Some("  Jane Doe ")).as_deref(),
            Some("Recipient: Jane Doe")
        );
    }

    #[test]
    fn notes_unchanged_without_recipient() {
        assert_eq!(
            compose_pod_notes(Some("Gate code 1234"), None).as_deref(),
            Some("Gate code 1234")
        );
        assert_eq!(
            compose_pod_notes(Some("Gate code 1234"), Some("   ")).as_deref(),
            Some("Gate code 1234")
        );
        assert_eq!(compose_pod_notes(None, None), None);
    }

    #[test]
    fn filename_layout() {
        let name = capture_filename(
            "/pod/",
            &OrderId::from("ord-42"),
            CaptureKind::Signature,
            "image/png",
        );
        assert!(name.starts_with("pod/ord-42/signature-"), "got {name}");
        assert!(name.ends_with(".png"), "got {name}");
        // prefix, order, file
        assert_eq!(name.split('/').count(), 3);
    }

    #[test]
    fn order_id_cannot_escape_directory() {
        let name = capture_filename(
            "pod",
            &OrderId::from("../../etc"),
            CaptureKind::Photo,
            "image/jpeg",
        );
        assert!(name.starts_with("pod/______etc/photo-"), "got {name}");
        assert!(name.ends_with(".jpg"));
    }

    #[test]
    fn filenames_are_unique() {
        let order = OrderId::from("ord-1");
        let a = capture_filename("pod", &order, CaptureKind::Photo, "image/png");
        let b = capture_filename("pod", &order, CaptureKind::Photo, "image/png");
        assert_ne!(a, b);
    }
}
