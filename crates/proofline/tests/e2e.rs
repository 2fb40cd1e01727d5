// SPDX-FileCopyrightText: 2026 Proofline Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! End-to-end tests: config-driven wiring, the HTTP webhook, and the CLI.

use std::process::Command;
use std::sync::Arc;
use std::time::Duration;

use proofline_config::load_and_validate_str;
use proofline_core::types::{OrderId, StopStatus};
use proofline_core::ErrorCode;
use proofline_delivery::{CaptureKind, DeliveryService, ProofSubmission};
use proofline_test_utils::{MockBlobStore, MockIdentity, MockStore, StoreOp, TestHarness};
use serde_json::json;
use wiremock::matchers::{body_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const PNG_DATA_URL: &str = "data:image/png;base64,iVBORw0KGgoAAAANSUhEUgAAAAEAAAABCAYAAAAfFcSJAAAADUlEQVR42mNkYPhfDwAChwGA60e6kgAAAABJRU5ErkJggg==";

fn service_for(config_toml: &str) -> (DeliveryService, Arc<MockStore>) {
    let config = load_and_validate_str(config_toml).expect("test config should validate");
    let store = Arc::new(MockStore::new());
    let service = DeliveryService::builder(
        Arc::new(MockIdentity::signed_in("drv-e2e")),
        store.clone(),
        Arc::new(MockBlobStore::new()),
    )
    .config(&config)
    .expect("service should build from config")
    .build();
    (service, store)
}

fn webhook_config(server: &MockServer, timeout_secs: u64) -> String {
    format!(
        r#"
[retry]
backoff_base_ms = 0

[notification]
enabled = true
endpoint = "{}/hooks/pod"
secret = "s3cret"
timeout_secs = {timeout_secs}
"#,
        server.uri()
    )
}

#[tokio::test]
async fn proof_of_delivery_posts_webhook_from_config() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/hooks/pod"))
        .and(header("authorization", "Bearer s3cret"))
        .and(body_json(json!({"orderId": "ord-1", "podId": "pod-1"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"ok": true, "status": 200})))
        .expect(1)
        .mount(&server)
        .await;

    let (service, store) = service_for(&webhook_config(&server, 5));
    let outcome = service
        .submit_proof_of_delivery(
            &OrderId::from("ord-1"),
            ProofSubmission {
                recipient_name: Some("Jane Doe".into()),
                ..ProofSubmission::default()
            },
        )
        .await;

    assert!(outcome.is_success());
    assert!(service.dispatcher().shutdown(Duration::from_secs(5)).await);
    assert_eq!(
        store.proofs_of_delivery().await[0].notes.as_deref(),
        Some("Recipient: Jane Doe")
    );
    server.verify().await;
}

#[tokio::test]
async fn non_json_webhook_failure_is_invisible_to_the_driver() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(502).set_body_string("<html>Bad Gateway</html>"))
        .expect(1)
        .mount(&server)
        .await;

    let (service, _store) = service_for(&webhook_config(&server, 5));
    let outcome = service
        .submit_proof_of_delivery(&OrderId::from("ord-2"), ProofSubmission::default())
        .await;

    assert!(outcome.is_success());
    assert!(service.dispatcher().shutdown(Duration::from_secs(5)).await);
}

#[tokio::test]
async fn slow_webhook_does_not_delay_submission() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"ok": true}))
                .set_delay(Duration::from_secs(30)),
        )
        .mount(&server)
        .await;

    let (service, _store) = service_for(&webhook_config(&server, 1));
    let started = std::time::Instant::now();
    let outcome = service
        .submit_proof_of_delivery(&OrderId::from("ord-3"), ProofSubmission::default())
        .await;

    assert!(outcome.is_success());
    assert!(started.elapsed() < Duration::from_secs(1));
    assert_eq!(service.dispatcher().in_flight(), 1);

    // The dispatch gives up at the configured timeout.
    assert!(service.dispatcher().shutdown(Duration::from_secs(10)).await);
    assert!(started.elapsed() < Duration::from_secs(10));
}

#[tokio::test]
async fn disabled_flag_never_contacts_the_endpoint() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let config = format!(
        "[notification]\nenabled = false\nendpoint = \"{}/hooks/pod\"\n",
        server.uri()
    );
    let (service, _store) = service_for(&config);
    let outcome = service
        .submit_proof_of_delivery(&OrderId::from("ord-4"), ProofSubmission::default())
        .await;

    assert!(outcome.is_success());
    assert!(!service.dispatcher().is_enabled());
    server.verify().await;
}

#[tokio::test]
async fn configured_retry_budget_is_applied() {
    let (service, store) = service_for("[retry]\nmax_attempts = 5\nbackoff_base_ms = 0\n");
    store.fail_always(StoreOp::UpsertPosition, Some("503")).await;

    let outcome = service.update_driver_position(10.0, 20.0, Some(3.5)).await;

    assert_eq!(outcome.code(), Some(ErrorCode::TransientWriteFailure));
    assert_eq!(store.calls(StoreOp::UpsertPosition).await, 5);
}

#[tokio::test]
async fn driver_completes_a_stop() {
    let h = TestHarness::builder()
        .with_identity(MockIdentity::signed_in("drv-9"))
        .build();
    let order = OrderId::from("ord-77");

    let photo = h
        .service
        .upload_capture(&order, CaptureKind::Photo, PNG_DATA_URL, "image/png")
        .await
        .into_data()
        .expect("photo upload should succeed");
    let signature = h
        .service
        .upload_capture(&order, CaptureKind::Signature, PNG_DATA_URL, "image/png")
        .await
        .into_data()
        .expect("signature upload should succeed");

    let pod = h
        .service
        .submit_proof_of_delivery(
            &order,
            ProofSubmission {
                photo_ref: Some(photo.url.clone()),
                signature_ref: Some(signature.url.clone()),
                notes: Some("handed over".into()),
                recipient_name: Some("R. Patel".into()),
            },
        )
        .await;
    let status = h
        .service
        .record_stop_status(&order, StopStatus::Delivered, None)
        .await;
    let position = h.service.update_driver_position(48.85, 2.35, Some(5.0)).await;

    assert!(pod.is_success() && status.is_success() && position.is_success());
    assert_eq!(h.identity.lookups(), 5);

    let pods = h.store.proofs_of_delivery().await;
    assert_eq!(pods[0].photo_ref.as_deref(), Some(photo.url.as_str()));
    assert_eq!(pods[0].signature_ref.as_deref(), Some(signature.url.as_str()));
    assert_eq!(pods[0].notes.as_deref(), Some("Recipient: R. Patel\nhanded over"));
    assert_eq!(h.store.stop_events().await.len(), 1);
    assert!(photo.url.contains("/pod/ord-77/photo-"));
}

// --- CLI ---

fn cli(dir: &std::path::Path) -> Command {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_proofline"));
    cmd.current_dir(dir)
        .env_remove("RUST_LOG")
        .env("HOME", dir)
        .env("XDG_CONFIG_HOME", dir);
    cmd
}

#[test]
fn cli_normalize_writes_decoded_png() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("capture.txt"), PNG_DATA_URL).unwrap();

    let output = cli(dir.path())
        .args(["normalize", "capture.txt", "--output", "capture.png"])
        .output()
        .unwrap();

    assert!(output.status.success(), "stderr: {}", String::from_utf8_lossy(&output.stderr));
    let bytes = std::fs::read(dir.path().join("capture.png")).unwrap();
    assert_eq!(bytes.len(), 70);
    assert_eq!(&bytes[..4], b"\x89PNG");
    assert!(String::from_utf8_lossy(&output.stdout).contains("image/png"));
}

#[test]
fn cli_config_rejects_typo_with_suggestion() {
    let dir = tempfile::tempdir().unwrap();
    let config = dir.path().join("custom.toml");
    std::fs::write(&config, "[retry]\nmax_attemps = 4\n").unwrap();

    let output = cli(dir.path())
        .args(["config", "--config"])
        .arg(&config)
        .output()
        .unwrap();

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("max_attempts"), "stderr: {stderr}");
}

#[test]
fn cli_config_summarizes_valid_file() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(
        dir.path().join("proofline.toml"),
        "[upload]\naccess = \"private\"\npath_prefix = \"captures\"\n",
    )
    .unwrap();

    let output = cli(dir.path()).arg("config").output().unwrap();

    assert!(output.status.success(), "stderr: {}", String::from_utf8_lossy(&output.stderr));
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("private access, prefix \"captures\""), "stdout: {stdout}");
}
