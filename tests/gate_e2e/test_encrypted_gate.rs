//! E2E tests: encrypted key gate.

use std::sync::Arc;

use actix_web::http::StatusCode;
use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use keygate::auth::{DenyReason, MalformedPolicy};
use keygate::error::ErrorResponse;

use super::test_helpers::*;

/// Ciphertext of the expected plaintext → allowed.
#[actix_rt::test]
async fn test_encrypted_key_allowed() {
    let sink = Arc::new(RecordingSink::default());
    let app = create_test_app(encrypted_gate(MalformedPolicy::Fault), sink.clone()).await;
    let token = encrypt(TEST_AES_SECRET, TEST_PLAINTEXT);

    let (status, _) = get_with_credential(&app, PING_URI, Some(&token)).await;

    assert_eq!(status, StatusCode::OK);
    assert!(sink.events().is_empty());
}

/// Decrypts fine but hashes to another digest → 401.
#[actix_rt::test]
async fn test_other_plaintext_rejected() {
    let sink = Arc::new(RecordingSink::default());
    let app = create_test_app(encrypted_gate(MalformedPolicy::Fault), sink.clone()).await;
    let token = encrypt(TEST_AES_SECRET, "world");

    let (status, body) = get_with_credential(&app, PING_URI, Some(&token)).await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert!(body.is_empty());
    assert_eq!(sink.events()[0].reason, DenyReason::DigestMismatch);
}

/// Plain key sent to the encrypted gate is not ciphertext → fault, not 401.
#[actix_rt::test]
async fn test_invalid_ciphertext_faults() {
    let sink = Arc::new(RecordingSink::default());
    let app = create_test_app(encrypted_gate(MalformedPolicy::Fault), sink.clone()).await;

    let (status, body) = get_with_credential(&app, PING_URI, Some("not-valid-ciphertext")).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    let body: ErrorResponse = serde_json::from_slice(&body).unwrap();
    assert_eq!(body.error, "MALFORMED_CREDENTIAL");
    assert!(sink.events().is_empty(), "a fault is not a denial");
}

/// Ciphertext made with another AES secret → fault.
#[actix_rt::test]
async fn test_wrong_aes_secret_faults() {
    let sink = Arc::new(RecordingSink::default());
    let app = create_test_app(encrypted_gate(MalformedPolicy::Fault), sink).await;
    let token = encrypt("other", TEST_PLAINTEXT);

    let (status, _) = get_with_credential(&app, PING_URI, Some(&token)).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
}

/// Truncated ciphertext → fault.
#[actix_rt::test]
async fn test_truncated_ciphertext_faults() {
    let sink = Arc::new(RecordingSink::default());
    let app = create_test_app(encrypted_gate(MalformedPolicy::Fault), sink).await;
    let mut bytes = STANDARD.decode(encrypt(TEST_AES_SECRET, TEST_PLAINTEXT)).unwrap();
    bytes.truncate(bytes.len() - 1);

    let (status, _) = get_with_credential(&app, PING_URI, Some(&STANDARD.encode(bytes))).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
}

/// Flipping any single ciphertext byte never lets the request through.
#[actix_rt::test]
async fn test_tampered_ciphertext_never_allowed() {
    let sink = Arc::new(RecordingSink::default());
    let app = create_test_app(encrypted_gate(MalformedPolicy::Fault), sink).await;
    let original = STANDARD.decode(encrypt(TEST_AES_SECRET, TEST_PLAINTEXT)).unwrap();

    for i in 0..original.len() {
        let mut tampered = original.clone();
        tampered[i] ^= 0x01;

        let (status, _) =
            get_with_credential(&app, PING_URI, Some(&STANDARD.encode(tampered))).await;
        assert!(
            status == StatusCode::UNAUTHORIZED || status == StatusCode::INTERNAL_SERVER_ERROR,
            "byte {i} tampered gave {status}"
        );
    }
}

/// Missing header → 401 before any decryption.
#[actix_rt::test]
async fn test_missing_header_rejected() {
    let sink = Arc::new(RecordingSink::default());
    let app = create_test_app(encrypted_gate(MalformedPolicy::Fault), sink.clone()).await;

    let (status, body) = get_with_credential(&app, PING_URI, None).await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert!(body.is_empty());
    assert_eq!(sink.events()[0].reason, DenyReason::MissingHeader);
}

/// Deny policy turns an undecryptable credential into a distinct 401.
#[actix_rt::test]
async fn test_invalid_ciphertext_denied_under_deny_policy() {
    let sink = Arc::new(RecordingSink::default());
    let app = create_test_app(encrypted_gate(MalformedPolicy::Deny), sink.clone()).await;

    let (status, body) = get_with_credential(&app, PING_URI, Some("not-valid-ciphertext")).await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert!(body.is_empty());

    let events = sink.events();
    assert_eq!(
        events[0].reason,
        DenyReason::MalformedCredential { cause: "invalid_base64" }
    );
    assert_eq!(events[0].cause, Some("invalid_base64"));
    assert_eq!(events[0].gate, "encrypted");
}

/// Header bytes that are not UTF-8 cannot be a token → fault, never an allow.
#[actix_rt::test]
async fn test_non_utf8_header_faults() {
    let sink = Arc::new(RecordingSink::default());
    let app = create_test_app(encrypted_gate(MalformedPolicy::Fault), sink.clone()).await;

    let (status, body) =
        get_with_raw_credential(&app, PING_URI, Some(b"Ifq4\xe9A4FSJkGpC+8BtIU2aQ==".as_slice())).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    let body: ErrorResponse = serde_json::from_slice(&body).unwrap();
    assert_eq!(body.error, "MALFORMED_CREDENTIAL");
    assert!(sink.events().is_empty());
}
