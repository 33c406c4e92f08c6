//! E2E tests: routes outside the gate and configuration-driven wiring.

use std::collections::HashMap;
use std::sync::Arc;

use actix_web::http::StatusCode;
use keygate::auth::{ClientCredential, build_gate};
use keygate::config::Config;
use keygate::crypto::{AesCipher, DigestEncoding, sha512_digest};

use super::test_helpers::*;

fn load(vars: &[(&str, &str)]) -> Config {
    let vars: HashMap<String, String> = vars
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
    Config::from_lookup(|name| vars.get(name).cloned()).expect("config should load")
}

/// Health endpoint is reachable without a credential.
#[actix_rt::test]
async fn test_health_not_gated() {
    let sink = Arc::new(RecordingSink::default());
    let app = create_test_app(plain_gate(), sink.clone()).await;

    let (status, _) = get_with_credential(&app, "/api/v1/health", None).await;

    assert_eq!(status, StatusCode::OK);
    assert!(sink.events().is_empty());
}

/// Plain gate built from configuration accepts the client's header.
#[actix_rt::test]
async fn test_plain_gate_from_config() {
    let config = load(&[
        ("RUST_ENV", "production"),
        ("KEYGATE_API_KEY", "prod-key-1"),
    ]);
    let app = create_test_app(build_gate(&config.gate), Arc::new(RecordingSink::default())).await;

    let credential = ClientCredential::plain(&secret("prod-key-1"));
    let (status, _) = get_with_credential(&app, PING_URI, Some(credential.expose_value())).await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = get_with_credential(&app, PING_URI, Some("prod-key-2")).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

/// Encrypted gate built from configuration with a base64 digest.
#[actix_rt::test]
async fn test_encrypted_gate_from_config() {
    let digest = sha512_digest("kg_client", DigestEncoding::Base64);
    let config = load(&[
        ("RUST_ENV", "production"),
        ("KEYGATE_MODE", "encrypted"),
        ("KEYGATE_AES_SECRET", "prod-aes-secret"),
        ("KEYGATE_API_KEY_DIGEST", digest.as_str()),
        ("KEYGATE_DIGEST_ENCODING", "base64"),
    ]);
    let app = create_test_app(build_gate(&config.gate), Arc::new(RecordingSink::default())).await;

    let cipher = AesCipher::new(&secret("prod-aes-secret"));
    let credential = ClientCredential::encrypted(&cipher, &secret("kg_client")).unwrap();
    let (status, _) = get_with_credential(&app, PING_URI, Some(credential.expose_value())).await;
    assert_eq!(status, StatusCode::OK);

    let other = ClientCredential::encrypted(&cipher, &secret("kg_other")).unwrap();
    let (status, _) = get_with_credential(&app, PING_URI, Some(other.expose_value())).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}
