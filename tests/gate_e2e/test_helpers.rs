//! Shared test helpers for gate E2E tests.

use std::io;
use std::sync::{Arc, Mutex};

use actix_web::body::to_bytes;
use actix_web::dev::{Service, ServiceResponse};
use actix_web::http::StatusCode;
use actix_web::http::header::HeaderValue;
use actix_web::web::Bytes;
use actix_web::{App, test, web};
use keygate::api;
use keygate::auth::{ApiKeyGate, EncryptedKeyGate, MalformedPolicy, PlainKeyGate};
use keygate::config::EncryptedKeySettings;
use keygate::crypto::{AesCipher, CredentialCipher, DigestEncoding, sha512_digest};
use keygate::events::{DenialEvent, DenialSink};
use keygate::middleware::ApiKeyFilter;
use secrecy::SecretString;
use tracing::subscriber::DefaultGuard;
use tracing_subscriber::fmt::MakeWriter;

/// Plain secret used in tests.
pub const TEST_API_KEY: &str = "k1";
/// AES secret used in tests.
pub const TEST_AES_SECRET: &str = "s";
/// Plaintext whose digest the encrypted gate expects.
pub const TEST_PLAINTEXT: &str = "hello";
/// Protected endpoint.
pub const PING_URI: &str = "/api/v1/protected/ping";

pub fn secret(s: &str) -> SecretString {
    SecretString::from(s.to_string())
}

/// Sink that keeps every denial for later assertions.
#[derive(Default)]
pub struct RecordingSink(Mutex<Vec<DenialEvent>>);

impl RecordingSink {
    pub fn events(&self) -> Vec<DenialEvent> {
        self.0.lock().unwrap().clone()
    }
}

impl DenialSink for RecordingSink {
    fn record(&self, event: &DenialEvent) {
        self.0.lock().unwrap().push(event.clone());
    }
}

pub fn plain_gate() -> Arc<dyn ApiKeyGate> {
    Arc::new(PlainKeyGate::new(secret(TEST_API_KEY)))
}

pub fn encrypted_gate(policy: MalformedPolicy) -> Arc<dyn ApiKeyGate> {
    Arc::new(EncryptedKeyGate::new(&EncryptedKeySettings {
        aes_secret: secret(TEST_AES_SECRET),
        api_key_digest: sha512_digest(TEST_PLAINTEXT, DigestEncoding::Hex),
        digest_encoding: DigestEncoding::Hex,
        malformed_policy: policy,
    }))
}

/// Encrypt a plaintext the way a client would.
pub fn encrypt(aes_secret: &str, plaintext: &str) -> String {
    AesCipher::new(&secret(aes_secret))
        .encrypt(plaintext)
        .expect("encryption should not fail")
}

/// Create a test app with the gate in front of the protected scope, mirroring the server binary.
pub async fn create_test_app(
    gate: Arc<dyn ApiKeyGate>,
    sink: Arc<RecordingSink>,
) -> impl Service<actix_http::Request, Response = ServiceResponse, Error = actix_web::Error> {
    create_app_with_filter(ApiKeyFilter::new(gate).with_sink(sink)).await
}

/// Same routes as `create_test_app`, with the filter supplied by the caller.
pub async fn create_app_with_filter(
    filter: ApiKeyFilter,
) -> impl Service<actix_http::Request, Response = ServiceResponse, Error = actix_web::Error> {
    test::init_service(
        App::new().service(
            web::scope("/api/v1")
                .configure(api::configure_health_routes)
                .service(
                    web::scope("/protected")
                        .wrap(filter)
                        .configure(api::configure_protected_routes),
                ),
        ),
    )
    .await
}

/// Send GET `uri` with an optional credential header.
///
/// Gate faults may come back as an `Err`; they are rendered the way actix
/// would render them for a client.
pub async fn get_with_credential<S>(app: &S, uri: &str, credential: Option<&str>) -> (StatusCode, Bytes)
where
    S: Service<actix_http::Request, Response = ServiceResponse, Error = actix_web::Error>,
{
    get_with_raw_credential(app, uri, credential.map(str::as_bytes)).await
}

/// Like `get_with_credential`, for header values that are not UTF-8.
pub async fn get_with_raw_credential<S>(
    app: &S,
    uri: &str,
    credential: Option<&[u8]>,
) -> (StatusCode, Bytes)
where
    S: Service<actix_http::Request, Response = ServiceResponse, Error = actix_web::Error>,
{
    let mut req = test::TestRequest::get().uri(uri);
    if let Some(value) = credential {
        let value = HeaderValue::from_bytes(value).expect("test header value should be valid");
        req = req.insert_header(("Authorization", value));
    }

    match app.call(req.to_request()).await {
        Ok(res) => {
            let status = res.status();
            (status, test::read_body(res).await)
        }
        Err(err) => {
            let res = err.error_response();
            let status = res.status();
            (status, to_bytes(res.into_body()).await.unwrap())
        }
    }
}

/// Formatted `tracing` output captured for the current thread.
///
/// Events are written without ANSI colours or timestamps, one line each.
#[derive(Clone, Default)]
pub struct LogCapture(Arc<Mutex<Vec<u8>>>);

impl LogCapture {
    /// Install a subscriber writing into this capture until the guard drops.
    pub fn install(&self) -> DefaultGuard {
        let subscriber = tracing_subscriber::fmt()
            .with_writer(self.clone())
            .with_max_level(tracing::Level::TRACE)
            .with_ansi(false)
            .without_time()
            .finish();
        tracing::subscriber::set_default(subscriber)
    }

    pub fn lines(&self) -> Vec<String> {
        String::from_utf8_lossy(&self.0.lock().unwrap())
            .lines()
            .map(str::to_string)
            .collect()
    }
}

impl io::Write for LogCapture {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl<'a> MakeWriter<'a> for LogCapture {
    type Writer = LogCapture;

    fn make_writer(&'a self) -> Self::Writer {
        self.clone()
    }
}
