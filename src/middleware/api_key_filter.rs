//! Middleware running an `ApiKeyGate` once per request.
//!
//! - ALLOW: the request is forwarded untouched
//! - DENY: 401 with an empty body, denial handed to the `DenialSink`
//! - FAIL: the `GateError` is returned to actix, which renders it as a 500

use std::future::{Ready, ready};
use std::sync::Arc;

use actix_web::body::EitherBody;
use actix_web::dev::{Service, ServiceRequest, ServiceResponse, Transform, forward_ready};
use actix_web::{Error, HttpResponse};
use futures_util::future::LocalBoxFuture;

use crate::auth::{ApiKeyGate, Decision, DenyReason, extract_credential};
use crate::events::{DenialEvent, DenialSink, TracingSink};

/// API key filter middleware factory.
#[derive(Clone)]
pub struct ApiKeyFilter {
    gate: Arc<dyn ApiKeyGate>,
    sink: Arc<dyn DenialSink>,
}

impl ApiKeyFilter {
    /// Filter that reports denials through `tracing`.
    pub fn new(gate: Arc<dyn ApiKeyGate>) -> Self {
        Self {
            gate,
            sink: Arc::new(TracingSink),
        }
    }

    /// Replace the denial sink.
    pub fn with_sink(mut self, sink: Arc<dyn DenialSink>) -> Self {
        self.sink = sink;
        self
    }
}

impl<S, B> Transform<S, ServiceRequest> for ApiKeyFilter
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error>,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type InitError = ();
    type Transform = ApiKeyFilterMiddleware<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(ApiKeyFilterMiddleware {
            service,
            gate: self.gate.clone(),
            sink: self.sink.clone(),
        }))
    }
}

/// API key filter middleware service.
pub struct ApiKeyFilterMiddleware<S> {
    service: S,
    gate: Arc<dyn ApiKeyGate>,
    sink: Arc<dyn DenialSink>,
}

impl<S, B> Service<ServiceRequest> for ApiKeyFilterMiddleware<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error>,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let credential = extract_credential(req.headers());

        match self.gate.check(credential.as_ref()) {
            Ok(Decision::Allow) => {
                let fut = self.service.call(req);
                Box::pin(async move { fut.await.map(ServiceResponse::map_into_left_body) })
            }
            Ok(Decision::Deny(reason)) => {
                self.sink
                    .record(&denial_event(&req, self.gate.name(), reason, credential.is_some()));
                let res = req
                    .into_response(HttpResponse::Unauthorized().finish())
                    .map_into_right_body();
                Box::pin(async move { Ok(res) })
            }
            Err(err) => Box::pin(async move { Err(err.into()) }),
        }
    }
}

fn denial_event(
    req: &ServiceRequest,
    gate: &'static str,
    reason: DenyReason,
    credential_present: bool,
) -> DenialEvent {
    DenialEvent {
        gate,
        reason,
        cause: reason.cause(),
        method: req.method().to_string(),
        path: req.path().to_string(),
        remote_addr: req
            .connection_info()
            .realip_remote_addr()
            .unwrap_or("unknown")
            .to_string(),
        user_agent: req
            .headers()
            .get("user-agent")
            .and_then(|v| v.to_str().ok())
            .unwrap_or("unknown")
            .to_string(),
        credential_present,
    }
}
