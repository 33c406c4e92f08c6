//! Sample endpoint mounted behind the API key gate.

use actix_web::{HttpResponse, get, web};
use serde::Serialize;

#[derive(Serialize)]
pub struct PingResponse {
    status: &'static str,
}

/// Returns 200 once the gate has let the request through.
#[get("/ping")]
pub async fn ping() -> HttpResponse {
    HttpResponse::Ok().json(PingResponse { status: "authenticated" })
}

/// Configure protected routes. The caller wraps the scope in `ApiKeyFilter`.
pub fn configure_protected_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(ping);
}
