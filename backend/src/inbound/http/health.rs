//! Liveness and readiness checks.
//!
//! Both endpoints sit outside `/api/v1` and the session middleware so orchestrators
//! can poll them without cookies.

use std::sync::atomic::{AtomicBool, Ordering};

use actix_web::{HttpResponse, get, http::header, web};

/// Process health flags shared with the server lifecycle.
///
/// A fresh state is live but not ready; the server marks it ready once the
/// listener is bound and marks it unhealthy when draining.
#[derive(Debug)]
pub struct HealthState {
    ready: AtomicBool,
    live: AtomicBool,
}

impl Default for HealthState {
    fn default() -> Self {
        Self {
            ready: AtomicBool::new(false),
            live: AtomicBool::new(true),
        }
    }
}

impl HealthState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn mark_ready(&self) {
        self.ready.store(true, Ordering::Release);
    }

    /// Fail liveness checks from now on.
    pub fn mark_unhealthy(&self) {
        self.live.store(false, Ordering::Release);
    }

    pub fn is_ready(&self) -> bool {
        self.ready.load(Ordering::Acquire)
    }

    pub fn is_alive(&self) -> bool {
        self.live.load(Ordering::Acquire)
    }
}

fn health_response(ok: bool) -> HttpResponse {
    let mut builder = if ok {
        HttpResponse::Ok()
    } else {
        HttpResponse::ServiceUnavailable()
    };
    builder
        .insert_header((header::CACHE_CONTROL, "no-store"))
        .finish()
}

/// 200 once the server accepts traffic, 503 before that.
#[utoipa::path(
    get,
    path = "/health/ready",
    responses(
        (status = 200, description = "Ready for traffic"),
        (status = 503, description = "Not ready")
    ),
    tags = ["health"],
    operation_id = "ready",
    security([])
)]
#[get("/health/ready")]
pub async fn ready(state: web::Data<HealthState>) -> HttpResponse {
    health_response(state.is_ready())
}

/// 200 while the process is healthy, 503 once it starts draining.
#[utoipa::path(
    get,
    path = "/health/live",
    responses(
        (status = 200, description = "Alive"),
        (status = 503, description = "Draining")
    ),
    tags = ["health"],
    operation_id = "live",
    security([])
)]
#[get("/health/live")]
pub async fn live(state: web::Data<HealthState>) -> HttpResponse {
    health_response(state.is_alive())
}
