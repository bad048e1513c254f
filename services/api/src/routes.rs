use crate::infra::{AdminState, AppState};
use axum::http::{header, HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::{Extension, Json};
use enrollment::intake::{intake_router, CandidateRepository, ContentStore, IntakeService};
use enrollment::session;
use serde::Deserialize;
use serde_json::json;
use std::sync::Arc;
use tracing::warn;

pub(crate) fn with_intake_routes<R, S>(service: Arc<IntakeService<R, S>>) -> axum::Router
where
    R: CandidateRepository + 'static,
    S: ContentStore + 'static,
{
    intake_router(service)
        .route("/health", axum::routing::get(healthcheck))
        .route("/ready", axum::routing::get(readiness_endpoint))
        .route("/metrics", axum::routing::get(metrics_endpoint))
        .route("/api/admin/login", axum::routing::post(admin_login))
        .route("/api/admin/session", axum::routing::get(admin_session))
        .route("/api/admin/logout", axum::routing::post(admin_logout))
}

pub(crate) async fn healthcheck() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

pub(crate) async fn readiness_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    let ready = state.readiness.load(std::sync::atomic::Ordering::Relaxed);
    let status = if ready {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    let payload = if ready {
        json!({ "status": "ready" })
    } else {
        json!({ "status": "initializing" })
    };

    (status, Json(payload))
}

pub(crate) async fn metrics_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        state.metrics.render(),
    )
}

#[derive(Debug, Deserialize)]
pub(crate) struct LoginRequest {
    pub(crate) username: String,
    pub(crate) password: String,
}

/// Check the configured credentials and hand out a fresh session cookie.
/// With no password configured, login is refused outright.
pub(crate) async fn admin_login(
    Extension(admin): Extension<AdminState>,
    Json(login): Json<LoginRequest>,
) -> Response {
    let authorized = match admin.password.as_deref() {
        Some(expected) => login.username == admin.username && login.password == expected,
        None => {
            warn!("admin login attempted with no password configured");
            false
        }
    };

    if !authorized {
        let payload = json!({ "success": false, "error": "invalid credentials" });
        return (StatusCode::UNAUTHORIZED, Json(payload)).into_response();
    }

    let token = session::issue_token();
    let cookie = session::session_cookie(&token, admin.secure_cookies);
    (
        StatusCode::OK,
        [(header::SET_COOKIE, cookie)],
        Json(json!({ "success": true })),
    )
        .into_response()
}

/// Validate the session cookie and renew its sliding 30-minute window.
pub(crate) async fn admin_session(
    Extension(admin): Extension<AdminState>,
    headers: HeaderMap,
) -> Response {
    match session::token_from_headers(&headers) {
        Some(token) => {
            let cookie = session::session_cookie(&token, admin.secure_cookies);
            (
                StatusCode::OK,
                [(header::SET_COOKIE, cookie)],
                Json(json!({ "ok": true })),
            )
                .into_response()
        }
        None => {
            let payload = json!({ "ok": false, "error": "not authenticated" });
            (StatusCode::UNAUTHORIZED, Json(payload)).into_response()
        }
    }
}

pub(crate) async fn admin_logout() -> Response {
    (
        StatusCode::OK,
        [(header::SET_COOKIE, session::expired_cookie())],
        Json(json!({ "success": true })),
    )
        .into_response()
}
