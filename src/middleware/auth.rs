use axum::{
    extract::{Request, State},
    http::{HeaderMap, StatusCode},
    middleware::Next,
    response::{IntoResponse, Json, Response},
};
use serde_json::json;

use crate::auth::Role;
use crate::AppState;

/// Bearer token from the `Authorization` header, or the error code to answer with.
pub fn bearer_token(headers: &HeaderMap) -> Result<&str, &'static str> {
    let auth_header = headers
        .get(axum::http::header::AUTHORIZATION)
        .ok_or("missing_authorization")?;
    let auth_str = auth_header.to_str().map_err(|_| "bad_authorization")?;
    auth_str.strip_prefix("Bearer ").ok_or("unsupported_scheme")
}

async fn authorize(state: &AppState, mut req: Request, next: Next, allowed: Option<Role>) -> Response {
    let claims = match bearer_token(req.headers()) {
        Ok(token) => state.sessions.verify(token),
        Err(code) => {
            return (StatusCode::UNAUTHORIZED, Json(json!({ "error": code }))).into_response();
        }
    };

    match claims {
        Ok(claims) => {
            if allowed.is_some_and(|role| role != claims.role) {
                return (StatusCode::FORBIDDEN, Json(json!({"error":"forbidden"}))).into_response();
            }
            if allowed.is_some() {
                if let Err(err) = state.identity_service.ensure_active(&claims).await {
                    return err.into_response();
                }
            }
            req.extensions_mut().insert(claims);
            next.run(req).await
        }
        Err(err) => err.into_response(),
    }
}

pub async fn require_session(State(state): State<AppState>, req: Request, next: Next) -> Response {
    authorize(&state, req, next, None).await
}

pub async fn require_admin(State(state): State<AppState>, req: Request, next: Next) -> Response {
    authorize(&state, req, next, Some(Role::Admin)).await
}

pub async fn require_reference(State(state): State<AppState>, req: Request, next: Next) -> Response {
    authorize(&state, req, next, Some(Role::Reference)).await
}
