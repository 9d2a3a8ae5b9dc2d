use axum::{
    extract::State,
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    Extension, Json,
};
use serde_json::json;

use crate::{
    auth::{AuthError, SessionClaims},
    dto::auth_dto::{CredentialsRequest, LoginResponse, ReferenceProfile, SessionResponse},
    error::{Error, Result},
    middleware::auth::bearer_token,
    utils::validation::validate,
    AppState,
};

/// Admin portal sign-in. A missing account answers 404 and tells the client
/// whether it may offer account creation for this address.
pub async fn admin_login(
    State(state): State<AppState>,
    Json(payload): Json<CredentialsRequest>,
) -> Result<Response> {
    validate(&payload)?;
    match state
        .identity_service
        .admin_sign_in(&payload.email, &payload.password)
        .await
    {
        Ok(signed_in) => Ok(Json(LoginResponse::from(signed_in)).into_response()),
        Err(Error::Auth(AuthError::AccountNotFound)) => Ok((
            StatusCode::NOT_FOUND,
            Json(json!({
                "error": "account_not_found",
                "can_create_account": state.identity_service.is_admin_email(&payload.email),
            })),
        )
            .into_response()),
        Err(e) => Err(e),
    }
}

pub async fn create_admin_account(
    State(state): State<AppState>,
    Json(payload): Json<CredentialsRequest>,
) -> Result<impl IntoResponse> {
    let signed_in = state
        .identity_service
        .create_admin_account(&payload.email, &payload.password)
        .await?;
    Ok((StatusCode::CREATED, Json(LoginResponse::from(signed_in))))
}

pub async fn reference_login(
    State(state): State<AppState>,
    Json(payload): Json<CredentialsRequest>,
) -> Result<impl IntoResponse> {
    validate(&payload)?;
    let signed_in = state
        .identity_service
        .reference_sign_in(&payload.email, &payload.password)
        .await?;
    Ok(Json(LoginResponse::from(signed_in)))
}

/// Session restore for a client that kept its token across reloads.
pub async fn current_session(State(state): State<AppState>, headers: HeaderMap) -> Result<impl IntoResponse> {
    let token = bearer_token(&headers).map_err(|code| Error::Unauthorized(code.to_string()))?;
    let restored = state.identity_service.restore_session(token).await?;
    Ok(Json(SessionResponse {
        uid: restored.claims.sub,
        email: restored.claims.email,
        role: restored.claims.role,
        reference: restored.reference.map(ReferenceProfile::from),
    }))
}

pub async fn logout(
    State(state): State<AppState>,
    Extension(claims): Extension<SessionClaims>,
) -> impl IntoResponse {
    state.identity_service.sign_out(&claims);
    StatusCode::NO_CONTENT
}
