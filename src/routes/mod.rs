pub mod applicants;
pub mod auth;
pub mod export;
pub mod health;
pub mod public;

use axum::{
    extract::DefaultBodyLimit,
    middleware::from_fn_with_state,
    routing::{get, post},
    Router,
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::middleware::auth::{require_admin, require_reference, require_session};
use crate::AppState;

/// Read and mutate endpoints shared by both dashboards.
fn dashboard_routes() -> Router<AppState> {
    Router::new()
        .route("/applicants", get(applicants::list_applicants))
        .route("/applicants/stats", get(applicants::get_stats))
        .route("/applicants/cities", get(applicants::list_cities))
        .route("/applicants/export", get(export::export_applicants))
        .route("/applicants/:id", get(applicants::get_applicant))
        .route("/applicants/:id/status", post(applicants::update_status))
        .route(
            "/applicants/:id/registration",
            post(applicants::update_registration),
        )
}

pub fn router(state: AppState) -> Router {
    let public_api = Router::new()
        .route("/health", get(health::health))
        .route("/api/public/references", get(public::list_references))
        .route("/api/public/applications", post(public::submit_application))
        .route("/api/public/statuses", get(public::list_statuses))
        .route("/api/auth/admin/login", post(auth::admin_login))
        .route("/api/auth/admin/create", post(auth::create_admin_account))
        .route("/api/auth/reference/login", post(auth::reference_login))
        .route("/api/auth/session", get(auth::current_session));

    let session_api = Router::new()
        .route("/api/auth/logout", post(auth::logout))
        .layer(from_fn_with_state(state.clone(), require_session));

    let admin_api = dashboard_routes().layer(from_fn_with_state(state.clone(), require_admin));

    let reference_api = dashboard_routes()
        .route("/profile", get(applicants::get_reference_profile))
        .layer(from_fn_with_state(state.clone(), require_reference));

    public_api
        .merge(session_api)
        .nest("/api/admin", admin_api)
        .nest("/api/reference", reference_api)
        .with_state(state)
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .layer(DefaultBodyLimit::max(256 * 1024))
}
