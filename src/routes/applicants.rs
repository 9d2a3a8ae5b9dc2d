//! Dashboard endpoints. The same handlers serve the admin and reference
//! routers; the session decides the scope.

use axum::{
    extract::{Path, Query, State},
    response::IntoResponse,
    Extension, Json,
};

use crate::{
    auth::{Role, SessionClaims},
    dto::{
        applicant_dto::{
            ApplicantResponse, ListApplicantsQuery, PaginatedApplicants, UpdateRegistrationRequest,
            UpdateStatusRequest,
        },
        auth_dto::ReferenceProfile,
    },
    error::{Error, Result},
    models::applicant::Applicant,
    services::{
        dashboard::{ApplicantFilter, DashboardView},
        lifecycle_service::Scope,
    },
    utils::{contact, time},
    AppState,
};

pub fn scope_of(claims: &SessionClaims) -> Scope {
    match claims.role {
        Role::Admin => Scope::All,
        Role::Reference => Scope::Reference(claims.sub.clone()),
    }
}

pub(crate) fn to_response(state: &AppState, applicant: Applicant) -> ApplicantResponse {
    let whatsapp_url = contact::whatsapp_link(
        &state.contact.whatsapp_country_code,
        &applicant.phone,
        &applicant.full_name,
        &state.contact.organization_name,
    );
    let call_url = contact::call_link(&applicant.phone);
    ApplicantResponse {
        applicant,
        whatsapp_url,
        call_url,
    }
}

pub async fn list_applicants(
    State(state): State<AppState>,
    Extension(claims): Extension<SessionClaims>,
    Query(query): Query<ListApplicantsQuery>,
) -> Result<impl IntoResponse> {
    let filter = ApplicantFilter::try_from(&query)?;
    let view = DashboardView::load(&state.lifecycle_service, scope_of(&claims)).await?;
    let page = view.page(&filter, query.page, query.per_page);

    Ok(Json(PaginatedApplicants {
        items: page
            .items
            .into_iter()
            .map(|a| to_response(&state, a.clone()))
            .collect(),
        page: page.page,
        per_page: page.per_page,
        total: page.total,
        total_pages: page.total_pages,
    }))
}

pub async fn get_applicant(
    State(state): State<AppState>,
    Extension(claims): Extension<SessionClaims>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse> {
    let applicant = state
        .lifecycle_service
        .get_applicant(&scope_of(&claims), &id)
        .await?;
    Ok(Json(to_response(&state, applicant)))
}

pub async fn update_status(
    State(state): State<AppState>,
    Extension(claims): Extension<SessionClaims>,
    Path(id): Path<String>,
    Json(payload): Json<UpdateStatusRequest>,
) -> Result<impl IntoResponse> {
    let applicant = state
        .lifecycle_service
        .set_status(&scope_of(&claims), &id, payload.status)
        .await?;
    Ok(Json(to_response(&state, applicant)))
}

pub async fn update_registration(
    State(state): State<AppState>,
    Extension(claims): Extension<SessionClaims>,
    Path(id): Path<String>,
    Json(payload): Json<UpdateRegistrationRequest>,
) -> Result<impl IntoResponse> {
    let applicant = state
        .lifecycle_service
        .set_registration_completed(&scope_of(&claims), &id, payload.registration_completed)
        .await?;
    Ok(Json(to_response(&state, applicant)))
}

pub async fn get_stats(
    State(state): State<AppState>,
    Extension(claims): Extension<SessionClaims>,
) -> Result<impl IntoResponse> {
    let target = match claims.role {
        Role::Admin => None,
        Role::Reference => state
            .reference_service
            .get_reference(&claims.sub)
            .await?
            .and_then(|r| r.target),
    };
    let view = DashboardView::load(&state.lifecycle_service, scope_of(&claims)).await?;
    Ok(Json(view.stats(target, time::now())))
}

pub async fn list_cities(
    State(state): State<AppState>,
    Extension(claims): Extension<SessionClaims>,
) -> Result<impl IntoResponse> {
    let view = DashboardView::load(&state.lifecycle_service, scope_of(&claims)).await?;
    Ok(Json(view.cities()))
}

/// The signed-in reference's directory entry.
pub async fn get_reference_profile(
    State(state): State<AppState>,
    Extension(claims): Extension<SessionClaims>,
) -> Result<impl IntoResponse> {
    let reference = state
        .reference_service
        .get_reference(&claims.sub)
        .await?
        .ok_or_else(|| Error::NotFound("Reference not found".into()))?;
    Ok(Json(ReferenceProfile::from(reference)))
}
