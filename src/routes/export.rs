use axum::{
    extract::{Query, State},
    http::{header, StatusCode},
    response::IntoResponse,
    Extension,
};

use crate::{
    auth::{Role, SessionClaims},
    dto::applicant_dto::ExportApplicantsQuery,
    error::{Error, Result},
    services::{
        dashboard::{ApplicantFilter, DashboardView},
        export_service::ExportService,
    },
    AppState,
};
use super::applicants::scope_of;

/// Export the filtered applicants in scope as CSV or XLSX.
pub async fn export_applicants(
    State(state): State<AppState>,
    Extension(claims): Extension<SessionClaims>,
    Query(query): Query<ExportApplicantsQuery>,
) -> Result<impl IntoResponse> {
    let filter = ApplicantFilter::try_from(&query)?;
    let view = DashboardView::load(&state.lifecycle_service, scope_of(&claims)).await?;
    let rows = view.filtered(&filter);

    let owner = match claims.role {
        Role::Admin => Some("All".to_string()),
        Role::Reference => state
            .reference_service
            .get_reference(&claims.sub)
            .await?
            .map(|r| r.name),
    };

    let (content_type, extension, body) = match query.format.as_deref().unwrap_or("csv") {
        "csv" => (
            "text/csv; charset=utf-8",
            "csv",
            ExportService::applicants_csv(rows.iter().copied()).into_bytes(),
        ),
        "xlsx" => (
            "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet",
            "xlsx",
            ExportService::applicants_xlsx(rows.iter().copied(), "Applications")?,
        ),
        other => return Err(Error::BadRequest(format!("Unsupported export format: {}", other))),
    };

    let filename = ExportService::filename(owner.as_deref(), extension);
    tracing::info!(rows = rows.len(), %filename, "applicants exported");
    let disposition = format!("attachment; filename=\"{}\"", filename);

    Ok((
        StatusCode::OK,
        [
            (header::CONTENT_TYPE, content_type.to_string()),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        body,
    ))
}
