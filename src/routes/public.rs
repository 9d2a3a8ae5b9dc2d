use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};

use crate::{
    dto::applicant_dto::{SubmitApplicationPayload, SubmitApplicationResponse},
    error::Result,
    models::{applicant::ApplicationStatus, reference::ReferenceOption},
    AppState,
};

/// References selectable on the application form.
pub async fn list_references(State(state): State<AppState>) -> Result<impl IntoResponse> {
    let references = state.reference_service.list_references().await.map_err(|e| {
        tracing::error!("Failed to load references: {}", e);
        e
    })?;
    let options: Vec<ReferenceOption> = references.iter().map(ReferenceOption::from).collect();
    Ok(Json(options))
}

pub async fn submit_application(
    State(state): State<AppState>,
    Json(payload): Json<SubmitApplicationPayload>,
) -> Result<impl IntoResponse> {
    let applicant = state
        .lifecycle_service
        .submit_application(payload)
        .await
        .map_err(|e| {
            tracing::error!("Failed to submit application: {}", e);
            e
        })?;

    Ok((
        StatusCode::CREATED,
        Json(SubmitApplicationResponse {
            id: applicant.id,
            status: applicant.status,
            message: "Thank you for applying! Our team will review your application and get back to you soon.".into(),
        }),
    ))
}

/// Pipeline stages in display order.
pub async fn list_statuses() -> impl IntoResponse {
    Json(
        ApplicationStatus::ALL
            .iter()
            .map(|s| s.as_str())
            .collect::<Vec<_>>(),
    )
}
