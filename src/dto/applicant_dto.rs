use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::models::applicant::{Applicant, ApplicationStatus};

/// Public application form. Every field is required; only presence is checked.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase", default)]
pub struct SubmitApplicationPayload {
    #[validate(custom(function = "crate::utils::validation::not_blank"))]
    pub full_name: String,
    #[validate(custom(function = "crate::utils::validation::not_blank"))]
    pub email: String,
    #[validate(custom(function = "crate::utils::validation::not_blank"))]
    pub phone: String,
    #[validate(custom(function = "crate::utils::validation::not_blank"))]
    pub age: String,
    #[validate(custom(function = "crate::utils::validation::not_blank"))]
    pub gender: String,
    #[validate(custom(function = "crate::utils::validation::not_blank"))]
    pub education: String,
    #[validate(custom(function = "crate::utils::validation::not_blank"))]
    pub city: String,
    #[validate(custom(function = "crate::utils::validation::not_blank"))]
    pub current_position: String,
    #[validate(custom(function = "crate::utils::validation::not_blank"))]
    pub working_hours: String,
    #[validate(custom(function = "crate::utils::validation::not_blank"))]
    pub why_this_role: String,
    /// Display name of the selected reference.
    #[validate(custom(function = "crate::utils::validation::not_blank"))]
    pub reference: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubmitApplicationResponse {
    pub id: String,
    pub status: ApplicationStatus,
    pub message: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListApplicantsQuery {
    pub search: Option<String>,
    pub status: Option<String>,
    pub city: Option<String>,
    pub page: Option<usize>,
    pub per_page: Option<usize>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ExportApplicantsQuery {
    pub search: Option<String>,
    pub status: Option<String>,
    pub city: Option<String>,
    /// `csv` (default) or `xlsx`.
    pub format: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct UpdateStatusRequest {
    pub status: ApplicationStatus,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateRegistrationRequest {
    pub registration_completed: bool,
}

/// Applicant as shown on a dashboard, with ready-made contact links.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApplicantResponse {
    #[serde(flatten)]
    pub applicant: Applicant,
    pub whatsapp_url: String,
    pub call_url: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PaginatedApplicants {
    pub items: Vec<ApplicantResponse>,
    pub page: usize,
    pub per_page: usize,
    pub total: usize,
    pub total_pages: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn complete() -> SubmitApplicationPayload {
        SubmitApplicationPayload {
            full_name: "Meera Nair".into(),
            email: "meera@example.com".into(),
            phone: "9876543210".into(),
            age: "24".into(),
            gender: "Female".into(),
            education: "Bachelor's Degree".into(),
            city: "Hyderabad".into(),
            current_position: "Student".into(),
            working_hours: "10 AM - 2 PM".into(),
            why_this_role: "I like talking to people.".into(),
            reference: "Asha".into(),
        }
    }

    #[test]
    fn complete_form_passes() {
        assert!(complete().validate().is_ok());
    }

    #[test]
    fn blank_fields_are_reported_by_name() {
        let mut form = complete();
        form.city = "   ".into();
        form.reference = String::new();
        let errors = form.validate().unwrap_err();
        let fields = errors.field_errors();
        assert!(fields.contains_key("city"));
        assert!(fields.contains_key("reference"));
        assert_eq!(fields.len(), 2);
    }

    #[test]
    fn status_request_rejects_unknown_values() {
        let ok: UpdateStatusRequest =
            serde_json::from_str(r#"{"status":"Interview Scheduled"}"#).unwrap();
        assert_eq!(ok.status, ApplicationStatus::InterviewScheduled);
        assert!(serde_json::from_str::<UpdateStatusRequest>(r#"{"status":"Maybe"}"#).is_err());
    }

    #[test]
    fn list_query_uses_camel_case_like_the_response() {
        let q: ListApplicantsQuery =
            serde_json::from_value(serde_json::json!({ "page": 2, "perPage": 25 })).unwrap();
        assert_eq!(q.page, Some(2));
        assert_eq!(q.per_page, Some(25));
    }
}
