use std::cmp::Ordering;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::json;

use crate::dto::applicant_dto::SubmitApplicationPayload;
use crate::error::{Error, Result};
use crate::models::applicant::{Applicant, ApplicationStatus, NewApplicant};
use crate::services::reference_service::ReferenceService;
use crate::store::{to_fields, DocumentStore, Fields, Filter, APPLICANTS};
use crate::utils::{time, validation::validate};

/// Which applicants a reviewer may see and change.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Scope {
    All,
    Reference(String),
}

impl Scope {
    fn filters(&self) -> Vec<Filter> {
        match self {
            Scope::All => Vec::new(),
            Scope::Reference(id) => vec![Filter::eq("referenceId", id.as_str())],
        }
    }

    pub fn permits(&self, applicant: &Applicant) -> bool {
        match self {
            Scope::All => true,
            Scope::Reference(id) => applicant.reference_id == *id,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusCount {
    pub status: ApplicationStatus,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApplicantStats {
    pub total: usize,
    pub this_month: usize,
    pub hired: usize,
    pub registrations_completed: usize,
    pub target: Option<f64>,
    pub target_attainment: f64,
    pub by_status: Vec<StatusCount>,
}

/// Completed registrations as a percentage of `target`. A missing or
/// non-positive target yields 0.
pub fn target_attainment(completed: usize, target: Option<f64>) -> f64 {
    match target {
        Some(t) if t > 0.0 => completed as f64 / t * 100.0,
        _ => 0.0,
    }
}

pub fn compute_stats<'a, I>(applicants: I, target: Option<f64>, now: DateTime<Utc>) -> ApplicantStats
where
    I: IntoIterator<Item = &'a Applicant>,
{
    let mut total = 0;
    let mut this_month = 0;
    let mut registrations_completed = 0;
    let mut by_status: Vec<StatusCount> = ApplicationStatus::ALL
        .into_iter()
        .map(|status| StatusCount { status, count: 0 })
        .collect();

    for applicant in applicants {
        total += 1;
        if applicant
            .created_at
            .is_some_and(|at| time::same_local_month(at, now))
        {
            this_month += 1;
        }
        if applicant.registration_completed {
            registrations_completed += 1;
        }
        if let Some(entry) = by_status.iter_mut().find(|c| c.status == applicant.status) {
            entry.count += 1;
        }
    }

    let hired = by_status
        .iter()
        .find(|c| c.status == ApplicationStatus::Hired)
        .map_or(0, |c| c.count);

    ApplicantStats {
        total,
        this_month,
        hired,
        registrations_completed,
        target,
        target_attainment: target_attainment(registrations_completed, target),
        by_status,
    }
}

/// Newest first; records without a creation time go last in store order.
fn newest_first(a: &Applicant, b: &Applicant) -> Ordering {
    match (a.created_at, b.created_at) {
        (Some(x), Some(y)) => y.cmp(&x),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

/// Owns applicant status and registration state. Writes touch one field each
/// and are last-writer-wins at the store.
#[derive(Clone)]
pub struct LifecycleService {
    store: Arc<dyn DocumentStore>,
    references: ReferenceService,
}

impl LifecycleService {
    pub fn new(store: Arc<dyn DocumentStore>, references: ReferenceService) -> Self {
        Self { store, references }
    }

    pub async fn submit_application(&self, payload: SubmitApplicationPayload) -> Result<Applicant> {
        validate(&payload)?;

        // Resolved separately from the insert; the reference may disappear in between.
        let reference_id = self
            .references
            .find_by_name(&payload.reference)
            .await?
            .map(|r| r.id)
            .unwrap_or_default();
        if reference_id.is_empty() {
            tracing::warn!(reference = %payload.reference, "selected reference not found in directory");
        }

        let now = time::now();
        let record = NewApplicant {
            full_name: payload.full_name,
            email: payload.email,
            phone: payload.phone,
            age: payload.age,
            gender: payload.gender,
            education: payload.education,
            city: payload.city,
            current_position: payload.current_position,
            working_hours: payload.working_hours,
            why_this_role: payload.why_this_role,
            reference_name: payload.reference.clone(),
            reference: payload.reference,
            reference_id,
            status: ApplicationStatus::New,
            sales_completed: 0,
            registration_completed: false,
            created_at: now,
            submitted_at: now,
        };

        let id = self
            .store
            .create_document(APPLICANTS, to_fields(&record)?)
            .await?;
        tracing::info!(applicant_id = %id, reference_id = %record.reference_id, "application submitted");

        Ok(Applicant {
            id,
            full_name: record.full_name,
            email: record.email,
            phone: record.phone,
            age: record.age,
            gender: record.gender,
            education: record.education,
            city: record.city,
            current_position: record.current_position,
            working_hours: record.working_hours,
            why_this_role: record.why_this_role,
            reference_id: record.reference_id,
            reference_name: record.reference_name,
            status: record.status,
            registration_completed: record.registration_completed,
            sales_completed: record.sales_completed,
            created_at: Some(record.created_at),
            submitted_at: Some(record.submitted_at),
        })
    }

    pub async fn list_applicants(&self, scope: &Scope) -> Result<Vec<Applicant>> {
        let docs = self
            .store
            .query_documents(APPLICANTS, &scope.filters())
            .await?;
        let mut applicants: Vec<Applicant> = docs
            .into_iter()
            .filter_map(|d| {
                let id = d.id.clone();
                d.decode()
                    .map_err(|e| tracing::warn!(applicant_id = %id, error = %e, "skipping unreadable applicant"))
                    .ok()
            })
            .collect();
        applicants.sort_by(newest_first);
        Ok(applicants)
    }

    /// Applicants outside the scope read as not found.
    pub async fn get_applicant(&self, scope: &Scope, id: &str) -> Result<Applicant> {
        let applicant: Applicant = self
            .store
            .get_document(APPLICANTS, id)
            .await?
            .ok_or_else(|| Error::NotFound("Applicant not found".into()))?
            .decode()?;
        if !scope.permits(&applicant) {
            return Err(Error::NotFound("Applicant not found".into()));
        }
        Ok(applicant)
    }

    pub async fn set_status(&self, scope: &Scope, id: &str, status: ApplicationStatus) -> Result<Applicant> {
        let mut applicant = self.get_applicant(scope, id).await?;
        self.write_field(id, "status", json!(status)).await?;
        tracing::info!(applicant_id = %id, from = %applicant.status, to = %status, "status changed");
        applicant.status = status;
        Ok(applicant)
    }

    pub async fn set_registration_completed(&self, scope: &Scope, id: &str, completed: bool) -> Result<Applicant> {
        let mut applicant = self.get_applicant(scope, id).await?;
        self.write_field(id, "registrationCompleted", json!(completed)).await?;
        tracing::info!(applicant_id = %id, completed, "registration flag changed");
        applicant.registration_completed = completed;
        Ok(applicant)
    }

    async fn write_field(&self, id: &str, field: &str, value: serde_json::Value) -> Result<()> {
        let mut fields = Fields::new();
        fields.insert(field.to_string(), value);
        self.store
            .update_document(APPLICANTS, id, fields)
            .await
            .map_err(|e| {
                tracing::error!(applicant_id = %id, field, error = %e, "applicant update failed");
                Error::from(e)
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::{Document, MockDocumentStore, StoreError};
    use chrono::{Duration, TimeZone};

    fn applicant(id: &str, created_at: Option<DateTime<Utc>>) -> Applicant {
        Applicant {
            id: id.into(),
            created_at,
            ..Default::default()
        }
    }

    #[test]
    fn attainment_handles_missing_and_zero_targets() {
        assert_eq!(target_attainment(3, None), 0.0);
        assert_eq!(target_attainment(3, Some(0.0)), 0.0);
        assert_eq!(target_attainment(3, Some(10.0)), 30.0);
        assert_eq!(target_attainment(0, Some(10.0)), 0.0);
    }

    #[test]
    fn ordering_puts_untimed_records_last() {
        let t0 = Utc.with_ymd_and_hms(2026, 1, 1, 0, 0, 0).unwrap();
        let mut list = vec![
            applicant("untimed-1", None),
            applicant("old", Some(t0)),
            applicant("untimed-2", None),
            applicant("new", Some(t0 + Duration::days(3))),
        ];
        list.sort_by(newest_first);
        let ids: Vec<_> = list.iter().map(|a| a.id.as_str()).collect();
        assert_eq!(ids, vec!["new", "old", "untimed-1", "untimed-2"]);
    }

    #[test]
    fn stats_count_month_hires_and_registrations() {
        let now = Utc::now();
        let mut a = applicant("a", Some(now));
        a.status = ApplicationStatus::Hired;
        a.registration_completed = true;
        let mut b = applicant("b", Some(now - Duration::days(400)));
        b.registration_completed = true;
        let c = applicant("c", None);

        let stats = compute_stats(&[a, b, c], Some(4.0), now);
        assert_eq!(stats.total, 3);
        assert_eq!(stats.this_month, 1);
        assert_eq!(stats.hired, 1);
        assert_eq!(stats.registrations_completed, 2);
        assert_eq!(stats.target_attainment, 50.0);
        let new_count = stats
            .by_status
            .iter()
            .find(|s| s.status == ApplicationStatus::New)
            .unwrap();
        assert_eq!(new_count.count, 2);
    }

    fn stored(reference_id: &str) -> Document {
        Document {
            id: "app_1".into(),
            fields: json!({ "fullName": "Meera", "referenceId": reference_id })
                .as_object()
                .cloned()
                .unwrap(),
        }
    }

    fn service(store: MockDocumentStore) -> LifecycleService {
        let store: Arc<dyn DocumentStore> = Arc::new(store);
        LifecycleService::new(store.clone(), ReferenceService::new(store))
    }

    #[tokio::test]
    async fn set_status_writes_only_the_status_field() {
        let mut store = MockDocumentStore::new();
        store
            .expect_get_document()
            .withf(|collection, id| collection == APPLICANTS && id == "app_1")
            .returning(|_, _| Ok(Some(stored("ref_42"))));
        store
            .expect_update_document()
            .withf(|collection, id, fields| {
                collection == APPLICANTS
                    && id == "app_1"
                    && fields.len() == 1
                    && fields.get("status") == Some(&json!("Shortlisted"))
            })
            .times(1)
            .returning(|_, _, _| Ok(()));

        let updated = service(store)
            .set_status(&Scope::All, "app_1", ApplicationStatus::Shortlisted)
            .await
            .unwrap();
        assert_eq!(updated.status, ApplicationStatus::Shortlisted);
        assert_eq!(updated.full_name, "Meera");
    }

    #[tokio::test]
    async fn reference_cannot_touch_foreign_applicant() {
        let mut store = MockDocumentStore::new();
        store
            .expect_get_document()
            .returning(|_, _| Ok(Some(stored("ref_7"))));
        store.expect_update_document().never();

        let err = service(store)
            .set_registration_completed(&Scope::Reference("ref_42".into()), "app_1", true)
            .await
            .unwrap_err();
        assert!(matches!(err, Error::NotFound(_)));
    }

    #[tokio::test]
    async fn store_failure_surfaces_as_persistence_error() {
        let mut store = MockDocumentStore::new();
        store
            .expect_get_document()
            .returning(|_, _| Ok(Some(stored("ref_42"))));
        store
            .expect_update_document()
            .returning(|_, _, _| Err(StoreError::Database(sqlx::Error::PoolTimedOut)));

        let err = service(store)
            .set_status(&Scope::All, "app_1", ApplicationStatus::Hired)
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Persistence(_)));
    }

    #[tokio::test]
    async fn legacy_records_do_not_break_the_list() {
        let mut store = MockDocumentStore::new();
        store.expect_query_documents().returning(|_, _| {
            let doc = |id: &str, value: serde_json::Value| Document {
                id: id.into(),
                fields: value.as_object().cloned().unwrap(),
            };
            Ok(vec![
                doc("valid", json!({ "fullName": "Meera", "status": "Hired", "registrationCompleted": true })),
                doc("legacy", json!({ "fullName": "Legacy", "registrationCompleted": null, "age": 31 })),
                doc("odd", json!({ "fullName": ["not", "text"], "createdAt": 17 })),
            ])
        });

        let listed = service(store).list_applicants(&Scope::All).await.unwrap();
        let ids: Vec<_> = listed.iter().map(|a| a.id.as_str()).collect();
        assert_eq!(ids, vec!["valid", "legacy", "odd"]);
        assert_eq!(listed[1].age, "31");
        assert!(!listed[1].registration_completed);
        assert_eq!(listed[2].full_name, "");
    }

    #[tokio::test]
    async fn invalid_form_never_reaches_the_store() {
        let mut store = MockDocumentStore::new();
        store.expect_query_documents().never();
        store.expect_create_document().never();

        let err = service(store)
            .submit_application(SubmitApplicationPayload::default())
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Validation(_)));
    }
}
