use chrono::{DateTime, Utc};

use crate::dto::applicant_dto::{ExportApplicantsQuery, ListApplicantsQuery};
use crate::error::{Error, Result};
use crate::models::applicant::{Applicant, ApplicationStatus};
use crate::services::lifecycle_service::{compute_stats, ApplicantStats, LifecycleService, Scope};

pub const DEFAULT_PER_PAGE: usize = 10;
pub const MAX_PER_PAGE: usize = 100;

const ALL: &str = "All";

/// Reviewer-side narrowing of the scoped list.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ApplicantFilter {
    /// Case-insensitive substring of the full name or phone number.
    pub search: Option<String>,
    pub status: Option<ApplicationStatus>,
    /// Exact city.
    pub city: Option<String>,
}

impl ApplicantFilter {
    pub fn from_parts(search: Option<&str>, status: Option<&str>, city: Option<&str>) -> Result<Self> {
        let search = search
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_lowercase);
        let status = match status.map(str::trim) {
            None | Some("") | Some(ALL) => None,
            Some(raw) => Some(raw.parse().map_err(Error::BadRequest)?),
        };
        let city = city
            .map(str::trim)
            .filter(|c| !c.is_empty() && *c != ALL)
            .map(str::to_string);
        Ok(Self { search, status, city })
    }

    pub fn matches(&self, applicant: &Applicant) -> bool {
        let matches_search = self.search.as_deref().map_or(true, |term| {
            applicant.full_name.to_lowercase().contains(term)
                || applicant.phone.to_lowercase().contains(term)
        });
        let matches_status = self.status.map_or(true, |s| applicant.status == s);
        let matches_city = self.city.as_deref().map_or(true, |c| applicant.city.trim() == c);
        matches_search && matches_status && matches_city
    }
}

impl TryFrom<&ListApplicantsQuery> for ApplicantFilter {
    type Error = Error;

    fn try_from(q: &ListApplicantsQuery) -> Result<Self> {
        Self::from_parts(q.search.as_deref(), q.status.as_deref(), q.city.as_deref())
    }
}

impl TryFrom<&ExportApplicantsQuery> for ApplicantFilter {
    type Error = Error;

    fn try_from(q: &ExportApplicantsQuery) -> Result<Self> {
        Self::from_parts(q.search.as_deref(), q.status.as_deref(), q.city.as_deref())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub page: usize,
    pub per_page: usize,
    pub total: usize,
    pub total_pages: usize,
}

/// A reviewer's working copy of the applicants in scope.
///
/// Mutations are persisted first and then applied to the local copy without
/// re-querying; `refresh` reconciles with whatever the store holds now,
/// including other reviewers' writes.
pub struct DashboardView {
    scope: Scope,
    applicants: Vec<Applicant>,
}

impl DashboardView {
    pub async fn load(lifecycle: &LifecycleService, scope: Scope) -> Result<Self> {
        let applicants = lifecycle.list_applicants(&scope).await?;
        Ok(Self { scope, applicants })
    }

    pub async fn refresh(&mut self, lifecycle: &LifecycleService) -> Result<()> {
        self.applicants = lifecycle.list_applicants(&self.scope).await?;
        Ok(())
    }

    pub fn scope(&self) -> &Scope {
        &self.scope
    }

    pub fn applicants(&self) -> &[Applicant] {
        &self.applicants
    }

    pub fn filtered(&self, filter: &ApplicantFilter) -> Vec<&Applicant> {
        self.applicants.iter().filter(|a| filter.matches(a)).collect()
    }

    /// One page of the filtered list. Pages are 1-based; out-of-range pages
    /// come back empty.
    pub fn page(&self, filter: &ApplicantFilter, page: Option<usize>, per_page: Option<usize>) -> Page<&Applicant> {
        let filtered = self.filtered(filter);
        let per_page = per_page.unwrap_or(DEFAULT_PER_PAGE).clamp(1, MAX_PER_PAGE);
        let page = page.unwrap_or(1).max(1);
        let total = filtered.len();
        let total_pages = total.div_ceil(per_page);
        let items = filtered
            .into_iter()
            .skip((page - 1).saturating_mul(per_page))
            .take(per_page)
            .collect();
        Page {
            items,
            page,
            per_page,
            total,
            total_pages,
        }
    }

    /// Distinct non-empty cities, sorted.
    pub fn cities(&self) -> Vec<String> {
        let mut cities: Vec<String> = self
            .applicants
            .iter()
            .map(|a| a.city.trim())
            .filter(|c| !c.is_empty())
            .map(str::to_string)
            .collect();
        cities.sort();
        cities.dedup();
        cities
    }

    pub fn stats(&self, target: Option<f64>, now: DateTime<Utc>) -> ApplicantStats {
        compute_stats(&self.applicants, target, now)
    }

    pub async fn set_status(&mut self, lifecycle: &LifecycleService, id: &str, status: ApplicationStatus) -> Result<()> {
        let updated = lifecycle.set_status(&self.scope, id, status).await?;
        self.apply_local(id, |a| a.status = updated.status);
        Ok(())
    }

    pub async fn set_registration_completed(
        &mut self,
        lifecycle: &LifecycleService,
        id: &str,
        completed: bool,
    ) -> Result<()> {
        let updated = lifecycle
            .set_registration_completed(&self.scope, id, completed)
            .await?;
        self.apply_local(id, |a| a.registration_completed = updated.registration_completed);
        Ok(())
    }

    fn apply_local(&mut self, id: &str, change: impl FnOnce(&mut Applicant)) {
        if let Some(applicant) = self.applicants.iter_mut().find(|a| a.id == id) {
            change(applicant);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn applicant(name: &str, phone: &str, city: &str, status: ApplicationStatus) -> Applicant {
        Applicant {
            id: name.to_lowercase(),
            full_name: name.into(),
            phone: phone.into(),
            city: city.into(),
            status,
            ..Default::default()
        }
    }

    fn view(applicants: Vec<Applicant>) -> DashboardView {
        DashboardView {
            scope: Scope::All,
            applicants,
        }
    }

    #[test]
    fn filter_parts_treat_all_as_no_filter() {
        let f = ApplicantFilter::from_parts(Some("  "), Some("All"), Some("All")).unwrap();
        assert_eq!(f, ApplicantFilter::default());
        assert!(ApplicantFilter::from_parts(None, Some("Later"), None).is_err());
    }

    #[test]
    fn search_is_case_insensitive_on_name_and_phone() {
        let v = view(vec![
            applicant("Meera Nair", "9876500001", "Pune", ApplicationStatus::New),
            applicant("Ravi Kumar", "9123400002", "Delhi", ApplicationStatus::Hired),
        ]);
        let by_name = ApplicantFilter::from_parts(Some("MEERA"), None, None).unwrap();
        let by_phone = ApplicantFilter::from_parts(Some("91234"), None, None).unwrap();
        assert_eq!(v.filtered(&by_name)[0].full_name, "Meera Nair");
        assert_eq!(v.filtered(&by_phone)[0].full_name, "Ravi Kumar");
    }

    #[test]
    fn status_and_city_filters_combine() {
        let v = view(vec![
            applicant("A", "1", "Pune", ApplicationStatus::Hired),
            applicant("B", "2", "Pune", ApplicationStatus::New),
            applicant("C", "3", "Delhi", ApplicationStatus::Hired),
        ]);
        let f = ApplicantFilter::from_parts(None, Some("Hired"), Some("Pune")).unwrap();
        let names: Vec<_> = v.filtered(&f).iter().map(|a| a.full_name.clone()).collect();
        assert_eq!(names, vec!["A"]);
    }

    #[test]
    fn pagination_reports_totals() {
        let v = view(
            (0..23)
                .map(|i| applicant(&format!("P{}", i), "0", "Pune", ApplicationStatus::New))
                .collect(),
        );
        let all = ApplicantFilter::default();
        let third = v.page(&all, Some(3), None);
        assert_eq!(third.total, 23);
        assert_eq!(third.total_pages, 3);
        assert_eq!(third.items.len(), 3);
        assert!(v.page(&all, Some(9), None).items.is_empty());
        assert_eq!(v.page(&all, Some(0), Some(1000)).per_page, MAX_PER_PAGE);
    }

    #[test]
    fn huge_page_number_is_an_empty_page() {
        let v = view(vec![applicant("A", "1", "Pune", ApplicationStatus::New)]);
        let page = v.page(&ApplicantFilter::default(), Some(usize::MAX), Some(2));
        assert!(page.items.is_empty());
        assert_eq!(page.page, usize::MAX);
        assert_eq!(page.total, 1);
    }

    #[test]
    fn cities_are_distinct_and_sorted() {
        let v = view(vec![
            applicant("A", "1", "Pune", ApplicationStatus::New),
            applicant("B", "2", "", ApplicationStatus::New),
            applicant("C", "3", "Delhi", ApplicationStatus::New),
            applicant("D", "4", "Pune", ApplicationStatus::New),
        ]);
        assert_eq!(v.cities(), vec!["Delhi", "Pune"]);
    }

    #[test]
    fn listed_city_matches_padded_stored_value() {
        let v = view(vec![
            applicant("A", "1", "  Pune ", ApplicationStatus::New),
            applicant("B", "2", "Delhi", ApplicationStatus::New),
        ]);
        let city = v.cities()[1].clone();
        assert_eq!(city, "Pune");
        let f = ApplicantFilter::from_parts(None, None, Some(&city)).unwrap();
        let names: Vec<_> = v.filtered(&f).iter().map(|a| a.full_name.clone()).collect();
        assert_eq!(names, vec!["A"]);
    }
}
