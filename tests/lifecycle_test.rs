mod common;

use referral_recruitment::{
    models::applicant::ApplicationStatus,
    services::{dashboard::DashboardView, lifecycle_service::Scope},
};

use common::spawn_app;

#[tokio::test]
async fn setting_the_same_status_twice_is_idempotent() {
    let app = spawn_app();
    let id = app.submit("Asha", "Hyderabad", "Priya").await;
    let lifecycle = &app.state.lifecycle_service;

    let first = lifecycle
        .set_status(&Scope::All, &id, ApplicationStatus::Shortlisted)
        .await
        .unwrap();
    let second = lifecycle
        .set_status(&Scope::All, &id, ApplicationStatus::Shortlisted)
        .await
        .unwrap();
    assert_eq!(first, second);
    let stored = lifecycle.get_applicant(&Scope::All, &id).await.unwrap();
    assert_eq!(stored.status, ApplicationStatus::Shortlisted);
    assert!(!stored.registration_completed);
}

#[tokio::test]
async fn concurrent_status_writes_leave_one_of_them() {
    let app = spawn_app();
    let id = app.submit("Asha", "Hyderabad", "Priya").await;
    let lifecycle = &app.state.lifecycle_service;

    let (hired, rejected) = tokio::join!(
        lifecycle.set_status(&Scope::All, &id, ApplicationStatus::Hired),
        lifecycle.set_status(&Scope::All, &id, ApplicationStatus::Rejected),
    );
    assert!(hired.is_ok());
    assert!(rejected.is_ok());

    let stored = lifecycle.get_applicant(&Scope::All, &id).await.unwrap();
    assert!(matches!(
        stored.status,
        ApplicationStatus::Hired | ApplicationStatus::Rejected
    ));
}

#[tokio::test]
async fn status_and_registration_are_independent() {
    let app = spawn_app();
    let id = app.submit("Asha", "Hyderabad", "Priya").await;
    let lifecycle = &app.state.lifecycle_service;

    lifecycle
        .set_status(&Scope::All, &id, ApplicationStatus::Rejected)
        .await
        .unwrap();
    lifecycle
        .set_registration_completed(&Scope::All, &id, true)
        .await
        .unwrap();

    let stored = lifecycle.get_applicant(&Scope::All, &id).await.unwrap();
    assert_eq!(stored.status, ApplicationStatus::Rejected);
    assert!(stored.registration_completed);
}

#[tokio::test]
async fn dashboard_applies_updates_locally_then_picks_up_other_writers() {
    let app = spawn_app();
    let asha = app.submit("Asha", "Hyderabad", "Priya").await;
    let bhavna = app.submit("Bhavna", "Pune", "Priya").await;
    let lifecycle = &app.state.lifecycle_service;

    let mut view = DashboardView::load(lifecycle, Scope::All).await.unwrap();
    view.set_status(lifecycle, &asha, ApplicationStatus::Hired)
        .await
        .unwrap();
    let local = view.applicants().iter().find(|a| a.id == asha).unwrap();
    assert_eq!(local.status, ApplicationStatus::Hired);

    // Another reviewer changes a record this view has not touched.
    lifecycle
        .set_registration_completed(&Scope::All, &bhavna, true)
        .await
        .unwrap();
    let stale = view.applicants().iter().find(|a| a.id == bhavna).unwrap();
    assert!(!stale.registration_completed);

    view.refresh(lifecycle).await.unwrap();
    let fresh = view.applicants().iter().find(|a| a.id == bhavna).unwrap();
    assert!(fresh.registration_completed);
    assert_eq!(view.stats(None, referral_recruitment::utils::time::now()).hired, 1);
}

#[test]
fn missing_applicant_is_not_found() {
    let app = spawn_app();
    let result = tokio_test::block_on(
        app.state
            .lifecycle_service
            .set_status(&Scope::All, "missing", ApplicationStatus::Hired),
    );
    assert!(matches!(
        result,
        Err(referral_recruitment::error::Error::NotFound(_))
    ));
}
