pub mod auth;
pub mod config;
pub mod database;
pub mod dto;
pub mod error;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;
pub mod store;
pub mod utils;

use std::sync::Arc;

use crate::auth::{AuthProvider, SessionManager};
use crate::config::Config;
use crate::services::{
    identity_service::IdentityService, lifecycle_service::LifecycleService,
    reference_service::ReferenceService,
};
use crate::store::DocumentStore;

/// Settings for the contact links shown next to each applicant.
#[derive(Debug, Clone)]
pub struct ContactSettings {
    pub organization_name: String,
    pub whatsapp_country_code: String,
}

#[derive(Clone)]
pub struct AppState {
    pub sessions: SessionManager,
    pub identity_service: IdentityService,
    pub reference_service: ReferenceService,
    pub lifecycle_service: LifecycleService,
    pub contact: ContactSettings,
    /// Name of the storage backend, reported by the health check.
    pub backend: &'static str,
}

impl AppState {
    pub fn new(
        config: &Config,
        store: Arc<dyn DocumentStore>,
        auth: Arc<dyn AuthProvider>,
        backend: &'static str,
    ) -> Self {
        let sessions = SessionManager::new(config.jwt_secret.clone(), config.session_ttl_hours);
        let reference_service = ReferenceService::new(store.clone());
        let lifecycle_service = LifecycleService::new(store.clone(), reference_service.clone());
        let identity_service = IdentityService::new(
            auth,
            store,
            reference_service.clone(),
            sessions.clone(),
            config.admin_email.clone(),
        );

        Self {
            sessions,
            identity_service,
            reference_service,
            lifecycle_service,
            contact: ContactSettings {
                organization_name: config.organization_name.clone(),
                whatsapp_country_code: config.whatsapp_country_code.clone(),
            },
            backend,
        }
    }
}
