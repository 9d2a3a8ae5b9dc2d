use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::auth::Role;
use crate::models::reference::Reference;
use crate::services::identity_service::SignedIn;

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CredentialsRequest {
    #[validate(length(min = 1))]
    pub email: String,
    #[validate(length(min = 1))]
    pub password: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReferenceProfile {
    pub id: String,
    pub name: String,
    pub email: String,
    pub target: Option<f64>,
}

impl From<Reference> for ReferenceProfile {
    fn from(r: Reference) -> Self {
        Self {
            id: r.id,
            name: r.name,
            email: r.email,
            target: r.target,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct LoginResponse {
    pub token: String,
    pub expires_at: DateTime<Utc>,
    pub role: Role,
    pub uid: String,
    pub email: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reference: Option<ReferenceProfile>,
}

impl From<SignedIn> for LoginResponse {
    fn from(s: SignedIn) -> Self {
        Self {
            token: s.session.token,
            expires_at: s.session.expires_at,
            role: s.role,
            uid: s.identity.uid,
            email: s.identity.email,
            reference: s.reference.map(ReferenceProfile::from),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct SessionResponse {
    pub uid: String,
    pub email: String,
    pub role: Role,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reference: Option<ReferenceProfile>,
}
