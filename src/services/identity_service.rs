use std::sync::Arc;

use crate::auth::session::Session;
use crate::auth::{AuthError, AuthProvider, Identity, Role, SessionClaims, SessionManager};
use crate::error::{Error, Result};
use crate::models::admin_user::AdminLogin;
use crate::models::reference::Reference;
use crate::services::reference_service::ReferenceService;
use crate::store::{to_fields, DocumentStore, ADMIN_USERS};
use crate::utils::{crypto::is_weak_secret, time};

/// Role granted to an authenticated identity.
#[derive(Debug, Clone, PartialEq)]
pub enum ResolvedRole {
    Admin,
    Reference(Reference),
}

#[derive(Debug, Clone)]
pub struct SignedIn {
    pub identity: Identity,
    pub role: Role,
    pub session: Session,
    pub reference: Option<Reference>,
}

#[derive(Debug, Clone)]
pub struct RestoredSession {
    pub claims: SessionClaims,
    pub reference: Option<Reference>,
}

/// Authenticates callers and maps them to the admin or reference role.
#[derive(Clone)]
pub struct IdentityService {
    auth: Arc<dyn AuthProvider>,
    store: Arc<dyn DocumentStore>,
    references: ReferenceService,
    sessions: SessionManager,
    admin_email: String,
}

impl IdentityService {
    pub fn new(
        auth: Arc<dyn AuthProvider>,
        store: Arc<dyn DocumentStore>,
        references: ReferenceService,
        sessions: SessionManager,
        admin_email: impl Into<String>,
    ) -> Self {
        Self {
            auth,
            store,
            references,
            sessions,
            admin_email: admin_email.into(),
        }
    }

    pub fn is_admin_email(&self, email: &str) -> bool {
        email == self.admin_email
    }

    pub async fn resolve_role(&self, identity: &Identity) -> Result<Option<ResolvedRole>> {
        if self.is_admin_email(&identity.email) {
            return Ok(Some(ResolvedRole::Admin));
        }
        Ok(self
            .references
            .get_reference(&identity.uid)
            .await?
            .map(ResolvedRole::Reference))
    }

    async fn authenticate(&self, email: &str, secret: &str) -> Result<Identity> {
        self.auth.sign_in(email, secret).await.map_err(|e| {
            tracing::warn!(email, error = %e, "sign-in failed");
            Error::Auth(e)
        })
    }

    pub async fn admin_sign_in(&self, email: &str, secret: &str) -> Result<SignedIn> {
        let identity = self.authenticate(email, secret).await?;
        match self.resolve_role(&identity).await? {
            Some(ResolvedRole::Admin) => {
                self.record_admin_login(&identity).await?;
                let session = self.sessions.issue(&identity, Role::Admin)?;
                tracing::info!(uid = %identity.uid, "admin signed in");
                Ok(SignedIn {
                    identity,
                    role: Role::Admin,
                    session,
                    reference: None,
                })
            }
            _ => {
                tracing::warn!(email, "authenticated user is not the administrator");
                Err(Error::Forbidden("not_authorized_for_admin".into()))
            }
        }
    }

    pub async fn reference_sign_in(&self, email: &str, secret: &str) -> Result<SignedIn> {
        let identity = self.authenticate(email, secret).await?;
        match self.resolve_role(&identity).await? {
            Some(ResolvedRole::Reference(reference)) => {
                let session = self.sessions.issue(&identity, Role::Reference)?;
                tracing::info!(uid = %identity.uid, "reference signed in");
                Ok(SignedIn {
                    identity,
                    role: Role::Reference,
                    session,
                    reference: Some(reference),
                })
            }
            _ => {
                tracing::warn!(email, "authenticated user has no reference record");
                Err(Error::Forbidden("not_a_reference".into()))
            }
        }
    }

    /// Creates the administrator account and signs it in. Only the configured
    /// admin address may be created here.
    pub async fn create_admin_account(&self, email: &str, secret: &str) -> Result<SignedIn> {
        if email.trim().is_empty() || secret.is_empty() {
            return Err(Error::BadRequest(
                "Please enter both email and password to create admin account".into(),
            ));
        }
        if !self.is_admin_email(email) {
            return Err(Error::Forbidden(format!(
                "Only {} can be set as admin",
                self.admin_email
            )));
        }
        if is_weak_secret(secret) {
            return Err(Error::Auth(AuthError::WeakSecret));
        }

        let identity = self.auth.create_account(email, secret).await.map_err(|e| {
            tracing::error!(error = %e, "admin account creation failed");
            Error::Auth(e)
        })?;
        self.record_admin_login(&identity).await?;
        let session = self.sessions.issue(&identity, Role::Admin)?;
        tracing::info!(uid = %identity.uid, "admin account created");

        Ok(SignedIn {
            identity,
            role: Role::Admin,
            session,
            reference: None,
        })
    }

    /// Merge-upserts the admin record; `createdAt` is only written the first time.
    async fn record_admin_login(&self, identity: &Identity) -> Result<()> {
        let now = time::now();
        let existing = self.store.get_document(ADMIN_USERS, &identity.uid).await?;
        let record = AdminLogin {
            uid: identity.uid.clone(),
            email: identity.email.clone(),
            role: Role::Admin.as_str(),
            last_login: now,
            created_at: existing.is_none().then_some(now),
        };
        self.store
            .set_document(ADMIN_USERS, &identity.uid, to_fields(&record)?, true)
            .await?;
        Ok(())
    }

    /// Confirms the session's holder still has its role: the admin email is
    /// unchanged, or the reference still has a directory entry. Returns that
    /// entry for references.
    pub async fn ensure_active(&self, claims: &SessionClaims) -> Result<Option<Reference>> {
        match claims.role {
            Role::Admin => {
                if !self.is_admin_email(&claims.email) {
                    return Err(Error::Unauthorized("session_no_longer_valid".into()));
                }
                Ok(None)
            }
            Role::Reference => match self.references.get_reference(&claims.sub).await? {
                Some(reference) => Ok(Some(reference)),
                None => {
                    tracing::warn!(uid = %claims.sub, "reference session without directory entry");
                    Err(Error::Unauthorized("session_no_longer_valid".into()))
                }
            },
        }
    }

    /// Re-validates a presented token and the holder's standing, so a removed
    /// partner loses access.
    pub async fn restore_session(&self, token: &str) -> Result<RestoredSession> {
        let claims = self.sessions.restore(token)?;
        let reference = self.ensure_active(&claims).await?;
        Ok(RestoredSession { claims, reference })
    }

    pub fn sign_out(&self, claims: &SessionClaims) {
        self.sessions.sign_out(claims);
        tracing::info!(uid = %claims.sub, "signed out");
    }
}
