use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;

use super::{Identity, Role};
use crate::error::{Error, Result};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionClaims {
    pub sub: String,
    pub email: String,
    pub role: Role,
    pub jti: String,
    pub iat: usize,
    pub exp: usize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IdentityEvent {
    SignedIn { uid: String, role: Role },
    SignedOut { uid: String },
    SessionRestored { uid: String, role: Role },
}

#[derive(Debug, Clone, Serialize)]
pub struct Session {
    pub token: String,
    pub expires_at: DateTime<Utc>,
}

/// Issues and checks bearer session tokens. Signing out revokes the token id
/// until the token would have expired anyway.
#[derive(Clone)]
pub struct SessionManager {
    secret: Arc<String>,
    ttl: Duration,
    revoked: Arc<Mutex<HashMap<String, usize>>>,
    events: broadcast::Sender<IdentityEvent>,
}

impl SessionManager {
    pub fn new(secret: impl Into<String>, ttl_hours: i64) -> Self {
        let (events, _) = broadcast::channel(64);
        Self {
            secret: Arc::new(secret.into()),
            ttl: Duration::hours(ttl_hours.max(1)),
            revoked: Arc::new(Mutex::new(HashMap::new())),
            events,
        }
    }

    /// Subscribes to sign-in, sign-out and session-restore notifications.
    pub fn on_identity_change(&self) -> broadcast::Receiver<IdentityEvent> {
        self.events.subscribe()
    }

    fn emit(&self, event: IdentityEvent) {
        // No subscribers is fine.
        let _ = self.events.send(event);
    }

    pub fn issue(&self, identity: &Identity, role: Role) -> Result<Session> {
        let now = Utc::now();
        let expires_at = now + self.ttl;
        let claims = SessionClaims {
            sub: identity.uid.clone(),
            email: identity.email.clone(),
            role,
            jti: uuid::Uuid::new_v4().to_string(),
            iat: now.timestamp() as usize,
            exp: expires_at.timestamp() as usize,
        };
        let token = encode(
            &Header::new(Algorithm::HS256),
            &claims,
            &EncodingKey::from_secret(self.secret.as_bytes()),
        )
        .map_err(|e| Error::Internal(format!("Failed to sign session: {}", e)))?;

        self.emit(IdentityEvent::SignedIn {
            uid: identity.uid.clone(),
            role,
        });
        Ok(Session { token, expires_at })
    }

    pub fn verify(&self, token: &str) -> Result<SessionClaims> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = true;
        let data = decode::<SessionClaims>(
            token,
            &DecodingKey::from_secret(self.secret.as_bytes()),
            &validation,
        )
        .map_err(|_| Error::Unauthorized("invalid_token".to_string()))?;

        let revoked = self.revoked.lock().expect("session revocation mutex poisoned");
        if revoked.contains_key(&data.claims.jti) {
            return Err(Error::Unauthorized("session_revoked".to_string()));
        }
        Ok(data.claims)
    }

    /// Verifies a presented token and announces the restored session.
    pub fn restore(&self, token: &str) -> Result<SessionClaims> {
        let claims = self.verify(token)?;
        self.emit(IdentityEvent::SessionRestored {
            uid: claims.sub.clone(),
            role: claims.role,
        });
        Ok(claims)
    }

    pub fn sign_out(&self, claims: &SessionClaims) {
        let now = Utc::now().timestamp() as usize;
        {
            let mut revoked = self.revoked.lock().expect("session revocation mutex poisoned");
            revoked.retain(|_, exp| *exp > now);
            revoked.insert(claims.jti.clone(), claims.exp);
        }
        self.emit(IdentityEvent::SignedOut {
            uid: claims.sub.clone(),
        });
    }
}
