//! Authentication provider seam and session handling.

pub mod memory;
pub mod postgres;
pub mod session;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

pub use memory::MemoryAuthProvider;
pub use postgres::PgAuthProvider;
pub use session::{IdentityEvent, SessionClaims, SessionManager};

#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    #[error("invalid credentials")]
    InvalidCredential,

    #[error("no account exists for this email")]
    AccountNotFound,

    #[error("an account already exists for this email")]
    EmailAlreadyInUse,

    #[error("secret is too short")]
    WeakSecret,

    #[error("{0}")]
    Provider(String),
}

impl From<sqlx::Error> for AuthError {
    fn from(err: sqlx::Error) -> Self {
        AuthError::Provider(err.to_string())
    }
}

impl From<argon2::password_hash::Error> for AuthError {
    fn from(err: argon2::password_hash::Error) -> Self {
        AuthError::Provider(err.to_string())
    }
}

/// An authenticated principal as reported by the provider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity {
    pub uid: String,
    pub email: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Admin,
    Reference,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Admin => "admin",
            Role::Reference => "reference",
        }
    }
}

#[async_trait]
pub trait AuthProvider: Send + Sync {
    async fn sign_in(&self, email: &str, secret: &str) -> Result<Identity, AuthError>;

    async fn create_account(&self, email: &str, secret: &str) -> Result<Identity, AuthError>;
}
