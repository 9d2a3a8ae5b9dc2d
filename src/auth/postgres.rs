use async_trait::async_trait;
use sqlx::{FromRow, PgPool};

use super::{AuthError, AuthProvider, Identity};
use crate::utils::crypto::{hash_secret, is_weak_secret, verify_secret};
use crate::utils::token::generate_uid;

#[derive(Clone)]
pub struct PgAuthProvider {
    pool: PgPool,
}

#[derive(FromRow)]
struct AccountRow {
    uid: String,
    email: String,
    password_hash: String,
}

impl PgAuthProvider {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Creates an account under a caller-chosen uid. Used for provisioning
    /// reference partners, whose uid doubles as their directory id.
    pub async fn insert_account(&self, uid: &str, email: &str, secret: &str) -> Result<Identity, AuthError> {
        if is_weak_secret(secret) {
            return Err(AuthError::WeakSecret);
        }
        let password_hash = hash_secret(secret)?;
        let inserted = sqlx::query(
            r#"
            INSERT INTO auth_accounts (uid, email, password_hash)
            VALUES ($1, $2, $3)
            ON CONFLICT (email) DO NOTHING
            "#,
        )
        .bind(uid)
        .bind(email)
        .bind(password_hash)
        .execute(&self.pool)
        .await?;

        if inserted.rows_affected() == 0 {
            return Err(AuthError::EmailAlreadyInUse);
        }
        Ok(Identity {
            uid: uid.to_string(),
            email: email.to_string(),
        })
    }
}

#[async_trait]
impl AuthProvider for PgAuthProvider {
    async fn sign_in(&self, email: &str, secret: &str) -> Result<Identity, AuthError> {
        let account = sqlx::query_as::<_, AccountRow>(
            "SELECT uid, email, password_hash FROM auth_accounts WHERE email = $1",
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await?
        .ok_or(AuthError::AccountNotFound)?;

        if !verify_secret(secret, &account.password_hash)? {
            return Err(AuthError::InvalidCredential);
        }
        Ok(Identity {
            uid: account.uid,
            email: account.email,
        })
    }

    async fn create_account(&self, email: &str, secret: &str) -> Result<Identity, AuthError> {
        self.insert_account(&generate_uid(), email, secret).await
    }
}
