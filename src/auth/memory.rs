use std::collections::{hash_map::Entry, HashMap};
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;

use super::{AuthError, AuthProvider, Identity};
use crate::utils::crypto::{hash_secret, is_weak_secret, verify_secret};
use crate::utils::token::generate_uid;

#[derive(Clone)]
struct Account {
    uid: String,
    password_hash: String,
}

/// Accounts keyed by email, held in process memory.
#[derive(Clone, Default)]
pub struct MemoryAuthProvider {
    accounts: Arc<RwLock<HashMap<String, Account>>>,
}

impl MemoryAuthProvider {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers an account under a caller-chosen uid, as out-of-band
    /// provisioning of reference partners does. An email is registered at
    /// most once.
    pub async fn insert_account(&self, uid: &str, email: &str, secret: &str) -> Result<Identity, AuthError> {
        let password_hash = hash_secret(secret)?;
        match self.accounts.write().await.entry(email.to_string()) {
            Entry::Occupied(_) => Err(AuthError::EmailAlreadyInUse),
            Entry::Vacant(slot) => {
                slot.insert(Account {
                    uid: uid.to_string(),
                    password_hash,
                });
                Ok(Identity {
                    uid: uid.to_string(),
                    email: email.to_string(),
                })
            }
        }
    }
}

#[async_trait]
impl AuthProvider for MemoryAuthProvider {
    async fn sign_in(&self, email: &str, secret: &str) -> Result<Identity, AuthError> {
        let account = self
            .accounts
            .read()
            .await
            .get(email)
            .cloned()
            .ok_or(AuthError::AccountNotFound)?;

        if !verify_secret(secret, &account.password_hash)? {
            return Err(AuthError::InvalidCredential);
        }
        Ok(Identity {
            uid: account.uid,
            email: email.to_string(),
        })
    }

    async fn create_account(&self, email: &str, secret: &str) -> Result<Identity, AuthError> {
        if is_weak_secret(secret) {
            return Err(AuthError::WeakSecret);
        }
        self.insert_account(&generate_uid(), email, secret).await
    }
}
