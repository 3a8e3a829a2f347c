//! Password hashing, credential verification and registration

use crate::auth::models::UserIdentity;
use crate::error::{AuthFailure, Error, Result};
use crate::store::{NewUser, SharedStore};

/// Checks username/password pairs against the hashes in the store
#[derive(Clone)]
pub struct CredentialVerifier {
    store: SharedStore,
    cost: u32,
    /// Verified against when the username is unknown, so both paths do the same work
    dummy_hash: String,
}

impl CredentialVerifier {
    pub fn new(store: SharedStore, cost: u32) -> Result<Self> {
        let dummy_hash = bcrypt::hash(uuid::Uuid::new_v4().to_string(), cost)
            .map_err(|e| Error::Config(format!("Invalid bcrypt cost {}: {}", cost, e)))?;

        Ok(Self {
            store,
            cost,
            dummy_hash,
        })
    }

    /// Hash a plaintext password the way `verify` expects to find it
    pub async fn hash_password(&self, password: &str) -> Result<String> {
        let password = password.to_string();
        let cost = self.cost;
        let hashed = tokio::task::spawn_blocking(move || bcrypt::hash(password, cost)).await??;
        Ok(hashed)
    }

    /// Verify a login attempt
    pub async fn verify(&self, username: &str, password: &str) -> Result<UserIdentity> {
        let user = self.store.find_user(username).await?;

        let (hash, identity) = match &user {
            Some(user) => (user.hashed_password.clone(), Some(UserIdentity::from(user))),
            None => (self.dummy_hash.clone(), None),
        };

        let password = password.to_string();
        let matches = tokio::task::spawn_blocking(move || bcrypt::verify(password, &hash)).await??;

        match identity {
            None => {
                tracing::debug!("Login attempt for unknown user: {}", username);
                Err(AuthFailure::NotFound.into())
            }
            Some(identity) if matches => Ok(identity),
            Some(_) => {
                tracing::warn!("Failed login attempt: {}", username);
                Err(AuthFailure::BadCredential.into())
            }
        }
    }

    /// Create a user whose password is hashed with the verifier's scheme
    pub async fn register(&self, username: &str, password: &str) -> Result<UserIdentity> {
        let hashed_password = self.hash_password(password).await?;
        let user = self
            .store
            .create_user(NewUser {
                username: username.to_string(),
                hashed_password,
            })
            .await?;
        Ok(UserIdentity::from(&user))
    }
}
