use std::sync::Arc;

use serde::Deserialize;

use crate::auth::password::{hash_password, verify_password};
use crate::auth::JwtKeys;
use crate::database::models::UserAccount;
use crate::database::{StoreError, UserStore};
use crate::services::ServiceError;

/// Register / login request body
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Credentials {
    pub username: Option<String>,
    pub password: Option<String>,
}

impl Credentials {
    /// Both fields present and non-blank, username trimmed
    fn required(self) -> Result<(String, String), ServiceError> {
        match (self.username, self.password) {
            (Some(username), Some(password)) if !username.trim().is_empty() && !password.is_empty() => {
                Ok((username.trim().to_string(), password))
            }
            _ => Err(ServiceError::InvalidInput(
                "username and password are required.".to_string(),
            )),
        }
    }
}

#[derive(Clone)]
pub struct UserService {
    store: Arc<dyn UserStore>,
    keys: JwtKeys,
}

impl UserService {
    pub fn new(store: Arc<dyn UserStore>, keys: JwtKeys) -> Self {
        Self { store, keys }
    }

    pub async fn register(&self, credentials: Credentials) -> Result<UserAccount, ServiceError> {
        let (username, password) = credentials.required()?;

        if self.store.find_by_username(&username).await?.is_some() {
            return Err(ServiceError::Conflict("Username already exists".to_string()));
        }

        // Hashing runs on the blocking pool
        let hash = tokio::task::spawn_blocking(move || hash_password(&password))
            .await
            .map_err(|e| ServiceError::Credential(e.to_string()))?
            .map_err(|e| ServiceError::Credential(e.to_string()))?;

        let account = self
            .store
            .insert_user(&username, &hash)
            .await
            .map_err(|e| match e {
                StoreError::Duplicate(_) => ServiceError::Conflict("Username already exists".to_string()),
                other => other.into(),
            })?;

        tracing::info!(user_id = %account.id, username = %account.username, "User registered");
        Ok(account)
    }

    /// Returns a signed token for valid credentials
    pub async fn login(&self, credentials: Credentials) -> Result<String, ServiceError> {
        let (username, password) = credentials.required()?;

        let Some(account) = self.store.find_by_username(&username).await? else {
            tracing::debug!(%username, "Login for unknown user");
            return Err(invalid_credentials());
        };

        let stored = account.password.clone();
        let matches = tokio::task::spawn_blocking(move || verify_password(&password, &stored))
            .await
            .map_err(|e| ServiceError::Credential(e.to_string()))?
            .map_err(|e| ServiceError::Credential(e.to_string()))?;

        if !matches {
            tracing::warn!(%username, "Login with wrong password");
            return Err(invalid_credentials());
        }

        let token = self
            .keys
            .issue(&account.username, account.id)
            .map_err(|e| ServiceError::Credential(e.to_string()))?;
        tracing::info!(user_id = %account.id, "User logged in");
        Ok(token)
    }
}

fn invalid_credentials() -> ServiceError {
    ServiceError::Unauthorized("Invalid credentials".to_string())
}
