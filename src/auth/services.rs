use std::sync::Arc;

use anyhow::Context;
use thiserror::Error;
use tracing::{error, info, instrument, warn};

use super::{
    jwt::JwtKeys,
    password::{PasswordError, PasswordHasher},
};
use crate::{
    store::{StoreError, UserProvider, UserSaver},
    users::repo_types::User,
};

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("invalid credentials")]
    InvalidCredentials,

    #[error("email is already taken")]
    EmailExists,

    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

/// Access and refresh token issued together by a successful login.
#[derive(Debug, Clone)]
pub struct TokenPair {
    pub access: String,
    pub refresh: String,
}

pub struct AuthService {
    users: Arc<dyn UserProvider>,
    saver: Arc<dyn UserSaver>,
    hasher: PasswordHasher,
    keys: JwtKeys,
}

impl AuthService {
    pub fn new(
        users: Arc<dyn UserProvider>,
        saver: Arc<dyn UserSaver>,
        hasher: PasswordHasher,
        keys: JwtKeys,
    ) -> Self {
        Self {
            users,
            saver,
            hasher,
            keys,
        }
    }

    /// Verifies the credentials and issues a fresh token pair.
    ///
    /// Unknown email and wrong password are the same `InvalidCredentials`.
    #[instrument(skip_all, fields(op = "auth.login"))]
    pub async fn login(&self, email: &str, password: &str) -> Result<TokenPair, AuthError> {
        let user = match self.users.user_by_email(email).await {
            Ok(u) => u,
            Err(StoreError::NotFound) => {
                warn!("user doesn't exist");
                return Err(AuthError::InvalidCredentials);
            }
            Err(e) => {
                error!(error = %e, "failed to get user");
                return Err(anyhow::Error::new(e).context("auth.login: user by email").into());
            }
        };

        match self.verify_password(&user.password_hash, password).await {
            Ok(()) => {}
            Err(PasswordError::Mismatch) => {
                warn!(user_id = user.id, "invalid credentials");
                return Err(AuthError::InvalidCredentials);
            }
            Err(e) => {
                error!(user_id = user.id, error = %e, "failed to compare passwords");
                return Err(anyhow::Error::new(e).context("auth.login: verify password").into());
            }
        }

        let access = self
            .keys
            .sign_access(&user)
            .context("auth.login: sign access token")?;
        let refresh = self
            .keys
            .sign_refresh(&user)
            .context("auth.login: sign refresh token")?;

        info!(user_id = user.id, "user logged in");
        Ok(TokenPair { access, refresh })
    }

    /// Creates the account. Password policy is the caller's job.
    #[instrument(skip_all, fields(op = "auth.signup"))]
    pub async fn signup(&self, email: &str, password: &str) -> Result<User, AuthError> {
        let hash = self.hash_password(password).await.map_err(|e| {
            error!(error = %e, "failed to hash password");
            anyhow::Error::new(e).context("auth.signup: hash password")
        })?;

        let user = match self.saver.create_user(email, &hash).await {
            Ok(u) => u,
            Err(StoreError::AlreadyExists) => {
                info!("email is taken");
                return Err(AuthError::EmailExists);
            }
            Err(e) => {
                error!(error = %e, "couldn't save the user");
                return Err(anyhow::Error::new(e).context("auth.signup: create user").into());
            }
        };

        info!(user_id = user.id, "user has been created");
        Ok(user)
    }

    async fn hash_password(&self, plain: &str) -> Result<String, PasswordError> {
        let hasher = self.hasher.clone();
        let plain = plain.to_owned();
        tokio::task::spawn_blocking(move || hasher.hash(&plain))
            .await
            .map_err(|e| PasswordError::Hashing(format!("hashing task failed: {e}")))?
    }

    async fn verify_password(&self, hash: &str, plain: &str) -> Result<(), PasswordError> {
        let hasher = self.hasher.clone();
        let (hash, plain) = (hash.to_owned(), plain.to_owned());
        tokio::task::spawn_blocking(move || hasher.verify(&hash, &plain))
            .await
            .map_err(|e| PasswordError::Hashing(format!("verify task failed: {e}")))?
    }
}
