//! Credential store seam.
//!
//! Each trait is one narrow capability so services only depend on what they
//! call. `PgStore` implements all of them; tests use `MemoryStore`.

use async_trait::async_trait;
use thiserror::Error;

use crate::{profiles::repo_types::Profile, users::repo_types::User};

#[cfg(test)]
pub mod memory;
pub mod postgres;

pub use postgres::PgStore;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("record not found")]
    NotFound,

    #[error("record already exists")]
    AlreadyExists,

    #[error(transparent)]
    Database(#[from] sqlx::Error),
}

#[async_trait]
pub trait UserProvider: Send + Sync {
    async fn user_by_email(&self, email: &str) -> Result<User, StoreError>;
    async fn user_by_id(&self, id: i64) -> Result<User, StoreError>;
}

#[async_trait]
pub trait UserSaver: Send + Sync {
    /// Fails with `AlreadyExists` when the email is taken.
    async fn create_user(&self, email: &str, password_hash: &str) -> Result<User, StoreError>;
}

#[async_trait]
pub trait ProfileProvider: Send + Sync {
    async fn profile_by_id(&self, user_id: i64) -> Result<Profile, StoreError>;

    /// Creates or replaces the profile. `NotFound` when the user is gone.
    async fn save_profile(
        &self,
        user_id: i64,
        first_name: &str,
        last_name: &str,
        phone: &str,
    ) -> Result<Profile, StoreError>;
}

#[async_trait]
pub trait ProfileDeleter: Send + Sync {
    async fn delete_profile(&self, user_id: i64) -> Result<(), StoreError>;
}
