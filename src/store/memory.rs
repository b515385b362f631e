use std::collections::HashMap;

use async_trait::async_trait;
use time::OffsetDateTime;
use tokio::sync::Mutex;

use super::{ProfileDeleter, ProfileProvider, StoreError, UserProvider, UserSaver};
use crate::{profiles::repo_types::Profile, users::repo_types::User};

#[derive(Default)]
struct Inner {
    next_id: i64,
    users: Vec<User>,
    profiles: HashMap<i64, (String, String, String)>,
}

/// In-process store backing the test suite.
#[derive(Default)]
pub struct MemoryStore {
    inner: Mutex<Inner>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Drops a user and its profile, like an account removal would.
    pub async fn remove_user(&self, email: &str) {
        let mut inner = self.inner.lock().await;
        if let Some(pos) = inner.users.iter().position(|u| u.email == email) {
            let user = inner.users.remove(pos);
            inner.profiles.remove(&user.id);
        }
    }

    pub async fn user_count(&self) -> usize {
        self.inner.lock().await.users.len()
    }
}

#[async_trait]
impl UserProvider for MemoryStore {
    async fn user_by_email(&self, email: &str) -> Result<User, StoreError> {
        let inner = self.inner.lock().await;
        inner
            .users
            .iter()
            .find(|u| u.email == email)
            .cloned()
            .ok_or(StoreError::NotFound)
    }

    async fn user_by_id(&self, id: i64) -> Result<User, StoreError> {
        let inner = self.inner.lock().await;
        inner
            .users
            .iter()
            .find(|u| u.id == id)
            .cloned()
            .ok_or(StoreError::NotFound)
    }
}

#[async_trait]
impl UserSaver for MemoryStore {
    async fn create_user(&self, email: &str, password_hash: &str) -> Result<User, StoreError> {
        let mut inner = self.inner.lock().await;
        if inner.users.iter().any(|u| u.email == email) {
            return Err(StoreError::AlreadyExists);
        }
        inner.next_id += 1;
        let now = OffsetDateTime::now_utc();
        let user = User {
            id: inner.next_id,
            email: email.to_string(),
            password_hash: password_hash.to_string(),
            created_at: now,
            updated_at: now,
            is_active: true,
        };
        inner.users.push(user.clone());
        Ok(user)
    }
}

#[async_trait]
impl ProfileProvider for MemoryStore {
    async fn profile_by_id(&self, user_id: i64) -> Result<Profile, StoreError> {
        let inner = self.inner.lock().await;
        let (first_name, last_name, phone) =
            inner.profiles.get(&user_id).cloned().ok_or(StoreError::NotFound)?;
        let user = inner
            .users
            .iter()
            .find(|u| u.id == user_id)
            .cloned()
            .ok_or(StoreError::NotFound)?;
        Ok(Profile {
            user,
            first_name,
            last_name,
            phone,
            picture: String::new(),
        })
    }

    async fn save_profile(
        &self,
        user_id: i64,
        first_name: &str,
        last_name: &str,
        phone: &str,
    ) -> Result<Profile, StoreError> {
        {
            let mut inner = self.inner.lock().await;
            if !inner.users.iter().any(|u| u.id == user_id) {
                return Err(StoreError::NotFound);
            }
            inner.profiles.insert(
                user_id,
                (first_name.to_string(), last_name.to_string(), phone.to_string()),
            );
        }
        self.profile_by_id(user_id).await
    }
}

#[async_trait]
impl ProfileDeleter for MemoryStore {
    async fn delete_profile(&self, user_id: i64) -> Result<(), StoreError> {
        let mut inner = self.inner.lock().await;
        inner
            .profiles
            .remove(&user_id)
            .map(|_| ())
            .ok_or(StoreError::NotFound)
    }
}
