use std::sync::Arc;

use thiserror::Error;
use tracing::{error, info, instrument};

use super::repo_types::Profile;
use crate::store::{ProfileDeleter, ProfileProvider, StoreError};

#[derive(Debug, Error)]
pub enum ProfileError {
    #[error("profile not found")]
    NotFound,

    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

pub struct ProfileService {
    profiles: Arc<dyn ProfileProvider>,
    deleter: Arc<dyn ProfileDeleter>,
}

impl ProfileService {
    pub fn new(profiles: Arc<dyn ProfileProvider>, deleter: Arc<dyn ProfileDeleter>) -> Self {
        Self { profiles, deleter }
    }

    #[instrument(skip(self), fields(op = "profiles.get_profile"))]
    pub async fn get_profile(&self, user_id: i64) -> Result<Profile, ProfileError> {
        self.profiles.profile_by_id(user_id).await.map_err(|e| match e {
            StoreError::NotFound => {
                info!("profile not found");
                ProfileError::NotFound
            }
            e => {
                error!(error = %e, "couldn't get the profile");
                ProfileError::Internal(anyhow::Error::new(e).context("profiles.get_profile"))
            }
        })
    }

    #[instrument(skip(self, first_name, last_name, phone), fields(op = "profiles.make_profile"))]
    pub async fn make_profile(
        &self,
        user_id: i64,
        first_name: &str,
        last_name: &str,
        phone: &str,
    ) -> Result<Profile, ProfileError> {
        let profile = self
            .profiles
            .save_profile(user_id, first_name, last_name, phone)
            .await
            .map_err(|e| match e {
                StoreError::NotFound => {
                    info!("user for profile doesn't exist");
                    ProfileError::NotFound
                }
                e => {
                    error!(error = %e, "failed to save profile");
                    ProfileError::Internal(anyhow::Error::new(e).context("profiles.make_profile"))
                }
            })?;
        info!("profile has been saved");
        Ok(profile)
    }

    #[instrument(skip(self), fields(op = "profiles.delete_profile"))]
    pub async fn delete_profile(&self, user_id: i64) -> Result<(), ProfileError> {
        self.deleter.delete_profile(user_id).await.map_err(|e| match e {
            StoreError::NotFound => ProfileError::NotFound,
            e => {
                error!(error = %e, "failed to delete profile");
                ProfileError::Internal(anyhow::Error::new(e).context("profiles.delete_profile"))
            }
        })?;
        info!("profile has been deleted");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::{memory::MemoryStore, UserSaver};

    #[tokio::test]
    async fn profile_lifecycle() {
        let store = Arc::new(MemoryStore::new());
        let user = store.create_user("a@x.com", "hash").await.unwrap();
        let svc = ProfileService::new(store.clone(), store);

        assert!(matches!(svc.get_profile(user.id).await, Err(ProfileError::NotFound)));

        let saved = svc.make_profile(user.id, "Ada", "Lovelace", "123").await.unwrap();
        assert_eq!(saved.user.email, "a@x.com");
        assert_eq!(saved.first_name, "Ada");

        let replaced = svc.make_profile(user.id, "Ada", "King", "456").await.unwrap();
        assert_eq!(replaced.last_name, "King");
        assert_eq!(svc.get_profile(user.id).await.unwrap().phone, "456");

        svc.delete_profile(user.id).await.unwrap();
        assert!(matches!(svc.delete_profile(user.id).await, Err(ProfileError::NotFound)));
    }

    #[tokio::test]
    async fn saving_for_unknown_user_is_not_found() {
        let store = Arc::new(MemoryStore::new());
        let svc = ProfileService::new(store.clone(), store);
        assert!(matches!(
            svc.make_profile(42, "A", "B", "1").await,
            Err(ProfileError::NotFound)
        ));
    }
}
