use std::sync::Arc;

use thiserror::Error;
use tracing::{error, info, instrument};

use super::repo_types::User;
use crate::store::{StoreError, UserProvider};

#[derive(Debug, Error)]
pub enum UserError {
    #[error("user not found")]
    NotFound,

    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

pub struct UserService {
    users: Arc<dyn UserProvider>,
}

impl UserService {
    pub fn new(users: Arc<dyn UserProvider>) -> Self {
        Self { users }
    }

    #[instrument(skip(self), fields(op = "users.get_user"))]
    pub async fn get_user(&self, id: i64) -> Result<User, UserError> {
        self.users.user_by_id(id).await.map_err(|e| match e {
            StoreError::NotFound => {
                info!(user_id = id, "user not found");
                UserError::NotFound
            }
            e => {
                error!(error = %e, "couldn't get the user");
                UserError::Internal(anyhow::Error::new(e).context("users.get_user"))
            }
        })
    }

    #[instrument(skip_all, fields(op = "users.get_user_by_email"))]
    pub async fn get_user_by_email(&self, email: &str) -> Result<User, UserError> {
        self.users.user_by_email(email).await.map_err(|e| match e {
            StoreError::NotFound => {
                info!("user not found");
                UserError::NotFound
            }
            e => {
                error!(error = %e, "couldn't get the user");
                UserError::Internal(anyhow::Error::new(e).context("users.get_user_by_email"))
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::{memory::MemoryStore, UserSaver};

    #[tokio::test]
    async fn lookups_map_missing_users_to_not_found() {
        let store = Arc::new(MemoryStore::new());
        let created = store.create_user("a@x.com", "hash").await.unwrap();
        let svc = UserService::new(store);

        assert_eq!(svc.get_user(created.id).await.unwrap().email, "a@x.com");
        assert_eq!(svc.get_user_by_email("a@x.com").await.unwrap().id, created.id);
        assert!(matches!(svc.get_user(created.id + 1).await, Err(UserError::NotFound)));
        assert!(matches!(
            svc.get_user_by_email("b@x.com").await,
            Err(UserError::NotFound)
        ));
    }
}
