use serde::Serialize;
use time::OffsetDateTime;

use super::repo_types::User;

/// Public part of the user returned to the client.
#[derive(Debug, Serialize)]
pub struct PublicUser {
    pub id: i64,
    pub email: String,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
    pub is_active: bool,
}

impl From<&User> for PublicUser {
    fn from(u: &User) -> Self {
        Self {
            id: u.id,
            email: u.email.clone(),
            created_at: u.created_at,
            updated_at: u.updated_at,
            is_active: u.is_active,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct UserData {
    pub user: PublicUser,
}
