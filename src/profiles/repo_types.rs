use sqlx::FromRow;
use time::OffsetDateTime;

use crate::users::repo_types::User;

/// Profile of a user; one per account.
#[derive(Debug, Clone)]
pub struct Profile {
    pub user: User,
    pub first_name: String,
    pub last_name: String,
    pub phone: String,
    pub picture: String,
}

/// Flat row of `profiles JOIN users`.
#[derive(FromRow)]
pub struct ProfileRow {
    pub id: i64,
    pub email: String,
    pub password_hash: String,
    pub created_at: OffsetDateTime,
    pub updated_at: OffsetDateTime,
    pub is_active: bool,
    pub first_name: String,
    pub last_name: String,
    pub phone: String,
    pub picture: String,
}

impl From<ProfileRow> for Profile {
    fn from(r: ProfileRow) -> Self {
        Self {
            user: User {
                id: r.id,
                email: r.email,
                password_hash: r.password_hash,
                created_at: r.created_at,
                updated_at: r.updated_at,
                is_active: r.is_active,
            },
            first_name: r.first_name,
            last_name: r.last_name,
            phone: r.phone,
            picture: r.picture,
        }
    }
}
