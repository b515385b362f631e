use std::fmt;

use sqlx::FromRow;
use time::OffsetDateTime;

/// User record in the database.
#[derive(Clone, FromRow)]
pub struct User {
    pub id: i64,
    pub email: String,
    pub password_hash: String, // Argon2 PHC string, never leaves the service
    pub created_at: OffsetDateTime,
    pub updated_at: OffsetDateTime,
    pub is_active: bool,
}

impl fmt::Debug for User {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("User")
            .field("id", &self.id)
            .field("email", &self.email)
            .field("password_hash", &"<redacted>")
            .field("created_at", &self.created_at)
            .field("updated_at", &self.updated_at)
            .field("is_active", &self.is_active)
            .finish()
    }
}
