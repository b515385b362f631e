use anyhow::Context;
use async_trait::async_trait;
use sqlx::{postgres::PgPoolOptions, PgPool};

use super::{ProfileDeleter, ProfileProvider, StoreError, UserProvider, UserSaver};
use crate::{
    profiles::repo_types::{Profile, ProfileRow},
    users::repo_types::User,
};

const UNIQUE_VIOLATION: &str = "23505";
const FOREIGN_KEY_VIOLATION: &str = "23503";

#[derive(Clone)]
pub struct PgStore {
    db: PgPool,
}

impl PgStore {
    pub async fn connect(database_url: &str, max_connections: u32) -> anyhow::Result<Self> {
        let db = PgPoolOptions::new()
            .max_connections(max_connections)
            .connect(database_url)
            .await
            .context("connect to database")?;
        Ok(Self { db })
    }

    pub fn pool(&self) -> &PgPool {
        &self.db
    }
}

/// SQLSTATE of a database error, if the driver reported one.
fn sql_state(err: &sqlx::Error) -> Option<String> {
    match err {
        sqlx::Error::Database(db_err) => db_err.code().map(|c| c.into_owned()),
        _ => None,
    }
}

fn not_found_or(err: sqlx::Error) -> StoreError {
    match err {
        sqlx::Error::RowNotFound => StoreError::NotFound,
        other => StoreError::Database(other),
    }
}

#[async_trait]
impl UserProvider for PgStore {
    async fn user_by_email(&self, email: &str) -> Result<User, StoreError> {
        sqlx::query_as::<_, User>(
            r#"
            SELECT id, email, password_hash, created_at, updated_at, is_active
            FROM users
            WHERE email = $1
            "#,
        )
        .bind(email)
        .fetch_one(&self.db)
        .await
        .map_err(not_found_or)
    }

    async fn user_by_id(&self, id: i64) -> Result<User, StoreError> {
        sqlx::query_as::<_, User>(
            r#"
            SELECT id, email, password_hash, created_at, updated_at, is_active
            FROM users
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_one(&self.db)
        .await
        .map_err(not_found_or)
    }
}

#[async_trait]
impl UserSaver for PgStore {
    async fn create_user(&self, email: &str, password_hash: &str) -> Result<User, StoreError> {
        sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (email, password_hash)
            VALUES ($1, $2)
            RETURNING id, email, password_hash, created_at, updated_at, is_active
            "#,
        )
        .bind(email)
        .bind(password_hash)
        .fetch_one(&self.db)
        .await
        .map_err(|e| match sql_state(&e).as_deref() {
            Some(UNIQUE_VIOLATION) => StoreError::AlreadyExists,
            _ => StoreError::Database(e),
        })
    }
}

#[async_trait]
impl ProfileProvider for PgStore {
    async fn profile_by_id(&self, user_id: i64) -> Result<Profile, StoreError> {
        let row = sqlx::query_as::<_, ProfileRow>(
            r#"
            SELECT u.id, u.email, u.password_hash, u.created_at, u.updated_at, u.is_active,
                   p.first_name, p.last_name, p.phone, p.picture
            FROM profiles p
            JOIN users u ON u.id = p.user_id
            WHERE p.user_id = $1
            "#,
        )
        .bind(user_id)
        .fetch_one(&self.db)
        .await
        .map_err(not_found_or)?;
        Ok(row.into())
    }

    async fn save_profile(
        &self,
        user_id: i64,
        first_name: &str,
        last_name: &str,
        phone: &str,
    ) -> Result<Profile, StoreError> {
        sqlx::query(
            r#"
            INSERT INTO profiles (user_id, first_name, last_name, phone)
            VALUES ($1, $2, $3, $4)
            ON CONFLICT (user_id) DO UPDATE
               SET first_name = EXCLUDED.first_name,
                   last_name  = EXCLUDED.last_name,
                   phone      = EXCLUDED.phone
            "#,
        )
        .bind(user_id)
        .bind(first_name)
        .bind(last_name)
        .bind(phone)
        .execute(&self.db)
        .await
        .map_err(|e| match sql_state(&e).as_deref() {
            Some(FOREIGN_KEY_VIOLATION) => StoreError::NotFound,
            _ => StoreError::Database(e),
        })?;

        self.profile_by_id(user_id).await
    }
}

#[async_trait]
impl ProfileDeleter for PgStore {
    async fn delete_profile(&self, user_id: i64) -> Result<(), StoreError> {
        let res = sqlx::query("DELETE FROM profiles WHERE user_id = $1")
            .bind(user_id)
            .execute(&self.db)
            .await?;
        if res.rows_affected() == 0 {
            return Err(StoreError::NotFound);
        }
        Ok(())
    }
}
