use std::sync::Arc;

use crate::{
    auth::{jwt::JwtKeys, password::PasswordHasher, services::AuthService},
    config::AppConfig,
    profiles::services::ProfileService,
    store::{PgStore, ProfileDeleter, ProfileProvider, UserProvider, UserSaver},
    users::services::UserService,
};

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub keys: JwtKeys,
    pub auth: Arc<AuthService>,
    pub users: Arc<UserService>,
    pub profiles: Arc<ProfileService>,
}

impl AppState {
    /// Connects to PostgreSQL and wires every service to it.
    pub async fn init(config: Arc<AppConfig>) -> anyhow::Result<(Self, PgStore)> {
        let store = PgStore::connect(&config.database_url, config.db_max_connections).await?;
        let state = Self::from_store(config, Arc::new(store.clone()))?;
        Ok((state, store))
    }

    /// Wires services to any store that provides every capability.
    pub fn from_store<S>(config: Arc<AppConfig>, store: Arc<S>) -> anyhow::Result<Self>
    where
        S: UserProvider + UserSaver + ProfileProvider + ProfileDeleter + 'static,
    {
        let keys = JwtKeys::from(&config.jwt);
        let hasher = PasswordHasher::new(&config.hash)?;

        let auth = AuthService::new(store.clone(), store.clone(), hasher, keys.clone());
        let users = UserService::new(store.clone());
        let profiles = ProfileService::new(store.clone(), store);

        Ok(Self {
            config,
            keys,
            auth: Arc::new(auth),
            users: Arc::new(users),
            profiles: Arc::new(profiles),
        })
    }
}
