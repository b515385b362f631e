use serde::{Deserialize, Serialize};

use crate::users::dto::PublicUser;

/// Request body for signup.
#[derive(Deserialize)]
pub struct SignupRequest {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
    #[serde(default)]
    pub confirm_password: String,
}

/// Request body for login.
#[derive(Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct LoginData {
    pub access_token: String,
}

#[derive(Debug, Serialize)]
pub struct SignupData {
    pub user: PublicUser,
}
