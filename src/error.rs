use axum::{
    extract::rejection::{JsonRejection, PathRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;
use tracing::{error, warn};

use crate::{
    api::{self, ErrDetail},
    auth::services::AuthError,
    profiles::services::ProfileError,
    users::services::UserError,
};

const UNAUTHORIZED_MESSAGE: &str = "you are not authorized";
const UNEXPECTED_MESSAGE: &str = "unexpected error";

/// Error returned by every handler and by the authorization layer.
///
/// Only the variant decides what the client sees. `Internal` keeps its cause for
/// the server log and always renders the same generic body.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("invalid credentials")]
    InvalidCredentials,

    #[error("email is already taken")]
    EmailExists,

    #[error("{message}")]
    Validation {
        message: String,
        details: Vec<ErrDetail>,
    },

    #[error("unauthorized")]
    Unauthorized,

    #[error("{0}")]
    NotFound(&'static str),

    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl AppError {
    pub fn validation(details: Vec<ErrDetail>) -> Self {
        AppError::Validation {
            message: "invalid request".into(),
            details,
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            AppError::InvalidCredentials | AppError::Unauthorized => StatusCode::UNAUTHORIZED,
            AppError::EmailExists => StatusCode::CONFLICT,
            AppError::Validation { .. } => StatusCode::BAD_REQUEST,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        warn!(error = %rejection, "can't decode json body");
        AppError::Validation {
            message: "failed to parse request body".into(),
            details: Vec::new(),
        }
    }
}

impl From<PathRejection> for AppError {
    fn from(rejection: PathRejection) -> Self {
        warn!(error = %rejection, "can't parse path parameters");
        AppError::Validation {
            message: "invalid path parameter".into(),
            details: Vec::new(),
        }
    }
}

impl From<AuthError> for AppError {
    fn from(e: AuthError) -> Self {
        match e {
            AuthError::InvalidCredentials => AppError::InvalidCredentials,
            AuthError::EmailExists => AppError::EmailExists,
            AuthError::Internal(e) => AppError::Internal(e),
        }
    }
}

impl From<UserError> for AppError {
    fn from(e: UserError) -> Self {
        match e {
            UserError::NotFound => AppError::NotFound("user not found"),
            UserError::Internal(e) => AppError::Internal(e),
        }
    }
}

impl From<ProfileError> for AppError {
    fn from(e: ProfileError) -> Self {
        match e {
            ProfileError::NotFound => AppError::NotFound("profile not found"),
            ProfileError::Internal(e) => AppError::Internal(e),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = match self {
            AppError::InvalidCredentials => api::Response::err("invalid credentials"),
            AppError::EmailExists => api::Response::err_with_details(
                "user exists",
                vec![ErrDetail::field("email", "email is already being used")],
            ),
            AppError::Validation { message, details } => {
                api::Response::err_with_details(message, details)
            }
            AppError::Unauthorized => api::Response::err(UNAUTHORIZED_MESSAGE),
            AppError::NotFound(message) => api::Response::err(message),
            AppError::Internal(e) => {
                error!(error = %format!("{e:#}"), "internal error");
                api::Response::err(UNEXPECTED_MESSAGE)
            }
        };
        (status, Json(body)).into_response()
    }
}
