use anyhow::anyhow;
use async_trait::async_trait;
use axum::{extract::FromRequestParts, http::{request::Parts, Extensions}};
use tracing::error;

use crate::{error::AppError, users::repo_types::User};

/// The authenticated user, attached to the request by [`authorize`].
///
/// [`authorize`]: super::middleware::authorize
#[derive(Debug, Clone)]
pub struct CurrentUser(pub User);

/// Identity attached to this request, if the authorization layer ran.
pub fn current_user(extensions: &Extensions) -> Option<&User> {
    extensions.get::<CurrentUser>().map(|c| &c.0)
}

#[async_trait]
impl<S> FromRequestParts<S> for CurrentUser
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        // The authorization layer is the only gate; a missing identity means the
        // route was mounted without it.
        match current_user(&parts.extensions) {
            Some(user) => Ok(CurrentUser(user.clone())),
            None => {
                error!("failed to get user from auth context");
                Err(AppError::Internal(anyhow!(
                    "no authenticated user in request context"
                )))
            }
        }
    }
}
