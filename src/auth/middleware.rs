use axum::{
    extract::{Request, State},
    http::{header, HeaderMap},
    middleware::Next,
    response::Response,
};
use tracing::{error, info, instrument};

use super::{claims::TokenKind, extractors::CurrentUser};
use crate::{error::AppError, state::AppState, users::services::UserError};

/// Token from `Authorization: Bearer <token>`.
pub(crate) fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    let value = headers.get(header::AUTHORIZATION)?.to_str().ok()?;
    let token = value.strip_prefix("Bearer ")?.trim();
    (!token.is_empty()).then_some(token)
}

/// Resolves the caller from the access token and stores it in the request
/// extensions as [`CurrentUser`].
///
/// Every way of failing to authenticate produces the same `Unauthorized`, so
/// callers can't tell a missing header from an expired token or a deleted account.
#[instrument(skip_all, fields(op = "middleware.auth.authorize"))]
pub async fn authorize(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, AppError> {
    let token = bearer_token(req.headers()).ok_or_else(|| {
        info!("missing or malformed Authorization header");
        AppError::Unauthorized
    })?;

    let claims = state.keys.verify(token).map_err(|e| {
        info!(error = %e, "access token is invalid");
        AppError::Unauthorized
    })?;

    if claims.kind != TokenKind::Access {
        info!(kind = ?claims.kind, "not an access token");
        return Err(AppError::Unauthorized);
    }

    let email = claims.subject().map_err(|e| {
        error!(error = %e, "error while getting the subject from access token");
        AppError::Internal(anyhow::Error::new(e).context("middleware.auth: token subject"))
    })?;

    let user = match state.users.get_user_by_email(email).await {
        Ok(u) => u,
        Err(UserError::NotFound) => return Err(AppError::Unauthorized),
        Err(UserError::Internal(e)) => {
            return Err(AppError::Internal(e.context("middleware.auth: resolve user")))
        }
    };

    req.extensions_mut().insert(CurrentUser(user));
    Ok(next.run(req).await)
}
