use axum::{
    extract::{rejection::PathRejection, Path, State},
    routing::get,
    Json, Router,
};
use tracing::instrument;

use super::dto::{PublicUser, UserData};
use crate::{api, auth::extractors::CurrentUser, error::AppError, state::AppState};

/// Routes that need the authorization layer.
pub fn user_routes() -> Router<AppState> {
    Router::new()
        .route("/me", get(get_me))
        .route("/users/:id", get(get_user))
}

#[instrument(skip_all, fields(op = "handlers.users.get_me"))]
pub async fn get_me(
    CurrentUser(user): CurrentUser,
) -> Result<Json<api::Response<UserData>>, AppError> {
    Ok(Json(api::Response::ok(UserData {
        user: PublicUser::from(&user),
    })))
}

#[instrument(skip_all, fields(op = "handlers.users.get_user"))]
pub async fn get_user(
    State(state): State<AppState>,
    _caller: CurrentUser,
    id: Result<Path<i64>, PathRejection>,
) -> Result<Json<api::Response<UserData>>, AppError> {
    let Path(id) = id?;
    let user = state.users.get_user(id).await?;
    Ok(Json(api::Response::ok(UserData {
        user: PublicUser::from(&user),
    })))
}
