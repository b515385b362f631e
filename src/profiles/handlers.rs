use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    response::IntoResponse,
    routing::get,
    Json, Router,
};
use tracing::{info, instrument};

use super::dto::{MakeProfileRequest, ProfileData, ProfileView};
use crate::{api, auth::extractors::CurrentUser, error::AppError, state::AppState};

/// Routes that need the authorization layer.
pub fn profile_routes() -> Router<AppState> {
    Router::new().route(
        "/profile",
        get(get_profile).post(make_profile).delete(delete_profile),
    )
}

#[instrument(skip_all, fields(op = "handlers.profile.get_profile"))]
pub async fn get_profile(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
) -> Result<Json<api::Response<ProfileData>>, AppError> {
    let profile = state.profiles.get_profile(user.id).await?;
    Ok(Json(api::Response::ok(ProfileData {
        profile: ProfileView::from(&profile),
    })))
}

#[instrument(skip_all, fields(op = "handlers.profile.make_profile"))]
pub async fn make_profile(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    payload: Result<Json<MakeProfileRequest>, JsonRejection>,
) -> Result<impl IntoResponse, AppError> {
    let Json(payload) = payload?;

    let details = payload.validate();
    if !details.is_empty() {
        info!(invalid_fields = details.len(), "invalid request");
        return Err(AppError::validation(details));
    }

    let profile = state
        .profiles
        .make_profile(user.id, &payload.first_name, &payload.last_name, &payload.phone)
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(api::Response::ok(ProfileData {
            profile: ProfileView::from(&profile),
        })),
    ))
}

#[instrument(skip_all, fields(op = "handlers.profile.delete_profile"))]
pub async fn delete_profile(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
) -> Result<StatusCode, AppError> {
    state.profiles.delete_profile(user.id).await?;
    Ok(StatusCode::NO_CONTENT)
}
