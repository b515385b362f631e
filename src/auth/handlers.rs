use axum::{
    extract::{rejection::JsonRejection, State},
    http::{header, StatusCode},
    response::IntoResponse,
    routing::post,
    Json, Router,
};
use tracing::{info, instrument};

use crate::{
    api,
    auth::{
        dto::{LoginData, LoginRequest, SignupData, SignupRequest},
        validation::validate_signup,
    },
    config::AppConfig,
    error::AppError,
    state::AppState,
    users::dto::PublicUser,
};

pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/auth/signup", post(signup))
        .route("/auth/login", post(login))
}

/// `Set-Cookie` value carrying the refresh token.
pub(crate) fn refresh_cookie(cfg: &AppConfig, token: &str, max_age_secs: u64) -> String {
    let mut cookie = format!(
        "{}={}; Path={}; Max-Age={}; HttpOnly; SameSite=Strict",
        cfg.refresh_cookie.name, token, cfg.refresh_cookie.path, max_age_secs
    );
    if cfg.env.is_production() {
        cookie.push_str("; Secure");
    }
    cookie
}

#[instrument(skip_all, fields(op = "handlers.auth.signup"))]
pub async fn signup(
    State(state): State<AppState>,
    payload: Result<Json<SignupRequest>, JsonRejection>,
) -> Result<impl IntoResponse, AppError> {
    let Json(payload) = payload?;

    let details = validate_signup(&payload);
    if !details.is_empty() {
        info!(invalid_fields = details.len(), "invalid request");
        return Err(AppError::validation(details));
    }

    let user = state.auth.signup(&payload.email, &payload.password).await?;

    Ok((
        StatusCode::CREATED,
        Json(api::Response::ok(SignupData {
            user: PublicUser::from(&user),
        })),
    ))
}

#[instrument(skip_all, fields(op = "handlers.auth.login"))]
pub async fn login(
    State(state): State<AppState>,
    payload: Result<Json<LoginRequest>, JsonRejection>,
) -> Result<impl IntoResponse, AppError> {
    let Json(payload) = payload?;

    let tokens = state.auth.login(&payload.email, &payload.password).await?;

    let cookie = refresh_cookie(
        &state.config,
        &tokens.refresh,
        state.keys.refresh_ttl().as_secs(),
    );

    Ok((
        [(header::SET_COOKIE, cookie)],
        Json(api::Response::ok(LoginData {
            access_token: tokens.access,
        })),
    ))
}
