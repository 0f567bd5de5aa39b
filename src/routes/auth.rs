use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Json},
    Extension,
};
use chrono::Duration;
use validator::Validate;

use crate::{
    dto::user_dto::{RegisterUserPayload, RegisteredUserResponse},
    error::{Error, Result},
    extract::AppJson,
    models::user::{Role, User},
    utils::token::issue_token,
    AppState,
};

const TOKEN_TTL_HOURS: i64 = 24;

#[utoipa::path(
    post,
    path = "/api/auth/register",
    request_body = RegisterUserPayload,
    responses(
        (status = 201, description = "User registered", body = Json<RegisteredUserResponse>),
        (status = 400, description = "Invalid payload"),
        (status = 403, description = "Admin accounts cannot self-register"),
        (status = 409, description = "Email already registered")
    )
)]
#[axum::debug_handler]
pub async fn register(
    State(state): State<AppState>,
    AppJson(payload): AppJson<RegisterUserPayload>,
) -> Result<impl IntoResponse> {
    payload.validate()?;
    if payload.role == Role::Admin {
        return Err(Error::Forbidden(
            "Admin accounts cannot self-register".into(),
        ));
    }
    let user = state
        .identity_service
        .register(&payload.name, &payload.email, payload.role)
        .await?;
    let token = issue_token(
        user.id,
        user.role,
        &state.jwt_secret,
        Duration::hours(TOKEN_TTL_HOURS),
    )?;
    Ok((
        StatusCode::CREATED,
        Json(RegisteredUserResponse { user, token }),
    ))
}

/// The user behind the bearer token.
#[utoipa::path(
    get,
    path = "/api/auth/me",
    responses(
        (status = 200, description = "Current user"),
        (status = 401, description = "Missing or invalid token")
    )
)]
pub async fn me(Extension(user): Extension<User>) -> Json<User> {
    Json(user)
}
