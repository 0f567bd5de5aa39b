use axum::{
    extract::State,
    response::{IntoResponse, Json},
    Extension,
};

use crate::{
    error::Result,
    middleware::auth::require_roles,
    models::user::{Role, User},
    AppState,
};

/// Runs an expiration sweep now instead of waiting for the next tick.
#[utoipa::path(
    post,
    path = "/api/admin/jobs/expire",
    responses(
        (status = 200, description = "Number of postings closed by this sweep"),
        (status = 403, description = "Admin only"),
        (status = 503, description = "Record store unavailable")
    )
)]
#[axum::debug_handler]
pub async fn expire_jobs(
    State(state): State<AppState>,
    Extension(user): Extension<User>,
) -> Result<impl IntoResponse> {
    require_roles(&user, &[Role::Admin])?;
    let report = state.expiration_service.run_sweep().await?;
    Ok(Json(report))
}

#[utoipa::path(
    get,
    path = "/api/admin/dashboard",
    responses(
        (status = 200, description = "User, job and application counts"),
        (status = 403, description = "Admin only")
    )
)]
#[axum::debug_handler]
pub async fn dashboard(
    State(state): State<AppState>,
    Extension(user): Extension<User>,
) -> Result<impl IntoResponse> {
    require_roles(&user, &[Role::Admin])?;
    let stats = state.dashboard_service.stats().await?;
    Ok(Json(stats))
}
