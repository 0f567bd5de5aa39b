use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Json},
    Extension,
};
use uuid::Uuid;
use validator::Validate;

use crate::{
    dto::resume_dto::RegisterResumePayload,
    error::Result,
    extract::{AppJson, AppPath},
    middleware::auth::require_roles,
    models::user::{Role, User},
    AppState,
};

#[utoipa::path(
    post,
    path = "/api/resumes",
    request_body = RegisterResumePayload,
    responses(
        (status = 201, description = "Résumé reference registered"),
        (status = 400, description = "Invalid payload or content type")
    )
)]
#[axum::debug_handler]
pub async fn register_resume(
    State(state): State<AppState>,
    Extension(user): Extension<User>,
    AppJson(payload): AppJson<RegisterResumePayload>,
) -> Result<impl IntoResponse> {
    payload.validate()?;
    let resume = state.resume_service.register(user.id, payload).await?;
    Ok((StatusCode::CREATED, Json(resume)))
}

#[utoipa::path(
    get,
    path = "/api/resumes/my",
    responses(
        (status = 200, description = "The caller's résumé references, newest first")
    )
)]
#[axum::debug_handler]
pub async fn list_my_resumes(
    State(state): State<AppState>,
    Extension(user): Extension<User>,
) -> Result<impl IntoResponse> {
    let resumes = state.resume_service.list_for_owner(user.id).await?;
    Ok(Json(resumes))
}

#[utoipa::path(
    delete,
    path = "/api/resumes/{id}",
    params(
        ("id" = Uuid, Path, description = "Résumé ID")
    ),
    responses(
        (status = 204, description = "Résumé reference deleted"),
        (status = 403, description = "Not the owner"),
        (status = 404, description = "Résumé not found")
    )
)]
#[axum::debug_handler]
pub async fn delete_resume(
    State(state): State<AppState>,
    Extension(user): Extension<User>,
    AppPath(id): AppPath<Uuid>,
) -> Result<impl IntoResponse> {
    state.resume_service.delete(id, user.id).await?;
    Ok(StatusCode::NO_CONTENT)
}

#[utoipa::path(
    get,
    path = "/api/resumes/admin/all",
    responses(
        (status = 200, description = "Every résumé reference, newest first"),
        (status = 403, description = "Admin only")
    )
)]
#[axum::debug_handler]
pub async fn list_all_resumes(
    State(state): State<AppState>,
    Extension(user): Extension<User>,
) -> Result<impl IntoResponse> {
    require_roles(&user, &[Role::Admin])?;
    let resumes = state.resume_service.list_all().await?;
    Ok(Json(resumes))
}

#[utoipa::path(
    delete,
    path = "/api/resumes/admin/{id}",
    params(
        ("id" = Uuid, Path, description = "Résumé ID")
    ),
    responses(
        (status = 204, description = "Résumé reference deleted"),
        (status = 403, description = "Admin only"),
        (status = 404, description = "Résumé not found")
    )
)]
#[axum::debug_handler]
pub async fn remove_resume(
    State(state): State<AppState>,
    Extension(user): Extension<User>,
    AppPath(id): AppPath<Uuid>,
) -> Result<impl IntoResponse> {
    require_roles(&user, &[Role::Admin])?;
    state.resume_service.remove(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
