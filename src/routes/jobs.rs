use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Json},
    Extension,
};
use uuid::Uuid;
use validator::Validate;

use crate::{
    dto::job_dto::{
        CreateJobPayload, JobListResponse, JobResponse, JobSearchQuery, UpdateJobPayload,
    },
    error::Result,
    extract::{AppJson, AppPath, AppQuery},
    middleware::auth::require_roles,
    models::user::{Role, User},
    AppState,
};

const JOB_MANAGERS: &[Role] = &[Role::Employer, Role::Admin];

#[utoipa::path(
    get,
    path = "/api/jobs",
    responses(
        (status = 200, description = "Active job postings, newest first", body = Json<JobListResponse>)
    )
)]
#[axum::debug_handler]
pub async fn list_jobs(State(state): State<AppState>) -> Result<impl IntoResponse> {
    let jobs = state.job_service.list_active().await?;
    Ok(Json(JobListResponse::from(jobs)))
}

#[utoipa::path(
    get,
    path = "/api/jobs/search",
    params(
        ("keyword" = Option<String>, Query, description = "Matches title, company or description"),
        ("job_type" = Option<String>, Query, description = "full-time, part-time, contract, internship or remote"),
        ("location" = Option<String>, Query, description = "Substring of the location")
    ),
    responses(
        (status = 200, description = "Matching active job postings", body = Json<JobListResponse>)
    )
)]
#[axum::debug_handler]
pub async fn search_jobs(
    State(state): State<AppState>,
    AppQuery(query): AppQuery<JobSearchQuery>,
) -> Result<impl IntoResponse> {
    let jobs = state.job_service.search(query.into()).await?;
    Ok(Json(JobListResponse::from(jobs)))
}

#[utoipa::path(
    get,
    path = "/api/jobs/{id}",
    params(
        ("id" = Uuid, Path, description = "Job ID")
    ),
    responses(
        (status = 200, description = "Job posting", body = Json<JobResponse>),
        (status = 404, description = "Job not found")
    )
)]
#[axum::debug_handler]
pub async fn get_job(
    State(state): State<AppState>,
    AppPath(id): AppPath<Uuid>,
) -> Result<impl IntoResponse> {
    let job = state.job_service.get_by_id(id).await?;
    Ok(Json(JobResponse::from(job)))
}

#[utoipa::path(
    post,
    path = "/api/jobs",
    request_body = CreateJobPayload,
    responses(
        (status = 201, description = "Job posting created", body = Json<JobResponse>),
        (status = 400, description = "Invalid payload"),
        (status = 403, description = "Only employers and admins post jobs")
    )
)]
#[axum::debug_handler]
pub async fn create_job(
    State(state): State<AppState>,
    Extension(user): Extension<User>,
    AppJson(payload): AppJson<CreateJobPayload>,
) -> Result<impl IntoResponse> {
    require_roles(&user, JOB_MANAGERS)?;
    payload.validate()?;
    let job = state.job_service.create(payload, &user).await?;
    Ok((StatusCode::CREATED, Json(JobResponse::from(job))))
}

#[utoipa::path(
    patch,
    path = "/api/jobs/{id}",
    params(
        ("id" = Uuid, Path, description = "Job ID")
    ),
    request_body = UpdateJobPayload,
    responses(
        (status = 200, description = "Job posting updated", body = Json<JobResponse>),
        (status = 400, description = "Invalid payload"),
        (status = 404, description = "Job not found")
    )
)]
#[axum::debug_handler]
pub async fn update_job(
    State(state): State<AppState>,
    Extension(user): Extension<User>,
    AppPath(id): AppPath<Uuid>,
    AppJson(payload): AppJson<UpdateJobPayload>,
) -> Result<impl IntoResponse> {
    require_roles(&user, JOB_MANAGERS)?;
    payload.validate()?;
    let job = state.job_service.update(id, payload).await?;
    Ok(Json(JobResponse::from(job)))
}

#[utoipa::path(
    delete,
    path = "/api/jobs/{id}",
    params(
        ("id" = Uuid, Path, description = "Job ID")
    ),
    responses(
        (status = 204, description = "Job posting deleted"),
        (status = 404, description = "Job not found")
    )
)]
#[axum::debug_handler]
pub async fn delete_job(
    State(state): State<AppState>,
    Extension(user): Extension<User>,
    AppPath(id): AppPath<Uuid>,
) -> Result<impl IntoResponse> {
    require_roles(&user, JOB_MANAGERS)?;
    state.job_service.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

#[utoipa::path(
    get,
    path = "/api/jobs/admin/all",
    responses(
        (status = 200, description = "Every job posting regardless of status", body = Json<JobListResponse>),
        (status = 403, description = "Admin only")
    )
)]
#[axum::debug_handler]
pub async fn list_all_jobs(
    State(state): State<AppState>,
    Extension(user): Extension<User>,
) -> Result<impl IntoResponse> {
    require_roles(&user, &[Role::Admin])?;
    let jobs = state.job_service.list_all().await?;
    Ok(Json(JobListResponse::from(jobs)))
}
