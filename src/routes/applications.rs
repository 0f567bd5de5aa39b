use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Json},
    Extension,
};
use uuid::Uuid;
use validator::Validate;

use crate::{
    dto::application_dto::{
        ApplicationListResponse, ApplicationResponse, SubmitApplicationPayload,
        UpdateApplicationStatusPayload,
    },
    error::{Error, Result},
    extract::{AppJson, AppPath},
    middleware::auth::require_roles,
    models::user::{Role, User},
    services::application_service::{SetStatusOutcome, SubmitOutcome, WithdrawOutcome},
    AppState,
};

#[utoipa::path(
    post,
    path = "/api/applications",
    request_body = SubmitApplicationPayload,
    responses(
        (status = 201, description = "Application submitted", body = Json<ApplicationResponse>),
        (status = 404, description = "Job or résumé not found"),
        (status = 409, description = "Already applied, or no vacancy left")
    )
)]
#[axum::debug_handler]
pub async fn submit_application(
    State(state): State<AppState>,
    Extension(user): Extension<User>,
    AppJson(payload): AppJson<SubmitApplicationPayload>,
) -> Result<impl IntoResponse> {
    payload.validate()?;
    let outcome = state
        .application_service
        .submit(user.id, payload.job_id, payload.resume_id)
        .await?;
    match outcome {
        SubmitOutcome::Created(application) => Ok((
            StatusCode::CREATED,
            Json(ApplicationResponse::from(application)),
        )),
        SubmitOutcome::DuplicateApplication => Err(Error::Conflict(
            "You have already applied for this job".into(),
        )),
        SubmitOutcome::ResumeNotFound => Err(Error::NotFound("Resume not found".into())),
        SubmitOutcome::NoSeatAvailable => Err(Error::Conflict(
            "This job is no longer accepting applications".into(),
        )),
        SubmitOutcome::JobNotFound => Err(Error::NotFound("Job not found".into())),
    }
}

#[utoipa::path(
    get,
    path = "/api/applications/my",
    responses(
        (status = 200, description = "The caller's applications, newest first", body = Json<ApplicationListResponse>)
    )
)]
#[axum::debug_handler]
pub async fn list_my_applications(
    State(state): State<AppState>,
    Extension(user): Extension<User>,
) -> Result<impl IntoResponse> {
    let applications = state.application_service.list_for_applicant(user.id).await?;
    Ok(Json(ApplicationListResponse::from(applications)))
}

#[utoipa::path(
    get,
    path = "/api/applications/{id}",
    params(
        ("id" = Uuid, Path, description = "Application ID")
    ),
    responses(
        (status = 200, description = "Application", body = Json<ApplicationResponse>),
        (status = 403, description = "Not the applicant or a reviewer"),
        (status = 404, description = "Application not found")
    )
)]
#[axum::debug_handler]
pub async fn get_application(
    State(state): State<AppState>,
    Extension(user): Extension<User>,
    AppPath(id): AppPath<Uuid>,
) -> Result<impl IntoResponse> {
    let application = state
        .application_service
        .get_for_viewer(id, user.id, user.role)
        .await?;
    Ok(Json(ApplicationResponse::from(application)))
}

#[utoipa::path(
    get,
    path = "/api/applications/job/{job_id}",
    params(
        ("job_id" = Uuid, Path, description = "Job ID")
    ),
    responses(
        (status = 200, description = "Applications for the job", body = Json<ApplicationListResponse>),
        (status = 403, description = "Employers and admins only")
    )
)]
#[axum::debug_handler]
pub async fn list_job_applications(
    State(state): State<AppState>,
    Extension(user): Extension<User>,
    AppPath(job_id): AppPath<Uuid>,
) -> Result<impl IntoResponse> {
    require_roles(&user, &[Role::Employer, Role::Admin])?;
    let applications = state.application_service.list_for_job(job_id).await?;
    Ok(Json(ApplicationListResponse::from(applications)))
}

#[utoipa::path(
    put,
    path = "/api/applications/{id}/status",
    params(
        ("id" = Uuid, Path, description = "Application ID")
    ),
    request_body = UpdateApplicationStatusPayload,
    responses(
        (status = 200, description = "Status updated", body = Json<ApplicationResponse>),
        (status = 403, description = "Employers and admins only"),
        (status = 404, description = "Application not found")
    )
)]
#[axum::debug_handler]
pub async fn update_application_status(
    State(state): State<AppState>,
    Extension(user): Extension<User>,
    AppPath(id): AppPath<Uuid>,
    AppJson(payload): AppJson<UpdateApplicationStatusPayload>,
) -> Result<Json<ApplicationResponse>> {
    apply_status(&state, &user, id, payload).await
}

#[utoipa::path(
    put,
    path = "/api/applications/admin/{id}/status",
    params(
        ("id" = Uuid, Path, description = "Application ID")
    ),
    request_body = UpdateApplicationStatusPayload,
    responses(
        (status = 200, description = "Status updated", body = Json<ApplicationResponse>),
        (status = 403, description = "Admin only"),
        (status = 404, description = "Application not found")
    )
)]
#[axum::debug_handler]
pub async fn admin_update_application_status(
    State(state): State<AppState>,
    Extension(user): Extension<User>,
    AppPath(id): AppPath<Uuid>,
    AppJson(payload): AppJson<UpdateApplicationStatusPayload>,
) -> Result<Json<ApplicationResponse>> {
    require_roles(&user, &[Role::Admin])?;
    apply_status(&state, &user, id, payload).await
}

async fn apply_status(
    state: &AppState,
    user: &User,
    id: Uuid,
    payload: UpdateApplicationStatusPayload,
) -> Result<Json<ApplicationResponse>> {
    let outcome = state
        .application_service
        .set_status(id, payload.status, user.role)
        .await?;
    match outcome {
        SetStatusOutcome::Updated(application) => {
            Ok(Json(ApplicationResponse::from(application)))
        }
        SetStatusOutcome::NotFound => Err(Error::NotFound("Application not found".into())),
        SetStatusOutcome::Forbidden => Err(Error::Forbidden(format!(
            "User role '{}' may not change application status",
            user.role
        ))),
    }
}

#[utoipa::path(
    delete,
    path = "/api/applications/{id}",
    params(
        ("id" = Uuid, Path, description = "Application ID")
    ),
    responses(
        (status = 204, description = "Application withdrawn"),
        (status = 403, description = "Not the applicant"),
        (status = 404, description = "Application not found")
    )
)]
#[axum::debug_handler]
pub async fn withdraw_application(
    State(state): State<AppState>,
    Extension(user): Extension<User>,
    AppPath(id): AppPath<Uuid>,
) -> Result<impl IntoResponse> {
    match state.application_service.withdraw(id, user.id).await? {
        WithdrawOutcome::Removed => Ok(StatusCode::NO_CONTENT),
        WithdrawOutcome::NotFound => Err(Error::NotFound("Application not found".into())),
        WithdrawOutcome::NotOwner => Err(Error::Forbidden(
            "Not authorized to delete this application".into(),
        )),
    }
}

#[utoipa::path(
    get,
    path = "/api/applications/admin/all",
    responses(
        (status = 200, description = "Every application", body = Json<ApplicationListResponse>),
        (status = 403, description = "Admin only")
    )
)]
#[axum::debug_handler]
pub async fn list_all_applications(
    State(state): State<AppState>,
    Extension(user): Extension<User>,
) -> Result<impl IntoResponse> {
    require_roles(&user, &[Role::Admin])?;
    let applications = state.application_service.list_all().await?;
    Ok(Json(ApplicationListResponse::from(applications)))
}

#[utoipa::path(
    delete,
    path = "/api/applications/admin/{id}",
    params(
        ("id" = Uuid, Path, description = "Application ID")
    ),
    responses(
        (status = 204, description = "Application removed"),
        (status = 403, description = "Admin only"),
        (status = 404, description = "Application not found")
    )
)]
#[axum::debug_handler]
pub async fn remove_application(
    State(state): State<AppState>,
    Extension(user): Extension<User>,
    AppPath(id): AppPath<Uuid>,
) -> Result<impl IntoResponse> {
    require_roles(&user, &[Role::Admin])?;
    match state.application_service.remove(id).await? {
        WithdrawOutcome::Removed => Ok(StatusCode::NO_CONTENT),
        _ => Err(Error::NotFound("Application not found".into())),
    }
}
