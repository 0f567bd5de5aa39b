pub mod admin;
pub mod applications;
pub mod auth;
pub mod health;
pub mod jobs;
pub mod resumes;

use axum::{
    extract::DefaultBodyLimit,
    middleware::from_fn_with_state,
    routing::{delete, get, post, put},
    Router,
};
use tower_http::trace::TraceLayer;

use crate::middleware::{
    auth::require_auth,
    cors::api_cors,
    rate_limit::{rps_middleware, RateLimiter},
};
use crate::AppState;

const MAX_BODY_BYTES: usize = 1024 * 1024;

/// Assembles every route with the shared middleware stack.
pub fn build_router(state: AppState) -> Router {
    let public_api = Router::new()
        .route("/api/auth/register", post(auth::register))
        .route("/api/jobs", get(jobs::list_jobs))
        .route("/api/jobs/search", get(jobs::search_jobs))
        .route("/api/jobs/:id", get(jobs::get_job));

    let protected_api = Router::new()
        .route("/api/auth/me", get(auth::me))
        .route("/api/jobs", post(jobs::create_job))
        .route(
            "/api/jobs/:id",
            axum::routing::patch(jobs::update_job).delete(jobs::delete_job),
        )
        .route("/api/jobs/admin/all", get(jobs::list_all_jobs))
        .route(
            "/api/applications",
            post(applications::submit_application),
        )
        .route(
            "/api/applications/my",
            get(applications::list_my_applications),
        )
        .route(
            "/api/applications/:id",
            get(applications::get_application).delete(applications::withdraw_application),
        )
        .route(
            "/api/applications/job/:job_id",
            get(applications::list_job_applications),
        )
        .route(
            "/api/applications/:id/status",
            put(applications::update_application_status),
        )
        .route(
            "/api/applications/admin/all",
            get(applications::list_all_applications),
        )
        .route(
            "/api/applications/admin/:id",
            delete(applications::remove_application),
        )
        .route(
            "/api/applications/admin/:id/status",
            put(applications::admin_update_application_status),
        )
        .route("/api/resumes", post(resumes::register_resume))
        .route("/api/resumes/my", get(resumes::list_my_resumes))
        .route("/api/resumes/:id", delete(resumes::delete_resume))
        .route("/api/resumes/admin/all", get(resumes::list_all_resumes))
        .route("/api/resumes/admin/:id", delete(resumes::remove_resume))
        .route("/api/admin/dashboard", get(admin::dashboard))
        .route("/api/admin/jobs/expire", post(admin::expire_jobs))
        .route_layer(from_fn_with_state(state.clone(), require_auth));

    let api = public_api.merge(protected_api).layer(from_fn_with_state(
        RateLimiter::new(state.api_rps),
        rps_middleware,
    ));

    Router::new()
        .route("/health", get(health::health))
        .merge(api)
        .with_state(state)
        .layer(api_cors())
        .layer(TraceLayer::new_for_http())
        .layer(DefaultBodyLimit::max(MAX_BODY_BYTES))
}
