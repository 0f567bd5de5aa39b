pub mod config;
pub mod database;
pub mod dto;
pub mod error;
pub mod extract;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;
pub mod utils;

use std::sync::Arc;

use crate::config::Config;
use crate::database::RecordStore;
use crate::services::{
    allocator::VacancyAllocator,
    application_service::{ApplicationService, SubmitPolicy},
    dashboard_service::DashboardService,
    expiration_service::ExpirationService,
    identity_service::IdentityService,
    job_service::JobService,
    resume_service::ResumeService,
};

#[derive(Clone)]
pub struct AppState {
    pub jwt_secret: Arc<str>,
    pub api_rps: u32,
    pub allocator: VacancyAllocator,
    pub application_service: ApplicationService,
    pub dashboard_service: DashboardService,
    pub expiration_service: ExpirationService,
    pub identity_service: IdentityService,
    pub job_service: JobService,
    pub resume_service: ResumeService,
}

impl AppState {
    pub fn new(store: Arc<dyn RecordStore>, config: &Config) -> Self {
        let allocator = VacancyAllocator::new(store.clone());
        let resume_service = ResumeService::new(store.clone());
        let application_service = ApplicationService::new(
            store.clone(),
            allocator.clone(),
            resume_service.clone(),
            SubmitPolicy {
                release_seat_on_failure: config.release_seat_on_failure,
            },
        );
        let dashboard_service = DashboardService::new(store.clone());
        let expiration_service = ExpirationService::new(store.clone());
        let identity_service = IdentityService::new(store.clone());
        let job_service = JobService::new(store);

        Self {
            jwt_secret: Arc::from(config.jwt_secret.as_str()),
            api_rps: config.api_rps,
            allocator,
            application_service,
            dashboard_service,
            expiration_service,
            identity_service,
            job_service,
            resume_service,
        }
    }
}
