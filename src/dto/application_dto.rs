use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::models::application::{Application, ApplicationStatus};

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct SubmitApplicationPayload {
    pub job_id: Uuid,
    pub resume_id: Uuid,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateApplicationStatusPayload {
    pub status: ApplicationStatus,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApplicationResponse {
    pub id: Uuid,
    pub applicant_id: Uuid,
    pub job_id: Uuid,
    pub resume_id: Option<Uuid>,
    pub status: ApplicationStatus,
    pub applied_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApplicationListResponse {
    pub count: usize,
    pub items: Vec<ApplicationResponse>,
}

impl From<Application> for ApplicationResponse {
    fn from(value: Application) -> Self {
        Self {
            id: value.id,
            applicant_id: value.applicant_id,
            job_id: value.job_id,
            resume_id: value.resume_id,
            status: value.status,
            applied_at: value.applied_at,
            updated_at: value.updated_at,
        }
    }
}

impl From<Vec<Application>> for ApplicationListResponse {
    fn from(value: Vec<Application>) -> Self {
        let items: Vec<ApplicationResponse> = value.into_iter().map(Into::into).collect();
        Self {
            count: items.len(),
            items,
        }
    }
}
