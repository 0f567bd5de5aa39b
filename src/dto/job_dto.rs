use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::models::job::{JobChanges, JobPosting, JobSearch, JobStatus, JobType};

fn default_vacancies() -> i32 {
    1
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CreateJobPayload {
    #[validate(length(min = 1, max = 100))]
    pub title: String,
    #[validate(length(min = 1, max = 100))]
    pub company_name: Option<String>,
    pub job_type: JobType,
    #[validate(length(min = 1))]
    pub location: String,
    pub salary: Option<String>,
    #[validate(length(min = 1))]
    pub description: String,
    pub last_date: DateTime<Utc>,
    pub status: Option<JobStatus>,
    #[serde(default = "default_vacancies")]
    #[validate(range(min = 1, message = "At least 1 vacancy is required"))]
    pub vacancies: i32,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct UpdateJobPayload {
    #[validate(length(min = 1, max = 100))]
    pub title: Option<String>,
    #[validate(length(min = 1, max = 100))]
    pub company_name: Option<String>,
    pub job_type: Option<JobType>,
    #[validate(length(min = 1))]
    pub location: Option<String>,
    pub salary: Option<String>,
    #[validate(length(min = 1))]
    pub description: Option<String>,
    pub last_date: Option<DateTime<Utc>>,
    pub status: Option<JobStatus>,
    #[validate(range(min = 0))]
    pub vacancies: Option<i32>,
}

impl From<UpdateJobPayload> for JobChanges {
    fn from(value: UpdateJobPayload) -> Self {
        Self {
            title: value.title,
            company_name: value.company_name,
            job_type: value.job_type,
            location: value.location,
            salary: value.salary,
            description: value.description,
            last_date: value.last_date,
            status: value.status,
            vacancies: value.vacancies,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct JobSearchQuery {
    pub keyword: Option<String>,
    pub job_type: Option<JobType>,
    pub location: Option<String>,
}

impl From<JobSearchQuery> for JobSearch {
    fn from(value: JobSearchQuery) -> Self {
        let non_empty = |s: Option<String>| s.filter(|s| !s.trim().is_empty());
        Self {
            keyword: non_empty(value.keyword),
            job_type: value.job_type,
            location: non_empty(value.location),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JobResponse {
    pub id: Uuid,
    pub title: String,
    pub company_name: String,
    pub job_type: JobType,
    pub location: String,
    pub salary: Option<String>,
    pub description: String,
    pub last_date: DateTime<Utc>,
    pub status: JobStatus,
    pub vacancies: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JobListResponse {
    pub count: usize,
    pub items: Vec<JobResponse>,
}

impl From<JobPosting> for JobResponse {
    fn from(value: JobPosting) -> Self {
        Self {
            id: value.id,
            title: value.title,
            company_name: value.company_name,
            job_type: value.job_type,
            location: value.location,
            salary: value.salary,
            description: value.description,
            last_date: value.last_date,
            status: value.status,
            vacancies: value.vacancies,
            created_at: value.created_at,
            updated_at: value.updated_at,
        }
    }
}

impl From<Vec<JobPosting>> for JobListResponse {
    fn from(value: Vec<JobPosting>) -> Self {
        let items: Vec<JobResponse> = value.into_iter().map(Into::into).collect();
        Self {
            count: items.len(),
            items,
        }
    }
}
