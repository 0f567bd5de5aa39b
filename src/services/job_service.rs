use std::sync::Arc;

use tracing::info;
use uuid::Uuid;

use crate::database::RecordStore;
use crate::dto::job_dto::{CreateJobPayload, UpdateJobPayload};
use crate::error::{Error, Result};
use crate::models::{
    job::{JobChanges, JobPosting, JobSearch, JobStatus, NewJobPosting},
    user::{Role, User},
};
use crate::utils::time;

#[derive(Clone)]
pub struct JobService {
    store: Arc<dyn RecordStore>,
}

impl JobService {
    pub fn new(store: Arc<dyn RecordStore>) -> Self {
        Self { store }
    }

    /// Employers post under their own name; admins name the company.
    pub async fn create(&self, payload: CreateJobPayload, author: &User) -> Result<JobPosting> {
        let company_name = match author.role {
            Role::Employer => author.name.clone(),
            _ => payload
                .company_name
                .unwrap_or_else(|| "Unknown Company".to_string()),
        };
        let job = NewJobPosting {
            title: payload.title.trim().to_string(),
            company_name,
            job_type: payload.job_type,
            location: payload.location.trim().to_string(),
            salary: payload.salary.map(|s| s.trim().to_string()),
            description: payload.description,
            last_date: payload.last_date,
            status: payload.status.unwrap_or(JobStatus::Active),
            vacancies: payload.vacancies,
            posted_by: Some(author.id),
        };
        let created = self.store.insert_job(&job, time::now()).await?;
        info!(job_id = %created.id, vacancies = created.vacancies, "Job posting created");
        Ok(created)
    }

    /// Administrative overwrite; not part of the seat allocation race.
    pub async fn update(&self, id: Uuid, payload: UpdateJobPayload) -> Result<JobPosting> {
        let changes = JobChanges::from(payload);
        let updated = self
            .store
            .update_job(id, &changes, time::now())
            .await?
            .ok_or_else(|| Error::NotFound("Job not found".into()))?;
        info!(job_id = %id, status = %updated.status, vacancies = updated.vacancies, "Job posting updated");
        Ok(updated)
    }

    pub async fn delete(&self, id: Uuid) -> Result<()> {
        if !self.store.delete_job(id).await? {
            return Err(Error::NotFound("Job not found".into()));
        }
        info!(job_id = %id, "Job posting deleted");
        Ok(())
    }

    pub async fn get_by_id(&self, id: Uuid) -> Result<JobPosting> {
        self.store
            .get_job(id)
            .await?
            .ok_or_else(|| Error::NotFound("Job not found".into()))
    }

    pub async fn list_active(&self) -> Result<Vec<JobPosting>> {
        self.store.list_jobs(Some(JobStatus::Active)).await
    }

    pub async fn list_all(&self) -> Result<Vec<JobPosting>> {
        self.store.list_jobs(None).await
    }

    pub async fn search(&self, search: JobSearch) -> Result<Vec<JobPosting>> {
        self.store.search_jobs(&search).await
    }
}
