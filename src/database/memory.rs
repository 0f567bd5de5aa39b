use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use tokio::sync::Mutex;
use uuid::Uuid;

use super::store::{ApplicationFilter, RecordStore, StoreInsert};
use crate::error::{Error, Result};
use crate::models::{
    application::{Application, ApplicationStatus},
    job::{JobChanges, JobPosting, JobSearch, JobStatus, NewJobPosting},
    resume::Resume,
    user::User,
};

#[derive(Debug, Default)]
struct Tables {
    users: HashMap<Uuid, User>,
    jobs: HashMap<Uuid, JobPosting>,
    resumes: HashMap<Uuid, Resume>,
    applications: HashMap<Uuid, Application>,
}

/// Process-local record store.
///
/// Each call holds the table lock for its whole body and never across an
/// await, which makes every primitive atomic with respect to the others.
#[derive(Debug, Default)]
pub struct InMemoryStore {
    tables: Mutex<Tables>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

fn newest_first<T, K: Ord>(mut items: Vec<T>, key: impl Fn(&T) -> K) -> Vec<T> {
    items.sort_by_key(|item| std::cmp::Reverse(key(item)));
    items
}

#[async_trait]
impl RecordStore for InMemoryStore {
    async fn insert_user(&self, user: &User) -> Result<User> {
        let mut tables = self.tables.lock().await;
        if tables.users.values().any(|u| u.email == user.email) {
            return Err(Error::Conflict(format!(
                "A user with email {} already exists",
                user.email
            )));
        }
        tables.users.insert(user.id, user.clone());
        Ok(user.clone())
    }

    async fn get_user(&self, id: Uuid) -> Result<Option<User>> {
        Ok(self.tables.lock().await.users.get(&id).cloned())
    }

    async fn list_users(&self) -> Result<Vec<User>> {
        let tables = self.tables.lock().await;
        let items = tables.users.values().cloned().collect();
        Ok(newest_first(items, |u: &User| u.created_at))
    }

    async fn insert_job(&self, job: &NewJobPosting, now: DateTime<Utc>) -> Result<JobPosting> {
        let posting = JobPosting {
            id: Uuid::new_v4(),
            title: job.title.clone(),
            company_name: job.company_name.clone(),
            job_type: job.job_type,
            location: job.location.clone(),
            salary: job.salary.clone(),
            description: job.description.clone(),
            last_date: job.last_date,
            status: if job.vacancies == 0 {
                JobStatus::Closed
            } else {
                job.status
            },
            vacancies: job.vacancies,
            posted_by: job.posted_by,
            created_at: now,
            updated_at: now,
        };
        self.tables
            .lock()
            .await
            .jobs
            .insert(posting.id, posting.clone());
        Ok(posting)
    }

    async fn get_job(&self, id: Uuid) -> Result<Option<JobPosting>> {
        Ok(self.tables.lock().await.jobs.get(&id).cloned())
    }

    async fn list_jobs(&self, status: Option<JobStatus>) -> Result<Vec<JobPosting>> {
        let tables = self.tables.lock().await;
        let items = tables
            .jobs
            .values()
            .filter(|job| status.map_or(true, |s| job.status == s))
            .cloned()
            .collect();
        Ok(newest_first(items, |job: &JobPosting| job.created_at))
    }

    async fn search_jobs(&self, search: &JobSearch) -> Result<Vec<JobPosting>> {
        let tables = self.tables.lock().await;
        let items = tables
            .jobs
            .values()
            .filter(|job| search.matches(job))
            .cloned()
            .collect();
        Ok(newest_first(items, |job: &JobPosting| job.created_at))
    }

    async fn update_job(
        &self,
        id: Uuid,
        changes: &JobChanges,
        now: DateTime<Utc>,
    ) -> Result<Option<JobPosting>> {
        let mut tables = self.tables.lock().await;
        let Some(job) = tables.jobs.get_mut(&id) else {
            return Ok(None);
        };
        changes.apply_to(job, now);
        Ok(Some(job.clone()))
    }

    async fn delete_job(&self, id: Uuid) -> Result<bool> {
        let mut tables = self.tables.lock().await;
        let removed = tables.jobs.remove(&id).is_some();
        if removed {
            tables.applications.retain(|_, app| app.job_id != id);
        }
        Ok(removed)
    }

    async fn decrement_vacancy(&self, id: Uuid, now: DateTime<Utc>) -> Result<Option<JobPosting>> {
        let mut tables = self.tables.lock().await;
        let Some(job) = tables.jobs.get_mut(&id) else {
            return Ok(None);
        };
        if !job.is_open() {
            return Ok(None);
        }
        job.vacancies -= 1;
        if job.vacancies == 0 {
            job.status = JobStatus::Closed;
        }
        job.updated_at = now;
        Ok(Some(job.clone()))
    }

    async fn release_vacancy(&self, id: Uuid, now: DateTime<Utc>) -> Result<Option<JobPosting>> {
        let mut tables = self.tables.lock().await;
        let Some(job) = tables.jobs.get_mut(&id) else {
            return Ok(None);
        };
        if job.status == JobStatus::Closed && job.vacancies == 0 && job.last_date > now {
            job.status = JobStatus::Active;
        }
        job.vacancies += 1;
        job.updated_at = now;
        Ok(Some(job.clone()))
    }

    async fn close_expired(&self, now: DateTime<Utc>) -> Result<u64> {
        let mut tables = self.tables.lock().await;
        let mut closed = 0;
        for job in tables.jobs.values_mut() {
            if job.status == JobStatus::Active && job.last_date < now {
                job.status = JobStatus::Closed;
                job.updated_at = now;
                closed += 1;
            }
        }
        Ok(closed)
    }

    async fn insert_resume(&self, resume: &Resume) -> Result<Resume> {
        let mut tables = self.tables.lock().await;
        if !tables.users.contains_key(&resume.owner_id) {
            return Err(Error::NotFound("User not found".into()));
        }
        tables.resumes.insert(resume.id, resume.clone());
        Ok(resume.clone())
    }

    async fn get_resume(&self, id: Uuid) -> Result<Option<Resume>> {
        Ok(self.tables.lock().await.resumes.get(&id).cloned())
    }

    async fn list_resumes(&self, owner_id: Uuid) -> Result<Vec<Resume>> {
        let tables = self.tables.lock().await;
        let items = tables
            .resumes
            .values()
            .filter(|r| r.owner_id == owner_id)
            .cloned()
            .collect();
        Ok(newest_first(items, |r: &Resume| r.uploaded_at))
    }

    async fn list_all_resumes(&self) -> Result<Vec<Resume>> {
        let tables = self.tables.lock().await;
        let items = tables.resumes.values().cloned().collect();
        Ok(newest_first(items, |r: &Resume| r.uploaded_at))
    }

    async fn delete_resume(&self, id: Uuid) -> Result<bool> {
        let mut tables = self.tables.lock().await;
        let removed = tables.resumes.remove(&id).is_some();
        if removed {
            for app in tables.applications.values_mut() {
                if app.resume_id == Some(id) {
                    app.resume_id = None;
                }
            }
        }
        Ok(removed)
    }

    async fn insert_application(
        &self,
        application: &Application,
    ) -> Result<StoreInsert<Application>> {
        let mut tables = self.tables.lock().await;
        if !tables.users.contains_key(&application.applicant_id) {
            return Err(Error::NotFound("User not found".into()));
        }
        if !tables.jobs.contains_key(&application.job_id) {
            return Err(Error::NotFound("Job not found".into()));
        }
        if let Some(resume_id) = application.resume_id {
            if !tables.resumes.contains_key(&resume_id) {
                return Err(Error::NotFound("Resume not found".into()));
            }
        }
        let duplicate = tables.applications.values().any(|existing| {
            existing.applicant_id == application.applicant_id
                && existing.job_id == application.job_id
        });
        if duplicate {
            return Ok(StoreInsert::Conflict);
        }
        tables
            .applications
            .insert(application.id, application.clone());
        Ok(StoreInsert::Inserted(application.clone()))
    }

    async fn get_application(&self, id: Uuid) -> Result<Option<Application>> {
        Ok(self.tables.lock().await.applications.get(&id).cloned())
    }

    async fn find_application(
        &self,
        applicant_id: Uuid,
        job_id: Uuid,
    ) -> Result<Option<Application>> {
        let tables = self.tables.lock().await;
        Ok(tables
            .applications
            .values()
            .find(|app| app.applicant_id == applicant_id && app.job_id == job_id)
            .cloned())
    }

    async fn list_applications(&self, filter: ApplicationFilter) -> Result<Vec<Application>> {
        let tables = self.tables.lock().await;
        let items = tables
            .applications
            .values()
            .filter(|app| filter.matches(app))
            .cloned()
            .collect();
        Ok(newest_first(items, |app: &Application| app.applied_at))
    }

    async fn set_application_status(
        &self,
        id: Uuid,
        status: ApplicationStatus,
        now: DateTime<Utc>,
    ) -> Result<Option<Application>> {
        let mut tables = self.tables.lock().await;
        let Some(app) = tables.applications.get_mut(&id) else {
            return Ok(None);
        };
        app.status = status;
        app.updated_at = now;
        Ok(Some(app.clone()))
    }

    async fn delete_application(&self, id: Uuid) -> Result<bool> {
        Ok(self.tables.lock().await.applications.remove(&id).is_some())
    }

    async fn delete_owned_application(&self, id: Uuid, owner_id: Uuid) -> Result<bool> {
        let mut tables = self.tables.lock().await;
        match tables.applications.get(&id) {
            Some(app) if app.is_owned_by(owner_id) => {
                tables.applications.remove(&id);
                Ok(true)
            }
            _ => Ok(false),
        }
    }
}
