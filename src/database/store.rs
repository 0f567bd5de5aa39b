//! The record store capability the allocator, lifecycle and sweep are built on.
//!
//! Every method is one round trip and is atomic on its own. Correctness of
//! seat allocation comes entirely from [`RecordStore::decrement_vacancy`]
//! checking and mutating in a single step; callers never read a job and then
//! write it back.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::error::Result;
use crate::models::{
    application::{Application, ApplicationStatus},
    job::{JobChanges, JobPosting, JobSearch, JobStatus, NewJobPosting},
    resume::Resume,
    user::User,
};

/// Result of an insert guarded by a uniqueness constraint.
#[derive(Debug, Clone, PartialEq)]
pub enum StoreInsert<T> {
    Inserted(T),
    Conflict,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApplicationFilter {
    All,
    Applicant(Uuid),
    Job(Uuid),
}

impl ApplicationFilter {
    pub fn matches(&self, application: &Application) -> bool {
        match self {
            ApplicationFilter::All => true,
            ApplicationFilter::Applicant(id) => application.applicant_id == *id,
            ApplicationFilter::Job(id) => application.job_id == *id,
        }
    }
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait RecordStore: Send + Sync {
    async fn insert_user(&self, user: &User) -> Result<User>;
    async fn get_user(&self, id: Uuid) -> Result<Option<User>>;
    /// Newest first.
    async fn list_users(&self) -> Result<Vec<User>>;

    async fn insert_job(&self, job: &NewJobPosting, now: DateTime<Utc>) -> Result<JobPosting>;
    async fn get_job(&self, id: Uuid) -> Result<Option<JobPosting>>;
    /// Newest first; `None` lists every posting.
    async fn list_jobs(&self, status: Option<JobStatus>) -> Result<Vec<JobPosting>>;
    /// Active postings matching the search, newest first.
    async fn search_jobs(&self, search: &JobSearch) -> Result<Vec<JobPosting>>;
    /// Unconditional overwrite. A resulting vacancy count of 0 forces `closed`.
    async fn update_job(
        &self,
        id: Uuid,
        changes: &JobChanges,
        now: DateTime<Utc>,
    ) -> Result<Option<JobPosting>>;
    async fn delete_job(&self, id: Uuid) -> Result<bool>;

    /// Takes one seat iff the job is `active` with `vacancies > 0`, closing
    /// it in the same step when the last seat goes. `None` when the
    /// precondition did not hold (including an unknown id).
    async fn decrement_vacancy(&self, id: Uuid, now: DateTime<Utc>) -> Result<Option<JobPosting>>;

    /// Gives one seat back. A posting that went from 0 to 1 and whose
    /// deadline is still ahead is reopened.
    async fn release_vacancy(&self, id: Uuid, now: DateTime<Utc>) -> Result<Option<JobPosting>>;

    /// Closes every active posting whose `last_date` is before `now` in one
    /// range update, returning how many changed.
    async fn close_expired(&self, now: DateTime<Utc>) -> Result<u64>;

    /// `NotFound` when the owner does not exist.
    async fn insert_resume(&self, resume: &Resume) -> Result<Resume>;
    async fn get_resume(&self, id: Uuid) -> Result<Option<Resume>>;
    async fn list_resumes(&self, owner_id: Uuid) -> Result<Vec<Resume>>;
    /// Every owner's résumés, newest first.
    async fn list_all_resumes(&self) -> Result<Vec<Resume>>;
    async fn delete_resume(&self, id: Uuid) -> Result<bool>;

    /// Enforces one application per (applicant, job). A reference to a
    /// missing applicant, job or résumé is `NotFound`.
    async fn insert_application(
        &self,
        application: &Application,
    ) -> Result<StoreInsert<Application>>;
    async fn get_application(&self, id: Uuid) -> Result<Option<Application>>;
    async fn find_application(
        &self,
        applicant_id: Uuid,
        job_id: Uuid,
    ) -> Result<Option<Application>>;
    /// Most recently applied first.
    async fn list_applications(&self, filter: ApplicationFilter) -> Result<Vec<Application>>;
    async fn set_application_status(
        &self,
        id: Uuid,
        status: ApplicationStatus,
        now: DateTime<Utc>,
    ) -> Result<Option<Application>>;
    async fn delete_application(&self, id: Uuid) -> Result<bool>;
    /// Deletes only when `owner_id` is the applicant.
    async fn delete_owned_application(&self, id: Uuid, owner_id: Uuid) -> Result<bool>;
}
