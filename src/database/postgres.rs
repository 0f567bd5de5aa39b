use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{postgres::PgRow, PgPool, Row};
use std::str::FromStr;
use tracing::instrument;
use uuid::Uuid;

use super::store::{ApplicationFilter, RecordStore, StoreInsert};
use crate::error::{Error, Result};
use crate::models::{
    application::{Application, ApplicationStatus},
    job::{JobChanges, JobPosting, JobSearch, JobStatus, NewJobPosting},
    resume::Resume,
    user::User,
};

const JOB_COLUMNS: &str = "id, title, company_name, job_type, location, salary, description, \
     last_date, status, vacancies, posted_by, created_at, updated_at";
const APPLICATION_COLUMNS: &str =
    "id, applicant_id, job_id, resume_id, status, applied_at, updated_at";
const RESUME_COLUMNS: &str =
    "id, owner_id, file_name, content_type, file_size, storage_url, uploaded_at";

const UNIQUE_VIOLATION: &str = "23505";
const FOREIGN_KEY_VIOLATION: &str = "23503";

#[derive(Clone)]
pub struct PgRecordStore {
    pool: PgPool,
}

impl PgRecordStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    fn row_to_job(row: &PgRow) -> Result<JobPosting> {
        Ok(JobPosting {
            id: row.try_get("id")?,
            title: row.try_get("title")?,
            company_name: row.try_get("company_name")?,
            job_type: parse_column(row, "job_type")?,
            location: row.try_get("location")?,
            salary: row.try_get("salary")?,
            description: row.try_get("description")?,
            last_date: row.try_get("last_date")?,
            status: parse_column(row, "status")?,
            vacancies: row.try_get("vacancies")?,
            posted_by: row.try_get("posted_by")?,
            created_at: row.try_get("created_at")?,
            updated_at: row.try_get("updated_at")?,
        })
    }

    fn row_to_application(row: &PgRow) -> Result<Application> {
        Ok(Application {
            id: row.try_get("id")?,
            applicant_id: row.try_get("applicant_id")?,
            job_id: row.try_get("job_id")?,
            resume_id: row.try_get("resume_id")?,
            status: parse_column(row, "status")?,
            applied_at: row.try_get("applied_at")?,
            updated_at: row.try_get("updated_at")?,
        })
    }

    fn row_to_resume(row: &PgRow) -> Result<Resume> {
        Ok(Resume {
            id: row.try_get("id")?,
            owner_id: row.try_get("owner_id")?,
            file_name: row.try_get("file_name")?,
            content_type: row.try_get("content_type")?,
            file_size: row.try_get("file_size")?,
            storage_url: row.try_get("storage_url")?,
            uploaded_at: row.try_get("uploaded_at")?,
        })
    }

    fn row_to_user(row: &PgRow) -> Result<User> {
        Ok(User {
            id: row.try_get("id")?,
            name: row.try_get("name")?,
            email: row.try_get("email")?,
            role: parse_column(row, "role")?,
            created_at: row.try_get("created_at")?,
        })
    }
}

fn parse_column<T>(row: &PgRow, column: &str) -> Result<T>
where
    T: FromStr<Err = String>,
{
    let raw: String = row.try_get(column)?;
    raw.parse()
        .map_err(|e| Error::Internal(format!("Column {}: {}", column, e)))
}

fn is_unique_violation(err: &sqlx::Error) -> bool {
    match err {
        sqlx::Error::Database(db_err) => db_err.code().as_deref() == Some(UNIQUE_VIOLATION),
        _ => false,
    }
}

/// Names the missing record behind a foreign key violation, keyed on the
/// default `<table>_<column>_fkey` constraint names.
fn missing_reference(err: &sqlx::Error) -> Option<Error> {
    let sqlx::Error::Database(db_err) = err else {
        return None;
    };
    if db_err.code().as_deref() != Some(FOREIGN_KEY_VIOLATION) {
        return None;
    }
    let what = match db_err.constraint() {
        Some(c) if c.ends_with("job_id_fkey") => "Job",
        Some(c) if c.ends_with("resume_id_fkey") => "Resume",
        _ => "User",
    };
    Some(Error::NotFound(format!("{} not found", what)))
}

#[async_trait]
impl RecordStore for PgRecordStore {
    async fn insert_user(&self, user: &User) -> Result<User> {
        let result = sqlx::query(
            r#"
            INSERT INTO users (id, name, email, role, created_at)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id, name, email, role, created_at
            "#,
        )
        .bind(user.id)
        .bind(&user.name)
        .bind(&user.email)
        .bind(user.role.as_str())
        .bind(user.created_at)
        .fetch_one(&self.pool)
        .await;

        match result {
            Ok(row) => Self::row_to_user(&row),
            Err(e) if is_unique_violation(&e) => Err(Error::Conflict(format!(
                "A user with email {} already exists",
                user.email
            ))),
            Err(e) => Err(e.into()),
        }
    }

    async fn get_user(&self, id: Uuid) -> Result<Option<User>> {
        let row = sqlx::query("SELECT id, name, email, role, created_at FROM users WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        row.as_ref().map(Self::row_to_user).transpose()
    }

    async fn list_users(&self) -> Result<Vec<User>> {
        let rows = sqlx::query(
            "SELECT id, name, email, role, created_at FROM users ORDER BY created_at DESC",
        )
        .fetch_all(&self.pool)
        .await?;
        rows.iter().map(Self::row_to_user).collect()
    }

    async fn insert_job(&self, job: &NewJobPosting, now: DateTime<Utc>) -> Result<JobPosting> {
        let status = if job.vacancies == 0 {
            JobStatus::Closed
        } else {
            job.status
        };
        let query = format!(
            r#"
            INSERT INTO job_postings (
                id, title, company_name, job_type, location, salary, description,
                last_date, status, vacancies, posted_by, created_at, updated_at
            ) VALUES (
                $1,$2,$3,$4,$5,$6,$7,
                $8,$9,$10,$11,$12,$12
            )
            RETURNING {}
            "#,
            JOB_COLUMNS
        );
        let row = sqlx::query(&query)
            .bind(Uuid::new_v4())
            .bind(&job.title)
            .bind(&job.company_name)
            .bind(job.job_type.as_str())
            .bind(&job.location)
            .bind(&job.salary)
            .bind(&job.description)
            .bind(job.last_date)
            .bind(status.as_str())
            .bind(job.vacancies)
            .bind(job.posted_by)
            .bind(now)
            .fetch_one(&self.pool)
            .await?;
        Self::row_to_job(&row)
    }

    async fn get_job(&self, id: Uuid) -> Result<Option<JobPosting>> {
        let query = format!("SELECT {} FROM job_postings WHERE id = $1", JOB_COLUMNS);
        let row = sqlx::query(&query)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        row.as_ref().map(Self::row_to_job).transpose()
    }

    async fn list_jobs(&self, status: Option<JobStatus>) -> Result<Vec<JobPosting>> {
        let query = format!(
            "SELECT {} FROM job_postings
             WHERE ($1::text IS NULL OR status = $1)
             ORDER BY created_at DESC",
            JOB_COLUMNS
        );
        let rows = sqlx::query(&query)
            .bind(status.map(|s| s.as_str()))
            .fetch_all(&self.pool)
            .await?;
        rows.iter().map(Self::row_to_job).collect()
    }

    async fn search_jobs(&self, search: &JobSearch) -> Result<Vec<JobPosting>> {
        let mut filters = vec!["status = 'active'".to_string()];
        let mut args: Vec<String> = Vec::new();

        if let Some(keyword) = &search.keyword {
            let n = args.len() + 1;
            filters.push(format!(
                "(title ILIKE ${n} OR company_name ILIKE ${n} OR description ILIKE ${n})"
            ));
            args.push(format!("%{}%", keyword));
        }
        if let Some(job_type) = search.job_type {
            filters.push(format!("job_type = ${}", args.len() + 1));
            args.push(job_type.as_str().to_string());
        }
        if let Some(location) = &search.location {
            filters.push(format!("location ILIKE ${}", args.len() + 1));
            args.push(format!("%{}%", location));
        }

        let query = format!(
            "SELECT {} FROM job_postings WHERE {} ORDER BY created_at DESC",
            JOB_COLUMNS,
            filters.join(" AND ")
        );
        let mut statement = sqlx::query(&query);
        for value in &args {
            statement = statement.bind(value);
        }
        let rows = statement.fetch_all(&self.pool).await?;
        rows.iter().map(Self::row_to_job).collect()
    }

    async fn update_job(
        &self,
        id: Uuid,
        changes: &JobChanges,
        now: DateTime<Utc>,
    ) -> Result<Option<JobPosting>> {
        let query = format!(
            r#"
            UPDATE job_postings
            SET
                title = COALESCE($2, title),
                company_name = COALESCE($3, company_name),
                job_type = COALESCE($4, job_type),
                location = COALESCE($5, location),
                salary = COALESCE($6, salary),
                description = COALESCE($7, description),
                last_date = COALESCE($8, last_date),
                vacancies = COALESCE($9, vacancies),
                status = CASE
                    WHEN COALESCE($9, vacancies) = 0 THEN 'closed'
                    ELSE COALESCE($10, status)
                END,
                updated_at = $11
            WHERE id = $1
            RETURNING {}
            "#,
            JOB_COLUMNS
        );
        let row = sqlx::query(&query)
            .bind(id)
            .bind(&changes.title)
            .bind(&changes.company_name)
            .bind(changes.job_type.map(|t| t.as_str()))
            .bind(&changes.location)
            .bind(&changes.salary)
            .bind(&changes.description)
            .bind(changes.last_date)
            .bind(changes.vacancies)
            .bind(changes.status.map(|s| s.as_str()))
            .bind(now)
            .fetch_optional(&self.pool)
            .await?;
        row.as_ref().map(Self::row_to_job).transpose()
    }

    async fn delete_job(&self, id: Uuid) -> Result<bool> {
        let res = sqlx::query("DELETE FROM job_postings WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(res.rows_affected() > 0)
    }

    #[instrument(skip(self))]
    async fn decrement_vacancy(&self, id: Uuid, now: DateTime<Utc>) -> Result<Option<JobPosting>> {
        let query = format!(
            r#"
            UPDATE job_postings
            SET
                vacancies = vacancies - 1,
                status = CASE WHEN vacancies = 1 THEN 'closed' ELSE status END,
                updated_at = $2
            WHERE id = $1
              AND status = 'active'
              AND vacancies > 0
            RETURNING {}
            "#,
            JOB_COLUMNS
        );
        let row = sqlx::query(&query)
            .bind(id)
            .bind(now)
            .fetch_optional(&self.pool)
            .await?;
        row.as_ref().map(Self::row_to_job).transpose()
    }

    #[instrument(skip(self))]
    async fn release_vacancy(&self, id: Uuid, now: DateTime<Utc>) -> Result<Option<JobPosting>> {
        let query = format!(
            r#"
            UPDATE job_postings
            SET
                vacancies = vacancies + 1,
                status = CASE
                    WHEN status = 'closed' AND vacancies = 0 AND last_date > $2 THEN 'active'
                    ELSE status
                END,
                updated_at = $2
            WHERE id = $1
            RETURNING {}
            "#,
            JOB_COLUMNS
        );
        let row = sqlx::query(&query)
            .bind(id)
            .bind(now)
            .fetch_optional(&self.pool)
            .await?;
        row.as_ref().map(Self::row_to_job).transpose()
    }

    #[instrument(skip(self))]
    async fn close_expired(&self, now: DateTime<Utc>) -> Result<u64> {
        let res = sqlx::query(
            r#"
            UPDATE job_postings
            SET status = 'closed', updated_at = $1
            WHERE status = 'active'
              AND last_date < $1
            "#,
        )
        .bind(now)
        .execute(&self.pool)
        .await?;
        Ok(res.rows_affected())
    }

    async fn insert_resume(&self, resume: &Resume) -> Result<Resume> {
        let query = format!(
            r#"
            INSERT INTO resumes ({cols})
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING {cols}
            "#,
            cols = RESUME_COLUMNS
        );
        let result = sqlx::query(&query)
            .bind(resume.id)
            .bind(resume.owner_id)
            .bind(&resume.file_name)
            .bind(&resume.content_type)
            .bind(resume.file_size)
            .bind(&resume.storage_url)
            .bind(resume.uploaded_at)
            .fetch_one(&self.pool)
            .await;

        match result {
            Ok(row) => Self::row_to_resume(&row),
            Err(e) => Err(missing_reference(&e).unwrap_or_else(|| e.into())),
        }
    }

    async fn get_resume(&self, id: Uuid) -> Result<Option<Resume>> {
        let query = format!("SELECT {} FROM resumes WHERE id = $1", RESUME_COLUMNS);
        let row = sqlx::query(&query)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        row.as_ref().map(Self::row_to_resume).transpose()
    }

    async fn list_resumes(&self, owner_id: Uuid) -> Result<Vec<Resume>> {
        let query = format!(
            "SELECT {} FROM resumes WHERE owner_id = $1 ORDER BY uploaded_at DESC",
            RESUME_COLUMNS
        );
        let rows = sqlx::query(&query)
            .bind(owner_id)
            .fetch_all(&self.pool)
            .await?;
        rows.iter().map(Self::row_to_resume).collect()
    }

    async fn list_all_resumes(&self) -> Result<Vec<Resume>> {
        let query = format!(
            "SELECT {} FROM resumes ORDER BY uploaded_at DESC",
            RESUME_COLUMNS
        );
        let rows = sqlx::query(&query).fetch_all(&self.pool).await?;
        rows.iter().map(Self::row_to_resume).collect()
    }

    async fn delete_resume(&self, id: Uuid) -> Result<bool> {
        let res = sqlx::query("DELETE FROM resumes WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(res.rows_affected() > 0)
    }

    #[instrument(skip(self, application), fields(
        applicant_id = %application.applicant_id,
        job_id = %application.job_id,
    ))]
    async fn insert_application(
        &self,
        application: &Application,
    ) -> Result<StoreInsert<Application>> {
        let query = format!(
            r#"
            INSERT INTO applications ({cols})
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING {cols}
            "#,
            cols = APPLICATION_COLUMNS
        );
        let result = sqlx::query(&query)
            .bind(application.id)
            .bind(application.applicant_id)
            .bind(application.job_id)
            .bind(application.resume_id)
            .bind(application.status.as_str())
            .bind(application.applied_at)
            .bind(application.updated_at)
            .fetch_one(&self.pool)
            .await;

        match result {
            Ok(row) => Ok(StoreInsert::Inserted(Self::row_to_application(&row)?)),
            Err(e) if is_unique_violation(&e) => Ok(StoreInsert::Conflict),
            Err(e) => Err(missing_reference(&e).unwrap_or_else(|| e.into())),
        }
    }

    async fn get_application(&self, id: Uuid) -> Result<Option<Application>> {
        let query = format!(
            "SELECT {} FROM applications WHERE id = $1",
            APPLICATION_COLUMNS
        );
        let row = sqlx::query(&query)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        row.as_ref().map(Self::row_to_application).transpose()
    }

    async fn find_application(
        &self,
        applicant_id: Uuid,
        job_id: Uuid,
    ) -> Result<Option<Application>> {
        let query = format!(
            "SELECT {} FROM applications WHERE applicant_id = $1 AND job_id = $2",
            APPLICATION_COLUMNS
        );
        let row = sqlx::query(&query)
            .bind(applicant_id)
            .bind(job_id)
            .fetch_optional(&self.pool)
            .await?;
        row.as_ref().map(Self::row_to_application).transpose()
    }

    async fn list_applications(&self, filter: ApplicationFilter) -> Result<Vec<Application>> {
        let (where_clause, arg) = match filter {
            ApplicationFilter::All => ("", None),
            ApplicationFilter::Applicant(id) => ("WHERE applicant_id = $1", Some(id)),
            ApplicationFilter::Job(id) => ("WHERE job_id = $1", Some(id)),
        };
        let query = format!(
            "SELECT {} FROM applications {} ORDER BY applied_at DESC",
            APPLICATION_COLUMNS, where_clause
        );
        let mut statement = sqlx::query(&query);
        if let Some(id) = arg {
            statement = statement.bind(id);
        }
        let rows = statement.fetch_all(&self.pool).await?;
        rows.iter().map(Self::row_to_application).collect()
    }

    async fn set_application_status(
        &self,
        id: Uuid,
        status: ApplicationStatus,
        now: DateTime<Utc>,
    ) -> Result<Option<Application>> {
        let query = format!(
            r#"
            UPDATE applications
            SET status = $2, updated_at = $3
            WHERE id = $1
            RETURNING {}
            "#,
            APPLICATION_COLUMNS
        );
        let row = sqlx::query(&query)
            .bind(id)
            .bind(status.as_str())
            .bind(now)
            .fetch_optional(&self.pool)
            .await?;
        row.as_ref().map(Self::row_to_application).transpose()
    }

    async fn delete_application(&self, id: Uuid) -> Result<bool> {
        let res = sqlx::query("DELETE FROM applications WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(res.rows_affected() > 0)
    }

    async fn delete_owned_application(&self, id: Uuid, owner_id: Uuid) -> Result<bool> {
        let res = sqlx::query("DELETE FROM applications WHERE id = $1 AND applicant_id = $2")
            .bind(id)
            .bind(owner_id)
            .execute(&self.pool)
            .await?;
        Ok(res.rows_affected() > 0)
    }
}
