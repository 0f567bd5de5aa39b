use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum JobStatus {
    Active,
    Closed,
    Draft,
}

impl JobStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            JobStatus::Active => "active",
            JobStatus::Closed => "closed",
            JobStatus::Draft => "draft",
        }
    }
}

impl fmt::Display for JobStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for JobStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "active" => Ok(JobStatus::Active),
            "closed" => Ok(JobStatus::Closed),
            "draft" => Ok(JobStatus::Draft),
            other => Err(format!("invalid job status '{}'", other)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum JobType {
    FullTime,
    PartTime,
    Contract,
    Internship,
    Remote,
}

impl JobType {
    pub fn as_str(&self) -> &'static str {
        match self {
            JobType::FullTime => "full-time",
            JobType::PartTime => "part-time",
            JobType::Contract => "contract",
            JobType::Internship => "internship",
            JobType::Remote => "remote",
        }
    }
}

impl fmt::Display for JobType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for JobType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "full-time" => Ok(JobType::FullTime),
            "part-time" => Ok(JobType::PartTime),
            "contract" => Ok(JobType::Contract),
            "internship" => Ok(JobType::Internship),
            "remote" => Ok(JobType::Remote),
            other => Err(format!("invalid job type '{}'", other)),
        }
    }
}

/// A job posting and its pool of open seats.
///
/// `vacancies == 0` always comes with `status == Closed`; a closed posting
/// may still have seats left when it was closed by its deadline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JobPosting {
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
    pub posted_by: Option<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl JobPosting {
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        now > self.last_date
    }

    pub fn has_vacancies(&self) -> bool {
        self.vacancies > 0
    }

    /// What a reservation checks, evaluated against a snapshot. Only the
    /// store's conditional update is authoritative.
    pub fn is_open(&self) -> bool {
        self.status == JobStatus::Active && self.has_vacancies()
    }
}

/// Fields for a new posting; the store assigns id and timestamps.
#[derive(Debug, Clone)]
pub struct NewJobPosting {
    pub title: String,
    pub company_name: String,
    pub job_type: JobType,
    pub location: String,
    pub salary: Option<String>,
    pub description: String,
    pub last_date: DateTime<Utc>,
    pub status: JobStatus,
    pub vacancies: i32,
    pub posted_by: Option<Uuid>,
}

/// Administrative overwrite. `None` leaves a field untouched.
#[derive(Debug, Clone, Default)]
pub struct JobChanges {
    pub title: Option<String>,
    pub company_name: Option<String>,
    pub job_type: Option<JobType>,
    pub location: Option<String>,
    pub salary: Option<String>,
    pub description: Option<String>,
    pub last_date: Option<DateTime<Utc>>,
    pub status: Option<JobStatus>,
    pub vacancies: Option<i32>,
}

impl JobChanges {
    /// Applies the overwrite to `job`, keeping exhausted postings closed.
    pub fn apply_to(&self, job: &mut JobPosting, now: DateTime<Utc>) {
        if let Some(title) = &self.title {
            job.title = title.clone();
        }
        if let Some(company_name) = &self.company_name {
            job.company_name = company_name.clone();
        }
        if let Some(job_type) = self.job_type {
            job.job_type = job_type;
        }
        if let Some(location) = &self.location {
            job.location = location.clone();
        }
        if let Some(salary) = &self.salary {
            job.salary = Some(salary.clone());
        }
        if let Some(description) = &self.description {
            job.description = description.clone();
        }
        if let Some(last_date) = self.last_date {
            job.last_date = last_date;
        }
        if let Some(status) = self.status {
            job.status = status;
        }
        if let Some(vacancies) = self.vacancies {
            job.vacancies = vacancies;
        }
        if job.vacancies == 0 {
            job.status = JobStatus::Closed;
        }
        job.updated_at = now;
    }
}

#[derive(Debug, Clone, Default)]
pub struct JobSearch {
    pub keyword: Option<String>,
    pub job_type: Option<JobType>,
    pub location: Option<String>,
}

impl JobSearch {
    pub fn matches(&self, job: &JobPosting) -> bool {
        if job.status != JobStatus::Active {
            return false;
        }
        if let Some(keyword) = &self.keyword {
            let keyword = keyword.to_lowercase();
            let hit = [&job.title, &job.company_name, &job.description]
                .iter()
                .any(|field| field.to_lowercase().contains(&keyword));
            if !hit {
                return false;
            }
        }
        if let Some(job_type) = self.job_type {
            if job.job_type != job_type {
                return false;
            }
        }
        if let Some(location) = &self.location {
            if !job.location.to_lowercase().contains(&location.to_lowercase()) {
                return false;
            }
        }
        true
    }
}
