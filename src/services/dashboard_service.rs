use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use tracing::instrument;

use crate::database::{ApplicationFilter, RecordStore};
use crate::dto::dashboard_dto::{ApplicationCounts, DashboardStats, JobCounts, UserCounts};
use crate::error::Result;
use crate::models::{
    application::{Application, ApplicationStatus},
    job::{JobPosting, JobStatus},
    user::{Role, User},
};
use crate::utils::time;

const RECENT_DAYS: i64 = 7;

/// Counts for the admin dashboard.
#[derive(Clone)]
pub struct DashboardService {
    store: Arc<dyn RecordStore>,
}

impl DashboardService {
    pub fn new(store: Arc<dyn RecordStore>) -> Self {
        Self { store }
    }

    #[instrument(skip(self))]
    pub async fn stats(&self) -> Result<DashboardStats> {
        let users = self.store.list_users().await?;
        let jobs = self.store.list_jobs(None).await?;
        let applications = self
            .store
            .list_applications(ApplicationFilter::All)
            .await?;

        let now = time::now();
        let since = now - Duration::days(RECENT_DAYS);
        Ok(DashboardStats {
            users: count_users(&users, since),
            jobs: count_jobs(&jobs, now),
            applications: count_applications(&applications, since),
        })
    }
}

fn count_users(users: &[User], since: DateTime<Utc>) -> UserCounts {
    let with_role = |role: Role| users.iter().filter(|u| u.role == role).count();
    UserCounts {
        total: users.len(),
        applicants: with_role(Role::Applicant),
        employers: with_role(Role::Employer),
        admins: with_role(Role::Admin),
        recent: users.iter().filter(|u| u.created_at >= since).count(),
    }
}

fn count_jobs(jobs: &[JobPosting], now: DateTime<Utc>) -> JobCounts {
    let with_status = |status: JobStatus| jobs.iter().filter(|j| j.status == status).count();
    JobCounts {
        total: jobs.len(),
        active: with_status(JobStatus::Active),
        closed: with_status(JobStatus::Closed),
        draft: with_status(JobStatus::Draft),
        awaiting_sweep: jobs
            .iter()
            .filter(|j| j.status == JobStatus::Active && j.is_expired(now))
            .count(),
        open_seats: jobs
            .iter()
            .filter(|j| j.is_open())
            .map(|j| i64::from(j.vacancies))
            .sum(),
    }
}

fn count_applications(applications: &[Application], since: DateTime<Utc>) -> ApplicationCounts {
    let with_status = |status: ApplicationStatus| {
        applications
            .iter()
            .filter(|a| a.status == status)
            .count()
    };
    ApplicationCounts {
        total: applications.len(),
        pending: with_status(ApplicationStatus::Pending),
        reviewed: with_status(ApplicationStatus::Reviewed),
        accepted: with_status(ApplicationStatus::Accepted),
        rejected: with_status(ApplicationStatus::Rejected),
        recent: applications.iter().filter(|a| a.applied_at >= since).count(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::store::MockRecordStore;
    use crate::models::job::JobType;
    use uuid::Uuid;

    fn job(status: JobStatus, vacancies: i32, last_date: DateTime<Utc>) -> JobPosting {
        let now = Utc::now();
        JobPosting {
            id: Uuid::new_v4(),
            title: "Accountant".into(),
            company_name: "Acme".into(),
            job_type: JobType::FullTime,
            location: "Namangan".into(),
            salary: None,
            description: "Balance the books".into(),
            last_date,
            status,
            vacancies,
            posted_by: None,
            created_at: now,
            updated_at: now,
        }
    }

    fn user(role: Role, created_at: DateTime<Utc>) -> User {
        User {
            id: Uuid::new_v4(),
            name: "Counted".into(),
            email: "counted@example.com".into(),
            role,
            created_at,
        }
    }

    #[tokio::test]
    async fn stats_split_records_by_role_and_status() {
        let now = Utc::now();
        let long_ago = now - Duration::days(30);
        let users = vec![
            user(Role::Applicant, now),
            user(Role::Applicant, long_ago),
            user(Role::Employer, long_ago),
            user(Role::Admin, long_ago),
        ];
        let jobs = vec![
            job(JobStatus::Active, 3, now + Duration::days(5)),
            job(JobStatus::Active, 2, now - Duration::hours(1)),
            job(JobStatus::Closed, 0, now + Duration::days(5)),
            job(JobStatus::Draft, 4, now + Duration::days(5)),
        ];
        let mut reviewed = Application::new(Uuid::new_v4(), jobs[0].id, Uuid::new_v4(), long_ago);
        reviewed.status = ApplicationStatus::Reviewed;
        let applications = vec![
            Application::new(Uuid::new_v4(), jobs[0].id, Uuid::new_v4(), now),
            reviewed,
        ];

        let mut store = MockRecordStore::new();
        store.expect_list_users().returning(move || Ok(users.clone()));
        store
            .expect_list_jobs()
            .withf(|status| status.is_none())
            .returning(move |_| Ok(jobs.clone()));
        store
            .expect_list_applications()
            .returning(move |_| Ok(applications.clone()));

        let stats = DashboardService::new(Arc::new(store)).stats().await.unwrap();
        assert_eq!(
            stats.users,
            UserCounts {
                total: 4,
                applicants: 2,
                employers: 1,
                admins: 1,
                recent: 1,
            }
        );
        assert_eq!(
            stats.jobs,
            JobCounts {
                total: 4,
                active: 2,
                closed: 1,
                draft: 1,
                awaiting_sweep: 1,
                open_seats: 5,
            }
        );
        assert_eq!(stats.applications.total, 2);
        assert_eq!(stats.applications.pending, 1);
        assert_eq!(stats.applications.reviewed, 1);
        assert_eq!(stats.applications.recent, 1);
    }
}
