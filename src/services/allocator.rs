use std::sync::Arc;

use tracing::{debug, info, instrument};
use uuid::Uuid;

use crate::database::RecordStore;
use crate::error::Result;
use crate::models::job::JobPosting;
use crate::utils::time;

#[derive(Debug, Clone, PartialEq)]
pub enum ReserveOutcome {
    /// One seat was taken; carries the posting as it is after the decrement.
    Reserved(JobPosting),
    NoSeatAvailable,
    JobNotFound,
}

/// Hands out seats on job postings.
///
/// The check (`active`, `vacancies > 0`) and the decrement happen in one
/// conditional update inside the record store. With V seats and N concurrent
/// callers exactly `min(N, V)` reservations succeed, whatever else (the
/// expiration sweep, an admin edit) touches the posting meanwhile.
#[derive(Clone)]
pub struct VacancyAllocator {
    store: Arc<dyn RecordStore>,
}

impl VacancyAllocator {
    pub fn new(store: Arc<dyn RecordStore>) -> Self {
        Self { store }
    }

    #[instrument(skip(self))]
    pub async fn reserve_seat(&self, job_id: Uuid) -> Result<ReserveOutcome> {
        if let Some(job) = self.store.decrement_vacancy(job_id, time::now()).await? {
            if job.has_vacancies() {
                debug!(%job_id, remaining = job.vacancies, "Seat reserved");
            } else {
                info!(%job_id, "Last seat reserved, job closed");
            }
            return Ok(ReserveOutcome::Reserved(job));
        }

        // Only tells the caller why; the decrement above already decided.
        match self.store.get_job(job_id).await? {
            Some(job) => {
                debug!(
                    %job_id,
                    status = %job.status,
                    vacancies = job.vacancies,
                    "No seat available"
                );
                Ok(ReserveOutcome::NoSeatAvailable)
            }
            None => Ok(ReserveOutcome::JobNotFound),
        }
    }

    /// Compensation for a reservation whose application was never written.
    #[instrument(skip(self))]
    pub async fn release_seat(&self, job_id: Uuid) -> Result<Option<JobPosting>> {
        let job = self.store.release_vacancy(job_id, time::now()).await?;
        match &job {
            Some(job) => info!(
                %job_id,
                vacancies = job.vacancies,
                status = %job.status,
                "Seat released"
            ),
            None => debug!(%job_id, "Seat release skipped, job no longer exists"),
        }
        Ok(job)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::store::MockRecordStore;
    use crate::database::InMemoryStore;
    use crate::error::Error;
    use crate::models::job::{JobStatus, JobType, NewJobPosting};
    use chrono::{Duration, Utc};

    async fn seed(store: &InMemoryStore, vacancies: i32, status: JobStatus) -> JobPosting {
        let now = Utc::now();
        store
            .insert_job(
                &NewJobPosting {
                    title: "Data Analyst".into(),
                    company_name: "Acme".into(),
                    job_type: JobType::FullTime,
                    location: "Samarkand".into(),
                    salary: None,
                    description: "SQL and dashboards".into(),
                    last_date: now + Duration::days(3),
                    status,
                    vacancies,
                    posted_by: None,
                },
                now,
            )
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn reservations_stop_at_zero_and_close_the_job() {
        let store = Arc::new(InMemoryStore::new());
        let job = seed(&store, 2, JobStatus::Active).await;
        let allocator = VacancyAllocator::new(store.clone());

        let first = allocator.reserve_seat(job.id).await.unwrap();
        assert!(matches!(first, ReserveOutcome::Reserved(ref j) if j.vacancies == 1));

        let second = allocator.reserve_seat(job.id).await.unwrap();
        match second {
            ReserveOutcome::Reserved(j) => {
                assert_eq!(j.vacancies, 0);
                assert_eq!(j.status, JobStatus::Closed);
            }
            other => panic!("expected a reservation, got {:?}", other),
        }

        assert_eq!(
            allocator.reserve_seat(job.id).await.unwrap(),
            ReserveOutcome::NoSeatAvailable
        );
    }

    #[tokio::test]
    async fn drafts_and_unknown_jobs_are_distinguished() {
        let store = Arc::new(InMemoryStore::new());
        let draft = seed(&store, 5, JobStatus::Draft).await;
        let allocator = VacancyAllocator::new(store.clone());

        assert_eq!(
            allocator.reserve_seat(draft.id).await.unwrap(),
            ReserveOutcome::NoSeatAvailable
        );
        assert_eq!(
            allocator.reserve_seat(Uuid::new_v4()).await.unwrap(),
            ReserveOutcome::JobNotFound
        );
        let untouched = store.get_job(draft.id).await.unwrap().unwrap();
        assert_eq!(untouched.vacancies, 5);
    }

    #[tokio::test]
    async fn store_faults_propagate_as_retryable_errors() {
        let mut store = MockRecordStore::new();
        store
            .expect_decrement_vacancy()
            .returning(|_, _| Err(Error::StoreUnavailable("connection refused".into())));
        let allocator = VacancyAllocator::new(Arc::new(store));

        let err = allocator.reserve_seat(Uuid::new_v4()).await.unwrap_err();
        assert!(err.is_retryable());
    }
}
