use std::sync::Arc;

use serde::Serialize;
use tokio_cron_scheduler::{Job, JobScheduler, JobSchedulerError};
use tracing::{debug, error, info};

use crate::database::RecordStore;
use crate::error::{Error, Result};
use crate::utils::time;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SweepReport {
    pub closed_count: u64,
}

/// Closes postings whose deadline has passed.
///
/// A sweep is a single range update, so it is idempotent and never
/// coordinates with in-flight reservations; the allocator's conditional
/// update already refuses closed postings.
#[derive(Clone)]
pub struct ExpirationService {
    store: Arc<dyn RecordStore>,
}

impl ExpirationService {
    pub fn new(store: Arc<dyn RecordStore>) -> Self {
        Self { store }
    }

    pub async fn run_sweep(&self) -> Result<SweepReport> {
        let closed_count = self.store.close_expired(time::now()).await?;
        if closed_count > 0 {
            info!(closed_count, "Closed expired job postings");
        } else {
            debug!("No expired job postings");
        }
        Ok(SweepReport { closed_count })
    }

    /// One scheduled sweep. Failures are logged and the next tick retries.
    pub async fn tick(&self) -> Option<SweepReport> {
        match self.run_sweep().await {
            Ok(report) => Some(report),
            Err(e) => {
                error!(error = ?e, "Expiration sweep failed");
                None
            }
        }
    }
}

fn scheduler_error(err: JobSchedulerError) -> Error {
    Error::Scheduler(format!("{:?}", err))
}

/// Runs [`ExpirationService::tick`] once at start and then on a cron schedule.
pub struct ExpirationScheduler {
    scheduler: JobScheduler,
}

impl ExpirationScheduler {
    pub async fn start(service: ExpirationService, cron: &str) -> Result<Self> {
        // Catch postings that expired while the process was down.
        service.tick().await;

        let scheduler = JobScheduler::new().await.map_err(scheduler_error)?;
        let job = Job::new_async(cron, move |_uuid, _scheduler| {
            let service = service.clone();
            Box::pin(async move {
                service.tick().await;
            })
        })
        .map_err(scheduler_error)?;
        scheduler.add(job).await.map_err(scheduler_error)?;
        scheduler.start().await.map_err(scheduler_error)?;

        info!(cron, "Expiration sweep scheduled");
        Ok(Self { scheduler })
    }

    pub async fn shutdown(mut self) -> Result<()> {
        self.scheduler.shutdown().await.map_err(scheduler_error)?;
        info!("Expiration sweep stopped");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::store::MockRecordStore;
    use mockall::Sequence;

    #[tokio::test]
    async fn a_failed_tick_is_absorbed_and_the_next_one_runs() {
        let mut store = MockRecordStore::new();
        let mut seq = Sequence::new();
        store
            .expect_close_expired()
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_| Err(Error::StoreUnavailable("connection reset".into())));
        store
            .expect_close_expired()
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_| Ok(3));

        let service = ExpirationService::new(Arc::new(store));
        assert_eq!(service.tick().await, None);
        assert_eq!(service.tick().await, Some(SweepReport { closed_count: 3 }));
    }

    #[tokio::test]
    async fn sweep_faults_propagate_when_called_directly() {
        let mut store = MockRecordStore::new();
        store
            .expect_close_expired()
            .returning(|_| Err(Error::StoreUnavailable("down".into())));

        let service = ExpirationService::new(Arc::new(store));
        assert!(service.run_sweep().await.unwrap_err().is_retryable());
    }

    #[tokio::test]
    async fn invalid_cron_expression_is_rejected() {
        let mut store = MockRecordStore::new();
        store.expect_close_expired().returning(|_| Ok(0));

        let service = ExpirationService::new(Arc::new(store));
        let result = ExpirationScheduler::start(service, "every minute please").await;
        assert!(matches!(result, Err(Error::Scheduler(_))));
    }
}
