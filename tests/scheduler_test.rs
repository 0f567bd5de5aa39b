mod common;

use std::time::Duration as StdDuration;

use chrono::{Duration, Utc};
use job_board_backend::{
    models::job::JobStatus, services::expiration_service::ExpirationScheduler,
};

use common::{memory_state, seed_job};

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn startup_tick_closes_postings_that_expired_while_down() {
    let (store, state) = memory_state();
    let stale = seed_job(&store, 2, Utc::now() - Duration::hours(3)).await;

    // Far-off schedule, so only the startup tick can have run.
    let scheduler = ExpirationScheduler::start(state.expiration_service.clone(), "0 0 0 1 1 *")
        .await
        .unwrap();

    let job = store.get_job(stale.id).await.unwrap().unwrap();
    assert_eq!(job.status, JobStatus::Closed);

    scheduler.shutdown().await.unwrap();
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn scheduled_ticks_close_postings_as_their_deadline_passes() {
    let (store, state) = memory_state();
    let soon = seed_job(&store, 2, Utc::now() + Duration::milliseconds(500)).await;

    let scheduler = ExpirationScheduler::start(state.expiration_service.clone(), "*/1 * * * * *")
        .await
        .unwrap();

    let mut closed = false;
    for _ in 0..50 {
        tokio::time::sleep(StdDuration::from_millis(100)).await;
        if store.get_job(soon.id).await.unwrap().unwrap().status == JobStatus::Closed {
            closed = true;
            break;
        }
    }
    scheduler.shutdown().await.unwrap();
    assert!(closed, "posting was not closed by a scheduled tick");
}
