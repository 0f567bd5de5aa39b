mod common;

use chrono::{Duration, Utc};
use job_board_backend::{
    database::ApplicationFilter,
    models::{job::JobStatus, user::Role},
    services::{allocator::ReserveOutcome, application_service::SubmitOutcome},
};

use common::{memory_state, seed_job, seed_open_job, seed_resume, seed_user};

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_reservations_never_exceed_vacancies() {
    let (store, state) = memory_state();
    let job = seed_open_job(&store, 5).await;

    let mut handles = Vec::new();
    for _ in 0..40 {
        let allocator = state.allocator.clone();
        let job_id = job.id;
        handles.push(tokio::spawn(async move { allocator.reserve_seat(job_id).await }));
    }

    let mut reserved = 0;
    let mut refused = 0;
    for handle in handles {
        match handle.await.unwrap().unwrap() {
            ReserveOutcome::Reserved(snapshot) => {
                assert!(snapshot.vacancies >= 0);
                reserved += 1;
            }
            ReserveOutcome::NoSeatAvailable => refused += 1,
            ReserveOutcome::JobNotFound => panic!("job vanished"),
        }
    }
    assert_eq!(reserved, 5);
    assert_eq!(refused, 35);

    let job = store.get_job(job.id).await.unwrap().unwrap();
    assert_eq!(job.vacancies, 0);
    assert_eq!(job.status, JobStatus::Closed);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn two_applicants_racing_for_the_last_seat() {
    let (store, state) = memory_state();
    let job = seed_open_job(&store, 1).await;

    let mut handles = Vec::new();
    for _ in 0..2 {
        let applicant = seed_user(&store, Role::Applicant).await;
        let resume = seed_resume(&store, applicant.id).await;
        let service = state.application_service.clone();
        let (applicant_id, job_id, resume_id) = (applicant.id, job.id, resume.id);
        handles.push(tokio::spawn(async move {
            service.submit(applicant_id, job_id, resume_id).await
        }));
    }

    let mut created = 0;
    let mut refused = 0;
    for handle in handles {
        match handle.await.unwrap().unwrap() {
            SubmitOutcome::Created(_) => created += 1,
            SubmitOutcome::NoSeatAvailable => refused += 1,
            other => panic!("unexpected outcome {:?}", other),
        }
    }
    assert_eq!((created, refused), (1, 1));

    let applications = store
        .list_applications(ApplicationFilter::Job(job.id))
        .await
        .unwrap();
    assert_eq!(applications.len(), 1);

    let job = store.get_job(job.id).await.unwrap().unwrap();
    assert_eq!(job.vacancies, 0);
    assert_eq!(job.status, JobStatus::Closed);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn the_same_applicant_submitting_twice_concurrently_gets_one_application() {
    let (store, state) = memory_state();
    let job = seed_open_job(&store, 10).await;
    let applicant = seed_user(&store, Role::Applicant).await;
    let resume = seed_resume(&store, applicant.id).await;
    let (applicant_id, job_id, resume_id) = (applicant.id, job.id, resume.id);

    let first = {
        let service = state.application_service.clone();
        tokio::spawn(async move { service.submit(applicant_id, job_id, resume_id).await })
    };
    let second = {
        let service = state.application_service.clone();
        tokio::spawn(async move { service.submit(applicant_id, job_id, resume_id).await })
    };

    let outcomes = [first.await.unwrap().unwrap(), second.await.unwrap().unwrap()];
    let created = outcomes
        .iter()
        .filter(|o| matches!(o, SubmitOutcome::Created(_)))
        .count();
    let duplicates = outcomes
        .iter()
        .filter(|o| matches!(o, SubmitOutcome::DuplicateApplication))
        .count();
    assert_eq!((created, duplicates), (1, 1));

    let applications = store
        .list_applications(ApplicationFilter::Applicant(applicant.id))
        .await
        .unwrap();
    assert_eq!(applications.len(), 1);

    // A racing duplicate may have taken a seat that is never returned.
    let job = store.get_job(job.id).await.unwrap().unwrap();
    assert!(job.vacancies == 9 || job.vacancies == 8);
}

#[tokio::test]
async fn a_sequential_duplicate_consumes_no_seat() {
    let (store, state) = memory_state();
    let job = seed_open_job(&store, 3).await;
    let applicant = seed_user(&store, Role::Applicant).await;
    let resume = seed_resume(&store, applicant.id).await;

    let first = state
        .application_service
        .submit(applicant.id, job.id, resume.id)
        .await
        .unwrap();
    assert!(matches!(first, SubmitOutcome::Created(_)));

    let second = state
        .application_service
        .submit(applicant.id, job.id, resume.id)
        .await
        .unwrap();
    assert!(matches!(second, SubmitOutcome::DuplicateApplication));

    let job = store.get_job(job.id).await.unwrap().unwrap();
    assert_eq!(job.vacancies, 2);
    assert_eq!(job.status, JobStatus::Active);
}

#[tokio::test]
async fn a_missing_resume_is_reported_before_any_seat_is_taken() {
    let (store, state) = memory_state();
    let job = seed_open_job(&store, 1).await;
    let applicant = seed_user(&store, Role::Applicant).await;
    let someone_else = seed_user(&store, Role::Applicant).await;
    let foreign_resume = seed_resume(&store, someone_else.id).await;

    let outcome = state
        .application_service
        .submit(applicant.id, job.id, foreign_resume.id)
        .await
        .unwrap();
    assert!(matches!(outcome, SubmitOutcome::ResumeNotFound));

    let job = store.get_job(job.id).await.unwrap().unwrap();
    assert_eq!(job.vacancies, 1);
}

#[tokio::test]
async fn expired_jobs_refuse_reservations_once_swept() {
    let (store, state) = memory_state();
    let expired = seed_job(&store, 4, Utc::now() - Duration::minutes(1)).await;
    let open = seed_open_job(&store, 4).await;

    let report = state.expiration_service.run_sweep().await.unwrap();
    assert_eq!(report.closed_count, 1);
    let again = state.expiration_service.run_sweep().await.unwrap();
    assert_eq!(again.closed_count, 0);

    let swept = store.get_job(expired.id).await.unwrap().unwrap();
    assert_eq!(swept.status, JobStatus::Closed);
    assert_eq!(swept.vacancies, 4);

    assert!(matches!(
        state.allocator.reserve_seat(expired.id).await.unwrap(),
        ReserveOutcome::NoSeatAvailable
    ));
    assert!(matches!(
        state.allocator.reserve_seat(open.id).await.unwrap(),
        ReserveOutcome::Reserved(_)
    ));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn sweeps_racing_reservations_keep_the_seat_count_consistent() {
    let (store, state) = memory_state();
    let job = seed_job(&store, 50, Utc::now() - Duration::seconds(1)).await;

    let sweeper = {
        let expiration = state.expiration_service.clone();
        tokio::spawn(async move { expiration.run_sweep().await })
    };
    let reservations: Vec<_> = (0..20)
        .map(|_| {
            let allocator = state.allocator.clone();
            let job_id = job.id;
            tokio::spawn(async move { allocator.reserve_seat(job_id).await })
        })
        .collect();

    sweeper.await.unwrap().unwrap();
    let mut reserved = 0;
    for handle in reservations {
        if let ReserveOutcome::Reserved(_) = handle.await.unwrap().unwrap() {
            reserved += 1;
        }
    }

    let job = store.get_job(job.id).await.unwrap().unwrap();
    assert_eq!(job.status, JobStatus::Closed);
    assert_eq!(job.vacancies, 50 - reserved);
}

#[tokio::test]
async fn unknown_jobs_are_distinguished_from_full_ones() {
    let (store, state) = memory_state();
    let applicant = seed_user(&store, Role::Applicant).await;
    let resume = seed_resume(&store, applicant.id).await;

    let outcome = state
        .application_service
        .submit(applicant.id, uuid::Uuid::new_v4(), resume.id)
        .await
        .unwrap();
    assert!(matches!(outcome, SubmitOutcome::JobNotFound));

    let full = seed_open_job(&store, 1).await;
    state.allocator.reserve_seat(full.id).await.unwrap();
    let outcome = state
        .application_service
        .submit(applicant.id, full.id, resume.id)
        .await
        .unwrap();
    assert!(matches!(outcome, SubmitOutcome::NoSeatAvailable));
}
