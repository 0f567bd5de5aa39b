#![allow(dead_code)]

use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use job_board_backend::{
    config::{Config, StoreBackend, DEFAULT_SWEEP_CRON},
    database::{InMemoryStore, RecordStore},
    models::{
        job::{JobPosting, JobStatus, JobType, NewJobPosting},
        resume::Resume,
        user::{Role, User},
    },
    AppState,
};
use uuid::Uuid;

pub const JWT_SECRET: &str = "test_secret_key";

pub fn test_config(release_seat_on_failure: bool) -> Config {
    Config {
        server_address: "127.0.0.1:0".to_string(),
        database_url: None,
        jwt_secret: JWT_SECRET.to_string(),
        api_rps: 10_000,
        store_backend: StoreBackend::Memory,
        db_max_connections: 5,
        expiration_sweep_cron: DEFAULT_SWEEP_CRON.to_string(),
        release_seat_on_failure,
    }
}

pub fn memory_state() -> (Arc<dyn RecordStore>, AppState) {
    let store: Arc<dyn RecordStore> = Arc::new(InMemoryStore::new());
    let state = AppState::new(store.clone(), &test_config(false));
    (store, state)
}

pub async fn seed_user(store: &Arc<dyn RecordStore>, role: Role) -> User {
    let id = Uuid::new_v4();
    let user = User {
        id,
        name: format!("{} {}", role, &id.to_string()[..8]),
        email: format!("{}@example.com", id),
        role,
        created_at: Utc::now(),
    };
    store.insert_user(&user).await.expect("seed user")
}

pub async fn seed_job(
    store: &Arc<dyn RecordStore>,
    vacancies: i32,
    last_date: DateTime<Utc>,
) -> JobPosting {
    let job = NewJobPosting {
        title: "Backend Engineer".to_string(),
        company_name: "Acme".to_string(),
        job_type: JobType::FullTime,
        location: "Tashkent".to_string(),
        salary: None,
        description: "Build the allocation service".to_string(),
        last_date,
        status: JobStatus::Active,
        vacancies,
        posted_by: None,
    };
    store.insert_job(&job, Utc::now()).await.expect("seed job")
}

pub async fn seed_open_job(store: &Arc<dyn RecordStore>, vacancies: i32) -> JobPosting {
    seed_job(store, vacancies, Utc::now() + Duration::days(7)).await
}

pub async fn seed_resume(store: &Arc<dyn RecordStore>, owner_id: Uuid) -> Resume {
    let resume = Resume {
        id: Uuid::new_v4(),
        owner_id,
        file_name: "cv.pdf".to_string(),
        content_type: "application/pdf".to_string(),
        file_size: 2048,
        storage_url: format!("https://files.example.com/{}.pdf", owner_id),
        uploaded_at: Utc::now(),
    };
    store.insert_resume(&resume).await.expect("seed resume")
}
