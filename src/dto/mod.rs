pub mod application_dto;
pub mod dashboard_dto;
pub mod job_dto;
pub mod resume_dto;
pub mod user_dto;
