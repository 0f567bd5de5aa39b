pub mod allocator;
pub mod application_service;
pub mod dashboard_service;
pub mod expiration_service;
pub mod identity_service;
pub mod job_service;
pub mod resume_service;
