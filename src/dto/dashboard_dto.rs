use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserCounts {
    pub total: usize,
    pub applicants: usize,
    pub employers: usize,
    pub admins: usize,
    /// Registered within the recent-activity window.
    pub recent: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobCounts {
    pub total: usize,
    pub active: usize,
    pub closed: usize,
    pub draft: usize,
    /// Still active although the deadline has passed; the next sweep closes them.
    pub awaiting_sweep: usize,
    pub open_seats: i64,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApplicationCounts {
    pub total: usize,
    pub pending: usize,
    pub reviewed: usize,
    pub accepted: usize,
    pub rejected: usize,
    pub recent: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DashboardStats {
    pub users: UserCounts,
    pub jobs: JobCounts,
    pub applications: ApplicationCounts,
}
