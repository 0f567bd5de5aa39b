use serde::{Deserialize, Serialize};
use validator::Validate;

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct RegisterResumePayload {
    #[validate(length(min = 1, max = 255))]
    pub file_name: String,
    pub content_type: String,
    #[validate(range(min = 1, max = 10485760))]
    pub file_size: i64,
    #[validate(url)]
    pub storage_url: String,
}
