use std::sync::Arc;

use uuid::Uuid;

use crate::database::RecordStore;
use crate::error::Result;
use crate::models::user::{Role, User};
use crate::utils::time;

/// Resolves the user behind a bearer token.
#[derive(Clone)]
pub struct IdentityService {
    store: Arc<dyn RecordStore>,
}

impl IdentityService {
    pub fn new(store: Arc<dyn RecordStore>) -> Self {
        Self { store }
    }

    pub async fn lookup(&self, user_id: Uuid) -> Result<Option<User>> {
        self.store.get_user(user_id).await
    }

    pub async fn register(&self, name: &str, email: &str, role: Role) -> Result<User> {
        let user = User {
            id: Uuid::new_v4(),
            name: name.trim().to_string(),
            email: email.trim().to_lowercase(),
            role,
            created_at: time::now(),
        };
        self.store.insert_user(&user).await
    }
}
