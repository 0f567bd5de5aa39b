use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::models::user::{Role, User};

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct RegisterUserPayload {
    #[validate(length(min = 1, max = 100))]
    pub name: String,
    #[validate(email)]
    pub email: String,
    #[serde(default = "default_role")]
    pub role: Role,
}

fn default_role() -> Role {
    Role::Applicant
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegisteredUserResponse {
    pub user: User,
    pub token: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn role_defaults_to_applicant_and_email_is_checked() {
        let payload: RegisterUserPayload =
            serde_json::from_value(json!({"name": "Dilnoza", "email": "dilnoza@example.com"}))
                .unwrap();
        assert_eq!(payload.role, Role::Applicant);
        assert!(payload.validate().is_ok());

        let bad: RegisterUserPayload =
            serde_json::from_value(json!({"name": "Dilnoza", "email": "not-an-email"})).unwrap();
        assert!(bad.validate().is_err());
    }
}
