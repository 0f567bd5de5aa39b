use chrono::Duration;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use uuid::Uuid;

use crate::error::Result;
use crate::middleware::auth::Claims;
use crate::models::user::Role;
use crate::utils::time::expiry_from_now;

/// Signs an HS256 bearer token for `user_id`.
pub fn issue_token(user_id: Uuid, role: Role, secret: &str, ttl: Duration) -> Result<String> {
    let claims = Claims {
        sub: user_id.to_string(),
        exp: expiry_from_now(ttl),
        role: Some(role.as_str().to_string()),
    };
    let token = encode(
        &Header::new(Algorithm::HS256),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )?;
    Ok(token)
}

pub fn verify_token(token: &str, secret: &str) -> Result<Claims> {
    let mut validation = Validation::new(Algorithm::HS256);
    validation.validate_exp = true;
    let data = decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &validation,
    )?;
    Ok(data.claims)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn issued_tokens_verify_with_the_same_secret_only() {
        let user = Uuid::new_v4();
        let token = issue_token(user, Role::Employer, "s3cret", Duration::hours(1)).unwrap();

        let claims = verify_token(&token, "s3cret").unwrap();
        assert_eq!(claims.sub, user.to_string());
        assert_eq!(claims.role.as_deref(), Some("employer"));

        assert!(verify_token(&token, "other").is_err());
    }

    #[test]
    fn expired_tokens_are_rejected() {
        let token = issue_token(Uuid::new_v4(), Role::Admin, "s3cret", Duration::hours(-2)).unwrap();
        assert!(verify_token(&token, "s3cret").is_err());
    }
}
