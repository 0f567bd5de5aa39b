use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};
use serde::{Deserialize, Serialize};
use tracing::debug;
use uuid::Uuid;

use crate::error::{Error, Result};
use crate::models::user::{Role, User};
use crate::utils::token::verify_token;
use crate::AppState;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String,
    pub exp: usize,
    pub role: Option<String>,
}

fn bearer_token(req: &Request) -> Result<&str> {
    let Some(auth_header) = req.headers().get(axum::http::header::AUTHORIZATION) else {
        return Err(Error::Unauthorized("missing_authorization".into()));
    };
    let Ok(auth_str) = auth_header.to_str() else {
        return Err(Error::Unauthorized("bad_authorization".into()));
    };
    auth_str
        .strip_prefix("Bearer ")
        .ok_or_else(|| Error::Unauthorized("unsupported_scheme".into()))
}

/// Resolves the bearer token to a stored [`User`] and hands it to handlers
/// as a request extension.
pub async fn require_auth(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response> {
    let claims = verify_token(bearer_token(&req)?, &state.jwt_secret)?;
    let user_id = Uuid::parse_str(&claims.sub)
        .map_err(|_| Error::Unauthorized("invalid_token".into()))?;

    let Some(user) = state.identity_service.lookup(user_id).await? else {
        debug!(%user_id, "Token subject has no user record");
        return Err(Error::Unauthorized("User not found".into()));
    };
    // A token minted for another role is stale.
    if claims.role.as_deref().is_some_and(|role| role != user.role.as_str()) {
        debug!(%user_id, token_role = ?claims.role, "Token role does not match the stored user");
        return Err(Error::Unauthorized("token_role_mismatch".into()));
    }

    req.extensions_mut().insert(user);
    Ok(next.run(req).await)
}

/// Rejects users whose role is not in `allowed`.
pub fn require_roles(user: &User, allowed: &[Role]) -> Result<()> {
    if allowed.contains(&user.role) {
        Ok(())
    } else {
        Err(Error::Forbidden(format!(
            "User role '{}' is not authorized to access this route",
            user.role
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::time;

    fn user(role: Role) -> User {
        User {
            id: Uuid::new_v4(),
            name: "Test".into(),
            email: "test@example.com".into(),
            role,
            created_at: time::now(),
        }
    }

    #[test]
    fn roles_outside_the_allow_list_are_forbidden() {
        let allowed = [Role::Employer, Role::Admin];
        assert!(require_roles(&user(Role::Employer), &allowed).is_ok());
        assert!(matches!(
            require_roles(&user(Role::Applicant), &allowed),
            Err(Error::Forbidden(_))
        ));
    }
}
