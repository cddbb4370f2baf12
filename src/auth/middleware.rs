// Authentication extractor and role middleware for protected routes

use std::sync::Arc;

use axum::{
    async_trait,
    extract::{FromRef, FromRequestParts, Request, State},
    http::{header, request::Parts, HeaderMap},
    middleware::Next,
    response::Response,
};
use tracing::{debug, warn};

use crate::auth::{
    error::AuthError,
    models::Role,
    token::{Claims, TokenService},
};

/// Pull the bearer token out of the Authorization header
fn bearer_token(headers: &HeaderMap) -> Result<&str, AuthError> {
    headers
        .get(header::AUTHORIZATION)
        .ok_or(AuthError::MissingToken)?
        .to_str()
        .map_err(|_| AuthError::InvalidToken)?
        .strip_prefix("Bearer ")
        .ok_or(AuthError::InvalidToken)
}

/// Authenticated caller, resolved from the access token
#[derive(Debug, Clone)]
pub struct AuthenticatedUser {
    pub user_id: i32,
    pub email: String,
    pub role: Role,
}

impl From<Claims> for AuthenticatedUser {
    fn from(claims: Claims) -> Self {
        Self {
            user_id: claims.sub,
            email: claims.email,
            role: claims.role,
        }
    }
}

#[async_trait]
impl<S> FromRequestParts<S> for AuthenticatedUser
where
    S: Send + Sync,
    Arc<TokenService>: FromRef<S>,
{
    type Rejection = AuthError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let tokens = Arc::<TokenService>::from_ref(state);
        let token = bearer_token(&parts.headers)?;
        let claims = tokens.validate_access_token(token)?;
        Ok(claims.into())
    }
}

/// Role requirement checked before a protected handler runs
#[derive(Debug, Clone, Copy)]
pub struct RequireRole {
    required_role: Role,
}

impl RequireRole {
    pub fn new(required_role: Role) -> Self {
        Self { required_role }
    }

    pub fn admin() -> Self {
        Self::new(Role::Admin)
    }

    /// Validate the request's token and its role
    pub fn check(&self, tokens: &TokenService, headers: &HeaderMap, endpoint: &str) -> Result<Claims, AuthError> {
        let token = bearer_token(headers).map_err(|e| {
            warn!("Rejected request to protected endpoint {}: {}", endpoint, e);
            e
        })?;
        let claims = tokens.validate_access_token(token)?;

        if claims.role != self.required_role {
            warn!(
                "Authorization failed: user_id={}, required_role={}, actual_role={}, endpoint={}",
                claims.sub, self.required_role, claims.role, endpoint
            );
            return Err(AuthError::InsufficientPermissions {
                required: self.required_role,
                actual: claims.role,
            });
        }

        debug!(
            "Authorization successful: user_id={}, role={}, endpoint={}",
            claims.sub, claims.role, endpoint
        );
        Ok(claims)
    }
}

/// Middleware for admin-only routes, installed with `from_fn_with_state`
pub async fn require_admin(
    State(tokens): State<Arc<TokenService>>,
    request: Request,
    next: Next,
) -> Result<Response, AuthError> {
    let endpoint = request.uri().path().to_string();
    RequireRole::admin().check(&tokens, request.headers(), &endpoint)?;
    Ok(next.run(request).await)
}
