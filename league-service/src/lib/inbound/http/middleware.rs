use auth::Role;
use axum::extract::Request;
use axum::extract::State;
use axum::middleware::Next;
use axum::response::Response;
use axum_extra::extract::CookieJar;

use super::cookies::session_token;
use crate::domain::user::models::UserId;
use crate::inbound::http::handlers::ApiError;
use crate::inbound::http::router::AppState;

/// Extension type to store the authenticated session in request extensions
#[derive(Debug, Clone)]
pub struct AuthenticatedUser {
    pub user_id: UserId,
    pub email: String,
    pub role: Role,
}

/// Middleware that validates the session cookie and adds the caller to request extensions
pub async fn authenticate(
    State(state): State<AppState>,
    jar: CookieJar,
    mut req: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let token = session_token(&jar, &state.cookie)
        .ok_or_else(|| ApiError::Unauthorized("Authentication required".to_string()))?;

    // Every failure kind gets the same response
    let claims = state.authenticator.validate(&token).map_err(|e| {
        tracing::debug!(reason = %e, "Session token rejected");
        ApiError::Unauthorized("Invalid or expired token".to_string())
    })?;

    let user_id = UserId::from_string(&claims.sub).map_err(|e| {
        tracing::warn!(error = %e, "Session token carries an unusable subject");
        ApiError::Unauthorized("Invalid or expired token".to_string())
    })?;

    req.extensions_mut().insert(AuthenticatedUser {
        user_id,
        email: claims.email,
        role: claims.role,
    });

    Ok(next.run(req).await)
}

/// Middleware that admits only sessions holding the required role.
///
/// Must run after [`authenticate`].
pub async fn require_role(
    State(required): State<Role>,
    req: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let caller = req
        .extensions()
        .get::<AuthenticatedUser>()
        .map(|user| (user.user_id, user.role));

    match caller {
        Some((_, role)) if role == required => Ok(next.run(req).await),
        Some((user_id, role)) => {
            tracing::info!(
                user_id = %user_id,
                role = %role,
                required = %required,
                "Access denied"
            );
            Err(forbidden(required))
        }
        None => Err(forbidden(required)),
    }
}

fn forbidden(required: Role) -> ApiError {
    match required {
        Role::Admin => ApiError::Forbidden("Admin access required".to_string()),
        Role::Normal => ApiError::Forbidden("Member access required".to_string()),
    }
}
