use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use axum_extra::extract::CookieJar;
use serde::Deserialize;

use super::ApiError;
use super::ApiSuccess;
use super::SessionResponseData;
use crate::domain::auth::ports::AuthServicePort;
use crate::inbound::http::cookies;
use crate::inbound::http::router::AppState;

/// Confirm a session and return the current user record.
///
/// The cookie wins over a token supplied in the body.
pub async fn verify(
    State(state): State<AppState>,
    jar: CookieJar,
    body: Option<Json<VerifyRequest>>,
) -> Result<ApiSuccess<SessionResponseData>, ApiError> {
    let token = cookies::session_token(&jar, &state.cookie)
        .or_else(|| body.and_then(|Json(body)| body.token))
        .filter(|token| !token.is_empty())
        .ok_or_else(|| ApiError::Unauthorized("Authentication required".to_string()))?;

    state
        .auth_service
        .verify_session(&token)
        .await
        .map_err(ApiError::from)
        .map(|ref user| ApiSuccess::new(StatusCode::OK, user.into()))
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct VerifyRequest {
    token: Option<String>,
}
