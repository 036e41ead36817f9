use axum::extract::Path;
use axum::extract::State;
use axum::http::StatusCode;

use super::ApiError;
use crate::domain::user::models::UserId;
use crate::inbound::http::router::AppState;
use crate::user::errors::UserError;
use crate::user::ports::UserServicePort;

/// `DELETE /api/user/:user_id`. Reset records go with the account.
pub async fn delete_user(
    State(state): State<AppState>,
    Path(raw_id): Path<String>,
) -> Result<StatusCode, ApiError> {
    let user_id = UserId::from_string(&raw_id).map_err(UserError::from)?;
    state.user_service.delete_user(&user_id).await?;

    tracing::info!(user_id = %user_id, "User deleted by admin");

    // 204 carries no body, so no envelope
    Ok(StatusCode::NO_CONTENT)
}
