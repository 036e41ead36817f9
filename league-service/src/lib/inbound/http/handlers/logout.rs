use axum::extract::State;
use axum::http::StatusCode;
use axum_extra::extract::CookieJar;

use super::ApiSuccess;
use super::MessageResponseData;
use crate::inbound::http::cookies;
use crate::inbound::http::router::AppState;

pub async fn logout(
    State(state): State<AppState>,
    jar: CookieJar,
) -> (CookieJar, ApiSuccess<MessageResponseData>) {
    (
        cookies::without_session(jar, &state.cookie),
        ApiSuccess::new(StatusCode::OK, MessageResponseData::new("Logged out")),
    )
}
