use axum::http::StatusCode;

use super::ApiSuccess;
use super::MessageResponseData;

pub async fn ping() -> ApiSuccess<MessageResponseData> {
    ApiSuccess::new(StatusCode::OK, MessageResponseData::new("pong"))
}
