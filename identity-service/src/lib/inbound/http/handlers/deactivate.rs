use auth::AuthenticatedSubject;
use axum::extract::State;
use axum::http::StatusCode;
use axum::Extension;

use super::ApiError;
use super::ApiSuccess;
use super::MessageData;
use crate::domain::user::models::UserId;
use crate::inbound::http::router::AppState;

pub async fn deactivate(
    State(state): State<AppState>,
    Extension(subject): Extension<AuthenticatedSubject>,
) -> Result<ApiSuccess<MessageData>, ApiError> {
    state
        .user_service
        .deactivate(&UserId::from(subject.user_id))
        .await
        .map_err(ApiError::from)
        .map(|_| {
            ApiSuccess::new(
                StatusCode::OK,
                MessageData::new("Account deactivated successfully"),
            )
        })
}
