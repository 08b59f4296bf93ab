use axum::extract::Request;
use axum::extract::State;
use axum::http::header;
use axum::middleware::Next;
use axum::response::Response;

use super::handlers::ApiError;
use crate::inbound::http::router::AppState;

/// Middleware that runs the bearer-token gate and adds the authenticated
/// subject to request extensions.
///
/// A missing header, a non-UTF-8 header, a foreign scheme and every token
/// failure all produce the same 401.
pub async fn authenticate(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let authorization = req
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok());

    let subject = state.gate.authenticate(authorization)?;
    tracing::debug!(user_id = %subject.user_id, "Request authenticated");

    req.extensions_mut().insert(subject);

    Ok(next.run(req).await)
}
