use std::sync::Arc;

use axum::body::Bytes;
use axum::extract::State;
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::{Json, Router};
use log::info;
use tower_http::cors::CorsLayer;

use crate::batch::BatchSender;
use crate::error::ApiError;
use crate::send_log::SendLog;
use crate::smtp::Mailer;
use crate::types::{ResponseStatus, SendRequest, StatusResponse};

pub struct AppState {
    pub mailer: Arc<dyn Mailer>,
    pub send_log: Arc<dyn SendLog>,
}

pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/api/send-email", post(send_emails))
        .route("/api/test", get(test_api))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

pub async fn send_emails(
    State(state): State<Arc<AppState>>,
    body: Bytes,
) -> Result<impl IntoResponse, ApiError> {
    let request = SendRequest::from_body(&body)?;
    info!(
        "Processing batch of {} recipients via {}",
        request.recipients.len(),
        request.service_type
    );

    let batch_state = state.clone();
    let batch = tokio::spawn(async move {
        BatchSender::new(batch_state.mailer.as_ref(), batch_state.send_log.as_ref())
            .send(&request)
            .await
    })
    .await;

    match batch {
        Ok(result) => Ok(Json(result)),
        Err(e) => {
            let error = ApiError::from(anyhow::Error::new(e));
            state.send_log.error(&error.message());
            Err(error)
        }
    }
}

pub async fn test_api() -> impl IntoResponse {
    Json(StatusResponse {
        status: ResponseStatus::Success,
        message: "Email API is running!".to_string(),
    })
}
