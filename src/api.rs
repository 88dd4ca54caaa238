use crate::error::SessionError;
use crate::models::{ChatReply, ChatRequest, ErrorBody, SessionOpened};
use crate::script::WELCOME_MESSAGE;
use crate::service::SessionStore;
use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{delete, post};
use axum::{Json, Router};
use axum_macros::debug_handler;
use chrono::{Local, Timelike};
use std::sync::Arc;
use std::time::Duration;
use tracing::warn;

#[derive(Clone)]
pub struct AppState {
    pub sessions: Arc<SessionStore>,
    /// Pause before each reply, shown by the page as "ELIZA is typing".
    pub reply_delay: Duration,
}

pub struct ApiError {
    status: StatusCode,
    message: String,
}

impl ApiError {
    fn unknown_session(session_id: &str) -> Self {
        Self {
            status: StatusCode::NOT_FOUND,
            message: format!("Unknown session: {}", session_id),
        }
    }
}

impl From<SessionError> for ApiError {
    fn from(e: SessionError) -> Self {
        Self {
            status: StatusCode::SERVICE_UNAVAILABLE,
            message: e.to_string(),
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        Self {
            status: rejection.status(),
            message: rejection.body_text(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(ErrorBody { error: self.message })).into_response()
    }
}

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/sessions", post(open_session))
        .route("/sessions/:id", delete(close_session))
        .route("/sessions/:id/messages", post(send_message))
        .with_state(state)
}

/// Chat-page clock: unpadded hour, padded minutes.
pub fn clock<T: Timelike>(time: &T) -> String {
    format!("{}:{:02}", time.hour(), time.minute())
}

fn now() -> String {
    clock(&Local::now())
}

#[debug_handler]
async fn open_session(State(state): State<AppState>) -> Result<Json<SessionOpened>, ApiError> {
    let session_id = state.sessions.open()?;
    Ok(Json(SessionOpened {
        session_id,
        message: WELCOME_MESSAGE.to_string(),
        timestamp: now(),
    }))
}

#[debug_handler]
async fn send_message(
    State(state): State<AppState>,
    Path(session_id): Path<String>,
    payload: Result<Json<ChatRequest>, JsonRejection>,
) -> Result<Json<ChatReply>, ApiError> {
    let Json(request) = payload?;
    let reply = state
        .sessions
        .respond(&session_id, &request.message)
        .ok_or_else(|| {
            warn!("Message for unknown session {}", session_id);
            ApiError::unknown_session(&session_id)
        })?;

    if !state.reply_delay.is_zero() {
        tokio::time::sleep(state.reply_delay).await;
    }

    Ok(Json(ChatReply {
        reply,
        timestamp: now(),
    }))
}

#[debug_handler]
async fn close_session(
    State(state): State<AppState>,
    Path(session_id): Path<String>,
) -> Result<StatusCode, ApiError> {
    if state.sessions.close(&session_id) {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(ApiError::unknown_session(&session_id))
    }
}
