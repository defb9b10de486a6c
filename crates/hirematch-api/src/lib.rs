pub mod auth;
pub mod chat;
pub mod cv;
pub mod error;
pub mod jobs;
pub mod middleware;

use std::sync::Arc;

use axum::{
    Json, Router,
    middleware::from_fn_with_state,
    routing::{get, post, put},
};
use serde_json::{Value, json};
use tracing::error;

use hirematch_db::Database;

use crate::error::ApiError;

pub type AppState = Arc<AppStateInner>;

pub struct AppStateInner {
    pub db: Database,
    pub jwt_secret: String,
}

/// All routes, with everything but registration, login and the health probe behind
/// [`middleware::require_auth`]. CORS and request tracing are left to the binary.
pub fn router(state: AppState) -> Router {
    let public_routes = Router::new()
        .route("/auth/register", post(auth::register))
        .route("/auth/login", post(auth::login))
        .route("/health", get(health));

    let protected_routes = Router::new()
        .route("/auth/me", get(auth::me))
        .route("/cv", post(cv::create_cv))
        .route("/cv/my-cv", get(cv::my_cv).put(cv::update_cv))
        .route("/cv/all", get(cv::unswiped_cvs))
        .route("/cv/swipe", post(cv::swipe))
        .route("/jobs", post(jobs::post_job))
        .route("/jobs/all", get(jobs::unapplied_jobs))
        .route("/jobs/my-jobs", get(jobs::my_jobs))
        .route("/jobs/apply", post(jobs::apply))
        .route("/jobs/{job_id}/applications", get(jobs::applicants))
        .route("/jobs/applications/{application_id}", put(jobs::update_status))
        .route("/jobseeker/applications", get(jobs::my_applications))
        .route("/chat/conversations", get(chat::list_conversations))
        .route(
            "/chat/conversations/{conversation_id}/messages",
            get(chat::get_messages).post(chat::send_message),
        )
        .route("/chat/conversations/{conversation_id}/messages/read", put(chat::mark_read))
        .route("/chat/unread-count", get(chat::unread_count))
        .layer(from_fn_with_state(state.clone(), middleware::require_auth));

    Router::new()
        .merge(public_routes)
        .merge(protected_routes)
        .with_state(state)
}

async fn health() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}

/// Runs a synchronous engine call off the async runtime.
pub(crate) async fn blocking<F, T>(state: &AppState, f: F) -> Result<T, ApiError>
where
    F: FnOnce(&Database) -> hirematch_engine::Result<T> + Send + 'static,
    T: Send + 'static,
{
    let state = state.clone();
    tokio::task::spawn_blocking(move || f(&state.db))
        .await
        .map_err(|e| {
            error!("spawn_blocking join error: {}", e);
            ApiError::internal("worker task failed")
        })?
        .map_err(ApiError::from)
}
