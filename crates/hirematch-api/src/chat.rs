use axum::{
    Extension, Json,
    extract::{
        Path, State,
        rejection::{JsonRejection, PathRejection},
    },
    http::StatusCode,
    response::IntoResponse,
};

use hirematch_engine::ledger;
use hirematch_types::Principal;
use hirematch_types::api::{
    Ack, ConversationsResponse, MessagesResponse, SendMessageRequest, SendMessageResponse,
    UnreadCountResponse,
};

use crate::AppState;
use crate::error::{ApiError, path_id};

pub async fn list_conversations(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
) -> Result<impl IntoResponse, ApiError> {
    let conversations =
        crate::blocking(&state, move |db| ledger::list_conversations(db, Some(&principal))).await?;
    Ok(Json(ConversationsResponse { conversations }))
}

pub async fn get_messages(
    State(state): State<AppState>,
    path: Result<Path<i64>, PathRejection>,
    Extension(principal): Extension<Principal>,
) -> Result<impl IntoResponse, ApiError> {
    let conversation_id = path_id(path, "Conversation")?;
    let messages = crate::blocking(&state, move |db| {
        ledger::messages(db, Some(&principal), conversation_id)
    })
    .await?;
    Ok(Json(MessagesResponse { messages }))
}

pub async fn send_message(
    State(state): State<AppState>,
    path: Result<Path<i64>, PathRejection>,
    Extension(principal): Extension<Principal>,
    payload: Result<Json<SendMessageRequest>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let conversation_id = path_id(path, "Conversation")?;
    let Json(req) = payload?;
    let message_id = crate::blocking(&state, move |db| {
        ledger::send_message(db, Some(&principal), conversation_id, &req.message)
    })
    .await?;

    Ok((
        StatusCode::CREATED,
        Json(SendMessageResponse {
            message: "Message sent successfully".into(),
            message_id,
        }),
    ))
}

pub async fn mark_read(
    State(state): State<AppState>,
    path: Result<Path<i64>, PathRejection>,
    Extension(principal): Extension<Principal>,
) -> Result<impl IntoResponse, ApiError> {
    let conversation_id = path_id(path, "Conversation")?;
    crate::blocking(&state, move |db| {
        ledger::mark_read(db, Some(&principal), conversation_id)
    })
    .await?;
    Ok(Json(Ack::new("Messages marked as read")))
}

pub async fn unread_count(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
) -> Result<impl IntoResponse, ApiError> {
    let unread_count = crate::blocking(&state, move |db| ledger::unread_count(db, Some(&principal))).await?;
    Ok(Json(UnreadCountResponse { unread_count }))
}
