//! Conversation ledger: conversation listings, message history, sending, and read
//! state.
//!
//! Access is by membership. Either participant may read and write; anyone else gets
//! `NotFound`, the same as for a conversation that does not exist.

use hirematch_db::Database;
use hirematch_db::models::ConversationRow;
use hirematch_types::Principal;
use hirematch_types::Role;
use hirematch_types::api::{ConversationSummary, MessageType, MessageView};
use tracing::debug;

use crate::access::authenticated;
use crate::error::{EngineError, Result, not_found};

/// The caller's conversations, newest first, shaped for the caller's role.
/// Employers see candidates only by CV `unique_id`.
pub fn list_conversations(db: &Database, caller: Option<&Principal>) -> Result<Vec<ConversationSummary>> {
    let principal = authenticated(caller)?;
    let summaries = match principal.role {
        Role::Employer => db
            .list_conversations_for_employer(principal.id)?
            .into_iter()
            .map(ConversationSummary::Candidate)
            .collect(),
        Role::Jobseeker => db
            .list_conversations_for_jobseeker(principal.id)?
            .into_iter()
            .map(ConversationSummary::Employer)
            .collect(),
    };
    Ok(summaries)
}

pub fn messages(db: &Database, caller: Option<&Principal>, conversation_id: i64) -> Result<Vec<MessageView>> {
    let principal = authenticated(caller)?;
    let conversation = membership(db, principal, conversation_id)?;

    let history = db
        .list_messages(conversation.id)?
        .into_iter()
        .map(|m| MessageView {
            id: m.id,
            message_type: if m.sender_id == principal.id {
                MessageType::Sent
            } else {
                MessageType::Received
            },
            message: m.body,
            is_read: m.is_read,
            created_at: m.created_at,
        })
        .collect();

    Ok(history)
}

/// Appends a message from the caller to the other participant and returns its id.
/// The body is stored trimmed; no length limit is applied here.
pub fn send_message(
    db: &Database,
    caller: Option<&Principal>,
    conversation_id: i64,
    body: &str,
) -> Result<i64> {
    let principal = authenticated(caller)?;
    let body = body.trim();
    if body.is_empty() {
        return Err(EngineError::InvalidArgument("Message cannot be empty".into()));
    }

    let conversation = membership(db, principal, conversation_id)?;
    let receiver_id = conversation.other_participant(principal.id);
    let message_id = db.insert_message(conversation.id, principal.id, receiver_id, body)?;

    debug!("Message {} in conversation {} from {} to {}", message_id, conversation.id, principal.id, receiver_id);
    Ok(message_id)
}

/// Marks every unread message addressed to the caller in this conversation as read.
/// Idempotent.
pub fn mark_read(db: &Database, caller: Option<&Principal>, conversation_id: i64) -> Result<usize> {
    let principal = authenticated(caller)?;
    let conversation = membership(db, principal, conversation_id)?;
    Ok(db.mark_conversation_read(conversation.id, principal.id)?)
}

/// Global unread badge: unread messages addressed to the caller in any conversation.
pub fn unread_count(db: &Database, caller: Option<&Principal>) -> Result<i64> {
    let principal = authenticated(caller)?;
    Ok(db.unread_count(principal.id)?)
}

fn membership(db: &Database, principal: &Principal, conversation_id: i64) -> Result<ConversationRow> {
    db.get_conversation_for(conversation_id, principal.id)?
        .ok_or_else(|| not_found("Conversation"))
}
