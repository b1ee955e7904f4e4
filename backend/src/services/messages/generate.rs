//! `POST /api/sessions/{session_id}/message/{kind}`.
//!
//! Scheduling follows the background-job pattern used elsewhere in the service:
//! the handler moves the slot to `Generating(kind)`, spawns a Tokio task that
//! runs the provider call, and answers immediately. The task holds the session
//! alive until the outcome is settled (or discarded, if preempted).

use crate::error::ServiceError;
use crate::state::AppState;
use actix_web::{web, HttpResponse};
use common::model::message::{MessageKind, MessageSlot};
use log::info;

pub(crate) async fn process(
    state: web::Data<AppState>,
    path: web::Path<(String, String)>,
) -> HttpResponse {
    let (session_id, kind) = path.into_inner();
    match schedule_message(&state, &session_id, &kind).await {
        Ok(slot) => HttpResponse::Accepted().json(slot),
        Err(e) => e.to_response(),
    }
}

async fn schedule_message(
    state: &AppState,
    session_id: &str,
    kind: &str,
) -> Result<MessageSlot, ServiceError> {
    let kind: MessageKind = kind.parse().map_err(ServiceError::Validation)?;
    let session = state.sessions.get(session_id).await?;
    if session.records.is_empty() {
        return Ok(session.messages.slot().await);
    }

    let ticket = session.messages.begin(kind).await;
    let slot = session.messages.slot().await;
    info!("Session {}: generating {}", session.id, ticket.kind());

    tokio::spawn(async move {
        session.messages.run(ticket, &session.records).await;
    });
    Ok(slot)
}
