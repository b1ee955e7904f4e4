use crate::error::ServiceError;
use crate::state::AppState;
use actix_web::{web, HttpResponse};
use common::model::record::ResultSummary;
use common::requests::SessionResponse;

pub(crate) async fn process(state: web::Data<AppState>, session_id: web::Path<String>) -> HttpResponse {
    match get_session(&state, &session_id).await {
        Ok(response) => HttpResponse::Ok().json(response),
        Err(e) => e.to_response(),
    }
}

async fn get_session(state: &AppState, session_id: &str) -> Result<SessionResponse, ServiceError> {
    let session = state.sessions.get(session_id).await?;
    let summary = ResultSummary::from_records(&session.records).ok_or(ServiceError::NotFound)?;
    Ok(SessionResponse {
        session_id: session.id.clone(),
        records: session.records.clone(),
        summary,
        message: session.messages.slot().await,
    })
}
