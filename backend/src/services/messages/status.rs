use crate::state::AppState;
use actix_web::{web, HttpResponse};

pub(crate) async fn process(state: web::Data<AppState>, session_id: web::Path<String>) -> HttpResponse {
    match state.sessions.get(&session_id).await {
        Ok(session) => HttpResponse::Ok().json(session.messages.slot().await),
        Err(e) => e.to_response(),
    }
}
