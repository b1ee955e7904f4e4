use crate::state::AppState;
use actix_web::{web, HttpResponse};

pub(crate) async fn process(state: web::Data<AppState>, session_id: web::Path<String>) -> HttpResponse {
    match state.sessions.close(&session_id).await {
        Ok(()) => HttpResponse::NoContent().finish(),
        Err(e) => e.to_response(),
    }
}
