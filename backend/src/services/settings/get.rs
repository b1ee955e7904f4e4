use crate::error::ServiceError;
use crate::state::AppState;
use crate::store::StoreError;
use actix_web::{web, HttpResponse};
use common::model::certificate::CertificateTexts;

pub(crate) async fn process(state: web::Data<AppState>) -> HttpResponse {
    match get_texts(&state).await {
        Ok(texts) => HttpResponse::Ok().json(texts),
        Err(e) => e.to_response(),
    }
}

async fn get_texts(state: &AppState) -> Result<CertificateTexts, ServiceError> {
    let store = state.settings.clone();
    let texts = web::block(move || store.load_texts())
        .await
        .map_err(|e| StoreError::Task(e.to_string()))??;
    Ok(texts)
}
