use crate::error::ServiceError;
use crate::state::AppState;
use crate::store::StoreError;
use actix_web::{web, HttpResponse};
use common::model::certificate::CertificateTexts;
use log::info;

pub(crate) async fn process(
    state: web::Data<AppState>,
    payload: web::Json<CertificateTexts>,
) -> HttpResponse {
    match save_texts(&state, payload.into_inner()).await {
        Ok(texts) => HttpResponse::Ok().json(texts),
        Err(e) => e.to_response(),
    }
}

async fn save_texts(
    state: &AppState,
    texts: CertificateTexts,
) -> Result<CertificateTexts, ServiceError> {
    if texts.main_title.trim().is_empty() {
        return Err(ServiceError::Validation("main title must not be empty".to_string()));
    }
    let store = state.settings.clone();
    let saved = texts.clone();
    web::block(move || store.save_texts(&saved))
        .await
        .map_err(|e| StoreError::Task(e.to_string()))??;
    info!("Certificate texts updated");
    Ok(texts)
}
