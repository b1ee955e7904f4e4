use crate::error::ServiceError;
use crate::services::certificates::compose::{compose, fingerprint};
use crate::state::AppState;
use crate::store::StoreError;
use actix_web::http::header::{self, EntityTag, ETag};
use actix_web::{web, HttpRequest, HttpResponse};
use common::model::certificate::CertificateView;
use common::requests::ComposeRequest;

pub(crate) async fn process(
    req: HttpRequest,
    state: web::Data<AppState>,
    session_id: web::Path<String>,
    payload: web::Json<ComposeRequest>,
) -> HttpResponse {
    match compose_for_session(&state, &session_id, &payload).await {
        Ok(view) => {
            let tag = fingerprint(&view);
            if matches_tag(&req, &tag) {
                return HttpResponse::NotModified()
                    .insert_header(ETag(EntityTag::new_strong(tag)))
                    .finish();
            }
            HttpResponse::Ok()
                .insert_header(ETag(EntityTag::new_strong(tag)))
                .json(view)
        }
        Err(e) => e.to_response(),
    }
}

async fn compose_for_session(
    state: &AppState,
    session_id: &str,
    request: &ComposeRequest,
) -> Result<CertificateView, ServiceError> {
    let session = state.sessions.get(session_id).await?;
    let record = session.record(request.record_index)?;

    // Always the latest saved wording.
    let store = state.settings.clone();
    let texts = web::block(move || store.load_texts())
        .await
        .map_err(|e| StoreError::Task(e.to_string()))??;

    compose(record, &texts, &request.style)
}

fn matches_tag(req: &HttpRequest, tag: &str) -> bool {
    req.headers()
        .get(header::IF_NONE_MATCH)
        .and_then(|v| v.to_str().ok())
        .map(|v| v.split(',').any(|t| t.trim().trim_matches('"') == tag))
        .unwrap_or(false)
}
