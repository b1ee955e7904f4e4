//! `POST /api/sessions/{session_id}/certificate/export`.
//!
//! The surface arrives as a base64 PNG snapshot of the rendered certificate.
//! Capture and encoding are CPU-bound, so they run on the blocking pool while
//! the certificate's busy flag is held; a second export of the same instance
//! is refused with `409 Conflict` until the first one returns.

use crate::error::ServiceError;
use crate::services::certificates::capture::Surface;
use crate::services::certificates::export::{Artifact, ExportError};
use crate::state::AppState;
use actix_web::http::header::{
    Charset, ContentDisposition, DispositionParam, DispositionType, ExtendedValue,
};
use actix_web::{web, HttpResponse};
use base64::prelude::*;
use common::requests::{ExportFormat, ExportRequest};

pub(crate) async fn process(
    state: web::Data<AppState>,
    session_id: web::Path<String>,
    payload: web::Json<ExportRequest>,
) -> HttpResponse {
    match export_certificate(&state, &session_id, payload.into_inner()).await {
        Ok(artifact) => HttpResponse::Ok()
            .content_type(artifact.content_type)
            .insert_header(attachment(&artifact.file_name))
            .body(artifact.bytes),
        Err(e) => e.to_response(),
    }
}

async fn export_certificate(
    state: &AppState,
    session_id: &str,
    request: ExportRequest,
) -> Result<Artifact, ServiceError> {
    let session = state.sessions.get(session_id).await?;
    let record = session.record(request.record_index)?;
    if record.score.is_absent() {
        return Err(ServiceError::AbsentRecord(record.id.clone()));
    }
    let png = decode_surface(&request.surface)?;
    let permit = session.export_lock(request.record_index)?.try_begin()?;

    let exporter = state.exporter.clone();
    let person = record.name.trim().to_string();
    let format = request.format;
    let artifact = web::block(move || {
        let _permit = permit;
        let surface = Surface::from_png(&png);
        match format {
            ExportFormat::Image => exporter.export_image(&surface, &person),
            ExportFormat::Document => exporter.export_document(&surface, &person),
        }
    })
    .await
    .map_err(|e| ServiceError::from(ExportError::Failed(e.to_string())))??;
    Ok(artifact)
}

/// Accepts raw base64 or a `data:` URL.
fn decode_surface(raw: &str) -> Result<Vec<u8>, ServiceError> {
    let raw = raw.trim();
    let encoded = match raw.strip_prefix("data:") {
        Some(rest) => rest.split_once(',').map(|(_, data)| data).unwrap_or(""),
        None => raw,
    };
    if encoded.is_empty() {
        return Err(ServiceError::Validation("surface is empty".to_string()));
    }
    BASE64_STANDARD
        .decode(encoded)
        .map_err(|e| ServiceError::Validation(format!("surface is not base64: {}", e)))
}

/// ASCII fallback plus the UTF-8 name; participant names are usually Arabic.
fn attachment(file_name: &str) -> ContentDisposition {
    let fallback: String = file_name
        .chars()
        .map(|c| if c.is_ascii() && c != '"' { c } else { '_' })
        .collect();
    ContentDisposition {
        disposition: DispositionType::Attachment,
        parameters: vec![
            DispositionParam::Filename(fallback),
            DispositionParam::FilenameExt(ExtendedValue {
                charset: Charset::Ext("UTF-8".to_string()),
                language_tag: None,
                value: file_name.as_bytes().to_vec(),
            }),
        ],
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::certificates::capture::tests::sample_surface_png;
    use crate::services::certificates::configure_routes;
    use crate::services::results::resolve::tests::{record, FakeStore};
    use crate::state::tests::test_state;
    use actix_web::http::header;
    use actix_web::{test, App};
    use common::model::error::{ErrorBody, ErrorKind};
    use serde_json::json;

    #[actix_web::test]
    async fn data_urls_and_raw_base64_decode_alike() {
        let raw = BASE64_STANDARD.encode(b"png-bytes");
        assert_eq!(decode_surface(&raw).unwrap(), b"png-bytes");
        let url = format!("data:image/png;base64,{}", raw);
        assert_eq!(decode_surface(&url).unwrap(), b"png-bytes");
        assert!(decode_surface("data:image/png;base64,").is_err());
        assert!(decode_surface("%%%").is_err());
    }

    #[actix_web::test]
    async fn image_export_is_an_attachment() {
        let (state, _dir) = test_state(FakeStore::default(), None);
        let state = web::Data::new(state);
        let session = state
            .sessions
            .open(vec![record("d1", "A1", "555", "Choir")])
            .await;
        let app = test::init_service(
            App::new()
                .app_data(state.clone())
                .service(configure_routes()),
        )
        .await;

        let surface = BASE64_STANDARD.encode(sample_surface_png(16, 12));
        let req = test::TestRequest::post()
            .uri(&format!("/api/sessions/{}/certificate/export", session.id))
            .set_json(json!({"recordIndex": 0, "format": "image", "surface": surface}))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), 200);
        assert_eq!(
            resp.headers().get(header::CONTENT_TYPE).unwrap(),
            "image/png"
        );
        let disposition = resp
            .headers()
            .get(header::CONTENT_DISPOSITION)
            .unwrap()
            .to_str()
            .unwrap()
            .to_string();
        assert!(disposition.starts_with("attachment"));
        assert!(disposition.contains(".png"));
        let bytes = test::read_body(resp).await;
        let decoded = image::load_from_memory(&bytes).unwrap();
        assert_eq!(image::GenericImageView::dimensions(&decoded), (48, 36));
        assert!(!session.export_lock(0).unwrap().is_busy());
    }

    #[actix_web::test]
    async fn busy_certificate_and_missing_encoder_are_reported() {
        let (state, _dir) = test_state(FakeStore::default(), None);
        let state = web::Data::new(state);
        let session = state
            .sessions
            .open(vec![record("d1", "A1", "555", "Choir")])
            .await;
        let app = test::init_service(
            App::new()
                .app_data(state.clone())
                .service(configure_routes()),
        )
        .await;
        let uri = format!("/api/sessions/{}/certificate/export", session.id);
        let surface = BASE64_STANDARD.encode(sample_surface_png(4, 4));

        let permit = session.export_lock(0).unwrap().try_begin().unwrap();
        let req = test::TestRequest::post()
            .uri(&uri)
            .set_json(json!({"recordIndex": 0, "format": "image", "surface": surface}))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), 409);
        let body: ErrorBody = test::read_body_json(resp).await;
        assert_eq!(body.kind, ErrorKind::ExportInProgress);
        drop(permit);

        // The test state ships without a document encoder.
        let req = test::TestRequest::post()
            .uri(&uri)
            .set_json(json!({"recordIndex": 0, "format": "document", "surface": surface}))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), 503);
        let body: ErrorBody = test::read_body_json(resp).await;
        assert_eq!(body.kind, ErrorKind::ExportUnavailable);
    }
}
