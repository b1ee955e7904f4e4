//! `POST /api/results/search`.

use crate::error::ServiceError;
use crate::state::AppState;
use actix_web::{web, HttpResponse};
use common::model::record::ResultSummary;
use common::requests::{SearchRequest, SessionResponse};
use log::info;

pub async fn process(state: web::Data<AppState>, payload: web::Json<SearchRequest>) -> HttpResponse {
    match search(&state, &payload.query).await {
        Ok(response) => HttpResponse::Ok().json(response),
        Err(e) => e.to_response(),
    }
}

/// Resolves `query` and opens a view session over the result.
pub async fn search(state: &AppState, query: &str) -> Result<SessionResponse, ServiceError> {
    let records = state.resolver.resolve(query).await?;
    let summary = ResultSummary::from_records(&records).ok_or(ServiceError::NotFound)?;
    let session = state.sessions.open(records).await;
    info!(
        "Search matched {} record(s), session {}",
        session.records.len(),
        session.id
    );
    Ok(SessionResponse {
        session_id: session.id.clone(),
        records: session.records.clone(),
        summary,
        message: session.messages.slot().await,
    })
}

#[cfg(test)]
mod tests {
    use crate::services::results::configure_routes;
    use crate::services::results::resolve::tests::{record, FakeStore};
    use crate::state::tests::test_state;
    use actix_web::{test, web, App};
    use common::model::error::{ErrorBody, ErrorKind};
    use common::requests::SessionResponse;
    use serde_json::json;

    #[actix_web::test]
    async fn search_opens_session_with_both_services() {
        let store = FakeStore::with(vec![
            record("d1", "A1", "555", "Choir"),
            record("d2", "A2", "555", "Ushers"),
        ]);
        let (state, _dir) = test_state(store, None);
        let state = web::Data::new(state);
        let app = test::init_service(
            App::new()
                .app_data(state.clone())
                .service(configure_routes()),
        )
        .await;

        let req = test::TestRequest::post()
            .uri("/api/results/search")
            .set_json(json!({"query": " 0555 "}))
            .to_request();
        let resp: SessionResponse = test::call_and_read_body_json(&app, req).await;
        assert_eq!(resp.records.len(), 2);
        assert_eq!(resp.summary.services, vec!["Choir", "Ushers"]);
        assert!(state.sessions.get(&resp.session_id).await.is_ok());
    }

    #[actix_web::test]
    async fn blank_and_unknown_queries_map_to_errors() {
        let (state, _dir) = test_state(FakeStore::with(vec![record("d1", "A1", "555", "Choir")]), None);
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(state))
                .service(configure_routes()),
        )
        .await;

        let req = test::TestRequest::post()
            .uri("/api/results/search")
            .set_json(json!({"query": "   "}))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), 400);
        let body: ErrorBody = test::read_body_json(resp).await;
        assert_eq!(body.kind, ErrorKind::Validation);

        let req = test::TestRequest::post()
            .uri("/api/results/search")
            .set_json(json!({"query": "ZZZ999"}))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), 404);
        let body: ErrorBody = test::read_body_json(resp).await;
        assert_eq!(body.kind, ErrorKind::NotFound);
    }
}
