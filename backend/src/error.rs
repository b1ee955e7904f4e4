//! Error taxonomy of the service.
//!
//! Collaborator failures (`StoreError`, `ExportError`, `ProviderError`) are
//! converted into a `ServiceError` at the boundary of the operation that hit
//! them. Only the `ErrorKind` and its fixed user message are ever serialized;
//! the underlying detail goes to the operator log.

use crate::services::certificates::export::ExportError;
use crate::store::StoreError;
use actix_web::http::StatusCode;
use actix_web::HttpResponse;
use common::model::error::{ErrorBody, ErrorKind};
use log::{error, warn};

#[derive(thiserror::Error, Debug)]
pub enum ServiceError {
    #[error("invalid input: {0}")]
    Validation(String),
    #[error("no record matches the query")]
    NotFound,
    #[error("record store failure: {0}")]
    Store(#[from] StoreError),
    #[error("record {0} has an absent score")]
    AbsentRecord(String),
    #[error("export failure: {0}")]
    Export(#[from] ExportError),
    #[error("session {0} not found")]
    SessionNotFound(String),
}

impl ServiceError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            ServiceError::Validation(_) => ErrorKind::Validation,
            ServiceError::NotFound => ErrorKind::NotFound,
            ServiceError::Store(_) => ErrorKind::Store,
            ServiceError::AbsentRecord(_) => ErrorKind::AbsentRecord,
            ServiceError::Export(e) => e.kind(),
            ServiceError::SessionNotFound(_) => ErrorKind::SessionNotFound,
        }
    }

    pub fn status(&self) -> StatusCode {
        match self.kind() {
            ErrorKind::Validation => StatusCode::BAD_REQUEST,
            ErrorKind::NotFound | ErrorKind::SessionNotFound => StatusCode::NOT_FOUND,
            ErrorKind::AbsentRecord => StatusCode::UNPROCESSABLE_ENTITY,
            ErrorKind::ExportInProgress => StatusCode::CONFLICT,
            ErrorKind::ExportFailed => StatusCode::INTERNAL_SERVER_ERROR,
            ErrorKind::Store
            | ErrorKind::ExportUnavailable
            | ErrorKind::Config
            | ErrorKind::Generation => StatusCode::SERVICE_UNAVAILABLE,
        }
    }

    /// Logs the full error and builds the response carrying only the fixed message.
    pub fn to_response(&self) -> HttpResponse {
        let status = self.status();
        if status.is_server_error() {
            error!("{}", self);
        } else {
            warn!("{}", self);
        }
        HttpResponse::build(status).json(ErrorBody::from(self.kind()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn store_detail_is_not_exposed() {
        let err = ServiceError::from(StoreError::Timeout(Duration::from_secs(10)));
        assert_eq!(err.kind(), ErrorKind::Store);
        assert_eq!(err.status(), StatusCode::SERVICE_UNAVAILABLE);
        let body = ErrorBody::from(err.kind());
        assert!(!body.message.contains("10s"));
    }

    #[test]
    fn export_kinds_map_to_statuses() {
        let busy = ServiceError::from(ExportError::InProgress);
        assert_eq!(busy.status(), StatusCode::CONFLICT);
        let missing = ServiceError::from(ExportError::Unavailable("no fonts".into()));
        assert_eq!(missing.kind(), ErrorKind::ExportUnavailable);
        let absent = ServiceError::AbsentRecord("r1".into());
        assert_eq!(absent.status(), StatusCode::UNPROCESSABLE_ENTITY);
    }
}
