//! Boundary to the record store.
//!
//! The core only ever asks for documents whose field equals a value; the
//! `students` collection cannot express an OR across fields, so callers issue
//! one lookup per field and merge.

pub mod sqlite;

use common::model::record::EnrollmentRecord;
use futures_util::future::BoxFuture;
use std::time::Duration;

pub use sqlite::SqliteStore;

/// Fields the store can be queried on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordField {
    Code,
    MobileNumber,
}

impl RecordField {
    pub(crate) fn column(&self) -> &'static str {
        match self {
            RecordField::Code => "code",
            RecordField::MobileNumber => "mobile_number",
        }
    }
}

#[derive(thiserror::Error, Debug)]
pub enum StoreError {
    #[error("database error: {0}")]
    Database(#[from] rusqlite::Error),
    #[error("document {id} is malformed: {reason}")]
    Malformed { id: String, reason: String },
    #[error("lookup task failed: {0}")]
    Task(String),
    #[error("lookup timed out after {0:?}")]
    Timeout(Duration),
}

/// Equality lookups over the `students` collection.
///
/// Results come back in store order; each record carries its document id.
pub trait RecordStore: Send + Sync {
    fn find_where<'a>(
        &'a self,
        field: RecordField,
        value: &'a str,
    ) -> BoxFuture<'a, Result<Vec<EnrollmentRecord>, StoreError>>;
}
