//! # Record Resolution
//!
//! Turns the raw search string typed by a participant into the ordered,
//! deduplicated list of their enrollment records.
//!
//! ## Workflow
//!
//! 1.  **Validation**: the query is trimmed; a blank query fails before any
//!     lookup is issued.
//! 2.  **Fan-out**: two equality lookups run concurrently, one on `code` with the
//!     trimmed query and one on `mobileNumber` with the normalized number. Both
//!     are awaited together; neither result is used until both have finished.
//! 3.  **Merge**: results are keyed by document id. Code matches come first in
//!     store order, followed by mobile matches not already present.

use crate::error::ServiceError;
use crate::store::{RecordField, RecordStore, StoreError};
use common::model::record::{normalize_mobile, EnrollmentRecord};
use futures_util::future::join;
use log::debug;
use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;

pub struct RecordResolver {
    store: Arc<dyn RecordStore>,
    timeout: Duration,
}

impl RecordResolver {
    pub fn new(store: Arc<dyn RecordStore>, timeout: Duration) -> Self {
        Self { store, timeout }
    }

    pub async fn resolve(&self, raw_query: &str) -> Result<Vec<EnrollmentRecord>, ServiceError> {
        let query = raw_query.trim();
        if query.is_empty() {
            return Err(ServiceError::Validation("empty query".to_string()));
        }
        let mobile = normalize_mobile(query);

        let (by_code, by_mobile) = join(
            self.lookup(RecordField::Code, query),
            self.lookup(RecordField::MobileNumber, &mobile),
        )
        .await;
        let (by_code, by_mobile) = (by_code?, by_mobile?);
        debug!(
            "Lookup for {:?}: {} code match(es), {} mobile match(es)",
            query,
            by_code.len(),
            by_mobile.len()
        );

        let merged = merge_by_identity(by_code, by_mobile);
        if merged.is_empty() {
            return Err(ServiceError::NotFound);
        }
        Ok(merged)
    }

    async fn lookup(
        &self,
        field: RecordField,
        value: &str,
    ) -> Result<Vec<EnrollmentRecord>, StoreError> {
        tokio::time::timeout(self.timeout, self.store.find_where(field, value))
            .await
            .map_err(|_| StoreError::Timeout(self.timeout))?
    }
}

/// Concatenates `first` and `second`, dropping every record whose id was already seen.
pub fn merge_by_identity(
    first: Vec<EnrollmentRecord>,
    second: Vec<EnrollmentRecord>,
) -> Vec<EnrollmentRecord> {
    let mut seen = HashSet::new();
    first
        .into_iter()
        .chain(second)
        .filter(|record| seen.insert(record.id.clone()))
        .collect()
}
