//! View sessions opened by a successful search.
//!
//! A session pins the resolved record set, owns the single message slot of the
//! result view and holds one export busy flag per certificate instance. It is
//! dropped on an explicit close (new search or back), or by the sweeper once it
//! outlives the configured TTL.
//!
//! - `SessionsState`: clonable, shared as `web::Data` through `AppState`.
//! - `ViewSession`: one result view; handlers receive it as `Arc<ViewSession>`
//!   so spawned message flows can keep it alive until they settle.
//! - `start_session_sweeper`: long-running task spawned from `main.rs`.

use crate::error::ServiceError;
use crate::services::certificates::export::ExportLock;
use crate::services::messages::orchestrator::MessageOrchestrator;
use crate::services::messages::provider::TextGenerator;
use common::model::record::EnrollmentRecord;
use log::{debug, info};
use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::RwLock;
use uuid::Uuid;

pub struct ViewSession {
    pub id: String,
    pub records: Vec<EnrollmentRecord>,
    pub messages: MessageOrchestrator,
    export_locks: Vec<ExportLock>,
    opened_at: Instant,
}

impl ViewSession {
    /// Record shown at `index` in the result view.
    pub fn record(&self, index: usize) -> Result<&EnrollmentRecord, ServiceError> {
        self.records.get(index).ok_or_else(|| {
            ServiceError::Validation(format!(
                "record index {} out of range (session has {})",
                index,
                self.records.len()
            ))
        })
    }

    /// Busy flag of the certificate instance at `index`.
    pub fn export_lock(&self, index: usize) -> Result<ExportLock, ServiceError> {
        self.record(index)?;
        Ok(self.export_locks[index].clone())
    }

    fn expired(&self, ttl: Duration, now: Instant) -> bool {
        now.duration_since(self.opened_at) >= ttl
    }
}

#[derive(Clone)]
pub struct SessionsState {
    pub sessions: Arc<RwLock<HashMap<String, Arc<ViewSession>>>>,
    generator: Option<Arc<dyn TextGenerator>>,
    provider_timeout: Duration,
}

impl SessionsState {
    pub fn new(generator: Option<Arc<dyn TextGenerator>>, provider_timeout: Duration) -> Self {
        Self {
            sessions: Arc::new(RwLock::new(HashMap::new())),
            generator,
            provider_timeout,
        }
    }

    /// Opens a session over `records` with an idle message slot.
    pub async fn open(&self, records: Vec<EnrollmentRecord>) -> Arc<ViewSession> {
        let session = Arc::new(ViewSession {
            id: Uuid::new_v4().to_string(),
            export_locks: records.iter().map(|_| ExportLock::default()).collect(),
            records,
            messages: MessageOrchestrator::new(self.generator.clone(), self.provider_timeout),
            opened_at: Instant::now(),
        });
        self.sessions
            .write()
            .await
            .insert(session.id.clone(), session.clone());
        debug!("Opened session {} ({} records)", session.id, session.records.len());
        session
    }

    pub async fn get(&self, id: &str) -> Result<Arc<ViewSession>, ServiceError> {
        self.sessions
            .read()
            .await
            .get(id)
            .cloned()
            .ok_or_else(|| ServiceError::SessionNotFound(id.to_string()))
    }

    /// Discards the session and its message state. Flows still running for it
    /// settle into the dropped slot and are never observed.
    pub async fn close(&self, id: &str) -> Result<(), ServiceError> {
        match self.sessions.write().await.remove(id) {
            Some(_) => {
                debug!("Closed session {}", id);
                Ok(())
            }
            None => Err(ServiceError::SessionNotFound(id.to_string())),
        }
    }

    /// Drops every session older than `ttl`. Returns how many were removed.
    pub async fn sweep(&self, ttl: Duration) -> usize {
        let now = Instant::now();
        let mut sessions = self.sessions.write().await;
        let before = sessions.len();
        sessions.retain(|_, s| !s.expired(ttl, now));
        before - sessions.len()
    }
}

/// Periodically evicts expired sessions. Spawn once at startup.
pub async fn start_session_sweeper(state: SessionsState, ttl: Duration) {
    let period = (ttl / 4).max(Duration::from_secs(1));
    let mut ticker = tokio::time::interval(period);
    loop {
        ticker.tick().await;
        let removed = state.sweep(ttl).await;
        if removed > 0 {
            info!("Expired {} view session(s)", removed);
        }
    }
}
