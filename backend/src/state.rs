//! Application state shared with every handler as `web::Data<AppState>`.

use crate::services::certificates::export::ArtifactExporter;
use crate::services::results::resolve::RecordResolver;
use crate::session_controller::state::SessionsState;
use crate::store::SqliteStore;
use std::sync::Arc;

pub struct AppState {
    pub resolver: RecordResolver,
    /// Holds the editable certificate texts.
    pub settings: SqliteStore,
    pub exporter: Arc<ArtifactExporter>,
    pub sessions: SessionsState,
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::services::certificates::capture::RasterCapture;
    use crate::services::messages::provider::TextGenerator;
    use crate::services::results::resolve::tests::FakeStore;
    use std::time::Duration;
    use tempfile::TempDir;

    /// State over an in-memory record set and a throwaway settings database.
    /// Keep the `TempDir` alive for the duration of the test.
    pub(crate) fn test_state(
        store: FakeStore,
        generator: Option<Arc<dyn TextGenerator>>,
    ) -> (AppState, TempDir) {
        let dir = TempDir::new().unwrap();
        let settings = SqliteStore::open(dir.path().join("settings.sqlite")).unwrap();
        let state = AppState {
            resolver: RecordResolver::new(Arc::new(store), Duration::from_secs(5)),
            settings,
            exporter: Arc::new(ArtifactExporter::new(
                Some(Arc::new(RasterCapture)),
                None,
                "شهادة",
            )),
            sessions: SessionsState::new(generator, Duration::from_secs(5)),
        };
        (state, dir)
    }
}
