//! # Settings Service Module
//!
//! Editable certificate wording. The composer reads the latest saved value on
//! every call, so a save takes effect on the next composition.

mod get;
mod save;

use actix_web::web::{get, post, scope};
use actix_web::Scope;

const API_PATH: &str = "/api/settings";

/// Configures and returns the Actix `Scope` for settings routes.
///
/// # Registered Routes:
///
/// *   **`GET /texts`**: current `CertificateTexts` (defaults if never saved).
/// *   **`POST /texts`**: replaces the stored `CertificateTexts` as a whole.
pub fn configure_routes() -> Scope {
    scope(API_PATH)
        .route("/texts", get().to(get::process))
        .route("/texts", post().to(save::process))
}
