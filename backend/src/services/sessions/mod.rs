//! Routes over an open view session: read it back or tear it down.

mod close;
mod get;

use actix_web::web::{delete, get, scope};
use actix_web::Scope;

const API_PATH: &str = "/api/sessions";

/// Configures and returns the Actix `Scope` for session routes.
///
/// Register it after the message and certificate scopes, which live under the
/// same prefix.
pub fn configure_routes() -> Scope {
    scope(API_PATH)
        // Records, summary and current message slot of a session.
        .route("/{session_id}", get().to(get::process))
        // Leaving the result view (new search or back).
        .route("/{session_id}", delete().to(close::process))
}
