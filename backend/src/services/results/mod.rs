//! # Results Service Module
//!
//! Entry point of the result view. A search resolves the typed code or mobile
//! number into the participant's records and opens a view session over them.
//!
//! ## Sub-modules:
//! - `resolve`: the `RecordResolver`, two equality lookups merged by identity.
//! - `search`: the HTTP handler that runs the resolver and opens the session.

pub mod resolve;
mod search;

use actix_web::web::{post, scope};
use actix_web::Scope;

const API_PATH: &str = "/api/results";

/// Configures and returns the Actix `Scope` for result lookups.
///
/// # Registered Routes:
///
/// *   **`POST /search`**:
///     - **Handler**: `search::process`
///     - **Description**: Expects `{query}`. Resolves the query into records and
///       opens a view session, returning `{sessionId, records, summary, message}`.
pub fn configure_routes() -> Scope {
    scope(API_PATH).route("/search", post().to(search::process))
}
