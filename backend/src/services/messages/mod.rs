//! # Messages Service Module
//!
//! Generated messages shown on the result view: encouragement, spiritual
//! advice, and the personal message offered to participants who never attended.
//! All three share the single slot owned by the session's `MessageOrchestrator`.
//!
//! ## Sub-modules:
//! - `orchestrator`: the slot state machine and its preemption rule.
//! - `prompts`: prompt wording and post-processing per kind.
//! - `provider`: the `TextGenerator` boundary and its Gemini client.
//! - `generate` / `status`: HTTP handlers.

mod generate;
pub mod orchestrator;
pub mod prompts;
pub mod provider;
mod status;

use actix_web::web::{get, post, scope};
use actix_web::Scope;

const API_PATH: &str = "/api/sessions/{session_id}/message";

/// Configures and returns the Actix `Scope` for message routes.
///
/// # Registered Routes:
///
/// *   **`GET`**:
///     - **Handler**: `status::process`
///     - **Description**: Current `MessageSlot` of the session. Clients poll it
///       while the slot is `generating`.
///
/// *   **`POST /{kind}`**:
///     - **Handler**: `generate::process`
///     - **Description**: Starts the flow for `kind` (`encouragement`,
///       `spiritual-advice` or `personal`). The slot switches to `generating`
///       immediately and is returned with `202 Accepted`; the provider call runs
///       in the background.
pub fn configure_routes() -> Scope {
    scope(API_PATH)
        .route("", get().to(status::process))
        .route("/{kind}", post().to(generate::process))
}
