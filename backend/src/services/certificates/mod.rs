//! # Certificates Service Module
//!
//! Composition and export of one certificate instance of a view session.
//!
//! ## Sub-modules:
//! - `compose`: pure `CertificateComposer` (record + texts + style → view).
//! - `capture`: `SurfaceCapture` / `DocumentEncoder` and their image/genpdf
//!   implementations.
//! - `export`: `ArtifactExporter`, the per-certificate busy flag and file naming.
//! - `view` / `download`: HTTP handlers.

pub mod capture;
pub mod compose;
mod download;
pub mod export;
mod view;

use actix_web::web::{post, scope};
use actix_web::Scope;

const API_PATH: &str = "/api/sessions/{session_id}/certificate";

/// Configures and returns the Actix `Scope` for certificate routes.
///
/// # Registered Routes:
///
/// *   **`POST`**:
///     - **Handler**: `view::process`
///     - **Description**: Expects `{recordIndex, style}`. Returns the composed
///       `CertificateView` with its fingerprint as `ETag`; answers
///       `304 Not Modified` when `If-None-Match` already carries it.
///
/// *   **`POST /export`**:
///     - **Handler**: `download::process`
///     - **Description**: Expects `{recordIndex, format, surface}` where
///       `surface` is the rendered certificate as a base64 PNG. Returns the PNG
///       or PDF bytes as an attachment named `<label>-<personName>.<ext>`.
pub fn configure_routes() -> Scope {
    scope(API_PATH)
        .route("", post().to(view::process))
        .route("/export", post().to(download::process))
}
