use crate::model::message::MessageSlot;
use crate::model::record::{EnrollmentRecord, ResultSummary};
use crate::model::style::StyleSelection;
use serde::{Deserialize, Serialize};

/// Request payload for the result search endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchRequest {
    /// Participant code or mobile number, as typed.
    pub query: String,
}

/// A resolved result set bound to a freshly opened view session.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionResponse {
    pub session_id: String,
    pub records: Vec<EnrollmentRecord>,
    pub summary: ResultSummary,
    pub message: MessageSlot,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ComposeRequest {
    /// Index into the session's record list.
    pub record_index: usize,
    #[serde(default)]
    pub style: StyleSelection,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ExportFormat {
    Image,
    Document,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportRequest {
    pub record_index: usize,
    pub format: ExportFormat,
    /// The rendered certificate surface as a base64 PNG.
    pub surface: String,
}
