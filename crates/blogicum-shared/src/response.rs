//! Error body shared by every endpoint.
//!
//! Failures are reported as RFC 7807 problem details
//! (https://datatracker.ietf.org/doc/html/rfc7807): a `type` URI, a short
//! `title`, the HTTP `status` and an optional human-readable `detail`.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// URI identifying the problem type. `about:blank` when the status
    /// code already says it all.
    #[serde(rename = "type")]
    pub error_type: String,

    /// Short summary of the problem type.
    pub title: String,

    /// HTTP status code, duplicated in the body for clients that log it.
    pub status: u16,

    /// Occurrence-specific explanation.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
}

impl ErrorResponse {
    pub fn new(status: u16, title: impl Into<String>) -> Self {
        Self {
            error_type: "about:blank".to_string(),
            title: title.into(),
            status,
            detail: None,
        }
    }

    pub fn with_detail(mut self, detail: impl Into<String>) -> Self {
        self.detail = Some(detail.into());
        self
    }
}
