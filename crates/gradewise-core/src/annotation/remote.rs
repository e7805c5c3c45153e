//! Annotator that delegates to an HTTP annotation service.
//!
//! The service receives `{"text": "..."}` and answers with one spaCy
//! `Doc.to_json()` document. Every failure is a hard error: the pipeline
//! cannot proceed without annotations.

use std::time::Duration;

use super::{Annotation, Annotator, from_spacy_json};
use crate::error::{AnnotationError, AnnotationResult};

/// Default request timeout.
pub const DEFAULT_TIMEOUT_SECS: u64 = 10;

/// HTTP client for a remote annotation service.
#[derive(Debug, Clone)]
pub struct RemoteAnnotator {
    endpoint: String,
    agent: ureq::Agent,
}

impl RemoteAnnotator {
    /// Create a client for `endpoint` with a bounded per-request timeout.
    pub fn new(endpoint: impl Into<String>, timeout: Duration) -> Self {
        let config = ureq::Agent::config_builder()
            .timeout_global(Some(timeout))
            .build();
        Self {
            endpoint: endpoint.into(),
            agent: config.into(),
        }
    }

    /// The configured endpoint URL.
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

impl Annotator for RemoteAnnotator {
    #[tracing::instrument(skip(self, text), fields(endpoint = %self.endpoint, text_len = text.len()))]
    fn annotate(&self, text: &str) -> AnnotationResult<Annotation> {
        if text.trim().is_empty() {
            return Ok(Annotation::empty());
        }

        let payload = serde_json::json!({ "text": text }).to_string();
        let mut response = self
            .agent
            .post(&self.endpoint)
            .header("Content-Type", "application/json")
            .send(payload.as_str())
            .map_err(|e| match e {
                ureq::Error::StatusCode(code) => AnnotationError::Status(code),
                other => AnnotationError::Transport(other.to_string()),
            })?;

        let body = response
            .body_mut()
            .read_to_string()
            .map_err(|e| AnnotationError::Transport(e.to_string()))?;
        tracing::debug!(bytes = body.len(), "annotation received");

        from_spacy_json(&body)
    }
}
