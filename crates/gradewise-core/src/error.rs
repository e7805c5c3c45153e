//! Error types for gradewise-core.

use camino::Utf8PathBuf;
use thiserror::Error;

/// Errors that can occur when working with configuration.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Failed to deserialize configuration.
    #[error("invalid configuration: {0}")]
    Deserialize(#[from] Box<figment::Error>),

    /// Configuration file not found after searching all locations.
    #[error("no configuration file found")]
    NotFound,
}

/// Result type alias using [`ConfigError`].
pub type ConfigResult<T> = Result<T, ConfigError>;

/// Errors raised by an annotation adapter.
///
/// These are fatal to a request: the pipeline never fabricates a partial
/// sentence result when annotations are unavailable.
#[derive(Error, Debug)]
pub enum AnnotationError {
    /// Reading a pre-annotated document file failed.
    #[error("failed to read annotations from {path}")]
    Io {
        /// The file that could not be read.
        path: Utf8PathBuf,
        /// The underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// Annotation JSON could not be decoded.
    #[error("malformed annotation document: {0}")]
    Json(#[from] serde_json::Error),

    /// The annotation document decoded but is internally inconsistent.
    #[error("invalid annotation document: {0}")]
    InvalidDocument(String),

    /// The remote annotation service could not be reached.
    #[error("annotation service transport error: {0}")]
    Transport(String),

    /// The remote annotation service answered with a non-success status.
    #[error("annotation service returned HTTP {0}")]
    Status(u16),

    /// No stored annotation covers the requested text.
    #[error("no annotation available for text: {text:?}")]
    NotAnnotated {
        /// The text that was requested.
        text: String,
    },

    /// Neither a document file nor an annotation endpoint is configured.
    #[error("no annotation source configured (set annotator.documents or annotator.endpoint)")]
    NoSource,
}

/// Result type alias using [`AnnotationError`].
pub type AnnotationResult<T> = Result<T, AnnotationError>;

/// Errors raised while talking to the explanation service.
///
/// The explanation filter swallows every one of these and degrades to an
/// empty explanation list.
#[derive(Error, Debug)]
pub enum ExplainError {
    /// Network failure or timeout.
    #[error("explanation backend {backend} transport error: {message}")]
    Transport {
        /// Backend name from configuration.
        backend: String,
        /// Transport error message.
        message: String,
    },

    /// The backend answered with a non-success status.
    #[error("explanation backend {backend} returned HTTP {status}")]
    Status {
        /// Backend name from configuration.
        backend: String,
        /// HTTP status code.
        status: u16,
    },

    /// The backend answered but carried no message content.
    #[error("explanation backend {0} returned an empty completion")]
    EmptyCompletion(String),

    /// No backend is configured.
    #[error("no explanation backend configured")]
    NoBackend,
}

/// Result type alias using [`ExplainError`].
pub type ExplainResult<T> = Result<T, ExplainError>;

/// Errors raised while loading a spelling dictionary.
#[derive(Error, Debug)]
pub enum SpellingError {
    /// The dictionary file could not be read.
    #[error("failed to read dictionary {path}")]
    Io {
        /// The dictionary path.
        path: Utf8PathBuf,
        /// The underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// None of the candidate dictionary locations exist.
    #[error("no spelling dictionary found (tried: {tried})")]
    NotFound {
        /// Comma-separated list of probed paths.
        tried: String,
    },
}

/// Errors that can occur while evaluating a text.
#[derive(Error, Debug)]
pub enum EvalError {
    /// The annotation adapter failed.
    #[error(transparent)]
    Annotation(#[from] AnnotationError),

    /// Spelling was requested but no dictionary is available.
    #[error("no spelling dictionary configured")]
    NoDictionary,
}

/// Result type alias using [`EvalError`].
pub type EvalResult<T> = Result<T, EvalError>;

/// A label outside the closed error taxonomy.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("unknown error kind: {0:?}")]
pub struct UnknownErrorKind(pub String);
