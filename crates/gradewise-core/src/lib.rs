//! Core library for gradewise.
//!
//! Grades short written responses for grammar and spelling on a 0–4 scale,
//! with evidence spans for every detected error and optional
//! natural-language explanations.
//!
//! # Modules
//!
//! - [`annotation`] - Linguistic annotation values and adapters
//! - [`config`] - Configuration loading and management
//! - [`error`] - Error types and result aliases
//! - [`evaluate`] - The end-to-end pipeline
//! - [`explain`] - Explanation service client and taxonomy gate
//! - [`grammar`] - Detector battery and scoring
//! - [`normalize`] - Whitespace normalization
//! - [`segment`] - Sentence segmentation
//! - [`spelling`] - Dictionary-based spelling grade
//! - [`usage`] - Non-scoring usage hints
//!
//! # Quick Start
//!
//! ```no_run
//! use gradewise_core::{ConfigLoader, EvaluatorBuilder, WordList};
//!
//! let (config, _sources) = ConfigLoader::new()
//!     .with_user_config(true)
//!     .load()
//!     .expect("Failed to load configuration");
//!
//! let dictionary = WordList::discover(config.spelling.dictionary.as_deref())
//!     .expect("no dictionary");
//! let evaluator = EvaluatorBuilder::from_config(&config)
//!     .dictionary(dictionary)
//!     .build();
//! let report = evaluator.evaluate("The cat sat on the mat.").expect("evaluation failed");
//! println!("grammar {} / spelling {}", report.grammar.score, report.spelling.spelling_score);
//! ```
#![deny(unsafe_code)]

pub mod annotation;
pub mod config;
pub mod error;
pub mod evaluate;
pub mod explain;
pub mod grammar;
pub mod normalize;
pub mod segment;
pub mod spelling;
pub mod usage;

/// Default maximum input size: 5 MiB.
pub const DEFAULT_MAX_INPUT_BYTES: usize = 5 * 1024 * 1024;

pub use annotation::{Annotation, Annotator, DocumentStore, LazyAnnotator, RemoteAnnotator};
pub use config::{Config, ConfigLoader, ConfigSources, LogLevel};
pub use error::{
    AnnotationError, AnnotationResult, ConfigError, ConfigResult, EvalError, EvalResult,
    ExplainError, ExplainResult, SpellingError,
};
pub use evaluate::{
    EvaluationReport, Evaluator, EvaluatorBuilder, GrammarReport, annotator_from_config,
    report_schema,
};
pub use explain::{BackendRouter, ChatBackend, ChatCompletionsClient, ExplanationList};
pub use grammar::{ErrorKind, ErrorTally, Lexicon, Rubric, Severity};
pub use normalize::normalize_text;
pub use segment::{Sentence, SentenceKind, segment};
pub use spelling::{Dictionary, SpellingReport, WordList, evaluate_spelling};
pub use usage::{UsageIssue, UsageKind, UsageReport};
