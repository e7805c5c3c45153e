//! The evaluation pipeline.
//!
//! normalize → segment → annotate and detect per sentence → score →
//! explain → spell-check. Every collaborator is injected through
//! [`EvaluatorBuilder`]; an [`Evaluator`] holds no mutable state and can be
//! shared across threads.

use std::sync::Arc;
use std::time::Duration;

use schemars::JsonSchema;
use serde::Serialize;

use crate::annotation::{Annotator, DocumentStore, LazyAnnotator, RemoteAnnotator};
use crate::config::{AnnotatorConfig, Config};
use crate::error::{AnnotationError, EvalError, EvalResult};
use crate::explain::{BackendRouter, ChatBackend, ExplanationList, explain};
use crate::grammar::{ErrorTally, Lexicon, Rubric, detect_annotated, score_with};
use crate::normalize::normalize_text;
use crate::segment::{Sentence, segment};
use crate::spelling::{Dictionary, SpellingReport, evaluate_spelling, has_words};
use crate::usage::{UsageReport, usage_issues};

/// The `grammar` section of a report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, JsonSchema)]
pub struct GrammarReport {
    /// 0–4 grade.
    pub score: u8,
    /// Rubric that produced the grade.
    pub rubric: Rubric,
    /// Segmented sentences.
    pub sentences: Vec<Sentence>,
    /// One tally per sentence, aligned with `sentences`.
    pub details: Vec<ErrorTally>,
    /// Explanations for the detected errors.
    pub explanation: ExplanationList,
}

impl GrammarReport {
    fn empty(rubric: Rubric) -> Self {
        Self {
            score: 0,
            rubric,
            sentences: Vec::new(),
            details: Vec::new(),
            explanation: ExplanationList::default(),
        }
    }

    /// Sum of errors across all sentences.
    pub fn total_errors(&self) -> usize {
        self.details.iter().map(ErrorTally::total_errors).sum()
    }
}

/// Full evaluation of one text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, JsonSchema)]
pub struct EvaluationReport {
    /// Grammar grade and evidence.
    pub grammar: GrammarReport,
    /// Non-scoring usage hints. Absent when disabled.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub usage_clarity: Option<UsageReport>,
    /// Spelling grade.
    pub spelling: SpellingReport,
}

/// JSON Schema for [`EvaluationReport`].
pub fn report_schema() -> schemars::Schema {
    schemars::schema_for!(EvaluationReport)
}

/// Build the annotator described by `config`.
///
/// A document file wins over an endpoint. The document file is read on
/// first use, so a bad path surfaces as an annotation error on the first
/// request rather than here.
pub fn annotator_from_config(config: &AnnotatorConfig) -> Arc<dyn Annotator> {
    if let Some(path) = config.documents.clone() {
        tracing::debug!(%path, "using pre-annotated documents");
        return Arc::new(LazyAnnotator::new(move || {
            Ok(Box::new(DocumentStore::load(&path)?) as Box<dyn Annotator>)
        }));
    }
    if let Some(endpoint) = &config.endpoint {
        tracing::debug!(%endpoint, "using remote annotation service");
        return Arc::new(RemoteAnnotator::new(
            endpoint.clone(),
            Duration::from_secs(config.timeout_secs),
        ));
    }
    Arc::new(LazyAnnotator::new(|| Err(AnnotationError::NoSource)))
}

/// Builder for [`Evaluator`].
pub struct EvaluatorBuilder {
    annotator: Arc<dyn Annotator>,
    explainer: Option<Arc<dyn ChatBackend>>,
    dictionary: Option<Arc<dyn Dictionary>>,
    lexicon: Lexicon,
    rubric: Rubric,
    usage_clarity: bool,
}

impl EvaluatorBuilder {
    /// Start from an annotator with no explainer, no dictionary, the
    /// built-in lexicon and the severity rubric.
    pub fn new(annotator: impl Annotator + 'static) -> Self {
        Self::with_shared_annotator(Arc::new(annotator))
    }

    /// Start from an already shared annotator.
    pub fn with_shared_annotator(annotator: Arc<dyn Annotator>) -> Self {
        Self {
            annotator,
            explainer: None,
            dictionary: None,
            lexicon: Lexicon::default(),
            rubric: Rubric::default(),
            usage_clarity: true,
        }
    }

    /// Everything except the dictionary, taken from configuration.
    ///
    /// Explanation backends are attached only when explanations are enabled
    /// and at least one backend is configured.
    pub fn from_config(config: &Config) -> Self {
        let mut builder = Self::with_shared_annotator(annotator_from_config(&config.annotator))
            .lexicon(config.grammar.lexicon())
            .rubric(config.grammar.rubric)
            .usage_clarity(config.usage_clarity);

        let explanation = &config.explanation;
        if explanation.enabled && !explanation.backends.is_empty() {
            builder = builder.explainer(BackendRouter::from_configs(
                &explanation.backends,
                explanation.temperature,
            ));
        }
        builder
    }

    /// Attach an explanation backend.
    pub fn explainer(mut self, backend: impl ChatBackend + 'static) -> Self {
        self.explainer = Some(Arc::new(backend));
        self
    }

    /// Drop any explanation backend.
    pub fn without_explainer(mut self) -> Self {
        self.explainer = None;
        self
    }

    /// Attach a spelling dictionary.
    pub fn dictionary(mut self, dictionary: impl Dictionary + 'static) -> Self {
        self.dictionary = Some(Arc::new(dictionary));
        self
    }

    /// Replace the lexicon.
    pub fn lexicon(mut self, lexicon: Lexicon) -> Self {
        self.lexicon = lexicon;
        self
    }

    /// Select the scoring rubric.
    pub const fn rubric(mut self, rubric: Rubric) -> Self {
        self.rubric = rubric;
        self
    }

    /// Toggle usage hints.
    pub const fn usage_clarity(mut self, enabled: bool) -> Self {
        self.usage_clarity = enabled;
        self
    }

    /// Finish building.
    pub fn build(self) -> Evaluator {
        Evaluator {
            annotator: self.annotator,
            explainer: self.explainer,
            dictionary: self.dictionary,
            lexicon: self.lexicon,
            rubric: self.rubric,
            usage_clarity: self.usage_clarity,
        }
    }
}

/// Grades texts for grammar and spelling.
pub struct Evaluator {
    annotator: Arc<dyn Annotator>,
    explainer: Option<Arc<dyn ChatBackend>>,
    dictionary: Option<Arc<dyn Dictionary>>,
    lexicon: Lexicon,
    rubric: Rubric,
    usage_clarity: bool,
}

impl std::fmt::Debug for Evaluator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Evaluator")
            .field("explainer", &self.explainer.as_ref().map(|b| b.name().to_string()))
            .field("dictionary", &self.dictionary.is_some())
            .field("rubric", &self.rubric)
            .field("usage_clarity", &self.usage_clarity)
            .finish_non_exhaustive()
    }
}

impl Evaluator {
    /// Shorthand for [`EvaluatorBuilder::new`].
    pub fn builder(annotator: impl Annotator + 'static) -> EvaluatorBuilder {
        EvaluatorBuilder::new(annotator)
    }

    /// Whether a spelling dictionary is attached.
    pub fn has_dictionary(&self) -> bool {
        self.dictionary.is_some()
    }

    /// Grammar, usage and spelling for `raw`.
    ///
    /// Fails when annotation fails or when the text has words but no
    /// dictionary is attached. Explanation failures never fail the call.
    #[tracing::instrument(skip_all, fields(text_len = raw.len()))]
    pub fn evaluate(&self, raw: &str) -> EvalResult<EvaluationReport> {
        let text = normalize_text(raw);
        let spelling = self.spell_normalized(&text)?;
        let (grammar, usage) = self.grade(&text)?;
        tracing::debug!(
            grammar_score = grammar.score,
            spelling_score = spelling.spelling_score,
            sentences = grammar.sentences.len(),
            "evaluation complete"
        );
        Ok(EvaluationReport {
            grammar,
            usage_clarity: self.usage_clarity.then_some(usage),
            spelling,
        })
    }

    /// Grammar section only.
    #[tracing::instrument(skip_all, fields(text_len = raw.len()))]
    pub fn grammar(&self, raw: &str) -> EvalResult<GrammarReport> {
        let (grammar, _) = self.grade(&normalize_text(raw))?;
        Ok(grammar)
    }

    /// Spelling section only.
    pub fn spelling(&self, raw: &str) -> EvalResult<SpellingReport> {
        self.spell_normalized(&normalize_text(raw))
    }

    fn spell_normalized(&self, text: &str) -> EvalResult<SpellingReport> {
        if !has_words(text) {
            return Ok(SpellingReport::empty());
        }
        let dictionary = self.dictionary.as_deref().ok_or(EvalError::NoDictionary)?;
        Ok(evaluate_spelling(dictionary, text))
    }

    fn grade(&self, text: &str) -> EvalResult<(GrammarReport, UsageReport)> {
        let sentences = segment(&*self.annotator, text)?;
        if sentences.is_empty() {
            return Ok((GrammarReport::empty(self.rubric), UsageReport::default()));
        }

        let mut details = Vec::with_capacity(sentences.len());
        let mut usage = UsageReport::default();
        for sentence in &sentences {
            let doc = self.annotator.annotate(&sentence.text)?;
            details.push(detect_annotated(&doc, &sentence.text, &self.lexicon));
            if self.usage_clarity {
                usage.issues.extend(usage_issues(&doc, &self.lexicon));
            }
        }

        let score = score_with(self.rubric, &details, sentences.len());
        let explanation = match &self.explainer {
            Some(backend) => explain(
                &**backend,
                text,
                sentences.iter().map(|s| s.text.as_str()).zip(&details),
            ),
            None => ExplanationList::default(),
        };

        let grammar = GrammarReport {
            score,
            rubric: self.rubric,
            sentences,
            details,
            explanation,
        };
        Ok((grammar, usage))
    }
}
