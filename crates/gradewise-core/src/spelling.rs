//! Word-level spelling evaluation.

use std::collections::{BTreeSet, HashSet};
use std::sync::LazyLock;

use camino::{Utf8Path, Utf8PathBuf};
use regex::Regex;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::error::SpellingError;

/// Word lists probed when no dictionary is configured.
pub const DEFAULT_DICTIONARY_PATHS: &[&str] = &["/usr/share/dict/words", "/usr/dict/words"];

static WORD: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b[a-zA-Z]+\b").expect("valid regex"));

/// A set of correctly spelled words.
pub trait Dictionary: Send + Sync {
    /// Returns `true` if `word` (already lowercased) is spelled correctly.
    fn contains(&self, word: &str) -> bool;
}

impl<T: Dictionary + ?Sized> Dictionary for std::sync::Arc<T> {
    fn contains(&self, word: &str) -> bool {
        (**self).contains(word)
    }
}

/// An in-memory, case-insensitive word list.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WordList {
    words: HashSet<String>,
}

impl WordList {
    /// Build from an iterator of words.
    pub fn from_words<I, S>(words: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            words: words
                .into_iter()
                .map(|w| w.as_ref().trim().to_lowercase())
                .filter(|w| !w.is_empty())
                .collect(),
        }
    }

    /// Parse a newline-delimited list. Blank lines and `#` comments are
    /// skipped.
    pub fn parse(content: &str) -> Self {
        Self::from_words(
            content
                .lines()
                .filter(|line| !line.trim_start().starts_with('#')),
        )
    }

    /// Load a newline-delimited word list from disk.
    pub fn load(path: &Utf8Path) -> Result<Self, SpellingError> {
        let content = std::fs::read_to_string(path).map_err(|source| SpellingError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let list = Self::parse(&content);
        tracing::debug!(path = %path, words = list.len(), "loaded dictionary");
        Ok(list)
    }

    /// Load `configured` if given, otherwise the first existing default path.
    pub fn discover(configured: Option<&Utf8Path>) -> Result<Self, SpellingError> {
        if let Some(path) = configured {
            return Self::load(path);
        }
        let candidates: Vec<Utf8PathBuf> = DEFAULT_DICTIONARY_PATHS
            .iter()
            .map(Utf8PathBuf::from)
            .collect();
        match candidates.iter().find(|p| p.is_file()) {
            Some(path) => Self::load(path),
            None => Err(SpellingError::NotFound {
                tried: DEFAULT_DICTIONARY_PATHS.join(", "),
            }),
        }
    }

    /// Number of distinct words.
    pub fn len(&self) -> usize {
        self.words.len()
    }

    /// Returns `true` if the list is empty.
    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }
}

impl Dictionary for WordList {
    fn contains(&self, word: &str) -> bool {
        self.words.contains(word)
    }
}

/// Result of a spelling check.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct SpellingReport {
    /// Number of alphabetic words, counting repeats.
    pub total_words: usize,
    /// Number of distinct misspelled words.
    pub misspelled_count: usize,
    /// Distinct misspelled words, lowercased and sorted.
    pub misspelled_words: Vec<String>,
    /// 0–4 band.
    pub spelling_score: u8,
}

impl SpellingReport {
    /// Report for text with no words.
    pub const fn empty() -> Self {
        Self {
            total_words: 0,
            misspelled_count: 0,
            misspelled_words: Vec::new(),
            spelling_score: 4,
        }
    }
}

/// Map a misspelling count to a band: 0 → 4, ≤2 → 3, ≤5 → 2, ≤9 → 1, else 0.
pub const fn spelling_score(misspelled: usize) -> u8 {
    match misspelled {
        0 => 4,
        1..=2 => 3,
        3..=5 => 2,
        6..=9 => 1,
        _ => 0,
    }
}

/// Returns `true` if `text` contains at least one `[A-Za-z]+` word.
pub fn has_words(text: &str) -> bool {
    WORD.is_match(text)
}

/// Check every `[A-Za-z]+` word of `text` against `dictionary`.
#[tracing::instrument(skip_all, fields(text_len = text.len()))]
pub fn evaluate_spelling(dictionary: &dyn Dictionary, text: &str) -> SpellingReport {
    let words: Vec<String> = WORD
        .find_iter(text)
        .map(|m| m.as_str().to_lowercase())
        .collect();
    if words.is_empty() {
        return SpellingReport::empty();
    }

    let misspelled: BTreeSet<&str> = words
        .iter()
        .map(String::as_str)
        .filter(|w| !dictionary.contains(w))
        .collect();
    let misspelled_words: Vec<String> = misspelled.into_iter().map(str::to_string).collect();

    SpellingReport {
        total_words: words.len(),
        misspelled_count: misspelled_words.len(),
        spelling_score: spelling_score(misspelled_words.len()),
        misspelled_words,
    }
}
