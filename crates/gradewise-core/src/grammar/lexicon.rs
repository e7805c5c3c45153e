//! Word lists consulted by the detectors.

use std::collections::BTreeSet;

use serde::Serialize;

/// Uncountable nouns that take no article.
const MASS_NOUNS: &[&str] = &[
    "advice",
    "air",
    "education",
    "electricity",
    "energy",
    "equipment",
    "evidence",
    "furniture",
    "health",
    "information",
    "knowledge",
    "money",
    "oxygen",
    "pollution",
    "research",
    "sodium",
    "traffic",
    "water",
    "weather",
];

/// Places used without an article in set phrases ("at school", "in bed").
const ZERO_ARTICLE_PLACES: &[&str] = &[
    "bed",
    "church",
    "college",
    "home",
    "hospital",
    "school",
    "university",
    "work",
];

const PAST_TIME_MARKERS: &[&str] = &["ago", "last", "yesterday"];

const SUBORDINATORS: &[&str] = &["although", "because", "if", "when", "while"];

/// Words that open a new clause; `,` is also a clause boundary.
const CLAUSE_CONNECTORS: &[&str] = &["and", "because", "but", "or", "since", "so", "while"];

const OVERLOAD_MARKERS: &[&str] = &["and", "but", "that", "which"];

fn set(words: &[&str]) -> BTreeSet<String> {
    words.iter().map(|w| (*w).to_string()).collect()
}

/// Lowercase word lists used by the grammar detectors.
///
/// Starts from built-in lists; configuration can only add words.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Lexicon {
    mass_nouns: BTreeSet<String>,
    zero_article_places: BTreeSet<String>,
    past_time_markers: BTreeSet<String>,
    subordinators: BTreeSet<String>,
    clause_connectors: BTreeSet<String>,
    overload_markers: BTreeSet<String>,
}

impl Default for Lexicon {
    fn default() -> Self {
        Self {
            mass_nouns: set(MASS_NOUNS),
            zero_article_places: set(ZERO_ARTICLE_PLACES),
            past_time_markers: set(PAST_TIME_MARKERS),
            subordinators: set(SUBORDINATORS),
            clause_connectors: set(CLAUSE_CONNECTORS),
            overload_markers: set(OVERLOAD_MARKERS),
        }
    }
}

fn extend(target: &mut BTreeSet<String>, words: &[String]) {
    target.extend(
        words
            .iter()
            .map(|w| w.trim().to_lowercase())
            .filter(|w| !w.is_empty()),
    );
}

impl Lexicon {
    /// Add configured words on top of the built-in lists.
    #[must_use]
    pub fn with_extensions(
        mut self,
        mass_nouns: &[String],
        zero_article_places: &[String],
        past_time_markers: &[String],
    ) -> Self {
        extend(&mut self.mass_nouns, mass_nouns);
        extend(&mut self.zero_article_places, zero_article_places);
        extend(&mut self.past_time_markers, past_time_markers);
        self
    }

    /// Returns `true` if `word` is an uncountable noun.
    pub fn is_mass_noun(&self, word: &str) -> bool {
        self.mass_nouns.contains(&word.to_lowercase())
    }

    /// Returns `true` if `word` is a place that idiomatically takes no article.
    pub fn is_zero_article_place(&self, word: &str) -> bool {
        self.zero_article_places.contains(&word.to_lowercase())
    }

    /// Returns `true` if `word` marks past time.
    pub fn is_past_time_marker(&self, word: &str) -> bool {
        self.past_time_markers.contains(&word.to_lowercase())
    }

    /// Returns `true` if `word` is a subordinating conjunction.
    pub fn is_subordinator(&self, word: &str) -> bool {
        self.subordinators.contains(&word.to_lowercase())
    }

    /// Returns `true` if `word` opens a new clause.
    pub fn is_clause_connector(&self, word: &str) -> bool {
        word == "," || self.clause_connectors.contains(&word.to_lowercase())
    }

    /// Returns `true` if `word` counts towards clause overload.
    pub fn is_overload_marker(&self, word: &str) -> bool {
        self.overload_markers.contains(&word.to_lowercase())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtins_are_case_insensitive() {
        let lexicon = Lexicon::default();
        assert!(lexicon.is_mass_noun("Oxygen"));
        assert!(lexicon.is_zero_article_place("school"));
        assert!(lexicon.is_past_time_marker("Yesterday"));
        assert!(lexicon.is_subordinator("Although"));
        assert!(lexicon.is_clause_connector(","));
        assert!(lexicon.is_clause_connector("But"));
        assert!(lexicon.is_overload_marker("which"));
        assert!(!lexicon.is_mass_noun("cat"));
    }

    #[test]
    fn extensions_add_without_removing() {
        let lexicon = Lexicon::default().with_extensions(
            &["Glucose".to_string(), "  ".to_string()],
            &["prison".to_string()],
            &["previously".to_string()],
        );
        assert!(lexicon.is_mass_noun("glucose"));
        assert!(lexicon.is_mass_noun("water"));
        assert!(lexicon.is_zero_article_place("prison"));
        assert!(lexicon.is_past_time_marker("previously"));
        assert!(!lexicon.is_mass_noun(""));
    }
}
