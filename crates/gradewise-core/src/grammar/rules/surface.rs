//! Surface checks that need no syntax: spacing and capitalization.

use std::sync::LazyLock;

use regex::Regex;

use crate::grammar::context::SentenceContext;
use crate::grammar::kind::ErrorKind;
use crate::grammar::tally::ErrorTally;

static SPACE_BEFORE_PUNCT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s+[,.!?]").expect("valid regex"));

/// Whitespace immediately before `,` `.` `!` or `?`.
pub fn whitespace(ctx: &SentenceContext<'_>) -> ErrorTally {
    let mut tally = ErrorTally::new();
    for m in SPACE_BEFORE_PUNCT.find_iter(ctx.text) {
        tally.record(ErrorKind::WhitespaceError, m.as_str());
    }
    tally
}

/// First token starts with a lowercase letter.
pub fn capitalization(ctx: &SentenceContext<'_>) -> ErrorTally {
    let mut tally = ErrorTally::new();
    if let Some(first) = ctx.tokens().first()
        && first.text.chars().next().is_some_and(char::is_lowercase)
    {
        tally.record(ErrorKind::CapitalizationError, first.text.as_str());
    }
    tally
}
