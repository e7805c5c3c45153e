//! Article errors: missing articles and `a`/`an` before plurals.

use std::collections::BTreeSet;

use crate::annotation::{Annotation, Pos, Token};
use crate::grammar::context::SentenceContext;
use crate::grammar::kind::ErrorKind;
use crate::grammar::tally::ErrorTally;

use super::{is_all_lowercase, is_coordinating};

/// Dependencies of a noun that normally carries an article.
const ARTICLE_SLOTS: &[&str] = &["dobj", "pobj", "attr"];

fn is_determiner_dep(dep: &str) -> bool {
    dep.starts_with("det") || matches!(dep, "poss" | "predet")
}

/// A determiner or possessive on the noun itself or on any of its ancestors.
fn has_determiner(doc: &Annotation, i: usize) -> bool {
    std::iter::once(i)
        .chain(doc.ancestors(i))
        .any(|node| doc.children(node).any(|c| is_determiner_dep(&doc.tokens()[c].dep)))
}

fn takes_no_article(ctx: &SentenceContext<'_>, token: &Token) -> bool {
    ctx.lexicon.is_mass_noun(&token.text) || ctx.lexicon.is_zero_article_place(&token.text)
}

/// Article errors.
///
/// - A bare singular common noun as object, prepositional object or
///   attribute, with no determiner on it or any ancestor.
/// - `a`/`an` directly before a plural noun.
/// - A bare singular noun (optionally with one modifier) right after a
///   conjunction, when no determiner appears in the two tokens before it.
pub fn articles(ctx: &SentenceContext<'_>) -> ErrorTally {
    let mut tally = ErrorTally::new();
    let doc = ctx.doc;
    let tokens = ctx.tokens();
    let mut flagged = BTreeSet::new();

    for (i, token) in tokens.iter().enumerate() {
        if token.tag == "NN"
            && token.pos != Pos::Propn
            && is_all_lowercase(&token.text)
            && ARTICLE_SLOTS.contains(&token.dep.as_str())
            && !takes_no_article(ctx, token)
            && !has_determiner(doc, i)
        {
            flagged.insert(i);
            tally.record(ErrorKind::ArticleError, token.text.as_str());
        }
    }

    for (i, pair) in tokens.windows(2).enumerate() {
        if matches!(pair[0].lower().as_str(), "a" | "an") && pair[1].tag == "NNS" {
            tally.record(ErrorKind::ArticleError, doc.span_text(i, i + 1));
        }
    }

    for (i, window) in tokens.windows(3).enumerate() {
        let (conj, modifier, noun) = (&window[0], &window[1], &window[2]);
        if is_coordinating(conj)
            && matches!(modifier.pos, Pos::Noun | Pos::Adj)
            && noun.pos == Pos::Noun
            && noun.tag == "NN"
            && !takes_no_article(ctx, noun)
            && !flagged.contains(&(i + 2))
            && !tokens[i.saturating_sub(2)..i]
                .iter()
                .any(|t| t.pos == Pos::Det)
        {
            tally.record(ErrorKind::ArticleError, doc.span_text(i + 1, i + 2));
        }
    }

    tally
}
