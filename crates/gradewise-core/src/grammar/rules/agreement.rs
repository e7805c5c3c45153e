//! Agreement, tense and preposition checks.

use crate::annotation::{Annotation, Pos, Token};
use crate::grammar::context::SentenceContext;
use crate::grammar::kind::ErrorKind;
use crate::grammar::tally::ErrorTally;

use super::is_auxiliary_dep;

const SINGULAR_PRONOUNS: &[&str] = &["he", "she", "it"];
const PLURAL_PRONOUNS: &[&str] = &["they", "we", "you"];

fn is_singular(doc: &Annotation, i: usize) -> bool {
    let token = &doc.tokens()[i];
    let coordinated = doc.children(i).any(|c| doc.tokens()[c].dep == "conj");
    !coordinated
        && (matches!(token.tag.as_str(), "NN" | "NNP")
            || SINGULAR_PRONOUNS.contains(&token.lower().as_str()))
}

fn is_plural(doc: &Annotation, i: usize) -> bool {
    let token = &doc.tokens()[i];
    matches!(token.tag.as_str(), "NNS" | "NNPS")
        || PLURAL_PRONOUNS.contains(&token.lower().as_str())
}

fn subject_of(doc: &Annotation, verb: usize) -> Option<usize> {
    doc.children(verb).find(|&c| doc.tokens()[c].is_subject())
}

/// The finite verb that agrees with the subject of `verb`: its first
/// auxiliary if it has one, otherwise the verb itself.
fn finite_verb(doc: &Annotation, verb: usize) -> usize {
    doc.children(verb)
        .find(|&c| c < verb && is_auxiliary_dep(&doc.tokens()[c].dep))
        .unwrap_or(verb)
}

fn record_pair(tally: &mut ErrorTally, doc: &Annotation, a: usize, b: usize) {
    tally.record(ErrorKind::AgreementError, doc.span_text(a.min(b), a.max(b)));
}

/// Agreement errors.
///
/// - `were` with a singular subject, `was` with a plural one.
/// - A singular subject with a base/non-3rd-person present verb, or a plural
///   subject with a 3rd-person singular verb. Modal-led and coordinated
///   subjects are skipped.
/// - A comparative after `the` modifying a singular noun.
/// - `their` whose nearest preceding noun is a singular non-person.
pub fn agreement(ctx: &SentenceContext<'_>) -> ErrorTally {
    let mut tally = ErrorTally::new();
    let doc = ctx.doc;
    let tokens = ctx.tokens();

    for (i, token) in tokens.iter().enumerate() {
        let lower = token.lower();
        if lower != "was" && lower != "were" {
            continue;
        }
        let subject = subject_of(doc, i).or_else(|| {
            is_auxiliary_dep(&token.dep)
                .then(|| subject_of(doc, token.head))
                .flatten()
        });
        let Some(subject) = subject else { continue };
        if (lower == "were" && is_singular(doc, subject))
            || (lower == "was" && is_plural(doc, subject))
        {
            record_pair(&mut tally, doc, subject, i);
        }
    }

    for (s, subject) in tokens.iter().enumerate() {
        if subject.dep != "nsubj" {
            continue;
        }
        let verb = subject.head;
        if verb == s || !tokens[verb].pos.is_verbal() {
            continue;
        }
        let finite = finite_verb(doc, verb);
        let tag = tokens[finite].tag.as_str();
        if (matches!(tag, "VB" | "VBP") && is_singular(doc, s))
            || (tag == "VBZ" && is_plural(doc, s))
        {
            record_pair(&mut tally, doc, s, finite);
        }
    }

    for (i, token) in tokens.iter().enumerate() {
        if token.tag == "JJR"
            && i > 0
            && tokens[i - 1].lower() == "the"
            && tokens[token.head].tag == "NN"
        {
            tally.record(ErrorKind::AgreementError, token.text.as_str());
        }
    }

    for (i, token) in tokens.iter().enumerate() {
        if token.lower() != "their" {
            continue;
        }
        let antecedent = tokens[..i].iter().rev().find(|t| t.pos.is_nominal());
        if let Some(noun) = antecedent
            && noun.tag == "NN"
            && noun.ent_type != "PERSON"
        {
            tally.record(ErrorKind::AgreementError, token.text.as_str());
        }
    }

    tally
}

fn is_present_or_base(token: &Token) -> bool {
    matches!(token.tag.as_str(), "VB" | "VBP" | "VBZ")
}

/// Present-tense verb in a sentence anchored in the past.
///
/// Needs a past-time marker somewhere in the sentence; flags the first main
/// verb in base or present form, auxiliaries or not.
pub fn tense(ctx: &SentenceContext<'_>) -> ErrorTally {
    let mut tally = ErrorTally::new();
    let tokens = ctx.tokens();
    if !tokens
        .iter()
        .any(|t| ctx.lexicon.is_past_time_marker(&t.text))
    {
        return tally;
    }

    let offending = tokens
        .iter()
        .find(|t| t.pos == Pos::Verb && is_present_or_base(t));
    if let Some(verb) = offending {
        tally.record(ErrorKind::TenseError, verb.text.as_str());
    }
    tally
}

/// `increase on` instead of `increase in`/`by`.
pub fn preposition(ctx: &SentenceContext<'_>) -> ErrorTally {
    let mut tally = ErrorTally::new();
    let doc = ctx.doc;
    for (i, token) in ctx.tokens().iter().enumerate() {
        if !token.lemma.eq_ignore_ascii_case("increase") {
            continue;
        }
        for child in doc.children(i) {
            if doc.tokens()[child].lower() == "on" {
                tally.record(
                    ErrorKind::PrepositionError,
                    doc.span_text(i.min(child), i.max(child)),
                );
            }
        }
    }
    tally
}
