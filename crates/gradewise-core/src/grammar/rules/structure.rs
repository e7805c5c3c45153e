//! Sentence-level structure: subject, verb, roots, run-ons.

use crate::annotation::Pos;
use crate::grammar::context::SentenceContext;
use crate::grammar::kind::ErrorKind;
use crate::grammar::tally::ErrorTally;

use super::is_terminal;

/// Missing subject, missing verb, and fragment when both are missing.
pub fn subject_and_verb(ctx: &SentenceContext<'_>) -> ErrorTally {
    let mut tally = ErrorTally::new();
    let tokens = ctx.tokens();
    let has_subject = tokens.iter().any(|t| t.is_subject());
    let has_verb = tokens.iter().any(|t| t.pos.is_verbal());

    if !has_subject {
        tally.record(ErrorKind::MissingSubject, ctx.text);
    }
    if !has_verb {
        tally.record(ErrorKind::MissingVerb, ctx.text);
    }
    if !has_subject && !has_verb {
        tally.record(ErrorKind::Fragment, ctx.text);
    }
    tally
}

/// Too many verbs for the punctuation or coordination present.
///
/// Fires when there are two or more main verbs and no terminal punctuation,
/// or three or more verbs/auxiliaries and no coordinating conjunction.
pub fn run_on(ctx: &SentenceContext<'_>) -> ErrorTally {
    let mut tally = ErrorTally::new();
    let tokens = ctx.tokens();
    let main_verbs = tokens.iter().filter(|t| t.pos == Pos::Verb).count();
    let verbal = tokens.iter().filter(|t| t.pos.is_verbal()).count();
    let terminals = tokens.iter().filter(|t| is_terminal(t)).count();
    let coordinators = tokens.iter().filter(|t| t.dep == "cc").count();

    if (main_verbs >= 2 && terminals == 0) || (verbal >= 3 && coordinators == 0) {
        tracing::trace!(main_verbs, verbal, terminals, coordinators, "run-on");
        tally.record(ErrorKind::RunOn, ctx.text);
    }
    tally
}

/// Validate the dependency roots.
///
/// No verbal root reinforces missing verb and fragment; several verbal roots
/// reinforce run-on. A leading subordinator with no verbal root to complete
/// it is a dependent clause standing alone, which reinforces fragment again.
pub fn roots(ctx: &SentenceContext<'_>) -> ErrorTally {
    let mut tally = ErrorTally::new();
    let tokens = ctx.tokens();
    if tokens.is_empty() {
        return tally;
    }

    let verbal_roots = tokens
        .iter()
        .filter(|t| t.is_root() && t.pos.is_verbal())
        .count();

    match verbal_roots {
        0 => {
            tally.reinforce(ErrorKind::MissingVerb);
            tally.reinforce(ErrorKind::Fragment);
            if tokens.iter().any(|t| ctx.lexicon.is_subordinator(&t.text)) {
                tally.reinforce(ErrorKind::Fragment);
            }
        }
        1 => {}
        _ => tally.reinforce(ErrorKind::RunOn),
    }
    tally
}
