//! Clause-level checks: overload, comma splices, verbless clauses and
//! stacked connectors.

use crate::annotation::{Pos, Token};
use crate::grammar::context::{Clause, SentenceContext};
use crate::grammar::kind::ErrorKind;
use crate::grammar::tally::ErrorTally;

use super::is_coordinating;

/// Token count above which a sentence may be overloaded.
pub const OVERLOAD_TOKENS: usize = 35;

/// Connector count at which a long sentence is overloaded.
pub const OVERLOAD_MARKERS: usize = 3;

/// A long sentence stacked with `and`/`but`/`which`/`that`.
pub fn overload(ctx: &SentenceContext<'_>) -> ErrorTally {
    let mut tally = ErrorTally::new();
    let tokens = ctx.tokens();
    if tokens.len() <= OVERLOAD_TOKENS {
        return tally;
    }
    let markers = tokens
        .iter()
        .filter(|t| ctx.lexicon.is_overload_marker(&t.text))
        .count();
    if markers >= OVERLOAD_MARKERS {
        tally.record(ErrorKind::ClauseOverload, ctx.text);
    }
    tally
}

fn opens_dependent_clause(ctx: &SentenceContext<'_>, tokens: &[Token]) -> bool {
    tokens
        .first()
        .is_some_and(|t| t.pos == Pos::Sconj || ctx.lexicon.is_subordinator(&t.text))
}

fn is_independent(ctx: &SentenceContext<'_>, clause: &Clause) -> bool {
    let tokens = ctx.clause_tokens(clause);
    !opens_dependent_clause(ctx, tokens)
        && tokens
            .iter()
            .any(|t| t.is_subject() && !t.tag.starts_with('W'))
        && tokens.iter().any(|t| t.pos.is_verbal())
}

/// Two independent clauses joined by nothing but a comma.
///
/// Reported as `conjunction_missing`, a minor kind: the join lacks its
/// conjunction. This is separate from the long-sentence signal, which
/// [`overload`] reports as `clause_overload`. Under the error-count rubric
/// and in explanation candidates each splice counts as one more error.
pub fn comma_splice(ctx: &SentenceContext<'_>) -> ErrorTally {
    let mut tally = ErrorTally::new();
    let tokens = ctx.tokens();

    for pair in ctx.clauses.windows(2) {
        let (left, right) = (&pair[0], &pair[1]);
        let Some(joint) = right.opened_by else {
            continue;
        };
        if tokens[joint].text != "," || left.end != joint {
            continue;
        }
        if is_independent(ctx, left) && is_independent(ctx, right) {
            tally.record(
                ErrorKind::ConjunctionMissing,
                ctx.doc.span_text(left.start, right.last()),
            );
        }
    }
    tally
}

/// A clause with a subject but no verb, and no verb anywhere after it.
pub fn copula_missing(ctx: &SentenceContext<'_>) -> ErrorTally {
    let mut tally = ErrorTally::new();
    let tokens = ctx.tokens();

    for clause in &ctx.clauses {
        let own = ctx.clause_tokens(clause);
        let has_subject = own.iter().any(Token::is_subject);
        let has_verb = own.iter().any(|t| t.pos.is_verbal());
        let verb_follows = tokens[clause.end..].iter().any(|t| t.pos.is_verbal());
        if has_subject && !has_verb && !verb_follows {
            tally.record(
                ErrorKind::CopulaMissing,
                ctx.doc.span_text(clause.start, clause.last()),
            );
        }
    }
    tally
}

/// Two coordinating conjunctions in a row.
pub fn connector_collision(ctx: &SentenceContext<'_>) -> ErrorTally {
    let mut tally = ErrorTally::new();
    for (i, pair) in ctx.tokens().windows(2).enumerate() {
        if is_coordinating(&pair[0]) && is_coordinating(&pair[1]) {
            tally.record(ErrorKind::ConnectorCollision, ctx.doc.span_text(i, i + 1));
        }
    }
    tally
}
