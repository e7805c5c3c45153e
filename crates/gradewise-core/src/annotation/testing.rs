//! Hand-built annotations for unit tests.

use super::{Annotation, Pos, SentenceSpan, Token};

/// One token row: surface text, POS, tag, dependency, head index, lemma.
pub(crate) type Row<'a> = (&'a str, Pos, &'a str, &'a str, usize, &'a str);

pub(crate) const fn row<'a>(
    text: &'a str,
    pos: Pos,
    tag: &'a str,
    dep: &'a str,
    head: usize,
    lemma: &'a str,
) -> Row<'a> {
    (text, pos, tag, dep, head, lemma)
}

/// Build an annotation of `text` as a single sentence.
///
/// Token offsets are found by scanning `text` left to right for each row's
/// surface form.
pub(crate) fn annotate(text: &str, rows: &[Row<'_>]) -> Annotation {
    annotate_sentences(text, rows, &[])
}

/// Build an annotation with explicit sentence boundaries, given as the
/// sentence texts in order.
pub(crate) fn annotate_sentences(text: &str, rows: &[Row<'_>], sentences: &[&str]) -> Annotation {
    let mut cursor = 0;
    let tokens = rows
        .iter()
        .map(|&(word, pos, tag, dep, head, lemma)| {
            let idx = cursor
                + text[cursor..]
                    .find(word)
                    .unwrap_or_else(|| panic!("{word:?} not found after offset {cursor}"));
            cursor = idx + word.len();
            Token {
                text: word.to_string(),
                idx,
                pos,
                tag: tag.to_string(),
                lemma: lemma.to_string(),
                dep: dep.to_string(),
                head,
                ent_type: String::new(),
            }
        })
        .collect();

    let mut cursor = 0;
    let spans = sentences
        .iter()
        .map(|sentence| {
            let start = cursor + text[cursor..].find(sentence).expect("sentence in text");
            cursor = start + sentence.len();
            SentenceSpan { start, end: cursor }
        })
        .collect();

    Annotation::new(text, tokens, spans).expect("valid test annotation")
}

/// Mark token `i` with an entity label.
pub(crate) fn with_entity(mut annotation: Annotation, i: usize, label: &str) -> Annotation {
    annotation.tokens[i].ent_type = label.to_string();
    annotation
}
