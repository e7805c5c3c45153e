//! Prompt construction and response parsing for the explanation service.

use serde_json::Value;

use super::{Candidate, Explanation};
use crate::grammar::ErrorKind;

/// Fixed instructions sent as the system message.
pub const SYSTEM_PROMPT: &str = "\
You explain grammar errors that have already been detected in a student's summary.

Rules:
- Keep every error `type` exactly as given. Never rename, merge or invent types.
- Keep every `text_span` exactly as given.
- Do not correct or rewrite the text.
- Only explain why the span is grammatically wrong, in one short sentence.
- If no errors are given, return an empty list.

Reply with JSON only, in exactly this shape:

{
  \"errors\": [
    {
      \"type\": \"error_type\",
      \"text_span\": \"span exactly as given\",
      \"description\": \"one short sentence\"
    }
  ]
}";

/// Build the user message: the normalized summary followed by the
/// candidates as pretty-printed JSON.
pub fn user_prompt(text: &str, candidates: &[Candidate]) -> String {
    let listing = serde_json::to_string_pretty(candidates).unwrap_or_else(|_| "[]".to_string());
    format!(
        "Student summary:\n{text}\n\n\
         Explain each of the following errors without changing its type.\n\n\
         Errors:\n{listing}"
    )
}

/// Parse a reply into explanations, enforcing the closed taxonomy.
///
/// Anything before the first `{` and anything after the first complete
/// JSON value is ignored. Items that are not objects are dropped. An item
/// whose `type` is not a known kind takes the kind of the candidate with
/// the same `text_span`, or is dropped when there is none. Spans are echoed
/// unchanged. Any parse failure yields an empty list.
pub fn parse_response(raw: &str, candidates: &[Candidate]) -> Vec<Explanation> {
    let Some(start) = raw.find('{') else {
        tracing::warn!("explanation reply contains no JSON object");
        return Vec::new();
    };

    let value = match serde_json::Deserializer::from_str(&raw[start..])
        .into_iter::<Value>()
        .next()
    {
        Some(Ok(value)) => value,
        Some(Err(e)) => {
            tracing::warn!(error = %e, "explanation reply is not valid JSON");
            return Vec::new();
        }
        None => return Vec::new(),
    };

    let Some(items) = value.get("errors").and_then(Value::as_array) else {
        tracing::warn!("explanation reply has no errors list");
        return Vec::new();
    };

    items
        .iter()
        .filter_map(|item| gate(item, candidates))
        .collect()
}

fn gate(item: &Value, candidates: &[Candidate]) -> Option<Explanation> {
    let object = item.as_object()?;
    let field = |name: &str| object.get(name).and_then(Value::as_str);
    let text_span = field("text_span").unwrap_or_default();

    let kind = match field("type").and_then(|label| label.parse::<ErrorKind>().ok()) {
        Some(kind) => kind,
        None => {
            let repaired = candidates
                .iter()
                .find(|c| c.text_span == text_span)
                .map(|c| c.kind);
            tracing::debug!(
                label = field("type").unwrap_or_default(),
                repaired = repaired.map(ErrorKind::as_str),
                "explanation type outside taxonomy"
            );
            repaired?
        }
    };

    Some(Explanation {
        kind,
        text_span: text_span.to_string(),
        description: field("description").unwrap_or_default().to_string(),
    })
}
