//! Turns free-form model text into answer records.
//!
//! The model is told to reply with a bare JSON array but often wraps it in a
//! markdown fence or uses single quotes. Parsing is strict first; rewriting
//! single quotes to double quotes is only tried when the strict parse fails,
//! so apostrophes inside otherwise valid JSON survive.

use crate::models::{Analysis, Answer};
use serde_json::Value;

/// Remove code-fence markers and stray backticks, then trim.
pub fn strip_formatting(raw: &str) -> String {
    raw.replace("```json", "")
        .replace("```JSON", "")
        .replace('`', "")
        .trim()
        .to_string()
}

/// Parse model text into an [`Analysis`]. Never fails.
pub fn parse_answers(raw: &str) -> Analysis {
    let cleaned = strip_formatting(raw);

    let parsed = serde_json::from_str::<Value>(&cleaned).or_else(|strict_err| {
        let requoted = cleaned.replace('\'', "\"");
        serde_json::from_str::<Value>(&requoted).map_err(|_| strict_err)
    });

    let value = match parsed {
        Ok(value) => value,
        Err(e) => {
            tracing::warn!(
                raw_len = raw.len(),
                error = %e,
                "Model response is not valid JSON"
            );
            return Analysis::Unparsed {
                raw: raw.to_string(),
                reason: e.to_string(),
            };
        }
    };

    let Value::Array(items) = value else {
        tracing::warn!(raw_len = raw.len(), "Model response is not a JSON array");
        return Analysis::Unparsed {
            raw: raw.to_string(),
            reason: "expected a JSON array of answers".to_string(),
        };
    };

    let answers = items
        .iter()
        .filter_map(|item| match item {
            Value::Object(object) => Some(Answer::from_object(object)),
            other => {
                tracing::warn!(entry = %other, "Skipping non-object entry in model response");
                None
            }
        })
        .collect();

    Analysis::Answers(answers)
}
