//! Recovery of a structured result from a free-text model reply.
//!
//! Model output is not schema-constrained: the JSON object we asked for may
//! arrive bare, wrapped in a fenced code block, or buried in prose. The
//! heuristics here are deliberately isolated behind [`parse_reply`] so they
//! can be swapped for a stricter contract without touching callers.

use serde::Serialize;
use serde_json::Value;
use thiserror::Error;

/// Placeholder used when the reply object carries no `summary` field.
pub const DEFAULT_SUMMARY: &str = "(no summary returned)";

/// Fallback folder used when the reply object carries no folder field.
pub const FALLBACK_FOLDER: &str = "Unsorted";

/// A successfully decoded model reply. Missing optional fields have been
/// replaced by fixed defaults; this is only ever produced from a reply that
/// decoded as a JSON object.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StructuredResult {
    pub summary: String,
    pub suggested_folder: String,
    pub keywords: Vec<String>,
}

/// The reply could not be recovered as structured data. Carries the cleaned
/// text verbatim for display to the user; no field values are fabricated.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("model reply is not valid JSON: {cleaned}")]
pub struct ParseFailure {
    pub cleaned: String,
}

/// Parse a raw model reply into a [`StructuredResult`].
///
/// Ordered attempts, first success wins:
/// 1. strip code-fence artifacts, then decode the cleaned text directly;
/// 2. decode the substring between the first `{` and the last `}` (recovers
///    replies with prepended/appended commentary).
pub fn parse_reply(raw: &str) -> Result<StructuredResult, ParseFailure> {
    let cleaned = strip_fences(raw);

    if let Ok(value) = serde_json::from_str::<Value>(&cleaned) {
        if let Some(result) = fields_from(&value) {
            return Ok(result);
        }
    }

    if let (Some(start), Some(end)) = (cleaned.find('{'), cleaned.rfind('}')) {
        if start < end {
            if let Ok(value) = serde_json::from_str::<Value>(&cleaned[start..=end]) {
                if let Some(result) = fields_from(&value) {
                    return Ok(result);
                }
            }
        }
    }

    Err(ParseFailure { cleaned })
}

/// Remove fenced-code artifacts: a wrapping ``` pair, a leftover `json`
/// language tag, and stray fence markers anywhere in the string.
fn strip_fences(raw: &str) -> String {
    let mut text = raw.trim();
    if text.len() >= 6 && text.starts_with("```") && text.ends_with("```") {
        text = text[3..text.len() - 3].trim();
        if let Some(rest) = text.strip_prefix("json") {
            text = rest.trim_start();
        }
    }
    text.replace("```", "").trim().to_string()
}

/// Extract the known fields from a decoded reply. Returns `None` when the
/// top-level value is not an object — that is a parse failure, while missing
/// individual fields are not.
fn fields_from(value: &Value) -> Option<StructuredResult> {
    let obj = value.as_object()?;

    let summary = obj
        .get("summary")
        .and_then(Value::as_str)
        .unwrap_or(DEFAULT_SUMMARY)
        .to_string();

    // `suggested_folder` is canonical; `folder` is accepted as an alias for
    // replies following the older prompt wording.
    let suggested_folder = obj
        .get("suggested_folder")
        .or_else(|| obj.get("folder"))
        .and_then(Value::as_str)
        .unwrap_or(FALLBACK_FOLDER)
        .to_string();

    let keywords = match obj.get("keywords").and_then(Value::as_array) {
        Some(items) => items
            .iter()
            .map(|v| v.as_str().map(String::from))
            .collect::<Option<Vec<_>>>()
            .unwrap_or_default(),
        None => Vec::new(),
    };

    Some(StructuredResult {
        summary,
        suggested_folder,
        keywords,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bare_json_parses() {
        let result = parse_reply(r#"{"summary":"ok","suggested_folder":"Docs","keywords":["a"]}"#)
            .unwrap();
        assert_eq!(result.summary, "ok");
        assert_eq!(result.suggested_folder, "Docs");
        assert_eq!(result.keywords, vec!["a"]);
    }

    #[test]
    fn fenced_json_parses_same_as_unwrapped() {
        let fenced =
            "```json\n{\"summary\":\"ok\",\"suggested_folder\":\"Docs\",\"keywords\":[\"a\",\"b\"]}\n```";
        let result = parse_reply(fenced).unwrap();
        assert_eq!(
            result,
            StructuredResult {
                summary: "ok".into(),
                suggested_folder: "Docs".into(),
                keywords: vec!["a".into(), "b".into()],
            }
        );
    }

    #[test]
    fn embedded_object_recovered_with_defaults() {
        let reply = r#"Sure! Here you go: {"summary":"x"} Hope that helps."#;
        let result = parse_reply(reply).unwrap();
        assert_eq!(result.summary, "x");
        assert_eq!(result.suggested_folder, FALLBACK_FOLDER);
        assert!(result.keywords.is_empty());
    }

    #[test]
    fn folder_alias_accepted() {
        let result = parse_reply(r#"{"summary":"s","folder":"Invoices"}"#).unwrap();
        assert_eq!(result.suggested_folder, "Invoices");
    }

    #[test]
    fn canonical_key_wins_over_alias() {
        let result =
            parse_reply(r#"{"summary":"s","folder":"Old","suggested_folder":"New"}"#).unwrap();
        assert_eq!(result.suggested_folder, "New");
    }

    #[test]
    fn non_string_keywords_default_to_empty() {
        let result = parse_reply(r#"{"summary":"s","keywords":["a",1]}"#).unwrap();
        assert!(result.keywords.is_empty());
        let result = parse_reply(r#"{"summary":"s","keywords":"a,b"}"#).unwrap();
        assert!(result.keywords.is_empty());
    }

    #[test]
    fn missing_summary_gets_placeholder() {
        let result = parse_reply(r#"{"suggested_folder":"Docs"}"#).unwrap();
        assert_eq!(result.summary, DEFAULT_SUMMARY);
    }

    #[test]
    fn no_braces_at_all_is_failure_with_cleaned_text() {
        let err = parse_reply("```\nError calling Gemini API: quota exceeded\n```").unwrap_err();
        assert_eq!(err.cleaned, "Error calling Gemini API: quota exceeded");
    }

    #[test]
    fn non_object_json_is_failure() {
        assert!(parse_reply("42").is_err());
        assert!(parse_reply(r#"["summary"]"#).is_err());
    }

    #[test]
    fn parse_is_idempotent_on_serialized_results() {
        let original = StructuredResult {
            summary: "quarterly report".into(),
            suggested_folder: "Finance".into(),
            keywords: vec!["q3".into(), "revenue".into()],
        };
        let serialized = serde_json::to_string(&original).unwrap();
        assert_eq!(parse_reply(&serialized).unwrap(), original);
    }

    #[test]
    fn stray_fence_markers_are_stripped() {
        let reply = "```{\"summary\":\"s\"}\nextra ``` noise";
        let result = parse_reply(reply).unwrap();
        assert_eq!(result.summary, "s");
    }
}
