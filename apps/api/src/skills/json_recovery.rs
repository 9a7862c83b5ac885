//! Recovers a JSON object or array from free-text model output.
//!
//! Hosted models wrap valid JSON in prose, code fences, or both. `recover_json`
//! tries progressively looser readings and returns the first structured value it
//! can parse. It never fails: `None` means "no structured data found".

use serde_json::Value;

/// Attempts, in order: direct parse, fence-stripped parse, outermost `{..}`,
/// outermost `[..]`. Only objects and arrays count as structured data.
pub fn recover_json(text: &str) -> Option<Value> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return None;
    }

    parse_structured(trimmed)
        .or_else(|| strip_code_fences(trimmed).and_then(parse_structured))
        .or_else(|| delimited(trimmed, '{', '}').and_then(parse_structured))
        .or_else(|| delimited(trimmed, '[', ']').and_then(parse_structured))
}

/// Reads a list of skill-name strings out of a recovered value.
///
/// Accepts a bare array, or an object wrapping the array under one of the keys
/// models commonly invent. Non-string elements are skipped.
pub fn string_list(value: &Value) -> Option<Vec<String>> {
    let items = match value {
        Value::Array(items) => items,
        Value::Object(map) => ["skills", "recommended_skills", "recommendations"]
            .iter()
            .find_map(|key| map.get(*key).and_then(Value::as_array))?,
        _ => return None,
    };

    Some(
        items
            .iter()
            .filter_map(Value::as_str)
            .map(str::to_string)
            .collect(),
    )
}

fn parse_structured(candidate: &str) -> Option<Value> {
    match serde_json::from_str::<Value>(candidate.trim()) {
        Ok(value @ (Value::Object(_) | Value::Array(_))) => Some(value),
        _ => None,
    }
}

/// Returns the body of the first ``` fence, minus an optional language tag.
/// An unterminated fence (truncated output) yields everything after the opener.
fn strip_code_fences(text: &str) -> Option<&str> {
    let start = text.find("```")?;
    let after_open = &text[start + 3..];
    let tag_len = after_open
        .find(|c: char| !(c.is_ascii_alphanumeric() || c == '_' || c == '-'))
        .unwrap_or(after_open.len());
    let body = &after_open[tag_len..];
    let body = match body.find("```") {
        Some(end) => &body[..end],
        None => body,
    };
    Some(body.trim())
}

fn delimited(text: &str, open: char, close: char) -> Option<&str> {
    let start = text.find(open)?;
    let end = text.rfind(close)?;
    (start < end).then(|| &text[start..=end])
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_direct_array() {
        assert_eq!(
            recover_json(r#"["Python", "SQL"]"#),
            Some(json!(["Python", "SQL"]))
        );
    }

    #[test]
    fn test_array_embedded_in_prose() {
        let input = "Sure! [\"Python\", \"SQL\"] done";
        assert_eq!(recover_json(input), Some(json!(["Python", "SQL"])));
    }

    #[test]
    fn test_json_fence_with_language_tag() {
        let input = "```json\n{\"roadmap\": {}}\n```";
        assert_eq!(recover_json(input), Some(json!({"roadmap": {}})));
    }

    #[test]
    fn test_fence_without_tag_and_preamble() {
        let input = "Here you go:\n```\n[\"Docker\"]\n```\nLet me know!";
        assert_eq!(recover_json(input), Some(json!(["Docker"])));
    }

    #[test]
    fn test_object_inside_prose_wins_over_inner_array() {
        let input = "Result: {\"skills\": [\"Go\", \"gRPC\"]} hope this helps";
        assert_eq!(
            recover_json(input),
            Some(json!({"skills": ["Go", "gRPC"]}))
        );
    }

    #[test]
    fn test_truncated_object_falls_back_to_array() {
        // Object never closes, but a complete array sits inside it.
        let input = "{\"skills\": [\"Kafka\", \"Flink\"] and then the model stopped";
        assert_eq!(recover_json(input), Some(json!(["Kafka", "Flink"])));
    }

    #[test]
    fn test_no_delimiters_is_none() {
        assert!(recover_json("Python, SQL, Docker").is_none());
    }

    #[test]
    fn test_reversed_delimiters_is_none() {
        assert!(recover_json("} nothing here {").is_none());
        assert!(recover_json("] nope [").is_none());
    }

    #[test]
    fn test_empty_and_whitespace_is_none() {
        assert!(recover_json("").is_none());
        assert!(recover_json("   \n\t").is_none());
    }

    #[test]
    fn test_scalars_are_not_structured() {
        assert!(recover_json("42").is_none());
        assert!(recover_json("\"just a string\"").is_none());
        assert!(recover_json("true").is_none());
    }

    #[test]
    fn test_malformed_everything_is_none() {
        assert!(recover_json("{not json} and [also, not json]").is_none());
    }

    #[test]
    fn test_string_list_from_array_skips_non_strings() {
        let value = json!(["Rust", 3, null, "Tokio"]);
        assert_eq!(
            string_list(&value),
            Some(vec!["Rust".to_string(), "Tokio".to_string()])
        );
    }

    #[test]
    fn test_string_list_from_wrapped_object() {
        let value = json!({"recommended_skills": ["Terraform"]});
        assert_eq!(string_list(&value), Some(vec!["Terraform".to_string()]));
    }

    #[test]
    fn test_string_list_rejects_other_shapes() {
        assert!(string_list(&json!({"roadmap": {}})).is_none());
        assert!(string_list(&json!("Rust")).is_none());
    }
}
