use std::sync::LazyLock;

use regex::Regex;
use serde_json::Value;

static SPAN_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"<span class="highlight">(.*?)</span>"#).unwrap());
static SPACES_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s+").unwrap());

/// Strip highlight spans, keeping their inner text, then collapse every
/// whitespace run to a single space.
fn clean_text(text: &str) -> String {
    let without_spans = SPAN_RE.replace_all(text, "$1");
    SPACES_RE.replace_all(&without_spans, " ").into_owned()
}

/// Recursively clean every string leaf of a JSON value. Object keys, array
/// order and non-string scalars pass through; the input is not mutated.
pub fn clean_value(value: &Value) -> Value {
    match value {
        Value::Object(map) => Value::Object(
            map.iter()
                .map(|(key, val)| (key.clone(), clean_value(val)))
                .collect(),
        ),
        Value::Array(items) => Value::Array(items.iter().map(clean_value).collect()),
        Value::String(text) => Value::String(clean_text(text)),
        other => other.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn strips_single_span() {
        assert_eq!(
            clean_text(r#"a <span class="highlight">rocket</span> engine"#),
            "a rocket engine"
        );
    }

    #[test]
    fn strips_multiple_spans_non_greedy() {
        let text = r#"<span class="highlight">one</span> and <span class="highlight">two</span>"#;
        assert_eq!(clean_text(text), "one and two");
    }

    #[test]
    fn collapses_whitespace_runs() {
        assert_eq!(clean_text("a  b\t\tc\n\nd"), "a b c d");
    }

    #[test]
    fn idempotent_after_first_pass() {
        let once = clean_text(r#"x <span class="highlight">y</span>   z"#);
        assert_eq!(clean_text(&once), once);
    }

    #[test]
    fn preserves_structure() {
        let input = json!({
            "name": "  Engine   Sim  ",
            "tags": ["a  b", "c", null],
            "meta": {"count": 3, "active": true}
        });
        let cleaned = clean_value(&input);

        let obj = cleaned.as_object().unwrap();
        assert_eq!(obj.len(), input.as_object().unwrap().len());
        assert_eq!(cleaned["tags"].as_array().unwrap().len(), 3);
        assert_eq!(cleaned["name"], " Engine Sim ");
        assert_eq!(cleaned["tags"][0], "a b");
        assert_eq!(cleaned["meta"]["count"], 3);
        assert_eq!(cleaned["meta"]["active"], true);
    }

    #[test]
    fn non_string_scalars_unchanged() {
        for value in [json!(null), json!(42), json!(1.5), json!(false)] {
            assert_eq!(clean_value(&value), value);
        }
    }

    #[test]
    fn input_not_mutated() {
        let input = json!(["a  b"]);
        let _ = clean_value(&input);
        assert_eq!(input[0], "a  b");
    }

    #[test]
    fn cleans_nested_records() {
        let input = json!([[
            "id-1",
            r#"the <span class="highlight">engine</span>  suite"#
        ]]);
        let cleaned = clean_value(&input);
        assert_eq!(cleaned[0][1], "the engine suite");
    }
}
