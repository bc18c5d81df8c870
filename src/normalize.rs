//! Response normalization: extract one plain-text answer from whatever
//! shape a backend model returned.
//!
//! Different model families wrap their output differently (`generation`,
//! `outputs[0]`, `choices[0]`, bare wrappers). The known shapes live in an
//! ordered probe list; the first match wins, and a payload matching none of
//! them degrades to its own re-serialization rather than being dropped.

use serde_json::Value;

/// Literal delimiter tokens some models echo back around their answer.
const CONTROL_TOKENS: &[&str] = &["[INST]", "[/INST]", "<s>", "</s>"];

/// A leftover open-instruction tag after token removal means the model
/// started a second, incomplete instruction block.
const DANGLING_OPEN: &str = "[INST";

/// The known response shapes, in provider-priority order: completion-style
/// models are probed before generic output wrappers. Order is significant.
const PROBES: &[fn(&Value) -> Option<String>] = &[
    probe_generation,
    probe_outputs,
    probe_choices,
    probe_wrappers,
];

/// Extract and clean text from a decoded model response.
///
/// Returns an empty string only when the payload genuinely holds no text —
/// "nothing usable", not an error. No input makes this panic or fail.
pub fn normalize(decoded: &str) -> String {
    let text = match serde_json::from_str::<Value>(decoded) {
        Ok(Value::String(s)) => s,
        Ok(data @ Value::Object(_)) => PROBES
            .iter()
            .find_map(|probe| probe(&data))
            .unwrap_or_else(|| data.to_string()),
        // Valid JSON but neither string nor object: keep it as text.
        Ok(other) => other.to_string(),
        // Not structured data at all. The payload may simply be plain text.
        Err(_) => decoded.to_string(),
    };
    strip_control_tokens(&text)
}

/// `generation` as a string, `generation.text` / `.content` /
/// `.generated_text`, or `generation` as a list whose first element
/// carries `text`.
fn probe_generation(data: &Value) -> Option<String> {
    let generation = data.get("generation")?;
    string_of(generation)
        .or_else(|| {
            ["text", "content", "generated_text"]
                .iter()
                .find_map(|key| generation.get(key).and_then(string_of))
        })
        .or_else(|| first_text(generation))
}

/// `outputs[0].text`, or `outputs[0].content` as a string or a
/// list-with-`text`.
fn probe_outputs(data: &Value) -> Option<String> {
    let first = data.get("outputs")?.get(0)?;
    first
        .get("text")
        .and_then(string_of)
        .or_else(|| {
            let content = first.get("content")?;
            string_of(content).or_else(|| first_text(content))
        })
}

/// `choices[0].text`.
fn probe_choices(data: &Value) -> Option<String> {
    data.get("choices")?.get(0)?.get("text").and_then(string_of)
}

/// Bare wrappers: `result`, `response`, `completion`, `output`, each either
/// a string or a mapping with a `text` field.
fn probe_wrappers(data: &Value) -> Option<String> {
    ["result", "response", "completion", "output"]
        .iter()
        .find_map(|key| {
            let value = data.get(key)?;
            string_of(value).or_else(|| value.get("text").and_then(string_of))
        })
}

fn string_of(value: &Value) -> Option<String> {
    value.as_str().map(str::to_string)
}

/// First element of a list, if it is a mapping with a string `text` field.
fn first_text(value: &Value) -> Option<String> {
    value.get(0)?.get("text").and_then(string_of)
}

/// Remove delimiter tokens, then truncate at any dangling open tag.
fn strip_control_tokens(text: &str) -> String {
    let mut cleaned = text.to_string();
    for token in CONTROL_TOKENS {
        cleaned = cleaned.replace(token, "");
    }
    let mut cleaned = cleaned.trim();
    if let Some(idx) = cleaned.find(DANGLING_OPEN) {
        cleaned = cleaned[..idx].trim_end();
    }
    cleaned.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn norm(value: serde_json::Value) -> String {
        normalize(&value.to_string())
    }

    #[test]
    fn generation_as_string() {
        assert_eq!(norm(json!({"generation": "  hello  "})), "hello");
    }

    #[test]
    fn generation_text() {
        assert_eq!(norm(json!({"generation": {"text": "hello"}})), "hello");
    }

    #[test]
    fn generation_content() {
        assert_eq!(norm(json!({"generation": {"content": "hello"}})), "hello");
    }

    #[test]
    fn generation_generated_text() {
        assert_eq!(
            norm(json!({"generation": {"generated_text": "hello"}})),
            "hello"
        );
    }

    #[test]
    fn generation_as_list_with_text() {
        assert_eq!(
            norm(json!({"generation": [{"text": "hello"}, {"text": "later"}]})),
            "hello"
        );
    }

    #[test]
    fn outputs_first_text() {
        assert_eq!(norm(json!({"outputs": [{"text": "hello"}]})), "hello");
    }

    #[test]
    fn outputs_first_content_string() {
        assert_eq!(norm(json!({"outputs": [{"content": "hello"}]})), "hello");
    }

    #[test]
    fn outputs_first_content_list() {
        assert_eq!(
            norm(json!({"outputs": [{"content": [{"text": "hello"}]}]})),
            "hello"
        );
    }

    #[test]
    fn choices_first_text() {
        assert_eq!(norm(json!({"choices": [{"text": "hello"}]})), "hello");
    }

    #[test]
    fn bare_wrappers_as_string() {
        for key in ["result", "response", "completion", "output"] {
            assert_eq!(norm(json!({key: "hello"})), "hello", "key: {}", key);
        }
    }

    #[test]
    fn bare_wrappers_as_mapping_with_text() {
        for key in ["result", "response", "completion", "output"] {
            assert_eq!(
                norm(json!({key: {"text": "hello"}})),
                "hello",
                "key: {}",
                key
            );
        }
    }

    #[test]
    fn generation_wins_over_outputs() {
        // Probe order encodes provider priority.
        assert_eq!(
            norm(json!({
                "outputs": [{"text": "second"}],
                "generation": "first",
            })),
            "first"
        );
    }

    #[test]
    fn choices_win_over_wrappers() {
        assert_eq!(
            norm(json!({
                "result": "second",
                "choices": [{"text": "first"}],
            })),
            "first"
        );
    }

    #[test]
    fn json_encoded_string_payload() {
        assert_eq!(normalize("\"  plain answer  \""), "plain answer");
    }

    #[test]
    fn unparsable_payload_returned_as_is() {
        assert_eq!(normalize("not json at all"), "not json at all");
    }

    #[test]
    fn unparsable_payload_still_tag_stripped() {
        assert_eq!(normalize("<s>[INST] hi [/INST] there</s>"), "hi  there");
    }

    #[test]
    fn control_tokens_removed() {
        let out = norm(json!({"generation": "<s>[INST] a [/INST] b </s>"}));
        for token in CONTROL_TOKENS {
            assert!(!out.contains(token), "leftover {:?} in {:?}", token, out);
        }
    }

    #[test]
    fn dangling_open_tag_truncates() {
        assert_eq!(
            norm(json!({"generation": "DevOps is... [INST] ignore"})),
            "DevOps is..."
        );
    }

    #[test]
    fn dangling_partial_open_tag_truncates() {
        assert_eq!(norm(json!({"generation": "real text [INST more"})), "real text");
    }

    #[test]
    fn empty_object_reserializes() {
        assert_eq!(norm(json!({})), "{}");
    }

    #[test]
    fn unknown_shape_reserializes() {
        let out = norm(json!({"unknown_key": 42}));
        assert!(out.contains("unknown_key"));
    }

    #[test]
    fn generation_object_without_text_keys_reserializes() {
        // The shape almost matches; a miss mid-probe is not an error.
        let out = norm(json!({"generation": {"tokens": 12}}));
        assert!(out.contains("tokens"));
    }

    #[test]
    fn non_string_generation_value_skipped() {
        // `generation: 5` matches no probe; whole object re-serializes.
        let out = norm(json!({"generation": 5}));
        assert!(out.contains("generation"));
    }

    #[test]
    fn scalar_payload_reserializes() {
        assert_eq!(normalize("42"), "42");
        assert_eq!(normalize("true"), "true");
    }

    #[test]
    fn empty_string_result_is_empty() {
        assert_eq!(norm(json!({"generation": "   "})), "");
    }

    #[test]
    fn never_panics_on_weird_nesting() {
        assert_eq!(norm(json!({"outputs": "not a list"})), r#"{"outputs":"not a list"}"#);
        assert_eq!(norm(json!({"choices": []})), r#"{"choices":[]}"#);
        assert_eq!(norm(json!({"outputs": [null]})), r#"{"outputs":[null]}"#);
    }
}
