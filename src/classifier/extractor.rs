//! Recovery of the label record from raw model output.
//!
//! Local models wrap their answer in prose, emit reasoning blocks, repeat
//! partial JSON, or answer with a list where a scalar was asked for.
//! Extraction accepts all of that and still returns the same result for
//! the same text: the first usable JSON object wins.

use crate::labels::{Emotion, LabelResult, Language};
use lazy_static::lazy_static;
use regex::Regex;
use serde_json::{Map, Value};
use tracing::debug;

lazy_static! {
    // Reasoning trace emitted before the answer, e.g. `<think>...</think>`.
    static ref REASONING_BLOCK: Regex = Regex::new(r"(?is)<think>.*?</think>").expect("Invalid reasoning block regex");

    // Markdown fences, optionally language-tagged.
    static ref CODE_FENCE: Regex = Regex::new(r"```[A-Za-z0-9_+-]*").expect("Invalid code fence regex");

    // Single-level JSON object. Nested objects are not supported: the
    // innermost braces form the candidate.
    static ref FLAT_OBJECT: Regex = Regex::new(r"\{[^{}]*\}").expect("Invalid candidate regex");
}

/// Extracts `{language, emotion}` from `raw`.
///
/// Total: any input, including empty or binary garbage, yields a result.
/// Falls back to `Unknown` for both fields when no candidate object has
/// both keys.
pub fn extract_labels(raw: &str) -> LabelResult {
    let without_reasoning = REASONING_BLOCK.replace_all(raw, "");
    let cleaned = CODE_FENCE.replace_all(&without_reasoning, "");

    for candidate in FLAT_OBJECT.find_iter(cleaned.trim()) {
        let object: Map<String, Value> = match serde_json::from_str(candidate.as_str()) {
            Ok(object) => object,
            Err(e) => {
                debug!("Skipping unparseable candidate {:?}: {}", candidate.as_str(), e);
                continue;
            }
        };

        if let (Some(language), Some(emotion)) = (object.get("language"), object.get("emotion")) {
            return LabelResult::new(language_from(language), emotion_from(emotion));
        }
    }

    LabelResult::unknown()
}

fn language_from(value: &Value) -> Language {
    match value {
        Value::String(s) => Language::from_label(s),
        _ => Language::Unknown,
    }
}

/// A list collapses to its first element.
fn emotion_from(value: &Value) -> Emotion {
    match value {
        Value::String(s) => Emotion::from_label(s),
        Value::Array(items) => match items.first() {
            Some(Value::String(s)) => Emotion::from_label(s),
            _ => Emotion::Unknown,
        },
        _ => Emotion::Unknown,
    }
}
