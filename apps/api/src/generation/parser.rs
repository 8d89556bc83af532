//! Response Parser: turns raw completion text into the four STAR fields.
//!
//! The provider's output is prose-shaped and not schema-enforced, so parsing degrades through
//! three strategies, first success wins:
//! 1. strict JSON object with all four fields non-empty
//! 2. per-field `"name": "value"` extraction, all four or nothing
//! 3. positional slicing into fixed 100-character windows (never fails)
//!
//! Only the positional result is considered degraded; callers surface the raw text with it.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, warn};

/// Width of each positional window, in characters.
const POSITIONAL_WINDOW: usize = 100;

const FIELD_NAMES: [&str; 4] = ["situation", "task", "action", "result"];

static FIELD_PATTERNS: Lazy<[Regex; 4]> = Lazy::new(|| {
    FIELD_NAMES.map(|name| {
        Regex::new(&format!(r#"(?s)"{name}"\s*:\s*"((?:[^"\\]|\\.)*)""#))
            .unwrap_or_else(|e| panic!("invalid field pattern for {name}: {e}"))
    })
});

/// The four STAR sections.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StarFields {
    pub situation: String,
    pub task: String,
    pub action: String,
    pub result: String,
}

impl StarFields {
    fn from_array([situation, task, action, result]: [String; 4]) -> Self {
        Self {
            situation,
            task,
            action,
            result,
        }
    }
}

/// Which strategy produced a parse.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ParseStrategy {
    StrictJson,
    RegexExtraction,
    Positional,
}

impl ParseStrategy {
    /// True when field boundaries are unverified.
    pub fn is_degraded(&self) -> bool {
        matches!(self, ParseStrategy::Positional)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedResponse {
    pub fields: StarFields,
    pub strategy: ParseStrategy,
}

/// Parses raw completion text. Infallible: the positional strategy always produces a result.
pub fn parse_star_response(raw: &str) -> ParsedResponse {
    if let Some(fields) = parse_strict_json(raw) {
        debug!("STAR response parsed as strict JSON");
        return ParsedResponse {
            fields,
            strategy: ParseStrategy::StrictJson,
        };
    }

    if let Some(fields) = extract_fields(raw) {
        debug!("STAR response parsed by field extraction");
        return ParsedResponse {
            fields,
            strategy: ParseStrategy::RegexExtraction,
        };
    }

    warn!(
        "STAR response had no recognizable field structure ({} chars); using positional fallback",
        raw.chars().count()
    );
    ParsedResponse {
        fields: slice_positional(raw),
        strategy: ParseStrategy::Positional,
    }
}

/// Strategy 1: a single flat JSON object with all four fields as non-empty strings.
fn parse_strict_json(raw: &str) -> Option<StarFields> {
    let value: Value = serde_json::from_str(strip_json_fences(raw)).ok()?;
    let object = value.as_object()?;

    let mut fields: [String; 4] = Default::default();
    for (slot, name) in fields.iter_mut().zip(FIELD_NAMES) {
        let text = object.get(name)?.as_str()?;
        if text.is_empty() {
            return None;
        }
        *slot = text.to_string();
    }
    Some(StarFields::from_array(fields))
}

/// Strategy 2: locate each `"field": "value"` pair independently. Partial matches fail.
fn extract_fields(raw: &str) -> Option<StarFields> {
    let mut fields: [String; 4] = Default::default();
    for (slot, pattern) in fields.iter_mut().zip(FIELD_PATTERNS.iter()) {
        let captured = pattern.captures(raw)?.get(1)?.as_str();
        if captured.is_empty() {
            return None;
        }
        *slot = unescape_json_string(captured);
    }
    Some(StarFields::from_array(fields))
}

/// Decodes JSON string escapes. Falls back to the captured text when it is not valid JSON
/// string content (e.g. contains raw control characters).
fn unescape_json_string(captured: &str) -> String {
    serde_json::from_str::<String>(&format!("\"{captured}\"")).unwrap_or_else(|_| captured.to_string())
}

/// Strategy 3: fixed character windows [0,100), [100,200), [200,300), [300,400).
fn slice_positional(raw: &str) -> StarFields {
    let window = |index: usize| -> String {
        raw.chars()
            .skip(index * POSITIONAL_WINDOW)
            .take(POSITIONAL_WINDOW)
            .collect()
    };
    StarFields::from_array([window(0), window(1), window(2), window(3)])
}

/// Strips ```json ... ``` or ``` ... ``` code fences from LLM output.
fn strip_json_fences(text: &str) -> &str {
    let text = text.trim();
    if let Some(stripped) = text.strip_prefix("```json") {
        stripped
            .trim_start()
            .strip_suffix("```")
            .map(|s| s.trim())
            .unwrap_or(stripped.trim_start())
    } else if let Some(stripped) = text.strip_prefix("```") {
        stripped
            .trim_start()
            .strip_suffix("```")
            .map(|s| s.trim())
            .unwrap_or(stripped.trim_start())
    } else {
        text
    }
}
