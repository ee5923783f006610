//! Response Extractor: recovers a JSON object from a raw model reply.
//!
//! Strategies, in order:
//! 1. parse the whole reply (valid JSON that is not an object is rejected here);
//! 2. strip markdown code fences (```` ``` ```` with an optional language tag);
//! 3. take the text from the first `{` to the last `}` and parse it;
//! 4. last resort, [`repair_control_chars`]: escape raw control characters inside string
//!    literals and parse again.
//!
//! Nothing beyond these recoveries is attempted; anything else is an error.

use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::{Map, Value};

/// Matches an opening or closing code fence, including an optional language tag.
static FENCE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"```[A-Za-z0-9_+.-]*").expect("fence regex is valid"));

#[derive(Debug, thiserror::Error)]
pub enum ExtractError {
    #[error("no JSON object found")]
    NoJsonObject,
    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),
}

/// Extraction settings. The control-character repair pass can be turned off.
#[derive(Clone, Copy, Debug)]
pub struct Extractor {
    pub repair_control_chars: bool,
}

impl Default for Extractor {
    fn default() -> Self {
        Self {
            repair_control_chars: true,
        }
    }
}

impl Extractor {
    pub fn without_repair() -> Self {
        Self {
            repair_control_chars: false,
        }
    }

    pub fn extract(&self, raw: &str) -> Result<Map<String, Value>, ExtractError> {
        match serde_json::from_str::<Value>(raw) {
            Ok(Value::Object(map)) => return Ok(map),
            Ok(_) => return Err(ExtractError::NoJsonObject),
            Err(_) => {}
        }

        let cleaned = strip_fences(raw);
        let candidate = object_candidate(&cleaned).ok_or(ExtractError::NoJsonObject)?;

        let first_err = match parse_object(candidate) {
            Ok(map) => return Ok(map),
            Err(e) => e,
        };
        if !self.repair_control_chars {
            return Err(first_err);
        }

        let repaired = repair_control_chars(candidate);
        tracing::debug!("reply needed control-character repair");
        parse_object(&repaired)
    }
}

/// Extracts with default settings (repair enabled).
pub fn extract_json(raw: &str) -> Result<Map<String, Value>, ExtractError> {
    Extractor::default().extract(raw)
}

fn parse_object(s: &str) -> Result<Map<String, Value>, ExtractError> {
    match serde_json::from_str::<Value>(s)? {
        Value::Object(map) => Ok(map),
        _ => Err(ExtractError::NoJsonObject),
    }
}

/// Removes every code-fence marker and trims the result.
pub fn strip_fences(raw: &str) -> String {
    FENCE.replace_all(raw, "").trim().to_string()
}

/// Slice from the first `{` to the last `}` inclusive.
fn object_candidate(s: &str) -> Option<&str> {
    let start = s.find('{')?;
    let end = s.rfind('}')?;
    if end < start {
        return None;
    }
    Some(&s[start..=end])
}

/// Escapes control characters that appear inside JSON string literals.
///
/// Models sometimes emit a real line break inside a string value instead of `\n`. Newline,
/// carriage return and tab get their short escapes; other control characters become
/// `\u00XX`. Whitespace between tokens is left alone, so pretty-printed objects survive.
pub fn repair_control_chars(candidate: &str) -> String {
    let mut out = String::with_capacity(candidate.len() + 16);
    let mut in_string = false;
    let mut escaped = false;
    for c in candidate.chars() {
        if !in_string {
            if c == '"' {
                in_string = true;
            }
            out.push(c);
            continue;
        }
        if escaped {
            escaped = false;
            out.push(c);
            continue;
        }
        match c {
            '\\' => {
                escaped = true;
                out.push(c);
            }
            '"' => {
                in_string = false;
                out.push(c);
            }
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            c if (c as u32) < 0x20 => out.push_str(&format!("\\u{:04x}", c as u32)),
            c => out.push(c),
        }
    }
    out
}
