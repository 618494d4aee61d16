//! Response normalization — every transport outcome collapses into one of
//! three shapes so callers never see a raised fault or a half-parsed body.

use serde_json::Value;

// ---------------------------------------------------------------------------
// NormalizedResult
// ---------------------------------------------------------------------------

/// The uniform outcome of every relay call. Exactly one variant holds:
///
/// - `Structured` — the body parsed as JSON; carried as-is, whatever it
///   decoded to (object, array, or primitive).
/// - `Opaque` — the body was not valid JSON; the original text is preserved
///   verbatim, not truncated or escaped further.
/// - `Errored` — the request itself failed (connect, timeout, body read).
///
/// Immutable once produced; this is the only value that crosses the
/// transport boundary.
#[derive(Debug, Clone, PartialEq)]
pub enum NormalizedResult {
    Structured(Value),
    Opaque { raw: String },
    Errored { error: String },
}

impl NormalizedResult {
    /// Wrap a transport-failure description.
    pub fn errored(description: impl Into<String>) -> Self {
        NormalizedResult::Errored {
            error: description.into(),
        }
    }

    /// Whether the sink region recording this result should be flagged as an
    /// error. True for transport failures, and for structured bodies whose
    /// `error` field is truthy. Opaque text is never an error: a decode
    /// failure is a normal outcome, not an error path.
    pub fn is_error(&self) -> bool {
        match self {
            NormalizedResult::Errored { .. } => true,
            NormalizedResult::Structured(value) => {
                value.get("error").map(is_truthy).unwrap_or(false)
            }
            NormalizedResult::Opaque { .. } => false,
        }
    }

    /// Look up a named field. Only structured object results have fields;
    /// opaque and errored results naturally have none, which is what keeps
    /// secondary rendering from firing on them.
    pub fn field(&self, name: &str) -> Option<&Value> {
        match self {
            NormalizedResult::Structured(value) => value.get(name),
            _ => None,
        }
    }

    /// The displayable JSON form: the parsed value itself, or the
    /// `{"raw": ...}` / `{"error": ...}` wrapper.
    pub fn as_value(&self) -> Value {
        match self {
            NormalizedResult::Structured(value) => value.clone(),
            NormalizedResult::Opaque { raw } => serde_json::json!({ "raw": raw }),
            NormalizedResult::Errored { error } => serde_json::json!({ "error": error }),
        }
    }

    /// Pretty-printed form of [`as_value`](Self::as_value).
    pub fn to_pretty(&self) -> String {
        serde_json::to_string_pretty(&self.as_value()).unwrap_or_default()
    }
}

// ---------------------------------------------------------------------------
// normalize
// ---------------------------------------------------------------------------

/// Classify a raw body as structured data or opaque text.
///
/// Pure function: parse failure is a normal outcome, never a fault, and the
/// same input always yields the same result.
pub fn normalize(text: &str) -> NormalizedResult {
    match serde_json::from_str::<Value>(text) {
        Ok(value) => NormalizedResult::Structured(value),
        Err(_) => NormalizedResult::Opaque {
            raw: text.to_string(),
        },
    }
}

/// Truthiness of a JSON value, matching the relay's envelope convention:
/// a non-empty string, non-zero number, `true`, or any array/object counts
/// as a set `error` field.
fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().map(|f| f != 0.0).unwrap_or(true),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
