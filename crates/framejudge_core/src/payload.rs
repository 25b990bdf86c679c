//! The record envelope of the value and exception sinks.
//!
//! Every non-empty record between two frames is exactly one JSON object carrying a `version` and a `kind`. An empty
//! record means "no value" (value sink) or "no exception" (exception sink).
//!
//! ```json
//! {"version":1,"kind":"value","data":2}
//! {"version":1,"kind":"exception","type":"ZeroDivisionError","message":"division by zero","stacktrace":""}
//! {"version":1,"kind":"evaluated","result":true,"readable_expected":null,"readable_actual":null,"messages":[]}
//! {"version":1,"kind":"unserializable","type_name":"Socket","reason":"not representable"}
//! ```
//!
//! ## Notes
//! - Readers reject any `version` other than [`PAYLOAD_VERSION`].
//! - Language runtimes that cannot serialize a value must still write a well-formed `unserializable` record.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Envelope version written by this crate.
pub const PAYLOAD_VERSION: u32 = 1;

/// Outcome of a language-specific oracle, sent instead of a plain value or exception.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct EvaluationResult {
    pub result: bool,
    #[serde(default)]
    pub readable_expected: Option<String>,
    #[serde(default)]
    pub readable_actual: Option<String>,
    #[serde(default)]
    pub messages: Vec<String>,
}

impl EvaluationResult {
    pub fn new(result: bool) -> Self {
        Self {
            result,
            ..Self::default()
        }
    }

    pub fn with_expected(mut self, expected: impl Into<String>) -> Self {
        self.readable_expected = Some(expected.into());
        self
    }

    pub fn with_actual(mut self, actual: impl Into<String>) -> Self {
        self.readable_actual = Some(actual.into());
        self
    }

    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.messages.push(message.into());
        self
    }
}

/// One decoded record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Payload {
    /// A plain value produced by the builtin serializer.
    Value { data: serde_json::Value },
    /// A recovered runtime error.
    Exception {
        #[serde(rename = "type")]
        type_name: String,
        message: String,
        #[serde(default)]
        stacktrace: String,
    },
    /// The verdict of a language-specific oracle.
    Evaluated(EvaluationResult),
    /// The value existed but could not be serialized.
    Unserializable { type_name: String, reason: String },
}

impl Payload {
    pub fn value(data: serde_json::Value) -> Self {
        Payload::Value { data }
    }

    pub fn exception(type_name: impl Into<String>, message: impl Into<String>) -> Self {
        Payload::Exception {
            type_name: type_name.into(),
            message: message.into(),
            stacktrace: String::new(),
        }
    }

    /// Check whether this record came from a language-specific oracle.
    pub fn is_evaluated(&self) -> bool {
        matches!(self, Payload::Evaluated(_))
    }
}

/// Error raised while encoding or decoding a record.
#[derive(Debug)]
pub enum PayloadError {
    Json(serde_json::Error),
    MissingVersion,
    UnsupportedVersion(u64),
}

impl fmt::Display for PayloadError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PayloadError::Json(e) => write!(f, "malformed record: {}", e),
            PayloadError::MissingVersion => write!(f, "record has no `version` field"),
            PayloadError::UnsupportedVersion(v) => {
                write!(f, "record version {} is not supported (expected {})", v, PAYLOAD_VERSION)
            }
        }
    }
}

impl std::error::Error for PayloadError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            PayloadError::Json(e) => Some(e),
            _ => None,
        }
    }
}

impl From<serde_json::Error> for PayloadError {
    fn from(e: serde_json::Error) -> Self {
        PayloadError::Json(e)
    }
}

/// Encode a record as a single-line JSON envelope.
pub fn encode(payload: &Payload) -> Result<String, PayloadError> {
    let mut object = serde_json::to_value(payload)?;
    if let serde_json::Value::Object(map) = &mut object {
        map.insert("version".to_string(), serde_json::Value::from(PAYLOAD_VERSION));
    }
    Ok(serde_json::to_string(&object)?)
}

/// Decode one record.
///
/// ## Returns
/// - `Ok(None)` for an empty record.
/// - `Ok(Some(payload))` for a well-formed envelope of the supported version.
///
/// ## Examples
/// ```rust
/// use framejudge_core::payload::{decode, Payload};
///
/// assert_eq!(decode("").unwrap(), None);
/// let decoded = decode(r#"{"version":1,"kind":"value","data":2}"#).unwrap();
/// assert_eq!(decoded, Some(Payload::value(serde_json::json!(2))));
/// ```
pub fn decode(record: &str) -> Result<Option<Payload>, PayloadError> {
    if record.trim().is_empty() {
        return Ok(None);
    }
    let value: serde_json::Value = serde_json::from_str(record)?;
    let version = value
        .get("version")
        .and_then(serde_json::Value::as_u64)
        .ok_or(PayloadError::MissingVersion)?;
    if version != u64::from(PAYLOAD_VERSION) {
        return Err(PayloadError::UnsupportedVersion(version));
    }
    Ok(Some(Payload::deserialize(value)?))
}
