//! The statement executor.
//!
//! One unit is a primary statement plus an exception statement. The primary statement runs under
//! [`std::panic::catch_unwind`]:
//! - on normal completion its [`Outcome`] goes to the value sink and the exception statement runs with no error;
//! - on a panic nothing goes to the value sink and the exception statement runs with the [`CaughtException`].
//!
//! Either way the unit leaves exactly one (possibly empty) record in the value sink and one in the exception sink.
//! Only sink I/O failures escape, as [`HarnessError`].
//!
//! The panic hook is silenced while a unit runs: the default hook prints `thread 'main' panicked at ...` to the
//! process stderr, which is also the stderr sink.

use std::any::Any;
use std::panic::{self, AssertUnwindSafe};

use framejudge_core::payload::{self, EvaluationResult, Payload};
use serde::Serialize;

use crate::channels::{ChannelSet, Sink};
use crate::errors::HarnessError;

/// What a primary statement produced.
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    /// Nothing to report: the value channel is ignored or the statement was an assignment.
    Nothing,
    /// A value for the builtin oracle.
    Value(Payload),
    /// The verdict of a language-specific oracle.
    Evaluated(EvaluationResult),
}

impl Outcome {
    /// Serialize `value` with the builtin serializer.
    ///
    /// A value that cannot be serialized still yields a well-formed `unserializable` record.
    pub fn value<T: Serialize>(value: T) -> Self {
        match serde_json::to_value(&value) {
            Ok(data) => Outcome::Value(Payload::Value { data }),
            Err(e) => Outcome::Value(Payload::Unserializable {
                type_name: std::any::type_name::<T>().to_string(),
                reason: e.to_string(),
            }),
        }
    }

    pub fn evaluated(result: EvaluationResult) -> Self {
        Outcome::Evaluated(result)
    }

    fn into_payload(self) -> Option<Payload> {
        match self {
            Outcome::Nothing => None,
            Outcome::Value(payload) => Some(payload),
            Outcome::Evaluated(result) => Some(Payload::Evaluated(result)),
        }
    }
}

/// A recovered runtime error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CaughtException {
    pub type_name: String,
    pub message: String,
}

impl CaughtException {
    /// Classify a panic payload.
    ///
    /// `Kind: message` panics (see [`crate::raise`]) keep their kind; arithmetic panics of the standard library become
    /// `ZeroDivisionError` or `OverflowError`; anything else is a `panic`.
    pub fn from_panic(payload: &(dyn Any + Send)) -> Self {
        let text = if let Some(s) = payload.downcast_ref::<&str>() {
            (*s).to_string()
        } else if let Some(s) = payload.downcast_ref::<String>() {
            s.clone()
        } else {
            String::from("<non-string panic payload>")
        };
        Self::classify(text)
    }

    fn classify(text: String) -> Self {
        if let Some((kind, message)) = text.split_once(": ") {
            let is_kind = !kind.is_empty()
                && kind.chars().all(|c| c.is_ascii_alphanumeric() || c == '_')
                && kind.chars().next().is_some_and(|c| c.is_ascii_uppercase());
            if is_kind {
                return Self {
                    type_name: kind.to_string(),
                    message: message.to_string(),
                };
            }
        }
        let type_name = if text.contains("divide by zero") || text.contains("divisor of zero") {
            "ZeroDivisionError"
        } else if text.contains("overflow") {
            "OverflowError"
        } else {
            "panic"
        };
        Self {
            type_name: type_name.to_string(),
            message: text,
        }
    }

    pub fn to_payload(&self) -> Payload {
        Payload::exception(self.type_name.clone(), self.message.clone())
    }
}

/// How a unit reports its error (or the absence of one).
pub enum ExceptionStatement<'a> {
    /// Write the exception with the builtin serializer; write nothing when there is none.
    Builtin,
    /// Hand the exception (or `None`) to a language-specific oracle and write its verdict.
    Specific(Box<dyn FnOnce(Option<&CaughtException>) -> EvaluationResult + 'a>),
}

impl<'a> ExceptionStatement<'a> {
    pub fn specific(oracle: impl FnOnce(Option<&CaughtException>) -> EvaluationResult + 'a) -> Self {
        ExceptionStatement::Specific(Box::new(oracle))
    }

    fn report(self, error: Option<&CaughtException>) -> Option<Payload> {
        match self {
            ExceptionStatement::Builtin => error.map(CaughtException::to_payload),
            ExceptionStatement::Specific(oracle) => {
                // An oracle that itself panics is reported as that panic.
                match catch_silently(|| oracle(error)) {
                    Ok(result) => Some(Payload::Evaluated(result)),
                    Err(payload) => Some(CaughtException::from_panic(payload.as_ref()).to_payload()),
                }
            }
        }
    }
}

impl std::fmt::Debug for ExceptionStatement<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ExceptionStatement::Builtin => f.write_str("Builtin"),
            ExceptionStatement::Specific(_) => f.write_str("Specific(..)"),
        }
    }
}

/// Run one unit and write its two records.
///
/// ## Returns
/// - `Ok(Some(exception))` if the primary statement raised a recoverable error.
/// - `Ok(None)` if it completed normally.
/// - `Err(_)` only on sink I/O failure.
pub fn execute_unit<F>(
    channels: &mut ChannelSet,
    statement: F,
    exception: ExceptionStatement<'_>,
) -> Result<Option<CaughtException>, HarnessError>
where
    F: FnOnce() -> Outcome,
{
    let (value, caught) = match catch_silently(statement) {
        Ok(outcome) => (outcome.into_payload(), None),
        Err(payload) => (None, Some(CaughtException::from_panic(payload.as_ref()))),
    };
    if let Some(caught) = &caught {
        tracing::debug!(kind = %caught.type_name, "unit raised a recoverable error");
    }

    write_record(channels, Sink::Value, value.as_ref())?;
    let reported = exception.report(caught.as_ref());
    write_record(channels, Sink::Exception, reported.as_ref())?;
    Ok(caught)
}

/// Run `f` under `catch_unwind` with a panic hook that prints nothing, restoring the previous hook afterwards.
///
/// The hook is process-global; harnesses run their units on one thread.
fn catch_silently<R>(f: impl FnOnce() -> R) -> Result<R, Box<dyn Any + Send>> {
    let previous = panic::take_hook();
    panic::set_hook(Box::new(|_| {}));
    let result = panic::catch_unwind(AssertUnwindSafe(f));
    panic::set_hook(previous);
    result
}

fn write_record(channels: &mut ChannelSet, sink: Sink, record: Option<&Payload>) -> Result<(), HarnessError> {
    if let Some(record) = record {
        let encoded = payload::encode(record)?;
        channels.write(sink, encoded.as_bytes())?;
    }
    channels.flush(sink)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_kind_prefix() {
        let caught = CaughtException::classify("ValueError: bad input".to_string());
        assert_eq!(caught.type_name, "ValueError");
        assert_eq!(caught.message, "bad input");
    }

    #[test]
    fn test_classify_division() {
        let caught = CaughtException::classify("attempt to divide by zero".to_string());
        assert_eq!(caught.type_name, "ZeroDivisionError");
    }

    #[test]
    fn test_classify_sentence_with_colon_is_plain_panic() {
        let caught = CaughtException::classify("index out of bounds: the len is 0 but the index is 3".to_string());
        assert_eq!(caught.type_name, "panic");
    }

    #[test]
    fn test_unserializable_value_is_well_formed() {
        use std::collections::HashMap;
        // JSON object keys must be strings.
        let mut map = HashMap::new();
        map.insert(vec![1u8], 2);
        match Outcome::value(map) {
            Outcome::Value(Payload::Unserializable { type_name, .. }) => assert!(type_name.contains("HashMap")),
            other => panic!("expected unserializable, got {other:?}"),
        }
    }

    #[test]
    fn test_success_writes_value_and_empty_exception() {
        let (mut channels, sinks) = ChannelSet::in_memory();
        let caught = execute_unit(&mut channels, || Outcome::value(2), ExceptionStatement::Builtin).unwrap();
        assert!(caught.is_none());
        assert_eq!(payload::decode(&sinks[0].contents()).unwrap(), Some(Payload::value(serde_json::json!(2))));
        assert_eq!(sinks[1].contents(), "");
    }

    #[test]
    fn test_specific_exception_statement_sees_none_on_success() {
        let (mut channels, sinks) = ChannelSet::in_memory();
        let statement = ExceptionStatement::specific(|error| EvaluationResult::new(error.is_none()));
        execute_unit(&mut channels, || Outcome::Nothing, statement).unwrap();
        let record = payload::decode(&sinks[1].contents()).unwrap().unwrap();
        assert_eq!(record, Payload::Evaluated(EvaluationResult::new(true)));
    }
}
