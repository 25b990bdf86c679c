//! Fatal harness errors and helpers to raise recoverable ones.
//!
//! A *recoverable* error is a panic inside a unit: the executor catches it and writes an exception record. Everything
//! in [`HarnessError`] is *fatal*: the harness stops, closes its sinks and the process exits non-zero, which the
//! reading side sees as a truncated history.

use std::io;

use framejudge_core::TokenError;
use framejudge_core::payload::PayloadError;
use thiserror::Error;

use crate::channels::Sink;
use crate::harness::HarnessState;

/// Fatal error of a harness.
#[derive(Debug, Error)]
pub enum HarnessError {
    #[error("failed to write the {sink} sink: {source}")]
    Io {
        sink: Sink,
        #[source]
        source: io::Error,
    },

    #[error("failed to open the {sink} sink at {path}: {source}")]
    Open {
        sink: Sink,
        path: String,
        #[source]
        source: io::Error,
    },

    #[error("cannot {action} while the harness is {from}")]
    InvalidTransition { from: HarnessState, action: &'static str },

    #[error("invalid secret token: {0}")]
    Token(#[from] TokenError),

    #[error("failed to encode a record: {0}")]
    Encode(#[from] PayloadError),
}

impl HarnessError {
    pub(crate) fn io(sink: Sink) -> impl FnOnce(io::Error) -> HarnessError {
        move |source| HarnessError::Io { sink, source }
    }
}

/// Raise a recoverable error of kind `kind` from submission code.
///
/// The panic message uses the canonical `Kind: message` form, which the executor turns back into an exception
/// record with `type` set to `kind`.
#[cold]
#[track_caller]
pub fn raise(kind: &str, message: &str) -> ! {
    panic!("{kind}: {message}");
}
