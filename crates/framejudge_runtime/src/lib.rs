//! Runtime for framejudge-generated Rust harnesses.
//!
//! A generated Rust harness links against this crate and drives one [`ContextHarness`] from construction to close.
//! The crate provides the four-sink [`ChannelSet`], the [`SeparatorEmitter`], the statement executor
//! ([`ContextHarness::execute_main`] / [`ContextHarness::execute_testcase`]) and the record envelope shared with the
//! reading side.
//!
//! Panics raised by submission code are the recoverable errors of this runtime: they are caught at the unit boundary
//! and written to the exception sink. Sink I/O failures are fatal and surface as [`HarnessError`].

#![deny(clippy::unwrap_used)]

pub mod channels;
pub mod errors;
pub mod executor;
pub mod harness;
pub mod prelude;
pub mod separator;

pub use channels::{ChannelSet, MemorySink, Sink};
pub use errors::{HarnessError, raise};
pub use executor::{CaughtException, ExceptionStatement, Outcome};
pub use framejudge_core::payload::{EvaluationResult, Payload};
pub use harness::{ContextHarness, HarnessState};
pub use separator::SeparatorEmitter;
