#![forbid(unsafe_code)]
//! framejudge: separator-framed test harnesses for a grading judge
//!
//! A judge runs many testcases of one context inside a single process. This crate generates, for each supported
//! target language, the harness program that runs them and frames everything the testcases write, then takes the
//! sink histories of a finished (or killed) run apart again unit by unit.
//!
//! - [`descriptor`] - the language-agnostic context description and its validation
//! - [`token`] - secret token allocation
//! - [`backend`] - lowering to a harness plan and per-language emission
//! - [`collect`] - splitting sink histories back into per-unit records
//! - [`cli`] - the `framejudge` command line
//!
//! ## Panic Policy
//!
//! This codebase follows explicit error handling:
//!
//! - **Production code**: Use `Result` or `Option` with `?` / `ok_or` / `map_err`. The `cli` and `backend` modules
//!   enforce `#![deny(clippy::unwrap_used)]`.
//!
//! - **Test code**: `.unwrap()` and `.expect()` are acceptable in tests.
//!
//! - **Generated code**: Harness sources may contain `.unwrap()` or `throw` as *text*. These are output strings, not
//!   calls made by the generator.
//!
//! - **True invariants**: Registry lookups that cannot fail for a valid id use `.expect("... info missing")`.

pub mod backend;
pub mod cli;
pub mod collect;
pub mod descriptor;
pub mod token;

pub use backend::{GeneratedHarness, GenerationError, GeneratorConfig, HarnessGenerator};
pub use collect::{CollectedContext, SinkHistories, collect};
pub use descriptor::Context;
pub use token::TokenAllocator;
