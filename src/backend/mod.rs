//! Harness generation backend
//!
//! This module turns a validated context descriptor into the source of one harness program.
//!
//! The pipeline is:
//! 1. Descriptor → [`HarnessPlan`](plan::HarnessPlan): separator placement and variable declarations, decided once
//! 2. Plan → per-language [`HarnessEmitter`](emit::HarnessEmitter) → harness source
//! 3. For Java, Kotlin and C#: context names → selector program
//!
//! ## Module Organization
//!
//! - `config.rs` - Names and layout options
//! - `plan.rs` - Language-independent lowering
//! - `emit/` - One emitter per target language plus shared expression and unit spelling
//! - `writer.rs` - Indentation-aware source builder used by the text emitters
//! - `generator.rs` - Validation, capability and token checks, then emission
//! - `selector.rs` - Selector programs
//! - `errors.rs` - Generation errors

// Enforce explicit error handling - no panicking in production code
#![deny(clippy::unwrap_used)]

pub mod config;
pub mod emit;
pub mod errors;
pub mod generator;
pub mod plan;
pub mod selector;
pub mod writer;

pub use config::GeneratorConfig;
pub use errors::GenerationError;
pub use generator::{GeneratedHarness, HarnessGenerator, generate_with_token};
pub use selector::{GeneratedSelector, generate_selector};
