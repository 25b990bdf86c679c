//! Prelude for generated harnesses.
//!
//! ```ignore
//! use framejudge_runtime::prelude::*;
//! ```

pub use crate::channels::ChannelSet;
pub use crate::errors::{HarnessError, raise};
pub use crate::executor::{CaughtException, ExceptionStatement, Outcome};
pub use crate::harness::ContextHarness;
pub use framejudge_core::payload::EvaluationResult;
