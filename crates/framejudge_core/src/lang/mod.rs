//! Target-language vocabulary registries.
//!
//! Callers work with **stable IDs** ([`LanguageId`](languages::LanguageId), [`ConstructId`](constructs::ConstructId))
//! and look up spellings and metadata via registry tables instead of comparing strings.
//!
//! ## Notes
//! - Registries are **pure**: no descriptor types, no IO.
//! - Emitters decide *how* to write code; the registry only says *what* a language supports and how its names are
//!   spelled.
//!
//! ## Examples
//! ```rust
//! use framejudge_core::lang::languages::{self, LanguageId};
//!
//! assert_eq!(languages::from_str("py"), Some(LanguageId::Python));
//! assert_eq!(languages::as_str(LanguageId::Python), "python");
//! ```

pub mod constructs;
pub mod conventions;
pub mod languages;
pub mod registry;
pub mod rust_keywords;
