//! Define error types for harness generation.
//!
//! These errors are raised *before* any harness runs: a descriptor the target cannot express, a missing oracle or
//! raw code that does not tokenize. Messages name the construct and the language so the test author knows what to
//! change.

use framejudge_core::lang::languages::LanguageId;
use miette::Diagnostic;
use thiserror::Error;

use crate::descriptor::validate::DescriptorErrors;

/// Which unit of a context an error refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnitLabel {
    Main,
    Testcase(usize),
}

impl std::fmt::Display for UnitLabel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            UnitLabel::Main => write!(f, "the main invocation"),
            UnitLabel::Testcase(i) => write!(f, "testcase {}", i),
        }
    }
}

/// Error during harness generation.
#[derive(Debug, Error, Diagnostic)]
pub enum GenerationError {
    #[error("invalid descriptor: {0}")]
    #[diagnostic(code(framejudge::generate::descriptor))]
    Descriptor(#[from] DescriptorErrors),

    #[error("{language} does not support {construct}")]
    #[diagnostic(
        code(framejudge::generate::unsupported),
        help("run `framejudge check` to see which languages can run this context")
    )]
    Unsupported { language: LanguageId, construct: &'static str },

    #[error("testcase {testcase} assigns {value} to an integer variable, which {language} declares as a 32-bit int")]
    #[diagnostic(
        code(framejudge::generate::integer_range),
        help("declare the variable as a real, or produce the value with a submission function")
    )]
    IntegerOutOfRange {
        language: LanguageId,
        testcase: usize,
        value: i64,
    },

    #[error("{unit} uses a language-specific oracle without an evaluator for {language}")]
    #[diagnostic(code(framejudge::generate::evaluator))]
    MissingEvaluator { language: LanguageId, unit: UnitLabel },

    #[error("the frame of token `{token}` occurs in the descriptor's own data")]
    #[diagnostic(
        code(framejudge::generate::token_collision),
        help("let the generator allocate a token instead of passing one")
    )]
    TokenCollision { token: String },

    #[error("`{name}` cannot be used as an identifier in {language}")]
    #[diagnostic(code(framejudge::generate::identifier))]
    ReservedIdentifier { language: LanguageId, name: String },

    #[error("{location} for {language} does not tokenize: {message}")]
    #[diagnostic(code(framejudge::generate::raw_code))]
    RawCode {
        language: LanguageId,
        location: &'static str,
        message: String,
    },

    #[error("generated Rust does not parse: {0}")]
    #[diagnostic(code(framejudge::generate::syn))]
    SynParse(String),

    #[error("{0} runs each context as its own program and needs no selector")]
    #[diagnostic(code(framejudge::generate::selector))]
    SelectorNotNeeded(LanguageId),

    #[error("a selector needs at least one context name")]
    #[diagnostic(code(framejudge::generate::selector))]
    EmptySelector,
}
