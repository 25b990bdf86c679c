//! Per-language harness emitters.
//!
//! A [`HarnessPlan`] fixes *what* a harness does and in which order; an emitter decides how that order is spelled
//! in one target language. [`drive`] walks the plan and calls the emitter once per step, so separator placement can
//! never differ between languages.
//!
//! ## Emitters
//! - Text emitters ([`python`], [`java`], [`kotlin`], [`csharp`], [`javascript`], [`c`], [`haskell`]) write through a
//!   [`SourceWriter`](super::writer::SourceWriter).
//! - The [`rust`] emitter builds a token tree with `quote` and pretty-prints it with `prettyplease`.

pub mod c;
pub mod csharp;
pub mod expr;
pub mod haskell;
pub mod java;
pub mod javascript;
pub mod kotlin;
pub mod python;
pub mod rust;
pub mod strings;
pub mod unit;

use framejudge_core::lang::languages::{self, LanguageId};

use super::config::GeneratorConfig;
use super::errors::GenerationError;
use super::plan::{HarnessPlan, Step, TestcaseUnit};
use crate::descriptor::MainInvocation;

/// Names an emitter needs besides the plan.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HarnessNames {
    /// Conventionalized context name (class, function or file stem).
    pub context: String,
    /// Conventionalized submission name (module or class).
    pub submission: String,
    pub token: String,
    /// The frame every separator writes.
    pub frame: String,
    pub value_path: String,
    pub exception_path: String,
    pub indent_width: usize,
}

impl HarnessNames {
    /// Derive the names for `language` from `config` and `token`.
    pub fn new(language: LanguageId, token: &str, config: &GeneratorConfig) -> Self {
        let naming = languages::info_for(language).naming;
        let submission = match language {
            LanguageId::Java | LanguageId::Kotlin | LanguageId::CSharp => naming.class.apply(&config.submission_name),
            _ => naming.module.apply(&config.submission_name),
        };
        Self {
            context: naming.module.apply(&config.context_name),
            submission,
            token: token.to_string(),
            frame: framejudge_core::frame(token),
            value_path: config.sink_path(&framejudge_core::framing::value_file_name(token)),
            exception_path: config.sink_path(&framejudge_core::framing::exception_file_name(token)),
            indent_width: config.indent_width,
        }
    }
}

/// Writes one harness, step by step.
///
/// Calls arrive in plan order: `prologue`, then one call per [`Step`], then `finish`.
pub trait HarnessEmitter {
    /// Everything before the before-code: imports, sink setup, helpers.
    fn prologue(&mut self, plan: &HarnessPlan<'_>) -> Result<(), GenerationError>;

    fn before(&mut self, code: &str) -> Result<(), GenerationError>;

    /// Write the frame to the four sinks, flushing after each.
    fn separator(&mut self) -> Result<(), GenerationError>;

    fn main_unit(&mut self, main: &MainInvocation) -> Result<(), GenerationError>;

    fn testcase(&mut self, unit: &TestcaseUnit<'_>) -> Result<(), GenerationError>;

    fn after(&mut self, code: &str) -> Result<(), GenerationError>;

    /// Close the sinks and return the finished source.
    fn finish(self: Box<Self>) -> Result<String, GenerationError>;
}

/// Walk `plan` through `emitter`.
pub fn drive(plan: &HarnessPlan<'_>, mut emitter: Box<dyn HarnessEmitter>) -> Result<String, GenerationError> {
    emitter.prologue(plan)?;
    for step in &plan.steps {
        match step {
            Step::Before(code) => emitter.before(code)?,
            Step::Separator => emitter.separator()?,
            Step::Main(main) => emitter.main_unit(main)?,
            Step::Testcase(unit) => emitter.testcase(unit)?,
            Step::After(code) => emitter.after(code)?,
        }
    }
    emitter.finish()
}

/// The emitter for `language`.
pub fn emitter_for(language: LanguageId, names: HarnessNames) -> Box<dyn HarnessEmitter> {
    match language {
        LanguageId::Python => Box::new(python::PythonEmitter::new(names)),
        LanguageId::Java => Box::new(java::JavaEmitter::new(names)),
        LanguageId::Kotlin => Box::new(kotlin::KotlinEmitter::new(names)),
        LanguageId::CSharp => Box::new(csharp::CSharpEmitter::new(names)),
        LanguageId::JavaScript => Box::new(javascript::JavaScriptEmitter::new(names, false)),
        LanguageId::TypeScript => Box::new(javascript::JavaScriptEmitter::new(names, true)),
        LanguageId::C => Box::new(c::CEmitter::new(names)),
        LanguageId::Rust => Box::new(rust::RustEmitter::new(names)),
        LanguageId::Haskell => Box::new(haskell::HaskellEmitter::new(names)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_names_follow_language_conventions() {
        let config = GeneratorConfig::default();
        let java = HarnessNames::new(LanguageId::Java, "abcdefgh", &config);
        assert_eq!(java.context, "Context00");
        assert_eq!(java.submission, "Submission");
        assert_eq!(java.value_path, "abcdefgh_values.txt");
        assert_eq!(java.frame, "--abcdefgh-- SEP");

        let python = HarnessNames::new(LanguageId::Python, "abcdefgh", &config);
        assert_eq!(python.context, "context_0_0");
        assert_eq!(python.submission, "submission");
    }

    #[test]
    fn test_names_use_sink_dir() {
        let config = GeneratorConfig::default().with_sink_dir("out");
        let names = HarnessNames::new(LanguageId::C, "abcdefgh", &config);
        assert_eq!(names.exception_path, "out/abcdefgh_exceptions.txt");
    }
}
