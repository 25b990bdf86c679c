//! Harness generation entry points.
//!
//! Generation runs in a fixed order and stops at the first failing stage:
//!
//! 1. structural validation of the descriptor,
//! 2. capability check against the target language, including integer literal width,
//! 3. token collision check,
//! 4. lowering to a [`HarnessPlan`],
//! 5. emission.
//!
//! Nothing is written to disk here; callers decide where the [`GeneratedHarness`] goes.

use framejudge_core::Token;
use framejudge_core::framing::contains_frame;
use framejudge_core::lang::constructs;
use framejudge_core::lang::languages::{self, LanguageId};
use serde::Serialize;

use super::config::GeneratorConfig;
use super::emit::{HarnessNames, drive, emitter_for};
use super::errors::GenerationError;
use super::plan::HarnessPlan;
use crate::descriptor::{Command, Context, Expr, Literal, VarType, required_constructs, validate};
use crate::token::{TokenAllocator, descriptor_texts};

/// A generated harness and everything a runner needs to execute and collect it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GeneratedHarness {
    pub language: String,
    /// File name the harness must be saved under (class and file names must agree in Java and C#).
    pub file_name: String,
    #[serde(skip)]
    pub source: String,
    pub token: String,
    pub value_file: String,
    pub exception_file: String,
    /// Frames the harness writes to every sink when it runs to completion.
    pub separator_count: usize,
    /// Conventionalized context name, as a selector refers to it.
    pub context_name: String,
}

/// Check that `language` can express everything `context` uses.
pub fn check_support(context: &Context, language: LanguageId) -> Result<(), GenerationError> {
    let info = languages::info_for(language);
    match required_constructs(context).into_iter().find(|c| !info.supports(*c)) {
        Some(missing) => Err(GenerationError::Unsupported {
            language,
            construct: constructs::as_str(missing),
        }),
        None => Ok(()),
    }
}

/// Check that literals assigned to integer variables fit the integer type `language` declares them with.
///
/// Java, Kotlin, C# and C declare integer variables as 32-bit `int`; a wider literal would not compile (or would be
/// truncated, in C). Literals passed as call arguments are unaffected.
pub fn check_integer_range(context: &Context, language: LanguageId) -> Result<(), GenerationError> {
    if !matches!(
        language,
        LanguageId::Java | LanguageId::Kotlin | LanguageId::CSharp | LanguageId::C
    ) {
        return Ok(());
    }
    for (testcase, unit) in context.testcases.iter().enumerate() {
        if let Command::Assignment { ty, expression, .. } = &unit.command {
            if let Some(value) = wide_literal(ty, expression) {
                return Err(GenerationError::IntegerOutOfRange {
                    language,
                    testcase,
                    value,
                });
            }
        }
    }
    Ok(())
}

/// First integer literal in `expr` that a variable of type `ty` cannot hold as an `int`.
fn wide_literal(ty: &VarType, expr: &Expr) -> Option<i64> {
    match (ty, expr) {
        (
            VarType::Integer,
            Expr::Literal {
                value: Literal::Integer(value),
            },
        ) if i32::try_from(*value).is_err() => Some(*value),
        (VarType::Sequence(inner), Expr::Sequence { elements }) => {
            elements.iter().find_map(|element| wide_literal(inner, element))
        }
        _ => None,
    }
}

/// Generate the harness of `context` for `language` with a caller-chosen token.
#[tracing::instrument(skip_all, fields(language = %language, token = %token))]
pub fn generate_with_token(
    context: &Context,
    language: LanguageId,
    token: &Token,
    config: &GeneratorConfig,
) -> Result<GeneratedHarness, GenerationError> {
    validate(context)?;
    check_support(context, language)?;
    check_integer_range(context, language)?;
    if descriptor_texts(context)
        .iter()
        .any(|text| contains_frame(text, token.as_str()))
    {
        return Err(GenerationError::TokenCollision {
            token: token.to_string(),
        });
    }

    let plan = HarnessPlan::lower(context, language);
    let names = HarnessNames::new(language, token.as_str(), config);
    let info = languages::info_for(language);
    let harness = GeneratedHarness {
        language: info.canonical().to_string(),
        file_name: format!("{}.{}", names.context, info.extension),
        source: String::new(),
        token: token.to_string(),
        value_file: names.value_path.clone(),
        exception_file: names.exception_path.clone(),
        separator_count: plan.separator_count(),
        context_name: names.context.clone(),
    };
    let source = drive(&plan, emitter_for(language, names))?;
    tracing::info!(
        file = %harness.file_name,
        separators = harness.separator_count,
        "generated harness"
    );
    Ok(GeneratedHarness { source, ..harness })
}

/// Generates harnesses, allocating a fresh token for each.
#[derive(Debug, Default)]
pub struct HarnessGenerator {
    allocator: TokenAllocator,
    config: GeneratorConfig,
}

impl HarnessGenerator {
    pub fn new(config: GeneratorConfig) -> Self {
        Self {
            allocator: TokenAllocator::new(),
            config,
        }
    }

    /// Use `allocator` instead of an OS-seeded one.
    pub fn with_allocator(mut self, allocator: TokenAllocator) -> Self {
        self.allocator = allocator;
        self
    }

    pub fn config(&self) -> &GeneratorConfig {
        &self.config
    }

    /// Generate the harness of `context` for `language`.
    ///
    /// Every call uses a new token, so regenerating a context never reuses a frame.
    pub fn generate(&mut self, context: &Context, language: LanguageId) -> Result<GeneratedHarness, GenerationError> {
        let token = self.allocator.allocate_for(context);
        generate_with_token(context, language, &token, &self.config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::descriptor::{CallKind, Expr, Testcase, VarType};

    fn token() -> Token {
        Token::parse("abcdEFGH12").unwrap()
    }

    fn echo_context(n: usize) -> Context {
        Context {
            testcases: (0..n)
                .map(|i| Testcase::expression(Expr::function("echo", vec![Expr::text(format!("input-{i}"))])))
                .collect(),
            ..Context::default()
        }
    }

    #[test]
    fn test_manifest_fields() {
        let harness =
            generate_with_token(&echo_context(3), LanguageId::Java, &token(), &GeneratorConfig::default()).unwrap();
        assert_eq!(harness.file_name, "Context00.java");
        assert_eq!(harness.separator_count, 4);
        assert_eq!(harness.value_file, "abcdEFGH12_values.txt");
        assert_eq!(harness.context_name, "Context00");
        assert!(harness.source.contains("--abcdEFGH12-- SEP"));
    }

    #[test]
    fn test_invalid_descriptor_fails_first() {
        let err = generate_with_token(&Context::default(), LanguageId::Python, &token(), &GeneratorConfig::default())
            .unwrap_err();
        assert!(matches!(err, GenerationError::Descriptor(_)));
    }

    #[test]
    fn test_unsupported_construct() {
        let ctx = Context {
            testcases: vec![Testcase::assignment(
                "c",
                VarType::Custom("Counter".into()),
                Expr::Call {
                    call: CallKind::Constructor,
                    namespace: None,
                    name: "Counter".into(),
                    arguments: vec![],
                },
            )],
            ..Context::default()
        };
        let err = generate_with_token(&ctx, LanguageId::C, &token(), &GeneratorConfig::default()).unwrap_err();
        assert!(matches!(
            err,
            GenerationError::Unsupported {
                language: LanguageId::C,
                construct: "objects"
            }
        ));
    }

    #[test]
    fn test_token_collision_is_rejected() {
        let mut ctx = echo_context(1);
        ctx.testcases.push(Testcase::expression(Expr::text(token().frame())));
        let err = generate_with_token(&ctx, LanguageId::Python, &token(), &GeneratorConfig::default()).unwrap_err();
        assert!(matches!(err, GenerationError::TokenCollision { .. }));
    }

    #[test]
    fn test_generator_allocates_fresh_tokens() {
        let mut generator = HarnessGenerator::new(GeneratorConfig::default()).with_allocator(TokenAllocator::with_seed(9));
        let a = generator.generate(&echo_context(1), LanguageId::Python).unwrap();
        let b = generator.generate(&echo_context(1), LanguageId::Python).unwrap();
        assert_ne!(a.token, b.token);
        assert_eq!(a.file_name, "context_0_0.py");
    }

    #[test]
    fn test_wide_integer_assignment_rejected_for_int_languages() {
        let ctx = Context {
            testcases: vec![Testcase::assignment(
                "numbers",
                VarType::Sequence(Box::new(VarType::Integer)),
                Expr::Sequence {
                    elements: vec![Expr::integer(1), Expr::integer(3_000_000_000)],
                },
            )],
            ..Context::default()
        };
        for language in [LanguageId::Java, LanguageId::Kotlin, LanguageId::CSharp] {
            let err = generate_with_token(&ctx, language, &token(), &GeneratorConfig::default()).unwrap_err();
            assert!(matches!(
                err,
                GenerationError::IntegerOutOfRange {
                    testcase: 0,
                    value: 3_000_000_000,
                    ..
                }
            ));
        }
        assert!(generate_with_token(&ctx, LanguageId::Python, &token(), &GeneratorConfig::default()).is_ok());
        assert!(generate_with_token(&ctx, LanguageId::Rust, &token(), &GeneratorConfig::default()).is_ok());
    }

    #[test]
    fn test_wide_integer_argument_is_allowed() {
        let ctx = Context {
            testcases: vec![Testcase::assignment(
                "total",
                VarType::Integer,
                Expr::function("clamp", vec![Expr::integer(3_000_000_000)]),
            )],
            ..Context::default()
        };
        let harness = generate_with_token(&ctx, LanguageId::C, &token(), &GeneratorConfig::default()).unwrap();
        assert!(harness.source.contains("clamp(3000000000LL)"));
    }
}
