//! Harness generation across every target language
//!
//! These tests drive the public generator and check the protocol-level shape of each harness: one separator call
//! per executed unit, the frame literal, and the language's declaration and cleanup conventions.
//!
//! Run with: `cargo test --test codegen_tests`

use framejudge::backend::{GenerationError, GeneratorConfig, generate_selector, generate_with_token};
use framejudge::descriptor::{BinaryOp, Context, Expr, MainInvocation, Testcase, ValueChannel, VarType};
use framejudge_core::Token;
use framejudge_core::lang::languages::LanguageId;

fn token() -> Token {
    Token::parse("EjgkIhoLXq").unwrap()
}

fn echo_context(n: usize) -> Context {
    Context {
        testcases: (0..n)
            .map(|i| Testcase::expression(Expr::function("echo", vec![Expr::text(format!("input-{i}"))])))
            .collect(),
        ..Context::default()
    }
}

fn generate(context: &Context, language: LanguageId) -> String {
    generate_with_token(context, language, &token(), &GeneratorConfig::default())
        .unwrap_or_else(|e| panic!("{language} generation failed: {e}"))
        .source
}

/// The statement each text emitter writes to frame a unit.
const SEPARATOR_CALLS: &[(LanguageId, &str)] = &[
    (LanguageId::Python, "write_separator()"),
    (LanguageId::Java, "this.writeSeparator();"),
    (LanguageId::Kotlin, "this.writeSeparator()"),
    (LanguageId::CSharp, "this.WriteSeparator();"),
    (LanguageId::JavaScript, "writeSeparator();"),
    (LanguageId::TypeScript, "writeSeparator();"),
    (LanguageId::C, "context_0_0_write_separator();"),
    (LanguageId::Haskell, "writeSeparator valueFile exceptionFile"),
];

fn separator_calls(source: &str, call: &str) -> usize {
    source.lines().filter(|line| line.trim() == call).count()
}

// ============================================================================
// Separator placement
// ============================================================================

#[test]
fn test_one_separator_per_unit_in_every_text_language() {
    for n in [0, 1, 4] {
        let context = echo_context(n);
        for (language, call) in SEPARATOR_CALLS {
            let source = generate(&context, *language);
            assert_eq!(
                separator_calls(&source, call),
                1 + n,
                "{language} with {n} testcases:\n{source}"
            );
        }
    }
}

#[test]
fn test_frame_literal_is_embedded() {
    for (language, _) in SEPARATOR_CALLS {
        let source = generate(&echo_context(1), *language);
        assert!(source.contains("--EjgkIhoLXq-- SEP"), "{language} lacks the frame");
    }
}

#[test]
fn test_rust_harness_frames_through_the_runtime() {
    let source = generate(&echo_context(3), LanguageId::Rust);
    assert_eq!(source.matches("finish_before()").count(), 1);
    assert_eq!(source.matches("execute_testcase(").count(), 3);
    assert!(source.contains("use framejudge_runtime::prelude::*;"));
}

#[test]
fn test_main_slot_sits_between_the_first_two_separators() {
    let context = Context {
        main: Some(MainInvocation {
            arguments: vec!["a".into(), "b".into()],
            ..MainInvocation::default()
        }),
        ..echo_context(1)
    };
    let source = generate(&context, LanguageId::Python);
    let first = source.find("\n    write_separator()").unwrap();
    let argv = source.find("sys.argv = ").unwrap();
    let second = source[argv..].find("write_separator()").map(|i| i + argv).unwrap();
    assert!(first < argv && argv < second, "{source}");
    assert!(source.contains(r#"sys.argv = ["submission", "a", "b"]"#));
}

// ============================================================================
// Assignments
// ============================================================================

fn failing_assignment() -> Context {
    Context {
        testcases: vec![
            Testcase::assignment("total", VarType::Integer, Expr::function("compute", vec![])),
            Testcase::expression(Expr::binary(BinaryOp::Add, Expr::identifier("total"), Expr::integer(1))),
        ],
        ..Context::default()
    }
}

#[test]
fn test_assigned_variable_is_declared_before_its_unit() {
    let python = generate(&failing_assignment(), LanguageId::Python);
    let declared = python.find("total = 0").unwrap();
    let assigned = python.find("total = compute()").unwrap();
    assert!(declared < assigned, "{python}");

    let java = generate(&failing_assignment(), LanguageId::Java);
    assert!(java.contains("int total = 0;"), "{java}");

    let kotlin = generate(&failing_assignment(), LanguageId::Kotlin);
    assert!(kotlin.contains("var total: Int = 0"), "{kotlin}");
}

#[test]
fn test_raw_code_with_multibyte_indentation() {
    let mut context = echo_context(1);
    context.before.insert("python".into(), "\u{a0}x = 1\n y = 2".into());
    let source = generate(&context, LanguageId::Python);
    assert!(source.contains("\u{a0}x = 1"), "{source}");
}

#[test]
fn test_ignored_operator_expression_is_a_valid_statement() {
    let mut testcase = Testcase::expression(Expr::binary(BinaryOp::Add, Expr::integer(1), Expr::integer(1)));
    testcase.value = Some(ValueChannel::Ignored);
    let context = Context {
        testcases: vec![testcase],
        ..Context::default()
    };
    assert!(generate(&context, LanguageId::Java).contains("Object harnessIgnored = (1 + 1);"));
    assert!(generate(&context, LanguageId::CSharp).contains("object harnessIgnored = (1 + 1);"));
    assert!(generate(&context, LanguageId::Python).contains("(1 + 1)"));
}

// ============================================================================
// Capabilities
// ============================================================================

#[test]
fn test_c_rejects_sequences() {
    let context = Context {
        testcases: vec![Testcase::expression(Expr::function(
            "sum",
            vec![Expr::Sequence {
                elements: vec![Expr::integer(1), Expr::integer(2)],
            }],
        ))],
        ..Context::default()
    };
    let err = generate_with_token(&context, LanguageId::C, &token(), &GeneratorConfig::default()).unwrap_err();
    assert!(matches!(err, GenerationError::Unsupported { language: LanguageId::C, .. }));
    assert!(generate_with_token(&context, LanguageId::Python, &token(), &GeneratorConfig::default()).is_ok());
}

// ============================================================================
// Snapshots
// ============================================================================

#[test]
fn test_kotlin_selector_snapshot() {
    let selector = generate_selector(LanguageId::Kotlin, &["context_0_0".to_string()], &GeneratorConfig::default())
        .unwrap();
    insta::assert_snapshot!(selector.source, @r#"
    fun main(args: Array<String>) {
        val rest = args.copyOfRange(1, args.size)
        when (args[0]) {
            "Context00" -> Context00.main(rest)
            else -> {
                System.err.println("Non-existing context '${args[0]}' selected.")
                kotlin.system.exitProcess(1)
            }
        }
    }
    "#);
}

#[test]
fn test_manifest_snapshot() {
    let harness =
        generate_with_token(&echo_context(2), LanguageId::Python, &token(), &GeneratorConfig::default()).unwrap();
    insta::assert_snapshot!(serde_json::to_string_pretty(&harness).unwrap(), @r#"
    {
      "language": "python",
      "file_name": "context_0_0.py",
      "token": "EjgkIhoLXq",
      "value_file": "EjgkIhoLXq_values.txt",
      "exception_file": "EjgkIhoLXq_exceptions.txt",
      "separator_count": 3,
      "context_name": "context_0_0"
    }
    "#);
}

#[test]
fn test_haskell_rejects_objects_but_runs_lists() {
    let object = Context {
        testcases: vec![Testcase::assignment(
            "c",
            VarType::Custom("Counter".into()),
            Expr::function("new_counter", vec![]),
        )],
        ..Context::default()
    };
    let err = generate_with_token(&object, LanguageId::Haskell, &token(), &GeneratorConfig::default()).unwrap_err();
    assert!(matches!(
        err,
        GenerationError::Unsupported {
            language: LanguageId::Haskell,
            construct: "objects"
        }
    ));

    let list = Context {
        testcases: vec![Testcase::expression(Expr::function(
            "sum",
            vec![Expr::Sequence {
                elements: vec![Expr::integer(1), Expr::integer(-2)],
            }],
        ))],
        ..Context::default()
    };
    let source = generate(&list, LanguageId::Haskell);
    assert!(source.contains("sendValue valueFile ((sum [1, (-2)]))"), "{source}");
}
