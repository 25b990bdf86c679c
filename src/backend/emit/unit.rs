//! The statements of one unit, spelled for a text language.
//!
//! A unit is a primary statement followed by the exception record. On success the exception channel reports "no
//! error"; in the handler it reports the bound error. Where the value goes is decided here once for every language
//! that routes its sinks through `send*` helpers.

use std::collections::{BTreeMap, BTreeSet};

use framejudge_core::lang::languages::{self, LanguageId};

use super::expr::ExprSyntax;
use crate::backend::errors::{GenerationError, UnitLabel};
use crate::backend::plan::{HarnessPlan, Step, TestcaseUnit};
use crate::descriptor::{CallKind, Command, Evaluator, ExceptionChannel, Expr, ValueChannel};

/// Names of the sink helpers a harness defines.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SendApi {
    pub value: &'static str,
    pub exception: &'static str,
    pub specific_value: &'static str,
    pub specific_exception: &'static str,
    /// The "no error" literal.
    pub null: &'static str,
    /// Variable the handler binds the caught error to.
    pub error: &'static str,
}

impl SendApi {
    pub const SNAKE: SendApi = SendApi {
        value: "send_value",
        exception: "send_exception",
        specific_value: "send_specific_value",
        specific_exception: "send_specific_exception",
        null: "None",
        error: "harness_error",
    };

    pub const CAMEL: SendApi = SendApi {
        value: "sendValue",
        exception: "sendException",
        specific_value: "sendSpecificValue",
        specific_exception: "sendSpecificException",
        null: "null",
        error: "harnessError",
    };

    pub const PASCAL: SendApi = SendApi {
        value: "SendValue",
        exception: "SendException",
        specific_value: "SendSpecificValue",
        specific_exception: "SendSpecificException",
        null: "null",
        error: "harnessError",
    };
}

/// Exception statements of one unit, without terminators.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExceptionCode {
    pub on_success: String,
    pub on_error: String,
}

/// Statements of one testcase, without terminators.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnitCode {
    pub primary: String,
    pub exception: ExceptionCode,
}

/// Pick the evaluator registered for `language`, whatever spelling the descriptor used.
pub fn evaluator_for(evaluators: &BTreeMap<String, Evaluator>, language: LanguageId) -> Option<&Evaluator> {
    evaluators
        .iter()
        .find(|(spelling, _)| languages::from_str(spelling) == Some(language))
        .map(|(_, evaluator)| evaluator)
}

/// Spell a call of `evaluator` on `argument`.
pub fn call_evaluator(evaluator: &Evaluator, argument: &str) -> String {
    match &evaluator.namespace {
        Some(ns) => format!("{}.{}({})", ns, evaluator.name, argument),
        None => format!("{}({})", evaluator.name, argument),
    }
}

/// Namespaces of every evaluator `plan` calls, for imports.
pub fn evaluator_namespaces(plan: &HarnessPlan<'_>) -> BTreeSet<String> {
    let language = plan.language;
    let mut namespaces = BTreeSet::new();
    let mut add = |evaluators: &BTreeMap<String, Evaluator>| {
        if let Some(ns) = evaluator_for(evaluators, language).and_then(|e| e.namespace.clone()) {
            namespaces.insert(ns);
        }
    };
    for step in &plan.steps {
        match step {
            Step::Main(main) => {
                if let ExceptionChannel::Specific { evaluators } = &main.exception {
                    add(evaluators);
                }
            }
            Step::Testcase(unit) => {
                if let ValueChannel::Specific { evaluators } = &unit.value {
                    add(evaluators);
                }
                if let ExceptionChannel::Specific { evaluators } = unit.exception() {
                    add(evaluators);
                }
            }
            Step::Before(_) | Step::Separator | Step::After(_) => {}
        }
    }
    namespaces
}

impl SendApi {
    /// Exception statements for `channel`.
    pub fn exception_code(
        &self,
        channel: &ExceptionChannel,
        language: LanguageId,
        unit: UnitLabel,
    ) -> Result<ExceptionCode, GenerationError> {
        match channel {
            ExceptionChannel::Builtin => Ok(ExceptionCode {
                on_success: format!("{}({})", self.exception, self.null),
                on_error: format!("{}({})", self.exception, self.error),
            }),
            ExceptionChannel::Specific { evaluators } => {
                let evaluator = evaluator_for(evaluators, language)
                    .ok_or(GenerationError::MissingEvaluator { language, unit })?;
                Ok(ExceptionCode {
                    on_success: format!(
                        "{}({})",
                        self.specific_exception,
                        call_evaluator(evaluator, self.null)
                    ),
                    on_error: format!(
                        "{}({})",
                        self.specific_exception,
                        call_evaluator(evaluator, self.error)
                    ),
                })
            }
        }
    }

    /// Statements for one testcase.
    pub fn testcase_code(
        &self,
        unit: &TestcaseUnit<'_>,
        language: LanguageId,
        syntax: &dyn ExprSyntax,
    ) -> Result<UnitCode, GenerationError> {
        let label = UnitLabel::Testcase(unit.index);
        let expression = syntax.render(unit.command().expression());
        let primary = match (unit.command(), &unit.value) {
            (Command::Assignment { variable, .. }, _) => {
                format!("{} = {}", syntax.identifier(variable), expression)
            }
            (Command::Expression { expression: expr }, ValueChannel::Ignored) => discard(expr, expression, language),
            (Command::Expression { .. }, ValueChannel::Value) => format!("{}({})", self.value, expression),
            (Command::Expression { .. }, ValueChannel::Specific { evaluators }) => {
                let evaluator = evaluator_for(evaluators, language)
                    .ok_or(GenerationError::MissingEvaluator { language, unit: label })?;
                format!("{}({})", self.specific_value, call_evaluator(evaluator, &expression))
            }
        };
        Ok(UnitCode {
            primary,
            exception: self.exception_code(unit.exception(), language, label)?,
        })
    }
}

/// An ignored expression as a statement.
///
/// Java and C# only accept calls and object creation as expression statements, so anything else is assigned to a
/// throwaway local.
fn discard(expr: &Expr, rendered: String, language: LanguageId) -> String {
    let is_statement = matches!(
        expr,
        Expr::Call {
            call: CallKind::Function | CallKind::Method | CallKind::Constructor,
            ..
        }
    );
    match language {
        LanguageId::Java if !is_statement => format!("Object harnessIgnored = {rendered}"),
        LanguageId::CSharp if !is_statement => format!("object harnessIgnored = {rendered}"),
        _ => rendered,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::descriptor::{Context, Expr, Testcase, VarType};
    use framejudge_core::lang::conventions::{NamingCase, NamingConventions};

    struct Snake;

    impl ExprSyntax for Snake {
        fn naming(&self) -> NamingConventions {
            NamingConventions::uniform(NamingCase::Snake, NamingCase::Pascal)
        }
    }

    fn oracle(language: &str) -> BTreeMap<String, Evaluator> {
        BTreeMap::from([(
            language.to_string(),
            Evaluator {
                name: "evaluate".into(),
                namespace: Some("oracle".into()),
            },
        )])
    }

    fn code_for(testcase: Testcase) -> Result<UnitCode, GenerationError> {
        let ctx = Context {
            testcases: vec![testcase],
            ..Context::default()
        };
        let plan = HarnessPlan::lower(&ctx, LanguageId::Python);
        let unit = plan.testcases().next().cloned().expect("one testcase");
        SendApi::SNAKE.testcase_code(&unit, LanguageId::Python, &Snake)
    }

    #[test]
    fn test_expression_sends_value() {
        let code = code_for(Testcase::expression(Expr::function("echo", vec![Expr::text("hi")]))).unwrap();
        assert_eq!(code.primary, r#"send_value(echo("hi"))"#);
        assert_eq!(code.exception.on_success, "send_exception(None)");
        assert_eq!(code.exception.on_error, "send_exception(harness_error)");
    }

    #[test]
    fn test_ignored_operator_expression_is_bound_in_java_and_csharp() {
        let sum = Expr::binary(crate::descriptor::BinaryOp::Add, Expr::integer(1), Expr::integer(1));
        assert_eq!(
            discard(&sum, "(1 + 1)".into(), LanguageId::Java),
            "Object harnessIgnored = (1 + 1)"
        );
        assert_eq!(
            discard(&sum, "(1 + 1)".into(), LanguageId::CSharp),
            "object harnessIgnored = (1 + 1)"
        );
        assert_eq!(discard(&sum, "(1 + 1)".into(), LanguageId::Python), "(1 + 1)");
    }

    #[test]
    fn test_ignored_call_stays_a_statement() {
        let call = Expr::function("reset", vec![]);
        assert_eq!(discard(&call, "reset()".into(), LanguageId::Java), "reset()");
        assert_eq!(discard(&call, "Reset()".into(), LanguageId::CSharp), "Reset()");
    }

    #[test]
    fn test_assignment_binds_without_sending() {
        let code = code_for(Testcase::assignment("total", VarType::Integer, Expr::integer(3))).unwrap();
        assert_eq!(code.primary, "total = 3");
    }

    #[test]
    fn test_specific_value_calls_oracle() {
        let mut tc = Testcase::expression(Expr::identifier("x"));
        tc.value = Some(ValueChannel::Specific {
            evaluators: oracle("py"),
        });
        let code = code_for(tc).unwrap();
        assert_eq!(code.primary, "send_specific_value(oracle.evaluate(x))");
    }

    #[test]
    fn test_specific_exception_calls_oracle_with_error() {
        let mut tc = Testcase::expression(Expr::identifier("x"));
        tc.exception = ExceptionChannel::Specific {
            evaluators: oracle("python"),
        };
        let code = code_for(tc).unwrap();
        assert_eq!(code.exception.on_success, "send_specific_exception(oracle.evaluate(None))");
        assert_eq!(code.exception.on_error, "send_specific_exception(oracle.evaluate(harness_error))");
    }

    #[test]
    fn test_missing_evaluator_is_reported() {
        let mut tc = Testcase::expression(Expr::identifier("x"));
        tc.value = Some(ValueChannel::Specific {
            evaluators: oracle("java"),
        });
        let err = code_for(tc).unwrap_err();
        assert!(matches!(
            err,
            GenerationError::MissingEvaluator {
                language: LanguageId::Python,
                unit: UnitLabel::Testcase(0)
            }
        ));
    }

    #[test]
    fn test_evaluator_namespaces_collected_once() {
        let mut a = Testcase::expression(Expr::identifier("x"));
        a.value = Some(ValueChannel::Specific {
            evaluators: oracle("python"),
        });
        let mut b = a.clone();
        b.exception = ExceptionChannel::Specific {
            evaluators: oracle("py"),
        };
        let ctx = Context {
            testcases: vec![a, b],
            ..Context::default()
        };
        let plan = HarnessPlan::lower(&ctx, LanguageId::Python);
        assert_eq!(evaluator_namespaces(&plan), BTreeSet::from(["oracle".to_string()]));
    }
}
