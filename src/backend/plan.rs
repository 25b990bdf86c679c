//! Lowering a descriptor into the ordered steps of a harness.
//!
//! The plan is where separator placement is decided, once for every target language:
//!
//! ```text
//! [Before]  Separator  [Main]  (Separator Testcase)*  [After]
//! ```
//!
//! The separator after the before-code is always present, so the main-invocation slot exists (possibly empty) and a
//! context with `n` testcases always writes `1 + n` frames per sink.

use std::collections::HashSet;

use framejudge_core::lang::languages::{self, LanguageId};

use crate::descriptor::{Command, Context, ExceptionChannel, MainInvocation, Testcase, ValueChannel};

/// One testcase as an emitter sees it.
#[derive(Debug, Clone, PartialEq)]
pub struct TestcaseUnit<'a> {
    pub index: usize,
    pub testcase: &'a Testcase,
    /// The value channel with defaults applied.
    pub value: ValueChannel,
    /// Whether the assigned variable must be declared here (first assignment to it).
    pub declare: bool,
}

impl<'a> TestcaseUnit<'a> {
    pub fn command(&self) -> &'a Command {
        &self.testcase.command
    }

    pub fn exception(&self) -> &'a ExceptionChannel {
        &self.testcase.exception
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Step<'a> {
    Before(&'a str),
    Separator,
    Main(&'a MainInvocation),
    Testcase(TestcaseUnit<'a>),
    After(&'a str),
}

/// Ordered steps of one harness.
#[derive(Debug, Clone, PartialEq)]
pub struct HarnessPlan<'a> {
    pub language: LanguageId,
    pub steps: Vec<Step<'a>>,
}

impl<'a> HarnessPlan<'a> {
    /// Lower `context` for `language`.
    ///
    /// Raw before/after code is picked by language spelling; the first key that resolves to `language` wins.
    pub fn lower(context: &'a Context, language: LanguageId) -> Self {
        let mut steps = Vec::with_capacity(context.testcases.len() * 2 + 4);

        if let Some(code) = raw_code_for(&context.before, language) {
            steps.push(Step::Before(code));
        }
        steps.push(Step::Separator);
        if let Some(main) = &context.main {
            steps.push(Step::Main(main));
        }

        let mut declared: HashSet<&str> = HashSet::new();
        for (index, testcase) in context.testcases.iter().enumerate() {
            let declare = match &testcase.command {
                Command::Assignment { variable, .. } => declared.insert(variable.as_str()),
                Command::Expression { .. } => false,
            };
            steps.push(Step::Separator);
            steps.push(Step::Testcase(TestcaseUnit {
                index,
                testcase,
                value: testcase.value_channel(),
                declare,
            }));
        }

        if let Some(code) = raw_code_for(&context.after, language) {
            steps.push(Step::After(code));
        }

        tracing::debug!(language = %language, steps = steps.len(), "lowered harness plan");
        Self { language, steps }
    }

    /// Number of frames the harness writes to every sink.
    pub fn separator_count(&self) -> usize {
        self.steps.iter().filter(|s| matches!(s, Step::Separator)).count()
    }

    pub fn has_main(&self) -> bool {
        self.steps.iter().any(|s| matches!(s, Step::Main(_)))
    }

    pub fn testcases(&self) -> impl Iterator<Item = &TestcaseUnit<'a>> {
        self.steps.iter().filter_map(|s| match s {
            Step::Testcase(unit) => Some(unit),
            _ => None,
        })
    }
}

fn raw_code_for(map: &std::collections::BTreeMap<String, String>, language: LanguageId) -> Option<&str> {
    map.iter()
        .find(|(spelling, _)| languages::from_str(spelling) == Some(language))
        .map(|(_, code)| code.as_str())
        .filter(|code| !code.trim().is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::descriptor::{Expr, VarType};

    fn context(testcases: Vec<Testcase>) -> Context {
        Context {
            testcases,
            ..Context::default()
        }
    }

    #[test]
    fn test_separator_count_is_one_plus_testcases() {
        let ctx = context(vec![
            Testcase::expression(Expr::integer(1)),
            Testcase::expression(Expr::integer(2)),
            Testcase::expression(Expr::integer(3)),
        ]);
        assert_eq!(HarnessPlan::lower(&ctx, LanguageId::Python).separator_count(), 4);
    }

    #[test]
    fn test_separator_precedes_every_testcase() {
        let ctx = context(vec![Testcase::expression(Expr::integer(1)), Testcase::expression(Expr::integer(2))]);
        let plan = HarnessPlan::lower(&ctx, LanguageId::Java);
        for (i, step) in plan.steps.iter().enumerate() {
            if matches!(step, Step::Testcase(_)) {
                assert_eq!(plan.steps[i - 1], Step::Separator);
            }
        }
    }

    #[test]
    fn test_main_follows_first_separator() {
        let ctx = Context {
            main: Some(MainInvocation {
                arguments: vec!["a".into(), "b".into()],
                ..MainInvocation::default()
            }),
            testcases: vec![Testcase::expression(Expr::integer(1))],
            ..Context::default()
        };
        let plan = HarnessPlan::lower(&ctx, LanguageId::C);
        assert!(matches!(plan.steps[0], Step::Separator));
        assert!(matches!(plan.steps[1], Step::Main(_)));
        assert_eq!(plan.separator_count(), 2);
        assert!(plan.has_main());
    }

    #[test]
    fn test_raw_code_selected_by_alias() {
        let mut ctx = context(vec![Testcase::expression(Expr::integer(1))]);
        ctx.before.insert("py".into(), "import math".into());
        ctx.after.insert("java".into(), "System.out.println();".into());
        let plan = HarnessPlan::lower(&ctx, LanguageId::Python);
        assert_eq!(plan.steps[0], Step::Before("import math"));
        assert!(!plan.steps.iter().any(|s| matches!(s, Step::After(_))));
    }

    #[test]
    fn test_variable_declared_once() {
        let ctx = context(vec![
            Testcase::assignment("x", VarType::Integer, Expr::integer(1)),
            Testcase::assignment("x", VarType::Integer, Expr::integer(2)),
            Testcase::assignment("y", VarType::Integer, Expr::integer(3)),
        ]);
        let plan = HarnessPlan::lower(&ctx, LanguageId::Kotlin);
        let declares: Vec<bool> = plan.testcases().map(|u| u.declare).collect();
        assert_eq!(declares, vec![true, false, true]);
    }
}
