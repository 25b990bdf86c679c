//! Constructs a descriptor requires from its target language.

use std::collections::BTreeSet;

use framejudge_core::lang::constructs::ConstructId;

use super::{CallKind, Command, Context, ExceptionChannel, Expr, ValueChannel, VarType};

/// Collect the constructs `context` uses.
///
/// ## Notes
/// - Builtin exception channels need no construct: a language without exceptions simply never writes an exception
///   record. Only a language-specific exception oracle requires [`ConstructId::Exceptions`].
pub fn required_constructs(context: &Context) -> BTreeSet<ConstructId> {
    let mut required = BTreeSet::new();

    if let Some(main) = &context.main {
        exception_constructs(&main.exception, &mut required);
    }

    for testcase in &context.testcases {
        if let Command::Assignment { ty, .. } = &testcase.command {
            required.insert(ConstructId::Assignments);
            type_constructs(ty, &mut required);
        }
        testcase.command.expression().walk(&mut |expr| match expr {
            Expr::Call { call, .. } => {
                required.insert(match call {
                    CallKind::Function => ConstructId::FunctionCalls,
                    CallKind::Method | CallKind::Constructor | CallKind::Property => ConstructId::Objects,
                });
            }
            Expr::Sequence { .. } => {
                required.insert(ConstructId::Collections);
            }
            Expr::Literal { .. } | Expr::Identifier { .. } | Expr::Binary { .. } => {}
        });
        if matches!(testcase.value, Some(ValueChannel::Specific { .. })) {
            required.insert(ConstructId::Evaluation);
        }
        exception_constructs(&testcase.exception, &mut required);
    }

    required
}

fn exception_constructs(channel: &ExceptionChannel, required: &mut BTreeSet<ConstructId>) {
    if let ExceptionChannel::Specific { .. } = channel {
        required.insert(ConstructId::Exceptions);
        required.insert(ConstructId::Evaluation);
    }
}

fn type_constructs(ty: &VarType, required: &mut BTreeSet<ConstructId>) {
    match ty {
        VarType::Sequence(inner) => {
            required.insert(ConstructId::Collections);
            type_constructs(inner, required);
        }
        VarType::Custom(_) => {
            required.insert(ConstructId::Objects);
        }
        VarType::Integer | VarType::Real | VarType::Text | VarType::Boolean => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::descriptor::Testcase;

    #[test]
    fn test_plain_call_needs_function_calls_only() {
        let ctx = Context {
            testcases: vec![Testcase::expression(Expr::function("echo", vec![Expr::text("hi")]))],
            ..Context::default()
        };
        assert_eq!(required_constructs(&ctx), BTreeSet::from([ConstructId::FunctionCalls]));
    }

    #[test]
    fn test_assignment_of_sequence_of_objects() {
        let ctx = Context {
            testcases: vec![Testcase::assignment(
                "xs",
                VarType::Sequence(Box::new(VarType::Custom("Point".into()))),
                Expr::Sequence { elements: vec![] },
            )],
            ..Context::default()
        };
        assert_eq!(
            required_constructs(&ctx),
            BTreeSet::from([ConstructId::Assignments, ConstructId::Objects, ConstructId::Collections])
        );
    }

    #[test]
    fn test_specific_exception_needs_exceptions() {
        let mut tc = Testcase::expression(Expr::integer(1));
        tc.exception = ExceptionChannel::Specific {
            evaluators: Default::default(),
        };
        let ctx = Context {
            testcases: vec![tc],
            ..Context::default()
        };
        let required = required_constructs(&ctx);
        assert!(required.contains(&ConstructId::Exceptions));
        assert!(required.contains(&ConstructId::Evaluation));
    }
}
