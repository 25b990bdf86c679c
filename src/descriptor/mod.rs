//! Language-agnostic context descriptors.
//!
//! A descriptor is the JSON description of one context: optional raw before/after code per language, an optional
//! main invocation and the ordered testcases. It is deserialized with `serde`, then checked by [`validate`] before
//! any harness is generated.
//!
//! ```json
//! {
//!   "main": { "arguments": ["a", "b"] },
//!   "testcases": [
//!     { "command": { "kind": "expression",
//!                    "expression": { "kind": "call", "name": "echo",
//!                                    "arguments": [{ "kind": "literal", "value": { "type": "text", "data": "hi" } }] } } },
//!     { "command": { "kind": "assignment", "variable": "total", "type": "integer",
//!                    "expression": { "kind": "call", "name": "compute" } } }
//!   ]
//! }
//! ```

pub mod features;
pub mod validate;

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

pub use features::required_constructs;
pub use validate::{DescriptorError, validate};

/// One context: everything one harness process executes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(deny_unknown_fields)]
pub struct Context {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Raw code run before anything is framed, keyed by language spelling.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub before: BTreeMap<String, String>,
    /// Raw code run after the last testcase, keyed by language spelling.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub after: BTreeMap<String, String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub main: Option<MainInvocation>,
    #[serde(default)]
    pub testcases: Vec<Testcase>,
}

impl Context {
    /// Parse a descriptor from JSON.
    pub fn from_json(source: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(source)
    }
}

/// Invocation of the submission's entry point with command-line arguments.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(deny_unknown_fields)]
pub struct MainInvocation {
    #[serde(default)]
    pub arguments: Vec<String>,
    #[serde(default)]
    pub exception: ExceptionChannel,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Testcase {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub command: Command,
    /// Absent means "send the value" for expressions and "ignore" for assignments.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<ValueChannel>,
    #[serde(default)]
    pub exception: ExceptionChannel,
}

impl Testcase {
    /// A testcase evaluating `expression` with builtin value and exception channels.
    pub fn expression(expression: Expr) -> Self {
        Self {
            description: None,
            command: Command::Expression { expression },
            value: None,
            exception: ExceptionChannel::Builtin,
        }
    }

    /// A testcase binding `variable` of type `ty` to `expression`.
    pub fn assignment(variable: impl Into<String>, ty: VarType, expression: Expr) -> Self {
        Self {
            description: None,
            command: Command::Assignment {
                variable: variable.into(),
                ty,
                expression,
            },
            value: None,
            exception: ExceptionChannel::Builtin,
        }
    }

    /// The value channel after defaults are applied.
    pub fn value_channel(&self) -> ValueChannel {
        match (&self.value, &self.command) {
            (Some(channel), _) => channel.clone(),
            (None, Command::Expression { .. }) => ValueChannel::Value,
            (None, Command::Assignment { .. }) => ValueChannel::Ignored,
        }
    }
}

/// The statement of a testcase.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Command {
    Expression {
        expression: Expr,
    },
    Assignment {
        variable: String,
        #[serde(rename = "type")]
        ty: VarType,
        expression: Expr,
    },
}

impl Command {
    pub fn expression(&self) -> &Expr {
        match self {
            Command::Expression { expression } | Command::Assignment { expression, .. } => expression,
        }
    }
}

/// Where the primary statement's result goes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ValueChannel {
    /// Evaluate only; the value record stays empty.
    Ignored,
    /// Send the result with the builtin serializer.
    Value,
    /// Send the result through a language-specific oracle.
    Specific { evaluators: BTreeMap<String, Evaluator> },
}

/// How errors (or their absence) are reported.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ExceptionChannel {
    #[default]
    Builtin,
    Specific { evaluators: BTreeMap<String, Evaluator> },
}

/// A language-specific oracle function, called with the value or the bound error.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Evaluator {
    pub name: String,
    /// Module or class the function lives in.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub namespace: Option<String>,
}

/// Declared type of an assigned variable.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VarType {
    Integer,
    Real,
    Text,
    Boolean,
    Sequence(Box<VarType>),
    Custom(String),
}

/// Expression tree.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Expr {
    Literal {
        value: Literal,
    },
    Identifier {
        name: String,
    },
    Call {
        #[serde(default)]
        call: CallKind,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        namespace: Option<Box<Expr>>,
        name: String,
        #[serde(default)]
        arguments: Vec<Expr>,
    },
    Binary {
        op: BinaryOp,
        left: Box<Expr>,
        right: Box<Expr>,
    },
    Sequence {
        #[serde(default)]
        elements: Vec<Expr>,
    },
}

impl Expr {
    pub fn integer(value: i64) -> Self {
        Expr::Literal {
            value: Literal::Integer(value),
        }
    }

    pub fn text(value: impl Into<String>) -> Self {
        Expr::Literal {
            value: Literal::Text(value.into()),
        }
    }

    pub fn identifier(name: impl Into<String>) -> Self {
        Expr::Identifier { name: name.into() }
    }

    /// A call of a free function of the submission.
    pub fn function(name: impl Into<String>, arguments: Vec<Expr>) -> Self {
        Expr::Call {
            call: CallKind::Function,
            namespace: None,
            name: name.into(),
            arguments,
        }
    }

    pub fn binary(op: BinaryOp, left: Expr, right: Expr) -> Self {
        Expr::Binary {
            op,
            left: Box::new(left),
            right: Box::new(right),
        }
    }

    /// Visit this expression and every sub-expression, parents first.
    pub fn walk<'a>(&'a self, visit: &mut impl FnMut(&'a Expr)) {
        visit(self);
        match self {
            Expr::Literal { .. } | Expr::Identifier { .. } => {}
            Expr::Call {
                namespace, arguments, ..
            } => {
                if let Some(ns) = namespace {
                    ns.walk(visit);
                }
                for arg in arguments {
                    arg.walk(visit);
                }
            }
            Expr::Binary { left, right, .. } => {
                left.walk(visit);
                right.walk(visit);
            }
            Expr::Sequence { elements } => {
                for e in elements {
                    e.walk(visit);
                }
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum CallKind {
    #[default]
    Function,
    Method,
    Constructor,
    Property,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BinaryOp {
    Add,
    Sub,
    Mul,
    Div,
}

impl BinaryOp {
    pub fn symbol(self) -> &'static str {
        match self {
            BinaryOp::Add => "+",
            BinaryOp::Sub => "-",
            BinaryOp::Mul => "*",
            BinaryOp::Div => "/",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "data", rename_all = "snake_case")]
pub enum Literal {
    Integer(i64),
    Real(f64),
    Text(String),
    Boolean(bool),
    Nothing,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_expression_testcase() {
        let ctx = Context::from_json(
            r#"{"testcases": [{"command": {"kind": "expression", "expression": {
                "kind": "binary", "op": "add",
                "left": {"kind": "literal", "value": {"type": "integer", "data": 1}},
                "right": {"kind": "literal", "value": {"type": "integer", "data": 1}}}}}]}"#,
        )
        .unwrap();
        assert_eq!(ctx.testcases.len(), 1);
        assert_eq!(
            ctx.testcases[0].command,
            Command::Expression {
                expression: Expr::binary(BinaryOp::Add, Expr::integer(1), Expr::integer(1))
            }
        );
        assert_eq!(ctx.testcases[0].value_channel(), ValueChannel::Value);
    }

    #[test]
    fn test_parse_assignment_defaults_to_ignored_value() {
        let ctx = Context::from_json(
            r#"{"testcases": [{"command": {"kind": "assignment", "variable": "x",
                "type": {"sequence": "integer"}, "expression": {"kind": "call", "name": "compute"}}}]}"#,
        )
        .unwrap();
        let tc = &ctx.testcases[0];
        assert_eq!(tc.value_channel(), ValueChannel::Ignored);
        match &tc.command {
            Command::Assignment { ty, .. } => assert_eq!(*ty, VarType::Sequence(Box::new(VarType::Integer))),
            other => panic!("expected assignment, got {other:?}"),
        }
    }

    #[test]
    fn test_parse_main_and_raw_code() {
        let ctx = Context::from_json(
            r#"{"before": {"python": "x = 1"}, "main": {"arguments": ["a", "b"]}}"#,
        )
        .unwrap();
        assert_eq!(ctx.before.get("python").map(String::as_str), Some("x = 1"));
        assert_eq!(ctx.main.unwrap().arguments, vec!["a", "b"]);
    }

    #[test]
    fn test_unknown_field_is_rejected() {
        assert!(Context::from_json(r#"{"testcase": []}"#).is_err());
    }

    #[test]
    fn test_specific_channel_parses() {
        let tc: Testcase = serde_json::from_str(
            r#"{"command": {"kind": "expression", "expression": {"kind": "identifier", "name": "x"}},
                "value": {"kind": "specific", "evaluators": {"python": {"name": "evaluate", "namespace": "oracle"}}}}"#,
        )
        .unwrap();
        match tc.value_channel() {
            ValueChannel::Specific { evaluators } => assert_eq!(evaluators["python"].name, "evaluate"),
            other => panic!("expected specific channel, got {other:?}"),
        }
    }

    #[test]
    fn test_walk_visits_nested() {
        let expr = Expr::function("f", vec![Expr::binary(BinaryOp::Mul, Expr::identifier("a"), Expr::integer(2))]);
        let mut count = 0;
        expr.walk(&mut |_| count += 1);
        assert_eq!(count, 4);
    }
}
