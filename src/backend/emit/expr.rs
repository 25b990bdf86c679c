//! Expression spelling for the text emitters.
//!
//! Every text language renders the same expression tree; they differ in literal spelling, in how free functions of
//! the submission are reached and in whether constructors need `new`. [`ExprSyntax`] has a default for each piece
//! and an emitter overrides only what its language does differently.

use framejudge_core::lang::conventions::NamingConventions;

use super::strings;
use crate::descriptor::{BinaryOp, CallKind, Expr, Literal};

pub trait ExprSyntax {
    fn naming(&self) -> NamingConventions;

    /// Qualifier for free functions of the submission (`Submission` in Java), if the language needs one.
    fn submission(&self) -> Option<&str> {
        None
    }

    fn text(&self, value: &str) -> String {
        strings::quote_json(value)
    }

    fn integer(&self, value: i64) -> String {
        value.to_string()
    }

    fn real(&self, value: f64) -> String {
        strings::real(value)
    }

    fn boolean(&self, value: bool) -> String {
        value.to_string()
    }

    fn nothing(&self) -> String {
        "null".to_string()
    }

    fn sequence(&self, elements: &[String]) -> String {
        format!("[{}]", elements.join(", "))
    }

    fn identifier(&self, name: &str) -> String {
        self.naming().identifier.apply(name)
    }

    fn function(&self, name: &str, arguments: &[String]) -> String {
        let name = self.naming().function.apply(name);
        match self.submission() {
            Some(qualifier) => format!("{}.{}({})", qualifier, name, arguments.join(", ")),
            None => format!("{}({})", name, arguments.join(", ")),
        }
    }

    fn constructor(&self, class: &str, arguments: &[String]) -> String {
        format!("new {}({})", self.naming().class.apply(class), arguments.join(", "))
    }

    fn method(&self, receiver: &str, name: &str, arguments: &[String]) -> String {
        format!("{}.{}({})", receiver, self.naming().function.apply(name), arguments.join(", "))
    }

    fn property(&self, receiver: &str, name: &str) -> String {
        format!("{}.{}", receiver, self.naming().property.apply(name))
    }

    fn binary(&self, op: BinaryOp, left: &str, right: &str) -> String {
        format!("({} {} {})", left, op.symbol(), right)
    }

    /// Render `expr` with this syntax.
    ///
    /// A namespaced function call is spelled as a method call on its namespace.
    fn render(&self, expr: &Expr) -> String {
        match expr {
            Expr::Literal { value } => match value {
                Literal::Integer(v) => self.integer(*v),
                Literal::Real(v) => self.real(*v),
                Literal::Text(v) => self.text(v),
                Literal::Boolean(v) => self.boolean(*v),
                Literal::Nothing => self.nothing(),
            },
            Expr::Identifier { name } => self.identifier(name),
            Expr::Call {
                call,
                namespace,
                name,
                arguments,
            } => {
                let arguments: Vec<String> = arguments.iter().map(|a| self.render(a)).collect();
                let receiver = namespace.as_deref().map(|ns| self.render(ns));
                match (call, receiver) {
                    (CallKind::Constructor, _) => self.constructor(name, &arguments),
                    (CallKind::Property, Some(receiver)) => self.property(&receiver, name),
                    (CallKind::Property, None) => self.identifier(name),
                    (CallKind::Function | CallKind::Method, Some(receiver)) => {
                        self.method(&receiver, name, &arguments)
                    }
                    (CallKind::Function | CallKind::Method, None) => self.function(name, &arguments),
                }
            }
            Expr::Binary { op, left, right } => self.binary(*op, &self.render(left), &self.render(right)),
            Expr::Sequence { elements } => {
                let elements: Vec<String> = elements.iter().map(|e| self.render(e)).collect();
                self.sequence(&elements)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use framejudge_core::lang::conventions::NamingCase;

    struct Plain;

    impl ExprSyntax for Plain {
        fn naming(&self) -> NamingConventions {
            NamingConventions::uniform(NamingCase::Camel, NamingCase::Pascal)
        }
    }

    struct Qualified;

    impl ExprSyntax for Qualified {
        fn naming(&self) -> NamingConventions {
            NamingConventions::uniform(NamingCase::Camel, NamingCase::Pascal)
        }

        fn submission(&self) -> Option<&str> {
            Some("Submission")
        }
    }

    #[test]
    fn test_function_call_is_conventionalized() {
        let expr = Expr::function("compute_sum", vec![Expr::integer(1), Expr::text("a")]);
        assert_eq!(Plain.render(&expr), r#"computeSum(1, "a")"#);
        assert_eq!(Qualified.render(&expr), r#"Submission.computeSum(1, "a")"#);
    }

    #[test]
    fn test_namespaced_function_becomes_method() {
        let expr = Expr::Call {
            call: CallKind::Function,
            namespace: Some(Box::new(Expr::identifier("my_list"))),
            name: "add_item".into(),
            arguments: vec![],
        };
        assert_eq!(Qualified.render(&expr), "myList.addItem()");
    }

    #[test]
    fn test_constructor_and_property() {
        let ctor = Expr::Call {
            call: CallKind::Constructor,
            namespace: None,
            name: "counter".into(),
            arguments: vec![Expr::integer(3)],
        };
        assert_eq!(Plain.render(&ctor), "new Counter(3)");

        let prop = Expr::Call {
            call: CallKind::Property,
            namespace: Some(Box::new(Expr::identifier("c"))),
            name: "current_value".into(),
            arguments: vec![],
        };
        assert_eq!(Plain.render(&prop), "c.currentValue");
    }

    #[test]
    fn test_binary_is_parenthesized() {
        let expr = Expr::binary(
            BinaryOp::Div,
            Expr::integer(1),
            Expr::binary(BinaryOp::Sub, Expr::integer(2), Expr::integer(2)),
        );
        assert_eq!(Plain.render(&expr), "(1 / (2 - 2))");
    }

    #[test]
    fn test_literals() {
        let seq = Expr::Sequence {
            elements: vec![
                Expr::Literal {
                    value: Literal::Real(1.0),
                },
                Expr::Literal {
                    value: Literal::Boolean(true),
                },
                Expr::Literal { value: Literal::Nothing },
            ],
        };
        assert_eq!(Plain.render(&seq), "[1.0, true, null]");
    }
}
