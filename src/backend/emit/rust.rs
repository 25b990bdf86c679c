//! Rust harness emitter.
//!
//! Generated Rust harnesses link against `framejudge_runtime` and drive a `ContextHarness` instead of writing the
//! sinks themselves: the runtime owns the separator and the panic boundary, the harness only supplies closures.
//! The file is built as a token tree, parsed back with `syn` and pretty-printed with `prettyplease`, so a harness
//! that does not parse is reported here rather than by the compiler on the judge.
//!
//! Conventions the submission must follow:
//! - its entry point is `pub fn main(args: &[&str])`;
//! - class-typed variables need `Default` (they are declared before their first assignment);
//! - values sent to the builtin oracle need `serde::Serialize`.

use std::collections::BTreeSet;

use framejudge_core::lang::conventions::NamingCase;
use framejudge_core::lang::languages::LanguageId;
use framejudge_core::lang::rust_keywords;
use proc_macro2::{Ident, Literal as TokenLiteral, Span, TokenStream};
use quote::quote;

use super::unit::{evaluator_for, evaluator_namespaces};
use super::{HarnessEmitter, HarnessNames};
use crate::backend::errors::{GenerationError, UnitLabel};
use crate::backend::plan::{HarnessPlan, TestcaseUnit};
use crate::descriptor::{
    BinaryOp, CallKind, Command, Evaluator, ExceptionChannel, Expr, Literal, MainInvocation, ValueChannel, VarType,
};

pub struct RustEmitter {
    names: HarnessNames,
    namespaces: BTreeSet<String>,
    body: Vec<TokenStream>,
    separators: usize,
    entered_after: bool,
}

/// Build an identifier, escaping keywords as raw identifiers.
fn ident(name: &str) -> Result<Ident, GenerationError> {
    if rust_keywords::is_unusable(name) {
        return Err(GenerationError::ReservedIdentifier {
            language: LanguageId::Rust,
            name: name.to_string(),
        });
    }
    if rust_keywords::is_keyword(name) {
        Ok(Ident::new_raw(name, Span::call_site()))
    } else {
        Ok(Ident::new(name, Span::call_site()))
    }
}

fn cased(case: NamingCase, name: &str) -> Result<Ident, GenerationError> {
    ident(&case.apply(name))
}

fn raw_code(code: &str, location: &'static str) -> Result<TokenStream, GenerationError> {
    code.parse::<TokenStream>().map_err(|e| GenerationError::RawCode {
        language: LanguageId::Rust,
        location,
        message: e.to_string(),
    })
}

fn rust_type(ty: &VarType) -> Result<TokenStream, GenerationError> {
    Ok(match ty {
        VarType::Integer => quote!(i64),
        VarType::Real => quote!(f64),
        VarType::Text => quote!(String),
        VarType::Boolean => quote!(bool),
        VarType::Sequence(inner) => {
            let inner = rust_type(inner)?;
            quote!(Vec<#inner>)
        }
        VarType::Custom(name) => {
            let name = ident(name)?;
            quote!(#name)
        }
    })
}

fn evaluator_path(evaluator: &Evaluator) -> Result<TokenStream, GenerationError> {
    let name = ident(&evaluator.name)?;
    Ok(match &evaluator.namespace {
        Some(ns) => {
            let ns = ident(ns)?;
            quote!(#ns::#name)
        }
        None => quote!(#name),
    })
}

/// Where an expression appears; identifiers are cloned unless they are a method receiver.
#[derive(Clone, Copy, PartialEq, Eq)]
enum Position {
    Operand,
    Receiver,
    Element,
}

fn expr_tokens(expr: &Expr, position: Position) -> Result<TokenStream, GenerationError> {
    let naming = framejudge_core::lang::languages::info_for(LanguageId::Rust).naming;
    Ok(match expr {
        Expr::Literal { value } => literal_tokens(value, position),
        Expr::Identifier { name } => {
            let name = cased(naming.identifier, name)?;
            if position == Position::Receiver {
                quote!(#name)
            } else {
                quote!(#name.clone())
            }
        }
        Expr::Call {
            call,
            namespace,
            name,
            arguments,
        } => {
            let arguments = arguments
                .iter()
                .map(|a| expr_tokens(a, Position::Operand))
                .collect::<Result<Vec<_>, _>>()?;
            match (call, namespace.as_deref()) {
                (CallKind::Constructor, _) => {
                    let class = cased(naming.class, name)?;
                    quote!(#class::new(#(#arguments),*))
                }
                (CallKind::Property, Some(receiver)) => {
                    let receiver = expr_tokens(receiver, Position::Receiver)?;
                    let field = cased(naming.property, name)?;
                    quote!(#receiver.#field)
                }
                (CallKind::Function | CallKind::Method, Some(receiver)) => {
                    let receiver = expr_tokens(receiver, Position::Receiver)?;
                    let method = cased(naming.function, name)?;
                    quote!(#receiver.#method(#(#arguments),*))
                }
                (CallKind::Property, None) => {
                    let field = cased(naming.identifier, name)?;
                    quote!(#field)
                }
                (CallKind::Function | CallKind::Method, None) => {
                    let function = cased(naming.function, name)?;
                    quote!(#function(#(#arguments),*))
                }
            }
        }
        Expr::Binary { op, left, right } => {
            let left = expr_tokens(left, Position::Operand)?;
            let right = expr_tokens(right, Position::Operand)?;
            let op = match op {
                BinaryOp::Add => quote!(+),
                BinaryOp::Sub => quote!(-),
                BinaryOp::Mul => quote!(*),
                BinaryOp::Div => quote!(/),
            };
            quote!((#left #op #right))
        }
        Expr::Sequence { elements } => {
            let elements = elements
                .iter()
                .map(|e| expr_tokens(e, Position::Element))
                .collect::<Result<Vec<_>, _>>()?;
            quote!(vec![#(#elements),*])
        }
    })
}

fn literal_tokens(value: &Literal, position: Position) -> TokenStream {
    match value {
        Literal::Integer(v) if *v == i64::MIN => quote!(i64::MIN),
        Literal::Integer(v) if *v < 0 => {
            let magnitude = TokenLiteral::u64_unsuffixed(v.unsigned_abs());
            quote!((-#magnitude))
        }
        Literal::Integer(v) => {
            let v = TokenLiteral::i64_unsuffixed(*v);
            quote!(#v)
        }
        Literal::Real(v) if v.is_nan() => quote!(f64::NAN),
        Literal::Real(v) if v.is_infinite() && *v > 0.0 => quote!(f64::INFINITY),
        Literal::Real(v) if v.is_infinite() => quote!(f64::NEG_INFINITY),
        Literal::Real(v) if v.is_sign_negative() && *v != 0.0 => {
            let magnitude = TokenLiteral::f64_unsuffixed(v.abs());
            quote!((-#magnitude))
        }
        Literal::Real(v) => {
            let v = TokenLiteral::f64_unsuffixed(v.abs());
            quote!(#v)
        }
        // Sequence elements are owned so `vec!["a"]` fits a `Vec<String>`.
        Literal::Text(s) if position == Position::Element => {
            let s = TokenLiteral::string(s);
            quote!(String::from(#s))
        }
        Literal::Text(s) => {
            let s = TokenLiteral::string(s);
            quote!(#s)
        }
        Literal::Boolean(true) => quote!(true),
        Literal::Boolean(false) => quote!(false),
        Literal::Nothing => quote!(()),
    }
}

fn exception_tokens(
    channel: &ExceptionChannel,
    unit: UnitLabel,
) -> Result<TokenStream, GenerationError> {
    match channel {
        ExceptionChannel::Builtin => Ok(quote!(ExceptionStatement::Builtin)),
        ExceptionChannel::Specific { evaluators } => {
            let evaluator = evaluator_for(evaluators, LanguageId::Rust).ok_or(GenerationError::MissingEvaluator {
                language: LanguageId::Rust,
                unit,
            })?;
            let path = evaluator_path(evaluator)?;
            Ok(quote!(ExceptionStatement::specific(|error| #path(error))))
        }
    }
}

impl RustEmitter {
    pub fn new(names: HarnessNames) -> Self {
        Self {
            names,
            namespaces: BTreeSet::new(),
            body: Vec::new(),
            separators: 0,
            entered_after: false,
        }
    }

    fn enter_after(&mut self) {
        if !self.entered_after {
            self.body.push(quote!(harness.enter_after()?;));
            self.entered_after = true;
        }
    }
}

impl HarnessEmitter for RustEmitter {
    fn prologue(&mut self, plan: &HarnessPlan<'_>) -> Result<(), GenerationError> {
        self.namespaces = evaluator_namespaces(plan);
        Ok(())
    }

    fn before(&mut self, code: &str) -> Result<(), GenerationError> {
        let code = raw_code(code, "before-code")?;
        self.body.push(code);
        Ok(())
    }

    /// The first separator closes the before-code; every later one is written by `execute_testcase`.
    fn separator(&mut self) -> Result<(), GenerationError> {
        if self.separators == 0 {
            self.body.push(quote!(harness.finish_before()?;));
        }
        self.separators += 1;
        Ok(())
    }

    fn main_unit(&mut self, main: &MainInvocation) -> Result<(), GenerationError> {
        let submission = ident(&self.names.submission)?;
        let arguments = main.arguments.iter().map(|a| TokenLiteral::string(a));
        let exception = exception_tokens(&main.exception, UnitLabel::Main)?;
        self.body.push(quote! {
            harness.execute_main(
                || {
                    #submission::main(&[#(#arguments),*]);
                },
                #exception,
            )?;
        });
        Ok(())
    }

    fn testcase(&mut self, unit: &TestcaseUnit<'_>) -> Result<(), GenerationError> {
        let label = UnitLabel::Testcase(unit.index);
        let naming = framejudge_core::lang::languages::info_for(LanguageId::Rust).naming;
        let expression = expr_tokens(unit.command().expression(), Position::Operand)?;

        let statement = match (unit.command(), &unit.value) {
            (Command::Assignment { variable, ty, .. }, _) => {
                let variable = cased(naming.identifier, variable)?;
                if unit.declare {
                    let ty = rust_type(ty)?;
                    self.body.push(quote!(let mut #variable: #ty = Default::default();));
                }
                quote! {
                    || {
                        #variable = (#expression).into();
                        Outcome::Nothing
                    }
                }
            }
            (Command::Expression { .. }, ValueChannel::Ignored) => quote! {
                || {
                    let _ = #expression;
                    Outcome::Nothing
                }
            },
            (Command::Expression { .. }, ValueChannel::Value) => quote!(|| Outcome::value(&(#expression))),
            (Command::Expression { .. }, ValueChannel::Specific { evaluators }) => {
                let evaluator = evaluator_for(evaluators, LanguageId::Rust).ok_or(GenerationError::MissingEvaluator {
                    language: LanguageId::Rust,
                    unit: label,
                })?;
                let path = evaluator_path(evaluator)?;
                quote!(|| Outcome::evaluated(#path(#expression)))
            }
        };
        let exception = exception_tokens(unit.exception(), label)?;
        self.body.push(quote! {
            harness.execute_testcase(#statement, #exception)?;
        });
        Ok(())
    }

    fn after(&mut self, code: &str) -> Result<(), GenerationError> {
        let code = raw_code(code, "after-code")?;
        self.enter_after();
        self.body.push(code);
        Ok(())
    }

    fn finish(mut self: Box<Self>) -> Result<String, GenerationError> {
        self.enter_after();
        let submission = ident(&self.names.submission)?;
        let namespaces = self
            .namespaces
            .iter()
            .map(|ns| ident(ns))
            .collect::<Result<Vec<_>, _>>()?;
        let value_path = TokenLiteral::string(&self.names.value_path);
        let exception_path = TokenLiteral::string(&self.names.exception_path);
        let token = TokenLiteral::string(&self.names.token);
        let body = &self.body;

        let file = quote! {
            #![allow(
                unused_mut,
                unused_variables,
                unused_imports,
                unused_assignments,
                unconditional_panic,
                arithmetic_overflow
            )]

            mod #submission;
            #(mod #namespaces;)*

            use framejudge_runtime::prelude::*;
            use #submission::*;

            fn main() -> Result<(), HarnessError> {
                let channels = ChannelSet::open_files(#value_path, #exception_path)?;
                let mut harness = ContextHarness::new(#token, channels)?;
                #(#body)*
                harness.close()
            }
        };
        let parsed = syn::parse2::<syn::File>(file).map_err(|e| GenerationError::SynParse(e.to_string()))?;
        Ok(prettyplease::unparse(&parsed))
    }
}
