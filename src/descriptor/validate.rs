//! Structural validation of descriptors.
//!
//! Validation runs before any harness is generated and reports every problem it finds, not just the first one.
//! Names are checked against a conservative identifier grammar so descriptor data can never smuggle code into a
//! generated harness.

use std::collections::HashMap;

use framejudge_core::lang::languages::{self, LanguageId};
use miette::Diagnostic;
use thiserror::Error;

use super::{CallKind, Command, Context, Evaluator, ExceptionChannel, Expr, ValueChannel, VarType};

/// One validation problem.
#[derive(Debug, Clone, PartialEq, Eq, Error, Diagnostic)]
pub enum DescriptorError {
    #[error("the context has neither a main invocation nor testcases")]
    #[diagnostic(code(framejudge::descriptor::empty), help("add a `main` object or at least one testcase"))]
    EmptyContext,

    #[error("testcase {testcase} is an assignment and cannot have a value output")]
    #[diagnostic(
        code(framejudge::descriptor::assignment_value),
        help("only expressions produce a value; drop the `value` channel or set it to `ignored`")
    )]
    ValueOnAssignment { testcase: usize },

    #[error("testcase {testcase}: `{name}` is not a valid identifier")]
    #[diagnostic(code(framejudge::descriptor::identifier))]
    InvalidIdentifier { testcase: usize, name: String },

    #[error("testcase {testcase}: {call} `{name}` needs a namespace expression")]
    #[diagnostic(code(framejudge::descriptor::namespace))]
    MissingNamespace {
        testcase: usize,
        call: &'static str,
        name: String,
    },

    #[error("testcase {testcase}: constructor `{name}` cannot have a namespace")]
    #[diagnostic(code(framejudge::descriptor::namespace))]
    NamespacedConstructor { testcase: usize, name: String },

    #[error("testcase {testcase}: property `{name}` cannot take arguments")]
    #[diagnostic(code(framejudge::descriptor::property_arguments))]
    PropertyWithArguments { testcase: usize, name: String },

    #[error("unknown language `{spelling}` in {location}")]
    #[diagnostic(
        code(framejudge::descriptor::language),
        help("run `framejudge languages` to list the supported spellings")
    )]
    UnknownLanguage { spelling: String, location: String },

    #[error("evaluator `{name}` for {language} is declared with different namespaces")]
    #[diagnostic(
        code(framejudge::descriptor::evaluator),
        help("evaluator function names must be unique per language within a context")
    )]
    ConflictingEvaluator { language: LanguageId, name: String },

    #[error("testcase {testcase}: variable `{variable}` was already declared with another type")]
    #[diagnostic(code(framejudge::descriptor::retyped))]
    RetypedVariable { testcase: usize, variable: String },
}

/// All problems found in one descriptor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DescriptorErrors(pub Vec<DescriptorError>);

impl DescriptorErrors {
    pub fn from_vec(errors: Vec<DescriptorError>) -> Option<Self> {
        if errors.is_empty() { None } else { Some(Self(errors)) }
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &DescriptorError> {
        self.0.iter()
    }
}

impl std::fmt::Display for DescriptorErrors {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.0.len() == 1 {
            write!(f, "{}", self.0[0])
        } else {
            writeln!(f, "{} descriptor errors:", self.0.len())?;
            for (i, err) in self.0.iter().enumerate() {
                writeln!(f, "  {}: {}", i + 1, err)?;
            }
            Ok(())
        }
    }
}

impl std::error::Error for DescriptorErrors {}

/// Check whether `name` is usable as an identifier in every target language.
pub fn is_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => chars.all(|c| c.is_ascii_alphanumeric() || c == '_'),
        _ => false,
    }
}

/// Validate a descriptor.
pub fn validate(context: &Context) -> Result<(), DescriptorErrors> {
    let mut errors = Vec::new();

    if context.main.is_none() && context.testcases.is_empty() {
        errors.push(DescriptorError::EmptyContext);
    }

    for spelling in context.before.keys() {
        check_language(spelling, "before-code", &mut errors);
    }
    for spelling in context.after.keys() {
        check_language(spelling, "after-code", &mut errors);
    }

    let mut evaluators: HashMap<(LanguageId, &str), Option<&str>> = HashMap::new();
    let mut variables: HashMap<&str, &VarType> = HashMap::new();

    if let Some(main) = &context.main {
        check_exception_channel(&main.exception, 0, &mut evaluators, &mut errors);
    }

    for (index, testcase) in context.testcases.iter().enumerate() {
        if let Command::Assignment { variable, ty, .. } = &testcase.command {
            if !matches!(testcase.value, None | Some(ValueChannel::Ignored)) {
                errors.push(DescriptorError::ValueOnAssignment { testcase: index });
            }
            check_identifier(variable, index, &mut errors);
            check_type(ty, index, &mut errors);
            if let Some(previous) = variables.insert(variable.as_str(), ty) {
                if previous != ty {
                    errors.push(DescriptorError::RetypedVariable {
                        testcase: index,
                        variable: variable.clone(),
                    });
                }
            }
        }

        testcase
            .command
            .expression()
            .walk(&mut |expr| check_expr(expr, index, &mut errors));

        if let Some(ValueChannel::Specific { evaluators: map }) = &testcase.value {
            check_evaluators(map, index, &mut evaluators, &mut errors);
        }
        check_exception_channel(&testcase.exception, index, &mut evaluators, &mut errors);
    }

    match DescriptorErrors::from_vec(errors) {
        Some(errors) => Err(errors),
        None => Ok(()),
    }
}

fn check_language(spelling: &str, location: &str, errors: &mut Vec<DescriptorError>) -> Option<LanguageId> {
    let id = languages::from_str(spelling);
    if id.is_none() {
        errors.push(DescriptorError::UnknownLanguage {
            spelling: spelling.to_string(),
            location: location.to_string(),
        });
    }
    id
}

fn check_identifier(name: &str, testcase: usize, errors: &mut Vec<DescriptorError>) {
    if !is_identifier(name) {
        errors.push(DescriptorError::InvalidIdentifier {
            testcase,
            name: name.to_string(),
        });
    }
}

fn check_type(ty: &VarType, testcase: usize, errors: &mut Vec<DescriptorError>) {
    match ty {
        VarType::Sequence(inner) => check_type(inner, testcase, errors),
        VarType::Custom(name) => check_identifier(name, testcase, errors),
        VarType::Integer | VarType::Real | VarType::Text | VarType::Boolean => {}
    }
}

fn check_expr(expr: &Expr, testcase: usize, errors: &mut Vec<DescriptorError>) {
    match expr {
        Expr::Identifier { name } => check_identifier(name, testcase, errors),
        Expr::Call {
            call,
            namespace,
            name,
            arguments,
        } => {
            check_identifier(name, testcase, errors);
            match call {
                CallKind::Method | CallKind::Property if namespace.is_none() => {
                    errors.push(DescriptorError::MissingNamespace {
                        testcase,
                        call: if *call == CallKind::Method { "method" } else { "property" },
                        name: name.clone(),
                    });
                }
                CallKind::Constructor if namespace.is_some() => {
                    errors.push(DescriptorError::NamespacedConstructor {
                        testcase,
                        name: name.clone(),
                    });
                }
                _ => {}
            }
            if *call == CallKind::Property && !arguments.is_empty() {
                errors.push(DescriptorError::PropertyWithArguments {
                    testcase,
                    name: name.clone(),
                });
            }
        }
        Expr::Literal { .. } | Expr::Binary { .. } | Expr::Sequence { .. } => {}
    }
}

fn check_exception_channel<'a>(
    channel: &'a ExceptionChannel,
    testcase: usize,
    seen: &mut HashMap<(LanguageId, &'a str), Option<&'a str>>,
    errors: &mut Vec<DescriptorError>,
) {
    if let ExceptionChannel::Specific { evaluators } = channel {
        check_evaluators(evaluators, testcase, seen, errors);
    }
}

fn check_evaluators<'a>(
    evaluators: &'a std::collections::BTreeMap<String, Evaluator>,
    testcase: usize,
    seen: &mut HashMap<(LanguageId, &'a str), Option<&'a str>>,
    errors: &mut Vec<DescriptorError>,
) {
    for (spelling, evaluator) in evaluators {
        check_identifier(&evaluator.name, testcase, errors);
        if let Some(ns) = &evaluator.namespace {
            check_identifier(ns, testcase, errors);
        }
        let Some(language) = check_language(spelling, "an evaluator map", errors) else {
            continue;
        };
        let namespace = evaluator.namespace.as_deref();
        match seen.get(&(language, evaluator.name.as_str())) {
            Some(previous) if *previous != namespace => errors.push(DescriptorError::ConflictingEvaluator {
                language,
                name: evaluator.name.clone(),
            }),
            Some(_) => {}
            None => {
                seen.insert((language, evaluator.name.as_str()), namespace);
            }
        }
    }
}
