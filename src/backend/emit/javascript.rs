//! JavaScript and TypeScript harness emitter.
//!
//! Both languages share one emitter; TypeScript only adds type annotations. Sinks are raw file descriptors written
//! with `fs.writeSync`, which does not buffer, so a frame is on disk as soon as the call returns.

use framejudge_core::lang::conventions::NamingConventions;
use framejudge_core::lang::languages::{self, LanguageId};

use super::expr::ExprSyntax;
use super::strings::quote_json;
use super::unit::{SendApi, evaluator_namespaces};
use super::{HarnessEmitter, HarnessNames};
use crate::backend::errors::{GenerationError, UnitLabel};
use crate::backend::plan::{HarnessPlan, TestcaseUnit};
use crate::backend::writer::SourceWriter;
use crate::descriptor::{Command, MainInvocation, VarType};

const API: SendApi = SendApi::CAMEL;

pub struct JavaScriptEmitter {
    names: HarnessNames,
    out: SourceWriter,
    typed: bool,
    syntax: JsSyntax,
}

struct JsSyntax {
    language: LanguageId,
    submission: String,
}

impl ExprSyntax for JsSyntax {
    fn naming(&self) -> NamingConventions {
        languages::info_for(self.language).naming
    }

    fn submission(&self) -> Option<&str> {
        Some(&self.submission)
    }

    fn real(&self, value: f64) -> String {
        if value.is_nan() {
            "NaN".to_string()
        } else if value.is_infinite() {
            let sign = if value > 0.0 { "" } else { "-" };
            format!("{sign}Infinity")
        } else {
            super::strings::real(value)
        }
    }

    fn constructor(&self, class: &str, arguments: &[String]) -> String {
        format!(
            "new {}.{}({})",
            self.submission,
            self.naming().class.apply(class),
            arguments.join(", ")
        )
    }
}

fn ts_type(ty: &VarType) -> String {
    match ty {
        VarType::Integer | VarType::Real => "number".to_string(),
        VarType::Text => "string".to_string(),
        VarType::Boolean => "boolean".to_string(),
        VarType::Sequence(inner) => format!("Array<{}>", ts_type(inner)),
        VarType::Custom(_) => "any".to_string(),
    }
}

fn default_value(ty: &VarType) -> &'static str {
    match ty {
        VarType::Integer => "0",
        VarType::Real => "0.0",
        VarType::Text => "\"\"",
        VarType::Boolean => "false",
        VarType::Sequence(_) => "[]",
        VarType::Custom(_) => "null",
    }
}

impl JavaScriptEmitter {
    /// Create an emitter; `typed` selects TypeScript.
    pub fn new(names: HarnessNames, typed: bool) -> Self {
        let out = SourceWriter::new(names.indent_width);
        let syntax = JsSyntax {
            language: if typed { LanguageId::TypeScript } else { LanguageId::JavaScript },
            submission: names.submission.clone(),
        };
        Self {
            names,
            out,
            typed,
            syntax,
        }
    }

    fn annotate(&self, ty: &str) -> String {
        if self.typed { format!(": {ty}") } else { String::new() }
    }

    fn require(&self, module: &str) -> String {
        quote_json(&format!("./{module}.js"))
    }

    fn unit(&mut self, primary: &str, on_success: &str, on_error: &str) {
        let binding = format!("{}{}", API.error, self.annotate("any"));
        self.out.block("try {", "", |w| {
            w.writeln(&format!("{primary};"));
            w.writeln(&format!("{on_success};"));
        });
        self.out.block(&format!("}} catch ({binding}) {{"), "}", |w| {
            w.writeln(&format!("{on_error};"));
        });
    }
}

impl HarnessEmitter for JavaScriptEmitter {
    fn prologue(&mut self, plan: &HarnessPlan<'_>) -> Result<(), GenerationError> {
        let frame = quote_json(&self.names.frame);
        let unknown = self.annotate("unknown");

        self.out.writeln("const fs = require(\"fs\");");
        self.out.writeln(&format!("const values = require({});", self.require("values")));
        for ns in evaluator_namespaces(plan) {
            self.out.writeln(&format!("const {ns} = require({});", self.require(&ns)));
        }
        self.out.newline();
        self.out.writeln(&format!(
            "const valueFile = fs.openSync({}, \"w\");",
            quote_json(&self.names.value_path)
        ));
        self.out.writeln(&format!(
            "const exceptionFile = fs.openSync({}, \"w\");",
            quote_json(&self.names.exception_path)
        ));
        self.out.newline();
        self.out.block("function writeSeparator() {", "}", |w| {
            for fd in ["valueFile", "exceptionFile", "process.stdout.fd", "process.stderr.fd"] {
                w.writeln(&format!("fs.writeSync({fd}, {frame});"));
            }
        });

        let helpers = [
            (API.value, "value", "values.sendValue(valueFile, value)"),
            (API.exception, "exception", "values.sendException(exceptionFile, exception)"),
            (API.specific_value, "result", "values.sendEvaluated(valueFile, result)"),
            (API.specific_exception, "result", "values.sendEvaluated(exceptionFile, result)"),
        ];
        for (name, param, call) in helpers {
            let param = format!("{param}{unknown}");
            self.out.newline();
            self.out.block(&format!("function {name}({param}) {{"), "}", |w| {
                w.writeln(&format!("{call};"));
            });
        }

        self.out.newline();
        if plan.has_main() {
            self.out
                .writeln(&format!("let {}{} = {{}};", self.names.submission, self.annotate("any")));
        } else {
            self.out.writeln(&format!(
                "const {} = require({});",
                self.names.submission,
                self.require(&self.names.submission)
            ));
        }
        self.out.writeln("try {");
        self.out.indent();
        Ok(())
    }

    fn before(&mut self, code: &str) -> Result<(), GenerationError> {
        self.out.write_raw(code);
        Ok(())
    }

    fn separator(&mut self) -> Result<(), GenerationError> {
        self.out.writeln("writeSeparator();");
        Ok(())
    }

    fn main_unit(&mut self, main: &MainInvocation) -> Result<(), GenerationError> {
        let language = self.syntax.language;
        let exception = API.exception_code(&main.exception, language, UnitLabel::Main)?;
        let mut argv = vec!["process.argv[0]".to_string(), self.require(&self.names.submission)];
        argv.extend(main.arguments.iter().map(|a| quote_json(a)));
        self.out.writeln(&format!("process.argv = [{}];", argv.join(", ")));
        // Loading the module runs its top-level code, which is the main invocation.
        let load = format!(
            "{} = require({})",
            self.names.submission,
            self.require(&self.names.submission)
        );
        self.unit(&load, &exception.on_success, &exception.on_error);
        Ok(())
    }

    fn testcase(&mut self, unit: &TestcaseUnit<'_>) -> Result<(), GenerationError> {
        let code = API.testcase_code(unit, self.syntax.language, &self.syntax)?;
        if let (true, Command::Assignment { variable, ty, .. }) = (unit.declare, unit.command()) {
            self.out.writeln(&format!(
                "let {}{} = {};",
                self.syntax.identifier(variable),
                self.annotate(&ts_type(ty)),
                default_value(ty)
            ));
        }
        self.unit(&code.primary, &code.exception.on_success, &code.exception.on_error);
        Ok(())
    }

    fn after(&mut self, code: &str) -> Result<(), GenerationError> {
        self.out.write_raw(code);
        Ok(())
    }

    fn finish(mut self: Box<Self>) -> Result<String, GenerationError> {
        self.out.dedent();
        self.out.block("} finally {", "}", |w| {
            w.writeln("fs.closeSync(valueFile);");
            w.writeln("fs.closeSync(exceptionFile);");
        });
        Ok(self.out.finish())
    }
}
