//! Python harness emitter.
//!
//! The harness is a flat script. Sinks are opened at module level and everything that runs user code sits in one
//! module-level `try`/`finally` that closes them, so a fatal error still leaves the value files complete.

use framejudge_core::lang::conventions::NamingConventions;
use framejudge_core::lang::languages::{self, LanguageId};

use super::expr::ExprSyntax;
use super::strings::{quote_json, real};
use super::unit::{SendApi, evaluator_namespaces};
use super::{HarnessEmitter, HarnessNames};
use crate::backend::errors::{GenerationError, UnitLabel};
use crate::backend::plan::{HarnessPlan, TestcaseUnit};
use crate::backend::writer::SourceWriter;
use crate::descriptor::{Command, MainInvocation, VarType};

const API: SendApi = SendApi::SNAKE;

pub struct PythonEmitter {
    names: HarnessNames,
    out: SourceWriter,
}

struct PythonSyntax;

impl ExprSyntax for PythonSyntax {
    fn naming(&self) -> NamingConventions {
        languages::info_for(LanguageId::Python).naming
    }

    fn real(&self, value: f64) -> String {
        if value.is_nan() {
            "float(\"nan\")".to_string()
        } else if value.is_infinite() {
            let sign = if value > 0.0 { "" } else { "-" };
            format!("float(\"{sign}inf\")")
        } else {
            real(value)
        }
    }

    fn boolean(&self, value: bool) -> String {
        let literal = if value { "True" } else { "False" };
        literal.to_string()
    }

    fn nothing(&self) -> String {
        "None".to_string()
    }

    fn constructor(&self, class: &str, arguments: &[String]) -> String {
        format!("{}({})", self.naming().class.apply(class), arguments.join(", "))
    }
}

fn default_value(ty: &VarType) -> &'static str {
    match ty {
        VarType::Integer => "0",
        VarType::Real => "0.0",
        VarType::Text => "\"\"",
        VarType::Boolean => "False",
        VarType::Sequence(_) => "[]",
        VarType::Custom(_) => "None",
    }
}

impl PythonEmitter {
    pub fn new(names: HarnessNames) -> Self {
        let out = SourceWriter::new(names.indent_width);
        Self { names, out }
    }

    fn import_submission(&mut self) {
        self.out.writeln(&format!("from {} import *", self.names.submission));
    }
}

impl HarnessEmitter for PythonEmitter {
    fn prologue(&mut self, plan: &HarnessPlan<'_>) -> Result<(), GenerationError> {
        self.out.writeln("import sys");
        self.out.writeln("import values");
        for ns in evaluator_namespaces(plan) {
            self.out.writeln(&format!("import {ns}"));
        }
        self.out.newline();
        self.out.writeln(&format!(
            "value_file = open({}, \"w\")",
            quote_json(&self.names.value_path)
        ));
        self.out.writeln(&format!(
            "exception_file = open({}, \"w\")",
            quote_json(&self.names.exception_path)
        ));
        self.out.blank_lines(2);

        let frame = quote_json(&self.names.frame);
        self.out.block("def write_separator():", "", |w| {
            for sink in ["value_file", "exception_file", "sys.stdout", "sys.stderr"] {
                w.writeln(&format!("{sink}.write({frame})"));
                w.writeln(&format!("{sink}.flush()"));
            }
        });
        self.out.blank_lines(2);

        let helpers = [
            (API.value, "value", "values.send_value", "value_file"),
            (API.exception, "exception", "values.send_exception", "exception_file"),
            (API.specific_value, "value", "values.send_evaluated", "value_file"),
            (API.specific_exception, "exception", "values.send_evaluated", "exception_file"),
        ];
        for (name, param, target, file) in helpers {
            self.out.block(&format!("def {name}({param}):"), "", |w| {
                w.writeln(&format!("{target}({file}, {param})"));
                w.writeln(&format!("{file}.flush()"));
            });
            self.out.blank_lines(2);
        }

        self.out.writeln("try:");
        self.out.indent();
        if !plan.has_main() {
            self.import_submission();
        }
        Ok(())
    }

    fn before(&mut self, code: &str) -> Result<(), GenerationError> {
        self.out.write_raw(code);
        Ok(())
    }

    fn separator(&mut self) -> Result<(), GenerationError> {
        self.out.writeln("write_separator()");
        Ok(())
    }

    fn main_unit(&mut self, main: &MainInvocation) -> Result<(), GenerationError> {
        let exception = API.exception_code(&main.exception, LanguageId::Python, UnitLabel::Main)?;
        let mut argv = vec![quote_json(&self.names.submission)];
        argv.extend(main.arguments.iter().map(|a| quote_json(a)));
        self.out.writeln(&format!("sys.argv = [{}]", argv.join(", ")));
        let import = format!("from {} import *", self.names.submission);
        // Importing the submission runs its top-level code, which is the main invocation.
        self.out.block("try:", "", |w| {
            w.writeln(&import);
            w.writeln(&exception.on_success);
        });
        self.out.block(&format!("except Exception as {}:", API.error), "", |w| {
            w.writeln(&exception.on_error);
        });
        Ok(())
    }

    fn testcase(&mut self, unit: &TestcaseUnit<'_>) -> Result<(), GenerationError> {
        let code = API.testcase_code(unit, LanguageId::Python, &PythonSyntax)?;
        if let (true, Command::Assignment { variable, ty, .. }) = (unit.declare, unit.command()) {
            self.out
                .writeln(&format!("{} = {}", PythonSyntax.identifier(variable), default_value(ty)));
        }
        self.out.block("try:", "", |w| {
            w.writeln(&code.primary);
            w.writeln(&code.exception.on_success);
        });
        self.out.block(&format!("except Exception as {}:", API.error), "", |w| {
            w.writeln(&code.exception.on_error);
        });
        Ok(())
    }

    fn after(&mut self, code: &str) -> Result<(), GenerationError> {
        self.out.write_raw(code);
        Ok(())
    }

    fn finish(mut self: Box<Self>) -> Result<String, GenerationError> {
        self.out.dedent();
        self.out.block("finally:", "", |w| {
            w.writeln("value_file.close()");
            w.writeln("exception_file.close()");
        });
        Ok(self.out.finish())
    }
}
