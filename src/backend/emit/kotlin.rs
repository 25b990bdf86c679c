//! Kotlin harness emitter.

use framejudge_core::lang::conventions::NamingConventions;
use framejudge_core::lang::languages::{self, LanguageId};

use super::expr::ExprSyntax;
use super::strings::quote_kotlin;
use super::unit::SendApi;
use super::{HarnessEmitter, HarnessNames};
use crate::backend::errors::{GenerationError, UnitLabel};
use crate::backend::plan::{HarnessPlan, TestcaseUnit};
use crate::backend::writer::SourceWriter;
use crate::descriptor::{Command, MainInvocation, VarType};

const API: SendApi = SendApi::CAMEL;

/// Name the submission's entry point is compiled under, so it cannot clash with the harness's own `main`.
pub const SOLUTION_MAIN: &str = "solutionMain";

pub struct KotlinEmitter {
    names: HarnessNames,
    out: SourceWriter,
}

struct KotlinSyntax;

impl ExprSyntax for KotlinSyntax {
    fn naming(&self) -> NamingConventions {
        languages::info_for(LanguageId::Kotlin).naming
    }

    fn text(&self, value: &str) -> String {
        quote_kotlin(value)
    }

    fn integer(&self, value: i64) -> String {
        if i32::try_from(value).is_ok() {
            value.to_string()
        } else {
            format!("{value}L")
        }
    }

    fn real(&self, value: f64) -> String {
        if value.is_nan() {
            "Double.NaN".to_string()
        } else if value.is_infinite() {
            let name = if value > 0.0 { "POSITIVE_INFINITY" } else { "NEGATIVE_INFINITY" };
            format!("Double.{name}")
        } else {
            super::strings::real(value)
        }
    }

    fn sequence(&self, elements: &[String]) -> String {
        format!("listOf({})", elements.join(", "))
    }

    fn constructor(&self, class: &str, arguments: &[String]) -> String {
        format!("{}({})", self.naming().class.apply(class), arguments.join(", "))
    }
}

fn kotlin_type(ty: &VarType) -> String {
    match ty {
        VarType::Integer => "Int".to_string(),
        VarType::Real => "Double".to_string(),
        VarType::Text => "String".to_string(),
        VarType::Boolean => "Boolean".to_string(),
        VarType::Sequence(inner) => format!("List<{}>", kotlin_type(inner)),
        VarType::Custom(name) => format!("{name}?"),
    }
}

fn default_value(ty: &VarType) -> &'static str {
    match ty {
        VarType::Integer => "0",
        VarType::Real => "0.0",
        VarType::Text => "\"\"",
        VarType::Boolean => "false",
        VarType::Sequence(_) => "listOf()",
        VarType::Custom(_) => "null",
    }
}

impl KotlinEmitter {
    pub fn new(names: HarnessNames) -> Self {
        let out = SourceWriter::new(names.indent_width);
        Self { names, out }
    }

    fn unit(&mut self, primary: &str, on_success: &str, on_error: &str) {
        self.out.block("try {", "", |w| {
            w.writeln(primary);
            w.writeln(on_success);
        });
        // Failed assertions are errors, not exceptions, on the JVM.
        for caught in ["Exception", "AssertionError"] {
            self.out.block(&format!("}} catch ({}: {caught}) {{", API.error), "", |w| {
                w.writeln(on_error);
            });
        }
        self.out.writeln("}");
    }
}

impl HarnessEmitter for KotlinEmitter {
    fn prologue(&mut self, _plan: &HarnessPlan<'_>) -> Result<(), GenerationError> {
        let class = self.names.context.clone();
        let frame = quote_kotlin(&self.names.frame);

        self.out.writeln("import java.io.PrintWriter");
        self.out.newline();
        self.out.writeln(&format!("class {class} : AutoCloseable {{"));
        self.out.indent();
        self.out.writeln(&format!(
            "private val valueWriter = PrintWriter({})",
            quote_kotlin(&self.names.value_path)
        ));
        self.out.writeln(&format!(
            "private val exceptionWriter = PrintWriter({})",
            quote_kotlin(&self.names.exception_path)
        ));
        self.out.newline();
        self.out.block("private fun writeSeparator() {", "}", |w| {
            for sink in ["valueWriter", "exceptionWriter", "System.out", "System.err"] {
                w.writeln(&format!("{sink}.print({frame})"));
                w.writeln(&format!("{sink}.flush()"));
            }
        });

        let helpers = [
            (API.value, "value: Any?", "Values.send(valueWriter, value)", "valueWriter"),
            (
                API.exception,
                "exception: Throwable?",
                "Values.sendException(exceptionWriter, exception)",
                "exceptionWriter",
            ),
            (
                API.specific_value,
                "result: EvaluationResult",
                "Values.sendEvaluated(valueWriter, result)",
                "valueWriter",
            ),
            (
                API.specific_exception,
                "result: EvaluationResult",
                "Values.sendEvaluated(exceptionWriter, result)",
                "exceptionWriter",
            ),
        ];
        for (name, param, call, writer) in helpers {
            self.out.newline();
            self.out.block(&format!("private fun {name}({param}) {{"), "}", |w| {
                w.writeln(call);
                w.writeln(&format!("{writer}.flush()"));
            });
        }

        self.out.newline();
        self.out.writeln("fun execute() {");
        self.out.indent();
        Ok(())
    }

    fn before(&mut self, code: &str) -> Result<(), GenerationError> {
        self.out.write_raw(code);
        Ok(())
    }

    fn separator(&mut self) -> Result<(), GenerationError> {
        self.out.writeln("this.writeSeparator()");
        Ok(())
    }

    fn main_unit(&mut self, main: &MainInvocation) -> Result<(), GenerationError> {
        let exception = API.exception_code(&main.exception, LanguageId::Kotlin, UnitLabel::Main)?;
        let arguments: Vec<String> = main.arguments.iter().map(|a| quote_kotlin(a)).collect();
        let call = format!("{SOLUTION_MAIN}(arrayOf({}))", arguments.join(", "));
        self.unit(&call, &exception.on_success, &exception.on_error);
        Ok(())
    }

    fn testcase(&mut self, unit: &TestcaseUnit<'_>) -> Result<(), GenerationError> {
        let code = API.testcase_code(unit, LanguageId::Kotlin, &KotlinSyntax)?;
        if let (true, Command::Assignment { variable, ty, .. }) = (unit.declare, unit.command()) {
            self.out.writeln(&format!(
                "var {}: {} = {}",
                KotlinSyntax.identifier(variable),
                kotlin_type(ty),
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
        let class = self.names.context.clone();
        self.out.dedent();
        self.out.writeln("}");
        self.out.newline();
        self.out.block("override fun close() {", "}", |w| {
            w.writeln("valueWriter.close()");
            w.writeln("exceptionWriter.close()");
        });
        self.out.newline();
        self.out.block("companion object {", "}", |w| {
            w.writeln("@JvmStatic");
            w.block("fun main(args: Array<String>) {", "}", |w| {
                w.writeln(&format!("val context = {class}()"));
                w.block("try {", "", |w| w.writeln("context.execute()"));
                w.block("} finally {", "}", |w| w.writeln("context.close()"));
            });
        });
        self.out.dedent();
        self.out.writeln("}");
        Ok(self.out.finish())
    }
}
