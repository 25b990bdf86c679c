//! Java harness emitter.
//!
//! Each context is a class implementing `Closeable`. Contexts of one run are compiled together and a selector
//! dispatches to a context's `main` by name, so nothing here may clash between contexts except the class name.

use framejudge_core::lang::conventions::NamingConventions;
use framejudge_core::lang::languages::{self, LanguageId};

use super::expr::ExprSyntax;
use super::strings::quote_json;
use super::unit::SendApi;
use super::{HarnessEmitter, HarnessNames};
use crate::backend::errors::{GenerationError, UnitLabel};
use crate::backend::plan::{HarnessPlan, TestcaseUnit};
use crate::backend::writer::SourceWriter;
use crate::descriptor::{Command, MainInvocation, VarType};

const API: SendApi = SendApi::CAMEL;

pub struct JavaEmitter {
    names: HarnessNames,
    out: SourceWriter,
    syntax: JavaSyntax,
}

struct JavaSyntax {
    submission: String,
}

impl ExprSyntax for JavaSyntax {
    fn naming(&self) -> NamingConventions {
        languages::info_for(LanguageId::Java).naming
    }

    fn submission(&self) -> Option<&str> {
        Some(&self.submission)
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
        format!("List.of({})", elements.join(", "))
    }
}

/// Spell `ty` as a Java type; `boxed` selects the reference type for generic arguments.
fn java_type(ty: &VarType, boxed: bool) -> String {
    match (ty, boxed) {
        (VarType::Integer, false) => "int".to_string(),
        (VarType::Integer, true) => "Integer".to_string(),
        (VarType::Real, false) => "double".to_string(),
        (VarType::Real, true) => "Double".to_string(),
        (VarType::Boolean, false) => "boolean".to_string(),
        (VarType::Boolean, true) => "Boolean".to_string(),
        (VarType::Text, _) => "String".to_string(),
        (VarType::Sequence(inner), _) => format!("List<{}>", java_type(inner, true)),
        (VarType::Custom(name), _) => name.clone(),
    }
}

fn default_value(ty: &VarType) -> &'static str {
    match ty {
        VarType::Integer => "0",
        VarType::Real => "0.0",
        VarType::Text => "\"\"",
        VarType::Boolean => "false",
        VarType::Sequence(_) => "new ArrayList<>()",
        VarType::Custom(_) => "null",
    }
}

impl JavaEmitter {
    pub fn new(names: HarnessNames) -> Self {
        let out = SourceWriter::new(names.indent_width);
        let syntax = JavaSyntax {
            submission: names.submission.clone(),
        };
        Self { names, out, syntax }
    }

    fn unit(&mut self, primary: &str, on_success: &str, on_error: &str) {
        self.out.block("try {", "", |w| {
            w.writeln(&format!("{primary};"));
            w.writeln(&format!("{on_success};"));
        });
        self.out.block(
            &format!("}} catch (Exception | AssertionError {}) {{", API.error),
            "}",
            |w| w.writeln(&format!("{on_error};")),
        );
    }
}

impl HarnessEmitter for JavaEmitter {
    fn prologue(&mut self, _plan: &HarnessPlan<'_>) -> Result<(), GenerationError> {
        let class = self.names.context.clone();
        let value_path = quote_json(&self.names.value_path);
        let exception_path = quote_json(&self.names.exception_path);
        let frame = quote_json(&self.names.frame);

        self.out.writeln("import java.io.*;");
        self.out.writeln("import java.util.*;");
        self.out.newline();
        self.out.writeln(&format!("public class {class} implements Closeable {{"));
        self.out.indent();
        self.out.writeln("private final PrintWriter valueWriter;");
        self.out.writeln("private final PrintWriter exceptionWriter;");
        self.out.newline();
        self.out.block(&format!("public {class}() throws Exception {{"), "}", |w| {
            w.writeln(&format!("this.valueWriter = new PrintWriter({value_path});"));
            w.writeln(&format!("this.exceptionWriter = new PrintWriter({exception_path});"));
        });
        self.out.newline();
        self.out.block("private void writeSeparator() {", "}", |w| {
            for (sink, write) in [
                ("valueWriter", "write"),
                ("exceptionWriter", "write"),
                ("System.out", "print"),
                ("System.err", "print"),
            ] {
                w.writeln(&format!("{sink}.{write}({frame});"));
                w.writeln(&format!("{sink}.flush();"));
            }
        });

        let helpers = [
            (API.value, "Object value", "Values.send(valueWriter, value)", "valueWriter"),
            (
                API.exception,
                "Throwable exception",
                "Values.sendException(exceptionWriter, exception)",
                "exceptionWriter",
            ),
            (
                API.specific_value,
                "EvaluationResult result",
                "Values.sendEvaluated(valueWriter, result)",
                "valueWriter",
            ),
            (
                API.specific_exception,
                "EvaluationResult result",
                "Values.sendEvaluated(exceptionWriter, result)",
                "exceptionWriter",
            ),
        ];
        for (name, param, call, writer) in helpers {
            self.out.newline();
            self.out.block(&format!("private void {name}({param}) throws Exception {{"), "}", |w| {
                w.writeln(&format!("{call};"));
                w.writeln(&format!("{writer}.flush();"));
            });
        }

        self.out.newline();
        self.out.writeln("void execute() throws Exception {");
        self.out.indent();
        Ok(())
    }

    fn before(&mut self, code: &str) -> Result<(), GenerationError> {
        self.out.write_raw(code);
        Ok(())
    }

    fn separator(&mut self) -> Result<(), GenerationError> {
        self.out.writeln("this.writeSeparator();");
        Ok(())
    }

    fn main_unit(&mut self, main: &MainInvocation) -> Result<(), GenerationError> {
        let exception = API.exception_code(&main.exception, LanguageId::Java, UnitLabel::Main)?;
        let arguments: Vec<String> = main.arguments.iter().map(|a| quote_json(a)).collect();
        let call = format!(
            "{}.main(new String[]{{{}}})",
            self.names.submission,
            arguments.join(", ")
        );
        self.unit(&call, &exception.on_success, &exception.on_error);
        Ok(())
    }

    fn testcase(&mut self, unit: &TestcaseUnit<'_>) -> Result<(), GenerationError> {
        let code = API.testcase_code(unit, LanguageId::Java, &self.syntax)?;
        if let (true, Command::Assignment { variable, ty, .. }) = (unit.declare, unit.command()) {
            self.out.writeln(&format!(
                "{} {} = {};",
                java_type(ty, false),
                self.syntax.identifier(variable),
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
        self.out.writeln("@Override");
        self.out.block("public void close() throws IOException {", "}", |w| {
            w.writeln("this.valueWriter.close();");
            w.writeln("this.exceptionWriter.close();");
        });
        self.out.newline();
        self.out.block("public static void main(String[] args) throws Exception {", "}", |w| {
            w.block(&format!("try ({class} context = new {class}()) {{"), "}", |w| {
                w.writeln("context.execute();");
            });
        });
        self.out.dedent();
        self.out.writeln("}");
        Ok(self.out.finish())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::config::GeneratorConfig;
    use crate::backend::emit::drive;
    use crate::descriptor::{Context, Expr, Testcase};

    fn generate(ctx: &Context) -> String {
        let names = HarnessNames::new(LanguageId::Java, "EjgkIhoLX", &GeneratorConfig::default());
        let plan = HarnessPlan::lower(ctx, LanguageId::Java);
        drive(&plan, Box::new(JavaEmitter::new(names))).unwrap()
    }

    #[test]
    fn test_echo_context() {
        let ctx = Context {
            testcases: vec![
                Testcase::expression(Expr::function("echo", vec![Expr::text("input-1")])),
                Testcase::expression(Expr::function("echo", vec![Expr::text("input-2")])),
            ],
            ..Context::default()
        };
        let src = generate(&ctx);
        assert!(src.contains("public class Context00 implements Closeable {"));
        assert!(src.contains(r#"sendValue(Submission.echo("input-1"));"#));
        assert_eq!(src.matches("this.writeSeparator();").count(), 3);
        assert_eq!(src.matches("catch (Exception | AssertionError harnessError)").count(), 2);
        assert!(src.contains("try (Context00 context = new Context00()) {"));
    }

    #[test]
    fn test_main_invocation_passes_arguments() {
        let ctx = Context {
            main: Some(MainInvocation {
                arguments: vec!["a".into(), "b c".into()],
                ..MainInvocation::default()
            }),
            ..Context::default()
        };
        let src = generate(&ctx);
        assert!(src.contains(r#"Submission.main(new String[]{"a", "b c"});"#));
        assert!(src.contains("sendException(null);"));
    }

    #[test]
    fn test_sequence_declaration_uses_boxed_type() {
        let ctx = Context {
            testcases: vec![Testcase::assignment(
                "numbers",
                VarType::Sequence(Box::new(VarType::Integer)),
                Expr::Sequence {
                    elements: vec![Expr::integer(1), Expr::integer(3)],
                },
            )],
            ..Context::default()
        };
        let src = generate(&ctx);
        assert!(src.contains("List<Integer> numbers = new ArrayList<>();"));
        assert!(src.contains("numbers = List.of(1, 3);"));
    }
}
