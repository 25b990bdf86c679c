//! C harness emitter.
//!
//! C has no recoverable errors: a crashing unit ends the harness and the collector reports the missing frames. The
//! exception file still receives every frame so all four sinks stay aligned. Globals are prefixed with the context
//! name because a run may `#include` several contexts into one translation unit (`INCLUDED` suppresses `main`).

use framejudge_core::lang::conventions::NamingConventions;
use framejudge_core::lang::languages::{self, LanguageId};

use super::expr::ExprSyntax;
use super::strings::quote_c;
use super::unit::{SendApi, call_evaluator, evaluator_for};
use super::{HarnessEmitter, HarnessNames};
use crate::backend::errors::GenerationError;
use crate::backend::plan::{HarnessPlan, TestcaseUnit};
use crate::backend::writer::SourceWriter;
use crate::descriptor::{Command, MainInvocation, ValueChannel, VarType};

const API: SendApi = SendApi::SNAKE;

/// Name the submission's `main` is renamed to before inclusion.
pub const SOLUTION_MAIN: &str = "solution_main";

pub struct CEmitter {
    names: HarnessNames,
    out: SourceWriter,
}

struct CSyntax;

impl ExprSyntax for CSyntax {
    fn naming(&self) -> NamingConventions {
        languages::info_for(LanguageId::C).naming
    }

    fn text(&self, value: &str) -> String {
        quote_c(value)
    }

    fn integer(&self, value: i64) -> String {
        if i32::try_from(value).is_ok() {
            value.to_string()
        } else {
            format!("{value}LL")
        }
    }

    fn nothing(&self) -> String {
        "NULL".to_string()
    }

    fn sequence(&self, elements: &[String]) -> String {
        format!("{{{}}}", elements.join(", "))
    }
}

fn c_declaration(ty: &VarType, name: &str) -> Result<String, GenerationError> {
    let (ty, default) = match ty {
        VarType::Integer => ("int", "0"),
        VarType::Real => ("double", "0.0"),
        VarType::Text => ("char*", "NULL"),
        VarType::Boolean => ("bool", "false"),
        VarType::Sequence(_) => {
            return Err(GenerationError::Unsupported {
                language: LanguageId::C,
                construct: "sequence-typed variables",
            });
        }
        VarType::Custom(_) => {
            return Err(GenerationError::Unsupported {
                language: LanguageId::C,
                construct: "class-typed variables",
            });
        }
    };
    Ok(format!("{ty} {name} = {default};"))
}

impl CEmitter {
    pub fn new(names: HarnessNames) -> Self {
        let out = SourceWriter::new(names.indent_width);
        Self { names, out }
    }

    fn global(&self, name: &str) -> String {
        format!("{}_{}", self.names.context, name)
    }
}

impl HarnessEmitter for CEmitter {
    fn prologue(&mut self, _plan: &HarnessPlan<'_>) -> Result<(), GenerationError> {
        let value_file = self.global("value_file");
        let exception_file = self.global("exception_file");
        let write_separator = self.global("write_separator");
        let frame = quote_c(&self.names.frame);

        for header in ["<stdio.h>", "<stdbool.h>", "\"values.h\""] {
            self.out.writeln(&format!("#include {header}"));
        }
        self.out.writeln(&format!("#include \"{}.c\"", self.names.submission));
        self.out.newline();
        self.out.writeln(&format!("static FILE* {value_file} = NULL;"));
        self.out.writeln(&format!("static FILE* {exception_file} = NULL;"));
        self.out.newline();
        self.out.block(&format!("static void {write_separator}() {{"), "}", |w| {
            for sink in [value_file.as_str(), exception_file.as_str(), "stdout", "stderr"] {
                w.writeln(&format!("fprintf({sink}, \"%s\", {frame});"));
                w.writeln(&format!("fflush({sink});"));
            }
        });
        self.out.newline();
        for (name, target, file) in [
            (API.value, "write_value", &value_file),
            (API.specific_value, "write_evaluated", &value_file),
        ] {
            self.out.writeln(&format!("#undef {name}"));
            self.out.writeln(&format!("#define {name}(value) {target}({file}, value)"));
        }
        self.out.newline();
        self.out.writeln(&format!("int {}() {{", self.names.context));
        self.out.indent();
        self.out.writeln(&format!(
            "{value_file} = fopen({}, \"w\");",
            quote_c(&self.names.value_path)
        ));
        self.out.writeln(&format!(
            "{exception_file} = fopen({}, \"w\");",
            quote_c(&self.names.exception_path)
        ));
        self.out.block(&format!("if ({value_file} == NULL || {exception_file} == NULL) {{"), "}", |w| {
            w.writeln("return 1;");
        });
        Ok(())
    }

    fn before(&mut self, code: &str) -> Result<(), GenerationError> {
        self.out.write_raw(code);
        Ok(())
    }

    fn separator(&mut self) -> Result<(), GenerationError> {
        let call = format!("{}();", self.global("write_separator"));
        self.out.writeln(&call);
        Ok(())
    }

    fn main_unit(&mut self, main: &MainInvocation) -> Result<(), GenerationError> {
        let mut argv = vec![quote_c(&self.names.submission)];
        argv.extend(main.arguments.iter().map(|a| quote_c(a)));
        let count = argv.len();
        let argv = argv.join(", ");
        self.out.block("{", "}", |w| {
            w.writeln(&format!("char* args[] = {{{argv}}};"));
            w.writeln(&format!("{SOLUTION_MAIN}({count}, args);"));
        });
        Ok(())
    }

    fn testcase(&mut self, unit: &TestcaseUnit<'_>) -> Result<(), GenerationError> {
        let expression = CSyntax.render(unit.command().expression());
        let statement = match (unit.command(), &unit.value) {
            (Command::Assignment { variable, ty, .. }, _) => {
                let name = CSyntax.identifier(variable);
                if unit.declare {
                    self.out.writeln(&c_declaration(ty, &name)?);
                }
                format!("{name} = {expression};")
            }
            (Command::Expression { .. }, ValueChannel::Ignored) => format!("{expression};"),
            (Command::Expression { .. }, ValueChannel::Value) => format!("{}({expression});", API.value),
            (Command::Expression { .. }, ValueChannel::Specific { evaluators }) => {
                let evaluator = evaluator_for(evaluators, LanguageId::C).ok_or(GenerationError::MissingEvaluator {
                    language: LanguageId::C,
                    unit: crate::backend::errors::UnitLabel::Testcase(unit.index),
                })?;
                format!("{}({});", API.specific_value, call_evaluator(evaluator, &expression))
            }
        };
        self.out.writeln(&statement);
        Ok(())
    }

    fn after(&mut self, code: &str) -> Result<(), GenerationError> {
        self.out.write_raw(code);
        Ok(())
    }

    fn finish(mut self: Box<Self>) -> Result<String, GenerationError> {
        let value_file = self.global("value_file");
        let exception_file = self.global("exception_file");
        self.out.writeln(&format!("fclose({value_file});"));
        self.out.writeln(&format!("fclose({exception_file});"));
        self.out.writeln("return 0;");
        self.out.dedent();
        self.out.writeln("}");
        self.out.newline();
        self.out.writeln("#ifndef INCLUDED");
        let context = self.names.context.clone();
        self.out.block("int main() {", "}", |w| {
            w.writeln(&format!("return {context}();"));
        });
        self.out.writeln("#endif");
        Ok(self.out.finish())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::config::GeneratorConfig;
    use crate::backend::emit::drive;
    use crate::descriptor::{Context, Expr, Testcase};

    fn generate(ctx: &Context) -> Result<String, GenerationError> {
        let names = HarnessNames::new(LanguageId::C, "zwljY2nKg", &GeneratorConfig::default());
        let plan = HarnessPlan::lower(ctx, LanguageId::C);
        drive(&plan, Box::new(CEmitter::new(names)))
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
        let src = generate(&ctx).unwrap();
        assert!(src.contains("static FILE* context_0_0_value_file = NULL;"));
        assert!(src.contains(r#"fprintf(stderr, "%s", "--zwljY2nKg-- SEP");"#));
        assert!(src.contains("fflush(stderr);"));
        assert!(src.contains(r#"send_value(echo("input-1"));"#));
        assert_eq!(src.matches("    context_0_0_write_separator();").count(), 3);
        assert!(src.contains("#ifndef INCLUDED\nint main() {\n    return context_0_0();\n}\n#endif\n"));
    }

    #[test]
    fn test_main_uses_renamed_entry_point() {
        let ctx = Context {
            main: Some(MainInvocation {
                arguments: vec!["a".into()],
                ..MainInvocation::default()
            }),
            ..Context::default()
        };
        let src = generate(&ctx).unwrap();
        assert!(src.contains(r#"char* args[] = {"submission", "a"};"#));
        assert!(src.contains("solution_main(2, args);"));
    }

    #[test]
    fn test_declares_scalar_before_assignment() {
        let ctx = Context {
            testcases: vec![Testcase::assignment("total", VarType::Integer, Expr::function("compute", vec![]))],
            ..Context::default()
        };
        let src = generate(&ctx).unwrap();
        let declaration = src.find("int total = 0;").unwrap();
        let assignment = src.find("total = compute();").unwrap();
        assert!(declaration < assignment);
    }

    #[test]
    fn test_sequence_variable_is_unsupported() {
        let ctx = Context {
            testcases: vec![Testcase::assignment(
                "xs",
                VarType::Sequence(Box::new(VarType::Integer)),
                Expr::function("make", vec![]),
            )],
            ..Context::default()
        };
        assert!(matches!(
            generate(&ctx),
            Err(GenerationError::Unsupported {
                language: LanguageId::C,
                ..
            })
        ));
    }
}
