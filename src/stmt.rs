//! Statement translation: one statement in, the lines of shell it becomes out.
//!
//! Nested bodies are translated at depth zero and shifted right by the
//! caller with [`indent_lines`], so a statement never needs to know how deep
//! it sits.

use crate::ast::{
    Declarator, Expr, ExprKind, FunctionDecl, NodeKind, PatternKind, Stmt, StmtKind, SwitchCase,
};
use crate::context::TranslationContext;
use crate::error::TranspileError;
use crate::expr;
use crate::format::indent_lines;
use crate::span::Span;
use tracing::debug;

pub fn translate(stmt: &Stmt, ctx: &mut TranslationContext) -> Result<Vec<String>, TranspileError> {
    debug!(kind = %stmt.node.kind(), start = stmt.span.start, "translate statement");
    match &stmt.node {
        StmtKind::Block(body) => translate_block(body, ctx),
        StmtKind::Empty => Ok(Vec::new()),
        StmtKind::Expression(e) => match &e.node {
            ExprKind::Call { .. } | ExprKind::Unsupported(_) => Ok(split(expr::translate(e, ctx)?)),
            other => Err(TranspileError::unsupported_with(
                NodeKind::ExpressionStatement,
                format!("a bare `{}` is not a command", other.kind()),
                stmt.span,
            )),
        },
        StmtKind::If {
            test,
            consequent,
            alternate,
        } => translate_if(test, consequent, alternate.as_deref(), ctx),
        StmtKind::Function(func) => translate_function(func, stmt.span, ctx),
        StmtKind::Return(arg) => translate_return(arg.as_ref(), stmt.span, ctx),
        StmtKind::VariableDeclaration { declarations, .. } => {
            let mut lines = Vec::with_capacity(declarations.len());
            for decl in declarations {
                lines.push(translate_declarator(decl, ctx)?);
            }
            Ok(lines)
        }
        StmtKind::Switch {
            discriminant,
            cases,
        } => translate_switch(discriminant, cases, ctx),
        StmtKind::Import { source } => {
            let text = ctx.modules.module_text(source, ctx.importer)?;
            debug!(specifier = %source, bytes = text.len(), "splicing module");
            Ok(split(without_shebang(&text).trim_end().to_string()))
        }
        StmtKind::Break => {
            let detail = if ctx.switch_depth() > 0 {
                "`break` may only end a switch case"
            } else {
                "`break` outside a switch"
            };
            Err(TranspileError::unsupported_with(
                NodeKind::BreakStatement,
                detail,
                stmt.span,
            ))
        }
        StmtKind::Unsupported(kind) => Err(TranspileError::unsupported(*kind, stmt.span)),
    }
}

pub fn translate_block(
    stmts: &[Stmt],
    ctx: &mut TranslationContext,
) -> Result<Vec<String>, TranspileError> {
    let mut lines = Vec::new();
    for stmt in stmts {
        lines.extend(translate(stmt, ctx)?);
    }
    Ok(lines)
}

fn split(text: String) -> Vec<String> {
    if text.contains('\n') {
        text.lines().map(str::to_string).collect()
    } else {
        vec![text]
    }
}

/// Module text minus its `#!` line and the blank lines after it.
fn without_shebang(text: &str) -> &str {
    let body = match text.strip_prefix("#!") {
        Some(rest) => rest.split_once('\n').map_or("", |(_, body)| body),
        None => text,
    };
    body.trim_start_matches('\n')
}

/// Indented body of a compound command, without blank lines at either end.
/// Shell rejects empty bodies, so a body with no commands becomes `:`.
fn body(mut lines: Vec<String>, ctx: &TranslationContext) -> Vec<String> {
    while lines.last().is_some_and(|l| l.trim().is_empty()) {
        lines.pop();
    }
    let first = lines.iter().position(|l| !l.trim().is_empty());
    match first {
        Some(start) => indent_lines(lines.split_off(start), ctx.options.indent),
        None => indent_lines(vec![":".to_string()], ctx.options.indent),
    }
}

fn branch(stmt: &Stmt, ctx: &mut TranslationContext) -> Result<Vec<String>, TranspileError> {
    let lines = match &stmt.node {
        StmtKind::Block(stmts) => translate_block(stmts, ctx)?,
        _ => translate(stmt, ctx)?,
    };
    Ok(body(lines, ctx))
}

fn translate_if(
    test: &Expr,
    consequent: &Stmt,
    alternate: Option<&Stmt>,
    ctx: &mut TranslationContext,
) -> Result<Vec<String>, TranspileError> {
    ctx.in_if(|ctx| -> Result<Vec<String>, TranspileError> {
        let outermost = ctx.if_depth() == 1;
        let mut lines = Vec::new();
        if outermost {
            lines.push(String::new());
        }

        lines.push(format!("if {}; then", expr::condition(test, ctx)?));
        lines.extend(branch(consequent, ctx)?);

        let mut next = alternate;
        while let Some(alt) = next {
            match &alt.node {
                StmtKind::If {
                    test,
                    consequent,
                    alternate,
                } => {
                    lines.push(format!("elif {}; then", expr::condition(test, ctx)?));
                    lines.extend(branch(consequent, ctx)?);
                    next = alternate.as_deref();
                }
                _ => {
                    lines.push("else".to_string());
                    lines.extend(branch(alt, ctx)?);
                    next = None;
                }
            }
        }

        lines.push("fi".to_string());
        if outermost {
            lines.push(String::new());
        }
        Ok(lines)
    })
}

fn translate_function(
    func: &FunctionDecl,
    span: Span,
    ctx: &mut TranslationContext,
) -> Result<Vec<String>, TranspileError> {
    ctx.in_function(|ctx| -> Result<Vec<String>, TranspileError> {
        let mut inner = Vec::new();
        for (i, param) in func.params.iter().enumerate() {
            match &param.node {
                PatternKind::Identifier(name) => inner.push(format!("local {name}=${}", i + 1)),
                PatternKind::Unsupported(kind) => {
                    return Err(TranspileError::unsupported_with(
                        *kind,
                        format!("parameter of `{}`", func.name),
                        param.span,
                    ));
                }
            }
        }
        // A value returned by the last statement needs no explicit `return`.
        let tail = match func.body.split_last() {
            Some((last, rest)) => match &last.node {
                StmtKind::Return(Some(value)) => Some((rest, value)),
                _ => None,
            },
            None => None,
        };
        match tail {
            Some((rest, value)) => {
                inner.extend(translate_block(rest, ctx)?);
                inner.push(echo_value(value, ctx)?);
            }
            None => inner.extend(translate_block(&func.body, ctx)?),
        }
        debug!(name = %func.name, params = func.params.len(), start = span.start, "function");

        let mut lines = vec![format!("{}() {{", func.name)];
        lines.extend(body(inner, ctx));
        lines.push("}".to_string());
        lines.push(String::new());
        Ok(lines)
    })
}

fn translate_return(
    arg: Option<&Expr>,
    span: Span,
    ctx: &mut TranslationContext,
) -> Result<Vec<String>, TranspileError> {
    if ctx.function_depth() == 0 {
        return Err(TranspileError::unsupported_with(
            NodeKind::ReturnStatement,
            "`return` outside a function",
            span,
        ));
    }
    match arg {
        Some(arg) => Ok(vec![echo_value(arg, ctx)?, "return".to_string()]),
        None => Ok(vec!["return".to_string()]),
    }
}

/// A function's result is what it prints.
fn echo_value(value: &Expr, ctx: &mut TranslationContext) -> Result<String, TranspileError> {
    Ok(format!("echo {}", expr::value(value, ctx)?))
}

fn translate_declarator(
    decl: &Declarator,
    ctx: &mut TranslationContext,
) -> Result<String, TranspileError> {
    let name = match &decl.id.node {
        PatternKind::Identifier(name) => name,
        PatternKind::Unsupported(kind) => {
            return Err(TranspileError::unsupported_with(
                *kind,
                "destructuring declaration",
                decl.id.span,
            ));
        }
    };
    match &decl.init {
        Some(init) => Ok(format!("{name}={}", expr::value(init, ctx)?)),
        None => Ok(format!("{name}=\"\"")),
    }
}

fn translate_switch(
    discriminant: &Expr,
    cases: &[SwitchCase],
    ctx: &mut TranslationContext,
) -> Result<Vec<String>, TranspileError> {
    ctx.in_switch(|ctx| -> Result<Vec<String>, TranspileError> {
        let mut lines = vec![format!("case {} in", expr::value(discriminant, ctx)?)];
        let mut labels: Vec<String> = Vec::new();
        let mut has_default = false;
        let mut default_arm = None;

        for (i, case) in cases.iter().enumerate() {
            let last = i + 1 == cases.len();
            labels.push(match &case.test {
                Some(test) => expr::value(test, ctx)?,
                None => {
                    has_default = true;
                    "*".to_string()
                }
            });
            // Cases with no statements share the next case's arm.
            if case.consequent.is_empty() && !last {
                continue;
            }

            let stmts = match case.consequent.split_last() {
                Some((stop, rest)) if matches!(stop.node, StmtKind::Break) => rest,
                Some((stop, _)) if matches!(stop.node, StmtKind::Return(_)) || last => {
                    &case.consequent[..]
                }
                None => &case.consequent[..],
                Some(_) => {
                    return Err(TranspileError::unsupported_with(
                        NodeKind::SwitchCase,
                        "fall-through into the next case; end the case with `break`",
                        case.span,
                    ));
                }
            };
            let mut arm = vec![format!("{})", labels.join("|"))];
            arm.extend(indent_lines(translate_block(stmts, ctx)?, ctx.options.indent));
            arm.push(";;".to_string());
            let arm = indent_lines(arm, ctx.options.indent);
            labels.clear();

            // `*)` matches everything, so the default arm is tried last.
            if std::mem::take(&mut has_default) {
                default_arm = Some(arm);
            } else {
                lines.extend(arm);
            }
        }

        lines.extend(default_arm.unwrap_or_default());
        lines.push("esac".to_string());
        Ok(lines)
    })
}
