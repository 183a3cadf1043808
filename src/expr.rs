//! Expression translation.
//!
//! [`translate`] gives the raw text of an expression: a bare name for an
//! identifier, the unquoted value of a literal, the command line of a call.
//! [`value`] embeds that text as a shell word through [`crate::quoting`].
//! [`condition`] renders an expression as a command whose exit status is the
//! truth of the expression, for `if` and `elif`.

use crate::ast::{BinaryOp, Expr, ExprKind, Literal, LogicalOp, NodeKind};
use crate::context::{TargetShell, TranslationContext};
use crate::error::TranspileError;
use crate::quoting::{self, QuotingConvention};
use crate::span::Span;
use tracing::trace;

const SCRIPT_DIR: &str = r#"$(dirname "$(realpath "$0")")"#;
const SCRIPT_PATH: &str = r#"$(realpath "$0")"#;

pub fn translate(expr: &Expr, ctx: &mut TranslationContext) -> Result<String, TranspileError> {
    trace!(kind = %expr.node.kind(), "translate expression");
    match &expr.node {
        ExprKind::Identifier(name) => Ok(name.clone()),
        ExprKind::Literal(lit) => literal(lit, expr.span),
        ExprKind::Binary { op, left, right } if op.is_comparison() => {
            let test = comparison(*op, left, right, expr.span, ctx)?;
            Ok(boolean_word(&test))
        }
        ExprKind::Binary { op, left, right } => {
            let op = arithmetic_operator(*op, ctx.options.target, expr.span)?;
            let l = value(left, ctx)?;
            let r = value(right, ctx)?;
            Ok(format!("$(( {l} {op} {r} ))"))
        }
        ExprKind::Logical { .. } | ExprKind::Not(_) => {
            let test = condition(expr, ctx)?;
            Ok(boolean_word(&test))
        }
        ExprKind::Call { callee, arguments } => call(callee, arguments, expr.span, ctx),
        ExprKind::Member { object, property } => member(object, property, expr.span),
        ExprKind::MetaProperty { .. } => Err(TranspileError::unsupported(
            NodeKind::MetaProperty,
            expr.span,
        )),
        ExprKind::Unsupported(kind) => Err(TranspileError::unsupported(*kind, expr.span)),
    }
}

/// Translates `expr` and embeds it as a single shell word.
pub fn value(expr: &Expr, ctx: &mut TranslationContext) -> Result<String, TranspileError> {
    let text = translate(expr, ctx)?;
    Ok(match &expr.node {
        // Already complete `$( … )` words.
        ExprKind::Logical { .. } | ExprKind::Not(_) | ExprKind::Member { .. } => {
            quoting::apply(QuotingConvention::ArithmeticBlock, &text)
        }
        node => quoting::format(node.kind(), &text),
    })
}

/// Renders `expr` as a test command.
pub fn condition(expr: &Expr, ctx: &mut TranslationContext) -> Result<String, TranspileError> {
    match &expr.node {
        ExprKind::Binary { op, left, right } if op.is_comparison() => {
            comparison(*op, left, right, expr.span, ctx)
        }
        ExprKind::Binary { .. } => Ok(format!("[ {} -ne 0 ]", value(expr, ctx)?)),
        ExprKind::Logical { op, left, right } => {
            let l = grouped(left, Some(*op), ctx)?;
            let r = grouped(right, Some(*op), ctx)?;
            let joiner = match op {
                LogicalOp::And => "&&",
                LogicalOp::Or => "||",
            };
            Ok(format!("{l} {joiner} {r}"))
        }
        ExprKind::Not(inner) => Ok(format!("! {}", grouped(inner, None, ctx)?)),
        ExprKind::Literal(lit) => Ok(literal_truth(lit).to_string()),
        ExprKind::Call { .. } => translate(expr, ctx),
        _ => Ok(truthy(&value(expr, ctx)?)),
    }
}

/// Tests a shell word the way JavaScript tests a value. Empty, `false`, `0`
/// and `null` are false; these are also the words stored for falsy
/// literals and for comparisons used as values.
fn truthy(word: &str) -> String {
    format!("[ -n {word} ] && [ {word} != false ] && [ {word} != 0 ] && [ {word} != null ]")
}

/// Whether [`condition`] renders `expr` through [`truthy`].
fn is_truthy_chain(expr: &Expr) -> bool {
    !matches!(
        expr.node,
        ExprKind::Binary { .. }
            | ExprKind::Logical { .. }
            | ExprKind::Not(_)
            | ExprKind::Literal(_)
            | ExprKind::Call { .. }
    )
}

fn literal_truth(lit: &Literal) -> bool {
    match lit {
        Literal::Boolean(b) => *b,
        Literal::Null => false,
        Literal::String(s) => !s.is_empty(),
        Literal::Number(n) => number_value(n).is_none_or(|v| v != 0.0 && !v.is_nan()),
    }
}

fn number_value(text: &str) -> Option<f64> {
    let digits = text.replace('_', "").to_ascii_lowercase();
    let digits = digits.strip_suffix('n').unwrap_or(&digits);
    let (negative, digits) = match digits.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, digits),
    };
    let radix = match digits.get(..2) {
        Some("0x") => Some(16),
        Some("0o") => Some(8),
        Some("0b") => Some(2),
        _ => None,
    };
    let value = match radix {
        Some(radix) => u64::from_str_radix(&digits[2..], radix).ok()? as f64,
        None => digits.parse::<f64>().ok()?,
    };
    Some(if negative { -value } else { value })
}

/// Literal text is embedded verbatim inside double quotes. Characters the
/// shell interprets there, and line breaks, have no verbatim form.
fn literal(lit: &Literal, span: Span) -> Result<String, TranspileError> {
    let text = lit.text();
    match text
        .chars()
        .find(|c| matches!(*c, '"' | '$' | '`' | '\\' | '\n' | '\r'))
    {
        Some(c) => Err(TranspileError::unsupported_with(
            NodeKind::Literal,
            format!("string containing {c:?} cannot be quoted verbatim"),
            span,
        )),
        None => Ok(text.to_string()),
    }
}

/// A nested test, braced when it would otherwise bind differently than in
/// the source: shell `&&` and `||` share one precedence level, and `!`
/// negates only the next test.
fn grouped(
    expr: &Expr,
    parent: Option<LogicalOp>,
    ctx: &mut TranslationContext,
) -> Result<String, TranspileError> {
    let text = condition(expr, ctx)?;
    let braced = match &expr.node {
        ExprKind::Logical { op, .. } => Some(*op) != parent,
        _ => is_truthy_chain(expr) && parent != Some(LogicalOp::And),
    };
    Ok(if braced { format!("{{ {text}; }}") } else { text })
}

fn comparison(
    op: BinaryOp,
    left: &Expr,
    right: &Expr,
    span: Span,
    ctx: &mut TranslationContext,
) -> Result<String, TranspileError> {
    let op = test_operator(op, span)?;
    let l = value(left, ctx)?;
    let r = value(right, ctx)?;
    Ok(format!("[ {l} {op} {r} ]"))
}

/// `true`/`false` as a word, from a test command.
fn boolean_word(test: &str) -> String {
    format!("$( if {test}; then printf true; else printf false; fi )")
}

/// `test` operator for an equality or ordering operator.
pub fn test_operator(op: BinaryOp, span: Span) -> Result<&'static str, TranspileError> {
    match op {
        BinaryOp::Eq | BinaryOp::StrictEq => Ok("="),
        BinaryOp::NotEq | BinaryOp::StrictNotEq => Ok("!="),
        BinaryOp::Lt => Ok("-lt"),
        BinaryOp::Le => Ok("-le"),
        BinaryOp::Gt => Ok("-gt"),
        BinaryOp::Ge => Ok("-ge"),
        _ => Err(TranspileError::InvalidOperator {
            operator: op,
            target: "test",
            span,
        }),
    }
}

/// `$(( ))` operator for an arithmetic operator.
pub fn arithmetic_operator(
    op: BinaryOp,
    target: TargetShell,
    span: Span,
) -> Result<&'static str, TranspileError> {
    match op {
        BinaryOp::Add
        | BinaryOp::Sub
        | BinaryOp::Mul
        | BinaryOp::Div
        | BinaryOp::Mod
        | BinaryOp::Shl
        | BinaryOp::Shr
        | BinaryOp::BitAnd
        | BinaryOp::BitOr
        | BinaryOp::BitXor => Ok(op.as_str()),
        BinaryOp::Exp if target == TargetShell::Bash => Ok("**"),
        BinaryOp::Exp => Err(TranspileError::InvalidOperator {
            operator: op,
            target: "POSIX shell",
            span,
        }),
        _ => Err(TranspileError::InvalidOperator {
            operator: op,
            target: "shell",
            span,
        }),
    }
}

fn call(
    callee: &Expr,
    arguments: &[Expr],
    span: Span,
    ctx: &mut TranslationContext,
) -> Result<String, TranspileError> {
    match &callee.node {
        ExprKind::Identifier(name) => {
            let mut words = vec![name.clone()];
            for arg in arguments {
                words.push(argument(arg, ctx)?);
            }
            Ok(words.join(" "))
        }
        ExprKind::Member { object, property } => {
            let redirect = match (&object.node, property.as_str()) {
                (ExprKind::Identifier(obj), "log") if obj == "console" => "",
                (ExprKind::Identifier(obj), "error" | "warn") if obj == "console" => " >&2",
                _ => {
                    return Err(TranspileError::unsupported_with(
                        NodeKind::CallExpression,
                        "only console.log, console.error and console.warn can be called as methods",
                        span,
                    ));
                }
            };
            if arguments.is_empty() {
                return Ok(format!("echo{redirect}"));
            }
            let mut lines = Vec::with_capacity(arguments.len());
            for arg in arguments {
                lines.push(format!("echo {}{redirect}", value(arg, ctx)?));
            }
            Ok(lines.join("\n"))
        }
        _ => Err(TranspileError::unsupported_with(
            NodeKind::CallExpression,
            format!("cannot call a {}", callee.node.kind()),
            span,
        )),
    }
}

/// Call arguments: numbers stay bare words, everything else is a value.
fn argument(arg: &Expr, ctx: &mut TranslationContext) -> Result<String, TranspileError> {
    match &arg.node {
        ExprKind::Literal(Literal::Number(n)) if n.parse::<f64>().is_ok() => Ok(n.clone()),
        _ => value(arg, ctx),
    }
}

fn member(object: &Expr, property: &str, span: Span) -> Result<String, TranspileError> {
    match &object.node {
        ExprKind::MetaProperty { meta, property: p } if meta == "import" && p == "meta" => {
            match property {
                "dirname" => Ok(SCRIPT_DIR.to_string()),
                "filename" => Ok(SCRIPT_PATH.to_string()),
                other => Err(TranspileError::unsupported_with(
                    NodeKind::MetaProperty,
                    format!("import.meta.{other}"),
                    span,
                )),
            }
        }
        _ => Err(TranspileError::unsupported_with(
            NodeKind::MemberExpression,
            format!("property access `.{property}`"),
            span,
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::TranslateOptions;
    use crate::modules::MemoryModuleProvider;

    fn sp() -> Span {
        Span::default()
    }

    #[test]
    fn equality_maps_to_single_equals() {
        assert_eq!(test_operator(BinaryOp::StrictEq, sp()).unwrap(), "=");
        assert_eq!(test_operator(BinaryOp::Eq, sp()).unwrap(), "=");
        assert_eq!(test_operator(BinaryOp::StrictNotEq, sp()).unwrap(), "!=");
        assert_eq!(test_operator(BinaryOp::Le, sp()).unwrap(), "-le");
    }

    #[test]
    fn arithmetic_rejects_operators_without_equivalent() {
        assert_eq!(
            arithmetic_operator(BinaryOp::Mod, TargetShell::Posix, sp()).unwrap(),
            "%"
        );
        assert_eq!(
            arithmetic_operator(BinaryOp::Exp, TargetShell::Bash, sp()).unwrap(),
            "**"
        );
        for op in [BinaryOp::UShr, BinaryOp::In, BinaryOp::InstanceOf] {
            let err = arithmetic_operator(op, TargetShell::Bash, sp()).unwrap_err();
            assert!(matches!(err, TranspileError::InvalidOperator { operator, .. } if operator == op));
        }
        assert!(arithmetic_operator(BinaryOp::Exp, TargetShell::Posix, sp()).is_err());
    }

    #[test]
    fn logical_mixing_is_braced() {
        let options = TranslateOptions::default();
        let modules = MemoryModuleProvider::default();
        let mut ctx = TranslationContext::new(&options, &modules, None);
        let ident = |n: &str| Box::new(Expr::new(ExprKind::Identifier(n.to_string()), sp()));
        // a || (b && c)
        let expr = Expr::new(
            ExprKind::Logical {
                op: LogicalOp::Or,
                left: ident("a"),
                right: Box::new(Expr::new(
                    ExprKind::Logical {
                        op: LogicalOp::And,
                        left: ident("b"),
                        right: ident("c"),
                    },
                    sp(),
                )),
            },
            sp(),
        );
        let (a, b, c) = (truthy("\"$a\""), truthy("\"$b\""), truthy("\"$c\""));
        assert_eq!(
            condition(&expr, &mut ctx).unwrap(),
            format!("{{ {a}; }} || {{ {b} && {c}; }}")
        );
    }

    #[test]
    fn literal_truthiness() {
        let number = |n: &str| literal_truth(&Literal::Number(n.to_string()));
        assert!(!number("0"));
        assert!(!number("0x0"));
        assert!(!number("0.0"));
        assert!(number("-1.5"));
        assert!(number("0b10"));
        assert!(number("1_000"));
        assert!(!literal_truth(&Literal::String(String::new())));
        assert!(literal_truth(&Literal::String("0".to_string())));
        assert!(!literal_truth(&Literal::Null));
    }

    #[test]
    fn literals_that_cannot_be_quoted_verbatim() {
        for text in ["say \"hi\"", "$HOME", "`id`", "a\\b", "two\nlines"] {
            let err = literal(&Literal::String(text.to_string()), sp()).unwrap_err();
            assert!(
                matches!(err, TranspileError::UnsupportedConstruct { kind: NodeKind::Literal, .. }),
                "{text:?}"
            );
        }
        assert_eq!(literal(&Literal::String("a*b;c".to_string()), sp()).unwrap(), "a*b;c");
    }
}
