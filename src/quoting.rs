//! Decides how a translated value is embedded in a larger shell construct.
//!
//! Every site that embeds a value (operands, return values, initialisers,
//! call arguments, `echo` arguments, `case` words) goes through [`format`],
//! so "where does this value come from" is answered in one place.

use crate::ast::NodeKind;
use tracing::warn;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuotingConvention {
    /// `"$name"`
    VariableExpansion,
    /// `"value"`
    LiteralQuote,
    /// `$(command)`
    CommandSubstitution,
    /// Already a self-contained expansion (`$(( … ))`, `$( … )`); used as is.
    ArithmeticBlock,
}

/// Convention for a value of the given syntactic kind. The boolean is
/// `false` when the kind has no rule of its own and the literal-quote
/// fallback was chosen.
pub fn convention_for(kind: NodeKind) -> (QuotingConvention, bool) {
    match kind {
        NodeKind::Identifier => (QuotingConvention::VariableExpansion, true),
        NodeKind::Literal => (QuotingConvention::LiteralQuote, true),
        NodeKind::CallExpression => (QuotingConvention::CommandSubstitution, true),
        NodeKind::BinaryExpression => (QuotingConvention::ArithmeticBlock, true),
        _ => (QuotingConvention::LiteralQuote, false),
    }
}

pub fn apply(convention: QuotingConvention, text: &str) -> String {
    match convention {
        QuotingConvention::VariableExpansion => format!("\"${text}\""),
        QuotingConvention::LiteralQuote => format!("\"{text}\""),
        QuotingConvention::CommandSubstitution => format!("$({text})"),
        QuotingConvention::ArithmeticBlock => text.to_string(),
    }
}

/// Renders already-translated `text` of a `kind` expression as a shell value.
pub fn format(kind: NodeKind, text: &str) -> String {
    let (convention, matched) = convention_for(kind);
    if !matched {
        warn!(%kind, text, "no quoting rule for value kind, quoting as literal");
    }
    apply(convention, text)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identifiers_expand() {
        assert_eq!(format(NodeKind::Identifier, "name"), "\"$name\"");
    }

    #[test]
    fn literals_quote_verbatim() {
        assert_eq!(format(NodeKind::Literal, "hello world"), "\"hello world\"");
        assert_eq!(format(NodeKind::Literal, "42"), "\"42\"");
    }

    #[test]
    fn calls_substitute() {
        assert_eq!(format(NodeKind::CallExpression, "add 1 2"), "$(add 1 2)");
    }

    #[test]
    fn arithmetic_passes_through() {
        assert_eq!(
            format(NodeKind::BinaryExpression, "$(( \"$a\" + 1 ))"),
            "$(( \"$a\" + 1 ))"
        );
    }

    #[test]
    fn unknown_kinds_fall_back_to_literal_quote() {
        let (convention, matched) = convention_for(NodeKind::MemberExpression);
        assert_eq!(convention, QuotingConvention::LiteralQuote);
        assert!(!matched);
        assert_eq!(format(NodeKind::MemberExpression, "x"), "\"x\"");
    }
}
