//! JavaScript source to [`Program`], via the tree-sitter JavaScript grammar.
//!
//! The concrete tree is mapped onto the closed model in [`crate::ast`].
//! Constructs outside the model are kept as `Unsupported(kind)` nodes so the
//! translator can name them when it rejects them.

use crate::ast::*;
use crate::error::TranspileError;
use crate::span::{SourceMap, Span};
use tree_sitter::{Node, Parser};

pub fn parse(source: &str) -> Result<Program, TranspileError> {
    let mut parser = Parser::new();
    parser
        .set_language(&tree_sitter_javascript::LANGUAGE.into())
        .map_err(|err| syntax_at(source, 0, format!("cannot load grammar: {err}")))?;

    let tree = parser
        .parse(source, None)
        .ok_or_else(|| syntax_at(source, 0, "parser produced no tree".to_string()))?;

    let root = tree.root_node();
    if root.has_error() {
        return Err(match first_error(root) {
            Some(node) => {
                let message = if node.is_missing() {
                    format!("missing `{}`", node.kind())
                } else {
                    let text = node.utf8_text(source.as_bytes()).unwrap_or("");
                    match text.lines().next().map(str::trim) {
                        Some(first) if !first.is_empty() => format!("unexpected `{first}`"),
                        _ => "unexpected end of input".to_string(),
                    }
                };
                syntax_at(source, node.start_byte(), message)
            }
            None => syntax_at(source, 0, "invalid program".to_string()),
        });
    }

    let ctx = ReadContext { source };
    Ok(Program {
        body: ctx.read_body(root)?,
        span: span_of(root),
    })
}

fn syntax_at(source: &str, pos: usize, message: String) -> TranspileError {
    let (line, column) = SourceMap::new("", source).line_col(pos);
    TranspileError::Syntax {
        message,
        line,
        column,
        span: Span::new(pos, pos + 1),
    }
}

/// First error or missing node in document order.
fn first_error(node: Node<'_>) -> Option<Node<'_>> {
    if node.is_error() || node.is_missing() {
        return Some(node);
    }
    let mut cursor = node.walk();
    let children: Vec<_> = node.children(&mut cursor).collect();
    children
        .into_iter()
        .filter(|c| c.has_error() || c.is_missing())
        .find_map(first_error)
}

fn span_of(node: Node<'_>) -> Span {
    Span::new(node.start_byte(), node.end_byte())
}

fn named_children(node: Node<'_>) -> Vec<Node<'_>> {
    let mut cursor = node.walk();
    node.named_children(&mut cursor)
        .filter(|c| c.kind() != "comment")
        .collect()
}

struct ReadContext<'a> {
    source: &'a str,
}

impl<'a> ReadContext<'a> {
    fn node_text(&self, node: Node) -> &'a str {
        node.utf8_text(self.source.as_bytes()).unwrap_or("")
    }

    fn field<'t>(&self, node: Node<'t>, name: &str) -> Result<Node<'t>, TranspileError> {
        node.child_by_field_name(name).ok_or_else(|| {
            syntax_at(
                self.source,
                node.start_byte(),
                format!("`{}` without {name}", node.kind()),
            )
        })
    }

    /// Statements of a program or block. A leading run of string-literal
    /// statements is a directive prologue and is dropped.
    fn read_body(&self, node: Node) -> Result<Vec<Stmt>, TranspileError> {
        let mut body = Vec::new();
        let mut prologue = true;
        for child in named_children(node) {
            if prologue && self.is_directive(child) {
                continue;
            }
            prologue = false;
            if let Some(stmt) = self.read_stmt(child)? {
                body.push(stmt);
            }
        }
        Ok(body)
    }

    fn is_directive(&self, node: Node) -> bool {
        node.kind() == "expression_statement"
            && named_children(node)
                .first()
                .is_some_and(|e| e.kind() == "string")
    }

    fn read_stmt(&self, node: Node) -> Result<Option<Stmt>, TranspileError> {
        let span = span_of(node);
        let kind = match node.kind() {
            "hash_bang_line" => return Ok(None),
            "empty_statement" => StmtKind::Empty,
            "statement_block" => StmtKind::Block(self.read_body(node)?),
            "expression_statement" => match named_children(node).first() {
                Some(expr) => StmtKind::Expression(self.read_expr(*expr)?),
                None => StmtKind::Empty,
            },
            "if_statement" => self.read_if(node)?,
            "function_declaration" => self.read_function(node)?,
            "return_statement" => match named_children(node).first() {
                Some(expr) => StmtKind::Return(Some(self.read_expr(*expr)?)),
                None => StmtKind::Return(None),
            },
            "lexical_declaration" | "variable_declaration" => self.read_declaration(node)?,
            "switch_statement" => self.read_switch(node)?,
            "import_statement" => {
                let source = self.field(node, "source")?;
                StmtKind::Import {
                    source: self.read_string(source),
                }
            }
            "break_statement" => {
                if node.child_by_field_name("label").is_some() {
                    StmtKind::Unsupported(NodeKind::BreakStatement)
                } else {
                    StmtKind::Break
                }
            }
            "class_declaration" => StmtKind::Unsupported(NodeKind::ClassDeclaration),
            "continue_statement" => StmtKind::Unsupported(NodeKind::ContinueStatement),
            "debugger_statement" => StmtKind::Unsupported(NodeKind::DebuggerStatement),
            "do_statement" => StmtKind::Unsupported(NodeKind::DoWhileStatement),
            "for_statement" => StmtKind::Unsupported(NodeKind::ForStatement),
            "for_in_statement" => {
                let of = node
                    .child_by_field_name("operator")
                    .is_some_and(|op| self.node_text(op) == "of");
                StmtKind::Unsupported(if of {
                    NodeKind::ForOfStatement
                } else {
                    NodeKind::ForInStatement
                })
            }
            "labeled_statement" => StmtKind::Unsupported(NodeKind::LabeledStatement),
            "throw_statement" => StmtKind::Unsupported(NodeKind::ThrowStatement),
            "try_statement" => StmtKind::Unsupported(NodeKind::TryStatement),
            "while_statement" => StmtKind::Unsupported(NodeKind::WhileStatement),
            "with_statement" => StmtKind::Unsupported(NodeKind::WithStatement),
            "export_statement" => StmtKind::Unsupported(self.export_kind(node)),
            other => StmtKind::Unsupported(NodeKind::Unrecognized(other)),
        };
        Ok(Some(Stmt::new(kind, span)))
    }

    fn export_kind(&self, node: Node) -> NodeKind {
        let mut cursor = node.walk();
        let tokens: Vec<&str> = node.children(&mut cursor).map(|c| c.kind()).collect();
        if tokens.contains(&"default") {
            NodeKind::ExportDefaultDeclaration
        } else if tokens.contains(&"*") {
            NodeKind::ExportAllDeclaration
        } else {
            NodeKind::ExportNamedDeclaration
        }
    }

    /// A nested statement that must be present (if/else branches).
    fn read_branch(&self, node: Node) -> Result<Box<Stmt>, TranspileError> {
        let span = span_of(node);
        Ok(Box::new(
            self.read_stmt(node)?
                .unwrap_or_else(|| Stmt::new(StmtKind::Empty, span)),
        ))
    }

    fn read_if(&self, node: Node) -> Result<StmtKind, TranspileError> {
        let test = self.read_expr(self.field(node, "condition")?)?;
        let consequent = self.read_branch(self.field(node, "consequence")?)?;
        let alternate = match node.child_by_field_name("alternative") {
            Some(clause) => match named_children(clause).first() {
                Some(stmt) => Some(self.read_branch(*stmt)?),
                None => None,
            },
            None => None,
        };
        Ok(StmtKind::If {
            test,
            consequent,
            alternate,
        })
    }

    fn read_function(&self, node: Node) -> Result<StmtKind, TranspileError> {
        let name = self.node_text(self.field(node, "name")?).to_string();
        let params = named_children(self.field(node, "parameters")?)
            .into_iter()
            .map(|p| self.read_pattern(p))
            .collect();
        let body = self.read_body(self.field(node, "body")?)?;
        Ok(StmtKind::Function(FunctionDecl { name, params, body }))
    }

    fn read_pattern(&self, node: Node) -> Pattern {
        let kind = match node.kind() {
            "identifier" => PatternKind::Identifier(self.node_text(node).to_string()),
            "assignment_pattern" => PatternKind::Unsupported(NodeKind::AssignmentPattern),
            "rest_pattern" => PatternKind::Unsupported(NodeKind::RestElement),
            "object_pattern" => PatternKind::Unsupported(NodeKind::ObjectPattern),
            "array_pattern" => PatternKind::Unsupported(NodeKind::ArrayPattern),
            other => PatternKind::Unsupported(NodeKind::Unrecognized(other)),
        };
        Pattern::new(kind, span_of(node))
    }

    fn read_declaration(&self, node: Node) -> Result<StmtKind, TranspileError> {
        let kind = match node.child_by_field_name("kind").map(|k| self.node_text(k)) {
            Some("let") => DeclKind::Let,
            Some("const") => DeclKind::Const,
            _ => DeclKind::Var,
        };
        let mut declarations = Vec::new();
        for declarator in named_children(node) {
            if declarator.kind() != "variable_declarator" {
                continue;
            }
            let id = self.read_pattern(self.field(declarator, "name")?);
            let init = match declarator.child_by_field_name("value") {
                Some(value) => Some(self.read_expr(value)?),
                None => None,
            };
            declarations.push(Declarator {
                id,
                init,
                span: span_of(declarator),
            });
        }
        Ok(StmtKind::VariableDeclaration { kind, declarations })
    }

    fn read_switch(&self, node: Node) -> Result<StmtKind, TranspileError> {
        let discriminant = self.read_expr(self.field(node, "value")?)?;
        let mut cases = Vec::new();
        for case in named_children(self.field(node, "body")?) {
            let test = match case.kind() {
                "switch_case" => Some(self.read_expr(self.field(case, "value")?)?),
                "switch_default" => None,
                _ => continue,
            };
            let mut cursor = case.walk();
            let body: Vec<_> = case.children_by_field_name("body", &mut cursor).collect();
            let mut consequent = Vec::new();
            for stmt in body {
                if stmt.kind() == "comment" {
                    continue;
                }
                if let Some(stmt) = self.read_stmt(stmt)? {
                    consequent.push(stmt);
                }
            }
            cases.push(SwitchCase {
                test,
                consequent,
                span: span_of(case),
            });
        }
        Ok(StmtKind::Switch {
            discriminant,
            cases,
        })
    }

    fn read_expr(&self, node: Node) -> Result<Expr, TranspileError> {
        let span = span_of(node);
        let kind = match node.kind() {
            "identifier" | "undefined" => ExprKind::Identifier(self.node_text(node).to_string()),
            "number" => ExprKind::Literal(Literal::Number(self.node_text(node).to_string())),
            "string" => ExprKind::Literal(Literal::String(self.read_string(node))),
            "true" => ExprKind::Literal(Literal::Boolean(true)),
            "false" => ExprKind::Literal(Literal::Boolean(false)),
            "null" => ExprKind::Literal(Literal::Null),
            "parenthesized_expression" => {
                return match named_children(node).first() {
                    Some(inner) if inner.kind() == "sequence_expression" => Ok(Expr::new(
                        ExprKind::Unsupported(NodeKind::SequenceExpression),
                        span,
                    )),
                    Some(inner) => self.read_expr(*inner),
                    None => Err(syntax_at(
                        self.source,
                        node.start_byte(),
                        "empty parentheses".to_string(),
                    )),
                };
            }
            "binary_expression" => self.read_binary(node)?,
            "unary_expression" => self.read_unary(node)?,
            "call_expression" => self.read_call(node)?,
            "member_expression" => self.read_member(node)?,
            "meta_property" => {
                let text = self.node_text(node);
                let (meta, property) = text.split_once('.').unwrap_or((text, ""));
                ExprKind::MetaProperty {
                    meta: meta.trim().to_string(),
                    property: property.trim().to_string(),
                }
            }
            "subscript_expression" => ExprKind::Unsupported(NodeKind::MemberExpression),
            "template_string" => ExprKind::Unsupported(NodeKind::TemplateLiteral),
            "array" => ExprKind::Unsupported(NodeKind::ArrayExpression),
            "arrow_function" => ExprKind::Unsupported(NodeKind::ArrowFunctionExpression),
            "assignment_expression" | "augmented_assignment_expression" => {
                ExprKind::Unsupported(NodeKind::AssignmentExpression)
            }
            "await_expression" => ExprKind::Unsupported(NodeKind::AwaitExpression),
            "class" => ExprKind::Unsupported(NodeKind::ClassExpression),
            "ternary_expression" => ExprKind::Unsupported(NodeKind::ConditionalExpression),
            "function_expression" | "function" | "generator_function" => {
                ExprKind::Unsupported(NodeKind::FunctionExpression)
            }
            "jsx_element" | "jsx_self_closing_element" => {
                ExprKind::Unsupported(NodeKind::JSXElement)
            }
            "new_expression" => ExprKind::Unsupported(NodeKind::NewExpression),
            "object" => ExprKind::Unsupported(NodeKind::ObjectExpression),
            "private_property_identifier" => ExprKind::Unsupported(NodeKind::PrivateIdentifier),
            "sequence_expression" => ExprKind::Unsupported(NodeKind::SequenceExpression),
            "spread_element" => ExprKind::Unsupported(NodeKind::SpreadElement),
            "super" => ExprKind::Unsupported(NodeKind::Super),
            "this" => ExprKind::Unsupported(NodeKind::ThisExpression),
            "update_expression" => ExprKind::Unsupported(NodeKind::UpdateExpression),
            "yield_expression" => ExprKind::Unsupported(NodeKind::YieldExpression),
            other => ExprKind::Unsupported(NodeKind::Unrecognized(other)),
        };
        Ok(Expr::new(kind, span))
    }

    fn read_binary(&self, node: Node) -> Result<ExprKind, TranspileError> {
        let operator = self.node_text(self.field(node, "operator")?);
        let left = Box::new(self.read_expr(self.field(node, "left")?)?);
        let right = Box::new(self.read_expr(self.field(node, "right")?)?);
        let kind = match operator {
            "&&" => ExprKind::Logical {
                op: LogicalOp::And,
                left,
                right,
            },
            "||" => ExprKind::Logical {
                op: LogicalOp::Or,
                left,
                right,
            },
            "??" => ExprKind::Unsupported(NodeKind::LogicalExpression),
            token => match BinaryOp::from_token(token) {
                Some(op) => ExprKind::Binary { op, left, right },
                None => ExprKind::Unsupported(NodeKind::BinaryExpression),
            },
        };
        Ok(kind)
    }

    fn read_unary(&self, node: Node) -> Result<ExprKind, TranspileError> {
        let operator = self.node_text(self.field(node, "operator")?);
        let argument = self.field(node, "argument")?;
        let kind = match operator {
            "!" => ExprKind::Not(Box::new(self.read_expr(argument)?)),
            "-" if argument.kind() == "number" => {
                ExprKind::Literal(Literal::Number(format!("-{}", self.node_text(argument))))
            }
            _ => ExprKind::Unsupported(NodeKind::UnaryExpression),
        };
        Ok(kind)
    }

    fn read_call(&self, node: Node) -> Result<ExprKind, TranspileError> {
        if node.child_by_field_name("optional_chain").is_some() {
            return Ok(ExprKind::Unsupported(NodeKind::ChainExpression));
        }
        let function = self.field(node, "function")?;
        if function.kind() == "import" {
            return Ok(ExprKind::Unsupported(NodeKind::ImportExpression));
        }
        let arguments = self.field(node, "arguments")?;
        if arguments.kind() == "template_string" {
            return Ok(ExprKind::Unsupported(NodeKind::TaggedTemplateExpression));
        }
        let callee = Box::new(self.read_expr(function)?);
        let arguments = named_children(arguments)
            .into_iter()
            .map(|arg| self.read_expr(arg))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(ExprKind::Call { callee, arguments })
    }

    fn read_member(&self, node: Node) -> Result<ExprKind, TranspileError> {
        if node.child_by_field_name("optional_chain").is_some() {
            return Ok(ExprKind::Unsupported(NodeKind::ChainExpression));
        }
        let property = self.field(node, "property")?;
        if property.kind() == "private_property_identifier" {
            return Ok(ExprKind::Unsupported(NodeKind::PrivateIdentifier));
        }
        let object = Box::new(self.read_expr(self.field(node, "object")?)?);
        Ok(ExprKind::Member {
            object,
            property: self.node_text(property).to_string(),
        })
    }

    /// Cooked value of a string literal: fragments joined, escapes decoded.
    fn read_string(&self, node: Node) -> String {
        let mut out = String::new();
        for part in named_children(node) {
            match part.kind() {
                "string_fragment" => out.push_str(self.node_text(part)),
                "escape_sequence" => out.push_str(&unescape(self.node_text(part))),
                _ => {}
            }
        }
        out
    }
}

fn unescape(seq: &str) -> String {
    let body = seq.strip_prefix('\\').unwrap_or(seq);
    match body {
        "n" => "\n".to_string(),
        "t" => "\t".to_string(),
        "r" => "\r".to_string(),
        "b" => "\u{8}".to_string(),
        "f" => "\u{c}".to_string(),
        "v" => "\u{b}".to_string(),
        "0" => "\0".to_string(),
        "\n" | "\r\n" | "\r" => String::new(),
        _ => {
            let hex = body
                .strip_prefix("u{")
                .and_then(|h| h.strip_suffix('}'))
                .or_else(|| body.strip_prefix('u'))
                .or_else(|| body.strip_prefix('x'));
            hex.and_then(|h| u32::from_str_radix(h, 16).ok())
                .and_then(char::from_u32)
                .map(String::from)
                .unwrap_or_else(|| body.to_string())
        }
    }
}
