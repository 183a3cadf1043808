use crate::span::Span;
use std::fmt;

#[derive(Debug, Clone, PartialEq)]
pub struct Spanned<T> {
    pub node: T,
    pub span: Span,
}

impl<T> Spanned<T> {
    pub fn new(node: T, span: Span) -> Self {
        Self { node, span }
    }
}

pub type Expr = Spanned<ExprKind>;
pub type Stmt = Spanned<StmtKind>;
pub type Pattern = Spanned<PatternKind>;

/// Root of a parsed module: its top-level statements in source order.
#[derive(Debug, Clone, PartialEq)]
pub struct Program {
    pub body: Vec<Stmt>,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub enum StmtKind {
    Block(Vec<Stmt>),
    Empty,
    Expression(Expr),
    If {
        test: Expr,
        consequent: Box<Stmt>,
        alternate: Option<Box<Stmt>>,
    },
    Function(FunctionDecl),
    Return(Option<Expr>),
    VariableDeclaration {
        kind: DeclKind,
        declarations: Vec<Declarator>,
    },
    Switch {
        discriminant: Expr,
        cases: Vec<SwitchCase>,
    },
    Import {
        source: String,
    },
    Break,
    /// A statement the parser recognised but that has no shell rendering.
    Unsupported(NodeKind),
}

#[derive(Debug, Clone, PartialEq)]
pub struct FunctionDecl {
    pub name: String,
    pub params: Vec<Pattern>,
    pub body: Vec<Stmt>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeclKind {
    Var,
    Let,
    Const,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Declarator {
    pub id: Pattern,
    pub init: Option<Expr>,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SwitchCase {
    /// `None` for the `default:` arm.
    pub test: Option<Expr>,
    pub consequent: Vec<Stmt>,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub enum PatternKind {
    Identifier(String),
    Unsupported(NodeKind),
}

#[derive(Debug, Clone, PartialEq)]
pub enum ExprKind {
    Identifier(String),
    Literal(Literal),
    Binary {
        op: BinaryOp,
        left: Box<Expr>,
        right: Box<Expr>,
    },
    Logical {
        op: LogicalOp,
        left: Box<Expr>,
        right: Box<Expr>,
    },
    Not(Box<Expr>),
    Call {
        callee: Box<Expr>,
        arguments: Vec<Expr>,
    },
    /// Non-computed property access (`object.property`).
    Member {
        object: Box<Expr>,
        property: String,
    },
    /// `import.meta`, `new.target`.
    MetaProperty {
        meta: String,
        property: String,
    },
    Unsupported(NodeKind),
}

#[derive(Debug, Clone, PartialEq)]
pub enum Literal {
    String(String),
    /// Numeric literal, kept as written.
    Number(String),
    Boolean(bool),
    Null,
}

impl Literal {
    pub fn text(&self) -> &str {
        match self {
            Literal::String(s) | Literal::Number(s) => s,
            Literal::Boolean(true) => "true",
            Literal::Boolean(false) => "false",
            Literal::Null => "null",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOp {
    Eq,
    StrictEq,
    NotEq,
    StrictNotEq,
    Lt,
    Le,
    Gt,
    Ge,
    Add,
    Sub,
    Mul,
    Div,
    Mod,
    Exp,
    Shl,
    Shr,
    UShr,
    BitAnd,
    BitOr,
    BitXor,
    In,
    InstanceOf,
}

impl BinaryOp {
    pub fn from_token(token: &str) -> Option<Self> {
        let op = match token {
            "==" => BinaryOp::Eq,
            "===" => BinaryOp::StrictEq,
            "!=" => BinaryOp::NotEq,
            "!==" => BinaryOp::StrictNotEq,
            "<" => BinaryOp::Lt,
            "<=" => BinaryOp::Le,
            ">" => BinaryOp::Gt,
            ">=" => BinaryOp::Ge,
            "+" => BinaryOp::Add,
            "-" => BinaryOp::Sub,
            "*" => BinaryOp::Mul,
            "/" => BinaryOp::Div,
            "%" => BinaryOp::Mod,
            "**" => BinaryOp::Exp,
            "<<" => BinaryOp::Shl,
            ">>" => BinaryOp::Shr,
            ">>>" => BinaryOp::UShr,
            "&" => BinaryOp::BitAnd,
            "|" => BinaryOp::BitOr,
            "^" => BinaryOp::BitXor,
            "in" => BinaryOp::In,
            "instanceof" => BinaryOp::InstanceOf,
            _ => return None,
        };
        Some(op)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            BinaryOp::Eq => "==",
            BinaryOp::StrictEq => "===",
            BinaryOp::NotEq => "!=",
            BinaryOp::StrictNotEq => "!==",
            BinaryOp::Lt => "<",
            BinaryOp::Le => "<=",
            BinaryOp::Gt => ">",
            BinaryOp::Ge => ">=",
            BinaryOp::Add => "+",
            BinaryOp::Sub => "-",
            BinaryOp::Mul => "*",
            BinaryOp::Div => "/",
            BinaryOp::Mod => "%",
            BinaryOp::Exp => "**",
            BinaryOp::Shl => "<<",
            BinaryOp::Shr => ">>",
            BinaryOp::UShr => ">>>",
            BinaryOp::BitAnd => "&",
            BinaryOp::BitOr => "|",
            BinaryOp::BitXor => "^",
            BinaryOp::In => "in",
            BinaryOp::InstanceOf => "instanceof",
        }
    }

    /// Equality and ordering operators; these render as test commands.
    pub fn is_comparison(self) -> bool {
        matches!(
            self,
            BinaryOp::Eq
                | BinaryOp::StrictEq
                | BinaryOp::NotEq
                | BinaryOp::StrictNotEq
                | BinaryOp::Lt
                | BinaryOp::Le
                | BinaryOp::Gt
                | BinaryOp::Ge
        )
    }
}

impl fmt::Display for BinaryOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogicalOp {
    And,
    Or,
}

/// ESTree node kind names. Every node the parser produces reports one of
/// these; `Unrecognized` carries the raw grammar name for anything else.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeKind {
    // statements
    BlockStatement,
    BreakStatement,
    ClassDeclaration,
    ContinueStatement,
    DebuggerStatement,
    DoWhileStatement,
    EmptyStatement,
    ExportAllDeclaration,
    ExportDefaultDeclaration,
    ExportNamedDeclaration,
    ExpressionStatement,
    ForInStatement,
    ForOfStatement,
    ForStatement,
    FunctionDeclaration,
    IfStatement,
    ImportDeclaration,
    LabeledStatement,
    ReturnStatement,
    SwitchCase,
    SwitchStatement,
    ThrowStatement,
    TryStatement,
    VariableDeclaration,
    WhileStatement,
    WithStatement,
    // expressions
    ArrayExpression,
    ArrowFunctionExpression,
    AssignmentExpression,
    AwaitExpression,
    BinaryExpression,
    CallExpression,
    ChainExpression,
    ClassExpression,
    ConditionalExpression,
    FunctionExpression,
    Identifier,
    ImportExpression,
    JSXElement,
    JSXFragment,
    Literal,
    LogicalExpression,
    MemberExpression,
    MetaProperty,
    NewExpression,
    ObjectExpression,
    PrivateIdentifier,
    SequenceExpression,
    SpreadElement,
    Super,
    TaggedTemplateExpression,
    TemplateLiteral,
    ThisExpression,
    UnaryExpression,
    UpdateExpression,
    YieldExpression,
    // patterns
    ArrayPattern,
    AssignmentPattern,
    ObjectPattern,
    RestElement,
    Unrecognized(&'static str),
}

impl NodeKind {
    pub fn as_str(self) -> &'static str {
        match self {
            NodeKind::BlockStatement => "BlockStatement",
            NodeKind::BreakStatement => "BreakStatement",
            NodeKind::ClassDeclaration => "ClassDeclaration",
            NodeKind::ContinueStatement => "ContinueStatement",
            NodeKind::DebuggerStatement => "DebuggerStatement",
            NodeKind::DoWhileStatement => "DoWhileStatement",
            NodeKind::EmptyStatement => "EmptyStatement",
            NodeKind::ExportAllDeclaration => "ExportAllDeclaration",
            NodeKind::ExportDefaultDeclaration => "ExportDefaultDeclaration",
            NodeKind::ExportNamedDeclaration => "ExportNamedDeclaration",
            NodeKind::ExpressionStatement => "ExpressionStatement",
            NodeKind::ForInStatement => "ForInStatement",
            NodeKind::ForOfStatement => "ForOfStatement",
            NodeKind::ForStatement => "ForStatement",
            NodeKind::FunctionDeclaration => "FunctionDeclaration",
            NodeKind::IfStatement => "IfStatement",
            NodeKind::ImportDeclaration => "ImportDeclaration",
            NodeKind::LabeledStatement => "LabeledStatement",
            NodeKind::ReturnStatement => "ReturnStatement",
            NodeKind::SwitchCase => "SwitchCase",
            NodeKind::SwitchStatement => "SwitchStatement",
            NodeKind::ThrowStatement => "ThrowStatement",
            NodeKind::TryStatement => "TryStatement",
            NodeKind::VariableDeclaration => "VariableDeclaration",
            NodeKind::WhileStatement => "WhileStatement",
            NodeKind::WithStatement => "WithStatement",
            NodeKind::ArrayExpression => "ArrayExpression",
            NodeKind::ArrowFunctionExpression => "ArrowFunctionExpression",
            NodeKind::AssignmentExpression => "AssignmentExpression",
            NodeKind::AwaitExpression => "AwaitExpression",
            NodeKind::BinaryExpression => "BinaryExpression",
            NodeKind::CallExpression => "CallExpression",
            NodeKind::ChainExpression => "ChainExpression",
            NodeKind::ClassExpression => "ClassExpression",
            NodeKind::ConditionalExpression => "ConditionalExpression",
            NodeKind::FunctionExpression => "FunctionExpression",
            NodeKind::Identifier => "Identifier",
            NodeKind::ImportExpression => "ImportExpression",
            NodeKind::JSXElement => "JSXElement",
            NodeKind::JSXFragment => "JSXFragment",
            NodeKind::Literal => "Literal",
            NodeKind::LogicalExpression => "LogicalExpression",
            NodeKind::MemberExpression => "MemberExpression",
            NodeKind::MetaProperty => "MetaProperty",
            NodeKind::NewExpression => "NewExpression",
            NodeKind::ObjectExpression => "ObjectExpression",
            NodeKind::PrivateIdentifier => "PrivateIdentifier",
            NodeKind::SequenceExpression => "SequenceExpression",
            NodeKind::SpreadElement => "SpreadElement",
            NodeKind::Super => "Super",
            NodeKind::TaggedTemplateExpression => "TaggedTemplateExpression",
            NodeKind::TemplateLiteral => "TemplateLiteral",
            NodeKind::ThisExpression => "ThisExpression",
            NodeKind::UnaryExpression => "UnaryExpression",
            NodeKind::UpdateExpression => "UpdateExpression",
            NodeKind::YieldExpression => "YieldExpression",
            NodeKind::ArrayPattern => "ArrayPattern",
            NodeKind::AssignmentPattern => "AssignmentPattern",
            NodeKind::ObjectPattern => "ObjectPattern",
            NodeKind::RestElement => "RestElement",
            NodeKind::Unrecognized(raw) => raw,
        }
    }
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl StmtKind {
    pub fn kind(&self) -> NodeKind {
        match self {
            StmtKind::Block(_) => NodeKind::BlockStatement,
            StmtKind::Empty => NodeKind::EmptyStatement,
            StmtKind::Expression(_) => NodeKind::ExpressionStatement,
            StmtKind::If { .. } => NodeKind::IfStatement,
            StmtKind::Function(_) => NodeKind::FunctionDeclaration,
            StmtKind::Return(_) => NodeKind::ReturnStatement,
            StmtKind::VariableDeclaration { .. } => NodeKind::VariableDeclaration,
            StmtKind::Switch { .. } => NodeKind::SwitchStatement,
            StmtKind::Import { .. } => NodeKind::ImportDeclaration,
            StmtKind::Break => NodeKind::BreakStatement,
            StmtKind::Unsupported(kind) => *kind,
        }
    }
}

impl ExprKind {
    pub fn kind(&self) -> NodeKind {
        match self {
            ExprKind::Identifier(_) => NodeKind::Identifier,
            ExprKind::Literal(_) => NodeKind::Literal,
            ExprKind::Binary { .. } => NodeKind::BinaryExpression,
            ExprKind::Logical { .. } => NodeKind::LogicalExpression,
            ExprKind::Not(_) => NodeKind::UnaryExpression,
            ExprKind::Call { .. } => NodeKind::CallExpression,
            ExprKind::Member { .. } => NodeKind::MemberExpression,
            ExprKind::MetaProperty { .. } => NodeKind::MetaProperty,
            ExprKind::Unsupported(kind) => *kind,
        }
    }
}

impl PatternKind {
    pub fn kind(&self) -> NodeKind {
        match self {
            PatternKind::Identifier(_) => NodeKind::Identifier,
            PatternKind::Unsupported(kind) => *kind,
        }
    }
}

impl Program {
    pub fn strip_spans(&mut self) {
        self.span = Span::default();
        for s in &mut self.body {
            s.strip_spans();
        }
    }
}

impl Stmt {
    pub fn strip_spans(&mut self) {
        self.span = Span::default();
        self.node.strip_spans();
    }
}

impl StmtKind {
    pub fn strip_spans(&mut self) {
        match self {
            StmtKind::Block(body) => {
                for s in body {
                    s.strip_spans();
                }
            }
            StmtKind::Expression(e) | StmtKind::Return(Some(e)) => e.strip_spans(),
            StmtKind::If {
                test,
                consequent,
                alternate,
            } => {
                test.strip_spans();
                consequent.strip_spans();
                if let Some(alt) = alternate {
                    alt.strip_spans();
                }
            }
            StmtKind::Function(f) => {
                for p in &mut f.params {
                    p.span = Span::default();
                }
                for s in &mut f.body {
                    s.strip_spans();
                }
            }
            StmtKind::VariableDeclaration { declarations, .. } => {
                for d in declarations {
                    d.span = Span::default();
                    d.id.span = Span::default();
                    if let Some(init) = &mut d.init {
                        init.strip_spans();
                    }
                }
            }
            StmtKind::Switch {
                discriminant,
                cases,
            } => {
                discriminant.strip_spans();
                for c in cases {
                    c.span = Span::default();
                    if let Some(t) = &mut c.test {
                        t.strip_spans();
                    }
                    for s in &mut c.consequent {
                        s.strip_spans();
                    }
                }
            }
            _ => {}
        }
    }
}

impl Expr {
    pub fn strip_spans(&mut self) {
        self.span = Span::default();
        self.node.strip_spans();
    }
}

impl ExprKind {
    pub fn strip_spans(&mut self) {
        match self {
            ExprKind::Binary { left, right, .. } | ExprKind::Logical { left, right, .. } => {
                left.strip_spans();
                right.strip_spans();
            }
            ExprKind::Not(e) => e.strip_spans(),
            ExprKind::Call { callee, arguments } => {
                callee.strip_spans();
                for a in arguments {
                    a.strip_spans();
                }
            }
            ExprKind::Member { object, .. } => object.strip_spans(),
            _ => {}
        }
    }
}
