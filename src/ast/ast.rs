use std::fmt::Display;

use bigdecimal::BigDecimal;
use num_bigint::BigInt;

use crate::Span;

use super::patterns::Pattern;

/// Literal values carried by expression and pattern nodes.
///
/// Integer and float literals are arbitrary-precision so the front end
/// never silently truncates what the programmer wrote.
#[derive(Debug, Clone, PartialEq)]
pub enum Literal {
    Unit,
    Int(BigInt),
    Float(BigDecimal),
    Char(char),
    Str(String),
}

impl Display for Literal {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Literal::Unit => write!(f, "()"),
            Literal::Int(value) => write!(f, "{}", value),
            Literal::Float(value) => write!(f, "{}", value),
            Literal::Char(value) => write!(f, "'{}'", value),
            Literal::Str(value) => write!(f, "{:?}", value),
        }
    }
}

/// A spanned expression node.
#[derive(Debug, Clone, PartialEq)]
pub struct Expr {
    pub kind: ExprKind,
    pub span: Span,
}

impl Expr {
    pub fn new(kind: ExprKind, span: Span) -> Expr {
        Expr { kind, span }
    }
}

/// One arm of a lambda-case. Multi-parameter arms carry one pattern per
/// parameter; every arm of the same lambda-case has the same arity.
#[derive(Debug, Clone, PartialEq)]
pub struct LambdaArm {
    pub patterns: Vec<Pattern>,
    pub body: Expr,
}

/// The closed set of expression forms.
///
/// Operator uses never get dedicated nodes: `a + b` parses to
/// `Application(Application(Identifier("+"), a), b)`.
#[derive(Debug, Clone, PartialEq)]
pub enum ExprKind {
    Literal(Literal),
    Identifier(String),
    Application {
        func: Box<Expr>,
        arg: Box<Expr>,
    },
    Tuple(Vec<Expr>),
    List(Vec<Expr>),
    Map(Vec<(Expr, Expr)>),
    Record(Vec<(String, Expr)>),
    Binding {
        pattern: Pattern,
        value: Box<Expr>,
    },
    Rebind {
        pattern: Pattern,
        value: Box<Expr>,
    },
    LambdaCase(Vec<LambdaArm>),
    Block(Vec<Expr>),
    TypeAnnotation {
        expr: Box<Expr>,
        ty: Box<Expr>,
    },
    ParamAnnotation {
        ty: Box<Expr>,
        name: String,
    },
    Contextual(Box<Expr>),
    Implicit(Box<Expr>),
    /// A macro invocation that has not been expanded. The parser expands
    /// every registered macro inline, so this form only appears if an AST
    /// is built by hand.
    MacroCall {
        name: String,
        fragment: Box<Expr>,
    },
}

impl Display for Expr {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.kind {
            ExprKind::Literal(literal) => write!(f, "{}", literal),
            ExprKind::Identifier(name) => write!(f, "{}", name),
            ExprKind::Application { func, arg } => write!(f, "({} {})", func, arg),
            ExprKind::Tuple(items) => {
                write!(f, "(")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", item)?;
                }
                write!(f, ")")
            }
            ExprKind::List(items) => {
                write!(f, "[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", item)?;
                }
                write!(f, "]")
            }
            ExprKind::Map(entries) => {
                if entries.is_empty() {
                    return write!(f, "[||]");
                }
                write!(f, "[| ")?;
                for (i, (key, value)) in entries.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}: {}", key, value)?;
                }
                write!(f, " |]")
            }
            ExprKind::Record(entries) => {
                if entries.is_empty() {
                    return write!(f, "{{||}}");
                }
                write!(f, "{{| ")?;
                for (i, (label, value)) in entries.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}: {}", label, value)?;
                }
                write!(f, " |}}")
            }
            ExprKind::Binding { pattern, value } => write!(f, "{} = {}", pattern, value),
            ExprKind::Rebind { pattern, value } => write!(f, "{} := {}", pattern, value),
            ExprKind::LambdaCase(arms) => {
                write!(f, "(|")?;
                for (i, arm) in arms.iter().enumerate() {
                    if i > 0 {
                        write!(f, " |")?;
                    }
                    write!(f, " ")?;
                    for pattern in arm.patterns.iter() {
                        write!(f, "{} ", pattern)?;
                    }
                    write!(f, "=> {}", arm.body)?;
                }
                write!(f, " |)")
            }
            ExprKind::Block(statements) => {
                if statements.is_empty() {
                    return write!(f, "{{}}");
                }
                write!(f, "{{ ")?;
                for (i, statement) in statements.iter().enumerate() {
                    if i > 0 {
                        write!(f, "; ")?;
                    }
                    write!(f, "{}", statement)?;
                }
                write!(f, " }}")
            }
            ExprKind::TypeAnnotation { expr, ty } => write!(f, "({} : {})", expr, ty),
            ExprKind::ParamAnnotation { ty, name } => write!(f, "({} @ {})", ty, name),
            ExprKind::Contextual(inner) => write!(f, "%{}", inner),
            ExprKind::Implicit(inner) => write!(f, "~{}", inner),
            ExprKind::MacroCall { name, fragment } => write!(f, "{} {}", name, fragment),
        }
    }
}
