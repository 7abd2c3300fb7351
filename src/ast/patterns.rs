use std::collections::BTreeSet;
use std::fmt::Display;

use crate::Span;

use super::ast::Literal;

/// A spanned pattern node. Patterns never come straight from the token
/// stream: the parser reads the left side of `=>`, `=` and `:=` as an
/// expression and translates it afterwards.
#[derive(Debug, Clone, PartialEq)]
pub struct Pattern {
    pub kind: PatternKind,
    pub span: Span,
}

impl Pattern {
    pub fn new(kind: PatternKind, span: Span) -> Pattern {
        Pattern { kind, span }
    }

    /// The set of names this pattern binds, in sorted order. Alternation
    /// alternatives must agree on this set.
    pub fn bound_names(&self) -> BTreeSet<String> {
        let mut names = BTreeSet::new();
        self.collect_bound_names(&mut names);
        names
    }

    fn collect_bound_names(&self, names: &mut BTreeSet<String>) {
        match &self.kind {
            PatternKind::Literal(_) | PatternKind::Wildcard => {}
            PatternKind::Identifier { name, .. } => {
                names.insert(name.clone());
            }
            PatternKind::Constructor { args, .. } => {
                for arg in args {
                    arg.collect_bound_names(names);
                }
            }
            PatternKind::Tuple(items) => {
                for item in items {
                    item.collect_bound_names(names);
                }
            }
            PatternKind::Record(entries) => {
                for (_, pattern) in entries {
                    pattern.collect_bound_names(names);
                }
            }
            PatternKind::Alternation(alternatives) => {
                for alternative in alternatives {
                    alternative.collect_bound_names(names);
                }
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum PatternKind {
    Literal(Literal),
    Wildcard,
    Identifier { name: String, mutable: bool },
    Constructor { name: String, args: Vec<Pattern> },
    Tuple(Vec<Pattern>),
    Record(Vec<(String, Pattern)>),
    Alternation(Vec<Pattern>),
}

impl Display for Pattern {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.kind {
            PatternKind::Literal(literal) => write!(f, "{}", literal),
            PatternKind::Wildcard => write!(f, "_"),
            PatternKind::Identifier { name, mutable } => {
                if *mutable {
                    write!(f, "~{}", name)
                } else {
                    write!(f, "{}", name)
                }
            }
            PatternKind::Constructor { name, args } => {
                if args.is_empty() {
                    return write!(f, "{}", name);
                }
                write!(f, "({}", name)?;
                for arg in args {
                    write!(f, " {}", arg)?;
                }
                write!(f, ")")
            }
            PatternKind::Tuple(items) => {
                write!(f, "(")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", item)?;
                }
                write!(f, ")")
            }
            PatternKind::Record(entries) => {
                if entries.is_empty() {
                    return write!(f, "{{||}}");
                }
                write!(f, "{{| ")?;
                for (i, (label, pattern)) in entries.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}: {}", label, pattern)?;
                }
                write!(f, " |}}")
            }
            PatternKind::Alternation(alternatives) => {
                write!(f, "(")?;
                for (i, alternative) in alternatives.iter().enumerate() {
                    if i > 0 {
                        write!(f, " | ")?;
                    }
                    write!(f, "{}", alternative)?;
                }
                write!(f, ")")
            }
        }
    }
}
