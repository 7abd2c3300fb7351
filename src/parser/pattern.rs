use std::collections::BTreeSet;

use crate::{
    ast::ast::{Expr, ExprKind},
    ast::patterns::{Pattern, PatternKind},
    errors::errors::{Error, ErrorImpl},
};

/// Splits a nested application into its head and argument list, so
/// `Cons x xs` comes back as `(Cons, [x, xs])`.
pub fn flatten_application(expr: &Expr) -> (&Expr, Vec<&Expr>) {
    let mut args = vec![];
    let mut current = expr;
    while let ExprKind::Application { func, arg } = &current.kind {
        args.push(arg.as_ref());
        current = func.as_ref();
    }
    args.reverse();
    (current, args)
}

pub fn is_constructor_name(name: &str) -> bool {
    name.chars().next().map(|c| c.is_uppercase()).unwrap_or(false)
}

/// Reads the left side of `=>` as a parameter list. An application
/// chain headed by a plain binder spreads into one pattern per element;
/// anything else is a single pattern.
pub fn expr_to_pattern_seq(expr: &Expr) -> Result<Vec<Pattern>, Error> {
    let (head, args) = flatten_application(expr);

    if !args.is_empty() {
        if let ExprKind::Identifier(name) = &head.kind {
            if !is_constructor_name(name) && name != "|" {
                let mut patterns = vec![expr_to_pattern(head)?];
                for arg in args {
                    patterns.push(expr_to_pattern(arg)?);
                }
                return Ok(patterns);
            }
        }
    }

    Ok(vec![expr_to_pattern(expr)?])
}

pub fn expr_to_pattern(expr: &Expr) -> Result<Pattern, Error> {
    match &expr.kind {
        ExprKind::Literal(literal) => Ok(Pattern::new(
            PatternKind::Literal(literal.clone()),
            expr.span.clone(),
        )),
        ExprKind::Identifier(name) => {
            if name == "_" {
                Ok(Pattern::new(PatternKind::Wildcard, expr.span.clone()))
            } else if is_constructor_name(name) {
                Ok(Pattern::new(
                    PatternKind::Constructor {
                        name: name.clone(),
                        args: vec![],
                    },
                    expr.span.clone(),
                ))
            } else {
                Ok(Pattern::new(
                    PatternKind::Identifier {
                        name: name.clone(),
                        mutable: false,
                    },
                    expr.span.clone(),
                ))
            }
        }
        ExprKind::Implicit(inner) => match &inner.kind {
            ExprKind::Identifier(name) if name != "_" && !is_constructor_name(name) => {
                Ok(Pattern::new(
                    PatternKind::Identifier {
                        name: name.clone(),
                        mutable: true,
                    },
                    expr.span.clone(),
                ))
            }
            _ => Err(Error::new(
                ErrorImpl::InvalidPattern {
                    message: String::from("`~` in a pattern must mark a plain binder"),
                },
                expr.span.start.clone(),
            )),
        },
        ExprKind::Tuple(items) => {
            let mut patterns = vec![];
            for item in items {
                patterns.push(expr_to_pattern(item)?);
            }
            Ok(Pattern::new(
                PatternKind::Tuple(patterns),
                expr.span.clone(),
            ))
        }
        ExprKind::Record(entries) => {
            let mut fields = vec![];
            for (label, value) in entries {
                fields.push((label.clone(), expr_to_pattern(value)?));
            }
            Ok(Pattern::new(PatternKind::Record(fields), expr.span.clone()))
        }
        ExprKind::Application { .. } => {
            let (head, args) = flatten_application(expr);
            match &head.kind {
                ExprKind::Identifier(name) if name == "|" && args.len() == 2 => {
                    let mut alternatives = vec![];
                    collect_alternation(expr, &mut alternatives)?;
                    check_alternation_bindings(&alternatives)?;
                    Ok(Pattern::new(
                        PatternKind::Alternation(alternatives),
                        expr.span.clone(),
                    ))
                }
                ExprKind::Identifier(name) if is_constructor_name(name) => {
                    let mut fields = vec![];
                    for arg in args {
                        fields.push(expr_to_pattern(arg)?);
                    }
                    Ok(Pattern::new(
                        PatternKind::Constructor {
                            name: name.clone(),
                            args: fields,
                        },
                        expr.span.clone(),
                    ))
                }
                _ => Err(Error::new(
                    ErrorImpl::InvalidPattern {
                        message: String::from("only constructors can be applied in a pattern"),
                    },
                    expr.span.start.clone(),
                )),
            }
        }
        _ => Err(Error::new(
            ErrorImpl::InvalidPattern {
                message: String::from("this expression cannot be used as a pattern"),
            },
            expr.span.start.clone(),
        )),
    }
}

/// Alternation groups nest to the left, so walk the left spine first to
/// keep the alternatives in source order.
fn collect_alternation(expr: &Expr, out: &mut Vec<Pattern>) -> Result<(), Error> {
    if let ExprKind::Application { func, arg } = &expr.kind {
        if let ExprKind::Application { func: inner, arg: left } = &func.kind {
            if let ExprKind::Identifier(name) = &inner.kind {
                if name == "|" {
                    collect_alternation(left, out)?;
                    out.push(expr_to_pattern(arg)?);
                    return Ok(());
                }
            }
        }
    }
    out.push(expr_to_pattern(expr)?);
    Ok(())
}

fn check_alternation_bindings(alternatives: &[Pattern]) -> Result<(), Error> {
    let first: BTreeSet<String> = alternatives[0].bound_names();
    for alternative in &alternatives[1..] {
        if alternative.bound_names() != first {
            return Err(Error::new(
                ErrorImpl::InvalidPattern {
                    message: String::from(
                        "alternation alternatives must bind the same names",
                    ),
                },
                alternative.span.start.clone(),
            ));
        }
    }
    Ok(())
}
