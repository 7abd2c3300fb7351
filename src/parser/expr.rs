use std::str::FromStr;

use bigdecimal::BigDecimal;
use num_bigint::BigInt;

use crate::{
    ast::ast::{Expr, ExprKind, LambdaArm, Literal},
    errors::errors::{Error, ErrorImpl},
    lexer::tokens::{Token, TokenKind},
    Span,
};

use super::{
    operators::{
        Assoc, Fixity, OperatorEntry, PREC_ANNOTATION, PREC_ATOM, PREC_COMMA, PREC_LAMBDA,
    },
    parser::Parser,
    pattern::expr_to_pattern_seq,
    stmt::parse_block_until,
};

/// Where an expression is being parsed. Conditions of `if`, `while` and
/// `for` use `NoBraceCall` so a following `{` starts the branch block
/// instead of being swallowed as a juxtaposition argument.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExprContext {
    Full,
    NoBraceCall,
}

pub fn parse_expression(parser: &mut Parser, min_prec: u32) -> Result<Expr, Error> {
    parse_expr_ctx(parser, min_prec, ExprContext::Full)
}

pub fn parse_expr_ctx(
    parser: &mut Parser,
    min_prec: u32,
    ctx: ExprContext,
) -> Result<Expr, Error> {
    parse_expr_chain(parser, min_prec, ctx, None)
}

/// `chain` carries the infix entry whose right side this call is
/// parsing, so mixed-associativity chains at one precedence level are
/// caught even across the recursion for right-associative operators.
fn parse_expr_chain(
    parser: &mut Parser,
    min_prec: u32,
    ctx: ExprContext,
    chain: Option<OperatorEntry>,
) -> Result<Expr, Error> {
    parser.enter_recursion()?;
    let result = parse_expr_inner(parser, min_prec, ctx, chain);
    parser.exit_recursion();
    result
}

fn parse_expr_inner(
    parser: &mut Parser,
    min_prec: u32,
    ctx: ExprContext,
    chain: Option<OperatorEntry>,
) -> Result<Expr, Error> {
    let mut lhs = parse_operand(parser, ctx)?;
    let mut last_infix = chain;

    loop {
        let token = parser.current_token().clone();

        if token.kind == TokenKind::EOF {
            break;
        }

        if token.kind.can_carry_fixity() {
            if let Some(entry) = parser.operators().lookup(&token.value, Fixity::Infix).cloned() {
                if entry.precedence < min_prec {
                    break;
                }
                if let Some(previous) = &last_infix {
                    if previous.precedence == entry.precedence
                        && (previous.assoc != entry.assoc || entry.assoc == Assoc::None)
                    {
                        return Err(Error::new(
                            ErrorImpl::AmbiguousOperatorChain {
                                first: previous.name.clone(),
                                second: entry.name.clone(),
                            },
                            token.span.start.clone(),
                        ));
                    }
                }
                parser.advance();
                lhs = fold_infix(parser, lhs, &token, &entry, ctx)?;
                last_infix = Some(entry);
                continue;
            }

            if let Some(entry) = parser.operators().lookup(&token.value, Fixity::Suffix).cloned() {
                if entry.precedence < min_prec {
                    break;
                }
                parser.advance();
                let span = Span::merge(&lhs.span, &token.span);
                lhs = Expr::new(
                    ExprKind::Application {
                        func: Box::new(Expr::new(
                            ExprKind::Identifier(token.value.clone()),
                            token.span.clone(),
                        )),
                        arg: Box::new(lhs),
                    },
                    span,
                );
                continue;
            }

            if token.kind == TokenKind::SymIdentifier {
                if parser.operators().lookup(&token.value, Fixity::Prefix).is_some() {
                    let arg = parse_operand(parser, ctx)?;
                    let span = Span::merge(&lhs.span, &arg.span);
                    lhs = Expr::new(
                        ExprKind::Application {
                            func: Box::new(lhs),
                            arg: Box::new(arg),
                        },
                        span,
                    );
                    continue;
                }
                return Err(Error::new(
                    ErrorImpl::UndeclaredOperator {
                        operator: token.value.clone(),
                    },
                    token.span.start.clone(),
                ));
            }
            // an alphabetic identifier with no fixity entry falls through
            // to plain juxtaposition
        }

        if starts_plain_atom(parser, &token) {
            if ctx == ExprContext::NoBraceCall && token.kind == TokenKind::OpenCurly {
                break;
            }
            let arg = parse_operand(parser, ctx)?;
            let span = Span::merge(&lhs.span, &arg.span);
            lhs = Expr::new(
                ExprKind::Application {
                    func: Box::new(lhs),
                    arg: Box::new(arg),
                },
                span,
            );
            continue;
        }

        break;
    }

    Ok(lhs)
}

/// Whether `token` can begin a juxtaposition argument. Registered macro
/// names never continue an application; they only expand in operand
/// position.
fn starts_plain_atom(parser: &Parser, token: &Token) -> bool {
    match token.kind {
        TokenKind::Int
        | TokenKind::Float
        | TokenKind::Char
        | TokenKind::Str
        | TokenKind::Underscore
        | TokenKind::OpenParen
        | TokenKind::OpenBracket
        | TokenKind::OpenCurly
        | TokenKind::OpenParenPipe
        | TokenKind::OpenBracketPipe
        | TokenKind::OpenCurlyPipe
        | TokenKind::Tilde
        | TokenKind::Percent
        | TokenKind::PercentTilde => true,
        TokenKind::Identifier => !parser.macros().contains(&token.value),
        _ => false,
    }
}

fn next_min_prec(entry: &OperatorEntry) -> u32 {
    match entry.assoc {
        Assoc::Right => entry.precedence,
        Assoc::Left | Assoc::None => entry.precedence + 1,
    }
}

fn fold_infix(
    parser: &mut Parser,
    lhs: Expr,
    op: &Token,
    entry: &OperatorEntry,
    ctx: ExprContext,
) -> Result<Expr, Error> {
    match op.kind {
        TokenKind::Comma => fold_tuple(parser, lhs, ctx),
        TokenKind::FatArrow => fold_lambda(parser, lhs, entry, ctx),
        TokenKind::Colon => {
            let ty = parse_expr_chain(parser, next_min_prec(entry), ctx, Some(entry.clone()))?;
            let span = Span::merge(&lhs.span, &ty.span);
            Ok(Expr::new(
                ExprKind::TypeAnnotation {
                    expr: Box::new(lhs),
                    ty: Box::new(ty),
                },
                span,
            ))
        }
        TokenKind::At => {
            let name = parse_expr_chain(parser, next_min_prec(entry), ctx, Some(entry.clone()))?;
            match name.kind {
                ExprKind::Identifier(label) => {
                    let span = Span::merge(&lhs.span, &name.span);
                    Ok(Expr::new(
                        ExprKind::ParamAnnotation {
                            ty: Box::new(lhs),
                            name: label,
                        },
                        span,
                    ))
                }
                _ => Err(Error::new(
                    ErrorImpl::UnexpectedTokenDetailed {
                        token: op.value.clone(),
                        message: String::from("the right side of `@` must be a parameter name"),
                    },
                    name.span.start.clone(),
                )),
            }
        }
        _ => {
            let rhs = parse_expr_chain(parser, next_min_prec(entry), ctx, Some(entry.clone()))?;
            let inner_span = Span::merge(&lhs.span, &op.span);
            let span = Span::merge(&lhs.span, &rhs.span);
            Ok(Expr::new(
                ExprKind::Application {
                    func: Box::new(Expr::new(
                        ExprKind::Application {
                            func: Box::new(Expr::new(
                                ExprKind::Identifier(op.value.clone()),
                                op.span.clone(),
                            )),
                            arg: Box::new(lhs),
                        },
                        inner_span,
                    )),
                    arg: Box::new(rhs),
                },
                span,
            ))
        }
    }
}

/// `,` folds a whole chain into one flat tuple, so `a, b, c` has arity
/// three rather than nesting.
fn fold_tuple(parser: &mut Parser, first: Expr, ctx: ExprContext) -> Result<Expr, Error> {
    let mut items = vec![first];

    loop {
        items.push(parse_expr_ctx(parser, PREC_COMMA + 1, ctx)?);
        if parser.current_token_kind() == TokenKind::Comma {
            parser.advance();
            continue;
        }
        break;
    }

    let span = Span::merge(&items[0].span, &items[items.len() - 1].span);
    Ok(Expr::new(ExprKind::Tuple(items), span))
}

/// `=>` translates its left side to patterns and wraps the body in a
/// one-arm lambda-case. An application chain with a non-constructor head
/// spreads into one pattern per element, which is how multi-parameter
/// arms are written.
fn fold_lambda(
    parser: &mut Parser,
    lhs: Expr,
    entry: &OperatorEntry,
    ctx: ExprContext,
) -> Result<Expr, Error> {
    let patterns = expr_to_pattern_seq(&lhs)?;
    let body = parse_expr_chain(parser, PREC_LAMBDA, ctx, Some(entry.clone()))?;
    let span = Span::merge(&lhs.span, &body.span);
    Ok(Expr::new(
        ExprKind::LambdaCase(vec![LambdaArm { patterns, body }]),
        span,
    ))
}

fn parse_operand(parser: &mut Parser, ctx: ExprContext) -> Result<Expr, Error> {
    let token = parser.current_token().clone();

    if matches!(token.kind, TokenKind::SymIdentifier | TokenKind::Identifier) {
        if let Some(entry) = parser.operators().lookup(&token.value, Fixity::Prefix).cloned() {
            parser.advance();
            let operand = parse_expr_ctx(parser, entry.precedence, ctx)?;
            let span = Span::merge(&token.span, &operand.span);
            return Ok(Expr::new(
                ExprKind::Application {
                    func: Box::new(Expr::new(
                        ExprKind::Identifier(token.value.clone()),
                        token.span.clone(),
                    )),
                    arg: Box::new(operand),
                },
                span,
            ));
        }
    }

    parse_atom(parser)
}

pub fn parse_atom(parser: &mut Parser) -> Result<Expr, Error> {
    let token = parser.current_token().clone();

    match token.kind {
        TokenKind::Int => {
            parser.advance();
            let literal = int_literal(&token)?;
            Ok(Expr::new(ExprKind::Literal(literal), token.span))
        }
        TokenKind::Float => {
            parser.advance();
            let literal = float_literal(&token)?;
            Ok(Expr::new(ExprKind::Literal(literal), token.span))
        }
        TokenKind::Char => {
            parser.advance();
            let literal = char_literal(&token)?;
            Ok(Expr::new(ExprKind::Literal(literal), token.span))
        }
        TokenKind::Str => {
            parser.advance();
            Ok(Expr::new(
                ExprKind::Literal(Literal::Str(token.value)),
                token.span,
            ))
        }
        TokenKind::Underscore => {
            parser.advance();
            Ok(Expr::new(ExprKind::Identifier(String::from("_")), token.span))
        }
        TokenKind::Identifier => {
            parser.advance();
            if parser.macros().contains(&token.value) {
                return parser.expand_macro(&token);
            }
            Ok(Expr::new(ExprKind::Identifier(token.value), token.span))
        }
        kind if kind.is_reserved_word() && parser.macros().contains(&token.value) => {
            parser.advance();
            parser.expand_macro(&token)
        }
        TokenKind::SymIdentifier => {
            if parser.operators().is_declared(&token.value) {
                parser.advance();
                Ok(Expr::new(ExprKind::Identifier(token.value), token.span))
            } else {
                Err(Error::new(
                    ErrorImpl::UndeclaredOperator {
                        operator: token.value.clone(),
                    },
                    token.span.start.clone(),
                ))
            }
        }
        TokenKind::Tilde => {
            parser.advance();
            let operand = parse_expr_ctx(parser, PREC_ATOM, ExprContext::Full)?;
            let span = Span::merge(&token.span, &operand.span);
            Ok(Expr::new(ExprKind::Implicit(Box::new(operand)), span))
        }
        TokenKind::Percent => {
            parser.advance();
            let operand = parse_expr_ctx(parser, PREC_ATOM, ExprContext::Full)?;
            let span = Span::merge(&token.span, &operand.span);
            Ok(Expr::new(ExprKind::Contextual(Box::new(operand)), span))
        }
        TokenKind::PercentTilde => {
            parser.advance();
            let operand = parse_expr_ctx(parser, PREC_ATOM, ExprContext::Full)?;
            let span = Span::merge(&token.span, &operand.span);
            let implicit = Expr::new(ExprKind::Implicit(Box::new(operand)), span.clone());
            Ok(Expr::new(ExprKind::Contextual(Box::new(implicit)), span))
        }
        TokenKind::OpenParen => parse_paren_group(parser),
        TokenKind::OpenBracket => parse_list(parser),
        TokenKind::OpenCurly => {
            let open = parser.advance().clone();
            parse_block_until(parser, &open, TokenKind::CloseCurly, "}")
        }
        TokenKind::OpenParenPipe => parse_lambda_case(parser),
        TokenKind::OpenBracketPipe => parse_map(parser),
        TokenKind::OpenCurlyPipe => parse_record(parser),
        TokenKind::EOF => Err(Error::new(
            ErrorImpl::UnexpectedEof,
            token.span.start.clone(),
        )),
        _ => Err(Error::new(
            ErrorImpl::UnexpectedToken {
                token: token.value.clone(),
            },
            token.span.start.clone(),
        )),
    }
}

/// `()` is the unit literal, `(e)` is grouping, and `p | q` groups fold
/// into applications of `|` that pattern translation reads back as
/// alternation.
fn parse_paren_group(parser: &mut Parser) -> Result<Expr, Error> {
    let open = parser.advance().clone();

    if parser.current_token_kind() == TokenKind::CloseParen {
        let close = parser.advance().clone();
        return Ok(Expr::new(
            ExprKind::Literal(Literal::Unit),
            Span::merge(&open.span, &close.span),
        ));
    }

    let mut expr = parse_expression(parser, 0)?;

    while parser.current_token_kind() == TokenKind::Pipe {
        let pipe = parser.advance().clone();
        let rhs = parse_expression(parser, 0)?;
        let inner_span = Span::merge(&expr.span, &pipe.span);
        let span = Span::merge(&expr.span, &rhs.span);
        expr = Expr::new(
            ExprKind::Application {
                func: Box::new(Expr::new(
                    ExprKind::Application {
                        func: Box::new(Expr::new(
                            ExprKind::Identifier(String::from("|")),
                            pipe.span,
                        )),
                        arg: Box::new(expr),
                    },
                    inner_span,
                )),
                arg: Box::new(rhs),
            },
            span,
        );
    }

    let close = close_group(parser, &open, TokenKind::CloseParen, ")")?;
    Ok(Expr::new(expr.kind, Span::merge(&open.span, &close.span)))
}

fn parse_list(parser: &mut Parser) -> Result<Expr, Error> {
    let open = parser.advance().clone();
    let mut items = vec![];

    if parser.current_token_kind() != TokenKind::CloseBracket {
        loop {
            items.push(parse_expr_ctx(parser, PREC_COMMA + 1, ExprContext::Full)?);
            if parser.current_token_kind() == TokenKind::Comma {
                parser.advance();
                if parser.current_token_kind() == TokenKind::CloseBracket {
                    break;
                }
                continue;
            }
            break;
        }
    }

    let close = close_group(parser, &open, TokenKind::CloseBracket, "]")?;
    Ok(Expr::new(
        ExprKind::List(items),
        Span::merge(&open.span, &close.span),
    ))
}

fn parse_map(parser: &mut Parser) -> Result<Expr, Error> {
    let open = parser.advance().clone();
    let mut entries = vec![];

    if parser.current_token_kind() != TokenKind::PipeCloseBracket {
        loop {
            let key = parse_expr_ctx(parser, PREC_ANNOTATION + 1, ExprContext::Full)?;
            parser.expect(TokenKind::Colon)?;
            let value = parse_expr_ctx(parser, PREC_COMMA + 1, ExprContext::Full)?;
            entries.push((key, value));

            if parser.current_token_kind() == TokenKind::Comma {
                parser.advance();
                if parser.current_token_kind() == TokenKind::PipeCloseBracket {
                    break;
                }
                continue;
            }
            break;
        }
    }

    let close = close_group(parser, &open, TokenKind::PipeCloseBracket, "|]")?;
    Ok(Expr::new(
        ExprKind::Map(entries),
        Span::merge(&open.span, &close.span),
    ))
}

fn parse_record(parser: &mut Parser) -> Result<Expr, Error> {
    let open = parser.advance().clone();
    let mut entries = vec![];

    if parser.current_token_kind() != TokenKind::PipeCloseCurly {
        loop {
            let label = {
                let token = parser.current_token();
                let error = Error::new(
                    ErrorImpl::UnexpectedTokenDetailed {
                        token: token.value.clone(),
                        message: String::from("record labels must be plain identifiers"),
                    },
                    token.span.start.clone(),
                );
                parser.expect_error(TokenKind::Identifier, Some(error))?
            };

            let value = if parser.current_token_kind() == TokenKind::Colon {
                parser.advance();
                parse_expr_ctx(parser, PREC_COMMA + 1, ExprContext::Full)?
            } else {
                // shorthand: `{| x |}` is `{| x: x |}`
                Expr::new(ExprKind::Identifier(label.value.clone()), label.span.clone())
            };
            entries.push((label.value, value));

            if parser.current_token_kind() == TokenKind::Comma {
                parser.advance();
                if parser.current_token_kind() == TokenKind::PipeCloseCurly {
                    break;
                }
                continue;
            }
            break;
        }
    }

    let close = close_group(parser, &open, TokenKind::PipeCloseCurly, "|}")?;
    Ok(Expr::new(
        ExprKind::Record(entries),
        Span::merge(&open.span, &close.span),
    ))
}

fn parse_lambda_case(parser: &mut Parser) -> Result<Expr, Error> {
    let open = parser.advance().clone();
    let mut arms: Vec<LambdaArm> = vec![];

    if parser.current_token_kind() == TokenKind::PipeCloseParen {
        let token = parser.current_token();
        return Err(Error::new(
            ErrorImpl::UnexpectedTokenDetailed {
                token: token.value.clone(),
                message: String::from("a lambda case needs at least one arm"),
            },
            token.span.start.clone(),
        ));
    }

    loop {
        let case = parse_expression(parser, 0)?;
        match case.kind {
            ExprKind::LambdaCase(mut case_arms) if case_arms.len() == 1 => {
                arms.push(case_arms.remove(0));
            }
            _ => {
                return Err(Error::new(
                    ErrorImpl::InvalidPattern {
                        message: String::from("every arm must have the form `pattern => body`"),
                    },
                    case.span.start.clone(),
                ))
            }
        }

        if parser.current_token_kind() == TokenKind::Pipe {
            parser.advance();
            continue;
        }
        break;
    }

    let close = close_group(parser, &open, TokenKind::PipeCloseParen, "|)")?;

    let arity = arms[0].patterns.len();
    for arm in arms.iter() {
        if arm.patterns.len() != arity {
            return Err(Error::new(
                ErrorImpl::InvalidPattern {
                    message: format!(
                        "arm takes {} parameters where the first arm takes {}",
                        arm.patterns.len(),
                        arity
                    ),
                },
                arm.patterns[0].span.start.clone(),
            ));
        }
    }

    Ok(Expr::new(
        ExprKind::LambdaCase(arms),
        Span::merge(&open.span, &close.span),
    ))
}

fn close_group(
    parser: &mut Parser,
    open: &Token,
    close: TokenKind,
    lexeme: &str,
) -> Result<Token, Error> {
    let token = parser.current_token();
    if token.kind == close {
        return Ok(parser.advance().clone());
    }
    if token.kind == TokenKind::EOF {
        return Err(Error::new(
            ErrorImpl::UnexpectedEof,
            token.span.start.clone(),
        ));
    }
    Err(Error::new(
        ErrorImpl::MismatchedDelimiter {
            expected: lexeme.to_string(),
            found: token.value.clone(),
            opened_at: open.span.start.0,
        },
        token.span.start.clone(),
    ))
}

fn int_literal(token: &Token) -> Result<Literal, Error> {
    let cleaned: String = token.value.chars().filter(|c| *c != '_').collect();
    let (digits, radix) = if let Some(rest) = cleaned.strip_prefix("0x").or_else(|| cleaned.strip_prefix("0X")) {
        (rest, 16)
    } else if let Some(rest) = cleaned.strip_prefix("0o").or_else(|| cleaned.strip_prefix("0O")) {
        (rest, 8)
    } else if let Some(rest) = cleaned.strip_prefix("0b").or_else(|| cleaned.strip_prefix("0B")) {
        (rest, 2)
    } else {
        (cleaned.as_str(), 10)
    };

    BigInt::parse_bytes(digits.as_bytes(), radix)
        .map(Literal::Int)
        .ok_or_else(|| {
            Error::new(
                ErrorImpl::NumberParseError {
                    token: token.value.clone(),
                },
                token.span.start.clone(),
            )
        })
}

fn float_literal(token: &Token) -> Result<Literal, Error> {
    let cleaned: String = token.value.chars().filter(|c| *c != '_').collect();
    BigDecimal::from_str(&cleaned).map(Literal::Float).map_err(|_| {
        Error::new(
            ErrorImpl::NumberParseError {
                token: token.value.clone(),
            },
            token.span.start.clone(),
        )
    })
}

fn char_literal(token: &Token) -> Result<Literal, Error> {
    token
        .value
        .chars()
        .next()
        .map(Literal::Char)
        .ok_or_else(|| Error::new(ErrorImpl::EmptyCharLiteral, token.span.start.clone()))
}
