//! The standard macro set.
//!
//! Every form here is an ordinary registered handler built on the same
//! public entry points user macros get: `parse_expression`, `parse_atom`
//! and the block/pattern helpers. Nothing in the parser core knows these
//! names; a unit parsed with an empty registry treats `if` or `while`
//! like any other unregistered word.

use crate::{
    ast::ast::{Expr, ExprKind, LambdaArm, Literal},
    ast::patterns::{Pattern, PatternKind},
    errors::errors::{Error, ErrorImpl},
    lexer::tokens::{Token, TokenKind},
    parser::{
        expr::{parse_atom, parse_expr_ctx, parse_expression, ExprContext},
        operators::{Assoc, Fixity, PREC_ANNOTATION, PREC_ATOM, PREC_COMMA},
        parser::Parser,
        pattern::{expr_to_pattern, flatten_application, is_constructor_name},
        stmt::parse_block_until,
    },
    Span,
};

use super::expander::MacroRegistry;

/// Registers the standard handlers. Call this on a fresh registry before
/// handing it to the parser; leave it out to parse with bare syntax
/// only.
pub fn install(registry: &mut MacroRegistry) {
    registry.register("if", if_handler);
    registry.register("case", case_handler);
    registry.register("match", case_handler);
    registry.register("fn", fn_handler);
    registry.register("do", do_handler);
    registry.register("while", while_handler);
    registry.register("for", for_handler);
    registry.register("infix", infix_handler);
    registry.register("infixl", infixl_handler);
    registry.register("infixr", infixr_handler);
    registry.register("prefix", prefix_handler);
    registry.register("suffix", suffix_handler);
    registry.register("data", data_handler);
    registry.register("trait", trait_handler);
    registry.register("import", import_handler);
}

/// `if COND then E [else E]` or `if COND { … } [else …]`.
///
/// Desugars to an application of a two-arm lambda-case to the
/// condition; a missing else branch becomes Unit. `else if` needs no
/// special case since the else branch re-enters expression parsing and
/// expands the nested `if` on its own.
fn if_handler(parser: &mut Parser, token: &Token) -> Result<Expr, Error> {
    let condition = parse_expr_ctx(parser, 0, ExprContext::NoBraceCall)?;

    let then_branch = match parser.current_token_kind() {
        TokenKind::Then => {
            parser.advance();
            parse_expression(parser, 0)?
        }
        TokenKind::OpenCurly => parse_atom(parser)?,
        _ => {
            let current = parser.current_token();
            return Err(Error::new(
                ErrorImpl::UnexpectedTokenDetailed {
                    token: current.value.clone(),
                    message: String::from("expected `then` or a `{` block after the condition"),
                },
                current.span.start.clone(),
            ));
        }
    };

    let else_branch = if parser.current_token_kind() == TokenKind::Else {
        parser.advance();
        parse_expression(parser, 0)?
    } else {
        Expr::new(ExprKind::Literal(Literal::Unit), then_branch.span.clone())
    };

    let span = Span::merge(&token.span, &else_branch.span);
    let true_arm = LambdaArm {
        patterns: vec![Pattern::new(
            PatternKind::Constructor {
                name: String::from("True"),
                args: vec![],
            },
            then_branch.span.clone(),
        )],
        body: then_branch,
    };
    let false_arm = LambdaArm {
        patterns: vec![Pattern::new(
            PatternKind::Constructor {
                name: String::from("False"),
                args: vec![],
            },
            else_branch.span.clone(),
        )],
        body: else_branch,
    };
    let arms = Expr::new(ExprKind::LambdaCase(vec![true_arm, false_arm]), span.clone());

    Ok(Expr::new(
        ExprKind::Application {
            func: Box::new(arms),
            arg: Box::new(condition),
        },
        span,
    ))
}

/// `case SCRUT of ARMS`, also registered as `match`. The arms are any
/// expression that evaluates to a function, most usefully a lambda-case
/// group, and the whole form is just `ARMS SCRUT`.
fn case_handler(parser: &mut Parser, token: &Token) -> Result<Expr, Error> {
    let scrutinee = parse_expression(parser, 0)?;
    parser.expect(TokenKind::Of)?;
    let arms = parse_expr_ctx(parser, PREC_ATOM, ExprContext::Full)?;

    let span = Span::merge(&token.span, &arms.span);
    Ok(Expr::new(
        ExprKind::Application {
            func: Box::new(arms),
            arg: Box::new(scrutinee),
        },
        span,
    ))
}

/// `fn NAME P1 P2 { BODY }`. Parameters are atoms read as patterns; the
/// whole form is a Binding of NAME to a multi-parameter lambda-case, or
/// to the bare block when there are no parameters.
fn fn_handler(parser: &mut Parser, token: &Token) -> Result<Expr, Error> {
    let name = {
        let current = parser.current_token();
        let error = Error::new(
            ErrorImpl::UnexpectedTokenDetailed {
                token: current.value.clone(),
                message: String::from("expected a function name after `fn`"),
            },
            current.span.start.clone(),
        );
        parser.expect_error(TokenKind::Identifier, Some(error))?
    };

    let mut params = vec![];
    loop {
        match parser.current_token_kind() {
            TokenKind::OpenCurly => break,
            TokenKind::EOF => {
                let current = parser.current_token();
                return Err(Error::new(
                    ErrorImpl::UnexpectedEof,
                    current.span.start.clone(),
                ));
            }
            _ => {
                let param = parse_atom(parser)?;
                params.push(expr_to_pattern(&param)?);
            }
        }
    }

    let open = parser.advance().clone();
    let body = parse_block_until(parser, &open, TokenKind::CloseCurly, "}")?;
    let span = Span::merge(&token.span, &body.span);

    let value = if params.is_empty() {
        body
    } else {
        Expr::new(
            ExprKind::LambdaCase(vec![LambdaArm {
                patterns: params,
                body,
            }]),
            span.clone(),
        )
    };

    let pattern = Pattern::new(
        PatternKind::Identifier {
            name: name.value.clone(),
            mutable: false,
        },
        name.span.clone(),
    );
    Ok(Expr::new(
        ExprKind::Binding {
            pattern,
            value: Box::new(value),
        },
        span,
    ))
}

/// `do { … }` or `do ( … )`: an explicit block in operand position.
fn do_handler(parser: &mut Parser, token: &Token) -> Result<Expr, Error> {
    let (close, lexeme) = match parser.current_token_kind() {
        TokenKind::OpenCurly => (TokenKind::CloseCurly, "}"),
        TokenKind::OpenParen => (TokenKind::CloseParen, ")"),
        _ => {
            let current = parser.current_token();
            return Err(Error::new(
                ErrorImpl::UnexpectedTokenDetailed {
                    token: current.value.clone(),
                    message: String::from("expected a block after `do`"),
                },
                current.span.start.clone(),
            ));
        }
    };

    let open = parser.advance().clone();
    let block = parse_block_until(parser, &open, close, lexeme)?;
    let span = Span::merge(&token.span, &block.span);
    Ok(Expr::new(block.kind, span))
}

/// `while COND do BODY` / `while COND { BODY }`, desugared to
/// `__builtin_while cond-thunk body-thunk` so a later stage can give it
/// whatever evaluation order it likes.
fn while_handler(parser: &mut Parser, token: &Token) -> Result<Expr, Error> {
    let condition = parse_expr_ctx(parser, 0, ExprContext::NoBraceCall)?;
    let body = parse_expr_ctx(parser, PREC_ATOM, ExprContext::Full)?;

    let span = Span::merge(&token.span, &body.span);
    let inner_span = Span::merge(&token.span, &condition.span);
    let call = Expr::new(
        ExprKind::Application {
            func: Box::new(Expr::new(
                ExprKind::Identifier(String::from("__builtin_while")),
                token.span.clone(),
            )),
            arg: Box::new(thunk(condition)),
        },
        inner_span,
    );

    Ok(Expr::new(
        ExprKind::Application {
            func: Box::new(call),
            arg: Box::new(thunk(body)),
        },
        span,
    ))
}

/// `for PAT in ITER do BODY` / `for PAT in ITER { BODY }`, desugared to
/// `__builtin_for ITER (| PAT => BODY |)`.
fn for_handler(parser: &mut Parser, token: &Token) -> Result<Expr, Error> {
    let binder = parse_expr_ctx(parser, 0, ExprContext::NoBraceCall)?;
    let pattern = expr_to_pattern(&binder)?;
    parser.expect(TokenKind::In)?;
    let iterable = parse_expr_ctx(parser, 0, ExprContext::NoBraceCall)?;
    let body = parse_expr_ctx(parser, PREC_ATOM, ExprContext::Full)?;

    let body_span = body.span.clone();
    let lambda = Expr::new(
        ExprKind::LambdaCase(vec![LambdaArm {
            patterns: vec![pattern],
            body,
        }]),
        body_span.clone(),
    );

    let span = Span::merge(&token.span, &body_span);
    let inner_span = Span::merge(&token.span, &iterable.span);
    let call = Expr::new(
        ExprKind::Application {
            func: Box::new(Expr::new(
                ExprKind::Identifier(String::from("__builtin_for")),
                token.span.clone(),
            )),
            arg: Box::new(iterable),
        },
        inner_span,
    );

    Ok(Expr::new(
        ExprKind::Application {
            func: Box::new(call),
            arg: Box::new(lambda),
        },
        span,
    ))
}

fn infix_handler(parser: &mut Parser, token: &Token) -> Result<Expr, Error> {
    fixity_decl(parser, token, Fixity::Infix, Assoc::None)
}

fn infixl_handler(parser: &mut Parser, token: &Token) -> Result<Expr, Error> {
    fixity_decl(parser, token, Fixity::Infix, Assoc::Left)
}

fn infixr_handler(parser: &mut Parser, token: &Token) -> Result<Expr, Error> {
    fixity_decl(parser, token, Fixity::Infix, Assoc::Right)
}

fn prefix_handler(parser: &mut Parser, token: &Token) -> Result<Expr, Error> {
    fixity_decl(parser, token, Fixity::Prefix, Assoc::None)
}

fn suffix_handler(parser: &mut Parser, token: &Token) -> Result<Expr, Error> {
    fixity_decl(parser, token, Fixity::Suffix, Assoc::None)
}

/// Shared body of the five fixity declarations: `NAME PREC`, with the
/// table mutation as the sole effect. Tokens after the declaration see
/// the new entry at once.
fn fixity_decl(
    parser: &mut Parser,
    token: &Token,
    fixity: Fixity,
    assoc: Assoc,
) -> Result<Expr, Error> {
    let name = {
        let current = parser.current_token().clone();
        match current.kind {
            TokenKind::SymIdentifier | TokenKind::Identifier => {
                parser.advance();
                current
            }
            _ => {
                return Err(Error::new(
                    ErrorImpl::UnexpectedTokenDetailed {
                        token: current.value.clone(),
                        message: String::from("expected an operator name"),
                    },
                    current.span.start.clone(),
                ))
            }
        }
    };

    let precedence_token = parser.expect(TokenKind::Int)?;
    let precedence = parse_precedence(&precedence_token)?;

    parser
        .operators_mut()
        .declare(&name.value, fixity, precedence, assoc);

    let span = Span::merge(&token.span, &precedence_token.span);
    Ok(Expr::new(ExprKind::Literal(Literal::Unit), span))
}

fn parse_precedence(token: &Token) -> Result<u32, Error> {
    let cleaned: String = token.value.chars().filter(|c| *c != '_').collect();
    cleaned.parse::<u32>().map_err(|_| {
        Error::new(
            ErrorImpl::NumberParseError {
                token: token.value.clone(),
            },
            token.span.start.clone(),
        )
    })
}

/// `data NAME { CTOR … | CTOR … }`. The declaration is consumed and the
/// constructor heads validated; recording the type belongs to later
/// stages, so the form parses to Unit.
fn data_handler(parser: &mut Parser, token: &Token) -> Result<Expr, Error> {
    expect_type_name(parser, "expected a capitalised type name after `data`")?;
    parser.expect(TokenKind::OpenCurly)?;

    if parser.current_token_kind() != TokenKind::CloseCurly {
        loop {
            let ctor = parse_expr_ctx(parser, PREC_COMMA + 1, ExprContext::Full)?;
            validate_constructor(&ctor)?;

            match parser.current_token_kind() {
                TokenKind::Pipe | TokenKind::Comma => {
                    parser.advance();
                    if parser.current_token_kind() == TokenKind::CloseCurly {
                        break;
                    }
                }
                _ => break,
            }
        }
    }

    let close = parser.expect(TokenKind::CloseCurly)?;
    let span = Span::merge(&token.span, &close.span);
    Ok(Expr::new(ExprKind::Literal(Literal::Unit), span))
}

fn validate_constructor(ctor: &Expr) -> Result<(), Error> {
    let (head, _args) = flatten_application(ctor);
    match &head.kind {
        ExprKind::Identifier(name) if is_constructor_name(name) => Ok(()),
        _ => Err(Error::new(
            ErrorImpl::UnexpectedTokenDetailed {
                token: format!("{}", head),
                message: String::from("constructor names start with an uppercase letter"),
            },
            head.span.start.clone(),
        )),
    }
}

/// `trait NAME { member : TYPE; … }`. Member signatures are parsed as
/// type expressions and discarded; the form parses to Unit.
fn trait_handler(parser: &mut Parser, token: &Token) -> Result<Expr, Error> {
    expect_type_name(parser, "expected a capitalised trait name after `trait`")?;
    parser.expect(TokenKind::OpenCurly)?;

    loop {
        while parser.current_token_kind() == TokenKind::Semicolon {
            parser.advance();
        }
        if parser.current_token_kind() == TokenKind::CloseCurly {
            break;
        }
        if parser.current_token_kind() == TokenKind::EOF {
            let current = parser.current_token();
            return Err(Error::new(
                ErrorImpl::UnexpectedEof,
                current.span.start.clone(),
            ));
        }

        parser.expect(TokenKind::Identifier)?;
        parser.expect(TokenKind::Colon)?;
        parse_expr_ctx(parser, PREC_ANNOTATION + 1, ExprContext::Full)?;
    }

    let close = parser.expect(TokenKind::CloseCurly)?;
    let span = Span::merge(&token.span, &close.span);
    Ok(Expr::new(ExprKind::Literal(Literal::Unit), span))
}

/// `import A::B::c`. The path is consumed and validated; resolution is a
/// later stage's problem, so the form parses to Unit.
fn import_handler(parser: &mut Parser, token: &Token) -> Result<Expr, Error> {
    let first = parser.expect(TokenKind::Identifier)?;
    let mut end = first.span;

    while parser.current_token_kind() == TokenKind::DoubleColon {
        parser.advance();
        let segment = parser.expect(TokenKind::Identifier)?;
        end = segment.span;
    }

    let span = Span::merge(&token.span, &end);
    Ok(Expr::new(ExprKind::Literal(Literal::Unit), span))
}

fn expect_type_name(parser: &mut Parser, message: &str) -> Result<Token, Error> {
    let current = parser.current_token().clone();
    match current.kind {
        TokenKind::Identifier if is_constructor_name(&current.value) => {
            parser.advance();
            Ok(current)
        }
        _ => Err(Error::new(
            ErrorImpl::UnexpectedTokenDetailed {
                token: current.value.clone(),
                message: String::from(message),
            },
            current.span.start.clone(),
        )),
    }
}

fn thunk(body: Expr) -> Expr {
    let span = body.span.clone();
    Expr::new(
        ExprKind::LambdaCase(vec![LambdaArm {
            patterns: vec![Pattern::new(PatternKind::Wildcard, span.clone())],
            body,
        }]),
        span,
    )
}
