use crate::{
    ast::ast::{Expr, ExprKind},
    errors::errors::{Error, ErrorImpl},
    lexer::tokens::{Token, TokenKind},
    Span,
};

use super::{expr::parse_expression, parser::Parser, pattern::expr_to_pattern};

/// A statement is an expression, optionally followed by `=` or `:=` to
/// turn it into a binding. Whatever separator follows stays in the
/// stream for the caller.
pub fn parse_stmt(parser: &mut Parser) -> Result<Expr, Error> {
    let expr = parse_expression(parser, 0)?;

    match parser.current_token_kind() {
        TokenKind::Bind => {
            parser.advance();
            let pattern = expr_to_pattern(&expr)?;
            let value = parse_expression(parser, 0)?;
            let span = Span::merge(&expr.span, &value.span);
            Ok(Expr::new(
                ExprKind::Binding {
                    pattern,
                    value: Box::new(value),
                },
                span,
            ))
        }
        TokenKind::ColonEquals => {
            parser.advance();
            let pattern = expr_to_pattern(&expr)?;
            let value = parse_expression(parser, 0)?;
            let span = Span::merge(&expr.span, &value.span);
            Ok(Expr::new(
                ExprKind::Rebind {
                    pattern,
                    value: Box::new(value),
                },
                span,
            ))
        }
        _ => Ok(expr),
    }
}

/// Parses `;`-separated statements up to `close`, which must match the
/// delimiter `open` introduced. Empty blocks and trailing separators are
/// both fine.
pub fn parse_block_until(
    parser: &mut Parser,
    open: &Token,
    close: TokenKind,
    lexeme: &str,
) -> Result<Expr, Error> {
    let mut statements = Vec::new();

    loop {
        while parser.current_token_kind() == TokenKind::Semicolon {
            parser.advance();
        }
        if parser.current_token_kind() == close {
            break;
        }
        if parser.current_token_kind() == TokenKind::EOF {
            let token = parser.current_token();
            return Err(Error::new(
                ErrorImpl::UnexpectedEof,
                token.span.start.clone(),
            ));
        }

        statements.push(parse_stmt(parser)?);

        match parser.current_token_kind() {
            TokenKind::Semicolon => {
                parser.advance();
            }
            TokenKind::EOF => {
                let token = parser.current_token();
                return Err(Error::new(
                    ErrorImpl::UnexpectedEof,
                    token.span.start.clone(),
                ));
            }
            kind if kind == close => break,
            _ => {
                let token = parser.current_token();
                return Err(Error::new(
                    ErrorImpl::MismatchedDelimiter {
                        expected: lexeme.to_string(),
                        found: token.value.clone(),
                        opened_at: open.span.start.0,
                    },
                    token.span.start.clone(),
                ));
            }
        }
    }

    let close_token = parser.advance().clone();
    Ok(Expr::new(
        ExprKind::Block(statements),
        Span::merge(&open.span, &close_token.span),
    ))
}
