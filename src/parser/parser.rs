//! Parser implementation for building the Abstract Syntax Tree.
//!
//! This module contains the main Parser struct and the top-level parse
//! entry points. Expression parsing itself lives in `expr`, statement
//! parsing in `stmt`; both reach back into the parser for its mutable
//! operator table and macro registry, which fixity declarations and
//! macro expansions may change mid-parse.
//!
//! A parse unit is a `;`-separated sequence of statements. Statement
//! errors are collected rather than fatal: parsing resynchronises at the
//! next top-level `;` and continues, so one bad statement does not hide
//! diagnostics for the rest of the file.

use std::rc::Rc;

use crate::{
    ast::ast::{Expr, ExprKind},
    errors::errors::{Error, ErrorImpl},
    expand::expander::MacroRegistry,
    lexer::tokens::{Token, TokenKind},
    Position, Span, MK_TOKEN,
};

use super::{operators::OperatorTable, stmt::parse_stmt};

/// Limits applied while parsing. Both guards exist so pathological
/// inputs fail with a diagnostic instead of blowing the stack.
#[derive(Debug, Clone, Copy)]
pub struct ParserConfig {
    /// Maximum nesting depth of `parse_expression` calls.
    pub max_recursion_depth: usize,
    /// Maximum nesting depth of macro expansions.
    pub max_expansion_depth: usize,
}

impl Default for ParserConfig {
    fn default() -> ParserConfig {
        ParserConfig {
            max_recursion_depth: 256,
            max_expansion_depth: 64,
        }
    }
}

/// The main parser structure that maintains parsing state.
///
/// This struct holds the token stream, the mutable operator table and
/// the macro registry. It tracks the current position in the token
/// stream and provides methods for token consumption.
pub struct Parser {
    /// The list of tokens to parse, always ending with EOF
    tokens: Vec<Token>,
    /// Current position in the token stream
    pos: usize,
    /// The name of the source file being parsed
    file: Rc<String>,
    /// Operator entries consulted and mutated during expression parsing
    operators: OperatorTable,
    /// Registered macro handlers, keyed by invocation name
    macros: MacroRegistry,
    /// Parse limits
    config: ParserConfig,
    /// Current `parse_expression` nesting depth
    recursion_depth: usize,
    /// Current macro expansion nesting depth
    expansion_depth: usize,
}

impl Parser {
    /// Creates a new Parser instance over `tokens`.
    ///
    /// The operator table and macro registry are supplied by the caller;
    /// the parser itself hard-codes no operators and no macros. Most
    /// callers want `OperatorTable::standard()` plus a registry that has
    /// been through `builtins::install`.
    ///
    /// # Arguments
    ///
    /// * `tokens` - Vector of tokens to parse
    /// * `file` - Reference-counted string containing the source file name
    /// * `operators` - Initial operator table
    /// * `macros` - Macro handlers available during this parse
    pub fn new(
        tokens: Vec<Token>,
        file: Rc<String>,
        operators: OperatorTable,
        macros: MacroRegistry,
    ) -> Self {
        Parser::with_config(tokens, file, operators, macros, ParserConfig::default())
    }

    /// Creates a new Parser instance with explicit limits.
    pub fn with_config(
        mut tokens: Vec<Token>,
        file: Rc<String>,
        operators: OperatorTable,
        macros: MacroRegistry,
        config: ParserConfig,
    ) -> Self {
        if tokens.last().map(|token| token.kind) != Some(TokenKind::EOF) {
            let offset = tokens
                .last()
                .map(|token| token.span.end.0)
                .unwrap_or(0);
            let span = Span {
                start: Position(offset, Rc::clone(&file)),
                end: Position(offset, Rc::clone(&file)),
            };
            tokens.push(MK_TOKEN!(TokenKind::EOF, String::from("EOF"), span));
        }

        Parser {
            tokens,
            pos: 0,
            file,
            operators,
            macros,
            config,
            recursion_depth: 0,
            expansion_depth: 0,
        }
    }

    /// Returns the current token without advancing.
    pub fn current_token(&self) -> &Token {
        let index = self.pos.min(self.tokens.len() - 1);
        &self.tokens[index]
    }

    /// Returns the kind of the current token.
    pub fn current_token_kind(&self) -> TokenKind {
        self.current_token().kind
    }

    /// Advances past the current token and returns it. The final EOF
    /// token is never consumed.
    pub fn advance(&mut self) -> &Token {
        if self.current_token_kind() == TokenKind::EOF {
            return self.current_token();
        }
        self.pos += 1;
        &self.tokens[self.pos - 1]
    }

    /// Expects a token of the specified kind, with optional custom error.
    ///
    /// # Arguments
    ///
    /// * `expected_kind` - The expected TokenKind
    /// * `error` - Optional custom error to return if expectation fails
    ///
    /// # Returns
    ///
    /// Returns Ok(Token) if the current token matches, otherwise returns an Error.
    pub fn expect_error(
        &mut self,
        expected_kind: TokenKind,
        error: Option<Error>,
    ) -> Result<Token, Error> {
        let token = self.current_token();
        if token.kind != expected_kind {
            return match error {
                Some(error) => Err(error),
                None if token.kind == TokenKind::EOF => Err(Error::new(
                    ErrorImpl::UnexpectedEof,
                    token.span.start.clone(),
                )),
                None => Err(Error::new(
                    ErrorImpl::UnexpectedToken {
                        token: token.value.clone(),
                    },
                    token.span.start.clone(),
                )),
            };
        }
        Ok(self.advance().clone())
    }

    /// Expects a token of the specified kind with default error message.
    pub fn expect(&mut self, expected_kind: TokenKind) -> Result<Token, Error> {
        self.expect_error(expected_kind, None)
    }

    /// Checks if there are more tokens to parse.
    pub fn has_tokens(&self) -> bool {
        self.current_token_kind() != TokenKind::EOF
    }

    /// Returns the operator table in its current state.
    pub fn operators(&self) -> &OperatorTable {
        &self.operators
    }

    /// Returns the operator table for mutation; fixity declarations go
    /// through here and affect every token parsed afterwards.
    pub fn operators_mut(&mut self) -> &mut OperatorTable {
        &mut self.operators
    }

    /// Returns the macro registry.
    pub fn macros(&self) -> &MacroRegistry {
        &self.macros
    }

    /// Returns the macro registry for mutation, so handlers can register
    /// further macros mid-parse.
    pub fn macros_mut(&mut self) -> &mut MacroRegistry {
        &mut self.macros
    }

    pub fn config(&self) -> &ParserConfig {
        &self.config
    }

    /// Expands the macro named by `token` at the current position.
    /// The handler consumes the invocation's input tokens itself.
    pub fn expand_macro(&mut self, token: &Token) -> Result<Expr, Error> {
        crate::expand::expander::expand(self, token)
    }

    pub(crate) fn enter_recursion(&mut self) -> Result<(), Error> {
        if self.recursion_depth >= self.config.max_recursion_depth {
            return Err(Error::new(
                ErrorImpl::RecursionLimitExceeded,
                self.get_position(),
            ));
        }
        self.recursion_depth += 1;
        Ok(())
    }

    pub(crate) fn exit_recursion(&mut self) {
        self.recursion_depth -= 1;
    }

    pub(crate) fn enter_expansion(&mut self, token: &Token) -> Result<(), Error> {
        if self.expansion_depth >= self.config.max_expansion_depth {
            return Err(Error::new(
                ErrorImpl::ExpansionDepthExceeded {
                    name: token.value.clone(),
                },
                token.span.start.clone(),
            ));
        }
        self.expansion_depth += 1;
        Ok(())
    }

    pub(crate) fn exit_expansion(&mut self) {
        self.expansion_depth -= 1;
    }

    /// Returns the source position of the current token.
    pub fn get_position(&self) -> Position {
        self.current_token().span.start.clone()
    }
}

/// Skips tokens until just past the next top-level `;`, or to EOF.
fn synchronize(parser: &mut Parser) {
    while parser.has_tokens() {
        if parser.advance().kind == TokenKind::Semicolon {
            break;
        }
    }
}

/// Parses a stream of tokens into an Abstract Syntax Tree.
///
/// This is the main entry point for parsing. It parses `;`-separated
/// statements until EOF; the unit parses to a `Block` holding the
/// statements in order. Fixity declarations and macros encountered
/// along the way mutate `operators` and may consult `macros`, and the
/// returned Parser exposes the table as it stood after the last
/// statement.
///
/// # Arguments
///
/// * `tokens` - Vector of tokens to parse
/// * `file` - Reference-counted string containing the source file name
/// * `operators` - Initial operator table, usually `OperatorTable::standard()`
/// * `macros` - Macro handlers, usually through `builtins::install`
///
/// # Returns
///
/// A tuple containing:
/// - The Parser instance (with state after parsing, including the final
///   operator table)
/// - Result containing either the root Block expression or every
///   diagnostic collected, in source order
pub fn parse(
    tokens: Vec<Token>,
    file: Rc<String>,
    operators: OperatorTable,
    macros: MacroRegistry,
) -> (Parser, Result<Expr, Vec<Error>>) {
    parse_with_config(tokens, file, operators, macros, ParserConfig::default())
}

/// Like [`parse`], with explicit limits.
pub fn parse_with_config(
    tokens: Vec<Token>,
    file: Rc<String>,
    operators: OperatorTable,
    macros: MacroRegistry,
    config: ParserConfig,
) -> (Parser, Result<Expr, Vec<Error>>) {
    let mut parser = Parser::with_config(tokens, Rc::clone(&file), operators, macros, config);
    let start = Position(0, Rc::clone(&file));

    let mut body = vec![];
    let mut diagnostics = vec![];

    while parser.has_tokens() {
        if parser.current_token_kind() == TokenKind::Semicolon {
            parser.advance();
            continue;
        }

        match parse_stmt(&mut parser) {
            Ok(statement) => {
                body.push(statement);
                match parser.current_token_kind() {
                    TokenKind::Semicolon => {
                        parser.advance();
                    }
                    TokenKind::EOF => {}
                    _ => {
                        let token = parser.current_token();
                        diagnostics.push(Error::new(
                            ErrorImpl::UnexpectedTokenDetailed {
                                token: token.value.clone(),
                                message: String::from(
                                    "expected `;` between top-level expressions",
                                ),
                            },
                            token.span.start.clone(),
                        ));
                        synchronize(&mut parser);
                    }
                }
            }
            Err(error) => {
                diagnostics.push(error);
                synchronize(&mut parser);
            }
        }
    }

    let end = parser.get_position();
    let result = if diagnostics.is_empty() {
        Ok(Expr::new(ExprKind::Block(body), Span { start, end }))
    } else {
        Err(diagnostics)
    };

    (parser, result)
}
