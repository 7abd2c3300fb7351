//! Lexical analysis module for the front end.
//!
//! This module contains the lexer (tokenizer) that converts source code
//! into a stream of tokens for parsing. It handles:
//!
//! - Tokenization of source code using regex patterns
//! - Recognition of keywords, identifiers, literals, and operators
//! - Token position tracking for error reporting
//! - Comments, whitespace and multi-line string literal merging
//!
//! Tokens can be consumed lazily through the `Iterator` impl on `Lexer`
//! or eagerly through `tokenize` / `tokenize_bytes`.

pub mod lexer;
pub mod tokens;
