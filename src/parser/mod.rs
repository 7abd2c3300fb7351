//! Parser module for building an Abstract Syntax Tree (AST).
//!
//! This module contains the parser that transforms a stream of tokens
//! into an Abstract Syntax Tree. Expressions go through a Pratt parser
//! that reads every operator out of a mutable table, so fixity
//! declarations encountered mid-parse take effect for the rest of the
//! stream. It handles:
//!
//! - Operand parsing (literals, identifiers, delimited groups)
//! - Juxtaposition, which binds tighter than every table operator
//! - Infix, prefix and suffix operators with declared precedence
//! - Statement-level bindings (`=` and `:=`) and error recovery
//!
//! Registered macros expand during parsing: when a macro name shows up
//! in operand position the parser hands its own token stream to the
//! macro's handler and splices the returned expression back in.

pub mod expr;
pub mod operators;
pub mod parser;
pub mod pattern;
pub mod stmt;

#[cfg(test)]
mod tests;
