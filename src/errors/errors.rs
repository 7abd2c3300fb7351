use std::fmt::Display;

use thiserror::Error;

use crate::Position;

#[derive(Debug, Clone)]
pub struct Error {
    internal_error: ErrorImpl,
    position: Position,
}

impl Error {
    pub fn new(error_impl: ErrorImpl, position: Position) -> Self {
        Error {
            internal_error: error_impl,
            position,
        }
    }

    pub fn get_position(&self) -> &Position {
        &self.position
    }

    pub fn get_internal_error(&self) -> &ErrorImpl {
        &self.internal_error
    }

    pub fn get_error_name(&self) -> &str {
        match &self.internal_error {
            ErrorImpl::UnrecognisedToken { .. } => "UnrecognisedToken",
            ErrorImpl::UnterminatedString => "UnterminatedString",
            ErrorImpl::UnterminatedCharLiteral => "UnterminatedCharLiteral",
            ErrorImpl::EmptyCharLiteral => "EmptyCharLiteral",
            ErrorImpl::MultiCharLiteral { .. } => "MultiCharLiteral",
            ErrorImpl::InvalidEscape { .. } => "InvalidEscape",
            ErrorImpl::InvalidUtf8 => "InvalidUtf8",
            ErrorImpl::UnterminatedRawStringContinuation => "UnterminatedRawStringContinuation",
            ErrorImpl::NumberParseError { .. } => "NumberParseError",
            ErrorImpl::UnexpectedEof => "UnexpectedEof",
            ErrorImpl::UnexpectedToken { .. } => "UnexpectedToken",
            ErrorImpl::UnexpectedTokenDetailed { .. } => "UnexpectedTokenDetailed",
            ErrorImpl::MismatchedDelimiter { .. } => "MismatchedDelimiter",
            ErrorImpl::UndeclaredOperator { .. } => "UndeclaredOperator",
            ErrorImpl::AmbiguousOperatorChain { .. } => "AmbiguousOperatorChain",
            ErrorImpl::InvalidPattern { .. } => "InvalidPattern",
            ErrorImpl::RecursionLimitExceeded => "RecursionLimitExceeded",
            ErrorImpl::UnknownMacro { .. } => "UnknownMacro",
            ErrorImpl::ExpansionDepthExceeded { .. } => "ExpansionDepthExceeded",
            ErrorImpl::MacroHandlerParseFailure { .. } => "MacroHandlerParseFailure",
        }
    }

    pub fn get_tip(&self) -> ErrorTip {
        match &self.internal_error {
            ErrorImpl::UnrecognisedToken { .. } => ErrorTip::None,
            ErrorImpl::UnterminatedString => ErrorTip::Suggestion(String::from(
                "String literals end at the line break, did you miss a closing `\"`?",
            )),
            ErrorImpl::UnterminatedCharLiteral => {
                ErrorTip::Suggestion(String::from("Did you miss a closing `'`?"))
            }
            ErrorImpl::EmptyCharLiteral => ErrorTip::Suggestion(String::from(
                "Character literals must contain exactly one character",
            )),
            ErrorImpl::MultiCharLiteral { literal } => ErrorTip::Suggestion(format!(
                "`'{}'` holds more than one character, did you mean a string literal?",
                literal
            )),
            ErrorImpl::InvalidEscape { escape } => ErrorTip::Suggestion(format!(
                "Unknown escape sequence `{}`, valid escapes are \\n \\r \\t \\\\ \\0 \\' \\\" and \\u{{...}}",
                escape
            )),
            ErrorImpl::InvalidUtf8 => ErrorTip::None,
            ErrorImpl::UnterminatedRawStringContinuation => ErrorTip::Suggestion(String::from(
                "A raw string line ending in `\\` must be followed by another `\\\\` line",
            )),
            ErrorImpl::NumberParseError { token } => {
                ErrorTip::Suggestion(format!("Invalid number: `{}`", token))
            }
            ErrorImpl::UnexpectedEof => ErrorTip::Suggestion(String::from(
                "The input ended in the middle of an expression",
            )),
            ErrorImpl::UnexpectedToken { token } => ErrorTip::Suggestion(format!(
                "Unexpected token: `{}`, did you miss a semicolon?",
                token
            )),
            ErrorImpl::UnexpectedTokenDetailed { token, message } => {
                ErrorTip::Suggestion(format!("Unexpected token: `{}`, {}", token, message))
            }
            ErrorImpl::MismatchedDelimiter {
                expected, found, ..
            } => ErrorTip::Suggestion(format!(
                "Expected `{}` to close the group, found `{}`",
                expected, found
            )),
            ErrorImpl::UndeclaredOperator { operator } => ErrorTip::Suggestion(format!(
                "Operator `{}` has no fixity declaration, declare it first with e.g. `infixl {} 60;`",
                operator, operator
            )),
            ErrorImpl::AmbiguousOperatorChain { first, second } => ErrorTip::Suggestion(format!(
                "`{}` and `{}` share a precedence level but disagree on associativity, add parentheses",
                first, second
            )),
            ErrorImpl::InvalidPattern { message } => {
                ErrorTip::Suggestion(format!("Invalid pattern: {}", message))
            }
            ErrorImpl::RecursionLimitExceeded => ErrorTip::Suggestion(String::from(
                "The expression nests too deeply, raise the recursion limit in the parser config",
            )),
            ErrorImpl::UnknownMacro { name } => {
                ErrorTip::Suggestion(format!("No macro named `{}` is registered", name))
            }
            ErrorImpl::ExpansionDepthExceeded { name } => ErrorTip::Suggestion(format!(
                "Macro `{}` exceeded the expansion depth limit, does it consume any input?",
                name
            )),
            ErrorImpl::MacroHandlerParseFailure { name, inner } => ErrorTip::Suggestion(format!(
                "While expanding `{}`: {}",
                name,
                inner.get_tip()
            )),
        }
    }
}

pub enum ErrorTip {
    None,
    Suggestion(String),
}

impl Display for ErrorTip {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ErrorTip::None => write!(f, ""),
            ErrorTip::Suggestion(suggestion) => write!(f, "{}", suggestion),
        }
    }
}

#[derive(Error, Debug, Clone)]
pub enum ErrorImpl {
    #[error("unrecognised token: {token:?}")]
    UnrecognisedToken { token: String },
    #[error("unterminated string literal")]
    UnterminatedString,
    #[error("unterminated character literal")]
    UnterminatedCharLiteral,
    #[error("empty character literal")]
    EmptyCharLiteral,
    #[error("character literal {literal:?} holds more than one character")]
    MultiCharLiteral { literal: String },
    #[error("invalid escape sequence: {escape:?}")]
    InvalidEscape { escape: String },
    #[error("source is not valid UTF-8")]
    InvalidUtf8,
    #[error("raw string continuation is missing")]
    UnterminatedRawStringContinuation,
    #[error("error parsing number: {token:?}")]
    NumberParseError { token: String },
    #[error("unexpected end of input")]
    UnexpectedEof,
    #[error("unexpected token: {token:?}")]
    UnexpectedToken { token: String },
    #[error("unexpected token ({message:?}): {token:?}")]
    UnexpectedTokenDetailed { token: String, message: String },
    #[error("mismatched delimiter: expected {expected:?}, found {found:?} (group opened at offset {opened_at})")]
    MismatchedDelimiter {
        expected: String,
        found: String,
        opened_at: u32,
    },
    #[error("operator {operator:?} used before any fixity declaration")]
    UndeclaredOperator { operator: String },
    #[error("ambiguous operator chain: {first:?} followed by {second:?}")]
    AmbiguousOperatorChain { first: String, second: String },
    #[error("invalid pattern: {message}")]
    InvalidPattern { message: String },
    #[error("recursion limit exceeded")]
    RecursionLimitExceeded,
    #[error("unknown macro: {name:?}")]
    UnknownMacro { name: String },
    #[error("macro expansion depth exceeded while expanding {name:?}")]
    ExpansionDepthExceeded { name: String },
    #[error("macro {name:?} failed to parse its input: {inner:?}")]
    MacroHandlerParseFailure { name: String, inner: Box<Error> },
}
