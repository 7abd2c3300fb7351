use lazy_static::lazy_static;
use std::{collections::HashMap, fmt::Display};

use crate::Span;

lazy_static! {
    pub static ref RESERVED_LOOKUP: HashMap<&'static str, TokenKind> = {
        let mut map = HashMap::new();
        map.insert("case", TokenKind::Case);
        map.insert("default", TokenKind::Default);
        map.insert("do", TokenKind::Do);
        map.insert("else", TokenKind::Else);
        map.insert("if", TokenKind::If);
        map.insert("import", TokenKind::Import);
        map.insert("in", TokenKind::In);
        map.insert("infix", TokenKind::Infix);
        map.insert("infixl", TokenKind::Infixl);
        map.insert("infixr", TokenKind::Infixr);
        map.insert("inline", TokenKind::Inline);
        map.insert("namespace", TokenKind::Namespace);
        map.insert("of", TokenKind::Of);
        map.insert("open", TokenKind::Open);
        map.insert("then", TokenKind::Then);
        map.insert("where", TokenKind::Where);
        map.insert("_", TokenKind::Underscore);
        map
    };
    pub static ref RESERVED_SYMBOL_LOOKUP: HashMap<&'static str, TokenKind> = {
        let mut map = HashMap::new();
        map.insert("->", TokenKind::Arrow);
        map.insert("=>", TokenKind::FatArrow);
        map.insert("<-", TokenKind::LeftArrow);
        map.insert(":", TokenKind::Colon);
        map.insert("::", TokenKind::DoubleColon);
        map.insert(":=", TokenKind::ColonEquals);
        map.insert("=", TokenKind::Bind);
        map.insert("|", TokenKind::Pipe);
        map.insert("@", TokenKind::At);
        map.insert("~", TokenKind::Tilde);
        map.insert("%", TokenKind::Percent);
        map.insert("%~", TokenKind::PercentTilde);
        map
    };
}

#[derive(Debug, PartialEq, Eq, Clone, Copy, Hash)]
pub enum TokenKind {
    EOF,
    Int,
    Float,
    Char,
    Str,
    Identifier,
    SymIdentifier,

    OpenParen,
    CloseParen,
    OpenBracket,
    CloseBracket,
    OpenCurly,
    CloseCurly,

    OpenParenPipe,    // (|
    PipeCloseParen,   // |)
    OpenBracketPipe,  // [|
    PipeCloseBracket, // |]
    OpenCurlyPipe,    // {|
    PipeCloseCurly,   // |}

    Arrow,       // ->
    FatArrow,    // =>
    LeftArrow,   // <-
    Colon,       // :
    DoubleColon, // ::
    ColonEquals, // :=
    Bind,        // =
    Comma,
    Semicolon,
    Pipe,        // |
    At,          // @
    Tilde,       // ~
    Percent,     // %
    PercentTilde, // %~

    // Reserved
    Case,
    Default,
    Do,
    Else,
    If,
    Import,
    In,
    Infix,
    Infixl,
    Infixr,
    Inline,
    Namespace,
    Of,
    Open,
    Then,
    Where,
    Underscore,
}

impl TokenKind {
    /// Alphabetic reserved words. `_` counts as one since it lexes
    /// through the identifier pattern.
    pub fn is_reserved_word(&self) -> bool {
        matches!(
            self,
            TokenKind::Case
                | TokenKind::Default
                | TokenKind::Do
                | TokenKind::Else
                | TokenKind::If
                | TokenKind::Import
                | TokenKind::In
                | TokenKind::Infix
                | TokenKind::Infixl
                | TokenKind::Infixr
                | TokenKind::Inline
                | TokenKind::Namespace
                | TokenKind::Of
                | TokenKind::Open
                | TokenKind::Then
                | TokenKind::Where
        )
    }

    /// Tokens whose lexeme may carry a fixity declaration in the
    /// operator table. Structural operators like `,` and `=>` are
    /// table-resident, so their kinds are included.
    pub fn can_carry_fixity(&self) -> bool {
        matches!(
            self,
            TokenKind::Identifier
                | TokenKind::SymIdentifier
                | TokenKind::Comma
                | TokenKind::FatArrow
                | TokenKind::Colon
                | TokenKind::Arrow
                | TokenKind::At
        )
    }
}

impl Display for TokenKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:?}", self)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    pub kind: TokenKind,
    pub value: String,
    pub span: Span,
}

impl Display for Token {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Token {{\nkind: {},\nvalue: {}}}", self.kind, self.value)
    }
}

impl Token {
    fn is_one_of_many(&self, tokens: Vec<TokenKind>) -> bool {
        for token in tokens {
            if token == self.kind {
                return true;
            }
        }

        false
    }

    pub fn debug(&self) {
        if self.is_one_of_many(vec![
            TokenKind::Int,
            TokenKind::Float,
            TokenKind::Char,
            TokenKind::Str,
            TokenKind::Identifier,
            TokenKind::SymIdentifier,
        ]) {
            println!("{} ({})", self.kind, self.value);
        } else {
            println!("{} ()", self.kind);
        }
    }
}
