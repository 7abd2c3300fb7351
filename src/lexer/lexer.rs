use std::collections::VecDeque;
use std::rc::Rc;

use regex::Regex;

use crate::{
    errors::errors::{Error, ErrorImpl},
    Position, Span, MK_DEFAULT_HANDLER, MK_TOKEN,
};

use super::tokens::{Token, TokenKind, RESERVED_LOOKUP, RESERVED_SYMBOL_LOOKUP};

pub type RegexHandler = fn(&mut Lexer, &Regex) -> Result<(), Error>;

#[derive(Clone)]
pub struct RegexPattern {
    regex: Regex,
    handler: RegexHandler,
}

pub struct Lexer {
    patterns: Rc<Vec<RegexPattern>>,
    queued: VecDeque<Token>,
    source: String,
    pos: usize,
    file: Rc<String>,
    eof_emitted: bool,
}

impl Lexer {
    pub fn new(source: String, file: Option<String>) -> Lexer {
        let file_name = if let Some(file) = file {
            Rc::new(file)
        } else {
            Rc::new(String::from("shell"))
        };

        Lexer {
            pos: 0,
            queued: VecDeque::new(),
            patterns: Rc::new(vec![
                RegexPattern { regex: Regex::new("\\s+").unwrap(), handler: skip_handler },
                RegexPattern { regex: Regex::new("--[^\\n]*").unwrap(), handler: skip_handler },
                RegexPattern { regex: Regex::new("\\\\\\\\").unwrap(), handler: raw_string_handler },
                RegexPattern { regex: Regex::new("[0-9][0-9_]*\\.[0-9][0-9_]*([eE][+-]?[0-9]+)?").unwrap(), handler: float_handler },
                RegexPattern { regex: Regex::new("0[xX][0-9a-fA-F][0-9a-fA-F_]*").unwrap(), handler: int_handler },
                RegexPattern { regex: Regex::new("0[oO][0-7][0-7_]*").unwrap(), handler: int_handler },
                RegexPattern { regex: Regex::new("0[bB][01][01_]*").unwrap(), handler: int_handler },
                RegexPattern { regex: Regex::new("[0-9][0-9_]*").unwrap(), handler: int_handler },
                RegexPattern { regex: Regex::new("\"([^\"\\\\\\n]|\\\\[^\\n])*\"").unwrap(), handler: string_handler },
                RegexPattern { regex: Regex::new("\"").unwrap(), handler: unterminated_string_handler },
                RegexPattern { regex: Regex::new("'(\\\\u\\{[0-9a-fA-F]+\\}|\\\\[^\\n]|[^'\\\\\\n])'").unwrap(), handler: char_handler },
                RegexPattern { regex: Regex::new("'[^'\\n]*'").unwrap(), handler: bad_char_handler },
                RegexPattern { regex: Regex::new("'").unwrap(), handler: unterminated_char_handler },
                RegexPattern { regex: Regex::new("[a-zA-Z_][a-zA-Z0-9_'!]*").unwrap(), handler: word_handler },
                RegexPattern { regex: Regex::new("\\(\\|").unwrap(), handler: MK_DEFAULT_HANDLER!(TokenKind::OpenParenPipe, "(|") },
                RegexPattern { regex: Regex::new("\\|\\)").unwrap(), handler: MK_DEFAULT_HANDLER!(TokenKind::PipeCloseParen, "|)") },
                RegexPattern { regex: Regex::new("\\[\\|").unwrap(), handler: MK_DEFAULT_HANDLER!(TokenKind::OpenBracketPipe, "[|") },
                RegexPattern { regex: Regex::new("\\|\\]").unwrap(), handler: MK_DEFAULT_HANDLER!(TokenKind::PipeCloseBracket, "|]") },
                RegexPattern { regex: Regex::new("\\{\\|").unwrap(), handler: MK_DEFAULT_HANDLER!(TokenKind::OpenCurlyPipe, "{|") },
                RegexPattern { regex: Regex::new("\\|\\}").unwrap(), handler: MK_DEFAULT_HANDLER!(TokenKind::PipeCloseCurly, "|}") },
                RegexPattern { regex: Regex::new("\\(").unwrap(), handler: MK_DEFAULT_HANDLER!(TokenKind::OpenParen, "(") },
                RegexPattern { regex: Regex::new("\\)").unwrap(), handler: MK_DEFAULT_HANDLER!(TokenKind::CloseParen, ")") },
                RegexPattern { regex: Regex::new("\\[").unwrap(), handler: MK_DEFAULT_HANDLER!(TokenKind::OpenBracket, "[") },
                RegexPattern { regex: Regex::new("\\]").unwrap(), handler: MK_DEFAULT_HANDLER!(TokenKind::CloseBracket, "]") },
                RegexPattern { regex: Regex::new("\\{").unwrap(), handler: MK_DEFAULT_HANDLER!(TokenKind::OpenCurly, "{") },
                RegexPattern { regex: Regex::new("\\}").unwrap(), handler: MK_DEFAULT_HANDLER!(TokenKind::CloseCurly, "}") },
                RegexPattern { regex: Regex::new(",").unwrap(), handler: MK_DEFAULT_HANDLER!(TokenKind::Comma, ",") },
                RegexPattern { regex: Regex::new(";").unwrap(), handler: MK_DEFAULT_HANDLER!(TokenKind::Semicolon, ";") },
                RegexPattern { regex: Regex::new("[~`!@#$%^&*\\-+=|\\\\:'<>.?/]+").unwrap(), handler: symbol_run_handler },
            ]),
            source,
            file: file_name,
            eof_emitted: false,
        }
    }

    pub fn advance_n(&mut self, n: usize) {
        self.pos += n;
    }

    pub fn push(&mut self, token: Token) {
        self.queued.push_back(token);
    }

    pub fn at(&self) -> char {
        self.source[self.pos..].chars().next().unwrap_or('\0')
    }

    pub fn remainder(&self) -> &str {
        &self.source[self.pos..]
    }

    pub fn at_eof(&self) -> bool {
        self.pos >= self.source.len()
    }

    pub fn span_from(&self, start: usize) -> Span {
        Span {
            start: Position(start as u32, Rc::clone(&self.file)),
            end: Position(self.pos as u32, Rc::clone(&self.file)),
        }
    }

    fn position(&self) -> Position {
        Position(self.pos as u32, Rc::clone(&self.file))
    }

    /// Produces the next token, or `None` once the EOF token has been
    /// emitted. String literals separated only by whitespace and comments
    /// that include a line break merge into a single token here.
    pub fn next_token(&mut self) -> Result<Option<Token>, Error> {
        let Some(mut token) = self.pull()? else {
            if self.eof_emitted {
                return Ok(None);
            }
            self.eof_emitted = true;
            let span = self.span_from(self.pos);
            return Ok(Some(MK_TOKEN!(TokenKind::EOF, String::from("EOF"), span)));
        };

        if token.kind == TokenKind::Str {
            loop {
                let checkpoint = self.pos;
                match self.pull()? {
                    Some(next)
                        if next.kind == TokenKind::Str && self.gap_has_newline(&token, &next) =>
                    {
                        token.value.push('\n');
                        token.value.push_str(&next.value);
                        token.span.end = next.span.end;
                    }
                    Some(_) | None => {
                        self.pos = checkpoint;
                        self.queued.clear();
                        break;
                    }
                }
            }
        }

        Ok(Some(token))
    }

    fn pull(&mut self) -> Result<Option<Token>, Error> {
        loop {
            if let Some(token) = self.queued.pop_front() {
                return Ok(Some(token));
            }
            if self.at_eof() {
                return Ok(None);
            }
            self.dispatch_one()?;
        }
    }

    fn dispatch_one(&mut self) -> Result<(), Error> {
        let patterns = Rc::clone(&self.patterns);

        for pattern in patterns.iter() {
            let match_here = pattern.regex.find(self.remainder()).map(|m| m.start());

            if match_here == Some(0) {
                return (pattern.handler)(self, &pattern.regex);
            }
        }

        Err(Error::new(
            ErrorImpl::UnrecognisedToken {
                token: self.at().to_string(),
            },
            Lexer::position(self),
        ))
    }

    fn gap_has_newline(&self, first: &Token, second: &Token) -> bool {
        let start = first.span.end.0 as usize;
        let end = second.span.start.0 as usize;
        self.source
            .get(start..end)
            .map(|gap| gap.contains('\n'))
            .unwrap_or(false)
    }
}

impl Iterator for Lexer {
    type Item = Result<Token, Error>;

    fn next(&mut self) -> Option<Self::Item> {
        match self.next_token() {
            Ok(Some(token)) => Some(Ok(token)),
            Ok(None) => None,
            Err(error) => {
                self.pos = self.source.len();
                self.eof_emitted = true;
                Some(Err(error))
            }
        }
    }
}

fn skip_handler(lexer: &mut Lexer, regex: &Regex) -> Result<(), Error> {
    let matched = regex.find(lexer.remainder()).unwrap().end();
    lexer.advance_n(matched);
    Ok(())
}

fn int_handler(lexer: &mut Lexer, regex: &Regex) -> Result<(), Error> {
    let matched = regex.find(lexer.remainder()).unwrap().as_str().to_string();
    let start = lexer.pos;

    lexer.advance_n(matched.len());
    let span = lexer.span_from(start);
    lexer.push(MK_TOKEN!(TokenKind::Int, matched, span));
    Ok(())
}

fn float_handler(lexer: &mut Lexer, regex: &Regex) -> Result<(), Error> {
    let matched = regex.find(lexer.remainder()).unwrap().as_str().to_string();
    let start = lexer.pos;

    lexer.advance_n(matched.len());
    let span = lexer.span_from(start);
    lexer.push(MK_TOKEN!(TokenKind::Float, matched, span));
    Ok(())
}

fn string_handler(lexer: &mut Lexer, regex: &Regex) -> Result<(), Error> {
    let matched = regex.find(lexer.remainder()).unwrap().as_str().to_string();
    let start = lexer.pos;

    let value = unescape(&matched[1..matched.len() - 1], start + 1, &lexer.file)?;
    lexer.advance_n(matched.len());
    let span = lexer.span_from(start);
    lexer.push(MK_TOKEN!(TokenKind::Str, value, span));
    Ok(())
}

fn unterminated_string_handler(lexer: &mut Lexer, _regex: &Regex) -> Result<(), Error> {
    Err(Error::new(ErrorImpl::UnterminatedString, Lexer::position(lexer)))
}

/// Raw string segments run from `\\` to the end of the line. A segment
/// ending in `\` strips that backslash and demands another `\\` segment
/// on the next line, joined with a line break.
fn raw_string_handler(lexer: &mut Lexer, _regex: &Regex) -> Result<(), Error> {
    let start = lexer.pos;
    let mut content = String::new();

    loop {
        lexer.advance_n(2);

        let (segment, line_len) = {
            let rest = lexer.remainder();
            let line_len = rest.find('\n').unwrap_or(rest.len());
            (rest[..line_len].to_string(), line_len)
        };
        lexer.advance_n(line_len);

        if let Some(stripped) = segment.strip_suffix('\\') {
            content.push_str(stripped);
            content.push('\n');

            if lexer.at_eof() {
                return Err(Error::new(
                    ErrorImpl::UnterminatedRawStringContinuation,
                    Lexer::position(lexer),
                ));
            }
            lexer.advance_n(1);
            while !lexer.at_eof() && (lexer.at() == ' ' || lexer.at() == '\t') {
                lexer.advance_n(1);
            }
            if !lexer.remainder().starts_with("\\\\") {
                return Err(Error::new(
                    ErrorImpl::UnterminatedRawStringContinuation,
                    Lexer::position(lexer),
                ));
            }
        } else {
            content.push_str(&segment);
            break;
        }
    }

    let span = lexer.span_from(start);
    lexer.push(MK_TOKEN!(TokenKind::Str, content, span));
    Ok(())
}

fn char_handler(lexer: &mut Lexer, regex: &Regex) -> Result<(), Error> {
    let matched = regex.find(lexer.remainder()).unwrap().as_str().to_string();
    let start = lexer.pos;

    let value = unescape(&matched[1..matched.len() - 1], start + 1, &lexer.file)?;
    lexer.advance_n(matched.len());
    let span = lexer.span_from(start);
    lexer.push(MK_TOKEN!(TokenKind::Char, value, span));
    Ok(())
}

fn bad_char_handler(lexer: &mut Lexer, regex: &Regex) -> Result<(), Error> {
    let matched = regex.find(lexer.remainder()).unwrap().as_str().to_string();
    let inner = &matched[1..matched.len() - 1];

    if inner.is_empty() {
        return Err(Error::new(ErrorImpl::EmptyCharLiteral, Lexer::position(lexer)));
    }

    let value = unescape(inner, lexer.pos + 1, &lexer.file)?;
    if value.chars().count() == 1 {
        let start = lexer.pos;
        lexer.advance_n(matched.len());
        let span = lexer.span_from(start);
        lexer.push(MK_TOKEN!(TokenKind::Char, value, span));
        return Ok(());
    }

    Err(Error::new(
        ErrorImpl::MultiCharLiteral {
            literal: inner.to_string(),
        },
        Lexer::position(lexer),
    ))
}

fn unterminated_char_handler(lexer: &mut Lexer, _regex: &Regex) -> Result<(), Error> {
    Err(Error::new(
        ErrorImpl::UnterminatedCharLiteral,
        Lexer::position(lexer),
    ))
}

fn word_handler(lexer: &mut Lexer, regex: &Regex) -> Result<(), Error> {
    let matched = regex.find(lexer.remainder()).unwrap().as_str().to_string();
    let start = lexer.pos;

    lexer.advance_n(matched.len());
    let span = lexer.span_from(start);

    if let Some(kind) = RESERVED_LOOKUP.get(matched.as_str()) {
        lexer.push(MK_TOKEN!(*kind, matched, span));
    } else {
        lexer.push(MK_TOKEN!(TokenKind::Identifier, matched, span));
    }
    Ok(())
}

fn symbol_run_handler(lexer: &mut Lexer, regex: &Regex) -> Result<(), Error> {
    let matched = regex.find(lexer.remainder()).unwrap().as_str().to_string();
    let start = lexer.pos;

    lexer.advance_n(matched.len());
    let span = lexer.span_from(start);

    if let Some(kind) = RESERVED_SYMBOL_LOOKUP.get(matched.as_str()) {
        lexer.push(MK_TOKEN!(*kind, matched, span));
    } else {
        lexer.push(MK_TOKEN!(TokenKind::SymIdentifier, matched, span));
    }
    Ok(())
}

fn unescape(raw: &str, offset: usize, file: &Rc<String>) -> Result<String, Error> {
    let mut result = String::new();
    let mut chars = raw.char_indices().peekable();

    while let Some((idx, ch)) = chars.next() {
        if ch != '\\' {
            result.push(ch);
            continue;
        }

        let invalid = |sequence: String| {
            Error::new(
                ErrorImpl::InvalidEscape { escape: sequence },
                Position((offset + idx) as u32, Rc::clone(file)),
            )
        };

        match chars.next() {
            None => return Err(invalid(String::from("\\"))),
            Some((_, 'n')) => result.push('\n'),
            Some((_, 'r')) => result.push('\r'),
            Some((_, 't')) => result.push('\t'),
            Some((_, '\\')) => result.push('\\'),
            Some((_, '0')) => result.push('\0'),
            Some((_, '\'')) => result.push('\''),
            Some((_, '"')) => result.push('"'),
            Some((_, 'u')) => {
                match chars.next() {
                    Some((_, '{')) => {}
                    _ => return Err(invalid(String::from("\\u"))),
                }
                let mut hex = String::new();
                loop {
                    match chars.next() {
                        Some((_, '}')) => break,
                        Some((_, c)) if c.is_ascii_hexdigit() => hex.push(c),
                        _ => return Err(invalid(format!("\\u{{{}", hex))),
                    }
                }
                let decoded = u32::from_str_radix(&hex, 16)
                    .ok()
                    .and_then(char::from_u32)
                    .ok_or_else(|| invalid(format!("\\u{{{}}}", hex)))?;
                result.push(decoded);
            }
            Some((_, other)) => return Err(invalid(format!("\\{}", other))),
        }
    }

    Ok(result)
}

pub fn tokenize(source: String, file: Option<String>) -> Result<Vec<Token>, Error> {
    let mut lex = Lexer::new(source, file);
    let mut tokens = vec![];

    while let Some(token) = lex.next_token()? {
        tokens.push(token);
    }

    Ok(tokens)
}

pub fn tokenize_bytes(bytes: &[u8], file: Option<String>) -> Result<Vec<Token>, Error> {
    match std::str::from_utf8(bytes) {
        Ok(source) => tokenize(source.to_string(), file),
        Err(error) => {
            let file_name = Rc::new(file.unwrap_or_else(|| String::from("shell")));
            Err(Error::new(
                ErrorImpl::InvalidUtf8,
                Position(error.valid_up_to() as u32, file_name),
            ))
        }
    }
}
