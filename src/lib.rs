#![allow(clippy::module_inception)]

use std::rc::Rc;

use crate::errors::errors::{Error, ErrorTip};

pub mod ast;
pub mod errors;
pub mod expand;
pub mod lexer;
pub mod macros;
pub mod parser;

extern crate regex;

/// A byte offset into a source buffer, paired with the originating file name.
#[derive(Debug, Clone, PartialEq)]
pub struct Position(pub u32, pub Rc<String>);

impl Position {
    pub fn null() -> Self {
        Position(0, Rc::new(String::from("<null>")))
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Span {
    pub start: Position,
    pub end: Position,
}

impl Span {
    /// Builds the span covering everything from `start` to `end`.
    pub fn merge(start: &Span, end: &Span) -> Span {
        Span {
            start: start.start.clone(),
            end: end.end.clone(),
        }
    }
}

pub fn get_line_at_offset(source: &str, offset: u32) -> (usize, String, usize) {
    let pos = (offset as usize).min(source.len());

    let mut start = 0;
    let mut line_number = 1;

    for line in source.split_inclusive('\n') {
        let end = start + line.len();

        if (start..end).contains(&pos) {
            let line_pos = pos - start;
            return (line_number, line.to_string(), line_pos);
        }

        start = end;
        line_number += 1;
    }

    // Offset at or past the end of the buffer: point at the end of the last line.
    let last = source.split_inclusive('\n').last().unwrap_or("");
    (line_number.max(1) - 1, last.to_string(), last.trim_end().len())
}

#[cfg(test)]
mod tests {
    #[test]
    fn test_get_line_at_offset() {
        let source = "Hello, world!\nSecond line\n\nTesting { }\n";

        let (line_number, line, line_pos) = super::get_line_at_offset(source, 10);
        assert_eq!(line_number, 1);
        assert_eq!(line, "Hello, world!\n");
        assert_eq!(line_pos, 10);

        let (line_number, line, line_pos) = super::get_line_at_offset(source, 35);
        assert_eq!(line_number, 4);
        assert_eq!(line, "Testing { }\n");
        assert_eq!(line_pos, 8);
    }

    #[test]
    fn test_get_line_at_offset_past_end() {
        let source = "a = 1";
        let (line_number, line, line_pos) = super::get_line_at_offset(source, 40);
        assert_eq!(line_number, 1);
        assert_eq!(line, "a = 1");
        assert_eq!(line_pos, 5);
    }
}

pub fn display_error(error: &Error, source: &str) {
    /*
        error: message
        -> final.lynx
           |
        20 | infixp + 60;
           | ^
    */

    let position = error.get_position();
    let (line, line_text, line_pos) = get_line_at_offset(source, position.0);

    let line_string = line.to_string();
    let padding = line_string.len() + 2;

    if let ErrorTip::None = error.get_tip() {
        println!("Error: {}", error.get_error_name());
    } else {
        println!("Error: {} ({})", error.get_error_name(), error.get_tip());
    }
    println!("-> {}", position.1);
    println!("{:>padding$}", "|");

    let (line_text_removed, removed_whitespace) = remove_starting_whitespace(&line_text);
    println!("{} | {}", line_string, line_text_removed.trim_end());

    let arrows = line_pos.saturating_sub(removed_whitespace) + 1;

    println!("{:>padding$} {:->arrows$}", "|", "^");
}

fn remove_starting_whitespace(string: &str) -> (String, usize) {
    let mut start = 0;
    for c in string.chars() {
        if c == ' ' {
            start += 1;
        } else {
            break;
        }
    }

    (String::from(&string[start..]), start)
}
