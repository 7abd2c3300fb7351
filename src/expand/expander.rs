use std::collections::HashMap;
use std::rc::Rc;

use crate::{
    ast::ast::Expr,
    errors::errors::{Error, ErrorImpl},
    lexer::tokens::Token,
    parser::parser::Parser,
};

/// A macro body. The handler is called with the parser positioned just
/// past the macro's name token and reads whatever fragment its syntax
/// needs, through the same entry points ordinary parsing uses. The
/// second argument is the name token, kept around for spans.
pub type MacroHandler = Rc<dyn Fn(&mut Parser, &Token) -> Result<Expr, Error>>;

/// Name-to-handler map the parser consults whenever an identifier or
/// reserved word shows up in operand position.
pub struct MacroRegistry {
    handlers: HashMap<String, MacroHandler>,
}

impl MacroRegistry {
    pub fn new() -> MacroRegistry {
        MacroRegistry {
            handlers: HashMap::new(),
        }
    }

    /// Registers `handler` under `name`. A later registration under the
    /// same name replaces the earlier one.
    pub fn register<F>(&mut self, name: &str, handler: F)
    where
        F: Fn(&mut Parser, &Token) -> Result<Expr, Error> + 'static,
    {
        self.handlers.insert(name.to_string(), Rc::new(handler));
    }

    /// Registers an already shared handler, so one closure can serve
    /// several names.
    pub fn register_handler(&mut self, name: &str, handler: MacroHandler) {
        self.handlers.insert(name.to_string(), handler);
    }

    pub fn contains(&self, name: &str) -> bool {
        self.handlers.contains_key(name)
    }

    pub fn get(&self, name: &str) -> Option<MacroHandler> {
        self.handlers.get(name).map(Rc::clone)
    }

    /// Registered names in sorted order.
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.handlers.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }
}

impl Default for MacroRegistry {
    fn default() -> MacroRegistry {
        MacroRegistry::new()
    }
}

impl std::fmt::Debug for MacroRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MacroRegistry")
            .field("names", &self.names())
            .finish()
    }
}

/// Runs the handler registered for `token` and splices its result into
/// the surrounding parse.
///
/// The handler borrows the parser itself, so macros that re-enter the
/// expression parser (directly or through nested macros) go through the
/// same depth accounting. Errors a handler produces while reading its
/// fragment are wrapped so the report names the macro; depth errors and
/// already wrapped errors pass through untouched.
pub fn expand(parser: &mut Parser, token: &Token) -> Result<Expr, Error> {
    let handler = match parser.macros().get(&token.value) {
        Some(handler) => handler,
        None => {
            return Err(Error::new(
                ErrorImpl::UnknownMacro {
                    name: token.value.clone(),
                },
                token.span.start.clone(),
            ))
        }
    };

    parser.enter_expansion(token)?;
    let result = handler(parser, token);
    parser.exit_expansion();

    match result {
        Ok(expr) => Ok(expr),
        Err(error) => {
            let passthrough = matches!(
                error.get_internal_error(),
                ErrorImpl::ExpansionDepthExceeded { .. }
                    | ErrorImpl::MacroHandlerParseFailure { .. }
            );
            if passthrough {
                Err(error)
            } else {
                Err(Error::new(
                    ErrorImpl::MacroHandlerParseFailure {
                        name: token.value.clone(),
                        inner: Box::new(error),
                    },
                    token.span.start.clone(),
                ))
            }
        }
    }
}
