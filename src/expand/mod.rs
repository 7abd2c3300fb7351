//! Macro registry and expansion engine.
//!
//! Macros here are parse-time functions: a registered name maps to a
//! handler that is handed the parser itself and returns the expression
//! to splice in where the invocation stood. Handlers read their input
//! through the ordinary parsing entry points, so macro syntax nests
//! macros, operators and juxtaposition with no extra machinery, and the
//! finished AST carries no trace of the expansion.
//!
//! `expander` holds the registry and dispatch; `builtins` is the
//! standard set of handlers (`if`, `case`, `fn`, fixity declarations and
//! friends) that `install` places into a registry.

pub mod builtins;
pub mod expander;
