/// AST (Abstract Syntax Tree) module
/// Contains all definitions related to the AST structure
///
/// Submodules:
/// - ast: Expression nodes, literals and lambda arms
/// - patterns: Pattern nodes produced by expression-to-pattern translation
pub mod ast;
pub mod patterns;
