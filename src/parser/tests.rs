//! Unit tests for the expression and statement parser.
//!
//! This module contains tests for juxtaposition, table-driven operator
//! parsing, fixity declarations taking effect mid-parse, the structural
//! folds, pattern translation and error recovery.

use std::rc::Rc;

use num_bigint::BigInt;

use crate::ast::ast::{Expr, ExprKind, Literal};
use crate::ast::patterns::PatternKind;
use crate::errors::errors::{Error, ErrorImpl};
use crate::expand::{builtins, expander::MacroRegistry};
use crate::lexer::lexer::tokenize;
use crate::parser::operators::{Assoc, Fixity, OperatorTable};
use crate::parser::parser::{parse, Parser};

fn parse_source(source: &str) -> (Parser, Result<Expr, Vec<Error>>) {
    let tokens = tokenize(source.to_string(), Some(String::from("test.lynx"))).unwrap();
    let mut macros = MacroRegistry::new();
    builtins::install(&mut macros);
    parse(
        tokens,
        Rc::new(String::from("test.lynx")),
        OperatorTable::standard(),
        macros,
    )
}

fn statements(result: Result<Expr, Vec<Error>>) -> Vec<Expr> {
    let root = result.expect("parse failed");
    match root.kind {
        ExprKind::Block(statements) => statements,
        _ => panic!("Expected a block root"),
    }
}

fn parse_one(source: &str) -> Expr {
    let (_, result) = parse_source(source);
    let mut parsed = statements(result);
    assert_eq!(parsed.len(), 1);
    parsed.remove(0)
}

/// Last statement of a multi-statement source, for tests that declare
/// operators before using them.
fn last_statement(source: &str) -> Expr {
    let (_, result) = parse_source(source);
    let mut parsed = statements(result);
    assert!(!parsed.is_empty());
    parsed.pop().unwrap()
}

/// Pulls `App(App(op, left), right)` apart, or panics.
fn binary_parts(expr: &Expr) -> (&str, &Expr, &Expr) {
    match &expr.kind {
        ExprKind::Application { func, arg } => match &func.kind {
            ExprKind::Application {
                func: op,
                arg: left,
            } => match &op.kind {
                ExprKind::Identifier(name) => (name, left, arg),
                _ => panic!("Expected an operator identifier"),
            },
            _ => panic!("Expected a nested application"),
        },
        _ => panic!("Expected an application"),
    }
}

#[test]
fn test_empty_source_parses_to_empty_block() {
    let (_, result) = parse_source("");
    assert_eq!(statements(result).len(), 0);
}

#[test]
fn test_single_identifier() {
    let expr = parse_one("x");
    assert!(matches!(expr.kind, ExprKind::Identifier(ref name) if name == "x"));
}

#[test]
fn test_juxtaposition_nests_left() {
    let expr = parse_one("f x y");

    match expr.kind {
        ExprKind::Application { func, arg } => {
            assert!(matches!(arg.kind, ExprKind::Identifier(ref name) if name == "y"));
            match func.kind {
                ExprKind::Application { func, arg } => {
                    assert!(matches!(func.kind, ExprKind::Identifier(ref name) if name == "f"));
                    assert!(matches!(arg.kind, ExprKind::Identifier(ref name) if name == "x"));
                }
                _ => panic!("Expected a nested application"),
            }
        }
        _ => panic!("Expected an application"),
    }
}

#[test]
fn test_application_span_covers_both_ends() {
    let expr = parse_one("f x");
    assert_eq!(expr.span.start.0, 0);
    assert_eq!(expr.span.end.0, 3);
}

#[test]
fn test_integer_literal_is_arbitrary_precision() {
    let expr = parse_one("123456789012345678901234567890");
    let expected = BigInt::parse_bytes(b"123456789012345678901234567890", 10).unwrap();
    assert!(matches!(expr.kind, ExprKind::Literal(Literal::Int(ref value)) if *value == expected));
}

#[test]
fn test_radix_literals() {
    assert!(matches!(
        parse_one("0xFF").kind,
        ExprKind::Literal(Literal::Int(ref value)) if *value == BigInt::from(255)
    ));
    assert!(matches!(
        parse_one("0o17").kind,
        ExprKind::Literal(Literal::Int(ref value)) if *value == BigInt::from(15)
    ));
    assert!(matches!(
        parse_one("0b101").kind,
        ExprKind::Literal(Literal::Int(ref value)) if *value == BigInt::from(5)
    ));
}

#[test]
fn test_digit_separators() {
    assert!(matches!(
        parse_one("1_000_000").kind,
        ExprKind::Literal(Literal::Int(ref value)) if *value == BigInt::from(1_000_000)
    ));
}

#[test]
fn test_float_literal_with_exponent() {
    let expr = parse_one("2.5e10");
    assert!(matches!(expr.kind, ExprKind::Literal(Literal::Float(_))));
}

#[test]
fn test_char_and_string_literals() {
    assert!(matches!(
        parse_one("'a'").kind,
        ExprKind::Literal(Literal::Char('a'))
    ));
    assert!(matches!(
        parse_one("\"hello\"").kind,
        ExprKind::Literal(Literal::Str(ref value)) if value == "hello"
    ));
}

#[test]
fn test_unit_literal() {
    assert!(matches!(
        parse_one("()").kind,
        ExprKind::Literal(Literal::Unit)
    ));
}

#[test]
fn test_grouping_keeps_inner_expression() {
    let expr = parse_one("(f x)");
    assert!(matches!(expr.kind, ExprKind::Application { .. }));
    assert_eq!(expr.span.start.0, 0);
    assert_eq!(expr.span.end.0, 5);
}

#[test]
fn test_precedence_folds_looser_operator_at_root() {
    let expr = last_statement("infixl + 60; infixl * 70; 1 + 2 * 3;");

    let (op, left, right) = binary_parts(&expr);
    assert_eq!(op, "+");
    assert!(matches!(
        left.kind,
        ExprKind::Literal(Literal::Int(ref value)) if *value == BigInt::from(1)
    ));

    let (op, left, right) = binary_parts(right);
    assert_eq!(op, "*");
    assert!(matches!(
        left.kind,
        ExprKind::Literal(Literal::Int(ref value)) if *value == BigInt::from(2)
    ));
    assert!(matches!(
        right.kind,
        ExprKind::Literal(Literal::Int(ref value)) if *value == BigInt::from(3)
    ));
}

#[test]
fn test_left_associative_operator_folds_left() {
    let expr = last_statement("infixl - 60; 1 - 2 - 3;");

    let (op, left, _) = binary_parts(&expr);
    assert_eq!(op, "-");
    let (op, _, _) = binary_parts(left);
    assert_eq!(op, "-");
}

#[test]
fn test_right_associative_operator_folds_right() {
    let expr = last_statement("infixr ^ 80; a ^ b ^ c;");

    let (op, left, right) = binary_parts(&expr);
    assert_eq!(op, "^");
    assert!(matches!(left.kind, ExprKind::Identifier(ref name) if name == "a"));
    let (op, _, _) = binary_parts(right);
    assert_eq!(op, "^");
}

#[test]
fn test_undeclared_operator_is_rejected() {
    let (_, result) = parse_source("1 <+> 2");
    let errors = result.unwrap_err();
    assert_eq!(errors[0].get_error_name(), "UndeclaredOperator");
}

#[test]
fn test_declaration_takes_effect_only_for_later_tokens() {
    let (_, result) = parse_source("1 <+> 2; infixl <+> 60; 1 <+> 2;");
    assert!(result.is_err());

    let (_, result) = parse_source("infixl <+> 60; 1 <+> 2;");
    let parsed = statements(result);
    let (op, _, _) = binary_parts(&parsed[1]);
    assert_eq!(op, "<+>");
}

#[test]
fn test_redeclaration_overwrites_entry() {
    let (parser, result) = parse_source("infixl + 60; infixr + 70;");
    assert!(result.is_ok());

    let entry = parser.operators().lookup("+", Fixity::Infix).unwrap();
    assert_eq!(entry.precedence, 70);
    assert_eq!(entry.assoc, Assoc::Right);
}

#[test]
fn test_ambiguous_mixed_associativity_chain() {
    let (_, result) = parse_source("infixl + 60; infixr - 60; 1 + 2 - 3;");
    let errors = result.unwrap_err();
    assert_eq!(errors[0].get_error_name(), "AmbiguousOperatorChain");
}

#[test]
fn test_ambiguous_chain_detected_through_right_recursion() {
    // the right-associative operator comes first, so the clash surfaces
    // inside the recursive right-hand parse
    let (_, result) = parse_source("infixl + 60; infixr - 60; 1 - 2 + 3;");
    let errors = result.unwrap_err();
    assert_eq!(errors[0].get_error_name(), "AmbiguousOperatorChain");
}

#[test]
fn test_non_associative_operator_cannot_chain() {
    let (_, result) = parse_source("infix == 50; a == b == c;");
    let errors = result.unwrap_err();
    assert_eq!(errors[0].get_error_name(), "AmbiguousOperatorChain");

    let (_, result) = parse_source("infix == 50; a == b;");
    assert!(result.is_ok());
}

#[test]
fn test_annotation_is_non_associative() {
    let (_, result) = parse_source("x : T : U");
    let errors = result.unwrap_err();
    assert_eq!(errors[0].get_error_name(), "AmbiguousOperatorChain");
}

#[test]
fn test_juxtaposition_binds_tighter_than_operators() {
    let expr = last_statement("infixl * 70; f x * 2;");

    let (op, left, _) = binary_parts(&expr);
    assert_eq!(op, "*");
    assert!(matches!(left.kind, ExprKind::Application { .. }));
}

#[test]
fn test_distinct_precedence_levels_mix_freely() {
    let (_, result) = parse_source("infixl + 60; infixr ^ 80; 1 + 2 ^ 3 + 4;");
    assert!(result.is_ok());
}

#[test]
fn test_lambda_nests_right() {
    let expr = parse_one("x => y => y");

    match expr.kind {
        ExprKind::LambdaCase(arms) => {
            assert_eq!(arms.len(), 1);
            assert_eq!(arms[0].patterns.len(), 1);
            assert!(matches!(arms[0].body.kind, ExprKind::LambdaCase(_)));
        }
        _ => panic!("Expected a lambda case"),
    }
}

#[test]
fn test_lambda_binds_looser_than_comma() {
    let expr = parse_one("x => x, 0");

    match expr.kind {
        ExprKind::LambdaCase(arms) => {
            assert!(matches!(arms[0].body.kind, ExprKind::Tuple(ref items) if items.len() == 2));
        }
        _ => panic!("Expected a lambda case"),
    }
}

#[test]
fn test_comma_before_lambda_becomes_tuple_pattern() {
    let expr = parse_one("x, y => y");

    match expr.kind {
        ExprKind::LambdaCase(arms) => {
            assert_eq!(arms[0].patterns.len(), 1);
            assert!(matches!(
                arms[0].patterns[0].kind,
                PatternKind::Tuple(ref items) if items.len() == 2
            ));
        }
        _ => panic!("Expected a lambda case"),
    }
}

#[test]
fn test_application_before_lambda_spreads_parameters() {
    let expr = parse_one("x y => x");

    match expr.kind {
        ExprKind::LambdaCase(arms) => {
            assert_eq!(arms[0].patterns.len(), 2);
        }
        _ => panic!("Expected a lambda case"),
    }
}

#[test]
fn test_prefix_operator() {
    let expr = last_statement("prefix - 90; - x;");

    match expr.kind {
        ExprKind::Application { func, arg } => {
            assert!(matches!(func.kind, ExprKind::Identifier(ref name) if name == "-"));
            assert!(matches!(arg.kind, ExprKind::Identifier(ref name) if name == "x"));
        }
        _ => panic!("Expected an application"),
    }
}

#[test]
fn test_same_name_infix_and_prefix_coexist() {
    let expr = last_statement("infixl - 60; prefix - 90; a - - b;");

    let (op, _, right) = binary_parts(&expr);
    assert_eq!(op, "-");
    match &right.kind {
        ExprKind::Application { func, .. } => {
            assert!(matches!(func.kind, ExprKind::Identifier(ref name) if name == "-"));
        }
        _ => panic!("Expected a prefix application"),
    }
}

#[test]
fn test_suffix_operator() {
    let expr = last_statement("suffix ! 200; n !;");

    match expr.kind {
        ExprKind::Application { func, arg } => {
            assert!(matches!(func.kind, ExprKind::Identifier(ref name) if name == "!"));
            assert!(matches!(arg.kind, ExprKind::Identifier(ref name) if name == "n"));
        }
        _ => panic!("Expected an application"),
    }
}

#[test]
fn test_declared_operator_as_parenthesised_value() {
    let expr = last_statement("infixl + 60; (+);");
    assert!(matches!(expr.kind, ExprKind::Identifier(ref name) if name == "+"));
}

#[test]
fn test_declared_operator_in_operand_position() {
    // prefix-style use of a binary operator
    let expr = last_statement("infixl + 60; (+ 1 2);");

    let (op, left, right) = binary_parts(&expr);
    assert_eq!(op, "+");
    assert!(matches!(left.kind, ExprKind::Literal(Literal::Int(_))));
    assert!(matches!(right.kind, ExprKind::Literal(Literal::Int(_))));
}

#[test]
fn test_tuple_flattens() {
    let expr = parse_one("a, b, c");
    assert!(matches!(expr.kind, ExprKind::Tuple(ref items) if items.len() == 3));
}

#[test]
fn test_parenthesised_tuple_nests() {
    let expr = parse_one("(a, b), c");

    match expr.kind {
        ExprKind::Tuple(items) => {
            assert_eq!(items.len(), 2);
            assert!(matches!(items[0].kind, ExprKind::Tuple(ref inner) if inner.len() == 2));
        }
        _ => panic!("Expected a tuple"),
    }
}

#[test]
fn test_tuple_as_single_argument() {
    let expr = parse_one("f (a, b)");

    match expr.kind {
        ExprKind::Application { func, arg } => {
            assert!(matches!(func.kind, ExprKind::Identifier(ref name) if name == "f"));
            assert!(matches!(arg.kind, ExprKind::Tuple(ref items) if items.len() == 2));
        }
        _ => panic!("Expected an application"),
    }
}

#[test]
fn test_bare_tuple_rejects_trailing_comma() {
    let (_, result) = parse_source("(a, b,)");
    assert!(result.is_err());
}

#[test]
fn test_type_annotation() {
    let expr = parse_one("x : Int");

    match expr.kind {
        ExprKind::TypeAnnotation { expr, ty } => {
            assert!(matches!(expr.kind, ExprKind::Identifier(ref name) if name == "x"));
            assert!(matches!(ty.kind, ExprKind::Identifier(ref name) if name == "Int"));
        }
        _ => panic!("Expected a type annotation"),
    }
}

#[test]
fn test_param_annotation() {
    let expr = parse_one("Int @ count");

    match expr.kind {
        ExprKind::ParamAnnotation { ty, name } => {
            assert!(matches!(ty.kind, ExprKind::Identifier(ref n) if n == "Int"));
            assert_eq!(name, "count");
        }
        _ => panic!("Expected a parameter annotation"),
    }
}

#[test]
fn test_param_annotation_requires_a_name() {
    let (_, result) = parse_source("Int @ 1");
    let errors = result.unwrap_err();
    assert_eq!(errors[0].get_error_name(), "UnexpectedTokenDetailed");
}

#[test]
fn test_arrow_folds_right() {
    let expr = parse_one("a -> b -> c");

    let (op, _, right) = binary_parts(&expr);
    assert_eq!(op, "->");
    let (op, _, _) = binary_parts(right);
    assert_eq!(op, "->");
}

#[test]
fn test_annotation_with_arrow_type() {
    let expr = parse_one("f : a -> b");

    match expr.kind {
        ExprKind::TypeAnnotation { ty, .. } => {
            let (op, _, _) = binary_parts(&ty);
            assert_eq!(op, "->");
        }
        _ => panic!("Expected a type annotation"),
    }
}

#[test]
fn test_implicit_and_contextual_markers() {
    assert!(matches!(parse_one("~x").kind, ExprKind::Implicit(_)));
    assert!(matches!(parse_one("%x").kind, ExprKind::Contextual(_)));

    match parse_one("%~x").kind {
        ExprKind::Contextual(inner) => {
            assert!(matches!(inner.kind, ExprKind::Implicit(_)));
        }
        _ => panic!("Expected a contextual marker"),
    }
}

#[test]
fn test_marker_takes_one_atom() {
    // the marker binds the atom only, the application happens outside
    let expr = parse_one("f ~x");

    match expr.kind {
        ExprKind::Application { func, arg } => {
            assert!(matches!(func.kind, ExprKind::Identifier(ref name) if name == "f"));
            assert!(matches!(arg.kind, ExprKind::Implicit(_)));
        }
        _ => panic!("Expected an application"),
    }
}

#[test]
fn test_list_literal() {
    assert!(matches!(
        parse_one("[1, 2, 3]").kind,
        ExprKind::List(ref items) if items.len() == 3
    ));
    assert!(matches!(parse_one("[]").kind, ExprKind::List(ref items) if items.is_empty()));
    assert!(matches!(
        parse_one("[1, 2,]").kind,
        ExprKind::List(ref items) if items.len() == 2
    ));
}

#[test]
fn test_map_literal() {
    let expr = parse_one("[| one: 1, two: 2 |]");
    assert!(matches!(expr.kind, ExprKind::Map(ref entries) if entries.len() == 2));

    let expr = parse_one("[||]");
    assert!(matches!(expr.kind, ExprKind::Map(ref entries) if entries.is_empty()));
}

#[test]
fn test_record_literal_with_shorthand() {
    let expr = parse_one("{| x: 1, y |}");

    match expr.kind {
        ExprKind::Record(entries) => {
            assert_eq!(entries.len(), 2);
            assert_eq!(entries[1].0, "y");
            assert!(matches!(
                entries[1].1.kind,
                ExprKind::Identifier(ref name) if name == "y"
            ));
        }
        _ => panic!("Expected a record"),
    }
}

#[test]
fn test_record_labels_must_be_identifiers() {
    let (_, result) = parse_source("{| 1: 2 |}");
    let errors = result.unwrap_err();
    assert_eq!(errors[0].get_error_name(), "UnexpectedTokenDetailed");
}

#[test]
fn test_lambda_case_group() {
    let expr = parse_one("(| 0 => a | n => b n |)");

    match expr.kind {
        ExprKind::LambdaCase(arms) => {
            assert_eq!(arms.len(), 2);
            assert!(matches!(
                arms[0].patterns[0].kind,
                PatternKind::Literal(Literal::Int(_))
            ));
            assert!(matches!(
                arms[1].patterns[0].kind,
                PatternKind::Identifier { ref name, .. } if name == "n"
            ));
        }
        _ => panic!("Expected a lambda case"),
    }
}

#[test]
fn test_lambda_case_needs_at_least_one_arm() {
    let (_, result) = parse_source("(||)");
    let errors = result.unwrap_err();
    assert_eq!(errors[0].get_error_name(), "UnexpectedTokenDetailed");
}

#[test]
fn test_lambda_case_arms_must_agree_on_arity() {
    let (_, result) = parse_source("(| x => x | a b => a |)");
    let errors = result.unwrap_err();
    assert_eq!(errors[0].get_error_name(), "InvalidPattern");
}

#[test]
fn test_lambda_case_arm_must_be_a_lambda() {
    let (_, result) = parse_source("(| 1 |)");
    let errors = result.unwrap_err();
    assert_eq!(errors[0].get_error_name(), "InvalidPattern");
}

#[test]
fn test_block_atom() {
    let expr = parse_one("{ a; b }");
    assert!(matches!(expr.kind, ExprKind::Block(ref body) if body.len() == 2));

    let expr = parse_one("{}");
    assert!(matches!(expr.kind, ExprKind::Block(ref body) if body.is_empty()));
}

#[test]
fn test_block_allows_trailing_separator() {
    let expr = parse_one("{ a; b; }");
    assert!(matches!(expr.kind, ExprKind::Block(ref body) if body.len() == 2));
}

#[test]
fn test_binding() {
    let expr = parse_one("x = 1");

    match expr.kind {
        ExprKind::Binding { pattern, value } => {
            assert!(matches!(
                pattern.kind,
                PatternKind::Identifier { ref name, mutable: false } if name == "x"
            ));
            assert!(matches!(value.kind, ExprKind::Literal(Literal::Int(_))));
        }
        _ => panic!("Expected a binding"),
    }
}

#[test]
fn test_mutable_binding() {
    let expr = parse_one("~x = 0");

    match expr.kind {
        ExprKind::Binding { pattern, .. } => {
            assert!(matches!(
                pattern.kind,
                PatternKind::Identifier { ref name, mutable: true } if name == "x"
            ));
        }
        _ => panic!("Expected a binding"),
    }
}

#[test]
fn test_rebind() {
    let expr = parse_one("x := 2");
    assert!(matches!(expr.kind, ExprKind::Rebind { .. }));
}

#[test]
fn test_tuple_pattern_binding() {
    let expr = parse_one("(a, b) = pair");

    match expr.kind {
        ExprKind::Binding { pattern, .. } => {
            assert!(matches!(pattern.kind, PatternKind::Tuple(ref items) if items.len() == 2));
        }
        _ => panic!("Expected a binding"),
    }
}

#[test]
fn test_constructor_pattern_binding() {
    let expr = parse_one("Pair a b = p");

    match expr.kind {
        ExprKind::Binding { pattern, .. } => {
            assert!(matches!(
                pattern.kind,
                PatternKind::Constructor { ref name, ref args } if name == "Pair" && args.len() == 2
            ));
        }
        _ => panic!("Expected a binding"),
    }
}

#[test]
fn test_record_pattern_binding() {
    let expr = parse_one("{| x: a, y: b |} = point");

    match expr.kind {
        ExprKind::Binding { pattern, .. } => match pattern.kind {
            PatternKind::Record(fields) => {
                assert_eq!(fields.len(), 2);
                assert_eq!(fields[0].0, "x");
                assert!(matches!(
                    fields[0].1.kind,
                    PatternKind::Identifier { ref name, mutable: false } if name == "a"
                ));
            }
            _ => panic!("Expected a record pattern"),
        },
        _ => panic!("Expected a binding"),
    }
}

#[test]
fn test_wildcard_pattern() {
    let expr = parse_one("_ = ignored");

    match expr.kind {
        ExprKind::Binding { pattern, .. } => {
            assert!(matches!(pattern.kind, PatternKind::Wildcard));
        }
        _ => panic!("Expected a binding"),
    }
}

#[test]
fn test_alternation_pattern() {
    let expr = parse_one("(| (A x | B x) => x |)");

    match expr.kind {
        ExprKind::LambdaCase(arms) => {
            assert!(matches!(
                arms[0].patterns[0].kind,
                PatternKind::Alternation(ref alternatives) if alternatives.len() == 2
            ));
        }
        _ => panic!("Expected a lambda case"),
    }
}

#[test]
fn test_alternation_must_bind_same_names() {
    let (_, result) = parse_source("(| (A x | B y) => x |)");
    let errors = result.unwrap_err();
    assert_eq!(errors[0].get_error_name(), "InvalidPattern");
}

#[test]
fn test_list_is_not_a_pattern() {
    let (_, result) = parse_source("[a] = xs");
    let errors = result.unwrap_err();
    assert_eq!(errors[0].get_error_name(), "InvalidPattern");
}

#[test]
fn test_pipe_groups_encode_alternation() {
    let expr = parse_one("(a | b)");

    let (op, left, right) = binary_parts(&expr);
    assert_eq!(op, "|");
    assert!(matches!(left.kind, ExprKind::Identifier(ref name) if name == "a"));
    assert!(matches!(right.kind, ExprKind::Identifier(ref name) if name == "b"));
}

#[test]
fn test_pipe_outside_a_group_is_an_error() {
    let (_, result) = parse_source("a | b");
    assert!(result.is_err());
}

#[test]
fn test_mismatched_delimiter() {
    let (_, result) = parse_source("(1 ]");
    let errors = result.unwrap_err();

    match errors[0].get_internal_error() {
        ErrorImpl::MismatchedDelimiter {
            expected,
            found,
            opened_at,
        } => {
            assert_eq!(expected, ")");
            assert_eq!(found, "]");
            assert_eq!(*opened_at, 0);
        }
        _ => panic!("Expected MismatchedDelimiter"),
    }
}

#[test]
fn test_unclosed_group_reports_eof() {
    let (_, result) = parse_source("(f x");
    let errors = result.unwrap_err();
    assert_eq!(errors[0].get_error_name(), "UnexpectedEof");
}

#[test]
fn test_statements_need_separators() {
    let (_, result) = parse_source("a = 1 b = 2");
    let errors = result.unwrap_err();
    assert_eq!(errors[0].get_error_name(), "UnexpectedTokenDetailed");
}

#[test]
fn test_resynchronization_collects_multiple_diagnostics() {
    let (_, result) = parse_source("); ]; x;");
    let errors = result.unwrap_err();
    assert_eq!(errors.len(), 2);
    assert_eq!(errors[0].get_error_name(), "UnexpectedToken");
    assert_eq!(errors[1].get_error_name(), "UnexpectedToken");
}

#[test]
fn test_error_position_is_the_offending_token() {
    let (_, result) = parse_source("x; )");
    let errors = result.unwrap_err();
    assert_eq!(errors[0].get_position().0, 3);
}

#[test]
fn test_recursion_limit() {
    let source = format!("{}x{}", "(".repeat(300), ")".repeat(300));
    let (_, result) = parse_source(&source);
    let errors = result.unwrap_err();
    assert_eq!(errors[0].get_error_name(), "RecursionLimitExceeded");
}

#[test]
fn test_parsing_is_deterministic() {
    let source = "infixl + 60; f x + g y; (a, b) = pair;";
    let (first_parser, first) = parse_source(source);
    let (second_parser, second) = parse_source(source);

    assert_eq!(first.unwrap(), second.unwrap());
    assert_eq!(
        first_parser.operators().len(),
        second_parser.operators().len()
    );
}

#[test]
fn test_leading_and_trailing_separators() {
    let (_, result) = parse_source("; x; ;");
    let parsed = statements(result);
    assert_eq!(parsed.len(), 1);
}
