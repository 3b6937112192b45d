//! Tests for the expression evaluator: precedence, the slash rule, unary
//! operators, and the standalone [`Expression`] entry point.

use sassafras_css::{Compiler, CssOptions, Expression, Scope};

/// Evaluate an expression string against a scope with the built-ins
/// registered, and return its printed result.
fn evaluate(source: &str) -> String {
    evaluate_in(source, &Compiler::new().global_scope().clone())
}

fn evaluate_in(source: &str, scope: &Scope) -> String {
    let mut expression =
        Expression::from_string(source, CssOptions::default()).expect("parse failed");
    expression.evaluate(scope).expect("evaluation failed");
    expression.to_css(CssOptions::default())
}

#[test]
fn test_multiplication_binds_tighter_than_addition() {
    assert_eq!(evaluate("2 + 3 * 4"), "14");
}

#[test]
fn test_parentheses_override_precedence() {
    assert_eq!(evaluate("(2 + 3) * 4"), "20");
}

#[test]
fn test_unit_conversion_through_addition() {
    assert_eq!(evaluate("1px + 1in"), "97px");
}

#[test]
fn test_not_is_a_prefix_operator() {
    assert_eq!(evaluate("not true"), "false");
    assert_eq!(evaluate("not not true"), "true");
}

#[test]
fn test_prefix_minus_synthesizes_zero_minus() {
    assert_eq!(evaluate("- 5px + 10px"), "5px");
}

#[test]
fn test_comparisons() {
    assert_eq!(evaluate("1 < 2"), "true");
    assert_eq!(evaluate("2px >= 3px"), "false");
    assert_eq!(evaluate("96px == 1in"), "true");
    assert_eq!(evaluate("1 != 2"), "true");
}

#[test]
fn test_boolean_connectives() {
    assert_eq!(evaluate("true and false"), "false");
    assert_eq!(evaluate("true or false"), "true");
    // Comparisons bind tighter than the connectives.
    assert_eq!(evaluate("1 < 2 and 3 < 4"), "true");
}

#[test]
fn test_slash_is_literal_without_variables() {
    // CSS shorthand: no variable in sight, so the slash passes through.
    assert_eq!(evaluate("16px/1.5"), "16px/1.5");
}

#[test]
fn test_slash_divides_inside_parentheses() {
    assert_eq!(evaluate("(10px / 2)"), "5px");
}

#[test]
fn test_slash_divides_with_a_variable_operand() {
    let scope = Compiler::new().global_scope().clone();
    scope.set(
        "w",
        sassafras_css::Value::Number(sassafras_css::Number::with_unit(
            10.0,
            sassafras_css::Unit::Px,
        )),
    );

    assert_eq!(evaluate_in("$w/2", &scope), "5px");
    // The left operand's unit dominates.
    assert_eq!(evaluate_in("20px/$w", &scope), "2px");
}

#[test]
fn test_non_expression_tokens_pass_through() {
    assert_eq!(evaluate("1px solid red"), "1px solid red");
}

#[test]
fn test_builtin_function_calls() {
    assert_eq!(evaluate("if(true, 1px, 2px)"), "1px");
    assert_eq!(evaluate("if(1 > 2, 1px, 2px)"), "2px");
    assert_eq!(evaluate("type-of(3px)"), "\"number\"");
    assert_eq!(evaluate("quote(hello)"), "\"hello\"");
    assert_eq!(evaluate("unquote(\"hello\")"), "hello");
}

#[test]
fn test_color_builtins() {
    assert_eq!(evaluate("darken(white, 50%)"), "gray");
    assert_eq!(evaluate("transparentize(black, 0)"), "transparent");
}

#[test]
fn test_unknown_function_passes_through() {
    assert_eq!(evaluate("calc(100% - 10px)"), "calc(100% - 10px)");
}

#[test]
fn test_unresolved_variable_raises() {
    let scope = Scope::new();
    let mut expression =
        Expression::from_string("$missing + 1", CssOptions::default()).expect("parse failed");
    assert!(expression.evaluate(&scope).is_err());
}

#[test]
fn test_string_concatenation_in_expression() {
    assert_eq!(evaluate("\"foo\" + \"bar\""), "\"foobar\"");
}
