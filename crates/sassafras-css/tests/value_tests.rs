//! Tests for the typed value algebra: numbers and unit conversion, colors
//! and their shortest printing, comparisons, and truthiness.

use std::cmp::Ordering;

use sassafras_css::value::{Color, List, Number, Opaque, Separator, Unit, Value};
use sassafras_css::{AnyKind, CssOptions};

fn px(value: f64) -> Value {
    Value::Number(Number::with_unit(value, Unit::Px))
}

fn number(value: f64) -> Value {
    Value::Number(Number::unitless(value))
}

fn ident(text: &str) -> Value {
    Value::Opaque(Opaque {
        kind: AnyKind::Ident,
        text: text.to_string(),
    })
}

fn css(value: &Value) -> String {
    value.to_css(CssOptions::default())
}

#[test]
fn test_number_addition_keeps_left_unit() {
    let result = px(1.0).apply("+", Some(&Value::Number(Number::with_unit(1.0, Unit::In))));
    assert_eq!(css(&result.unwrap()), "97px");
}

#[test]
fn test_number_with_unitless_operand() {
    let result = px(10.0).apply("*", Some(&number(2.0))).unwrap();
    assert_eq!(css(&result), "20px");

    // A unitless left side adopts the right side's unit.
    let result = number(2.0).apply("*", Some(&px(10.0))).unwrap();
    assert_eq!(css(&result), "20px");
}

#[test]
fn test_number_division_and_modulo() {
    let result = px(10.0).apply("/", Some(&number(4.0))).unwrap();
    assert_eq!(css(&result), "2.5px");

    let result = number(7.0).apply("%", Some(&number(4.0))).unwrap();
    assert_eq!(css(&result), "3");
}

#[test]
fn test_incompatible_units_raise() {
    let seconds = Value::Number(Number::with_unit(1.0, Unit::S));
    assert!(px(1.0).apply("+", Some(&seconds)).is_err());
}

#[test]
fn test_number_comparisons_convert_units() {
    let cm = Value::Number(Number::with_unit(2.54, Unit::Cm));
    let inch = Value::Number(Number::with_unit(1.0, Unit::In));
    let result = cm.apply("==", Some(&inch)).unwrap();
    assert!(matches!(result, Value::Bool(true)));

    let result = px(5.0).apply("<", Some(&px(6.0))).unwrap();
    assert!(matches!(result, Value::Bool(true)));
}

#[test]
fn test_boolean_operators() {
    let result = Value::Bool(true).apply("and", Some(&number(0.0))).unwrap();
    assert!(matches!(result, Value::Bool(false)));

    let result = Value::Bool(false).apply("or", Some(&number(3.0))).unwrap();
    assert!(matches!(result, Value::Bool(true)));

    let result = Value::Bool(true).apply("not", None).unwrap();
    assert!(matches!(result, Value::Bool(false)));
}

#[test]
fn test_string_concatenation() {
    let result = Value::Str("foo".to_string())
        .apply("+", Some(&Value::Str("bar".to_string())))
        .unwrap();
    assert_eq!(css(&result), "\"foobar\"");

    // String + identifier stays a string; identifier + string stays an
    // identifier.
    let result = Value::Str("foo".to_string())
        .apply("+", Some(&ident("bar")))
        .unwrap();
    assert!(matches!(result, Value::Str(_)));

    let result = ident("foo")
        .apply("+", Some(&Value::Str("bar".to_string())))
        .unwrap();
    assert_eq!(css(&result), "foobar");
}

#[test]
fn test_quoted_printing_escapes_embedded_quotes() {
    let value = Value::Str("say \"hi\"".to_string());
    assert_eq!(css(&value), "\"say \\\"hi\\\"\"");

    let stripped = CssOptions {
        strip_quotes: true,
        ..CssOptions::default()
    };
    assert_eq!(value.to_css(stripped), "say \\\"hi\\\"");
}

#[test]
fn test_list_extension_flattens() {
    let list = Value::List(List::from_values(vec![px(1.0), px(2.0)]));
    let extended = list.apply("+", Some(&px(3.0))).unwrap();
    assert_eq!(css(&extended), "1px 2px 3px");

    let other = Value::List(List::from_values(vec![px(0.0)]));
    let combined = other.apply("+", Some(&extended)).unwrap();
    assert_eq!(css(&combined), "0px 1px 2px 3px");
}

#[test]
fn test_comma_list_printing() {
    let mut list = List::from_values(vec![ident("a"), ident("b")]);
    list.separator = Separator::Comma;
    assert_eq!(Value::List(list).to_css(CssOptions::default()), "a,b");
}

#[test]
fn test_color_keyword_and_hex_parse_to_same_color() {
    let named = Color::from_named("red").unwrap();
    let long = Color::from_hex("#ff0000").unwrap();
    let short = Color::from_hex("#f00").unwrap();
    assert!(named.channels_equal(&long));
    assert!(named.channels_equal(&short));
}

#[test]
fn test_color_prints_shortest_form() {
    // A keyword wins when it is the shortest spelling.
    assert_eq!(Color::from_hex("#ff0000").unwrap().to_css(), "red");
    // Collapsible hex beats a longer keyword.
    assert_eq!(Color::from_hex("#ffaa00").unwrap().to_css(), "#fa0");
    // Six digits stay when nothing shorter exists.
    assert_eq!(Color::from_hex("#123456").unwrap().to_css(), "#123456");
}

#[test]
fn test_transparent_wins_at_alpha_zero() {
    let color = Color::from_rgb(0.0, 0.0, 0.0, 0.0);
    assert_eq!(color.to_css(), "transparent");
}

#[test]
fn test_translucent_color_prints_rgba() {
    let color = Color::from_rgb(1.0, 0.0, 0.0, 0.5);
    assert_eq!(color.to_css(), "rgba(255,0,0,.5)");
}

#[test]
fn test_color_arithmetic_with_scalar() {
    let gray = Color::from_hex("#555555").unwrap();
    let result = Value::Color(gray)
        .apply("+", Some(&number(17.0)))
        .unwrap();
    // 0x55 + 17 == 0x66 on every channel.
    assert_eq!(css(&result), "#666");
}

#[test]
fn test_color_addition_requires_matching_alpha() {
    let opaque = Color::from_hex("#111111").unwrap();
    let translucent = Color::from_rgb(0.0, 0.0, 0.0, 0.5);
    assert!(
        Value::Color(opaque)
            .apply("+", Some(&Value::Color(translucent)))
            .is_err()
    );
}

#[test]
fn test_darken_and_lighten_move_lightness() {
    let white = Color::from_named("white").unwrap();
    assert_eq!(white.darken(0.5).to_css(), "gray");

    // Fully lightened black is white, but `#fff` is the shorter spelling.
    let black = Color::from_named("black").unwrap();
    assert_eq!(black.lighten(1.0).to_css(), "#fff");
}

#[test]
fn test_hsl_round_trip() {
    let red = Color::from_named("red").unwrap();
    let through_hsl = red.to_hsl().to_rgb();
    assert!(red.channels_equal(&through_hsl));
}

#[test]
fn test_color_compares_to_none_keyword() {
    let black = Color::from_named("black").unwrap();
    let result = Value::Color(black).apply("==", Some(&ident("none")));
    // Opaque black versus `none` (transparent-ish black at full alpha).
    assert!(matches!(result.unwrap(), Value::Bool(true)));
}

#[test]
fn test_truthiness() {
    assert!(!number(0.0).is_truthy());
    assert!(number(0.1).is_truthy());
    assert!(!Value::Str(String::new()).is_truthy());
    assert!(Value::Str("x".to_string()).is_truthy());
    assert!(!Value::List(List::new()).is_truthy());
    assert!(Value::Color(Color::from_named("red").unwrap()).is_truthy());
    assert!(!Value::Color(Color::from_rgb(1.0, 0.0, 0.0, 0.0)).is_truthy());
    assert!(!Value::Color(Color::from_named("black").unwrap()).is_truthy());
}

#[test]
fn test_cross_type_ordering() {
    // Numbers sort below strings.
    let result = number(5.0).compare(&Value::Str("a".to_string())).unwrap();
    assert_eq!(result, Ordering::Less);

    // Strings compare lexicographically.
    let result = Value::Str("abc".to_string())
        .compare(&Value::Str("abd".to_string()))
        .unwrap();
    assert_eq!(result, Ordering::Less);
}
