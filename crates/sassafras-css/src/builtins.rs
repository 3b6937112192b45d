//! Built-in SCSS functions, registered at compiler construction.

use std::rc::Rc;

use sassafras_tree::AnyKind;

use crate::error::CompileError;
use crate::function::{Builtin, FunctionDef};
use crate::options::CssOptions;
use crate::scope::Scope;
use crate::value::{Color, List, Opaque, Unit, Value};

/// Register every built-in into `scope` (normally the global scope).
pub fn register_builtins(scope: &Scope) {
    let builtins = [
        Builtin::new("compact", &[], true, compact),
        Builtin::new("darken", &["color", "amount"], false, darken),
        Builtin::new("first-value-of", &["value"], false, first_value_of),
        Builtin::new("if", &["condition", "value1", "value2"], false, scss_if),
        Builtin::new("lighten", &["color", "amount"], false, lighten),
        Builtin::new("opacify", &["color", "opacity"], false, opacify),
        Builtin::new("quote", &["value"], false, quote),
        Builtin::new(
            "transparentize",
            &["color", "opacity"],
            false,
            transparentize,
        ),
        Builtin::new("type-of", &["value"], false, type_of),
        Builtin::new("unquote", &["string"], false, unquote),
    ];
    for builtin in builtins {
        scope.set_function(builtin.name, Rc::new(FunctionDef::Builtin(builtin)));
    }
}

/// A fraction from a unitless number (0–1) or a percentage.
fn fraction_argument(
    value: &Value,
    function: &str,
    argument: &str,
) -> Result<f64, CompileError> {
    let Value::Number(number) = value else {
        return Err(CompileError::new(format!(
            "{argument} argument to {function}() should be a number, but is \"{}\"",
            value.to_css(CssOptions::default())
        )));
    };
    match number.unit {
        Unit::None => Ok(number.value.clamp(0.0, 1.0)),
        Unit::Percent => Ok((number.value / 100.0).clamp(0.0, 1.0)),
        unit => Err(CompileError::new(format!(
            "{argument} argument to {function}() should be a number or percentage, not a dimension in {unit} units"
        ))),
    }
}

fn color_argument<'a>(
    value: &'a Value,
    function: &str,
) -> Result<&'a Color, CompileError> {
    match value {
        Value::Color(color) => Ok(color),
        other => Err(CompileError::new(format!(
            "Color argument to {function}() should be a color, but is \"{}\"",
            other.to_css(CssOptions::default())
        ))),
    }
}

/// `compact(…)`: the argument list minus its falsy items.
fn compact(mut args: Vec<Value>) -> Result<Value, CompileError> {
    let Some(Value::List(list)) = args.pop() else {
        return Ok(Value::List(List::new()));
    };
    Ok(Value::List(List::from_values(
        list.items.into_iter().filter(Value::is_truthy).collect(),
    )))
}

/// `darken(color, amount)`: reduce lightness by the given fraction.
fn darken(args: Vec<Value>) -> Result<Value, CompileError> {
    let color = color_argument(&args[0], "darken")?;
    let amount = fraction_argument(&args[1], "darken", "Amount")?;
    Ok(Value::Color(color.darken(amount)))
}

/// `first-value-of(value)`: the first item of a list, or the value itself.
fn first_value_of(args: Vec<Value>) -> Result<Value, CompileError> {
    match &args[0] {
        Value::List(list) => list.items.first().cloned().ok_or_else(|| {
            CompileError::new("Cannot take the first value of an empty list")
        }),
        other => Ok(other.clone()),
    }
}

/// `if(condition, value1, value2)`.
fn scss_if(mut args: Vec<Value>) -> Result<Value, CompileError> {
    let value2 = args.pop().expect("arity checked by binding");
    let value1 = args.pop().expect("arity checked by binding");
    let condition = args.pop().expect("arity checked by binding");
    Ok(if condition.is_truthy() { value1 } else { value2 })
}

/// `lighten(color, amount)`: raise lightness by the given fraction.
fn lighten(args: Vec<Value>) -> Result<Value, CompileError> {
    let color = color_argument(&args[0], "lighten")?;
    let amount = fraction_argument(&args[1], "lighten", "Amount")?;
    Ok(Value::Color(color.lighten(amount)))
}

/// `opacify(color, opacity)`: move alpha toward opaque by the fraction.
fn opacify(args: Vec<Value>) -> Result<Value, CompileError> {
    let color = color_argument(&args[0], "opacify")?;
    let opacity = fraction_argument(&args[1], "opacify", "Opacity")?;
    let (r, g, b) = color.rgb();
    Ok(Value::Color(Color::from_rgb(
        r,
        g,
        b,
        (1.0 - color.alpha) * opacity + color.alpha,
    )))
}

/// `quote(value)`: the value as a quoted string.
fn quote(args: Vec<Value>) -> Result<Value, CompileError> {
    match &args[0] {
        Value::Str(text) => Ok(Value::Str(text.clone())),
        Value::Opaque(opaque) if opaque.is_identifier() => {
            Ok(Value::Str(opaque.text.clone()))
        }
        other => Err(CompileError::new(format!(
            "Cannot quote \"{}\"",
            other.to_css(CssOptions::default())
        ))),
    }
}

/// `transparentize(color, opacity)`: scale alpha down by the fraction.
fn transparentize(args: Vec<Value>) -> Result<Value, CompileError> {
    let color = color_argument(&args[0], "transparentize")?;
    let opacity = fraction_argument(&args[1], "transparentize", "Opacity")?;
    let (r, g, b) = color.rgb();
    Ok(Value::Color(Color::from_rgb(r, g, b, color.alpha * opacity)))
}

/// `type-of(value)`: number, string, bool, or color.
fn type_of(args: Vec<Value>) -> Result<Value, CompileError> {
    let name = match &args[0] {
        Value::Number(_) => "number",
        Value::Str(_) => "string",
        Value::Bool(_) => "bool",
        Value::Color(_) => "color",
        Value::Opaque(opaque) if opaque.is_identifier() => "string",
        other => {
            return Err(CompileError::new(format!(
                "Unknown type of \"{}\"",
                other.to_css(CssOptions::default())
            )));
        }
    };
    Ok(Value::Str(name.to_string()))
}

/// `unquote(string)`: the string's text as a bare identifier.
fn unquote(args: Vec<Value>) -> Result<Value, CompileError> {
    match &args[0] {
        Value::Str(text) => Ok(Value::Opaque(Opaque {
            kind: AnyKind::Ident,
            text: text.clone(),
        })),
        Value::Opaque(opaque) if opaque.is_identifier() => {
            Ok(Value::Opaque(opaque.clone()))
        }
        other => Err(CompileError::new(format!(
            "Cannot unquote \"{}\"",
            other.to_css(CssOptions::default())
        ))),
    }
}
