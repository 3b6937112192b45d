//! Typed SCSS values and their operator algebra.
//!
//! Expression evaluation turns tokens into [`Value`]s, applies operators,
//! and prints the results back into the tree. Values are immutable from the
//! caller's viewpoint: every operator returns a fresh value.

pub mod color;
pub mod list;
pub mod number;

use std::cmp::Ordering;

use serde::Serialize;

use sassafras_tree::{AnyKind, NodeId, NodeKind, TokenTree};

pub use color::Color;
pub use list::{List, Separator};
pub use number::{Number, Unit};

use crate::error::CompileError;
use crate::options::CssOptions;
use crate::scope::Scope;
use crate::serialize;

/// Escape hatch for tokens not classifiable as any typed value; keeps the
/// token's subtype and printed text.
#[derive(Debug, Clone, Serialize)]
pub struct Opaque {
    /// Subtype of the wrapped token (`Unknown` for non-`Any` tokens).
    #[serde(skip)]
    pub kind: AnyKind,
    /// The token's printed form.
    pub text: String,
}

impl Opaque {
    /// Whether the wrapped token is an identifier.
    #[must_use]
    pub fn is_identifier(&self) -> bool {
        self.kind == AnyKind::Ident
    }
}

/// A typed SCSS value.
#[derive(Debug, Clone, Serialize)]
pub enum Value {
    /// A number with an optional unit.
    Number(Number),
    /// An unquoted code-point sequence; quoting is a print-time concern.
    Str(String),
    /// `true` / `false`.
    Bool(bool),
    /// A color in RGB or HSL form.
    Color(Color),
    /// An ordered list with a separator.
    List(List),
    /// Any other token, kept verbatim.
    Opaque(Opaque),
}

impl Value {
    /// Construct a value from a token. `$name` tokens resolve through the
    /// scope chain; identifiers, hashes, and functions are tried as colors
    /// and fall through to [`Value::Opaque`] when that fails (the only
    /// inline-caught error in the pipeline).
    ///
    /// # Errors
    /// Fails on unresolvable variables and malformed numbers.
    pub fn from_node(
        tree: &TokenTree,
        id: NodeId,
        scope: Option<&Scope>,
    ) -> Result<Value, CompileError> {
        match tree.kind(id) {
            NodeKind::ScssVariable => {
                if let Some(scope) = scope {
                    let name: String = tree.data(id).chars().skip(1).collect();
                    return scope.get(&name);
                }
                Ok(Value::opaque_of(tree, id))
            }
            NodeKind::Any(AnyKind::Number | AnyKind::Percentage | AnyKind::Dimension) => {
                Ok(Value::Number(Number::from_node(tree, id)?))
            }
            _ if tree.is_keyword(id, "true") => Ok(Value::Bool(true)),
            _ if tree.is_keyword(id, "false") => Ok(Value::Bool(false)),
            NodeKind::Any(AnyKind::Str) => {
                let data = tree.data(id);
                let inner: String = data
                    .chars()
                    .skip(1)
                    .take(data.chars().count().saturating_sub(2))
                    .collect();
                Ok(Value::Str(inner))
            }
            NodeKind::Any(AnyKind::Ident | AnyKind::Hash | AnyKind::Function)
            | NodeKind::Property => match Color::from_node(tree, id) {
                Ok(color) => Ok(Value::Color(color)),
                // Not a color after all; keep the token as-is.
                Err(_) => Ok(Value::opaque_of(tree, id)),
            },
            _ => Ok(Value::opaque_of(tree, id)),
        }
    }

    fn opaque_of(tree: &TokenTree, id: NodeId) -> Value {
        let kind = match tree.kind(id) {
            NodeKind::Any(any) => any,
            NodeKind::Property => AnyKind::Ident,
            _ => AnyKind::Unknown,
        };
        Value::Opaque(Opaque {
            kind,
            text: serialize::node_to_css(tree, id, CssOptions::default()),
        })
    }

    /// Apply a binary or unary operator; `operand` is `None` only for
    /// `not`.
    ///
    /// # Errors
    /// Fails when the operand kinds do not support the operator.
    pub fn apply(&self, operator: &str, operand: Option<&Value>) -> Result<Value, CompileError> {
        self.apply_inner(operator, operand).map_err(|err| {
            let rhs = operand.map_or_else(String::new, |v| v.to_css(CssOptions::default()));
            CompileError::new(format!(
                "Variable \"{}\" does not support the {} operator in combination with variable \"{}\" ({})",
                self.to_css(CssOptions::default()),
                operator,
                rhs,
                err
            ))
        })
    }

    fn apply_inner(
        &self,
        operator: &str,
        operand: Option<&Value>,
    ) -> Result<Value, CompileError> {
        if operator == "not" {
            return Ok(Value::Bool(!self.is_truthy()));
        }

        let operand =
            operand.ok_or_else(|| CompileError::new("Operator is missing an operand"))?;
        match operator {
            "+" => self.add(operand),
            "-" => self.sub(operand),
            "*" => self.mul(operand),
            "/" => self.div(operand),
            "%" => self.rem(operand),
            "==" => Ok(Value::Bool(self.compare(operand)? == Ordering::Equal)),
            "!=" => Ok(Value::Bool(self.compare(operand)? != Ordering::Equal)),
            "<=" => Ok(Value::Bool(self.compare(operand)? != Ordering::Greater)),
            ">=" => Ok(Value::Bool(self.compare(operand)? != Ordering::Less)),
            "<" => Ok(Value::Bool(self.compare(operand)? == Ordering::Less)),
            ">" => Ok(Value::Bool(self.compare(operand)? == Ordering::Greater)),
            "and" => Ok(Value::Bool(self.is_truthy() && operand.is_truthy())),
            "or" => Ok(Value::Bool(self.is_truthy() || operand.is_truthy())),
            _ => Err(CompileError::new(format!(
                "Unknown operator \"{operator}\" applied"
            ))),
        }
    }

    fn add(&self, operand: &Value) -> Result<Value, CompileError> {
        // Either side being a list extends the list.
        if matches!(operand, Value::List(_)) && !matches!(self, Value::Color(_)) {
            return Ok(Value::List(List::from_operands(
                self.clone(),
                operand.clone(),
            )));
        }

        match (self, operand) {
            (Value::Number(left), Value::Color(_)) => {
                // Scalar broadcast is symmetric; the color side handles it.
                operand.add(&Value::Number(*left))
            }
            (Value::Number(left), Value::Number(right)) => {
                let (value, unit) = right.convert_to_unit(left.unit)?;
                Ok(Value::Number(Number::with_unit(left.value + value, unit)))
            }
            (Value::Str(left), Value::Str(right)) => {
                Ok(Value::Str(format!("{left}{right}")))
            }
            (Value::Str(left), Value::Opaque(right)) if right.is_identifier() => {
                Ok(Value::Str(format!("{left}{}", right.text)))
            }
            (Value::Color(left), Value::List(_)) => Ok(Value::List(List::from_operands(
                operand.clone(),
                Value::Color(*left),
            ))),
            (Value::Color(left), Value::Color(right)) => {
                if left.alpha != right.alpha {
                    return Err(alpha_mismatch(left, right));
                }
                let (r1, g1, b1) = left.rgb();
                let (r2, g2, b2) = right.rgb();
                Ok(Value::Color(Color::from_rgb(
                    r1 + r2,
                    g1 + g2,
                    b1 + b2,
                    left.alpha,
                )))
            }
            (Value::Color(left), Value::Number(right)) => {
                let (r, g, b) = left.rgb();
                let val = right.value / 255.0;
                Ok(Value::Color(Color::from_rgb(
                    r + val,
                    g + val,
                    b + val,
                    left.alpha,
                )))
            }
            (Value::List(_), _) => Ok(Value::List(List::from_operands(
                self.clone(),
                operand.clone(),
            ))),
            (Value::Opaque(left), Value::Str(right)) if left.is_identifier() => {
                Ok(Value::Opaque(Opaque {
                    kind: AnyKind::Ident,
                    text: format!("{}{right}", left.text),
                }))
            }
            (Value::Opaque(left), Value::Opaque(right))
                if left.is_identifier() && right.is_identifier() =>
            {
                Ok(Value::Opaque(Opaque {
                    kind: AnyKind::Ident,
                    text: format!("{}{}", left.text, right.text),
                }))
            }
            _ => Err(CompileError::new("Cannot sum these operand types")),
        }
    }

    fn sub(&self, operand: &Value) -> Result<Value, CompileError> {
        match (self, operand) {
            (Value::Number(left), Value::Color(_)) => operand.sub(&Value::Number(*left)),
            (Value::Number(left), Value::Number(right)) => {
                let (value, unit) = right.convert_to_unit(left.unit)?;
                Ok(Value::Number(Number::with_unit(left.value - value, unit)))
            }
            (Value::Color(left), Value::Color(right)) => {
                if left.alpha != right.alpha {
                    return Err(alpha_mismatch(left, right));
                }
                let (r1, g1, b1) = left.rgb();
                let (r2, g2, b2) = right.rgb();
                Ok(Value::Color(Color::from_rgb(
                    r1 - r2,
                    g1 - g2,
                    b1 - b2,
                    left.alpha,
                )))
            }
            (Value::Color(left), Value::Number(right)) => {
                let (r, g, b) = left.rgb();
                let val = right.value / 255.0;
                Ok(Value::Color(Color::from_rgb(
                    r - val,
                    g - val,
                    b - val,
                    left.alpha,
                )))
            }
            _ => Err(CompileError::new("Cannot subtract these operand types")),
        }
    }

    fn mul(&self, operand: &Value) -> Result<Value, CompileError> {
        match (self, operand) {
            (Value::Number(left), Value::Color(_)) => operand.mul(&Value::Number(*left)),
            (Value::Number(left), Value::Number(right)) => {
                let (value, unit) = right.convert_to_unit(left.unit)?;
                Ok(Value::Number(Number::with_unit(left.value * value, unit)))
            }
            (Value::Color(left), Value::Color(right)) => {
                if left.alpha != right.alpha {
                    return Err(alpha_mismatch(left, right));
                }
                // Integer-style blend: channels multiply on the 0–255 scale
                // and renormalize.
                let (r1, g1, b1) = left.rgb();
                let (r2, g2, b2) = right.rgb();
                Ok(Value::Color(Color::from_rgb(
                    (255.0 * r1) * (255.0 * r2) / 255.0,
                    (255.0 * g1) * (255.0 * g2) / 255.0,
                    (255.0 * b1) * (255.0 * b2) / 255.0,
                    left.alpha,
                )))
            }
            (Value::Color(left), Value::Number(right)) => {
                let (r, g, b) = left.rgb();
                Ok(Value::Color(Color::from_rgb(
                    r * right.value,
                    g * right.value,
                    b * right.value,
                    left.alpha,
                )))
            }
            _ => Err(CompileError::new("Cannot multiply these operand types")),
        }
    }

    fn div(&self, operand: &Value) -> Result<Value, CompileError> {
        match (self, operand) {
            (Value::Number(left), Value::Number(right)) => {
                let (value, unit) = right.convert_to_unit(left.unit)?;
                Ok(Value::Number(Number::with_unit(left.value / value, unit)))
            }
            _ => Err(CompileError::new("Cannot divide these operand types")),
        }
    }

    fn rem(&self, operand: &Value) -> Result<Value, CompileError> {
        match (self, operand) {
            (Value::Number(left), Value::Number(right)) => {
                let (value, unit) = right.convert_to_unit(left.unit)?;
                Ok(Value::Number(Number::with_unit(left.value % value, unit)))
            }
            _ => Err(CompileError::new(
                "Cannot get the modulo of these operand types",
            )),
        }
    }

    /// Ordering used by the comparison operators.
    ///
    /// # Errors
    /// Fails for operand kinds with no defined ordering.
    pub fn compare(&self, operand: &Value) -> Result<Ordering, CompileError> {
        // Comparisons against booleans compare truthiness everywhere.
        if let Value::Bool(other) = operand {
            if !matches!(self, Value::Bool(_)) {
                return Ok(if self.is_truthy() && *other {
                    Ordering::Equal
                } else if self.is_truthy() {
                    Ordering::Greater
                } else {
                    Ordering::Less
                });
            }
        }

        match (self, operand) {
            (Value::Number(left), Value::Number(right)) => {
                let (value, _) = right.convert_to_unit(left.unit)?;
                Ok(if left.value == value {
                    Ordering::Equal
                } else if left.value > value {
                    Ordering::Greater
                } else {
                    Ordering::Less
                })
            }
            // Numbers sort below strings and other tokens.
            (Value::Number(_), Value::Str(_) | Value::Opaque(_)) => Ok(Ordering::Less),
            (Value::Str(left), Value::Str(right)) => Ok(left.as_str().cmp(right.as_str())),
            (Value::Str(left), Value::Opaque(right)) if right.is_identifier() => {
                Ok(left.as_str().cmp(right.text.as_str()))
            }
            (Value::Color(left), Value::Opaque(right))
                if right.is_identifier() && right.text == "none" =>
            {
                Ok(color_ordering(left, &Color::black()))
            }
            (Value::Color(left), Value::Color(right)) => Ok(color_ordering(left, right)),
            (Value::Color(left), Value::Str(text)) => match Color::from_named(text) {
                Some(right) => Ok(color_ordering(left, &right)),
                None => Err(CompileError::new("Cannot compare these operand types")),
            },
            (Value::Bool(left), _) => {
                let right = operand.is_truthy();
                Ok(if *left == right {
                    Ordering::Equal
                } else if *left {
                    Ordering::Greater
                } else {
                    Ordering::Less
                })
            }
            (Value::List(left), Value::List(right)) => {
                for (i, item) in left.items.iter().enumerate() {
                    let Some(other) = right.items.get(i) else {
                        return Ok(Ordering::Less);
                    };
                    let ordering = item
                        .to_css(CssOptions::default())
                        .cmp(&other.to_css(CssOptions::default()));
                    if ordering != Ordering::Equal {
                        return Ok(ordering);
                    }
                }
                Ok(if right.items.len() > left.items.len() {
                    Ordering::Greater
                } else {
                    Ordering::Equal
                })
            }
            (Value::Opaque(left), _) => Ok(left
                .text
                .cmp(&operand.to_css(CssOptions::default()))),
            _ => Err(CompileError::new("Cannot compare these operand types")),
        }
    }

    /// Truthiness: non-zero, non-empty, any lit channel with opacity, or
    /// the boolean itself.
    #[must_use]
    pub fn is_truthy(&self) -> bool {
        match self {
            Value::Number(number) => number.is_truthy(),
            Value::Str(text) => !text.is_empty(),
            Value::Bool(value) => *value,
            Value::Color(color) => color.is_truthy(),
            Value::List(list) => list.is_truthy(),
            Value::Opaque(opaque) => !opaque.text.is_empty(),
        }
    }

    /// Print the value in CSS form. Strings honor `strip_quotes` and
    /// escape embedded double quotes.
    #[must_use]
    pub fn to_css(&self, options: CssOptions) -> String {
        match self {
            Value::Number(number) => number.to_css(),
            Value::Str(text) => {
                let mut escaped = String::new();
                for character in text.chars() {
                    if character == '"' {
                        escaped.push('\\');
                    }
                    escaped.push(character);
                }
                if options.strip_quotes {
                    escaped
                } else {
                    format!("\"{escaped}\"")
                }
            }
            Value::Bool(value) => if *value { "true" } else { "false" }.to_string(),
            Value::Color(color) => color.to_css(),
            Value::List(list) => list.to_css(options),
            Value::Opaque(opaque) => opaque.text.clone(),
        }
    }
}

fn alpha_mismatch(left: &Color, right: &Color) -> CompileError {
    CompileError::new(format!(
        "Colors must have equal opacity when applying arithmetic (mismatch between \"{}\" and \"{}\")",
        left.to_css(),
        right.to_css()
    ))
}

/// Colors have no order: equal channels compare equal, anything else is
/// treated as greater.
fn color_ordering(left: &Color, right: &Color) -> Ordering {
    if left.channels_equal(right) {
        Ordering::Equal
    } else {
        Ordering::Greater
    }
}
