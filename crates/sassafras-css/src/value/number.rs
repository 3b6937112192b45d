//! Numbers with units and unit conversion.

use serde::Serialize;
use strum_macros::Display;

use sassafras_tree::{AnyKind, NodeId, NodeKind, TokenTree};

use crate::error::CompileError;

/// Units a number can carry.
///
/// Only the absolute length units (plus px at 96 per inch) convert into one
/// another; mixing anything else raises at the operator.
#[derive(Debug, Display, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Unit {
    /// Unitless.
    #[strum(serialize = "")]
    None,
    /// Percentage.
    #[strum(serialize = "%")]
    Percent,
    /// Centimeters.
    #[strum(serialize = "cm")]
    Cm,
    /// Millimeters.
    #[strum(serialize = "mm")]
    Mm,
    /// Inches.
    #[strum(serialize = "in")]
    In,
    /// Picas.
    #[strum(serialize = "pc")]
    Pc,
    /// Points.
    #[strum(serialize = "pt")]
    Pt,
    /// Pixels.
    #[strum(serialize = "px")]
    Px,
    /// Font-size-relative.
    #[strum(serialize = "em")]
    Em,
    /// x-height-relative.
    #[strum(serialize = "ex")]
    Ex,
    /// Seconds.
    #[strum(serialize = "s")]
    S,
    /// Degrees.
    #[strum(serialize = "deg")]
    Deg,
}

/// Conversion factor between two length units, if both are convertible.
fn conversion_factor(from: Unit, to: Unit) -> Option<f64> {
    use Unit::{Cm, In, Mm, Pc, Pt, Px};
    Some(match (from, to) {
        (Cm, Cm) | (In, In) | (Mm, Mm) | (Pc, Pc) | (Pt, Pt) | (Px, Px) => 1.0,
        (Cm, In) => 0.39,
        (Cm, Mm) => 10.0,
        (Cm, Pc) => 0.033,
        (Cm, Pt) => 0.0055,
        (Cm, Px) => 37.8,
        (In, Cm) => 2.54,
        (In, Mm) => 25.4,
        (In, Pc) => 12.0,
        (In, Pt) => 72.0,
        (In, Px) => 96.0,
        (Mm, Cm) => 0.1,
        (Mm, In) => 0.039,
        (Mm, Pc) => 0.0033,
        (Mm, Pt) => 0.00055,
        (Mm, Px) => 3.78,
        (Pc, Cm) => 0.21,
        (Pc, In) => 0.083,
        (Pc, Mm) => 2.1,
        (Pc, Pt) => 6.0,
        (Pc, Px) => 16.0,
        (Pt, Cm) => 0.035,
        (Pt, In) => 0.014,
        (Pt, Mm) => 0.35,
        (Pt, Pc) => 0.17,
        (Pt, Px) => 1.33,
        (Px, Cm) => 0.026,
        (Px, In) => 0.010,
        (Px, Mm) => 0.26,
        (Px, Pc) => 0.062,
        (Px, Pt) => 0.75,
        _ => return None,
    })
}

/// Dimension suffixes recognized on tokens, checked in this order.
const DIMENSION_UNITS: [(&str, Unit); 10] = [
    ("cm", Unit::Cm),
    ("deg", Unit::Deg),
    ("em", Unit::Em),
    ("ex", Unit::Ex),
    ("in", Unit::In),
    ("mm", Unit::Mm),
    ("pc", Unit::Pc),
    ("pt", Unit::Pt),
    ("px", Unit::Px),
    ("s", Unit::S),
];

/// A numeric value with an optional unit.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Number {
    /// The numeric value.
    pub value: f64,
    /// The unit, [`Unit::None`] for plain numbers.
    pub unit: Unit,
}

impl Number {
    /// A unitless number.
    #[must_use]
    pub fn unitless(value: f64) -> Self {
        Number {
            value,
            unit: Unit::None,
        }
    }

    /// A number with a unit.
    #[must_use]
    pub fn with_unit(value: f64, unit: Unit) -> Self {
        Number { value, unit }
    }

    /// Build from a number, percentage, or dimension token.
    ///
    /// # Errors
    /// Fails on any other token kind, malformed digits, or an unknown
    /// dimension unit.
    pub fn from_node(tree: &TokenTree, id: NodeId) -> Result<Self, CompileError> {
        let data = tree.data(id);
        match tree.kind(id) {
            NodeKind::Any(AnyKind::Number) => Ok(Number::unitless(parse_value(data)?)),
            NodeKind::Any(AnyKind::Percentage) => {
                let digits = data.strip_suffix('%').unwrap_or(data);
                Ok(Number::with_unit(parse_value(digits)?, Unit::Percent))
            }
            NodeKind::Any(AnyKind::Dimension) => {
                for (suffix, unit) in DIMENSION_UNITS {
                    if let Some(digits) = data.strip_suffix(suffix) {
                        return Ok(Number::with_unit(parse_value(digits)?, unit));
                    }
                }
                Err(CompileError::new(format!(
                    "Unrecognized value \"{data}\" assigned to number"
                )))
            }
            _ => Err(CompileError::new(format!(
                "Unrecognized value \"{data}\" assigned to number"
            ))),
        }
    }

    /// Convert to `unit`. An empty target keeps this unit; an empty source
    /// adopts the target unit; anything else consults the conversion table.
    ///
    /// # Errors
    /// Fails when the units are incompatible.
    pub fn convert_to_unit(&self, unit: Unit) -> Result<(f64, Unit), CompileError> {
        if unit == Unit::None || unit == self.unit {
            return Ok((self.value, self.unit));
        }
        if self.unit == Unit::None {
            return Ok((self.value, unit));
        }

        match conversion_factor(self.unit, unit) {
            Some(factor) => Ok((self.value * factor, unit)),
            None => Err(CompileError::new(format!(
                "Cannot convert number from {} units to {} units",
                self.unit, unit
            ))),
        }
    }

    /// Non-zero.
    #[must_use]
    pub fn is_truthy(&self) -> bool {
        self.value != 0.0
    }

    /// Print the value with its unit, integers without a decimal point.
    #[must_use]
    pub fn to_css(&self) -> String {
        format!("{}{}", format_float(self.value), self.unit)
    }
}

/// Parse the digits of a token into a float.
fn parse_value(digits: &str) -> Result<f64, CompileError> {
    digits.parse().map_err(|_| {
        CompileError::new(format!("Unrecognized value \"{digits}\" assigned to number"))
    })
}

/// Integers print bare; everything else uses the shortest float form.
#[must_use]
pub fn format_float(value: f64) -> String {
    if value.fract() == 0.0 && value.abs() < 1e15 {
        format!("{}", value as i64)
    } else {
        format!("{value}")
    }
}
