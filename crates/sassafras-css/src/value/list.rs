//! Space- and comma-separated value lists.

use serde::Serialize;

use crate::options::CssOptions;
use crate::value::Value;

/// List item separator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Separator {
    /// Items joined by a single space.
    Space,
    /// Items joined by a comma.
    Comma,
}

impl Separator {
    /// The joining string.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Separator::Space => " ",
            Separator::Comma => ",",
        }
    }
}

/// An ordered list of values with one separator.
#[derive(Debug, Clone, Serialize)]
pub struct List {
    /// The items in order.
    pub items: Vec<Value>,
    /// How the items are joined.
    pub separator: Separator,
}

impl List {
    /// An empty space-separated list.
    #[must_use]
    pub fn new() -> Self {
        List {
            items: Vec::new(),
            separator: Separator::Space,
        }
    }

    /// A list from pre-built values.
    #[must_use]
    pub fn from_values(values: Vec<Value>) -> Self {
        let mut list = List::new();
        for value in values {
            list.push(value);
        }
        list
    }

    /// Combine two operands into a list: if either side already is one, the
    /// other is appended/prepended to it; otherwise both become items.
    #[must_use]
    pub fn from_operands(left: Value, right: Value) -> List {
        match (left, right) {
            (Value::List(mut list), right) => {
                list.push(right);
                list
            }
            (left, Value::List(mut list)) => {
                list.prepend(left);
                list
            }
            (left, right) => List {
                items: vec![left, right],
                separator: Separator::Space,
            },
        }
    }

    /// Append a value, flattening one level of nested list.
    pub fn push(&mut self, value: Value) {
        match value {
            Value::List(list) => {
                for item in list.items {
                    self.push(item);
                }
            }
            value => self.items.push(value),
        }
    }

    /// Prepend a value, flattening one level of nested list.
    pub fn prepend(&mut self, value: Value) {
        match value {
            Value::List(list) => {
                for item in list.items {
                    self.items.insert(0, item);
                }
            }
            value => self.items.insert(0, value),
        }
    }

    /// Non-empty.
    #[must_use]
    pub fn is_truthy(&self) -> bool {
        !self.items.is_empty()
    }

    /// Print the items joined by the separator; empty nested lists vanish.
    #[must_use]
    pub fn to_css(&self, options: CssOptions) -> String {
        let mut parts = Vec::new();
        for item in &self.items {
            if matches!(item, Value::List(list) if list.items.is_empty()) {
                continue;
            }
            parts.push(item.to_css(options));
        }
        parts.join(self.separator.as_str())
    }
}

impl Default for List {
    fn default() -> Self {
        List::new()
    }
}
