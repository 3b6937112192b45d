//! Expression evaluation over value-token sequences.
//!
//! The evaluator is precedence climbing over a slice of items, where an
//! item is either a token still in the tree or a value computed along the
//! way. Nothing in the tree mutates during evaluation; the compiler splices
//! the final item list back into the value node in one step.
//!
//! Operator precedence, tightest first: unary `not`; `*` `/` `%`; `+` `-`;
//! the comparisons; `and`/`or`. The `/` operator is special-cased: CSS uses
//! it as a literal (`font: 16px/1.5`), so outside parentheses it only
//! divides when one of its operands is an SCSS variable or a computed
//! value.

use sassafras_tree::{AnyKind, NodeId, NodeKind, TokenTree};

use crate::error::{CompileError, ParseError};
use crate::function;
use crate::options::CssOptions;
use crate::parser;
use crate::scope::Scope;
use crate::serialize;
use crate::stream::CharStream;
use crate::tokens;
use crate::value::{List, Number, Separator, Value};

/// One element of an expression under evaluation.
#[derive(Debug, Clone)]
pub enum ExprItem {
    /// A token still sitting in the tree.
    Node(NodeId),
    /// A value computed by the evaluator.
    Value(Value),
}

/// Whether the item is whitespace or a comment.
fn is_trivia_item(tree: &TokenTree, item: &ExprItem) -> bool {
    matches!(item, ExprItem::Node(id) if tree.is_trivia(*id))
}

/// Index of the next non-trivia item at or after `from`.
fn next_non_trivia(tree: &TokenTree, items: &[ExprItem], from: usize) -> Option<usize> {
    (from..items.len()).find(|&i| !is_trivia_item(tree, &items[i]))
}

/// Operator precedence of an item; 0 marks an atom boundary.
fn priority_of(tree: &TokenTree, item: &ExprItem) -> u8 {
    let ExprItem::Node(id) = item else {
        return 0;
    };
    let id = *id;
    if tree.is_keyword(id, "not") {
        5
    } else if tree.is_delimiter(id, "*/%") {
        4
    } else if tree.is_delimiter(id, "+-") {
        3
    } else if ["==", "!=", "<=", ">=", "<", ">"]
        .iter()
        .any(|op| tree.is_operator(id, op))
    {
        2
    } else if tree.is_keyword(id, "and") || tree.is_keyword(id, "or") {
        1
    } else {
        0
    }
}

/// Variables divide; so do already-computed values (they print as
/// variables would).
fn is_variable_like(tree: &TokenTree, item: &ExprItem) -> bool {
    match item {
        ExprItem::Value(_) => true,
        ExprItem::Node(id) => matches!(tree.kind(*id), NodeKind::ScssVariable),
    }
}

/// The typed value of an item.
fn value_of_item(
    tree: &TokenTree,
    item: &ExprItem,
    scope: &Scope,
) -> Result<Value, CompileError> {
    match item {
        ExprItem::Value(value) => Ok(value.clone()),
        ExprItem::Node(id) => Value::from_node(tree, *id, Some(scope)),
    }
}

/// Print an item the way the tree would.
pub fn item_to_css(tree: &TokenTree, item: &ExprItem, options: CssOptions) -> String {
    match item {
        ExprItem::Node(id) => serialize::node_to_css(tree, *id, options),
        ExprItem::Value(value) => value.to_css(options),
    }
}

/// Evaluate a whole value sequence: every expression in it folds to a
/// value, everything else passes through untouched.
///
/// # Errors
/// Fails on unresolvable variables, bad operands, or incompatible units.
pub fn eval_items(
    tree: &TokenTree,
    items: Vec<ExprItem>,
    scope: &Scope,
    process_slash: bool,
) -> Result<Vec<ExprItem>, CompileError> {
    let mut items = items;
    let mut i = 0;
    while i < items.len() {
        if is_trivia_item(tree, &items[i]) {
            i += 1;
            continue;
        }
        eval_expression(tree, &mut items, i, 0, process_slash, scope)?;
        i += 1;
    }
    Ok(items)
}

/// Evaluate the expression starting at `start`, folding it into a single
/// item at `start`. Operators bind only while their precedence exceeds
/// `parent_priority`.
fn eval_expression(
    tree: &TokenTree,
    items: &mut Vec<ExprItem>,
    start: usize,
    parent_priority: u8,
    process_slash: bool,
    scope: &Scope,
) -> Result<(), CompileError> {
    resolve_atom(tree, items, start, scope)?;

    loop {
        let Some(op_index) = next_non_trivia(tree, items, start + 1) else {
            return Ok(());
        };
        let priority = priority_of(tree, &items[op_index]);
        if priority == 0 || (parent_priority > 0 && priority <= parent_priority) {
            return Ok(());
        }

        let op_id = match &items[op_index] {
            ExprItem::Node(id) => *id,
            ExprItem::Value(_) => return Ok(()),
        };

        // The slash rule: a literal unless a variable sits on either side.
        if tree.is_operator(op_id, "/") && !process_slash {
            let left_is_variable = is_variable_like(tree, &items[start]);
            let right_is_variable = next_non_trivia(tree, items, op_index + 1)
                .is_some_and(|i| is_variable_like(tree, &items[i]));
            if !left_is_variable && !right_is_variable {
                return Ok(());
            }
        }

        let operator = tree.data(op_id).to_string();
        let Some(rhs_index) = next_non_trivia(tree, items, op_index + 1) else {
            return Ok(());
        };
        eval_expression(tree, items, rhs_index, priority, true, scope)?;

        let left = value_of_item(tree, &items[start], scope)?;
        let right = value_of_item(tree, &items[rhs_index], scope)?;
        let result = left.apply(&operator, Some(&right))?;
        let _ = items
            .splice(start..=rhs_index, [ExprItem::Value(result)])
            .count();
    }
}

/// Resolve the atom at `pos` in place: sets recurse, variables resolve,
/// registered functions run, and the unary operators fold their operand.
fn resolve_atom(
    tree: &TokenTree,
    items: &mut Vec<ExprItem>,
    pos: usize,
    scope: &Scope,
) -> Result<(), CompileError> {
    let id = match &items[pos] {
        ExprItem::Node(id) => *id,
        ExprItem::Value(_) => return Ok(()),
    };

    match tree.kind(id) {
        NodeKind::Any(AnyKind::Set) => {
            let value = evaluate_set(tree, id, scope)?;
            items[pos] = ExprItem::Value(value);
        }
        NodeKind::ScssVariable => {
            items[pos] = ExprItem::Value(Value::from_node(tree, id, Some(scope))?);
        }
        NodeKind::Any(AnyKind::Function) => {
            let name = tokens::function_name(tree, id)?;
            if scope.has_function(&name) {
                let arguments = tokens::function_arguments(tree, id, true);
                let value = function::call_function(tree, &name, &arguments, scope)?;
                items[pos] = ExprItem::Value(value);
            }
        }
        _ if tree.is_keyword(id, "not") => {
            let Some(rhs_index) = next_non_trivia(tree, items, pos + 1) else {
                return Ok(());
            };
            eval_expression(tree, items, rhs_index, 5, true, scope)?;
            let operand = value_of_item(tree, &items[rhs_index], scope)?;
            let result = operand.apply("not", None)?;
            let _ = items
                .splice(pos..=rhs_index, [ExprItem::Value(result)])
                .count();
        }
        _ if tree.is_operator(id, "-") => {
            // Prefix minus is zero minus the operand.
            let Some(rhs_index) = next_non_trivia(tree, items, pos + 1) else {
                return Ok(());
            };
            eval_expression(tree, items, rhs_index, 3, true, scope)?;
            let operand = value_of_item(tree, &items[rhs_index], scope)?;
            let result =
                Value::Number(Number::unitless(0.0)).apply("-", Some(&operand))?;
            let _ = items
                .splice(pos..=rhs_index, [ExprItem::Value(result)])
                .count();
        }
        _ => {}
    }
    Ok(())
}

/// Evaluate a parenthesized set to a single value (or a list when the set
/// holds several).
///
/// # Errors
/// Fails on an empty set.
pub fn evaluate_set(
    tree: &TokenTree,
    set: NodeId,
    scope: &Scope,
) -> Result<Value, CompileError> {
    let children = tokens::stripped_group_children(tree, set);
    let items = eval_items(
        tree,
        children.into_iter().map(ExprItem::Node).collect(),
        scope,
        true,
    )?;
    if items.is_empty() {
        return Err(CompileError::new("Cannot evaluate an empty set"));
    }
    items_to_value(tree, &items, scope)
}

/// A single item becomes that value; several become a list.
pub fn items_to_value(
    tree: &TokenTree,
    items: &[ExprItem],
    scope: &Scope,
) -> Result<Value, CompileError> {
    if items.len() == 1 {
        value_of_item(tree, &items[0], scope)
    } else {
        Ok(Value::List(list_from_items(tree, items, scope)?))
    }
}

/// Build a list from evaluated items, detecting the comma separator and
/// skipping trivia and separators.
pub fn list_from_items(
    tree: &TokenTree,
    items: &[ExprItem],
    scope: &Scope,
) -> Result<List, CompileError> {
    let mut list = List::new();
    for item in items {
        if let ExprItem::Node(id) = item {
            if tree.is_delimiter(*id, ",") {
                list.separator = Separator::Comma;
            }
            if tree.is_trivia(*id) || tree.is_delimiter(*id, list.separator.as_str()) {
                continue;
            }
        }
        list.push(value_of_item(tree, item, scope)?);
    }
    Ok(list)
}

/// Evaluate an assignment's right-hand side and bind it in `scope`.
///
/// A trailing `!default` makes the binding conditional: an already-bound
/// name wins and the assignment is a no-op.
///
/// # Errors
/// Fails when the assignment is structurally incomplete or the expression
/// fails.
pub fn process_assignment(
    tree: &TokenTree,
    assignment: NodeId,
    scope: &Scope,
) -> Result<(), CompileError> {
    let variable = tokens::variable_of(tree, assignment)
        .ok_or_else(|| CompileError::new("Assignment does not have a variable to assign"))?;
    let name: String = tree.data(variable).chars().skip(1).collect();
    let value_node = tokens::value_of(tree, assignment)
        .ok_or_else(|| CompileError::new("Assignment does not have a value"))?;

    let mut children = tokens::stripped_value_children(tree, value_node);
    if let Some(last) = children.iter().rposition(|&c| !tree.is_trivia(c)) {
        if tree.is_keyword(children[last], "!default") {
            if scope.has(&name) {
                return Ok(());
            }
            children.truncate(last);
            while children.last().is_some_and(|&c| tree.is_trivia(c)) {
                let _ = children.pop();
            }
        }
    }

    let items = eval_items(
        tree,
        children.into_iter().map(ExprItem::Node).collect(),
        scope,
        false,
    )?;
    let value = if items.len() == 1 {
        value_of_item(tree, &items[0], scope)?
    } else {
        Value::List(list_from_items(tree, &items, scope)?)
    };
    scope.set(name, value);
    Ok(())
}

/// Rewrite `#{…}` fragments inside an identifier or string body.
///
/// Each fragment parses as an expression, evaluates in `scope`, and prints
/// quote-stripped into the surrounding text; embedded double quotes come
/// out escaped.
///
/// # Errors
/// Fails when a fragment fails to parse or evaluate.
pub fn interpolate(
    data: &str,
    is_string: bool,
    scope: &Scope,
) -> Result<String, CompileError> {
    let source: String = if is_string {
        let count = data.chars().count();
        data.chars().skip(1).take(count.saturating_sub(2)).collect()
    } else {
        data.to_string()
    };

    let mut stream = CharStream::new(&source, false);
    let mut result = String::new();
    while !stream.is_end_of_file(0) {
        let character = stream.take(1);
        if character == "#" && stream.current() == Some('{') {
            let _ = stream.take(1); // skip the {
            let mut scratch = TokenTree::new();
            let value_node = parser::parse_value_into(
                &mut scratch,
                &mut stream,
                CssOptions::default().with_scss(true),
            )
            .map_err(|err| CompileError::new(err.to_string()))?;
            let children = tokens::stripped_value_children(&scratch, value_node);
            let items = eval_items(
                &scratch,
                children.into_iter().map(ExprItem::Node).collect(),
                scope,
                false,
            )?;
            let print_options = CssOptions {
                strip_quotes: true,
                ..CssOptions::default()
            };
            for item in &items {
                result.push_str(&item_to_css(&scratch, item, print_options));
            }
            let _ = stream.take(1); // skip the }
        } else {
            if character == "\"" {
                result.push('\\');
            }
            result.push_str(&character);
        }
    }
    Ok(result)
}

/// A standalone expression: parse once, evaluate in any scope, print.
///
/// This is the REPL's entry into the pipeline.
#[derive(Debug)]
pub struct Expression {
    tree: TokenTree,
    items: Vec<ExprItem>,
}

impl Expression {
    /// Parse `source` as a value expression (SCSS mode is forced on).
    ///
    /// # Errors
    /// Fails on a parse error in the expression body.
    pub fn from_string(source: &str, options: CssOptions) -> Result<Expression, ParseError> {
        let options = options.with_scss(true);
        let mut stream = CharStream::new(source, true);
        let mut tree = TokenTree::new();
        let value = parser::parse_value_into(&mut tree, &mut stream, options)?;
        let items = tokens::stripped_value_children(&tree, value)
            .into_iter()
            .map(ExprItem::Node)
            .collect();
        Ok(Expression { tree, items })
    }

    /// Evaluate all expressions in place against `scope`.
    ///
    /// # Errors
    /// Propagates evaluation failures.
    pub fn evaluate(&mut self, scope: &Scope) -> Result<(), CompileError> {
        let items = std::mem::take(&mut self.items);
        self.items = eval_items(&self.tree, items, scope, false)?;
        Ok(())
    }

    /// Print the (possibly evaluated) expression.
    #[must_use]
    pub fn to_css(&self, options: CssOptions) -> String {
        self.items
            .iter()
            .map(|item| item_to_css(&self.tree, item, options))
            .collect()
    }
}
