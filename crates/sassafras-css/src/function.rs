//! User-defined functions, mixins, and the shared argument binding.
//!
//! A mixin and a function share one shape (name, captured scope,
//! parameter list, body) and differ only in how the body runs: a mixin's
//! block is cloned and compiled to tokens, a function's statements are
//! walked for assignments until `@return`. Both carry their body as a tree
//! of their own so they outlive the stylesheet that defined them.

use sassafras_tree::{NodeId, NodeKind, TokenTree};

use crate::error::CompileError;
use crate::expr::{self, ExprItem};
use crate::scope::Scope;
use crate::tokens;
use crate::value::Value;

/// One declared parameter.
#[derive(Debug, Clone)]
pub struct Param {
    /// Parameter name, without the `$`.
    pub name: String,
    /// Default value, evaluated in the definition scope.
    pub default: Option<Value>,
}

/// A user-defined function or mixin.
#[derive(Debug, Clone)]
pub struct Callable {
    /// Definition name.
    pub name: String,
    /// Child of the scope the definition appeared in.
    pub scope: Scope,
    /// Declared parameters in order.
    pub params: Vec<Param>,
    /// The body block, extracted into its own tree.
    pub body: TokenTree,
}

/// Something callable from an expression.
#[derive(Debug)]
pub enum FunctionDef {
    /// Defined with `@function`.
    User(Callable),
    /// Registered at compiler construction.
    Builtin(Builtin),
}

/// A built-in function: a Rust fn plus the parameter names used for
/// keyword binding.
#[derive(Debug, Clone)]
pub struct Builtin {
    /// SCSS-visible name (dashes, not underscores).
    pub name: &'static str,
    /// Parameter names in order.
    pub params: &'static [&'static str],
    /// Variadic built-ins bind their whole argument list as `list`.
    pub variadic: bool,
    func: fn(Vec<Value>) -> Result<Value, CompileError>,
}

impl Builtin {
    /// Define a built-in.
    #[must_use]
    pub fn new(
        name: &'static str,
        params: &'static [&'static str],
        variadic: bool,
        func: fn(Vec<Value>) -> Result<Value, CompileError>,
    ) -> Self {
        Builtin {
            name,
            params,
            variadic,
            func,
        }
    }

    /// Bind `arguments` and run.
    ///
    /// # Errors
    /// Fails on binding errors or inside the function itself.
    pub fn call(
        &self,
        tree: &TokenTree,
        arguments: &[NodeId],
        caller_scope: &Scope,
    ) -> Result<Value, CompileError> {
        let scope = Scope::new();
        let params: Vec<Param> = self
            .params
            .iter()
            .map(|&name| Param {
                name: name.to_string(),
                default: None,
            })
            .collect();
        map_arguments(
            tree,
            arguments,
            caller_scope,
            &scope,
            &params,
            self.variadic,
            "function",
            self.name,
        )?;

        let values = if self.variadic {
            vec![scope.get("list")?]
        } else {
            self.params
                .iter()
                .map(|&name| scope.get(name))
                .collect::<Result<Vec<_>, _>>()?
        };
        (self.func)(values)
    }
}

/// Evaluate a token list to a single value (or a list), as argument
/// defaults and bound arguments require. `None` for an empty token list.
///
/// # Errors
/// Fails when evaluation fails or consumes everything.
pub fn tokens_to_value(
    tree: &TokenTree,
    nodes: &[NodeId],
    scope: &Scope,
) -> Result<Option<Value>, CompileError> {
    if nodes.is_empty() {
        return Ok(None);
    }
    let items = expr::eval_items(
        tree,
        nodes.iter().copied().map(ExprItem::Node).collect(),
        scope,
        false,
    )?;
    if items.is_empty() {
        return Err(CompileError::new("Expression evaluated to nothing"));
    }
    Ok(Some(expr::items_to_value(tree, &items, scope)?))
}

/// Parse a definition's argument tokens (`$name` optionally followed by
/// `: default`, comma separated) into parameters. Defaults evaluate in the
/// definition scope.
///
/// # Errors
/// Fails on malformed argument syntax.
pub fn parse_params(
    tree: &TokenTree,
    argument_tokens: &[NodeId],
    scope: &Scope,
) -> Result<Vec<Param>, CompileError> {
    let mut params = Vec::new();
    let mut variable: Option<String> = None;
    let mut has_colon = false;
    let mut default_tokens: Vec<NodeId> = Vec::new();

    for &token in argument_tokens {
        if tree.is_delimiter(token, ":") {
            if variable.is_some() {
                has_colon = true;
                continue;
            }
        } else if tree.is_delimiter(token, ",") {
            if let Some(name) = variable.take() {
                let default = tokens_to_value(tree, &default_tokens, scope)?;
                params.push(Param { name, default });
                has_colon = false;
                default_tokens.clear();
                continue;
            }
        } else if has_colon {
            default_tokens.push(token);
            continue;
        } else if matches!(tree.kind(token), NodeKind::ScssVariable) && variable.is_none() {
            variable = Some(tree.data(token).chars().skip(1).collect());
            continue;
        }
        return Err(CompileError::new("Invalid token in argument definition"));
    }

    if let Some(name) = variable {
        let default = tokens_to_value(tree, &default_tokens, scope)?;
        params.push(Param { name, default });
    }
    Ok(params)
}

/// Bind call arguments into `target_scope`.
///
/// Positional arguments fill parameters in order, `$name: value` binds by
/// keyword, a single list argument splats positionally, and unfilled
/// parameters fall back to their defaults.
///
/// # Errors
/// Fails on duplicate bindings, malformed argument lists, and parameters
/// left without a value.
#[allow(clippy::too_many_arguments)]
pub fn map_arguments(
    tree: &TokenTree,
    argument_tokens: &[NodeId],
    caller_scope: &Scope,
    target_scope: &Scope,
    params: &[Param],
    variadic: bool,
    kind_label: &str,
    name: &str,
) -> Result<(), CompileError> {
    if variadic {
        let items: Vec<ExprItem> = argument_tokens
            .iter()
            .copied()
            .map(ExprItem::Node)
            .collect();
        let list = expr::list_from_items(tree, &items, caller_scope)?;
        target_scope.set("list", Value::List(list));
        return Ok(());
    }

    // A single list-valued variable splats into the parameters.
    if argument_tokens.len() == 1
        && matches!(tree.kind(argument_tokens[0]), NodeKind::ScssVariable)
    {
        let value = Value::from_node(tree, argument_tokens[0], Some(caller_scope))?;
        if let Value::List(list) = value {
            for (position, item) in list.items.into_iter().enumerate() {
                let Some(param) = params.get(position) else {
                    break;
                };
                target_scope.set(param.name.clone(), item);
            }
            return set_default_arguments(target_scope, params, kind_label, name);
        }
    }

    let mut variable: Option<String> = None;
    let mut value_tokens: Vec<NodeId> = Vec::new();
    let mut position = 0usize;

    for &token in argument_tokens {
        if tree.is_delimiter(token, ":") {
            if value_tokens.len() == 1
                && matches!(tree.kind(value_tokens[0]), NodeKind::ScssVariable)
            {
                let var = value_tokens.pop().expect("checked non-empty");
                variable = Some(tree.data(var).chars().skip(1).collect());
                continue;
            }
            return Err(CompileError::new("Invalid token in argument list"));
        }

        let binds = tree.is_delimiter(token, ",")
            || (variable.is_none() && value_tokens.len() == 1);
        if binds {
            let bound_name = match variable.take() {
                Some(existing) => existing,
                None => {
                    if position >= params.len() {
                        break;
                    }
                    params[position].name.clone()
                }
            };
            if target_scope.has_local(&bound_name) {
                return Err(CompileError::new(format!(
                    "Argument ${bound_name} is set more than once"
                )));
            }
            let value = tokens_to_value(tree, &value_tokens, caller_scope)
                .map_err(|err| {
                    CompileError::new(format!("{err} in call to {kind_label} {name}"))
                })?
                .ok_or_else(|| {
                    CompileError::new(format!("Argument ${bound_name} has no value"))
                })?;
            target_scope.set(bound_name, value);
            position += 1;
            value_tokens.clear();
            if !tree.is_delimiter(token, ",") {
                value_tokens.push(token);
            }
            continue;
        }

        value_tokens.push(token);
    }

    if !value_tokens.is_empty() && position < params.len() {
        let bound_name = variable.unwrap_or_else(|| params[position].name.clone());
        if target_scope.has_local(&bound_name) {
            return Err(CompileError::new(format!(
                "Argument ${bound_name} is set more than once"
            )));
        }
        let value = tokens_to_value(tree, &value_tokens, caller_scope)?
            .ok_or_else(|| {
                CompileError::new(format!("Argument ${bound_name} has no value"))
            })?;
        target_scope.set(bound_name, value);
    }

    set_default_arguments(target_scope, params, kind_label, name)
}

fn set_default_arguments(
    target_scope: &Scope,
    params: &[Param],
    kind_label: &str,
    name: &str,
) -> Result<(), CompileError> {
    for param in params {
        if !target_scope.has_local(&param.name) {
            match &param.default {
                Some(default) => target_scope.set(param.name.clone(), default.clone()),
                None => {
                    return Err(CompileError::new(format!(
                        "Missing argument ${} in call to {kind_label} {name}",
                        param.name
                    )));
                }
            }
        }
    }
    Ok(())
}

/// Call a function visible from `scope` with raw argument tokens.
///
/// # Errors
/// Fails when the function is unknown or its evaluation fails.
pub fn call_function(
    tree: &TokenTree,
    name: &str,
    arguments: &[NodeId],
    scope: &Scope,
) -> Result<Value, CompileError> {
    let def = scope.get_function(name)?;
    match &*def {
        FunctionDef::Builtin(builtin) => builtin.call(tree, arguments, scope),
        FunctionDef::User(callable) => call_user_function(callable, tree, arguments, scope),
    }
}

/// Run a `@function` body: assignments update the bound scope until a
/// `@return` produces the result.
fn call_user_function(
    function: &Callable,
    tree: &TokenTree,
    arguments: &[NodeId],
    caller_scope: &Scope,
) -> Result<Value, CompileError> {
    run_user_function(function, tree, arguments, caller_scope).map_err(|err| {
        CompileError::new(format!("{err}\n  In call to function {}", function.name))
    })
}

fn run_user_function(
    function: &Callable,
    tree: &TokenTree,
    arguments: &[NodeId],
    caller_scope: &Scope,
) -> Result<Value, CompileError> {
    let scope = function.scope.deep_clone();
    map_arguments(
        tree,
        arguments,
        caller_scope,
        &scope,
        &function.params,
        false,
        "function",
        &function.name,
    )?;

    let body = &function.body;
    let children = body.children(body.root());
    // The first and last children are the block's braces.
    for &statement in children
        .iter()
        .skip(1)
        .take(children.len().saturating_sub(2))
    {
        if body.is_trivia(statement) {
            continue;
        }
        match body.kind(statement) {
            NodeKind::ScssAssignment { .. } => {
                expr::process_assignment(body, statement, &scope)?;
            }
            NodeKind::AtRule if tokens::at_keyword(body, statement)? == "return" => {
                let signature = tokens::at_signature(body, statement)?;
                let items = expr::eval_items(
                    body,
                    signature.into_iter().map(ExprItem::Node).collect(),
                    &scope,
                    false,
                )?;
                if items.is_empty() {
                    return Err(CompileError::new(format!(
                        "Could not evaluate return statement of function {}",
                        function.name
                    )));
                }
                return expr::items_to_value(body, &items, &scope);
            }
            _ => {
                return Err(CompileError::new(format!(
                    "Unexpected token in function {}",
                    function.name
                )));
            }
        }
    }

    Err(CompileError::new(format!(
        "Function {} does not return a value",
        function.name
    )))
}
