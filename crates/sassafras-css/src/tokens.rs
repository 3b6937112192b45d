//! Higher-level queries over token-tree nodes.
//!
//! The tree crate only knows structure; everything here interprets nodes in
//! CSS terms: at-rule keywords and signatures, rule-set selectors and
//! declarations, sub-selector splitting, function names and arguments, and
//! the trivia-stripped child views the evaluator and serializer share.

use sassafras_tree::{AnyKind, NodeId, NodeKind, TokenTree};

use crate::error::CompileError;

/// The keyword of an at-rule, without its `@`.
///
/// # Errors
/// Fails when the rule has no keyword child yet.
pub fn at_keyword(tree: &TokenTree, at_rule: NodeId) -> Result<String, CompileError> {
    let first = tree
        .children(at_rule)
        .first()
        .ok_or_else(|| CompileError::new("At rule does not have a keyword"))?;
    Ok(tree.data(*first).chars().skip(1).collect())
}

/// The signature of an at-rule: the non-trivia tokens between the keyword
/// and the terminating `;` or block.
///
/// # Errors
/// Fails when the rule has neither terminator.
pub fn at_signature(tree: &TokenTree, at_rule: NodeId) -> Result<Vec<NodeId>, CompileError> {
    let children = tree.children(at_rule);
    let mut signature = Vec::new();
    for &child in children.iter().skip(1) {
        if tree.is_delimiter(child, ";") || matches!(tree.kind(child), NodeKind::Block) {
            return Ok(signature);
        }
        if tree.is_trivia(child) {
            continue;
        }
        signature.push(child);
    }
    Err(CompileError::new("Malformed at-rule token"))
}

/// The block child of an at-rule or value, if any.
#[must_use]
pub fn block_of(tree: &TokenTree, node: NodeId) -> Option<NodeId> {
    tree.children(node)
        .iter()
        .copied()
        .find(|&c| matches!(tree.kind(c), NodeKind::Block))
}

/// The selector of a rule set.
///
/// # Errors
/// Fails when the rule set has none (it was built by hand, not parsed).
pub fn selector_of(tree: &TokenTree, rule_set: NodeId) -> Result<NodeId, CompileError> {
    tree.children(rule_set)
        .iter()
        .copied()
        .find(|&c| matches!(tree.kind(c), NodeKind::Selector))
        .ok_or_else(|| CompileError::new("Rule set does not have selector"))
}

/// Direct declaration children of a rule set.
#[must_use]
pub fn declarations_of(tree: &TokenTree, rule_set: NodeId) -> Vec<NodeId> {
    tree.children(rule_set)
        .iter()
        .copied()
        .filter(|&c| matches!(tree.kind(c), NodeKind::Declaration { .. }))
        .collect()
}

/// The property token of a declaration, if present.
#[must_use]
pub fn property_of(tree: &TokenTree, declaration: NodeId) -> Option<NodeId> {
    tree.children(declaration)
        .iter()
        .copied()
        .find(|&c| matches!(tree.kind(c), NodeKind::Property))
}

/// The value token of a declaration or assignment, if present.
#[must_use]
pub fn value_of(tree: &TokenTree, node: NodeId) -> Option<NodeId> {
    tree.children(node)
        .iter()
        .copied()
        .find(|&c| matches!(tree.kind(c), NodeKind::Value))
}

/// The variable token of an SCSS assignment, if present.
#[must_use]
pub fn variable_of(tree: &TokenTree, assignment: NodeId) -> Option<NodeId> {
    tree.children(assignment)
        .iter()
        .copied()
        .find(|&c| matches!(tree.kind(c), NodeKind::ScssVariable))
}

/// The first `&` delimiter in a selector, if any.
#[must_use]
pub fn ampersand_of(tree: &TokenTree, selector: NodeId) -> Option<NodeId> {
    tree.children(selector)
        .iter()
        .copied()
        .find(|&c| tree.is_delimiter(c, "&"))
}

/// Comma-separated sub-selectors of a selector, each stripped of leading
/// and trailing whitespace.
#[must_use]
pub fn sub_selectors(tree: &TokenTree, selector: NodeId) -> Vec<Vec<NodeId>> {
    let mut subs = Vec::new();
    let mut current: Vec<NodeId> = Vec::new();
    for &child in tree.children(selector) {
        if current.is_empty() && matches!(tree.kind(child), NodeKind::WhiteSpace) {
            continue;
        }
        if tree.is_delimiter(child, ",") {
            if !current.is_empty() {
                while current
                    .last()
                    .is_some_and(|&c| matches!(tree.kind(c), NodeKind::WhiteSpace))
                {
                    let _ = current.pop();
                }
                subs.push(std::mem::take(&mut current));
            }
        } else {
            current.push(child);
        }
    }
    if !current.is_empty() {
        while current
            .last()
            .is_some_and(|&c| matches!(tree.kind(c), NodeKind::WhiteSpace))
        {
            let _ = current.pop();
        }
        subs.push(current);
    }
    subs
}

/// Name of an identifier or function token.
///
/// # Errors
/// Fails for any other token shape.
pub fn function_name(tree: &TokenTree, node: NodeId) -> Result<String, CompileError> {
    match tree.kind(node) {
        NodeKind::Any(AnyKind::Ident) | NodeKind::Property => Ok(tree.data(node).to_string()),
        NodeKind::Any(AnyKind::Function) => {
            for &child in tree.children(node) {
                if tree.is_identifier(child) {
                    return Ok(tree.data(child).to_string());
                }
                if tree.is_delimiter(child, "(") {
                    break;
                }
            }
            Err(CompileError::new(
                "Could not find an identifier for the function",
            ))
        }
        _ => Err(CompileError::new("Cannot get the name for this token type")),
    }
}

/// Argument tokens of a function token: everything after its `(`, minus
/// trivia and the closing paren. With `include_commas` the `,` separators
/// are kept (argument binding needs them).
#[must_use]
pub fn function_arguments(tree: &TokenTree, node: NodeId, include_commas: bool) -> Vec<NodeId> {
    let skip = if include_commas { ")" } else { ",)" };
    let mut arguments = Vec::new();
    let mut is_opened = false;
    for &child in tree.children(node) {
        if is_opened {
            if tree.is_trivia(child) || tree.is_delimiter(child, skip) {
                continue;
            }
            arguments.push(child);
        } else if tree.is_delimiter(child, "(") {
            is_opened = true;
        }
    }
    arguments
}

/// Children of a value token minus trivia at the edges or adjacent to a
/// boundary; what the expression evaluator and the stripped serializer see.
#[must_use]
pub fn stripped_value_children(tree: &TokenTree, value: NodeId) -> Vec<NodeId> {
    let mut children = Vec::new();
    for &child in tree.children(value) {
        if tree.is_trivia(child) {
            let next_boundary = tree
                .next_sibling(child, false)
                .is_some_and(|s| tree.is_boundary(s));
            let prev_boundary = tree
                .prev_sibling(child, false)
                .is_some_and(|s| tree.is_boundary(s));
            if tree.is_first_child(child, true)
                || tree.is_last_child(child, true)
                || next_boundary
                || prev_boundary
            {
                continue;
            }
        }
        children.push(child);
    }
    children
}

/// Children of a set or list token minus the surrounding parens/brackets
/// and all trivia.
#[must_use]
pub fn stripped_group_children(tree: &TokenTree, group: NodeId) -> Vec<NodeId> {
    let children = tree.children(group);
    let mut stripped = Vec::new();
    for (i, &child) in children.iter().enumerate() {
        if i == 0 || i == children.len() - 1 || tree.is_trivia(child) {
            continue;
        }
        stripped.push(child);
    }
    stripped
}
