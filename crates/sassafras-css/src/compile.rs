//! The tree-rewriting compiler.
//!
//! Compilation walks the parsed tree and rewrites SCSS constructs in place:
//! at-rules are handled before their children (several of them remove or
//! replace their node), children compile recursively with a mutation-safe
//! index walk, and the kind-specific rewrites run last: interpolation,
//! expression evaluation, nested-property and nested-rule flattening,
//! assignments, and `@extend`. Scopes are lexical: a new one is pushed for
//! every rule-set body and popped on the way out.

use std::path::PathBuf;
use std::rc::Rc;

use sassafras_tree::{AnyKind, NodeId, NodeKind, TokenTree};

use crate::builtins;
use crate::error::{CompileError, Error};
use crate::expr::{self, ExprItem};
use crate::function::{self, Callable, FunctionDef};
use crate::importer::{ImportEntry, Importer};
use crate::options::CssOptions;
use crate::parser;
use crate::scope::Scope;
use crate::serialize;
use crate::tokens;

/// The SCSS compiler: a scope stack plus an importer.
#[derive(Debug)]
pub struct Compiler {
    scopes: Vec<Scope>,
    importer: Importer,
}

impl Compiler {
    /// A compiler with the built-in functions registered in a fresh global
    /// scope.
    #[must_use]
    pub fn new() -> Self {
        let scope = Scope::new();
        builtins::register_builtins(&scope);
        Compiler {
            scopes: vec![scope],
            importer: Importer::new(),
        }
    }

    /// The global scope (the REPL evaluates against this).
    #[must_use]
    pub fn global_scope(&self) -> &Scope {
        &self.scopes[0]
    }

    /// Replace the global scope (imports compile into their caller's
    /// scope this way).
    pub fn set_global_scope(&mut self, scope: Scope) {
        self.scopes = vec![scope];
    }

    /// The importer, for configuring search paths.
    pub fn importer_mut(&mut self) -> &mut Importer {
        &mut self.importer
    }

    fn current_scope(&self) -> &Scope {
        self.scopes.last().expect("the global scope is never popped")
    }

    fn push_scope(&mut self) {
        let child = Scope::child_of(self.current_scope());
        self.scopes.push(child);
    }

    fn pop_scope(&mut self) -> Result<(), CompileError> {
        if self.scopes.len() == 1 {
            return Err(CompileError::new("Cannot pop the global scope"));
        }
        let _ = self.scopes.pop();
        Ok(())
    }

    /// Compile the whole tree in place.
    ///
    /// # Errors
    /// Any parse, compile, or import failure aborts the compilation.
    pub fn compile(&mut self, tree: &mut TokenTree, options: CssOptions) -> Result<(), Error> {
        self.compile_node(tree, tree.root(), options)
    }

    fn compile_node(
        &mut self,
        tree: &mut TokenTree,
        node: NodeId,
        options: CssOptions,
    ) -> Result<(), Error> {
        let kind = tree.kind(node);

        if matches!(kind, NodeKind::RuleSet { .. }) {
            self.push_scope();
        }

        if matches!(kind, NodeKind::AtRule) {
            self.compile_at_rule(tree, node, options)?;
            if tree.parent(node).is_none() && node != tree.root() {
                // The rule removed itself; there is nothing left to do.
                return Ok(());
            }
        }

        // Children may splice siblings in and out while we walk; re-check
        // the parent link each round and only advance past survivors.
        let mut i = 0;
        while i < tree.children(node).len() {
            let child = tree.children(node)[i];
            if tree.parent(child).is_none() {
                return Err(CompileError::new("Child token lost its parent during compilation").into());
            }
            self.compile_node(tree, child, options)?;
            if tree.parent(child).is_some() {
                i += 1;
            }
        }

        let rewritten = if tree.is_any(node) {
            self.compile_any(tree, node)
        } else if matches!(kind, NodeKind::Value) {
            self.compile_value(tree, node)
        } else if matches!(kind, NodeKind::Declaration { .. }) {
            self.flatten_nested_properties(tree, node)
        } else if matches!(kind, NodeKind::ScssAssignment { .. }) {
            expr::process_assignment(tree, node, self.current_scope()).map_err(Error::from)
        } else if matches!(kind, NodeKind::RuleSet { .. }) {
            let flattened = self.flatten_nested_rules(tree, node);
            self.pop_scope()?;
            flattened
        } else if matches!(kind, NodeKind::AtRule)
            && tokens::at_keyword(tree, node)? == "extend"
        {
            self.process_extend(tree, node)
        } else {
            Ok(())
        };
        rewritten.map_err(|err| token_context(tree, node, err))
    }

    fn compile_at_rule(
        &mut self,
        tree: &mut TokenTree,
        at_rule: NodeId,
        options: CssOptions,
    ) -> Result<(), Error> {
        match tokens::at_keyword(tree, at_rule)?.as_str() {
            "include" => self.process_include(tree, at_rule),
            "mixin" => self.define_callable(tree, at_rule, true),
            "function" => self.define_callable(tree, at_rule, false),
            "import" => self.process_import(tree, at_rule, options),
            "warn" => self.process_warn(tree, at_rule, options),
            "if" => self.process_if(tree, at_rule, false, false),
            _ => Ok(()),
        }
    }

    /// The name and (optionally) argument tokens after an at-rule keyword:
    /// either a bare identifier or a function-shaped token.
    fn name_after_keyword(
        tree: &TokenTree,
        at_rule: NodeId,
    ) -> Result<(String, Vec<NodeId>), Error> {
        let keyword = tree
            .first_child(at_rule, true)
            .ok_or_else(|| CompileError::new("Mixin is missing a name"))?;
        let name_token = tree
            .next_sibling(keyword, true)
            .ok_or_else(|| CompileError::new("Mixin is missing a name"))?;

        if tree.is_identifier(name_token) {
            Ok((tree.data(name_token).to_string(), Vec::new()))
        } else if matches!(tree.kind(name_token), NodeKind::Any(AnyKind::Function)) {
            Ok((
                tokens::function_name(tree, name_token)?,
                tokens::function_arguments(tree, name_token, true),
            ))
        } else {
            Err(CompileError::new("Unexpected token in mixin definition").into())
        }
    }

    /// `@include name(args…)`: expand the mixin body at the call site.
    fn process_include(&mut self, tree: &mut TokenTree, at_rule: NodeId) -> Result<(), Error> {
        let (name, arguments) = Self::name_after_keyword(tree, at_rule)?;

        let scope = self.current_scope().clone();
        if !scope.has_mixin(&name) {
            return Err(
                CompileError::new(format!("No mixin defined with the name {name}")).into(),
            );
        }
        let mixin = scope.get_mixin(&name)?;
        let body = self.evaluate_mixin(&mixin, tree, &arguments, &scope)?;

        let parent = tree
            .parent(at_rule)
            .ok_or_else(|| CompileError::new("@include outside of any parent"))?;
        let mut index = tree.own_index(at_rule)? + 1;
        let body_children = body.children(body.root()).to_vec();
        // The body's first and last children are its braces.
        for &child in body_children
            .iter()
            .skip(1)
            .take(body_children.len().saturating_sub(2))
        {
            let copy = tree.graft_from(&body, child);
            tree.insert_child_at(parent, index, copy)?;
            index += 1;
        }
        tree.remove(at_rule)?;
        Ok(())
    }

    /// Clone a mixin's body, bind its arguments, and compile the clone with
    /// the bound scope as global scope.
    fn evaluate_mixin(
        &mut self,
        mixin: &Callable,
        tree: &TokenTree,
        arguments: &[NodeId],
        caller_scope: &Scope,
    ) -> Result<TokenTree, Error> {
        let result = (|| -> Result<TokenTree, Error> {
            let scope = mixin.scope.deep_clone();
            function::map_arguments(
                tree,
                arguments,
                caller_scope,
                &scope,
                &mixin.params,
                false,
                "mixin",
                &mixin.name,
            )?;

            let mut body = mixin.body.clone();
            let saved = std::mem::replace(&mut self.scopes, vec![scope]);
            let root = body.root();
            let compiled = self.compile_node(&mut body, root, CssOptions::default());
            self.scopes = saved;
            compiled?;
            Ok(body)
        })();
        result.map_err(|err| {
            CompileError::new(format!("{err}\n  In call to mixin {}", mixin.name)).into()
        })
    }

    /// `@mixin` / `@function` definition: capture scope, parameters, and
    /// body, then drop the rule from the tree.
    fn define_callable(
        &mut self,
        tree: &mut TokenTree,
        at_rule: NodeId,
        is_mixin: bool,
    ) -> Result<(), Error> {
        let label = if is_mixin { "Mixin" } else { "Function" };
        let (name, argument_tokens) = Self::name_after_keyword(tree, at_rule)?;

        let keyword = tree
            .first_child(at_rule, true)
            .ok_or_else(|| CompileError::new(format!("{label} is missing a name")))?;
        let name_token = tree
            .next_sibling(keyword, true)
            .ok_or_else(|| CompileError::new(format!("{label} is missing a name")))?;
        let block_token = tree
            .next_sibling(name_token, true)
            .filter(|&b| matches!(tree.kind(b), NodeKind::Block))
            .ok_or_else(|| CompileError::new(format!("{label} is missing a body")))?;

        let scope = self.current_scope().clone();
        let params = function::parse_params(tree, &argument_tokens, &scope)?;
        let body = if is_mixin {
            // Mixin bodies clone at definition time: comments drop and
            // whitespace collapses, like any compiled splice.
            let cleaned = tree.clone_subtree(block_token);
            tree.extract_subtree(cleaned)
        } else {
            tree.extract_subtree(block_token)
        };

        let callable = Callable {
            name: name.clone(),
            scope: Scope::child_of(&scope),
            params,
            body,
        };
        if is_mixin {
            scope.set_mixin(name, Rc::new(callable));
        } else {
            scope.set_function(name, Rc::new(FunctionDef::User(callable)));
        }
        tree.remove(at_rule)?;
        Ok(())
    }

    /// `@import "name", "other";`: resolve and splice each resource.
    ///
    /// Plain-CSS imports (`http://…` or `*.css`) stay untouched in the
    /// output.
    fn process_import(
        &mut self,
        tree: &mut TokenTree,
        at_rule: NodeId,
        options: CssOptions,
    ) -> Result<(), Error> {
        let keyword = tree
            .first_child(at_rule, true)
            .ok_or_else(|| CompileError::new("Malformed at-rule token"))?;
        let mut name_token = tree.next_sibling(keyword, true);
        let mut next_token = name_token.and_then(|n| tree.next_sibling(n, true));
        let mut found_import = false;

        loop {
            let Some(name) = name_token else { break };
            if !matches!(tree.kind(name), NodeKind::Any(AnyKind::Str)) {
                break;
            }
            let data = tree.data(name).to_string();
            let resource: String = {
                let count = data.chars().count();
                data.chars().skip(1).take(count.saturating_sub(2)).collect()
            };
            if resource.starts_with("http://") || resource.ends_with(".css") {
                break;
            }
            if let Some(next) = next_token {
                if !tree.is_delimiter(next, ",;") {
                    break;
                }
            }

            found_import = true;
            self.import_resource(tree, at_rule, &resource, options)
                .map_err(|err| {
                    CompileError::new(format!(
                        "{err} while importing resource {resource}"
                    ))
                })?;

            match next_token {
                Some(next) => {
                    name_token = tree.next_sibling(next, true);
                    next_token = name_token.and_then(|n| tree.next_sibling(n, true));
                }
                None => break,
            }
        }

        if found_import {
            tree.remove(at_rule)?;
        }
        Ok(())
    }

    /// Import one resource: resolve, detect recursion, parse + compile on a
    /// cache miss, splice rules (unless partial), and publish variables.
    fn import_resource(
        &mut self,
        tree: &mut TokenTree,
        at_rule: NodeId,
        resource: &str,
        options: CssOptions,
    ) -> Result<(), Error> {
        let (path, partial) = self.importer.resolve(resource, tree.path())?;

        match self.importer.cached(&path) {
            Some(ImportEntry::Pending) => return Ok(()), // recursive inclusion
            Some(ImportEntry::Cached { scope, style_sheet }) => {
                if let Some(cached) = style_sheet {
                    let cached = cached.clone();
                    Self::splice_style_sheet(tree, at_rule, &cached)?;
                }
                self.current_scope().merge(scope);
                return Ok(());
            }
            None => {}
        }

        self.importer.mark_pending(path.clone());

        let mut import_options = options;
        if partial {
            // Partials contribute variables only.
            import_options.import_css = false;
        }

        let css = std::fs::read_to_string(&path)?;
        let mut imported = parser::parse(&css, import_options)?;
        if let Some(directory) = path.parent() {
            imported.set_path(PathBuf::from(directory));
        }

        // Compile with the caller's scope as global scope, so the import's
        // definitions land where the `@import` appeared.
        let scope = self.current_scope().clone();
        let saved = std::mem::replace(&mut self.scopes, vec![scope.clone()]);
        let root = imported.root();
        let compiled = self.compile_node(&mut imported, root, import_options);
        self.scopes = saved;
        compiled?;

        if import_options.import_css {
            Self::splice_style_sheet(tree, at_rule, &imported)?;
            self.importer
                .store(path, scope.deep_clone(), Some(imported));
        } else {
            self.importer.store(path, scope.deep_clone(), None);
        }
        Ok(())
    }

    /// Copy a compiled stylesheet's children in right after the `@import`
    /// rule.
    fn splice_style_sheet(
        tree: &mut TokenTree,
        at_rule: NodeId,
        style_sheet: &TokenTree,
    ) -> Result<(), Error> {
        let parent = tree
            .parent(at_rule)
            .ok_or_else(|| CompileError::new("@import outside of any parent"))?;
        let mut index = tree.own_index(at_rule)? + 1;
        for &child in style_sheet.children(style_sheet.root()) {
            let copy = tree.graft_from(style_sheet, child);
            tree.insert_child_at(parent, index, copy)?;
            index += 1;
        }
        Ok(())
    }

    /// `@warn …`: compile the message, print it to stderr, drop the rule.
    fn process_warn(
        &mut self,
        tree: &mut TokenTree,
        at_rule: NodeId,
        _options: CssOptions,
    ) -> Result<(), Error> {
        let children = tree.children(at_rule).to_vec();
        for child in children {
            self.compile_node(tree, child, CssOptions::default())?;
        }
        eprintln!("{}", serialize::node_to_css(tree, at_rule, CssOptions::default()));
        tree.remove(at_rule)?;
        Ok(())
    }

    /// `@if` / `@else if` / `@else`: evaluate the condition, splice the
    /// winning branch's block contents, drop the rules.
    fn process_if(
        &mut self,
        tree: &mut TokenTree,
        at_rule: NodeId,
        else_if: bool,
        already_true: bool,
    ) -> Result<(), Error> {
        let value = if already_true {
            false
        } else {
            let mut signature = tokens::at_signature(tree, at_rule)?;
            if else_if && !signature.is_empty() && tree.is_keyword(signature[0], "if") {
                signature.remove(0);
            }
            if signature.is_empty() {
                // A plain @else.
                !already_true
            } else {
                let items = expr::eval_items(
                    tree,
                    signature.into_iter().map(ExprItem::Node).collect(),
                    self.current_scope(),
                    false,
                )?;
                match items.len() {
                    0 => false,
                    1 => expr::items_to_value(tree, &items, self.current_scope())?
                        .is_truthy(),
                    _ => true,
                }
            }
        };

        let next_token = if value {
            let block = tokens::block_of(tree, at_rule)
                .ok_or_else(|| CompileError::new("Malformed at-rule token"))?;
            let parent = tree
                .parent(at_rule)
                .ok_or_else(|| CompileError::new("@if outside of any parent"))?;
            let mut index = tree.own_index(at_rule)? + 1;

            let block_children = tree.children(block).to_vec();
            let mut last_inserted = at_rule;
            for &child in block_children
                .iter()
                .skip(1)
                .take(block_children.len().saturating_sub(2))
            {
                tree.remove_child(block, child);
                tree.insert_child_at(parent, index, child)?;
                index += 1;
                last_inserted = child;
            }
            tree.next_sibling(last_inserted, true)
        } else {
            tree.next_sibling(at_rule, true)
        };

        if let Some(next) = next_token {
            if matches!(tree.kind(next), NodeKind::AtRule)
                && tokens::at_keyword(tree, next)? == "else"
            {
                self.process_if(tree, next, true, value || already_true)?;
            }
        }
        tree.remove(at_rule)?;
        Ok(())
    }

    /// `#{…}` interpolation inside identifier and string tokens.
    fn compile_any(&mut self, tree: &mut TokenTree, node: NodeId) -> Result<(), Error> {
        let kind = tree.kind(node);
        let is_string = matches!(kind, NodeKind::Any(AnyKind::Str));
        if !(is_string || tree.is_identifier(node)) || !tree.data(node).contains("#{") {
            return Ok(());
        }

        let result = expr::interpolate(tree.data(node), is_string, self.current_scope())?;
        let replacement = if is_string {
            tree.alloc_with_data(NodeKind::Any(AnyKind::Str), format!("\"{result}\""))
        } else if matches!(kind, NodeKind::Property) {
            tree.alloc_with_data(NodeKind::Property, result)
        } else {
            tree.alloc_with_data(NodeKind::Any(AnyKind::Ident), result)
        };
        tree.replace_with(node, replacement)?;
        Ok(())
    }

    /// Evaluate a value's expression and splice the result back in one
    /// step.
    fn compile_value(&mut self, tree: &mut TokenTree, value: NodeId) -> Result<(), Error> {
        let children = tokens::stripped_value_children(tree, value);
        let items = expr::eval_items(
            tree,
            children.into_iter().map(ExprItem::Node).collect(),
            self.current_scope(),
            false,
        )?;
        if items.is_empty() {
            return Ok(());
        }

        let mut new_children = Vec::new();
        for item in items {
            match item {
                ExprItem::Node(id) => new_children.push(id),
                ExprItem::Value(value) => {
                    let data = value.to_css(CssOptions::default());
                    new_children.push(tree.alloc_with_data(NodeKind::Any(AnyKind::Unknown), data));
                }
            }
        }
        tree.set_children(value, new_children);
        Ok(())
    }

    /// Nested-property flattening: `font: { family: serif; }` expands its
    /// inner declarations as `font-family: serif;` siblings.
    fn flatten_nested_properties(
        &mut self,
        tree: &mut TokenTree,
        declaration: NodeId,
    ) -> Result<(), Error> {
        let Some(value) = tokens::value_of(tree, declaration) else {
            return Ok(());
        };
        let Some(block) = tokens::block_of(tree, value) else {
            return Ok(());
        };
        let Some(property) = tokens::property_of(tree, declaration) else {
            return Ok(());
        };

        let prefix = format!("{}-", tree.data(property));
        let parent = tree
            .parent(declaration)
            .ok_or_else(|| CompileError::new("Declaration outside of any parent"))?;
        let mut insert_index =
            tree.own_index(declaration)? + 1;

        for child in tree.children(block).to_vec() {
            if !matches!(tree.kind(child), NodeKind::Declaration { .. }) {
                continue;
            }
            if let Some(inner_property) = tokens::property_of(tree, child) {
                let prefixed = tree.alloc_with_data(
                    NodeKind::Property,
                    format!("{prefix}{}", tree.data(inner_property)),
                );
                let position = tree
                    .children(child)
                    .iter()
                    .position(|&c| c == inner_property)
                    .unwrap_or(0);
                tree.replace_child_at(child, position, prefixed)?;
            }
            tree.remove_child(block, child);
            tree.insert_child_at(parent, insert_index, child)?;
            let semicolon = tree.alloc_with_data(NodeKind::delim(), ";");
            tree.insert_child_at(parent, insert_index + 1, semicolon)?;
            insert_index += 2;
        }

        if tree.prev_sibling(block, true).is_some() {
            // The value kept other tokens; retain the declaration and
            // terminate it.
            let semicolon = tree.alloc_with_data(NodeKind::delim(), ";");
            tree.insert_after(declaration, semicolon)?;
            tree.remove_child(value, block);
        } else {
            tree.remove(declaration)?;
        }
        Ok(())
    }

    /// Nested-rule flattening against the parent selector.
    fn flatten_nested_rules(
        &mut self,
        tree: &mut TokenTree,
        rule_set: NodeId,
    ) -> Result<(), Error> {
        let nested: Vec<NodeId> = tree
            .children(rule_set)
            .iter()
            .copied()
            .filter(|&c| matches!(tree.kind(c), NodeKind::RuleSet { .. }))
            .collect();
        if nested.is_empty() {
            return Ok(());
        }

        let parent_selector = tokens::selector_of(tree, rule_set)?;
        let parent_subs = tokens::sub_selectors(tree, parent_selector);

        // Insert right after the parent in reverse, so the nested rules
        // keep their original relative order.
        for &nested_rule in nested.iter().rev() {
            let selector = tokens::selector_of(tree, nested_rule)?;

            let mut ampersand = tokens::ampersand_of(tree, selector);
            if ampersand.is_some() {
                // Each & substitutes the full parent selector in place,
                // re-binding any later & in the rebuilt children.
                while let Some(amp) = ampersand {
                    let children = tree.children(selector).to_vec();
                    let amp_index = children
                        .iter()
                        .position(|&c| c == amp)
                        .unwrap_or(children.len());
                    let elderly: Vec<NodeId> = children[..amp_index].to_vec();
                    let youngsters: Vec<NodeId> =
                        children[amp_index + 1..].to_vec();

                    ampersand = None;
                    let mut rebuilt = Vec::new();
                    for sub in &parent_subs {
                        for &child in &elderly {
                            rebuilt.push(tree.clone_subtree(child));
                        }
                        for &child in sub {
                            rebuilt.push(tree.clone_subtree(child));
                        }
                        for &child in &youngsters {
                            let clone = tree.clone_subtree(child);
                            rebuilt.push(clone);
                            if ampersand.is_none() && tree.is_delimiter(child, "&") {
                                ampersand = Some(clone);
                            }
                        }
                        rebuilt.push(tree.alloc_with_data(NodeKind::delim(), ","));
                    }
                    let _ = rebuilt.pop(); // drop the trailing comma
                    tree.set_children(selector, rebuilt);
                }
            } else {
                let subs = tokens::sub_selectors(tree, selector);
                let mut rebuilt = Vec::new();
                for parent_sub in &parent_subs {
                    for sub in &subs {
                        for &child in parent_sub {
                            rebuilt.push(tree.clone_subtree(child));
                        }
                        rebuilt.push(tree.alloc_with_data(NodeKind::WhiteSpace, " "));
                        for &child in sub {
                            rebuilt.push(tree.clone_subtree(child));
                        }
                        rebuilt.push(tree.alloc_with_data(NodeKind::delim(), ","));
                    }
                }
                let _ = rebuilt.pop(); // drop the trailing comma
                tree.set_children(selector, rebuilt);
            }

            tree.remove_child(rule_set, nested_rule);
            let parent = tree
                .parent(rule_set)
                .ok_or_else(|| CompileError::new("Rule set outside of any parent"))?;
            let index = tree.own_index(rule_set)?;
            tree.insert_child_at(parent, index + 1, nested_rule)?;
        }
        Ok(())
    }

    /// `@extend sel`: append this rule's sub-selectors to every selector
    /// with a sub-selector lexically equal to `sel`.
    fn process_extend(&mut self, tree: &mut TokenTree, at_rule: NodeId) -> Result<(), Error> {
        let my_rule_set = tree
            .containing_rule_set(at_rule)
            .ok_or_else(|| CompileError::new("@extend outside of any rule set"))?;
        let my_selector = tokens::selector_of(tree, my_rule_set)?;

        let strip = CssOptions {
            strip_white_space: true,
            ..CssOptions::default()
        };
        let signature = tokens::at_signature(tree, at_rule)?;
        let signature_string = serialize::node_list_to_css(tree, &signature, strip);

        let rule_sets: Vec<NodeId> = tree.rule_sets().collect();
        for rule_set in rule_sets {
            let Ok(selector) = tokens::selector_of(tree, rule_set) else {
                continue;
            };
            for sub in tokens::sub_selectors(tree, selector) {
                if serialize::node_list_to_css(tree, &sub, strip) != signature_string {
                    continue;
                }
                for my_sub in tokens::sub_selectors(tree, my_selector) {
                    if let Some(last) = tree.last_child(selector, false) {
                        if matches!(tree.kind(last), NodeKind::WhiteSpace) {
                            tree.remove_child(selector, last);
                        }
                    }
                    let comma = tree.alloc_with_data(NodeKind::delim(), ",");
                    tree.append_child(selector, comma)?;
                    for &child in &my_sub {
                        let clone = tree.clone_subtree(child);
                        tree.append_child(selector, clone)?;
                    }
                }
                break;
            }
        }

        tree.remove(at_rule)?;
        Ok(())
    }
}

impl Default for Compiler {
    fn default() -> Self {
        Self::new()
    }
}

/// Attach `while processing <kind> in "<parent print>"` to a bare compile
/// error, so failures point at the token that produced them.
fn token_context(tree: &TokenTree, node: NodeId, err: Error) -> Error {
    match err {
        Error::Compile(inner) if inner.context.is_none() => {
            let anchor = tree.parent(node).unwrap_or(node);
            let print = serialize::node_to_css(tree, anchor, CssOptions::default());
            Error::Compile(inner.with_context(format!(
                "while processing {} in \"{print}\"",
                tree.kind(node).name()
            )))
        }
        other => other,
    }
}
