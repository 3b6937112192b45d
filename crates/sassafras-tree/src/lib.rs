//! Token tree for the sassafras CSS/SCSS compiler.
//!
//! The tree is the universal intermediate representation: the parser builds
//! it, the compiler rewrites it in place, and the serializer walks it to
//! produce output. Its shape mirrors the CSS grammar
//! ([CSS Syntax Level 3 § 5](https://www.w3.org/TR/css-syntax-3/#parsing)):
//! stylesheet → at-rules / rule sets → selectors / declarations →
//! properties / values → component tokens.
//!
//! # Design
//!
//! Nodes live in an arena owned by [`TokenTree`] and are addressed by
//! [`NodeId`] indices, so the compiler can freely splice, clone, and remove
//! subtrees without fighting ownership. A node either carries raw source
//! `data` or an ordered list of children, never both, and every insertion is
//! checked against the parent kind's allowed-children set.

use std::path::PathBuf;

use strum_macros::Display;
use thiserror::Error;

/// Errors raised by tree mutation.
///
/// The parser and compiler wrap these with source-location or token context;
/// the tree itself only knows about structure.
#[derive(Debug, Error)]
pub enum TreeError {
    /// The allowed-children set of the parent kind rejects the child kind.
    #[error("cannot add {child} to {parent}")]
    DisallowedChild {
        /// Kind name of the parent node.
        parent: &'static str,
        /// Kind name of the rejected child.
        child: &'static str,
    },

    /// A node may hold raw data or children, never both.
    #[error("cannot consume data and add children to the same token")]
    DataWithChildren,

    /// The operation requires a parent, but the node is detached.
    #[error("token has no parent")]
    Orphan,
}

/// A type-safe index into the token tree arena.
///
/// Provides O(1) access to any node without borrowing issues; all
/// parent/child relationships are stored as `NodeId`s.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(pub usize);

impl NodeId {
    /// The root node is always at index 0.
    pub const ROOT: Self = Self(0);
}

/// Subtype of an [`NodeKind::Any`] token, assigned while tokenizing.
///
/// `Any` is the polymorphic value-position token
/// ([CSS Syntax Level 3 § 4](https://www.w3.org/TR/css-syntax-3/#tokenization)
/// calls these component values); compound subtypes (`Function`, `Set`,
/// `List`) have children, the others are leaves.
#[derive(Debug, Display, Clone, Copy, PartialEq, Eq)]
pub enum AnyKind {
    /// Not yet classified; the first processed character decides.
    Unknown,
    /// `<ident-token>`, e.g. `solid` (also `!important` and friends).
    Ident,
    /// `<number-token>`, e.g. `1.5`.
    Number,
    /// `<percentage-token>`, e.g. `50%`.
    Percentage,
    /// `<dimension-token>`, e.g. `12px`.
    Dimension,
    /// `<string-token>` including its quotes, e.g. `"Arial"`.
    Str,
    /// `url(…)` kept as one flat token, quotes and all.
    Uri,
    /// `<hash-token>`, e.g. `#fff`.
    Hash,
    /// A function call; children are the name identifier, `(`, the
    /// arguments, and `)`.
    Function,
    /// A parenthesized group `(…)`; children include both parens.
    Set,
    /// A bracketed group `[…]`; children include both brackets.
    List,
    /// A one-character delimiter, or one of `==` `!=` `<=` `>=`.
    Delim,
}

/// The closed set of node kinds making up the token tree.
///
/// Parse-state flags (`is_opened`, `has_colon`, `single_line`) ride along in
/// the variants that need them so the parser's per-kind transitions stay
/// self-contained.
#[derive(Debug, Display, Clone, Copy, PartialEq, Eq)]
pub enum NodeKind {
    /// Root of a parsed source; children are at-rules, rule sets, trivia,
    /// and SCSS assignments.
    StyleSheet,
    /// `@keyword <signature> ;` or `@keyword <signature> { block }`.
    AtRule,
    /// Leaf holding `@` plus the keyword identifier.
    AtKeyword,
    /// `{ … }`; first child is the `{` delimiter, last is `}`.
    Block,
    /// Selector followed by a block of declarations and nested content.
    RuleSet {
        /// Set once the opening `{` has been consumed.
        is_opened: bool,
    },
    /// Everything between a rule set's start and its `{`.
    Selector,
    /// `property : value`.
    Declaration {
        /// Set once the `:` separator has been consumed.
        has_colon: bool,
    },
    /// The property identifier of a declaration (an identifier token in its
    /// own right, so it can stand in value positions too).
    Property,
    /// Right-hand side of a declaration; also used standalone by the
    /// expression evaluator.
    Value,
    /// Polymorphic value token, see [`AnyKind`].
    Any(AnyKind),
    /// `/* … */`, or `// …` in SCSS mode.
    Comment {
        /// True for `// …` comments, which never reach CSS output as-is.
        single_line: bool,
    },
    /// Contiguous run of whitespace.
    WhiteSpace,
    /// `$name`; resolved against the scope chain during compilation.
    ScssVariable,
    /// `$name : value ;` at stylesheet or block scope.
    ScssAssignment {
        /// Set once the `:` separator has been consumed.
        has_colon: bool,
    },
}

impl NodeKind {
    /// A plain delimiter token carrying `data`.
    #[must_use]
    pub const fn delim() -> Self {
        NodeKind::Any(AnyKind::Delim)
    }

    /// True for whitespace and comments, which most structural walks skip.
    #[must_use]
    pub const fn is_trivia(self) -> bool {
        matches!(self, NodeKind::WhiteSpace | NodeKind::Comment { .. })
    }

    /// Whether this kind's children set lists comments.
    ///
    /// The parser's shared dispatch uses the exact listing here (a kind that
    /// merely accepts `Any` tokens does not invite comments).
    #[must_use]
    pub fn allows_comments(self) -> bool {
        allowed_children(self).contains(&ChildClass::Comment)
    }

    /// Whether this kind's children set lists whitespace.
    #[must_use]
    pub fn allows_whitespace(self) -> bool {
        allowed_children(self).contains(&ChildClass::WhiteSpace)
    }

    /// Whether this kind's children set lists SCSS assignments.
    #[must_use]
    pub fn allows_assignments(self) -> bool {
        allowed_children(self).contains(&ChildClass::ScssAssignment)
    }

    /// Whether this kind's children set lists SCSS variables.
    #[must_use]
    pub fn allows_variables(self) -> bool {
        allowed_children(self).contains(&ChildClass::ScssVariable)
    }

    /// Kind name without payload, used in error messages.
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            NodeKind::StyleSheet => "StyleSheet",
            NodeKind::AtRule => "AtRule",
            NodeKind::AtKeyword => "AtKeyword",
            NodeKind::Block => "Block",
            NodeKind::RuleSet { .. } => "RuleSet",
            NodeKind::Selector => "Selector",
            NodeKind::Declaration { .. } => "Declaration",
            NodeKind::Property => "Property",
            NodeKind::Value => "Value",
            NodeKind::Any(_) => "Any",
            NodeKind::Comment { .. } => "Comment",
            NodeKind::WhiteSpace => "WhiteSpace",
            NodeKind::ScssVariable => "ScssVariable",
            NodeKind::ScssAssignment { .. } => "ScssAssignment",
        }
    }
}

/// Entry in an allowed-children table.
///
/// `Any` covers the whole `Any` family (including delimiters, properties,
/// and SCSS variables, which are identifier-like tokens); `Delimiter` covers
/// only `Any(Delim)`. This mirrors which token classes may appear where in
/// the grammar.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ChildClass {
    AtRule,
    AtKeyword,
    Block,
    RuleSet,
    Selector,
    Declaration,
    Property,
    Value,
    Any,
    Delimiter,
    Comment,
    WhiteSpace,
    ScssVariable,
    ScssAssignment,
}

/// Allowed-children table per parent kind.
fn allowed_children(kind: NodeKind) -> &'static [ChildClass] {
    use ChildClass as C;
    match kind {
        NodeKind::StyleSheet => &[
            C::AtRule,
            C::RuleSet,
            C::WhiteSpace,
            C::Comment,
            C::ScssAssignment,
        ],
        NodeKind::AtRule => &[
            C::AtKeyword,
            C::WhiteSpace,
            C::Any,
            C::Block,
            C::RuleSet,
            C::Comment,
            C::ScssVariable,
        ],
        NodeKind::Block => &[
            C::Any,
            C::Block,
            C::AtRule,
            C::RuleSet,
            C::Declaration,
            C::WhiteSpace,
            C::Comment,
            C::ScssAssignment,
        ],
        NodeKind::RuleSet { .. } => &[
            C::AtRule,
            C::RuleSet,
            C::Selector,
            C::Declaration,
            C::Delimiter,
            C::ScssAssignment,
            C::WhiteSpace,
            C::Comment,
        ],
        NodeKind::Selector => &[C::Any, C::WhiteSpace, C::Comment],
        NodeKind::Declaration { .. } => &[
            C::Property,
            C::Value,
            C::Delimiter,
            C::WhiteSpace,
            C::Comment,
        ],
        NodeKind::Value => &[
            C::Any,
            C::Block,
            C::AtKeyword,
            C::WhiteSpace,
            C::Comment,
            C::ScssVariable,
        ],
        NodeKind::Any(_) => &[C::Any, C::WhiteSpace, C::Comment, C::ScssVariable],
        NodeKind::ScssAssignment { .. } => &[
            C::ScssVariable,
            C::Value,
            C::Delimiter,
            C::WhiteSpace,
            C::Comment,
        ],
        NodeKind::AtKeyword
        | NodeKind::Property
        | NodeKind::Comment { .. }
        | NodeKind::WhiteSpace
        | NodeKind::ScssVariable => &[],
    }
}

/// Whether `kind` belongs to the token class `class`.
fn is_instance(kind: NodeKind, class: ChildClass) -> bool {
    use ChildClass as C;
    match class {
        C::AtRule => matches!(kind, NodeKind::AtRule),
        C::AtKeyword => matches!(kind, NodeKind::AtKeyword),
        C::Block => matches!(kind, NodeKind::Block),
        C::RuleSet => matches!(kind, NodeKind::RuleSet { .. }),
        C::Selector => matches!(kind, NodeKind::Selector),
        C::Declaration => matches!(kind, NodeKind::Declaration { .. }),
        C::Property => matches!(kind, NodeKind::Property),
        C::Value => matches!(kind, NodeKind::Value),
        // The Any family: plain Any tokens plus the identifier-like kinds.
        C::Any => matches!(
            kind,
            NodeKind::Any(_) | NodeKind::Property | NodeKind::ScssVariable
        ),
        C::Delimiter => matches!(kind, NodeKind::Any(AnyKind::Delim)),
        C::Comment => matches!(kind, NodeKind::Comment { .. }),
        C::WhiteSpace => matches!(kind, NodeKind::WhiteSpace),
        C::ScssVariable => matches!(kind, NodeKind::ScssVariable),
        C::ScssAssignment => matches!(kind, NodeKind::ScssAssignment { .. }),
    }
}

/// A single node in the arena.
#[derive(Debug, Clone)]
struct Node {
    kind: NodeKind,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
    data: String,
}

impl Node {
    fn new(kind: NodeKind) -> Self {
        Node {
            kind,
            parent: None,
            children: Vec::new(),
            data: String::new(),
        }
    }
}

/// Arena-based token tree with O(1) node access.
///
/// All nodes, attached or detached, live in one contiguous vector.
/// Removal detaches nodes without reclaiming slots; a compile pass allocates
/// far too few nodes for that to matter, and it keeps every `NodeId` stable
/// for the lifetime of the tree.
#[derive(Debug, Clone)]
pub struct TokenTree {
    nodes: Vec<Node>,
    /// Base directory for resolving relative `@import`s.
    path: PathBuf,
}

impl TokenTree {
    /// Create a tree whose root (at [`NodeId::ROOT`]) is a `StyleSheet`.
    #[must_use]
    pub fn new() -> Self {
        Self::with_root(NodeKind::StyleSheet)
    }

    /// Create a tree with an arbitrary root kind.
    ///
    /// The expression evaluator parses standalone expressions into a tree
    /// rooted at a `Value` node.
    #[must_use]
    pub fn with_root(kind: NodeKind) -> Self {
        TokenTree {
            nodes: vec![Node::new(kind)],
            path: PathBuf::from("."),
        }
    }

    /// The root node ID.
    #[must_use]
    pub fn root(&self) -> NodeId {
        NodeId::ROOT
    }

    /// Base directory for relative imports.
    #[must_use]
    pub fn path(&self) -> &PathBuf {
        &self.path
    }

    /// Set the base directory for relative imports.
    pub fn set_path(&mut self, path: PathBuf) {
        self.path = path;
    }

    /// Number of arena slots in use (attached or not).
    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Always false; a tree has at least its root.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Allocate a detached node and return its ID.
    pub fn alloc(&mut self, kind: NodeKind) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(Node::new(kind));
        id
    }

    /// Allocate a detached node carrying raw data.
    pub fn alloc_with_data(&mut self, kind: NodeKind, data: impl Into<String>) -> NodeId {
        let id = self.alloc(kind);
        self.nodes[id.0].data = data.into();
        id
    }

    /// The node's kind.
    #[must_use]
    pub fn kind(&self, id: NodeId) -> NodeKind {
        self.nodes[id.0].kind
    }

    /// Replace the node's kind (the parser refines `Any(Unknown)` and flips
    /// parse-state flags through this).
    pub fn set_kind(&mut self, id: NodeId, kind: NodeKind) {
        self.nodes[id.0].kind = kind;
    }

    /// The node's raw data slice.
    #[must_use]
    pub fn data(&self, id: NodeId) -> &str {
        &self.nodes[id.0].data
    }

    /// Append characters to the node's data.
    ///
    /// # Errors
    /// Fails if the node already has children (invariant: data ⊕ children).
    pub fn consume(&mut self, id: NodeId, characters: &str) -> Result<(), TreeError> {
        if !self.nodes[id.0].children.is_empty() {
            return Err(TreeError::DataWithChildren);
        }
        self.nodes[id.0].data.push_str(characters);
        Ok(())
    }

    /// Overwrite the node's data.
    pub fn set_data(&mut self, id: NodeId, data: impl Into<String>) {
        self.nodes[id.0].data = data.into();
    }

    /// The node's parent, if attached.
    #[must_use]
    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.nodes[id.0].parent
    }

    /// The node's children in order.
    #[must_use]
    pub fn children(&self, id: NodeId) -> &[NodeId] {
        &self.nodes[id.0].children
    }

    /// Position of `id` among its parent's children.
    ///
    /// # Errors
    /// Fails if the node is detached.
    pub fn own_index(&self, id: NodeId) -> Result<usize, TreeError> {
        let parent = self.parent(id).ok_or(TreeError::Orphan)?;
        Ok(self.nodes[parent.0]
            .children
            .iter()
            .position(|&c| c == id)
            .expect("parent back-reference out of sync"))
    }

    fn check_insert(&self, parent: NodeId, child: NodeId) -> Result<(), TreeError> {
        if !self.nodes[parent.0].data.is_empty() {
            return Err(TreeError::DataWithChildren);
        }
        let parent_kind = self.kind(parent);
        let child_kind = self.kind(child);
        if !allowed_children(parent_kind)
            .iter()
            .any(|&class| is_instance(child_kind, class))
        {
            return Err(TreeError::DisallowedChild {
                parent: parent_kind.name(),
                child: child_kind.name(),
            });
        }
        Ok(())
    }

    /// Append `child` to `parent`'s children, enforcing the type discipline.
    ///
    /// # Errors
    /// Fails when the parent holds data or rejects the child's kind.
    pub fn append_child(&mut self, parent: NodeId, child: NodeId) -> Result<(), TreeError> {
        self.check_insert(parent, child)?;
        self.nodes[parent.0].children.push(child);
        self.nodes[child.0].parent = Some(parent);
        Ok(())
    }

    /// Insert `child` at `index` within `parent`'s children.
    ///
    /// # Errors
    /// Fails when the parent holds data or rejects the child's kind.
    pub fn insert_child_at(
        &mut self,
        parent: NodeId,
        index: usize,
        child: NodeId,
    ) -> Result<(), TreeError> {
        self.check_insert(parent, child)?;
        self.nodes[parent.0].children.insert(index, child);
        self.nodes[child.0].parent = Some(parent);
        Ok(())
    }

    /// Insert `new` as a sibling immediately after `node`.
    ///
    /// # Errors
    /// Fails when `node` is the root or the insertion is rejected.
    pub fn insert_after(&mut self, node: NodeId, new: NodeId) -> Result<(), TreeError> {
        let parent = self.parent(node).ok_or(TreeError::Orphan)?;
        let index = self.own_index(node)?;
        self.insert_child_at(parent, index + 1, new)
    }

    /// Replace the child at `index` of `parent` with `new`.
    ///
    /// # Errors
    /// Fails when the parent rejects `new`'s kind.
    pub fn replace_child_at(
        &mut self,
        parent: NodeId,
        index: usize,
        new: NodeId,
    ) -> Result<(), TreeError> {
        let parent_kind = self.kind(parent);
        let new_kind = self.kind(new);
        if !allowed_children(parent_kind)
            .iter()
            .any(|&class| is_instance(new_kind, class))
        {
            return Err(TreeError::DisallowedChild {
                parent: parent_kind.name(),
                child: new_kind.name(),
            });
        }
        let old = self.nodes[parent.0].children[index];
        self.nodes[old.0].parent = None;
        self.nodes[parent.0].children[index] = new;
        self.nodes[new.0].parent = Some(parent);
        Ok(())
    }

    /// Replace `node` with `new` in its parent's child list.
    ///
    /// # Errors
    /// Fails when `node` is the root.
    pub fn replace_with(&mut self, node: NodeId, new: NodeId) -> Result<(), TreeError> {
        let parent = self.parent(node).ok_or(TreeError::Orphan)?;
        let index = self.own_index(node)?;
        self.replace_child_at(parent, index, new)
    }

    /// Remove the child at `index` from `parent`, detaching it.
    pub fn remove_child_at(&mut self, parent: NodeId, index: usize) {
        let child = self.nodes[parent.0].children.remove(index);
        self.nodes[child.0].parent = None;
    }

    /// Remove `child` from `parent`'s children, detaching it.
    pub fn remove_child(&mut self, parent: NodeId, child: NodeId) {
        if let Some(pos) = self.nodes[parent.0].children.iter().position(|&c| c == child) {
            let _ = self.nodes[parent.0].children.remove(pos);
            self.nodes[child.0].parent = None;
        }
    }

    /// Detach `node` from its parent.
    ///
    /// # Errors
    /// Fails when the node is already detached.
    pub fn remove(&mut self, node: NodeId) -> Result<(), TreeError> {
        let parent = self.parent(node).ok_or(TreeError::Orphan)?;
        self.remove_child(parent, node);
        Ok(())
    }

    /// Replace all of `parent`'s children, rebinding parent pointers.
    pub fn set_children(&mut self, parent: NodeId, children: Vec<NodeId>) {
        for &old in &std::mem::take(&mut self.nodes[parent.0].children) {
            self.nodes[old.0].parent = None;
        }
        for &child in &children {
            self.nodes[child.0].parent = Some(parent);
        }
        self.nodes[parent.0].children = children;
    }

    /// First child, optionally skipping whitespace and comments.
    #[must_use]
    pub fn first_child(&self, id: NodeId, ignore_trivia: bool) -> Option<NodeId> {
        self.children(id)
            .iter()
            .copied()
            .find(|&c| !ignore_trivia || !self.kind(c).is_trivia())
    }

    /// Last child, optionally skipping whitespace and comments.
    #[must_use]
    pub fn last_child(&self, id: NodeId, ignore_trivia: bool) -> Option<NodeId> {
        self.children(id)
            .iter()
            .rev()
            .copied()
            .find(|&c| !ignore_trivia || !self.kind(c).is_trivia())
    }

    /// Next sibling, optionally skipping whitespace and comments.
    #[must_use]
    pub fn next_sibling(&self, id: NodeId, ignore_trivia: bool) -> Option<NodeId> {
        let parent = self.parent(id)?;
        let siblings = self.children(parent);
        let index = siblings.iter().position(|&c| c == id)?;
        siblings[index + 1..]
            .iter()
            .copied()
            .find(|&c| !ignore_trivia || !self.kind(c).is_trivia())
    }

    /// Previous sibling, optionally skipping whitespace and comments.
    #[must_use]
    pub fn prev_sibling(&self, id: NodeId, ignore_trivia: bool) -> Option<NodeId> {
        let parent = self.parent(id)?;
        let siblings = self.children(parent);
        let index = siblings.iter().position(|&c| c == id)?;
        siblings[..index]
            .iter()
            .rev()
            .copied()
            .find(|&c| !ignore_trivia || !self.kind(c).is_trivia())
    }

    /// Whether `id` is its parent's first child. With `ignore_trivia`, any
    /// preceding whitespace/comment siblings are overlooked (so this can be
    /// asked of a whitespace node itself).
    #[must_use]
    pub fn is_first_child(&self, id: NodeId, ignore_trivia: bool) -> bool {
        let Some(parent) = self.parent(id) else {
            return false;
        };
        if ignore_trivia {
            self.prev_sibling(id, true).is_none()
        } else {
            self.first_child(parent, false) == Some(id)
        }
    }

    /// Whether `id` is its parent's last child. With `ignore_trivia`, any
    /// following whitespace/comment siblings are overlooked.
    #[must_use]
    pub fn is_last_child(&self, id: NodeId, ignore_trivia: bool) -> bool {
        let Some(parent) = self.parent(id) else {
            return false;
        };
        if ignore_trivia {
            self.next_sibling(id, true).is_none()
        } else {
            self.last_child(parent, false) == Some(id)
        }
    }

    /// Nearest enclosing rule set, including `id` itself.
    #[must_use]
    pub fn containing_rule_set(&self, id: NodeId) -> Option<NodeId> {
        let mut current = Some(id);
        while let Some(node) = current {
            if matches!(self.kind(node), NodeKind::RuleSet { .. }) {
                return Some(node);
            }
            current = self.parent(node);
        }
        None
    }

    /// Depth-first pre-order traversal of `id`'s descendants (excluding
    /// `id` itself).
    #[must_use]
    pub fn descendants(&self, id: NodeId) -> DescendantIterator<'_> {
        DescendantIterator {
            tree: self,
            stack: self.children(id).iter().rev().copied().collect(),
        }
    }

    /// All rule sets in the tree, in document order.
    ///
    /// This is the derived view behind `@extend`: rather than maintaining a
    /// cache on the stylesheet, filter the arena on demand.
    pub fn rule_sets(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.descendants(self.root())
            .filter(|&id| matches!(self.kind(id), NodeKind::RuleSet { .. }))
    }

    /// Deep-copy the subtree rooted at `id`, returning the detached clone.
    ///
    /// Comment children are not cloned, and cloned whitespace collapses to a
    /// single space; clones exist to be spliced into compiled output where
    /// the original formatting carries no meaning.
    pub fn clone_subtree(&mut self, id: NodeId) -> NodeId {
        let kind = self.kind(id);
        let clone = if matches!(kind, NodeKind::WhiteSpace) {
            self.alloc_with_data(kind, " ")
        } else {
            let data = self.nodes[id.0].data.clone();
            self.alloc_with_data(kind, data)
        };
        let children = self.nodes[id.0].children.clone();
        for child in children {
            if matches!(self.kind(child), NodeKind::Comment { .. }) {
                continue;
            }
            let child_clone = self.clone_subtree(child);
            self.nodes[clone.0].children.push(child_clone);
            self.nodes[child_clone.0].parent = Some(clone);
        }
        clone
    }

    /// Copy the subtree at `id` into a new tree of its own, rooted at the
    /// copy.
    ///
    /// Mixin and function bodies are carved out this way so they outlive
    /// the stylesheet they were defined in.
    #[must_use]
    pub fn extract_subtree(&self, id: NodeId) -> TokenTree {
        let mut out = TokenTree::with_root(self.kind(id));
        out.nodes[0].data = self.nodes[id.0].data.clone();
        for &child in &self.nodes[id.0].children {
            let copy = out.graft_from(self, child);
            out.nodes[copy.0].parent = Some(NodeId::ROOT);
            out.nodes[0].children.push(copy);
        }
        out
    }

    /// Deep-copy a subtree out of another tree's arena into this one.
    ///
    /// Used by the importer to splice cached stylesheets into the importing
    /// tree. Returns the detached copy.
    pub fn graft_from(&mut self, source: &TokenTree, id: NodeId) -> NodeId {
        let node = &source.nodes[id.0];
        let copy = self.alloc_with_data(node.kind, node.data.clone());
        for &child in &node.children {
            let child_copy = self.graft_from(source, child);
            self.nodes[copy.0].children.push(child_copy);
            self.nodes[child_copy.0].parent = Some(copy);
        }
        copy
    }

    // ---- token-class predicates -------------------------------------------

    /// True for `Any` tokens of any subtype (delimiters, properties, and
    /// SCSS variables included).
    #[must_use]
    pub fn is_any(&self, id: NodeId) -> bool {
        matches!(
            self.kind(id),
            NodeKind::Any(_) | NodeKind::Property | NodeKind::ScssVariable
        )
    }

    /// True for a delimiter whose single character is in `characters`
    /// (any delimiter when `characters` is empty).
    #[must_use]
    pub fn is_delimiter(&self, id: NodeId, characters: &str) -> bool {
        matches!(self.kind(id), NodeKind::Any(AnyKind::Delim))
            && (characters.is_empty()
                || (self.data(id).chars().count() == 1
                    && self.data(id).chars().next().is_some_and(|c| characters.contains(c))))
    }

    /// True for a delimiter whose full data equals `operator` (covers the
    /// two-character comparison operators).
    #[must_use]
    pub fn is_operator(&self, id: NodeId, operator: &str) -> bool {
        matches!(self.kind(id), NodeKind::Any(AnyKind::Delim)) && self.data(id) == operator
    }

    /// True for an identifier token (`Property` counts: it is one).
    #[must_use]
    pub fn is_identifier(&self, id: NodeId) -> bool {
        matches!(
            self.kind(id),
            NodeKind::Any(AnyKind::Ident) | NodeKind::Property
        )
    }

    /// True for an identifier token whose data equals `keyword`.
    #[must_use]
    pub fn is_keyword(&self, id: NodeId, keyword: &str) -> bool {
        self.is_identifier(id) && self.data(id) == keyword
    }

    /// True for whitespace or comment nodes.
    #[must_use]
    pub fn is_trivia(&self, id: NodeId) -> bool {
        self.kind(id).is_trivia()
    }

    /// Serialization boundary: blocks, lists, and delimiters. Whitespace
    /// adjacent to a boundary is dropped when stripping.
    #[must_use]
    pub fn is_boundary(&self, id: NodeId) -> bool {
        matches!(
            self.kind(id),
            NodeKind::Block | NodeKind::Any(AnyKind::List) | NodeKind::Any(AnyKind::Delim)
        )
    }
}

impl Default for TokenTree {
    fn default() -> Self {
        Self::new()
    }
}

/// Depth-first pre-order iterator over a node's descendants.
pub struct DescendantIterator<'a> {
    tree: &'a TokenTree,
    /// Nodes to visit; children are pushed in reverse so popping yields
    /// left-to-right order.
    stack: Vec<NodeId>,
}

impl Iterator for DescendantIterator<'_> {
    type Item = NodeId;

    fn next(&mut self) -> Option<Self::Item> {
        let id = self.stack.pop()?;
        self.stack
            .extend(self.tree.children(id).iter().rev().copied());
        Some(id)
    }
}
