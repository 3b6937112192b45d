//! Tests for token-tree mutation: append, insert, remove, replace, and the
//! subtree clone/graft operations.

use sassafras_tree::{AnyKind, NodeId, NodeKind, TokenTree};

/// Helper to allocate a rule set attached to the root.
fn attach_rule_set(tree: &mut TokenTree) -> NodeId {
    let rule_set = tree.alloc(NodeKind::RuleSet { is_opened: false });
    tree.append_child(NodeId::ROOT, rule_set).unwrap();
    rule_set
}

#[test]
fn test_new_tree_has_style_sheet_root() {
    let tree = TokenTree::new();
    assert!(matches!(tree.kind(tree.root()), NodeKind::StyleSheet));
    assert_eq!(tree.children(tree.root()).len(), 0);
}

#[test]
fn test_append_child_sets_parent() {
    let mut tree = TokenTree::new();
    let rule_set = attach_rule_set(&mut tree);

    assert_eq!(tree.parent(rule_set), Some(NodeId::ROOT));
    assert_eq!(tree.children(NodeId::ROOT), &[rule_set]);
}

#[test]
fn test_append_child_enforces_allowed_children() {
    let mut tree = TokenTree::new();
    // A stylesheet cannot hold a bare value token.
    let value = tree.alloc(NodeKind::Value);
    assert!(tree.append_child(NodeId::ROOT, value).is_err());

    // Nor a declaration.
    let declaration = tree.alloc(NodeKind::Declaration { has_colon: false });
    assert!(tree.append_child(NodeId::ROOT, declaration).is_err());
}

#[test]
fn test_data_and_children_are_exclusive() {
    let mut tree = TokenTree::new();
    let rule_set = attach_rule_set(&mut tree);

    let selector = tree.alloc(NodeKind::Selector);
    tree.append_child(rule_set, selector).unwrap();

    // A node with children refuses data...
    assert!(tree.consume(rule_set, "boom").is_err());

    // ...and a node with data refuses children.
    let ident = tree.alloc_with_data(NodeKind::Any(AnyKind::Ident), "red");
    let ws = tree.alloc(NodeKind::WhiteSpace);
    assert!(tree.append_child(ident, ws).is_err());
}

#[test]
fn test_remove_child_detaches() {
    let mut tree = TokenTree::new();
    let rule_set = attach_rule_set(&mut tree);

    tree.remove_child(NodeId::ROOT, rule_set);
    assert_eq!(tree.parent(rule_set), None);
    assert_eq!(tree.children(NodeId::ROOT).len(), 0);
}

#[test]
fn test_insert_after_preserves_order() {
    let mut tree = TokenTree::new();
    let first = attach_rule_set(&mut tree);
    let second = attach_rule_set(&mut tree);

    let middle = tree.alloc(NodeKind::RuleSet { is_opened: false });
    tree.insert_after(first, middle).unwrap();

    assert_eq!(tree.children(NodeId::ROOT), &[first, middle, second]);
    assert_eq!(tree.own_index(middle).unwrap(), 1);
}

#[test]
fn test_replace_with_swaps_in_place() {
    let mut tree = TokenTree::new();
    let selector = tree.alloc(NodeKind::Selector);
    let ident = tree.alloc_with_data(NodeKind::Any(AnyKind::Ident), "a");
    let ws = tree.alloc_with_data(NodeKind::WhiteSpace, " ");
    tree.append_child(selector, ident).unwrap();
    tree.append_child(selector, ws).unwrap();

    let other = tree.alloc_with_data(NodeKind::Any(AnyKind::Ident), "b");
    tree.replace_with(ident, other).unwrap();

    assert_eq!(tree.children(selector), &[other, ws]);
    assert_eq!(tree.parent(other), Some(selector));
    assert_eq!(tree.parent(ident), None);
}

#[test]
fn test_set_children_rebinds_parents() {
    let mut tree = TokenTree::new();
    let selector = tree.alloc(NodeKind::Selector);
    let a = tree.alloc_with_data(NodeKind::Any(AnyKind::Ident), "a");
    let b = tree.alloc_with_data(NodeKind::Any(AnyKind::Ident), "b");
    tree.append_child(selector, a).unwrap();

    tree.set_children(selector, vec![b]);
    assert_eq!(tree.parent(a), None);
    assert_eq!(tree.parent(b), Some(selector));
}

#[test]
fn test_trivia_skipping_navigation() {
    let mut tree = TokenTree::new();
    let selector = tree.alloc(NodeKind::Selector);
    let ws1 = tree.alloc_with_data(NodeKind::WhiteSpace, " ");
    let ident = tree.alloc_with_data(NodeKind::Any(AnyKind::Ident), "a");
    let ws2 = tree.alloc_with_data(NodeKind::WhiteSpace, " ");
    tree.append_child(selector, ws1).unwrap();
    tree.append_child(selector, ident).unwrap();
    tree.append_child(selector, ws2).unwrap();

    assert_eq!(tree.first_child(selector, true), Some(ident));
    assert_eq!(tree.last_child(selector, true), Some(ident));
    assert_eq!(tree.first_child(selector, false), Some(ws1));

    // Trivia-aware first/last hold even when asked of the trivia itself.
    assert!(tree.is_first_child(ws1, true));
    assert!(tree.is_first_child(ident, true));
    assert!(tree.is_last_child(ident, true));
    assert!(!tree.is_first_child(ident, false));

    assert_eq!(tree.next_sibling(ident, true), None);
    assert_eq!(tree.prev_sibling(ident, true), None);
    assert_eq!(tree.next_sibling(ws1, false), Some(ident));
}

#[test]
fn test_clone_subtree_drops_comments_and_collapses_whitespace() {
    let mut tree = TokenTree::new();
    let rule_set = attach_rule_set(&mut tree);
    let ws = tree.alloc_with_data(NodeKind::WhiteSpace, "\n    ");
    let comment = tree.alloc_with_data(NodeKind::Comment { single_line: false }, "/* x */");
    tree.append_child(rule_set, ws).unwrap();
    tree.append_child(rule_set, comment).unwrap();

    let clone = tree.clone_subtree(rule_set);
    assert_eq!(tree.parent(clone), None);
    let children = tree.children(clone).to_vec();
    assert_eq!(children.len(), 1);
    assert!(matches!(tree.kind(children[0]), NodeKind::WhiteSpace));
    assert_eq!(tree.data(children[0]), " ");
}

#[test]
fn test_extract_subtree_owns_a_copy() {
    let mut tree = TokenTree::new();
    let block = tree.alloc(NodeKind::Block);
    let open = tree.alloc_with_data(NodeKind::delim(), "{");
    let close = tree.alloc_with_data(NodeKind::delim(), "}");
    tree.append_child(block, open).unwrap();
    tree.append_child(block, close).unwrap();

    let extracted = tree.extract_subtree(block);
    assert!(matches!(extracted.kind(extracted.root()), NodeKind::Block));
    assert_eq!(extracted.children(extracted.root()).len(), 2);
    assert_eq!(extracted.data(extracted.children(extracted.root())[0]), "{");
}

#[test]
fn test_graft_from_copies_across_trees() {
    let mut source = TokenTree::new();
    let rule_set = source.alloc(NodeKind::RuleSet { is_opened: true });
    let selector = source.alloc(NodeKind::Selector);
    let ident = source.alloc_with_data(NodeKind::Any(AnyKind::Ident), "a");
    source.append_child(rule_set, selector).unwrap();
    source.append_child(selector, ident).unwrap();

    let mut target = TokenTree::new();
    let copy = target.graft_from(&source, rule_set);
    target.append_child(NodeId::ROOT, copy).unwrap();

    let copied_selector = target.children(copy)[0];
    assert!(matches!(target.kind(copied_selector), NodeKind::Selector));
    assert_eq!(target.data(target.children(copied_selector)[0]), "a");
    // Parent back-references are consistent in the target arena.
    assert_eq!(target.parent(copied_selector), Some(copy));
}

#[test]
fn test_rule_sets_iterates_descendants() {
    let mut tree = TokenTree::new();
    let outer = attach_rule_set(&mut tree);
    let inner = tree.alloc(NodeKind::RuleSet { is_opened: false });
    tree.append_child(outer, inner).unwrap();
    let at_rule = tree.alloc(NodeKind::AtRule);
    tree.append_child(NodeId::ROOT, at_rule).unwrap();

    let rule_sets: Vec<NodeId> = tree.rule_sets().collect();
    assert_eq!(rule_sets, vec![outer, inner]);
}

#[test]
fn test_containing_rule_set_walks_up() {
    let mut tree = TokenTree::new();
    let rule_set = attach_rule_set(&mut tree);
    let at_rule = tree.alloc(NodeKind::AtRule);
    tree.append_child(rule_set, at_rule).unwrap();

    assert_eq!(tree.containing_rule_set(at_rule), Some(rule_set));
    assert_eq!(tree.containing_rule_set(rule_set), Some(rule_set));
    assert_eq!(tree.containing_rule_set(NodeId::ROOT), None);
}

#[test]
fn test_delimiter_predicates() {
    let mut tree = TokenTree::new();
    let comma = tree.alloc_with_data(NodeKind::delim(), ",");
    let eq = tree.alloc_with_data(NodeKind::delim(), "==");

    assert!(tree.is_delimiter(comma, ","));
    assert!(tree.is_delimiter(comma, ",;"));
    assert!(!tree.is_delimiter(comma, ";"));
    // Any delimiter matches the empty set.
    assert!(tree.is_delimiter(comma, ""));

    // Two-character operators are not single-character delimiters...
    assert!(!tree.is_delimiter(eq, "="));
    // ...but match as operators.
    assert!(tree.is_operator(eq, "=="));
}
