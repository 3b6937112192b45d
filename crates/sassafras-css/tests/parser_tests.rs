//! Tests for the token-state-machine parser: tree shapes, token subtypes,
//! and the SCSS rule-set vs declaration lookahead.

use sassafras_css::{parser, AnyKind, CssOptions, NodeKind, TokenTree};

fn parse_css(source: &str) -> TokenTree {
    parser::parse(source, CssOptions::default()).expect("parse failed")
}

fn parse_scss(source: &str) -> TokenTree {
    parser::parse(source, CssOptions::default().with_scss(true)).expect("parse failed")
}

/// The kinds of the root's children.
fn root_kinds(tree: &TokenTree) -> Vec<NodeKind> {
    tree.children(tree.root())
        .iter()
        .map(|&c| tree.kind(c))
        .collect()
}

#[test]
fn test_simple_rule_set_shape() {
    let tree = parse_css("a { color: red; }");
    let kinds = root_kinds(&tree);
    assert_eq!(kinds.len(), 1);
    assert!(matches!(kinds[0], NodeKind::RuleSet { is_opened: true }));

    let rule_set = tree.children(tree.root())[0];
    let children = tree.children(rule_set);
    assert!(matches!(tree.kind(children[0]), NodeKind::Selector));

    let declaration = children
        .iter()
        .copied()
        .find(|&c| matches!(tree.kind(c), NodeKind::Declaration { .. }))
        .expect("no declaration parsed");
    let property = tree
        .first_child(declaration, true)
        .expect("declaration has no children");
    assert!(matches!(tree.kind(property), NodeKind::Property));
    assert_eq!(tree.data(property), "color");
}

#[test]
fn test_at_rule_with_block() {
    let tree = parse_css("@media screen { a { color: red; } }");
    let at_rule = tree.children(tree.root())[0];
    assert!(matches!(tree.kind(at_rule), NodeKind::AtRule));

    let keyword = tree.children(at_rule)[0];
    assert!(matches!(tree.kind(keyword), NodeKind::AtKeyword));
    assert_eq!(tree.data(keyword), "@media");

    assert!(
        tree.children(at_rule)
            .iter()
            .any(|&c| matches!(tree.kind(c), NodeKind::Block))
    );
}

#[test]
fn test_at_rule_without_block_ends_at_semicolon() {
    let tree = parse_css("@charset \"utf-8\";\n");
    let at_rule = tree.children(tree.root())[0];
    assert!(matches!(tree.kind(at_rule), NodeKind::AtRule));
    let string = tree
        .children(at_rule)
        .iter()
        .copied()
        .find(|&c| matches!(tree.kind(c), NodeKind::Any(AnyKind::Str)))
        .expect("missing string token");
    assert_eq!(tree.data(string), "\"utf-8\"");
}

#[test]
fn test_value_token_subtypes() {
    let tree = parse_css("a { margin: 1px 50% 2.5 url(x.png) \"s\" #fff; }");
    let mut found = Vec::new();
    for id in tree.descendants(tree.root()) {
        if let NodeKind::Any(kind) = tree.kind(id) {
            found.push((kind, tree.data(id).to_string()));
        }
    }
    assert!(found.contains(&(AnyKind::Dimension, "1px".to_string())));
    assert!(found.contains(&(AnyKind::Percentage, "50%".to_string())));
    assert!(found.contains(&(AnyKind::Number, "2.5".to_string())));
    assert!(found.contains(&(AnyKind::Uri, "url(x.png)".to_string())));
    assert!(found.contains(&(AnyKind::Str, "\"s\"".to_string())));
    assert!(found.contains(&(AnyKind::Hash, "#fff".to_string())));
}

#[test]
fn test_function_token_keeps_name_and_arguments() {
    let tree = parse_css("a { color: rgb(1, 2, 3); }");
    let function = tree
        .descendants(tree.root())
        .find(|&id| matches!(tree.kind(id), NodeKind::Any(AnyKind::Function)))
        .expect("no function token");
    let children = tree.children(function);
    assert_eq!(tree.data(children[0]), "rgb");
    assert!(tree.is_delimiter(children[1], "("));
    assert!(tree.is_delimiter(*children.last().unwrap(), ")"));
}

#[test]
fn test_two_character_operators() {
    let tree = parse_scss("@if 1 <= 2 { a { color: red; } }");
    let operator = tree
        .descendants(tree.root())
        .find(|&id| tree.is_operator(id, "<="))
        .expect("operator was split");
    assert_eq!(tree.data(operator), "<=");
}

#[test]
fn test_important_parses_as_identifier() {
    let tree = parse_css("a { color: red !important; }");
    assert!(
        tree.descendants(tree.root())
            .any(|id| tree.is_keyword(id, "!important"))
    );
}

#[test]
fn test_block_comment_token() {
    let tree = parse_css("/* hello */ a { color: red; }");
    let comment = tree.children(tree.root())[0];
    assert!(matches!(
        tree.kind(comment),
        NodeKind::Comment { single_line: false }
    ));
    assert_eq!(tree.data(comment), "/* hello */");
}

#[test]
fn test_line_comment_only_in_scss_mode() {
    let tree = parse_scss("// note\na { color: red; }");
    let comment = tree.children(tree.root())[0];
    assert!(matches!(
        tree.kind(comment),
        NodeKind::Comment { single_line: true }
    ));

    // In plain CSS mode a double slash is not a comment.
    let tree = parser::parse("// note\n", CssOptions::default()).expect("parse failed");
    assert!(
        !tree
            .descendants(tree.root())
            .any(|id| matches!(tree.kind(id), NodeKind::Comment { .. }))
    );
}

#[test]
fn test_scss_assignment_swallows_semicolon() {
    let tree = parse_scss("$c: red;\na { color: blue; }");
    let assignment = tree.children(tree.root())[0];
    assert!(matches!(
        tree.kind(assignment),
        NodeKind::ScssAssignment { has_colon: true }
    ));

    let variable = tree.children(assignment)[0];
    assert!(matches!(tree.kind(variable), NodeKind::ScssVariable));
    assert_eq!(tree.data(variable), "$c");

    // The terminating semicolon belongs to nobody.
    assert!(
        !tree
            .children(tree.root())
            .iter()
            .any(|&c| tree.is_delimiter(c, ";"))
    );
}

#[test]
fn test_lookahead_nested_rule_vs_declaration() {
    // `a:hover { ... }` inside a block must become a nested rule set...
    let tree = parse_scss("div { a:hover { color: red; } }");
    let outer = tree.children(tree.root())[0];
    assert!(
        tree.children(outer)
            .iter()
            .any(|&c| matches!(tree.kind(c), NodeKind::RuleSet { .. }))
    );

    // ...while `color: red;` stays a declaration.
    let tree = parse_scss("div { color: red; }");
    let outer = tree.children(tree.root())[0];
    assert!(
        tree.children(outer)
            .iter()
            .any(|&c| matches!(tree.kind(c), NodeKind::Declaration { .. }))
    );
    assert!(
        !tree
            .children(outer)
            .iter()
            .any(|&c| matches!(tree.kind(c), NodeKind::RuleSet { .. }))
    );
}

#[test]
fn test_lookahead_identifier_value_is_declaration() {
    // The value after the colon starts with an identifier, so the scan
    // must keep going until the `;` decides it.
    let tree = parse_scss("div { color:red; }");
    let outer = tree.children(tree.root())[0];
    assert!(
        tree.children(outer)
            .iter()
            .any(|&c| matches!(tree.kind(c), NodeKind::Declaration { .. }))
    );
    assert!(
        !tree
            .children(outer)
            .iter()
            .any(|&c| matches!(tree.kind(c), NodeKind::RuleSet { .. }))
    );
}

#[test]
fn test_ie_star_property_hack() {
    let tree = parse_css("a { *width: 10px; }");
    let property = tree
        .descendants(tree.root())
        .find(|&id| matches!(tree.kind(id), NodeKind::Property))
        .expect("no property");
    assert_eq!(tree.data(property), "*width");
}

#[test]
fn test_interpolation_survives_in_identifier() {
    let tree = parse_scss("a { width: #{1+1}px; }");
    assert!(
        tree.descendants(tree.root())
            .any(|id| tree.data(id) == "#{1+1}px"
                && matches!(tree.kind(id), NodeKind::Any(AnyKind::Ident)))
    );
}

#[test]
fn test_nested_selector_tokens() {
    let tree = parse_scss("a { &:hover { color: red; } }");
    let outer = tree.children(tree.root())[0];
    let nested = tree
        .children(outer)
        .iter()
        .copied()
        .find(|&c| matches!(tree.kind(c), NodeKind::RuleSet { .. }))
        .expect("nested rule set missing");
    let selector = tree
        .children(nested)
        .iter()
        .copied()
        .find(|&c| matches!(tree.kind(c), NodeKind::Selector))
        .expect("nested selector missing");
    assert!(tree.is_delimiter(tree.children(selector)[0], "&"));
}

#[test]
fn test_unexpected_character_is_strict() {
    assert!(parser::parse("a { ! }", CssOptions::default()).is_err());
}

#[test]
fn test_parse_error_reports_location() {
    let error = parser::parse("a {\n  !\n}", CssOptions::default()).unwrap_err();
    let message = error.to_string();
    assert!(message.contains("line 2"), "got: {message}");
}
