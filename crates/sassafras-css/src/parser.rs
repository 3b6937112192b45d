//! Token-state-machine parser.
//!
//! The parser is not a grammar-driven recursive-descent pass: each node kind
//! owns a `process` transition that consumes input and answers which node
//! processes the next character, and the driver just loops
//! `current = process(current)` from the root stylesheet until end of input.
//! Children are created (and the tree grows) as a side effect of the
//! transitions, so parsing, compilation, and serialization all share one
//! structure.
//!
//! The parser is strict: any character that no transition accepts raises a
//! [`ParseError`] with its location and a source snippet.

use sassafras_tree::{AnyKind, NodeId, NodeKind, TokenTree};

use crate::error::ParseError;
use crate::options::CssOptions;
use crate::serialize;
use crate::stream::CharStream;

/// Parse `source` into a token tree.
///
/// # Errors
/// Fails on the first character no transition accepts.
pub fn parse(source: &str, options: CssOptions) -> Result<TokenTree, ParseError> {
    let mut tree = TokenTree::new();
    let mut stream = CharStream::new(source, options.compile_scss);
    let mut current = tree.root();
    while !stream.is_end_of_file(0) {
        current = process(&mut tree, current, &mut stream, options)?
            .unwrap_or_else(|| tree.root());
    }
    Ok(tree)
}

/// Parse a standalone value expression into `tree` as a detached `Value`
/// node, consuming the stream until the value closes or input ends.
///
/// This is how `#{…}` interpolation bodies and REPL expressions enter the
/// token world.
///
/// # Errors
/// Propagates parser errors from the expression body.
pub fn parse_value_into(
    tree: &mut TokenTree,
    stream: &mut CharStream,
    options: CssOptions,
) -> Result<NodeId, ParseError> {
    let value = tree.alloc(NodeKind::Value);
    let mut current = Some(value);
    while let Some(node) = current {
        if stream.is_end_of_file(0) {
            break;
        }
        current = process(tree, node, stream, options)?;
    }
    Ok(value)
}

fn add_child(tree: &mut TokenTree, parent: NodeId, child: NodeId) -> Result<(), ParseError> {
    tree.append_child(parent, child)
        .map_err(|err| ParseError::new(err.to_string()))
}

fn create_child(
    tree: &mut TokenTree,
    parent: NodeId,
    kind: NodeKind,
) -> Result<NodeId, ParseError> {
    let child = tree.alloc(kind);
    add_child(tree, parent, child)?;
    Ok(child)
}

/// Create a delimiter child consuming the next stream character.
fn create_delimiter_child(
    tree: &mut TokenTree,
    parent: NodeId,
    stream: &mut CharStream,
) -> Result<NodeId, ParseError> {
    let taken = stream.take(1);
    let child = tree.alloc_with_data(NodeKind::delim(), taken);
    add_child(tree, parent, child)?;
    Ok(child)
}

fn consume(tree: &mut TokenTree, node: NodeId, characters: &str) -> Result<(), ParseError> {
    tree.consume(node, characters)
        .map_err(|err| ParseError::new(err.to_string()))
}

fn invalid_character(tree: &TokenTree, node: NodeId, stream: &CharStream) -> ParseError {
    let shown = stream.current().map_or_else(String::new, String::from);
    // The enclosing token gives the error a readable anchor.
    let context = tree.parent(node).unwrap_or(node);
    stream
        .error(format!("Invalid character '{shown}' in stream"))
        .with_token(serialize::node_to_css(tree, context, CssOptions::default()))
}

/// Process one step: consume at least one character (or delegate to a new
/// child that will) and return the node that handles the next character.
/// `None` means control returned past a detached root.
pub(crate) fn process(
    tree: &mut TokenTree,
    node: NodeId,
    stream: &mut CharStream,
    options: CssOptions,
) -> Result<Option<NodeId>, ParseError> {
    match tree.kind(node) {
        NodeKind::StyleSheet => process_style_sheet(tree, node, stream, options),
        NodeKind::AtRule => process_at_rule(tree, node, stream, options),
        NodeKind::AtKeyword => process_at_keyword(tree, node, stream),
        NodeKind::Block => process_block(tree, node, stream, options),
        NodeKind::RuleSet { is_opened } => {
            process_rule_set(tree, node, stream, options, is_opened)
        }
        NodeKind::Selector => process_selector(tree, node, stream, options),
        NodeKind::Declaration { has_colon } => {
            process_declaration(tree, node, stream, options, has_colon)
        }
        NodeKind::Property => process_property(tree, node, stream),
        NodeKind::Value => process_value(tree, node, stream, options),
        NodeKind::Any(any) => process_any(tree, node, stream, options, any),
        NodeKind::Comment { single_line } => process_comment(tree, node, stream, single_line),
        NodeKind::WhiteSpace => process_whitespace(tree, node, stream),
        NodeKind::ScssVariable => process_scss_variable(tree, node, stream),
        NodeKind::ScssAssignment { has_colon } => {
            process_scss_assignment(tree, node, stream, options, has_colon)
        }
    }
}

/// Dispatch shared by every kind: comments, whitespace, and the SCSS `$`
/// sigil. Returns the next node when handled.
fn process_base(
    tree: &mut TokenTree,
    node: NodeId,
    stream: &mut CharStream,
    options: CssOptions,
) -> Result<Option<NodeId>, ParseError> {
    let kind = tree.kind(node);

    if stream.is_comment_start(0) {
        // A comment can appear anywhere; if this node cannot hold one, it
        // lands on the parent instead.
        let parent = if kind.allows_comments() {
            node
        } else {
            tree.parent(node)
                .ok_or_else(|| stream.error("Comment is not allowed here"))?
        };
        let comment = tree.alloc(NodeKind::Comment { single_line: false });
        let taken = stream.take(2);
        consume(tree, comment, &taken)?;
        add_child(tree, parent, comment)?;
        return Ok(Some(comment));
    }

    if stream.is_whitespace(0) && kind.allows_whitespace() {
        return Ok(Some(create_child(tree, node, NodeKind::WhiteSpace)?));
    }

    if options.compile_scss && stream.is_variable_start(0) {
        if kind.allows_assignments() {
            return Ok(Some(create_child(
                tree,
                node,
                NodeKind::ScssAssignment { has_colon: false },
            )?));
        }
        if kind.allows_variables() {
            return Ok(Some(create_child(tree, node, NodeKind::ScssVariable)?));
        }
    }

    Ok(None)
}

fn process_style_sheet(
    tree: &mut TokenTree,
    node: NodeId,
    stream: &mut CharStream,
    options: CssOptions,
) -> Result<Option<NodeId>, ParseError> {
    if let Some(next) = process_base(tree, node, stream, options)? {
        return Ok(Some(next));
    }

    if stream.current() == Some('@') {
        return Ok(Some(create_child(tree, node, NodeKind::AtRule)?));
    }

    Ok(Some(create_child(
        tree,
        node,
        NodeKind::RuleSet { is_opened: false },
    )?))
}

fn process_at_rule(
    tree: &mut TokenTree,
    node: NodeId,
    stream: &mut CharStream,
    options: CssOptions,
) -> Result<Option<NodeId>, ParseError> {
    // Once the block has closed, the rule is complete.
    if tree
        .children(node)
        .iter()
        .any(|&c| matches!(tree.kind(c), NodeKind::Block))
    {
        return Ok(tree.parent(node));
    }

    if let Some(next) = process_base(tree, node, stream, options)? {
        return Ok(Some(next));
    }

    if tree.children(node).is_empty() {
        return Ok(Some(create_child(tree, node, NodeKind::AtKeyword)?));
    }

    match stream.current() {
        Some(';') => {
            let _ = create_delimiter_child(tree, node, stream)?;
            Ok(tree.parent(node))
        }
        Some('{') => Ok(Some(create_child(tree, node, NodeKind::Block)?)),
        Some('}') => Err(invalid_character(tree, node, stream)),
        _ => Ok(Some(create_child(
            tree,
            node,
            NodeKind::Any(AnyKind::Unknown),
        )?)),
    }
}

fn process_at_keyword(
    tree: &mut TokenTree,
    node: NodeId,
    stream: &mut CharStream,
) -> Result<Option<NodeId>, ParseError> {
    let keyword = stream.take_at_keyword()?;
    consume(tree, node, &keyword)?;
    Ok(tree.parent(node))
}

fn process_block(
    tree: &mut TokenTree,
    node: NodeId,
    stream: &mut CharStream,
    options: CssOptions,
) -> Result<Option<NodeId>, ParseError> {
    if let Some(next) = process_base(tree, node, stream, options)? {
        return Ok(Some(next));
    }

    match stream.current() {
        Some('{') => {
            if tree.children(node).is_empty() {
                let _ = create_delimiter_child(tree, node, stream)?;
                Ok(Some(node))
            } else {
                Ok(Some(create_child(tree, node, NodeKind::Block)?))
            }
        }
        Some('}') => {
            let _ = create_delimiter_child(tree, node, stream)?;
            Ok(tree.parent(node))
        }
        Some(';') => {
            let _ = create_delimiter_child(tree, node, stream)?;
            Ok(Some(node))
        }
        Some('@') => Ok(Some(create_child(tree, node, NodeKind::AtRule)?)),
        current => {
            if options.compile_scss {
                if stream.is_identifier_start(0) {
                    if let Some(next) = rule_set_vs_declaration_lookahead(tree, node, stream)? {
                        return Ok(Some(next));
                    }
                } else if current.is_some_and(|c| "&*.#".contains(c)) {
                    return Ok(Some(create_child(
                        tree,
                        node,
                        NodeKind::RuleSet { is_opened: false },
                    )?));
                }
            }
            Ok(Some(create_child(
                tree,
                node,
                NodeKind::Any(AnyKind::Unknown),
            )?))
        }
    }
}

fn process_rule_set(
    tree: &mut TokenTree,
    node: NodeId,
    stream: &mut CharStream,
    options: CssOptions,
    is_opened: bool,
) -> Result<Option<NodeId>, ParseError> {
    if let Some(next) = process_base(tree, node, stream, options)? {
        return Ok(Some(next));
    }

    if is_opened {
        match stream.current() {
            Some('}') => {
                let _ = create_delimiter_child(tree, node, stream)?;
                return Ok(tree.parent(node));
            }
            Some(';') => {
                let _ = create_delimiter_child(tree, node, stream)?;
                return Ok(Some(node));
            }
            _ => {}
        }

        if stream.is_identifier_start(0) {
            if options.compile_scss {
                if let Some(next) = rule_set_vs_declaration_lookahead(tree, node, stream)? {
                    return Ok(Some(next));
                }
            }
            return Ok(Some(create_child(
                tree,
                node,
                NodeKind::Declaration { has_colon: false },
            )?));
        }

        // IE <= 7 star-property hack.
        if stream.current() == Some('*') {
            return Ok(Some(create_child(
                tree,
                node,
                NodeKind::Declaration { has_colon: false },
            )?));
        }

        if options.compile_scss {
            if stream.current() == Some('@') {
                return Ok(Some(create_child(tree, node, NodeKind::AtRule)?));
            }
            if stream.current().is_some_and(|c| "&.:#".contains(c)) {
                return Ok(Some(create_child(
                    tree,
                    node,
                    NodeKind::RuleSet { is_opened: false },
                )?));
            }
        }
    } else {
        if stream.current() == Some('{') {
            tree.set_kind(node, NodeKind::RuleSet { is_opened: true });
            let _ = create_delimiter_child(tree, node, stream)?;
            return Ok(Some(node));
        }

        let has_selector = tree
            .children(node)
            .iter()
            .any(|&c| matches!(tree.kind(c), NodeKind::Selector));
        if !has_selector {
            return Ok(Some(create_child(tree, node, NodeKind::Selector)?));
        }
    }

    Err(invalid_character(tree, node, stream))
}

fn process_selector(
    tree: &mut TokenTree,
    node: NodeId,
    stream: &mut CharStream,
    options: CssOptions,
) -> Result<Option<NodeId>, ParseError> {
    if let Some(next) = process_base(tree, node, stream, options)? {
        return Ok(Some(next));
    }

    if stream.current() == Some('{') {
        // The rule set consumes the brace.
        return Ok(tree.parent(node));
    }

    Ok(Some(create_child(
        tree,
        node,
        NodeKind::Any(AnyKind::Unknown),
    )?))
}

fn process_declaration(
    tree: &mut TokenTree,
    node: NodeId,
    stream: &mut CharStream,
    options: CssOptions,
    has_colon: bool,
) -> Result<Option<NodeId>, ParseError> {
    if let Some(next) = process_base(tree, node, stream, options)? {
        return Ok(Some(next));
    }

    let has_value = tree
        .children(node)
        .iter()
        .any(|&c| matches!(tree.kind(c), NodeKind::Value));
    if has_value {
        return Ok(tree.parent(node));
    }

    if has_colon {
        return Ok(Some(create_child(tree, node, NodeKind::Value)?));
    }

    let has_property = tree
        .children(node)
        .iter()
        .any(|&c| matches!(tree.kind(c), NodeKind::Property));
    if has_property {
        if stream.current() == Some(':') {
            tree.set_kind(node, NodeKind::Declaration { has_colon: true });
            let _ = create_delimiter_child(tree, node, stream)?;
            return Ok(Some(node));
        }
    } else {
        if stream.is_identifier_start(0) {
            return Ok(Some(create_child(tree, node, NodeKind::Property)?));
        }
        // IE <= 7 star-property hack: `*width: …` keeps the star.
        if stream.current() == Some('*') {
            let child = create_child(tree, node, NodeKind::Property)?;
            let taken = stream.take(1);
            consume(tree, child, &taken)?;
            return Ok(Some(child));
        }
    }

    Err(invalid_character(tree, node, stream))
}

fn process_property(
    tree: &mut TokenTree,
    node: NodeId,
    stream: &mut CharStream,
) -> Result<Option<NodeId>, ParseError> {
    let identifier = stream.take_identifier()?;
    consume(tree, node, &identifier)?;
    Ok(tree.parent(node))
}

fn process_value(
    tree: &mut TokenTree,
    node: NodeId,
    stream: &mut CharStream,
    options: CssOptions,
) -> Result<Option<NodeId>, ParseError> {
    if let Some(next) = process_base(tree, node, stream, options)? {
        return Ok(Some(next));
    }

    // A nested-property block closes the value.
    if tree
        .children(node)
        .iter()
        .any(|&c| matches!(tree.kind(c), NodeKind::Block))
    {
        return Ok(tree.parent(node));
    }

    match stream.current() {
        Some('{') => Ok(Some(create_child(tree, node, NodeKind::Block)?)),
        Some('@') => Ok(Some(create_child(tree, node, NodeKind::AtKeyword)?)),
        Some('}' | ';') => Ok(tree.parent(node)),
        _ => Ok(Some(create_child(
            tree,
            node,
            NodeKind::Any(AnyKind::Unknown),
        )?)),
    }
}

fn process_any(
    tree: &mut TokenTree,
    node: NodeId,
    stream: &mut CharStream,
    options: CssOptions,
    any: AnyKind,
) -> Result<Option<NodeId>, ParseError> {
    if let Some(next) = process_base(tree, node, stream, options)? {
        return Ok(Some(next));
    }

    // Compound tokens keep collecting children until their closer.
    if matches!(any, AnyKind::Function | AnyKind::Set | AnyKind::List) {
        let closer = if any == AnyKind::List { ']' } else { ')' };
        if stream.current() == Some(closer) {
            let _ = create_delimiter_child(tree, node, stream)?;
            return Ok(tree.parent(node));
        }
        if stream.current() == Some(',') {
            let _ = create_delimiter_child(tree, node, stream)?;
            return Ok(Some(node));
        }
        return Ok(Some(create_child(
            tree,
            node,
            NodeKind::Any(AnyKind::Unknown),
        )?));
    }

    // First call on a fresh token: classify by the leading character.
    if stream.is_identifier_start(0) {
        let identifier = stream.take_identifier()?;
        if stream.current() == Some('(') {
            if identifier == "url" {
                tree.set_kind(node, NodeKind::Any(AnyKind::Uri));
                consume(tree, node, &identifier)?;
                let taken = stream.take(1);
                consume(tree, node, &taken)?;
                let ws = stream.take_whitespace();
                consume(tree, node, &ws)?;
                let uri = stream.take_uri()?;
                consume(tree, node, &uri)?;
                let ws = stream.take_whitespace();
                consume(tree, node, &ws)?;
                if stream.current() == Some(')') {
                    let taken = stream.take(1);
                    consume(tree, node, &taken)?;
                    return Ok(tree.parent(node));
                }
                return Err(invalid_character(tree, node, stream));
            }
            tree.set_kind(node, NodeKind::Any(AnyKind::Function));
            let name = tree.alloc_with_data(NodeKind::Any(AnyKind::Ident), identifier);
            add_child(tree, node, name)?;
            let _ = create_delimiter_child(tree, node, stream)?;
            return Ok(Some(node));
        }
        tree.set_kind(node, NodeKind::Any(AnyKind::Ident));
        consume(tree, node, &identifier)?;
        return Ok(tree.parent(node));
    }

    if stream.is_number_start(0) {
        let number = stream.take_number()?;
        consume(tree, node, &number)?;
        if stream.current() == Some('%') {
            tree.set_kind(node, NodeKind::Any(AnyKind::Percentage));
            let taken = stream.take(1);
            consume(tree, node, &taken)?;
        } else if stream.is_identifier_start(0) {
            tree.set_kind(node, NodeKind::Any(AnyKind::Dimension));
            let unit = stream.take_identifier()?;
            consume(tree, node, &unit)?;
        } else {
            tree.set_kind(node, NodeKind::Any(AnyKind::Number));
        }
        return Ok(tree.parent(node));
    }

    if stream.is_string_start(0) {
        tree.set_kind(node, NodeKind::Any(AnyKind::Str));
        let string = stream.take_string()?;
        consume(tree, node, &string)?;
        return Ok(tree.parent(node));
    }

    match stream.current() {
        Some('#') => {
            tree.set_kind(node, NodeKind::Any(AnyKind::Hash));
            let taken = stream.take(1);
            consume(tree, node, &taken)?;
            let name = stream.take_name()?;
            consume(tree, node, &name)?;
            Ok(tree.parent(node))
        }
        Some('(') => {
            tree.set_kind(node, NodeKind::Any(AnyKind::Set));
            let _ = create_delimiter_child(tree, node, stream)?;
            Ok(Some(node))
        }
        Some('[') => {
            tree.set_kind(node, NodeKind::Any(AnyKind::List));
            let _ = create_delimiter_child(tree, node, stream)?;
            Ok(Some(node))
        }
        // `!important` and friends are not officially identifiers, but
        // treating them as one makes many things a whole lot easier.
        Some('!') if stream.is_identifier_start(1) => {
            tree.set_kind(node, NodeKind::Any(AnyKind::Ident));
            let taken = stream.take(1);
            consume(tree, node, &taken)?;
            let identifier = stream.take_identifier()?;
            consume(tree, node, &identifier)?;
            Ok(tree.parent(node))
        }
        _ => {
            tree.set_kind(node, NodeKind::Any(AnyKind::Delim));
            let taken = stream.take(1);
            consume(tree, node, &taken)?;
            // Two-character comparison operators.
            if "=!<>".contains(tree.data(node)) && stream.current() == Some('=') {
                let taken = stream.take(1);
                consume(tree, node, &taken)?;
            }
            Ok(tree.parent(node))
        }
    }
}

fn process_comment(
    tree: &mut TokenTree,
    node: NodeId,
    stream: &mut CharStream,
    single_line: bool,
) -> Result<Option<NodeId>, ParseError> {
    let mut single_line = single_line;
    if tree.data(node).chars().count() == 2 && tree.data(node).ends_with('/') {
        single_line = true;
        tree.set_kind(node, NodeKind::Comment { single_line });
    }

    if single_line {
        while !(stream.is_end_of_file(0) || stream.is_newline(0)) {
            let taken = stream.take(1);
            consume(tree, node, &taken)?;
        }
    } else {
        while !(stream.is_end_of_file(0) || stream.is_comment_end(0)) {
            let taken = stream.take(1);
            consume(tree, node, &taken)?;
        }
        if stream.is_comment_end(0) {
            let taken = stream.take(2);
            consume(tree, node, &taken)?;
        }
    }

    Ok(tree.parent(node))
}

fn process_whitespace(
    tree: &mut TokenTree,
    node: NodeId,
    stream: &mut CharStream,
) -> Result<Option<NodeId>, ParseError> {
    let ws = stream.take_whitespace();
    consume(tree, node, &ws)?;
    Ok(tree.parent(node))
}

fn process_scss_variable(
    tree: &mut TokenTree,
    node: NodeId,
    stream: &mut CharStream,
) -> Result<Option<NodeId>, ParseError> {
    if !stream.is_variable_start(0) {
        return Err(stream.error("SCSS variables must start with a $"));
    }

    let sigil = stream.take(1);
    consume(tree, node, &sigil)?;
    let name = stream.take_identifier()?;
    consume(tree, node, &name)?;
    Ok(tree.parent(node))
}

fn process_scss_assignment(
    tree: &mut TokenTree,
    node: NodeId,
    stream: &mut CharStream,
    options: CssOptions,
    has_colon: bool,
) -> Result<Option<NodeId>, ParseError> {
    if let Some(next) = process_base(tree, node, stream, options)? {
        return Ok(Some(next));
    }

    let has_value = tree
        .children(node)
        .iter()
        .any(|&c| matches!(tree.kind(c), NodeKind::Value));
    if has_value {
        if stream.current() == Some(';') {
            // Swallow the terminator so the enclosing rule set never sees
            // a stray semicolon belonging to an assignment.
            let _ = stream.take(1);
        }
        return Ok(tree.parent(node));
    }

    if has_colon {
        return Ok(Some(create_child(tree, node, NodeKind::Value)?));
    }

    let has_variable = tree
        .children(node)
        .iter()
        .any(|&c| matches!(tree.kind(c), NodeKind::ScssVariable));
    if has_variable && stream.current() == Some(':') {
        tree.set_kind(node, NodeKind::ScssAssignment { has_colon: true });
        let _ = create_delimiter_child(tree, node, stream)?;
        return Ok(Some(node));
    }

    Err(invalid_character(tree, node, stream))
}

/// Look-ahead distinguishing SCSS nested rules from declarations.
///
/// A leading identifier inside a block may open either `prop: value;` or
/// `a:hover { … }`. Scan (without consuming) for the first of `{`, `:`, `}`:
/// a `{` means rule set; a `:` followed by a non-identifier means
/// declaration; a `:` followed by an identifier stays ambiguous and the scan
/// repeats over `{};:` until something decides it.
fn rule_set_vs_declaration_lookahead(
    tree: &mut TokenTree,
    node: NodeId,
    stream: &mut CharStream,
) -> Result<Option<NodeId>, ParseError> {
    let (character, offset) = stream.find_first_delimiter("{:}", 0);
    if character.is_none() || character == Some('}') {
        return Ok(None);
    }
    if character == Some('{') {
        return Ok(Some(create_child(
            tree,
            node,
            NodeKind::RuleSet { is_opened: false },
        )?));
    }
    if !stream.is_identifier_start(offset + 1) {
        return Ok(Some(create_child(
            tree,
            node,
            NodeKind::Declaration { has_colon: false },
        )?));
    }

    // The character was a colon and an identifier followed; that first
    // identifier could still mean anything (`color: red` or `a:hover {`).
    let mut offset = offset;
    loop {
        let (character, next_offset) = stream.find_first_delimiter("{};:", offset + 1);
        offset = next_offset;
        match character {
            Some('{') => {
                return Ok(Some(create_child(
                    tree,
                    node,
                    NodeKind::RuleSet { is_opened: false },
                )?));
            }
            Some('}' | ';') | None => {
                return Ok(Some(create_child(
                    tree,
                    node,
                    NodeKind::Declaration { has_colon: false },
                )?));
            }
            Some(_) if !stream.is_identifier_start(offset + 1) => {
                return Ok(Some(create_child(
                    tree,
                    node,
                    NodeKind::Declaration { has_colon: false },
                )?));
            }
            Some(_) => {}
        }
    }
}
