//! Tree-to-text serialization.
//!
//! Every node kind contributes its own print, and the options decide how
//! much of the original formatting survives: whitespace stripping keeps a
//! single significant space between value tokens and drops the rest, extra
//! semicolons collapse, comments vanish unless loud (`/*!`), and value
//! minimization folds colors and zero-ish values into their shortest form.
//! `colorize` wraps prints in ANSI colors per token kind for terminals.

use owo_colors::OwoColorize;

use sassafras_tree::{AnyKind, NodeId, NodeKind, TokenTree};

use crate::options::CssOptions;
use crate::stream::CharStream;
use crate::tokens;
use crate::value::Color;

/// Serialize the whole tree.
#[must_use]
pub fn to_css(tree: &TokenTree, options: CssOptions) -> String {
    node_to_css(tree, tree.root(), options)
}

/// Serialize a list of nodes back to back (selector comparison and error
/// context use this).
#[must_use]
pub fn node_list_to_css(tree: &TokenTree, ids: &[NodeId], options: CssOptions) -> String {
    ids.iter().map(|&id| node_to_css(tree, id, options)).collect()
}

/// Serialize one node.
#[must_use]
pub fn node_to_css(tree: &TokenTree, id: NodeId, options: CssOptions) -> String {
    match tree.kind(id) {
        NodeKind::StyleSheet => style_sheet_to_css(tree, id, options),
        NodeKind::AtRule => at_rule_to_css(tree, id, options),
        NodeKind::AtKeyword => paint(tree.data(id).to_string(), options, Paint::Green),
        NodeKind::Block => block_to_css(tree, id, options),
        NodeKind::RuleSet { .. } => rule_set_to_css(tree, id, options),
        NodeKind::Selector => selector_to_css(tree, id, options),
        NodeKind::Declaration { .. } => declaration_to_css(tree, id, options),
        NodeKind::Property => paint(tree.data(id).to_string(), options, Paint::Magenta),
        NodeKind::Value => value_to_css(tree, id, options),
        NodeKind::Any(any) => any_to_css(tree, id, options, any),
        NodeKind::Comment { single_line } => comment_to_css(tree, id, options, single_line),
        NodeKind::WhiteSpace => {
            if options.strip_white_space {
                " ".to_string()
            } else {
                tree.data(id).to_string()
            }
        }
        NodeKind::ScssVariable => paint(tree.data(id).to_string(), options, Paint::BrightBlue),
        // Assignments never reach the CSS output.
        NodeKind::ScssAssignment { .. } => String::new(),
    }
}

/// ANSI styles per token kind.
#[derive(Clone, Copy)]
enum Paint {
    Green,
    Cyan,
    Magenta,
    BrightCyan,
    BrightBlue,
}

fn paint(text: String, options: CssOptions, style: Paint) -> String {
    if !options.colorize {
        return text;
    }
    match style {
        Paint::Green => format!("{}", text.green()),
        Paint::Cyan => format!("{}", text.cyan()),
        Paint::Magenta => format!("{}", text.magenta()),
        Paint::BrightCyan => format!("{}", text.bright_cyan()),
        Paint::BrightBlue => format!("{}", text.bright_blue()),
    }
}

fn style_sheet_to_css(tree: &TokenTree, id: NodeId, options: CssOptions) -> String {
    let mut out = String::new();
    for &child in tree.children(id) {
        if options.strip_white_space && matches!(tree.kind(child), NodeKind::WhiteSpace) {
            continue;
        }
        out.push_str(&node_to_css(tree, child, options));
    }
    out
}

fn at_rule_to_css(tree: &TokenTree, id: NodeId, options: CssOptions) -> String {
    let mut out = String::new();
    for &child in tree.children(id) {
        if options.strip_white_space && matches!(tree.kind(child), NodeKind::WhiteSpace) {
            let next_boundary = tree
                .next_sibling(child, true)
                .is_some_and(|s| tree.is_boundary(s));
            let prev_boundary = tree
                .prev_sibling(child, true)
                .is_some_and(|s| tree.is_boundary(s));
            if tree.is_first_child(child, true)
                || tree.is_last_child(child, true)
                || next_boundary
                || prev_boundary
            {
                continue;
            }
        }
        out.push_str(&node_to_css(tree, child, options));
    }
    out
}

fn block_to_css(tree: &TokenTree, id: NodeId, options: CssOptions) -> String {
    let mut out = String::new();
    for &child in tree.children(id) {
        if options.strip_white_space && matches!(tree.kind(child), NodeKind::WhiteSpace) {
            let next_boundary = tree
                .next_sibling(child, false)
                .is_some_and(|s| tree.is_boundary(s));
            let prev_boundary = tree
                .prev_sibling(child, false)
                .is_some_and(|s| tree.is_boundary(s));
            if tree.is_first_child(child, false)
                || tree.is_last_child(child, false)
                || next_boundary
                || prev_boundary
            {
                continue;
            }
        }
        if options.strip_extra_semicolons
            && tree.is_delimiter(child, ";")
            && tree
                .next_sibling(child, true)
                .is_some_and(|s| tree.is_delimiter(s, ""))
        {
            continue;
        }
        out.push_str(&node_to_css(tree, child, options));
    }
    out
}

fn rule_set_to_css(tree: &TokenTree, id: NodeId, options: CssOptions) -> String {
    // Nothing worth printing in an empty rule set.
    if options.minimize_values && tokens::declarations_of(tree, id).is_empty() {
        return String::new();
    }

    let mut out = String::new();
    for &child in tree.children(id) {
        if options.strip_white_space && matches!(tree.kind(child), NodeKind::WhiteSpace) {
            continue;
        }
        if options.strip_extra_semicolons
            && tree.is_delimiter(child, ";")
            && tree
                .next_sibling(child, true)
                .is_some_and(|s| tree.is_delimiter(s, ""))
        {
            continue;
        }
        out.push_str(&node_to_css(tree, child, options));
    }
    out
}

fn selector_to_css(tree: &TokenTree, id: NodeId, options: CssOptions) -> String {
    // Children print uncolored; the selector is colored as one unit.
    let inner_options = CssOptions {
        colorize: false,
        ..options
    };
    let mut out = String::new();
    for &child in tree.children(id) {
        if options.strip_white_space
            && matches!(tree.kind(child), NodeKind::WhiteSpace)
            && tree.is_last_child(child, false)
        {
            continue;
        }
        out.push_str(&node_to_css(tree, child, inner_options));
    }
    paint(out, options, Paint::Cyan)
}

fn declaration_to_css(tree: &TokenTree, id: NodeId, options: CssOptions) -> String {
    if options.strip_white_space {
        if let (Some(property), Some(value)) =
            (tokens::property_of(tree, id), tokens::value_of(tree, id))
        {
            return format!(
                "{}:{}",
                node_to_css(tree, property, options),
                node_to_css(tree, value, options)
            );
        }
    }
    let mut out = String::new();
    for &child in tree.children(id) {
        out.push_str(&node_to_css(tree, child, options));
    }
    out
}

fn value_to_css(tree: &TokenTree, id: NodeId, options: CssOptions) -> String {
    let children = if options.strip_white_space {
        tokens::stripped_value_children(tree, id)
    } else {
        tree.children(id).to_vec()
    };

    let mut out = String::new();
    for child in children {
        // These minimizations are only valid in the context of a value.
        if options.minimize_values && tree.is_any(child) {
            if matches!(
                tree.kind(child),
                NodeKind::Any(AnyKind::Ident | AnyKind::Hash)
            ) {
                if let Ok(color) = Color::from_node(tree, child) {
                    out.push_str(&paint(color.to_css(), options, Paint::BrightBlue));
                    continue;
                }
            }

            if tree.is_keyword(child, "none") && none_collapses_to_zero(tree, id) {
                out.push_str(&paint("0".to_string(), options, Paint::BrightBlue));
                continue;
            }
        }

        out.push_str(&node_to_css(tree, child, options));
    }
    out
}

/// `none` means `0` for the shorthand properties that accept both.
fn none_collapses_to_zero(tree: &TokenTree, value: NodeId) -> bool {
    let Some(parent) = tree.parent(value) else {
        return false;
    };
    if !matches!(tree.kind(parent), NodeKind::Declaration { .. }) {
        return false;
    }
    tokens::property_of(tree, parent).is_some_and(|property| {
        matches!(
            tree.data(property),
            "border"
                | "border-top"
                | "border-right"
                | "border-bottom"
                | "border-left"
                | "outline"
                | "background"
        )
    })
}

fn any_to_css(tree: &TokenTree, id: NodeId, options: CssOptions, any: AnyKind) -> String {
    if !tree.children(id).is_empty() {
        // Compound token: function, set, or list.
        if options.minimize_values && any == AnyKind::Function {
            if let Ok(name) = tokens::function_name(tree, id) {
                if matches!(name.as_str(), "rgb" | "rgba" | "hsl" | "hsla") {
                    if let Ok(color) = Color::from_node(tree, id) {
                        return paint(color.to_css(), options, Paint::BrightBlue);
                    }
                }
            }
        }

        let mut out = String::new();
        for &child in tree.children(id) {
            if options.strip_white_space && matches!(tree.kind(child), NodeKind::WhiteSpace) {
                let next_boundary = tree
                    .next_sibling(child, false)
                    .is_some_and(|s| tree.is_boundary(s));
                let prev_boundary = tree
                    .prev_sibling(child, false)
                    .is_some_and(|s| tree.is_boundary(s));
                if next_boundary || prev_boundary {
                    continue;
                }
            }
            out.push_str(&node_to_css(tree, child, options));
        }
        return out;
    }

    let mut data = tree.data(id).to_string();
    if any == AnyKind::Uri && options.strip_white_space {
        data = format!("url({})", uri_body(tree, id, options));
    } else if options.minimize_values
        && matches!(any, AnyKind::Number | AnyKind::Percentage | AnyKind::Dimension)
    {
        data = strip_leading_zeros(&data);
    }

    if any == AnyKind::Delim {
        data
    } else {
        paint(data, options, Paint::BrightCyan)
    }
}

/// Leading zeros go; a bare zero measurement collapses to `0`.
fn strip_leading_zeros(data: &str) -> String {
    let mut rest = data;
    let mut stripped = false;
    while rest.len() > 1 && rest.starts_with('0') {
        stripped = true;
        rest = &rest[1..];
    }
    if stripped && !rest.starts_with(|c: char| c == '.' || c.is_ascii_digit()) {
        // Only a unit was left; the measurement itself was zero.
        return "0".to_string();
    }
    rest.to_string()
}

/// The body of a `url(…)` token, with the quotes collapsed when the inner
/// text is plain URL characters.
fn uri_body(tree: &TokenTree, id: NodeId, options: CssOptions) -> String {
    let data = tree.data(id);
    let chars: Vec<char> = data.chars().collect();
    let inner: String = chars[4..chars.len() - 1].iter().collect();
    let mut url = inner.trim().to_string();

    if options.minimize_values && url.chars().count() >= 2 {
        let quoted = (url.starts_with('\'') && url.ends_with('\''))
            || (url.starts_with('"') && url.ends_with('"'));
        if quoted {
            let body: String = {
                let c: Vec<char> = url.chars().collect();
                c[1..c.len() - 1].iter().collect()
            };
            let stream = CharStream::new(&body, false);
            let url_chars_only =
                (0..body.chars().count()).all(|i| stream.is_url_char(i as isize));
            if url_chars_only {
                url = body;
            }
        }
    }
    url
}

fn comment_to_css(
    tree: &TokenTree,
    id: NodeId,
    options: CssOptions,
    single_line: bool,
) -> String {
    let data = tree.data(id);
    // Loud comments survive every stripping mode.
    let loud = data.chars().nth(2) == Some('!');
    let strip = (options.strip_comments || single_line) && !loud;
    if strip {
        return String::new();
    }

    let comment = if single_line {
        let body: String = data.chars().skip(2).collect();
        format!("/*{body}*/")
    } else {
        data.to_string()
    };
    paint(comment, options, Paint::Green)
}
