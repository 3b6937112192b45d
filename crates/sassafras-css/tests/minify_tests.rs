//! Minifier tests: parse-then-serialize with the stripping options, no
//! compile pass; the cssmin pipeline.

use sassafras_css::CssOptions;

fn minify(source: &str) -> String {
    let options = CssOptions {
        strip_white_space: true,
        strip_comments: true,
        minimize_values: true,
        strip_extra_semicolons: true,
        compile_scss: true,
        ..CssOptions::default()
    };
    let tree = sassafras_css::parse(source, options).expect("parse failed");
    sassafras_css::to_css(&tree, options)
}

fn round_trip(source: &str) -> String {
    let tree = sassafras_css::parse(source, CssOptions::default()).expect("parse failed");
    sassafras_css::to_css(&tree, CssOptions::default())
}

#[test]
fn test_whitespace_stripping() {
    assert_eq!(minify("a { color: red; }"), "a{color:red}");
    assert_eq!(
        minify("a {\n  color: red;\n  width: 1px;\n}"),
        "a{color:red;width:1px}"
    );
}

#[test]
fn test_descendant_selector_keeps_one_space() {
    assert_eq!(minify("a b { color: red; }"), "a b{color:red}");
}

#[test]
fn test_comment_stripping() {
    assert_eq!(minify("/* note */ a { /* x */ color: red; }"), "a{color:red}");
}

#[test]
fn test_loud_comments_survive() {
    assert_eq!(
        minify("/*! legal */ a { color: red; }"),
        "/*! legal */a{color:red}"
    );
}

#[test]
fn test_loud_line_comment_becomes_block() {
    assert_eq!(minify("//! keep\na { color: red; }"), "/*! keep*/a{color:red}");
}

#[test]
fn test_extra_semicolons_collapse() {
    assert_eq!(minify("a { color: red;; }"), "a{color:red}");
}

#[test]
fn test_color_folding() {
    assert_eq!(minify("a { color: #ff0000; }"), "a{color:red}");
    assert_eq!(minify("a { color: rgb(255, 0, 0); }"), "a{color:red}");
    assert_eq!(minify("a { color: rgba(0, 0, 0, 0); }"), "a{color:transparent}");
    assert_eq!(minify("a { color: #ffaa00; }"), "a{color:#fa0}");
}

#[test]
fn test_border_none_becomes_zero() {
    assert_eq!(minify("a { border: none; }"), "a{border:0}");
    assert_eq!(minify("a { outline: none; }"), "a{outline:0}");
    // Other properties keep their `none`.
    assert_eq!(minify("a { display: none; }"), "a{display:none}");
}

#[test]
fn test_leading_zero_stripping() {
    assert_eq!(minify("a { width: 0.5px; }"), "a{width:.5px}");
    assert_eq!(minify("a { width: 0px; }"), "a{width:0}");
    assert_eq!(minify("a { width: 007px; }"), "a{width:7px}");
}

#[test]
fn test_url_quote_collapse() {
    assert_eq!(
        minify("a { background: url(\"foo.png\"); }"),
        "a{background:url(foo.png)}"
    );
}

#[test]
fn test_empty_rule_set_vanishes() {
    assert_eq!(minify("a { }\nb { color: red; }"), "b{color:red}");
}

#[test]
fn test_media_block_minifies() {
    assert_eq!(
        minify("@media screen {\n  a { color: red; }\n}"),
        "@media screen{a{color:red}}"
    );
}

#[test]
fn test_round_trip_preserves_plain_css() {
    let source = "a {\n  color: red;\n}\n";
    assert_eq!(round_trip(source), source);
}

#[test]
fn test_round_trip_preserves_comments_and_at_rules() {
    let source = "/* head */\n@media screen {\n  a {\n    margin: 0 auto;\n  }\n}\n";
    assert_eq!(round_trip(source), source);
}

#[test]
fn test_round_trip_preserves_strings_and_urls() {
    let source = "a {\n  background: url( \"img.png\" ) no-repeat;\n  content: \"x\";\n}\n";
    assert_eq!(round_trip(source), source);
}

#[test]
fn test_minified_output_reparses_cleanly() {
    let minified = minify("a { color: #ff0000; border: none; }");
    assert_eq!(minified, "a{color:red;border:0}");
    // Property 2: the minified form is itself valid CSS.
    assert_eq!(minify(&minified), minified);
}

#[test]
fn test_colorize_emits_ansi_sequences() {
    let options = CssOptions {
        colorize: true,
        ..CssOptions::default()
    };
    let tree = sassafras_css::parse("a { color: red; }", options).expect("parse failed");
    let output = sassafras_css::to_css(&tree, options);
    assert!(output.contains('\u{1b}'), "no ANSI escapes in: {output:?}");
    // The plain text is still in there.
    assert!(output.contains("color"));
}
