//! End-to-end compiler tests: SCSS in, minimized CSS out.

use sassafras_css::{Compiler, CssOptions};

/// Compile with the full minimizing option set, which keeps expected
/// strings short and unambiguous.
fn compile_min(source: &str) -> String {
    let options = CssOptions {
        strip_white_space: true,
        strip_comments: true,
        minimize_values: true,
        strip_extra_semicolons: true,
        compile_scss: true,
        ..CssOptions::default()
    };
    sassafras_css::compile_str(source, options).expect("compile failed")
}

#[test]
fn test_plain_css_passes_through() {
    assert_eq!(compile_min("a { color: red; }"), "a{color:red}");
}

#[test]
fn test_variable_substitution() {
    assert_eq!(
        compile_min("$c: blue; a { color: $c; }"),
        "a{color:blue}"
    );
}

#[test]
fn test_variable_scoping_is_lexical() {
    assert_eq!(
        compile_min("a { $local: 1px; width: $local; } b { height: 2px; }"),
        "a{width:1px}b{height:2px}"
    );
}

#[test]
fn test_nested_rule_flattening() {
    assert_eq!(
        compile_min("a { b { color: red; } }"),
        "a b{color:red}"
    );
}

#[test]
fn test_nested_rules_preserve_order() {
    assert_eq!(
        compile_min("a { b { color: red; } i { color: blue; } }"),
        "a b{color:red}a i{color:blue}"
    );
}

#[test]
fn test_ampersand_cross_product() {
    assert_eq!(
        compile_min("a, b { &:hover { color: red; } }"),
        "a:hover,b:hover{color:red}"
    );
}

#[test]
fn test_nested_rule_with_multiple_parents() {
    assert_eq!(
        compile_min("a, b { i { color: red; } }"),
        "a i,b i{color:red}"
    );
}

#[test]
fn test_mixin_with_default_argument() {
    assert_eq!(
        compile_min("@mixin m($x: 1px) { width: $x; } a { @include m; }"),
        "a{width:1px}"
    );
}

#[test]
fn test_mixin_with_positional_argument() {
    assert_eq!(
        compile_min("@mixin m($x) { width: $x; } a { @include m(2px); }"),
        "a{width:2px}"
    );
}

#[test]
fn test_mixin_with_keyword_argument() {
    assert_eq!(
        compile_min(
            "@mixin m($x: 1px, $y: 2px) { margin: $x $y; } a { @include m($y: 3px); }"
        ),
        "a{margin:1px 3px}"
    );
}

#[test]
fn test_interpolation_in_value() {
    assert_eq!(
        compile_min("a { width: #{1+1}px; }"),
        "a{width:2px}"
    );
}

#[test]
fn test_interpolation_in_selector() {
    assert_eq!(
        compile_min("$side: left; .#{$side} { margin: 1px; }"),
        ".left{margin:1px}"
    );
}

#[test]
fn test_expression_in_value() {
    assert_eq!(compile_min("a { width: 2px * 3; }"), "a{width:6px}");
}

#[test]
fn test_if_takes_the_true_branch() {
    assert_eq!(
        compile_min("a { @if 1 < 2 { color: red; } @else { color: blue; } }"),
        "a{color:red}"
    );
}

#[test]
fn test_if_falls_through_to_else() {
    assert_eq!(
        compile_min("a { @if 1 > 2 { color: red; } @else { color: blue; } }"),
        "a{color:blue}"
    );
}

#[test]
fn test_else_if_chain() {
    assert_eq!(
        compile_min(
            "a { @if 1 > 2 { color: red; } @else if 2 > 1 { color: green; } @else { color: blue; } }"
        ),
        "a{color:green}"
    );
}

#[test]
fn test_function_definition_and_call() {
    assert_eq!(
        compile_min("@function double($x) { @return $x * 2; } a { width: double(2px); }"),
        "a{width:4px}"
    );
}

#[test]
fn test_function_with_local_assignment() {
    assert_eq!(
        compile_min(
            "@function pad($x) { $base: 2px; @return $x + $base; } a { width: pad(3px); }"
        ),
        "a{width:5px}"
    );
}

#[test]
fn test_builtin_in_value_position() {
    assert_eq!(
        compile_min("a { width: if(true, 1px, 2px); }"),
        "a{width:1px}"
    );
    assert_eq!(
        compile_min("a { color: darken(white, 50%); }"),
        "a{color:gray}"
    );
}

#[test]
fn test_extend_appends_selector() {
    assert_eq!(
        compile_min(".error { color: red; } .big { @extend .error; font-size: 2px; }"),
        ".error,.big{color:red}.big{font-size:2px}"
    );
}

#[test]
fn test_nested_properties_flatten() {
    assert_eq!(
        compile_min("a { font: { family: serif; } }"),
        "a{font-family:serif}"
    );
}

#[test]
fn test_default_assignment_defers_to_existing_binding() {
    assert_eq!(
        compile_min("$c: red; $c: blue !default; a { color: $c; }"),
        "a{color:red}"
    );
    assert_eq!(
        compile_min("$c: blue !default; a { color: $c; }"),
        "a{color:blue}"
    );
}

#[test]
fn test_warn_is_removed_from_output() {
    assert_eq!(
        compile_min("a { @warn \"careful\"; color: red; }"),
        "a{color:red}"
    );
}

#[test]
fn test_media_query_passes_through() {
    assert_eq!(
        compile_min("@media screen { a { color: red; } }"),
        "@media screen{a{color:red}}"
    );
}

#[test]
fn test_compile_is_idempotent() {
    let options = CssOptions {
        strip_white_space: true,
        minimize_values: true,
        strip_extra_semicolons: true,
        compile_scss: true,
        ..CssOptions::default()
    };
    let mut tree = sassafras_css::parse("a { b { color: red; } }", options).unwrap();
    Compiler::new().compile(&mut tree, options).unwrap();
    let once = sassafras_css::to_css(&tree, options);

    Compiler::new().compile(&mut tree, options).unwrap();
    let twice = sassafras_css::to_css(&tree, options);
    assert_eq!(once, twice);
}

#[test]
fn test_import_splices_rules_and_variables() {
    let dir = std::env::temp_dir().join("sassafras-import-rules");
    std::fs::create_dir_all(&dir).unwrap();
    std::fs::write(
        dir.join("part.scss"),
        "$imported: 5px;\nc { margin: $imported; }\n",
    )
    .unwrap();

    let options = CssOptions {
        strip_white_space: true,
        minimize_values: true,
        strip_extra_semicolons: true,
        compile_scss: true,
        ..CssOptions::default()
    };
    let mut tree =
        sassafras_css::parse("@import \"part\";\na { width: $imported; }", options).unwrap();
    let mut compiler = Compiler::new();
    compiler.importer_mut().add_path(dir);
    compiler.compile(&mut tree, options).unwrap();

    assert_eq!(
        sassafras_css::to_css(&tree, options),
        "c{margin:5px}a{width:5px}"
    );
}

#[test]
fn test_import_partial_contributes_variables_only() {
    let dir = std::env::temp_dir().join("sassafras-import-partial");
    std::fs::create_dir_all(&dir).unwrap();
    std::fs::write(dir.join("_vars.scss"), "$x: 3px;\n").unwrap();

    let options = CssOptions {
        strip_white_space: true,
        minimize_values: true,
        strip_extra_semicolons: true,
        compile_scss: true,
        ..CssOptions::default()
    };
    let mut tree =
        sassafras_css::parse("@import \"vars\";\na { width: $x; }", options).unwrap();
    let mut compiler = Compiler::new();
    compiler.importer_mut().add_path(dir);
    compiler.compile(&mut tree, options).unwrap();

    assert_eq!(sassafras_css::to_css(&tree, options), "a{width:3px}");
}

#[test]
fn test_missing_import_raises() {
    let options = CssOptions {
        compile_scss: true,
        ..CssOptions::default()
    };
    let mut tree = sassafras_css::parse("@import \"no-such-file\";", options).unwrap();
    assert!(Compiler::new().compile(&mut tree, options).is_err());
}

#[test]
fn test_css_import_stays_untouched() {
    assert_eq!(
        compile_min("@import \"theme.css\";a{color:red}"),
        "@import \"theme.css\";a{color:red}"
    );
}

#[test]
fn test_undefined_mixin_raises() {
    let options = CssOptions {
        compile_scss: true,
        ..CssOptions::default()
    };
    let mut tree = sassafras_css::parse("a { @include ghost; }", options).unwrap();
    assert!(Compiler::new().compile(&mut tree, options).is_err());
}

#[test]
fn test_undefined_variable_raises() {
    let options = CssOptions {
        compile_scss: true,
        ..CssOptions::default()
    };
    let mut tree = sassafras_css::parse("a { width: $ghost + 1px; }", options).unwrap();
    assert!(Compiler::new().compile(&mut tree, options).is_err());
}
