//! SCSS-to-CSS compiler and CSS minifier core for sassafras.
//!
//! # Scope
//!
//! This crate implements the full pipeline from source text to compiled
//! output, all operating on the shared token tree from `sassafras-tree`:
//!
//! - **Character stream**: cursor with line/column tracking, the CSS
//!   character classes, and composite takers for identifiers, numbers,
//!   strings, and URLs; SCSS `#{…}` fragments survive inside names.
//! - **Parser**: a token-state machine: each node kind owns its
//!   transition, and the driver loops until end of input. Strict: the
//!   first unexpected character raises with its location and a snippet.
//! - **Value algebra**: numbers with units (and unit conversion), strings,
//!   booleans, colors in dual RGB/HSL form, lists, and an escape hatch for
//!   everything else; arithmetic, comparisons, and truthiness.
//! - **Expression evaluator**: precedence climbing over value-token
//!   sequences, with SCSS's literal-slash rule.
//! - **Compiler**: in-place tree rewriting: variables and assignments,
//!   mixins and functions, `@if`/`@else`, `@import` with a cached importer,
//!   `@extend`, nested-rule and nested-property flattening, interpolation.
//! - **Serializer**: options-driven printing: whitespace/comment/extra-
//!   semicolon stripping, value minimization (color folding, `none` → `0`,
//!   leading zeros), ANSI colorizing.
//!
//! # Pipeline
//!
//! ```no_run
//! use sassafras_css::{parse, Compiler, CssOptions};
//!
//! # fn main() -> Result<(), sassafras_css::Error> {
//! let options = CssOptions {
//!     compile_scss: true,
//!     ..CssOptions::default()
//! };
//! let mut tree = parse("$c: blue; a { color: $c; }", options)?;
//! Compiler::new().compile(&mut tree, options)?;
//! let css = sassafras_css::to_css(&tree, options);
//! # let _ = css;
//! # Ok(())
//! # }
//! ```

/// Built-in SCSS functions.
pub mod builtins;
/// The tree-rewriting compiler.
pub mod compile;
/// Error types for the whole pipeline.
pub mod error;
/// Expression evaluation over value tokens.
pub mod expr;
/// Functions, mixins, and argument binding.
pub mod function;
/// `@import` search paths and cache.
pub mod importer;
/// Parsing and serialization options.
pub mod options;
/// The token-state-machine parser.
pub mod parser;
/// Lexical scopes.
pub mod scope;
/// Tree-to-text serialization.
pub mod serialize;
/// The character stream feeding the parser.
pub mod stream;
/// Shared queries over tree nodes.
pub mod tokens;
/// Typed values and their operators.
pub mod value;

// Re-exports for convenience
pub use compile::Compiler;
pub use error::{CompileError, Error, ParseError, Result};
pub use expr::Expression;
pub use importer::Importer;
pub use options::CssOptions;
pub use scope::Scope;
pub use serialize::{node_to_css, to_css};
pub use stream::CharStream;
pub use value::{Color, List, Number, Unit, Value};

pub use sassafras_tree::{AnyKind, NodeId, NodeKind, TokenTree};

/// Parse `source` into a token tree.
///
/// # Errors
/// Fails on the first character the grammar rejects.
pub fn parse(source: &str, options: CssOptions) -> Result<TokenTree> {
    Ok(parser::parse(source, options)?)
}

/// Parse, compile, and serialize in one call.
///
/// # Errors
/// Propagates parse and compile failures.
pub fn compile_str(source: &str, options: CssOptions) -> Result<String> {
    let mut tree = parse(source, options)?;
    Compiler::new().compile(&mut tree, options)?;
    Ok(to_css(&tree, options))
}
