//! Output and dialect options shared across the pipeline.

use serde::Serialize;

/// Options controlling parsing dialect and serialization.
///
/// Every stage takes the same options value: `compile_scss` switches the
/// parser into SCSS mode (`$var`, `#{…}`, `//` comments, nested rules), the
/// `strip_*`/`minimize_values` flags drive the serializer, and `import_css`
/// tells the importer whether imported rules reach the output or only their
/// variables do.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct CssOptions {
    /// Drop whitespace except where a single space is significant.
    pub strip_white_space: bool,
    /// Drop comments, except loud `/*!` comments.
    pub strip_comments: bool,
    /// Fold colors to their shortest form, collapse zero-ish values, strip
    /// leading zeros, elide empty rule sets.
    pub minimize_values: bool,
    /// Drop a `;` that is immediately followed by another delimiter.
    pub strip_extra_semicolons: bool,
    /// Wrap output in ANSI color sequences per token kind.
    pub colorize: bool,
    /// Enable the SCSS extensions in the parser.
    pub compile_scss: bool,
    /// Print strings without their surrounding quotes (used internally by
    /// interpolation).
    pub strip_quotes: bool,
    /// Whether `@import`ed stylesheets contribute rules to the output
    /// (partials switch this off and contribute variables only).
    pub import_css: bool,
}

impl Default for CssOptions {
    fn default() -> Self {
        CssOptions {
            strip_white_space: false,
            strip_comments: false,
            minimize_values: false,
            strip_extra_semicolons: false,
            colorize: false,
            compile_scss: false,
            strip_quotes: false,
            import_css: true,
        }
    }
}

impl CssOptions {
    /// Options for the minifier: strip everything strippable and minimize
    /// values.
    #[must_use]
    pub fn minified() -> Self {
        CssOptions {
            strip_white_space: true,
            strip_comments: true,
            minimize_values: true,
            strip_extra_semicolons: true,
            ..CssOptions::default()
        }
    }

    /// Builder-style toggle for SCSS mode.
    #[must_use]
    pub fn with_scss(mut self, enabled: bool) -> Self {
        self.compile_scss = enabled;
        self
    }
}
