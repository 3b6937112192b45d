//! Error types for the parse and compile pipeline.
//!
//! Two kinds of failure exist: [`ParseError`] from the character stream and
//! parser (carries a source location and a fragment snippet) and
//! [`CompileError`] from the tree rewriter and value algebra (carries the
//! print of the offending token's surroundings). Nothing in the pipeline
//! recovers or retries; errors unwind to the caller.

use thiserror::Error;

use sassafras_tree::TreeError;

/// Convenient result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, Error>;

/// Any error the pipeline can surface.
#[derive(Debug, Error)]
pub enum Error {
    /// Tokenizer/parser failure with source location.
    #[error(transparent)]
    Parse(#[from] ParseError),
    /// Compiler or value-algebra failure with token context.
    #[error(transparent)]
    Compile(#[from] CompileError),
    /// The only I/O in the pipeline: reading an `@import`ed file.
    #[error("could not read import: {0}")]
    Io(#[from] std::io::Error),
}

impl From<TreeError> for Error {
    fn from(err: TreeError) -> Self {
        Error::Compile(CompileError::new(err.to_string()))
    }
}

/// Failure while turning characters into the token tree.
///
/// The snippet is the ±10/+20 character neighborhood of the failure point
/// with newlines flattened, so the message stays one line.
#[derive(Debug)]
pub struct ParseError {
    message: String,
    /// 1-based line of the failure, if the stream position is known.
    pub line: Option<u32>,
    /// 1-based column of the failure, if the stream position is known.
    pub column: Option<u32>,
    /// Source neighborhood of the failure point.
    pub snippet: Option<String>,
    /// Print of the token being built, when one exists.
    pub token: Option<String>,
}

impl ParseError {
    /// A parse error without stream context.
    #[must_use]
    pub fn new(message: impl Into<String>) -> Self {
        ParseError {
            message: message.into(),
            line: None,
            column: None,
            snippet: None,
            token: None,
        }
    }

    /// Attach a source location and snippet.
    #[must_use]
    pub fn at(mut self, line: u32, column: u32, snippet: String) -> Self {
        self.line = Some(line);
        self.column = Some(column);
        self.snippet = Some(snippet);
        self
    }

    /// Attach the print of the token under construction.
    #[must_use]
    pub fn with_token(mut self, token: String) -> Self {
        self.token = Some(token);
        self
    }
}

impl std::fmt::Display for ParseError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)?;
        if self.line.is_some() || self.token.is_some() {
            write!(f, " (")?;
            let mut sep = "";
            if let (Some(line), Some(column)) = (self.line, self.column) {
                let snippet = self.snippet.as_deref().unwrap_or("");
                write!(
                    f,
                    "in fragment: \"{}\", at line {}, column {}",
                    snippet.replace('\n', ""),
                    line,
                    column
                )?;
                sep = ", ";
            }
            if let Some(token) = &self.token {
                write!(f, "{sep}while parsing token: \"{token}\"")?;
            }
            write!(f, ")")?;
        }
        Ok(())
    }
}

impl std::error::Error for ParseError {}

/// Failure while rewriting the tree or applying value operators.
#[derive(Debug)]
pub struct CompileError {
    message: String,
    /// `while processing <kind> in "<parent print>"`, when a token is known.
    pub context: Option<String>,
}

impl CompileError {
    /// A compile error without token context.
    #[must_use]
    pub fn new(message: impl Into<String>) -> Self {
        CompileError {
            message: message.into(),
            context: None,
        }
    }

    /// Attach the formatted token context.
    #[must_use]
    pub fn with_context(mut self, context: String) -> Self {
        self.context = Some(context);
        self
    }
}

impl std::fmt::Display for CompileError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)?;
        if let Some(context) = &self.context {
            write!(f, " ({context})")?;
        }
        Ok(())
    }
}

impl std::error::Error for CompileError {}
