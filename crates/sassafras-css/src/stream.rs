//! Character stream feeding the parser.
//!
//! A cursor over the decoded input with line/column tracking, the character
//! classes of [CSS Syntax Level 3 § 4.2](https://www.w3.org/TR/css-syntax-3/#tokenizer-definitions),
//! and composite takers for identifiers, numbers, strings, and URLs. In SCSS
//! mode the identifier machinery also swallows `#{…}` interpolation
//! fragments so they survive tokenization as part of the surrounding token.
//!
//! `take` works in *logical* characters: a CRLF pair and a backslash escape
//! plus its escaped code point each count as one.

use crate::error::ParseError;

/// Cursor over the input characters.
#[derive(Debug)]
pub struct CharStream {
    buffer: Vec<char>,
    /// SCSS mode: `#{…}` in names, `//` comments, `$` variables.
    scss: bool,
    /// Current position in the buffer.
    pub pos: usize,
    /// 1-based line of the current position.
    pub line: u32,
    /// 1-based column of the current position.
    pub column: u32,
}

impl CharStream {
    /// Create a stream over `buffer`; `scss` enables the SCSS extensions.
    #[must_use]
    pub fn new(buffer: &str, scss: bool) -> Self {
        CharStream {
            buffer: buffer.chars().collect(),
            scss,
            pos: 0,
            line: 1,
            column: 1,
        }
    }

    /// The character at the cursor, or `None` at end of input.
    #[must_use]
    pub fn current(&self) -> Option<char> {
        self.peek(0)
    }

    /// Peek at a signed offset from the cursor without consuming.
    #[must_use]
    pub fn peek(&self, offset: isize) -> Option<char> {
        let pos = self.pos as isize + offset;
        if pos < 0 {
            return None;
        }
        self.buffer.get(pos as usize).copied()
    }

    /// Up to `num` raw characters starting at `offset`, for error snippets.
    #[must_use]
    pub fn peek_range(&self, offset: isize, num: usize) -> String {
        (0..num)
            .filter_map(|i| self.peek(offset + i as isize))
            .collect()
    }

    /// Build a [`ParseError`] at the current position with a context
    /// snippet.
    #[must_use]
    pub fn error(&self, message: impl Into<String>) -> ParseError {
        ParseError::new(message).at(self.line, self.column, self.peek_range(-10, 20))
    }

    fn advance(&mut self) {
        if self.is_newline(0) {
            self.line += 1;
            self.column = 1;
        } else {
            self.column += 1;
        }
        self.pos += 1;
    }

    /// Consume `num` logical characters. CRLF folds into one; a backslash
    /// escape absorbs the escaped code point. Returns short at end of input.
    pub fn take(&mut self, num: usize) -> String {
        let mut characters = String::new();
        for _ in 0..num {
            let Some(character) = self.current() else {
                return characters;
            };
            self.advance();
            characters.push(character);
            if character == '\r' && self.current() == Some('\n') {
                characters.push_str(&self.take(1));
            } else if self.is_escape(-1) {
                characters.push_str(&self.take(1));
            }
        }
        characters
    }

    /// Consume an identifier, including inline `#{…}` fragments in SCSS
    /// mode.
    ///
    /// # Errors
    /// Fails when the cursor is not at an identifier start.
    pub fn take_identifier(&mut self) -> Result<String, ParseError> {
        if !self.is_identifier_start(0) {
            return Err(self.error("Current character is not an identifier"));
        }

        let mut characters = self.take(1);
        if self.scss && characters == "#" {
            // Unread the #; the interpolation branch below re-consumes it.
            characters.clear();
            self.pos -= 1;
        }
        while self.is_name_char(0) {
            if self.scss && self.current() == Some('#') && self.peek(1) == Some('{') {
                characters.push_str(&self.take(2));
                while self.current() != Some('}') && !self.is_end_of_file(0) {
                    characters.push_str(&self.take(1));
                }
                if self.current() != Some('}') {
                    break;
                }
            }
            characters.push_str(&self.take(1));
        }
        Ok(characters)
    }

    /// Consume a run of name characters.
    ///
    /// # Errors
    /// Fails when the cursor is not at a name character.
    pub fn take_name(&mut self) -> Result<String, ParseError> {
        if !self.is_name_char(0) {
            return Err(self.error("Current character is not a name"));
        }

        let mut characters = self.take(1);
        while self.is_name_char(0) {
            characters.push_str(&self.take(1));
        }
        Ok(characters)
    }

    /// Consume a number: optional sign, digits, at most one dot, and no
    /// trailing dot.
    ///
    /// # Errors
    /// Fails when the cursor is not at a number start, or the digits are
    /// malformed.
    pub fn take_number(&mut self) -> Result<String, ParseError> {
        if !self.is_number_start(0) {
            return Err(self.error("Current character is not a number"));
        }

        let mut characters = self.take(1);
        let mut num_dots = 0;
        while self.is_number_char(0) {
            let character = self.take(1);
            if character == "." {
                num_dots += 1;
            }
            characters.push_str(&character);
        }

        if characters.ends_with('.') || num_dots > 1 {
            return Err(self.error("Error parsing number"));
        }

        Ok(characters)
    }

    /// Consume `@` plus the keyword identifier.
    ///
    /// # Errors
    /// Fails when the cursor is not at `@`.
    pub fn take_at_keyword(&mut self) -> Result<String, ParseError> {
        if self.current() != Some('@') {
            return Err(self.error("Current character is not an @ keyword"));
        }

        let at = self.take(1);
        Ok(at + &self.take_identifier()?)
    }

    /// Consume a URL body: either a quoted string or a run of URL
    /// characters.
    ///
    /// # Errors
    /// Fails when the cursor is at neither.
    pub fn take_uri(&mut self) -> Result<String, ParseError> {
        if self.is_string_start(0) {
            return self.take_string();
        }

        if !self.is_url_char(0) {
            return Err(self.error("Current character is not a URI"));
        }

        let mut characters = self.take(1);
        while self.is_url_char(0) {
            characters.push_str(&self.take(1));
        }
        Ok(characters)
    }

    /// Consume a quoted string including its quotes, matching the opening
    /// quote character.
    ///
    /// # Errors
    /// Fails at end of input before the closing quote, or when the cursor is
    /// not at a quote.
    pub fn take_string(&mut self) -> Result<String, ParseError> {
        let Some(quote) = self.current().filter(|&c| c == '\'' || c == '"') else {
            return Err(self.error("Current character is not a string"));
        };

        let mut characters = self.take(1);
        while self.current() != Some(quote) {
            if self.is_end_of_file(0) {
                return Err(self.error("Unexpected end-of-file"));
            }
            characters.push_str(&self.take(1));
        }
        characters.push_str(&self.take(1));
        Ok(characters)
    }

    /// Consume a run of whitespace (possibly empty).
    pub fn take_whitespace(&mut self) -> String {
        let mut characters = String::new();
        while !self.is_end_of_file(0) && self.is_whitespace(0) {
            characters.push_str(&self.take(1));
        }
        characters
    }

    /// Scan forward for the first character in `character_range`, skipping
    /// over identifiers (and any `#{…}` bodies inside them) so that e.g. a
    /// `:` inside an interpolation does not end a selector lookahead.
    ///
    /// Never consumes; returns the found character (or `None` at end of
    /// input) and its offset.
    #[must_use]
    pub fn find_first_delimiter(&self, character_range: &str, offset: isize) -> (Option<char>, isize) {
        let mut offset = offset;
        let mut character = self.peek(offset);
        while let Some(c) = character {
            if character_range.contains(c) {
                return (Some(c), offset);
            }

            if self.is_identifier_start(offset) {
                while self.is_name_char(offset) {
                    if self.peek(offset) == Some('#') && self.peek(offset + 1) == Some('{') {
                        offset += 2;
                        while self.peek(offset) != Some('}') && !self.is_end_of_file(offset) {
                            offset += 1;
                        }
                    }
                    offset += 1;
                }
            } else {
                offset += 1;
            }
            character = self.peek(offset);
        }
        (None, offset)
    }

    // ---- character classes ------------------------------------------------

    /// End of input at `offset`?
    #[must_use]
    pub fn is_end_of_file(&self, offset: isize) -> bool {
        self.peek(offset).is_none()
    }

    /// `$`, the SCSS variable sigil.
    #[must_use]
    pub fn is_variable_start(&self, offset: isize) -> bool {
        self.peek(offset) == Some('$')
    }

    /// A name start, or `-` followed by one.
    #[must_use]
    pub fn is_identifier_start(&self, offset: isize) -> bool {
        self.is_name_start(offset)
            || (self.peek(offset) == Some('-') && self.is_name_start(offset + 1))
    }

    /// Letter, `_`, non-ASCII, escape, or `#{` in SCSS mode.
    #[must_use]
    pub fn is_name_start(&self, offset: isize) -> bool {
        self.peek(offset)
            .is_some_and(|c| c.is_ascii_alphabetic() || c == '_')
            || self.is_non_ascii(offset)
            || self.is_escape(offset)
            || (self.scss && self.peek(offset) == Some('#') && self.peek(offset + 1) == Some('{'))
    }

    /// Name-start characters plus digits and `-`, plus `#` in SCSS mode so
    /// interpolations embed mid-name.
    #[must_use]
    pub fn is_name_char(&self, offset: isize) -> bool {
        self.peek(offset)
            .is_some_and(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
            || self.is_non_ascii(offset)
            || self.is_escape(offset)
            || (self.scss && self.peek(offset) == Some('#'))
    }

    /// A number character, or `-` followed by one.
    #[must_use]
    pub fn is_number_start(&self, offset: isize) -> bool {
        self.is_number_char(offset)
            || (self.peek(offset) == Some('-') && self.is_number_char(offset + 1))
    }

    /// A digit, or `.` followed by a digit.
    #[must_use]
    pub fn is_number_char(&self, offset: isize) -> bool {
        match self.peek(offset) {
            Some(c) if c.is_ascii_digit() => true,
            Some('.') => self.peek(offset + 1).is_some_and(|c| c.is_ascii_digit()),
            _ => false,
        }
    }

    /// A quote character.
    #[must_use]
    pub fn is_string_start(&self, offset: isize) -> bool {
        matches!(self.peek(offset), Some('\'' | '"'))
    }

    /// [§ 4.2](https://www.w3.org/TR/css-syntax-3/#tokenizer-definitions)
    /// url code points, minus the closing paren.
    #[must_use]
    pub fn is_url_char(&self, offset: isize) -> bool {
        let Some(character) = self.peek(offset) else {
            return false;
        };
        let val = character as u32;
        val == 9
            || val == 33
            || (25..=126).contains(&val) && val != 41
            || self.is_non_ascii(offset)
            || self.is_escape(offset)
    }

    /// Code points 128–55295, 57344–65533, or 65536–131071.
    #[must_use]
    pub fn is_non_ascii(&self, offset: isize) -> bool {
        let Some(character) = self.peek(offset) else {
            return false;
        };
        let val = character as u32;
        (128..=55295).contains(&val)
            || (57344..=65533).contains(&val)
            || (65536..=131_071).contains(&val)
    }

    /// A backslash followed by an escapable code point.
    #[must_use]
    pub fn is_escape(&self, offset: isize) -> bool {
        if self.peek(offset) != Some('\\') {
            return false;
        }
        let Some(next) = self.peek(offset + 1) else {
            return false;
        };
        if next.is_ascii_hexdigit() {
            return true;
        }
        let val = next as u32;
        (32..=126).contains(&val)
            || (128..=55295).contains(&val)
            || (57344..=65533).contains(&val)
            || (65536..=131_071).contains(&val)
    }

    /// LF, FF, or CR.
    #[must_use]
    pub fn is_newline(&self, offset: isize) -> bool {
        matches!(self.peek(offset), Some('\n' | '\x0c' | '\r'))
    }

    /// Tab, newline, or space.
    #[must_use]
    pub fn is_whitespace(&self, offset: isize) -> bool {
        matches!(self.peek(offset), Some('\t' | '\n' | '\x0c' | '\r' | ' '))
    }

    /// `/*` always; `//` only in SCSS mode.
    #[must_use]
    pub fn is_comment_start(&self, offset: isize) -> bool {
        if self.peek(offset) != Some('/') {
            return false;
        }
        self.peek(offset + 1) == Some('*')
            || (self.scss && self.peek(offset + 1) == Some('/'))
    }

    /// `*/`.
    #[must_use]
    pub fn is_comment_end(&self, offset: isize) -> bool {
        self.peek(offset) == Some('*') && self.peek(offset + 1) == Some('/')
    }
}
