//! Tests for the character stream: logical characters, character classes,
//! and the composite takers.

use sassafras_css::CharStream;

fn scss_stream(input: &str) -> CharStream {
    CharStream::new(input, true)
}

fn css_stream(input: &str) -> CharStream {
    CharStream::new(input, false)
}

#[test]
fn test_take_returns_characters_in_order() {
    let mut stream = css_stream("abc");
    assert_eq!(stream.take(1), "a");
    assert_eq!(stream.take(2), "bc");
    assert!(stream.is_end_of_file(0));
}

#[test]
fn test_take_runs_short_at_end_of_input() {
    let mut stream = css_stream("ab");
    assert_eq!(stream.take(5), "ab");
}

#[test]
fn test_take_folds_crlf_into_one_logical_character() {
    let mut stream = css_stream("\r\nx");
    assert_eq!(stream.take(1), "\r\n");
    assert_eq!(stream.current(), Some('x'));
}

#[test]
fn test_take_absorbs_escapes() {
    let mut stream = css_stream("\\zb");
    // The backslash and the escaped code point count as one character.
    assert_eq!(stream.take(1), "\\z");
    assert_eq!(stream.current(), Some('b'));
}

#[test]
fn test_line_and_column_tracking() {
    let mut stream = css_stream("ab\ncd");
    let _ = stream.take(4); // a b \n c
    assert_eq!(stream.line, 2);
    assert_eq!(stream.column, 2);
}

#[test]
fn test_take_identifier_plain() {
    let mut stream = css_stream("background-color: red");
    assert_eq!(stream.take_identifier().unwrap(), "background-color");
    assert_eq!(stream.current(), Some(':'));
}

#[test]
fn test_take_identifier_rejects_number() {
    let mut stream = css_stream("5px");
    assert!(stream.take_identifier().is_err());
}

#[test]
fn test_take_identifier_swallows_interpolation_in_scss_mode() {
    let mut stream = scss_stream("a#{$x}b ");
    assert_eq!(stream.take_identifier().unwrap(), "a#{$x}b");
    assert_eq!(stream.current(), Some(' '));
}

#[test]
fn test_take_identifier_leading_interpolation() {
    let mut stream = scss_stream("#{$x}-suffix ");
    assert_eq!(stream.take_identifier().unwrap(), "#{$x}-suffix");
}

#[test]
fn test_take_number_with_fraction() {
    let mut stream = css_stream("1.5em");
    assert_eq!(stream.take_number().unwrap(), "1.5");
    assert_eq!(stream.current(), Some('e'));
}

#[test]
fn test_take_number_negative() {
    let mut stream = css_stream("-42;");
    assert_eq!(stream.take_number().unwrap(), "-42");
}

#[test]
fn test_take_number_rejects_trailing_dot() {
    let mut stream = css_stream("1. ");
    assert!(stream.take_number().is_err());
}

#[test]
fn test_take_at_keyword() {
    let mut stream = css_stream("@media screen");
    assert_eq!(stream.take_at_keyword().unwrap(), "@media");
}

#[test]
fn test_take_string_matches_quote_style() {
    let mut stream = css_stream("'it''s'");
    assert_eq!(stream.take_string().unwrap(), "'it'");

    let mut stream = css_stream("\"double\" rest");
    assert_eq!(stream.take_string().unwrap(), "\"double\"");
}

#[test]
fn test_take_string_unterminated_fails() {
    let mut stream = css_stream("\"oops");
    assert!(stream.take_string().is_err());
}

#[test]
fn test_take_whitespace() {
    let mut stream = css_stream(" \t\n x");
    assert_eq!(stream.take_whitespace(), " \t\n ");
    assert_eq!(stream.current(), Some('x'));
}

#[test]
fn test_find_first_delimiter_finds_nearest() {
    let stream = scss_stream("color: red;");
    let (character, offset) = stream.find_first_delimiter("{:}", 0);
    assert_eq!(character, Some(':'));
    assert_eq!(stream.peek(offset), Some(':'));
}

#[test]
fn test_find_first_delimiter_skips_interpolation_bodies() {
    // The colon inside #{...} must not end the scan.
    let stream = scss_stream("a#{unquote(\":\")}x{");
    let (character, _) = stream.find_first_delimiter("{:}", 0);
    assert_eq!(character, Some('{'));
}

#[test]
fn test_find_first_delimiter_reports_end_of_file() {
    let stream = scss_stream("plain");
    let (character, _) = stream.find_first_delimiter("{:}", 0);
    assert_eq!(character, None);
}

#[test]
fn test_comment_start_modes() {
    let css = css_stream("// nope");
    assert!(!css.is_comment_start(0));

    let scss = scss_stream("// yes");
    assert!(scss.is_comment_start(0));

    let block = css_stream("/* always */");
    assert!(block.is_comment_start(0));
}

#[test]
fn test_variable_start() {
    let stream = scss_stream("$name");
    assert!(stream.is_variable_start(0));
    assert!(!stream.is_variable_start(1));
}

#[test]
fn test_error_carries_location_and_snippet() {
    let mut stream = css_stream("abc\ndef!");
    let _ = stream.take(5); // past the newline
    let error = stream.error("boom");
    assert_eq!(error.line, Some(2));
    assert!(error.to_string().contains("line 2"));
    assert!(error.to_string().contains("boom"));
}
