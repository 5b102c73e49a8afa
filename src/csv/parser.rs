//! CSV parsing with RFC 4180-like behavior and a configurable escape character

use super::Dialect;

/// Result of tokenizing one logical line
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ParsedLine {
    /// Field values in line order. Empty for a blank line.
    pub fields: Vec<String>,
    /// The line ended while an enclosure was still open
    pub unterminated: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
enum State {
    #[default]
    FieldStart,
    Unquoted,
    Quoted,
    AfterQuoted,
}

/// Tokenizer state for a logical line that arrives in pieces
///
/// Created by [`CsvParser::begin`], fed with [`CsvParser::feed`] and
/// completed with [`CsvParser::finish`]. Each piece is scanned once, so a
/// field spanning many physical lines costs time linear in its length.
#[derive(Debug, Default)]
pub struct PartialLine {
    fields: Vec<String>,
    current_field: String,
    state: State,
    started: bool,
}

impl PartialLine {
    /// The input so far ends inside an enclosed span
    pub fn is_open(&self) -> bool {
        self.state == State::Quoted
    }

    /// Append a line terminator that belongs to the open enclosed field
    pub fn push_line_break(&mut self, line_break: &str) {
        self.current_field.push_str(line_break);
        self.started = true;
    }
}

/// CSV parser for reading CSV data
///
/// An enclosure character opens an enclosed span only at the start of a
/// field; anywhere else it is literal. Inside an enclosed span, a delimiter
/// or line terminator is data, and either `escape` + `enclosure` or a doubled
/// `enclosure` yields one literal enclosure. An escape before any other
/// character is kept verbatim. Text between a closing enclosure and the next
/// delimiter is appended to the field as-is.
///
/// Parsing never fails. A line that ends inside an open enclosure keeps
/// everything after the opening enclosure as the field value and reports
/// [`ParsedLine::unterminated`].
pub struct CsvParser {
    dialect: Dialect,
}

impl CsvParser {
    /// Create a new CSV parser for the given dialect
    pub fn new(dialect: Dialect) -> Self {
        Self { dialect }
    }

    pub fn dialect(&self) -> &Dialect {
        &self.dialect
    }

    /// Parse CSV line into fields
    ///
    /// A blank line yields no fields at all, which is distinct from a line
    /// holding a single empty enclosed field (`""`).
    pub fn parse_line(&self, line: &str) -> Vec<String> {
        self.parse(line).fields
    }

    /// Parse CSV line, also reporting whether an enclosure was left open
    pub fn parse(&self, line: &str) -> ParsedLine {
        let mut partial = self.begin();
        self.feed(&mut partial, line);
        self.finish(partial)
    }

    /// Start tokenizing a logical line piece by piece
    pub fn begin(&self) -> PartialLine {
        PartialLine::default()
    }

    /// Tokenize the next piece of a logical line
    ///
    /// Pieces must not split an escape or doubled enclosure from the
    /// character that follows it; physical lines never do.
    pub fn feed(&self, partial: &mut PartialLine, piece: &str) {
        if piece.is_empty() {
            return;
        }
        partial.started = true;

        let Dialect {
            delimiter,
            enclosure,
            escape,
        } = self.dialect;
        let PartialLine {
            fields,
            current_field,
            state,
            ..
        } = partial;
        let mut chars = piece.chars().peekable();

        while let Some(ch) = chars.next() {
            match *state {
                State::FieldStart | State::Unquoted | State::AfterQuoted if ch == delimiter => {
                    fields.push(std::mem::take(current_field));
                    *state = State::FieldStart;
                }
                State::FieldStart if ch == enclosure => *state = State::Quoted,
                State::Quoted => {
                    if ch == escape && escape != enclosure && chars.peek() == Some(&enclosure) {
                        current_field.push(enclosure);
                        chars.next();
                    } else if ch == enclosure {
                        if chars.peek() == Some(&enclosure) {
                            current_field.push(enclosure);
                            chars.next();
                        } else {
                            *state = State::AfterQuoted;
                        }
                    } else {
                        current_field.push(ch);
                    }
                }
                _ => {
                    current_field.push(ch);
                    if *state == State::FieldStart {
                        *state = State::Unquoted;
                    }
                }
            }
        }
    }

    /// Complete a logical line
    pub fn finish(&self, partial: PartialLine) -> ParsedLine {
        if !partial.started {
            return ParsedLine::default();
        }

        let PartialLine {
            mut fields,
            current_field,
            state,
            ..
        } = partial;

        // Add last field
        fields.push(current_field);
        ParsedLine {
            fields,
            unterminated: state == State::Quoted,
        }
    }
}

impl Default for CsvParser {
    fn default() -> Self {
        Self::new(Dialect::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parser() -> CsvParser {
        CsvParser::default()
    }

    #[test]
    fn test_simple() {
        assert_eq!(parser().parse_line("a,b,c"), vec!["a", "b", "c"]);
    }

    #[test]
    fn test_quoted() {
        assert_eq!(parser().parse_line(r#""a,b",c"#), vec!["a,b", "c"]);
    }

    #[test]
    fn test_doubled_quotes() {
        assert_eq!(
            parser().parse_line(r#""Say ""Hello""",world"#),
            vec![r#"Say "Hello""#, "world"]
        );
    }

    #[test]
    fn test_escaped_quotes() {
        assert_eq!(
            parser().parse_line(r#""Say \"Hello\"",world"#),
            vec![r#"Say "Hello""#, "world"]
        );
    }

    #[test]
    fn test_escape_before_other_char_is_kept() {
        assert_eq!(
            parser().parse_line(r#""C:\temp\x",y"#),
            vec![r"C:\temp\x", "y"]
        );
        // Outside an enclosure the escape has no meaning
        assert_eq!(parser().parse_line(r#"a\"b,c"#), vec![r#"a\"b"#, "c"]);
    }

    #[test]
    fn test_empty_fields() {
        assert_eq!(parser().parse_line("a,,c"), vec!["a", "", "c"]);
        assert_eq!(parser().parse_line(",,"), vec!["", "", ""]);
    }

    #[test]
    fn test_blank_line_has_no_fields() {
        let parsed = parser().parse("");
        assert!(parsed.fields.is_empty());
        assert!(!parsed.unterminated);
    }

    #[test]
    fn test_quoted_empty() {
        assert_eq!(parser().parse_line(r#""""#), vec![""]);
        assert_eq!(parser().parse_line(r#""","""#), vec!["", ""]);
    }

    #[test]
    fn test_quoted_with_newline() {
        assert_eq!(
            parser().parse_line("\"Line 1\nLine 2\",normal"),
            vec!["Line 1\nLine 2", "normal"]
        );
    }

    #[test]
    fn test_enclosure_mid_field_is_literal() {
        assert_eq!(parser().parse_line(r#"ab"c,d"#), vec![r#"ab"c"#, "d"]);
    }

    #[test]
    fn test_text_after_closing_enclosure() {
        assert_eq!(parser().parse_line(r#""ab"cd,e"#), vec!["abcd", "e"]);
    }

    #[test]
    fn test_whitespace_is_data() {
        assert_eq!(parser().parse_line("  "), vec!["  "]);
        assert_eq!(parser().parse_line(" a , b "), vec![" a ", " b "]);
    }

    #[test]
    fn test_unterminated_enclosure_is_best_effort() {
        let parsed = parser().parse(r#"1,"open field, still open"#);
        assert_eq!(parsed.fields, vec!["1", "open field, still open"]);
        assert!(parsed.unterminated);

        // Escaped closing enclosure leaves the span open
        let parsed = parser().parse(r#""abc\""#);
        assert_eq!(parsed.fields, vec![r#"abc""#]);
        assert!(parsed.unterminated);
    }

    #[test]
    fn test_custom_dialect() {
        let parser = CsvParser::new(Dialect::new(";", "'", "'").unwrap());
        assert_eq!(
            parser.parse_line("a;'b;c';'it''s'"),
            vec!["a", "b;c", "it's"]
        );

        let tabs = CsvParser::new(Dialect::new("\t", "\"", "\\").unwrap());
        assert_eq!(tabs.parse_line("x\t\"y\tz\""), vec!["x", "y\tz"]);
    }

    #[test]
    fn test_pieces_match_whole_line() {
        let parser = parser();
        let mut partial = parser.begin();
        parser.feed(&mut partial, r#"1,"first"#);
        assert!(partial.is_open());
        partial.push_line_break("\r\n");
        parser.feed(&mut partial, "");
        partial.push_line_break("\n");
        parser.feed(&mut partial, r#"third \"q\"",x"#);
        assert!(!partial.is_open());

        let parsed = parser.finish(partial);
        assert_eq!(parsed, parser.parse("1,\"first\r\n\nthird \\\"q\\\"\",x"));
        assert_eq!(parsed.fields, vec!["1", "first\r\n\nthird \"q\"", "x"]);
    }

    #[test]
    fn test_unfed_line_is_blank() {
        let parser = parser();
        let mut partial = parser.begin();
        parser.feed(&mut partial, "");
        assert!(parser.finish(partial).fields.is_empty());
    }

    #[test]
    fn test_multibyte_delimiter() {
        let parser = CsvParser::new(Dialect::new("§", "\"", "\\").unwrap());
        assert_eq!(parser.parse_line("é§\"ü§ö\"§"), vec!["é", "ü§ö", ""]);
    }
}
