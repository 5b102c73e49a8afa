//! CSV encoding that produces lines the parser reads back unchanged

use super::Dialect;

/// CSV encoder for writing properly formatted CSV data
///
/// Fields are enclosed only when they must be. Inside an enclosure every
/// enclosure character in the data is written as `escape` + `enclosure`
/// (a doubled enclosure when both are the same character). A trailing run of
/// escape characters is written after the closing enclosure so it cannot
/// swallow it.
pub struct CsvEncoder {
    dialect: Dialect,
}

impl CsvEncoder {
    /// Create a new CSV encoder for the given dialect
    pub fn new(dialect: Dialect) -> Self {
        Self { dialect }
    }

    /// Encode entire row into buffer, without a line terminator
    pub fn encode_row<S: AsRef<str>>(&self, fields: &[S], buffer: &mut String) {
        // A lone empty field would otherwise become a blank line
        if let [only] = fields {
            if only.as_ref().is_empty() {
                buffer.push(self.dialect.enclosure);
                buffer.push(self.dialect.enclosure);
                return;
            }
        }

        for (i, field) in fields.iter().enumerate() {
            if i > 0 {
                buffer.push(self.dialect.delimiter);
            }
            self.encode_field(field.as_ref(), buffer);
        }
    }

    /// Encode a row into a new string
    pub fn encode_line<S: AsRef<str>>(&self, fields: &[S]) -> String {
        let mut line = String::new();
        self.encode_row(fields, &mut line);
        line
    }

    /// Encode single field with proper quoting/escaping
    fn encode_field(&self, field: &str, buffer: &mut String) {
        if !self.needs_quoting(field) {
            buffer.push_str(field);
            return;
        }

        let Dialect {
            enclosure, escape, ..
        } = self.dialect;

        let (body, tail) = if escape == enclosure {
            (field, "")
        } else {
            let body = field.trim_end_matches(escape);
            (body, &field[body.len()..])
        };

        buffer.push(enclosure);
        for ch in body.chars() {
            if ch == enclosure {
                buffer.push(escape);
            }
            buffer.push(ch);
        }
        buffer.push(enclosure);
        buffer.push_str(tail);
    }

    /// Check if field requires quoting
    fn needs_quoting(&self, field: &str) -> bool {
        field.chars().any(|c| {
            c == self.dialect.delimiter || c == self.dialect.enclosure || c == '\n' || c == '\r'
        })
    }
}

impl Default for CsvEncoder {
    fn default() -> Self {
        Self::new(Dialect::default())
    }
}
