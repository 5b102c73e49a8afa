//! Delimiter, enclosure and escape configuration

use crate::error::{CsvError, Result};

/// Single-character settings shared by the parser and encoder
///
/// Every setting is exactly one character. Use [`Dialect::new`] to build one
/// from user-supplied strings; the default is `,` `"` `\`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Dialect {
    pub(crate) delimiter: char,
    pub(crate) enclosure: char,
    pub(crate) escape: char,
}

impl Default for Dialect {
    fn default() -> Self {
        Self {
            delimiter: ',',
            enclosure: '"',
            escape: '\\',
        }
    }
}

impl Dialect {
    /// Create a dialect, validating that each value is a single character
    ///
    /// The delimiter must differ from both the enclosure and the escape
    /// character. Enclosure and escape may be the same character, which makes
    /// a doubled enclosure the only escape.
    ///
    /// # Examples
    ///
    /// ```
    /// use csvrecords::csv::Dialect;
    ///
    /// let dialect = Dialect::new(";", "'", "\\").unwrap();
    /// assert_eq!(dialect.delimiter(), ';');
    ///
    /// assert!(Dialect::new("::", "\"", "\\").is_err());
    /// assert!(Dialect::new(",", "\"", ",").is_err());
    /// ```
    pub fn new(delimiter: &str, enclosure: &str, escape: &str) -> Result<Self> {
        Self {
            delimiter: single_char("delimiter", delimiter)?,
            enclosure: single_char("enclosure", enclosure)?,
            escape: single_char("escape", escape)?,
        }
        .check_distinct(None)
    }

    pub fn delimiter(&self) -> char {
        self.delimiter
    }

    pub fn enclosure(&self) -> char {
        self.enclosure
    }

    pub fn escape(&self) -> char {
        self.escape
    }

    /// Replace the delimiter (one character only)
    pub fn set_delimiter(&mut self, delimiter: &str) -> Result<()> {
        let mut next = *self;
        next.delimiter = single_char("delimiter", delimiter)?;
        *self = next.check_distinct(Some("delimiter"))?;
        Ok(())
    }

    /// Replace the enclosure character (one character only)
    pub fn set_enclosure(&mut self, enclosure: &str) -> Result<()> {
        let mut next = *self;
        next.enclosure = single_char("enclosure", enclosure)?;
        *self = next.check_distinct(Some("enclosure"))?;
        Ok(())
    }

    /// Replace the escape character (one character only)
    pub fn set_escape(&mut self, escape: &str) -> Result<()> {
        let mut next = *self;
        next.escape = single_char("escape", escape)?;
        *self = next.check_distinct(Some("escape"))?;
        Ok(())
    }

    /// Reject a delimiter that is also the enclosure or the escape; such
    /// lines cannot be split unambiguously. `changed` names the setting to
    /// blame, otherwise the non-delimiter side of the clash is reported.
    fn check_distinct(self, changed: Option<&'static str>) -> Result<Self> {
        let (other, reason) = if self.enclosure == self.delimiter {
            ("enclosure", "delimiter and enclosure must differ")
        } else if self.escape == self.delimiter {
            ("escape", "delimiter and escape must differ")
        } else {
            return Ok(self);
        };

        let field = changed.unwrap_or(other);
        let value = match field {
            "delimiter" => self.delimiter,
            "enclosure" => self.enclosure,
            _ => self.escape,
        };
        Err(CsvError::invalid_configuration(field, &value.to_string(), reason))
    }
}

fn single_char(field: &'static str, value: &str) -> Result<char> {
    let mut chars = value.chars();
    match (chars.next(), chars.next()) {
        (Some(ch), None) => Ok(ch),
        _ => Err(CsvError::invalid_configuration(
            field,
            value,
            "must be exactly one character",
        )),
    }
}
