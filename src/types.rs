//! Header and record types

use crate::csv::{CsvEncoder, Dialect};
use indexmap::IndexMap;
use std::fmt;
use std::sync::Arc;

/// Ordered column names read from the first line of a file
///
/// Duplicate names are kept in [`Headers::names`]. Lookup by name resolves to
/// the first column carrying that name; [`Headers::positions`] returns all of
/// them.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Headers {
    names: Vec<String>,
    // name -> first position
    index: IndexMap<String, usize>,
}

impl Headers {
    /// Create headers from field values in column order
    pub fn new(names: Vec<String>) -> Self {
        let mut index = IndexMap::with_capacity(names.len());
        for (pos, name) in names.iter().enumerate() {
            index.entry(name.clone()).or_insert(pos);
        }
        Headers { names, index }
    }

    /// Column names in file order, duplicates included
    pub fn names(&self) -> &[String] {
        &self.names
    }

    /// Get number of columns
    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// Exact, case-sensitive membership test
    pub fn contains(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    /// Position of the first column named `name`
    pub fn position(&self, name: &str) -> Option<usize> {
        self.index.get(name).copied()
    }

    /// Positions of every column named `name`
    pub fn positions(&self, name: &str) -> Vec<usize> {
        self.names
            .iter()
            .enumerate()
            .filter(|(_, n)| n.as_str() == name)
            .map(|(pos, _)| pos)
            .collect()
    }

    /// Check whether any name occurs more than once
    pub fn has_duplicates(&self) -> bool {
        self.index.len() != self.names.len()
    }
}

/// One parsed line of a CSV file
///
/// A record built against non-empty [`Headers`] is *named*: its values line up
/// with the header columns. Short lines are padded with empty strings so that
/// every header has a value; values beyond the last header are kept and can
/// be reached by position or through [`Record::extra`]. Without headers the
/// record is a plain positional list.
///
/// A record owns its values and shares the immutable headers; it holds no
/// reference to the reader that produced it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Record {
    headers: Option<Arc<Headers>>,
    values: Vec<String>,
}

impl Record {
    /// Pair field values with optional headers
    ///
    /// # Examples
    ///
    /// ```
    /// use csvrecords::types::{Headers, Record};
    /// use std::sync::Arc;
    ///
    /// let headers = Arc::new(Headers::new(vec!["id".into(), "name".into()]));
    /// let record = Record::build(vec!["1".into()], Some(&headers));
    ///
    /// assert_eq!(record.get("id"), Some("1"));
    /// assert_eq!(record.get("name"), Some(""));
    /// assert_eq!(record.get("age"), None);
    /// ```
    pub fn build(mut values: Vec<String>, headers: Option<&Arc<Headers>>) -> Self {
        match headers {
            Some(headers) if !headers.is_empty() => {
                if values.len() < headers.len() {
                    values.resize(headers.len(), String::new());
                }
                Record {
                    headers: Some(Arc::clone(headers)),
                    values,
                }
            }
            _ => Record::positional(values),
        }
    }

    /// Create a record without headers
    pub fn positional(values: Vec<String>) -> Self {
        Record {
            headers: None,
            values,
        }
    }

    /// Whether values are addressable by header name
    pub fn is_named(&self) -> bool {
        self.headers.is_some()
    }

    pub fn headers(&self) -> Option<&Headers> {
        self.headers.as_deref()
    }

    /// Get value by header name (first matching column)
    pub fn get(&self, name: &str) -> Option<&str> {
        let pos = self.headers.as_ref()?.position(name)?;
        self.values.get(pos).map(String::as_str)
    }

    /// Get value at column index
    pub fn get_index(&self, col: usize) -> Option<&str> {
        self.values.get(col).map(String::as_str)
    }

    /// All values in column order, surplus included
    pub fn values(&self) -> &[String] {
        &self.values
    }

    /// Values that have no header. Empty for positional records.
    pub fn extra(&self) -> &[String] {
        match &self.headers {
            Some(headers) => &self.values[headers.len()..],
            None => &[],
        }
    }

    /// Get number of values
    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Header name to value pairs in column order
    ///
    /// Duplicate header names keep the first column's value. Returns `None`
    /// for positional records.
    pub fn to_map(&self) -> Option<IndexMap<&str, &str>> {
        let headers = self.headers.as_ref()?;
        let mut map = IndexMap::with_capacity(headers.len());
        for (name, value) in headers.names().iter().zip(&self.values) {
            map.entry(name.as_str()).or_insert(value.as_str());
        }
        Some(map)
    }

    pub fn into_values(self) -> Vec<String> {
        self.values
    }

    /// Encode the values as one CSV line in the given dialect
    ///
    /// A record does not remember the dialect it was read with; pass the
    /// reader's [`CsvReader::dialect`](crate::CsvReader::dialect) to write it
    /// back the way it came in.
    pub fn to_line(&self, dialect: &Dialect) -> String {
        CsvEncoder::new(*dialect).encode_line(&self.values)
    }
}

/// Always uses the default dialect (`,` `"` `\`), whatever dialect the record
/// was read with. Use [`Record::to_line`] for any other dialect.
impl fmt::Display for Record {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&CsvEncoder::default().encode_line(&self.values))
    }
}

impl From<Vec<String>> for Record {
    fn from(values: Vec<String>) -> Self {
        Record::positional(values)
    }
}

/// Named records serialize as a map (surplus values keyed by column index),
/// positional records as a sequence.
#[cfg(feature = "serde")]
impl serde::Serialize for Record {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        use serde::ser::{SerializeMap, SerializeSeq};

        match self.to_map() {
            Some(map) => {
                let extra = self.extra();
                let offset = self.values.len() - extra.len();
                let mut out = serializer.serialize_map(Some(map.len() + extra.len()))?;
                for (name, value) in map {
                    out.serialize_entry(name, value)?;
                }
                for (i, value) in extra.iter().enumerate() {
                    out.serialize_entry(&(offset + i).to_string(), value)?;
                }
                out.end()
            }
            None => {
                let mut out = serializer.serialize_seq(Some(self.values.len()))?;
                for value in &self.values {
                    out.serialize_element(value)?;
                }
                out.end()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn strings(values: &[&str]) -> Vec<String> {
        values.iter().map(|s| s.to_string()).collect()
    }

    fn headers(names: &[&str]) -> Arc<Headers> {
        Arc::new(Headers::new(strings(names)))
    }

    #[test]
    fn test_headers_lookup() {
        let headers = headers(&["id", "Name", "email"]);
        assert!(headers.contains("Name"));
        assert!(!headers.contains("name"));
        assert!(!headers.contains("Name "));
        assert_eq!(headers.position("email"), Some(2));
        assert!(!headers.has_duplicates());
    }

    #[test]
    fn test_duplicate_headers_resolve_to_first() {
        let headers = headers(&["a", "b", "a"]);
        assert!(headers.has_duplicates());
        assert_eq!(headers.position("a"), Some(0));
        assert_eq!(headers.positions("a"), vec![0, 2]);
        assert_eq!(headers.len(), 3);

        let record = Record::build(strings(&["1", "2", "3"]), Some(&headers));
        assert_eq!(record.get("a"), Some("1"));
        assert_eq!(record.get_index(2), Some("3"));

        let map = record.to_map().unwrap();
        assert_eq!(map.len(), 2);
        assert_eq!(map["a"], "1");
    }

    #[test]
    fn test_short_record_padded() {
        let headers = headers(&["id", "name", "email"]);
        let record = Record::build(strings(&["7"]), Some(&headers));
        assert_eq!(record.len(), 3);
        assert_eq!(record.get("email"), Some(""));
        assert!(record.extra().is_empty());
    }

    #[test]
    fn test_surplus_values_kept_positionally() {
        let headers = headers(&["id", "name"]);
        let record = Record::build(strings(&["1", "Alice", "x", "y"]), Some(&headers));
        assert_eq!(record.extra(), &["x".to_string(), "y".to_string()][..]);
        assert_eq!(record.get_index(3), Some("y"));

        let map = record.to_map().unwrap();
        assert_eq!(map.keys().copied().collect::<Vec<_>>(), vec!["id", "name"]);
    }

    #[test]
    fn test_positional_without_headers() {
        let record = Record::build(strings(&["1", "Alice"]), None);
        assert!(!record.is_named());
        assert_eq!(record.get("id"), None);
        assert_eq!(record.get_index(1), Some("Alice"));
        assert!(record.to_map().is_none());

        let empty = Arc::new(Headers::default());
        let record = Record::build(strings(&["1"]), Some(&empty));
        assert!(!record.is_named());
    }

    #[test]
    fn test_display_encodes_line() {
        let record = Record::positional(strings(&["2", "B,ob"]));
        assert_eq!(record.to_string(), r#"2,"B,ob""#);
    }

    #[test]
    fn test_to_line_uses_given_dialect() {
        let record = Record::positional(strings(&["x;y", "it's", "plain"]));
        let dialect = Dialect::new(";", "'", "'").unwrap();
        assert_eq!(record.to_line(&dialect), "'x;y';'it''s';plain");
        // Display sticks to the default dialect
        assert_eq!(record.to_string(), "x;y,it's,plain");
    }

    #[cfg(feature = "serde")]
    #[test]
    fn test_serialize() {
        let headers = headers(&["id", "name"]);
        let record = Record::build(strings(&["1", "Alice", "extra"]), Some(&headers));
        assert_eq!(
            serde_json::to_string(&record).unwrap(),
            r#"{"id":"1","name":"Alice","2":"extra"}"#
        );

        let record = Record::positional(strings(&["1", "Alice"]));
        assert_eq!(serde_json::to_string(&record).unwrap(), r#"["1","Alice"]"#);
    }
}
