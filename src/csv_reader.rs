//! CSV file reading with batch and incremental access

use crate::csv::{CsvParser, Dialect};
use crate::error::{CsvError, Result};
use crate::types::{Headers, Record};
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, trace, warn};

const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

/// Lifecycle of a [`CsvReader`]
///
/// A reader is created already open, so the first observable state is
/// `HeadersLoaded` (even when no header row was requested).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    /// Stream open, header line consumed if configured, no data read yet
    HeadersLoaded,
    /// At least one data read has happened
    Reading,
    /// Stream released; every further read fails with [`CsvError::SessionClosed`]
    Closed,
}

/// Outcome of a single [`CsvReader::read_next`] call
#[derive(Debug, Clone, PartialEq, Eq)]
#[must_use]
pub enum ReadOutcome {
    /// A data line was read
    Record(Record),
    /// A blank line was read; more data may follow
    Blank,
    /// The stream has no more data
    End,
}

impl ReadOutcome {
    /// Take the record, if any
    pub fn into_record(self) -> Option<Record> {
        match self {
            ReadOutcome::Record(record) => Some(record),
            _ => None,
        }
    }

    pub fn is_end(&self) -> bool {
        matches!(self, ReadOutcome::End)
    }
}

/// Options for opening a [`CsvReader`]
///
/// Values are validated when [`CsvReaderBuilder::open`] runs, so a bad
/// delimiter, enclosure or escape fails construction before the file is
/// touched.
#[derive(Debug, Clone)]
pub struct CsvReaderBuilder {
    header_row: bool,
    delimiter: String,
    enclosure: String,
    escape: String,
    auto_parse: bool,
}

impl Default for CsvReaderBuilder {
    fn default() -> Self {
        CsvReaderBuilder {
            header_row: true,
            delimiter: ",".to_string(),
            enclosure: "\"".to_string(),
            escape: "\\".to_string(),
            auto_parse: true,
        }
    }
}

impl CsvReaderBuilder {
    /// Whether the first line holds column names (default: true)
    pub fn header_row(mut self, has: bool) -> Self {
        self.header_row = has;
        self
    }

    /// Field delimiter, one character (default: `,`)
    pub fn delimiter(mut self, delimiter: &str) -> Self {
        self.delimiter = delimiter.to_string();
        self
    }

    /// Enclosure character, one character (default: `"`)
    pub fn enclosure(mut self, enclosure: &str) -> Self {
        self.enclosure = enclosure.to_string();
        self
    }

    /// Escape character, one character (default: `\`)
    pub fn escape(mut self, escape: &str) -> Self {
        self.escape = escape.to_string();
        self
    }

    /// Parse the whole file while opening (default: true)
    pub fn auto_parse(mut self, auto: bool) -> Self {
        self.auto_parse = auto;
        self
    }

    /// Validate the options and open the file
    pub fn open<P: AsRef<Path>>(self, path: P) -> Result<CsvReader> {
        let dialect = Dialect::new(&self.delimiter, &self.enclosure, &self.escape)?;
        CsvReader::open_with(path.as_ref(), dialect, self.header_row, self.auto_parse)
    }
}

/// CSV file reader owning one open file handle
///
/// Records can be pulled one at a time with [`read_next`](Self::read_next)
/// or all at once with [`parse_all`](Self::parse_all), which keeps them in
/// the reader and closes the file. An enclosed field may span several
/// physical lines.
///
/// # Examples
///
/// ```no_run
/// use csvrecords::CsvReader;
///
/// // Parses the whole file while opening
/// let reader = CsvReader::open("data.csv").unwrap();
///
/// for record in reader.records() {
///     println!("{:?}", record.get("name"));
/// }
/// ```
///
/// # Incremental reading
///
/// ```no_run
/// use csvrecords::{CsvReader, ReadOutcome};
///
/// let mut reader = CsvReader::builder()
///     .delimiter(";")
///     .auto_parse(false)
///     .open("data.csv")
///     .unwrap();
///
/// loop {
///     match reader.read_next().unwrap() {
///         ReadOutcome::Record(record) => println!("{}", record),
///         ReadOutcome::Blank => continue,
///         ReadOutcome::End => break,
///     }
/// }
/// reader.close();
/// ```
#[derive(Debug)]
pub struct CsvReader {
    path: PathBuf,
    source: Option<BufReader<File>>,
    line_buffer: Vec<u8>,

    // Configuration
    dialect: Dialect,
    header_row: bool,
    headers: Arc<Headers>,

    // State
    state: SessionState,
    record_index: u64,
    records: Vec<Record>,
}

impl CsvReader {
    /// Open a file with default settings and parse it completely
    ///
    /// Defaults: header row on, `,` delimiter, `"` enclosure, `\` escape.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        CsvReaderBuilder::default().open(path)
    }

    pub fn builder() -> CsvReaderBuilder {
        CsvReaderBuilder::default()
    }

    fn open_with(path: &Path, dialect: Dialect, header_row: bool, auto_parse: bool) -> Result<Self> {
        if !path.exists() {
            return Err(CsvError::ResourceNotFound {
                path: path.to_path_buf(),
            });
        }

        let file = File::open(path).map_err(|e| match e.kind() {
            std::io::ErrorKind::NotFound => CsvError::ResourceNotFound {
                path: path.to_path_buf(),
            },
            _ => CsvError::Io(e),
        })?;

        let mut source = BufReader::new(file);
        if source.fill_buf()?.starts_with(UTF8_BOM) {
            source.consume(UTF8_BOM.len());
        }

        let mut reader = CsvReader {
            path: path.to_path_buf(),
            source: Some(source),
            line_buffer: Vec::with_capacity(1024),
            dialect,
            header_row,
            headers: Arc::new(Headers::default()),
            state: SessionState::HeadersLoaded,
            record_index: 0,
            records: Vec::new(),
        };

        if header_row {
            let names = reader.read_fields()?.unwrap_or_default();
            reader.headers = Arc::new(Headers::new(names));
        }

        debug!(
            path = %reader.path.display(),
            headers = reader.headers.len(),
            "opened CSV file"
        );

        if auto_parse {
            reader.parse_all()?;
        }

        Ok(reader)
    }

    /// Read every remaining line into the owned record list, then close
    ///
    /// Blank lines are skipped. Fails with [`CsvError::SessionClosed`] if the
    /// reader is already closed, including by an earlier `parse_all`. An I/O
    /// error also closes the reader; records collected before it are kept.
    pub fn parse_all(&mut self) -> Result<&[Record]> {
        self.ensure_open()?;
        self.state = SessionState::Reading;

        let before = self.records.len();
        loop {
            let fields = match self.read_fields() {
                Ok(Some(fields)) => fields,
                Ok(None) => break,
                Err(e) => {
                    // No resuming past a failed line
                    self.close();
                    return Err(e);
                }
            };
            if fields.is_empty() {
                trace!("skipping blank line");
                continue;
            }
            self.records.push(Record::build(fields, Some(&self.headers)));
        }

        debug!(records = self.records.len() - before, "parsed CSV file");
        self.close();
        Ok(&self.records)
    }

    /// Read exactly one line past the current position
    ///
    /// Every call on an open reader counts towards
    /// [`record_index`](Self::record_index), including calls that return
    /// [`ReadOutcome::Blank`] or [`ReadOutcome::End`]. The returned record is
    /// not added to [`records`](Self::records).
    pub fn read_next(&mut self) -> Result<ReadOutcome> {
        self.ensure_open()?;
        self.state = SessionState::Reading;

        let fields = self.read_fields();
        self.record_index += 1;

        Ok(match fields? {
            None => ReadOutcome::End,
            Some(fields) if fields.is_empty() => {
                trace!(index = self.record_index, "blank line");
                ReadOutcome::Blank
            }
            Some(fields) => ReadOutcome::Record(Record::build(fields, Some(&self.headers))),
        })
    }

    /// Iterate over the remaining records, skipping blank lines
    ///
    /// The iterator ends at end of stream or after yielding the first error.
    pub fn records_iter(&mut self) -> CsvRecordIterator<'_> {
        CsvRecordIterator {
            reader: self,
            done: false,
        }
    }

    /// Release the file handle. Closing twice is harmless.
    pub fn close(&mut self) {
        if self.source.take().is_some() {
            debug!(path = %self.path.display(), "closed CSV file");
        }
        self.state = SessionState::Closed;
    }

    /// Records collected by [`parse_all`](Self::parse_all) or
    /// [`add_record`](Self::add_record)
    pub fn records(&self) -> &[Record] {
        &self.records
    }

    /// Append a record to the owned list without touching the file
    pub fn add_record(&mut self, record: Record) {
        self.records.push(record);
    }

    pub fn into_records(self) -> Vec<Record> {
        self.records
    }

    /// Column names from the header row. Empty without a header row.
    pub fn headers(&self) -> &Headers {
        &self.headers
    }

    /// Exact, case-sensitive check for a column name
    pub fn has_header(&self, name: &str) -> bool {
        self.headers.contains(name)
    }

    /// Number of [`read_next`](Self::read_next) calls made on the open reader
    pub fn record_index(&self) -> u64 {
        self.record_index
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    /// Path given when opening
    pub fn filename(&self) -> &Path {
        &self.path
    }

    pub fn dialect(&self) -> &Dialect {
        &self.dialect
    }

    pub fn delimiter(&self) -> char {
        self.dialect.delimiter()
    }

    /// Set the delimiter used by subsequent reads (one character only)
    pub fn set_delimiter(&mut self, delimiter: &str) -> Result<()> {
        self.dialect.set_delimiter(delimiter)
    }

    pub fn enclosure(&self) -> char {
        self.dialect.enclosure()
    }

    /// Set the enclosure used by subsequent reads (one character only)
    pub fn set_enclosure(&mut self, enclosure: &str) -> Result<()> {
        self.dialect.set_enclosure(enclosure)
    }

    pub fn escape(&self) -> char {
        self.dialect.escape()
    }

    /// Set the escape character used by subsequent reads (one character only)
    pub fn set_escape(&mut self, escape: &str) -> Result<()> {
        self.dialect.set_escape(escape)
    }

    pub fn header_row(&self) -> bool {
        self.header_row
    }

    /// Record the header-row flag
    ///
    /// Headers are loaded once while opening; changing the flag afterwards
    /// does not reload or drop them.
    pub fn set_header_row(&mut self, has: bool) {
        self.header_row = has;
    }

    fn ensure_open(&self) -> Result<()> {
        match self.state {
            SessionState::Closed => Err(CsvError::SessionClosed),
            _ => Ok(()),
        }
    }

    /// Read one logical line and split it into fields
    ///
    /// Returns `Ok(None)` at end of stream and `Ok(Some(vec![]))` for a blank
    /// line. Physical lines are joined while an enclosure is open; each one is
    /// tokenized once. Bytes that are not valid UTF-8 are replaced with
    /// U+FFFD rather than failing the line.
    fn read_fields(&mut self) -> Result<Option<Vec<String>>> {
        let source = self.source.as_mut().ok_or(CsvError::SessionClosed)?;
        let parser = CsvParser::new(self.dialect);
        let mut partial = parser.begin();
        let mut pending_break = String::new();
        let mut started = false;

        loop {
            self.line_buffer.clear();
            let bytes_read = source.read_until(b'\n', &mut self.line_buffer)?;
            if bytes_read == 0 {
                if !started {
                    return Ok(None); // EOF
                }
                break;
            }
            started = true;

            if !pending_break.is_empty() {
                partial.push_line_break(&pending_break);
            }

            let chunk = String::from_utf8_lossy(&self.line_buffer);
            let (body, line_break) = split_line_ending(&chunk);
            parser.feed(&mut partial, body);

            if !partial.is_open() || line_break.is_empty() {
                break;
            }
            pending_break.clear();
            pending_break.push_str(line_break);
        }

        if partial.is_open() {
            warn!(
                path = %self.path.display(),
                "enclosure still open at end of file, keeping partial field"
            );
        }
        Ok(Some(parser.finish(partial).fields))
    }
}

fn split_line_ending(line: &str) -> (&str, &str) {
    let body = line.strip_suffix('\n').unwrap_or(line);
    let body = body.strip_suffix('\r').unwrap_or(body);
    (body, &line[body.len()..])
}

/// Iterator over records read through [`CsvReader::read_next`]
pub struct CsvRecordIterator<'a> {
    reader: &'a mut CsvReader,
    done: bool,
}

impl<'a> Iterator for CsvRecordIterator<'a> {
    type Item = Result<Record>;

    fn next(&mut self) -> Option<Self::Item> {
        while !self.done {
            match self.reader.read_next() {
                Ok(ReadOutcome::Record(record)) => return Some(Ok(record)),
                Ok(ReadOutcome::Blank) => continue,
                Ok(ReadOutcome::End) => self.done = true,
                Err(e) => {
                    self.done = true;
                    return Some(Err(e));
                }
            }
        }
        None
    }
}
