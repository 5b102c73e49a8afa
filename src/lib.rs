//! # csvrecords
//!
//! Reads delimited-text files into records, either all at once or one line
//! at a time.
//!
//! - Configurable single-character delimiter, enclosure and escape
//! - Enclosed fields may contain delimiters and line breaks
//! - Optional header row; records are then addressable by column name
//! - Blank lines are reported separately from end of file
//! - Permissive parsing: unterminated enclosures yield the partial field
//!
//! ## Batch reading
//!
//! ```no_run
//! use csvrecords::CsvReader;
//!
//! let reader = CsvReader::open("people.csv")?;
//! for record in reader.records() {
//!     println!("{} -> {}", record.get("id").unwrap_or(""), record);
//! }
//! # Ok::<(), csvrecords::CsvError>(())
//! ```
//!
//! ## Incremental reading
//!
//! ```no_run
//! use csvrecords::{CsvReader, ReadOutcome};
//!
//! let mut reader = CsvReader::builder()
//!     .header_row(false)
//!     .delimiter("\t")
//!     .auto_parse(false)
//!     .open("people.tsv")?;
//!
//! loop {
//!     match reader.read_next()? {
//!         ReadOutcome::Record(record) => println!("{:?}", record.values()),
//!         ReadOutcome::Blank => println!("(blank line {})", reader.record_index()),
//!         ReadOutcome::End => break,
//!     }
//! }
//! reader.close();
//! # Ok::<(), csvrecords::CsvError>(())
//! ```

pub mod csv;
pub mod csv_reader;
pub mod error;
pub mod types;

pub use csv::{CsvEncoder, CsvParser, Dialect, ParsedLine};
pub use csv_reader::{CsvReader, CsvReaderBuilder, CsvRecordIterator, ReadOutcome, SessionState};
pub use error::{CsvError, Result};
pub use types::{Headers, Record};
