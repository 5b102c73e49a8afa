//! CSV utilities for parsing and encoding

mod dialect;
mod encoder;
mod parser;

pub use dialect::Dialect;
pub use encoder::CsvEncoder;
pub use parser::{CsvParser, ParsedLine};
