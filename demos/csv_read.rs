//! CSV Reader Examples
//!
//! Demonstrates the reading modes:
//! - Batch parsing with headers
//! - Incremental reading with blank-line reporting
//! - Custom delimiters
//! - Error handling
//!
//! Run with `RUST_LOG=csvrecords=trace` to see the reader's log events.

use csvrecords::{CsvError, CsvReader, ReadOutcome};
use std::error::Error;
use tracing_subscriber::EnvFilter;

fn main() -> Result<(), Box<dyn Error>> {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .try_init();

    println!("=== CSV Reader Examples ===\n");

    // Example 1: Batch parsing
    println!("1. Parsing whole file...");
    {
        let reader = CsvReader::open("demos/data/people.csv")?;

        println!("   Headers: {:?}", reader.headers().names());
        for record in reader.records() {
            println!("   {:?}", record.to_map());
        }
        println!("   Total records: {}", reader.records().len());
    }

    // Example 2: Incremental reading
    println!("\n2. Reading one line at a time...");
    {
        let mut reader = CsvReader::builder()
            .auto_parse(false)
            .open("demos/data/people.csv")?;

        loop {
            match reader.read_next()? {
                ReadOutcome::Record(record) => {
                    println!("   #{}: {}", reader.record_index(), record)
                }
                ReadOutcome::Blank => println!("   #{}: (blank)", reader.record_index()),
                ReadOutcome::End => break,
            }
        }
        reader.close();
    }

    // Example 3: Custom delimiter
    println!("\n3. Reading with custom delimiter (semicolon)...");
    {
        let reader = CsvReader::builder()
            .delimiter(";")
            .open("demos/data/semicolon.csv")?;

        for record in reader.records() {
            println!(
                "   {} -> {}",
                record.get("country").unwrap_or_default(),
                record.get("capital").unwrap_or_default()
            );
        }
    }

    // Example 4: Error handling
    println!("\n4. Error handling...");
    {
        match CsvReader::open("demos/data/nonexistent.csv") {
            Err(CsvError::ResourceNotFound { path }) => {
                println!("   Expected error: {} not found", path.display())
            }
            Err(e) => println!("   Unexpected error: {}", e),
            Ok(_) => println!("   File opened"),
        }

        match CsvReader::builder().delimiter("::").open("demos/data/people.csv") {
            Err(e) => println!("   Expected error: {}", e),
            Ok(_) => println!("   File opened"),
        }
    }

    println!("\n=== All examples completed successfully! ===");

    Ok(())
}
