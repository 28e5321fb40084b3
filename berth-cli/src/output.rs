//! Listing output in table, JSON, CSV and TSV form.
//!
//! Every list command hands over its records twice: as serializable values
//! for JSON and as flat string rows for the tabular formats.

use crate::error::CliError;
use berth::config::OutputFormat;
use serde::Serialize;
use std::io::{self, Write};

/// Rows of a listing with their column names.
pub struct Listing<'a, T> {
    /// Records rendered by the JSON format.
    pub records: &'a [T],
    /// Lowercase column names.
    pub headers: &'a [&'a str],
    /// One row per record, in column order.
    pub rows: Vec<Vec<String>>,
}

impl<T: Serialize> Listing<'_, T> {
    /// Write the listing to stdout.
    pub fn print(&self, format: OutputFormat) -> Result<(), CliError> {
        let stdout = io::stdout();
        let mut handle = stdout.lock();
        self.write_to(&mut handle, format)
    }

    /// Write the listing to any writer.
    pub fn write_to<W: Write>(&self, out: &mut W, format: OutputFormat) -> Result<(), CliError> {
        match format {
            OutputFormat::Table => self.write_table(out),
            OutputFormat::Json => {
                serde_json::to_writer_pretty(&mut *out, self.records)
                    .map_err(|e| CliError::Io(io::Error::new(io::ErrorKind::Other, e)))?;
                writeln!(out)?;
                Ok(())
            }
            OutputFormat::Csv => self.write_delimited(out, b','),
            OutputFormat::Tsv => self.write_delimited(out, b'\t'),
        }
    }

    fn write_table<W: Write>(&self, out: &mut W) -> Result<(), CliError> {
        let mut widths: Vec<usize> = self.headers.iter().map(|h| h.len()).collect();
        for row in &self.rows {
            for (width, cell) in widths.iter_mut().zip(row) {
                *width = (*width).max(cell.chars().count());
            }
        }

        let headers: Vec<String> = self.headers.iter().map(|h| h.to_uppercase()).collect();
        write_padded(out, &headers, &widths)?;
        for row in &self.rows {
            write_padded(out, row, &widths)?;
        }
        Ok(())
    }

    fn write_delimited<W: Write>(&self, out: &mut W, delimiter: u8) -> Result<(), CliError> {
        let mut writer = csv::WriterBuilder::new()
            .delimiter(delimiter)
            .from_writer(out);

        writer.write_record(self.headers).map_err(csv_error)?;
        for row in &self.rows {
            writer.write_record(row).map_err(csv_error)?;
        }
        writer.flush()?;
        Ok(())
    }
}

fn write_padded<W: Write>(out: &mut W, cells: &[String], widths: &[usize]) -> Result<(), CliError> {
    let last = cells.len().saturating_sub(1);
    let mut line = String::new();
    for (i, (cell, width)) in cells.iter().zip(widths).enumerate() {
        if i == last {
            line.push_str(cell);
        } else {
            line.push_str(&format!("{cell:<width$}  "));
        }
    }
    writeln!(out, "{}", line.trim_end())?;
    Ok(())
}

/// Convert csv::Error to CliError.
fn csv_error(e: csv::Error) -> CliError {
    CliError::Io(io::Error::new(io::ErrorKind::Other, e))
}

/// Placeholder for empty optional cells in table output.
pub fn or_dash(value: Option<&str>) -> String {
    value.unwrap_or("-").to_string()
}
