//! CSV export of collected samples.
//!
//! Format: header row `timestamp,step,pid`, then one row per sample with an
//! RFC 3339 timestamp, the integer step and the producer id. Parsing a file
//! written here yields the same samples in the same order.

use std::fs;
use std::path::Path;

use crate::error::ExportError;
use crate::models::Sample;

/// Column names, in order
pub const CSV_HEADER: [&str; 3] = ["timestamp", "step", "pid"];

/// Serialize samples to CSV text (header always present)
pub fn to_csv_string(samples: &[Sample]) -> Result<String, ExportError> {
    let mut writer = csv::WriterBuilder::new()
        .has_headers(false)
        .terminator(csv::Terminator::Any(b'\n'))
        .from_writer(Vec::new());

    writer.write_record(CSV_HEADER)?;
    for sample in samples {
        writer.serialize(sample)?;
    }

    let bytes = writer
        .into_inner()
        .map_err(|e| ExportError::Io(e.into_error()))?;
    String::from_utf8(bytes).map_err(|e| {
        ExportError::Io(std::io::Error::new(std::io::ErrorKind::InvalidData, e))
    })
}

/// Parse CSV text produced by `to_csv_string`
pub fn parse_csv(content: &str) -> Result<Vec<Sample>, ExportError> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .from_reader(content.as_bytes());

    let headers = reader.headers()?;
    if headers.iter().ne(CSV_HEADER.iter().copied()) {
        return Err(ExportError::UnexpectedHeader(
            headers.iter().collect::<Vec<_>>().join(","),
        ));
    }

    let mut samples = Vec::new();
    for record in reader.deserialize() {
        samples.push(record?);
    }
    Ok(samples)
}

/// Write samples to a CSV file, creating parent directories
pub fn write_csv_file(path: impl AsRef<Path>, samples: &[Sample]) -> Result<(), ExportError> {
    let path_ref = path.as_ref();
    if let Some(parent) = path_ref.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }

    let content = to_csv_string(samples)?;
    fs::write(path_ref, content)?;
    log::info!(
        "[EXPORT] Wrote {} samples to {}",
        samples.len(),
        path_ref.display()
    );
    Ok(())
}

/// Read samples back from a CSV file
pub fn read_csv_file(path: impl AsRef<Path>) -> Result<Vec<Sample>, ExportError> {
    let content = fs::read_to_string(path.as_ref())?;
    parse_csv(&content)
}
