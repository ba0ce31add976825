//! CSV reading and writing for transaction tables.
//!
//! The reader is header-driven: columns are located by name, so column
//! order does not matter and unknown columns are ignored. Fields may be
//! quoted; a quoted field can contain commas and doubled quotes. Embedded
//! newlines are not supported — none of the table's columns carry them.
//!
//! Malformed rows are hard errors with their line number, not silently
//! skipped rows.

use slicescope_core::{
    Dataset, TransactionRecord,
    measure::{Latency, Throughput},
};
use std::{fs, path::Path};
use thiserror::Error;

/// The columns a transaction table must provide, by exact header name.
pub const COLUMNS: [&str; 9] = [
    TIMESTAMP, SLICE, TRAFFIC, REQUESTED, ALLOCATED, LATENCY, QUEUE, SUCCESS, CONGESTION,
];

const TIMESTAMP: &str = "Timestamp";
const SLICE: &str = "Network Slice ID";
const TRAFFIC: &str = "Traffic Volume (Mbps)";
const REQUESTED: &str = "Requested Bandwidth (Mbps)";
const ALLOCATED: &str = "Actual Bandwidth Allocated (Mbps)";
const LATENCY: &str = "Latency (ms)";
const QUEUE: &str = "Queue Length (Packets)";
const SUCCESS: &str = "Transaction Success (1/0)";
const CONGESTION: &str = "Congestion Level";

/// Error returned when a transaction table cannot be parsed.
#[derive(Debug, Error)]
pub enum CsvError {
    /// The input has no header row at all.
    #[error("the table has no header row")]
    MissingHeader,
    /// A required column is absent from the header.
    #[error("missing required column `{0}'")]
    MissingColumn(&'static str),
    /// A row has a different number of fields than the header.
    #[error("line {line}: expected {expected} fields, found {found}")]
    ColumnCount {
        line: usize,
        expected: usize,
        found: usize,
    },
    /// A quoted field never closes before the end of the line.
    #[error("line {line}: unterminated quoted field")]
    UnterminatedQuote { line: usize },
    /// A field failed to parse into its column's type.
    #[error("line {line}, column `{column}': {message}")]
    Field {
        line: usize,
        column: &'static str,
        message: String,
    },
}

/// Index of each required column within the header row.
struct ColumnMap {
    timestamp: usize,
    slice: usize,
    traffic: usize,
    requested: usize,
    allocated: usize,
    latency: usize,
    queue: usize,
    success: usize,
    congestion: usize,
    width: usize,
}

impl ColumnMap {
    fn from_header(header: &[String]) -> Result<Self, CsvError> {
        let find = |column: &'static str| {
            header
                .iter()
                .position(|h| h.trim() == column)
                .ok_or(CsvError::MissingColumn(column))
        };

        Ok(Self {
            timestamp: find(TIMESTAMP)?,
            slice: find(SLICE)?,
            traffic: find(TRAFFIC)?,
            requested: find(REQUESTED)?,
            allocated: find(ALLOCATED)?,
            latency: find(LATENCY)?,
            queue: find(QUEUE)?,
            success: find(SUCCESS)?,
            congestion: find(CONGESTION)?,
            width: header.len(),
        })
    }
}

/// split one line into fields, honouring quotes.
fn split_fields(line: &str, line_number: usize) -> Result<Vec<String>, CsvError> {
    let mut fields = Vec::new();
    let mut field = String::new();
    let mut in_quotes = false;

    let mut chars = line.chars().peekable();
    while let Some(c) = chars.next() {
        if in_quotes {
            if c == '"' {
                if chars.peek() == Some(&'"') {
                    field.push('"');
                    chars.next();
                } else {
                    in_quotes = false;
                }
            } else {
                field.push(c);
            }
        } else {
            match c {
                ',' => fields.push(std::mem::take(&mut field)),
                '"' if field.is_empty() => in_quotes = true,
                _ => field.push(c),
            }
        }
    }

    if in_quotes {
        return Err(CsvError::UnterminatedQuote { line: line_number });
    }

    fields.push(field);
    Ok(fields)
}

/// parse one field through its column's `FromStr`-like constructor.
fn parse_field<T, E: std::fmt::Display>(
    value: Result<T, E>,
    line: usize,
    column: &'static str,
) -> Result<T, CsvError> {
    value.map_err(|error| CsvError::Field {
        line,
        column,
        message: error.to_string(),
    })
}

fn parse_f64(field: &str, line: usize, column: &'static str) -> Result<f64, CsvError> {
    parse_field(field.trim().parse::<f64>(), line, column)
}

fn parse_throughput(field: &str, line: usize, column: &'static str) -> Result<Throughput, CsvError> {
    let mbps = parse_f64(field, line, column)?;
    parse_field(Throughput::from_mbps(mbps), line, column)
}

fn parse_success(field: &str, line: usize) -> Result<bool, CsvError> {
    match field.trim() {
        "1" => Ok(true),
        "0" => Ok(false),
        other => Err(CsvError::Field {
            line,
            column: SUCCESS,
            message: format!("expected 1 or 0, got `{other}'"),
        }),
    }
}

/// parse a whole transaction table.
///
/// Empty lines are skipped. Every data row must carry as many fields as the
/// header.
pub fn parse_dataset(text: &str) -> Result<Dataset, CsvError> {
    let mut lines = text
        .lines()
        .enumerate()
        .map(|(at, line)| (at + 1, line))
        .filter(|(_, line)| !line.trim().is_empty());

    let Some((header_line, header)) = lines.next() else {
        return Err(CsvError::MissingHeader);
    };
    let header = split_fields(header, header_line)?;
    let columns = ColumnMap::from_header(&header)?;

    let mut records = Vec::new();
    for (line, raw) in lines {
        let fields = split_fields(raw, line)?;
        if fields.len() != columns.width {
            return Err(CsvError::ColumnCount {
                line,
                expected: columns.width,
                found: fields.len(),
            });
        }

        let latency_ms = parse_f64(&fields[columns.latency], line, LATENCY)?;
        let queue_length = parse_f64(&fields[columns.queue], line, QUEUE)?;
        if !queue_length.is_finite() || queue_length < 0.0 {
            return Err(CsvError::Field {
                line,
                column: QUEUE,
                message: format!("queue length must be finite and non-negative, got {queue_length}"),
            });
        }

        records.push(TransactionRecord {
            timestamp: fields[columns.timestamp].trim().to_string(),
            slice: parse_field(fields[columns.slice].trim().parse(), line, SLICE)?,
            traffic: parse_throughput(&fields[columns.traffic], line, TRAFFIC)?,
            requested: parse_throughput(&fields[columns.requested], line, REQUESTED)?,
            allocated: parse_throughput(&fields[columns.allocated], line, ALLOCATED)?,
            latency: parse_field(Latency::from_millis_f64(latency_ms), line, LATENCY)?,
            queue_length,
            success: parse_success(&fields[columns.success], line)?,
            congestion: parse_field(fields[columns.congestion].trim().parse(), line, CONGESTION)?,
        });
    }

    Ok(Dataset::new(records))
}

/// Escape CSV field (handle commas, quotes, newlines)
fn escape_field(field: &str) -> String {
    if field.contains(',') || field.contains('"') || field.contains('\n') {
        format!("\"{}\"", field.replace('"', "\"\""))
    } else {
        field.to_string()
    }
}

/// render a dataset back into CSV, with the canonical column order.
///
/// Numbers are written in their shortest round-trippable form, so
/// `parse_dataset(&render_dataset(d)) == d`.
pub fn render_dataset(dataset: &Dataset) -> String {
    let mut output = String::new();

    output.push_str(&COLUMNS.join(","));
    output.push('\n');

    for record in dataset.records() {
        let fields = [
            escape_field(&record.timestamp),
            escape_field(record.slice.as_str()),
            record.traffic.as_mbps().to_string(),
            record.requested.as_mbps().to_string(),
            record.allocated.as_mbps().to_string(),
            record.latency.as_millis_f64().to_string(),
            record.queue_length.to_string(),
            if record.success { "1" } else { "0" }.to_string(),
            record.congestion.to_string(),
        ];
        output.push_str(&fields.join(","));
        output.push('\n');
    }

    output
}

/// read and parse a transaction table from disk.
pub fn load_dataset(path: &Path) -> anyhow::Result<Dataset> {
    use anyhow::Context as _;

    let text = fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    let dataset =
        parse_dataset(&text).with_context(|| format!("Failed to parse {}", path.display()))?;

    tracing::info!(
        rows = dataset.len(),
        path = %path.display(),
        "loaded transaction table"
    );
    Ok(dataset)
}

/// write a dataset to disk as CSV.
pub fn write_dataset(path: &Path, dataset: &Dataset) -> anyhow::Result<()> {
    use anyhow::Context as _;

    fs::write(path, render_dataset(dataset))
        .with_context(|| format!("Failed to write {}", path.display()))?;

    tracing::info!(
        rows = dataset.len(),
        path = %path.display(),
        "wrote transaction table"
    );
    Ok(())
}
