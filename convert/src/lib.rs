//! Batch conversion between a JSON array of items and a CSV document with one
//! item per line.
//!
//! # Design
//! The core codecs report a bad record as a `ParseError` and leave recovery to
//! the caller. This crate is that caller: by default a bad record is logged
//! and skipped, and in strict mode the first bad record aborts the run.
//!
//! The CSV form has no escaping, so an item whose string fields hold the
//! separator or a line break is treated the same way when writing CSV.

use std::io::{Read, Write};
use std::path::Path;

use anyhow::{bail, Context};
use serde_json::Value;
use todo_core::{csv, json, CsvSeparator, ParseError, TodoItem};
use tracing::{debug, info, warn};

/// Document format on either side of a conversion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum Format {
    Json,
    Csv,
}

impl Format {
    /// Guess the format from a `.json` / `.csv` extension.
    pub fn from_path(path: &Path) -> Option<Self> {
        let ext = path.extension()?.to_str()?.to_ascii_lowercase();
        match ext.as_str() {
            "json" => Some(Format::Json),
            "csv" => Some(Format::Csv),
            _ => None,
        }
    }

    pub fn other(self) -> Self {
        match self {
            Format::Json => Format::Csv,
            Format::Csv => Format::Json,
        }
    }
}

#[derive(Debug, Clone)]
pub struct ConvertOptions {
    pub from: Format,
    pub to: Format,
    pub separator: CsvSeparator,
    pub strict: bool,
    pub pretty: bool,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Summary {
    pub converted: usize,
    pub skipped: usize,
}

#[derive(Debug, Clone)]
pub struct Conversion {
    pub output: String,
    pub summary: Summary,
}

/// Parse every record of `input`. Returns the good items and the number of
/// skipped records.
pub fn read_items(
    input: &str,
    format: Format,
    separator: CsvSeparator,
    strict: bool,
) -> anyhow::Result<(Vec<TodoItem>, usize)> {
    let records: Vec<Result<TodoItem, ParseError>> = match format {
        Format::Json => {
            let document: Value =
                serde_json::from_str(input).context("input is not a valid JSON document")?;
            json::parse_array(&document)?
        }
        Format::Csv => csv::parse_lines(input, separator).collect(),
    };

    let mut items = Vec::with_capacity(records.len());
    let mut skipped = 0;
    for record in records {
        match record {
            Ok(item) => items.push(item),
            Err(err) if strict => {
                return Err(err).context("bad record in strict mode");
            }
            Err(err) => {
                warn!(reason = %err, "skipping record");
                skipped += 1;
            }
        }
    }
    Ok((items, skipped))
}

/// Drop items the CSV form cannot carry. Returns the number dropped.
pub fn retain_writable(
    items: &mut Vec<TodoItem>,
    separator: CsvSeparator,
    strict: bool,
) -> anyhow::Result<usize> {
    if strict {
        if let Some((item, field)) = items
            .iter()
            .find_map(|item| csv::unwritable_field(item, separator).map(|field| (item, field)))
        {
            bail!(
                "item {} cannot be written as CSV: `{field}` holds the separator or a line break",
                item.id()
            );
        }
        return Ok(0);
    }

    let before = items.len();
    items.retain(|item| match csv::unwritable_field(item, separator) {
        Some(field) => {
            warn!(id = item.id(), %field, "skipping record that would break the CSV line");
            false
        }
        None => true,
    });
    Ok(before - items.len())
}

/// Render `items` as a document. Output ends with a newline unless empty.
pub fn write_items(
    items: &[TodoItem],
    format: Format,
    separator: CsvSeparator,
    pretty: bool,
) -> anyhow::Result<String> {
    let mut output = match format {
        Format::Json => {
            let document = Value::Array(
                items
                    .iter()
                    .map(|item| Value::Object(item.to_json()))
                    .collect(),
            );
            if pretty {
                serde_json::to_string_pretty(&document)?
            } else {
                document.to_string()
            }
        }
        Format::Csv => csv::write_lines(items, separator),
    };
    if !output.is_empty() {
        output.push('\n');
    }
    Ok(output)
}

pub fn convert(input: &str, options: &ConvertOptions) -> anyhow::Result<Conversion> {
    debug!(from = ?options.from, to = ?options.to, separator = %options.separator, "converting");

    let (mut items, mut skipped) =
        read_items(input, options.from, options.separator, options.strict)?;
    if options.to == Format::Csv {
        skipped += retain_writable(&mut items, options.separator, options.strict)?;
    }
    let output = write_items(&items, options.to, options.separator, options.pretty)?;
    let summary = Summary {
        converted: items.len(),
        skipped,
    };
    info!(converted = summary.converted, skipped = summary.skipped, "conversion finished");

    Ok(Conversion { output, summary })
}

/// Read the whole input; `-` means stdin.
pub fn read_input(path: &Path) -> anyhow::Result<String> {
    if path == Path::new("-") {
        let mut buf = String::new();
        std::io::stdin()
            .read_to_string(&mut buf)
            .context("failed to read stdin")?;
        return Ok(buf);
    }
    std::fs::read_to_string(path).with_context(|| format!("failed to read {}", path.display()))
}

/// Write the output to `path`, or to stdout when no path is given.
pub fn write_output(path: Option<&Path>, output: &str) -> anyhow::Result<()> {
    match path {
        Some(path) => std::fs::write(path, output)
            .with_context(|| format!("failed to write {}", path.display())),
        None => {
            let mut stdout = std::io::stdout().lock();
            stdout
                .write_all(output.as_bytes())
                .and_then(|()| stdout.flush())
                .context("failed to write stdout")
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn format_from_path_uses_extension() {
        assert_eq!(Format::from_path(Path::new("items.JSON")), Some(Format::Json));
        assert_eq!(Format::from_path(Path::new("dir/items.csv")), Some(Format::Csv));
        assert_eq!(Format::from_path(Path::new("items.txt")), None);
        assert_eq!(Format::from_path(Path::new("-")), None);
    }

    #[test]
    fn write_items_empty_document() {
        assert_eq!(
            write_items(&[], Format::Csv, CsvSeparator::Semicolon, false).unwrap(),
            ""
        );
        assert_eq!(
            write_items(&[], Format::Json, CsvSeparator::Semicolon, false).unwrap(),
            "[]\n"
        );
    }

    #[test]
    fn retain_writable_drops_items_that_break_lines() {
        let mut items = vec![
            TodoItem::builder("fine").id("a").build(),
            TodoItem::builder("two\nlines").id("b").build(),
            TodoItem::builder("a, b").id("c").build(),
        ];
        let dropped = retain_writable(&mut items, CsvSeparator::Semicolon, false).unwrap();
        assert_eq!(dropped, 1);
        let ids: Vec<&str> = items.iter().map(TodoItem::id).collect();
        assert_eq!(ids, ["a", "c"]);

        let err = retain_writable(&mut items, CsvSeparator::Comma, true).unwrap_err();
        assert!(err.to_string().contains("item c"));
        assert_eq!(items.len(), 2);
    }

    #[test]
    fn read_items_rejects_non_array_json() {
        let err = read_items(r#"{"id":"a"}"#, Format::Json, CsvSeparator::Semicolon, false)
            .unwrap_err();
        assert!(err.to_string().contains("JSON array"));
    }
}
