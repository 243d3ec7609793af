//! CSV reading and writing.
//!
//! [`parse`] is line oriented: each non-blank line is one record, and quotes
//! only protect separators within that line. Malformed quoting never fails a
//! parse; the current field simply accumulates to end of line.
//!
//! [`parse_records`] is the sheet-export reader used by the sync tooling: a
//! quote keeps the record open across line breaks, so multi-line cells stay
//! whole. An unclosed quote runs to end of input.

use std::io::{self, Write};
use std::mem::take;

use crate::data::Row;

/* ---------------- Parsing ---------------- */

/// Parse CSV text into rows keyed by the (trimmed) header line.
pub fn parse(text: &str) -> Vec<Row> {
    let mut lines = text.split('\n').filter(|line| !line.trim().is_empty());

    let Some(header_line) = lines.next() else {
        return Vec::new();
    };
    let header = parse_line(header_line);

    lines.map(|line| keyed(&header, parse_line(line))).collect()
}

/// Parse CSV text where quoted cells may span several lines.
///
/// Cells are kept as written (quoted line breaks included); only header
/// names are trimmed. Records made of whitespace alone are skipped.
pub fn parse_records(text: &str) -> Vec<Row> {
    let mut records = split_records(text)
        .into_iter()
        .filter(|cells| cells.iter().any(|c| !c.trim().is_empty()));

    let Some(header) = records.next() else {
        return Vec::new();
    };
    let header: Vec<String> = header.iter().map(|h| h.trim().to_string()).collect();

    records.map(|cells| keyed(&header, cells)).collect()
}

fn keyed(header: &[String], cells: Vec<String>) -> Row {
    let mut cells = cells.into_iter();
    let mut row = Row::new();
    for key in header {
        row.insert(key.as_str(), cells.next().unwrap_or_default());
    }
    row
}

fn split_records(text: &str) -> Vec<Vec<String>> {
    let mut records = Vec::new();
    let mut cells = Vec::new();
    let mut field = String::new();
    let mut in_quotes = false;
    let mut chars = text.chars().peekable();

    while let Some(ch) = chars.next() {
        match ch {
            '"' => {
                if in_quotes && matches!(chars.peek(), Some('"')) {
                    chars.next();
                    field.push('"');
                } else {
                    in_quotes = !in_quotes;
                }
            }
            ',' if !in_quotes => cells.push(take(&mut field)),
            '\r' if !in_quotes && matches!(chars.peek(), Some('\n')) => {}
            '\n' | '\r' if !in_quotes => {
                cells.push(take(&mut field));
                records.push(take(&mut cells));
            }
            _ => field.push(ch),
        }
    }

    if !field.is_empty() || !cells.is_empty() {
        cells.push(field);
        records.push(cells);
    }
    records
}

/// Split one line into trimmed cells, honoring `"` quoting and `""` escapes.
pub fn parse_line(line: &str) -> Vec<String> {
    let mut cells = Vec::new();
    let mut field = String::new();
    let mut in_quotes = false;
    let mut chars = line.chars().peekable();

    while let Some(ch) = chars.next() {
        match ch {
            '"' => {
                if in_quotes && matches!(chars.peek(), Some('"')) {
                    chars.next();
                    field.push('"');
                } else {
                    in_quotes = !in_quotes;
                }
            }
            ',' if !in_quotes => cells.push(take(&mut field).trim().to_string()),
            _ => field.push(ch),
        }
    }

    cells.push(field.trim().to_string());
    cells
}

/* ---------------- Writing ---------------- */

fn needs_quotes(field: &str) -> bool {
    field.contains(',') || field.contains('"') || field.contains('\n') || field.contains('\r')
}

/// Write a single CSV row to any writer.
pub fn write_row<W: Write, S: AsRef<str>>(mut w: W, row: &[S]) -> io::Result<()> {
    let mut first = true;
    for cell in row {
        let cell = cell.as_ref();
        if !first {
            write!(w, ",")?;
        } else {
            first = false;
        }
        if needs_quotes(cell) {
            write!(w, "\"{}\"", cell.replace('"', "\"\""))?;
        } else {
            write!(w, "{}", cell)?;
        }
    }
    writeln!(w)
}

/// Render rows as CSV text, projecting each row onto `headers`.
pub fn rows_to_csv<'a, I>(headers: &[String], rows: I) -> String
where
    I: IntoIterator<Item = &'a Row>,
{
    let mut buf: Vec<u8> = Vec::new();

    let _ = write_row(&mut buf, headers);
    for row in rows {
        let cells: Vec<&str> = headers.iter().map(|h| row.field(h)).collect();
        let _ = write_row(&mut buf, &cells);
    }

    match String::from_utf8(buf) {
        Ok(s) => s,
        Err(e) => String::from_utf8_lossy(&e.into_bytes()).into_owned(),
    }
}
