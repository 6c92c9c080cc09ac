//! Tolerant parser for pipe-delimited photo tables.
//!
//! The input is one header line followed by data rows. Exactly one column, by
//! default `data`, carries a CSV-quoted JSON object describing the photo; the
//! other columns are ignored by the gallery.
//!
//! Parsing is strict about the header and lenient about rows:
//!
//! - a header without the data column fails the whole page with
//!   [`ParseError::MissingColumn`];
//! - blank rows are skipped;
//! - rows with fewer cells than the header are skipped with a warning;
//! - rows with extra cells are accepted and the extras ignored;
//! - an undecodable payload yields an empty record instead of an error.
//!
//! ```rust
//! use pipegallery::parser::{parse_records, TableFormat};
//!
//! let text = "id|data\n1|\"{\"\"title\"\":\"\"Sunset\"\",\"\"url_max\"\":\"\"a.jpg\"\"}\"\n";
//! let records: Vec<_> = parse_records(text, &TableFormat::default()).unwrap().collect();
//! assert_eq!(records.len(), 1);
//! assert_eq!(records[0].title().as_deref(), Some("Sunset"));
//! ```
use std::iter::Enumerate;
use std::str::Split;

use crate::error::ParseError;
use crate::record::PhotoRecord;

pub const DEFAULT_DELIMITER: char = '|';
pub const DATA_COLUMN: &str = "data";

const BYTE_ORDER_MARK: char = '\u{feff}';

/// Shape of the tabular input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableFormat {
    pub delimiter: char,
    /// Column holding the JSON payload.
    pub data_column: String,
}

impl Default for TableFormat {
    fn default() -> Self {
        Self {
            delimiter: DEFAULT_DELIMITER,
            data_column: DATA_COLUMN.to_string(),
        }
    }
}

/// Trimmed column names from the first non-empty line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Header {
    names: Vec<String>,
    data_index: usize,
}

impl Header {
    /// Parse a header line, stripping a leading byte-order mark.
    pub fn parse(line: &str, format: &TableFormat) -> Result<Self, ParseError> {
        let line = line.trim_start_matches(BYTE_ORDER_MARK);
        let names: Vec<String> = line
            .split(format.delimiter)
            .map(|name| name.trim().to_string())
            .collect();

        let data_index = names
            .iter()
            .rposition(|name| *name == format.data_column)
            .ok_or_else(|| ParseError::MissingColumn(format.data_column.clone()))?;

        Ok(Self { names, data_index })
    }

    pub fn names(&self) -> &[String] {
        &self.names
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    pub fn data_index(&self) -> usize {
        self.data_index
    }
}

/// Untrimmed cells of one input line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawRow<'a> {
    cells: Vec<&'a str>,
}

impl<'a> RawRow<'a> {
    pub fn split(line: &'a str, delimiter: char) -> Self {
        Self {
            cells: line.split(delimiter).collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }
}

/// Header names zipped with one row's trimmed cells.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldMap<'h, 'a> {
    fields: Vec<(&'h str, &'a str)>,
}

impl<'h, 'a> FieldMap<'h, 'a> {
    /// Zip a row against the header. Returns `None` for short rows; cells past
    /// the header length are dropped.
    pub fn zip(header: &'h Header, row: &RawRow<'a>) -> Option<Self> {
        if row.len() < header.len() {
            return None;
        }
        let fields = header
            .names
            .iter()
            .zip(row.cells.iter())
            .map(|(name, cell)| (name.as_str(), cell.trim()))
            .collect();
        Some(Self { fields })
    }

    /// Cell under `name`. A repeated column name resolves to its last occurrence.
    pub fn get(&self, name: &str) -> Option<&'a str> {
        self.fields
            .iter()
            .rfind(|(column, _)| *column == name)
            .map(|(_, value)| *value)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&'h str, &'a str)> + '_ {
        self.fields.iter().copied()
    }
}

/// Lazy sequence of records, one per accepted row, in input order.
///
/// Created by [`parse_records`]. Re-parse the text to iterate again.
pub struct Records<'a> {
    header: Header,
    format: TableFormat,
    lines: Enumerate<Split<'a, char>>,
}

impl<'a> Records<'a> {
    pub fn header(&self) -> &Header {
        &self.header
    }

    /// Keep only records with a usable image URL.
    pub fn displayable(self) -> impl Iterator<Item = PhotoRecord> + 'a {
        self.filter(PhotoRecord::is_displayable)
    }

    fn decode_row(&self, line_no: usize, line: &str) -> Option<PhotoRecord> {
        let row = RawRow::split(line, self.format.delimiter);
        let Some(fields) = FieldMap::zip(&self.header, &row) else {
            tracing::warn!(
                line = line_no,
                cells = row.len(),
                expected = self.header.len(),
                "skipping short row"
            );
            return None;
        };

        let raw = fields.get(&self.format.data_column).unwrap_or_default();
        if raw.is_empty() {
            return Some(PhotoRecord::empty());
        }

        match PhotoRecord::decode_payload(raw) {
            Ok(record) => Some(record),
            Err(err) => {
                tracing::warn!(line = line_no, error = %err, "undecodable record payload");
                Some(PhotoRecord::empty())
            }
        }
    }
}

impl Iterator for Records<'_> {
    type Item = PhotoRecord;

    fn next(&mut self) -> Option<PhotoRecord> {
        loop {
            let (index, line) = self.lines.next()?;
            if line.trim().is_empty() {
                continue;
            }
            if let Some(record) = self.decode_row(index + 1, line) {
                return Some(record);
            }
        }
    }
}

/// Parse the header and return a lazy iterator over the data rows.
pub fn parse_records<'a>(text: &'a str, format: &TableFormat) -> Result<Records<'a>, ParseError> {
    let mut lines = text.split('\n').enumerate();

    let header_line = lines
        .by_ref()
        .map(|(_, line)| line)
        .find(|line| !line.trim_start_matches(BYTE_ORDER_MARK).trim().is_empty())
        .unwrap_or_default();
    let header = Header::parse(header_line, format)?;

    Ok(Records {
        header,
        format: format.clone(),
        lines,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn payload(json: &str) -> String {
        format!("\"{}\"", json.replace('"', "\"\""))
    }

    #[test]
    fn header_strips_bom_and_trims() {
        let header = Header::parse("\u{feff} id | data \r", &TableFormat::default()).unwrap();
        assert_eq!(header.names(), ["id", "data"]);
        assert_eq!(header.data_index(), 1);
    }

    #[test]
    fn header_without_data_column_is_fatal() {
        let err = parse_records("id|payload\n1|{}\n", &TableFormat::default())
            .err()
            .unwrap();
        assert_eq!(err, ParseError::MissingColumn("data".into()));

        // Matching is exact after trimming.
        assert!(parse_records("Data|x\n", &TableFormat::default()).is_err());
        assert!(parse_records("", &TableFormat::default()).is_err());
    }

    #[test]
    fn repeated_data_column_uses_the_last_one() {
        let text = "data|data\n{\"title\":\"first\"}|{\"title\":\"second\"}\n";
        let records: Vec<_> = parse_records(text, &TableFormat::default())
            .unwrap()
            .collect();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].title().as_deref(), Some("second"));

        let header = Header::parse("data|id|data", &TableFormat::default()).unwrap();
        assert_eq!(header.data_index(), 2);
    }

    #[test]
    fn long_rows_are_accepted_and_short_rows_rejected() {
        let header = Header::parse("x|y", &TableFormat::default()).unwrap();

        let long = RawRow::split("A|B|C", '|');
        let fields = FieldMap::zip(&header, &long).unwrap();
        assert_eq!(fields.iter().collect::<Vec<_>>(), [("x", "A"), ("y", "B")]);

        let short = RawRow::split("A", '|');
        assert!(FieldMap::zip(&header, &short).is_none());
    }

    #[test]
    fn rows_are_filtered_and_ordered() {
        let text = format!(
            "id|data\n\n1|{}\nshort\n2|{{not json}}\n3|{}|extra\n\n",
            payload(r#"{"title":"first","url_max":"1.jpg"}"#),
            payload(r#"{"title":"third","url_max_2000":"3.jpg"}"#),
        );

        let records: Vec<_> = parse_records(&text, &TableFormat::default())
            .unwrap()
            .collect();
        assert_eq!(records.len(), 3);
        assert_eq!(records[0].title().as_deref(), Some("first"));
        assert!(records[1].is_empty());
        assert_eq!(records[2].title().as_deref(), Some("third"));

        let shown: Vec<_> = parse_records(&text, &TableFormat::default())
            .unwrap()
            .displayable()
            .collect();
        assert_eq!(shown.len(), 2);
    }

    #[test]
    fn empty_data_cell_yields_empty_record() {
        let records: Vec<_> = parse_records("id|data\n1|\n", &TableFormat::default())
            .unwrap()
            .collect();
        assert_eq!(records, [PhotoRecord::empty()]);
    }

    #[test]
    fn leading_blank_lines_before_header_are_skipped() {
        let text = format!("\n\r\ndata\n{}\n", payload(r#"{"url_max":"a.jpg"}"#));
        let records: Vec<_> = parse_records(&text, &TableFormat::default())
            .unwrap()
            .collect();
        assert_eq!(records.len(), 1);
    }

    #[test]
    fn custom_format() {
        let format = TableFormat {
            delimiter: ';',
            data_column: "payload".into(),
        };
        let text = r#"payload;id
{"url_max":"a.jpg"};7"#;
        let records: Vec<_> = parse_records(text, &format).unwrap().collect();
        assert_eq!(records[0].url_max().as_deref(), Some("a.jpg"));
    }
}
