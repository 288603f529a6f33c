use std::collections::BTreeSet;
use std::io::Cursor;
use std::path::Path;
use std::time::Duration;

use calamine::{open_workbook_auto_from_rs, Data, Reader};

use super::error::LoadError;
use super::model::{RawRow, RawTable, RawValue};
use super::source::{Source, SourceFormat};

/// Sheet the roster lives on when the workbook has several.
pub const DEFAULT_SHEET: &str = "Providers";

/// Knobs for a single load.
#[derive(Debug, Clone)]
pub struct LoadOptions {
    /// Workbook sheet to read; ignored for CSV.
    pub sheet_name: String,
    /// Whole-request timeout for remote sources.
    pub timeout: Duration,
}

impl Default for LoadOptions {
    fn default() -> Self {
        Self {
            sheet_name: DEFAULT_SHEET.to_string(),
            timeout: Duration::from_secs(30),
        }
    }
}

// ---------------------------------------------------------------------------
// Public entry-point
// ---------------------------------------------------------------------------

/// Load a raw table from a URL or a local file.  Dispatch by extension.
///
/// Supported formats:
/// * `.csv`  – header row followed by data rows; every cell kept as text
/// * `.xlsx` / `.xlsm` / `.xlsb` / `.xls` / `.ods` – the `sheet_name` sheet,
///   first row is the header, cells keep their spreadsheet type
pub fn load(source: &Source, opts: &LoadOptions) -> Result<RawTable, LoadError> {
    let format = source.format()?;
    let bytes = match source {
        Source::Url(url) => fetch(url, opts.timeout)?,
        Source::File(path) => read_local(path)?,
    };

    let table = parse_bytes(&bytes, format, &opts.sheet_name)?;
    log::info!(
        "Loaded {} rows with columns {:?} from {}",
        table.rows.len(),
        table.columns,
        source.label()
    );
    Ok(table)
}

/// Decode an in-memory file of the given format.
pub fn parse_bytes(bytes: &[u8], format: SourceFormat, sheet: &str) -> Result<RawTable, LoadError> {
    match format {
        SourceFormat::Csv => parse_csv(bytes),
        SourceFormat::Workbook => parse_workbook(bytes, sheet),
    }
}

// ---------------------------------------------------------------------------
// Transport
// ---------------------------------------------------------------------------

fn fetch(url: &str, timeout: Duration) -> Result<Vec<u8>, LoadError> {
    let network = |message: String| LoadError::Network {
        url: url.to_string(),
        message,
    };

    log::debug!("GET {url} (timeout {timeout:?})");
    let client = reqwest::blocking::Client::builder()
        .timeout(timeout)
        .build()
        .map_err(|e| network(e.to_string()))?;
    let response = client.get(url).send().map_err(|e| network(e.to_string()))?;

    let status = response.status();
    if !status.is_success() {
        return Err(network(format!("HTTP {status}")));
    }

    let body = response.bytes().map_err(|e| network(e.to_string()))?;
    Ok(body.to_vec())
}

fn read_local(path: &Path) -> Result<Vec<u8>, LoadError> {
    std::fs::read(path).map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })
}

// ---------------------------------------------------------------------------
// CSV loader
// ---------------------------------------------------------------------------

/// CSV layout: header row with column names, then one provider per line.
/// Short rows are padded with nulls; empty cells are null. A row with more
/// cells than the header is rejected rather than truncated.
fn parse_csv(bytes: &[u8]) -> Result<RawTable, LoadError> {
    let bytes = bytes.strip_prefix(b"\xEF\xBB\xBF").unwrap_or(bytes);
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .from_reader(bytes);

    let headers = reader
        .headers()
        .map_err(|e| LoadError::Parse(format!("reading CSV headers: {e}")))?;
    if headers.is_empty() {
        return Err(LoadError::Parse("CSV has no header row".to_string()));
    }
    let columns = header_names(headers.iter().map(str::to_string));

    let mut rows = Vec::new();
    for (row_no, result) in reader.records().enumerate() {
        let record =
            result.map_err(|e| LoadError::Parse(format!("CSV row {}: {e}", row_no + 1)))?;
        if record.len() > columns.len() {
            return Err(LoadError::Parse(format!(
                "CSV row {}: {} fields, header has {}",
                row_no + 1,
                record.len(),
                columns.len()
            )));
        }

        let row: RawRow = columns
            .iter()
            .enumerate()
            .map(|(i, col)| (col.clone(), text_cell(record.get(i).unwrap_or(""))))
            .collect();
        if row.values().all(RawValue::is_null) {
            continue;
        }
        rows.push(row);
    }

    Ok(RawTable::new(columns, rows))
}

fn text_cell(s: &str) -> RawValue {
    if s.is_empty() {
        RawValue::Null
    } else {
        RawValue::String(s.to_string())
    }
}

// ---------------------------------------------------------------------------
// Workbook loader
// ---------------------------------------------------------------------------

/// Read one sheet of a workbook. The first used row is the header.
fn parse_workbook(bytes: &[u8], sheet: &str) -> Result<RawTable, LoadError> {
    let mut workbook = open_workbook_auto_from_rs(Cursor::new(bytes))
        .map_err(|e| LoadError::Parse(format!("opening workbook: {e}")))?;

    let available = workbook.sheet_names();
    if !available.iter().any(|name| name == sheet) {
        return Err(LoadError::MissingSheet {
            sheet: sheet.to_string(),
            available,
        });
    }

    let range = workbook
        .worksheet_range(sheet)
        .map_err(|e| LoadError::Parse(format!("reading sheet '{sheet}': {e}")))?;

    let mut sheet_rows = range.rows();
    let header = sheet_rows
        .next()
        .ok_or_else(|| LoadError::Parse(format!("sheet '{sheet}' is empty")))?;
    let columns = header_names(header.iter().map(|c| cell_value(c).to_string()));

    let mut rows = Vec::new();
    for cells in sheet_rows {
        let row: RawRow = columns
            .iter()
            .enumerate()
            .map(|(i, col)| {
                let value = cells.get(i).map(cell_value).unwrap_or(RawValue::Null);
                (col.clone(), value)
            })
            .collect();
        if row.values().all(RawValue::is_null) {
            continue;
        }
        rows.push(row);
    }

    Ok(RawTable::new(columns, rows))
}

/// Convert a spreadsheet cell, keeping its type.
fn cell_value(cell: &Data) -> RawValue {
    match cell {
        Data::Empty => RawValue::Null,
        Data::String(s) if s.is_empty() => RawValue::Null,
        Data::String(s) => RawValue::String(s.clone()),
        Data::Int(i) => RawValue::Integer(*i),
        Data::Float(f) => RawValue::Float(*f),
        Data::Bool(b) => RawValue::Bool(*b),
        Data::DateTimeIso(s) | Data::DurationIso(s) => RawValue::Date(s.clone()),
        Data::DateTime(_) => RawValue::Date(cell.to_string()),
        Data::Error(_) => RawValue::String(cell.to_string()),
    }
}

// -- Header helpers --

/// Blank headers become `Unnamed: <index>`; repeated headers get `.1`, `.2`, …
/// so every column name is a unique key.
fn header_names(raw: impl Iterator<Item = String>) -> Vec<String> {
    let mut seen = BTreeSet::new();
    raw.enumerate()
        .map(|(i, name)| {
            let base = if name.trim().is_empty() {
                format!("Unnamed: {i}")
            } else {
                name
            };
            let mut unique = base.clone();
            let mut n = 1;
            while !seen.insert(unique.clone()) {
                unique = format!("{base}.{n}");
                n += 1;
            }
            unique
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use pretty_assertions::assert_eq;

    use super::*;

    fn s(v: &str) -> RawValue {
        RawValue::String(v.to_string())
    }

    #[test]
    fn csv_rows_keep_order_and_text() {
        let text = "MILV Radiologist/Extender,Employment Type,Subspecialty\n\
                    John Smith,Partner [2020],\"PET/CT, Body Imaging\"\n\
                    Jane Doe,Employee,Neuro\n";
        let table = parse_bytes(text.as_bytes(), SourceFormat::Csv, DEFAULT_SHEET).unwrap();

        assert_eq!(
            table.columns,
            vec!["MILV Radiologist/Extender", "Employment Type", "Subspecialty"]
        );
        assert_eq!(table.rows.len(), 2);
        assert_eq!(table.rows[0]["MILV Radiologist/Extender"], s("John Smith"));
        assert_eq!(table.rows[0]["Subspecialty"], s("PET/CT, Body Imaging"));
        assert_eq!(table.rows[1]["Employment Type"], s("Employee"));
    }

    #[test]
    fn csv_strips_bom_and_skips_blank_lines() {
        let text = "\u{feff}Name,Notes\nA,x\n,\nB,\n";
        let table = parse_csv(text.as_bytes()).unwrap();

        assert_eq!(table.columns, vec!["Name", "Notes"]);
        assert_eq!(table.rows.len(), 2);
        assert_eq!(table.rows[1]["Notes"], RawValue::Null);
    }

    #[test]
    fn csv_short_rows_are_padded_with_nulls() {
        let table = parse_csv(b"a,b,c\n1\n").unwrap();
        assert_eq!(table.rows[0]["a"], s("1"));
        assert_eq!(table.rows[0]["b"], RawValue::Null);
        assert_eq!(table.rows[0]["c"], RawValue::Null);
    }

    #[test]
    fn csv_row_wider_than_header_is_a_parse_error() {
        let text = "MILV Radiologist/Extender,Employment Type,Subspecialty\n\
                    Smith, John,Partner,PET/CT\n";
        let err = parse_bytes(text.as_bytes(), SourceFormat::Csv, DEFAULT_SHEET).unwrap_err();
        match err {
            LoadError::Parse(msg) => assert_eq!(msg, "CSV row 1: 4 fields, header has 3"),
            other => panic!("expected a parse error, got {other:?}"),
        }
    }

    #[test]
    fn csv_without_header_is_a_parse_error() {
        assert!(matches!(parse_csv(b""), Err(LoadError::Parse(_))));
    }

    #[test]
    fn csv_invalid_utf8_is_a_parse_error() {
        let bytes = b"Name\n\xff\xfe\n";
        assert!(matches!(parse_csv(bytes), Err(LoadError::Parse(_))));
    }

    #[test]
    fn garbage_workbook_is_a_parse_error() {
        let result = parse_bytes(b"definitely not a zip", SourceFormat::Workbook, DEFAULT_SHEET);
        assert!(matches!(result, Err(LoadError::Parse(_))));
    }

    /// Build an .xlsx in memory. Numeric text is written as a number cell and
    /// empty text leaves the cell blank.
    fn workbook_bytes(sheet: Option<&str>, rows: &[&[&str]]) -> Vec<u8> {
        let mut workbook = rust_xlsxwriter::Workbook::new();
        let worksheet = workbook.add_worksheet();
        if let Some(name) = sheet {
            worksheet.set_name(name).unwrap();
        }
        for (r, cells) in rows.iter().enumerate() {
            for (c, cell) in cells.iter().enumerate() {
                if cell.is_empty() {
                    continue;
                }
                let (r, c) = (r as u32, c as u16);
                match cell.parse::<f64>() {
                    Ok(n) => worksheet.write_number(r, c, n).unwrap(),
                    Err(_) => worksheet.write_string(r, c, *cell).unwrap(),
                };
            }
        }
        workbook.save_to_buffer().unwrap()
    }

    #[test]
    fn workbook_providers_sheet_is_read_with_typed_cells() {
        let bytes = workbook_bytes(
            Some("Providers"),
            &[
                &["MILV Radiologist/Extender", "Employment Type", "Subspecialty", "Start"],
                &["John Smith", "Partner [2020]", "PET/CT, Body Imaging", "2020"],
                &["Jane Doe", "Employee", "Neuro", ""],
            ],
        );
        let table = parse_bytes(&bytes, SourceFormat::Workbook, DEFAULT_SHEET).unwrap();

        assert_eq!(
            table.columns,
            vec!["MILV Radiologist/Extender", "Employment Type", "Subspecialty", "Start"]
        );
        assert_eq!(table.rows.len(), 2);
        assert_eq!(table.rows[0]["Subspecialty"], s("PET/CT, Body Imaging"));
        assert_eq!(table.rows[0]["Start"], RawValue::Float(2020.0));
        assert_eq!(table.rows[1]["MILV Radiologist/Extender"], s("Jane Doe"));
        assert_eq!(table.rows[1]["Start"], RawValue::Null);
    }

    #[test]
    fn workbook_without_providers_sheet_reports_available_sheets() {
        let bytes = workbook_bytes(None, &[&["Name"], &["John Smith"]]);
        let err = parse_bytes(&bytes, SourceFormat::Workbook, DEFAULT_SHEET).unwrap_err();

        match err {
            LoadError::MissingSheet { sheet, available } => {
                assert_eq!(sheet, "Providers");
                assert_eq!(available, vec!["Sheet1".to_string()]);
            }
            other => panic!("expected a missing sheet error, got {other:?}"),
        }
    }

    #[test]
    fn header_names_fill_blanks_and_dedupe() {
        let names = header_names(
            ["Name", "", "Name", "Name"].into_iter().map(str::to_string),
        );
        assert_eq!(names, vec!["Name", "Unnamed: 1", "Name.1", "Name.2"]);
    }

    #[test]
    fn workbook_cells_keep_type() {
        assert_eq!(cell_value(&Data::Float(3.0)), RawValue::Float(3.0));
        assert_eq!(cell_value(&Data::Int(7)), RawValue::Integer(7));
        assert_eq!(cell_value(&Data::String(String::new())), RawValue::Null);
        assert_eq!(cell_value(&Data::Empty), RawValue::Null);
    }

    #[test]
    fn missing_local_file_is_io_error() {
        let src = Source::File(PathBuf::from("/nonexistent/dir/providers.csv"));
        let err = load(&src, &LoadOptions::default()).unwrap_err();
        assert!(matches!(err, LoadError::Io { .. }));
    }

    #[test]
    fn unsupported_extension_fails_before_reading() {
        let src = Source::File(PathBuf::from("/nonexistent/providers.pdf"));
        let err = load(&src, &LoadOptions::default()).unwrap_err();
        assert!(matches!(err, LoadError::UnsupportedFormat(_)));
    }
}
