use crate::models::{
    AssignmentResult, AssignmentRow, RawRow, SITE_COLUMN, STAFF_NAME_COLUMN, TEAM_COLUMN,
};
use calamine::{open_workbook_auto_from_rs, Data, Reader};
use csv::{ReaderBuilder, Trim, WriterBuilder};
use rust_xlsxwriter::{Format, Workbook, XlsxError};
use std::collections::HashSet;
use std::io::{Cursor, Read, Write};
use thiserror::Error;

/// Columns that must be present in an uploaded roster sheet
pub const REQUIRED_COLUMNS: [&str; 3] = [STAFF_NAME_COLUMN, TEAM_COLUMN, SITE_COLUMN];

/// Header row of the exported pairing sheet
pub const EXPORT_HEADERS: [&str; 2] = ["Person 1", "Person 2"];

/// Name of the single worksheet in the exported workbook
pub const EXPORT_SHEET_NAME: &str = "Matches";

/// Errors that can occur while reading or writing spreadsheets
#[derive(Debug, Error)]
pub enum SpreadsheetError {
    #[error("CSV error: {0}")]
    CsvError(#[from] csv::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Workbook error: {0}")]
    WorkbookError(#[from] calamine::Error),

    #[error("XLSX error: {0}")]
    XlsxError(#[from] XlsxError),

    #[error("Workbook has no worksheets")]
    EmptyWorkbook,

    #[error("Missing required column: {0}")]
    MissingColumn(String),
}

fn check_required_columns<'a>(
    headers: impl IntoIterator<Item = &'a str>,
) -> Result<(), SpreadsheetError> {
    let present: HashSet<&str> = headers.into_iter().collect();
    match REQUIRED_COLUMNS.iter().find(|column| !present.contains(*column)) {
        Some(missing) => Err(SpreadsheetError::MissingColumn(missing.to_string())),
        None => Ok(()),
    }
}

/// Read roster rows from CSV text with a header row.
///
/// Rows shorter than the header are accepted; their missing cells are
/// simply absent from the row map.
pub fn read_roster_csv<R: Read>(reader: R) -> Result<Vec<RawRow>, SpreadsheetError> {
    let mut reader = ReaderBuilder::new()
        .flexible(true)
        .trim(Trim::Headers)
        .from_reader(reader);

    let headers = reader.headers()?.clone();
    check_required_columns(headers.iter())?;

    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record?;
        let row: RawRow = headers
            .iter()
            .zip(record.iter())
            .map(|(column, value)| (column.to_string(), value.to_string()))
            .collect();
        rows.push(row);
    }

    tracing::debug!("Read {} roster rows ({} columns)", rows.len(), headers.len());

    Ok(rows)
}

/// Read roster rows from the first worksheet of an `.xlsx`, `.xls` or
/// `.ods` workbook. The first row of the used range is the header row.
///
/// Empty cells are left out of the row map and fully blank rows are
/// skipped. Whole numbers (Excel stores `Team #` as a float) are rendered
/// without a fractional part, so `1.0` reads as `"1"`.
pub fn read_roster_xlsx(bytes: &[u8]) -> Result<Vec<RawRow>, SpreadsheetError> {
    let mut workbook = open_workbook_auto_from_rs(Cursor::new(bytes))?;
    let range = workbook
        .worksheet_range_at(0)
        .ok_or(SpreadsheetError::EmptyWorkbook)??;

    let mut lines = range.rows();
    let headers: Vec<String> = lines
        .next()
        .map(|header| header.iter().map(|cell| cell_text(cell).trim().to_string()).collect())
        .unwrap_or_default();
    check_required_columns(headers.iter().map(String::as_str))?;

    let mut rows = Vec::new();
    for line in lines {
        let row: RawRow = headers
            .iter()
            .zip(line.iter())
            .filter(|(column, cell)| !column.is_empty() && !matches!(cell, Data::Empty))
            .map(|(column, cell)| (column.clone(), cell_text(cell)))
            .collect();
        if !row.is_empty() {
            rows.push(row);
        }
    }

    tracing::debug!("Read {} roster rows from workbook ({} columns)", rows.len(), headers.len());

    Ok(rows)
}

fn cell_text(cell: &Data) -> String {
    match cell {
        Data::Empty => String::new(),
        Data::String(s) => s.clone(),
        Data::Float(f) if f.is_finite() && f.fract() == 0.0 => format!("{}", *f as i64),
        other => other.to_string(),
    }
}

/// Write the pairing sheet: a `Person 1`/`Person 2` header, then one row per assignment
pub fn write_assignments_csv<W: Write>(
    writer: W,
    result: &AssignmentResult,
) -> Result<(), SpreadsheetError> {
    let mut writer = WriterBuilder::new().has_headers(false).from_writer(writer);

    writer.write_record(EXPORT_HEADERS)?;
    for assignment in result {
        let row = AssignmentRow::from(assignment);
        writer.write_record([row.person1.as_str(), row.person2.as_str()])?;
    }

    writer.flush()?;
    Ok(())
}

/// Render the pairing sheet into an in-memory CSV document
pub fn assignments_to_csv(result: &AssignmentResult) -> Result<String, SpreadsheetError> {
    let mut buffer = Vec::new();
    write_assignments_csv(&mut buffer, result)?;
    Ok(String::from_utf8_lossy(&buffer).into_owned())
}

/// Render the pairing sheet as an `.xlsx` workbook with one "Matches"
/// sheet. Unmatched people get an empty `Person 2` cell.
pub fn assignments_to_xlsx(result: &AssignmentResult) -> Result<Vec<u8>, SpreadsheetError> {
    let mut workbook = Workbook::new();
    let header = Format::new().set_bold();

    let worksheet = workbook.add_worksheet();
    worksheet.set_name(EXPORT_SHEET_NAME)?;
    for (col, title) in (0u16..).zip(EXPORT_HEADERS) {
        worksheet.write_string_with_format(0, col, title, &header)?;
    }

    for (row, assignment) in (1u32..).zip(result) {
        worksheet.write_string(row, 0, assignment.first.as_str())?;
        if let Some(second) = assignment.second.as_deref() {
            worksheet.write_string(row, 1, second)?;
        }
    }

    Ok(workbook.save_to_buffer()?)
}

/// Human-readable lines: `A ↔ B` for pairs, `A` alone for unmatched
pub fn render_preview(result: &AssignmentResult) -> Vec<String> {
    result
        .assignments()
        .iter()
        .map(|assignment| match &assignment.second {
            Some(second) => format!("{} ↔ {}", assignment.first, second),
            None => assignment.first.clone(),
        })
        .collect()
}
