// Service exports
pub mod spreadsheet;

pub use spreadsheet::{
    assignments_to_csv, assignments_to_xlsx, read_roster_csv, read_roster_xlsx, render_preview,
    write_assignments_csv, SpreadsheetError, EXPORT_HEADERS, EXPORT_SHEET_NAME, REQUIRED_COLUMNS,
};
