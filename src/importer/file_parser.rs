// ==========================================
// Brand backfill - file parsers
// ==========================================
// Supports: Excel (.xlsx/.xlsm/.xls/.ods) / CSV (.csv)
// Output: InputTable (header labels + text cells)
// ==========================================

use crate::importer::error::{ImportError, ImportResult};
use crate::importer::table::{normalize_cell, InputRow, InputTable};
use calamine::{open_workbook_auto, Data, Reader};
use csv::ReaderBuilder;
use std::fs::File;
use std::path::Path;
use tracing::debug;

/// Loads a file into an InputTable
pub trait TableParser {
    fn parse_table(&self, file_path: &Path) -> ImportResult<InputTable>;
}

fn ensure_exists(path: &Path) -> ImportResult<()> {
    if !path.exists() {
        return Err(ImportError::FileNotFound(path.display().to_string()));
    }
    Ok(())
}

fn header_label(raw: &str) -> String {
    // Excel-exported CSVs carry a BOM on the first label
    raw.trim_start_matches('\u{feff}').trim().to_string()
}

// ==========================================
// CSV Parser
// ==========================================
pub struct CsvParser;

impl TableParser for CsvParser {
    fn parse_table(&self, file_path: &Path) -> ImportResult<InputTable> {
        ensure_exists(file_path)?;

        let file = File::open(file_path)?;
        let mut reader = ReaderBuilder::new()
            .has_headers(true)
            .flexible(true) // rows may be shorter or longer than the header
            .from_reader(file);

        let columns: Vec<String> = reader.headers()?.iter().map(header_label).collect();
        if columns.iter().all(|c| c.is_empty()) {
            return Err(ImportError::MissingHeader);
        }

        let mut rows = Vec::new();
        for result in reader.records() {
            let record = result?;
            rows.push(InputRow::from_raw(record.iter()));
        }

        debug!(columns = columns.len(), rows = rows.len(), "CSV parsed");
        Ok(InputTable::new(columns, rows))
    }
}

// ==========================================
// Excel Parser
// ==========================================
#[derive(Default)]
pub struct ExcelParser {
    /// Sheet to read; the first sheet when None
    pub sheet: Option<String>,
}

impl ExcelParser {
    pub fn with_sheet(sheet: Option<String>) -> Self {
        Self { sheet }
    }
}

impl TableParser for ExcelParser {
    fn parse_table(&self, file_path: &Path) -> ImportResult<InputTable> {
        ensure_exists(file_path)?;

        let mut workbook = open_workbook_auto(file_path)?;

        let sheet_names = workbook.sheet_names();
        let sheet_name = match &self.sheet {
            Some(requested) => {
                if !sheet_names.iter().any(|n| n == requested) {
                    return Err(ImportError::SheetNotFound {
                        requested: requested.clone(),
                        available: sheet_names,
                    });
                }
                requested.clone()
            }
            None => sheet_names
                .first()
                .cloned()
                .ok_or_else(|| ImportError::ExcelParseError("workbook has no sheets".to_string()))?,
        };

        let range = workbook.worksheet_range(&sheet_name)?;

        let mut rows_iter = range.rows();
        let header_row = rows_iter.next().ok_or(ImportError::MissingHeader)?;
        let columns: Vec<String> = header_row
            .iter()
            .map(|cell| header_label(&cell.to_string()))
            .collect();

        let rows: Vec<InputRow> = rows_iter
            .map(|data_row| InputRow::new(data_row.iter().map(cell_text).collect()))
            .collect();

        debug!(sheet = %sheet_name, columns = columns.len(), rows = rows.len(), "Excel parsed");
        Ok(InputTable::new(columns, rows))
    }
}

/// Render a spreadsheet cell as text.
///
/// Product codes typed as numbers come back as floats; integral values
/// are printed without a fractional part so "1001" stays "1001".
fn cell_text(cell: &Data) -> Option<String> {
    match cell {
        Data::Empty | Data::Error(_) => None,
        Data::Float(f) if f.fract() == 0.0 && f.abs() < 1e15 => Some(format!("{}", *f as i64)),
        other => normalize_cell(&other.to_string()),
    }
}

// ==========================================
// Universal parser (dispatch on extension)
// ==========================================
pub struct UniversalFileParser;

impl UniversalFileParser {
    pub fn parse<P: AsRef<Path>>(&self, file_path: P, sheet: Option<String>) -> ImportResult<InputTable> {
        let path = file_path.as_ref();
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or("")
            .to_lowercase();

        match ext.as_str() {
            "csv" => CsvParser.parse_table(path),
            "xlsx" | "xlsm" | "xls" | "xlsb" | "ods" => ExcelParser::with_sheet(sheet).parse_table(path),
            _ => Err(ImportError::UnsupportedFormat(ext)),
        }
    }
}
