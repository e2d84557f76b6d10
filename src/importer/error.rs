// ==========================================
// Brand backfill - import layer errors
// ==========================================
// Tool: thiserror derive
// ==========================================

use thiserror::Error;

/// Import layer error type
#[derive(Error, Debug)]
pub enum ImportError {
    // ===== file errors =====
    #[error("file not found: {0}")]
    FileNotFound(String),

    #[error("unsupported file format: {0} (expected .xlsx/.xlsm/.xls/.ods/.csv)")]
    UnsupportedFormat(String),

    #[error("failed to read file: {0}")]
    FileReadError(String),

    #[error("Excel parse failed: {0}")]
    ExcelParseError(String),

    #[error("CSV parse failed: {0}")]
    CsvParseError(String),

    #[error("sheet not found: {requested} (available: {available:?})")]
    SheetNotFound {
        requested: String,
        available: Vec<String>,
    },

    #[error("input has no header row")]
    MissingHeader,

    // ===== column resolution =====
    #[error("could not detect the {field} column; tried {candidates:?}, found columns {found:?}")]
    ColumnNotFound {
        field: String,
        candidates: Vec<String>,
        found: Vec<String>,
    },
}

impl From<std::io::Error> for ImportError {
    fn from(err: std::io::Error) -> Self {
        ImportError::FileReadError(err.to_string())
    }
}

impl From<csv::Error> for ImportError {
    fn from(err: csv::Error) -> Self {
        ImportError::CsvParseError(err.to_string())
    }
}

impl From<calamine::Error> for ImportError {
    fn from(err: calamine::Error) -> Self {
        ImportError::ExcelParseError(err.to_string())
    }
}

/// Result alias
pub type ImportResult<T> = Result<T, ImportError>;
