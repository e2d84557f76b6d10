// ==========================================
// Brand backfill - import layer
// ==========================================
// Responsibility: load the external table, locate its columns
// Supports: Excel, CSV
// ==========================================

pub mod column_resolver;
pub mod error;
pub mod file_parser;
pub mod table;

pub use column_resolver::{
    require_column, resolve_column, resolve_index, resolve_input_columns, InputColumns,
    ResolvedColumn,
};
pub use error::{ImportError, ImportResult};
pub use file_parser::{CsvParser, ExcelParser, TableParser, UniversalFileParser};
pub use table::{InputRow, InputTable};
