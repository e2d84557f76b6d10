// ==========================================
// Brand backfill - loaded input table
// ==========================================
// Every cell is text or missing. Blank and whitespace-only
// cells are normalised to None at load time.
// ==========================================

/// One data row, cells in column order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InputRow {
    cells: Vec<Option<String>>,
}

impl InputRow {
    pub fn new(cells: Vec<Option<String>>) -> Self {
        Self { cells }
    }

    /// Build a row from raw strings, treating blank strings as missing
    pub fn from_raw<I, S>(raw: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            cells: raw.into_iter().map(|s| normalize_cell(s.as_ref())).collect(),
        }
    }

    /// Cell at a column position (short rows read as missing)
    pub fn cell(&self, index: usize) -> Option<&str> {
        self.cells.get(index).and_then(|c| c.as_deref())
    }

    pub fn is_blank(&self) -> bool {
        self.cells.iter().all(Option::is_none)
    }
}

/// Ordered column labels plus data rows
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InputTable {
    pub columns: Vec<String>,
    pub rows: Vec<InputRow>,
}

impl InputTable {
    pub fn new(columns: Vec<String>, rows: Vec<InputRow>) -> Self {
        Self { columns, rows }
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Cell of `row` under the column labelled exactly `label`
    pub fn cell(&self, row: usize, label: &str) -> Option<&str> {
        let col = self.columns.iter().position(|c| c == label)?;
        self.rows.get(row)?.cell(col)
    }
}

/// Trim a raw cell; empty after trimming means missing
pub fn normalize_cell(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}
