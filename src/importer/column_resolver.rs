// ==========================================
// Brand backfill - column resolver
// ==========================================
// Maps a logical field onto the label actually used by a
// table, given candidate labels in priority order.
// Pass 1: exact match. Pass 2: case-insensitive match.
// ==========================================

use crate::importer::error::{ImportError, ImportResult};
use crate::importer::table::InputTable;
use tracing::info;

/// Position of the first candidate present in `columns`, exact match first,
/// then case-insensitive. Returns the index into `columns`.
pub fn resolve_index<S, C>(columns: &[S], candidates: &[C]) -> Option<usize>
where
    S: AsRef<str>,
    C: AsRef<str>,
{
    for candidate in candidates {
        if let Some(idx) = columns.iter().position(|c| c.as_ref() == candidate.as_ref()) {
            return Some(idx);
        }
    }

    let lowered: Vec<String> = columns.iter().map(|c| c.as_ref().to_lowercase()).collect();
    for candidate in candidates {
        let wanted = candidate.as_ref().to_lowercase();
        if let Some(idx) = lowered.iter().position(|c| *c == wanted) {
            return Some(idx);
        }
    }
    None
}

/// Label of the first matching candidate, as spelled in `columns`
pub fn resolve_column<'a, S, C>(columns: &'a [S], candidates: &[C]) -> Option<&'a str>
where
    S: AsRef<str>,
    C: AsRef<str>,
{
    resolve_index(columns, candidates).map(|idx| columns[idx].as_ref())
}

/// A column resolved against the input table
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedColumn {
    pub label: String,
    pub index: usize,
}

/// The two input columns the reconciler reads
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InputColumns {
    pub code: ResolvedColumn,
    pub brand: ResolvedColumn,
}

/// Resolve one logical field or fail with the list of columns actually present
pub fn require_column<C: AsRef<str>>(
    table: &InputTable,
    field: &str,
    candidates: &[C],
) -> ImportResult<ResolvedColumn> {
    match resolve_index(&table.columns, candidates) {
        Some(index) => Ok(ResolvedColumn {
            label: table.columns[index].clone(),
            index,
        }),
        None => Err(ImportError::ColumnNotFound {
            field: field.to_string(),
            candidates: candidates.iter().map(|c| c.as_ref().to_string()).collect(),
            found: table.columns.clone(),
        }),
    }
}

/// Resolve the product-code and brand-name columns of the input table
pub fn resolve_input_columns<C: AsRef<str>>(
    table: &InputTable,
    code_candidates: &[C],
    brand_candidates: &[C],
) -> ImportResult<InputColumns> {
    let code = require_column(table, "product code", code_candidates)?;
    let brand = require_column(table, "brand name", brand_candidates)?;

    info!(code = %code.label, brand = %brand.label, "input columns detected");
    Ok(InputColumns { code, brand })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn labels(raw: &[&str]) -> Vec<String> {
        raw.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_exact_match_wins_in_priority_order() {
        let columns = labels(&["brand", "Brand", "productCode"]);
        assert_eq!(resolve_column(&columns, &["Brand", "brand"]), Some("Brand"));
        assert_eq!(resolve_column(&columns, &["Nhãn hàng", "brand"]), Some("brand"));
    }

    #[test]
    fn test_exact_match_beats_earlier_case_insensitive_candidate() {
        // "BRAND" only matches case-insensitively, "Brand" matches exactly
        let columns = labels(&["Brand"]);
        assert_eq!(resolve_index(&columns, &["BRAND", "Brand"]), Some(0));

        let columns = labels(&["brand_id", "BRANDID"]);
        assert_eq!(resolve_column(&columns, &["brandId", "BRANDID"]), Some("BRANDID"));
    }

    #[test]
    fn test_case_insensitive_fallback() {
        let columns = labels(&["PRODUCT_CODE", "NHÃN HÀNG"]);
        assert_eq!(resolve_column(&columns, &["product_code"]), Some("PRODUCT_CODE"));
        assert_eq!(resolve_column(&columns, &["Nhãn hàng"]), Some("NHÃN HÀNG"));
    }

    #[test]
    fn test_not_found() {
        let columns = labels(&["sku", "maker"]);
        assert_eq!(resolve_column(&columns, &["code", "brand"]), None);
    }

    #[test]
    fn test_require_column_reports_found_columns() {
        let table = InputTable::new(labels(&["sku", "maker"]), vec![]);
        let err = require_column(&table, "brand name", &["Brand"]).unwrap_err();
        match err {
            ImportError::ColumnNotFound { field, candidates, found } => {
                assert_eq!(field, "brand name");
                assert_eq!(candidates, vec!["Brand"]);
                assert_eq!(found, vec!["sku", "maker"]);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_resolve_input_columns() {
        let table = InputTable::new(labels(&["Ma hang hoa", "Ten", "brand"]), vec![]);
        let cols = resolve_input_columns(&table, &["Mã hàng hóa", "Ma hang hoa"], &["Brand", "brand"]).unwrap();
        assert_eq!(cols.code, ResolvedColumn { label: "Ma hang hoa".to_string(), index: 0 });
        assert_eq!(cols.brand, ResolvedColumn { label: "brand".to_string(), index: 2 });
    }
}
