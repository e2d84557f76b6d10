// ==========================================
// Brand backfill - schema catalog
// ==========================================
// Discovers the real column names of the target tables from the
// store's metadata catalog (pragma_table_info) instead of assuming
// them. Resolved once per run; the result is cached in ResolvedSchema.
// ==========================================

use crate::config::TargetSchema;
use crate::db::{lock, SharedConnection};
use crate::importer::column_resolver::resolve_column;
use crate::repository::error::{RepositoryError, RepositoryResult};
use std::sync::Arc;
use tracing::info;

/// One column as declared in the catalog
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnInfo {
    pub name: String,
    pub declared_type: String,
    pub not_null: bool,
}

impl ColumnInfo {
    /// Declared character length, e.g. 255 for `VARCHAR(255)`
    pub fn max_length(&self) -> Option<usize> {
        let upper = self.declared_type.to_ascii_uppercase();
        if !upper.contains("CHAR") {
            return None;
        }
        let open = upper.find('(')?;
        let close = upper[open..].find(')')? + open;
        upper[open + 1..close]
            .split(',')
            .next()?
            .trim()
            .parse::<usize>()
            .ok()
            .filter(|n| *n > 0)
    }
}

/// Column names and limits every row operation uses
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedSchema {
    pub product_table: String,
    pub product_id_column: String,
    pub product_code_column: String,
    pub brand_fk_column: String,

    pub brand_table: String,
    pub brand_id_column: String,
    pub brand_name_column: String,
    pub brand_slug_column: String,

    pub slug_max_len: usize,
    pub name_max_len: usize,
}

// ==========================================
// SchemaCatalog
// ==========================================
pub struct SchemaCatalog {
    conn: SharedConnection,
}

impl SchemaCatalog {
    pub fn from_connection(conn: SharedConnection) -> Self {
        Self { conn }
    }

    pub fn new(conn: &SharedConnection) -> Self {
        Self::from_connection(Arc::clone(conn))
    }

    /// Ordered columns of `table`
    pub fn columns(&self, table: &str) -> RepositoryResult<Vec<ColumnInfo>> {
        let conn = lock(&self.conn)?;
        let mut stmt =
            conn.prepare(r#"SELECT name, type, "notnull" FROM pragma_table_info(?1) ORDER BY cid"#)?;
        let columns = stmt
            .query_map([table], |row| {
                Ok(ColumnInfo {
                    name: row.get(0)?,
                    declared_type: row.get::<_, Option<String>>(1)?.unwrap_or_default(),
                    not_null: row.get::<_, i64>(2)? != 0,
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;

        if columns.is_empty() {
            return Err(RepositoryError::TableNotFound {
                table: table.to_string(),
            });
        }
        Ok(columns)
    }

    /// Resolve every column the reconciler touches
    pub fn resolve(&self, schema: &TargetSchema) -> RepositoryResult<ResolvedSchema> {
        let product_cols = self.columns(&schema.product_table)?;
        let product_id = find_column(&schema.product_table, "id", &product_cols, &["id"])?;
        let product_code = find_column(
            &schema.product_table,
            "product code",
            &product_cols,
            std::slice::from_ref(&schema.product_code_column),
        )?;
        let brand_fk = find_column(
            &schema.product_table,
            "brand FK",
            &product_cols,
            &schema.brand_fk_candidates,
        )?;

        let brand_cols = self.columns(&schema.brand_table)?;
        let brand_id = find_column(&schema.brand_table, "id", &brand_cols, &["id"])?;
        let brand_name = find_column(&schema.brand_table, "name", &brand_cols, &["name"])?;
        let brand_slug = find_column(&schema.brand_table, "slug", &brand_cols, &["slug"])?;

        let resolved = ResolvedSchema {
            product_table: schema.product_table.clone(),
            product_id_column: product_id.name.clone(),
            product_code_column: product_code.name.clone(),
            brand_fk_column: brand_fk.name.clone(),
            brand_table: schema.brand_table.clone(),
            brand_id_column: brand_id.name.clone(),
            brand_name_column: brand_name.name.clone(),
            brand_slug_column: brand_slug.name.clone(),
            slug_max_len: brand_slug.max_length().unwrap_or(schema.default_slug_max_len),
            name_max_len: brand_name.max_length().unwrap_or(schema.default_name_max_len),
        };

        info!(
            brand_fk = %resolved.brand_fk_column,
            slug_max_len = resolved.slug_max_len,
            name_max_len = resolved.name_max_len,
            "target schema resolved"
        );
        Ok(resolved)
    }
}

fn find_column<'a, C: AsRef<str>>(
    table: &str,
    field: &str,
    columns: &'a [ColumnInfo],
    candidates: &[C],
) -> RepositoryResult<&'a ColumnInfo> {
    let names: Vec<&str> = columns.iter().map(|c| c.name.as_str()).collect();
    let found = resolve_column(&names, candidates).ok_or_else(|| RepositoryError::ColumnNotFound {
        table: table.to_string(),
        field: field.to_string(),
        candidates: candidates.iter().map(|c| c.as_ref().to_string()).collect(),
        found: names.iter().map(|n| n.to_string()).collect(),
    })?;
    columns
        .iter()
        .find(|c| c.name == found)
        .ok_or_else(|| RepositoryError::DatabaseQueryError(format!("column {} vanished", found)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rusqlite::Connection;
    use std::sync::Mutex;

    fn catalog(ddl: &str) -> SchemaCatalog {
        let conn = Connection::open_in_memory().unwrap();
        conn.execute_batch(ddl).unwrap();
        SchemaCatalog::from_connection(Arc::new(Mutex::new(conn)))
    }

    #[test]
    fn test_max_length_parsing() {
        let col = |t: &str| ColumnInfo {
            name: "x".to_string(),
            declared_type: t.to_string(),
            not_null: false,
        };
        assert_eq!(col("VARCHAR(255)").max_length(), Some(255));
        assert_eq!(col("varchar( 64 )").max_length(), Some(64));
        assert_eq!(col("NCHAR(10)").max_length(), Some(10));
        assert_eq!(col("TEXT").max_length(), None);
        assert_eq!(col("DECIMAL(10,2)").max_length(), None);
        assert_eq!(col("").max_length(), None);
    }

    #[test]
    fn test_resolve_prefers_candidate_order() {
        let catalog = catalog(
            "CREATE TABLE products (id INTEGER PRIMARY KEY, product_code TEXT, brand TEXT, brandId INTEGER);
             CREATE TABLE brands (id INTEGER PRIMARY KEY, name VARCHAR(120), slug VARCHAR(100));",
        );
        let resolved = catalog.resolve(&TargetSchema::default()).unwrap();

        assert_eq!(resolved.brand_fk_column, "brandId");
        assert_eq!(resolved.product_code_column, "product_code");
        assert_eq!(resolved.slug_max_len, 100);
        assert_eq!(resolved.name_max_len, 120);
    }

    #[test]
    fn test_resolve_case_insensitive_fk() {
        let catalog = catalog(
            "CREATE TABLE products (id INTEGER PRIMARY KEY, PRODUCT_CODE TEXT, BRAND_ID INTEGER);
             CREATE TABLE brands (id INTEGER PRIMARY KEY, name TEXT, slug TEXT);",
        );
        let resolved = catalog.resolve(&TargetSchema::default()).unwrap();

        assert_eq!(resolved.brand_fk_column, "BRAND_ID");
        assert_eq!(resolved.product_code_column, "PRODUCT_CODE");
        assert_eq!(resolved.slug_max_len, 255);
    }

    #[test]
    fn test_missing_fk_column_lists_found_columns() {
        let catalog = catalog(
            "CREATE TABLE products (id INTEGER PRIMARY KEY, product_code TEXT, maker_id INTEGER);
             CREATE TABLE brands (id INTEGER PRIMARY KEY, name TEXT, slug TEXT);",
        );
        let err = catalog.resolve(&TargetSchema::default()).unwrap_err();
        match err {
            RepositoryError::ColumnNotFound { table, found, candidates, .. } => {
                assert_eq!(table, "products");
                assert_eq!(found, vec!["id", "product_code", "maker_id"]);
                assert_eq!(candidates, vec!["brand_id", "brandId", "brand"]);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_missing_table() {
        let catalog = catalog("CREATE TABLE brands (id INTEGER PRIMARY KEY, name TEXT, slug TEXT);");
        let err = catalog.columns("products").unwrap_err();
        assert!(matches!(err, RepositoryError::TableNotFound { table } if table == "products"));
    }
}
