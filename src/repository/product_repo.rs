// ==========================================
// Brand backfill - product repository
// ==========================================
// Responsibility: read id + brand FK by natural key, set the FK
// Red line: the brand FK is only written while it is blank
// ==========================================

use crate::db::{lock, quote_ident, SharedConnection};
use crate::domain::{BrandId, BrandRef, ProductBrandRef, ProductId};
use crate::repository::error::RepositoryResult;
use crate::repository::schema_catalog::ResolvedSchema;
use rusqlite::types::Value;
use rusqlite::{params, OptionalExtension};
use std::sync::Arc;

pub struct ProductRepository {
    conn: SharedConnection,
    schema: Arc<ResolvedSchema>,
}

impl ProductRepository {
    pub fn from_connection(conn: SharedConnection, schema: Arc<ResolvedSchema>) -> Self {
        Self { conn, schema }
    }

    /// Product whose natural key equals `code` (caller trims)
    pub fn find_by_code(&self, code: &str) -> RepositoryResult<Option<ProductBrandRef>> {
        let sql = format!(
            "SELECT {id}, {fk} FROM {table} WHERE {code} = ?1 LIMIT 1",
            id = quote_ident(&self.schema.product_id_column),
            fk = quote_ident(&self.schema.brand_fk_column),
            table = quote_ident(&self.schema.product_table),
            code = quote_ident(&self.schema.product_code_column),
        );
        let conn = lock(&self.conn)?;
        let product = conn
            .query_row(&sql, params![code], |row| {
                Ok(ProductBrandRef {
                    id: ProductId(row.get(0)?),
                    brand_ref: brand_ref_from(row.get::<_, Value>(1)?),
                })
            })
            .optional()?;
        Ok(product)
    }

    /// Point the product at `brand` unless its FK was set in the meantime.
    ///
    /// Returns false when the guard matched no row (FK already non-blank).
    pub fn set_brand_if_blank(&self, product: ProductId, brand: BrandId) -> RepositoryResult<bool> {
        let sql = format!(
            "UPDATE {table} SET {fk} = ?1 \
             WHERE {id} = ?2 AND ({fk} IS NULL OR (typeof({fk}) = 'text' AND TRIM({fk}) = ''))",
            table = quote_ident(&self.schema.product_table),
            fk = quote_ident(&self.schema.brand_fk_column),
            id = quote_ident(&self.schema.product_id_column),
        );
        let conn = lock(&self.conn)?;
        let changed = conn.execute(&sql, params![brand.0, product.0])?;
        Ok(changed > 0)
    }
}

fn brand_ref_from(value: Value) -> BrandRef {
    match value {
        Value::Null => BrandRef::Null,
        Value::Integer(i) => BrandRef::Integer(i),
        Value::Real(f) => BrandRef::Real(f),
        Value::Text(s) => BrandRef::Text(s),
        Value::Blob(b) => BrandRef::Blob(b.len()),
    }
}
