// ==========================================
// Brand backfill - brand repository
// ==========================================
// Responsibility: lookup-or-create on the brand table
// Red line: brands are created, never updated or deleted
// Slug uniqueness: check-then-insert, plus retry when a UNIQUE
// index on the slug column rejects the insert
// ==========================================

use crate::db::{lock, quote_ident, SharedConnection};
use crate::domain::slug::{slugify, truncate_slug, with_suffix};
use crate::domain::{Brand, BrandId};
use crate::repository::error::{RepositoryError, RepositoryResult};
use crate::repository::schema_catalog::ResolvedSchema;
use rusqlite::{params, OptionalExtension};
use std::sync::Arc;
use tracing::{debug, warn};

/// Base used when a name has no sluggable characters at all
pub const FALLBACK_SLUG: &str = "brand";

/// Insert attempts when the store rejects a slug another writer took
pub const MAX_INSERT_ATTEMPTS: usize = 3;

// ==========================================
// BrandRepository
// ==========================================
pub struct BrandRepository {
    conn: SharedConnection,
    schema: Arc<ResolvedSchema>,
}

impl BrandRepository {
    pub fn from_connection(conn: SharedConnection, schema: Arc<ResolvedSchema>) -> Self {
        Self { conn, schema }
    }

    /// Name as it would be stored (cut to the column length, by characters)
    pub fn storable_name(&self, name: &str) -> String {
        name.chars().take(self.schema.name_max_len).collect()
    }

    /// Exact-match lookup, no case or whitespace folding
    ///
    /// A name longer than the name column is looked up verbatim first, then in
    /// its stored (truncated) form so a brand an earlier run created is found
    /// again. The fallback can match a different brand that shares the same
    /// leading characters; that is accepted over creating a duplicate per run.
    pub fn find_by_name(&self, name: &str) -> RepositoryResult<Option<BrandId>> {
        if let Some(id) = self.find_exact(name)? {
            return Ok(Some(id));
        }
        if name.chars().count() <= self.schema.name_max_len {
            return Ok(None);
        }
        let stored = self.storable_name(name);
        let id = self.find_exact(&stored)?;
        if id.is_some() {
            debug!(name = %name, stored = %stored, "brand matched by truncated name");
        }
        Ok(id)
    }

    fn find_exact(&self, name: &str) -> RepositoryResult<Option<BrandId>> {
        let sql = format!(
            "SELECT {id} FROM {table} WHERE {name} = ?1 ORDER BY {id} LIMIT 1",
            id = quote_ident(&self.schema.brand_id_column),
            table = quote_ident(&self.schema.brand_table),
            name = quote_ident(&self.schema.brand_name_column),
        );
        let conn = lock(&self.conn)?;
        let id = conn
            .query_row(&sql, params![name], |row| row.get::<_, i64>(0))
            .optional()?;
        Ok(id.map(BrandId))
    }

    pub fn slug_exists(&self, slug: &str) -> RepositoryResult<bool> {
        let sql = format!(
            "SELECT 1 FROM {table} WHERE {slug} = ?1 LIMIT 1",
            table = quote_ident(&self.schema.brand_table),
            slug = quote_ident(&self.schema.brand_slug_column),
        );
        let conn = lock(&self.conn)?;
        let hit = conn
            .query_row(&sql, params![slug], |_row| Ok(()))
            .optional()?;
        Ok(hit.is_some())
    }

    /// Base slug for a name, already cut to the slug column length
    pub fn base_slug(&self, name: &str) -> String {
        let slug = slugify(name);
        let slug = if slug.is_empty() { FALLBACK_SLUG.to_string() } else { slug };
        truncate_slug(&slug, self.schema.slug_max_len)
    }

    /// Check `base`, `base-1`, `base-2`, ... and return the first free one
    pub fn next_free_slug(&self, base: &str) -> RepositoryResult<String> {
        let mut suffix = 0usize;
        loop {
            let candidate = with_suffix(base, suffix, self.schema.slug_max_len);
            if !self.slug_exists(&candidate)? {
                if suffix > 0 {
                    debug!(base = %base, slug = %candidate, "slug collision resolved with suffix");
                }
                return Ok(candidate);
            }
            suffix += 1;
        }
    }

    fn insert(&self, name: &str, slug: &str) -> RepositoryResult<BrandId> {
        let sql = format!(
            "INSERT INTO {table} ({name}, {slug}) VALUES (?1, ?2)",
            table = quote_ident(&self.schema.brand_table),
            name = quote_ident(&self.schema.brand_name_column),
            slug = quote_ident(&self.schema.brand_slug_column),
        );
        let conn = lock(&self.conn)?;
        conn.execute(&sql, params![name, slug])?;
        Ok(BrandId(conn.last_insert_rowid()))
    }

    fn is_slug_conflict(&self, err: &RepositoryError) -> bool {
        match err {
            RepositoryError::UniqueConstraintViolation(msg) => {
                msg.contains(&format!(".{}", self.schema.brand_slug_column))
            }
            _ => false,
        }
    }

    /// Create a brand with a slug no other brand uses
    ///
    /// # Steps
    /// 1. base slug from the name, cut to the slug column length
    /// 2. first free of `base`, `base-1`, `base-2`, ...
    /// 3. insert with the name cut to the name column length
    /// 4. on a UNIQUE violation of the slug index, search again (bounded)
    pub fn create_with_unique_slug(&self, name: &str) -> RepositoryResult<Brand> {
        let base = self.base_slug(name);
        let stored_name = self.storable_name(name);

        for attempt in 1..=MAX_INSERT_ATTEMPTS {
            let slug = self.next_free_slug(&base)?;
            match self.insert(&stored_name, &slug) {
                Ok(id) => {
                    debug!(brand_id = %id, slug = %slug, "brand created");
                    return Ok(Brand {
                        id,
                        name: stored_name,
                        slug,
                    });
                }
                Err(e) if self.is_slug_conflict(&e) => {
                    warn!(attempt, slug = %slug, error = %e, "slug taken concurrently, retrying");
                }
                Err(e) => return Err(e),
            }
        }

        Err(RepositoryError::SlugExhausted {
            base,
            attempts: MAX_INSERT_ATTEMPTS,
        })
    }
}
