// ==========================================
// Brand backfill - repository layer
// ==========================================
// Red line: no reconciliation rules in here
// Constraint: values are always bound parameters,
// identifiers are always quoted
// ==========================================

pub mod brand_repo;
pub mod error;
pub mod product_repo;
pub mod schema_catalog;

pub use brand_repo::BrandRepository;
pub use error::{RepositoryError, RepositoryResult};
pub use product_repo::ProductRepository;
pub use schema_catalog::{ColumnInfo, ResolvedSchema, SchemaCatalog};
