// ==========================================
// Brand backfill - reconciliation engine
// ==========================================
// Per row:
//   Validate -> Lookup Product -> Check Existing Brand
//   -> Resolve Brand -> Apply Update -> Committed
// with Skip / Error reachable from every step.
// ==========================================
// Red lines:
// - an existing brand FK is never overwritten
// - one row's failure never aborts the run
// - each row commits on its own (brand insert + product update together)
// ==========================================

use crate::config::{ReconcileConfig, TargetSchema};
use crate::db::{self, RowScope, RunScope, SharedConnection};
use crate::domain::{BrandId, ReconciliationOutcome, RowDisposition, RowFailure, SkipReason};
use crate::engine::error::{ReconcileError, ReconcileResult};
use crate::importer::{resolve_input_columns, InputColumns, InputRow, InputTable, UniversalFileParser};
use crate::repository::{
    BrandRepository, ProductRepository, RepositoryResult, ResolvedSchema, SchemaCatalog,
};
use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{debug, error, info, instrument, warn, Span};
use uuid::Uuid;

/// Rows between two progress lines
pub const PROGRESS_EVERY: usize = 500;

/// What to reconcile and how
#[derive(Debug, Clone)]
pub struct BackfillRequest {
    pub input: PathBuf,
    pub sheet: Option<String>,
    pub dry_run: bool,
}

// ==========================================
// Reconciler
// ==========================================
pub struct Reconciler {
    conn: SharedConnection,
    brands: BrandRepository,
    products: ProductRepository,
    dry_run: bool,
}

impl Reconciler {
    pub fn new(conn: SharedConnection, schema: Arc<ResolvedSchema>) -> Self {
        Self {
            brands: BrandRepository::from_connection(Arc::clone(&conn), Arc::clone(&schema)),
            products: ProductRepository::from_connection(Arc::clone(&conn), schema),
            conn,
            dry_run: false,
        }
    }

    /// Resolve the target schema once, then build the engine on it
    pub fn prepare(conn: SharedConnection, target: &TargetSchema) -> ReconcileResult<Self> {
        let schema = SchemaCatalog::new(&conn).resolve(target)?;
        Ok(Self::new(conn, Arc::new(schema)))
    }

    pub fn with_dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    /// Process every row of `table` in order and report the counters.
    ///
    /// Only failing to open or close the dry-run transaction is an error;
    /// row failures are recorded in the outcome.
    #[instrument(skip(self, table, columns), fields(run_id = tracing::field::Empty, rows = table.len(), dry_run = self.dry_run))]
    pub fn run(
        &self,
        table: &InputTable,
        columns: &InputColumns,
    ) -> ReconcileResult<ReconciliationOutcome> {
        let run_id = Uuid::new_v4().to_string();
        Span::current().record("run_id", run_id.as_str());
        info!(run_id = %run_id, rows = table.len(), dry_run = self.dry_run, "reconciliation started");

        let mut outcome = ReconciliationOutcome::new(run_id, self.dry_run);
        // committed brand ids only; a rolled-back row never lands here
        let mut brand_cache: HashMap<String, BrandId> = HashMap::new();

        let run_scope = if self.dry_run {
            Some(RunScope::begin(&self.conn)?)
        } else {
            None
        };

        for (index, row) in table.rows.iter().enumerate() {
            let code = required_cell(row, columns.code.index);

            match self.process_row(row, columns, &brand_cache) {
                Ok(disposition) => {
                    match disposition {
                        RowDisposition::Updated { brand_id, brand_created } => {
                            debug!(row = index, code = ?code, brand_id = %brand_id, brand_created, "product updated");
                            if let Some(name) = required_cell(row, columns.brand.index) {
                                brand_cache.insert(name.to_string(), brand_id);
                            }
                        }
                        RowDisposition::Skipped(reason) => {
                            debug!(row = index, code = ?code, reason = ?reason, "row skipped");
                        }
                    }
                    outcome.record(disposition);
                }
                Err(e) => {
                    error!(row = index, code = ?code, error = %e, "row failed");
                    outcome.record_failure(RowFailure {
                        index,
                        product_code: code.map(str::to_string),
                        message: e.to_string(),
                    });
                }
            }

            if (index + 1) % PROGRESS_EVERY == 0 {
                info!(
                    processed = index + 1,
                    brands_created = outcome.brands_created,
                    products_updated = outcome.products_updated,
                    products_skipped = outcome.products_skipped,
                    errors = outcome.errors,
                    "progress"
                );
            }
        }

        if let Some(scope) = run_scope {
            scope.discard()?;
            warn!("dry run: all changes rolled back");
        }

        outcome.finish();
        info!(
            rows = outcome.rows_seen(),
            brands_created = outcome.brands_created,
            products_updated = outcome.products_updated,
            products_skipped = outcome.products_skipped,
            errors = outcome.errors,
            "reconciliation finished"
        );
        Ok(outcome)
    }

    /// One row inside its own unit of work.
    ///
    /// Every early return drops the scope, which rolls back a brand
    /// inserted for this row.
    fn process_row(
        &self,
        row: &InputRow,
        columns: &InputColumns,
        brand_cache: &HashMap<String, BrandId>,
    ) -> RepositoryResult<RowDisposition> {
        // === Validate ===
        let (code, brand_name) = match (
            required_cell(row, columns.code.index),
            required_cell(row, columns.brand.index),
        ) {
            (Some(code), Some(brand)) => (code, brand),
            _ => return Ok(RowDisposition::Skipped(SkipReason::BlankCell)),
        };

        let scope = RowScope::begin(&self.conn)?;

        // === Lookup Product ===
        let product = match self.products.find_by_code(code)? {
            Some(product) => product,
            None => {
                scope.rollback()?;
                return Ok(RowDisposition::Skipped(SkipReason::ProductNotFound));
            }
        };

        // === Check Existing Brand ===
        if product.has_brand() {
            scope.rollback()?;
            return Ok(RowDisposition::Skipped(SkipReason::BrandAlreadySet));
        }

        // === Resolve Brand ===
        let cached = match brand_cache.get(brand_name) {
            Some(id) => Some(*id),
            None => self.brands.find_by_name(brand_name)?,
        };
        let (brand_id, brand_created) = match cached {
            Some(id) => (id, false),
            None => (self.brands.create_with_unique_slug(brand_name)?.id, true),
        };

        // === Apply Update ===
        if !self.products.set_brand_if_blank(product.id, brand_id)? {
            // FK was filled between the check and the update
            scope.rollback()?;
            return Ok(RowDisposition::Skipped(SkipReason::BrandAlreadySet));
        }

        scope.commit()?;
        Ok(RowDisposition::Updated {
            brand_id,
            brand_created,
        })
    }
}

/// Trimmed, non-blank cell value
fn required_cell(row: &InputRow, index: usize) -> Option<&str> {
    row.cell(index).map(str::trim).filter(|s| !s.is_empty())
}

// ==========================================
// run_backfill - whole pipeline
// ==========================================
/// Load the input, resolve every column, open the store, reconcile.
///
/// Everything before the first row is fatal; nothing is written
/// unless all columns resolved.
pub fn run_backfill(
    config: &ReconcileConfig,
    request: &BackfillRequest,
) -> ReconcileResult<ReconciliationOutcome> {
    info!(input = %request.input.display(), sheet = ?request.sheet, "loading input table");
    let table = UniversalFileParser.parse(&request.input, request.sheet.clone())?;
    info!(rows = table.len(), columns = table.columns.len(), "input table loaded");

    let columns = resolve_input_columns(
        &table,
        &config.schema.code_column_candidates,
        &config.schema.brand_column_candidates,
    )?;

    info!(target = %config.connection, "connecting to target database");
    let conn = db::connect(&config.connection).map_err(|e| ReconcileError::DatabaseOpen {
        path: config.connection.database_path().display().to_string(),
        message: e.to_string(),
    })?;

    let reconciler = Reconciler::prepare(conn, &config.schema)?.with_dry_run(request.dry_run);
    reconciler.run(&table, &columns)
}
