// ==========================================
// Brand backfill - engine layer
// ==========================================
// Responsibility: per-row reconciliation rules
// Red line: no SQL in here, every row ends Updated / Skipped / failed
// ==========================================

pub mod error;
pub mod reconciler;

pub use error::{ReconcileError, ReconcileResult};
pub use reconciler::{run_backfill, BackfillRequest, Reconciler, PROGRESS_EVERY};
