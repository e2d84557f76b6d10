// ==========================================
// Brand backfill - run outcome
// ==========================================
// Lifecycle: zeroed at run start, mutated per row,
// reported at run end, then discarded
// ==========================================

use crate::domain::brand::BrandId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

// ==========================================
// SkipReason / RowDisposition
// ==========================================

/// Why a row ended without a store mutation. Skips are not errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SkipReason {
    BlankCell,       // code or brand cell missing/blank
    ProductNotFound, // no product with that code
    BrandAlreadySet, // non-destructive policy
}

/// Terminal state of a row that did not error
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RowDisposition {
    Updated { brand_id: BrandId, brand_created: bool },
    Skipped(SkipReason),
}

/// A row whose lookup/create/update sequence failed
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RowFailure {
    pub index: usize, // positional, 0-based data row
    pub product_code: Option<String>,
    pub message: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkipBreakdown {
    pub blank_cell: usize,
    pub product_not_found: usize,
    pub brand_already_set: usize,
}

// ==========================================
// ReconciliationOutcome
// ==========================================
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReconciliationOutcome {
    pub run_id: String,
    pub dry_run: bool,
    pub started_at: DateTime<Utc>,
    pub finished_at: Option<DateTime<Utc>>,

    // ===== counters =====
    pub brands_created: usize,
    pub products_updated: usize,
    pub products_skipped: usize,
    pub errors: usize,

    pub skip_breakdown: SkipBreakdown,
    pub failures: Vec<RowFailure>,
}

impl ReconciliationOutcome {
    pub fn new(run_id: impl Into<String>, dry_run: bool) -> Self {
        Self {
            run_id: run_id.into(),
            dry_run,
            started_at: Utc::now(),
            finished_at: None,
            brands_created: 0,
            products_updated: 0,
            products_skipped: 0,
            errors: 0,
            skip_breakdown: SkipBreakdown::default(),
            failures: Vec::new(),
        }
    }

    /// Count a row that reached a terminal non-error state
    pub fn record(&mut self, disposition: RowDisposition) {
        match disposition {
            RowDisposition::Updated { brand_created, .. } => {
                if brand_created {
                    self.brands_created += 1;
                }
                self.products_updated += 1;
            }
            RowDisposition::Skipped(reason) => {
                self.products_skipped += 1;
                match reason {
                    SkipReason::BlankCell => self.skip_breakdown.blank_cell += 1,
                    SkipReason::ProductNotFound => self.skip_breakdown.product_not_found += 1,
                    SkipReason::BrandAlreadySet => self.skip_breakdown.brand_already_set += 1,
                }
            }
        }
    }

    pub fn record_failure(&mut self, failure: RowFailure) {
        self.errors += 1;
        self.failures.push(failure);
    }

    pub fn finish(&mut self) {
        self.finished_at = Some(Utc::now());
    }

    /// Rows accounted for so far
    pub fn rows_seen(&self) -> usize {
        self.products_updated + self.products_skipped + self.errors
    }
}

/// Human-readable end-of-run report
impl fmt::Display for ReconciliationOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for failure in &self.failures {
            match &failure.product_code {
                Some(code) => writeln!(
                    f,
                    "Error processing row {} (code {}): {}",
                    failure.index, code, failure.message
                )?,
                None => writeln!(f, "Error processing row {}: {}", failure.index, failure.message)?,
            }
        }
        if self.dry_run {
            writeln!(f, "--- Done (dry run, nothing committed) ---")?;
        } else {
            writeln!(f, "--- Done ---")?;
        }
        writeln!(f, "Created brands: {}", self.brands_created)?;
        writeln!(f, "Updated products: {}", self.products_updated)?;
        writeln!(
            f,
            "Skipped products: {} (blank cell: {}, not found: {}, already branded: {})",
            self.products_skipped,
            self.skip_breakdown.blank_cell,
            self.skip_breakdown.product_not_found,
            self.skip_breakdown.brand_already_set
        )?;
        write!(f, "Errors: {}", self.errors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_outcome_counters() {
        let mut outcome = ReconciliationOutcome::new("run-1", false);
        outcome.record(RowDisposition::Updated { brand_id: BrandId(1), brand_created: true });
        outcome.record(RowDisposition::Updated { brand_id: BrandId(1), brand_created: false });
        outcome.record(RowDisposition::Skipped(SkipReason::BrandAlreadySet));
        outcome.record_failure(RowFailure {
            index: 3,
            product_code: Some("SKU9".to_string()),
            message: "boom".to_string(),
        });

        assert_eq!(outcome.brands_created, 1);
        assert_eq!(outcome.products_updated, 2);
        assert_eq!(outcome.products_skipped, 1);
        assert_eq!(outcome.skip_breakdown.brand_already_set, 1);
        assert_eq!(outcome.errors, 1);
        assert_eq!(outcome.rows_seen(), 4);
    }

    #[test]
    fn test_summary_lists_failed_rows() {
        let mut outcome = ReconciliationOutcome::new("run-2", false);
        outcome.record_failure(RowFailure {
            index: 7,
            product_code: None,
            message: "disk I/O error".to_string(),
        });

        let text = outcome.to_string();
        assert!(text.contains("Error processing row 7: disk I/O error"));
        assert!(text.contains("Created brands: 0"));
        assert!(text.ends_with("Errors: 1"));
    }
}
