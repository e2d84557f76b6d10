// ==========================================
// Brand backfill - core library
// ==========================================
// Fills missing product -> brand links in a SQLite store from
// an external product sheet, creating brands on demand.
// Existing links are never overwritten.
// ==========================================

// ==========================================
// Modules
// ==========================================

// Domain - entities, outcome counters, slug generator
pub mod domain;

// Repository - data access
pub mod repository;

// Engine - reconciliation rules
pub mod engine;

// Importer - external table
pub mod importer;

// Config - connection + target schema
pub mod config;

// Database infrastructure (connection opening, PRAGMAs, row scopes)
pub mod db;

// Logging
pub mod logging;

// ==========================================
// Re-exports
// ==========================================

pub use config::{ConnectionSettings, ReconcileConfig, TargetSchema};
pub use domain::{Brand, BrandId, ReconciliationOutcome, RowFailure, SkipReason};
pub use engine::{run_backfill, BackfillRequest, ReconcileError, Reconciler};
pub use importer::{InputRow, InputTable, UniversalFileParser};

// ==========================================
// Constants
// ==========================================

pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub const APP_NAME: &str = "brand-backfill";
