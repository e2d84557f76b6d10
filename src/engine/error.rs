// ==========================================
// Brand backfill - engine errors
// ==========================================
// Only the fatal path: anything that stops the run before
// (or instead of) processing rows. Row errors never get here.
// ==========================================

use crate::config::ConfigError;
use crate::importer::ImportError;
use crate::repository::RepositoryError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ReconcileError {
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("input error: {0}")]
    Import(#[from] ImportError),

    #[error("cannot open database {path}: {message}")]
    DatabaseOpen { path: String, message: String },

    #[error("database error: {0}")]
    Repository(#[from] RepositoryError),
}

pub type ReconcileResult<T> = Result<T, ReconcileError>;
