// ==========================================
// Brand backfill - config file loading
// ==========================================
// Optional TOML file:
//
//   [database]
//   host = "127.0.0.1"
//   user = "catalog"
//   password = "..."
//   database = "shop.db"
//
//   [schema]
//   product_table = "products"
//   brand_fk_candidates = ["brand_id", "brandId", "brand"]
// ==========================================

use crate::config::connection::{ConnectionLayer, ConnectionSettings};
use crate::config::error::ConfigError;
use crate::config::target_schema::TargetSchema;
use serde::Deserialize;
use std::fs;
use std::path::Path;
use tracing::debug;

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ConfigFile {
    pub database: ConnectionLayer,
    pub schema: TargetSchema,
}

impl ConfigFile {
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let raw = fs::read_to_string(path).map_err(|e| ConfigError::ReadFailed {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;
        Self::parse(&raw, path)
    }

    pub fn parse(raw: &str, origin: &Path) -> Result<Self, ConfigError> {
        toml::from_str(raw).map_err(|e| ConfigError::ParseFailed {
            path: origin.display().to_string(),
            message: e.to_string(),
        })
    }
}

/// Everything a run needs besides the input table
#[derive(Debug, Clone)]
pub struct ReconcileConfig {
    pub connection: ConnectionSettings,
    pub schema: TargetSchema,
}

impl ReconcileConfig {
    /// Merge file, environment and CLI layers, then validate credentials
    pub fn assemble(
        file: Option<ConfigFile>,
        env: ConnectionLayer,
        cli: ConnectionLayer,
    ) -> Result<Self, ConfigError> {
        let ConfigFile { database, schema } = file.unwrap_or_default();
        let connection = database.merge(env).merge(cli).resolve()?;
        debug!(connection = ?connection, "connection settings resolved");
        Ok(Self { connection, schema })
    }
}
