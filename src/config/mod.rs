// ==========================================
// Brand backfill - configuration layer
// ==========================================
// Responsibility: connection settings + target schema description
// Sources: defaults, TOML file, environment, CLI flags
// ==========================================

pub mod connection;
pub mod error;
pub mod loader;
pub mod target_schema;

pub use connection::{env_keys, ConnectionLayer, ConnectionSettings, DEFAULT_HOST, DEFAULT_PORT};
pub use error::ConfigError;
pub use loader::{ConfigFile, ReconcileConfig};
pub use target_schema::{TargetSchema, DEFAULT_MAX_TEXT_LEN};
