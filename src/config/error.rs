// ==========================================
// Brand backfill - configuration errors
// ==========================================

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("cannot read config file {path}: {message}")]
    ReadFailed { path: String, message: String },

    #[error("invalid config file {path}: {message}")]
    ParseFailed { path: String, message: String },

    #[error("cannot load env file {path}: {message}")]
    EnvFileFailed { path: String, message: String },

    #[error("invalid database port: {0}")]
    InvalidPort(String),

    #[error(
        "missing DB credentials ({}); set DB_USERNAME/DB_PASSWORD/DB_NAME in the environment, the config file or on the command line",
        .0.join(", ")
    )]
    MissingCredentials(Vec<&'static str>),
}
