// ==========================================
// Brand backfill - connection settings
// ==========================================
// Precedence (low -> high):
//   built-in defaults < config file < .env file < process environment < CLI flags
// user / password / database are mandatory
// ==========================================

use crate::config::error::ConfigError;
use serde::Deserialize;
use std::collections::HashMap;
use std::fmt;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

pub const DEFAULT_HOST: &str = "127.0.0.1";
pub const DEFAULT_PORT: u16 = 3306;

/// Environment variables consulted per field, first hit wins
pub mod env_keys {
    pub const HOST: &[&str] = &["DB_HOST"];
    pub const PORT: &[&str] = &["DB_PORT"];
    pub const USER: &[&str] = &["DB_USERNAME", "DB_USER", "MYSQL_USER"];
    pub const PASSWORD: &[&str] = &["DB_PASSWORD", "MYSQL_PASSWORD"];
    pub const DATABASE: &[&str] = &["DB_NAME", "MYSQL_DATABASE"];
}

// ==========================================
// ConnectionLayer - one partial source
// ==========================================
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ConnectionLayer {
    pub host: Option<String>,
    pub port: Option<u16>,
    pub user: Option<String>,
    pub password: Option<String>,
    pub database: Option<String>,
}

impl ConnectionLayer {
    /// Read a layer through an arbitrary lookup (process env in production)
    pub fn from_env_with<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let first = |keys: &[&str]| {
            keys.iter()
                .filter_map(|k| lookup(*k))
                .find(|v| !v.trim().is_empty())
        };

        let port = match first(env_keys::PORT) {
            Some(raw) => Some(
                raw.trim()
                    .parse::<u16>()
                    .map_err(|_| ConfigError::InvalidPort(raw.clone()))?,
            ),
            None => None,
        };

        Ok(Self {
            host: first(env_keys::HOST),
            port,
            user: first(env_keys::USER),
            password: first(env_keys::PASSWORD),
            database: first(env_keys::DATABASE),
        })
    }

    pub fn from_process_env() -> Result<Self, ConfigError> {
        Self::from_env_with(|key| std::env::var(key).ok())
    }

    /// Read a dotenv file as its own layer; a missing file yields None
    ///
    /// The process environment is not modified.
    pub fn from_env_file(path: &Path) -> Result<Option<Self>, ConfigError> {
        if !path.is_file() {
            info!(path = %path.display(), "env file not found, using process environment only");
            return Ok(None);
        }

        let fail = |e: dotenvy::Error| ConfigError::EnvFileFailed {
            path: path.display().to_string(),
            message: e.to_string(),
        };
        let mut vars = HashMap::new();
        for item in dotenvy::from_path_iter(path).map_err(fail)? {
            let (key, value) = item.map_err(fail)?;
            vars.insert(key, value);
        }
        debug!(path = %path.display(), keys = vars.len(), "env file loaded");

        Self::from_env_with(|key| vars.get(key).cloned()).map(Some)
    }

    /// Overlay `upper` on top of `self`; set fields in `upper` win
    pub fn merge(self, upper: ConnectionLayer) -> ConnectionLayer {
        ConnectionLayer {
            host: upper.host.or(self.host),
            port: upper.port.or(self.port),
            user: upper.user.or(self.user),
            password: upper.password.or(self.password),
            database: upper.database.or(self.database),
        }
    }

    /// Apply defaults and check the mandatory fields
    pub fn resolve(self) -> Result<ConnectionSettings, ConfigError> {
        let present = |v: &Option<String>| v.as_deref().map(str::trim).filter(|s| !s.is_empty()).map(str::to_string);

        let user = present(&self.user);
        let password = self.password.clone().filter(|p| !p.is_empty());
        let database = present(&self.database);

        let mut missing = Vec::new();
        if user.is_none() {
            missing.push("user");
        }
        if password.is_none() {
            missing.push("password");
        }
        if database.is_none() {
            missing.push("database");
        }

        match (user, password, database) {
            (Some(user), Some(password), Some(database)) => Ok(ConnectionSettings {
                host: present(&self.host).unwrap_or_else(|| DEFAULT_HOST.to_string()),
                port: self.port.unwrap_or(DEFAULT_PORT),
                user,
                password,
                database,
            }),
            _ => Err(ConfigError::MissingCredentials(missing)),
        }
    }
}

// ==========================================
// ConnectionSettings - validated
// ==========================================
#[derive(Clone, PartialEq, Eq)]
pub struct ConnectionSettings {
    pub host: String,
    pub port: u16,
    pub user: String,
    pub password: String,
    pub database: String,
}

impl ConnectionSettings {
    /// SQLite file backing `database`; a bare name maps to `<name>.db`
    pub fn database_path(&self) -> PathBuf {
        let path = PathBuf::from(&self.database);
        if path.extension().is_none() && path.components().count() == 1 {
            PathBuf::from(format!("{}.db", self.database))
        } else {
            path
        }
    }
}

impl fmt::Debug for ConnectionSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConnectionSettings")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("user", &self.user)
            .field("password", &"***")
            .field("database", &self.database)
            .finish()
    }
}

impl fmt::Display for ConnectionSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}@{}:{} as {}", self.database, self.host, self.port, self.user)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn env(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect()
    }

    #[test]
    fn test_env_aliases_first_hit_wins() {
        let vars = env(&[
            ("DB_USER", "fallback"),
            ("MYSQL_USER", "last"),
            ("MYSQL_PASSWORD", "secret"),
            ("MYSQL_DATABASE", "shop"),
            ("DB_PORT", "3307"),
        ]);
        let layer = ConnectionLayer::from_env_with(|k| vars.get(k).cloned()).unwrap();

        assert_eq!(layer.user.as_deref(), Some("fallback"));
        assert_eq!(layer.password.as_deref(), Some("secret"));
        assert_eq!(layer.database.as_deref(), Some("shop"));
        assert_eq!(layer.port, Some(3307));
        assert_eq!(layer.host, None);
    }

    #[test]
    fn test_env_file_supplies_credentials() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "# catalog database").unwrap();
        writeln!(file, "DB_USERNAME=catalog").unwrap();
        writeln!(file, "DB_PASSWORD=\"s3cr=t\"").unwrap();
        writeln!(file, "DB_NAME=shop").unwrap();
        file.flush().unwrap();

        let layer = ConnectionLayer::from_env_file(file.path()).unwrap().unwrap();
        let settings = layer.resolve().unwrap();

        assert_eq!(settings.user, "catalog");
        assert_eq!(settings.password, "s3cr=t");
        assert_eq!(settings.database, "shop");
        assert_eq!(settings.port, DEFAULT_PORT);
    }

    #[test]
    fn test_env_file_missing_is_not_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let layer = ConnectionLayer::from_env_file(&dir.path().join(".env")).unwrap();
        assert!(layer.is_none());
    }

    #[test]
    fn test_process_env_overrides_env_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "DB_USER=from-file\nDB_HOST=db.internal").unwrap();
        file.flush().unwrap();
        let from_file = ConnectionLayer::from_env_file(file.path()).unwrap().unwrap();

        let vars = env(&[("DB_USER", "from-process")]);
        let process = ConnectionLayer::from_env_with(|k| vars.get(k).cloned()).unwrap();
        let merged = from_file.merge(process);

        assert_eq!(merged.user.as_deref(), Some("from-process"));
        assert_eq!(merged.host.as_deref(), Some("db.internal"));
    }

    #[test]
    fn test_invalid_port() {
        let vars = env(&[("DB_PORT", "mysql")]);
        let err = ConnectionLayer::from_env_with(|k| vars.get(k).cloned()).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidPort(p) if p == "mysql"));
    }

    #[test]
    fn test_resolve_applies_defaults() {
        let settings = ConnectionLayer {
            user: Some("app".to_string()),
            password: Some("pw".to_string()),
            database: Some("shop".to_string()),
            ..Default::default()
        }
        .resolve()
        .unwrap();

        assert_eq!(settings.host, DEFAULT_HOST);
        assert_eq!(settings.port, DEFAULT_PORT);
        assert_eq!(settings.database_path(), PathBuf::from("shop.db"));
    }

    #[test]
    fn test_resolve_reports_every_missing_field() {
        let err = ConnectionLayer {
            user: Some("  ".to_string()),
            ..Default::default()
        }
        .resolve()
        .unwrap_err();

        match err {
            ConfigError::MissingCredentials(missing) => {
                assert_eq!(missing, vec!["user", "password", "database"])
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_merge_upper_layer_wins() {
        let file = ConnectionLayer {
            host: Some("db.internal".to_string()),
            user: Some("file-user".to_string()),
            ..Default::default()
        };
        let cli = ConnectionLayer {
            user: Some("cli-user".to_string()),
            ..Default::default()
        };
        let merged = file.merge(cli);
        assert_eq!(merged.host.as_deref(), Some("db.internal"));
        assert_eq!(merged.user.as_deref(), Some("cli-user"));
    }

    #[test]
    fn test_debug_redacts_password() {
        let settings = ConnectionSettings {
            host: "h".to_string(),
            port: 1,
            user: "u".to_string(),
            password: "hunter2".to_string(),
            database: "/tmp/shop.sqlite".to_string(),
        };
        assert!(!format!("{:?}", settings).contains("hunter2"));
        assert_eq!(settings.database_path(), PathBuf::from("/tmp/shop.sqlite"));
    }
}
