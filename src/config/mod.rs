//! Configuration loading and management
//!
//! Values are layered: built-in defaults, then an optional YAML file named by
//! `CONFIG_FILE`, then environment variables (a `.env` file is loaded first
//! by the binaries through `dotenvy`).

use crate::core::error::ConfigError;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::str::FromStr;

pub const DEFAULT_API_PREFIX: &str = "/api";
pub const DEFAULT_DB_NAME: &str = "saas_admin";

/// Exact origins allowed by default
pub const DEFAULT_ALLOWED_ORIGINS: [&str; 3] = [
    "https://saas-admin-panel.vercel.app",
    "https://saas-tenant-portal.vercel.app",
    "https://saas-provider-portal.vercel.app",
];

/// Hostname patterns allowed by default (subdomains included)
pub const DEFAULT_ORIGIN_PATTERNS: [&str; 2] = [
    r"^http://([a-zA-Z0-9-]+\.)?localhost:5173$",
    r"^https://([a-zA-Z0-9-]+\.)?yourdomain\.com$",
];

/// Complete application configuration
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub cors: CorsConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ServerConfig {
    pub port: u16,
    pub api_prefix: String,
    pub environment: String,
}

impl ServerConfig {
    pub fn is_production(&self) -> bool {
        self.environment.eq_ignore_ascii_case("production")
    }
}

/// Database connection settings
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DatabaseConfig {
    pub uri: String,
    pub name: String,
    pub max_pool_size: u32,
    pub min_pool_size: u32,
    pub max_retries: u32,
    pub retry_base_delay_ms: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CorsConfig {
    pub allowed_origins: Vec<String>,
    pub origin_patterns: Vec<String>,
}

impl Default for CorsConfig {
    fn default() -> Self {
        Self {
            allowed_origins: DEFAULT_ALLOWED_ORIGINS.iter().map(|s| s.to_string()).collect(),
            origin_patterns: DEFAULT_ORIGIN_PATTERNS.iter().map(|s| s.to_string()).collect(),
        }
    }
}

/// Optional YAML overlay. Every key may be omitted.
///
/// ```yaml
/// server:
///   port: 8080
///   api_prefix: /api
/// database:
///   uri: mongodb://localhost:27017/saas_admin
///   max_pool_size: 100
/// cors:
///   allowed_origins:
///     - http://localhost:3000
/// ```
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct FileConfig {
    pub server: FileServerConfig,
    pub database: FileDatabaseConfig,
    pub cors: FileCorsConfig,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct FileServerConfig {
    pub port: Option<u16>,
    pub api_prefix: Option<String>,
    pub environment: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct FileDatabaseConfig {
    pub uri: Option<String>,
    pub name: Option<String>,
    pub max_pool_size: Option<u32>,
    pub min_pool_size: Option<u32>,
    pub max_retries: Option<u32>,
    pub retry_base_delay_ms: Option<u64>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct FileCorsConfig {
    pub allowed_origins: Option<Vec<String>>,
    pub origin_patterns: Option<Vec<String>>,
}

impl FileConfig {
    /// Load configuration from a YAML file
    pub fn from_yaml_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::File {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;
        Self::from_yaml_str(&content).map_err(|e| match e {
            ConfigError::File { message, .. } => ConfigError::File {
                path: path.display().to_string(),
                message,
            },
            other => other,
        })
    }

    /// Load configuration from a YAML string
    pub fn from_yaml_str(yaml: &str) -> Result<Self, ConfigError> {
        serde_yaml::from_str(yaml).map_err(|e| ConfigError::File {
            path: "<inline>".to_string(),
            message: e.to_string(),
        })
    }
}

impl AppConfig {
    /// Load from the process environment and the optional `CONFIG_FILE`.
    pub fn load() -> Result<Self, ConfigError> {
        let file = match std::env::var("CONFIG_FILE") {
            Ok(path) if !path.trim().is_empty() => {
                Some(FileConfig::from_yaml_file(Path::new(path.trim()))?)
            }
            _ => None,
        };
        Self::from_sources(file, |key| std::env::var(key).ok())
    }

    /// Merge defaults, a parsed file and an environment lookup.
    ///
    /// Environment values win over the file. `PORT` and `MONGO_URI` must be
    /// present in one of the two.
    pub fn from_sources(
        file: Option<FileConfig>,
        env: impl Fn(&str) -> Option<String>,
    ) -> Result<Self, ConfigError> {
        let file = file.unwrap_or_default();
        let env = |key: &str| env(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        let port = match env("PORT") {
            Some(raw) => parse_value("PORT", &raw)?,
            None => file.server.port.ok_or(ConfigError::MissingVar("PORT"))?,
        };
        let uri = env("MONGO_URI")
            .or(file.database.uri)
            .ok_or(ConfigError::MissingVar("MONGO_URI"))?;

        let name = env("MONGO_DB_NAME")
            .or(file.database.name)
            .or_else(|| database_from_uri(&uri))
            .unwrap_or_else(|| DEFAULT_DB_NAME.to_string());

        let api_prefix = normalize_prefix(
            &env("API_PREFIX")
                .or(file.server.api_prefix)
                .unwrap_or_else(|| DEFAULT_API_PREFIX.to_string()),
        );

        let environment = env("APP_ENV")
            .or(file.server.environment)
            .unwrap_or_else(|| "development".to_string());

        let database = DatabaseConfig {
            name,
            max_pool_size: layered(&env, "MONGO_MAX_POOL", file.database.max_pool_size, 500)?,
            min_pool_size: layered(&env, "MONGO_MIN_POOL", file.database.min_pool_size, 50)?,
            max_retries: layered(&env, "DB_MAX_RETRIES", file.database.max_retries, 10)?,
            retry_base_delay_ms: layered(
                &env,
                "DB_RETRY_BASE_MS",
                file.database.retry_base_delay_ms,
                5000,
            )?,
            uri,
        };

        if database.min_pool_size > database.max_pool_size {
            return Err(ConfigError::InvalidValue {
                key: "MONGO_MIN_POOL".to_string(),
                message: format!(
                    "must not exceed MONGO_MAX_POOL ({})",
                    database.max_pool_size
                ),
            });
        }

        let defaults = CorsConfig::default();
        let cors = CorsConfig {
            allowed_origins: env("ALLOWED_ORIGINS")
                .map(|raw| split_list(&raw, ','))
                .or(file.cors.allowed_origins)
                .unwrap_or(defaults.allowed_origins),
            origin_patterns: env("CORS_ORIGIN_PATTERNS")
                .map(|raw| split_list(&raw, ' '))
                .or(file.cors.origin_patterns)
                .unwrap_or(defaults.origin_patterns),
        };

        Ok(Self {
            server: ServerConfig {
                port,
                api_prefix,
                environment,
            },
            database,
            cors,
        })
    }
}

fn parse_value<V: FromStr>(key: &str, raw: &str) -> Result<V, ConfigError>
where
    V::Err: std::fmt::Display,
{
    raw.parse().map_err(|e: V::Err| ConfigError::InvalidValue {
        key: key.to_string(),
        message: format!("{:?}: {}", raw, e),
    })
}

fn layered<V: FromStr>(
    env: impl Fn(&str) -> Option<String>,
    key: &str,
    file: Option<V>,
    default: V,
) -> Result<V, ConfigError>
where
    V::Err: std::fmt::Display,
{
    match env(key) {
        Some(raw) => parse_value(key, &raw),
        None => Ok(file.unwrap_or(default)),
    }
}

/// Database name from the path of a connection string, if any.
fn database_from_uri(uri: &str) -> Option<String> {
    let rest = uri.split_once("://")?.1;
    let path = rest.split_once('/')?.1;
    let name = path.split('?').next().unwrap_or_default();
    (!name.is_empty()).then(|| name.to_string())
}

/// `api`, `/api/` and `/api` all become `/api`; an empty prefix stays empty.
fn normalize_prefix(raw: &str) -> String {
    let trimmed = raw.trim().trim_matches('/');
    if trimmed.is_empty() {
        String::new()
    } else {
        format!("/{}", trimmed)
    }
}

fn split_list(raw: &str, separator: char) -> Vec<String> {
    raw.split(separator)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn env_of(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_required_vars() {
        let err = AppConfig::from_sources(None, env_of(&[("MONGO_URI", "mongodb://x")]))
            .unwrap_err();
        assert!(matches!(err, ConfigError::MissingVar("PORT")));

        let err = AppConfig::from_sources(None, env_of(&[("PORT", "8080")])).unwrap_err();
        assert!(matches!(err, ConfigError::MissingVar("MONGO_URI")));
    }

    #[test]
    fn test_defaults() {
        let config = AppConfig::from_sources(
            None,
            env_of(&[("PORT", "8080"), ("MONGO_URI", "mongodb://localhost:27017")]),
        )
        .unwrap();

        assert_eq!(config.server.port, 8080);
        assert_eq!(config.server.api_prefix, "/api");
        assert!(!config.server.is_production());
        assert_eq!(config.database.name, DEFAULT_DB_NAME);
        assert_eq!(config.database.max_pool_size, 500);
        assert_eq!(config.database.min_pool_size, 50);
        assert_eq!(config.database.max_retries, 10);
        assert_eq!(config.database.retry_base_delay_ms, 5000);
        assert_eq!(config.cors, CorsConfig::default());
    }

    #[test]
    fn test_database_name_from_uri() {
        assert_eq!(
            database_from_uri("mongodb+srv://u:p@cluster.example.net/tenants?retryWrites=true"),
            Some("tenants".to_string())
        );
        assert_eq!(database_from_uri("mongodb://localhost:27017/"), None);
        assert_eq!(database_from_uri("mongodb://localhost:27017"), None);
    }

    #[test]
    fn test_env_overrides_file() {
        let file = FileConfig::from_yaml_str(
            r#"
server:
  port: 3000
  api_prefix: v1/
database:
  uri: mongodb://file-host/filedb
  max_retries: 3
cors:
  allowed_origins: [http://a.test]
"#,
        )
        .unwrap();

        let config = AppConfig::from_sources(
            Some(file),
            env_of(&[("PORT", "9000"), ("ALLOWED_ORIGINS", "http://b.test, http://c.test")]),
        )
        .unwrap();

        assert_eq!(config.server.port, 9000);
        assert_eq!(config.server.api_prefix, "/v1");
        assert_eq!(config.database.uri, "mongodb://file-host/filedb");
        assert_eq!(config.database.name, "filedb");
        assert_eq!(config.database.max_retries, 3);
        assert_eq!(
            config.cors.allowed_origins,
            vec!["http://b.test".to_string(), "http://c.test".to_string()]
        );
    }

    #[test]
    fn test_invalid_number() {
        let err = AppConfig::from_sources(
            None,
            env_of(&[("PORT", "eighty"), ("MONGO_URI", "mongodb://x")]),
        )
        .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue { ref key, .. } if key == "PORT"));
    }

    #[test]
    fn test_min_pool_above_max_rejected() {
        let err = AppConfig::from_sources(
            None,
            env_of(&[
                ("PORT", "8080"),
                ("MONGO_URI", "mongodb://x"),
                ("MONGO_MAX_POOL", "10"),
                ("MONGO_MIN_POOL", "20"),
            ]),
        )
        .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue { .. }));
    }

    #[test]
    fn test_normalize_prefix() {
        assert_eq!(normalize_prefix("api"), "/api");
        assert_eq!(normalize_prefix("/api/"), "/api");
        assert_eq!(normalize_prefix("/"), "");
    }
}
