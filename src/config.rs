use std::net::SocketAddr;
use std::time::Duration;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("{0} must be set")]
    Missing(&'static str),

    #[error("{name} has invalid value {value:?}: {reason}")]
    Invalid {
        name: &'static str,
        value: String,
        reason: String,
    },
}

#[derive(Clone, Debug, PartialEq)]
pub struct AppConfig {
    pub database_url: String,
    pub bind_addr: SocketAddr,
    pub cors_origin: String,
    pub store_timeout: Duration,
    pub snapshot_ttl: Duration,
    pub run_migrations: bool,
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let database_url = lookup("DATABASE_URL").ok_or(ConfigError::Missing("DATABASE_URL"))?;

        let bind_addr = parse(&lookup, "BIND_ADDR", "0.0.0.0:8000", |v| {
            v.parse::<SocketAddr>().map_err(|e| e.to_string())
        })?;

        let cors_origin =
            lookup("CORS_ORIGIN").unwrap_or_else(|| "http://localhost:3000".to_string());

        let store_timeout = parse(&lookup, "STORE_TIMEOUT_SECS", "10", |v| {
            match v.parse::<u64>().map_err(|e| e.to_string())? {
                0 => Err("must be greater than zero".to_string()),
                secs => Ok(Duration::from_secs(secs)),
            }
        })?;

        let snapshot_ttl = parse(&lookup, "SNAPSHOT_TTL_SECS", "30", |v| {
            v.parse::<u64>().map(Duration::from_secs).map_err(|e| e.to_string())
        })?;

        let run_migrations = parse(&lookup, "RUN_MIGRATIONS", "true", |v| {
            match v.to_ascii_lowercase().as_str() {
                "1" | "true" | "yes" => Ok(true),
                "0" | "false" | "no" => Ok(false),
                _ => Err("expected true or false".to_string()),
            }
        })?;

        Ok(Self {
            database_url,
            bind_addr,
            cors_origin,
            store_timeout,
            snapshot_ttl,
            run_migrations,
        })
    }
}

fn parse<T>(
    lookup: &impl Fn(&str) -> Option<String>,
    name: &'static str,
    default: &str,
    convert: impl FnOnce(&str) -> Result<T, String>,
) -> Result<T, ConfigError> {
    let value = lookup(name).unwrap_or_else(|| default.to_string());
    convert(value.trim()).map_err(|reason| ConfigError::Invalid {
        name,
        value,
        reason,
    })
}
