//! Runtime server configuration
//!
//! Resolved once at startup from environment variables and immutable
//! afterwards. Unset variables fall back to defaults; set-but-invalid
//! variables are startup errors rather than silently ignored.

use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::path::PathBuf;
use std::str::FromStr;
use thiserror::Error;

pub const PORT_VAR: &str = "NODETREE_PORT";
pub const BIND_VAR: &str = "NODETREE_BIND";
pub const DB_PATH_VAR: &str = "NODETREE_DB_PATH";
pub const STORE_VAR: &str = "NODETREE_STORE";

pub const DEFAULT_PORT: u16 = 3001;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Invalid value '{value}' for {var}: {reason}")]
    InvalidValue {
        var: &'static str,
        value: String,
        reason: String,
    },

    #[error("Failed to get home directory")]
    HomeDirUnavailable,
}

/// Which `TreeStore` implementation backs the catalog
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreBackend {
    /// On-disk libsql database at `ServerConfig::db_path`
    Libsql,
    /// Process-local store, lost on exit
    Memory,
}

impl FromStr for StoreBackend {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "libsql" => Ok(StoreBackend::Libsql),
            "memory" => Ok(StoreBackend::Memory),
            other => Err(format!("unknown store '{}', expected libsql or memory", other)),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    pub bind: IpAddr,
    pub port: u16,
    /// Database file; ignored by the memory backend
    pub db_path: PathBuf,
    pub store: StoreBackend,
}

impl ServerConfig {
    /// Build config from the process environment
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    /// Build config from an arbitrary variable lookup
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let port = parse_var(&lookup, PORT_VAR)?.unwrap_or(DEFAULT_PORT);
        let bind = parse_var(&lookup, BIND_VAR)?.unwrap_or(IpAddr::V4(Ipv4Addr::LOCALHOST));
        let store = parse_var(&lookup, STORE_VAR)?.unwrap_or(StoreBackend::Libsql);

        let db_path = match lookup(DB_PATH_VAR).filter(|p| !p.trim().is_empty()) {
            Some(path) => PathBuf::from(path),
            None => default_db_path()?,
        };

        Ok(Self {
            bind,
            port,
            db_path,
            store,
        })
    }

    pub fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.bind, self.port)
    }
}

/// Default database location: ~/.nodetree/database/nodetree.db
pub fn default_db_path() -> Result<PathBuf, ConfigError> {
    let home_dir = dirs::home_dir().ok_or(ConfigError::HomeDirUnavailable)?;
    Ok(home_dir
        .join(".nodetree")
        .join("database")
        .join("nodetree.db"))
}

fn parse_var<F, T>(lookup: &F, var: &'static str) -> Result<Option<T>, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match lookup(var) {
        None => Ok(None),
        Some(value) => value
            .trim()
            .parse::<T>()
            .map(Some)
            .map_err(|e| ConfigError::InvalidValue {
                var,
                value: value.clone(),
                reason: e.to_string(),
            }),
    }
}
