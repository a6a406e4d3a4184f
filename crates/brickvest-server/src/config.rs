//! Server configuration loaded from the environment.

use brickvest_db::DbConfig;

/// Which storage backend the server runs against.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageBackend {
    /// In-memory maps. State is lost on restart.
    Mem,
    /// SurrealDB over WebSocket.
    Surreal,
}

impl StorageBackend {
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "mem" => Some(StorageBackend::Mem),
            "surreal" => Some(StorageBackend::Surreal),
            _ => None,
        }
    }
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Listen address, e.g. `127.0.0.1:3000`.
    pub bind_addr: String,
    pub backend: StorageBackend,
    pub db: DbConfig,
    /// Optional server-side password pepper.
    pub pepper: Option<String>,
    pub session_lifetime_secs: u64,
}

impl AppConfig {
    /// Read configuration from `BRICKVEST_*` environment variables,
    /// falling back to development defaults.
    pub fn from_env() -> Result<Self, String> {
        let backend = match std::env::var("BRICKVEST_BACKEND") {
            Ok(value) => StorageBackend::parse(&value)
                .ok_or_else(|| format!("unknown BRICKVEST_BACKEND: {value}"))?,
            Err(_) => StorageBackend::Mem,
        };

        let session_lifetime_secs = match std::env::var("BRICKVEST_SESSION_LIFETIME_SECS") {
            Ok(value) => value
                .parse()
                .map_err(|_| format!("invalid BRICKVEST_SESSION_LIFETIME_SECS: {value}"))?,
            Err(_) => 7 * 24 * 60 * 60,
        };

        Ok(Self {
            bind_addr: env_or("BRICKVEST_ADDR", "127.0.0.1:3000"),
            backend,
            db: DbConfig::from_env(),
            pepper: std::env::var("BRICKVEST_PEPPER").ok(),
            session_lifetime_secs,
        })
    }
}

fn env_or(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn backend_parse() {
        assert_eq!(StorageBackend::parse("mem"), Some(StorageBackend::Mem));
        assert_eq!(
            StorageBackend::parse("surreal"),
            Some(StorageBackend::Surreal)
        );
        assert_eq!(StorageBackend::parse("postgres"), None);
    }
}
