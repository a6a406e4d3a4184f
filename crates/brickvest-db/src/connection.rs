//! Connection handling for the remote SurrealDB backend.

use surrealdb::Surreal;
use surrealdb::engine::remote::ws::{Client, Ws};
use surrealdb::opt::auth::Root;
use tracing::info;

/// Settings for reaching a SurrealDB instance over WebSocket.
///
/// Defaults target a local development server; production deployments
/// set the `BRICKVEST_DB_*` variables instead.
#[derive(Debug, Clone)]
pub struct DbConfig {
    /// Host and port, without a scheme (e.g. `127.0.0.1:8000`).
    pub url: String,
    pub namespace: String,
    pub database: String,
    pub username: String,
    pub password: String,
}

impl Default for DbConfig {
    fn default() -> Self {
        Self {
            url: "127.0.0.1:8000".into(),
            namespace: "brickvest".into(),
            database: "main".into(),
            username: "root".into(),
            password: "root".into(),
        }
    }
}

impl DbConfig {
    /// Read settings from `BRICKVEST_DB_{URL,NS,NAME,USER,PASS}`,
    /// keeping the development defaults for anything unset.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            url: env_or("BRICKVEST_DB_URL", defaults.url),
            namespace: env_or("BRICKVEST_DB_NS", defaults.namespace),
            database: env_or("BRICKVEST_DB_NAME", defaults.database),
            username: env_or("BRICKVEST_DB_USER", defaults.username),
            password: env_or("BRICKVEST_DB_PASS", defaults.password),
        }
    }
}

fn env_or(key: &str, default: String) -> String {
    std::env::var(key).unwrap_or(default)
}

/// A signed-in handle scoped to the configured namespace and database.
/// Clones share the underlying client.
#[derive(Clone)]
pub struct DbManager {
    db: Surreal<Client>,
}

impl DbManager {
    /// Open the WebSocket connection, sign in as root, and select the
    /// namespace and database named in `config`.
    pub async fn connect(config: &DbConfig) -> Result<Self, surrealdb::Error> {
        let db = Surreal::new::<Ws>(config.url.as_str()).await?;

        db.signin(Root {
            username: config.username.clone(),
            password: config.password.clone(),
        })
        .await?;

        db.use_ns(&config.namespace)
            .use_db(&config.database)
            .await?;

        info!(
            url = %config.url,
            ns = %config.namespace,
            db = %config.database,
            "Connected to SurrealDB"
        );

        Ok(Self { db })
    }

    pub fn client(&self) -> &Surreal<Client> {
        &self.db
    }
}
