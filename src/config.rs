use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::Duration;

use anyhow::Context;
use serde::Deserialize;
use sqlx::postgres::{PgConnectOptions, PgSslMode};

const DEFAULT_CONFIG_PATHS: &[&str] = &["./configs/config.json", "./config.json"];

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub mode: String, // "debug" | "release"
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".into(),
            port: 8080,
            mode: "debug".into(),
        }
    }
}

impl ServerConfig {
    pub fn is_release(&self) -> bool {
        self.mode.eq_ignore_ascii_case("release")
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct DatabaseConfig {
    /// Full connection URL; when set it wins over the discrete fields.
    pub url: Option<String>,
    pub host: String,
    pub port: u16,
    pub user: String,
    pub password: String,
    pub dbname: String,
    pub sslmode: String,
    pub max_connections: u32,
    pub idle_timeout_secs: u64,
    pub max_lifetime_secs: u64,
    pub acquire_timeout_secs: u64,
    /// Server-side `statement_timeout`; 0 leaves the server default.
    pub statement_timeout_ms: u64,
    pub connect_retries: u32,
    pub retry_interval_secs: u64,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: None,
            host: "localhost".into(),
            port: 5432,
            user: "postgres".into(),
            password: "postgres".into(),
            dbname: "product_db".into(),
            sslmode: "disable".into(),
            max_connections: 25,
            idle_timeout_secs: 300,
            max_lifetime_secs: 300,
            acquire_timeout_secs: 5,
            statement_timeout_ms: 0,
            connect_retries: 5,
            retry_interval_secs: 3,
        }
    }
}

impl DatabaseConfig {
    pub fn connect_options(&self) -> anyhow::Result<PgConnectOptions> {
        let mut opts = match &self.url {
            Some(url) => PgConnectOptions::from_str(url).context("parse database url")?,
            None => PgConnectOptions::new()
                .host(&self.host)
                .port(self.port)
                .username(&self.user)
                .password(&self.password)
                .database(&self.dbname)
                .ssl_mode(
                    PgSslMode::from_str(&self.sslmode)
                        .with_context(|| format!("invalid sslmode {:?}", self.sslmode))?,
                ),
        };
        if self.statement_timeout_ms > 0 {
            opts = opts.options([(
                "statement_timeout",
                self.statement_timeout_ms.to_string(),
            )]);
        }
        Ok(opts)
    }

    pub fn idle_timeout(&self) -> Duration {
        Duration::from_secs(self.idle_timeout_secs)
    }

    pub fn max_lifetime(&self) -> Duration {
        Duration::from_secs(self.max_lifetime_secs)
    }

    pub fn acquire_timeout(&self) -> Duration {
        Duration::from_secs(self.acquire_timeout_secs)
    }

    pub fn retry_interval(&self) -> Duration {
        Duration::from_secs(self.retry_interval_secs)
    }

    /// Connection summary safe for logs.
    pub fn redacted(&self) -> String {
        match &self.url {
            Some(_) => "DATABASE_URL (redacted)".to_string(),
            None => format!(
                "host={} port={} user={} dbname={} sslmode={}",
                self.host, self.port, self.user, self.dbname, self.sslmode
            ),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct LogConfig {
    /// `EnvFilter` directives, e.g. `product_service=debug,tower_http=info`.
    pub level: Option<String>,
    /// `json` or `pretty`; unset picks JSON in release mode.
    pub format: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub log: LogConfig,
}

impl AppConfig {
    /// Defaults, then the JSON config file if one is found, then environment.
    /// A config file that cannot be read or parsed is reported and skipped.
    pub fn load() -> Self {
        let mut config = match config_file_path() {
            Some(path) => Self::from_file_or_default(&path),
            None => Self::default(),
        };
        config.apply_env(|key| std::env::var(key).ok());
        config
    }

    // Runs before the tracing subscriber exists, so warnings go to stderr.
    fn from_file_or_default(path: &Path) -> Self {
        Self::from_file(path).unwrap_or_else(|e| {
            eprintln!("warning: {e:#}; continuing with default configuration");
            Self::default()
        })
    }

    pub fn from_file(path: &Path) -> anyhow::Result<Self> {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("read config file {}", path.display()))?;
        serde_json::from_str(&raw).with_context(|| format!("parse config file {}", path.display()))
    }

    /// Overrides fields from environment-style variables looked up via `var`.
    pub fn apply_env<F>(&mut self, var: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        let server = &mut self.server;
        if let Some(v) = var("APP_HOST") {
            server.host = v;
        }
        if let Some(v) = parse_var(&var, "APP_PORT") {
            server.port = v;
        }
        if let Some(v) = parse_var(&var, "SERVER_PORT") {
            server.port = v;
        }
        if let Some(v) = var("GIN_MODE") {
            server.mode = v;
        }
        if let Some(v) = var("SERVER_MODE") {
            server.mode = v;
        }

        let db = &mut self.database;
        if let Some(v) = var("DATABASE_URL") {
            db.url = Some(v);
        }
        if let Some(v) = var("DB_HOST") {
            db.host = v;
        }
        if let Some(v) = parse_var(&var, "DB_PORT") {
            db.port = v;
        }
        if let Some(v) = var("DB_USER") {
            db.user = v;
        }
        if let Some(v) = var("DB_PASSWORD") {
            db.password = v;
        }
        if let Some(v) = var("DB_NAME") {
            db.dbname = v;
        }
        if let Some(v) = var("DB_SSL_MODE") {
            db.sslmode = v;
        }
        if let Some(v) = parse_var(&var, "DB_MAX_CONNECTIONS") {
            db.max_connections = v;
        }
        if let Some(v) = parse_var(&var, "DB_STATEMENT_TIMEOUT_MS") {
            db.statement_timeout_ms = v;
        }

        if let Some(v) = var("LOG_LEVEL") {
            self.log.level = Some(v);
        }
        if let Some(v) = var("RUST_LOG") {
            self.log.level = Some(v);
        }
        if let Some(v) = var("LOG_FORMAT") {
            self.log.format = Some(v);
        }
    }

    pub fn json_logs(&self) -> bool {
        match self.log.format.as_deref() {
            Some(f) => f.eq_ignore_ascii_case("json"),
            None => self.server.is_release(),
        }
    }

    pub fn log_filter(&self) -> String {
        self.log.level.clone().unwrap_or_else(|| {
            if self.server.is_release() {
                "product_service=info,tower_http=info".into()
            } else {
                "product_service=debug,tower_http=info".into()
            }
        })
    }
}

fn config_file_path() -> Option<PathBuf> {
    if let Ok(path) = std::env::var("CONFIG_FILE") {
        return Some(PathBuf::from(path));
    }
    DEFAULT_CONFIG_PATHS
        .iter()
        .map(PathBuf::from)
        .find(|p| p.is_file())
}

// Runs before the tracing subscriber exists, so warnings go to stderr.
fn parse_var<F, T>(var: &F, key: &str) -> Option<T>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
{
    let raw = var(key)?;
    match raw.parse::<T>() {
        Ok(v) => Some(v),
        Err(_) => {
            eprintln!("warning: ignoring {key}={raw:?}: not a valid number");
            None
        }
    }
}
