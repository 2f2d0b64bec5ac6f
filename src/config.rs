use std::{env, fmt::Display, path::PathBuf, str::FromStr};

use anyhow::{anyhow, Context};
use tracing::{info, warn};

/// Runtime settings, read once at start-up from the environment.
#[derive(Debug, Clone)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub database_path: String,
    pub schema_path: String,
    pub upload_dir: PathBuf,
    pub frontend_dir: PathBuf,
    pub max_workers: usize,
    pub session_ttl_secs: i64,
    pub password_rounds: u32,
    pub max_upload_bytes: u64,
    pub blocks: Vec<String>,
    /// Height / width of the block images.
    pub block_aspect: f64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 3000,
            database_path: "blocks.sqlite3".to_string(),
            schema_path: "sql/schema.sql".to_string(),
            upload_dir: PathBuf::from("uploads"),
            frontend_dir: PathBuf::from("frontend"),
            max_workers: 8,
            session_ttl_secs: 60 * 60 * 24 * 7,
            password_rounds: 100_000,
            max_upload_bytes: 100 * 1024 * 1024,
            blocks: vec!["a".into(), "b".into(), "c".into(), "d".into()],
            block_aspect: 0.75,
        }
    }
}

impl Config {
    pub fn load() -> anyhow::Result<Self> {
        let d = Config::default();

        let block_aspect: f64 = try_load("BLOCK_ASPECT", d.block_aspect)?;
        if !(block_aspect.is_finite() && block_aspect > 0.0) {
            return Err(anyhow!("BLOCK_ASPECT must be a positive number"));
        }

        let blocks = match var("BLOCKS") {
            Some(raw) => parse_blocks(&raw),
            None => d.blocks,
        };

        Ok(Self {
            host: try_load("HOST", d.host)?,
            port: try_load("PORT", d.port)?,
            database_path: try_load("DATABASE_PATH", d.database_path)?,
            schema_path: try_load("SCHEMA_PATH", d.schema_path)?,
            upload_dir: try_load("UPLOAD_DIR", d.upload_dir.display().to_string())?.into(),
            frontend_dir: try_load("FRONTEND_DIR", d.frontend_dir.display().to_string())?
                .into(),
            max_workers: try_load("MAX_WORKERS", d.max_workers)?,
            session_ttl_secs: try_load("SESSION_TTL_SECS", d.session_ttl_secs)?,
            password_rounds: try_load("PASSWORD_ROUNDS", d.password_rounds)?,
            max_upload_bytes: try_load("MAX_UPLOAD_BYTES", d.max_upload_bytes)?,
            blocks,
            block_aspect,
        })
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    pub fn photos_dir(&self) -> PathBuf {
        self.upload_dir.join("photos")
    }

    pub fn videos_dir(&self) -> PathBuf {
        self.upload_dir.join("videos")
    }
}

fn var(key: &str) -> Option<String> {
    env::var(key).ok().filter(|v| !v.trim().is_empty())
}

fn try_load<T>(key: &str, default: T) -> anyhow::Result<T>
where
    T: FromStr + Display,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match var(key) {
        Some(raw) => raw.trim().parse().map_err(|e| {
            warn!("Invalid {key} value: {e}");
            e
        })
        .with_context(|| format!("environment variable {key} is misconfigured")),
        None => {
            info!("{key} not set, using default: {default}");
            Ok(default)
        }
    }
}

fn parse_blocks(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|b| b.trim().to_string())
        .filter(|b| !b.is_empty())
        .collect()
}
