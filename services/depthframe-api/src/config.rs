//! Service configuration from `DPS_*` environment variables.

use std::env;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::str::FromStr;

use anyhow::{anyhow, bail, Context, Result};
use depth_common::DEFAULT_COLORMAP;
use renderer::DEFAULT_JPEG_QUALITY;

#[derive(Debug, Clone)]
pub struct ServiceConfig {
    pub host: String,
    pub port: u16,
    pub db_path: PathBuf,
    /// Colormap used when a request does not name one.
    pub default_colormap: String,
    pub log_level: String,
    pub jpeg_quality: u8,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8000,
            db_path: PathBuf::from("data/image_store.db"),
            default_colormap: DEFAULT_COLORMAP.to_string(),
            log_level: "info".to_string(),
            jpeg_quality: DEFAULT_JPEG_QUALITY,
        }
    }
}

impl ServiceConfig {
    pub fn from_env() -> Result<Self> {
        let defaults = Self::default();
        let config = Self {
            host: env::var("DPS_HOST").unwrap_or(defaults.host),
            port: parse_env("DPS_PORT", defaults.port)?,
            db_path: env::var("DPS_DB_PATH").map(PathBuf::from).unwrap_or(defaults.db_path),
            default_colormap: env::var("DPS_DEFAULT_COLORMAP").unwrap_or(defaults.default_colormap),
            log_level: env::var("DPS_LOG_LEVEL").unwrap_or(defaults.log_level),
            jpeg_quality: parse_env("DPS_JPEG_QUALITY", defaults.jpeg_quality)?,
        };
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if !(1..=100).contains(&self.jpeg_quality) {
            bail!("jpeg_quality must be within 1..=100, got {}", self.jpeg_quality);
        }
        if self.default_colormap.trim().is_empty() {
            bail!("default_colormap must not be empty");
        }
        if self.db_path.as_os_str().is_empty() {
            bail!("db_path must not be empty");
        }
        Ok(())
    }

    /// Resolve `host:port`; the host may be a name such as `localhost`.
    pub async fn listen_addr(&self) -> Result<SocketAddr> {
        resolve_addr(&format!("{}:{}", self.host, self.port)).await
    }
}

/// Resolve a `host:port` string to the first address it names.
pub async fn resolve_addr(addr: &str) -> Result<SocketAddr> {
    tokio::net::lookup_host(addr)
        .await
        .with_context(|| format!("Invalid listen address {}", addr))?
        .next()
        .ok_or_else(|| anyhow!("Listen address {} resolved to nothing", addr))
}

fn parse_env<T: FromStr>(key: &str, default: T) -> Result<T> {
    match env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse()
            .map_err(|_| anyhow!("{} has an invalid value: '{}'", key, raw)),
        Err(_) => Ok(default),
    }
}
