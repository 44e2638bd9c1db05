//! Ingestion configuration.
//!
//! Values come from `DPS_`-prefixed environment variables with the defaults
//! below; binaries may override individual fields from their CLI flags.

use std::path::PathBuf;
use std::str::FromStr;

use crate::error::{IngestionError, Result};
use crate::resize::InterpolationMethod;

pub const DEFAULT_DATA_DIR: &str = "data";
pub const DEFAULT_DB_PATH: &str = "data/image_store.db";
pub const DEFAULT_CSV_FILENAME: &str = "Challenge2.csv";
pub const DEFAULT_ORIGINAL_WIDTH: usize = 200;
pub const DEFAULT_TARGET_WIDTH: usize = 150;

#[derive(Debug, Clone)]
pub struct IngestionConfig {
    pub data_dir: PathBuf,
    pub db_path: PathBuf,
    pub csv_filename: String,
    /// Expected pixel columns in the source CSV. A mismatch is logged, not fatal.
    pub original_width: usize,
    pub target_width: usize,
    pub interpolation: InterpolationMethod,
    /// Explicit CSV path; wins over `data_dir/csv_filename`.
    pub csv_override: Option<PathBuf>,
}

impl Default for IngestionConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from(DEFAULT_DATA_DIR),
            db_path: PathBuf::from(DEFAULT_DB_PATH),
            csv_filename: DEFAULT_CSV_FILENAME.to_string(),
            original_width: DEFAULT_ORIGINAL_WIDTH,
            target_width: DEFAULT_TARGET_WIDTH,
            interpolation: InterpolationMethod::Area,
            csv_override: None,
        }
    }
}

impl IngestionConfig {
    /// Load configuration from `DPS_*` environment variables.
    pub fn from_env() -> Result<Self> {
        let defaults = Self::default();
        let interpolation = match std::env::var("DPS_INTERPOLATION_METHOD") {
            Ok(v) => v.parse()?,
            Err(_) => defaults.interpolation,
        };

        Ok(Self {
            data_dir: env_or("DPS_DATA_DIR", defaults.data_dir)?,
            db_path: env_or("DPS_DB_PATH", defaults.db_path)?,
            csv_filename: env_or("DPS_CSV_FILENAME", defaults.csv_filename)?,
            original_width: env_or("DPS_ORIGINAL_WIDTH", defaults.original_width)?,
            target_width: env_or("DPS_TARGET_WIDTH", defaults.target_width)?,
            interpolation,
            csv_override: None,
        })
    }

    /// Full path to the CSV file.
    pub fn csv_path(&self) -> PathBuf {
        self.csv_override
            .clone()
            .unwrap_or_else(|| self.data_dir.join(&self.csv_filename))
    }

    /// Source file name recorded as provenance.
    pub fn source_file(&self) -> String {
        self.csv_path()
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| self.csv_filename.clone())
    }

    pub fn validate(&self) -> Result<()> {
        if self.target_width == 0 {
            return Err(IngestionError::InvalidConfig(
                "target_width must be greater than 0".into(),
            ));
        }
        if self.original_width == 0 {
            return Err(IngestionError::InvalidConfig(
                "original_width must be greater than 0".into(),
            ));
        }
        if self.db_path.as_os_str().is_empty() {
            return Err(IngestionError::InvalidConfig("db_path must not be empty".into()));
        }
        Ok(())
    }
}

fn env_or<T: FromStr>(key: &str, default: T) -> Result<T> {
    match std::env::var(key) {
        Ok(v) => v
            .trim()
            .parse()
            .map_err(|_| IngestionError::InvalidConfig(format!("{} has an invalid value: '{}'", key, v))),
        Err(_) => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = IngestionConfig::default();
        assert_eq!(config.csv_path(), PathBuf::from("data/Challenge2.csv"));
        assert_eq!(config.target_width, 150);
        assert_eq!(config.interpolation, InterpolationMethod::Area);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_csv_override_wins() {
        let config = IngestionConfig {
            csv_override: Some(PathBuf::from("/tmp/other.csv")),
            ..Default::default()
        };
        assert_eq!(config.csv_path(), PathBuf::from("/tmp/other.csv"));
        assert_eq!(config.source_file(), "other.csv");
    }

    #[test]
    fn test_zero_width_rejected() {
        let config = IngestionConfig {
            target_width: 0,
            ..Default::default()
        };
        assert!(matches!(config.validate(), Err(IngestionError::InvalidConfig(_))));
    }
}
