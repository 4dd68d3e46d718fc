//! Configuration module
//!
//! Environment-driven settings for the storage backend, the fetcher limits, and the tunable
//! transform steps. Values fixed by the pipeline itself live in [`crate::constants`].

use std::env;
use std::str::FromStr;
use std::time::Duration;

use anyhow::anyhow;

use crate::constants::{DEFAULT_MAX_DOWNLOAD_MB, DEFAULT_MAX_OUTPUT_DIMENSION};
use crate::storage_types::StorageBackend;

const DEFAULT_REGION: &str = "us-east-1";
const DEFAULT_LOCAL_BASE_URL: &str = "http://localhost:9000/media";

/// Log output format
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Json,
    Pretty,
}

impl FromStr for LogFormat {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "json" => Ok(LogFormat::Json),
            "pretty" | "text" => Ok(LogFormat::Pretty),
            _ => Err(anyhow!("Invalid log format: {}", s)),
        }
    }
}

/// Worker configuration
#[derive(Clone, Debug)]
pub struct Config {
    pub environment: String,
    // Storage configuration
    pub storage_backend: StorageBackend,
    pub s3_bucket: Option<String>,
    pub s3_region: String,
    pub s3_endpoint: Option<String>, // Custom endpoint for S3-compatible providers (MinIO, etc.)
    pub local_storage_path: Option<String>,
    pub local_storage_base_url: String,
    pub local_signing_secret: Option<String>,
    // Fetch limits
    pub fetch_timeout_secs: Option<u64>,
    pub max_download_bytes: u64,
    // Transform tuning
    pub max_output_dimension: u32,
    pub modulate_brightness: f32,
    pub modulate_saturation: f32,
    pub log_format: LogFormat,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            environment: "development".to_string(),
            storage_backend: StorageBackend::S3,
            s3_bucket: None,
            s3_region: DEFAULT_REGION.to_string(),
            s3_endpoint: None,
            local_storage_path: None,
            local_storage_base_url: DEFAULT_LOCAL_BASE_URL.to_string(),
            local_signing_secret: None,
            fetch_timeout_secs: None,
            max_download_bytes: DEFAULT_MAX_DOWNLOAD_MB * 1024 * 1024,
            max_output_dimension: DEFAULT_MAX_OUTPUT_DIMENSION,
            modulate_brightness: 1.0,
            modulate_saturation: 1.0,
            log_format: LogFormat::Pretty,
        }
    }
}

impl Config {
    /// Load configuration from the process environment (and `.env`, if present).
    pub fn from_env() -> Result<Self, anyhow::Error> {
        dotenvy::dotenv().ok();
        let config = Self::from_lookup(|key| env::var(key).ok())?;
        config.validate()?;
        Ok(config)
    }

    /// Build configuration from an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, anyhow::Error>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        let var = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let environment = var("ENVIRONMENT")
            .or_else(|| var("APP_ENV"))
            .unwrap_or(defaults.environment);

        let storage_backend = match var("STORAGE_BACKEND") {
            Some(value) => value.parse()?,
            None => defaults.storage_backend,
        };

        let max_download_mb: u64 = match var("MAX_DOWNLOAD_MB") {
            Some(value) => value
                .trim()
                .parse()
                .map_err(|_| anyhow!("MAX_DOWNLOAD_MB must be a valid number"))?,
            None => DEFAULT_MAX_DOWNLOAD_MB,
        };

        let fetch_timeout_secs = var("FETCH_TIMEOUT_SECS")
            .map(|value| {
                value
                    .trim()
                    .parse::<u64>()
                    .map_err(|_| anyhow!("FETCH_TIMEOUT_SECS must be a valid number"))
            })
            .transpose()?;

        let max_output_dimension = match var("MAX_OUTPUT_DIMENSION") {
            Some(value) => value
                .trim()
                .parse()
                .map_err(|_| anyhow!("MAX_OUTPUT_DIMENSION must be a valid number"))?,
            None => defaults.max_output_dimension,
        };

        let modulate_brightness = match var("MODULATE_BRIGHTNESS") {
            Some(value) => value
                .trim()
                .parse()
                .map_err(|_| anyhow!("MODULATE_BRIGHTNESS must be a valid number"))?,
            None => defaults.modulate_brightness,
        };

        let modulate_saturation = match var("MODULATE_SATURATION") {
            Some(value) => value
                .trim()
                .parse()
                .map_err(|_| anyhow!("MODULATE_SATURATION must be a valid number"))?,
            None => defaults.modulate_saturation,
        };

        // CloudWatch adds its own timestamps and indexes JSON lines
        let running_in_lambda = var("AWS_LAMBDA_FUNCTION_NAME").is_some();
        let log_format = match var("LOG_FORMAT") {
            Some(value) => value.parse()?,
            None if running_in_lambda => LogFormat::Json,
            None => defaults.log_format,
        };

        Ok(Self {
            environment,
            storage_backend,
            s3_bucket: var("OUTPUT_BUCKET").or_else(|| var("S3_BUCKET")),
            s3_region: var("S3_REGION")
                .or_else(|| var("AWS_REGION"))
                .unwrap_or(defaults.s3_region),
            s3_endpoint: var("S3_ENDPOINT"),
            local_storage_path: var("LOCAL_STORAGE_PATH"),
            local_storage_base_url: var("LOCAL_STORAGE_BASE_URL")
                .unwrap_or(defaults.local_storage_base_url),
            local_signing_secret: var("LOCAL_SIGNING_SECRET"),
            fetch_timeout_secs,
            max_download_bytes: max_download_mb * 1024 * 1024,
            max_output_dimension,
            modulate_brightness,
            modulate_saturation,
            log_format,
        })
    }

    pub fn validate(&self) -> Result<(), anyhow::Error> {
        if self.max_download_bytes == 0 {
            return Err(anyhow!("MAX_DOWNLOAD_MB must be greater than zero"));
        }

        if self.max_output_dimension == 0 {
            return Err(anyhow!("MAX_OUTPUT_DIMENSION must be greater than zero"));
        }

        if !(self.modulate_brightness.is_finite() && self.modulate_brightness > 0.0) {
            return Err(anyhow!("MODULATE_BRIGHTNESS must be a positive number"));
        }

        if !(self.modulate_saturation.is_finite() && self.modulate_saturation >= 0.0) {
            return Err(anyhow!("MODULATE_SATURATION must not be negative"));
        }

        match self.storage_backend {
            StorageBackend::S3 if self.s3_bucket.is_none() => Err(anyhow!(
                "OUTPUT_BUCKET (or S3_BUCKET) must be set for the s3 storage backend"
            )),
            StorageBackend::Local if self.local_storage_path.is_none() => Err(anyhow!(
                "LOCAL_STORAGE_PATH must be set for the local storage backend"
            )),
            StorageBackend::Local if self.local_signing_secret.is_none() => Err(anyhow!(
                "LOCAL_SIGNING_SECRET must be set for the local storage backend"
            )),
            _ => Ok(()),
        }
    }

    pub fn fetch_timeout(&self) -> Option<Duration> {
        self.fetch_timeout_secs.map(Duration::from_secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = Config::from_lookup(lookup(&[("OUTPUT_BUCKET", "thumbs")])).unwrap();

        assert_eq!(config.storage_backend, StorageBackend::S3);
        assert_eq!(config.s3_bucket.as_deref(), Some("thumbs"));
        assert_eq!(config.s3_region, "us-east-1");
        assert_eq!(config.fetch_timeout(), None);
        assert_eq!(config.max_download_bytes, 25 * 1024 * 1024);
        assert_eq!(config.modulate_brightness, 1.0);
        assert_eq!(config.modulate_saturation, 1.0);
        assert_eq!(config.log_format, LogFormat::Pretty);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_bucket_and_region_fallbacks() {
        let config = Config::from_lookup(lookup(&[
            ("S3_BUCKET", "legacy"),
            ("AWS_REGION", "eu-west-1"),
            ("AWS_LAMBDA_FUNCTION_NAME", "resize"),
        ]))
        .unwrap();

        assert_eq!(config.s3_bucket.as_deref(), Some("legacy"));
        assert_eq!(config.s3_region, "eu-west-1");
        assert_eq!(config.log_format, LogFormat::Json);
    }

    #[test]
    fn test_missing_bucket_fails_validation() {
        let config = Config::from_lookup(lookup(&[])).unwrap();
        assert!(config.validate().is_err());

        let config = Config::from_lookup(lookup(&[("STORAGE_BACKEND", "local")])).unwrap();
        assert!(config.validate().is_err());

        let config = Config::from_lookup(lookup(&[
            ("STORAGE_BACKEND", "local"),
            ("LOCAL_STORAGE_PATH", "/tmp/out"),
            ("LOCAL_SIGNING_SECRET", "secret"),
        ]))
        .unwrap();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_invalid_numbers_are_rejected() {
        assert!(Config::from_lookup(lookup(&[("MAX_DOWNLOAD_MB", "lots")])).is_err());
        assert!(Config::from_lookup(lookup(&[("FETCH_TIMEOUT_SECS", "-1")])).is_err());
        assert!(Config::from_lookup(lookup(&[("MODULATE_BRIGHTNESS", "bright")])).is_err());

        let config = Config::from_lookup(lookup(&[
            ("OUTPUT_BUCKET", "thumbs"),
            ("MODULATE_BRIGHTNESS", "0"),
        ]))
        .unwrap();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_fetch_timeout() {
        let config = Config::from_lookup(lookup(&[("FETCH_TIMEOUT_SECS", "15")])).unwrap();
        assert_eq!(config.fetch_timeout(), Some(Duration::from_secs(15)));
    }
}
