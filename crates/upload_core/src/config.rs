//! Where predictions are sent, loaded from and saved to a TOML file.

use crate::error::UploadError;
use anyhow::{Context, Result};
use reqwest::Url;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

pub const DEFAULT_BASE_URL: &str = "http://127.0.0.1:5000/";
pub const DEFAULT_PREDICT_PATH: &str = "/api/predict";
pub const DEFAULT_FIELD_NAME: &str = "image";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    /// Scheme, host and port of the prediction service.
    pub base_url: String,
    /// Joined onto `base_url`; an absolute path replaces the base path.
    pub predict_path: String,
    /// Multipart field carrying the image.
    pub field_name: String,
    /// `None` waits for the service as long as it takes.
    pub timeout_secs: Option<u64>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            predict_path: DEFAULT_PREDICT_PATH.to_string(),
            field_name: DEFAULT_FIELD_NAME.to_string(),
            timeout_secs: None,
        }
    }
}

impl ClientConfig {
    /// Reads the config, falling back to defaults when the file does not exist.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            tracing::debug!("No config at {}, using defaults", path.display());
            return Ok(Self::default());
        }
        let raw = fs::read_to_string(path)
            .with_context(|| format!("cannot read config: {}", path.display()))?;
        let cfg: Self = toml::from_str(&raw)
            .with_context(|| format!("invalid config: {}", path.display()))?;
        cfg.endpoint()
            .with_context(|| format!("invalid endpoint in {}", path.display()))?;
        Ok(cfg)
    }

    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("cannot create {}", parent.display()))?;
        }
        let raw = toml::to_string_pretty(self).context("cannot serialize config")?;
        fs::write(path, raw).with_context(|| format!("cannot write config: {}", path.display()))?;
        tracing::info!("Saved config to {}", path.display());
        Ok(())
    }

    /// The full URL requests are posted to.
    pub fn endpoint(&self) -> Result<Url, UploadError> {
        let base = Url::parse(self.base_url.trim())
            .map_err(|e| UploadError::Config(format!("base_url {:?}: {e}", self.base_url)))?;
        if !matches!(base.scheme(), "http" | "https") {
            return Err(UploadError::Config(format!(
                "base_url {:?} must use http or https",
                self.base_url
            )));
        }
        if self.field_name.trim().is_empty() {
            return Err(UploadError::Config("field_name must not be empty".into()));
        }
        base.join(self.predict_path.trim())
            .map_err(|e| UploadError::Config(format!("predict_path {:?}: {e}", self.predict_path)))
    }
}
