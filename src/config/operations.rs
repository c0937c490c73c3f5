//! Config loading, validation, and persistence.

use super::model::Config;
use crate::error::{PromptlabError, Result};
use crate::fs::atomic_write_file;
use std::path::Path;

impl Config {
    /// Load config from a YAML file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let yaml = Self::read(path)?.ok_or_else(|| {
            PromptlabError::StoreError(format!("config file '{}' not found", path.display()))
        })?;
        Self::from_yaml(&yaml)
    }

    /// Like [`Config::load`], but a missing file yields the defaults.
    pub fn load_or_default<P: AsRef<Path>>(path: P) -> Result<Self> {
        match Self::read(path.as_ref())? {
            Some(yaml) => Self::from_yaml(&yaml),
            None => Ok(Self::default()),
        }
    }

    fn read(path: &Path) -> Result<Option<String>> {
        match std::fs::read_to_string(path) {
            Ok(yaml) => Ok(Some(yaml)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(PromptlabError::StoreError(format!(
                "cannot read config '{}': {}",
                path.display(),
                e
            ))),
        }
    }

    /// Parse config from a YAML string.
    ///
    /// Unknown fields in the YAML are silently ignored for forward compatibility.
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        // An empty document deserializes as unit, not as an empty mapping.
        if yaml.trim().is_empty() {
            return Ok(Self::default());
        }

        let config: Config = serde_yaml::from_str(yaml)
            .map_err(|e| PromptlabError::UserError(format!("failed to parse config YAML: {}", e)))?;

        config.validate()?;
        Ok(config)
    }

    /// Serialize config to YAML string.
    pub fn to_yaml(&self) -> Result<String> {
        serde_yaml::to_string(self).map_err(|e| {
            PromptlabError::StoreError(format!("failed to serialize config to YAML: {}", e))
        })
    }

    /// Atomically write the config file.
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        self.validate()?;
        atomic_write_file(path, &self.to_yaml()?)
    }

    /// Validate config values and return error on invalid values.
    ///
    /// Validation rules:
    /// - `execution.model` and `execution.base_url` must be non-empty
    /// - `execution.temperature` must be within `0.0..=2.0`
    /// - `execution.max_tokens` and `execution.timeout_seconds` must be positive
    /// - `lock_stale_minutes` must be positive
    pub fn validate(&self) -> Result<()> {
        let exec = &self.execution;

        if exec.model.trim().is_empty() {
            return Err(invalid("execution.model must not be empty"));
        }

        if exec.base_url.trim().is_empty() {
            return Err(invalid("execution.base_url must not be empty"));
        }

        if !(0.0..=2.0).contains(&exec.temperature) {
            return Err(PromptlabError::UserError(format!(
                "config validation failed: execution.temperature must be between 0.0 and 2.0 (found {})",
                exec.temperature
            )));
        }

        if exec.max_tokens == 0 {
            return Err(invalid("execution.max_tokens must be greater than 0"));
        }

        if exec.timeout_seconds == 0 {
            return Err(invalid("execution.timeout_seconds must be greater than 0"));
        }

        if self.lock_stale_minutes == 0 {
            return Err(invalid("lock_stale_minutes must be greater than 0"));
        }

        Ok(())
    }
}

fn invalid(reason: &str) -> PromptlabError {
    PromptlabError::UserError(format!("config validation failed: {}", reason))
}
