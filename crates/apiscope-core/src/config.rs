use std::fs;
use std::path::Path;

use serde::Deserialize;

use crate::error::ConfigError;

/// Looked up in the working directory unless `--config` says otherwise.
pub const CONFIG_FILE_NAME: &str = ".apiscope.yaml";

pub const DEFAULT_BASE_URL: &str = "http://localhost:8080";
pub const DEFAULT_SPEC_PATH: &str = "/autodocer/api-docs";
pub const DEFAULT_EXAMPLES_PATH: &str = "/autodocer/ai/generate-examples";

/// Project configuration loaded from `.apiscope.yaml`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ApiscopeConfig {
    /// Origin of the documented service.
    pub base_url: String,
    /// Path serving the API document.
    pub spec_path: String,
    /// Path of the example generation service.
    pub examples_path: String,
    /// Per-request timeout. Example generation calls a language model and can
    /// take tens of seconds.
    pub timeout_secs: u64,
}

impl Default for ApiscopeConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            spec_path: DEFAULT_SPEC_PATH.to_string(),
            examples_path: DEFAULT_EXAMPLES_PATH.to_string(),
            timeout_secs: 60,
        }
    }
}

impl ApiscopeConfig {
    pub fn spec_url(&self) -> String {
        join_url(&self.base_url, &self.spec_path)
    }

    pub fn examples_url(&self) -> String {
        join_url(&self.base_url, &self.examples_path)
    }
}

fn join_url(base: &str, path: &str) -> String {
    format!(
        "{}/{}",
        base.trim_end_matches('/'),
        path.trim_start_matches('/')
    )
}

/// Read `path`; a missing file is `Ok(None)` so callers can fall back to defaults.
pub fn load_config(path: &Path) -> Result<Option<ApiscopeConfig>, ConfigError> {
    if !path.exists() {
        return Ok(None);
    }
    let content = fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.display().to_string(),
        source,
    })?;
    let config = serde_yaml_ng::from_str(&content).map_err(|source| ConfigError::Parse {
        path: path.display().to_string(),
        source,
    })?;
    Ok(Some(config))
}

/// Commented template written by `apiscope init`.
pub fn default_config_content() -> &'static str {
    r#"# apiscope configuration
base_url: http://localhost:8080

# where the documented service publishes its API document
spec_path: /autodocer/api-docs

# example generation endpoint (receives the endpoint description as JSON)
examples_path: /autodocer/ai/generate-examples

# seconds before a request is abandoned
timeout_secs: 60
"#
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = ApiscopeConfig::default();
        assert_eq!(config.base_url, "http://localhost:8080");
        assert_eq!(config.spec_url(), "http://localhost:8080/autodocer/api-docs");
        assert_eq!(
            config.examples_url(),
            "http://localhost:8080/autodocer/ai/generate-examples"
        );
        assert_eq!(config.timeout_secs, 60);
    }

    #[test]
    fn test_default_content_matches_defaults() {
        let config: ApiscopeConfig = serde_yaml_ng::from_str(default_config_content()).unwrap();
        assert_eq!(config, ApiscopeConfig::default());
    }

    #[test]
    fn test_parse_minimal_config() {
        let yaml = "base_url: https://api.example.com/\n";
        let config: ApiscopeConfig = serde_yaml_ng::from_str(yaml).unwrap();
        assert_eq!(config.spec_url(), "https://api.example.com/autodocer/api-docs");
        // Defaults applied
        assert_eq!(config.timeout_secs, 60);
    }

    #[test]
    fn test_load_missing_and_present_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILE_NAME);
        assert!(load_config(&path).unwrap().is_none());

        fs::write(&path, "spec_path: /v3/api-docs\ntimeout_secs: 5\n").unwrap();
        let config = load_config(&path).unwrap().unwrap();
        assert_eq!(config.spec_path, "/v3/api-docs");
        assert_eq!(config.timeout_secs, 5);
    }

    #[test]
    fn test_load_invalid_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILE_NAME);
        fs::write(&path, "timeout_secs: soon\n").unwrap();
        assert!(matches!(load_config(&path), Err(ConfigError::Parse { .. })));
    }
}
