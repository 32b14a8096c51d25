pub mod components;
pub mod content;
pub mod operation;
pub mod parameter;
pub mod reference;
pub mod schema;
pub mod server;
pub mod spec;

use crate::error::ParseError;
use spec::ApiSpec;

/// Parse an API document from YAML.
pub fn from_yaml(input: &str) -> Result<ApiSpec, ParseError> {
    let spec: ApiSpec = serde_yaml_ng::from_str(input)?;
    validate_version(&spec)?;
    Ok(spec)
}

/// Parse an API document from JSON.
pub fn from_json(input: &str) -> Result<ApiSpec, ParseError> {
    let spec: ApiSpec = serde_json::from_str(input)?;
    validate_version(&spec)?;
    Ok(spec)
}

/// Parse by file extension; anything but `.json` is read as YAML.
pub fn from_file_content(extension: Option<&str>, input: &str) -> Result<ApiSpec, ParseError> {
    match extension {
        Some("json") => from_json(input),
        _ => from_yaml(input),
    }
}

/// Documents without an `openapi` field are accepted as-is.
fn validate_version(spec: &ApiSpec) -> Result<(), ParseError> {
    match &spec.openapi {
        Some(version) if !version.starts_with("3.") => {
            Err(ParseError::UnsupportedVersion(version.clone()))
        }
        _ => Ok(()),
    }
}
