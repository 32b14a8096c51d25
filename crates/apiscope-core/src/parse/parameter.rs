use std::fmt;

use serde::{Deserialize, Serialize};

use super::reference::Referenced;
use super::schema::{Schema, SchemaOrRef};

/// Where a parameter is carried (`in`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ParameterLocation {
    Path,
    Query,
    Header,
    Cookie,
}

impl ParameterLocation {
    pub fn as_str(&self) -> &'static str {
        match self {
            ParameterLocation::Path => "path",
            ParameterLocation::Query => "query",
            ParameterLocation::Header => "header",
            ParameterLocation::Cookie => "cookie",
        }
    }
}

impl fmt::Display for ParameterLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Parameter {
    pub name: String,

    #[serde(rename = "in")]
    pub location: ParameterLocation,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    #[serde(default)]
    pub required: bool,

    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub deprecated: bool,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub schema: Option<SchemaOrRef>,
}

impl Parameter {
    /// The schema written in place; referenced schemas are not followed.
    pub fn inline_schema(&self) -> Option<&Schema> {
        self.schema.as_ref().and_then(SchemaOrRef::as_schema)
    }

    /// Declared type, e.g. `integer` or `string | null`.
    pub fn type_name(&self) -> Option<String> {
        self.inline_schema()?
            .schema_type
            .as_ref()
            .map(ToString::to_string)
    }
}

pub type ParameterOrRef = Referenced<Parameter>;
