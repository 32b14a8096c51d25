use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use super::schema::SchemaOrRef;

const SCHEMA_REF_PREFIX: &str = "#/components/schemas/";

/// Reusable definitions. Only schemas are followed when rendering; other
/// component kinds are ignored.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Components {
    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub schemas: IndexMap<String, SchemaOrRef>,
}

impl Components {
    /// Look up `#/components/schemas/<name>`.
    pub fn schema(&self, ref_path: &str) -> Option<&SchemaOrRef> {
        self.schemas.get(schema_ref_name(ref_path)?)
    }
}

/// The component name of a local schema reference.
/// e.g. "#/components/schemas/Pet" → "Pet"
pub fn schema_ref_name(ref_path: &str) -> Option<&str> {
    ref_path
        .strip_prefix(SCHEMA_REF_PREFIX)
        .filter(|name| !name.is_empty())
}
