use serde::{Deserialize, Serialize};

/// A local `$ref` or the object written in place.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Referenced<T> {
    Ref {
        #[serde(rename = "$ref")]
        ref_path: String,
    },
    Inline(T),
}

impl<T> Referenced<T> {
    pub fn inline(&self) -> Option<&T> {
        match self {
            Referenced::Inline(value) => Some(value),
            Referenced::Ref { .. } => None,
        }
    }

    pub fn ref_path(&self) -> Option<&str> {
        match self {
            Referenced::Ref { ref_path } => Some(ref_path),
            Referenced::Inline(_) => None,
        }
    }
}

/// Last segment of a reference: `#/components/parameters/Limit` → `Limit`.
pub fn ref_display(ref_path: &str) -> &str {
    ref_path.rsplit('/').next().unwrap_or(ref_path)
}
