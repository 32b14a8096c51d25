use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use super::reference::Referenced;
use super::schema::SchemaOrRef;

/// The only content type whose schema the viewer displays.
pub const JSON_MEDIA_TYPE: &str = "application/json";

/// One entry of a `content` map. Only the schema is read; `example`,
/// `examples` and `encoding` ride along in `extra`.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct MediaType {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub schema: Option<SchemaOrRef>,

    #[serde(flatten)]
    pub extra: IndexMap<String, serde_json::Value>,
}

pub type Content = IndexMap<String, MediaType>;

fn json_schema(content: &Content) -> Option<&SchemaOrRef> {
    content.get(JSON_MEDIA_TYPE)?.schema.as_ref()
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RequestBody {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    #[serde(default)]
    pub content: Content,

    #[serde(default)]
    pub required: bool,
}

impl RequestBody {
    /// Schema of the `application/json` representation, if declared.
    pub fn json_schema(&self) -> Option<&SchemaOrRef> {
        json_schema(&self.content)
    }
}

pub type RequestBodyOrRef = Referenced<RequestBody>;

/// A response keyed by status code (or `default`) in an operation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Response {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub content: Content,

    /// `headers`, `links` and extensions, forwarded untouched.
    #[serde(flatten)]
    pub extra: IndexMap<String, serde_json::Value>,
}

impl Response {
    pub fn json_schema(&self) -> Option<&SchemaOrRef> {
        json_schema(&self.content)
    }
}

pub type ResponseOrRef = Referenced<Response>;
