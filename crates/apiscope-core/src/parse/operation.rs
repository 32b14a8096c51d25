use std::fmt;
use std::str::FromStr;

use indexmap::IndexMap;
use serde::de::{self, Deserializer, MapAccess, Visitor};
use serde::ser::{SerializeMap, Serializer};
use serde::{Deserialize, Serialize};

use super::content::{RequestBodyOrRef, ResponseOrRef};
use super::parameter::ParameterOrRef;

/// HTTP method.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum HttpMethod {
    Get,
    Post,
    Put,
    Delete,
    Patch,
    Options,
    Head,
    Trace,
}

impl HttpMethod {
    pub const ALL: [HttpMethod; 8] = [
        HttpMethod::Get,
        HttpMethod::Post,
        HttpMethod::Put,
        HttpMethod::Delete,
        HttpMethod::Patch,
        HttpMethod::Options,
        HttpMethod::Head,
        HttpMethod::Trace,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
            HttpMethod::Put => "PUT",
            HttpMethod::Delete => "DELETE",
            HttpMethod::Patch => "PATCH",
            HttpMethod::Options => "OPTIONS",
            HttpMethod::Head => "HEAD",
            HttpMethod::Trace => "TRACE",
        }
    }

    /// Method for a path-item key. Keys are matched exactly, so `GET` is
    /// not an operation.
    pub fn from_key(key: &str) -> Option<HttpMethod> {
        HttpMethod::ALL.into_iter().find(|m| m.key() == key)
    }

    /// The lowercase key used in a path item.
    pub fn key(&self) -> &'static str {
        match self {
            HttpMethod::Get => "get",
            HttpMethod::Post => "post",
            HttpMethod::Put => "put",
            HttpMethod::Delete => "delete",
            HttpMethod::Patch => "patch",
            HttpMethod::Options => "options",
            HttpMethod::Head => "head",
            HttpMethod::Trace => "trace",
        }
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownMethod(pub String);

impl fmt::Display for UnknownMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown HTTP method: {}", self.0)
    }
}

impl std::error::Error for UnknownMethod {}

impl FromStr for HttpMethod {
    type Err = UnknownMethod;

    /// Case-insensitive, for user input.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        HttpMethod::ALL
            .into_iter()
            .find(|m| m.key().eq_ignore_ascii_case(s))
            .ok_or_else(|| UnknownMethod(s.to_string()))
    }
}

/// One method of a path. Only the first tag decides its navigation group.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Operation {
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub parameters: Vec<ParameterOrRef>,

    #[serde(rename = "requestBody", skip_serializing_if = "Option::is_none")]
    pub request_body: Option<RequestBodyOrRef>,

    #[serde(default)]
    pub responses: IndexMap<String, ResponseOrRef>,

    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub deprecated: bool,
}

/// A path item. Operations keep the method order of the source document.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct PathItem {
    pub summary: Option<String>,
    pub description: Option<String>,
    pub parameters: Vec<ParameterOrRef>,
    pub operations: IndexMap<HttpMethod, Operation>,
}

impl PathItem {
    pub fn operation(&self, method: HttpMethod) -> Option<&Operation> {
        self.operations.get(&method)
    }
}

impl<'de> Deserialize<'de> for PathItem {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_map(PathItemVisitor)
    }
}

/// Reads method keys in document order, ignoring `$ref`, `servers` and
/// extensions.
struct PathItemVisitor;

impl<'de> Visitor<'de> for PathItemVisitor {
    type Value = PathItem;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a path item object")
    }

    fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<PathItem, A::Error> {
        let mut item = PathItem::default();

        while let Some(key) = map.next_key::<String>()? {
            if let Some(method) = HttpMethod::from_key(&key) {
                let operation: Operation = map
                    .next_value()
                    .map_err(|e| de::Error::custom(format!("{key}: {e}")))?;
                item.operations.insert(method, operation);
                continue;
            }
            match key.as_str() {
                "summary" => item.summary = map.next_value()?,
                "description" => item.description = map.next_value()?,
                "parameters" => item.parameters = map.next_value()?,
                _ => {
                    map.next_value::<de::IgnoredAny>()?;
                }
            }
        }

        Ok(item)
    }
}

impl Serialize for PathItem {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(None)?;
        if let Some(summary) = &self.summary {
            map.serialize_entry("summary", summary)?;
        }
        if let Some(description) = &self.description {
            map.serialize_entry("description", description)?;
        }
        if !self.parameters.is_empty() {
            map.serialize_entry("parameters", &self.parameters)?;
        }
        for (method, operation) in &self.operations {
            map.serialize_entry(method.key(), operation)?;
        }
        map.end()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_method_parse_is_case_insensitive() {
        assert_eq!("get".parse::<HttpMethod>().unwrap(), HttpMethod::Get);
        assert_eq!("DELETE".parse::<HttpMethod>().unwrap(), HttpMethod::Delete);
        assert!("fetch".parse::<HttpMethod>().is_err());
    }

    #[test]
    fn test_path_item_keeps_document_method_order() {
        let json = r#"{
            "summary": "users",
            "post": {"responses": {}},
            "parameters": [],
            "get": {"responses": {}},
            "x-internal": true
        }"#;
        let item: PathItem = serde_json::from_str(json).unwrap();
        let methods: Vec<HttpMethod> = item.operations.keys().copied().collect();
        assert_eq!(methods, vec![HttpMethod::Post, HttpMethod::Get]);
        assert_eq!(item.summary.as_deref(), Some("users"));
    }

    #[test]
    fn test_method_keys_are_lowercase_only() {
        let json = r#"{"GET": {"responses": {}}, "Post": {"responses": {}}, "delete": {"responses": {}}}"#;
        let item: PathItem = serde_json::from_str(json).unwrap();
        let methods: Vec<HttpMethod> = item.operations.keys().copied().collect();
        assert_eq!(methods, vec![HttpMethod::Delete]);
        assert_eq!(HttpMethod::from_key("GET"), None);
    }

    #[test]
    fn test_yaml_status_codes_need_no_quotes() {
        let yaml = "get:\n  responses:\n    200:\n      description: ok\n    default:\n      description: error\n";
        let item: PathItem = serde_yaml_ng::from_str(yaml).unwrap();
        let codes: Vec<&str> = item.operations[&HttpMethod::Get]
            .responses
            .keys()
            .map(String::as_str)
            .collect();
        assert_eq!(codes, vec!["200", "default"]);
    }

    #[test]
    fn test_path_item_serializes_lowercase_keys() {
        let mut item = PathItem::default();
        item.operations.insert(HttpMethod::Put, Operation::default());
        let value = serde_json::to_value(&item).unwrap();
        assert!(value.get("put").is_some());
    }
}
