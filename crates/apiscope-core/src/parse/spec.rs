use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use super::components::Components;
use super::operation::{HttpMethod, Operation, PathItem};
use super::server::Server;

/// Server URL used when a document declares no servers.
pub const DEFAULT_SERVER_URL: &str = "/";

/// The `info` block; only the title is shown.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Info {
    pub title: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    #[serde(default)]
    pub version: String,
}

/// Top-level API description document.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ApiSpec {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub openapi: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub info: Option<Info>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub servers: Vec<Server>,

    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub paths: IndexMap<String, PathItem>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub components: Option<Components>,
}

impl ApiSpec {
    /// `paths[path][method]`.
    pub fn operation(&self, path: &str, method: HttpMethod) -> Option<&Operation> {
        self.paths.get(path)?.operation(method)
    }

    /// The server a freshly loaded document starts on.
    pub fn default_server(&self) -> &str {
        self.servers
            .first()
            .map(|s| s.url.as_str())
            .unwrap_or(DEFAULT_SERVER_URL)
    }

    /// Whether `url` is one of the servers a user may switch to.
    pub fn has_server(&self, url: &str) -> bool {
        if self.servers.is_empty() {
            return url == DEFAULT_SERVER_URL;
        }
        self.servers.iter().any(|s| s.url == url)
    }

    pub fn operation_count(&self) -> usize {
        self.paths.values().map(|item| item.operations.len()).sum()
    }

    pub fn title(&self) -> &str {
        self.info.as_ref().map(|i| i.title.as_str()).unwrap_or("API")
    }
}
