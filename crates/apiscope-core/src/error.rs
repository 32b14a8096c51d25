use thiserror::Error;

#[derive(Debug, Error)]
pub enum ParseError {
    #[error("failed to parse YAML: {0}")]
    Yaml(#[from] serde_yaml_ng::Error),

    #[error("failed to parse JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("unsupported OpenAPI version: {0}")]
    UnsupportedVersion(String),
}

/// Failure to retrieve the API document. Fatal to navigation until reload.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("HTTP {0}")]
    Status(u16),

    #[error("{0}")]
    Transport(String),

    #[error("invalid API document: {0}")]
    Parse(#[from] ParseError),

    #[error("failed to read {path}: {message}")]
    Io { path: String, message: String },
}

/// Failure of one example-generation request. Scoped to the endpoint view.
#[derive(Debug, Error)]
pub enum GenerationError {
    #[error("HTTP {status}: {reason}")]
    Status { status: u16, reason: String },

    #[error("{0}")]
    Transport(String),

    #[error("invalid examples payload: {0}")]
    Decode(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RenderError {
    #[error("cyclic schema: {0}")]
    CyclicSchema(String),

    #[error("unresolved reference: {0}")]
    UnresolvedRef(String),

    #[error("template error: {0}")]
    Template(String),
}

impl From<minijinja::Error> for RenderError {
    fn from(err: minijinja::Error) -> Self {
        RenderError::Template(err.to_string())
    }
}

/// A transition that is not allowed from the current view state.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ShellError {
    #[error("the API document is not loaded")]
    NotLoaded,

    #[error("no endpoint {method} {path}")]
    UnknownEndpoint { method: String, path: String },

    #[error("unknown server: {0}")]
    UnknownServer(String),

    #[error("no endpoint selected")]
    NoSelection,

    #[error("example generation already in progress")]
    GenerationInFlight,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config {path}: {source}")]
    Parse {
        path: String,
        #[source]
        source: serde_yaml_ng::Error,
    },
}
