use serde::{Deserialize, Serialize};

use crate::error::GenerationError;

/// One generated invocation, or the reason it could not be produced.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Example {
    Error {
        error: String,
    },
    Command {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        description: Option<String>,
        command: String,
    },
}

impl Example {
    pub fn command(description: Option<&str>, command: impl Into<String>) -> Self {
        Example::Command {
            description: description.map(String::from),
            command: command.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Example::Error {
            error: message.into(),
        }
    }

    pub fn is_error(&self) -> bool {
        matches!(self, Example::Error { .. })
    }
}

/// The displayed outcome of a generation request: the service's list on
/// success, a single error entry otherwise.
pub fn examples_or_error(result: Result<Vec<Example>, GenerationError>) -> Vec<Example> {
    result.unwrap_or_else(|err| vec![Example::error(err.to_string())])
}
