use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::parse::operation::{HttpMethod, Operation};
use crate::parse::content::ResponseOrRef;
use crate::parse::parameter::ParameterLocation;
use crate::parse::reference::Referenced;
use crate::parse::schema::SchemaOrRef;

/// Parameter name of the synthetic request-body entry.
pub const BODY_PARAMETER: &str = "body";

/// Type reported for parameters whose schema declares none.
pub const DEFAULT_PARAMETER_TYPE: &str = "string";

/// Where a parameter's value travels in the request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SourceKind {
    PathVariable,
    RequestHeader,
    RequestParam,
    RequestBody,
}

impl From<ParameterLocation> for SourceKind {
    fn from(location: ParameterLocation) -> Self {
        match location {
            ParameterLocation::Path => SourceKind::PathVariable,
            ParameterLocation::Header => SourceKind::RequestHeader,
            ParameterLocation::Query | ParameterLocation::Cookie => SourceKind::RequestParam,
        }
    }
}

/// A parameter's type: a primitive name, or the full body schema so the
/// example service can render it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ParameterType {
    Primitive(String),
    Schema(SchemaOrRef),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParameterDescriptor {
    pub name: String,
    #[serde(rename = "type")]
    pub param_type: ParameterType,
    pub is_required: bool,
    #[serde(rename = "sourceType")]
    pub source_kind: SourceKind,
    pub description: Option<String>,
}

/// Flattened view of one operation; the request payload of the example
/// generation service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EndpointDescriptor {
    pub path: String,
    pub http_method: String,
    pub summary: Option<String>,
    pub description: Option<String>,
    pub parameters: Vec<ParameterDescriptor>,
    pub responses: IndexMap<String, ResponseOrRef>,
}

/// Project an operation into its [`EndpointDescriptor`].
///
/// Declared parameters come first, in order, followed by a `body` entry when
/// the request body has an `application/json` schema. Responses pass through
/// untouched. `$ref` parameters and request bodies are skipped.
pub fn project(path: &str, method: HttpMethod, operation: &Operation) -> EndpointDescriptor {
    let mut parameters: Vec<ParameterDescriptor> = operation
        .parameters
        .iter()
        .filter_map(|p| match p {
            Referenced::Inline(param) => Some(ParameterDescriptor {
                name: param.name.clone(),
                param_type: ParameterType::Primitive(
                    param
                        .type_name()
                        .unwrap_or_else(|| DEFAULT_PARAMETER_TYPE.to_string()),
                ),
                is_required: param.required,
                source_kind: param.location.into(),
                description: param.description.clone(),
            }),
            Referenced::Ref { ref_path } => {
                log::warn!("{method} {path}: skipping parameter reference {ref_path}");
                None
            }
        })
        .collect();

    match &operation.request_body {
        Some(Referenced::Inline(body)) => {
            if let Some(schema) = body.json_schema() {
                parameters.push(ParameterDescriptor {
                    name: BODY_PARAMETER.to_string(),
                    param_type: ParameterType::Schema(schema.clone()),
                    is_required: body.required,
                    source_kind: SourceKind::RequestBody,
                    description: body.description.clone(),
                });
            }
        }
        Some(Referenced::Ref { ref_path }) => {
            log::warn!("{method} {path}: skipping request body reference {ref_path}");
        }
        None => {}
    }

    EndpointDescriptor {
        path: path.to_string(),
        http_method: method.as_str().to_string(),
        summary: operation.summary.clone(),
        description: operation.description.clone(),
        parameters,
        responses: operation.responses.clone(),
    }
}
