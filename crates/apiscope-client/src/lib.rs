use std::path::{Path, PathBuf};
use std::time::Duration;

use apiscope_core::config::ApiscopeConfig;
use apiscope_core::error::{GenerationError, LoadError};
use apiscope_core::parse;
use apiscope_core::parse::spec::ApiSpec;
use apiscope_core::{DocsClient, EndpointDescriptor, Example};
use reqwest::{Client, Response};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("failed to build HTTP client: {0}")]
    Build(#[from] reqwest::Error),
}

/// Where the API document comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SpecSource {
    Remote(String),
    File(PathBuf),
}

/// `DocsClient` backed by the documented service's HTTP endpoints.
#[derive(Debug, Clone)]
pub struct HttpDocsClient {
    client: Client,
    spec: SpecSource,
    examples_url: String,
}

impl HttpDocsClient {
    pub fn new(config: &ApiscopeConfig) -> Result<Self, ClientError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;
        Ok(Self {
            client,
            spec: SpecSource::Remote(config.spec_url()),
            examples_url: config.examples_url(),
        })
    }

    /// Read the document from a local YAML or JSON file instead of fetching it.
    /// Example generation still goes to the configured service.
    pub fn with_spec_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.spec = SpecSource::File(path.into());
        self
    }

    pub fn spec_source(&self) -> &SpecSource {
        &self.spec
    }

    pub fn examples_url(&self) -> &str {
        &self.examples_url
    }

    async fn fetch_remote(&self, url: &str) -> Result<ApiSpec, LoadError> {
        log::debug!("GET {url}");
        let response = self.client.get(url).send().await.map_err(transport)?;
        let response = check_status(response).map_err(LoadError::Status)?;
        let body = response.text().await.map_err(transport)?;
        Ok(parse::from_json(&body)?)
    }
}

/// Read and parse a document, picking the format from the file extension.
pub async fn load_file(path: &Path) -> Result<ApiSpec, LoadError> {
    log::debug!("reading {}", path.display());
    let content = tokio::fs::read_to_string(path)
        .await
        .map_err(|err| LoadError::Io {
            path: path.display().to_string(),
            message: err.to_string(),
        })?;
    let extension = path.extension().and_then(|ext| ext.to_str());
    Ok(parse::from_file_content(extension, &content)?)
}

impl DocsClient for HttpDocsClient {
    async fn fetch_spec(&self) -> Result<ApiSpec, LoadError> {
        match &self.spec {
            SpecSource::Remote(url) => self.fetch_remote(url).await,
            SpecSource::File(path) => load_file(path).await,
        }
    }

    async fn generate_examples(
        &self,
        endpoint: &EndpointDescriptor,
        server_url: &str,
    ) -> Result<Vec<Example>, GenerationError> {
        log::debug!(
            "POST {} for {} {}",
            self.examples_url,
            endpoint.http_method,
            endpoint.path
        );
        let response = self
            .client
            .post(&self.examples_url)
            .query(&[("serverUrl", server_url)])
            .json(endpoint)
            .send()
            .await
            .map_err(|err| GenerationError::Transport(err.to_string()))?;

        let response = check_status(response).map_err(|status| GenerationError::Status {
            status,
            reason: reqwest::StatusCode::from_u16(status)
                .ok()
                .and_then(|code| code.canonical_reason())
                .unwrap_or("Unknown")
                .to_string(),
        })?;

        response
            .json::<Vec<Example>>()
            .await
            .map_err(|err| GenerationError::Decode(err.to_string()))
    }
}

fn check_status(response: Response) -> Result<Response, u16> {
    let status = response.status();
    if status.is_success() {
        Ok(response)
    } else {
        log::debug!("{} answered {status}", response.url());
        Err(status.as_u16())
    }
}

fn transport(err: reqwest::Error) -> LoadError {
    LoadError::Transport(err.to_string())
}
