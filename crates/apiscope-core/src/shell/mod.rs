pub mod state;

use std::future::Future;
use std::sync::Arc;

use crate::error::{GenerationError, LoadError, ShellError};
use crate::example::{Example, examples_or_error};
use crate::parse::spec::ApiSpec;
use crate::project::EndpointDescriptor;

pub use state::{Action, Generation, GenerationRequest, Selection, SpecLoad, ViewState};

/// The two remote collaborators of the viewer.
pub trait DocsClient {
    /// Retrieve the API document.
    fn fetch_spec(&self) -> impl Future<Output = Result<ApiSpec, LoadError>> + Send;

    /// Ask the example service for invocations of `endpoint` against `server_url`.
    fn generate_examples(
        &self,
        endpoint: &EndpointDescriptor,
        server_url: &str,
    ) -> impl Future<Output = Result<Vec<Example>, GenerationError>> + Send;
}

/// Drives a [`ViewState`] through its two asynchronous lifecycles.
/// No request is ever retried automatically.
pub struct ViewShell<C> {
    client: C,
    state: ViewState,
}

impl<C: DocsClient> ViewShell<C> {
    pub fn new(client: C) -> Self {
        Self {
            client,
            state: ViewState::new(),
        }
    }

    pub fn state(&self) -> &ViewState {
        &self.state
    }

    pub fn client(&self) -> &C {
        &self.client
    }

    pub fn dispatch(&mut self, action: Action) -> Result<&ViewState, ShellError> {
        self.state = self.state.apply(action)?;
        Ok(&self.state)
    }

    /// Fetch the document, ending in `Loaded` or `Failed`.
    pub async fn load(&mut self) -> Result<&ViewState, ShellError> {
        self.dispatch(Action::LoadStarted)?;
        let action = match self.client.fetch_spec().await {
            Ok(spec) => Action::SpecLoaded(Arc::new(spec)),
            Err(err) => {
                log::error!("failed to load API document: {err}");
                Action::SpecFailed(err.to_string())
            }
        };
        self.dispatch(action)
    }

    /// Mark a generation as started and hand back what to send.
    pub fn begin_generation(&mut self) -> Result<GenerationRequest, ShellError> {
        let request = self.state.generation_request()?;
        self.dispatch(Action::GenerationStarted)?;
        Ok(request)
    }

    /// Record the outcome of `ticket`. Failures become one error entry;
    /// outcomes of superseded requests are discarded.
    pub fn finish_generation(
        &mut self,
        ticket: u64,
        result: Result<Vec<Example>, GenerationError>,
    ) -> Result<&ViewState, ShellError> {
        if let Err(err) = &result {
            log::warn!("example generation failed: {err}");
        }
        self.dispatch(Action::GenerationFinished {
            ticket,
            examples: examples_or_error(result),
        })
    }

    /// Generate examples for the selected endpoint and wait for the outcome.
    pub async fn generate(&mut self) -> Result<&ViewState, ShellError> {
        let request = self.begin_generation()?;
        log::debug!(
            "generating examples for {} {} (#{})",
            request.endpoint.http_method,
            request.endpoint.path,
            request.ticket
        );
        let result = self
            .client
            .generate_examples(&request.endpoint, &request.server_url)
            .await;
        self.finish_generation(request.ticket, result)
    }
}
