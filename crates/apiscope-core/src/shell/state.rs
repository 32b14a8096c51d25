use std::sync::Arc;

use crate::error::ShellError;
use crate::example::Example;
use crate::index::{self, EndpointIndex};
use crate::parse::operation::{HttpMethod, Operation};
use crate::parse::spec::ApiSpec;
use crate::project::{EndpointDescriptor, project};

/// Lifecycle of the API document.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum SpecLoad {
    #[default]
    Loading,
    Loaded {
        spec: Arc<ApiSpec>,
        server: String,
    },
    Failed(String),
}

/// The endpoint currently on display.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Selection {
    pub path: String,
    pub method: HttpMethod,
}

impl Selection {
    pub fn new(path: impl Into<String>, method: HttpMethod) -> Self {
        Self {
            path: path.into(),
            method,
        }
    }
}

/// Lifecycle of example generation. At most one request is in flight; it
/// stays in flight when the selection changes.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Generation {
    #[default]
    Idle,
    Generating {
        ticket: u64,
        /// Endpoint the request was issued for.
        selection: Selection,
    },
    Done(Vec<Example>),
}

/// Everything needed to issue one generation request.
#[derive(Debug, Clone, PartialEq)]
pub struct GenerationRequest {
    pub ticket: u64,
    pub server_url: String,
    pub endpoint: EndpointDescriptor,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    LoadStarted,
    SpecLoaded(Arc<ApiSpec>),
    SpecFailed(String),
    Search(String),
    SelectServer(String),
    SelectEndpoint(Selection),
    GenerationStarted,
    GenerationFinished { ticket: u64, examples: Vec<Example> },
}

/// Immutable snapshot of the viewer. Every change goes through [`ViewState::apply`].
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ViewState {
    load: SpecLoad,
    query: String,
    selection: Option<Selection>,
    generation: Generation,
    next_ticket: u64,
}

impl ViewState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn load(&self) -> &SpecLoad {
        &self.load
    }

    pub fn spec(&self) -> Option<&Arc<ApiSpec>> {
        match &self.load {
            SpecLoad::Loaded { spec, .. } => Some(spec),
            _ => None,
        }
    }

    pub fn server(&self) -> Option<&str> {
        match &self.load {
            SpecLoad::Loaded { server, .. } => Some(server),
            _ => None,
        }
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn selection(&self) -> Option<&Selection> {
        self.selection.as_ref()
    }

    pub fn generation(&self) -> &Generation {
        &self.generation
    }

    pub fn is_generating(&self) -> bool {
        matches!(self.generation, Generation::Generating { .. })
    }

    /// Examples on display; empty unless a generation has completed.
    pub fn examples(&self) -> &[Example] {
        match &self.generation {
            Generation::Done(examples) => examples,
            _ => &[],
        }
    }

    /// The grouped endpoint list after applying the search query.
    pub fn navigation(&self) -> Option<EndpointIndex<'_>> {
        let spec = self.spec()?;
        Some(index::filter(&index::group_by_tag(spec), &self.query))
    }

    /// The selected operation, looked up in the loaded document.
    pub fn current_operation(&self) -> Option<(&Selection, &Operation)> {
        let selection = self.selection.as_ref()?;
        let operation = self.spec()?.operation(&selection.path, selection.method)?;
        Some((selection, operation))
    }

    /// The request the next [`Action::GenerationStarted`] will issue.
    pub fn generation_request(&self) -> Result<GenerationRequest, ShellError> {
        let server_url = self.server().ok_or(ShellError::NotLoaded)?.to_string();
        let (selection, operation) = self.current_operation().ok_or(ShellError::NoSelection)?;
        if self.is_generating() {
            return Err(ShellError::GenerationInFlight);
        }
        Ok(GenerationRequest {
            ticket: self.next_ticket,
            server_url,
            endpoint: project(&selection.path, selection.method, operation),
        })
    }

    /// Pure transition to the next snapshot.
    pub fn apply(&self, action: Action) -> Result<ViewState, ShellError> {
        let mut next = self.clone();

        match action {
            Action::LoadStarted => {
                next.load = SpecLoad::Loading;
                next.selection = None;
                next.generation = Generation::Idle;
            }
            Action::SpecLoaded(spec) => {
                let server = spec.default_server().to_string();
                log::debug!(
                    "loaded {} ({} operations), server {server}",
                    spec.title(),
                    spec.operation_count()
                );
                next.load = SpecLoad::Loaded { spec, server };
                next.selection = None;
                next.generation = Generation::Idle;
            }
            Action::SpecFailed(message) => {
                next.load = SpecLoad::Failed(message);
                next.selection = None;
                next.generation = Generation::Idle;
            }
            Action::Search(query) => {
                next.query = query;
            }
            Action::SelectServer(url) => {
                let SpecLoad::Loaded { spec, server } = &mut next.load else {
                    return Err(ShellError::NotLoaded);
                };
                if !spec.has_server(&url) {
                    return Err(ShellError::UnknownServer(url));
                }
                *server = url;
            }
            Action::SelectEndpoint(selection) => {
                let spec = self.spec().ok_or(ShellError::NotLoaded)?;
                if spec.operation(&selection.path, selection.method).is_none() {
                    return Err(ShellError::UnknownEndpoint {
                        method: selection.method.to_string(),
                        path: selection.path,
                    });
                }
                log::debug!("selected {} {}", selection.method, selection.path);
                next.selection = Some(selection);
                if matches!(next.generation, Generation::Done(_)) {
                    next.generation = Generation::Idle;
                }
            }
            Action::GenerationStarted => {
                let request = self.generation_request()?;
                let selection = self.selection.clone().ok_or(ShellError::NoSelection)?;
                next.generation = Generation::Generating {
                    ticket: request.ticket,
                    selection,
                };
                next.next_ticket = request.ticket + 1;
            }
            Action::GenerationFinished { ticket, examples } => match &self.generation {
                Generation::Generating {
                    ticket: pending,
                    selection,
                } if *pending == ticket => {
                    if self.selection.as_ref() == Some(selection) {
                        next.generation = Generation::Done(examples);
                    } else {
                        log::debug!(
                            "dropping examples of #{ticket} for {} {}, no longer selected",
                            selection.method,
                            selection.path
                        );
                        next.generation = Generation::Idle;
                    }
                }
                _ => {
                    log::warn!("dropping examples of superseded request #{ticket}");
                }
            },
        }

        Ok(next)
    }
}
