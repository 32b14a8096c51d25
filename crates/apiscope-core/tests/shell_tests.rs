use std::sync::Mutex;

use apiscope_core::error::{GenerationError, LoadError, ShellError};
use apiscope_core::parse;
use apiscope_core::parse::operation::HttpMethod;
use apiscope_core::parse::spec::ApiSpec;
use apiscope_core::project::EndpointDescriptor;
use apiscope_core::render::render_examples;
use apiscope_core::shell::{Action, DocsClient, Generation, Selection, SpecLoad, ViewShell};
use apiscope_core::Example;

const USERS: &str = include_str!("fixtures/users.yaml");

/// Canned collaborator that records what it was asked.
#[derive(Default)]
struct FakeClient {
    spec_status: Option<u16>,
    examples: Option<Result<Vec<Example>, u16>>,
    requests: Mutex<Vec<(EndpointDescriptor, String)>>,
}

impl DocsClient for FakeClient {
    async fn fetch_spec(&self) -> Result<ApiSpec, LoadError> {
        match self.spec_status {
            Some(status) => Err(LoadError::Status(status)),
            None => Ok(parse::from_yaml(USERS)?),
        }
    }

    async fn generate_examples(
        &self,
        endpoint: &EndpointDescriptor,
        server_url: &str,
    ) -> Result<Vec<Example>, GenerationError> {
        self.requests
            .lock()
            .unwrap()
            .push((endpoint.clone(), server_url.to_string()));
        match &self.examples {
            Some(Ok(examples)) => Ok(examples.clone()),
            Some(Err(status)) => Err(GenerationError::Status {
                status: *status,
                reason: "Internal Server Error".to_string(),
            }),
            None => Err(GenerationError::Transport("connection refused".to_string())),
        }
    }
}

fn get_user() -> Selection {
    Selection::new("/users/{id}", HttpMethod::Get)
}

#[tokio::test]
async fn load_selects_first_server() {
    let mut shell = ViewShell::new(FakeClient::default());
    let state = shell.load().await.unwrap();
    assert!(matches!(state.load(), SpecLoad::Loaded { .. }));
    assert_eq!(state.server(), Some("http://localhost:8080"));
}

#[tokio::test]
async fn load_failure_surfaces_status() {
    let mut shell = ViewShell::new(FakeClient {
        spec_status: Some(404),
        ..Default::default()
    });
    let state = shell.load().await.unwrap();
    assert_eq!(state.load(), &SpecLoad::Failed("HTTP 404".to_string()));
    assert_eq!(
        shell.dispatch(Action::SelectEndpoint(get_user())).unwrap_err(),
        ShellError::NotLoaded
    );
}

#[tokio::test]
async fn generation_sends_descriptor_and_active_server() {
    let mut shell = ViewShell::new(FakeClient {
        examples: Some(Ok(vec![
            Example::command(Some("Fetch user 1"), "curl http://localhost:8080/users/1"),
            Example::error("second example failed"),
        ])),
        ..Default::default()
    });
    shell.load().await.unwrap();
    shell
        .dispatch(Action::SelectServer("https://staging.example.com".to_string()))
        .unwrap();
    shell.dispatch(Action::SelectEndpoint(get_user())).unwrap();

    let state = shell.generate().await.unwrap();
    assert_eq!(state.examples().len(), 2);
    assert!(state.examples()[1].is_error());

    let requests = shell.client().requests.lock().unwrap();
    let (descriptor, server) = &requests[0];
    assert_eq!(descriptor.path, "/users/{id}");
    assert_eq!(descriptor.http_method, "GET");
    assert_eq!(server, "https://staging.example.com");
}

#[tokio::test]
async fn server_error_becomes_single_error_entry() {
    let mut shell = ViewShell::new(FakeClient {
        examples: Some(Err(500)),
        ..Default::default()
    });
    shell.load().await.unwrap();
    shell.dispatch(Action::SelectEndpoint(get_user())).unwrap();

    let state = shell.generate().await.unwrap();
    assert_eq!(
        state.examples(),
        &[Example::error("HTTP 500: Internal Server Error")]
    );
    let shown = render_examples(state.examples());
    assert_eq!(shown, "Error: HTTP 500: Internal Server Error\n");
    assert!(!shown.contains("curl"));
}

#[tokio::test]
async fn transport_error_becomes_single_error_entry() {
    let mut shell = ViewShell::new(FakeClient::default());
    shell.load().await.unwrap();
    shell.dispatch(Action::SelectEndpoint(get_user())).unwrap();

    let state = shell.generate().await.unwrap();
    assert_eq!(state.examples(), &[Example::error("connection refused")]);
}

#[tokio::test]
async fn reselect_clears_examples_before_next_request() {
    let mut shell = ViewShell::new(FakeClient {
        examples: Some(Ok(vec![Example::command(None, "curl a")])),
        ..Default::default()
    });
    shell.load().await.unwrap();
    shell.dispatch(Action::SelectEndpoint(get_user())).unwrap();
    shell.generate().await.unwrap();
    assert_eq!(shell.state().examples().len(), 1);

    let state = shell
        .dispatch(Action::SelectEndpoint(Selection::new("/health", HttpMethod::Get)))
        .unwrap();
    assert!(state.examples().is_empty());
    assert_eq!(state.generation(), &Generation::Idle);
}

#[tokio::test]
async fn overlapping_generation_is_rejected() {
    let mut shell = ViewShell::new(FakeClient::default());
    shell.load().await.unwrap();
    shell.dispatch(Action::SelectEndpoint(get_user())).unwrap();

    let first = shell.begin_generation().unwrap();
    assert_eq!(
        shell.begin_generation().unwrap_err(),
        ShellError::GenerationInFlight
    );

    let state = shell
        .finish_generation(first.ticket, Ok(vec![Example::command(None, "curl b")]))
        .unwrap();
    assert_eq!(state.examples().len(), 1);
}

#[tokio::test]
async fn moving_on_blocks_new_request_and_hides_old_result() {
    let mut shell = ViewShell::new(FakeClient::default());
    shell.load().await.unwrap();
    shell.dispatch(Action::SelectEndpoint(get_user())).unwrap();

    let stale = shell.begin_generation().unwrap();
    shell
        .dispatch(Action::SelectEndpoint(Selection::new("/users", HttpMethod::Post)))
        .unwrap();
    assert!(shell.state().is_generating());
    assert_eq!(
        shell.begin_generation().unwrap_err(),
        ShellError::GenerationInFlight
    );

    let state = shell
        .finish_generation(stale.ticket, Ok(vec![Example::command(None, "curl stale")]))
        .unwrap();
    assert!(state.examples().is_empty());
    assert_eq!(state.generation(), &Generation::Idle);

    let fresh = shell.begin_generation().unwrap();
    assert_ne!(stale.ticket, fresh.ticket);
    assert_eq!(fresh.endpoint.http_method, "POST");
    let state = shell
        .finish_generation(fresh.ticket, Ok(vec![Example::command(None, "curl fresh")]))
        .unwrap();
    assert_eq!(state.examples(), &[Example::command(None, "curl fresh")]);
}
