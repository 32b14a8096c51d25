pub mod config;
pub mod error;
pub mod example;
pub mod index;
pub mod parse;
pub mod project;
pub mod render;
pub mod shell;

pub use example::Example;
pub use index::{EndpointEntry, EndpointIndex, filter, group_by_tag};
pub use project::{EndpointDescriptor, project};
pub use shell::{DocsClient, ViewShell, ViewState};
