pub mod schema;
pub mod view;

pub use schema::{SchemaRenderer, render_schema};
pub use view::{render_endpoint, render_examples, render_navigation};
