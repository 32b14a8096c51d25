use minijinja::{AutoEscape, Environment, context};

use super::schema::SchemaRenderer;
use crate::error::RenderError;
use crate::example::Example;
use crate::parse::operation::{HttpMethod, Operation};
use crate::parse::parameter::Parameter;
use crate::parse::reference::{Referenced, ref_display};
use crate::parse::schema::{Schema, SchemaOrRef};
use crate::parse::spec::ApiSpec;
use crate::shell::{SpecLoad, ViewState};

/// Indent applied to schema blocks inside the endpoint view.
const BLOCK_INDENT: &str = "    ";

/// The sidebar: endpoints grouped by tag, numbered in display order.
pub fn render_navigation(state: &ViewState) -> String {
    let spec = match state.load() {
        SpecLoad::Loading => return "Loading...\n".to_string(),
        SpecLoad::Failed(message) => return format!("Error: {message}\n"),
        SpecLoad::Loaded { spec, .. } => spec,
    };

    let mut out = format!("{}\n", spec.title());
    if let Some(url) = state.server() {
        match spec.servers.iter().find(|s| s.url == url) {
            Some(server) => out.push_str(&format!("Server: {server}\n")),
            None if spec.servers.is_empty() => {
                out.push_str(&format!("Server: {url} (Default Server)\n"))
            }
            None => out.push_str(&format!("Server: {url}\n")),
        }
    }

    let Some(nav) = state.navigation() else {
        return out;
    };
    if nav.is_empty() {
        out.push_str(&format!("\nNo endpoints match \"{}\"\n", state.query().trim()));
        return out;
    }

    let selected = state.selection();
    let mut number = 0;
    for (tag, entries) in nav.groups() {
        out.push_str(&format!("\n{tag}\n"));
        for entry in entries {
            number += 1;
            let marker = match selected {
                Some(s) if s.path == entry.path && s.method == entry.method => '>',
                _ => ' ',
            };
            out.push_str(&format!(
                "{marker} {number:>3}. {:<7} {}\n",
                entry.method.as_str(),
                entry.path
            ));
        }
    }
    out
}

/// The detail view of one operation.
pub fn render_endpoint(
    spec: &ApiSpec,
    path: &str,
    method: HttpMethod,
    operation: &Operation,
) -> Result<String, RenderError> {
    let mut env = Environment::new();
    env.set_trim_blocks(true);
    env.set_lstrip_blocks(true);
    env.set_auto_escape_callback(|_| AutoEscape::None);
    env.add_template(
        "endpoint.txt.j2",
        include_str!("../../templates/endpoint.txt.j2"),
    )?;
    let tmpl = env.get_template("endpoint.txt.j2")?;

    let renderer = SchemaRenderer::new(spec.components.as_ref());
    let schema_block = |schema: Option<&SchemaOrRef>| -> Option<String> {
        let text = renderer
            .render(Some(schema?), 0, &[])
            .unwrap_or_else(|err| format!("Error: {err}"));
        Some(indent_block(&text))
    };

    let parameters: Vec<minijinja::Value> = operation
        .parameters
        .iter()
        .map(|p| match p {
            Referenced::Inline(param) => parameter_to_ctx(param),
            Referenced::Ref { ref_path } => context! {
                name => ref_display(ref_path),
                location => "ref",
                type_name => "any",
                required => false,
            },
        })
        .collect();

    let request_body = operation.request_body.as_ref().map(|body| match body {
        Referenced::Inline(body) => context! {
            required => body.required,
            description => body.description.clone(),
            schema => schema_block(body.json_schema()),
        },
        Referenced::Ref { ref_path } => context! {
            required => false,
            description => format!("See {}", ref_display(ref_path)),
        },
    });

    let responses: Vec<minijinja::Value> = operation
        .responses
        .iter()
        .map(|(code, response)| match response {
            Referenced::Inline(r) => context! {
                code => code,
                description => r.description.clone().unwrap_or_else(|| "No description".to_string()),
                schema => schema_block(r.json_schema()),
            },
            Referenced::Ref { ref_path } => context! {
                code => code,
                description => format!("See {}", ref_display(ref_path)),
            },
        })
        .collect();

    Ok(tmpl.render(context! {
        method => method.as_str(),
        path => path,
        deprecated => operation.deprecated,
        summary => operation.summary.clone(),
        description => operation.description.clone(),
        parameters => parameters,
        request_body => request_body,
        responses => responses,
    })?)
}

fn parameter_to_ctx(param: &Parameter) -> minijinja::Value {
    let schema = param.inline_schema();
    let type_name = param.type_name().unwrap_or_else(|| "any".to_string());

    context! {
        name => param.name.clone(),
        location => param.location.as_str(),
        type_name => type_name,
        required => param.required,
        deprecated => param.deprecated,
        description => param.description.clone(),
        constraints => schema.map(constraints).unwrap_or_default(),
    }
}

/// Validation keywords of a parameter schema, in display order.
pub fn constraints(schema: &Schema) -> Vec<String> {
    let mut out = Vec::new();
    if let Some(n) = schema.min_length {
        out.push(format!("Min Length: {n}"));
    }
    if let Some(n) = schema.max_length {
        out.push(format!("Max Length: {n}"));
    }
    if let Some(n) = &schema.minimum {
        out.push(format!("Min: {}", format_number(n)));
    }
    if let Some(n) = &schema.maximum {
        out.push(format!("Max: {}", format_number(n)));
    }
    if let Some(pattern) = &schema.pattern {
        out.push(format!("Pattern: {pattern}"));
    }
    if !schema.enum_values.is_empty() {
        let values: Vec<String> = schema
            .enum_values
            .iter()
            .map(|v| match v {
                serde_json::Value::String(s) => s.clone(),
                other => other.to_string(),
            })
            .collect();
        out.push(format!("Enum: [{}]", values.join(", ")));
    }
    out
}

/// Whole numbers print without a fractional part, so `1.0` shows as `1`.
fn format_number(n: &serde_json::Number) -> String {
    match n.as_f64() {
        Some(f) if n.is_f64() && f.fract() == 0.0 && f.abs() < 1e15 => format!("{}", f as i64),
        _ => n.to_string(),
    }
}

fn indent_block(text: &str) -> String {
    text.lines()
        .map(|line| format!("{BLOCK_INDENT}{line}"))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Generated examples, numbered; error entries carry no command.
pub fn render_examples(examples: &[Example]) -> String {
    let mut out = String::new();
    for (idx, example) in examples.iter().enumerate() {
        if idx > 0 {
            out.push('\n');
        }
        match example {
            Example::Error { error } => out.push_str(&format!("Error: {error}\n")),
            Example::Command {
                description,
                command,
            } => {
                match description {
                    Some(d) => out.push_str(&format!("{d}\n")),
                    None => out.push_str(&format!("Example {}\n", idx + 1)),
                }
                out.push_str(&indent_block(command));
                out.push('\n');
            }
        }
    }
    out
}
