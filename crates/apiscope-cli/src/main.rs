use std::fs;
use std::io::Write;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use clap_complete::Shell;
use tokio::io::{AsyncBufReadExt, BufReader};

use apiscope_client::HttpDocsClient;
use apiscope_core::config::{self, ApiscopeConfig, CONFIG_FILE_NAME};
use apiscope_core::error::RenderError;
use apiscope_core::parse::operation::HttpMethod;
use apiscope_core::parse::spec::ApiSpec;
use apiscope_core::render::{SchemaRenderer, render_endpoint, render_examples, render_navigation};
use apiscope_core::shell::{Action, Selection, SpecLoad};
use apiscope_core::{DocsClient, ViewShell, ViewState, group_by_tag, project};

#[derive(Parser)]
#[command(
    name = "apiscope",
    about = "Browse OpenAPI documentation and generate request examples",
    version
)]
struct Cli {
    /// Base URL of the documented service (overrides the config file)
    #[arg(long, global = true)]
    url: Option<String>,

    /// Read the API document from a local YAML or JSON file
    #[arg(short, long, global = true)]
    input: Option<PathBuf>,

    /// Path to the config file
    #[arg(long, global = true, default_value = CONFIG_FILE_NAME)]
    config: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List endpoints grouped by tag
    List {
        /// Only show endpoints whose path, summary or description match
        #[arg(short, long)]
        query: Option<String>,
    },

    /// Show the documentation of one endpoint
    Show {
        /// HTTP method (case-insensitive)
        #[arg(short, long)]
        method: HttpMethod,

        /// Path template as written in the document, e.g. /users/{id}
        #[arg(short, long)]
        path: String,

        /// Output format
        #[arg(long, default_value = "text")]
        format: ShowFormat,
    },

    /// Generate example invocations of one endpoint
    Try {
        #[arg(short, long)]
        method: HttpMethod,

        #[arg(short, long)]
        path: String,

        /// Server to target instead of the first declared one
        #[arg(long)]
        server: Option<String>,
    },

    /// Interactive browser
    Browse,

    /// Validate an API document
    Validate,

    /// Initialize a new apiscope configuration
    Init {
        /// Overwrite existing files
        #[arg(long)]
        force: bool,
    },

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        shell: Shell,
    },
}

/// `text` renders the detail view; `json` and `yaml` print the endpoint
/// description sent to the example service.
#[derive(Clone, ValueEnum)]
enum ShowFormat {
    Text,
    Json,
    Yaml,
}

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::init();

    let cli = Cli::parse();

    match &cli.command {
        Commands::List { query } => cmd_list(&cli, query.as_deref()).await,

        Commands::Show {
            method,
            path,
            format,
        } => cmd_show(&cli, *method, path, format).await,

        Commands::Try {
            method,
            path,
            server,
        } => cmd_try(&cli, *method, path, server.as_deref()).await,

        Commands::Browse => cmd_browse(&cli).await,

        Commands::Validate => cmd_validate(&cli).await,

        Commands::Init { force } => cmd_init(&cli, *force),

        Commands::Completions { shell } => {
            let mut cmd = <Cli as clap::CommandFactory>::command();
            clap_complete::generate(*shell, &mut cmd, "apiscope", &mut std::io::stdout());
            Ok(())
        }
    }
}

/// Config file values with command-line overrides applied.
fn load_settings(cli: &Cli) -> Result<ApiscopeConfig> {
    let mut cfg = config::load_config(&cli.config)?.unwrap_or_default();
    if let Some(url) = &cli.url {
        cfg.base_url = url.clone();
    }
    log::debug!("documents from {}, examples from {}", cfg.spec_url(), cfg.examples_url());
    Ok(cfg)
}

fn build_client(cli: &Cli) -> Result<HttpDocsClient> {
    let cfg = load_settings(cli)?;
    let client = HttpDocsClient::new(&cfg)?;
    Ok(match &cli.input {
        Some(path) => client.with_spec_file(path.clone()),
        None => client,
    })
}

/// A shell with the document loaded; load failures end the command.
async fn open_shell(cli: &Cli) -> Result<ViewShell<HttpDocsClient>> {
    let mut shell = ViewShell::new(build_client(cli)?);
    if let SpecLoad::Failed(message) = shell.load().await?.load() {
        anyhow::bail!("failed to load API document: {message}");
    }
    Ok(shell)
}

fn loaded_spec(state: &ViewState) -> Result<&ApiSpec> {
    state
        .spec()
        .map(|spec| spec.as_ref())
        .context("API document is not loaded")
}

async fn cmd_list(cli: &Cli, query: Option<&str>) -> Result<()> {
    let mut shell = open_shell(cli).await?;
    if let Some(query) = query {
        shell.dispatch(Action::Search(query.to_string()))?;
    }
    print!("{}", render_navigation(shell.state()));
    Ok(())
}

async fn cmd_show(cli: &Cli, method: HttpMethod, path: &str, format: &ShowFormat) -> Result<()> {
    let mut shell = open_shell(cli).await?;
    let state = shell.dispatch(Action::SelectEndpoint(Selection::new(path, method)))?;
    let spec = loaded_spec(state)?;
    let (_, operation) = state
        .current_operation()
        .context("no endpoint selected")?;

    match format {
        ShowFormat::Text => print!("{}", render_endpoint(spec, path, method, operation)?),
        ShowFormat::Json => {
            let json = serde_json::to_string_pretty(&project(path, method, operation))?;
            println!("{}", json);
        }
        ShowFormat::Yaml => {
            let yaml = serde_yaml_ng::to_string(&project(path, method, operation))?;
            print!("{}", yaml);
        }
    }
    Ok(())
}

async fn cmd_try(cli: &Cli, method: HttpMethod, path: &str, server: Option<&str>) -> Result<()> {
    let mut shell = open_shell(cli).await?;
    if let Some(server) = server {
        shell.dispatch(Action::SelectServer(server.to_string()))?;
    }
    shell.dispatch(Action::SelectEndpoint(Selection::new(path, method)))?;

    eprintln!(
        "Generating examples for {} {} against {}",
        method,
        path,
        shell.state().server().unwrap_or_default()
    );
    let state = shell.generate().await?;
    print!("{}", render_examples(state.examples()));
    Ok(())
}

async fn cmd_validate(cli: &Cli) -> Result<()> {
    let client = build_client(cli)?;
    let spec = client
        .fetch_spec()
        .await
        .context("failed to load API document")?;

    eprintln!(
        "Valid OpenAPI {} document: {}",
        spec.openapi.as_deref().unwrap_or("3.x"),
        spec.title()
    );
    if let Some(info) = &spec.info {
        eprintln!("  Version: {}", info.version);
    }
    for server in &spec.servers {
        eprintln!("  Server: {server}");
    }
    eprintln!("  Paths: {}", spec.paths.len());
    eprintln!("  Operations: {}", spec.operation_count());
    if let Some(components) = &spec.components {
        eprintln!("  Schemas: {}", components.schemas.len());
    }
    for (tag, entries) in group_by_tag(&spec).groups() {
        eprintln!("  Tag {}: {} endpoints", tag, entries.len());
    }

    let problems = schema_problems(&spec);
    for (method, path, err) in &problems {
        eprintln!("  warning: {} {}: {}", method, path, err);
    }

    eprintln!("Validation successful.");
    Ok(())
}

/// Request and response schemas that cannot be displayed.
fn schema_problems(spec: &ApiSpec) -> Vec<(HttpMethod, &str, RenderError)> {
    let renderer = SchemaRenderer::new(spec.components.as_ref());
    let mut problems = Vec::new();

    for (path, item) in &spec.paths {
        for (method, operation) in &item.operations {
            let body = operation
                .request_body
                .as_ref()
                .and_then(|body| body.inline()?.json_schema());
            let responses = operation
                .responses
                .values()
                .filter_map(|response| response.inline()?.json_schema());

            for schema in body.into_iter().chain(responses) {
                if let Err(err) = renderer.render(Some(schema), 0, &[]) {
                    problems.push((*method, path.as_str(), err));
                }
            }
        }
    }
    problems
}

const BROWSE_HELP: &str = "\
Commands:
  list             show the endpoint list
  search <text>    filter endpoints (empty clears the filter)
  open <n>         show endpoint number n
  server [url]     list servers or switch the active one
  try              generate examples for the open endpoint
  help             show this help
  quit             leave
";

async fn cmd_browse(cli: &Cli) -> Result<()> {
    let mut shell = open_shell(cli).await?;
    print!("{}", render_navigation(shell.state()));

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        print!("apiscope> ");
        std::io::stdout().flush()?;

        let Some(line) = lines.next_line().await? else {
            break;
        };
        let line = line.trim();
        let (command, arg) = line.split_once(' ').unwrap_or((line, ""));
        let arg = arg.trim();

        let outcome = match command {
            "" => continue,
            "quit" | "exit" | "q" => break,
            "help" | "?" => {
                print!("{BROWSE_HELP}");
                Ok(())
            }
            "list" | "ls" => {
                print!("{}", render_navigation(shell.state()));
                Ok(())
            }
            "search" | "/" => shell
                .dispatch(Action::Search(arg.to_string()))
                .map(|state| print!("{}", render_navigation(state)))
                .map_err(anyhow::Error::from),
            "open" => browse_open(&mut shell, arg),
            "server" => browse_server(&mut shell, arg),
            "try" => shell
                .generate()
                .await
                .map(|state| print!("{}", render_examples(state.examples())))
                .map_err(anyhow::Error::from),
            other => Err(anyhow::anyhow!("unknown command `{other}`, type `help`")),
        };

        if let Err(err) = outcome {
            eprintln!("error: {err:#}");
        }
    }
    Ok(())
}

/// Open the endpoint numbered `arg` in the current (filtered) list.
fn browse_open(shell: &mut ViewShell<HttpDocsClient>, arg: &str) -> Result<()> {
    let number: usize = arg
        .parse()
        .with_context(|| format!("expected an endpoint number, got `{arg}`"))?;
    let selection = shell
        .state()
        .navigation()
        .and_then(|nav| {
            nav.entries()
                .nth(number.checked_sub(1)?)
                .map(|entry| Selection::new(entry.path, entry.method))
        })
        .with_context(|| format!("no endpoint numbered {number}"))?;

    let (path, method) = (selection.path.clone(), selection.method);
    let state = shell.dispatch(Action::SelectEndpoint(selection))?;
    let spec = loaded_spec(state)?;
    let (_, operation) = state
        .current_operation()
        .context("no endpoint selected")?;
    print!("{}", render_endpoint(spec, &path, method, operation)?);
    Ok(())
}

fn browse_server(shell: &mut ViewShell<HttpDocsClient>, arg: &str) -> Result<()> {
    if !arg.is_empty() {
        let state = shell.dispatch(Action::SelectServer(arg.to_string()))?;
        println!("Server: {}", state.server().unwrap_or_default());
        return Ok(());
    }

    let state = shell.state();
    let spec = loaded_spec(state)?;
    let active = state.server().unwrap_or_default();
    if spec.servers.is_empty() {
        println!("* {active} (Default Server)");
    }
    for server in &spec.servers {
        let marker = if server.url == active { '*' } else { ' ' };
        println!("{marker} {server}");
    }
    Ok(())
}

fn cmd_init(cli: &Cli, force: bool) -> Result<()> {
    let config_path = &cli.config;

    if config_path.exists() && !force {
        anyhow::bail!(
            "{} already exists. Use --force to overwrite.",
            config_path.display()
        );
    }

    fs::write(config_path, config::default_config_content())
        .with_context(|| format!("failed to write {}", config_path.display()))?;
    eprintln!("Created {}", config_path.display());
    Ok(())
}
