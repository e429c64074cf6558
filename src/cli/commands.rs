use crate::config::{resolve_config, GeneratorConfig};
use crate::generator::{Generator, NamespaceOutput};
use crate::linter::{fail_if_errors, lint_graph, lint_namespace, print_lint_issues, LintSeverity};
use crate::projection::Projection;
use crate::registry::{load_graph, TypeRegistry};
use crate::report::build_report;
use crate::synthesis::ModelRoutes;
use anyhow::Context;
use clap::{Args, Parser, Subcommand, ValueEnum};
use serde::Serialize;
use std::path::{Path, PathBuf};
use tracing::info;

/// Command-line interface for modelgen
#[derive(Parser)]
#[command(name = "modelgen")]
#[command(about = "Derive API projections and routes from model type graphs", long_about = None)]
pub struct Cli {
    /// The subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Input selection shared by every command
#[derive(Args, Debug, Clone, PartialEq, Eq)]
pub struct GraphArgs {
    /// Path to the type graph produced by the front-end (YAML or JSON)
    #[arg(short, long)]
    pub graph: PathBuf,

    /// Source namespace to process; every namespace with models when omitted
    #[arg(short, long)]
    pub namespace: Option<String>,

    /// Path to the generator config (modelgen.toml)
    /// If not provided, will auto-detect alongside the graph
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Override the configured output namespace
    #[arg(long)]
    pub output_namespace: Option<String>,
}

#[derive(Args, Debug, Clone, PartialEq, Eq)]
pub struct OutputArgs {
    /// Document format
    #[arg(long, value_enum, default_value_t = OutputFormat::Json)]
    pub format: OutputFormat,

    /// Write to this file instead of stdout
    #[arg(short, long)]
    pub out: Option<PathBuf>,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Json,
    Yaml,
}

/// Available CLI commands
#[derive(Subcommand)]
pub enum Commands {
    /// Emit the projected declarations of each namespace
    Project {
        #[command(flatten)]
        input: GraphArgs,
        #[command(flatten)]
        output: OutputArgs,
    },
    /// Emit the synthesized route descriptors of each bound model
    Routes {
        #[command(flatten)]
        input: GraphArgs,
        #[command(flatten)]
        output: OutputArgs,
    },
    /// Emit the resource summary (route kinds, keywords, service)
    Report {
        #[command(flatten)]
        input: GraphArgs,
        #[command(flatten)]
        output: OutputArgs,
    },
    /// Lint a type graph
    ///
    /// Reports models without managers, unregistered managers, methods whose
    /// names match a verb but whose signatures do not, ambiguous matches,
    /// non-struct bodies and responses, and projection failures.
    Lint {
        #[command(flatten)]
        input: GraphArgs,

        /// Exit with error code if any errors are found
        #[arg(long, default_value_t = false)]
        fail_on_error: bool,

        /// Show only errors (hide warnings and info)
        #[arg(long, default_value_t = false)]
        errors_only: bool,
    },
}

/// Execute a parsed command
pub fn run_cli(cli: Cli) -> anyhow::Result<()> {
    match &cli.command {
        Commands::Project { input, output } => {
            let outputs = generate(input)?;
            let projections: Vec<&Projection> = outputs.iter().map(|o| &o.projection).collect();
            write_output(&projections, output)
        }
        Commands::Routes { input, output } => {
            let outputs = generate(input)?;
            let routes: Vec<&ModelRoutes> = outputs.iter().flat_map(|o| &o.routes).collect();
            write_output(&routes, output)
        }
        Commands::Report { input, output } => {
            let outputs = generate(input)?;
            let report = build_report(outputs.iter().flat_map(|o| &o.routes));
            write_output(&report, output)
        }
        Commands::Lint {
            input,
            fail_on_error,
            errors_only,
        } => {
            let (registry, config) = load_inputs(input)?;
            let mut issues = match &input.namespace {
                Some(ns) => lint_namespace(&registry, &config, ns),
                None => lint_graph(&registry, &config),
            };
            if *errors_only {
                issues.retain(|i| i.severity == LintSeverity::Error);
            }
            print_lint_issues(&issues);
            if *fail_on_error {
                fail_if_errors(&issues)?;
            }
            Ok(())
        }
    }
}

/// Load the graph and its effective configuration
pub fn load_inputs(input: &GraphArgs) -> anyhow::Result<(TypeRegistry, GeneratorConfig)> {
    let registry = load_graph(&input.graph)?;
    let mut config = resolve_config(input.config.as_deref(), &input.graph)?;
    if let Some(ns) = &input.output_namespace {
        config.projection.output_namespace = ns.clone();
    }
    Ok((registry, config))
}

fn generate(input: &GraphArgs) -> anyhow::Result<Vec<NamespaceOutput>> {
    let (registry, config) = load_inputs(input)?;
    let outputs = Generator::new(&registry, &config)
        .generate(input.namespace.as_deref())
        .with_context(|| format!("Generation failed for {}", input.graph.display()))?;
    Ok(outputs)
}

/// Serialize `value` in the requested format
pub fn render<T: Serialize + ?Sized>(value: &T, format: OutputFormat) -> anyhow::Result<String> {
    let text = match format {
        OutputFormat::Json => {
            serde_json::to_string_pretty(value).context("Failed to serialize output as JSON")?
        }
        OutputFormat::Yaml => {
            serde_yaml::to_string(value).context("Failed to serialize output as YAML")?
        }
    };
    Ok(text)
}

fn write_output<T: Serialize + ?Sized>(value: &T, output: &OutputArgs) -> anyhow::Result<()> {
    let text = render(value, output.format)?;
    match &output.out {
        Some(path) => write_file(path, &text),
        None => {
            println!("{}", text);
            Ok(())
        }
    }
}

fn write_file(path: &Path, text: &str) -> anyhow::Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory for {}", path.display()))?;
    }
    std::fs::write(path, text).with_context(|| format!("Failed to write {}", path.display()))?;
    info!(path = %path.display(), bytes = text.len(), "output written");
    Ok(())
}
