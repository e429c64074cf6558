#![allow(clippy::unwrap_used, clippy::expect_used)]

//! Unit tests for CLI commands

use crate::cli::{render, Cli, Commands, OutputFormat};
use clap::Parser;
use std::collections::BTreeMap;

#[test]
fn test_lint_command_with_flags() {
    let cli = Cli::try_parse_from([
        "modelgen",
        "lint",
        "--graph",
        "graph.yaml",
        "--fail-on-error",
        "--errors-only",
    ])
    .unwrap();

    match cli.command {
        Commands::Lint {
            input,
            fail_on_error,
            errors_only,
        } => {
            assert_eq!(input.graph.to_string_lossy(), "graph.yaml");
            assert!(input.namespace.is_none());
            assert!(fail_on_error);
            assert!(errors_only);
        }
        _ => panic!("Expected Lint command"),
    }
}

#[test]
fn test_routes_command_options() {
    let cli = Cli::try_parse_from([
        "modelgen",
        "routes",
        "-g",
        "graph.json",
        "-n",
        "example.com/app/models",
        "--config",
        "custom.toml",
        "--output-namespace",
        "example.com/app/apis",
        "--format",
        "yaml",
        "--out",
        "routes.yaml",
    ])
    .unwrap();

    match cli.command {
        Commands::Routes { input, output } => {
            assert_eq!(input.namespace.as_deref(), Some("example.com/app/models"));
            assert_eq!(input.config.unwrap().to_string_lossy(), "custom.toml");
            assert_eq!(input.output_namespace.as_deref(), Some("example.com/app/apis"));
            assert_eq!(output.format, OutputFormat::Yaml);
            assert_eq!(output.out.unwrap().to_string_lossy(), "routes.yaml");
        }
        _ => panic!("Expected Routes command"),
    }
}

#[test]
fn test_all_commands_parse() {
    for command in ["project", "routes", "report", "lint"] {
        let result = Cli::try_parse_from(["modelgen", command, "--graph", "graph.yaml"]);
        assert!(result.is_ok(), "Command {} should parse", command);
    }
}

#[test]
fn test_graph_is_required() {
    assert!(Cli::try_parse_from(["modelgen", "project"]).is_err());
    assert!(Cli::try_parse_from(["modelgen", "report", "--graph", "g.yaml", "--format", "xml"]).is_err());
}

#[test]
fn test_render_formats() {
    let mut value = BTreeMap::new();
    value.insert("keyword", "server");

    let json = render(&value, OutputFormat::Json).unwrap();
    assert!(json.contains("\"keyword\": \"server\""));

    let yaml = render(&value, OutputFormat::Yaml).unwrap();
    assert_eq!(yaml.trim(), "keyword: server");
}
