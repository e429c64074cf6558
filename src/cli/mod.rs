//! # CLI Module
//!
//! Command-line surface of the `modelgen` binary.
//!
//! ## Commands
//!
//! ```bash
//! # Projected declarations of every model namespace
//! modelgen project --graph graph.yaml
//!
//! # Routes of one namespace, as YAML, into a file
//! modelgen routes --graph graph.yaml \
//!     --namespace example.com/cloud/compute/models \
//!     --format yaml --out routes.yaml
//!
//! # Resource summary
//! modelgen report --graph graph.yaml --config modelgen.toml
//!
//! # Diagnostics; non-zero exit on error-level issues
//! modelgen lint --graph graph.yaml --fail-on-error
//! ```
//!
//! Every command accepts `--graph`, `--namespace`, `--config` and
//! `--output-namespace`. Without `--config`, a `modelgen.toml` next to the
//! graph is used when present.

mod commands;

#[cfg(test)]
mod tests;

pub use commands::{load_inputs, render, run_cli, Cli, Commands, GraphArgs, OutputArgs, OutputFormat};
