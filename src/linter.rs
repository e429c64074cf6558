//! # Model Linter
//!
//! Reports the conditions that generation silently tolerates, so a model that
//! ends up without routes or fields can be traced back to its declaration.
//!
//! ## Checks Performed
//!
//! 1. **missing_manager** (info) - model has no `{Model}Manager` sibling
//! 2. **unregistered_manager** (warning) - manager declared but not in `[[managers]]`
//! 3. **arity_mismatch** (info) - method name matches a verb, signature does not
//! 4. **ambiguous_method** (warning) - several methods match a one-to-one verb
//! 5. **non_struct_body** / **non_struct_response** (warning) - get-spec or
//!    perform-action signature is not a struct pointer
//! 6. **list_without_get** (info) - list filter present but no get route
//! 7. projection failures (error) - duplicate serialization names, embedded
//!    interfaces, unsupported field kinds and the other fatal conditions
//!
//! ## Usage
//!
//! ```rust,no_run
//! use modelgen::config::GeneratorConfig;
//! use modelgen::linter::{lint_graph, print_lint_issues};
//! use modelgen::registry::load_graph;
//! use std::path::Path;
//!
//! let registry = load_graph(Path::new("graph.yaml"))?;
//! let issues = lint_graph(&registry, &GeneratorConfig::default());
//! print_lint_issues(&issues);
//! # Ok::<(), anyhow::Error>(())
//! ```

use crate::classify::{ModelClassifier, Unbound};
use crate::config::GeneratorConfig;
use crate::error::GenerateError;
use crate::projection::ProjectionEngine;
use crate::registry::TypeRegistry;
use crate::synthesis::{Cardinality, RouteSynthesizer, ShapePosition, Verb};
use serde::Serialize;
use std::fmt;

#[cfg(test)]
mod tests;

/// Severity level for lint issues
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LintSeverity {
    /// Error - generation of the namespace will fail
    Error,
    /// Warning - likely a mistake, generation still succeeds
    Warning,
    /// Info - expected non-match worth knowing about
    Info,
}

impl fmt::Display for LintSeverity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LintSeverity::Error => write!(f, "error"),
            LintSeverity::Warning => write!(f, "warning"),
            LintSeverity::Info => write!(f, "info"),
        }
    }
}

/// A lint issue found in a type graph
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LintIssue {
    /// Qualified type or `Receiver.Method` the issue is about
    pub location: String,
    pub severity: LintSeverity,
    /// Type of lint issue (e.g., "missing_manager", "arity_mismatch")
    pub kind: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub suggestion: Option<String>,
}

impl LintIssue {
    pub fn new(
        location: impl Into<String>,
        severity: LintSeverity,
        kind: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        LintIssue {
            location: location.into(),
            severity,
            kind: kind.into(),
            message: message.into(),
            suggestion: None,
        }
    }

    pub fn with_suggestion(mut self, suggestion: impl Into<String>) -> Self {
        self.suggestion = Some(suggestion.into());
        self
    }

    fn from_error(location: impl Into<String>, err: &GenerateError) -> Self {
        LintIssue::new(location, LintSeverity::Error, err.kind(), err.to_string())
    }
}

/// Lint every namespace that declares models, in sorted order
pub fn lint_graph(registry: &TypeRegistry, config: &GeneratorConfig) -> Vec<LintIssue> {
    let managers = config.manager_registry();
    let classifier = ModelClassifier::new(registry, &config.classifier, &managers);
    classifier
        .model_namespaces()
        .into_iter()
        .flat_map(|ns| lint_namespace(registry, config, ns))
        .collect()
}

/// Lint the models of one source namespace
pub fn lint_namespace(registry: &TypeRegistry, config: &GeneratorConfig, namespace: &str) -> Vec<LintIssue> {
    let managers = config.manager_registry();
    let classifier = ModelClassifier::new(registry, &config.classifier, &managers);
    let classification = classifier.classify(namespace);
    let mut issues = Vec::new();

    for (model, reason) in &classification.unbound {
        let location = model.name.to_string();
        match reason {
            Unbound::MissingManager => issues.push(LintIssue::new(
                location,
                LintSeverity::Info,
                "missing_manager",
                format!(
                    "no {}{} declaration; no routes are synthesized",
                    model.name.name, config.classifier.manager_suffix
                ),
            )),
            Unbound::UnregisteredManager(manager) => issues.push(
                LintIssue::new(
                    location,
                    LintSeverity::Warning,
                    "unregistered_manager",
                    format!("manager '{}' is declared but not registered", manager),
                )
                .with_suggestion(format!("Add a [[managers]] entry with type = \"{}\"", manager)),
            ),
        }
    }

    let synthesizer = RouteSynthesizer::new(registry, &config.synthesis, &config.projection);
    for binding in &classification.bindings {
        let mut has_get = false;
        for verb in Verb::ALL {
            let scan = match synthesizer.scan(binding, verb) {
                Ok(scan) => scan,
                Err(err) => {
                    issues.push(LintIssue::from_error(binding.model.name.to_string(), &err));
                    continue;
                }
            };

            for method in &scan.mismatched {
                let (params, results) = verb.arity();
                issues.push(LintIssue::new(
                    method.display_name(),
                    LintSeverity::Info,
                    "arity_mismatch",
                    format!(
                        "name matches {} but takes {} parameter(s) and returns {} result(s); expected {} and {}",
                        verb,
                        method.params.len(),
                        method.results.len(),
                        params,
                        results
                    ),
                ));
            }

            if verb.cardinality() == Cardinality::One && scan.accepted.len() > 1 {
                let names: Vec<_> = scan.accepted.iter().map(|m| m.name.as_str()).collect();
                issues.push(
                    LintIssue::new(
                        RouteSynthesizer::target_of(binding, verb).name.to_string(),
                        LintSeverity::Warning,
                        "ambiguous_method",
                        format!(
                            "{} methods match {}: {}; only {} is used",
                            names.len(),
                            verb,
                            names.join(", "),
                            names[0]
                        ),
                    )
                    .with_suggestion("Rename the extra methods so they no longer share the prefix"),
                );
            }

            for warning in &scan.warnings {
                let kind = match warning.position {
                    ShapePosition::Body => "non_struct_body",
                    ShapePosition::Response => "non_struct_response",
                };
                issues.push(LintIssue::new(
                    warning.method.clone(),
                    LintSeverity::Warning,
                    kind,
                    warning.to_string(),
                ));
            }

            match verb {
                Verb::Get => has_get = !scan.accepted.is_empty(),
                Verb::List if !has_get && !scan.accepted.is_empty() => {
                    issues.push(LintIssue::new(
                        binding.manager.name.to_string(),
                        LintSeverity::Info,
                        "list_without_get",
                        "list filter declared but the model has no get method; no list route is synthesized",
                    ));
                }
                _ => {}
            }
        }
    }

    let engine = ProjectionEngine::new(registry, &config.classifier, &config.projection);
    if let Err(err) = engine.project(namespace, &classification.models) {
        issues.push(LintIssue::from_error(namespace, &err));
    }

    issues
}

/// Print lint issues to stderr, grouped by severity
pub fn print_lint_issues(issues: &[LintIssue]) {
    if issues.is_empty() {
        eprintln!("✅ No lint issues found!");
        return;
    }

    let errors: Vec<_> = issues
        .iter()
        .filter(|i| i.severity == LintSeverity::Error)
        .collect();
    let warnings: Vec<_> = issues
        .iter()
        .filter(|i| i.severity == LintSeverity::Warning)
        .collect();
    let infos: Vec<_> = issues
        .iter()
        .filter(|i| i.severity == LintSeverity::Info)
        .collect();

    eprintln!("\n📋 Lint Results:");
    eprintln!(
        "   {} error(s), {} warning(s), {} info(s)\n",
        errors.len(),
        warnings.len(),
        infos.len()
    );

    for (heading, group) in [
        ("❌ Errors (must fix):", &errors),
        ("⚠️  Warnings (should fix):", &warnings),
        ("ℹ️  Info:", &infos),
    ] {
        if group.is_empty() {
            continue;
        }
        eprintln!("{}", heading);
        for issue in group.iter() {
            eprintln!("   [{}] {}", issue.kind, issue.location);
            eprintln!("      {}", issue.message);
            if let Some(suggestion) = &issue.suggestion {
                eprintln!("      💡 Suggestion: {}", suggestion);
            }
        }
        eprintln!();
    }
}

pub fn has_errors(issues: &[LintIssue]) -> bool {
    issues.iter().any(|i| i.severity == LintSeverity::Error)
}

/// Fail if there are any error-level lint issues
pub fn fail_if_errors(issues: &[LintIssue]) -> anyhow::Result<()> {
    let errors = issues
        .iter()
        .filter(|i| i.severity == LintSeverity::Error)
        .count();
    if errors > 0 {
        anyhow::bail!("lint found {} error(s)", errors);
    }
    Ok(())
}
