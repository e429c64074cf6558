//! # Type Projection Closure Engine
//!
//! Computes which types of a source namespace must be projected (the
//! classified models plus every namespace-local type they reach through
//! their members) and rewrites each into an output-facing declaration.
//!
//! ## Field policy
//!
//! For every member of a projected struct:
//!
//! 1. private members, members typed as the base marker and members tagged
//!    `json:"-"` or `ignore:"true"` are dropped
//! 2. on a primary model, a non-embedded struct-typed member is dropped
//!    unless it carries a `get` or `list` tag; closure types keep it
//! 3. the output type is resolved by structural kind: builtins, maps and
//!    interfaces are copied (subject to the scalar remap table), aliases are
//!    unwrapped and re-evaluated, named types are rewritten against the
//!    output namespace
//!
//! Emission is strict. A member kind with no projection rule aborts the run.

mod closure;
mod emit;
mod namespace;


pub use closure::{compute_closure, ProjectionSet};
pub use emit::{DeclBody, FieldType, Origin, ProjectedDecl, ProjectedField};
pub use namespace::{short_name, NamespaceMap};

use crate::classify::ClassifierSettings;
use crate::error::GenerateError;
use crate::registry::{TypeNode, TypeRegistry};
use emit::Emitter;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use tracing::{debug, info};

/// Replacement for a well-known wrapper scalar
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScalarRemap {
    /// Output spelling, e.g. `*bool`
    #[serde(rename = "type")]
    pub ty: String,
    /// Serialization options appended to the field
    #[serde(default)]
    pub json_options: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProjectionSettings {
    /// Output namespace used when `namespace_map` has no entry for the source
    pub output_namespace: String,
    /// Explicit source to output namespace table
    pub namespace_map: NamespaceMap,
    /// Local type name to replacement scalar
    pub scalar_remap: BTreeMap<String, ScalarRemap>,
}

impl Default for ProjectionSettings {
    fn default() -> Self {
        let mut scalar_remap = BTreeMap::new();
        scalar_remap.insert(
            "TriState".to_string(),
            ScalarRemap {
                ty: "*bool".to_string(),
                json_options: vec!["omitempty".to_string()],
            },
        );
        ProjectionSettings {
            output_namespace: "apis".to_string(),
            namespace_map: NamespaceMap::new(),
            scalar_remap,
        }
    }
}

impl ProjectionSettings {
    /// Output namespace for declarations projected from `source`
    pub fn output_for(&self, source: &str) -> String {
        self.namespace_map
            .get(source)
            .unwrap_or(self.output_namespace.as_str())
            .to_string()
    }
}

/// Every projected declaration of one source namespace
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Projection {
    pub source_namespace: String,
    pub output_namespace: String,
    #[serde(flatten)]
    pub set: ProjectionSet,
    pub decls: Vec<ProjectedDecl>,
    /// Other output namespaces the declarations refer to
    pub imports: BTreeSet<String>,
}

impl Projection {
    pub fn decl(&self, name: &str) -> Option<&ProjectedDecl> {
        self.decls.iter().find(|d| d.name == name)
    }
}

pub struct ProjectionEngine<'a> {
    registry: &'a TypeRegistry,
    classifier: &'a ClassifierSettings,
    settings: &'a ProjectionSettings,
}

impl<'a> ProjectionEngine<'a> {
    pub fn new(
        registry: &'a TypeRegistry,
        classifier: &'a ClassifierSettings,
        settings: &'a ProjectionSettings,
    ) -> Self {
        ProjectionEngine {
            registry,
            classifier,
            settings,
        }
    }

    /// Primary models plus their dependency closure
    pub fn closure(&self, source: &str, models: &[&TypeNode]) -> Result<ProjectionSet, GenerateError> {
        let set = compute_closure(self.registry, self.classifier, source, models)?;
        debug!(
            namespace = source,
            primary = ?set.primary,
            closure = ?set.closure,
            "projection set computed"
        );
        Ok(set)
    }

    /// Emit declarations for every member of `set`, in declaration order
    ///
    /// Types carrying the ignore tag are left out.
    pub fn emit(&self, source: &str, set: &ProjectionSet) -> Result<Projection, GenerateError> {
        let output = self.settings.output_for(source);
        let mut emitter = Emitter {
            registry: self.registry,
            classifier: self.classifier,
            settings: self.settings,
            source,
            output: &output,
            set,
            imports: BTreeSet::new(),
        };

        let mut decls = Vec::new();
        for node in self.registry.types_in(source) {
            if !set.contains(&node.name) || node.has_tag(&self.classifier.ignore_tag) {
                continue;
            }
            decls.push(emitter.emit_decl(node)?);
        }
        let imports = emitter.imports;

        info!(
            namespace = source,
            output = %output,
            decls = decls.len(),
            "namespace projected"
        );
        Ok(Projection {
            source_namespace: source.to_string(),
            output_namespace: output,
            set: set.clone(),
            decls,
            imports,
        })
    }

    /// Closure and emission in one step
    pub fn project(&self, source: &str, models: &[&TypeNode]) -> Result<Projection, GenerateError> {
        let set = self.closure(source, models)?;
        self.emit(source, &set)
    }
}
