//! # Generator Module
//!
//! Runs the whole pipeline for one source namespace at a time:
//!
//! ```text
//! TypeRegistry → ModelClassifier → ProjectionEngine  → Projection
//!                               ↘ RouteSynthesizer → ModelRoutes (per bound model)
//! ```
//!
//! Projection covers every model; route synthesis only the models bound to a
//! registered manager. Any [`GenerateError`] aborts the namespace and no
//! partial output is returned.
//!
//! ## Usage
//!
//! ```rust
//! use modelgen::config::GeneratorConfig;
//! use modelgen::generator::Generator;
//! use modelgen::registry::{FieldNode, GraphBuilder, TypeKind, TypeNode};
//!
//! let registry = GraphBuilder::new()
//!     .insert(
//!         TypeNode::new("example.com/app/models.Widget", TypeKind::Struct)
//!             .with_comment("// +modelgen:api-gen")
//!             .with_member(FieldNode::new("Name", "string")),
//!     )
//!     .build()
//!     .unwrap();
//! let config = GeneratorConfig::default();
//! let outputs = Generator::new(&registry, &config).generate(None).unwrap();
//! assert_eq!(outputs.len(), 1);
//! assert!(outputs[0].projection.decl("Widget").is_some());
//! ```

use crate::classify::{ManagerRegistry, ModelClassifier, Unbound};
use crate::config::GeneratorConfig;
use crate::error::GenerateError;
use crate::projection::{Projection, ProjectionEngine};
use crate::registry::{QualifiedName, TypeRegistry};
use crate::synthesis::{ModelRoutes, RouteSynthesizer};
use serde::Serialize;
use tracing::info;


/// A model that was projected but got no routes
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UnboundModel {
    pub model: QualifiedName,
    /// `missing_manager` or `unregistered_manager`
    pub reason: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub manager: Option<QualifiedName>,
}

impl UnboundModel {
    fn new(model: QualifiedName, reason: &Unbound) -> Self {
        match reason {
            Unbound::MissingManager => UnboundModel {
                model,
                reason: "missing_manager",
                manager: None,
            },
            Unbound::UnregisteredManager(manager) => UnboundModel {
                model,
                reason: "unregistered_manager",
                manager: Some(manager.clone()),
            },
        }
    }
}

/// Everything generated for one source namespace
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NamespaceOutput {
    pub namespace: String,
    pub projection: Projection,
    pub routes: Vec<ModelRoutes>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub unbound: Vec<UnboundModel>,
}

pub struct Generator<'a> {
    registry: &'a TypeRegistry,
    config: &'a GeneratorConfig,
    managers: ManagerRegistry,
}

impl<'a> Generator<'a> {
    pub fn new(registry: &'a TypeRegistry, config: &'a GeneratorConfig) -> Self {
        Generator {
            registry,
            config,
            managers: config.manager_registry(),
        }
    }

    fn classifier(&self) -> ModelClassifier<'_> {
        ModelClassifier::new(self.registry, &self.config.classifier, &self.managers)
    }

    /// Namespaces declaring at least one model, sorted
    pub fn model_namespaces(&self) -> Vec<String> {
        self.classifier()
            .model_namespaces()
            .into_iter()
            .map(str::to_string)
            .collect()
    }

    pub fn generate_namespace(&self, namespace: &str) -> Result<NamespaceOutput, GenerateError> {
        info!(namespace = namespace, "generating namespace");
        let classification = self.classifier().classify(namespace);

        let engine = ProjectionEngine::new(
            self.registry,
            &self.config.classifier,
            &self.config.projection,
        );
        let projection = engine.project(namespace, &classification.models)?;

        let synthesizer = RouteSynthesizer::new(
            self.registry,
            &self.config.synthesis,
            &self.config.projection,
        );
        let routes = classification
            .bindings
            .iter()
            .map(|binding| synthesizer.synthesize(binding))
            .collect::<Result<Vec<_>, _>>()?;

        let unbound = classification
            .unbound
            .iter()
            .map(|(model, reason)| UnboundModel::new(model.name.clone(), reason))
            .collect();

        Ok(NamespaceOutput {
            namespace: namespace.to_string(),
            projection,
            routes,
            unbound,
        })
    }

    /// Generate one namespace, or every model namespace in sorted order
    pub fn generate(&self, namespace: Option<&str>) -> Result<Vec<NamespaceOutput>, GenerateError> {
        match namespace {
            Some(ns) => Ok(vec![self.generate_namespace(ns)?]),
            None => self
                .model_namespaces()
                .iter()
                .map(|ns| self.generate_namespace(ns))
                .collect(),
        }
    }
}
