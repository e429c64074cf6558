//! # Model Classifier
//!
//! Decides which declarations are persistent models and joins each model to
//! its manager.
//!
//! A type is a model when any of these holds:
//!
//! 1. its own name ends with a resource-base suffix and the namespace being
//!    scanned is the canonical base-declaring namespace
//! 2. one of its direct fields has a type whose name ends with a
//!    resource-base suffix (it embeds a base marker)
//! 3. it carries the opt-in comment tag
//!
//! Rule 1 only fires inside the base namespace. Scanning a consumer
//! namespace never re-detects the base types themselves as models.
//!
//! A model's manager is the sibling struct named `{Model}Manager`. Route
//! synthesis additionally requires that manager to be present in the
//! injected [`ManagerRegistry`]; a missing or unregistered manager is not an
//! error, the model simply gets no routes.

mod managers;


pub use managers::{ManagerBinding, ManagerInstance, ManagerRegistry};

use crate::registry::{QualifiedName, TypeKind, TypeNode, TypeRegistry};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Knobs for model detection
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClassifierSettings {
    /// Namespace that declares the resource base types (matched as a suffix)
    pub base_namespace: String,
    /// Name suffixes that mark a resource base type
    pub resource_base_suffixes: Vec<String>,
    /// Exact local name of the base marker type
    pub model_base: String,
    /// Comment tag that opts a type in as a model
    pub opt_in_tag: String,
    /// Comment tag that keeps a type out of every projection
    pub ignore_tag: String,
    /// Suffix appended to a model name to find its manager
    pub manager_suffix: String,
}

impl Default for ClassifierSettings {
    fn default() -> Self {
        ClassifierSettings {
            base_namespace: String::new(),
            resource_base_suffixes: vec![
                "ResourceBase".to_string(),
                "JointsBase".to_string(),
                "SharableBaseResource".to_string(),
                "IdentityBaseResource".to_string(),
            ],
            model_base: "SModelBase".to_string(),
            opt_in_tag: "modelgen:api-gen".to_string(),
            ignore_tag: "modelgen:ignore".to_string(),
            manager_suffix: "Manager".to_string(),
        }
    }
}

impl ClassifierSettings {
    pub fn is_base_namespace(&self, namespace: &str) -> bool {
        !self.base_namespace.is_empty() && namespace.ends_with(&self.base_namespace)
    }

    pub fn ends_with_resource_base(&self, name: &str) -> bool {
        self.resource_base_suffixes
            .iter()
            .any(|suffix| name.ends_with(suffix.as_str()))
    }

    pub fn is_model_base(&self, name: &QualifiedName) -> bool {
        name.name == self.model_base
    }
}

/// Why a model was left out of route synthesis
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Unbound {
    /// No `{Model}Manager` sibling declared
    MissingManager,
    /// Manager declared but absent from the manager registry
    UnregisteredManager(QualifiedName),
}

/// Classification of one source namespace
#[derive(Debug, Clone, Default)]
pub struct Classification<'a> {
    /// Models in declaration order
    pub models: Vec<&'a TypeNode>,
    /// Models eligible for route synthesis
    pub bindings: Vec<ManagerBinding<'a>>,
    /// Models excluded from route synthesis, with the reason
    pub unbound: Vec<(&'a TypeNode, Unbound)>,
}

impl Classification<'_> {
    pub fn is_model(&self, name: &QualifiedName) -> bool {
        self.models.iter().any(|m| &m.name == name)
    }
}

pub struct ModelClassifier<'a> {
    registry: &'a TypeRegistry,
    settings: &'a ClassifierSettings,
    managers: &'a ManagerRegistry,
}

impl<'a> ModelClassifier<'a> {
    pub fn new(
        registry: &'a TypeRegistry,
        settings: &'a ClassifierSettings,
        managers: &'a ManagerRegistry,
    ) -> Self {
        ModelClassifier {
            registry,
            settings,
            managers,
        }
    }

    pub fn settings(&self) -> &'a ClassifierSettings {
        self.settings
    }

    /// Whether `node` is a model when scanning `source_namespace`
    pub fn is_model(&self, node: &TypeNode, source_namespace: &str, is_base_namespace: bool) -> bool {
        if node.name.namespace != source_namespace {
            return false;
        }
        if node.has_tag(&self.settings.opt_in_tag) {
            return true;
        }
        // base types are only models where they are declared
        if self.settings.ends_with_resource_base(&node.name.name) {
            return is_base_namespace;
        }
        node.members
            .iter()
            .any(|m| self.settings.ends_with_resource_base(&m.ty.name))
    }

    /// Exported struct and alias models of `namespace`, in declaration order
    pub fn models_in(&self, namespace: &str) -> Vec<&'a TypeNode> {
        let is_base = self.settings.is_base_namespace(namespace);
        self.registry
            .types_in(namespace)
            .filter(|t| matches!(t.kind, TypeKind::Struct | TypeKind::Alias))
            .filter(|t| t.name.is_exported())
            .filter(|t| self.is_model(t, namespace, is_base))
            .collect()
    }

    /// Namespaces declaring at least one model, sorted
    pub fn model_namespaces(&self) -> Vec<&'a str> {
        self.registry
            .namespaces()
            .into_iter()
            .filter(|ns| !self.models_in(ns).is_empty())
            .collect()
    }

    /// The sibling `{Model}Manager` struct, if declared
    pub fn resolve_manager(&self, model: &TypeNode) -> Option<&'a TypeNode> {
        let name = QualifiedName::new(
            model.name.namespace.clone(),
            format!("{}{}", model.name.name, self.settings.manager_suffix),
        );
        self.registry
            .get(&name)
            .filter(|t| t.kind == TypeKind::Struct)
    }

    pub fn is_manager_registered(&self, manager: &TypeNode) -> bool {
        self.managers.is_registered(&manager.name)
    }

    /// Join a model to its manager and registered instance
    pub fn bind(&self, model: &'a TypeNode) -> Result<ManagerBinding<'a>, Unbound> {
        let manager = self.resolve_manager(model).ok_or(Unbound::MissingManager)?;
        let instance = self
            .managers
            .lookup(&manager.name)
            .ok_or_else(|| Unbound::UnregisteredManager(manager.name.clone()))?;
        Ok(ManagerBinding {
            model,
            manager,
            instance,
        })
    }

    /// Classify every model of `namespace` and bind the ones that can be routed
    pub fn classify(&self, namespace: &str) -> Classification<'a> {
        let mut out = Classification {
            models: self.models_in(namespace),
            ..Classification::default()
        };
        for model in out.models.clone() {
            match self.bind(model) {
                Ok(binding) => out.bindings.push(binding),
                Err(reason) => {
                    debug!(model = %model.name, reason = ?reason, "model skipped for route synthesis");
                    out.unbound.push((model, reason));
                }
            }
        }
        debug!(
            namespace = namespace,
            models = out.models.len(),
            bound = out.bindings.len(),
            "namespace classified"
        );
        out
    }
}
