use crate::registry::{QualifiedName, TypeNode};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Runtime facts about a registered manager
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ManagerInstance {
    /// Singular resource keyword, e.g. `server`
    pub keyword: String,
    /// Plural resource keyword, e.g. `servers`
    pub keyword_plural: String,
    /// Owning service, reported but not used for routing
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub service: Option<String>,
}

impl ManagerInstance {
    pub fn new(keyword: impl Into<String>, keyword_plural: impl Into<String>) -> Self {
        ManagerInstance {
            keyword: keyword.into(),
            keyword_plural: keyword_plural.into(),
            service: None,
        }
    }

    pub fn with_service(mut self, service: impl Into<String>) -> Self {
        self.service = Some(service.into());
        self
    }
}

/// Manager lookup keyed by the manager type's qualified name
///
/// Built by the caller before classification runs (usually from the
/// `[[managers]]` table of the configuration) and handed to the classifier.
#[derive(Debug, Clone, Default)]
pub struct ManagerRegistry {
    instances: BTreeMap<QualifiedName, ManagerInstance>,
}

impl ManagerRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an instance, returning any instance it replaced
    pub fn register(
        &mut self,
        manager: QualifiedName,
        instance: ManagerInstance,
    ) -> Option<ManagerInstance> {
        self.instances.insert(manager, instance)
    }

    pub fn lookup(&self, manager: &QualifiedName) -> Option<&ManagerInstance> {
        self.instances.get(manager)
    }

    pub fn is_registered(&self, manager: &QualifiedName) -> bool {
        self.instances.contains_key(manager)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&QualifiedName, &ManagerInstance)> {
        self.instances.iter()
    }

    pub fn len(&self) -> usize {
        self.instances.len()
    }

    pub fn is_empty(&self) -> bool {
        self.instances.is_empty()
    }
}

impl FromIterator<(QualifiedName, ManagerInstance)> for ManagerRegistry {
    fn from_iter<I: IntoIterator<Item = (QualifiedName, ManagerInstance)>>(iter: I) -> Self {
        ManagerRegistry {
            instances: iter.into_iter().collect(),
        }
    }
}

/// A model joined to its manager type and registered instance
#[derive(Debug, Clone, Copy)]
pub struct ManagerBinding<'a> {
    pub model: &'a TypeNode,
    pub manager: &'a TypeNode,
    pub instance: &'a ManagerInstance,
}

impl<'a> ManagerBinding<'a> {
    pub fn singular(&self) -> &'a str {
        &self.instance.keyword
    }

    pub fn plural(&self) -> &'a str {
        &self.instance.keyword_plural
    }
}
