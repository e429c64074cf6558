use crate::classify::ClassifierSettings;
use crate::error::GenerateError;
use crate::registry::{QualifiedName, TypeKind, TypeNode, TypeRegistry};
use serde::Serialize;
use std::collections::{BTreeSet, HashSet};
use tracing::trace;

/// Primary models and their dependency closure for one source namespace
///
/// The two sets are disjoint. `primary` is fixed before the closure walk
/// starts and never changes afterwards.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ProjectionSet {
    pub primary: BTreeSet<QualifiedName>,
    pub closure: BTreeSet<QualifiedName>,
}

impl ProjectionSet {
    pub fn is_primary(&self, name: &QualifiedName) -> bool {
        self.primary.contains(name)
    }

    pub fn contains(&self, name: &QualifiedName) -> bool {
        self.primary.contains(name) || self.closure.contains(name)
    }
}

/// Compute the projection set for `models`, all declared in `source`
pub fn compute_closure<'a>(
    registry: &'a TypeRegistry,
    settings: &'a ClassifierSettings,
    source: &'a str,
    models: &[&'a TypeNode],
) -> Result<ProjectionSet, GenerateError> {
    let mut walk = ClosureWalk {
        registry,
        settings,
        source,
        primary: models.iter().map(|m| m.name.clone()).collect(),
        closure: BTreeSet::new(),
        visited: HashSet::new(),
    };
    for &model in models {
        walk.add_dependent_types(model)?;
    }
    Ok(ProjectionSet {
        primary: walk.primary,
        closure: walk.closure,
    })
}

struct ClosureWalk<'a> {
    registry: &'a TypeRegistry,
    settings: &'a ClassifierSettings,
    source: &'a str,
    primary: BTreeSet<QualifiedName>,
    closure: BTreeSet<QualifiedName>,
    visited: HashSet<QualifiedName>,
}

impl<'a> ClosureWalk<'a> {
    fn add_dependent_types(&mut self, node: &'a TypeNode) -> Result<(), GenerateError> {
        if !self.visited.insert(node.name.clone()) {
            return Ok(());
        }

        let mut node = node;
        if matches!(node.kind, TypeKind::Struct | TypeKind::Alias) {
            self.consider(node);
            let primitive = self.reach_primitive(node)?;
            if primitive.kind == TypeKind::Builtin {
                return Ok(());
            }
            self.consider(primitive);
            if primitive.name != node.name && !self.visited.insert(primitive.name.clone()) {
                return Ok(());
            }
            node = primitive;
        }

        for member in self.registry.members_of(node) {
            let ty = self.registry.resolve(&member.ty)?;
            match ty.kind {
                TypeKind::Struct | TypeKind::Alias => self.add_dependent_types(ty)?,
                TypeKind::Pointer | TypeKind::Slice => {
                    let elem = self.registry.elem_of(ty)?;
                    self.add_dependent_types(elem)?
                }
                _ => {}
            }
        }
        Ok(())
    }

    /// Follow aliases and compounds down to the first type that is neither,
    /// adding every alias passed on the way
    fn reach_primitive(&mut self, node: &'a TypeNode) -> Result<&'a TypeNode, GenerateError> {
        let mut current = node;
        let mut seen: HashSet<&'a QualifiedName> = HashSet::new();
        // aliases since the last compound; a repeat here is an alias cycle
        let mut aliases: Vec<&'a QualifiedName> = Vec::new();
        loop {
            if !seen.insert(&current.name) {
                if aliases.contains(&&current.name) {
                    aliases.push(&current.name);
                    return Err(GenerateError::AliasCycle {
                        chain: aliases.iter().map(|n| n.to_string()).collect(),
                    });
                }
                return Ok(current);
            }
            current = match current.kind {
                TypeKind::Alias => {
                    self.consider(current);
                    aliases.push(&current.name);
                    self.registry.alias_target(current)?
                }
                kind if kind.is_compound() => {
                    aliases.clear();
                    self.registry.elem_of(current)?
                }
                _ => return Ok(current),
            };
        }
    }

    fn consider(&mut self, node: &TypeNode) {
        if self.primary.contains(&node.name)
            || node.name.namespace != self.source
            || self.settings.is_model_base(&node.name)
        {
            return;
        }
        if self.closure.insert(node.name.clone()) {
            trace!(ty = %node.name, "added to dependency closure");
        }
    }
}
