use super::types::{Compound, FieldNode, MethodNode, QualifiedName, TypeKind, TypeNode};
use crate::error::GenerateError;
use crate::validator::{fail_if_issues, ValidationIssue};
use std::collections::{BTreeMap, BTreeSet};
use tracing::debug;

/// Read-only graph of type declarations keyed by qualified name
///
/// Built once from the front-end's output. Construction validates the whole
/// graph and fills in the nodes implied by the input:
///
/// - compound types named by their spelling (`*T`, `[]T`, `map[K]V`, `chan T`)
/// - builtins (`string`, `int64`, `interface{}`, ...)
///
/// Declaration order is kept so that method and type scans are stable.
#[derive(Debug, Clone, Default)]
pub struct TypeRegistry {
    types: BTreeMap<QualifiedName, TypeNode>,
    order: Vec<QualifiedName>,
}

impl TypeRegistry {
    /// Build and validate a registry
    ///
    /// # Errors
    ///
    /// Returns [`GenerateError::InvalidGraph`] listing every duplicate name,
    /// malformed compound or alias, and unresolved reference.
    pub fn from_nodes(nodes: impl IntoIterator<Item = TypeNode>) -> Result<Self, GenerateError> {
        let mut issues = Vec::new();
        let mut registry = TypeRegistry::default();

        for mut node in nodes {
            for method in &mut node.methods {
                if method.receiver == QualifiedName::default() {
                    method.receiver = node.name.clone();
                }
            }
            check_shape(&node, &mut issues);
            if registry.types.contains_key(&node.name) {
                issues.push(ValidationIssue::new(
                    node.name.to_string(),
                    "duplicate_type",
                    "type declared more than once",
                ));
                continue;
            }
            registry.insert(node);
        }

        let mut pending: Vec<(QualifiedName, String)> = registry
            .order
            .iter()
            .filter_map(|name| registry.types.get(name))
            .flat_map(references)
            .collect();
        let mut implied = 0usize;
        while let Some((name, location)) = pending.pop() {
            if registry.types.contains_key(&name) {
                continue;
            }
            match implied_node(&name) {
                Some(node) => {
                    pending.extend(references(&node));
                    registry.insert(node);
                    implied += 1;
                }
                None => issues.push(ValidationIssue::new(
                    location,
                    "unresolved_reference",
                    format!("reference to undeclared type '{}'", name),
                )),
            }
        }

        fail_if_issues(issues)?;
        debug!(
            types = registry.order.len(),
            implied = implied,
            "type registry built"
        );
        Ok(registry)
    }

    fn insert(&mut self, node: TypeNode) {
        self.order.push(node.name.clone());
        self.types.insert(node.name.clone(), node);
    }

    pub fn resolve(&self, name: &QualifiedName) -> Result<&TypeNode, GenerateError> {
        self.types.get(name).ok_or_else(|| GenerateError::TypeNotFound {
            name: name.to_string(),
        })
    }

    pub fn get(&self, name: &QualifiedName) -> Option<&TypeNode> {
        self.types.get(name)
    }

    pub fn contains(&self, name: &QualifiedName) -> bool {
        self.types.contains_key(name)
    }

    /// Ordered fields of a struct; empty for every other kind
    pub fn members_of<'a>(&self, node: &'a TypeNode) -> &'a [FieldNode] {
        if node.kind == TypeKind::Struct {
            &node.members
        } else {
            &[]
        }
    }

    /// Unwrap alias chains down to the first non-alias type
    ///
    /// # Errors
    ///
    /// [`GenerateError::AliasCycle`] when an alias is reached twice.
    pub fn underlying_of<'a>(&'a self, node: &'a TypeNode) -> Result<&'a TypeNode, GenerateError> {
        let mut current = node;
        let mut chain: Vec<QualifiedName> = Vec::new();
        while current.kind == TypeKind::Alias {
            if chain.contains(&current.name) {
                chain.push(current.name.clone());
                return Err(GenerateError::AliasCycle {
                    chain: chain.iter().map(ToString::to_string).collect(),
                });
            }
            chain.push(current.name.clone());
            current = self.alias_target(current)?;
        }
        Ok(current)
    }

    /// One level of alias unwrapping
    pub fn alias_target<'a>(&'a self, node: &'a TypeNode) -> Result<&'a TypeNode, GenerateError> {
        let target = node
            .underlying
            .as_ref()
            .ok_or_else(|| GenerateError::MissingElement {
                name: node.name.to_string(),
            })?;
        self.resolve(target)
    }

    /// Pointee, element or map value of a compound type
    pub fn elem_of(&self, node: &TypeNode) -> Result<&TypeNode, GenerateError> {
        let elem = node.elem.as_ref().ok_or_else(|| GenerateError::MissingElement {
            name: node.name.to_string(),
        })?;
        self.resolve(elem)
    }

    /// Methods whose name starts with `prefix`, in declaration order
    pub fn methods_with_prefix<'a>(
        &self,
        node: &'a TypeNode,
        prefix: &'a str,
    ) -> impl Iterator<Item = &'a MethodNode> + 'a {
        node.methods
            .iter()
            .filter(move |m| m.name.starts_with(prefix))
    }

    pub fn method<'a>(&self, node: &'a TypeNode, name: &str) -> Option<&'a MethodNode> {
        node.methods.iter().find(|m| m.name == name)
    }

    /// Every type declared in `namespace`, in declaration order
    pub fn types_in<'a, 'n>(&'a self, namespace: &'n str) -> impl Iterator<Item = &'a TypeNode> + 'n
    where
        'a: 'n,
    {
        self.iter().filter(move |t| t.name.namespace == namespace)
    }

    /// Namespaces that declare at least one named type
    pub fn namespaces(&self) -> BTreeSet<&str> {
        self.order
            .iter()
            .map(|n| n.namespace.as_str())
            .filter(|ns| !ns.is_empty())
            .collect()
    }

    /// All nodes in declaration order, implied nodes last
    pub fn iter(&self) -> impl Iterator<Item = &TypeNode> {
        self.order.iter().filter_map(|name| self.types.get(name))
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }
}

fn check_shape(node: &TypeNode, issues: &mut Vec<ValidationIssue>) {
    let location = node.name.to_string();
    match node.kind {
        TypeKind::Alias if node.underlying.is_none() => {
            issues.push(ValidationIssue::new(
                location.clone(),
                "missing_underlying",
                "alias declares no underlying type",
            ));
        }
        kind if kind.is_compound() && node.elem.is_none() => {
            issues.push(ValidationIssue::new(
                location.clone(),
                "missing_element",
                format!("{} declares no element type", kind),
            ));
        }
        TypeKind::Map if node.key.is_none() => {
            issues.push(ValidationIssue::new(
                location.clone(),
                "missing_key",
                "map declares no key type",
            ));
        }
        _ => {}
    }
    if node.kind != TypeKind::Struct && !node.members.is_empty() {
        issues.push(ValidationIssue::new(
            location,
            "unexpected_members",
            format!("{} cannot declare members", node.kind),
        ));
    }
}

/// Every name a node refers to, paired with the referencing location
fn references(node: &TypeNode) -> Vec<(QualifiedName, String)> {
    let owner = node.name.to_string();
    let mut refs = Vec::new();
    for name in [&node.underlying, &node.elem, &node.key].into_iter().flatten() {
        refs.push((name.clone(), owner.clone()));
    }
    for field in &node.members {
        refs.push((field.ty.clone(), format!("{}.{}", owner, field.name)));
    }
    for method in &node.methods {
        let location = format!("{}.{}", owner, method.name);
        for ty in method.params.iter().chain(&method.results) {
            refs.push((ty.clone(), location.clone()));
        }
    }
    refs
}

/// Node implied by a name that the input never declared
fn implied_node(name: &QualifiedName) -> Option<TypeNode> {
    if !name.namespace.is_empty() {
        return None;
    }
    let node = match name.compound() {
        Some(Compound::Pointer(elem)) => compound_node(name, TypeKind::Pointer, elem),
        Some(Compound::Slice(elem)) => compound_node(name, TypeKind::Slice, elem),
        Some(Compound::Chan(elem)) => compound_node(name, TypeKind::Channel, elem),
        Some(Compound::Map { key, value }) => {
            let mut node = compound_node(name, TypeKind::Map, value);
            node.key = Some(key);
            node
        }
        None => match name.name.as_str() {
            "" => return None,
            "interface{}" | "any" => TypeNode::new(name.clone(), TypeKind::Interface),
            _ => TypeNode::new(name.clone(), TypeKind::Builtin),
        },
    };
    Some(node)
}

fn compound_node(name: &QualifiedName, kind: TypeKind, elem: QualifiedName) -> TypeNode {
    let mut node = TypeNode::new(name.clone(), kind);
    node.elem = Some(elem);
    node
}
