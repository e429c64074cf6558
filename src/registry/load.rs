use super::graph::TypeRegistry;
use super::types::{FieldNode, QualifiedName, TypeKind, TypeNode};
use crate::error::GenerateError;
use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Serialized form of a front-end type graph
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TypeGraph {
    #[serde(default)]
    pub types: Vec<TypeNode>,
}

/// Programmatic construction of a type graph
///
/// ```rust
/// use modelgen::registry::{FieldNode, GraphBuilder};
///
/// let registry = GraphBuilder::new()
///     .structure("example.com/app/models.Group", [FieldNode::new("Title", "string")])
///     .build()
///     .unwrap();
/// assert!(registry.get(&"example.com/app/models.Group".into()).is_some());
/// ```
#[derive(Debug, Clone, Default)]
pub struct GraphBuilder {
    nodes: Vec<TypeNode>,
}

impl GraphBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(mut self, node: TypeNode) -> Self {
        self.nodes.push(node);
        self
    }

    /// Declare a struct with the given members
    pub fn structure(
        self,
        name: impl Into<QualifiedName>,
        members: impl IntoIterator<Item = FieldNode>,
    ) -> Self {
        let mut node = TypeNode::new(name, TypeKind::Struct);
        node.members = members.into_iter().collect();
        self.insert(node)
    }

    /// Declare a named alias of `underlying`
    pub fn alias(self, name: impl Into<QualifiedName>, underlying: impl Into<QualifiedName>) -> Self {
        self.insert(TypeNode::new(name, TypeKind::Alias).with_underlying(underlying))
    }

    pub fn build(self) -> Result<TypeRegistry, GenerateError> {
        TypeRegistry::from_nodes(self.nodes)
    }
}

/// Parse a graph document; YAML when `yaml` is set, JSON otherwise
pub fn parse_graph(contents: &str, yaml: bool) -> anyhow::Result<TypeGraph> {
    let graph = if yaml {
        serde_yaml::from_str(contents).context("Failed to parse type graph as YAML")?
    } else {
        serde_json::from_str(contents).context("Failed to parse type graph as JSON")?
    };
    Ok(graph)
}

/// Load and validate a type graph file (`.yaml`/`.yml` or JSON)
pub fn load_graph(path: &Path) -> anyhow::Result<TypeRegistry> {
    let contents = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read type graph: {}", path.display()))?;
    let yaml = path
        .extension()
        .map(|ext| ext == "yaml" || ext == "yml")
        .unwrap_or(false);
    let graph = parse_graph(&contents, yaml)
        .with_context(|| format!("Invalid type graph: {}", path.display()))?;
    let registry = TypeRegistry::from_nodes(graph.types)?;
    Ok(registry)
}
