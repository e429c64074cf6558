use super::closure::ProjectionSet;
use super::namespace::short_name;
use super::ProjectionSettings;
use crate::classify::ClassifierSettings;
use crate::error::GenerateError;
use crate::registry::{is_exported_ident, FieldNode, QualifiedName, TypeKind, TypeNode, TypeRegistry};
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use tracing::trace;

/// Output-facing type expression of a projected field or alias
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum FieldType {
    /// Declaration in the output namespace itself
    Local { name: String },
    /// Declaration in another output namespace
    Imported { namespace: String, name: String },
    /// Declared type carried through unchanged
    Source { name: QualifiedName },
    /// Replacement spelling from the scalar remap table
    Scalar { spelling: String },
    Pointer { elem: Box<FieldType> },
    Slice { elem: Box<FieldType> },
}

impl FieldType {
    pub fn local(name: impl Into<String>) -> Self {
        FieldType::Local { name: name.into() }
    }

    pub fn pointer(elem: FieldType) -> Self {
        FieldType::Pointer {
            elem: Box::new(elem),
        }
    }

    pub fn slice(elem: FieldType) -> Self {
        FieldType::Slice {
            elem: Box::new(elem),
        }
    }
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldType::Local { name } => write!(f, "{}", name),
            FieldType::Imported { namespace, name } => {
                write!(f, "{}.{}", short_name(namespace), name)
            }
            FieldType::Source { name } => write!(f, "{}", name),
            FieldType::Scalar { spelling } => write!(f, "{}", spelling),
            FieldType::Pointer { elem } => write!(f, "*{}", elem),
            FieldType::Slice { elem } => write!(f, "[]{}", elem),
        }
    }
}

/// One field of a projected struct
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProjectedField {
    pub name: String,
    #[serde(rename = "type")]
    pub ty: FieldType,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub embedded: bool,
    /// Serialization name; embedded members carry none
    #[serde(skip_serializing_if = "Option::is_none")]
    pub json_name: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub json_options: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub comments: Vec<String>,
}

impl ProjectedField {
    fn from_member(member: &FieldNode, ty: FieldType) -> Self {
        let info = member.tag_info();
        let mut json_options = Vec::new();
        if info.omit_empty {
            json_options.push("omitempty".to_string());
        }
        ProjectedField {
            name: member.name.clone(),
            ty,
            embedded: false,
            json_name: Some(info.marshal_name()),
            json_options,
            comments: member
                .comment_lines
                .iter()
                .filter(|l| !l.is_empty())
                .cloned()
                .collect(),
        }
    }

    fn embedded(mut self) -> Self {
        self.embedded = true;
        self.json_name = None;
        self.json_options.clear();
        self
    }

    fn with_options(mut self, options: &[String]) -> Self {
        for opt in options {
            if !self.json_options.contains(opt) {
                self.json_options.push(opt.clone());
            }
        }
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Origin {
    Primary,
    Closure,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum DeclBody {
    Struct { fields: Vec<ProjectedField> },
    Alias { target: FieldType },
}

/// Output-facing declaration derived from one source type
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProjectedDecl {
    pub name: String,
    pub source: QualifiedName,
    pub origin: Origin,
    #[serde(flatten)]
    pub body: DeclBody,
}

impl ProjectedDecl {
    /// Fields of a struct declaration; empty for aliases
    pub fn fields(&self) -> &[ProjectedField] {
        match &self.body {
            DeclBody::Struct { fields } => fields,
            DeclBody::Alias { .. } => &[],
        }
    }

    pub fn field(&self, name: &str) -> Option<&ProjectedField> {
        self.fields().iter().find(|f| f.name == name)
    }
}

/// Applies the field policy and namespace rewriting for one source namespace
pub(crate) struct Emitter<'a> {
    pub registry: &'a TypeRegistry,
    pub classifier: &'a ClassifierSettings,
    pub settings: &'a ProjectionSettings,
    pub source: &'a str,
    pub output: &'a str,
    pub set: &'a ProjectionSet,
    pub imports: BTreeSet<String>,
}

impl<'a> Emitter<'a> {
    pub fn emit_decl(&mut self, node: &'a TypeNode) -> Result<ProjectedDecl, GenerateError> {
        trace!(ty = %node.name, "projecting declaration");
        let body = match node.kind {
            TypeKind::Struct => DeclBody::Struct {
                fields: self.emit_fields(node)?,
            },
            TypeKind::Alias => DeclBody::Alias {
                target: self.alias_target(node)?,
            },
            other => {
                return Err(GenerateError::UnsupportedKind {
                    owner: node.name.to_string(),
                    field: String::new(),
                    kind: other.to_string(),
                })
            }
        };
        let origin = if self.set.is_primary(&node.name) {
            Origin::Primary
        } else {
            Origin::Closure
        };
        Ok(ProjectedDecl {
            name: node.name.public_name(),
            source: node.name.clone(),
            origin,
            body,
        })
    }

    fn emit_fields(&mut self, owner: &'a TypeNode) -> Result<Vec<ProjectedField>, GenerateError> {
        let mut fields = Vec::new();
        let mut claimed: BTreeMap<String, String> = BTreeMap::new();
        for member in self.registry.members_of(owner) {
            let ty = self.registry.resolve(&member.ty)?;
            let Some(field) = self.project_member(owner, member, ty)? else {
                continue;
            };
            if let Some(json_name) = &field.json_name {
                if let Some(first) = claimed.insert(json_name.clone(), field.name.clone()) {
                    return Err(GenerateError::DuplicateSerializationName {
                        owner: owner.name.to_string(),
                        name: json_name.clone(),
                        first,
                        second: field.name.clone(),
                    });
                }
            }
            fields.push(field);
        }
        Ok(fields)
    }

    /// Field policy for `member` of `owner`, evaluated against `ty`
    ///
    /// `ty` starts as the declared type and is replaced by the alias target
    /// when an alias is unwrapped, so the alias's shape governs inclusion.
    fn project_member(
        &mut self,
        owner: &TypeNode,
        member: &FieldNode,
        ty: &'a TypeNode,
    ) -> Result<Option<ProjectedField>, GenerateError> {
        if !is_exported_ident(&member.name) || self.classifier.is_model_base(&ty.name) {
            return Ok(None);
        }
        let info = member.tag_info();
        if info.ignore {
            return Ok(None);
        }

        let field = match ty.kind {
            TypeKind::Builtin | TypeKind::Map | TypeKind::Interface => {
                if ty.kind == TypeKind::Interface && member.embedded {
                    return Err(GenerateError::EmbeddedInterface {
                        owner: owner.name.to_string(),
                        field: member.name.clone(),
                    });
                }
                if let Some(field) = self.remapped(member, ty) {
                    return Ok(Some(field));
                }
                ProjectedField::from_member(member, FieldType::Source {
                    name: ty.name.clone(),
                })
            }
            TypeKind::Alias => {
                if let Some(field) = self.remapped(member, ty) {
                    return Ok(Some(field));
                }
                self.registry.underlying_of(ty)?;
                let target = self.registry.alias_target(ty)?;
                return self.project_member(owner, member, target);
            }
            TypeKind::Struct => {
                if !member.embedded
                    && self.set.is_primary(&owner.name)
                    && !info.has_tag("get")
                    && !info.has_tag("list")
                {
                    trace!(
                        owner = %owner.name,
                        field = %member.name,
                        "nested object without get/list tag dropped from model"
                    );
                    return Ok(None);
                }
                let field = ProjectedField::from_member(member, self.resolve_named(ty));
                if member.embedded {
                    field.embedded()
                } else {
                    field
                }
            }
            TypeKind::Pointer => {
                let elem = self.registry.elem_of(ty)?;
                let field =
                    ProjectedField::from_member(member, FieldType::pointer(self.resolve_named(elem)));
                if member.embedded {
                    field.embedded()
                } else {
                    field
                }
            }
            TypeKind::Slice => {
                let slice_ty = self.slice_type(ty)?;
                ProjectedField::from_member(member, slice_ty)
            }
            TypeKind::Channel => {
                return Err(GenerateError::UnsupportedKind {
                    owner: owner.name.to_string(),
                    field: member.name.clone(),
                    kind: ty.kind.to_string(),
                })
            }
        };
        Ok(Some(field))
    }

    fn remapped(&self, member: &FieldNode, ty: &TypeNode) -> Option<ProjectedField> {
        let remap = self.settings.scalar_remap.get(&ty.name.name)?;
        let field = ProjectedField::from_member(member, FieldType::Scalar {
            spelling: remap.ty.clone(),
        });
        Some(field.with_options(&remap.json_options))
    }

    fn slice_type(&mut self, ty: &TypeNode) -> Result<FieldType, GenerateError> {
        let elem = self.registry.elem_of(ty)?;
        let (inner, pointer) = if elem.kind == TypeKind::Pointer {
            (self.registry.elem_of(elem)?, true)
        } else {
            (elem, false)
        };
        let ns = inner.name.namespace.as_str();
        if ns != self.source && ns != self.output {
            return Ok(FieldType::Source {
                name: ty.name.clone(),
            });
        }
        let mut out = self.resolve_named(inner);
        if pointer {
            out = FieldType::pointer(out);
        }
        Ok(FieldType::slice(out))
    }

    fn alias_target(&mut self, node: &TypeNode) -> Result<FieldType, GenerateError> {
        let target = self.registry.alias_target(node)?;
        match target.kind {
            TypeKind::Slice => {
                let elem = self.registry.elem_of(target)?;
                let inner = match elem.kind {
                    TypeKind::Pointer => {
                        let pointee = self.registry.elem_of(elem)?;
                        if pointee.name.namespace != self.source {
                            return Err(GenerateError::PointerOutsideSource {
                                owner: node.name.to_string(),
                                elem: pointee.name.to_string(),
                                namespace: self.source.to_string(),
                            });
                        }
                        FieldType::pointer(FieldType::local(pointee.name.public_name()))
                    }
                    TypeKind::Builtin => FieldType::Source {
                        name: elem.name.clone(),
                    },
                    _ => self.resolve_named(elem),
                };
                Ok(FieldType::slice(inner))
            }
            TypeKind::Builtin => Ok(FieldType::Source {
                name: target.name.clone(),
            }),
            _ => Ok(self.resolve_named(target)),
        }
    }

    /// Namespace rewriting for a referenced named type
    fn resolve_named(&mut self, ty: &TypeNode) -> FieldType {
        let ns = ty.name.namespace.as_str();
        if ns == self.source {
            return FieldType::local(ty.name.public_name());
        }
        if ns == self.output {
            return FieldType::local(ty.name.name.clone());
        }
        if ns.is_empty() {
            return FieldType::Source {
                name: ty.name.clone(),
            };
        }
        match self
            .settings
            .namespace_map
            .output_for(ns, self.source, self.output)
        {
            Some(out_ns) => {
                self.imports.insert(out_ns.clone());
                FieldType::Imported {
                    namespace: out_ns,
                    name: ty.name.name.clone(),
                }
            }
            None => FieldType::Source {
                name: ty.name.clone(),
            },
        }
    }
}
