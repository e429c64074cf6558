use super::tags::{extract_comment_tags, parse_field_tags, CommentTags, FieldTagInfo};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Namespace-qualified type name, unique within one generation run
///
/// Serialized as a single string: `namespace.Name` for named types, the bare
/// name for builtins, and the canonical spelling (`*T`, `[]T`, `map[K]V`,
/// `chan T`) for compound types, which carry an empty namespace.
#[derive(Debug, Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub struct QualifiedName {
    pub namespace: String,
    pub name: String,
}

/// Structure encoded in a compound type's spelling
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Compound {
    Pointer(QualifiedName),
    Slice(QualifiedName),
    Map {
        key: QualifiedName,
        value: QualifiedName,
    },
    Chan(QualifiedName),
}

impl QualifiedName {
    pub fn new(namespace: impl Into<String>, name: impl Into<String>) -> Self {
        QualifiedName {
            namespace: namespace.into(),
            name: name.into(),
        }
    }

    /// Name with no namespace (`string`, `int64`, ...)
    pub fn builtin(name: impl Into<String>) -> Self {
        QualifiedName::new("", name)
    }

    /// Parse the string form; the namespace is everything before the last
    /// `.` of the final `/` segment.
    pub fn parse(s: &str) -> Self {
        let s = s.trim();
        if is_compound_spelling(s) {
            return QualifiedName::builtin(s);
        }
        let tail_start = s.rfind('/').map(|i| i + 1).unwrap_or(0);
        match s[tail_start..].rfind('.') {
            Some(dot) => {
                let idx = tail_start + dot;
                QualifiedName::new(&s[..idx], &s[idx + 1..])
            }
            None => QualifiedName::builtin(s),
        }
    }

    pub fn pointer_to(elem: &QualifiedName) -> Self {
        QualifiedName::builtin(format!("*{}", elem))
    }

    pub fn slice_of(elem: &QualifiedName) -> Self {
        QualifiedName::builtin(format!("[]{}", elem))
    }

    pub fn map_of(key: &QualifiedName, value: &QualifiedName) -> Self {
        QualifiedName::builtin(format!("map[{}]{}", key, value))
    }

    pub fn chan_of(elem: &QualifiedName) -> Self {
        QualifiedName::builtin(format!("chan {}", elem))
    }

    /// Decode the element structure of a compound spelling
    pub fn compound(&self) -> Option<Compound> {
        if !self.namespace.is_empty() {
            return None;
        }
        let s = self.name.as_str();
        if let Some(rest) = s.strip_prefix('*') {
            return Some(Compound::Pointer(QualifiedName::parse(rest)));
        }
        if let Some(rest) = s.strip_prefix("[]") {
            return Some(Compound::Slice(QualifiedName::parse(rest)));
        }
        if let Some(rest) = s.strip_prefix("chan ") {
            return Some(Compound::Chan(QualifiedName::parse(rest)));
        }
        if let Some(rest) = s.strip_prefix("map[") {
            let mut depth = 1usize;
            for (i, c) in rest.char_indices() {
                match c {
                    '[' => depth += 1,
                    ']' => {
                        depth -= 1;
                        if depth == 0 {
                            return Some(Compound::Map {
                                key: QualifiedName::parse(&rest[..i]),
                                value: QualifiedName::parse(&rest[i + 1..]),
                            });
                        }
                    }
                    _ => {}
                }
            }
        }
        None
    }

    /// Exported names start with an uppercase letter
    pub fn is_exported(&self) -> bool {
        is_exported_ident(&self.name)
    }

    /// The local name with its first letter uppercased
    pub fn public_name(&self) -> String {
        let mut chars = self.name.chars();
        match chars.next() {
            Some(first) => first.to_uppercase().chain(chars).collect(),
            None => String::new(),
        }
    }
}

fn is_compound_spelling(s: &str) -> bool {
    s.starts_with('*') || s.starts_with("[]") || s.starts_with("map[") || s.starts_with("chan ")
}

/// True for identifiers visible outside their declaring namespace
pub fn is_exported_ident(name: &str) -> bool {
    name.chars().next().map(|c| c.is_uppercase()).unwrap_or(false)
}

impl fmt::Display for QualifiedName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.namespace.is_empty() {
            write!(f, "{}", self.name)
        } else {
            write!(f, "{}.{}", self.namespace, self.name)
        }
    }
}

impl From<String> for QualifiedName {
    fn from(s: String) -> Self {
        QualifiedName::parse(&s)
    }
}

impl From<&str> for QualifiedName {
    fn from(s: &str) -> Self {
        QualifiedName::parse(s)
    }
}

impl From<QualifiedName> for String {
    fn from(name: QualifiedName) -> Self {
        name.to_string()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TypeKind {
    Struct,
    Alias,
    Interface,
    Pointer,
    Slice,
    Map,
    Builtin,
    #[serde(rename = "chan")]
    Channel,
}

impl TypeKind {
    /// Pointer, Slice, Map and Channel wrap an element type
    pub fn is_compound(self) -> bool {
        matches!(
            self,
            TypeKind::Pointer | TypeKind::Slice | TypeKind::Map | TypeKind::Channel
        )
    }
}

impl fmt::Display for TypeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            TypeKind::Struct => "Struct",
            TypeKind::Alias => "Alias",
            TypeKind::Interface => "Interface",
            TypeKind::Pointer => "Pointer",
            TypeKind::Slice => "Slice",
            TypeKind::Map => "Map",
            TypeKind::Builtin => "Builtin",
            TypeKind::Channel => "Channel",
        };
        write!(f, "{}", s)
    }
}

/// A declaration in the source graph
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TypeNode {
    pub name: QualifiedName,
    pub kind: TypeKind,
    /// Aliased type, for `Alias`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub underlying: Option<QualifiedName>,
    /// Pointee, element or map value, for compound kinds
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub elem: Option<QualifiedName>,
    /// Map key, for `Map`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub key: Option<QualifiedName>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub members: Vec<FieldNode>,
    #[serde(default, rename = "comments", skip_serializing_if = "Vec::is_empty")]
    pub comment_lines: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub methods: Vec<MethodNode>,
}

impl TypeNode {
    pub fn new(name: impl Into<QualifiedName>, kind: TypeKind) -> Self {
        TypeNode {
            name: name.into(),
            kind,
            underlying: None,
            elem: None,
            key: None,
            members: Vec::new(),
            comment_lines: Vec::new(),
            methods: Vec::new(),
        }
    }

    /// Annotation tags carried by `+key=value` comment lines
    pub fn tags(&self) -> CommentTags {
        extract_comment_tags(&self.comment_lines)
    }

    pub fn has_tag(&self, key: &str) -> bool {
        self.tags().contains_key(key)
    }

    pub fn with_member(mut self, member: FieldNode) -> Self {
        self.members.push(member);
        self
    }

    pub fn with_method(mut self, method: MethodNode) -> Self {
        self.methods.push(method);
        self
    }

    pub fn with_comment(mut self, line: impl Into<String>) -> Self {
        self.comment_lines.push(line.into());
        self
    }

    pub fn with_underlying(mut self, underlying: impl Into<QualifiedName>) -> Self {
        self.underlying = Some(underlying.into());
        self
    }
}

/// A struct member
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldNode {
    pub name: String,
    #[serde(rename = "type")]
    pub ty: QualifiedName,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub embedded: bool,
    /// Raw struct tag, e.g. `json:"name,omitempty" list:"user"`
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub tags: String,
    #[serde(default, rename = "comments", skip_serializing_if = "Vec::is_empty")]
    pub comment_lines: Vec<String>,
}

impl FieldNode {
    pub fn new(name: impl Into<String>, ty: impl Into<QualifiedName>) -> Self {
        FieldNode {
            name: name.into(),
            ty: ty.into(),
            embedded: false,
            tags: String::new(),
            comment_lines: Vec::new(),
        }
    }

    /// Embedded field, named after the embedded type (the pointee for `*T`)
    pub fn embedded(ty: impl Into<QualifiedName>) -> Self {
        let ty = ty.into();
        let name = match ty.compound() {
            Some(Compound::Pointer(elem)) => elem.name,
            _ => ty.name.clone(),
        };
        FieldNode {
            name,
            ty,
            embedded: true,
            tags: String::new(),
            comment_lines: Vec::new(),
        }
    }

    pub fn with_tags(mut self, tags: impl Into<String>) -> Self {
        self.tags = tags.into();
        self
    }

    pub fn with_comment(mut self, line: impl Into<String>) -> Self {
        self.comment_lines.push(line.into());
        self
    }

    /// Parsed struct tag, including the effective serialization name
    pub fn tag_info(&self) -> FieldTagInfo {
        parse_field_tags(&self.name, &self.tags)
    }
}

/// A method declared on a type
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MethodNode {
    pub name: String,
    /// Owning type; filled in by the registry when omitted from the input
    #[serde(default)]
    pub receiver: QualifiedName,
    #[serde(default)]
    pub params: Vec<QualifiedName>,
    #[serde(default)]
    pub results: Vec<QualifiedName>,
    #[serde(default, rename = "comments", skip_serializing_if = "Vec::is_empty")]
    pub comment_lines: Vec<String>,
}

impl MethodNode {
    pub fn new<P, R>(name: impl Into<String>, params: P, results: R) -> Self
    where
        P: IntoIterator,
        P::Item: Into<QualifiedName>,
        R: IntoIterator,
        R::Item: Into<QualifiedName>,
    {
        MethodNode {
            name: name.into(),
            receiver: QualifiedName::default(),
            params: params.into_iter().map(Into::into).collect(),
            results: results.into_iter().map(Into::into).collect(),
            comment_lines: Vec::new(),
        }
    }

    pub fn with_comment(mut self, line: impl Into<String>) -> Self {
        self.comment_lines.push(line.into());
        self
    }

    /// `Receiver.Method`, used in log and lint locations
    pub fn display_name(&self) -> String {
        format!("{}.{}", self.receiver, self.name)
    }
}
