use super::verbs::Verb;
use crate::registry::QualifiedName;
use http::Method;
use serde::{Serialize, Serializer};
use std::fmt;

fn serialize_method<S: Serializer>(method: &Method, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(method.as_str())
}

/// How a route was derived
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RouteKind {
    Create,
    Get,
    List,
    Update,
    Delete,
    GetSpec,
    PerformAction,
    /// Declared explicitly through a route annotation
    Annotated,
}

impl From<Verb> for RouteKind {
    fn from(verb: Verb) -> Self {
        match verb {
            Verb::Create => RouteKind::Create,
            Verb::Get => RouteKind::Get,
            Verb::List => RouteKind::List,
            Verb::Update => RouteKind::Update,
            Verb::Delete => RouteKind::Delete,
            Verb::GetSpec => RouteKind::GetSpec,
            Verb::PerformAction => RouteKind::PerformAction,
        }
    }
}

impl fmt::Display for RouteKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RouteKind::Create => write!(f, "{}", Verb::Create),
            RouteKind::Get => write!(f, "{}", Verb::Get),
            RouteKind::List => write!(f, "{}", Verb::List),
            RouteKind::Update => write!(f, "{}", Verb::Update),
            RouteKind::Delete => write!(f, "{}", Verb::Delete),
            RouteKind::GetSpec => write!(f, "{}", Verb::GetSpec),
            RouteKind::PerformAction => write!(f, "{}", Verb::PerformAction),
            RouteKind::Annotated => write!(f, "annotated"),
        }
    }
}

/// Request body of a route
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BodyDescriptor {
    /// Key the payload is nested under, e.g. `server`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub wrapper: Option<String>,
    /// Structured payload type; `None` for free-form bodies
    #[serde(skip_serializing_if = "Option::is_none")]
    pub schema: Option<QualifiedName>,
}

/// Inputs of a route
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ParameterDescriptor {
    /// Path placeholders in order of appearance
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub path: Vec<String>,
    /// Structured query object
    #[serde(skip_serializing_if = "Option::is_none")]
    pub query: Option<QualifiedName>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub body: Option<BodyDescriptor>,
}

/// Success response of a route
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ResponseDescriptor {
    Single {
        /// Key the object is nested under; `None` when the handler's own
        /// output type is returned as-is
        #[serde(skip_serializing_if = "Option::is_none")]
        wrapper: Option<String>,
        schema: QualifiedName,
    },
    /// Paged collection nested under the plural keyword
    List { wrapper: String, item: QualifiedName },
}

impl ResponseDescriptor {
    /// Schema of the object, or of each item for lists
    pub fn schema(&self) -> &QualifiedName {
        match self {
            ResponseDescriptor::Single { schema, .. } => schema,
            ResponseDescriptor::List { item, .. } => item,
        }
    }
}

/// A single synthesized route
///
/// Carries names only, never references into the type graph.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RouteDescriptor {
    pub kind: RouteKind,
    #[serde(serialize_with = "serialize_method")]
    pub method: Method,
    pub path: String,
    pub operation_id: String,
    pub tags: Vec<String>,
    pub parameters: ParameterDescriptor,
    pub response: ResponseDescriptor,
    /// `Receiver.Method` the route dispatches to
    pub handler: String,
}

/// Where a method's signature fails the expected structured shape
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ShapePosition {
    Body,
    Response,
}

/// Non-fatal signature diagnostic raised while synthesizing a route
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ShapeWarning {
    pub verb: Verb,
    pub method: String,
    pub position: ShapePosition,
    /// Type found at that position
    #[serde(rename = "type")]
    pub ty: QualifiedName,
}

impl fmt::Display for ShapeWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let what = match self.position {
            ShapePosition::Body => "input",
            ShapePosition::Response => "output",
        };
        write!(
            f,
            "{} {} {} is not a struct pointer",
            self.method, what, self.ty
        )
    }
}

/// All routes of one bound model
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ModelRoutes {
    pub model: QualifiedName,
    pub keyword: String,
    pub keyword_plural: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub service: Option<String>,
    pub routes: Vec<RouteDescriptor>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub warnings: Vec<ShapeWarning>,
}

impl ModelRoutes {
    pub fn route(&self, kind: RouteKind) -> Option<&RouteDescriptor> {
        self.routes.iter().find(|r| r.kind == kind)
    }

    pub fn routes_of(&self, kind: RouteKind) -> impl Iterator<Item = &RouteDescriptor> {
        self.routes.iter().filter(move |r| r.kind == kind)
    }
}
