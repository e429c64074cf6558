//! # Route Synthesis Engine
//!
//! Derives API routes for each bound model from the method names and
//! signatures its model and manager declare.
//!
//! Each [`Verb`] carries its method-name prefix, the declaration it is
//! matched against, the exact parameter/result arity and the positions of
//! the query and body parameters. A method produces a route when it passes
//! both the prefix filter and the arity filter. One-to-one verbs keep the
//! first match in declaration order; get-spec and perform-action produce one
//! route per match, with the path segment derived from the name suffix.
//!
//! | Verb           | Prefix               | On      | Arity | Route                         |
//! |----------------|----------------------|---------|-------|-------------------------------|
//! | create         | `ValidateCreateData` | manager | 5 / 2 | `POST /{plural}`              |
//! | list           | `ListItemFilter`     | manager | 4 / 2 | `GET /{plural}`               |
//! | get            | `GetExtraDetails`    | model   | 3 / 2 | `GET /{plural}/{id}`          |
//! | update         | `ValidateUpdateData` | model   | 4 / 2 | `PUT /{plural}/{id}`          |
//! | delete         | `CustomizeDelete`    | model   | 4 / 1 | `DELETE /{plural}/{id}`       |
//! | get-spec       | `GetDetails*`        | model   | 3 / 2 | `GET /{plural}/{id}/{spec}`   |
//! | perform-action | `Perform*`           | model   | 4 / 2 | `POST /{plural}/{id}/{action}`|
//!
//! Routes may also be declared explicitly with `+<prefix>-method`,
//! `+<prefix>-path` and `+<prefix>-tag` comment tags on any model or manager
//! method.

mod annotations;
mod descriptors;
mod engine;
mod verbs;

#[cfg(test)]
mod tests;

pub use annotations::{extract_route_annotation, path_params, RouteAnnotation};
pub use descriptors::{
    BodyDescriptor, ModelRoutes, ParameterDescriptor, ResponseDescriptor, RouteDescriptor, RouteKind,
    ShapePosition, ShapeWarning,
};
pub use engine::{RouteSynthesizer, SynthesisSettings, VerbScan};
pub use verbs::{Cardinality, Target, Verb};
