//! # Type & Method Registry
//!
//! A read-only, navigable graph of the declarations produced by the
//! front-end parser. Every other stage (classification, projection, route
//! synthesis) reads types exclusively through [`TypeRegistry`].
//!
//! ## Contract
//!
//! - [`TypeRegistry::resolve`] looks a type up by qualified name
//! - [`TypeRegistry::members_of`] yields struct fields in declaration order
//! - [`TypeRegistry::underlying_of`] unwraps alias chains, failing on cycles
//! - [`TypeRegistry::methods_with_prefix`] scans methods in declaration order
//!
//! The registry has no mutation methods once built.

mod graph;
mod load;
pub mod tags;
mod types;


pub use graph::TypeRegistry;
pub use load::{load_graph, parse_graph, GraphBuilder, TypeGraph};
pub use tags::{extract_comment_tags, parse_field_tags, CommentTags, FieldTagInfo};
pub use types::{
    is_exported_ident, Compound, FieldNode, MethodNode, QualifiedName, TypeKind, TypeNode,
};
