//! # modelgen
//!
//! **modelgen** reflects over a statically typed persistence layer and
//! derives its public API surface: a projection of every model into an
//! output namespace, and REST route descriptors synthesized from the method
//! naming conventions each model and its manager follow.
//!
//! ## Architecture
//!
//! The library is organized into these modules:
//!
//! - **[`registry`]** - Read-only type graph, graph loading and tag parsing
//! - **[`classify`]** - Model detection and manager binding
//! - **[`projection`]** - Dependency closure and projected declarations
//! - **[`synthesis`]** - Verb table and route descriptor synthesis
//! - **[`generator`]** - Per-namespace pipeline
//! - **[`report`]** - Resource summary of synthesized routes
//! - **[`linter`]** - Non-fatal diagnostics for a type graph
//! - **[`config`]** - `modelgen.toml` configuration
//! - **[`logging`]** - tracing subscriber setup
//! - **[`cli`]** - Command-line interface
//!
//! ### Data flow
//!
//! ```text
//! graph.yaml ─→ TypeRegistry ─→ ModelClassifier ─┬─→ ProjectionEngine ─→ Projection
//!                                                └─→ RouteSynthesizer ─→ ModelRoutes ─→ Resource
//! ```
//!
//! Every stage only reads the registry. A [`GenerateError`] aborts the
//! namespace being generated; expected non-matches (a model without a
//! manager, a method whose signature does not fit its verb) are skipped
//! quietly and surfaced by the [`linter`].
//!
//! ## Quick Start
//!
//! ```rust
//! use modelgen::config::{GeneratorConfig, ManagerEntry};
//! use modelgen::generator::Generator;
//! use modelgen::registry::{FieldNode, GraphBuilder, MethodNode, TypeKind, TypeNode};
//!
//! let registry = GraphBuilder::new()
//!     .insert(TypeNode::new("context.Context", TypeKind::Interface))
//!     .insert(
//!         TypeNode::new("example.com/app/models.SWidget", TypeKind::Struct)
//!             .with_comment("+modelgen:api-gen")
//!             .with_member(FieldNode::new("Name", "string"))
//!             .with_method(MethodNode::new(
//!                 "GetExtraDetails",
//!                 ["context.Context", "string", "string"],
//!                 ["string", "error"],
//!             )),
//!     )
//!     .insert(TypeNode::new("example.com/app/models.SWidgetManager", TypeKind::Struct))
//!     .build()?;
//!
//! let config = GeneratorConfig {
//!     managers: vec![ManagerEntry {
//!         ty: "example.com/app/models.SWidgetManager".into(),
//!         keyword: "widget".to_string(),
//!         keyword_plural: "widgets".to_string(),
//!         service: None,
//!     }],
//!     ..GeneratorConfig::default()
//! };
//!
//! let output = Generator::new(&registry, &config).generate_namespace("example.com/app/models")?;
//! assert_eq!(output.routes[0].routes[0].path, "/widgets/{id}");
//! # Ok::<(), modelgen::GenerateError>(())
//! ```

pub mod classify;
pub mod cli;
pub mod config;
pub mod error;
pub mod generator;
pub mod linter;
pub mod logging;
pub mod projection;
pub mod registry;
pub mod report;
pub mod synthesis;
pub mod validator;

pub use classify::{ManagerRegistry, ModelClassifier};
pub use config::GeneratorConfig;
pub use error::GenerateError;
pub use generator::{Generator, NamespaceOutput};
pub use projection::{Projection, ProjectionEngine};
pub use registry::{load_graph, TypeRegistry};
pub use synthesis::{RouteDescriptor, RouteSynthesizer};
